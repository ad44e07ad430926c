//! Discrete-cycle contention simulator: one run per module count, stepping request
//! generation, arbitration and convergence checks until the average stabilises.

use crate::config::SimulationConfig;
use crate::convergence::ConvergenceMonitor;
use crate::core::{Cycle, Processor, ProcessorId};
use crate::error::{try_vec_with_capacity, SimError};
use crate::memory::MemoryBank;
use crate::metrics::AccessStats;
use crate::scheduler::PriorityRotation;
use crate::variate::VariateGenerator;
use crate::workload::RequestPattern;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Series value recorded for a run that never converged.
pub const NON_CONVERGED: f64 = -1.0;

/// How a single run ended.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RunOutcome {
    Converged {
        average: f64,
        cycles: Cycle,
        accesses: u64,
    },
    /// The cycle budget ran out first.
    Exhausted { cycles: Cycle, accesses: u64 },
}

impl RunOutcome {
    /// Average access time, or [`NON_CONVERGED`].
    pub fn series_value(&self) -> f64 {
        match self {
            Self::Converged { average, .. } => *average,
            Self::Exhausted { .. } => NON_CONVERGED,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    pub fn cycles(&self) -> Cycle {
        match self {
            Self::Converged { cycles, .. } | Self::Exhausted { cycles, .. } => *cycles,
        }
    }

    pub fn accesses(&self) -> u64 {
        match self {
            Self::Converged { accesses, .. } | Self::Exhausted { accesses, .. } => *accesses,
        }
    }
}

/// All state for one module count. Built fresh per run and dropped when it ends.
pub struct ContentionRun<R = ChaCha8Rng> {
    module_count: usize,
    max_cycles: Cycle,
    processors: Vec<Processor>,
    bank: MemoryBank,
    pattern: RequestPattern,
    rotation: PriorityRotation,
    stats: AccessStats,
    monitor: ConvergenceMonitor,
    variates: VariateGenerator<R>,
    current_cycle: Cycle,
}

impl<R: Rng> ContentionRun<R> {
    pub fn new(
        config: &SimulationConfig,
        module_count: usize,
        mut variates: VariateGenerator<R>,
    ) -> Result<Self, SimError> {
        if module_count == 0 {
            return Err(SimError::InvalidConfig("module count must be at least 1".into()));
        }
        if config.processors == 0 {
            return Err(SimError::InvalidConfig("processor count must be at least 1".into()));
        }

        let mut processors = try_vec_with_capacity("processors", config.processors)?;
        processors.extend((0..config.processors).map(|i| Processor::new(ProcessorId(i))));
        let pattern = RequestPattern::new(config.distribution, config.clustered_stdev, module_count);
        pattern.assign_preferred(&mut processors, &mut variates);

        Ok(Self {
            module_count,
            max_cycles: config.max_cycles,
            processors,
            bank: MemoryBank::new(module_count)?,
            pattern,
            rotation: PriorityRotation::new(config.policy, config.processors),
            stats: AccessStats::new(config.processors)?,
            monitor: ConvergenceMonitor::new(config.tolerance),
            variates,
            current_cycle: 0,
        })
    }

    /// Run one cycle. Returns the average access time if it converged this cycle.
    pub fn step(&mut self) -> Option<f64> {
        self.bank.release_all();
        self.pattern.replenish(&mut self.processors, &mut self.variates);
        let first_denied = self
            .rotation
            .arbitrate(&mut self.processors, &mut self.bank, &mut self.stats);
        self.rotation.advance(first_denied);
        self.current_cycle += 1;

        // No verdict on a cold-start average.
        if !self.stats.all_served() {
            return None;
        }
        let average = self.stats.average()?;
        self.monitor.observe(average).then_some(average)
    }

    /// Step until convergence or until the cycle budget is spent.
    pub fn run(mut self) -> RunOutcome {
        let outcome = loop {
            if self.current_cycle >= self.max_cycles {
                break RunOutcome::Exhausted {
                    cycles: self.current_cycle,
                    accesses: self.stats.completed_accesses,
                };
            }
            if let Some(average) = self.step() {
                break RunOutcome::Converged {
                    average,
                    cycles: self.current_cycle,
                    accesses: self.stats.completed_accesses,
                };
            }
        };
        debug!(
            modules = self.module_count,
            processors = self.processors.len(),
            converged = outcome.is_converged(),
            value = outcome.series_value(),
            cycles = outcome.cycles(),
            accesses = outcome.accesses(),
            denials = self.stats.denials,
            contended_cycles = self.stats.contended_cycles,
            longest_access = self.stats.longest_access,
            "run finished"
        );
        outcome
    }

    pub fn current_cycle(&self) -> Cycle {
        self.current_cycle
    }

    pub fn stats(&self) -> &AccessStats {
        &self.stats
    }

    pub fn processors(&self) -> &[Processor] {
        &self.processors
    }

    pub fn bank(&self) -> &MemoryBank {
        &self.bank
    }

    pub fn module_count(&self) -> usize {
        self.module_count
    }
}
