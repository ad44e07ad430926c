//! Sweep driver: one contention run per module count, collected into a result series.

use crate::config::SimulationConfig;
use crate::error::{try_vec_with_capacity, SimError};
use crate::simulator::{ContentionRun, RunOutcome, NON_CONVERGED};
use crate::variate::VariateGenerator;
use crate::workload::RequestDistribution;
use rayon::prelude::*;
use tracing::info;

/// Average access time per module count; entry `i` is for `i + 1` modules.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultSeries {
    outcomes: Vec<RunOutcome>,
    values: Vec<f64>,
}

impl ResultSeries {
    pub const NON_CONVERGED: f64 = NON_CONVERGED;

    pub fn from_outcomes(outcomes: Vec<RunOutcome>) -> Self {
        let values = outcomes.iter().map(RunOutcome::series_value).collect();
        Self { outcomes, values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn outcomes(&self) -> &[RunOutcome] {
        &self.outcomes
    }

    /// Value for `module_count` modules (1-based).
    pub fn get(&self, module_count: usize) -> Option<f64> {
        module_count.checked_sub(1).and_then(|i| self.values.get(i).copied())
    }

    /// `(module_count, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values.iter().enumerate().map(|(i, v)| (i + 1, *v))
    }

    pub fn converged_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_converged()).count()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Run a single module count with its own generator.
pub fn run_module_count(config: &SimulationConfig, module_count: usize) -> Result<RunOutcome, SimError> {
    let variates = VariateGenerator::for_run(config.seed, module_count as u64);
    Ok(ContentionRun::new(config, module_count, variates)?.run())
}

/// Run every module count from 1 to `config.max_modules`.
///
/// Each run derives its generator from `(seed, module_count)`, so the parallel and
/// sequential paths produce the same series.
pub fn run_sweep(config: &SimulationConfig) -> Result<ResultSeries, SimError> {
    config.validate()?;
    info!(
        processors = config.processors,
        max_modules = config.max_modules,
        distribution = %config.distribution,
        policy = ?config.policy,
        parallel = config.parallel,
        "starting sweep"
    );

    let outcomes = if config.parallel {
        (1..=config.max_modules)
            .into_par_iter()
            .map(|m| run_module_count(config, m))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        let mut outcomes = try_vec_with_capacity("result series", config.max_modules)?;
        for m in 1..=config.max_modules {
            outcomes.push(run_module_count(config, m)?);
        }
        outcomes
    };

    let series = ResultSeries::from_outcomes(outcomes);
    info!(
        runs = series.len(),
        converged = series.converged_count(),
        "sweep finished"
    );
    Ok(series)
}

/// Fill `results[m - 1]` with the average access time for `m` modules, using
/// default settings otherwise.
pub fn simulate(
    results: &mut [f64],
    processor_count: usize,
    distribution: RequestDistribution,
) -> Result<(), SimError> {
    let config = SimulationConfig::new(processor_count, results.len()).with_distribution(distribution);
    let series = run_sweep(&config)?;
    results.copy_from_slice(series.values());
    Ok(())
}
