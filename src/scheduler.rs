//! Arbitration among processors competing for shared modules, with a rotating priority start.

use crate::core::{Processor, ProcessorId};
use crate::memory::MemoryBank;
use crate::metrics::AccessStats;
use clap::ValueEnum;

/// How the first-priority processor moves between cycles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum PriorityPolicy {
    /// The first processor denied this cycle goes first next cycle, so a starved
    /// processor cannot be passed over twice in a row. Advances by one when
    /// nobody was denied.
    #[default]
    FirstDenied,
    /// Advance the start by one every cycle.
    RoundRobin,
}

/// Rotating arbitration order over `processors` processors.
#[derive(Clone, Debug)]
pub struct PriorityRotation {
    policy: PriorityPolicy,
    start: usize,
    processors: usize,
}

impl PriorityRotation {
    pub fn new(policy: PriorityPolicy, processors: usize) -> Self {
        Self {
            policy,
            start: 0,
            processors,
        }
    }

    pub fn start(&self) -> ProcessorId {
        ProcessorId(self.start)
    }

    /// Processors in this cycle's priority order.
    pub fn order(&self) -> impl Iterator<Item = ProcessorId> + '_ {
        (0..self.processors).map(move |i| ProcessorId((self.start + i) % self.processors))
    }

    /// Move the start for the next cycle.
    pub fn advance(&mut self, first_denied: Option<ProcessorId>) {
        self.start = match (self.policy, first_denied) {
            (PriorityPolicy::FirstDenied, Some(p)) => p.0,
            _ => (self.start + 1) % self.processors,
        };
    }

    /// Grant modules in priority order for one cycle.
    ///
    /// Granted processors complete their access (recorded in `stats`); denied ones
    /// accumulate a wait cycle. Returns the first processor denied, if any.
    pub fn arbitrate(
        &self,
        processors: &mut [Processor],
        bank: &mut MemoryBank,
        stats: &mut AccessStats,
    ) -> Option<ProcessorId> {
        let mut first_denied = None;
        for id in self.order() {
            let p = &mut processors[id.0];
            let Some(target) = p.current_request else {
                continue;
            };
            if bank.try_grant(target, id) {
                stats.record_access(id, p.complete());
            } else {
                p.deny();
                stats.record_denial();
                first_denied.get_or_insert(id);
            }
        }
        if first_denied.is_some() {
            stats.record_contended_cycle();
        }
        first_denied
    }

    pub fn policy(&self) -> PriorityPolicy {
        self.policy
    }
}
