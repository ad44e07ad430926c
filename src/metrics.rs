//! Metrics collection: completed accesses, running average access time, contention counters.

use crate::core::ProcessorId;
use crate::error::{try_vec_with_capacity, SimError};

/// Per-run access statistics. Only completed accesses count toward the average.
#[derive(Clone, Debug)]
pub struct AccessStats {
    /// Sum of access times (wait + 1) over completed accesses.
    pub total_access_time: u64,
    pub completed_accesses: u64,
    /// Number of times a processor was denied its module.
    pub denials: u64,
    /// Cycles in which at least one processor was denied.
    pub contended_cycles: u64,
    /// Longest single access time observed.
    pub longest_access: u64,
    per_processor: Vec<u64>,
    processors_served: usize,
}

impl AccessStats {
    pub fn new(processors: usize) -> Result<Self, SimError> {
        let mut per_processor = try_vec_with_capacity("per-processor access counts", processors)?;
        per_processor.resize(processors, 0);
        Ok(Self {
            total_access_time: 0,
            completed_accesses: 0,
            denials: 0,
            contended_cycles: 0,
            longest_access: 0,
            per_processor,
            processors_served: 0,
        })
    }

    pub fn record_access(&mut self, processor: ProcessorId, access_time: u64) {
        self.total_access_time += access_time;
        self.completed_accesses += 1;
        self.longest_access = self.longest_access.max(access_time);
        let count = &mut self.per_processor[processor.0];
        if *count == 0 {
            self.processors_served += 1;
        }
        *count += 1;
    }

    pub fn record_denial(&mut self) {
        self.denials += 1;
    }

    pub fn record_contended_cycle(&mut self) {
        self.contended_cycles += 1;
    }

    /// Running average access time, `None` before the first completion.
    pub fn average(&self) -> Option<f64> {
        if self.completed_accesses == 0 {
            return None;
        }
        Some(self.total_access_time as f64 / self.completed_accesses as f64)
    }

    /// True once every processor has completed at least one access.
    pub fn all_served(&self) -> bool {
        self.processors_served == self.per_processor.len()
    }

    pub fn accesses_by(&self, processor: ProcessorId) -> u64 {
        self.per_processor[processor.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_undefined_without_accesses() {
        let stats = AccessStats::new(2).unwrap();
        assert_eq!(stats.average(), None);
        assert!(!stats.all_served());
    }

    #[test]
    fn average_over_completed_accesses() {
        let mut stats = AccessStats::new(2).unwrap();
        stats.record_access(ProcessorId(0), 1);
        stats.record_access(ProcessorId(0), 4);
        assert!((stats.average().unwrap() - 2.5).abs() < 1e-12);
        assert!(!stats.all_served());
        stats.record_access(ProcessorId(1), 1);
        assert!(stats.all_served());
        assert_eq!(stats.accesses_by(ProcessorId(0)), 2);
        assert_eq!(stats.longest_access, 4);
    }

    #[test]
    fn contention_counters() {
        let mut stats = AccessStats::new(1).unwrap();
        stats.record_denial();
        stats.record_denial();
        stats.record_contended_cycle();
        assert_eq!(stats.denials, 2);
        assert_eq!(stats.contended_cycles, 1);
        assert_eq!(stats.completed_accesses, 0);
    }
}
