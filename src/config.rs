//! Configuration for a contention sweep.

use crate::convergence::DEFAULT_TOLERANCE;
use crate::core::Cycle;
use crate::error::SimError;
use crate::scheduler::PriorityPolicy;
use crate::workload::{RequestDistribution, DEFAULT_CLUSTER_STDEV};

/// Hard upper bound on cycles per run.
pub const DEFAULT_MAX_CYCLES: Cycle = 1_000_000;

/// Seed used when the caller does not pick one.
pub const DEFAULT_SEED: u64 = 12345;

/// Configuration for a sweep over module counts `1..=max_modules`.
#[derive(Clone, Debug)]
pub struct SimulationConfig {
    /// Number of processors competing for modules.
    pub processors: usize,

    /// Largest module count simulated; the series has this many entries.
    pub max_modules: usize,

    pub distribution: RequestDistribution,

    pub policy: PriorityPolicy,

    /// Random seed; each module count derives its own stream from it.
    pub seed: u64,

    /// Cycle budget per run before recording the non-convergence sentinel.
    pub max_cycles: Cycle,

    /// Relative tolerance between consecutive running averages.
    pub tolerance: f64,

    /// Spread of the clustered distribution, in modules.
    pub clustered_stdev: f64,

    /// Run module counts on the rayon thread pool.
    pub parallel: bool,
}

impl SimulationConfig {
    pub fn new(processors: usize, max_modules: usize) -> Self {
        Self {
            processors,
            max_modules,
            distribution: RequestDistribution::default(),
            policy: PriorityPolicy::default(),
            seed: DEFAULT_SEED,
            max_cycles: DEFAULT_MAX_CYCLES,
            tolerance: DEFAULT_TOLERANCE,
            clustered_stdev: DEFAULT_CLUSTER_STDEV,
            parallel: false,
        }
    }

    pub fn with_distribution(mut self, distribution: RequestDistribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_policy(mut self, policy: PriorityPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_cycles(mut self, max_cycles: Cycle) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_clustered_stdev(mut self, stdev: f64) -> Self {
        self.clustered_stdev = stdev;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.processors == 0 {
            return Err(SimError::InvalidConfig("processor count must be at least 1".into()));
        }
        if self.max_modules == 0 {
            return Err(SimError::InvalidConfig("module count must be at least 1".into()));
        }
        if self.max_cycles == 0 {
            return Err(SimError::InvalidConfig("cycle budget must be at least 1".into()));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "tolerance must be a non-negative number, got {}",
                self.tolerance
            )));
        }
        if !self.clustered_stdev.is_finite() || self.clustered_stdev < 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "standard deviation must be a non-negative number, got {}",
                self.clustered_stdev
            )));
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(8, 512)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = SimulationConfig::new(4, 16);
        assert_eq!(c.max_cycles, 1_000_000);
        assert_eq!(c.tolerance, 0.02);
        assert_eq!(c.clustered_stdev, 5.0);
        assert_eq!(c.policy, PriorityPolicy::FirstDenied);
        assert_eq!(c.distribution, RequestDistribution::Uniform);
        assert!(!c.parallel);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn builder_overrides() {
        let c = SimulationConfig::new(2, 3)
            .with_distribution(RequestDistribution::Clustered)
            .with_policy(PriorityPolicy::RoundRobin)
            .with_seed(9)
            .with_max_cycles(10)
            .with_tolerance(0.1)
            .with_clustered_stdev(2.0)
            .with_parallel(true);
        assert_eq!(c.distribution, RequestDistribution::Clustered);
        assert_eq!(c.policy, PriorityPolicy::RoundRobin);
        assert_eq!(c.seed, 9);
        assert_eq!(c.max_cycles, 10);
        assert_eq!(c.tolerance, 0.1);
        assert_eq!(c.clustered_stdev, 2.0);
        assert!(c.parallel);
    }

    #[test]
    fn rejects_degenerate_values() {
        assert!(SimulationConfig::new(0, 4).validate().is_err());
        assert!(SimulationConfig::new(4, 0).validate().is_err());
        assert!(SimulationConfig::new(4, 4).with_max_cycles(0).validate().is_err());
        assert!(SimulationConfig::new(4, 4).with_tolerance(f64::NAN).validate().is_err());
        assert!(SimulationConfig::new(4, 4).with_clustered_stdev(-1.0).validate().is_err());
    }
}
