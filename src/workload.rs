//! Request workload: which module each idle processor asks for next.

use crate::core::{ModuleId, Processor};
use crate::error::SimError;
use crate::variate::VariateGenerator;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Standard deviation (in modules) of the clustered distribution.
pub const DEFAULT_CLUSTER_STDEV: f64 = 5.0;

/// Shape of the request stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RequestDistribution {
    /// Every module equally likely on every request.
    #[default]
    Uniform,
    /// Each processor favours a fixed preferred module; requests follow a
    /// wrapped normal centred on it.
    Clustered,
}

impl RequestDistribution {
    /// Parse the single-letter selector: `u` (uniform) or `n` (normal/clustered).
    pub fn from_selector(selector: char) -> Result<Self, SimError> {
        match selector.to_ascii_lowercase() {
            'u' => Ok(Self::Uniform),
            'n' => Ok(Self::Clustered),
            other => Err(SimError::UnknownDistribution(other.to_string())),
        }
    }

    /// Short name used in report file names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::Clustered => "normal",
        }
    }
}

impl FromStr for RequestDistribution {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u" | "uniform" => Ok(Self::Uniform),
            "n" | "normal" | "clustered" => Ok(Self::Clustered),
            _ => Err(SimError::UnknownDistribution(s.to_string())),
        }
    }
}

impl fmt::Display for RequestDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Request generator for one run (fixed module count).
#[derive(Clone, Debug)]
pub struct RequestPattern {
    distribution: RequestDistribution,
    stdev: f64,
    module_count: usize,
}

impl RequestPattern {
    pub fn new(distribution: RequestDistribution, stdev: f64, module_count: usize) -> Self {
        Self {
            distribution,
            stdev,
            module_count,
        }
    }

    /// Fix each processor's preferred module. Only the clustered distribution uses one.
    pub fn assign_preferred<R: Rng>(&self, processors: &mut [Processor], variates: &mut VariateGenerator<R>) {
        if self.distribution != RequestDistribution::Clustered {
            return;
        }
        for p in processors.iter_mut() {
            p.preferred_module = Some(ModuleId(variates.uniform(self.module_count)));
        }
    }

    pub fn next_target<R: Rng>(&self, processor: &Processor, variates: &mut VariateGenerator<R>) -> ModuleId {
        match self.distribution {
            RequestDistribution::Uniform => ModuleId(variates.uniform(self.module_count)),
            RequestDistribution::Clustered => {
                let mean = processor.preferred_module.map_or(0, |m| m.0) as i64;
                ModuleId(variates.wrapped_normal(mean, self.stdev, self.module_count))
            }
        }
    }

    /// Give every idle processor a fresh request.
    pub fn replenish<R: Rng>(&self, processors: &mut [Processor], variates: &mut VariateGenerator<R>) {
        for p in processors.iter_mut().filter(|p| p.is_idle()) {
            let target = self.next_target(p, variates);
            p.issue(target);
        }
    }

    pub fn distribution(&self) -> RequestDistribution {
        self.distribution
    }

    pub fn module_count(&self) -> usize {
        self.module_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProcessorId;

    fn processors(n: usize) -> Vec<Processor> {
        (0..n).map(|i| Processor::new(ProcessorId(i))).collect()
    }

    #[test]
    fn selector_parsing() {
        assert_eq!(RequestDistribution::from_selector('u').unwrap(), RequestDistribution::Uniform);
        assert_eq!(RequestDistribution::from_selector('N').unwrap(), RequestDistribution::Clustered);
        assert!(matches!(
            RequestDistribution::from_selector('x'),
            Err(SimError::UnknownDistribution(_))
        ));
    }

    #[test]
    fn name_parsing_rejects_unknown() {
        assert_eq!("uniform".parse::<RequestDistribution>().unwrap(), RequestDistribution::Uniform);
        assert_eq!("Clustered".parse::<RequestDistribution>().unwrap(), RequestDistribution::Clustered);
        assert_eq!("normal".parse::<RequestDistribution>().unwrap(), RequestDistribution::Clustered);
        assert!("zipf".parse::<RequestDistribution>().is_err());
    }

    #[test]
    fn uniform_assigns_no_preference() {
        let pattern = RequestPattern::new(RequestDistribution::Uniform, DEFAULT_CLUSTER_STDEV, 8);
        let mut procs = processors(4);
        let mut gen = VariateGenerator::seeded(1);
        pattern.assign_preferred(&mut procs, &mut gen);
        assert!(procs.iter().all(|p| p.preferred_module.is_none()));
    }

    #[test]
    fn clustered_assigns_preference_in_range() {
        let pattern = RequestPattern::new(RequestDistribution::Clustered, DEFAULT_CLUSTER_STDEV, 8);
        let mut procs = processors(16);
        let mut gen = VariateGenerator::seeded(1);
        pattern.assign_preferred(&mut procs, &mut gen);
        assert!(procs.iter().all(|p| p.preferred_module.map_or(false, |m| m.0 < 8)));
    }

    #[test]
    fn replenish_only_touches_idle_processors() {
        let pattern = RequestPattern::new(RequestDistribution::Uniform, DEFAULT_CLUSTER_STDEV, 4);
        let mut procs = processors(3);
        procs[1].issue(ModuleId(3));
        procs[1].deny();
        let mut gen = VariateGenerator::seeded(5);
        pattern.replenish(&mut procs, &mut gen);
        assert!(procs.iter().all(|p| !p.is_idle()));
        assert_eq!(procs[1].current_request, Some(ModuleId(3)));
        assert_eq!(procs[1].wait_cycles, 1);
        assert!(procs.iter().all(|p| p.current_request.unwrap().0 < 4));
    }

    #[test]
    fn clustered_requests_stay_near_preference() {
        let pattern = RequestPattern::new(RequestDistribution::Clustered, DEFAULT_CLUSTER_STDEV, 256);
        let p = Processor::new(ProcessorId(0)).with_preferred_module(ModuleId(128));
        let mut gen = VariateGenerator::seeded(8);
        let near = (0..1000)
            .filter(|_| (pattern.next_target(&p, &mut gen).0 as i64 - 128).abs() <= 20)
            .count();
        assert!(near > 990);
    }
}
