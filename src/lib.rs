//! Shared memory contention simulator: average access time as a function of the number
//! of shared memory modules, under uniform or clustered request distributions.

pub mod config;
pub mod convergence;
pub mod core;
pub mod driver;
pub mod error;
pub mod memory;
pub mod metrics;
pub mod report;
pub mod scheduler;
pub mod simulator;
pub mod variate;
pub mod workload;

pub use config::SimulationConfig;
pub use driver::{run_sweep, simulate, ResultSeries};
pub use error::SimError;
pub use scheduler::PriorityPolicy;
pub use simulator::{ContentionRun, RunOutcome};
pub use variate::VariateGenerator;
pub use workload::RequestDistribution;
