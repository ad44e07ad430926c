//! Error type shared by the simulator, driver and report writers.

use thiserror::Error;

/// Errors raised while configuring or running a contention sweep.
///
/// A run that exhausts its cycle budget is not an error; see
/// [`RunOutcome::Exhausted`](crate::simulator::RunOutcome::Exhausted).
#[derive(Debug, Error)]
pub enum SimError {
    /// The distribution selector did not name a known request distribution.
    #[error("unknown request distribution: {0:?} (expected u/uniform or n/normal/clustered)")]
    UnknownDistribution(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A per-run buffer could not be reserved.
    #[error("failed to allocate {what} ({requested} entries)")]
    Allocation {
        what: &'static str,
        requested: usize,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reserve exactly `len` slots, reporting failure instead of aborting.
pub(crate) fn try_vec_with_capacity<T>(what: &'static str, len: usize) -> Result<Vec<T>, SimError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| SimError::Allocation { what, requested: len })?;
    Ok(v)
}
