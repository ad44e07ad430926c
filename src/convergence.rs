//! Convergence test for the running average access time.

use tracing::trace;

/// Default relative tolerance between consecutive averages.
pub const DEFAULT_TOLERANCE: f64 = 0.02;

/// `|curr - prev| / curr < tol`. A zero or non-finite `curr` never converges.
pub fn is_converged(prev: f64, curr: f64, tol: f64) -> bool {
    if curr == 0.0 || !curr.is_finite() {
        return false;
    }
    ((curr - prev) / curr).abs() < tol
}

/// Tracks the previous running average and decides when a run has stabilised.
#[derive(Clone, Debug)]
pub struct ConvergenceMonitor {
    tolerance: f64,
    previous: Option<f64>,
    checks: u64,
}

impl ConvergenceMonitor {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            previous: None,
            checks: 0,
        }
    }

    /// Feed the current average. Returns true when it is within tolerance of the
    /// previous one; otherwise remembers it for the next check.
    pub fn observe(&mut self, current: f64) -> bool {
        self.checks += 1;
        if let Some(prev) = self.previous {
            if current > 0.0 && is_converged(prev, current, self.tolerance) {
                trace!(prev, current, checks = self.checks, "average converged");
                return true;
            }
        }
        self.previous = Some(current);
        false
    }

    pub fn previous(&self) -> Option<f64> {
        self.previous
    }

    pub fn checks(&self) -> u64 {
        self.checks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_current_never_converges() {
        assert!(!is_converged(0.0, 0.0, 0.02));
        assert!(!is_converged(1.0, 0.0, 1e9));
    }

    #[test]
    fn relative_difference_against_tolerance() {
        assert!(is_converged(1.0, 1.0, 0.02));
        assert!(is_converged(2.0, 2.03, 0.02));
        assert!(!is_converged(2.0, 2.1, 0.02));
        assert!(!is_converged(2.1, 2.0, 0.02));
        // 0.019... < 0.02
        assert!(is_converged(5.0, 5.1, 0.02));
    }

    #[test]
    fn non_finite_current_never_converges() {
        assert!(!is_converged(1.0, f64::NAN, 0.02));
        assert!(!is_converged(1.0, f64::INFINITY, 0.02));
    }

    #[test]
    fn zero_tolerance_never_converges() {
        assert!(!is_converged(3.0, 3.0, 0.0));
    }

    #[test]
    fn monitor_needs_a_previous_average() {
        let mut m = ConvergenceMonitor::new(DEFAULT_TOLERANCE);
        assert!(!m.observe(2.0));
        assert_eq!(m.previous(), Some(2.0));
        assert!(!m.observe(3.0));
        assert_eq!(m.previous(), Some(3.0));
        assert!(m.observe(3.01));
        assert_eq!(m.checks(), 3);
    }
}
