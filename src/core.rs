//! Core architecture model: cycles, processors, memory modules and per-processor request state.

use std::fmt;

/// Global simulation cycle counter (discrete time).
pub type Cycle = u64;

/// Identifies a processor (0..P).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessorId(pub usize);

/// Identifies a shared memory module (0..M).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub usize);

/// A processor issuing at most one outstanding memory request at a time.
#[derive(Clone, Debug)]
pub struct Processor {
    pub id: ProcessorId,
    /// Module this processor is waiting for, if it has a request outstanding.
    pub current_request: Option<ModuleId>,
    /// Cycles spent denied since `current_request` was issued.
    pub wait_cycles: u64,
    /// Centre of the clustered distribution; fixed for the whole run.
    pub preferred_module: Option<ModuleId>,
}

impl Processor {
    pub fn new(id: ProcessorId) -> Self {
        Self {
            id,
            current_request: None,
            wait_cycles: 0,
            preferred_module: None,
        }
    }

    pub fn with_preferred_module(mut self, module: ModuleId) -> Self {
        self.preferred_module = Some(module);
        self
    }

    pub fn is_idle(&self) -> bool {
        self.current_request.is_none()
    }

    /// Issue a new request. Has no effect while one is outstanding.
    pub fn issue(&mut self, module: ModuleId) {
        if self.current_request.is_none() {
            self.current_request = Some(module);
            self.wait_cycles = 0;
        }
    }

    /// Complete the outstanding request and return its access time
    /// (cycles waited plus one cycle of service).
    pub fn complete(&mut self) -> u64 {
        let access_time = self.wait_cycles + 1;
        self.current_request = None;
        self.wait_cycles = 0;
        access_time
    }

    pub fn deny(&mut self) {
        self.wait_cycles += 1;
    }
}

impl fmt::Display for ProcessorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processor_starts_idle() {
        let p = Processor::new(ProcessorId(3));
        assert!(p.is_idle());
        assert_eq!(p.wait_cycles, 0);
        assert_eq!(p.preferred_module, None);
    }

    #[test]
    fn access_time_counts_denials_plus_service() {
        let mut p = Processor::new(ProcessorId(0));
        p.issue(ModuleId(2));
        p.deny();
        p.deny();
        assert_eq!(p.complete(), 3);
        assert!(p.is_idle());
        assert_eq!(p.wait_cycles, 0);
    }

    #[test]
    fn issue_keeps_single_outstanding_request() {
        let mut p = Processor::new(ProcessorId(0));
        p.issue(ModuleId(1));
        p.deny();
        p.issue(ModuleId(5));
        assert_eq!(p.current_request, Some(ModuleId(1)));
        assert_eq!(p.wait_cycles, 1);
    }

    #[test]
    fn ids_display() {
        assert_eq!(ProcessorId(4).to_string(), "P4");
        assert_eq!(ModuleId(0).to_string(), "M0");
    }
}
