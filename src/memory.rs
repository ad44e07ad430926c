//! Shared memory modules: who holds each module during the current cycle.

use crate::core::{ModuleId, ProcessorId};
use crate::error::{try_vec_with_capacity, SimError};

/// One interchangeable unit of shared memory.
#[derive(Clone, Debug)]
pub struct MemoryModule {
    pub id: ModuleId,
    holder: Option<ProcessorId>,
}

impl MemoryModule {
    pub fn new(id: ModuleId) -> Self {
        Self { id, holder: None }
    }

    pub fn holder(&self) -> Option<ProcessorId> {
        self.holder
    }

    pub fn is_free(&self) -> bool {
        self.holder.is_none()
    }
}

/// The set of shared modules for one run. Occupancy lasts a single cycle.
pub struct MemoryBank {
    modules: Vec<MemoryModule>,
}

impl MemoryBank {
    pub fn new(module_count: usize) -> Result<Self, SimError> {
        let mut modules = try_vec_with_capacity("memory modules", module_count)?;
        modules.extend((0..module_count).map(|i| MemoryModule::new(ModuleId(i))));
        Ok(Self { modules })
    }

    /// Grant `module` to `processor` if nobody holds it this cycle.
    pub fn try_grant(&mut self, module: ModuleId, processor: ProcessorId) -> bool {
        let slot = &mut self.modules[module.0];
        if slot.holder.is_some() {
            return false;
        }
        slot.holder = Some(processor);
        true
    }

    /// Clear every holder at the start of a cycle.
    pub fn release_all(&mut self) {
        for m in self.modules.iter_mut() {
            m.holder = None;
        }
    }

    pub fn holder(&self, module: ModuleId) -> Option<ProcessorId> {
        self.modules[module.0].holder
    }

    pub fn held_count(&self) -> usize {
        self.modules.iter().filter(|m| !m.is_free()).count()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
