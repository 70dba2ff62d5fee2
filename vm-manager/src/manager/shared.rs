use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::VirtualMemoryManager;
use crate::error::Result;
use crate::storage::{BackingStore, MainMemory};

/// Cloneable handle that serializes every call through one mutex. Eviction
/// updates several pieces of state in sequence, so callers sharing a
/// simulator must not interleave inside it.
#[derive(Debug)]
pub struct SharedVirtualMemoryManager<M, D> {
    inner: Arc<Mutex<VirtualMemoryManager<M, D>>>,
}

impl<M, D> Clone for SharedVirtualMemoryManager<M, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: MainMemory, D: BackingStore> SharedVirtualMemoryManager<M, D> {
    pub fn new(manager: VirtualMemoryManager<M, D>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VirtualMemoryManager<M, D>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn read_byte(&self, address: u32) -> Result<u8> {
        self.lock().read_byte(address)
    }

    pub fn write_byte(&self, address: u32, value: u8) -> Result<()> {
        self.lock().write_byte(address, value)
    }

    pub fn flush_all(&self) -> Result<()> {
        self.lock().flush_all()
    }

    pub fn page_fault_count(&self) -> u64 {
        self.lock().page_fault_count()
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.lock().bytes_transferred()
    }

    /// Runs `f` with exclusive access to the manager.
    pub fn with<R>(&self, f: impl FnOnce(&mut VirtualMemoryManager<M, D>) -> R) -> R {
        f(&mut self.lock())
    }
}
