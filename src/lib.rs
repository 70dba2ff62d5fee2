use std::io::ErrorKind;

use disk::{Disk, DiskError};
use memory::{MemoryError, PhysicalMemory};
use thiserror::Error;
use vm_manager::{VirtualMemoryManager, VmError};

pub mod config;
pub mod meta_commands;
pub mod repl;
pub mod trace;

pub use config::SimulatorConfig;
pub use trace::{run_trace, Command};

pub type Simulator = VirtualMemoryManager<PhysicalMemory, Disk>;

#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("{0}")]
    Vm(#[from] VmError),
    #[error("main memory: {0}")]
    Memory(#[from] MemoryError),
    #[error("backing store: {0}")]
    Disk(#[from] DiskError),
    #[error("config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Parse(String),
}

/// Builds main memory, the backing store and the manager described by `config`.
pub fn build_simulator(config: &SimulatorConfig) -> Result<Simulator, SimulatorError> {
    let memory = PhysicalMemory::create(config.memory_size)?;
    let page_size = config.vm.page_size as usize;
    let disk = match &config.disk_image {
        Some(name) => match Disk::connect(name, page_size, config.store_size) {
            Err(DiskError::Io(err)) if err.kind() == ErrorKind::NotFound => {
                Disk::create(name, page_size, config.store_size)?
            }
            other => other?,
        },
        None => Disk::in_memory(page_size, config.store_size)?,
    };
    Ok(VirtualMemoryManager::new(memory, disk, config.vm.clone())?)
}
