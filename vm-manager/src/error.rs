use disk::DiskError;
use memory::MemoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VmError {
    #[error("address {address:#x} is out of range (limit {limit:#x})")]
    AddressOutOfRange { address: u64, limit: u64 },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// Eviction was requested while no page is tracked as resident. This is a
    /// bookkeeping bug, not a recoverable condition.
    #[error("no victim available for eviction")]
    NoVictimAvailable,
    #[error("no free frame for page {page} and the eviction policy never evicts")]
    OutOfFrames { page: u32 },
    #[error("main memory: {0}")]
    Memory(#[from] MemoryError),
    #[error("backing store: {0}")]
    Disk(#[from] DiskError),
}

pub type Result<T> = std::result::Result<T, VmError>;
