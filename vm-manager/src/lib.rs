pub mod config;
pub mod dump;
pub mod error;
pub mod event;
pub mod eviction;
pub mod fault_handler;
pub mod manager;
pub mod page_table;
pub mod stats;
pub mod storage;
pub mod translation;

pub use config::{EvictionPolicyKind, FlushPolicy, VmConfig};
pub use dump::{MemoryCell, MemoryDump, StoreDump, StorePage};
pub use error::{Result, VmError};
pub use event::{EventKind, VmEvent};
pub use eviction::EvictionPolicy;
pub use fault_handler::PageFaultHandler;
pub use manager::{SharedVirtualMemoryManager, VirtualMemoryManager};
pub use page_table::{FrameAllocator, PageTable, PageTableEntry, Residency};
pub use stats::Statistics;
pub use storage::{BackingStore, MainMemory};
pub use translation::{AddressTranslator, FrameNumber, PageNumber, VirtualAddress};
