
mod shared;

pub use shared::SharedVirtualMemoryManager;

use log::{debug, info};

use crate::config::VmConfig;
use crate::dump::{MemoryCell, MemoryDump, StoreDump, StorePage};
use crate::error::{Result, VmError};
use crate::event::VmEvent;
use crate::fault_handler::PageFaultHandler;
use crate::stats::Statistics;
use crate::storage::{BackingStore, MainMemory};
use crate::translation::{format_bits, AddressTranslator, FrameNumber, PageNumber};

/// Demand-paged view of `store` through the frames of `memory`.
#[derive(Debug)]
pub struct VirtualMemoryManager<M, D> {
    memory: M,
    store: D,
    config: VmConfig,
    translator: AddressTranslator,
    handler: PageFaultHandler,
    clock: u64,
}

impl<M: MainMemory, D: BackingStore> VirtualMemoryManager<M, D> {
    pub fn new(memory: M, store: D, config: VmConfig) -> Result<Self> {
        config.validate()?;
        if store.page_size() != config.page_size {
            return Err(VmError::InvalidConfiguration(format!(
                "backing store pages are {} bytes, configured page size is {}",
                store.page_size(),
                config.page_size
            )));
        }
        let translator = AddressTranslator::new(config.page_size, memory.size(), store.size())?;
        let handler =
            PageFaultHandler::new(&config, translator.num_pages(), translator.num_frames());
        info!(
            "Virtual memory: {} pages over {} frames of {} bytes ({} eviction, {} flush)",
            translator.num_pages(),
            translator.num_frames(),
            config.page_size,
            config.eviction_policy,
            config.flush_policy
        );
        Ok(Self {
            memory,
            store,
            config,
            translator,
            handler,
            clock: 0,
        })
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn resolve(&mut self, address: u32) -> Result<(PageNumber, u32)> {
        let virtual_address = self.translator.split(address)?;
        let now = self.tick();
        let frame = self.handler.ensure_resident(
            virtual_address.page,
            now,
            &mut self.memory,
            &mut self.store,
        )?;
        let physical = self.translator.compose(frame, virtual_address.offset)?;
        Ok((virtual_address.page, physical))
    }

    pub fn read_byte(&mut self, address: u32) -> Result<u8> {
        let (_, physical) = self.resolve(address)?;
        let value = self.memory.read_byte(physical)?;
        debug!(
            "RAM: @{} --> {}",
            format_bits(physical, self.translator.physical_address_bits()),
            value
        );
        Ok(value)
    }

    pub fn write_byte(&mut self, address: u32, value: u8) -> Result<()> {
        let (page, physical) = self.resolve(address)?;
        self.memory.write_byte(physical, value)?;
        if self.config.dirty_tracking {
            self.handler.mark_dirty(page);
        }
        debug!(
            "RAM: @{} <-- {}",
            format_bits(physical, self.translator.physical_address_bits()),
            value
        );
        Ok(())
    }

    /// Every byte of main memory. Does not touch paging state.
    pub fn dump_memory(&self) -> Result<MemoryDump> {
        let cells = (0..self.memory.size())
            .map(|address| {
                Ok(MemoryCell {
                    address,
                    value: self.memory.read_byte(address)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(MemoryDump {
            address_bits: self.translator.physical_address_bits(),
            cells,
        })
    }

    /// Every page of the backing store, resident or not. Does not touch
    /// paging state.
    pub fn dump_backing_store(&self) -> Result<StoreDump> {
        let pages = (0..self.translator.num_pages())
            .map(|page| {
                Ok(StorePage {
                    page,
                    bytes: self.store.read_page(page)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(StoreDump { pages })
    }

    /// Writes resident pages back to the store; residency is unchanged.
    pub fn flush_all(&mut self) -> Result<()> {
        self.handler
            .flush_all(self.config.dirty_tracking, &self.memory, &mut self.store)
    }

    pub fn page_fault_count(&self) -> u64 {
        self.handler.stats().page_faults
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.handler.stats().bytes_transferred
    }

    pub fn statistics(&self) -> Statistics {
        self.handler.stats()
    }

    pub fn events(&self) -> &[VmEvent] {
        self.handler.events()
    }

    pub fn take_events(&mut self) -> Vec<VmEvent> {
        self.handler.take_events()
    }

    /// (page, frame) for every resident page, ascending by page.
    pub fn resident_pages(&self) -> Vec<(PageNumber, FrameNumber)> {
        self.handler
            .page_table()
            .iter()
            .map(|(page, entry)| (page, entry.get_frame_number()))
            .collect()
    }

    pub fn frame_of(&self, page: PageNumber) -> Option<FrameNumber> {
        self.handler.page_table().get_frame(page)
    }

    pub fn is_dirty(&self, page: PageNumber) -> Option<bool> {
        self.handler.page_table().is_dirty(page)
    }

    pub fn page_fault_handler(&self) -> &PageFaultHandler {
        &self.handler
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    pub fn translator(&self) -> &AddressTranslator {
        &self.translator
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn store(&self) -> &D {
        &self.store
    }

    pub fn into_parts(self) -> (M, D) {
        (self.memory, self.store)
    }
}
