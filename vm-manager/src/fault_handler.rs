use crate::config::{FlushPolicy, VmConfig};
use crate::error::{Result, VmError};
use crate::event::{EventLog, VmEvent};
use crate::eviction::EvictionPolicy;
use crate::page_table::{FrameAllocator, PageTable, Residency};
use crate::stats::Statistics;
use crate::storage::{BackingStore, MainMemory};
use crate::translation::{FrameNumber, PageNumber};

// Moving a page between memory and the store:
// - a load always costs one page of transfer
// - a write-back costs one page, and is skipped for clean victims under DirtyOnly

/// Owns the paging state and moves pages between memory and the store.
#[derive(Debug, Clone)]
pub struct PageFaultHandler {
    page_size: u32,
    flush_policy: FlushPolicy,
    page_table: PageTable,
    frames: FrameAllocator,
    policy: EvictionPolicy,
    stats: Statistics,
    events: EventLog,
}

impl PageFaultHandler {
    pub fn new(config: &VmConfig, num_pages: u32, num_frames: u32) -> Self {
        Self {
            page_size: config.page_size,
            flush_policy: config.flush_policy,
            page_table: PageTable::init(num_pages),
            frames: FrameAllocator::init(num_frames),
            policy: EvictionPolicy::new(config.eviction_policy),
            stats: Statistics::default(),
            events: EventLog::new(config.record_events),
        }
    }

    /// Makes `page` resident and returns its frame, loading it (and evicting
    /// a victim first if memory is full) on a fault.
    pub fn ensure_resident<M, D>(
        &mut self,
        page: PageNumber,
        now: u64,
        memory: &mut M,
        store: &mut D,
    ) -> Result<FrameNumber>
    where
        M: MainMemory + ?Sized,
        D: BackingStore + ?Sized,
    {
        if let Residency::Resident { frame, .. } = self.page_table.lookup(page) {
            self.policy.on_access(page, now);
            self.events.record(VmEvent::hit(page, frame));
            return Ok(frame);
        }

        self.stats.record_fault();
        self.events.record(VmEvent::fault(page));

        let frame = match self.frames.allocate_free() {
            Some(frame) => frame,
            None => self.evict(page, memory, store)?,
        };

        if let Err(err) = self.load(page, frame, memory, store) {
            self.frames.release(frame);
            return Err(err);
        }
        self.page_table.bind(page, frame);
        self.frames.occupy(frame, page);
        self.policy.on_load(page, frame, now);
        Ok(frame)
    }

    /// Frees the frame of the policy's victim and returns it.
    fn evict<M, D>(&mut self, faulting: PageNumber, memory: &M, store: &mut D) -> Result<FrameNumber>
    where
        M: MainMemory + ?Sized,
        D: BackingStore + ?Sized,
    {
        if !self.policy.evicts() {
            return Err(VmError::OutOfFrames { page: faulting });
        }
        let victim = self.policy.select_victim()?;
        let (frame, dirty) = match self.page_table.lookup(victim) {
            Residency::Resident { frame, dirty } => (frame, dirty),
            Residency::NotResident => return Err(VmError::NoVictimAvailable),
        };

        let write_back = dirty || self.flush_policy == FlushPolicy::Unconditional;
        if write_back {
            self.write_back(victim, frame, memory, store)?;
        }
        self.events
            .record(VmEvent::evict(victim, frame, dirty, write_back));

        self.page_table.unbind(victim);
        self.policy.on_evict(victim);
        self.frames.vacate(frame);
        Ok(frame)
    }

    fn load<M, D>(&mut self, page: PageNumber, frame: FrameNumber, memory: &mut M, store: &D) -> Result<()>
    where
        M: MainMemory + ?Sized,
        D: BackingStore + ?Sized,
    {
        let data = store.read_page(page)?;
        let base = frame * self.page_size;
        for (i, byte) in data.iter().take(self.page_size as usize).enumerate() {
            memory.write_byte(base + i as u32, *byte)?;
        }
        self.stats.record_transfer(self.page_size);
        self.events.record(VmEvent::load(page, frame));
        Ok(())
    }

    fn write_back<M, D>(&mut self, page: PageNumber, frame: FrameNumber, memory: &M, store: &mut D) -> Result<()>
    where
        M: MainMemory + ?Sized,
        D: BackingStore + ?Sized,
    {
        let base = frame * self.page_size;
        let data = (base..base + self.page_size)
            .map(|address| memory.read_byte(address))
            .collect::<Result<Vec<u8>>>()?;
        store.write_page(page, &data)?;
        self.stats.record_transfer(self.page_size);
        Ok(())
    }

    /// Writes resident pages back without evicting them. With `dirty_only`
    /// only modified pages are written, and their dirty flag is cleared.
    pub fn flush_all<M, D>(&mut self, dirty_only: bool, memory: &M, store: &mut D) -> Result<()>
    where
        M: MainMemory + ?Sized,
        D: BackingStore + ?Sized,
    {
        let pending: Vec<_> = self
            .page_table
            .iter()
            .filter(|(_, entry)| !dirty_only || entry.is_dirty())
            .collect();
        for (page, entry) in pending {
            let frame = entry.get_frame_number();
            self.write_back(page, frame, memory, store)?;
            self.page_table.clear_dirty(page);
            self.events
                .record(VmEvent::flush(page, frame, entry.is_dirty()));
        }
        Ok(())
    }

    pub fn mark_dirty(&mut self, page: PageNumber) {
        self.page_table.mark_dirty(page);
    }

    pub fn page_table(&self) -> &PageTable {
        &self.page_table
    }

    pub fn frames(&self) -> &FrameAllocator {
        &self.frames
    }

    pub fn policy(&self) -> &EvictionPolicy {
        &self.policy
    }

    pub fn stats(&self) -> Statistics {
        self.stats
    }

    pub fn events(&self) -> &[VmEvent] {
        self.events.events()
    }

    pub fn take_events(&mut self) -> Vec<VmEvent> {
        self.events.take()
    }
}

#[cfg(test)]
mod tests {
    use disk::Disk;
    use memory::PhysicalMemory;

    use super::*;
    use crate::config::EvictionPolicyKind;
    use crate::event::EventKind;

    fn setup(kind: EvictionPolicyKind, flush: FlushPolicy) -> (PageFaultHandler, PhysicalMemory, Disk) {
        let config = VmConfig::new(4)
            .with_eviction_policy(kind)
            .with_flush_policy(flush);
        let disk = Disk::in_memory(4, 16).unwrap();
        for page in 0..4u8 {
            disk.write_block(page as usize, &[page * 10; 4]).unwrap();
        }
        (PageFaultHandler::new(&config, 4, 2), PhysicalMemory::create(8).unwrap(), disk)
    }

    #[test]
    fn fault_loads_into_free_frame() {
        let (mut handler, mut memory, mut disk) = setup(EvictionPolicyKind::Fifo, FlushPolicy::Unconditional);
        let frame = handler.ensure_resident(2, 1, &mut memory, &mut disk).unwrap();
        assert_eq!(frame, 0);
        assert_eq!(memory.read_buf_at(0, 4).unwrap(), &[20; 4]);
        assert_eq!(handler.stats().page_faults, 1);
        assert_eq!(handler.stats().bytes_transferred, 4);
        assert_eq!(handler.frames().occupant(0), Some(2));

        let kinds: Vec<_> = handler.events().iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![EventKind::Fault, EventKind::Load]);
    }

    #[test]
    fn hit_does_not_fault() {
        let (mut handler, mut memory, mut disk) = setup(EvictionPolicyKind::Lru, FlushPolicy::DirtyOnly);
        handler.ensure_resident(1, 1, &mut memory, &mut disk).unwrap();
        let frame = handler.ensure_resident(1, 2, &mut memory, &mut disk).unwrap();
        assert_eq!(frame, 0);
        assert_eq!(handler.stats().page_faults, 1);
        assert_eq!(handler.events().last(), Some(&VmEvent::hit(1, 0)));
    }

    #[test]
    fn clean_victim_skips_write_back() {
        let (mut handler, mut memory, mut disk) = setup(EvictionPolicyKind::Fifo, FlushPolicy::DirtyOnly);
        handler.ensure_resident(0, 1, &mut memory, &mut disk).unwrap();
        handler.ensure_resident(1, 2, &mut memory, &mut disk).unwrap();
        handler.ensure_resident(2, 3, &mut memory, &mut disk).unwrap();
        assert_eq!(handler.stats().bytes_transferred, 12);
        assert!(handler
            .events()
            .contains(&VmEvent::evict(0, 0, false, false)));
        assert_eq!(handler.page_table().lookup(0), Residency::NotResident);
        assert_eq!(handler.page_table().get_frame(2), Some(0));
    }

    #[test]
    fn dirty_victim_is_written_back() {
        let (mut handler, mut memory, mut disk) = setup(EvictionPolicyKind::Fifo, FlushPolicy::DirtyOnly);
        handler.ensure_resident(0, 1, &mut memory, &mut disk).unwrap();
        memory.write_u8(1, 99).unwrap();
        handler.mark_dirty(0);
        handler.ensure_resident(1, 2, &mut memory, &mut disk).unwrap();
        handler.ensure_resident(2, 3, &mut memory, &mut disk).unwrap();
        assert_eq!(handler.stats().bytes_transferred, 16);
        assert_eq!(disk.read_block(0).unwrap().as_ref(), &[0, 99, 0, 0]);
    }

    #[test]
    fn none_policy_runs_out_of_frames() {
        let (mut handler, mut memory, mut disk) = setup(EvictionPolicyKind::None, FlushPolicy::Unconditional);
        handler.ensure_resident(0, 1, &mut memory, &mut disk).unwrap();
        handler.ensure_resident(1, 2, &mut memory, &mut disk).unwrap();
        assert!(matches!(
            handler.ensure_resident(2, 3, &mut memory, &mut disk),
            Err(VmError::OutOfFrames { page: 2 })
        ));
        assert_eq!(handler.page_table().resident_count(), 2);
    }

    #[test]
    fn failed_load_returns_frame() {
        let (mut handler, mut memory, mut disk) = setup(EvictionPolicyKind::Fifo, FlushPolicy::Unconditional);
        assert!(handler.ensure_resident(9, 1, &mut memory, &mut disk).is_err());
        assert_eq!(handler.frames().free_count(), 2);
        assert_eq!(handler.page_table().resident_count(), 0);
    }

    #[test]
    fn flush_all_dirty_only() {
        let (mut handler, mut memory, mut disk) = setup(EvictionPolicyKind::Lru, FlushPolicy::DirtyOnly);
        handler.ensure_resident(0, 1, &mut memory, &mut disk).unwrap();
        handler.ensure_resident(3, 2, &mut memory, &mut disk).unwrap();
        memory.write_u8(4, 7).unwrap();
        handler.mark_dirty(3);

        handler.flush_all(true, &memory, &mut disk).unwrap();
        assert_eq!(handler.stats().bytes_transferred, 12);
        assert_eq!(disk.read_block(3).unwrap().as_ref(), &[7, 30, 30, 30]);
        assert_eq!(handler.page_table().is_dirty(3), Some(false));

        handler.flush_all(false, &memory, &mut disk).unwrap();
        assert_eq!(handler.stats().bytes_transferred, 20);
    }
}
