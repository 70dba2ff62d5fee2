mod frame_allocator;
mod iter;
mod page_table_entry;

pub use frame_allocator::FrameAllocator;
pub use iter::ResidentPages;
pub use page_table_entry::PageTableEntry;

use crate::translation::{FrameNumber, PageNumber};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Residency {
    Resident { frame: FrameNumber, dirty: bool },
    NotResident,
}

/// One slot per page of the backing store; `Some` iff the page is resident.
#[derive(Debug, Clone)]
pub struct PageTable {
    entries: Vec<Option<PageTableEntry>>,
}

impl PageTable {
    pub fn init(num_pages: u32) -> Self {
        Self {
            entries: vec![None; num_pages as usize],
        }
    }

    pub fn num_pages(&self) -> u32 {
        self.entries.len() as u32
    }

    fn get_entry(&self, page_number: PageNumber) -> Option<PageTableEntry> {
        *self.entries.get(page_number as usize)?
    }

    pub fn lookup(&self, page_number: PageNumber) -> Residency {
        match self.get_entry(page_number) {
            Some(entry) => Residency::Resident {
                frame: entry.get_frame_number(),
                dirty: entry.is_dirty(),
            },
            None => Residency::NotResident,
        }
    }

    pub fn get_frame(&self, page_number: PageNumber) -> Option<FrameNumber> {
        Some(self.get_entry(page_number)?.get_frame_number())
    }

    pub fn is_dirty(&self, page_number: PageNumber) -> Option<bool> {
        Some(self.get_entry(page_number)?.is_dirty())
    }

    /// No-op for pages that are not resident.
    pub fn mark_dirty(&mut self, page_number: PageNumber) {
        self.set_dirty(page_number, true);
    }

    pub fn clear_dirty(&mut self, page_number: PageNumber) {
        self.set_dirty(page_number, false);
    }

    fn set_dirty(&mut self, page_number: PageNumber, dirty: bool) {
        if let Some(Some(entry)) = self.entries.get_mut(page_number as usize) {
            entry.set_dirty(dirty);
        }
    }

    /// Makes the page resident and clean in `frame_number`.
    pub fn bind(&mut self, page_number: PageNumber, frame_number: FrameNumber) {
        if let Some(slot) = self.entries.get_mut(page_number as usize) {
            *slot = Some(PageTableEntry::new(frame_number));
        }
    }

    /// The caller flushes the page first if its contents must survive.
    pub fn unbind(&mut self, page_number: PageNumber) -> Option<PageTableEntry> {
        self.entries.get_mut(page_number as usize)?.take()
    }

    pub fn iter(&self) -> ResidentPages<'_> {
        ResidentPages::new(&self.entries)
    }

    pub fn resident_count(&self) -> usize {
        self.iter().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_mapping() {
        let mut table = PageTable::init(64);
        table.bind(12, 43);
        table.bind(4, 45);
        assert_eq!(table.get_frame(12), Some(43));
        assert_eq!(table.get_frame(4), Some(45));

        table.bind(12, 49);
        assert_eq!(table.get_frame(12), Some(49));
    }

    #[test]
    fn lookup_residency() {
        let mut table = PageTable::init(8);
        assert_eq!(table.lookup(1), Residency::NotResident);
        table.bind(1, 3);
        assert_eq!(
            table.lookup(1),
            Residency::Resident {
                frame: 3,
                dirty: false
            }
        );
        assert_eq!(table.lookup(100), Residency::NotResident);
    }

    #[test]
    fn dirty_flag() {
        let mut table = PageTable::init(8);
        table.bind(2, 0);
        assert_eq!(table.is_dirty(2), Some(false));
        table.mark_dirty(2);
        assert_eq!(table.is_dirty(2), Some(true));
        table.clear_dirty(2);
        assert_eq!(table.is_dirty(2), Some(false));

        table.mark_dirty(2);
        table.bind(2, 1);
        assert_eq!(table.is_dirty(2), Some(false), "bind starts clean");

        table.mark_dirty(5);
        assert_eq!(table.is_dirty(5), None);
    }

    #[test]
    fn unbind_page() {
        let mut table = PageTable::init(8);
        table.bind(6, 1);
        table.mark_dirty(6);
        let entry = table.unbind(6).unwrap();
        assert_eq!(entry.get_frame_number(), 1);
        assert!(entry.is_dirty());
        assert_eq!(table.lookup(6), Residency::NotResident);
        assert!(table.unbind(6).is_none());
    }

    #[test]
    fn iterate_resident_pages() {
        let mut table = PageTable::init(8);
        table.bind(5, 0);
        table.bind(1, 1);
        let pages: Vec<_> = table
            .iter()
            .map(|(page, entry)| (page, entry.get_frame_number()))
            .collect();
        assert_eq!(pages, vec![(1, 1), (5, 0)]);
        assert_eq!(table.resident_count(), 2);
    }
}
