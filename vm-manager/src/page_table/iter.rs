use std::iter::Enumerate;
use std::slice::Iter;

use super::PageTableEntry;
use crate::translation::PageNumber;

/// Resident pages in ascending page order.
pub struct ResidentPages<'a> {
    entries: Enumerate<Iter<'a, Option<PageTableEntry>>>,
}

impl<'a> ResidentPages<'a> {
    pub(super) fn new(entries: &'a [Option<PageTableEntry>]) -> Self {
        Self {
            entries: entries.iter().enumerate(),
        }
    }
}

impl Iterator for ResidentPages<'_> {
    type Item = (PageNumber, PageTableEntry);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries
            .by_ref()
            .find_map(|(page, entry)| entry.as_ref().map(|entry| (page as PageNumber, *entry)))
    }
}
