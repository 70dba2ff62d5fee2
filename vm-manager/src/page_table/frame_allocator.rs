use std::collections::VecDeque;

use crate::translation::{FrameNumber, PageNumber};

/// Free list of frames plus the reverse map frame -> occupant page.
#[derive(Debug, Clone)]
pub struct FrameAllocator {
    free: VecDeque<FrameNumber>,
    occupants: Vec<Option<PageNumber>>,
}

impl FrameAllocator {
    pub fn init(num_frames: u32) -> Self {
        Self {
            free: (0..num_frames).collect(),
            occupants: vec![None; num_frames as usize],
        }
    }

    pub fn num_frames(&self) -> u32 {
        self.occupants.len() as u32
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Hands out free frames lowest first.
    pub fn allocate_free(&mut self) -> Option<FrameNumber> {
        let frame = self.free.pop_front();
        if frame.is_none() {
            log::debug!("No free frames");
        }
        frame
    }

    pub fn occupy(&mut self, frame: FrameNumber, page: PageNumber) {
        if let Some(slot) = self.occupants.get_mut(frame as usize) {
            *slot = Some(page);
        }
    }

    /// Clears the occupant of a frame that is about to be reused directly.
    pub fn vacate(&mut self, frame: FrameNumber) -> Option<PageNumber> {
        self.occupants.get_mut(frame as usize)?.take()
    }

    pub fn occupant(&self, frame: FrameNumber) -> Option<PageNumber> {
        self.occupants.get(frame as usize).copied().flatten()
    }

    /// Returns a frame to the free pool.
    pub fn release(&mut self, frame: FrameNumber) {
        if frame >= self.num_frames() || self.free.contains(&frame) {
            return;
        }
        self.occupants[frame as usize] = None;
        self.free.push_back(frame);
    }
}
