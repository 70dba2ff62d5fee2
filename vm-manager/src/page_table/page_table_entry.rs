use crate::translation::FrameNumber;

/// Maps one resident page to the frame holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTableEntry {
    frame_number: FrameNumber,
    dirty: bool,
}

impl PageTableEntry {
    pub(super) fn new(frame_number: FrameNumber) -> Self {
        PageTableEntry {
            frame_number,
            dirty: false,
        }
    }

    pub fn get_frame_number(&self) -> FrameNumber {
        self.frame_number
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(super) fn set_dirty(&mut self, dirty: bool) {
        self.dirty = dirty;
    }
}
