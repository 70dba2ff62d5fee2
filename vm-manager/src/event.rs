use std::fmt;

use log::{debug, info};

use crate::translation::{FrameNumber, PageNumber};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The page was already resident.
    Hit,
    /// The page was not resident; a load follows.
    Fault,
    /// A page was copied from the backing store into a frame.
    Load,
    /// A victim was written back and removed from memory.
    Evict,
    /// A clean victim was dropped without being written back.
    EvictClean,
    /// A resident page was written back by `flush_all`.
    Flush,
}

/// One observable step of the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmEvent {
    pub kind: EventKind,
    pub page: PageNumber,
    pub frame: Option<FrameNumber>,
    pub was_dirty: Option<bool>,
}

impl VmEvent {
    pub fn hit(page: PageNumber, frame: FrameNumber) -> Self {
        Self {
            kind: EventKind::Hit,
            page,
            frame: Some(frame),
            was_dirty: None,
        }
    }

    pub fn fault(page: PageNumber) -> Self {
        Self {
            kind: EventKind::Fault,
            page,
            frame: None,
            was_dirty: None,
        }
    }

    pub fn load(page: PageNumber, frame: FrameNumber) -> Self {
        Self {
            kind: EventKind::Load,
            page,
            frame: Some(frame),
            was_dirty: None,
        }
    }

    pub fn evict(page: PageNumber, frame: FrameNumber, was_dirty: bool, written_back: bool) -> Self {
        Self {
            kind: if written_back {
                EventKind::Evict
            } else {
                EventKind::EvictClean
            },
            page,
            frame: Some(frame),
            was_dirty: Some(was_dirty),
        }
    }

    pub fn flush(page: PageNumber, frame: FrameNumber, was_dirty: bool) -> Self {
        Self {
            kind: EventKind::Flush,
            page,
            frame: Some(frame),
            was_dirty: Some(was_dirty),
        }
    }
}

impl fmt::Display for VmEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.frame.unwrap_or_default();
        match self.kind {
            EventKind::Hit => write!(f, "Page {} is in memory", self.page),
            EventKind::Fault => write!(f, "Page fault on page {}", self.page),
            EventKind::Load => write!(f, "Bringing page {} into frame {}", self.page, frame),
            EventKind::Evict => write!(f, "Evicting page {} from frame {}", self.page, frame),
            EventKind::EvictClean => write!(
                f,
                "Evicting page {} from frame {} (NOT DIRTY)",
                self.page, frame
            ),
            EventKind::Flush => write!(f, "Writing back page {} from frame {}", self.page, frame),
        }
    }
}

/// Logs every event and optionally keeps it for later inspection.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    enabled: bool,
    events: Vec<VmEvent>,
}

impl EventLog {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            events: Vec::new(),
        }
    }

    pub fn record(&mut self, event: VmEvent) {
        match event.kind {
            EventKind::Hit => debug!("{}", event),
            _ => info!("{}", event),
        }
        if self.enabled {
            self.events.push(event);
        }
    }

    pub fn events(&self) -> &[VmEvent] {
        &self.events
    }

    pub fn take(&mut self) -> Vec<VmEvent> {
        std::mem::take(&mut self.events)
    }
}
