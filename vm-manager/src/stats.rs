use std::fmt;

/// Counters owned by one manager; they only ever grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Statistics {
    pub page_faults: u64,
    pub bytes_transferred: u64,
}

impl Statistics {
    pub(crate) fn record_fault(&mut self) {
        self.page_faults += 1;
    }

    pub(crate) fn record_transfer(&mut self, bytes: u32) {
        self.bytes_transferred += bytes as u64;
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page faults: {}, bytes transferred: {}",
            self.page_faults, self.bytes_transferred
        )
    }
}
