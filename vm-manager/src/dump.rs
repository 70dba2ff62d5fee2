use std::fmt;

use crate::translation::{format_bits, PageNumber};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryCell {
    pub address: u32,
    pub value: u8,
}

/// Snapshot of main memory, rendered one `<binary address>: <value>` per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDump {
    pub address_bits: u32,
    pub cells: Vec<MemoryCell>,
}

impl MemoryDump {
    pub fn iter(&self) -> impl Iterator<Item = (u32, u8)> + '_ {
        self.cells.iter().map(|cell| (cell.address, cell.value))
    }
}

impl fmt::Display for MemoryDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cell in &self.cells {
            writeln!(f, "{}: {}", format_bits(cell.address, self.address_bits), cell.value)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePage {
    pub page: PageNumber,
    pub bytes: Vec<u8>,
}

impl fmt::Display for StorePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PAGE {}: ", self.page)?;
        for (i, byte) in self.bytes.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", byte)?;
        }
        Ok(())
    }
}

/// Snapshot of the backing store, page by page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDump {
    pub pages: Vec<StorePage>,
}

impl StoreDump {
    pub fn iter(&self) -> impl Iterator<Item = (PageNumber, &[u8])> + '_ {
        self.pages.iter().map(|page| (page.page, page.bytes.as_slice()))
    }
}

impl fmt::Display for StoreDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for page in &self.pages {
            writeln!(f, "{}", page)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_dump_format() {
        let dump = MemoryDump {
            address_bits: 3,
            cells: vec![
                MemoryCell { address: 0, value: 65 },
                MemoryCell { address: 5, value: 0 },
            ],
        };
        assert_eq!(dump.to_string(), "000: 65\n101: 0\n");
    }

    #[test]
    fn store_dump_format() {
        let dump = StoreDump {
            pages: vec![
                StorePage { page: 0, bytes: vec![1, 2, 3] },
                StorePage { page: 1, bytes: vec![0, 0, 0] },
            ],
        };
        assert_eq!(dump.to_string(), "PAGE 0: 1,2,3\nPAGE 1: 0,0,0\n");
        assert_eq!(dump.iter().nth(1), Some((1, &[0u8, 0, 0][..])));
    }
}
