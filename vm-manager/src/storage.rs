use disk::Disk;
use memory::PhysicalMemory;

use crate::error::Result;

/// Byte-addressable main memory as seen by the pager.
pub trait MainMemory {
    fn size(&self) -> u32;
    fn read_byte(&self, address: u32) -> Result<u8>;
    fn write_byte(&mut self, address: u32, value: u8) -> Result<()>;
}

/// Page-granular backing store as seen by the pager.
pub trait BackingStore {
    fn size(&self) -> u32;
    fn page_size(&self) -> u32;
    fn read_page(&self, page_number: u32) -> Result<Vec<u8>>;
    fn write_page(&mut self, page_number: u32, data: &[u8]) -> Result<()>;
}

impl MainMemory for PhysicalMemory {
    fn size(&self) -> u32 {
        self.capacity() as u32
    }

    fn read_byte(&self, address: u32) -> Result<u8> {
        Ok(self.read_u8(address as u64)?)
    }

    fn write_byte(&mut self, address: u32, value: u8) -> Result<()> {
        Ok(self.write_u8(address as u64, value)?)
    }
}

impl BackingStore for Disk {
    fn size(&self) -> u32 {
        self.capacity() as u32
    }

    fn page_size(&self) -> u32 {
        self.block_size() as u32
    }

    fn read_page(&self, page_number: u32) -> Result<Vec<u8>> {
        Ok(self.read_block(page_number as usize)?.into_vec())
    }

    fn write_page(&mut self, page_number: u32, data: &[u8]) -> Result<()> {
        Ok(self.write_block(page_number as usize, data)?)
    }
}
