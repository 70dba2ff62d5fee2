use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("capacity {0} is not a power of two")]
    InvalidCapacity(usize),
    #[error("address {address} is over capacity {capacity}")]
    OverCapacity { address: u64, capacity: usize },
}

/// Volatile byte-addressable main memory.
#[derive(Debug, Clone)]
pub struct PhysicalMemory {
    buffer: Vec<u8>,
}

impl PhysicalMemory {
    pub fn create(capacity: usize) -> Result<Self, MemoryError> {
        if !capacity.is_power_of_two() {
            return Err(MemoryError::InvalidCapacity(capacity));
        }
        Ok(Self {
            buffer: vec![0; capacity],
        })
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn check_address(&self, address: u64) -> Result<(), MemoryError> {
        if address >= self.buffer.len() as u64 {
            return Err(MemoryError::OverCapacity {
                address,
                capacity: self.buffer.len(),
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, address: u64) -> Result<u8, MemoryError> {
        self.check_address(address)?;
        Ok(self.buffer[address as usize])
    }

    pub fn write_u8(&mut self, address: u64, byte: u8) -> Result<(), MemoryError> {
        self.check_address(address)?;
        self.buffer[address as usize] = byte;
        Ok(())
    }

    /// Both ends of the range must be inside memory.
    pub fn read_buf_at(&self, address: u64, len: usize) -> Result<&[u8], MemoryError> {
        self.check_range(address, len)?;
        let start = address as usize;
        Ok(&self.buffer[start..start + len])
    }

    pub fn write_buf_at(&mut self, address: u64, buf: &[u8]) -> Result<(), MemoryError> {
        self.check_range(address, buf.len())?;
        let start = address as usize;
        self.buffer[start..start + buf.len()].copy_from_slice(buf);
        Ok(())
    }

    fn check_range(&self, address: u64, len: usize) -> Result<(), MemoryError> {
        self.check_address(address)?;
        if len > 0 {
            self.check_address(address + len as u64 - 1)?;
        }
        Ok(())
    }
}
