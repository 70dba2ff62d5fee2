use crate::error::{Result, VmError};

pub type PageNumber = u32;
pub type FrameNumber = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualAddress {
    pub page: PageNumber,
    pub offset: u32,
}

/// Splits virtual addresses into page/offset and composes physical addresses.
#[derive(Debug, Clone)]
pub struct AddressTranslator {
    page_size: u32,
    offset_bits: u32,
    num_pages: u32,
    num_frames: u32,
    memory_size: u32,
    store_size: u32,
}

fn bits_to_address(size: u32) -> u32 {
    if size <= 1 {
        0
    } else {
        u32::BITS - (size - 1).leading_zeros()
    }
}

impl AddressTranslator {
    pub fn new(page_size: u32, memory_size: u32, store_size: u32) -> Result<Self> {
        if !page_size.is_power_of_two() {
            return Err(VmError::InvalidConfiguration(format!(
                "page size {} is not a power of two",
                page_size
            )));
        }
        if !memory_size.is_power_of_two() || memory_size < page_size {
            return Err(VmError::InvalidConfiguration(format!(
                "main memory size {} must be a power of two holding at least one {}-byte frame",
                memory_size, page_size
            )));
        }
        if store_size == 0 || store_size % page_size != 0 {
            return Err(VmError::InvalidConfiguration(format!(
                "backing store size {} is not a non-zero multiple of page size {}",
                store_size, page_size
            )));
        }
        Ok(Self {
            page_size,
            offset_bits: page_size.trailing_zeros(),
            num_pages: store_size / page_size,
            num_frames: memory_size / page_size,
            memory_size,
            store_size,
        })
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    pub fn num_frames(&self) -> u32 {
        self.num_frames
    }

    /// Width of a physical address, used when printing memory.
    pub fn physical_address_bits(&self) -> u32 {
        self.memory_size.trailing_zeros()
    }

    /// Width needed to address every byte of the backing store.
    pub fn virtual_address_bits(&self) -> u32 {
        bits_to_address(self.store_size)
    }

    pub fn split(&self, address: u32) -> Result<VirtualAddress> {
        let page = address >> self.offset_bits;
        if page >= self.num_pages {
            return Err(VmError::AddressOutOfRange {
                address: address as u64,
                limit: self.store_size as u64,
            });
        }
        Ok(VirtualAddress {
            page,
            offset: address & (self.page_size - 1),
        })
    }

    pub fn compose(&self, frame: FrameNumber, offset: u32) -> Result<u32> {
        let address = frame as u64 * self.page_size as u64 + offset as u64;
        if offset >= self.page_size || address >= self.memory_size as u64 {
            return Err(VmError::AddressOutOfRange {
                address,
                limit: self.memory_size as u64,
            });
        }
        Ok(address as u32)
    }

    /// First physical address of a frame.
    pub fn frame_base(&self, frame: FrameNumber) -> Result<u32> {
        self.compose(frame, 0)
    }
}

/// Zero-padded binary rendering of an address.
pub fn format_bits(value: u32, width: u32) -> String {
    format!("{:0width$b}", value, width = width as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_address() {
        let translator = AddressTranslator::new(4, 8, 16).unwrap();
        assert_eq!(translator.offset_bits(), 2);
        assert_eq!(translator.num_pages(), 4);
        assert_eq!(translator.num_frames(), 2);
        assert_eq!(
            translator.split(0b1011).unwrap(),
            VirtualAddress { page: 2, offset: 3 }
        );
        assert_eq!(translator.split(0).unwrap(), VirtualAddress { page: 0, offset: 0 });
    }

    #[test]
    fn split_out_of_range() {
        let translator = AddressTranslator::new(4, 8, 16).unwrap();
        assert!(translator.split(15).is_ok());
        assert!(matches!(
            translator.split(16),
            Err(VmError::AddressOutOfRange { address: 16, limit: 16 })
        ));
        assert!(translator.split(u32::MAX).is_err());
    }

    #[test]
    fn compose_address() {
        let translator = AddressTranslator::new(4, 8, 16).unwrap();
        assert_eq!(translator.compose(1, 2).unwrap(), 6);
        assert_eq!(translator.frame_base(1).unwrap(), 4);
        assert!(matches!(
            translator.compose(2, 0),
            Err(VmError::AddressOutOfRange { address: 8, limit: 8 })
        ));
        assert!(translator.compose(0, 4).is_err());
    }

    #[test]
    fn store_need_not_be_power_of_two() {
        let translator = AddressTranslator::new(4, 8, 12).unwrap();
        assert_eq!(translator.num_pages(), 3);
        assert_eq!(translator.virtual_address_bits(), 4);
        assert!(translator.split(12).is_err());
    }

    #[test]
    fn invalid_geometry() {
        assert!(matches!(
            AddressTranslator::new(3, 8, 16),
            Err(VmError::InvalidConfiguration(_))
        ));
        assert!(AddressTranslator::new(4, 12, 16).is_err());
        assert!(AddressTranslator::new(16, 8, 16).is_err());
        assert!(AddressTranslator::new(4, 8, 18).is_err());
        assert!(AddressTranslator::new(4, 8, 0).is_err());
    }

    #[test]
    fn address_bits() {
        let translator = AddressTranslator::new(4, 8, 16).unwrap();
        assert_eq!(translator.physical_address_bits(), 3);
        assert_eq!(translator.virtual_address_bits(), 4);
        assert_eq!(format_bits(5, 3), "101");
        assert_eq!(format_bits(1, 4), "0001");
    }
}
