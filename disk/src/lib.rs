use std::{
    fs::File,
    io::{Read, Seek, SeekFrom, Write},
    mem::size_of,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiskError {
    #[error("block of {actual} bytes written to a disk with {expected}-byte blocks")]
    IncorrectBlockSize { expected: usize, actual: usize },
    #[error("block {0} is over capacity")]
    OverCapacity(usize),
    #[error("capacity {capacity} is not a non-zero multiple of block size {block_size}")]
    InvalidGeometry { block_size: usize, capacity: usize },
    #[error("disk image header {found:?} does not match expected {expected:?}")]
    HeaderMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },
    #[error("disk image I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

const HEADER_SIZE: usize = size_of::<u32>() * 2;

#[derive(Debug)]
enum Storage {
    Memory(Vec<u8>),
    File(File),
}

/// Block device used as the backing store. Clones share the same storage.
#[derive(Debug, Clone)]
pub struct Disk {
    block_size: usize,
    capacity: usize,
    storage: Arc<Mutex<Storage>>,
}

pub fn make_name(name: &str) -> String {
    let name = name.replace("-", "_");
    let mut disk_name = String::from("DISK_IMAGE_");
    disk_name.push_str(&name);
    disk_name
}

fn write_header(file: &mut File, block_size: u32, capacity: u32) -> Result<(), std::io::Error> {
    file.seek(SeekFrom::Start(0))?;
    file.write_all(&block_size.to_be_bytes())?;
    file.write_all(&capacity.to_be_bytes())?;
    Ok(())
}

fn read_header(file: &mut File) -> Result<(u32, u32), std::io::Error> {
    let mut block_size = [0; size_of::<u32>()];
    let mut capacity = [0; size_of::<u32>()];
    file.seek(SeekFrom::Start(0))?;
    file.read_exact(&mut block_size)?;
    file.read_exact(&mut capacity)?;
    Ok((u32::from_be_bytes(block_size), u32::from_be_bytes(capacity)))
}

fn check_geometry(block_size: usize, capacity: usize) -> Result<(), DiskError> {
    if block_size == 0 || capacity == 0 || capacity % block_size != 0 {
        return Err(DiskError::InvalidGeometry {
            block_size,
            capacity,
        });
    }
    Ok(())
}

impl Disk {
    /// Disk kept entirely in memory, zero filled.
    pub fn in_memory(block_size: usize, capacity: usize) -> Result<Self, DiskError> {
        check_geometry(block_size, capacity)?;
        Ok(Self {
            block_size,
            capacity,
            storage: Arc::new(Mutex::new(Storage::Memory(vec![0; capacity]))),
        })
    }

    /// Creates (or truncates) a zero-filled disk image file.
    pub fn create(name: &str, block_size: usize, capacity: usize) -> Result<Self, DiskError> {
        check_geometry(block_size, capacity)?;
        let mut file = File::options()
            .truncate(true)
            .write(true)
            .read(true)
            .create(true)
            .open(make_name(name))?;
        file.set_len((HEADER_SIZE + capacity) as u64)?;
        write_header(&mut file, block_size as u32, capacity as u32)?;
        info!("Created disk image {} ({} x {} bytes)", make_name(name), capacity / block_size, block_size);
        Ok(Self {
            block_size,
            capacity,
            storage: Arc::new(Mutex::new(Storage::File(file))),
        })
    }

    /// Opens an existing disk image, checking that its header matches.
    pub fn connect(name: &str, block_size: usize, capacity: usize) -> Result<Self, DiskError> {
        check_geometry(block_size, capacity)?;
        let mut file = File::options()
            .write(true)
            .read(true)
            .open(make_name(name))?;
        let found = read_header(&mut file)?;
        let expected = (block_size as u32, capacity as u32);
        if found != expected {
            return Err(DiskError::HeaderMismatch { expected, found });
        }
        info!("Connected to disk image {}", make_name(name));
        Ok(Self {
            block_size,
            capacity,
            storage: Arc::new(Mutex::new(Storage::File(file))),
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn block_count(&self) -> usize {
        self.capacity / self.block_size
    }

    fn storage(&self) -> MutexGuard<'_, Storage> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn read_block(&self, block_number: usize) -> Result<Box<[u8]>, DiskError> {
        if block_number >= self.block_count() {
            return Err(DiskError::OverCapacity(block_number));
        }
        debug!("Start reading block[{}]", block_number);
        let start = block_number * self.block_size;
        let mut buf = vec![0; self.block_size].into_boxed_slice();
        match &mut *self.storage() {
            Storage::Memory(bytes) => buf.copy_from_slice(&bytes[start..start + self.block_size]),
            Storage::File(file) => {
                file.seek(SeekFrom::Start((HEADER_SIZE + start) as u64))?;
                file.read_exact(&mut buf)?;
            }
        }
        debug!("Done reading block[{}]", block_number);
        Ok(buf)
    }

    pub fn write_block(&self, block_number: usize, block: &[u8]) -> Result<(), DiskError> {
        if block.len() != self.block_size {
            return Err(DiskError::IncorrectBlockSize {
                expected: self.block_size,
                actual: block.len(),
            });
        } else if block_number >= self.block_count() {
            return Err(DiskError::OverCapacity(block_number));
        }
        debug!("Start writing block[{}]", block_number);
        let start = block_number * self.block_size;
        match &mut *self.storage() {
            Storage::Memory(bytes) => bytes[start..start + self.block_size].copy_from_slice(block),
            Storage::File(file) => {
                file.seek(SeekFrom::Start((HEADER_SIZE + start) as u64))?;
                file.write_all(block)?;
            }
        }
        debug!("Done writing block[{}]", block_number);
        Ok(())
    }
}
