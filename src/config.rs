use std::{fs::File, path::Path};

use serde::{Deserialize, Serialize};
use vm_manager::VmConfig;

use crate::SimulatorError;

/// Sizes of the simulated machine plus the pager settings.
///
/// Loaded from JSON; every field is optional:
///
/// ```json
/// { "memory_size": 32, "store_size": 128, "page_size": 8,
///   "eviction_policy": "fifo", "flush_policy": "unconditional",
///   "dirty_tracking": true, "disk_image": "swap" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Bytes of main memory; a power of two.
    pub memory_size: usize,
    /// Bytes of backing store; a multiple of the page size.
    pub store_size: usize,
    /// When set, the backing store lives in this disk image file.
    pub disk_image: Option<String>,
    #[serde(flatten)]
    pub vm: VmConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            memory_size: 32,
            store_size: 128,
            disk_image: None,
            vm: VmConfig::default(),
        }
    }
}

impl SimulatorConfig {
    pub fn from_json(json: &str) -> Result<Self, SimulatorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SimulatorError> {
        let file = File::open(path.as_ref())?;
        let config = serde_json::from_reader(file)?;
        log::debug!("Loaded config from {:?}: {:?}", path.as_ref(), config);
        Ok(config)
    }
}
