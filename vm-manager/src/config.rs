use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::VmError;

/// Victim selection strategy used when no frame is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicyKind {
    /// Pages are only ever placed in free frames.
    None,
    Fifo,
    #[default]
    Lru,
}

/// What happens to a victim's bytes when it leaves memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlushPolicy {
    /// Always write the victim back.
    Unconditional,
    /// Write the victim back only if it was modified since it was loaded.
    #[default]
    DirtyOnly,
}

impl FromStr for EvictionPolicyKind {
    type Err = VmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "direct" => Ok(Self::None),
            "fifo" => Ok(Self::Fifo),
            "lru" => Ok(Self::Lru),
            other => Err(VmError::InvalidConfiguration(format!(
                "unknown eviction policy {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for EvictionPolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Fifo => write!(f, "fifo"),
            Self::Lru => write!(f, "lru"),
        }
    }
}

impl FromStr for FlushPolicy {
    type Err = VmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "unconditional" | "always" => Ok(Self::Unconditional),
            "dirty_only" | "dirty" => Ok(Self::DirtyOnly),
            other => Err(VmError::InvalidConfiguration(format!(
                "unknown flush policy {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for FlushPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconditional => write!(f, "unconditional"),
            Self::DirtyOnly => write!(f, "dirty_only"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmConfig {
    pub page_size: u32,
    pub eviction_policy: EvictionPolicyKind,
    pub flush_policy: FlushPolicy,
    pub dirty_tracking: bool,
    pub record_events: bool,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            page_size: 8,
            eviction_policy: EvictionPolicyKind::default(),
            flush_policy: FlushPolicy::default(),
            dirty_tracking: true,
            record_events: true,
        }
    }
}

impl VmConfig {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            ..Self::default()
        }
    }

    pub fn with_eviction_policy(mut self, policy: EvictionPolicyKind) -> Self {
        self.eviction_policy = policy;
        self
    }

    pub fn with_flush_policy(mut self, policy: FlushPolicy) -> Self {
        self.flush_policy = policy;
        self
    }

    pub fn with_dirty_tracking(mut self, enabled: bool) -> Self {
        self.dirty_tracking = enabled;
        self
    }

    pub fn with_record_events(mut self, enabled: bool) -> Self {
        self.record_events = enabled;
        self
    }

    /// Checks the settings that do not depend on memory or store sizes.
    pub fn validate(&self) -> Result<(), VmError> {
        if !self.page_size.is_power_of_two() {
            return Err(VmError::InvalidConfiguration(format!(
                "page size {} is not a power of two",
                self.page_size
            )));
        }
        if self.flush_policy == FlushPolicy::DirtyOnly && !self.dirty_tracking {
            return Err(VmError::InvalidConfiguration(
                "dirty_only flushing requires dirty tracking".to_string(),
            ));
        }
        Ok(())
    }
}
