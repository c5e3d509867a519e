//! Ring configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of partitions.
pub const DEFAULT_PARTITION_COUNT: u32 = 271;

/// Default number of virtual nodes per member.
pub const DEFAULT_REPLICATION_FACTOR: u32 = 20;

/// Default load factor.
pub const DEFAULT_LOAD_FACTOR: f64 = 1.25;

/// The three knobs of a bounded-load ring. Fixed for the lifetime of a ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Total number of partitions.
    pub partition_count: u32,
    /// Virtual nodes placed on the ring per member.
    pub replication_factor: u32,
    /// Multiplier over the perfectly even share that caps a member's load.
    pub load_factor: f64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            partition_count: DEFAULT_PARTITION_COUNT,
            replication_factor: DEFAULT_REPLICATION_FACTOR,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl RingConfig {
    /// Set the partition count.
    pub fn with_partition_count(mut self, partition_count: u32) -> Self {
        self.partition_count = partition_count;
        self
    }

    /// Set the number of virtual nodes per member.
    pub fn with_replication_factor(mut self, replication_factor: u32) -> Self {
        self.replication_factor = replication_factor;
        self
    }

    /// Set the load factor.
    pub fn with_load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Check that the ring can be built from this configuration.
    ///
    /// A load factor below 1.0 is accepted: it leaves less total capacity
    /// than there are partitions, which distribution reports as
    /// [`PlacementError::CapacityExhausted`](crate::PlacementError::CapacityExhausted).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.partition_count == 0 {
            return Err(ConfigError::ZeroPartitions);
        }
        if self.replication_factor == 0 {
            return Err(ConfigError::ZeroReplicas);
        }
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(ConfigError::InvalidLoadFactor(self.load_factor));
        }
        Ok(())
    }
}
