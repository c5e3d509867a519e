//! Error types for the placement crate.

/// Errors produced by ring configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// `partition_count` was zero.
    #[error("partition count must be at least 1")]
    ZeroPartitions,

    /// `replication_factor` was zero.
    #[error("replication factor must be at least 1")]
    ZeroReplicas,

    /// `load_factor` was zero, negative, or not finite.
    #[error("load factor must be a positive finite number, got {0}")]
    InvalidLoadFactor(f64),
}

/// Errors produced by the bounded-load ring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlacementError {
    /// No member owns the partition. The ring has no members.
    #[error("no owner found for partition {partition_id}")]
    NoOwnerFound {
        /// Partition that was looked up.
        partition_id: u32,
    },

    /// The partition id is outside `[0, partition_count)`.
    #[error("partition {partition_id} out of range (partition count {partition_count})")]
    InvalidPartition {
        /// Partition that was looked up.
        partition_id: u32,
        /// Configured partition count.
        partition_count: u32,
    },

    /// Every ring position was visited without finding a member under the cap.
    ///
    /// Raise the load factor, raise the partition count, or add members.
    #[error(
        "not enough room to distribute partition {partition_id}: \
         visited {attempts} positions, every member at load cap {average_load}"
    )]
    CapacityExhausted {
        /// Partition that could not be placed.
        partition_id: u32,
        /// Ring positions visited before giving up.
        attempts: usize,
        /// Per-member load cap in effect.
        average_load: f64,
    },

    /// The ring or partition table names a member that is not registered.
    ///
    /// Indicates the ring and the member table diverged; not a usage error.
    #[error("member {member_id} is referenced by the ring but not registered")]
    MemberMissing {
        /// The unregistered member id.
        member_id: String,
    },

    /// The ring configuration is invalid.
    #[error("invalid ring config: {0}")]
    Config(#[from] ConfigError),
}
