//! Bounded-load consistent hashing for partition ownership.
//!
//! This crate maps an unbounded key space onto a fixed number of partitions,
//! and those partitions onto a small set of members. It provides:
//!
//! - [`Consistent`] — the thread-safe ring: membership changes, key lookups,
//!   load accounting.
//! - [`RingConfig`] — partition count, virtual nodes per member, load factor.
//! - [`RingHasher`] — the pluggable 32-bit hash, with [`Blake3Hasher`] and
//!   [`Xxh3Hasher`] built in.
//! - [`PartitionTable`] — an owned snapshot of partition ownership, and
//!   [`PartitionTable::diff`] to list the [`Migration`]s between two of them.
//!
//! Each member gets `replication_factor` virtual nodes at
//! `hash(member_id ++ replica_index)`. Partition `p` starts at
//! `hash(decimal(p))` and is assigned to the first member clockwise whose
//! load is below `ceil(partition_count / member_count * load_factor)`. The
//! cap bounds how unevenly partitions can spread; the ring keeps the
//! consistent-hashing property that a membership change only moves a
//! fraction of partitions.

mod config;
mod consistent;
mod distribution;
mod error;
mod hasher;
mod index;
mod member;

pub use config::{
    DEFAULT_LOAD_FACTOR, DEFAULT_PARTITION_COUNT, DEFAULT_REPLICATION_FACTOR, RingConfig,
};
pub use consistent::Consistent;
pub use distribution::{Migration, PartitionTable, average_load};
pub use error::{ConfigError, PlacementError};
pub use hasher::{Blake3Hasher, RingHasher, Xxh3Hasher};
pub use member::{Member, MemberId};
