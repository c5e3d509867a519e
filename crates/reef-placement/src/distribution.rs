//! Bounded-load partition assignment.
//!
//! Every partition hashes to a ring position. Its owner is the first member
//! found walking clockwise from there whose load is still under the cap
//! computed by [`average_load`]. The walk visits each occupied position at
//! most once; if every member it meets is full, distribution fails.

use std::collections::HashMap;

use crate::config::RingConfig;
use crate::error::PlacementError;
use crate::hasher::{RingHasher, partition_position};
use crate::index::RingIndex;
use crate::member::MemberId;

/// A partition that changes owner between two tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// The partition that must move.
    pub partition_id: u32,
    /// The member that owns it in the old table.
    pub from: MemberId,
    /// The member that owns it in the new table.
    pub to: MemberId,
}

/// Result of one distribution pass: partition owners and per-member loads.
///
/// Either empty (no members) or fully populated for every partition id.
/// The load of each member equals the number of partitions it owns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionTable {
    /// Owner of partition `i` at index `i`.
    owners: Vec<MemberId>,
    /// Partitions owned per member. Members without partitions are absent.
    loads: HashMap<MemberId, u32>,
}

impl PartitionTable {
    /// Owner of `partition_id`, if assigned.
    pub fn owner(&self, partition_id: u32) -> Option<&str> {
        self.owners.get(partition_id as usize).map(String::as_str)
    }

    /// Number of partitions owned by `member_id`.
    pub fn load(&self, member_id: &str) -> u32 {
        self.loads.get(member_id).copied().unwrap_or(0)
    }

    /// Per-member loads. Members owning nothing are absent.
    pub fn loads(&self) -> &HashMap<MemberId, u32> {
        &self.loads
    }

    /// Iterate `(partition_id, owner)` in partition order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.owners
            .iter()
            .enumerate()
            .map(|(i, id)| (i as u32, id.as_str()))
    }

    /// Number of assigned partitions.
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    /// True when no partition is assigned (the ring had no members).
    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Partitions whose owner differs between `old` and `new`.
    ///
    /// Partitions assigned in only one of the two tables are skipped: there
    /// is no source or no destination to migrate between.
    pub fn diff(old: &PartitionTable, new: &PartitionTable) -> Vec<Migration> {
        old.owners
            .iter()
            .zip(new.owners.iter())
            .enumerate()
            .filter(|(_, (from, to))| from != to)
            .map(|(i, (from, to))| Migration {
                partition_id: i as u32,
                from: from.clone(),
                to: to.clone(),
            })
            .collect()
    }
}

/// Per-member partition cap: `ceil(partition_count / member_count * load_factor)`.
///
/// Zero when there are no members.
pub fn average_load(config: &RingConfig, member_count: usize) -> f64 {
    if member_count == 0 {
        return 0.0;
    }
    let even_share = f64::from(config.partition_count) / member_count as f64;
    (even_share * config.load_factor).ceil()
}

/// Assign every partition to a member under the load cap.
///
/// Builds a fresh table; nothing is written on failure. `members` is the
/// registry every ring position must resolve into.
pub(crate) fn distribute<H, V>(
    config: &RingConfig,
    hasher: &H,
    index: &RingIndex,
    members: &HashMap<MemberId, V>,
) -> Result<PartitionTable, PlacementError>
where
    H: RingHasher + ?Sized,
{
    if members.is_empty() {
        return Ok(PartitionTable::default());
    }

    let cap = average_load(config, members.len());
    let mut table = PartitionTable {
        owners: Vec::with_capacity(config.partition_count as usize),
        loads: HashMap::with_capacity(members.len()),
    };

    for partition_id in 0..config.partition_count {
        let exhausted = PlacementError::CapacityExhausted {
            partition_id,
            attempts: index.len(),
            average_load: cap,
        };
        let start = index
            .successor(partition_position(hasher, partition_id))
            .ok_or_else(|| exhausted.clone())?;

        let mut owner = None;
        for (_, member_id) in index.walk(start) {
            if !members.contains_key(member_id) {
                return Err(PlacementError::MemberMissing {
                    member_id: member_id.clone(),
                });
            }
            let load = table.load(member_id);
            if f64::from(load) < cap {
                table.loads.insert(member_id.clone(), load + 1);
                owner = Some(member_id.clone());
                break;
            }
        }

        table.owners.push(owner.ok_or(exhausted)?);
    }

    Ok(table)
}
