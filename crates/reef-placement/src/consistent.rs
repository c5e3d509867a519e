//! Thread-safe bounded-load ring.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::config::RingConfig;
use crate::distribution::{PartitionTable, average_load, distribute};
use crate::error::PlacementError;
use crate::hasher::{Blake3Hasher, RingHasher, partition_position, project};
use crate::index::RingIndex;
use crate::member::{Member, MemberId};

/// Everything a mutation replaces at once.
struct RingState<M> {
    index: RingIndex,
    members: HashMap<MemberId, Arc<M>>,
    table: PartitionTable,
}

impl<M> Default for RingState<M> {
    fn default() -> Self {
        Self {
            index: RingIndex::new(),
            members: HashMap::new(),
            table: PartitionTable::default(),
        }
    }
}

/// Consistent hashing ring with bounded loads.
///
/// Maps keys to a fixed number of partitions and partitions to members.
/// No member is assigned more than [`Consistent::average_load`] partitions.
/// Every membership change recomputes the whole partition table under the
/// write lock, so readers never observe a partially redistributed ring. A
/// change that cannot be distributed is rejected and leaves the ring as it
/// was.
pub struct Consistent<M, H = Blake3Hasher> {
    config: RingConfig,
    hasher: H,
    state: RwLock<RingState<M>>,
}

impl<M: Member, H: RingHasher> Consistent<M, H> {
    /// Create an empty ring.
    pub fn new(config: RingConfig, hasher: H) -> Result<Self, PlacementError> {
        config.validate()?;
        Ok(Self {
            config,
            hasher,
            state: RwLock::new(RingState::default()),
        })
    }

    /// Create a ring holding `members`, distributed once after all are placed.
    ///
    /// Duplicate ids are ignored after their first occurrence.
    pub fn with_members<I>(
        config: RingConfig,
        hasher: H,
        members: I,
    ) -> Result<Self, PlacementError>
    where
        I: IntoIterator<Item = Arc<M>>,
    {
        let ring = Self::new(config, hasher)?;
        {
            let mut state = ring.state.write();
            for member in members {
                if state.members.contains_key(member.id()) {
                    continue;
                }
                state.index.insert(&ring.hasher, member.id(), ring.config.replication_factor);
                state.members.insert(member.id().to_owned(), member);
            }
            if !state.members.is_empty() {
                state.table = ring.redistribute(&state.index, &state.members)?;
            }
        }
        Ok(ring)
    }

    /// Add a member and redistribute. Adding a known id is a no-op.
    pub fn add_member(&self, member: Arc<M>) -> Result<(), PlacementError> {
        let mut state = self.state.write();
        let id = member.id();
        if state.members.contains_key(id) {
            return Ok(());
        }

        let mut index = state.index.clone();
        index.insert(&self.hasher, id, self.config.replication_factor);
        let mut members = state.members.clone();
        members.insert(id.to_owned(), Arc::clone(&member));

        let table = self.redistribute(&index, &members)?;
        *state = RingState {
            index,
            members,
            table,
        };
        Ok(())
    }

    /// Remove a member and redistribute. Removing an unknown id is a no-op.
    ///
    /// Removing the last member leaves an empty ring.
    pub fn remove_member(&self, member: &M) -> Result<(), PlacementError> {
        let mut state = self.state.write();
        let id = member.id();
        if !state.members.contains_key(id) {
            return Ok(());
        }

        let mut index = state.index.clone();
        index.remove(&self.hasher, id, self.config.replication_factor);
        let mut members = state.members.clone();
        members.remove(id);

        let table = self.redistribute(&index, &members)?;
        *state = RingState {
            index,
            members,
            table,
        };
        Ok(())
    }

    /// Partition that `key` falls into: `hash(key) % partition_count`.
    pub fn find_partition(&self, key: impl AsRef<[u8]>) -> u32 {
        project(&self.hasher, key.as_ref()) % self.config.partition_count
    }

    /// Member owning the partition `key` falls into.
    pub fn locate(&self, key: impl AsRef<[u8]>) -> Result<Arc<M>, PlacementError> {
        self.get_partition_owner(self.find_partition(key))
    }

    /// Member owning `partition_id`.
    pub fn get_partition_owner(&self, partition_id: u32) -> Result<Arc<M>, PlacementError> {
        if partition_id >= self.config.partition_count {
            return Err(PlacementError::InvalidPartition {
                partition_id,
                partition_count: self.config.partition_count,
            });
        }
        let state = self.state.read();
        let owner = state
            .table
            .owner(partition_id)
            .ok_or(PlacementError::NoOwnerFound { partition_id })?;
        resolve(&state.members, owner)
    }

    /// The owner of `key`'s partition followed by the next distinct members
    /// clockwise from the partition's ring position, up to `count` members.
    ///
    /// Returns fewer than `count` when the ring has fewer members.
    pub fn closest_members(
        &self,
        key: impl AsRef<[u8]>,
        count: usize,
    ) -> Result<Vec<Arc<M>>, PlacementError> {
        let partition_id = self.find_partition(key);
        let state = self.state.read();
        let owner = state
            .table
            .owner(partition_id)
            .ok_or(PlacementError::NoOwnerFound { partition_id })?;

        let wanted = count.min(state.members.len());
        let mut found = Vec::with_capacity(wanted);
        if wanted == 0 {
            return Ok(found);
        }
        found.push(resolve(&state.members, owner)?);

        let start = partition_position(&self.hasher, partition_id);
        for (_, member_id) in state.index.walk(start) {
            if found.len() == wanted {
                break;
            }
            if found.iter().any(|m| m.id() == member_id.as_str()) {
                continue;
            }
            found.push(resolve(&state.members, member_id)?);
        }
        Ok(found)
    }

    /// Per-member partition cap for the current member count. Zero when empty.
    pub fn average_load(&self) -> f64 {
        let state = self.state.read();
        average_load(&self.config, state.members.len())
    }

    /// Number of partitions owned by every current member.
    pub fn load_distribution(&self) -> HashMap<MemberId, f64> {
        let state = self.state.read();
        state
            .members
            .keys()
            .map(|id| (id.clone(), f64::from(state.table.load(id))))
            .collect()
    }

    /// Current members, in no particular order.
    pub fn members(&self) -> Vec<Arc<M>> {
        self.state.read().members.values().cloned().collect()
    }

    /// Copy of the current partition table.
    pub fn snapshot(&self) -> PartitionTable {
        self.state.read().table.clone()
    }

    /// Number of members.
    pub fn member_count(&self) -> usize {
        self.state.read().members.len()
    }

    /// Number of occupied ring positions.
    pub fn vnode_count(&self) -> usize {
        self.state.read().index.len()
    }

    /// Configured partition count.
    pub fn partition_count(&self) -> u32 {
        self.config.partition_count
    }

    /// The ring's configuration.
    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    fn redistribute(
        &self,
        index: &RingIndex,
        members: &HashMap<MemberId, Arc<M>>,
    ) -> Result<PartitionTable, PlacementError> {
        match distribute(&self.config, &self.hasher, index, members) {
            Ok(table) => {
                debug!(
                    members = members.len(),
                    vnodes = index.len(),
                    partitions = table.len(),
                    average_load = average_load(&self.config, members.len()),
                    "redistributed partitions"
                );
                Ok(table)
            }
            Err(e) => {
                warn!(error = %e, members = members.len(), "redistribution rejected");
                Err(e)
            }
        }
    }
}

fn resolve<M>(members: &HashMap<MemberId, Arc<M>>, id: &str) -> Result<Arc<M>, PlacementError> {
    members
        .get(id)
        .cloned()
        .ok_or_else(|| PlacementError::MemberMissing {
            member_id: id.to_owned(),
        })
}

impl<M, H> fmt::Debug for Consistent<M, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Consistent")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
