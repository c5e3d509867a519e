//! Ring index: virtual node positions and their owners.

use std::collections::BTreeMap;

use tracing::debug;

use crate::hasher::{RingHasher, vnode_position};
use crate::member::MemberId;

/// Sorted virtual node positions, each mapped to the member that owns it.
///
/// A member's positions are a pure function of its id and the replica
/// count, so removal recomputes them instead of keeping a side table.
/// Two virtual nodes hashing to the same position collide: the later
/// insert wins.
#[derive(Debug, Clone, Default)]
pub(crate) struct RingIndex {
    vnodes: BTreeMap<u32, MemberId>,
}

impl RingIndex {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Place `replicas` virtual nodes for `member_id`.
    pub(crate) fn insert<H: RingHasher + ?Sized>(
        &mut self,
        hasher: &H,
        member_id: &str,
        replicas: u32,
    ) {
        for i in 0..replicas {
            let pos = vnode_position(hasher, member_id, i);
            self.vnodes.insert(pos, member_id.to_owned());
        }
        debug!(member_id, replicas, "placed member on ring");
    }

    /// Remove the virtual nodes of `member_id`.
    ///
    /// A position that was taken over by another member in a collision is
    /// left to its current owner.
    pub(crate) fn remove<H: RingHasher + ?Sized>(
        &mut self,
        hasher: &H,
        member_id: &str,
        replicas: u32,
    ) {
        for i in 0..replicas {
            let pos = vnode_position(hasher, member_id, i);
            if self.vnodes.get(&pos).is_some_and(|owner| owner == member_id) {
                self.vnodes.remove(&pos);
            }
        }
        debug!(member_id, replicas, "removed member from ring");
    }

    /// Smallest occupied position `>= position`, wrapping to the smallest
    /// position overall. `None` only when the ring is empty.
    pub(crate) fn successor(&self, position: u32) -> Option<u32> {
        self.vnodes
            .range(position..)
            .next()
            .or_else(|| self.vnodes.iter().next())
            .map(|(pos, _)| *pos)
    }

    /// Walk clockwise from `position`, visiting every occupied position once.
    pub(crate) fn walk(&self, position: u32) -> impl Iterator<Item = (u32, &MemberId)> + '_ {
        let after = self.vnodes.range(position..);
        let before = self.vnodes.range(..position);
        after.chain(before).map(|(pos, id)| (*pos, id))
    }

    /// Number of occupied positions.
    pub(crate) fn len(&self) -> usize {
        self.vnodes.len()
    }
}
