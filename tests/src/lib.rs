//! Shared helpers for reef integration tests.
//!
//! Provides [`TestMember`] — a member type whose id is derived from a
//! human-readable name the way real deployments derive ids from host
//! identities — and ring builders over it.

use std::collections::HashMap;
use std::sync::Arc;

use reef_placement::{Blake3Hasher, Consistent, Member, RingConfig};

/// A member identified by the BLAKE3 hex digest of its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestMember {
    name: String,
    id: String,
}

impl TestMember {
    /// Create a member from a human-readable name.
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            id: blake3::hash(name.as_bytes()).to_hex().to_string(),
        })
    }

    /// The name this member was created from.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Member for TestMember {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Members named `member-1` through `member-{n}`.
pub fn members(n: usize) -> Vec<Arc<TestMember>> {
    (1..=n).map(|i| TestMember::new(&format!("member-{i}"))).collect()
}

/// An empty ring with the default configuration.
pub fn empty_ring() -> Consistent<TestMember> {
    Consistent::new(RingConfig::default(), Blake3Hasher).expect("default config is valid")
}

/// A ring with the default configuration holding `n` members.
pub fn ring_with(n: usize) -> Consistent<TestMember> {
    Consistent::with_members(RingConfig::default(), Blake3Hasher, members(n))
        .expect("default config distributes")
}

/// Owner name of every partition, in partition order.
pub fn owners(ring: &Consistent<TestMember>) -> Vec<String> {
    (0..ring.partition_count())
        .map(|p| {
            ring.get_partition_owner(p)
                .expect("partition has an owner")
                .name()
                .to_owned()
        })
        .collect()
}

/// Sorted member names, for set comparisons.
pub fn names(members: &[Arc<TestMember>]) -> Vec<String> {
    let mut names: Vec<String> = members.iter().map(|m| m.name().to_owned()).collect();
    names.sort();
    names
}

/// Load per member name.
pub fn loads_by_name(ring: &Consistent<TestMember>) -> HashMap<String, f64> {
    let by_id = ring.load_distribution();
    ring.members()
        .into_iter()
        .map(|m| (m.name().to_owned(), by_id[m.id()]))
        .collect()
}
