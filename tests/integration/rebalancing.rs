//! Integration test: rebalancing.
//!
//! Grow and shrink a ring one member at a time and check that only a
//! fraction of partitions change owner, and that every partition of a
//! departed member is handed over.

use reef_integration_tests::{TestMember, empty_ring, owners, ring_with};
use reef_placement::{Member, PartitionTable};

/// 9-member ring, add a 10th. Every partition the newcomer owns must show up
/// as a migration to it, and a good share of partitions must stay put.
#[test]
fn test_add_member_moves_a_fraction() {
    let ring = ring_with(9);
    let before = ring.snapshot();

    let newcomer = TestMember::new("member-10");
    ring.add_member(newcomer.clone()).unwrap();
    let after = ring.snapshot();

    let migrations = PartitionTable::diff(&before, &after);
    let moved = migrations.len();
    let total = ring.partition_count() as usize;
    assert!(moved > 0, "a new member must take over some partitions");
    assert!(
        moved * 4 < total * 3,
        "too many partitions moved: {moved}/{total}"
    );

    let gained = after.load(newcomer.id()) as usize;
    let to_newcomer = migrations.iter().filter(|m| m.to == newcomer.id()).count();
    assert_eq!(gained, to_newcomer);
    assert!(migrations.iter().all(|m| m.from != newcomer.id()));
}

/// 5-member ring, remove one. All of its partitions are handed over.
#[test]
fn test_remove_member_hands_over_its_partitions() {
    let ring = ring_with(5);
    let leaving = TestMember::new("member-3");
    let before = ring.snapshot();
    let owned = before.load(leaving.id()) as usize;
    assert!(owned > 0);

    ring.remove_member(&leaving).unwrap();
    let after = ring.snapshot();

    assert_eq!(after.load(leaving.id()), 0);
    let migrations = PartitionTable::diff(&before, &after);
    let from_leaving = migrations.iter().filter(|m| m.from == leaving.id()).count();
    assert_eq!(from_leaving, owned);
    assert!(migrations.iter().all(|m| m.to != leaving.id()));
}

/// Adding then removing the same member restores the original assignment.
#[test]
fn test_add_then_remove_restores_assignment() {
    let ring = ring_with(4);
    let original = owners(&ring);

    let visitor = TestMember::new("visitor");
    ring.add_member(visitor.clone()).unwrap();
    assert_ne!(owners(&ring), original);

    ring.remove_member(&visitor).unwrap();
    assert_eq!(owners(&ring), original);
}

/// Growing from one to twenty members keeps every intermediate ring fully
/// assigned and under the cap.
#[test]
fn test_growth_stays_balanced() {
    let ring = empty_ring();
    for i in 1..=20 {
        ring.add_member(TestMember::new(&format!("member-{i}"))).unwrap();

        let table = ring.snapshot();
        assert_eq!(table.len(), ring.partition_count() as usize);
        let average = ring.average_load();
        for (id, load) in table.loads() {
            assert!(
                f64::from(*load) <= average,
                "{i} members: {id} owns {load}, cap {average}"
            );
        }
    }
}

/// Shrinking back to nothing never fails and ends with an empty table.
#[test]
fn test_shrink_to_empty() {
    let ring = ring_with(6);
    for m in ring.members() {
        ring.remove_member(&m).unwrap();
    }
    assert_eq!(ring.member_count(), 0);
    assert!(ring.snapshot().is_empty());
}
