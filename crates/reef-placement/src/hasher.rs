//! Hash projection onto the 31-bit ring space.
//!
//! The ring consumes any 32-bit hash through [`RingHasher`]. Raw outputs are
//! masked to 31 bits by [`project`] so ring positions and partition ids share
//! one non-negative domain regardless of the hash family plugged in.

/// Mask applied to every raw hash before it is used as a ring position.
pub(crate) const POSITION_MASK: u32 = 0x7fff_ffff;

/// A pure, total 32-bit hash function over byte strings.
pub trait RingHasher: Send + Sync {
    /// Hash `key` to 32 bits. Must be deterministic for a given key.
    fn hash32(&self, key: &[u8]) -> u32;
}

impl<F> RingHasher for F
where
    F: Fn(&[u8]) -> u32 + Send + Sync,
{
    fn hash32(&self, key: &[u8]) -> u32 {
        self(key)
    }
}

/// BLAKE3, truncated to its first four bytes (little-endian).
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl RingHasher for Blake3Hasher {
    fn hash32(&self, key: &[u8]) -> u32 {
        let hash = blake3::hash(key);
        let bytes = hash.as_bytes();
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// XXH3-64, truncated to its low 32 bits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xxh3Hasher;

impl RingHasher for Xxh3Hasher {
    fn hash32(&self, key: &[u8]) -> u32 {
        xxhash_rust::xxh3::xxh3_64(key) as u32
    }
}

/// Hash `key` and clear the sign bit.
pub(crate) fn project<H: RingHasher + ?Sized>(hasher: &H, key: &[u8]) -> u32 {
    hasher.hash32(key) & POSITION_MASK
}

/// Ring position of a member's `replica`-th virtual node: `hash(id ++ replica)`.
pub(crate) fn vnode_position<H: RingHasher + ?Sized>(
    hasher: &H,
    member_id: &str,
    replica: u32,
) -> u32 {
    project(hasher, format!("{member_id}{replica}").as_bytes())
}

/// Ring position a partition's walk starts from: `hash(decimal(partition_id))`.
pub(crate) fn partition_position<H: RingHasher + ?Sized>(hasher: &H, partition_id: u32) -> u32 {
    project(hasher, partition_id.to_string().as_bytes())
}
