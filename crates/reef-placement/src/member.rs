//! Member identity.

/// Stable, unique identifier of a ring member.
pub type MemberId = String;

/// Anything that can own partitions on the ring.
///
/// Identity is the string returned by [`Member::id`]: two values with the
/// same id are the same member as far as the ring is concerned. The ring
/// holds members behind an [`Arc`](std::sync::Arc) and never mutates them.
pub trait Member: Send + Sync {
    /// Stable, unique identifier of this member.
    fn id(&self) -> &str;
}

impl Member for String {
    fn id(&self) -> &str {
        self
    }
}

impl Member for &'static str {
    fn id(&self) -> &str {
        self
    }
}
