//! Identifiers for vertices, vertex types, editions and revisions.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Label naming a hyperedge attached to a vertex.
pub type Label = String;

/// Role name for hyperedge endpoints.
pub type Role = String;

/// Property key name.
pub type PropertyKey = String;

/// Numeric id addressing a binary property in the binary subsystem.
pub type BinaryPropertyId = i64;

/// Next id handed out by [`VertexId::generate`].
static NEXT_VERTEX_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier of a logical vertex.
///
/// Stable across every edition and revision of the vertex.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VertexId(u64);

impl VertexId {
    /// Wrap a caller-assigned id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Mint a fresh id from the process-wide counter.
    ///
    /// The id is greater than every id passed to [`VertexId::observe`], so it
    /// never collides with a vertex a store has loaded or stored.
    pub fn generate() -> Self {
        Self(NEXT_VERTEX_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Record that `id` is in use so later [`VertexId::generate`] calls skip
    /// past it.
    pub fn observe(id: Self) {
        NEXT_VERTEX_ID.fetch_max(id.0.saturating_add(1), Ordering::Relaxed);
    }

    /// The raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for VertexId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Reference to the type of a vertex.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct VertexTypeId(pub u64);

impl fmt::Display for VertexTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type{}", self.0)
    }
}

/// Name of an edition (a mutable history line of a vertex).
///
/// Edition names are case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Edition(String);

impl Edition {
    /// Create an edition name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The edition name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Edition {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Edition {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of one immutable snapshot within an edition's history.
///
/// Minted ids are derived from wall-clock microseconds and are strictly
/// increasing within an edition, so id order matches creation order for
/// minted revisions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct VertexRevisionId(u64);

impl VertexRevisionId {
    /// Wrap a caller-assigned revision id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Mint a revision id strictly greater than `after` (if given).
    pub fn mint(after: Option<Self>) -> Self {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX));
        match after {
            Some(prev) if prev.0 >= now => Self(prev.0.saturating_add(1)),
            _ => Self(now),
        }
    }

    /// The raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VertexRevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Standard role name for binary edge source.
pub const ROLE_SOURCE: &str = "source";

/// Standard role name for binary edge target.
pub const ROLE_TARGET: &str = "target";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id_generation_is_unique() {
        let a = VertexId::generate();
        let b = VertexId::generate();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_generate_skips_observed_ids() {
        let taken = VertexId::new(VertexId::generate().get() + 1_000);
        VertexId::observe(taken);
        assert!(VertexId::generate() > taken);

        // Observing a smaller id never moves the counter back.
        VertexId::observe(VertexId::new(1));
        assert!(VertexId::generate() > taken);
    }

    #[test]
    fn test_vertex_id_display() {
        assert_eq!(VertexId::new(42).to_string(), "v42");
        assert_eq!(VertexId::from(7).get(), 7);
    }

    #[test]
    fn test_edition_is_case_sensitive() {
        assert_ne!(Edition::from("Main"), Edition::from("main"));
        assert_eq!(Edition::new("main").as_str(), "main");
    }

    #[test]
    fn test_revision_mint_is_monotonic() {
        let first = VertexRevisionId::mint(None);
        let second = VertexRevisionId::mint(Some(first));
        assert!(second > first);

        let far_future = VertexRevisionId::new(u64::MAX - 1);
        assert_eq!(
            VertexRevisionId::mint(Some(far_future)),
            VertexRevisionId::new(u64::MAX)
        );
    }

    #[test]
    fn test_role_constants() {
        assert_eq!(ROLE_SOURCE, "source");
        assert_eq!(ROLE_TARGET, "target");
    }
}
