//! Coordinates addressing stored vertex snapshots, and the selectors used to
//! filter them.
//!
//! A coordinate is the triple (vertex, edition, revision). Callers usually
//! leave the edition and revision open: [`EditionSpec::Default`] resolves to
//! the store's default edition and [`RevisionSpec::Latest`] to the most
//! recently inserted revision of that edition.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::identifiers::{Edition, VertexId, VertexRevisionId};

/// Fully resolved address of one vertex snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    /// The vertex.
    pub vertex: VertexId,
    /// The edition within the vertex.
    pub edition: Edition,
    /// The revision within the edition.
    pub revision: VertexRevisionId,
}

impl Coordinate {
    /// Create a coordinate.
    pub fn new(vertex: VertexId, edition: impl Into<Edition>, revision: VertexRevisionId) -> Self {
        Self {
            vertex,
            edition: edition.into(),
            revision,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.vertex, self.edition, self.revision)
    }
}

/// Edition part of a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum EditionSpec {
    /// The store's default edition.
    #[default]
    Default,
    /// A specific edition.
    Named(Edition),
}

impl EditionSpec {
    /// Refer to a specific edition by name.
    pub fn named(name: impl Into<Edition>) -> Self {
        Self::Named(name.into())
    }

    /// Resolve against the store's default edition name.
    pub fn resolve(&self, default: &Edition) -> Edition {
        match self {
            Self::Default => default.clone(),
            Self::Named(edition) => edition.clone(),
        }
    }
}

impl From<Option<Edition>> for EditionSpec {
    fn from(edition: Option<Edition>) -> Self {
        edition.map_or(Self::Default, Self::Named)
    }
}

impl From<&str> for EditionSpec {
    fn from(name: &str) -> Self {
        Self::Named(Edition::from(name))
    }
}

impl From<Edition> for EditionSpec {
    fn from(edition: Edition) -> Self {
        Self::Named(edition)
    }
}

/// Revision part of a lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RevisionSpec {
    /// The most recently inserted revision of the edition.
    #[default]
    Latest,
    /// A specific revision.
    Id(VertexRevisionId),
}

impl RevisionSpec {
    /// Resolve against an edition history given in insertion order.
    ///
    /// Returns `None` when the history is empty or does not contain the
    /// requested id.
    pub fn resolve(&self, history: &[VertexRevisionId]) -> Option<VertexRevisionId> {
        match self {
            Self::Latest => history.last().copied(),
            Self::Id(id) => history.iter().find(|r| *r == id).copied(),
        }
    }
}

impl From<Option<VertexRevisionId>> for RevisionSpec {
    fn from(revision: Option<VertexRevisionId>) -> Self {
        revision.map_or(Self::Latest, Self::Id)
    }
}

impl From<VertexRevisionId> for RevisionSpec {
    fn from(revision: VertexRevisionId) -> Self {
        Self::Id(revision)
    }
}

/// Set filter over ids or names.
///
/// `All` imposes no constraint. `Only` matches members of the set; an empty
/// set matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<T: Ord> {
    /// Every value matches.
    All,
    /// Only the listed values match.
    Only(BTreeSet<T>),
}

impl<T: Ord> Selector<T> {
    /// Create a selector matching exactly the given values.
    pub fn only(values: impl IntoIterator<Item = impl Into<T>>) -> Self {
        Self::Only(values.into_iter().map(Into::into).collect())
    }

    /// Check whether a value passes the filter.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(value),
        }
    }

    /// Returns true if this selector imposes no constraint.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl<T: Ord> Default for Selector<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: Ord> From<Option<BTreeSet<T>>> for Selector<T> {
    fn from(values: Option<BTreeSet<T>>) -> Self {
        values.map_or(Self::All, Self::Only)
    }
}
