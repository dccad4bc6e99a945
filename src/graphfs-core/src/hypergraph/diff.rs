//! Property-level update diffs for vertices.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{Hyperedge, Label, PropertyKey, PropertyMap, Vertex};
use crate::types::Value;

/// An update to apply to a vertex snapshot.
///
/// Entries in `properties` and `edges` overwrite same-named entries on the
/// target; names in `removed_properties` and `removed_edges` are deleted.
/// Everything the diff does not name is left untouched. Removals are applied
/// before overwrites, so a key present in both ends up set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VertexDiff {
    /// Properties to set.
    pub properties: PropertyMap,
    /// Properties to delete.
    pub removed_properties: BTreeSet<PropertyKey>,
    /// Hyperedges to set, by label.
    pub edges: BTreeMap<Label, Hyperedge>,
    /// Hyperedge labels to delete.
    pub removed_edges: BTreeSet<Label>,
    /// Replacement comment.
    pub comment: Option<String>,
}

impl VertexDiff {
    /// Create an empty diff.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property.
    #[must_use]
    pub fn set(mut self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Remove a property.
    #[must_use]
    pub fn remove(mut self, key: impl Into<PropertyKey>) -> Self {
        self.removed_properties.insert(key.into());
        self
    }

    /// Set a hyperedge.
    #[must_use]
    pub fn set_edge(mut self, label: impl Into<Label>, edge: Hyperedge) -> Self {
        self.edges.insert(label.into(), edge);
        self
    }

    /// Remove a hyperedge.
    #[must_use]
    pub fn remove_edge(mut self, label: impl Into<Label>) -> Self {
        self.removed_edges.insert(label.into());
        self
    }

    /// Replace the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Returns true if applying this diff changes nothing.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
            && self.removed_properties.is_empty()
            && self.edges.is_empty()
            && self.removed_edges.is_empty()
            && self.comment.is_none()
    }

    /// Apply the diff to a vertex in place.
    pub fn apply_in_place(&self, vertex: &mut Vertex) {
        for key in &self.removed_properties {
            vertex.properties.remove(key);
        }
        for (key, value) in &self.properties {
            vertex.properties.insert(key.clone(), value.clone());
        }
        for label in &self.removed_edges {
            vertex.edges.remove(label);
        }
        for (label, edge) in &self.edges {
            vertex.edges.insert(label.clone(), edge.clone());
        }
        if let Some(comment) = &self.comment {
            vertex.comment = Some(comment.clone());
        }
    }

    /// Apply the diff to a copy of a vertex.
    pub fn apply_to(&self, vertex: &Vertex) -> Vertex {
        let mut updated = vertex.clone();
        self.apply_in_place(&mut updated);
        updated
    }

    /// Every binary property id the diff would introduce.
    pub fn binary_refs(&self) -> Vec<super::BinaryPropertyId> {
        let mut refs = Vec::new();
        for value in self.properties.values() {
            value.collect_binary_refs(&mut refs);
        }
        for edge in self.edges.values() {
            for value in edge.properties.values() {
                value.collect_binary_refs(&mut refs);
            }
        }
        refs
    }
}

impl From<Vertex> for VertexDiff {
    /// A diff that sets every property, edge and comment of the vertex.
    fn from(vertex: Vertex) -> Self {
        Self {
            properties: vertex.properties,
            removed_properties: BTreeSet::new(),
            edges: vertex.edges,
            removed_edges: BTreeSet::new(),
            comment: vertex.comment,
        }
    }
}
