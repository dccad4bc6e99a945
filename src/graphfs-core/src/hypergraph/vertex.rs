//! Vertex snapshot representation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::properties::{HasProperties, collect_property_binary_refs, property_map_size};
use super::{BinaryPropertyId, Hyperedge, Label, PropertyMap, VertexId, VertexTypeId};
use crate::types::Value;

/// Fixed per-snapshot overhead counted against capacity: id, type and
/// revision bookkeeping.
const VERTEX_HEADER_BYTES: u64 = 32;

/// The content stored at one (vertex, edition, revision) coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// The logical vertex this snapshot belongs to.
    pub id: VertexId,
    /// Type of the vertex.
    pub vertex_type: VertexTypeId,
    /// Vertex properties.
    pub properties: PropertyMap,
    /// Outgoing hyperedges keyed by edge label.
    pub edges: BTreeMap<Label, Hyperedge>,
    /// Free-form comment.
    pub comment: Option<String>,
}

impl Vertex {
    /// Create a new vertex of the given type with a generated id.
    pub fn new(vertex_type: VertexTypeId) -> Self {
        Self::with_id(VertexId::generate(), vertex_type)
    }

    /// Create a new vertex with a specific id.
    pub fn with_id(id: VertexId, vertex_type: VertexTypeId) -> Self {
        Self {
            id,
            vertex_type,
            properties: PropertyMap::new(),
            edges: BTreeMap::new(),
            comment: None,
        }
    }

    /// Add a property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Replace all properties.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    /// Attach a hyperedge under a label.
    #[must_use]
    pub fn with_edge(mut self, label: impl Into<Label>, edge: Hyperedge) -> Self {
        self.edges.insert(label.into(), edge);
        self
    }

    /// Set the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Get a hyperedge by label.
    pub fn edge(&self, label: &str) -> Option<&Hyperedge> {
        self.edges.get(label)
    }

    /// Every binary property id referenced by this vertex, in key order.
    pub fn binary_refs(&self) -> Vec<BinaryPropertyId> {
        let mut refs = Vec::new();
        collect_property_binary_refs(&self.properties, &mut refs);
        for edge in self.edges.values() {
            collect_property_binary_refs(&edge.properties, &mut refs);
        }
        refs
    }

    /// Approximate number of bytes this snapshot occupies in storage.
    ///
    /// Deterministic for equal content; used for capacity accounting.
    pub fn storage_size(&self) -> u64 {
        let edges: u64 = self
            .edges
            .iter()
            .map(|(label, edge)| label.len() as u64 + edge.storage_size())
            .sum();
        let comment = self.comment.as_ref().map_or(0, |c| c.len() as u64);
        VERTEX_HEADER_BYTES + property_map_size(&self.properties) + edges + comment
    }
}

impl HasProperties for Vertex {
    fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }
}
