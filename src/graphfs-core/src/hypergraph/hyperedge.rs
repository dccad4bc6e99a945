//! N-ary hyperedge attached to a vertex.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::properties::{HasProperties, property_map_size};
use super::{PropertyMap, Role, VertexId};

/// An n-ary hyperedge leaving a vertex, connecting it to endpoint vertices
/// with optional roles.
///
/// Hyperedges are owned by the vertex snapshot they are attached to; the
/// vertex stores them under an edge label.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Hyperedge {
    /// Endpoint vertices in insertion order.
    pub endpoints: Vec<VertexId>,
    /// Role assignments for endpoints.
    pub roles: BTreeMap<VertexId, Role>,
    /// Hyperedge properties.
    pub properties: PropertyMap,
}

impl Hyperedge {
    /// Create an empty hyperedge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an endpoint without a role.
    #[must_use]
    pub fn with_target(mut self, vertex: VertexId) -> Self {
        self.endpoints.push(vertex);
        self
    }

    /// Add an endpoint with a role.
    #[must_use]
    pub fn with_endpoint(mut self, vertex: VertexId, role: impl Into<Role>) -> Self {
        self.endpoints.push(vertex);
        self.roles.insert(vertex, role.into());
        self
    }

    /// Add a property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<crate::Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Get the arity (number of endpoints).
    pub fn arity(&self) -> usize {
        self.endpoints.len()
    }

    /// Get the role of an endpoint.
    pub fn role_of(&self, vertex: VertexId) -> Option<&Role> {
        self.roles.get(&vertex)
    }

    /// Get all endpoints with a specific role.
    pub fn endpoints_with_role(&self, role: &str) -> Vec<VertexId> {
        self.roles
            .iter()
            .filter(|(_, r)| r.as_str() == role)
            .map(|(&id, _)| id)
            .collect()
    }

    /// Check if this hyperedge points at a vertex.
    pub fn involves(&self, vertex: VertexId) -> bool {
        self.endpoints.contains(&vertex)
    }

    /// Approximate storage footprint.
    pub fn storage_size(&self) -> u64 {
        let endpoints = 8 * self.endpoints.len() as u64;
        let roles: u64 = self.roles.values().map(|r| 8 + r.len() as u64).sum();
        endpoints + roles + property_map_size(&self.properties)
    }
}

impl HasProperties for Hyperedge {
    fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }
}
