//! Testing utilities and helpers for graphfs-core.
//!
//! This module provides fixtures for building small, recognizable vertex
//! sets so storage tests can share the same scenarios.

use std::collections::HashMap;

use crate::hypergraph::{Hyperedge, Vertex, VertexId, VertexTypeId};
use crate::types::Value;

/// Vertex type used for people in fixtures.
pub const PERSON: VertexTypeId = VertexTypeId(1);
/// Vertex type used for companies in fixtures.
pub const COMPANY: VertexTypeId = VertexTypeId(2);

/// Test fixture builder for creating common vertex scenarios.
///
/// Vertices are tracked by a short name so tests can refer to them without
/// caring about generated ids.
#[derive(Debug, Default)]
pub struct VertexFixture {
    vertices: Vec<Vertex>,
    names: HashMap<String, VertexId>,
}

impl VertexFixture {
    /// Create a new empty fixture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fixture with a simple social network pattern.
    pub fn social_network() -> Self {
        let mut fixture = Self::new();

        let alice = fixture.add_vertex(PERSON, "alice", [("name", "Alice"), ("age", "30")]);
        let bob = fixture.add_vertex(PERSON, "bob", [("name", "Bob"), ("age", "25")]);
        let charlie = fixture.add_vertex(PERSON, "charlie", [("name", "Charlie")]);
        let acme = fixture.add_vertex(COMPANY, "acme", [("name", "Acme Corp")]);

        fixture.link("alice", "KNOWS", Hyperedge::new().with_target(bob));
        fixture.link("bob", "KNOWS", Hyperedge::new().with_target(charlie));
        fixture.link(
            "alice",
            "WORKS_AT",
            Hyperedge::new()
                .with_endpoint(acme, "employer")
                .with_property("since", Value::Int64(2020)),
        );

        fixture
    }

    /// Add a vertex and track it by name.
    pub fn add_vertex<'a>(
        &mut self,
        vertex_type: VertexTypeId,
        name: &str,
        properties: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> VertexId {
        let mut vertex = Vertex::new(vertex_type);
        for (key, value) in properties {
            vertex.properties.insert(key.to_string(), Value::from(value));
        }
        let id = vertex.id;
        self.vertices.push(vertex);
        self.names.insert(name.to_string(), id);
        id
    }

    /// Attach a hyperedge to a named vertex. Unknown names are ignored.
    pub fn link(&mut self, name: &str, label: &str, edge: Hyperedge) {
        let Some(id) = self.id(name) else {
            return;
        };
        if let Some(vertex) = self.vertices.iter_mut().find(|v| v.id == id) {
            vertex.edges.insert(label.to_string(), edge);
        }
    }

    /// Get a vertex id by name.
    pub fn id(&self, name: &str) -> Option<VertexId> {
        self.names.get(name).copied()
    }

    /// Get a vertex by name.
    pub fn vertex(&self, name: &str) -> Option<&Vertex> {
        let id = self.id(name)?;
        self.vertices.iter().find(|v| v.id == id)
    }

    /// All vertices in insertion order.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Consume the fixture, yielding its vertices.
    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the fixture has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
