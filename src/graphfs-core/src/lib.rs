//! Core data model for the GraphFS vertex store.
//!
//! This crate provides the fundamental types shared by every GraphFS backend:
//! - `Value` for typed property values
//! - `Vertex`, `Hyperedge` and `VertexDiff` for the vertex model
//! - `Coordinate`, `EditionSpec`, `RevisionSpec` and `Selector` for addressing

pub mod hypergraph;
pub mod testing;
pub mod types;

#[cfg(test)]
mod proptest_utils;

// Re-export commonly used types
pub use hypergraph::{
    BinaryPropertyId, Coordinate, Edition, EditionSpec, HasProperties, Hyperedge, Label,
    PropertyKey, PropertyMap, RevisionSpec, Role, Selector, Vertex, VertexDiff, VertexId,
    VertexRevisionId, VertexTypeId,
};
pub use types::Value;
