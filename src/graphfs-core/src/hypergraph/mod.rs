//! Vertex data model.
//!
//! This module provides the core primitives stored by GraphFS:
//! - identifiers for vertices, types, editions and revisions
//! - `Coordinate` and the lookup specs and selectors that address snapshots
//! - `Vertex` snapshots with their labeled n-ary `Hyperedge`s
//! - `VertexDiff` for property-level updates

mod coordinate;
mod diff;
mod hyperedge;
mod identifiers;
mod properties;
mod vertex;

pub use coordinate::{Coordinate, EditionSpec, RevisionSpec, Selector};
pub use diff::VertexDiff;
pub use hyperedge::Hyperedge;
pub use identifiers::{
    BinaryPropertyId, Edition, Label, PropertyKey, ROLE_SOURCE, ROLE_TARGET, Role, VertexId,
    VertexRevisionId, VertexTypeId,
};
pub use properties::{HasProperties, PropertyMap};
pub use vertex::Vertex;
