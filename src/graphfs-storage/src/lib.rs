//! Storage layer for GraphFS.
//!
//! This crate provides a mount-gated, versioned vertex store:
//!
//! - [`GraphFs`]: the file system contract
//! - [`MemoryGraphFs`]: in-memory implementation, optionally backed by an
//!   image file
//! - [`StorageProvider`]: builds a file system from a configuration
//!
//! # Architecture
//!
//! - Every vertex holds named editions, each an ordered history of immutable
//!   revisions. Lookups that omit the edition use the default edition; lookups
//!   that omit the revision use the most recently inserted one.
//! - A mount-state controller gates every operation. Vertex reads need the
//!   file system mounted, writes need it mounted read-write, and replication
//!   needs it unmounted.
//! - A capacity ledger tracks the byte budget. Writes that would exceed it
//!   are rejected before anything changes.
//! - The whole store can be exported as a self-describing clone stream and
//!   imported into another file system.
//!
//! # Example
//!
//! ```rust,ignore
//! use graphfs_core::{EditionSpec, RevisionSpec, Vertex, VertexTypeId};
//! use graphfs_storage::{AccessMode, GraphFs, StorageProvider};
//!
//! let provider = StorageProvider::memory().await?;
//! let fs = provider.fs();
//! fs.mount_file_system(AccessMode::ReadWrite).await?;
//!
//! let vertex = Vertex::new(VertexTypeId(1)).with_property("name", "A");
//! let id = vertex.id;
//! fs.add_vertex(vertex, EditionSpec::named("main"), None).await?;
//!
//! let latest = fs
//!     .get_vertex(id, EditionSpec::named("main"), RevisionSpec::Latest)
//!     .await?;
//! ```

// Core modules
mod binary;
mod capacity;
mod fs;
mod image;
mod mount;
mod provider;

// Stream codec
pub mod replication;

// Storage implementation
pub mod memory;

// Re-exports
pub use binary::{BinaryResolver, InMemoryBinaryStore};
pub use capacity::{CapacityLedger, CapacityRecord};
pub use fs::{FsStats, GraphFs, VertexSnapshot, VertexStream};
pub use image::ImageFile;
pub use mount::{Access, AccessMode, FileSystemState};
pub use provider::{StorageMode, StorageProvider};

// Memory storage
pub use memory::{MemoryGraphFs, VertexFilter};
