//! In-memory vertex store.
//!
//! Vertices are held in a hash table of copy-on-write records. Each record
//! maps edition names to an ordered revision history, and each revision is
//! an immutable vertex snapshot shared behind `Arc`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use graphfs_storage::{AccessMode, GraphFs, MemoryGraphFs};
//!
//! let fs = MemoryGraphFs::new();
//! fs.mount_file_system(AccessMode::ReadWrite).await?;
//!
//! let revision = fs.add_vertex(vertex, EditionSpec::Default, None).await?;
//! let stream = fs.clone_file_system().await?;
//! ```

mod locks;
mod storage;
mod stores;

pub use locks::VertexLocks;
pub use storage::MemoryGraphFs;
pub use stores::{EditionHistory, VertexFilter, VertexRecord, VertexTable};
