//! GraphFS - versioned property-hypergraph vertex store
//!
//! GraphFS keeps every vertex as a set of named editions, each an ordered
//! history of immutable revisions, behind a mount-gated file system
//! interface with capacity accounting and whole-store clone/replicate.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Re-export core crates
pub use common_config as config;
pub use common_error as error;
pub use common_runtime as runtime;
pub use graphfs_core as core;
pub use graphfs_storage as storage;

/// GraphFS version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
