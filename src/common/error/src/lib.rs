//! Error types and result aliases for GraphFS.
//!
//! Every fallible GraphFS operation returns [`GraphFsResult`]. Callers that
//! need to branch on the failure category should match on
//! [`GraphFsError::kind`] rather than on individual variants, since the enum
//! is `#[non_exhaustive]`.

mod error;

pub use error::{ErrorKind, GraphFsError, GraphFsResult};
