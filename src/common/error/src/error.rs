//! Core error types for GraphFS.

use thiserror::Error;

/// Result type alias using `GraphFsError`.
pub type GraphFsResult<T> = std::result::Result<T, GraphFsError>;

/// Stable category of a [`GraphFsError`].
///
/// The first six kinds are the ones administrative and query-layer callers
/// are expected to handle; the rest indicate environmental or internal
/// failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A vertex/edition/revision coordinate does not resolve.
    NotFound,
    /// The target coordinate is already occupied.
    AlreadyExists,
    /// The mount state forbids the operation.
    InvalidState,
    /// Not enough free bytes for the operation.
    CapacityExceeded,
    /// A replication stream failed validation.
    FormatInvalid,
    /// A referenced binary property cannot be resolved.
    BinaryNotExistent,
    /// The operation was cancelled before it took effect.
    Cancelled,
    /// Invalid argument supplied by the caller.
    InvalidParameter,
    /// I/O or encoding failure.
    Io,
    /// Bug in GraphFS.
    Internal,
}

/// Core error type for GraphFS operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GraphFsError {
    /// The requested coordinate does not resolve.
    #[error("NotFound: {0}")]
    NotFound(String),

    /// `add_vertex` targeted a coordinate that is already present.
    #[error("AlreadyExists: {0}")]
    AlreadyExists(String),

    /// The current mount state does not permit the operation.
    #[error("InvalidState: {operation} is not permitted while {state}")]
    InvalidState {
        /// Operation that was rejected.
        operation: String,
        /// Mount state at the time of rejection.
        state: String,
    },

    /// A write or shrink would exceed the free byte budget.
    #[error("CapacityExceeded: requested {requested} bytes, {available} bytes free")]
    CapacityExceeded {
        /// Bytes the operation needed.
        requested: u64,
        /// Bytes that were free.
        available: u64,
    },

    /// A replication stream is malformed or from an incompatible engine.
    #[error("FormatInvalid: {0}")]
    FormatInvalid(String),

    /// A binary property id could not be resolved by the binary subsystem.
    #[error("BinaryNotExistent: binary property {property_id} does not exist")]
    BinaryNotExistent {
        /// The unresolved binary property id.
        property_id: i64,
    },

    /// The operation observed a cancellation request.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Invalid parameter provided.
    #[error("InvalidParameter: {0}")]
    InvalidParameter(String),

    /// Encoding or decoding of a binary payload failed.
    #[error("CodecError: {0}")]
    CodecError(String),

    /// IO error.
    #[error("IoError: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("SerdeJsonError: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    /// Internal error (bug in GraphFS).
    #[error("InternalError: {0}")]
    InternalError(String),
}

impl GraphFsError {
    /// Create a new `NotFound` error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new `AlreadyExists` error.
    pub fn already_exists<S: Into<String>>(msg: S) -> Self {
        Self::AlreadyExists(msg.into())
    }

    /// Create a new `InvalidState` error.
    pub fn invalid_state<O: Into<String>, S: ToString>(operation: O, state: S) -> Self {
        Self::InvalidState {
            operation: operation.into(),
            state: state.to_string(),
        }
    }

    /// Create a new `CapacityExceeded` error.
    pub fn capacity_exceeded(requested: u64, available: u64) -> Self {
        Self::CapacityExceeded {
            requested,
            available,
        }
    }

    /// Create a new `FormatInvalid` error.
    pub fn format_invalid<S: Into<String>>(msg: S) -> Self {
        Self::FormatInvalid(msg.into())
    }

    /// Create a new `BinaryNotExistent` error.
    pub fn binary_not_existent(property_id: i64) -> Self {
        Self::BinaryNotExistent { property_id }
    }

    /// Create a new `Cancelled` error.
    pub fn cancelled<S: Into<String>>(msg: S) -> Self {
        Self::Cancelled(msg.into())
    }

    /// Create a new `InvalidParameter` error.
    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a new `CodecError`.
    pub fn codec<S: Into<String>>(msg: S) -> Self {
        Self::CodecError(msg.into())
    }

    /// Create a new `InternalError`.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::InternalError(msg.into())
    }

    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Self::FormatInvalid(_) => ErrorKind::FormatInvalid,
            Self::BinaryNotExistent { .. } => ErrorKind::BinaryNotExistent,
            Self::Cancelled(_) => ErrorKind::Cancelled,
            Self::InvalidParameter(_) => ErrorKind::InvalidParameter,
            Self::CodecError(_) | Self::IoError(_) | Self::SerdeJsonError(_) => ErrorKind::Io,
            Self::InternalError(_) => ErrorKind::Internal,
        }
    }

    /// The unresolved binary property id, if this is a `BinaryNotExistent` error.
    pub fn binary_property_id(&self) -> Option<i64> {
        match self {
            Self::BinaryNotExistent { property_id } => Some(*property_id),
            _ => None,
        }
    }
}

/// Ensure a condition holds, returning an `InvalidParameter` error if not.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $variant:ident: $($msg:tt)*) => {
        if !$cond {
            return Err($crate::GraphFsError::$variant(format!($($msg)*)));
        }
    };
    ($cond:expr, $msg:expr) => {
        if !$cond {
            return Err($crate::GraphFsError::InvalidParameter($msg.to_string()));
        }
    };
}

/// Return early with a `NotFound` error.
#[macro_export]
macro_rules! not_found_err {
    ($($arg:tt)*) => {
        return Err($crate::GraphFsError::NotFound(format!($($arg)*)))
    };
}

/// Return early with a `FormatInvalid` error.
#[macro_export]
macro_rules! format_err {
    ($($arg:tt)*) => {
        return Err($crate::GraphFsError::FormatInvalid(format!($($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphFsError::not_found("vertex 7");
        assert_eq!(err.to_string(), "NotFound: vertex 7");

        let err = GraphFsError::invalid_state("add_vertex", "mounted read-only");
        assert_eq!(
            err.to_string(),
            "InvalidState: add_vertex is not permitted while mounted read-only"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(GraphFsError::not_found("x").kind(), ErrorKind::NotFound);
        assert_eq!(
            GraphFsError::already_exists("x").kind(),
            ErrorKind::AlreadyExists
        );
        assert_eq!(
            GraphFsError::capacity_exceeded(10, 5).kind(),
            ErrorKind::CapacityExceeded
        );
        assert_eq!(
            GraphFsError::format_invalid("bad magic").kind(),
            ErrorKind::FormatInvalid
        );
        assert_eq!(GraphFsError::cancelled("grow").kind(), ErrorKind::Cancelled);
        assert_eq!(GraphFsError::codec("eof").kind(), ErrorKind::Io);
    }

    #[test]
    fn test_binary_not_existent_carries_id() {
        let err = GraphFsError::binary_not_existent(-42);
        assert_eq!(err.kind(), ErrorKind::BinaryNotExistent);
        assert_eq!(err.binary_property_id(), Some(-42));
        assert_eq!(GraphFsError::internal("x").binary_property_id(), None);
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: GraphFsError = io.into();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    fn check_positive(n: i64) -> GraphFsResult<i64> {
        crate::ensure!(n > 0, "n must be positive");
        Ok(n)
    }

    fn check_magic(magic: &[u8]) -> GraphFsResult<()> {
        crate::ensure!(magic == b"OK", FormatInvalid: "bad magic {magic:?}");
        Ok(())
    }

    #[test]
    fn test_ensure_macro() {
        assert_eq!(check_positive(3).unwrap(), 3);
        assert_eq!(
            check_positive(-1).unwrap_err().kind(),
            ErrorKind::InvalidParameter
        );
        assert!(check_magic(b"OK").is_ok());
        assert_eq!(
            check_magic(b"NO").unwrap_err().kind(),
            ErrorKind::FormatInvalid
        );
    }
}
