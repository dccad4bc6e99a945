//! Mount-state lifecycle.
//!
//! Every vertex and capacity operation is classified by the kind of access it
//! needs and checked against the current [`FileSystemState`] before it touches
//! the store. Transitions are pure functions here; the file system applies
//! them while holding its whole-store gate exclusively.

use std::fmt;

use serde::{Deserialize, Serialize};

use common_error::{GraphFsError, GraphFsResult};

// ============================================================================
// AccessMode
// ============================================================================

/// Access mode requested when mounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessMode {
    /// Reads and writes permitted.
    ReadWrite,
    /// Reads only.
    ReadOnly,
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadWrite => f.write_str("read-write"),
            Self::ReadOnly => f.write_str("read-only"),
        }
    }
}

// ============================================================================
// Access
// ============================================================================

/// What an operation needs from the mount state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any mounted state.
    Read,
    /// `MountedReadWrite` only.
    Write,
    /// `Unmounted` only.
    Exclusive,
}

// ============================================================================
// FileSystemState
// ============================================================================

/// Lifecycle state of a file system instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FileSystemState {
    /// Not mounted. Initial and terminal state.
    #[default]
    Unmounted,
    /// Mounted for reads and writes.
    MountedReadWrite,
    /// Mounted for reads only.
    MountedReadOnly,
}

impl FileSystemState {
    /// The mounted state for an access mode.
    pub fn mounted(mode: AccessMode) -> Self {
        match mode {
            AccessMode::ReadWrite => Self::MountedReadWrite,
            AccessMode::ReadOnly => Self::MountedReadOnly,
        }
    }

    /// Returns true in either mounted state.
    pub fn is_mounted(self) -> bool {
        !matches!(self, Self::Unmounted)
    }

    /// The current access mode, or `None` while unmounted.
    pub fn access_mode(self) -> Option<AccessMode> {
        match self {
            Self::Unmounted => None,
            Self::MountedReadWrite => Some(AccessMode::ReadWrite),
            Self::MountedReadOnly => Some(AccessMode::ReadOnly),
        }
    }

    /// Check that `operation` may run in this state.
    pub fn require(self, operation: &str, access: Access) -> GraphFsResult<()> {
        let permitted = match access {
            Access::Read => self.is_mounted(),
            Access::Write => self == Self::MountedReadWrite,
            Access::Exclusive => self == Self::Unmounted,
        };
        if permitted {
            Ok(())
        } else {
            log::warn!("Rejected {operation} while {self}");
            Err(GraphFsError::invalid_state(operation, self))
        }
    }

    /// `Unmounted -> Mounted(mode)`.
    pub fn mount(self, mode: AccessMode) -> GraphFsResult<Self> {
        self.require("mount", Access::Exclusive)?;
        Ok(Self::mounted(mode))
    }

    /// `Mounted(x) -> Mounted(mode)`.
    pub fn remount(self, mode: AccessMode) -> GraphFsResult<Self> {
        self.require("remount", Access::Read)?;
        Ok(Self::mounted(mode))
    }

    /// `Mounted(x) -> Unmounted`.
    pub fn unmount(self) -> GraphFsResult<Self> {
        self.require("unmount", Access::Read)?;
        Ok(Self::Unmounted)
    }
}

impl fmt::Display for FileSystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unmounted => f.write_str("unmounted"),
            Self::MountedReadWrite => f.write_str("mounted read-write"),
            Self::MountedReadOnly => f.write_str("mounted read-only"),
        }
    }
}
