//! Configuration management for GraphFS.
//!
//! Provides runtime configuration for the storage engine, its lock layout and
//! the replication codec. Every section implements `Default`, and missing
//! fields in JSON input fall back to those defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use common_error::{GraphFsError, GraphFsResult};

/// Name of the edition used when a caller does not name one.
pub const DEFAULT_EDITION_NAME: &str = "default";

/// Initial byte budget of a freshly created file system (64 MiB).
pub const DEFAULT_CAPACITY_BYTES: u64 = 64 * 1024 * 1024;

/// Global GraphFS configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GraphFsConfig {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Concurrency configuration.
    pub concurrency: ConcurrencyConfig,
    /// Replication configuration.
    pub replication: ReplicationConfig,
}

impl GraphFsConfig {
    /// Parse a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> GraphFsResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> GraphFsResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize this configuration to pretty-printed JSON.
    pub fn to_json_string(&self) -> GraphFsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that the configuration is internally consistent.
    pub fn validate(&self) -> GraphFsResult<()> {
        if self.storage.default_edition.is_empty() {
            return Err(GraphFsError::invalid_parameter(
                "storage.default_edition must not be empty",
            ));
        }
        if self.concurrency.lock_stripes == 0 {
            return Err(GraphFsError::invalid_parameter(
                "concurrency.lock_stripes must be at least 1",
            ));
        }
        Ok(())
    }

    /// Set the storage configuration.
    #[must_use]
    pub fn with_storage(mut self, storage: StorageConfig) -> Self {
        self.storage = storage;
        self
    }
}

/// Storage layer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Human-readable description returned by `file_system_description`.
    pub description: String,
    /// Byte budget the file system starts with.
    pub initial_capacity_bytes: u64,
    /// Edition name that `EditionSpec::Default` resolves to.
    pub default_edition: String,
    /// Image file for persistent mode. `None` keeps the store in memory only.
    pub image_path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            description: "in-memory GraphFS".to_string(),
            initial_capacity_bytes: DEFAULT_CAPACITY_BYTES,
            default_edition: DEFAULT_EDITION_NAME.to_string(),
            image_path: None,
        }
    }
}

impl StorageConfig {
    /// Set the initial capacity.
    #[must_use]
    pub fn with_capacity(mut self, bytes: u64) -> Self {
        self.initial_capacity_bytes = bytes;
        self
    }

    /// Set the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Enable persistent mode with the given image file.
    #[must_use]
    pub fn with_image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.image_path = Some(path.into());
        self
    }
}

/// Lock layout configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    /// Number of lock stripes used to serialize writers per vertex.
    pub lock_stripes: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self { lock_stripes: 64 }
    }
}

/// Clone/replicate stream configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicationConfig {
    /// Verify the body digest when replicating.
    pub verify_checksum: bool,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            verify_checksum: true,
        }
    }
}
