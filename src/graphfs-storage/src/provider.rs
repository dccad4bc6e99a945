//! `StorageProvider` - entry point that builds a file system from a
//! configuration.
//!
//! # Modes
//!
//! - `Memory`: contents live only as long as the process
//! - `Persistent`: contents are loaded from and flushed to an image file
//!
//! # Usage
//!
//! ```rust,ignore
//! use graphfs_storage::{AccessMode, StorageProvider};
//!
//! let provider = StorageProvider::persistent("./graph.img").await?;
//! let fs = provider.fs();
//! fs.mount_file_system(AccessMode::ReadWrite).await?;
//!
//! // ...
//!
//! provider.close().await?;
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use common_config::{GraphFsConfig, StorageConfig};
use common_error::GraphFsResult;

use crate::binary::BinaryResolver;
use crate::fs::GraphFs;
use crate::memory::MemoryGraphFs;

// ============================================================================
// StorageMode
// ============================================================================

/// Where file system contents live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageMode {
    /// Pure in-memory, no persistence.
    Memory,
    /// Backed by an image file.
    Persistent {
        /// Path of the image file.
        path: PathBuf,
    },
}

impl StorageMode {
    /// Derive the mode from a configuration.
    pub fn from_config(config: &GraphFsConfig) -> Self {
        match &config.storage.image_path {
            Some(path) => Self::Persistent { path: path.clone() },
            None => Self::Memory,
        }
    }
}

/// Provider lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleState {
    Ready,
    Closed,
}

// ============================================================================
// StorageProvider
// ============================================================================

/// Owns one file system built from a [`GraphFsConfig`].
///
/// # Thread Safety
///
/// `StorageProvider` is thread-safe and can be shared across async tasks.
pub struct StorageProvider {
    mode: StorageMode,
    inner: Arc<MemoryGraphFs>,
    config: GraphFsConfig,
    lifecycle: Mutex<LifecycleState>,
}

impl std::fmt::Debug for StorageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageProvider")
            .field("mode", &self.mode)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl StorageProvider {
    /// Create a provider. The file system starts unmounted.
    pub async fn new(config: GraphFsConfig) -> GraphFsResult<Self> {
        Self::open(config, None).await
    }

    /// Create a provider whose file system validates binary references
    /// through `resolver`.
    pub async fn with_binary_resolver(
        config: GraphFsConfig,
        resolver: Arc<dyn BinaryResolver>,
    ) -> GraphFsResult<Self> {
        Self::open(config, Some(resolver)).await
    }

    /// Create a provider synchronously (blocking).
    pub fn new_sync(config: GraphFsConfig) -> GraphFsResult<Self> {
        common_runtime::block_on(Self::new(config))?
    }

    /// Create an in-memory provider with default settings.
    pub async fn memory() -> GraphFsResult<Self> {
        Self::new(GraphFsConfig::default()).await
    }

    /// Create a persistent provider backed by the image at `path`.
    pub async fn persistent(path: impl Into<PathBuf>) -> GraphFsResult<Self> {
        let config =
            GraphFsConfig::default().with_storage(StorageConfig::default().with_image_path(path));
        Self::new(config).await
    }

    async fn open(
        config: GraphFsConfig,
        resolver: Option<Arc<dyn BinaryResolver>>,
    ) -> GraphFsResult<Self> {
        let mut fs = MemoryGraphFs::with_config(&config)?;
        if let Some(resolver) = resolver {
            fs = fs.with_binary_resolver(resolver);
        }

        let provider = Self {
            mode: StorageMode::from_config(&config),
            inner: Arc::new(fs),
            config,
            lifecycle: Mutex::new(LifecycleState::Ready),
        };

        log::info!("Opened {:?} file system", provider.mode);
        Ok(provider)
    }

    /// Get the storage mode.
    pub fn mode(&self) -> &StorageMode {
        &self.mode
    }

    /// Get the configuration.
    pub fn config(&self) -> &GraphFsConfig {
        &self.config
    }

    /// Get the file system trait object.
    pub fn fs(&self) -> Arc<dyn GraphFs> {
        Arc::clone(&self.inner) as Arc<dyn GraphFs>
    }

    /// Check if the provider is ready.
    pub async fn is_ready(&self) -> bool {
        *self.lifecycle.lock().await == LifecycleState::Ready
    }

    /// Check if the provider is closed.
    pub async fn is_closed(&self) -> bool {
        *self.lifecycle.lock().await == LifecycleState::Closed
    }

    /// Close the provider, unmounting the file system if it is mounted.
    ///
    /// In persistent mode the unmount flushes the image. Closing twice is a
    /// no-op, and concurrent closes wait for the first to finish. A failed
    /// flush leaves the provider ready so the caller can retry.
    pub async fn close(&self) -> GraphFsResult<()> {
        // Held until the unmount finishes so only one close flushes.
        let mut lifecycle = self.lifecycle.lock().await;
        if *lifecycle == LifecycleState::Closed {
            return Ok(());
        }

        if self.inner.is_mounted().await {
            if let Err(e) = self.inner.unmount_file_system().await {
                log::warn!("Failed to unmount on close: {e}");
                return Err(e);
            }
        }

        *lifecycle = LifecycleState::Closed;
        log::info!("Closed {:?} file system", self.mode);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binary::InMemoryBinaryStore;
    use crate::mount::AccessMode;
    use graphfs_core::{EditionSpec, Value, Vertex, VertexTypeId};

    #[tokio::test]
    async fn test_provider_memory_mode() {
        let provider = StorageProvider::memory().await.unwrap();

        assert_eq!(provider.mode(), &StorageMode::Memory);
        assert!(provider.is_ready().await);
        assert!(!provider.fs().is_persistent());
        assert!(!provider.fs().is_mounted().await);
    }

    #[tokio::test]
    async fn test_provider_persistent_mode() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let path = tmp_dir.path().join("graph.img");
        let provider = StorageProvider::persistent(&path).await.unwrap();

        assert_eq!(
            provider.mode(),
            &StorageMode::Persistent { path: path.clone() }
        );
        assert!(provider.fs().is_persistent());

        provider
            .fs()
            .mount_file_system(AccessMode::ReadWrite)
            .await
            .unwrap();
        provider.close().await.unwrap();

        assert!(provider.is_closed().await);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_provider_close_idempotent() {
        let provider = StorageProvider::memory().await.unwrap();

        provider.close().await.unwrap();
        assert!(provider.is_closed().await);

        provider.close().await.unwrap();
        assert!(provider.is_closed().await);
    }

    #[tokio::test]
    async fn test_concurrent_close_flushes_once() {
        let tmp_dir = tempfile::tempdir().unwrap();
        let path = tmp_dir.path().join("graph.img");
        let provider = StorageProvider::persistent(&path).await.unwrap();
        let fs = provider.fs();
        fs.mount_file_system(AccessMode::ReadWrite).await.unwrap();
        fs.add_vertex(Vertex::new(VertexTypeId(1)), EditionSpec::Default, None)
            .await
            .unwrap();

        let (first, second) = tokio::join!(provider.close(), provider.close());

        first.unwrap();
        second.unwrap();
        assert!(provider.is_closed().await);
        assert!(!fs.is_mounted().await);
        assert!(path.exists());
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_persistent_keeps_non_utf8_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let tmp_dir = tempfile::tempdir().unwrap();
        let path = tmp_dir.path().join(OsStr::from_bytes(b"graph-\xff.img"));
        let provider = StorageProvider::persistent(&path).await.unwrap();

        assert_eq!(
            provider.config().storage.image_path.as_deref(),
            Some(path.as_path())
        );
        provider
            .fs()
            .mount_file_system(AccessMode::ReadWrite)
            .await
            .unwrap();
        provider.close().await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_provider_with_resolver_rejects_dangling_refs() {
        let blobs = Arc::new(InMemoryBinaryStore::new());
        let provider = StorageProvider::with_binary_resolver(GraphFsConfig::default(), blobs)
            .await
            .unwrap();
        let fs = provider.fs();
        fs.mount_file_system(AccessMode::ReadWrite).await.unwrap();

        let vertex = Vertex::new(VertexTypeId(1)).with_property("photo", Value::BinaryRef(9));
        let err = fs
            .add_vertex(vertex, EditionSpec::Default, None)
            .await
            .unwrap_err();
        assert_eq!(err.binary_property_id(), Some(9));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GraphFsConfig::default();
        config.concurrency.lock_stripes = 0;
        assert!(StorageProvider::new_sync(config).is_err());
    }
}
