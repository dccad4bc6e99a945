//! Binary property resolution.
//!
//! Large binary payloads live outside the vertex store and are referenced
//! from properties by a numeric id ([`graphfs_core::Value::BinaryRef`]). The
//! store only asks a [`BinaryResolver`] whether an id resolves; it never
//! manages the payloads itself.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use common_error::{GraphFsError, GraphFsResult};
use graphfs_core::BinaryPropertyId;

/// Lookup interface of the binary-property subsystem.
#[async_trait]
pub trait BinaryResolver: Send + Sync + std::fmt::Debug {
    /// Check whether a binary property exists.
    async fn exists(&self, id: BinaryPropertyId) -> GraphFsResult<bool>;

    /// Fetch a binary payload, or `None` if the id does not resolve.
    async fn fetch(&self, id: BinaryPropertyId) -> GraphFsResult<Option<Bytes>>;
}

/// Fail with `BinaryNotExistent` for the first id the resolver cannot find.
pub(crate) async fn ensure_resolvable(
    resolver: &dyn BinaryResolver,
    ids: &[BinaryPropertyId],
) -> GraphFsResult<()> {
    for &id in ids {
        if !resolver.exists(id).await? {
            log::debug!("Binary property {id} does not resolve");
            return Err(GraphFsError::binary_not_existent(id));
        }
    }
    Ok(())
}

/// Binary payloads held in memory.
#[derive(Debug)]
pub struct InMemoryBinaryStore {
    blobs: RwLock<HashMap<BinaryPropertyId, Bytes>>,
    next_id: AtomicI64,
}

impl InMemoryBinaryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Store a payload under a fresh id.
    pub async fn put(&self, payload: impl Into<Bytes>) -> BinaryPropertyId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.blobs.write().await.insert(id, payload.into());
        id
    }

    /// Store a payload under a caller-chosen id, replacing any previous one.
    pub async fn insert(&self, id: BinaryPropertyId, payload: impl Into<Bytes>) {
        self.blobs.write().await.insert(id, payload.into());
    }

    /// Remove a payload. Returns true if it existed.
    pub async fn remove(&self, id: BinaryPropertyId) -> bool {
        self.blobs.write().await.remove(&id).is_some()
    }

    /// Number of stored payloads.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

impl Default for InMemoryBinaryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BinaryResolver for InMemoryBinaryStore {
    async fn exists(&self, id: BinaryPropertyId) -> GraphFsResult<bool> {
        Ok(self.blobs.read().await.contains_key(&id))
    }

    async fn fetch(&self, id: BinaryPropertyId) -> GraphFsResult<Option<Bytes>> {
        Ok(self.blobs.read().await.get(&id).cloned())
    }
}
