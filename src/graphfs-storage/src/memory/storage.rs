//! `MemoryGraphFs` implementation.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use common_config::GraphFsConfig;
use common_error::{GraphFsError, GraphFsResult};
use common_runtime::CancellationToken;
use graphfs_core::{
    Coordinate, Edition, EditionSpec, PropertyKey, RevisionSpec, Selector, Vertex, VertexDiff,
    VertexId, VertexRevisionId,
};

use crate::binary::{BinaryResolver, ensure_resolvable};
use crate::capacity::CapacityLedger;
use crate::fs::{FsStats, GraphFs, VertexSnapshot, VertexStream};
use crate::image::ImageFile;
use crate::mount::{Access, AccessMode, FileSystemState};
use crate::replication::{self, DecodedStore};

use super::locks::VertexLocks;
use super::stores::{VertexFilter, VertexRecord, VertexTable};

// ============================================================================
// Gate
// ============================================================================

/// Whole-store state guarded by the gate lock.
///
/// Vertex operations and clones hold the gate shared for their whole
/// duration; mount transitions, wipe, grow, shrink and replicate hold it
/// exclusively. An operation therefore sees exactly one mount state from
/// start to finish.
#[derive(Debug, Default)]
struct Gate {
    state: FileSystemState,
    last_access_mode: Option<AccessMode>,
    image_loaded: bool,
}

/// A resolved coordinate and the snapshot stored there.
type Resolved = (Edition, VertexRevisionId, Arc<Vertex>);

// ============================================================================
// MemoryGraphFs
// ============================================================================

/// In-memory vertex store, optionally backed by an image file.
///
/// # Thread Safety
///
/// `MemoryGraphFs` is thread-safe and can be shared across async tasks.
/// Writes to the same vertex are serialized by a striped lock; writes to
/// different vertices run in parallel. Records are copy-on-write, so clones
/// and `get_all_vertices` read a consistent point-in-time view without
/// blocking writers.
///
/// # Example
///
/// ```rust,ignore
/// let fs = MemoryGraphFs::new();
/// fs.mount_file_system(AccessMode::ReadWrite).await?;
///
/// let vertex = Vertex::new(VertexTypeId(1)).with_property("name", "A");
/// let id = vertex.id;
/// fs.add_vertex(vertex, EditionSpec::named("main"), None).await?;
///
/// let latest = fs
///     .get_vertex(id, EditionSpec::named("main"), RevisionSpec::Latest)
///     .await?;
/// ```
#[derive(Debug)]
pub struct MemoryGraphFs {
    description: String,
    default_edition: Edition,
    verify_checksum: bool,
    gate: RwLock<Gate>,
    table: RwLock<VertexTable>,
    ledger: CapacityLedger,
    locks: VertexLocks,
    resolver: Option<Arc<dyn BinaryResolver>>,
    image: Option<ImageFile>,
}

impl MemoryGraphFs {
    /// Create an unmounted, empty file system with the default configuration.
    pub fn new() -> Self {
        Self::build(&GraphFsConfig::default())
    }

    /// Create an unmounted file system from a configuration.
    ///
    /// A configured `image_path` makes the file system persistent.
    pub fn with_config(config: &GraphFsConfig) -> GraphFsResult<Self> {
        config.validate()?;
        let mut fs = Self::build(config);
        fs.image = config.storage.image_path.as_ref().map(ImageFile::new);
        Ok(fs)
    }

    fn build(config: &GraphFsConfig) -> Self {
        Self {
            description: config.storage.description.clone(),
            default_edition: Edition::new(config.storage.default_edition.clone()),
            verify_checksum: config.replication.verify_checksum,
            gate: RwLock::new(Gate::default()),
            table: RwLock::new(VertexTable::new()),
            ledger: CapacityLedger::new(config.storage.initial_capacity_bytes),
            locks: VertexLocks::new(config.concurrency.lock_stripes),
            resolver: None,
            image: None,
        }
    }

    /// Attach the binary-property subsystem.
    ///
    /// With a resolver attached, writes referencing unknown binary
    /// properties are rejected with `BinaryNotExistent`.
    #[must_use]
    pub fn with_binary_resolver(mut self, resolver: Arc<dyn BinaryResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Back the file system with an image file.
    #[must_use]
    pub fn with_image(mut self, image: ImageFile) -> Self {
        self.image = Some(image);
        self
    }

    /// Name of the edition that absent editions resolve to.
    pub fn default_edition(&self) -> &Edition {
        &self.default_edition
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    async fn read_gate(
        &self,
        operation: &str,
        access: Access,
    ) -> GraphFsResult<RwLockReadGuard<'_, Gate>> {
        let gate = self.gate.read().await;
        gate.state.require(operation, access)?;
        Ok(gate)
    }

    async fn write_gate(
        &self,
        operation: &str,
        access: Access,
    ) -> GraphFsResult<RwLockWriteGuard<'_, Gate>> {
        let gate = self.gate.write().await;
        gate.state.require(operation, access)?;
        Ok(gate)
    }

    /// Acquire the gate exclusively unless cancelled first.
    async fn write_gate_cancellable(
        &self,
        operation: &str,
        access: Access,
        mut cancel: CancellationToken,
    ) -> GraphFsResult<RwLockWriteGuard<'_, Gate>> {
        cancel.check(operation)?;
        let gate = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(GraphFsError::cancelled(operation.to_string())),
            gate = self.gate.write() => gate,
        };
        gate.state.require(operation, access)?;
        Ok(gate)
    }

    async fn record(&self, id: VertexId) -> Option<Arc<VertexRecord>> {
        self.table.read().await.get(id).cloned()
    }

    fn resolve(
        &self,
        record: &VertexRecord,
        edition: &EditionSpec,
        revision: RevisionSpec,
    ) -> Option<Resolved> {
        let edition = edition.resolve(&self.default_edition);
        let history = record.edition(&edition)?;
        let revision = revision.resolve(&history.revision_ids())?;
        let vertex = Arc::clone(history.get(revision)?);
        Some((edition, revision, vertex))
    }

    async fn resolve_stored(
        &self,
        id: VertexId,
        edition: &EditionSpec,
        revision: RevisionSpec,
    ) -> Option<Resolved> {
        let record = self.record(id).await?;
        self.resolve(&record, edition, revision)
    }

    async fn check_binaries(&self, ids: &[i64]) -> GraphFsResult<()> {
        match &self.resolver {
            Some(resolver) if !ids.is_empty() => ensure_resolvable(resolver.as_ref(), ids).await,
            _ => Ok(()),
        }
    }

    /// Swap in a decoded store.
    async fn install(&self, decoded: DecodedStore) {
        if let Some(max_id) = decoded.table.max_id() {
            VertexId::observe(max_id);
        }
        *self.table.write().await = decoded.table;
        self.ledger.restore(decoded.capacity);
    }

    async fn load_image(&self, gate: &mut Gate) -> GraphFsResult<()> {
        let Some(image) = &self.image else {
            return Ok(());
        };
        if gate.image_loaded {
            return Ok(());
        }

        if let Some(stream) = image.load().await? {
            let decoded = replication::decode(&stream, self.verify_checksum)?;
            log::info!(
                "Loaded {} vertices from {}",
                decoded.table.len(),
                image.path().display()
            );
            self.install(decoded).await;
        }
        gate.image_loaded = true;
        Ok(())
    }

    async fn flush_image(&self, access_mode: Option<AccessMode>) -> GraphFsResult<()> {
        let Some(image) = &self.image else {
            return Ok(());
        };
        let view = self.table.read().await.clone();
        let stream = replication::encode(&view, self.ledger.total(), access_mode)?;
        image.save(&stream).await
    }

    /// Commit a modified record and settle the ledger.
    async fn commit(&self, id: VertexId, record: VertexRecord, freed: u64) {
        self.table.write().await.put(id, record);
        self.ledger.release(freed);
    }
}

impl Default for MemoryGraphFs {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphFs for MemoryGraphFs {
    fn description(&self) -> &str {
        &self.description
    }

    fn is_persistent(&self) -> bool {
        self.image.is_some()
    }

    async fn state(&self) -> FileSystemState {
        self.gate.read().await.state
    }

    async fn mount_file_system(&self, mode: AccessMode) -> GraphFsResult<()> {
        let mut gate = self.gate.write().await;
        let next = gate.state.mount(mode)?;
        self.load_image(&mut gate).await?;

        gate.state = next;
        gate.last_access_mode = Some(mode);
        log::info!("Mounted {} ({mode})", self.description);
        Ok(())
    }

    async fn remount_file_system(&self, mode: AccessMode) -> GraphFsResult<()> {
        let mut gate = self.gate.write().await;
        gate.state = gate.state.remount(mode)?;
        gate.last_access_mode = Some(mode);
        log::info!("Remounted {} ({mode})", self.description);
        Ok(())
    }

    async fn unmount_file_system(&self) -> GraphFsResult<()> {
        let mut gate = self.gate.write().await;
        let next = gate.state.unmount()?;
        self.flush_image(gate.last_access_mode).await?;

        gate.state = next;
        log::info!("Unmounted {}", self.description);
        Ok(())
    }

    async fn number_of_bytes(&self) -> GraphFsResult<u64> {
        let _gate = self.read_gate("number_of_bytes", Access::Read).await?;
        Ok(self.ledger.total())
    }

    async fn number_of_free_bytes(&self) -> GraphFsResult<u64> {
        let _gate = self.read_gate("number_of_free_bytes", Access::Read).await?;
        Ok(self.ledger.free())
    }

    async fn grow_file_system_with_cancel(
        &self,
        bytes: u64,
        cancel: CancellationToken,
    ) -> GraphFsResult<u64> {
        let _gate = self
            .write_gate_cancellable("grow_file_system", Access::Write, cancel.clone())
            .await?;
        cancel.check("grow_file_system")?;

        let total = self.ledger.grow(bytes);
        log::info!("Grew {} by {bytes} bytes to {total}", self.description);
        Ok(total)
    }

    async fn shrink_file_system(&self, bytes: u64) -> GraphFsResult<u64> {
        let _gate = self.write_gate("shrink_file_system", Access::Write).await?;
        let total = self.ledger.shrink(bytes)?;
        log::info!("Shrank {} by {bytes} bytes to {total}", self.description);
        Ok(total)
    }

    async fn wipe_file_system(&self) -> GraphFsResult<()> {
        let _gate = self.write_gate("wipe_file_system", Access::Write).await?;
        self.table.write().await.clear();
        self.ledger.reset();
        log::info!("Wiped {}", self.description);
        Ok(())
    }

    async fn clone_file_system(&self) -> GraphFsResult<Bytes> {
        let gate = self.read_gate("clone_file_system", Access::Read).await?;
        let view = self.table.read().await.clone();
        let stream = replication::encode(&view, self.ledger.total(), gate.state.access_mode())?;
        log::info!(
            "Cloned {} vertices ({} bytes) from {}",
            view.len(),
            stream.len(),
            self.description
        );
        Ok(stream)
    }

    async fn replicate_file_system_with_cancel(
        &self,
        stream: &[u8],
        cancel: CancellationToken,
    ) -> GraphFsResult<()> {
        let mut gate = self
            .write_gate_cancellable("replicate_file_system", Access::Exclusive, cancel.clone())
            .await?;

        let decoded = replication::decode(stream, self.verify_checksum)?;
        cancel.check("replicate_file_system")?;

        if let Some(image) = &self.image {
            image.save(stream).await?;
        }
        let vertices = decoded.table.len();
        gate.last_access_mode = decoded.access_mode;
        gate.image_loaded = true;
        self.install(decoded).await;

        log::info!("Replicated {vertices} vertices into {}", self.description);
        Ok(())
    }

    async fn vertex_exists(
        &self,
        id: VertexId,
        edition: EditionSpec,
        revision: RevisionSpec,
    ) -> GraphFsResult<bool> {
        let _gate = self.read_gate("vertex_exists", Access::Read).await?;
        Ok(self.resolve_stored(id, &edition, revision).await.is_some())
    }

    async fn get_vertex(
        &self,
        id: VertexId,
        edition: EditionSpec,
        revision: RevisionSpec,
    ) -> GraphFsResult<Option<Vertex>> {
        let _gate = self.read_gate("get_vertex", Access::Read).await?;
        Ok(self
            .resolve_stored(id, &edition, revision)
            .await
            .map(|(_, _, vertex)| Vertex::clone(&vertex)))
    }

    async fn get_all_vertices(&self, filter: VertexFilter) -> GraphFsResult<VertexStream> {
        use futures::StreamExt;

        let _gate = self.read_gate("get_all_vertices", Access::Read).await?;
        let records: Vec<_> = self
            .table
            .read()
            .await
            .sorted()
            .into_iter()
            .filter(|(id, _)| filter.ids.matches(id))
            .collect();

        let stream = futures::stream::iter(records).flat_map(move |(id, record)| {
            let matched = record.matching(&filter);
            futures::stream::iter(matched.into_iter().map(move |(edition, revision, vertex)| {
                Ok::<_, GraphFsError>(VertexSnapshot {
                    coordinate: Coordinate::new(id, edition, revision),
                    vertex: Vertex::clone(&vertex),
                })
            }))
        });
        Ok(Box::pin(stream))
    }

    async fn get_vertex_editions(&self, id: VertexId) -> GraphFsResult<Vec<Edition>> {
        let _gate = self.read_gate("get_vertex_editions", Access::Read).await?;
        Ok(self
            .record(id)
            .await
            .map(|record| record.edition_names())
            .unwrap_or_default())
    }

    async fn get_vertex_revision_ids(
        &self,
        id: VertexId,
        editions: Selector<Edition>,
    ) -> GraphFsResult<Vec<VertexRevisionId>> {
        let _gate = self.read_gate("get_vertex_revision_ids", Access::Read).await?;
        let Some(record) = self.record(id).await else {
            return Ok(Vec::new());
        };
        Ok(record
            .editions()
            .filter(|(name, _)| editions.matches(name))
            .flat_map(|(_, history)| history.revision_ids())
            .collect())
    }

    async fn get_binary_property(
        &self,
        id: VertexId,
        edition: EditionSpec,
        revision: RevisionSpec,
        key: &PropertyKey,
    ) -> GraphFsResult<Bytes> {
        let _gate = self.read_gate("get_binary_property", Access::Read).await?;
        let (edition, revision, vertex) = self
            .resolve_stored(id, &edition, revision)
            .await
            .ok_or_else(|| GraphFsError::not_found(format!("{id} does not resolve")))?;

        let coordinate = Coordinate::new(id, edition, revision);
        let value = vertex.properties.get(key).ok_or_else(|| {
            GraphFsError::not_found(format!("property {key} not set at {coordinate}"))
        })?;
        let property_id = value.as_binary_ref().ok_or_else(|| {
            GraphFsError::invalid_parameter(format!(
                "property {key} at {coordinate} is a {}, not a binary reference",
                value.type_name()
            ))
        })?;

        let Some(resolver) = &self.resolver else {
            return Err(GraphFsError::binary_not_existent(property_id));
        };
        resolver
            .fetch(property_id)
            .await?
            .ok_or_else(|| GraphFsError::binary_not_existent(property_id))
    }

    async fn remove_vertex_revision(
        &self,
        id: VertexId,
        editions: Selector<Edition>,
        revisions: Selector<VertexRevisionId>,
    ) -> GraphFsResult<bool> {
        let _gate = self.read_gate("remove_vertex_revision", Access::Write).await?;
        let _guard = self.locks.lock(id).await;

        let Some(current) = self.record(id).await else {
            return Ok(false);
        };
        let mut record = VertexRecord::clone(&current);
        let Some(freed) = record.remove_revisions(&editions, &revisions) else {
            return Ok(false);
        };

        log::debug!("Removed revisions of {id}, freeing {freed} bytes");
        self.commit(id, record, freed).await;
        Ok(true)
    }

    async fn remove_vertex_edition(
        &self,
        id: VertexId,
        editions: Selector<Edition>,
    ) -> GraphFsResult<bool> {
        let _gate = self.read_gate("remove_vertex_edition", Access::Write).await?;
        let _guard = self.locks.lock(id).await;

        let Some(current) = self.record(id).await else {
            return Ok(false);
        };
        let mut record = VertexRecord::clone(&current);
        let Some(freed) = record.remove_editions(&editions) else {
            return Ok(false);
        };

        log::debug!("Removed editions of {id}, freeing {freed} bytes");
        self.commit(id, record, freed).await;
        Ok(true)
    }

    async fn remove_vertex(&self, id: VertexId) -> GraphFsResult<bool> {
        let _gate = self.read_gate("remove_vertex", Access::Write).await?;
        let _guard = self.locks.lock(id).await;

        let Some(removed) = self.table.write().await.remove(id) else {
            return Ok(false);
        };
        self.ledger.release(removed.storage_size());
        log::debug!("Removed {id}");
        Ok(true)
    }

    async fn add_vertex(
        &self,
        vertex: Vertex,
        edition: EditionSpec,
        revision: Option<VertexRevisionId>,
    ) -> GraphFsResult<VertexRevisionId> {
        let _gate = self.read_gate("add_vertex", Access::Write).await?;
        self.check_binaries(&vertex.binary_refs()).await?;

        let id = vertex.id;
        VertexId::observe(id);
        let _guard = self.locks.lock(id).await;
        let edition = edition.resolve(&self.default_edition);

        let mut record = {
            let table = self.table.read().await;
            if table.is_retired(id) {
                return Err(GraphFsError::already_exists(format!(
                    "{id} was removed and cannot be reused"
                )));
            }
            table
                .get(id)
                .map(|record| VertexRecord::clone(record))
                .unwrap_or_default()
        };

        let history = record.edition_mut(edition.clone());
        let revision = match revision {
            Some(revision) if history.contains(revision) => {
                return Err(GraphFsError::already_exists(format!(
                    "{} is already stored",
                    Coordinate::new(id, edition, revision)
                )));
            }
            Some(revision) => revision,
            None => VertexRevisionId::mint(history.max_revision()),
        };

        self.ledger.reserve(vertex.storage_size())?;
        history.push(revision, Arc::new(vertex));
        self.commit(id, record, 0).await;

        log::debug!("Added {}", Coordinate::new(id, edition, revision));
        Ok(revision)
    }

    async fn update_vertex(
        &self,
        id: VertexId,
        diff: &VertexDiff,
        edition: EditionSpec,
        revision: RevisionSpec,
        create_new_revision: bool,
    ) -> GraphFsResult<Vertex> {
        let _gate = self.read_gate("update_vertex", Access::Write).await?;
        self.check_binaries(&diff.binary_refs()).await?;
        let _guard = self.locks.lock(id).await;

        let current = self
            .record(id)
            .await
            .ok_or_else(|| GraphFsError::not_found(format!("{id} does not exist")))?;
        let (edition, resolved, previous) = self
            .resolve(&current, &edition, revision)
            .ok_or_else(|| {
                GraphFsError::not_found(format!(
                    "{id} has no revision matching {edition:?} / {revision:?}"
                ))
            })?;

        let updated = diff.apply_to(&previous);
        let mut record = VertexRecord::clone(&current);
        let history = record.existing_edition_mut(&edition).ok_or_else(|| {
            GraphFsError::internal(format!("edition {edition} of {id} vanished under lock"))
        })?;

        let target = if create_new_revision {
            self.ledger.reserve(updated.storage_size())?;
            let target = VertexRevisionId::mint(history.max_revision());
            history.push(target, Arc::new(updated.clone()));
            target
        } else {
            self.ledger
                .resize(previous.storage_size(), updated.storage_size())?;
            history.replace(resolved, Arc::new(updated.clone()));
            resolved
        };
        self.commit(id, record, 0).await;

        log::debug!("Updated {}", Coordinate::new(id, edition, target));
        Ok(updated)
    }

    async fn stats(&self) -> FsStats {
        let gate = self.gate.read().await;
        let table = self.table.read().await;
        FsStats {
            state: gate.state,
            last_access_mode: gate.last_access_mode,
            vertex_count: table.len(),
            edition_count: table.edition_count(),
            revision_count: table.revision_count(),
            total_bytes: self.ledger.total(),
            used_bytes: self.ledger.used(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_error::ErrorKind;
    use futures::TryStreamExt;
    use graphfs_core::{Value, VertexTypeId};

    async fn mounted() -> MemoryGraphFs {
        let fs = MemoryGraphFs::new();
        fs.mount_file_system(AccessMode::ReadWrite).await.unwrap();
        fs
    }

    fn vertex(id: u64) -> Vertex {
        Vertex::with_id(VertexId::new(id), VertexTypeId(1)).with_property("name", "A")
    }

    #[tokio::test]
    async fn test_add_and_get_default_edition() {
        let fs = mounted().await;
        let revision = fs
            .add_vertex(vertex(1), EditionSpec::Default, None)
            .await
            .unwrap();

        assert_eq!(
            fs.get_vertex_editions(VertexId::new(1)).await.unwrap(),
            vec![Edition::from("default")]
        );
        let stored = fs
            .get_vertex(VertexId::new(1), EditionSpec::Default, RevisionSpec::Id(revision))
            .await
            .unwrap();
        assert_eq!(stored, Some(vertex(1)));
    }

    #[tokio::test]
    async fn test_explicit_revision_conflict() {
        let fs = mounted().await;
        let r = VertexRevisionId::new(7);
        fs.add_vertex(vertex(1), EditionSpec::named("main"), Some(r))
            .await
            .unwrap();
        let err = fs
            .add_vertex(vertex(1), EditionSpec::named("main"), Some(r))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        // Same revision id under another edition is a different coordinate.
        fs.add_vertex(vertex(1), EditionSpec::named("draft"), Some(r))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_capacity_follows_content() {
        let fs = mounted().await;
        fs.add_vertex(vertex(1), EditionSpec::Default, None)
            .await
            .unwrap();
        let used = fs.stats().await.used_bytes;
        assert_eq!(used, vertex(1).storage_size());

        let diff = VertexDiff::new().set("bio", "x".repeat(100));
        fs.update_vertex(VertexId::new(1), &diff, EditionSpec::Default, RevisionSpec::Latest, false)
            .await
            .unwrap();
        assert!(fs.stats().await.used_bytes >= used + 100);

        fs.remove_vertex(VertexId::new(1)).await.unwrap();
        assert_eq!(fs.stats().await.used_bytes, 0);
    }

    #[tokio::test]
    async fn test_write_rejected_when_out_of_space() {
        let config = GraphFsConfig::default()
            .with_storage(common_config::StorageConfig::default().with_capacity(40));
        let fs = MemoryGraphFs::with_config(&config).unwrap();
        fs.mount_file_system(AccessMode::ReadWrite).await.unwrap();

        let big = vertex(1).with_property("blob", vec![0u8; 64]);
        let err = fs
            .add_vertex(big, EditionSpec::Default, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
        assert!(!fs.vertex_exists(VertexId::new(1), EditionSpec::Default, RevisionSpec::Latest).await.unwrap());
        assert_eq!(fs.number_of_free_bytes().await.unwrap(), 40);
    }

    #[tokio::test]
    async fn test_get_all_vertices_is_point_in_time() {
        let fs = mounted().await;
        for id in 1..=3 {
            fs.add_vertex(vertex(id), EditionSpec::Default, None)
                .await
                .unwrap();
        }

        let stream = fs.get_all_vertices(VertexFilter::all()).await.unwrap();
        fs.remove_vertex(VertexId::new(2)).await.unwrap();

        let seen: Vec<_> = stream.try_collect().await.unwrap();
        let ids: Vec<_> = seen.iter().map(|s| s.coordinate.vertex.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let again: Vec<_> = fs
            .get_all_vertices(VertexFilter::all())
            .await
            .unwrap()
            .try_collect()
            .await
            .unwrap();
        assert_eq!(again.len(), 2);
    }

    #[tokio::test]
    async fn test_binary_property_without_resolver() {
        let fs = mounted().await;
        let v = vertex(1).with_property("photo", Value::BinaryRef(5));
        fs.add_vertex(v, EditionSpec::Default, None).await.unwrap();

        let err = fs
            .get_binary_property(
                VertexId::new(1),
                EditionSpec::Default,
                RevisionSpec::Latest,
                &"photo".to_string(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.binary_property_id(), Some(5));

        let err = fs
            .get_binary_property(
                VertexId::new(1),
                EditionSpec::Default,
                RevisionSpec::Latest,
                &"name".to_string(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[tokio::test]
    async fn test_cancelled_grow_leaves_total() {
        let fs = mounted().await;
        let before = fs.number_of_bytes().await.unwrap();

        let (handle, token) = common_runtime::CancellationHandle::new();
        handle.cancel();
        let err = fs.grow_file_system_with_cancel(1024, token).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(fs.number_of_bytes().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_stats_in_any_state() {
        let fs = MemoryGraphFs::new();
        let stats = fs.stats().await;
        assert_eq!(stats.state, FileSystemState::Unmounted);
        assert_eq!(stats.vertex_count, 0);
        assert_eq!(stats.last_access_mode, None);
    }
}
