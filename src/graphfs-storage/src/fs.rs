//! The `GraphFs` trait and the types it exchanges.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::Stream;
use serde::Serialize;

use common_error::GraphFsResult;
use common_runtime::CancellationToken;
use graphfs_core::{
    Coordinate, Edition, EditionSpec, PropertyKey, RevisionSpec, Selector, Vertex, VertexDiff,
    VertexId, VertexRevisionId,
};

use crate::memory::VertexFilter;
use crate::mount::{AccessMode, FileSystemState};

// ============================================================================
// Exchanged types
// ============================================================================

/// One stored snapshot together with the coordinate it lives at.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexSnapshot {
    /// Where the snapshot is stored.
    pub coordinate: Coordinate,
    /// Snapshot content.
    pub vertex: Vertex,
}

/// A lazily produced sequence of snapshots.
pub type VertexStream = Pin<Box<dyn Stream<Item = GraphFsResult<VertexSnapshot>> + Send>>;

/// Accounting counters of a file system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FsStats {
    /// Current lifecycle state.
    pub state: FileSystemState,
    /// Access mode of the last mount, or the mode carried by the last
    /// replicated stream.
    pub last_access_mode: Option<AccessMode>,
    /// Number of vertices.
    pub vertex_count: usize,
    /// Number of editions across vertices.
    pub edition_count: usize,
    /// Number of revisions across editions.
    pub revision_count: usize,
    /// Total byte budget.
    pub total_bytes: u64,
    /// Bytes consumed by snapshots.
    pub used_bytes: u64,
}

// ============================================================================
// GraphFs
// ============================================================================

/// A mount-gated, versioned vertex store.
///
/// Vertex reads and capacity queries need the file system mounted; vertex
/// writes, `wipe`, `grow` and `shrink` need it mounted read-write;
/// `replicate` needs it unmounted. Rejected operations fail with
/// `InvalidState` and change nothing.
///
/// Absent editions resolve to the default edition and absent revisions to
/// the latest revision of the edition. When a specific revision is given it
/// is authoritative, including for in-place updates.
#[async_trait]
pub trait GraphFs: Send + Sync + std::fmt::Debug {
    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Human-readable description of this file system.
    fn description(&self) -> &str;

    /// Returns true if contents survive an unmount/reopen cycle.
    fn is_persistent(&self) -> bool;

    /// Current lifecycle state.
    async fn state(&self) -> FileSystemState;

    /// Returns true in either mounted state.
    async fn is_mounted(&self) -> bool {
        self.state().await.is_mounted()
    }

    /// Current access mode, or `None` while unmounted.
    async fn access_mode(&self) -> Option<AccessMode> {
        self.state().await.access_mode()
    }

    /// Mount with the given access mode. Fails if already mounted.
    async fn mount_file_system(&self, mode: AccessMode) -> GraphFsResult<()>;

    /// Switch the access mode of a mounted file system.
    async fn remount_file_system(&self, mode: AccessMode) -> GraphFsResult<()>;

    /// Unmount. Every completed write is durable when this returns.
    async fn unmount_file_system(&self) -> GraphFsResult<()>;

    // ------------------------------------------------------------------
    // Capacity & replication
    // ------------------------------------------------------------------

    /// Total byte budget.
    async fn number_of_bytes(&self) -> GraphFsResult<u64>;

    /// Bytes still available. Never exceeds the total.
    async fn number_of_free_bytes(&self) -> GraphFsResult<u64>;

    /// Grow the budget by `bytes`, returning the new total.
    async fn grow_file_system(&self, bytes: u64) -> GraphFsResult<u64> {
        self.grow_file_system_with_cancel(bytes, CancellationToken::never())
            .await
    }

    /// Grow the budget unless cancelled before the change is applied.
    async fn grow_file_system_with_cancel(
        &self,
        bytes: u64,
        cancel: CancellationToken,
    ) -> GraphFsResult<u64>;

    /// Shrink the budget by `bytes`, returning the new total. Fails with
    /// `CapacityExceeded` if `bytes` exceeds the free bytes.
    async fn shrink_file_system(&self, bytes: u64) -> GraphFsResult<u64>;

    /// Remove every vertex, edition and revision and free all bytes.
    async fn wipe_file_system(&self) -> GraphFsResult<()>;

    /// Encode a point-in-time snapshot of the whole store.
    async fn clone_file_system(&self) -> GraphFsResult<Bytes>;

    /// Replace the whole store with the content of a clone stream.
    async fn replicate_file_system(&self, stream: &[u8]) -> GraphFsResult<()> {
        self.replicate_file_system_with_cancel(stream, CancellationToken::never())
            .await
    }

    /// Replicate unless cancelled before the new content is swapped in.
    async fn replicate_file_system_with_cancel(
        &self,
        stream: &[u8],
        cancel: CancellationToken,
    ) -> GraphFsResult<()>;

    // ------------------------------------------------------------------
    // Vertex reads
    // ------------------------------------------------------------------

    /// Check whether a coordinate resolves.
    async fn vertex_exists(
        &self,
        id: VertexId,
        edition: EditionSpec,
        revision: RevisionSpec,
    ) -> GraphFsResult<bool>;

    /// Get the snapshot a coordinate resolves to.
    async fn get_vertex(
        &self,
        id: VertexId,
        edition: EditionSpec,
        revision: RevisionSpec,
    ) -> GraphFsResult<Option<Vertex>>;

    /// Every snapshot passing the filter, from one point-in-time view.
    ///
    /// Ordered by vertex id, then edition name, then insertion order. Each
    /// call takes a fresh view.
    async fn get_all_vertices(&self, filter: VertexFilter) -> GraphFsResult<VertexStream>;

    /// Edition names of a vertex. Empty if the vertex is unknown.
    async fn get_vertex_editions(&self, id: VertexId) -> GraphFsResult<Vec<Edition>>;

    /// Revision ids across matching editions. Empty if none.
    async fn get_vertex_revision_ids(
        &self,
        id: VertexId,
        editions: Selector<Edition>,
    ) -> GraphFsResult<Vec<VertexRevisionId>>;

    /// Resolve a binary property referenced by a stored snapshot.
    async fn get_binary_property(
        &self,
        id: VertexId,
        edition: EditionSpec,
        revision: RevisionSpec,
        key: &PropertyKey,
    ) -> GraphFsResult<Bytes>;

    // ------------------------------------------------------------------
    // Vertex writes
    // ------------------------------------------------------------------

    /// Remove matching revisions, cascading to empty editions and vertices.
    /// Returns whether anything was removed.
    async fn remove_vertex_revision(
        &self,
        id: VertexId,
        editions: Selector<Edition>,
        revisions: Selector<VertexRevisionId>,
    ) -> GraphFsResult<bool>;

    /// Remove matching editions, cascading to the vertex.
    async fn remove_vertex_edition(
        &self,
        id: VertexId,
        editions: Selector<Edition>,
    ) -> GraphFsResult<bool>;

    /// Remove a vertex entirely. Its id is never reused.
    async fn remove_vertex(&self, id: VertexId) -> GraphFsResult<bool>;

    /// Store `vertex` as a new revision, returning its revision id.
    ///
    /// Fails with `AlreadyExists` if the coordinate is occupied or the
    /// vertex id was retired.
    async fn add_vertex(
        &self,
        vertex: Vertex,
        edition: EditionSpec,
        revision: Option<VertexRevisionId>,
    ) -> GraphFsResult<VertexRevisionId>;

    /// Apply `diff` to the resolved snapshot, in place or as a new revision,
    /// and return the result. Fails with `NotFound` if nothing resolves.
    async fn update_vertex(
        &self,
        id: VertexId,
        diff: &VertexDiff,
        edition: EditionSpec,
        revision: RevisionSpec,
        create_new_revision: bool,
    ) -> GraphFsResult<Vertex>;

    // ------------------------------------------------------------------
    // Accounting
    // ------------------------------------------------------------------

    /// Accounting counters. Callable in any state.
    async fn stats(&self) -> FsStats;
}
