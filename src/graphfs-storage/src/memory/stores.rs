//! In-memory containers for vertices, editions and revisions.
//!
//! The nesting is vertex -> edition -> revision. Removal routines report how
//! many bytes they freed and leave emptiness checks to the caller one level
//! up, which drops a container as soon as it has nothing left.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use graphfs_core::{Edition, Selector, Vertex, VertexId, VertexRevisionId, VertexTypeId};

// ============================================================================
// EditionHistory
// ============================================================================

/// Revisions of one (vertex, edition) pair in insertion order.
///
/// Snapshots are shared behind `Arc` so cloning a history (for copy-on-write
/// or a clone stream) never copies vertex content.
#[derive(Debug, Clone, Default)]
pub struct EditionHistory {
    revisions: Vec<(VertexRevisionId, Arc<Vertex>)>,
}

impl EditionHistory {
    /// Revision ids in insertion order.
    pub fn revision_ids(&self) -> Vec<VertexRevisionId> {
        self.revisions.iter().map(|(id, _)| *id).collect()
    }

    /// Iterate over (revision, snapshot) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexRevisionId, &Arc<Vertex>)> {
        self.revisions.iter().map(|(id, v)| (*id, v))
    }

    /// Get a snapshot by revision id.
    pub fn get(&self, revision: VertexRevisionId) -> Option<&Arc<Vertex>> {
        self.revisions
            .iter()
            .find(|(id, _)| *id == revision)
            .map(|(_, v)| v)
    }

    /// Check whether a revision exists.
    pub fn contains(&self, revision: VertexRevisionId) -> bool {
        self.get(revision).is_some()
    }

    /// The largest revision id, used to keep minted ids increasing.
    pub fn max_revision(&self) -> Option<VertexRevisionId> {
        self.revisions.iter().map(|(id, _)| *id).max()
    }

    /// Append a revision. The caller guarantees the id is new.
    pub fn push(&mut self, revision: VertexRevisionId, vertex: Arc<Vertex>) {
        self.revisions.push((revision, vertex));
    }

    /// Replace the snapshot at `revision`, returning the previous one.
    pub fn replace(
        &mut self,
        revision: VertexRevisionId,
        vertex: Arc<Vertex>,
    ) -> Option<Arc<Vertex>> {
        self.revisions
            .iter_mut()
            .find(|(id, _)| *id == revision)
            .map(|(_, slot)| std::mem::replace(slot, vertex))
    }

    /// Remove every revision the selector matches. Returns freed bytes, or
    /// `None` if nothing matched.
    pub fn remove_matching(&mut self, revisions: &Selector<VertexRevisionId>) -> Option<u64> {
        let before = self.revisions.len();
        let mut freed = 0;
        self.revisions.retain(|(id, vertex)| {
            if revisions.matches(id) {
                freed += vertex.storage_size();
                false
            } else {
                true
            }
        });
        (self.revisions.len() != before).then_some(freed)
    }

    /// Bytes held by all snapshots.
    pub fn storage_size(&self) -> u64 {
        self.revisions.iter().map(|(_, v)| v.storage_size()).sum()
    }

    /// Number of revisions.
    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    /// Returns true if no revisions remain.
    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }
}

// ============================================================================
// VertexRecord
// ============================================================================

/// All editions of one vertex, ordered by edition name.
#[derive(Debug, Clone, Default)]
pub struct VertexRecord {
    editions: BTreeMap<Edition, EditionHistory>,
}

impl VertexRecord {
    /// Get an edition history.
    pub fn edition(&self, edition: &Edition) -> Option<&EditionHistory> {
        self.editions.get(edition)
    }

    /// Get or create an edition history.
    pub fn edition_mut(&mut self, edition: Edition) -> &mut EditionHistory {
        self.editions.entry(edition).or_default()
    }

    /// Get an existing edition history mutably.
    pub fn existing_edition_mut(&mut self, edition: &Edition) -> Option<&mut EditionHistory> {
        self.editions.get_mut(edition)
    }

    /// Iterate over editions in name order.
    pub fn editions(&self) -> impl Iterator<Item = (&Edition, &EditionHistory)> {
        self.editions.iter()
    }

    /// Edition names in order.
    pub fn edition_names(&self) -> Vec<Edition> {
        self.editions.keys().cloned().collect()
    }

    /// Remove matching revisions across matching editions, dropping editions
    /// whose history becomes empty. Returns freed bytes, or `None` if nothing
    /// matched.
    pub fn remove_revisions(
        &mut self,
        editions: &Selector<Edition>,
        revisions: &Selector<VertexRevisionId>,
    ) -> Option<u64> {
        let mut freed = None;
        for (name, history) in &mut self.editions {
            if !editions.matches(name) {
                continue;
            }
            if let Some(bytes) = history.remove_matching(revisions) {
                *freed.get_or_insert(0) += bytes;
            }
        }
        self.editions.retain(|_, history| !history.is_empty());
        freed
    }

    /// Remove matching editions with all their revisions. Returns freed
    /// bytes, or `None` if nothing matched.
    pub fn remove_editions(&mut self, editions: &Selector<Edition>) -> Option<u64> {
        let mut freed = None;
        self.editions.retain(|name, history| {
            if editions.matches(name) {
                *freed.get_or_insert(0) += history.storage_size();
                false
            } else {
                true
            }
        });
        freed
    }

    /// Bytes held by all editions.
    pub fn storage_size(&self) -> u64 {
        self.editions.values().map(EditionHistory::storage_size).sum()
    }

    /// Number of editions.
    pub fn edition_count(&self) -> usize {
        self.editions.len()
    }

    /// Number of revisions across editions.
    pub fn revision_count(&self) -> usize {
        self.editions.values().map(EditionHistory::len).sum()
    }

    /// Returns true if no editions remain; the vertex no longer exists.
    pub fn is_empty(&self) -> bool {
        self.editions.is_empty()
    }

    /// Snapshots matching the filter, in edition then insertion order.
    pub fn matching(&self, filter: &VertexFilter) -> Vec<(Edition, VertexRevisionId, Arc<Vertex>)> {
        self.editions
            .iter()
            .filter(|(name, _)| filter.editions.matches(name))
            .flat_map(|(name, history)| {
                history
                    .iter()
                    .filter(move |(revision, vertex)| {
                        filter.revisions.matches(revision) && filter.types.matches(&vertex.vertex_type)
                    })
                    .map(move |(revision, vertex)| (name.clone(), revision, Arc::clone(vertex)))
            })
            .collect()
    }
}

// ============================================================================
// VertexFilter
// ============================================================================

/// Filters for `get_all_vertices`. Omitted filters impose no constraint; the
/// provided ones are ANDed.
#[derive(Debug, Clone, Default)]
pub struct VertexFilter {
    /// Vertex type filter.
    pub types: Selector<VertexTypeId>,
    /// Vertex id filter.
    pub ids: Selector<VertexId>,
    /// Edition filter.
    pub editions: Selector<Edition>,
    /// Revision filter.
    pub revisions: Selector<VertexRevisionId>,
}

impl VertexFilter {
    /// A filter matching everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to vertex types.
    #[must_use]
    pub fn with_types(mut self, types: impl IntoIterator<Item = VertexTypeId>) -> Self {
        self.types = Selector::only(types);
        self
    }

    /// Restrict to vertex ids.
    #[must_use]
    pub fn with_ids(mut self, ids: impl IntoIterator<Item = VertexId>) -> Self {
        self.ids = Selector::only(ids);
        self
    }

    /// Restrict to editions.
    #[must_use]
    pub fn with_editions(mut self, editions: impl IntoIterator<Item = impl Into<Edition>>) -> Self {
        self.editions = Selector::only(editions);
        self
    }

    /// Restrict to revisions.
    #[must_use]
    pub fn with_revisions(mut self, revisions: impl IntoIterator<Item = VertexRevisionId>) -> Self {
        self.revisions = Selector::only(revisions);
        self
    }
}

// ============================================================================
// VertexTable
// ============================================================================

/// Every vertex in the store plus the ids that may not be reused.
///
/// Records are shared behind `Arc`; writers replace a record with a modified
/// copy, so a cloned table is an isolated point-in-time view.
#[derive(Debug, Clone, Default)]
pub struct VertexTable {
    vertices: HashMap<VertexId, Arc<VertexRecord>>,
    retired: HashSet<VertexId>,
}

impl VertexTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a table from its parts.
    pub fn from_parts(
        vertices: HashMap<VertexId, Arc<VertexRecord>>,
        retired: HashSet<VertexId>,
    ) -> Self {
        Self { vertices, retired }
    }

    /// Get a vertex record.
    pub fn get(&self, id: VertexId) -> Option<&Arc<VertexRecord>> {
        self.vertices.get(&id)
    }

    /// Check whether an id was retired by a full removal.
    pub fn is_retired(&self, id: VertexId) -> bool {
        self.retired.contains(&id)
    }

    /// Store a record, or drop the vertex and retire its id if the record is
    /// empty.
    pub fn put(&mut self, id: VertexId, record: VertexRecord) {
        if record.is_empty() {
            self.remove(id);
        } else {
            self.vertices.insert(id, Arc::new(record));
        }
    }

    /// Remove a vertex and retire its id. Returns the removed record.
    pub fn remove(&mut self, id: VertexId) -> Option<Arc<VertexRecord>> {
        let removed = self.vertices.remove(&id);
        if removed.is_some() {
            self.retired.insert(id);
        }
        removed
    }

    /// Drop everything, including retired ids.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.retired.clear();
    }

    /// Records sorted by vertex id, for stable iteration.
    pub fn sorted(&self) -> Vec<(VertexId, Arc<VertexRecord>)> {
        let mut records: Vec<_> = self
            .vertices
            .iter()
            .map(|(id, record)| (*id, Arc::clone(record)))
            .collect();
        records.sort_by_key(|(id, _)| *id);
        records
    }

    /// Retired ids, sorted.
    pub fn retired_sorted(&self) -> Vec<VertexId> {
        let mut retired: Vec<_> = self.retired.iter().copied().collect();
        retired.sort_unstable();
        retired
    }

    /// Highest id in use, live or retired.
    pub fn max_id(&self) -> Option<VertexId> {
        self.vertices.keys().chain(&self.retired).copied().max()
    }

    /// Bytes held by every snapshot.
    pub fn storage_size(&self) -> u64 {
        self.vertices.values().map(|r| r.storage_size()).sum()
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the table holds no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of editions across vertices.
    pub fn edition_count(&self) -> usize {
        self.vertices.values().map(|r| r.edition_count()).sum()
    }

    /// Number of revisions across vertices.
    pub fn revision_count(&self) -> usize {
        self.vertices.values().map(|r| r.revision_count()).sum()
    }
}
