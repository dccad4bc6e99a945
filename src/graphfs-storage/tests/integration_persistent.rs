//! Integration tests for image-backed file systems.
//!
//! ## Notes
//!
//! - Every test works in its own temporary directory
//! - Durability is checked by dropping the file system and opening a fresh
//!   one on the same image path

use futures::TryStreamExt;
use tempfile::TempDir;

use common_config::{GraphFsConfig, StorageConfig};
use common_error::ErrorKind;
use graphfs_core::testing::VertexFixture;
use graphfs_core::{EditionSpec, RevisionSpec, Selector, VertexDiff, VertexId};
use graphfs_storage::{
    AccessMode, GraphFs, MemoryGraphFs, StorageMode, StorageProvider, VertexFilter,
    VertexSnapshot,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn image_config(dir: &TempDir) -> GraphFsConfig {
    let path = dir.path().join("store").join("graph.img");
    GraphFsConfig::default().with_storage(
        StorageConfig::default()
            .with_description("persistent test store")
            .with_image_path(path),
    )
}

async fn snapshots(fs: &dyn GraphFs) -> Vec<VertexSnapshot> {
    fs.get_all_vertices(VertexFilter::all())
        .await
        .unwrap()
        .try_collect()
        .await
        .unwrap()
}

// ============================================================================
// Durability
// ============================================================================

#[tokio::test]
async fn test_contents_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = image_config(&dir);
    let fixture = VertexFixture::social_network();
    let alice = fixture.id("alice").unwrap();

    let before = {
        let fs = MemoryGraphFs::with_config(&config).unwrap();
        assert!(fs.is_persistent());
        fs.mount_file_system(AccessMode::ReadWrite).await.unwrap();
        for vertex in fixture.vertices() {
            fs.add_vertex(vertex.clone(), EditionSpec::named("main"), None)
                .await
                .unwrap();
        }
        fs.update_vertex(
            alice,
            &VertexDiff::new().set("age", 31i64),
            EditionSpec::named("main"),
            RevisionSpec::Latest,
            true,
        )
        .await
        .unwrap();
        fs.grow_file_system(2048).await.unwrap();

        let before = snapshots(&fs).await;
        fs.unmount_file_system().await.unwrap();
        before
    };

    let fs = MemoryGraphFs::with_config(&config).unwrap();
    fs.mount_file_system(AccessMode::ReadOnly).await.unwrap();

    assert_eq!(snapshots(&fs).await, before);
    assert_eq!(
        fs.get_vertex_revision_ids(alice, Selector::All)
            .await
            .unwrap()
            .len(),
        2
    );
    assert_eq!(
        fs.number_of_bytes().await.unwrap(),
        config.storage.initial_capacity_bytes + 2048
    );
}

#[tokio::test]
async fn test_mount_without_image_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let fs = MemoryGraphFs::with_config(&image_config(&dir)).unwrap();

    fs.mount_file_system(AccessMode::ReadWrite).await.unwrap();

    assert!(snapshots(&fs).await.is_empty());
    assert_eq!(fs.description(), "persistent test store");
}

#[tokio::test]
async fn test_remount_does_not_reload_image() {
    let dir = tempfile::tempdir().unwrap();
    let fs = MemoryGraphFs::with_config(&image_config(&dir)).unwrap();
    fs.mount_file_system(AccessMode::ReadWrite).await.unwrap();
    fs.add_vertex(
        VertexFixture::social_network().into_vertices().remove(0),
        EditionSpec::Default,
        None,
    )
    .await
    .unwrap();
    fs.unmount_file_system().await.unwrap();

    fs.mount_file_system(AccessMode::ReadWrite).await.unwrap();
    assert_eq!(snapshots(&fs).await.len(), 1);
}

#[tokio::test]
async fn test_corrupt_image_fails_mount() {
    let dir = tempfile::tempdir().unwrap();
    let config = image_config(&dir);
    let path = dir.path().join("store").join("graph.img");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"not a graph image").unwrap();

    let fs = MemoryGraphFs::with_config(&config).unwrap();
    let err = fs
        .mount_file_system(AccessMode::ReadWrite)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FormatInvalid);
    assert!(!fs.is_mounted().await);
}

#[tokio::test]
async fn test_replicate_writes_image() {
    let dir = tempfile::tempdir().unwrap();
    let config = image_config(&dir);
    let fixture = VertexFixture::social_network();

    let source = MemoryGraphFs::new();
    source.mount_file_system(AccessMode::ReadWrite).await.unwrap();
    for vertex in fixture.vertices() {
        source
            .add_vertex(vertex.clone(), EditionSpec::Default, None)
            .await
            .unwrap();
    }
    let stream = source.clone_file_system().await.unwrap();

    let target = MemoryGraphFs::with_config(&config).unwrap();
    target.replicate_file_system(&stream).await.unwrap();
    drop(target);

    let reopened = MemoryGraphFs::with_config(&config).unwrap();
    reopened.mount_file_system(AccessMode::ReadOnly).await.unwrap();
    assert_eq!(snapshots(&reopened).await, snapshots(&source).await);
}

// ============================================================================
// Provider
// ============================================================================

#[tokio::test]
async fn test_provider_close_flushes_image() {
    let dir = tempfile::tempdir().unwrap();
    let config = image_config(&dir);
    let id = VertexId::new(7);

    let provider = StorageProvider::new(config.clone()).await.unwrap();
    assert!(matches!(provider.mode(), StorageMode::Persistent { .. }));
    let fs = provider.fs();
    fs.mount_file_system(AccessMode::ReadWrite).await.unwrap();
    fs.add_vertex(
        graphfs_core::Vertex::with_id(id, graphfs_core::testing::PERSON),
        EditionSpec::Default,
        None,
    )
    .await
    .unwrap();
    provider.close().await.unwrap();
    assert!(!fs.is_mounted().await);

    let reopened = StorageProvider::new(config).await.unwrap();
    let fs = reopened.fs();
    fs.mount_file_system(AccessMode::ReadOnly).await.unwrap();
    assert!(
        fs.vertex_exists(id, EditionSpec::Default, RevisionSpec::Latest)
            .await
            .unwrap()
    );
    reopened.close().await.unwrap();
}
