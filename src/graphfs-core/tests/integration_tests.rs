//! Integration tests for graphfs-core
//!
//! These tests exercise the public vertex model the way storage backends use
//! it, without duplicating the unit tests in individual modules.

use std::collections::BTreeSet;

use graphfs_core::testing::{PERSON, VertexFixture};
use graphfs_core::*;

#[test]
fn test_value_equality_and_debug() {
    assert_eq!(Value::Int64(42), Value::Int64(42));
    assert_ne!(Value::Int64(42), Value::Int64(43));
    assert_eq!(format!("{:?}", Value::Int64(42)), "Int64(42)");
    assert_eq!(format!("{:?}", Value::BinaryRef(3)), "BinaryRef(3)");
    assert_eq!(format!("{:?}", Value::Null), "Null");
}

#[test]
fn test_identifier_display() {
    assert_eq!(VertexId::new(7).to_string(), "v7");
    assert_eq!(VertexTypeId(2).to_string(), "type2");
    assert_eq!(Edition::from("main").to_string(), "main");
    assert_eq!(VertexRevisionId::new(9).to_string(), "r9");
}

#[test]
fn test_revision_minting_is_monotonic() {
    let first = VertexRevisionId::mint(None);
    let second = VertexRevisionId::mint(Some(first));
    let third = VertexRevisionId::mint(Some(VertexRevisionId::new(u64::MAX - 1)));

    assert!(second > first);
    assert_eq!(third, VertexRevisionId::new(u64::MAX));
}

#[test]
fn test_addressing_defaults() {
    let default = Edition::from("default");
    let history = vec![VertexRevisionId::new(5), VertexRevisionId::new(2)];

    let edition = EditionSpec::default().resolve(&default);
    let revision = RevisionSpec::default().resolve(&history);

    let coordinate = Coordinate::new(VertexId::new(1), edition, revision.unwrap());
    assert_eq!(coordinate.to_string(), "(v1, default, r2)");
}

#[test]
fn test_selector_over_editions() {
    let selector: Selector<Edition> =
        Selector::Only(BTreeSet::from([Edition::from("a"), Edition::from("b")]));
    let editions = ["a", "b", "c"].map(Edition::from);
    let kept: Vec<_> = editions.iter().filter(|e| selector.matches(e)).collect();
    assert_eq!(kept.len(), 2);
}

#[test]
fn test_fixture_round_through_diff() {
    let fixture = VertexFixture::social_network();
    let alice = fixture.vertex("alice").unwrap().clone();

    let diff = VertexDiff::new()
        .set("age", 31i64)
        .remove_edge("WORKS_AT")
        .with_comment("birthday");
    let updated = diff.apply_to(&alice);

    assert_eq!(updated.vertex_type, PERSON);
    assert_eq!(updated.get_property("age"), Some(&Value::Int64(31)));
    assert_eq!(updated.get_property("name"), Some(&Value::from("Alice")));
    assert!(updated.edge("WORKS_AT").is_none());
    assert!(updated.edge("KNOWS").is_some());
    assert_eq!(updated.comment.as_deref(), Some("birthday"));
}

#[test]
fn test_storage_size_tracks_edits() {
    let fixture = VertexFixture::social_network();
    let bob = fixture.vertex("bob").unwrap();

    let bigger = VertexDiff::new().set("bio", "x".repeat(1000)).apply_to(bob);
    let smaller = VertexDiff::new().remove("age").apply_to(bob);

    assert!(bigger.storage_size() >= bob.storage_size() + 1000);
    assert!(smaller.storage_size() < bob.storage_size());
}
