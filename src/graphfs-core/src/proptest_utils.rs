//! Property-based tests for graphfs-core types.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::hypergraph::{Hyperedge, Vertex, VertexDiff, VertexId, VertexTypeId};
    use crate::types::Value;

    // =========================================================================
    // Arbitrary Strategies
    // =========================================================================

    /// Strategy for generating Value instances that roundtrip through JSON.
    /// Uses integer-representable floats to avoid JSON precision issues.
    fn arb_value() -> impl Strategy<Value = Value> {
        prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::Int64),
            any::<i32>().prop_map(|i| Value::Float64(f64::from(i))),
            "[a-zA-Z0-9 ]{0,50}".prop_map(Value::String),
            prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::Binary),
            prop::collection::vec(any::<i16>(), 0..16)
                .prop_map(|v| Value::Vector(v.into_iter().map(f32::from).collect())),
            any::<i64>().prop_map(Value::Timestamp),
            any::<i32>().prop_map(Value::Date),
            (0i64..1000).prop_map(Value::BinaryRef),
        ]
    }

    fn arb_edge() -> impl Strategy<Value = Hyperedge> {
        (
            prop::collection::vec(1u64..1000, 0..5),
            prop::collection::btree_map("[a-z]{1,8}", arb_value(), 0..3),
        )
            .prop_map(|(targets, properties)| {
                let mut edge = Hyperedge::new();
                for (i, target) in targets.into_iter().enumerate() {
                    edge = edge.with_endpoint(VertexId::new(target), format!("role{i}"));
                }
                edge.properties = properties;
                edge
            })
    }

    fn arb_vertex() -> impl Strategy<Value = Vertex> {
        (
            1u64..10_000,
            0u64..8,
            prop::collection::btree_map("[a-z]{1,10}", arb_value(), 0..6),
            prop::collection::btree_map("[A-Z]{1,6}", arb_edge(), 0..3),
            proptest::option::of("[a-z ]{0,20}"),
        )
            .prop_map(|(id, ty, properties, edges, comment)| {
                let mut vertex = Vertex::with_id(VertexId::new(id), VertexTypeId(ty))
                    .with_properties(properties);
                vertex.edges = edges;
                vertex.comment = comment;
                vertex
            })
    }

    // =========================================================================
    // Property Tests
    // =========================================================================

    proptest! {
        /// Test that Value serialization roundtrips correctly.
        #[test]
        fn value_serde_roundtrip(value in arb_value()) {
            let serialized = serde_json::to_string(&value).unwrap();
            let deserialized: Value = serde_json::from_str(&serialized).unwrap();
            prop_assert_eq!(value, deserialized);
        }

        /// Test that Vertex serialization roundtrips correctly.
        #[test]
        fn vertex_serde_roundtrip(vertex in arb_vertex()) {
            let serialized = serde_json::to_string(&vertex).unwrap();
            let deserialized: Vertex = serde_json::from_str(&serialized).unwrap();
            prop_assert_eq!(vertex, deserialized);
        }

        /// Storage size is a pure function of content.
        #[test]
        fn storage_size_is_deterministic(vertex in arb_vertex()) {
            prop_assert_eq!(vertex.storage_size(), vertex.clone().storage_size());
            prop_assert!(vertex.storage_size() >= 32);
        }

        /// Applying the diff built from a vertex onto a bare vertex of the same
        /// id and type reproduces the original.
        #[test]
        fn full_diff_reproduces_vertex(vertex in arb_vertex()) {
            let bare = Vertex::with_id(vertex.id, vertex.vertex_type);
            let rebuilt = VertexDiff::from(vertex.clone()).apply_to(&bare);
            prop_assert_eq!(rebuilt, vertex);
        }

        /// A diff never touches properties it does not name.
        #[test]
        fn diff_preserves_unnamed_properties(
            vertex in arb_vertex(),
            key in "[A-Z]{1,8}",
            value in arb_value()
        ) {
            let updated = VertexDiff::new().set(key.clone(), value.clone()).apply_to(&vertex);
            for (k, v) in &vertex.properties {
                if *k != key {
                    prop_assert_eq!(updated.properties.get(k), Some(v));
                }
            }
            prop_assert_eq!(updated.properties.get(&key), Some(&value));
        }

        /// Test that Hyperedge arity is consistent with endpoints.
        #[test]
        fn hyperedge_involves_added_vertices(
            ids in prop::collection::vec(1u64..1000, 1..10)
        ) {
            let mut edge = Hyperedge::new();
            for &id in &ids {
                edge = edge.with_target(VertexId::new(id));
            }
            prop_assert_eq!(edge.arity(), ids.len());
            for &id in &ids {
                prop_assert!(edge.involves(VertexId::new(id)));
            }
        }
    }
}
