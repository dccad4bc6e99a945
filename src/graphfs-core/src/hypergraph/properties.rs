//! Property storage for graph elements.
//!
//! This module provides the `PropertyMap` type and `HasProperties` trait
//! for managing key-value properties on vertices and hyperedges.

use std::collections::BTreeMap;

use crate::types::Value;

use super::identifiers::BinaryPropertyId;

/// Map of property names to values, ordered by key.
pub type PropertyMap = BTreeMap<String, Value>;

/// Trait for elements that have properties.
pub trait HasProperties {
    /// Get the property map.
    fn properties(&self) -> &PropertyMap;

    /// Get a mutable reference to the property map.
    fn properties_mut(&mut self) -> &mut PropertyMap;

    /// Get a property value by name.
    fn get_property(&self, name: &str) -> Option<&Value> {
        self.properties().get(name)
    }

    /// Set a property value.
    fn set_property(&mut self, name: impl Into<String>, value: Value) {
        self.properties_mut().insert(name.into(), value);
    }

    /// Remove a property.
    fn remove_property(&mut self, name: &str) -> Option<Value> {
        self.properties_mut().remove(name)
    }

    /// Check if a property exists.
    fn has_property(&self, name: &str) -> bool {
        self.properties().contains_key(name)
    }
}

/// Approximate storage footprint of a property map.
pub(crate) fn property_map_size(properties: &PropertyMap) -> u64 {
    properties
        .iter()
        .map(|(k, v)| k.len() as u64 + v.storage_size())
        .sum()
}

/// Append every binary property id referenced by the map.
pub(crate) fn collect_property_binary_refs(properties: &PropertyMap, out: &mut Vec<BinaryPropertyId>) {
    for value in properties.values() {
        value.collect_binary_refs(out);
    }
}
