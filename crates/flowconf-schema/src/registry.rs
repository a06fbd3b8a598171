// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Keyed store of config type descriptors for one schema snapshot.

use std::collections::HashMap;

use crate::descriptor::{ConfigTypeDescriptor, ConfigTypeKey};
use crate::errors::SchemaError;

// ---------------------------------------------------------------------------
// ConfigTypeRegistry
// ---------------------------------------------------------------------------

/// In-memory store of config type descriptors keyed by [`ConfigTypeKey`].
///
/// The registry is the cycle-breaking device: cross-references between
/// types are stored as keys and dereferenced here, so a self-referential
/// composite occupies a single entry instead of unrolling indefinitely.
///
/// Once a snapshot is fully ingested the registry is never mutated again;
/// concurrent readers may share it behind an `Arc` without coordination.
#[derive(Debug, Default)]
pub struct ConfigTypeRegistry {
    types: HashMap<ConfigTypeKey, ConfigTypeDescriptor>,
}

impl ConfigTypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a descriptor under its key.
    ///
    /// Re-inserting a structurally identical descriptor is a no-op. A
    /// different descriptor under an existing key fails with
    /// [`SchemaError::DuplicateKeyConflict`]: within one snapshot the same
    /// key must always describe the same type.
    pub fn insert(&mut self, descriptor: ConfigTypeDescriptor) -> Result<(), SchemaError> {
        if let Some(existing) = self.types.get(&descriptor.key) {
            if *existing == descriptor {
                return Ok(());
            }
            return Err(SchemaError::DuplicateKeyConflict {
                key: descriptor.key,
            });
        }
        self.types.insert(descriptor.key.clone(), descriptor);
        Ok(())
    }

    /// Look up a descriptor by key.
    ///
    /// A miss means a reference escaped the snapshot's closure; callers
    /// must treat it as a hard schema-integrity error, never as an
    /// absent/optional type.
    pub fn resolve(&self, key: &str) -> Result<&ConfigTypeDescriptor, SchemaError> {
        self.types.get(key).ok_or_else(|| SchemaError::UnknownKey {
            key: key.to_string(),
        })
    }

    /// Non-erroring lookup for callers probing presence.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigTypeDescriptor> {
        self.types.get(key)
    }

    /// Check whether a key is registered.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.types.contains_key(key)
    }

    /// All registered descriptors, sorted by key for determinism.
    #[must_use]
    pub fn snapshot(&self) -> Vec<&ConfigTypeDescriptor> {
        let mut all: Vec<&ConfigTypeDescriptor> = self.types.values().collect();
        all.sort_by(|a, b| a.key.cmp(&b.key));
        all
    }

    /// All registered keys (sorted).
    #[must_use]
    pub fn keys(&self) -> Vec<ConfigTypeKey> {
        let mut keys: Vec<ConfigTypeKey> = self.types.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of registered descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no descriptors are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ConfigTypeField;

    #[test]
    fn insert_and_resolve() {
        let mut registry = ConfigTypeRegistry::new();
        registry.insert(ConfigTypeDescriptor::regular("Int")).unwrap();

        let desc = registry.resolve("Int").unwrap();
        assert_eq!(desc.key, "Int");
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    fn unknown_key_is_an_error() {
        let registry = ConfigTypeRegistry::new();
        let err = registry.resolve("Missing").unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownKey {
                key: "Missing".to_string()
            }
        );
        assert!(registry.get("Missing").is_none());
    }

    #[test]
    fn reinserting_identical_descriptor_is_a_noop() {
        let mut registry = ConfigTypeRegistry::new();
        let desc = ConfigTypeDescriptor::composite(
            "Storage",
            vec![ConfigTypeField::new("path", "String")],
        );

        registry.insert(desc.clone()).unwrap();
        registry.insert(desc).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn incompatible_shape_under_same_key_conflicts() {
        let mut registry = ConfigTypeRegistry::new();
        let fields = vec![ConfigTypeField::new("path", "String")];
        registry
            .insert(ConfigTypeDescriptor::composite("Storage", fields.clone()))
            .unwrap();

        let err = registry
            .insert(ConfigTypeDescriptor::selector("Storage", fields))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateKeyConflict {
                key: "Storage".to_string()
            }
        );
        // The original registration is untouched.
        assert!(!registry.resolve("Storage").unwrap().is_selector);
    }

    #[test]
    fn snapshot_is_sorted_by_key() {
        let mut registry = ConfigTypeRegistry::new();
        registry.insert(ConfigTypeDescriptor::regular("Zeta")).unwrap();
        registry.insert(ConfigTypeDescriptor::regular("Alpha")).unwrap();
        registry.insert(ConfigTypeDescriptor::regular("Mid")).unwrap();

        let keys: Vec<&str> = registry.snapshot().iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["Alpha", "Mid", "Zeta"]);
        assert_eq!(registry.keys(), vec!["Alpha", "Mid", "Zeta"]);
    }
}
