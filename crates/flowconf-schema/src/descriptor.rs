// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Config type descriptors for pipeline configuration schemas.
//!
//! A descriptor is one node of the type graph describing the configuration
//! a pipeline, resource, or logger accepts. Nodes never embed each other:
//! every cross-reference is a [`ConfigTypeKey`] dereferenced through the
//! registry, which is what keeps self-referential schemas finite.

use serde::{Deserialize, Serialize};

/// Stable identifier referencing a config type within one schema snapshot.
///
/// Keys are opaque and unique within a snapshot. They are the only
/// mechanism for referencing a type without embedding its definition.
/// Two descriptors with the same key are interchangeable within that
/// snapshot; a new snapshot produces an entirely new key space.
pub type ConfigTypeKey = String;

// ---------------------------------------------------------------------------
// EnumValue
// ---------------------------------------------------------------------------

/// One admissible value of an enum config type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    /// Literal value as it appears in configuration.
    pub value: String,
    /// Optional human-readable description.
    pub description: Option<String>,
}

impl EnumValue {
    /// Create an enum value without a description.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            description: None,
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ---------------------------------------------------------------------------
// ConfigTypeField
// ---------------------------------------------------------------------------

/// Named member of a composite config type.
///
/// The field's type is referenced by key, never embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigTypeField {
    /// Field name.
    pub name: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Whether the field may be omitted from configuration.
    pub is_optional: bool,
    /// Key of the field's type, resolved via the registry.
    pub config_type_key: ConfigTypeKey,
    /// JSON-encoded default value, if the field declares one.
    pub default_value_json: Option<String>,
}

impl ConfigTypeField {
    /// Create a required field referencing its type by key.
    pub fn new(name: impl Into<String>, config_type_key: impl Into<ConfigTypeKey>) -> Self {
        Self {
            name: name.into(),
            description: None,
            is_optional: false,
            config_type_key: config_type_key.into(),
            default_value_json: None,
        }
    }

    /// Mark the field as omittable.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach a JSON-encoded default value.
    #[must_use]
    pub fn with_default_json(mut self, default_value_json: impl Into<String>) -> Self {
        self.default_value_json = Some(default_value_json.into());
        self
    }
}

// ---------------------------------------------------------------------------
// ConfigTypeKind
// ---------------------------------------------------------------------------

/// Closed set of config type shapes.
///
/// The variant set is fixed by the producing system; every consumption
/// site dispatches exhaustively, so adding a variant is a deliberate
/// breaking change surfaced at each of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigTypeKind {
    /// Closed set of admissible scalar values.
    Enum {
        /// Admissible values in declared order.
        values: Vec<EnumValue>,
    },
    /// Homogeneous list; the element type is `type_param_keys[0]`.
    List,
    /// Optional wrapper; the wrapped type is `type_param_keys[0]`.
    Nullable,
    /// Record with named fields, each referencing its type by key.
    Composite {
        /// Fields in declared order.
        fields: Vec<ConfigTypeField>,
    },
    /// Regular scalar type (Int, String, Float, Bool, ...).
    Regular {
        /// Name the producing system assigned to the scalar, if any.
        given_name: Option<String>,
    },
}

// ---------------------------------------------------------------------------
// ConfigTypeDescriptor
// ---------------------------------------------------------------------------

/// A complete config type descriptor.
///
/// Descriptors are immutable once a snapshot is built; concurrent readers
/// share them freely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigTypeDescriptor {
    /// Stable key, unique within one schema snapshot.
    pub key: ConfigTypeKey,
    /// Optional human label.
    pub name: Option<String>,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Whether exactly one of a composite's fields must be chosen.
    pub is_selector: bool,
    /// Ordered type arguments (element type of a list, wrapped type of a
    /// nullable).
    pub type_param_keys: Vec<ConfigTypeKey>,
    /// Shape of the type.
    pub kind: ConfigTypeKind,
}

impl ConfigTypeDescriptor {
    /// Create a descriptor with the given key and kind.
    pub fn new(key: impl Into<ConfigTypeKey>, kind: ConfigTypeKind) -> Self {
        Self {
            key: key.into(),
            name: None,
            description: None,
            is_selector: false,
            type_param_keys: Vec::new(),
            kind,
        }
    }

    /// Create a regular scalar descriptor.
    pub fn regular(key: impl Into<ConfigTypeKey>) -> Self {
        Self::new(key, ConfigTypeKind::Regular { given_name: None })
    }

    /// Create an enum descriptor from its admissible values.
    pub fn enum_type(key: impl Into<ConfigTypeKey>, values: Vec<EnumValue>) -> Self {
        Self::new(key, ConfigTypeKind::Enum { values })
    }

    /// Create a list descriptor; the element type is its first type param.
    pub fn list(key: impl Into<ConfigTypeKey>, element_key: impl Into<ConfigTypeKey>) -> Self {
        let mut descriptor = Self::new(key, ConfigTypeKind::List);
        descriptor.type_param_keys.push(element_key.into());
        descriptor
    }

    /// Create a nullable descriptor; the wrapped type is its first type param.
    pub fn nullable(key: impl Into<ConfigTypeKey>, inner_key: impl Into<ConfigTypeKey>) -> Self {
        let mut descriptor = Self::new(key, ConfigTypeKind::Nullable);
        descriptor.type_param_keys.push(inner_key.into());
        descriptor
    }

    /// Create a composite descriptor from its fields.
    pub fn composite(key: impl Into<ConfigTypeKey>, fields: Vec<ConfigTypeField>) -> Self {
        Self::new(key, ConfigTypeKind::Composite { fields })
    }

    /// Create a selector: a composite where exactly one field must be chosen.
    pub fn selector(key: impl Into<ConfigTypeKey>, fields: Vec<ConfigTypeField>) -> Self {
        let mut descriptor = Self::composite(key, fields);
        descriptor.is_selector = true;
        descriptor
    }

    /// Attach a human label.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach the scalar name assigned by the producing system.
    ///
    /// No-op for non-regular descriptors.
    #[must_use]
    pub fn with_given_name(mut self, name: impl Into<String>) -> Self {
        if let ConfigTypeKind::Regular { given_name } = &mut self.kind {
            *given_name = Some(name.into());
        }
        self
    }

    /// Check if this is a composite type.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        matches!(self.kind, ConfigTypeKind::Composite { .. })
    }

    /// Get fields if this is a composite.
    #[must_use]
    pub fn fields(&self) -> Option<&[ConfigTypeField]> {
        match &self.kind {
            ConfigTypeKind::Composite { fields } => Some(fields),
            _ => None,
        }
    }

    /// Get a composite field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&ConfigTypeField> {
        self.fields()?.iter().find(|f| f.name == name)
    }

    /// Get admissible values if this is an enum.
    #[must_use]
    pub fn enum_values(&self) -> Option<&[EnumValue]> {
        match &self.kind {
            ConfigTypeKind::Enum { values } => Some(values),
            _ => None,
        }
    }

    /// Short label for the variant, used in logs and rendering.
    #[must_use]
    pub fn kind_label(&self) -> &'static str {
        match &self.kind {
            ConfigTypeKind::Enum { .. } => "enum",
            ConfigTypeKind::List => "list",
            ConfigTypeKind::Nullable => "nullable",
            ConfigTypeKind::Composite { .. } => "composite",
            ConfigTypeKind::Regular { .. } => "regular",
        }
    }

    /// Every key this descriptor references: type params in declared
    /// order, then field types in declared order.
    ///
    /// This is the reference surface closure validation must cover; a key
    /// outside it cannot be reached from this descriptor.
    pub fn referenced_keys(&self) -> impl Iterator<Item = &ConfigTypeKey> + '_ {
        let field_keys = match &self.kind {
            ConfigTypeKind::Composite { fields } => fields.as_slice(),
            _ => &[],
        };
        self.type_param_keys
            .iter()
            .chain(field_keys.iter().map(|f| &f.config_type_key))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_descriptor() {
        let desc = ConfigTypeDescriptor::regular("Int").with_given_name("Int");
        assert_eq!(desc.key, "Int");
        assert!(!desc.is_composite());
        assert!(desc.fields().is_none());
        assert_eq!(
            desc.kind,
            ConfigTypeKind::Regular {
                given_name: Some("Int".to_string())
            }
        );
    }

    #[test]
    fn composite_field_access() {
        let desc = ConfigTypeDescriptor::composite(
            "Solid.Config",
            vec![
                ConfigTypeField::new("path", "String"),
                ConfigTypeField::new("retries", "Int").optional(),
            ],
        );

        assert!(desc.is_composite());
        assert_eq!(desc.fields().map(|f| f.len()), Some(2));
        assert_eq!(desc.field("path").map(|f| f.config_type_key.as_str()), Some("String"));
        assert!(desc.field("missing").is_none());
        assert!(desc.field("retries").is_some_and(|f| f.is_optional));
    }

    #[test]
    fn selector_sets_flag() {
        let desc = ConfigTypeDescriptor::selector(
            "Storage",
            vec![ConfigTypeField::new("in_memory", "Bool")],
        );
        assert!(desc.is_selector);
        assert!(desc.is_composite());
    }

    #[test]
    fn list_and_nullable_type_params() {
        let list = ConfigTypeDescriptor::list("Int.List", "Int");
        assert_eq!(list.type_param_keys, vec!["Int".to_string()]);

        let nullable = ConfigTypeDescriptor::nullable("String.Nullable", "String");
        assert_eq!(nullable.type_param_keys, vec!["String".to_string()]);
    }

    #[test]
    fn enum_values_accessor() {
        let desc = ConfigTypeDescriptor::enum_type(
            "LogLevel",
            vec![
                EnumValue::new("DEBUG"),
                EnumValue::new("INFO").with_description("default verbosity"),
            ],
        );
        let values = desc.enum_values().unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[1].description.as_deref(), Some("default verbosity"));
    }

    #[test]
    fn referenced_keys_order() {
        let mut desc = ConfigTypeDescriptor::composite(
            "Outer",
            vec![
                ConfigTypeField::new("a", "Int"),
                ConfigTypeField::new("b", "String"),
            ],
        );
        desc.type_param_keys.push("Param".to_string());

        let keys: Vec<&str> = desc.referenced_keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["Param", "Int", "String"]);
    }

    #[test]
    fn referenced_keys_empty_for_scalars() {
        let desc = ConfigTypeDescriptor::regular("Bool");
        assert_eq!(desc.referenced_keys().count(), 0);
    }

    #[test]
    fn kind_labels() {
        assert_eq!(ConfigTypeDescriptor::regular("Int").kind_label(), "regular");
        assert_eq!(ConfigTypeDescriptor::list("L", "Int").kind_label(), "list");
        assert_eq!(ConfigTypeDescriptor::nullable("N", "Int").kind_label(), "nullable");
        assert_eq!(ConfigTypeDescriptor::composite("C", Vec::new()).kind_label(), "composite");
        assert_eq!(ConfigTypeDescriptor::enum_type("E", Vec::new()).kind_label(), "enum");
    }
}
