// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Raw wire representation of schema snapshots.
//!
//! Snapshots arrive as JSON with a `__typename` discriminator on every
//! node and the flattened `recursiveConfigTypes` closure attached to the
//! root. This module decodes that shape and converts it into the typed
//! model.
//!
//! The discriminator set is closed:
//! `EnumConfigType | ListConfigType | NullableConfigType |
//! CompositeConfigType | RegularConfigType`. The wire may tag a
//! composite-shaped payload with another union member, so any payload
//! carrying a `fields` array is handled as a composite; unknown
//! discriminators are rejected outright rather than downgraded.

use serde::Deserialize;

use crate::descriptor::{
    ConfigTypeDescriptor, ConfigTypeField, ConfigTypeKind, EnumValue,
};
use crate::errors::WireError;
use crate::resolver::ResolvedSchema;

const TYPENAME_ENUM: &str = "EnumConfigType";
const TYPENAME_LIST: &str = "ListConfigType";
const TYPENAME_NULLABLE: &str = "NullableConfigType";
const TYPENAME_COMPOSITE: &str = "CompositeConfigType";
const TYPENAME_REGULAR: &str = "RegularConfigType";

// ---------------------------------------------------------------------------
// Raw wire types
// ---------------------------------------------------------------------------

/// One config type node as delivered on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfigType {
    /// Variant discriminator.
    #[serde(rename = "__typename")]
    pub typename: String,
    /// Stable key within the snapshot.
    pub key: String,
    /// Optional human label.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether exactly one field must be chosen (composites only).
    #[serde(default)]
    pub is_selector: bool,
    /// Ordered type arguments.
    #[serde(default)]
    pub type_param_keys: Vec<String>,
    /// Present on composite-shaped payloads.
    #[serde(default)]
    pub fields: Option<Vec<RawConfigTypeField>>,
    /// Present on enum payloads.
    #[serde(default)]
    pub values: Option<Vec<RawEnumValue>>,
    /// Present on regular (scalar) payloads.
    #[serde(default)]
    pub given_name: Option<String>,
    /// Flattened closure of reachable types; populated on the root node.
    #[serde(default)]
    pub recursive_config_types: Vec<RawConfigType>,
}

/// One composite field as delivered on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConfigTypeField {
    /// Field name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the field may be omitted.
    #[serde(default)]
    pub is_optional: bool,
    /// Key of the field's type.
    pub config_type_key: String,
    /// JSON-encoded default value, if declared.
    #[serde(default)]
    pub default_value_as_json: Option<String>,
}

/// One enum value as delivered on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnumValue {
    /// Literal value.
    pub value: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Raw -> typed conversion
// ---------------------------------------------------------------------------

impl RawConfigType {
    /// Split a snapshot root into its descriptor and flattened closure.
    ///
    /// Closure lists attached to nested nodes are flattened in as well,
    /// so producers that nest closures instead of attaching one flat list
    /// at the root still ingest correctly.
    pub fn into_parts(
        mut self,
    ) -> Result<(ConfigTypeDescriptor, Vec<ConfigTypeDescriptor>), WireError> {
        let members = std::mem::take(&mut self.recursive_config_types);
        let mut closure = Vec::with_capacity(members.len());
        for member in members {
            let (descriptor, nested) = member.into_parts()?;
            closure.push(descriptor);
            closure.extend(nested);
        }
        let root = self.into_descriptor()?;
        Ok((root, closure))
    }

    /// Convert one raw node into a typed descriptor.
    ///
    /// Any attached closure list is ignored here; snapshot roots go
    /// through [`RawConfigType::into_parts`] instead.
    pub fn into_descriptor(self) -> Result<ConfigTypeDescriptor, WireError> {
        let kind = if let Some(fields) = self.fields {
            // Composite-shaped payload, whichever union member the wire
            // reported.
            ConfigTypeKind::Composite {
                fields: fields.into_iter().map(RawConfigTypeField::into_field).collect(),
            }
        } else {
            match self.typename.as_str() {
                TYPENAME_ENUM => ConfigTypeKind::Enum {
                    values: self
                        .values
                        .unwrap_or_default()
                        .into_iter()
                        .map(RawEnumValue::into_value)
                        .collect(),
                },
                TYPENAME_LIST => ConfigTypeKind::List,
                TYPENAME_NULLABLE => ConfigTypeKind::Nullable,
                TYPENAME_COMPOSITE => ConfigTypeKind::Composite { fields: Vec::new() },
                TYPENAME_REGULAR => ConfigTypeKind::Regular {
                    given_name: self.given_name,
                },
                other => return Err(WireError::UnknownTypename(other.to_string())),
            }
        };

        Ok(ConfigTypeDescriptor {
            key: self.key,
            name: self.name,
            description: self.description,
            is_selector: self.is_selector,
            type_param_keys: self.type_param_keys,
            kind,
        })
    }
}

impl RawConfigTypeField {
    fn into_field(self) -> ConfigTypeField {
        ConfigTypeField {
            name: self.name,
            description: self.description,
            is_optional: self.is_optional,
            config_type_key: self.config_type_key,
            default_value_json: self.default_value_as_json,
        }
    }
}

impl RawEnumValue {
    fn into_value(self) -> EnumValue {
        EnumValue {
            value: self.value,
            description: self.description,
        }
    }
}

// ---------------------------------------------------------------------------
// ResolvedSchema ingestion entry points
// ---------------------------------------------------------------------------

impl ResolvedSchema {
    /// Decode a JSON snapshot and resolve it.
    pub fn from_json_str(json: &str) -> Result<Self, WireError> {
        let raw: RawConfigType = serde_json::from_str(json)?;
        Self::from_raw(raw)
    }

    /// Decode an already-parsed JSON snapshot and resolve it.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, WireError> {
        let raw: RawConfigType = serde_json::from_value(value)?;
        Self::from_raw(raw)
    }

    /// Resolve an already-decoded raw snapshot.
    pub fn from_raw(raw: RawConfigType) -> Result<Self, WireError> {
        let (root, closure) = raw.into_parts()?;
        log::debug!(
            "ingesting config schema snapshot: root={} closure={}",
            root.key,
            closure.len()
        );
        Ok(Self::from_root(root, closure)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SchemaError;
    use serde_json::json;

    fn pipeline_snapshot() -> serde_json::Value {
        json!({
            "__typename": "CompositeConfigType",
            "key": "Pipeline.Config",
            "name": "PipelineConfig",
            "isSelector": false,
            "typeParamKeys": [],
            "fields": [
                {
                    "name": "storage",
                    "isOptional": true,
                    "configTypeKey": "Storage.Selector",
                    "defaultValueAsJson": "{\"in_memory\": {}}"
                },
                {
                    "name": "retries",
                    "isOptional": false,
                    "configTypeKey": "Int.List"
                }
            ],
            "recursiveConfigTypes": [
                {
                    "__typename": "CompositeConfigType",
                    "key": "Storage.Selector",
                    "isSelector": true,
                    "fields": [
                        { "name": "in_memory", "isOptional": true, "configTypeKey": "Bool" },
                        { "name": "filesystem", "isOptional": true, "configTypeKey": "String" }
                    ]
                },
                {
                    "__typename": "ListConfigType",
                    "key": "Int.List",
                    "typeParamKeys": ["Int"]
                },
                { "__typename": "RegularConfigType", "key": "Int", "givenName": "Int" },
                { "__typename": "RegularConfigType", "key": "Bool", "givenName": "Bool" },
                { "__typename": "RegularConfigType", "key": "String", "givenName": "String" }
            ]
        })
    }

    #[test]
    fn decode_and_resolve_realistic_snapshot() {
        let schema = ResolvedSchema::from_json_value(pipeline_snapshot()).unwrap();

        assert_eq!(schema.root_key(), "Pipeline.Config");
        assert_eq!(schema.registry().len(), 6);

        let fields = schema.root().fields().unwrap();
        assert_eq!(fields.len(), 2);

        let storage = fields[0];
        assert!(storage.field().is_optional);
        assert_eq!(
            storage.field().default_value_json.as_deref(),
            Some("{\"in_memory\": {}}")
        );
        assert!(storage.ty().descriptor().is_selector);

        let retries = fields[1];
        let element = retries.ty().element_type().unwrap().unwrap();
        assert_eq!(element.key(), "Int");
        assert_eq!(
            element.kind(),
            &ConfigTypeKind::Regular {
                given_name: Some("Int".to_string())
            }
        );
    }

    #[test]
    fn fields_array_wins_over_reported_union_member() {
        let schema = ResolvedSchema::from_json_value(json!({
            "__typename": "RegularConfigType",
            "key": "Shaped",
            "fields": [
                { "name": "n", "configTypeKey": "Shaped" }
            ]
        }))
        .unwrap();

        let fields = schema.root().fields().unwrap();
        assert_eq!(fields[0].name(), "n");
        assert_eq!(fields[0].ty().key(), "Shaped");
    }

    #[test]
    fn unknown_typename_is_rejected() {
        let err = ResolvedSchema::from_json_value(json!({
            "__typename": "MapConfigType",
            "key": "Weird"
        }))
        .unwrap_err();

        match err {
            WireError::UnknownTypename(name) => assert_eq!(name, "MapConfigType"),
            other => panic!("expected UnknownTypename, got {:?}", other),
        }
    }

    #[test]
    fn dangling_reference_fails_closure_validation() {
        let err = ResolvedSchema::from_json_value(json!({
            "__typename": "ListConfigType",
            "key": "Int.List",
            "typeParamKeys": ["Int"],
            "recursiveConfigTypes": []
        }))
        .unwrap_err();

        match err {
            WireError::Schema(SchemaError::IncompleteClosure {
                missing,
                referenced_by,
            }) => {
                assert_eq!(missing, "Int");
                assert_eq!(referenced_by, "Int.List");
            }
            other => panic!("expected IncompleteClosure, got {:?}", other),
        }
    }

    #[test]
    fn enum_values_survive_ingestion() {
        let schema = ResolvedSchema::from_json_value(json!({
            "__typename": "EnumConfigType",
            "key": "LogLevel",
            "values": [
                { "value": "DEBUG" },
                { "value": "INFO", "description": "default verbosity" }
            ]
        }))
        .unwrap();

        let values = schema.root().descriptor().enum_values().unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0].value, "DEBUG");
        assert_eq!(values[1].description.as_deref(), Some("default verbosity"));
    }

    #[test]
    fn nested_closure_lists_are_flattened() {
        let schema = ResolvedSchema::from_json_value(json!({
            "__typename": "CompositeConfigType",
            "key": "Outer",
            "fields": [ { "name": "inner", "configTypeKey": "Inner" } ],
            "recursiveConfigTypes": [
                {
                    "__typename": "CompositeConfigType",
                    "key": "Inner",
                    "fields": [ { "name": "n", "configTypeKey": "Int" } ],
                    "recursiveConfigTypes": [
                        { "__typename": "RegularConfigType", "key": "Int" }
                    ]
                }
            ]
        }))
        .unwrap();

        assert_eq!(schema.registry().len(), 3);
        assert!(schema.registry().resolve("Int").is_ok());
    }

    #[test]
    fn nullable_wire_node_resolves_wrapped_type() {
        let schema = ResolvedSchema::from_json_value(json!({
            "__typename": "NullableConfigType",
            "key": "String.Nullable",
            "typeParamKeys": ["String"],
            "recursiveConfigTypes": [
                { "__typename": "RegularConfigType", "key": "String", "givenName": "String" }
            ]
        }))
        .unwrap();

        let wrapped = schema.root().wrapped_type().unwrap().unwrap();
        assert_eq!(wrapped.key(), "String");
    }
}
