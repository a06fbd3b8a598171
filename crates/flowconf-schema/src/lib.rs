// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Config type schema registry and resolution for flowconf pipelines.
//!
//! A pipeline, its resources, and its loggers each describe the
//! configuration they accept as a graph of *config types*: scalars,
//! enums, lists, nullable wrappers, and composites whose named fields
//! reference other types (including themselves or their ancestors) by
//! stable key. This crate models that graph and resolves it without
//! infinite recursion or duplicated definitions.
//!
//! # Architecture
//!
//! ```text
//!   Raw JSON snapshot (__typename-discriminated)
//!            |
//!            v
//!   wire::RawConfigType         decode + convert
//!            |
//!            v
//!   ConfigTypeRegistry          flattened closure, key -> descriptor
//!            |
//!            v
//!   ResolvedSchema              validated, cycle-safe navigation
//! ```
//!
//! # Cycle safety
//!
//! Cross-references between types are stored as keys and dereferenced
//! through the registry, never embedded. A self-referential composite
//! occupies a single registry entry; navigation is one lazy lookup per
//! step, and bounded-depth traversal ([`ResolvedType::walk`]) is
//! available for consumers that need to unroll a recursive schema for
//! rendering.
//!
//! Schema-integrity failures (dangling references, key conflicts) reject
//! the whole snapshot at ingestion. A partially resolved schema is never
//! exposed.
//!
//! # Example
//!
//! ```rust
//! use flowconf_schema::{ConfigTypeDescriptor, ConfigTypeField, ResolvedSchema};
//!
//! let root = ConfigTypeDescriptor::selector(
//!     "Pipeline.StorageConfig",
//!     vec![
//!         ConfigTypeField::new("in_memory", "Bool"),
//!         ConfigTypeField::new("filesystem", "String"),
//!     ],
//! );
//! let closure = vec![
//!     ConfigTypeDescriptor::regular("Bool"),
//!     ConfigTypeDescriptor::regular("String"),
//! ];
//!
//! let schema = ResolvedSchema::from_root(root, closure).unwrap();
//! let fields = schema.root().fields().unwrap();
//! assert_eq!(fields[1].ty().key(), "String");
//! ```

pub mod descriptor;
pub mod errors;
pub mod registry;
pub mod resolver;
pub mod wire;

pub use descriptor::{
    ConfigTypeDescriptor, ConfigTypeField, ConfigTypeKey, ConfigTypeKind, EnumValue,
};
pub use errors::{SchemaError, WireError};
pub use registry::ConfigTypeRegistry;
pub use resolver::{validate_closure, ResolvedField, ResolvedSchema, ResolvedType};
pub use wire::{RawConfigType, RawConfigTypeField, RawEnumValue};
