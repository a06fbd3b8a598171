// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cycle-safe resolution of config type schemas.
//!
//! A schema snapshot arrives as a root descriptor plus the flattened
//! closure of every type transitively reachable from it. The resolver
//! seeds a [`ConfigTypeRegistry`] from that closure, validates closure
//! completeness once, and then exposes a read-only view where every
//! cross-reference is an O(1) by-key lookup. Cyclic schemas resolve in
//! O(distinct keys); navigation never eagerly unrolls a recursive type.
//!
//! Consumers that need to unroll a recursive schema (e.g. to render a
//! form) drive [`ResolvedType::walk`] with an explicit depth bound; the
//! resolver itself never performs unbounded descent.

use std::collections::{HashSet, VecDeque};

use crate::descriptor::{ConfigTypeDescriptor, ConfigTypeField, ConfigTypeKey, ConfigTypeKind};
use crate::errors::SchemaError;
use crate::registry::ConfigTypeRegistry;

// ---------------------------------------------------------------------------
// Closure validation
// ---------------------------------------------------------------------------

/// Confirm that every reference held by every registered descriptor
/// resolves within the registry.
///
/// Self-references are trivially satisfied, the referencing descriptor
/// being registered itself. The check is a single pass over the registry,
/// so reference cycles cannot make it loop.
pub fn validate_closure(registry: &ConfigTypeRegistry) -> Result<(), SchemaError> {
    for descriptor in registry.snapshot() {
        for key in descriptor.referenced_keys() {
            if !registry.contains_key(key) {
                return Err(SchemaError::IncompleteClosure {
                    missing: key.clone(),
                    referenced_by: descriptor.key.clone(),
                });
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// ResolvedSchema
// ---------------------------------------------------------------------------

/// A fully validated schema snapshot with a designated root type.
///
/// Construction is all-or-nothing: any dangling reference or key conflict
/// rejects the whole snapshot (partially resolving a schema would let a
/// consumer silently treat an unresolved type as absent). After
/// construction the snapshot is immutable and safe to share across
/// threads behind an `Arc`.
#[derive(Debug)]
pub struct ResolvedSchema {
    registry: ConfigTypeRegistry,
    root: ConfigTypeDescriptor,
}

impl ResolvedSchema {
    /// Build a schema from a root descriptor and its flattened closure.
    ///
    /// Every closure member is inserted first, then the root itself.
    /// Inserts are idempotent, so the root may also appear in its own
    /// closure list.
    pub fn from_root(
        root: ConfigTypeDescriptor,
        closure: Vec<ConfigTypeDescriptor>,
    ) -> Result<Self, SchemaError> {
        let mut registry = ConfigTypeRegistry::new();
        for descriptor in closure {
            registry.insert(descriptor)?;
        }
        let root_key = root.key.clone();
        registry.insert(root)?;
        Self::from_registry(root_key, registry)
    }

    /// Build a schema view over an existing registry.
    ///
    /// The root key must resolve and the registry's closure must be
    /// complete; the registry is adopted as-is otherwise.
    pub fn from_registry(
        root_key: impl Into<ConfigTypeKey>,
        registry: ConfigTypeRegistry,
    ) -> Result<Self, SchemaError> {
        let root_key = root_key.into();
        let root = registry.resolve(&root_key)?.clone();
        validate_closure(&registry)?;
        log::debug!(
            "resolved config schema: root={} kind={} types={}",
            root_key,
            root.kind_label(),
            registry.len()
        );
        Ok(Self { registry, root })
    }

    /// Key of the root type.
    #[must_use]
    pub fn root_key(&self) -> &str {
        &self.root.key
    }

    /// The underlying registry.
    #[must_use]
    pub fn registry(&self) -> &ConfigTypeRegistry {
        &self.registry
    }

    /// Resolved view of the root type.
    #[must_use]
    pub fn root(&self) -> ResolvedType<'_> {
        ResolvedType::new(&self.registry, &self.root)
    }

    /// Resolved view of any type in the snapshot.
    pub fn resolve(&self, key: &str) -> Result<ResolvedType<'_>, SchemaError> {
        Ok(ResolvedType::new(&self.registry, self.registry.resolve(key)?))
    }

    /// Bounded-depth traversal from the root; see [`ResolvedType::walk`].
    pub fn walk<F>(&self, max_depth: usize, visit: F) -> Result<(), SchemaError>
    where
        F: FnMut(usize, ResolvedType<'_>),
    {
        self.root().walk(max_depth, visit)
    }
}

// ---------------------------------------------------------------------------
// ResolvedType
// ---------------------------------------------------------------------------

/// Read-only view pairing a descriptor with the registry that
/// dereferences its type references.
///
/// Navigation is lazy: each step is one registry lookup, so a
/// self-referential composite can be traversed indefinitely without
/// stack growth or duplicated definitions.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedType<'a> {
    registry: &'a ConfigTypeRegistry,
    descriptor: &'a ConfigTypeDescriptor,
}

impl<'a> ResolvedType<'a> {
    fn new(registry: &'a ConfigTypeRegistry, descriptor: &'a ConfigTypeDescriptor) -> Self {
        Self {
            registry,
            descriptor,
        }
    }

    /// The underlying descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &'a ConfigTypeDescriptor {
        self.descriptor
    }

    /// Key of this type.
    #[must_use]
    pub fn key(&self) -> &'a str {
        &self.descriptor.key
    }

    /// Shape of this type.
    #[must_use]
    pub fn kind(&self) -> &'a ConfigTypeKind {
        &self.descriptor.kind
    }

    /// Resolved fields of a composite; empty for every other variant.
    pub fn fields(&self) -> Result<Vec<ResolvedField<'a>>, SchemaError> {
        match &self.descriptor.kind {
            ConfigTypeKind::Composite { fields } => fields
                .iter()
                .map(|field| {
                    let ty = ResolvedType::new(
                        self.registry,
                        self.registry.resolve(&field.config_type_key)?,
                    );
                    Ok(ResolvedField { field, ty })
                })
                .collect(),
            _ => Ok(Vec::new()),
        }
    }

    /// Resolve all type parameters in declared order.
    pub fn type_params(&self) -> Result<Vec<ResolvedType<'a>>, SchemaError> {
        self.descriptor
            .type_param_keys
            .iter()
            .map(|key| Ok(ResolvedType::new(self.registry, self.registry.resolve(key)?)))
            .collect()
    }

    /// Element type of a list; `Ok(None)` for other variants.
    pub fn element_type(&self) -> Result<Option<ResolvedType<'a>>, SchemaError> {
        match self.descriptor.kind {
            ConfigTypeKind::List => self.first_type_param(),
            _ => Ok(None),
        }
    }

    /// Wrapped type of a nullable; `Ok(None)` for other variants.
    pub fn wrapped_type(&self) -> Result<Option<ResolvedType<'a>>, SchemaError> {
        match self.descriptor.kind {
            ConfigTypeKind::Nullable => self.first_type_param(),
            _ => Ok(None),
        }
    }

    fn first_type_param(&self) -> Result<Option<ResolvedType<'a>>, SchemaError> {
        match self.descriptor.type_param_keys.first() {
            Some(key) => Ok(Some(ResolvedType::new(
                self.registry,
                self.registry.resolve(key)?,
            ))),
            None => Ok(None),
        }
    }

    /// Visit every type reachable from this one, breadth-first, up to
    /// `max_depth` reference hops (depth 0 is this type itself).
    ///
    /// Referenced types are deduplicated per depth level, so a recursive
    /// type reappears once per level until the bound is reached: the
    /// unrolling a print/render consumer needs, with work bounded by
    /// `max_depth * distinct keys` even on cyclic schemas.
    pub fn walk<F>(&self, max_depth: usize, mut visit: F) -> Result<(), SchemaError>
    where
        F: FnMut(usize, ResolvedType<'a>),
    {
        let mut queue: VecDeque<(usize, ResolvedType<'a>)> = VecDeque::new();
        let mut seen: HashSet<(usize, &'a str)> = HashSet::new();
        seen.insert((0, self.key()));
        queue.push_back((0, *self));

        while let Some((depth, ty)) = queue.pop_front() {
            visit(depth, ty);
            if depth == max_depth {
                continue;
            }
            for key in ty.descriptor.referenced_keys() {
                if seen.insert((depth + 1, key.as_str())) {
                    queue.push_back((
                        depth + 1,
                        ResolvedType::new(self.registry, self.registry.resolve(key)?),
                    ));
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ResolvedField
// ---------------------------------------------------------------------------

/// A composite field together with its resolved type.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedField<'a> {
    field: &'a ConfigTypeField,
    ty: ResolvedType<'a>,
}

impl<'a> ResolvedField<'a> {
    /// Field name.
    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.field.name
    }

    /// The underlying field declaration.
    #[must_use]
    pub fn field(&self) -> &'a ConfigTypeField {
        self.field
    }

    /// Resolved type of the field.
    #[must_use]
    pub fn ty(&self) -> ResolvedType<'a> {
        self.ty
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
