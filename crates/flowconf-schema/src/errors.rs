// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for schema registry, resolution, and wire ingestion.
//!
//! [`SchemaError`] covers schema-integrity failures; [`WireError`] wraps
//! it with the ingestion-level concerns (malformed JSON, unknown
//! discriminator).

use std::fmt;

use crate::descriptor::ConfigTypeKey;

// ---------------------------------------------------------------------------
// SchemaError
// ---------------------------------------------------------------------------

/// Schema-integrity failures.
///
/// Every variant indicates a malformed snapshot from the producing system.
/// None are retryable without re-fetching the snapshot, and none may be
/// downgraded to a default or empty type: a consumer treating an
/// unresolved type as absent would misrepresent the configuration surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A key was referenced that is absent from the snapshot's closure.
    UnknownKey {
        /// The key that failed to resolve.
        key: ConfigTypeKey,
    },
    /// Closure validation failed during ingestion.
    IncompleteClosure {
        /// The key that escaped the closure.
        missing: ConfigTypeKey,
        /// Key of the descriptor holding the dangling reference.
        referenced_by: ConfigTypeKey,
    },
    /// Two descriptors of different shape share a key.
    ///
    /// Re-inserting a structurally identical descriptor is not a conflict;
    /// within one snapshot the same key must always describe the same type.
    DuplicateKeyConflict {
        /// The contested key.
        key: ConfigTypeKey,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::UnknownKey { key } => {
                write!(f, "unknown config type key: {}", key)
            }
            SchemaError::IncompleteClosure {
                missing,
                referenced_by,
            } => {
                write!(
                    f,
                    "incomplete closure: {} references {}, which is absent from the snapshot",
                    referenced_by, missing
                )
            }
            SchemaError::DuplicateKeyConflict { key } => {
                write!(
                    f,
                    "duplicate key conflict: incompatible descriptors registered under {}",
                    key
                )
            }
        }
    }
}

impl std::error::Error for SchemaError {}

// ---------------------------------------------------------------------------
// WireError
// ---------------------------------------------------------------------------

/// Failures while ingesting a raw wire snapshot.
#[derive(Debug)]
pub enum WireError {
    /// The `__typename` discriminator was outside the closed variant set.
    UnknownTypename(String),
    /// The payload was not valid JSON for the expected shape.
    Json(serde_json::Error),
    /// The decoded snapshot failed schema-integrity checks.
    Schema(SchemaError),
}

impl From<serde_json::Error> for WireError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<SchemaError> for WireError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::UnknownTypename(name) => {
                write!(f, "unknown config type discriminator: {}", name)
            }
            WireError::Json(e) => write!(f, "invalid schema snapshot JSON: {}", e),
            WireError::Schema(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for WireError {}
