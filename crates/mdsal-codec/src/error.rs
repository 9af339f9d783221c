// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types.
//!
//! [`SchemaError`] aborts index construction: a runtime context is either
//! fully built or not published at all. [`CodecError`] is returned by the
//! per-call translation entry points.

use crate::binding::TypeName;
use crate::model::{QName, SchemaPath};
use thiserror::Error;

/// Schema-consistency failures detected while indexing a schema model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    // ========================================================================
    // Modules
    // ========================================================================
    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Cyclic import involving module {0}")]
    CyclicImport(String),

    #[error("Invalid revision date: {0}")]
    InvalidRevision(String),

    #[error("Invalid schema path: {0}")]
    InvalidPath(String),

    #[error("Invalid codec configuration: {0}")]
    InvalidConfig(String),

    // ========================================================================
    // Types
    // ========================================================================
    #[error("Cyclic typedef chain through {0}")]
    CyclicTypedef(QName),

    #[error("Unknown typedef {0}")]
    UnknownTypedef(QName),

    #[error("Identity {0} not found")]
    MissingIdentity(QName),

    #[error("Identityref at {path} names {count} base identities")]
    AmbiguousIdentityref { path: SchemaPath, count: usize },

    // ========================================================================
    // Leafrefs
    // ========================================================================
    #[error("Leafref {leafref} of {leaf} points to its own leaf")]
    SelfReferencingLeafref { leaf: SchemaPath, leafref: String },

    #[error("Leafref chain through {0} is cyclic")]
    LeafrefCycle(SchemaPath),

    #[error("Leafref {leafref} of {leaf} does not resolve to a leaf")]
    LeafrefTargetNotFound { leaf: SchemaPath, leafref: String },

    // ========================================================================
    // Generated types
    // ========================================================================
    #[error("Generated type {name} claimed by both {first} and {second}")]
    NameCollision {
        name: TypeName,
        first: SchemaPath,
        second: SchemaPath,
    },
}

/// Per-call translation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Malformed or non-schema-conformant input.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A leaf value outside its type's value space.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// The requested construction has no canonical form.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl CodecError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub(crate) fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }
}
