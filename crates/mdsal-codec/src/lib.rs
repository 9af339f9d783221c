// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # mdsal-codec - Binding ⇄ Normalized-Node codec
//!
//! Bidirectional translation between two representations of YANG-modelled
//! data: the typed *binding* representation (one generated type per schema
//! node) and the generic *normalized* tree keyed by qualified names.
//!
//! ## Quick Start
//!
//! ```rust
//! use mdsal_codec::{BindingCodecContext, BindingNormalizedNodeSerializer, CodecConfig, Renames};
//! use mdsal_codec::model::{BuiltinType, ModuleBuilder, QNameModule, SchemaContextBuilder};
//! use std::sync::Arc;
//!
//! let ns = QNameModule::new("urn:example:network", None);
//! let schema = SchemaContextBuilder::new()
//!     .module(ModuleBuilder::new("network", "net", ns).data(|d| {
//!         d.container("interfaces", |c| {
//!             c.list("interface", &["name"], |l| l.leaf("name", BuiltinType::String))
//!         })
//!     }))
//!     .build()
//!     .unwrap();
//!
//! let codec =
//!     BindingCodecContext::from_schema(Arc::new(schema), Renames::new(), CodecConfig::default())
//!         .unwrap();
//! assert_eq!(codec.runtime().schema().modules().len(), 1);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                         Serializer facade                           |
//! |   BindingCodecContext (ArcSwap snapshot of the codec tree)          |
//! +---------------------------------------------------------------------+
//! |                              Codecs                                 |
//! |   Identifier translator | Structural codec | Value codec | Defaults |
//! +---------------------------------------------------------------------+
//! |                           Schema index                              |
//! |   Module sort | Type provider (typedef cache) | Runtime context     |
//! +---------------------------------------------------------------------+
//! |                         Schema model                                |
//! |   Modules | Typedefs | Identities | Data nodes | Operations         |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`BindingCodecContext`] | Entry point; implements [`BindingNormalizedNodeSerializer`] |
//! | [`BindingRuntimeContext`] | Generated types of a schema and their reverse indexes |
//! | [`DataObject`] | Instance of a generated data type |
//! | [`NormalizedNode`] | Node of the normalized tree |
//! | [`CodecConfig`] | Indexing and decoding options |
//!
//! ## Modules Overview
//!
//! - [`model`] - Schema model and its builder
//! - [`data`] - Normalized representation
//! - [`binding`] - Binding representation and naming rules
//! - [`index`] - Schema index, type provider, runtime context
//! - [`codec`] - Translation between the two representations

/// Binding representation: generated types, data objects, typed paths.
pub mod binding;
/// Translation between the binding and normalized representations.
pub mod codec;
/// Codec configuration (programmatic or TOML).
pub mod config;
/// Normalized representation: values, structural paths, node tree.
pub mod data;
/// Error types.
pub mod error;
/// Schema indexing and generated-type resolution.
pub mod index;
/// Schema model consumed by the codec.
pub mod model;

pub use binding::{BindingValue, DataObject, InstanceIdentifier, Notification, TypeName};
pub use codec::{BindingCodecContext, BindingNormalizedNodeSerializer, BindingLazyContainerNode};
pub use config::CodecConfig;
pub use data::{NormalizedNode, Value, YangInstanceIdentifier};
pub use error::{CodecError, SchemaError};
pub use index::{BindingRuntimeContext, Renames};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
