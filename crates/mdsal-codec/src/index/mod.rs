// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema indexing.
//!
//! Turns a [`SchemaContext`](crate::model::SchemaContext) into an immutable
//! [`BindingRuntimeContext`]: modules are ordered by imports, typedef records
//! are built in dependency order by the [`TypeProvider`], then every data
//! node, operation, augmentation and identity gets its generated type.
//!
//! # Example
//!
//! ```rust
//! use mdsal_codec::config::CodecConfig;
//! use mdsal_codec::index::{BindingRuntimeContext, Renames};
//! use mdsal_codec::model::{BuiltinType, ModuleBuilder, QNameModule, SchemaContextBuilder};
//! use std::sync::Arc;
//!
//! let ns = QNameModule::new("urn:example:inventory", None);
//! let ctx = SchemaContextBuilder::new()
//!     .module(ModuleBuilder::new("inventory", "inv", ns).data(|d| {
//!         d.container("items", |c| c.leaf("count", BuiltinType::Uint32))
//!     }))
//!     .build()
//!     .unwrap();
//! let runtime =
//!     BindingRuntimeContext::build(Arc::new(ctx), Renames::new(), &CodecConfig::default())
//!         .unwrap();
//! assert_eq!(runtime.schema().modules().len(), 1);
//! ```

mod module_sort;
mod runtime;
mod schema_index;
mod type_provider;

pub use module_sort::sort_modules;
pub use runtime::{AugmentationInfo, BindingRuntimeContext};
pub use schema_index::SchemaIndex;
pub use type_provider::{identity_type_name, Renames, TypeProvider, TypeResolver, TypedefCache};
