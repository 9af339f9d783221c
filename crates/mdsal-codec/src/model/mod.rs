// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema model.
//!
//! The effective schema the codec is built against: modules, data nodes,
//! type definitions, identities and operations. Loading YANG text is not
//! handled here; callers assemble a context with the builders.
//!
//! # Example
//!
//! ```rust
//! use mdsal_codec::model::{BuiltinType, ModuleBuilder, QNameModule, SchemaContextBuilder};
//!
//! let ns = QNameModule::new("urn:example:inventory", None);
//! let ctx = SchemaContextBuilder::new()
//!     .module(ModuleBuilder::new("inventory", "inv", ns).data(|d| {
//!         d.container("items", |c| {
//!             c.list("item", &["id"], |l| {
//!                 l.leaf("id", BuiltinType::String)
//!                     .leaf("count", BuiltinType::Uint32)
//!             })
//!         })
//!     }))
//!     .build()
//!     .unwrap();
//! assert_eq!(ctx.modules().len(), 1);
//! ```

mod builder;
mod context;
mod path;
mod qname;
mod schema;
mod types;

pub use builder::{ChoiceBuilder, ModuleBuilder, NodeBuilder, SchemaContextBuilder};
pub use context::{SchemaContext, SchemaNodeRef, TypeChain};
pub use path::{PathExpression, PathStep, SchemaPath};
pub use qname::{QName, QNameModule, Revision};
pub use schema::{
    AugmentationSchema, CaseSchema, ChoiceSchema, ContainerSchema, DataSchemaNode, GroupingSchema,
    IdentitySchema, Import, LeafListSchema, LeafSchema, ListSchema, Module, NodeKind,
    OperationSchema,
};
pub use types::{
    Bit, BuiltinType, EnumPair, Restrictions, Status, TypeDefinition, TypeShape, ValueRange,
    YANG_NAMESPACE,
};
