// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binding ⇄ normalized translation.
//!
//! ```text
//! BindingCodecContext ── ArcSwap<CodecTree> ── BindingRuntimeContext
//!        │                      │
//!        │                      └─ CodecCache (NodeCodec per schema path)
//!        ├─ IdentifierTranslator   InstanceIdentifier ⇄ YangInstanceIdentifier
//!        ├─ StructuralCodec        DataObject ⇄ NormalizedNode
//!        │     └─ ValueCodec       BindingValue ⇄ Value
//!        └─ DefaultValueMaterializer
//! ```
//!
//! # Example
//!
//! ```rust
//! use mdsal_codec::binding::{BindingValue, DataObject, InstanceIdentifier};
//! use mdsal_codec::codec::{BindingCodecContext, BindingNormalizedNodeSerializer};
//! use mdsal_codec::config::CodecConfig;
//! use mdsal_codec::index::Renames;
//! use mdsal_codec::model::{
//!     BuiltinType, ModuleBuilder, QName, QNameModule, SchemaContextBuilder, SchemaPath,
//! };
//! use std::sync::Arc;
//!
//! let ns = QNameModule::new("urn:example:inventory", None);
//! let schema = SchemaContextBuilder::new()
//!     .module(ModuleBuilder::new("inventory", "inv", ns.clone()).data(|d| {
//!         d.container("items", |c| c.leaf("count", BuiltinType::Uint32))
//!     }))
//!     .build()
//!     .unwrap();
//! let codec =
//!     BindingCodecContext::from_schema(Arc::new(schema), Renames::new(), CodecConfig::default())
//!         .unwrap();
//!
//! let path = SchemaPath::new(vec![QName::new(&ns, "items")]);
//! let items = codec.runtime().type_for_path(&path).unwrap().name.clone();
//! let id = InstanceIdentifier::builder().child(items.clone()).build();
//! let data = DataObject::new(items).with("count", BindingValue::Uint32(3));
//! let (dom_id, node) = codec.to_normalized_node(&id, &data).unwrap();
//! let (back_id, back) = codec.from_normalized_node(&dom_id, &node).unwrap().unwrap();
//! assert_eq!((back_id, back), (id, data));
//! ```

mod defaults;
mod identifier;
mod lazy;
mod serializer;
mod structural;
mod value;

pub use defaults::{DefaultConstruction, DefaultValueMaterializer};
pub use identifier::IdentifierTranslator;
pub use lazy::{BindingLazyContainerNode, ContainerSerializer};
pub use serializer::{BindingCodecContext, BindingNormalizedNodeSerializer, CodecTree};
pub use structural::{
    AugmentationEntry, CaseEntry, ChildEntry, ChildKind, CodecCache, NodeCodec, StructuralCodec,
};
pub use value::ValueCodec;
