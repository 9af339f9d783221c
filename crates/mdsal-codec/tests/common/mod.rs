// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared test schema: a base module with lists, choices, typedefs,
//! identities, leafrefs, a notification, an rpc and an action, plus a
//! second module augmenting it.

#![allow(dead_code)]

use mdsal_codec::binding::{BindingValue, DataObject, Key, TypeName};
use mdsal_codec::model::{
    BuiltinType, ModuleBuilder, QName, QNameModule, Revision, SchemaContext, SchemaContextBuilder,
    SchemaPath, TypeDefinition,
};
use mdsal_codec::{BindingCodecContext, CodecConfig, Renames};
use std::sync::Arc;

pub const TEST_NS: &str = "urn:opendaylight:params:xml:ns:yang:mdsal:test:binding";
pub const AUG_NS: &str = "urn:opendaylight:params:xml:ns:yang:mdsal:test:augment";

pub fn ns() -> QNameModule {
    QNameModule::new(TEST_NS, Some(Revision::parse("2014-07-01").unwrap()))
}

pub fn aug_ns() -> QNameModule {
    QNameModule::new(AUG_NS, Some(Revision::parse("2014-07-01").unwrap()))
}

pub fn q(name: &str) -> QName {
    QName::new(&ns(), name)
}

pub fn aq(name: &str) -> QName {
    QName::new(&aug_ns(), name)
}

pub fn path(names: &[&str]) -> SchemaPath {
    SchemaPath::new(names.iter().map(|n| q(n)).collect())
}

pub fn list_path() -> SchemaPath {
    path(&["top", "top-level-list"])
}

pub fn base_module() -> ModuleBuilder {
    ModuleBuilder::new("test", "test", ns())
        .typedef(
            "int32-string-union",
            TypeDefinition::builtin(BuiltinType::Union(vec![
                BuiltinType::Int32.into(),
                BuiltinType::String.into(),
            ])),
        )
        .typedef(
            "my-bits",
            TypeDefinition::builtin(BuiltinType::bits(&["flag-a", "flag-b", "flag-c"])),
        )
        .typedef(
            "percent",
            TypeDefinition::builtin(BuiltinType::Uint8).with_range(0, 100),
        )
        .identity("test-root", &[])
        .identity("test-one", &[q("test-root")])
        .identity("test-two", &[q("test-root")])
        .data(|d| {
            d.container("top", |c| {
                c.list("top-level-list", &["name"], |l| {
                    l.leaf("name", BuiltinType::String)
                        .leaf("identity-ref", BuiltinType::Identityref(vec![q("test-root")]))
                        .leaf("union-leaf", TypeDefinition::derived(q("int32-string-union")))
                        .leaf("bits-leaf", TypeDefinition::derived(q("my-bits")))
                        .leaf("load", TypeDefinition::derived(q("percent")))
                        .leaf_list("tags", BuiltinType::String)
                        .choice("choice-in-list", |ch| {
                            ch.case("simple-via-uses", |s| s.leaf("simple", BuiltinType::String))
                                .case("complex-via-uses", |s| {
                                    s.container("complex", |x| x.leaf("value", BuiltinType::Int32))
                                })
                        })
                        .list("nested-list", &["name"], |n| {
                            n.leaf("name", BuiltinType::String).leaf("label", BuiltinType::String)
                        })
                        .action(
                            "reset",
                            |i| i.leaf("force", BuiltinType::Boolean),
                            |o| o.leaf("ok", BuiltinType::Boolean),
                        )
                })
            })
            .container("leafrefs", |c| {
                c.leaf("target", TypeDefinition::builtin(BuiltinType::String).with_length(1, 16))
                    .leaf("ref", BuiltinType::leafref("../target").unwrap())
                    .leaf("ref-to-ref", BuiltinType::leafref("../ref").unwrap())
                    .leaf(
                        "list-ref",
                        BuiltinType::leafref("/test:top/test:top-level-list/test:name").unwrap(),
                    )
                    .leaf(
                        "pred-ref",
                        BuiltinType::leafref(
                            "/test:top/test:top-level-list[test:name = current()/../target]/test:name",
                        )
                        .unwrap(),
                    )
            })
            .container("defaults", |c| {
                c.leaf_with_default("enabled", BuiltinType::Boolean, "true")
                    .leaf_with_default("payload", BuiltinType::Binary, "QUI=")
                    .leaf_with_default(
                        "alg",
                        BuiltinType::Identityref(vec![q("test-root")]),
                        "test-one",
                    )
                    .leaf("plain", BuiltinType::String)
            })
        })
        .notification("two-level-list-changed", |n| {
            n.leaf("name", BuiltinType::String)
                .list("changed", &["name"], |l| l.leaf("name", BuiltinType::String))
        })
        .rpc(
            "put-top",
            |i| i.leaf("name", BuiltinType::String),
            |o| o.leaf("ok", BuiltinType::Boolean),
        )
}

pub fn augment_module() -> ModuleBuilder {
    ModuleBuilder::new("augment", "aug", aug_ns())
        .import("test", "test")
        .augment_named("tree-leaf-only-augment", list_path(), |a| {
            a.leaf("simple-value", BuiltinType::String)
        })
        .augment(path(&["top"]), |a| {
            a.container("aug-cont", |c| c.leaf("count", BuiltinType::Uint32))
        })
        .augment_choice(list_path().child(q("choice-in-list")), |ch| {
            ch.case("aug-case", |c| c.leaf("aug-leaf", BuiltinType::String))
        })
}

pub fn schema() -> SchemaContext {
    SchemaContextBuilder::new()
        .module(base_module())
        .module(augment_module())
        .build()
        .unwrap()
}

pub fn codec() -> BindingCodecContext {
    codec_with(CodecConfig::default())
}

pub fn codec_with(config: CodecConfig) -> BindingCodecContext {
    BindingCodecContext::from_schema(Arc::new(schema()), Renames::new(), config).unwrap()
}

/// Generated type of the node at `path`.
pub fn type_at(codec: &BindingCodecContext, path: &SchemaPath) -> TypeName {
    codec.runtime().type_for_path(path).unwrap().name.clone()
}

pub fn list_key(codec: &BindingCodecContext, name: &str) -> Key {
    let key_type = codec.runtime().key_type(&list_path()).unwrap().name.clone();
    Key::new(key_type).with("name", BindingValue::String(name.into()))
}

/// A list entry with a few leaves and the complex case selected.
pub fn list_entry(codec: &BindingCodecContext, name: &str) -> DataObject {
    let complex = type_at(
        codec,
        &list_path().child(q("choice-in-list")).child(q("complex-via-uses")),
    );
    let complex_container = type_at(
        codec,
        &list_path()
            .child(q("choice-in-list"))
            .child(q("complex-via-uses"))
            .child(q("complex")),
    );
    DataObject::new(type_at(codec, &list_path()))
        .with("name", BindingValue::String(name.into()))
        .with(
            "tags",
            BindingValue::LeafList(vec![BindingValue::String("blue".into())]),
        )
        .with(
            "choice_in_list",
            BindingValue::Container(DataObject::new(complex).with(
                "complex",
                BindingValue::Container(
                    DataObject::new(complex_container).with("value", BindingValue::Int32(-7)),
                ),
            )),
        )
}
