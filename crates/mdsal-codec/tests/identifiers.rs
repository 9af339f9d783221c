// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test code readability over pedantic
#![allow(clippy::missing_panics_doc)] // Tests panic on failure
#![allow(clippy::redundant_closure_for_method_calls)] // Test code clarity

//! Binding ⇄ structural identifier translation through the serializer.

mod common;

use common::*;
use mdsal_codec::binding::{BindingValue, InstanceIdentifier, Key};
use mdsal_codec::data::{NodeIdentifierWithPredicates, PathArgument, Value, YangInstanceIdentifier};
use mdsal_codec::{BindingCodecContext, BindingNormalizedNodeSerializer};

fn entry_id(codec: &BindingCodecContext, name: &str) -> InstanceIdentifier {
    InstanceIdentifier::builder()
        .child(type_at(codec, &path(&["top"])))
        .keyed(type_at(codec, &list_path()), list_key(codec, name))
        .build()
}

fn local_names(id: &YangInstanceIdentifier) -> Vec<&str> {
    id.path_arguments()
        .iter()
        .map(|a| a.qname().local_name())
        .collect()
}

/// Identifiers that must survive a trip through the structural form.
fn representable(codec: &BindingCodecContext) -> Vec<InstanceIdentifier> {
    let top = type_at(codec, &path(&["top"]));
    let list = type_at(codec, &list_path());
    let nested_path = list_path().child(q("nested-list"));
    let nested = type_at(codec, &nested_path);
    let nested_key = Key::new(codec.runtime().key_type(&nested_path).unwrap().name.clone())
        .with("name", BindingValue::String("inner".into()));
    let complex = type_at(
        codec,
        &list_path()
            .child(q("choice-in-list"))
            .child(q("complex-via-uses"))
            .child(q("complex")),
    );
    let top_aug = codec
        .runtime()
        .augmentation_for_child(&path(&["top"]), &aq("aug-cont"))
        .unwrap()
        .type_name
        .clone();
    let aug_cont = type_at(codec, &path(&["top"]).child(aq("aug-cont")));

    vec![
        InstanceIdentifier::builder().child(top.clone()).build(),
        InstanceIdentifier::builder()
            .child(top.clone())
            .child(list.clone())
            .build(),
        entry_id(codec, "foo"),
        InstanceIdentifier::builder()
            .child(top.clone())
            .keyed(list.clone(), list_key(codec, "foo"))
            .keyed(nested, nested_key)
            .build(),
        InstanceIdentifier::builder()
            .child(top.clone())
            .keyed(list, list_key(codec, "foo"))
            .child(complex)
            .build(),
        InstanceIdentifier::builder()
            .child(top)
            .augmentation(top_aug)
            .child(aug_cont)
            .build(),
    ]
}

#[test]
fn test_binding_identifiers_survive_structural_form() {
    let codec = codec();
    for id in representable(&codec) {
        let dom = codec.to_yang_instance_identifier(&id).unwrap();
        assert_eq!(
            codec.from_yang_instance_identifier(&dom).unwrap(),
            Some(id.clone()),
            "{} via {}",
            id,
            dom
        );
    }
}

#[test]
fn test_structural_shape_of_keyed_paths() {
    let codec = codec();
    let dom = codec.to_yang_instance_identifier(&entry_id(&codec, "foo")).unwrap();
    assert_eq!(local_names(&dom), vec!["top", "top-level-list", "top-level-list"]);
    assert_eq!(
        dom.last_path_argument(),
        Some(&PathArgument::NodeIdentifierWithPredicates(
            NodeIdentifierWithPredicates::single(
                q("top-level-list"),
                q("name"),
                Value::String("foo".into()),
            )
        ))
    );

    let case_child = &representable(&codec)[4];
    let dom = codec.to_yang_instance_identifier(case_child).unwrap();
    assert_eq!(
        local_names(&dom),
        vec!["top", "top-level-list", "top-level-list", "choice-in-list", "complex"]
    );
}

#[test]
fn test_paths_without_binding_counterpart() {
    let codec = codec();
    let entry = codec.to_yang_instance_identifier(&entry_id(&codec, "foo")).unwrap();

    let at_choice = entry.child(PathArgument::NodeIdentifier(q("choice-in-list")));
    assert_eq!(codec.from_yang_instance_identifier(&at_choice).unwrap(), None);

    let at_leaf = entry.child(PathArgument::NodeIdentifier(q("name")));
    assert_eq!(codec.from_yang_instance_identifier(&at_leaf).unwrap(), None);

    let at_augmented_leaf = entry.child(PathArgument::NodeIdentifier(aq("simple-value")));
    assert_eq!(
        codec.from_yang_instance_identifier(&at_augmented_leaf).unwrap(),
        None
    );

    assert_eq!(
        codec
            .from_yang_instance_identifier(&YangInstanceIdentifier::empty())
            .unwrap(),
        None
    );
}

#[test]
fn test_unknown_structural_step_is_an_error() {
    let codec = codec();
    let unknown = YangInstanceIdentifier::empty()
        .node(q("top"))
        .node(q("no-such-child"));
    assert!(codec.from_yang_instance_identifier(&unknown).is_err());
}
