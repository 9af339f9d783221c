// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Translation between typed and structural instance identifiers.
//!
//! Binding identifiers address case children directly under the enclosing
//! data node and carry explicit augmentation steps. Structural identifiers
//! do the opposite: choices appear as their own step, augmentations are
//! invisible and keyed list entries take two steps (the list, then the
//! entry).

use super::value::ValueCodec;
use crate::binding::naming::property_name;
use crate::binding::{InstanceIdentifier, Key, PathStep};
use crate::data::{NodeIdentifierWithPredicates, PathArgument, YangInstanceIdentifier};
use crate::error::CodecError;
use crate::index::BindingRuntimeContext;
use crate::model::{DataSchemaNode, NodeKind, QName, SchemaPath, TypeDefinition};
use std::collections::BTreeMap;

/// Identifier translation over one runtime context.
#[derive(Clone, Copy)]
pub struct IdentifierTranslator<'a> {
    runtime: &'a BindingRuntimeContext,
}

impl<'a> IdentifierTranslator<'a> {
    pub fn new(runtime: &'a BindingRuntimeContext) -> Self {
        Self { runtime }
    }

    /// Typed identifier to its structural form.
    pub fn to_structural(
        &self,
        binding: &InstanceIdentifier,
    ) -> Result<YangInstanceIdentifier, CodecError> {
        let mut arguments = Vec::new();
        let mut parent: Option<&SchemaPath> = None;
        let steps = binding.steps();

        for (i, step) in steps.iter().enumerate() {
            if let Some(augmentation) = self.runtime.augmentation_named(&step.type_name) {
                if parent.cloned() != self.data_anchor(&augmentation.target) {
                    return Err(CodecError::invalid_argument(format!(
                        "{} does not augment the previous step of {}",
                        step.type_name, binding
                    )));
                }
                if i + 1 == steps.len() {
                    return Err(CodecError::invalid_argument(format!(
                        "{} ends at augmentation {}",
                        binding, step.type_name
                    )));
                }
                continue;
            }

            let path = self.runtime.path_for_type(&step.type_name).ok_or_else(|| {
                CodecError::invalid_argument(format!("{} is not a data type", step.type_name))
            })?;
            let node = self
                .runtime
                .schema()
                .find_data_node(path)
                .filter(|n| matches!(n.kind, NodeKind::Container(_) | NodeKind::List(_)))
                .ok_or_else(|| {
                    CodecError::invalid_argument(format!(
                        "{} is not addressable by an identifier",
                        step.type_name
                    ))
                })?;

            let data_parent = self.data_parent(path);
            if data_parent.as_ref() != parent {
                return Err(CodecError::invalid_argument(format!(
                    "{} is not a child of the previous step of {}",
                    step.type_name, binding
                )));
            }
            self.push_choices(&mut arguments, data_parent.as_ref(), path);

            arguments.push(PathArgument::NodeIdentifier(node.qname.clone()));
            if let Some(key) = &step.key {
                if node.list_keys().is_empty() {
                    return Err(CodecError::invalid_argument(format!(
                        "{} carries a key but is not a keyed list",
                        step.type_name
                    )));
                }
                arguments.push(PathArgument::NodeIdentifierWithPredicates(
                    self.key_to_predicates(node, key)?,
                ));
            }
            parent = Some(path);
        }
        Ok(YangInstanceIdentifier::new(arguments))
    }

    /// Structural identifier to its typed form. `None` when the path ends at
    /// a choice or a leaf, or steps through a node without a generated type.
    pub fn to_binding(
        &self,
        structural: &YangInstanceIdentifier,
    ) -> Result<Option<InstanceIdentifier>, CodecError> {
        let schema = self.runtime.schema();
        let arguments = structural.path_arguments();
        if arguments.is_empty() {
            return Ok(None);
        }

        let mut steps = Vec::new();
        let mut current: Option<&DataSchemaNode> = None;
        let mut i = 0;
        while i < arguments.len() {
            let argument = &arguments[i];
            let qname = argument.qname();
            let node = match current {
                None => schema.find_data_node(&SchemaPath::new(vec![qname.clone()])),
                Some(parent) => child_through_case(parent, qname),
            }
            .ok_or_else(|| {
                CodecError::invalid_argument(format!("{} is not in the schema ({})", qname, structural))
            })?;
            i += 1;

            match &node.kind {
                NodeKind::Choice(_) => {
                    current = Some(node);
                    continue;
                }
                NodeKind::Leaf(_) | NodeKind::LeafList(_) => return Ok(None),
                NodeKind::Case(_) => {
                    return Err(CodecError::invalid_argument(format!(
                        "case {} cannot appear in {}",
                        qname, structural
                    )))
                }
                NodeKind::Container(_) | NodeKind::List(_) => {}
            }

            if let Some(parent) = node.path.parent() {
                if let Some(augmentation) = self.runtime.augmentation_for_child(&parent, qname) {
                    steps.push(PathStep {
                        type_name: augmentation.type_name.clone(),
                        key: None,
                    });
                }
            }
            let Some(record) = self.runtime.type_for_path(&node.path) else {
                return Ok(None);
            };

            let predicates = match argument {
                PathArgument::NodeIdentifierWithPredicates(p) => Some(p),
                _ => match arguments.get(i) {
                    Some(PathArgument::NodeIdentifierWithPredicates(p)) if &p.qname == qname => {
                        i += 1;
                        Some(p)
                    }
                    _ => None,
                },
            };
            let key = match predicates {
                Some(p) => Some(self.predicates_to_key(node, p)?),
                None => None,
            };
            steps.push(PathStep {
                type_name: record.name.clone(),
                key,
            });
            current = Some(node);
        }

        if matches!(current.map(|n| &n.kind), Some(NodeKind::Choice(_))) {
            return Ok(None);
        }
        Ok(Some(InstanceIdentifier::new(steps)))
    }

    /// Binding key of a list entry to structural predicates.
    pub fn key_to_predicates(
        &self,
        list: &DataSchemaNode,
        key: &Key,
    ) -> Result<NodeIdentifierWithPredicates, CodecError> {
        if let Some(record) = self.runtime.key_type(&list.path) {
            if record.name != key.type_name {
                return Err(CodecError::invalid_argument(format!(
                    "{} is not the key of {}",
                    key.type_name, list.path
                )));
            }
        }
        let codec = ValueCodec::new(self.runtime);
        let mut values = BTreeMap::new();
        for key_qname in list.list_keys() {
            let (leaf, def) = key_leaf(list, key_qname)?;
            let property = property_name(key_qname.local_name());
            let value = key.values.get(&property).ok_or_else(|| {
                CodecError::invalid_argument(format!(
                    "key {} of {} has no value",
                    property, list.path
                ))
            })?;
            values.insert(key_qname.clone(), codec.encode(def, &leaf.path, value)?);
        }
        Ok(NodeIdentifierWithPredicates::new(list.qname.clone(), values))
    }

    /// Structural predicates of a list entry to its binding key.
    pub fn predicates_to_key(
        &self,
        list: &DataSchemaNode,
        predicates: &NodeIdentifierWithPredicates,
    ) -> Result<Key, CodecError> {
        let record = self.runtime.key_type(&list.path).ok_or_else(|| {
            CodecError::invalid_argument(format!("{} is not a keyed list", list.path))
        })?;
        let codec = ValueCodec::new(self.runtime);
        let mut key = Key::new(record.name.clone());
        for key_qname in list.list_keys() {
            let (leaf, def) = key_leaf(list, key_qname)?;
            let value = predicates.keys.get(key_qname).ok_or_else(|| {
                CodecError::invalid_argument(format!(
                    "predicates of {} lack key {}",
                    list.path,
                    key_qname.local_name()
                ))
            })?;
            key.values.insert(
                property_name(key_qname.local_name()),
                codec.decode(def, &leaf.path, value)?,
            );
        }
        Ok(key)
    }

    /// `path` itself, or its data parent when it names a choice or case.
    fn data_anchor(&self, path: &SchemaPath) -> Option<SchemaPath> {
        match self.runtime.schema().find_data_node(path) {
            Some(node) if node.is_choice_or_case() => self.data_parent(path),
            _ => Some(path.clone()),
        }
    }

    /// Path of the closest ancestor that is neither a choice nor a case.
    fn data_parent(&self, path: &SchemaPath) -> Option<SchemaPath> {
        let schema = self.runtime.schema();
        (1..path.len()).rev().map(|len| path.truncated(len)).find(|prefix| {
            schema
                .find_data_node(prefix)
                .is_some_and(|n| !n.is_choice_or_case())
        })
    }

    /// Choice steps between `parent` and the node at `path`.
    fn push_choices(
        &self,
        arguments: &mut Vec<PathArgument>,
        parent: Option<&SchemaPath>,
        path: &SchemaPath,
    ) {
        let schema = self.runtime.schema();
        let start = parent.map_or(1, |p| p.len() + 1);
        for len in start..path.len() {
            if let Some(node) = schema.find_data_node(&path.truncated(len)) {
                if matches!(node.kind, NodeKind::Choice(_)) {
                    arguments.push(PathArgument::NodeIdentifier(node.qname.clone()));
                }
            }
        }
    }
}

/// Child of a data node, or of a choice through whichever case owns it.
pub(crate) fn child_through_case<'n>(
    parent: &'n DataSchemaNode,
    qname: &QName,
) -> Option<&'n DataSchemaNode> {
    match &parent.kind {
        NodeKind::Choice(choice) => choice
            .cases
            .iter()
            .find_map(|case| case.child(qname)),
        _ => parent.child(qname),
    }
}

fn key_leaf<'n>(
    list: &'n DataSchemaNode,
    key: &QName,
) -> Result<(&'n DataSchemaNode, &'n TypeDefinition), CodecError> {
    list.child(key)
        .and_then(|leaf| leaf.leaf_type().map(|def| (leaf, def)))
        .ok_or_else(|| {
            CodecError::invalid_argument(format!(
                "key {} is not a leaf of {}",
                key.local_name(),
                list.path
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{BindingValue, TypeName};
    use crate::config::CodecConfig;
    use crate::data::Value;
    use crate::index::Renames;
    use crate::model::{BuiltinType, ModuleBuilder, QNameModule, SchemaContextBuilder};
    use std::sync::Arc;

    fn ns() -> QNameModule {
        QNameModule::new("urn:test:identifier", None)
    }

    fn aug_ns() -> QNameModule {
        QNameModule::new("urn:test:identifier-aug", None)
    }

    fn q(name: &str) -> QName {
        QName::new(&ns(), name)
    }

    fn path(names: &[&str]) -> SchemaPath {
        SchemaPath::new(names.iter().map(|n| q(n)).collect())
    }

    fn runtime() -> BindingRuntimeContext {
        let base = ModuleBuilder::new("identifier", "id", ns()).data(|d| {
            d.container("top", |c| {
                c.list("top-level-list", &["name"], |l| {
                    l.leaf("name", BuiltinType::String).choice("choice-in-list", |ch| {
                        ch.case("simple-case", |s| {
                            s.container("inner", |i| i.leaf("value", BuiltinType::Int32))
                        })
                    })
                })
                .list("log", &[], |l| l.leaf("line", BuiltinType::String))
            })
        });
        let aug = ModuleBuilder::new("identifier-aug", "ida", aug_ns())
            .import("identifier", "id")
            .augment(path(&["top", "top-level-list"]), |a| {
                a.container("extra", |e| e.leaf("note", BuiltinType::String))
            });
        let ctx = SchemaContextBuilder::new()
            .module(base)
            .module(aug)
            .build()
            .unwrap();
        BindingRuntimeContext::build(Arc::new(ctx), Renames::new(), &CodecConfig::default()).unwrap()
    }

    fn type_at(runtime: &BindingRuntimeContext, path: &SchemaPath) -> TypeName {
        runtime.type_for_path(path).unwrap().name.clone()
    }

    fn entry(runtime: &BindingRuntimeContext, name: &str) -> (TypeName, Key) {
        let list = path(&["top", "top-level-list"]);
        let key = Key::new(runtime.key_type(&list).unwrap().name.clone())
            .with("name", BindingValue::String(name.into()));
        (type_at(runtime, &list), key)
    }

    #[test]
    fn test_keyed_entry_takes_two_steps() {
        let runtime = runtime();
        let translator = IdentifierTranslator::new(&runtime);
        let (list, key) = entry(&runtime, "foo");
        let binding = InstanceIdentifier::builder()
            .child(type_at(&runtime, &path(&["top"])))
            .keyed(list, key)
            .build();

        let structural = translator.to_structural(&binding).unwrap();
        let expected = YangInstanceIdentifier::empty()
            .node(q("top"))
            .node(q("top-level-list"))
            .entry(NodeIdentifierWithPredicates::single(
                q("top-level-list"),
                q("name"),
                Value::String("foo".into()),
            ));
        assert_eq!(structural, expected);
        assert_eq!(translator.to_binding(&structural).unwrap(), Some(binding));
    }

    #[test]
    fn test_case_child_gains_choice_step() {
        let runtime = runtime();
        let translator = IdentifierTranslator::new(&runtime);
        let (list, key) = entry(&runtime, "foo");
        let inner = type_at(
            &runtime,
            &path(&["top", "top-level-list", "choice-in-list", "simple-case", "inner"]),
        );
        let binding = InstanceIdentifier::builder()
            .child(type_at(&runtime, &path(&["top"])))
            .keyed(list, key)
            .child(inner)
            .build();

        let structural = translator.to_structural(&binding).unwrap();
        let names: Vec<&str> = structural
            .path_arguments()
            .iter()
            .map(|a| a.qname().local_name())
            .collect();
        assert_eq!(
            names,
            vec!["top", "top-level-list", "top-level-list", "choice-in-list", "inner"]
        );
        assert_eq!(translator.to_binding(&structural).unwrap(), Some(binding));
    }

    #[test]
    fn test_augmentation_step_is_invisible() {
        let runtime = runtime();
        let translator = IdentifierTranslator::new(&runtime);
        let list_path = path(&["top", "top-level-list"]);
        let augmentation = runtime.augmentations_of(&list_path)[0].type_name.clone();
        let extra = type_at(&runtime, &list_path.child(QName::new(&aug_ns(), "extra")));
        let (list, key) = entry(&runtime, "foo");
        let binding = InstanceIdentifier::builder()
            .child(type_at(&runtime, &path(&["top"])))
            .keyed(list, key)
            .augmentation(augmentation.clone())
            .child(extra)
            .build();

        let structural = translator.to_structural(&binding).unwrap();
        assert_eq!(structural.len(), 4);
        assert_eq!(
            structural.last_path_argument(),
            Some(&PathArgument::NodeIdentifier(QName::new(&aug_ns(), "extra")))
        );
        assert_eq!(translator.to_binding(&structural).unwrap(), Some(binding));

        let (list, key) = entry(&runtime, "foo");
        let dangling = InstanceIdentifier::builder()
            .child(type_at(&runtime, &path(&["top"])))
            .keyed(list, key)
            .augmentation(augmentation)
            .build();
        assert!(matches!(
            translator.to_structural(&dangling),
            Err(CodecError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_unrepresentable_structural_paths() {
        let runtime = runtime();
        let translator = IdentifierTranslator::new(&runtime);
        assert_eq!(translator.to_binding(&YangInstanceIdentifier::empty()).unwrap(), None);

        let entry = YangInstanceIdentifier::empty()
            .node(q("top"))
            .entry(NodeIdentifierWithPredicates::single(
                q("top-level-list"),
                q("name"),
                Value::String("foo".into()),
            ));
        let at_choice = entry.child(PathArgument::NodeIdentifier(q("choice-in-list")));
        assert_eq!(translator.to_binding(&at_choice).unwrap(), None);
        let at_leaf = entry.child(PathArgument::NodeIdentifier(q("name")));
        assert_eq!(translator.to_binding(&at_leaf).unwrap(), None);

        let unknown = YangInstanceIdentifier::empty().node(q("nowhere"));
        assert!(translator.to_binding(&unknown).is_err());
    }

    #[test]
    fn test_wildcard_and_unkeyed_lists() {
        let runtime = runtime();
        let translator = IdentifierTranslator::new(&runtime);
        let top = type_at(&runtime, &path(&["top"]));
        let wildcard = InstanceIdentifier::builder()
            .child(top.clone())
            .child(type_at(&runtime, &path(&["top", "top-level-list"])))
            .build();
        let structural = translator.to_structural(&wildcard).unwrap();
        assert_eq!(structural.len(), 2);
        assert_eq!(translator.to_binding(&structural).unwrap(), Some(wildcard));

        let log = type_at(&runtime, &path(&["top", "log"]));
        let keyed_log = InstanceIdentifier::builder()
            .child(top)
            .keyed(log.clone(), Key::new(log))
            .build();
        assert!(matches!(
            translator.to_structural(&keyed_log),
            Err(CodecError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_key_type_must_match_list() {
        let runtime = runtime();
        let translator = IdentifierTranslator::new(&runtime);
        let (list, _) = entry(&runtime, "foo");
        let wrong = Key::new(list.clone()).with("name", BindingValue::String("foo".into()));
        let binding = InstanceIdentifier::builder()
            .child(type_at(&runtime, &path(&["top"])))
            .keyed(list, wrong)
            .build();
        assert!(matches!(
            translator.to_structural(&binding),
            Err(CodecError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_step_must_follow_its_parent() {
        let runtime = runtime();
        let translator = IdentifierTranslator::new(&runtime);
        let (list, key) = entry(&runtime, "foo");
        let skipped = InstanceIdentifier::builder().keyed(list, key).build();
        assert!(matches!(
            translator.to_structural(&skipped),
            Err(CodecError::InvalidArgument(_))
        ));
    }
}
