// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Data tree translation between [`DataObject`] and [`NormalizedNode`].
//!
//! Each data container gets a [`NodeCodec`] compiled on first use: its
//! children by property and by qualified name, the augmentations that
//! target it and, for choices, the cases. Compiled codecs are cached per
//! schema path in a [`CodecCache`] shared by every call against the same
//! runtime context.

use super::defaults::DefaultValueMaterializer;
use super::value::ValueCodec;
use crate::binding::naming::property_name;
use crate::binding::{BindingValue, DataObject, TypeName};
use crate::data::{
    ChoiceNode, ContainerNode, DataChildren, LeafNode, LeafSetNode, MapEntryNode, MapNode,
    NodeIdentifierWithPredicates, NormalizedNode, UnkeyedListEntryNode, UnkeyedListNode,
};
use crate::error::CodecError;
use crate::index::BindingRuntimeContext;
use crate::model::{DataSchemaNode, NodeKind, QName, SchemaPath, TypeDefinition};
use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Shape of a compiled child.
#[derive(Debug, Clone)]
pub enum ChildKind {
    Leaf {
        type_def: TypeDefinition,
        has_default: bool,
    },
    LeafList(TypeDefinition),
    Container,
    List { keys: Vec<QName> },
    Choice,
}

/// One schema child of a compiled node.
#[derive(Debug, Clone)]
pub struct ChildEntry {
    pub property: String,
    pub qname: QName,
    pub path: SchemaPath,
    pub kind: ChildKind,
    /// Index into [`NodeCodec::augmentations`] for augmented children.
    pub augmentation: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct AugmentationEntry {
    pub type_name: TypeName,
}

#[derive(Debug, Clone)]
pub struct CaseEntry {
    pub type_name: TypeName,
    pub path: SchemaPath,
    qnames: Vec<QName>,
}

/// Translation tables of one data container, choice or case.
#[derive(Debug)]
pub struct NodeCodec {
    pub path: SchemaPath,
    pub type_name: TypeName,
    pub children: Vec<ChildEntry>,
    pub augmentations: Vec<AugmentationEntry>,
    pub cases: Vec<CaseEntry>,
    by_qname: HashMap<QName, usize>,
    by_property: HashMap<String, usize>,
}

impl NodeCodec {
    fn compile(runtime: &BindingRuntimeContext, path: &SchemaPath) -> Result<Self, CodecError> {
        let node = runtime.schema().find_data_node(path).ok_or_else(|| {
            CodecError::invalid_argument(format!("{} is not a data node", path))
        })?;
        let type_name = runtime
            .type_for_path(path)
            .map(|r| r.name.clone())
            .ok_or_else(|| CodecError::invalid_argument(format!("{} has no generated type", path)))?;

        let augmentations: Vec<AugmentationEntry> = runtime
            .augmentations_of(path)
            .iter()
            .map(|a| AugmentationEntry {
                type_name: a.type_name.clone(),
            })
            .collect();

        let mut codec = Self {
            path: path.clone(),
            type_name,
            children: Vec::new(),
            augmentations,
            cases: Vec::new(),
            by_qname: HashMap::new(),
            by_property: HashMap::new(),
        };

        if let NodeKind::Choice(choice) = &node.kind {
            for case in &choice.cases {
                let type_name = runtime.type_for_path(&case.path).map(|r| r.name.clone()).ok_or_else(
                    || CodecError::invalid_argument(format!("{} has no generated type", case.path)),
                )?;
                codec.cases.push(CaseEntry {
                    type_name,
                    path: case.path.clone(),
                    qnames: case.children().iter().map(|c| c.qname.clone()).collect(),
                });
            }
            return Ok(codec);
        }

        for child in node.children() {
            let augmentation = runtime
                .augmentation_for_child(path, &child.qname)
                .and_then(|info| {
                    codec
                        .augmentations
                        .iter()
                        .position(|a| a.type_name == info.type_name)
                });
            let entry = ChildEntry {
                property: property_name(child.qname.local_name()),
                qname: child.qname.clone(),
                path: child.path.clone(),
                kind: child_kind(runtime, child),
                augmentation,
            };
            let index = codec.children.len();
            codec.by_qname.insert(entry.qname.clone(), index);
            if augmentation.is_none() {
                codec.by_property.insert(entry.property.clone(), index);
            }
            codec.children.push(entry);
        }
        Ok(codec)
    }

    pub fn child_by_qname(&self, qname: &QName) -> Option<&ChildEntry> {
        self.by_qname.get(qname).map(|i| &self.children[*i])
    }

    /// Own (non-augmented) child by property name.
    pub fn child_by_property(&self, property: &str) -> Option<&ChildEntry> {
        self.by_property.get(property).map(|i| &self.children[*i])
    }

    fn augmentation_index(&self, type_name: &TypeName) -> Option<usize> {
        self.augmentations.iter().position(|a| &a.type_name == type_name)
    }

    fn augmented_child(&self, augmentation: usize, property: &str) -> Option<&ChildEntry> {
        self.children
            .iter()
            .find(|c| c.augmentation == Some(augmentation) && c.property == property)
    }

    /// Case owning a child qname.
    pub fn case_for_child(&self, qname: &QName) -> Option<&CaseEntry> {
        self.cases.iter().find(|c| c.qnames.contains(qname))
    }

    pub fn case_named(&self, type_name: &TypeName) -> Option<&CaseEntry> {
        self.cases.iter().find(|c| &c.type_name == type_name)
    }
}

fn child_kind(runtime: &BindingRuntimeContext, child: &DataSchemaNode) -> ChildKind {
    match &child.kind {
        NodeKind::Leaf(leaf) => ChildKind::Leaf {
            type_def: leaf.type_def.clone(),
            has_default: leaf.default_value.is_some()
                || runtime
                    .schema()
                    .type_chain(&leaf.type_def)
                    .is_ok_and(|chain| chain.default_value().is_some()),
        },
        NodeKind::LeafList(leaf_list) => ChildKind::LeafList(leaf_list.type_def.clone()),
        NodeKind::List(list) => ChildKind::List {
            keys: list.keys.clone(),
        },
        NodeKind::Choice(_) => ChildKind::Choice,
        NodeKind::Container(_) | NodeKind::Case(_) => ChildKind::Container,
    }
}

/// Compiled node codecs keyed by schema path.
#[derive(Debug, Default)]
pub struct CodecCache {
    nodes: DashMap<SchemaPath, Arc<NodeCodec>>,
}

impl CodecCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Compiled codec of the node at `path`, compiling it on first use.
    pub fn get_or_compile(
        &self,
        runtime: &BindingRuntimeContext,
        path: &SchemaPath,
    ) -> Result<Arc<NodeCodec>, CodecError> {
        if let Some(codec) = self.nodes.get(path).map(|e| e.value().clone()) {
            return Ok(codec);
        }
        let compiled = Arc::new(NodeCodec::compile(runtime, path)?);
        log::debug!("[codec] compiled node codec for {}", path);
        Ok(self.nodes.entry(path.clone()).or_insert(compiled).value().clone())
    }
}

/// Structural translation over one runtime context and its codec cache.
#[derive(Clone, Copy)]
pub struct StructuralCodec<'a> {
    runtime: &'a BindingRuntimeContext,
    cache: &'a CodecCache,
}

impl<'a> StructuralCodec<'a> {
    pub fn new(runtime: &'a BindingRuntimeContext, cache: &'a CodecCache) -> Self {
        Self { runtime, cache }
    }

    fn codec(&self, path: &SchemaPath) -> Result<Arc<NodeCodec>, CodecError> {
        self.cache.get_or_compile(self.runtime, path)
    }

    fn values(&self) -> ValueCodec<'a> {
        ValueCodec::new(self.runtime)
    }

    // ========================================================================
    // Binding to normalized
    // ========================================================================

    /// Node for the object addressed by the data node at `path`: a container,
    /// a map entry or an unkeyed list entry.
    pub fn encode_node(
        &self,
        path: &SchemaPath,
        data: &DataObject,
    ) -> Result<NormalizedNode, CodecError> {
        let node = self.schema_node(path)?;
        match &node.kind {
            NodeKind::Container(_) => Ok(self.encode_container_node(path, data)?.into()),
            NodeKind::List(list) if !list.keys.is_empty() => {
                Ok(self.encode_map_entry(path, &list.keys, data)?.into())
            }
            NodeKind::List(_) => Ok(NormalizedNode::UnkeyedListEntry(UnkeyedListEntryNode {
                identifier: node.qname.clone(),
                children: self.encode_children(path, data)?,
            })),
            _ => Err(CodecError::invalid_argument(format!(
                "{} does not hold a data object",
                path
            ))),
        }
    }

    /// Container node (data container, notification, input or output).
    pub fn encode_container_node(
        &self,
        path: &SchemaPath,
        data: &DataObject,
    ) -> Result<ContainerNode, CodecError> {
        let qname = path
            .last()
            .ok_or_else(|| CodecError::invalid_argument("empty schema path"))?;
        Ok(ContainerNode {
            identifier: qname.clone(),
            children: self.encode_children(path, data)?,
        })
    }

    /// Children of a data container, augmentations merged in.
    pub fn encode_children(
        &self,
        path: &SchemaPath,
        data: &DataObject,
    ) -> Result<DataChildren, CodecError> {
        let codec = self.codec(path)?;
        if data.type_name() != &codec.type_name {
            return Err(CodecError::invalid_argument(format!(
                "{} is not an instance of {}",
                data.type_name(),
                codec.type_name
            )));
        }

        let mut children = DataChildren::new();
        for (property, value) in data.fields() {
            match codec.child_by_property(property) {
                Some(entry) => {
                    let node = self.encode_child(entry, value)?;
                    children.insert(node.qname().clone(), node);
                }
                None => log::debug!(
                    "[codec] dropping unknown property {} of {}",
                    property,
                    codec.type_name
                ),
            }
        }

        for (type_name, augmentation) in data.augmentations() {
            let Some(index) = codec.augmentation_index(type_name) else {
                log::debug!(
                    "[codec] dropping augmentation {} not applicable to {}",
                    type_name,
                    codec.type_name
                );
                continue;
            };
            for (property, value) in augmentation.fields() {
                match codec.augmented_child(index, property) {
                    Some(entry) => {
                        let node = self.encode_child(entry, value)?;
                        children.insert(node.qname().clone(), node);
                    }
                    None => log::debug!(
                        "[codec] dropping unknown property {} of {}",
                        property,
                        type_name
                    ),
                }
            }
        }
        Ok(children)
    }

    fn encode_child(
        &self,
        entry: &ChildEntry,
        value: &BindingValue,
    ) -> Result<NormalizedNode, CodecError> {
        match (&entry.kind, value) {
            (ChildKind::Leaf { type_def, .. }, value) => Ok(NormalizedNode::Leaf(LeafNode::new(
                entry.qname.clone(),
                self.values().encode(type_def, &entry.path, value)?,
            ))),
            (ChildKind::LeafList(type_def), BindingValue::LeafList(items)) => {
                let values = items
                    .iter()
                    .map(|item| self.values().encode(type_def, &entry.path, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(NormalizedNode::LeafSet(LeafSetNode {
                    identifier: entry.qname.clone(),
                    values,
                }))
            }
            (ChildKind::Container, BindingValue::Container(data)) => {
                Ok(self.encode_container_node(&entry.path, data)?.into())
            }
            (ChildKind::List { keys }, BindingValue::List(items)) if !keys.is_empty() => {
                let entries = items
                    .iter()
                    .map(|item| self.encode_map_entry(&entry.path, keys, item))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(NormalizedNode::Map(MapNode {
                    identifier: entry.qname.clone(),
                    entries,
                }))
            }
            (ChildKind::List { .. }, BindingValue::List(items)) => {
                let entries = items
                    .iter()
                    .map(|item| {
                        Ok(UnkeyedListEntryNode {
                            identifier: entry.qname.clone(),
                            children: self.encode_children(&entry.path, item)?,
                        })
                    })
                    .collect::<Result<Vec<_>, CodecError>>()?;
                Ok(NormalizedNode::UnkeyedList(UnkeyedListNode {
                    identifier: entry.qname.clone(),
                    entries,
                }))
            }
            (ChildKind::Choice, BindingValue::Container(case)) => {
                let codec = self.codec(&entry.path)?;
                let case_entry = codec.case_named(case.type_name()).ok_or_else(|| {
                    CodecError::invalid_argument(format!(
                        "{} is not a case of {}",
                        case.type_name(),
                        codec.type_name
                    ))
                })?;
                Ok(NormalizedNode::Choice(ChoiceNode {
                    identifier: entry.qname.clone(),
                    children: self.encode_children(&case_entry.path, case)?,
                }))
            }
            (_, other) => Err(CodecError::invalid_argument(format!(
                "{} value cannot populate {}",
                other.kind_name(),
                entry.path
            ))),
        }
    }

    fn encode_map_entry(
        &self,
        path: &SchemaPath,
        keys: &[QName],
        data: &DataObject,
    ) -> Result<MapEntryNode, CodecError> {
        let children = self.encode_children(path, data)?;
        let mut predicates = BTreeMap::new();
        for key in keys {
            let value = children
                .get(key)
                .and_then(NormalizedNode::leaf_value)
                .ok_or_else(|| {
                    CodecError::invalid_argument(format!(
                        "entry of {} lacks key leaf {}",
                        path,
                        key.local_name()
                    ))
                })?;
            predicates.insert(key.clone(), value.clone());
        }
        let qname = path
            .last()
            .ok_or_else(|| CodecError::invalid_argument("empty schema path"))?;
        Ok(MapEntryNode {
            identifier: NodeIdentifierWithPredicates::new(qname.clone(), predicates),
            children,
        })
    }

    // ========================================================================
    // Normalized to binding
    // ========================================================================

    /// Object held by `node`, which sits at the data node `path`. `None`
    /// for nodes that do not hold a data object.
    pub fn decode_node(
        &self,
        path: &SchemaPath,
        node: &NormalizedNode,
    ) -> Result<Option<DataObject>, CodecError> {
        match node {
            NormalizedNode::Container(container) => {
                self.decode_children(path, &container.children).map(Some)
            }
            NormalizedNode::MapEntry(entry) => self.decode_map_entry(path, entry).map(Some),
            NormalizedNode::UnkeyedListEntry(entry) => {
                self.decode_children(path, &entry.children).map(Some)
            }
            _ => Ok(None),
        }
    }

    pub fn decode_container_node(
        &self,
        path: &SchemaPath,
        node: &ContainerNode,
    ) -> Result<DataObject, CodecError> {
        self.decode_children(path, &node.children)
    }

    /// Object for the children of a data container, augmentations split out.
    pub fn decode_children(
        &self,
        path: &SchemaPath,
        children: &DataChildren,
    ) -> Result<DataObject, CodecError> {
        let codec = self.codec(path)?;
        let mut data = DataObject::new(codec.type_name.clone());

        for (qname, child) in children {
            let Some(entry) = codec.child_by_qname(qname) else {
                log::debug!("[codec] dropping unknown child {} of {}", qname, path);
                continue;
            };
            let Some(value) = self.decode_child(entry, child)? else {
                continue;
            };
            match entry.augmentation {
                Some(index) => data
                    .augmentation_entry(&codec.augmentations[index].type_name)
                    .set(&entry.property, value),
                None => data.set(&entry.property, value),
            }
        }

        if self.runtime.config().materialize_defaults {
            self.fill_defaults(&codec, &mut data);
        }
        Ok(data)
    }

    fn decode_child(
        &self,
        entry: &ChildEntry,
        node: &NormalizedNode,
    ) -> Result<Option<BindingValue>, CodecError> {
        let value = match (&entry.kind, node) {
            (ChildKind::Leaf { type_def, .. }, NormalizedNode::Leaf(leaf)) => {
                self.values().decode(type_def, &entry.path, &leaf.value)?
            }
            (ChildKind::LeafList(type_def), NormalizedNode::LeafSet(set)) => BindingValue::LeafList(
                set.values
                    .iter()
                    .map(|v| self.values().decode(type_def, &entry.path, v))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            (ChildKind::Container, NormalizedNode::Container(container)) => {
                BindingValue::Container(self.decode_children(&entry.path, &container.children)?)
            }
            (ChildKind::List { .. }, NormalizedNode::Map(map)) => BindingValue::List(
                map.entries
                    .iter()
                    .map(|e| self.decode_map_entry(&entry.path, e))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            (ChildKind::List { .. }, NormalizedNode::UnkeyedList(list)) => BindingValue::List(
                list.entries
                    .iter()
                    .map(|e| self.decode_children(&entry.path, &e.children))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            (ChildKind::Choice, NormalizedNode::Choice(choice)) => {
                return self.decode_choice(&entry.path, choice);
            }
            (_, other) => {
                return Err(CodecError::invalid_argument(format!(
                    "{} node {} does not match its schema",
                    node_kind_name(other),
                    entry.path
                )))
            }
        };
        Ok(Some(value))
    }

    fn decode_map_entry(
        &self,
        path: &SchemaPath,
        entry: &MapEntryNode,
    ) -> Result<DataObject, CodecError> {
        let mut data = self.decode_children(path, &entry.children)?;
        let codec = self.codec(path)?;
        // Keys present only in the predicates.
        for (key, value) in &entry.identifier.keys {
            if entry.children.contains_key(key) {
                continue;
            }
            if let Some(ChildEntry {
                property,
                kind: ChildKind::Leaf { type_def, .. },
                path: leaf_path,
                ..
            }) = codec.child_by_qname(key)
            {
                data.set(property, self.values().decode(type_def, leaf_path, value)?);
            }
        }
        Ok(data)
    }

    fn decode_choice(
        &self,
        path: &SchemaPath,
        choice: &ChoiceNode,
    ) -> Result<Option<BindingValue>, CodecError> {
        let codec = self.codec(path)?;
        // Unknown siblings are skipped here and dropped by `decode_children`.
        let Some(case) = choice.children.keys().find_map(|q| codec.case_for_child(q)) else {
            log::debug!("[codec] no case of {} holds any child, dropping choice", path);
            return Ok(None);
        };
        Ok(Some(BindingValue::Container(
            self.decode_children(&case.path, &choice.children)?,
        )))
    }

    fn fill_defaults(&self, codec: &NodeCodec, data: &mut DataObject) {
        let materializer = DefaultValueMaterializer::new(self.runtime);
        for entry in &codec.children {
            let ChildKind::Leaf {
                has_default: true, ..
            } = entry.kind
            else {
                continue;
            };
            if entry.augmentation.is_some() || data.get(&entry.property).is_some() {
                continue;
            }
            match materializer.leaf_default(&entry.path) {
                Ok(Some(value)) => data.set(&entry.property, value),
                Ok(None) => {}
                Err(e) => log::debug!("[codec] no default for {}: {}", entry.path, e),
            }
        }
    }

    fn schema_node(&self, path: &SchemaPath) -> Result<&'a DataSchemaNode, CodecError> {
        self.runtime
            .schema()
            .find_data_node(path)
            .ok_or_else(|| CodecError::invalid_argument(format!("{} is not a data node", path)))
    }
}

fn node_kind_name(node: &NormalizedNode) -> &'static str {
    match node {
        NormalizedNode::Container(_) => "container",
        NormalizedNode::Leaf(_) => "leaf",
        NormalizedNode::LeafSet(_) => "leaf-set",
        NormalizedNode::Map(_) => "map",
        NormalizedNode::MapEntry(_) => "map entry",
        NormalizedNode::UnkeyedList(_) => "unkeyed list",
        NormalizedNode::UnkeyedListEntry(_) => "unkeyed list entry",
        NormalizedNode::Choice(_) => "choice",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;
    use crate::data::Value;
    use crate::index::Renames;
    use crate::model::{BuiltinType, ModuleBuilder, QNameModule, SchemaContextBuilder};

    fn ns() -> QNameModule {
        QNameModule::new("urn:test:structural", None)
    }

    fn aug_ns() -> QNameModule {
        QNameModule::new("urn:test:structural-aug", None)
    }

    fn q(name: &str) -> QName {
        QName::new(&ns(), name)
    }

    fn path(names: &[&str]) -> SchemaPath {
        SchemaPath::new(names.iter().map(|n| q(n)).collect())
    }

    fn runtime(config: CodecConfig) -> BindingRuntimeContext {
        let base = ModuleBuilder::new("structural", "s", ns()).data(|d| {
            d.container("top", |c| {
                c.leaf("name", BuiltinType::String)
                    .leaf_with_default("enabled", BuiltinType::Boolean, "true")
                    .leaf_list("tags", BuiltinType::String)
                    .list("item", &["id"], |l| {
                        l.leaf("id", BuiltinType::Uint32).leaf("label", BuiltinType::String)
                    })
                    .list("log", &[], |l| l.leaf("line", BuiltinType::String))
                    .choice("transport", |ch| {
                        ch.case("tcp", |t| t.leaf("port", BuiltinType::Uint16))
                            .case("udp", |u| u.leaf("datagram-size", BuiltinType::Uint16))
                    })
            })
        });
        let aug = ModuleBuilder::new("structural-aug", "sa", aug_ns())
            .import("structural", "s")
            .augment(path(&["top"]), |a| a.leaf("extra", BuiltinType::String));
        let ctx = SchemaContextBuilder::new()
            .module(base)
            .module(aug)
            .build()
            .unwrap();
        BindingRuntimeContext::build(Arc::new(ctx), Renames::new(), &config).unwrap()
    }

    fn type_at(runtime: &BindingRuntimeContext, names: &[&str]) -> TypeName {
        runtime.type_for_path(&path(names)).unwrap().name.clone()
    }

    fn sample(runtime: &BindingRuntimeContext) -> DataObject {
        let item = type_at(runtime, &["top", "item"]);
        let log = type_at(runtime, &["top", "log"]);
        let tcp = type_at(runtime, &["top", "transport", "tcp"]);
        let augmentation = runtime.augmentations_of(&path(&["top"]))[0].type_name.clone();
        DataObject::new(type_at(runtime, &["top"]))
            .with("name", BindingValue::String("edge".into()))
            .with(
                "tags",
                BindingValue::LeafList(vec![
                    BindingValue::String("b".into()),
                    BindingValue::String("a".into()),
                ]),
            )
            .with(
                "item",
                BindingValue::List(vec![
                    DataObject::new(item.clone())
                        .with("id", BindingValue::Uint32(1))
                        .with("label", BindingValue::String("one".into())),
                    DataObject::new(item).with("id", BindingValue::Uint32(2)),
                ]),
            )
            .with(
                "log",
                BindingValue::List(vec![
                    DataObject::new(log).with("line", BindingValue::String("boot".into()))
                ]),
            )
            .with(
                "transport",
                BindingValue::Container(DataObject::new(tcp).with("port", BindingValue::Uint16(830))),
            )
            .with_augmentation(
                DataObject::new(augmentation).with("extra", BindingValue::String("x".into())),
            )
    }

    #[test]
    fn test_container_round_trip() {
        let runtime = runtime(CodecConfig::default());
        let cache = CodecCache::new();
        let codec = StructuralCodec::new(&runtime, &cache);
        let data = sample(&runtime);

        let node = codec.encode_node(&path(&["top"]), &data).unwrap();
        let NormalizedNode::Container(container) = &node else {
            panic!("container expected");
        };
        // Augmented leaves sit directly in their target.
        assert_eq!(
            container.child(&QName::new(&aug_ns(), "extra")).and_then(NormalizedNode::leaf_value),
            Some(&Value::String("x".into()))
        );
        let Some(NormalizedNode::Choice(choice)) = container.child(&q("transport")) else {
            panic!("choice expected");
        };
        assert!(choice.child(&q("port")).is_some());
        let Some(NormalizedNode::Map(items)) = container.child(&q("item")) else {
            panic!("map expected");
        };
        assert_eq!(items.entries[1].identifier.keys.get(&q("id")), Some(&Value::Uint32(2)));
        assert!(matches!(container.child(&q("log")), Some(NormalizedNode::UnkeyedList(_))));

        let decoded = codec.decode_node(&path(&["top"]), &node).unwrap().unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_codecs_are_cached_per_path() {
        let runtime = runtime(CodecConfig::default());
        let cache = CodecCache::new();
        let first = cache.get_or_compile(&runtime, &path(&["top"])).unwrap();
        let second = cache.get_or_compile(&runtime, &path(&["top"])).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        assert!(first.child_by_property("name").is_some());
        // Augmented children are reached through their augmentation only.
        assert!(first.child_by_property("extra").is_none());
        let extra = first.child_by_qname(&QName::new(&aug_ns(), "extra")).unwrap();
        assert_eq!(extra.augmentation, Some(0));
    }

    #[test]
    fn test_unknown_data_is_dropped() {
        let runtime = runtime(CodecConfig::default());
        let cache = CodecCache::new();
        let codec = StructuralCodec::new(&runtime, &cache);
        let top = type_at(&runtime, &["top"]);

        let data = DataObject::new(top.clone())
            .with("name", BindingValue::String("edge".into()))
            .with("ghost", BindingValue::Boolean(true))
            .with_augmentation(DataObject::new(TypeName::new("gen::v1::other", "Elsewhere")));
        let encoded = codec.encode_container_node(&path(&["top"]), &data).unwrap();
        assert_eq!(encoded.children.len(), 1);

        let node = encoded.with_child(NormalizedNode::Leaf(LeafNode::new(
            QName::new(&QNameModule::new("urn:test:unknown", None), "stray"),
            Value::Boolean(false),
        )));
        let decoded = codec.decode_container_node(&path(&["top"]), &node).unwrap();
        assert_eq!(decoded, DataObject::new(top).with("name", BindingValue::String("edge".into())));
    }

    #[test]
    fn test_unknown_child_in_choice_is_dropped() {
        let runtime = runtime(CodecConfig::default());
        let cache = CodecCache::new();
        let codec = StructuralCodec::new(&runtime, &cache);
        let top = type_at(&runtime, &["top"]);
        let tcp = type_at(&runtime, &["top", "transport", "tcp"]);

        // The stray namespace orders before the schema's own.
        let transport = ChoiceNode::new(q("transport"))
            .with_child(NormalizedNode::Leaf(LeafNode::new(
                QName::new(&QNameModule::new("urn:a:unknown", None), "stray"),
                Value::Boolean(true),
            )))
            .with_child(NormalizedNode::Leaf(LeafNode::new(q("port"), Value::Uint16(830))));
        let node = ContainerNode::new(q("top")).with_child(transport.into());

        let decoded = codec.decode_container_node(&path(&["top"]), &node).unwrap();
        assert_eq!(
            decoded,
            DataObject::new(top).with(
                "transport",
                BindingValue::Container(DataObject::new(tcp).with("port", BindingValue::Uint16(830))),
            )
        );

        let only_stray = ChoiceNode::new(q("transport")).with_child(NormalizedNode::Leaf(
            LeafNode::new(QName::new(&QNameModule::new("urn:a:unknown", None), "stray"), Value::Empty),
        ));
        let node = ContainerNode::new(q("top")).with_child(only_stray.into());
        let decoded = codec.decode_container_node(&path(&["top"]), &node).unwrap();
        assert!(decoded.get("transport").is_none());
    }

    #[test]
    fn test_shape_errors() {
        let runtime = runtime(CodecConfig::default());
        let cache = CodecCache::new();
        let codec = StructuralCodec::new(&runtime, &cache);

        let wrong_type = DataObject::new(type_at(&runtime, &["top", "item"]));
        assert!(matches!(
            codec.encode_node(&path(&["top"]), &wrong_type),
            Err(CodecError::InvalidArgument(_))
        ));

        let keyless = DataObject::new(type_at(&runtime, &["top", "item"]))
            .with("label", BindingValue::String("none".into()));
        assert!(matches!(
            codec.encode_node(&path(&["top", "item"]), &keyless),
            Err(CodecError::InvalidArgument(_))
        ));

        let misplaced = ContainerNode::new(q("top"))
            .with_child(ContainerNode::new(q("name")).into());
        assert!(matches!(
            codec.decode_container_node(&path(&["top"]), &misplaced),
            Err(CodecError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_key_only_in_predicates() {
        let runtime = runtime(CodecConfig::default());
        let cache = CodecCache::new();
        let codec = StructuralCodec::new(&runtime, &cache);
        let entry = MapEntryNode::new(NodeIdentifierWithPredicates::single(
            q("item"),
            q("id"),
            Value::Uint32(7),
        ));
        let decoded = codec
            .decode_node(&path(&["top", "item"]), &NormalizedNode::from(entry))
            .unwrap()
            .unwrap();
        assert_eq!(decoded.get("id"), Some(&BindingValue::Uint32(7)));
    }

    #[test]
    fn test_defaults_fill_absent_leaves() {
        let plain = runtime(CodecConfig::default());
        let cache = CodecCache::new();
        let empty = ContainerNode::new(q("top"));
        let decoded = StructuralCodec::new(&plain, &cache)
            .decode_container_node(&path(&["top"]), &empty)
            .unwrap();
        assert!(decoded.get("enabled").is_none());

        let filling = runtime(CodecConfig::default().with_materialized_defaults(true));
        let cache = CodecCache::new();
        let decoded = StructuralCodec::new(&filling, &cache)
            .decode_container_node(&path(&["top"]), &empty)
            .unwrap();
        assert_eq!(decoded.get("enabled"), Some(&BindingValue::Boolean(true)));
        assert!(decoded.get("name").is_none());
    }
}
