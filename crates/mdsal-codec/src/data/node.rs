// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Normalized node tree.
//!
//! Children are keyed by qualified name. Augmented children sit directly in
//! their target, and a choice node holds the children of its active case.

use super::identifier::{NodeIdentifierWithPredicates, PathArgument};
use super::value::Value;
use crate::model::QName;
use std::collections::BTreeMap;

/// Children of a data container, keyed by node name.
pub type DataChildren = BTreeMap<QName, NormalizedNode>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedNode {
    Container(ContainerNode),
    Leaf(LeafNode),
    LeafSet(LeafSetNode),
    Map(MapNode),
    MapEntry(MapEntryNode),
    UnkeyedList(UnkeyedListNode),
    UnkeyedListEntry(UnkeyedListEntryNode),
    Choice(ChoiceNode),
}

impl NormalizedNode {
    pub fn qname(&self) -> &QName {
        match self {
            Self::Container(n) => &n.identifier,
            Self::Leaf(n) => &n.identifier,
            Self::LeafSet(n) => &n.identifier,
            Self::Map(n) => &n.identifier,
            Self::MapEntry(n) => &n.identifier.qname,
            Self::UnkeyedList(n) => &n.identifier,
            Self::UnkeyedListEntry(n) => &n.identifier,
            Self::Choice(n) => &n.identifier,
        }
    }

    pub fn identifier(&self) -> PathArgument {
        match self {
            Self::MapEntry(n) => PathArgument::NodeIdentifierWithPredicates(n.identifier.clone()),
            other => PathArgument::NodeIdentifier(other.qname().clone()),
        }
    }

    /// Children of a data container node.
    pub fn children(&self) -> Option<&DataChildren> {
        match self {
            Self::Container(n) => Some(&n.children),
            Self::MapEntry(n) => Some(&n.children),
            Self::UnkeyedListEntry(n) => Some(&n.children),
            Self::Choice(n) => Some(&n.children),
            _ => None,
        }
    }

    /// Value of a leaf node.
    pub fn leaf_value(&self) -> Option<&Value> {
        match self {
            Self::Leaf(n) => Some(&n.value),
            _ => None,
        }
    }
}

macro_rules! data_container {
    ($name:ident, $id:ty) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            pub identifier: $id,
            pub children: DataChildren,
        }

        impl $name {
            pub fn new(identifier: $id) -> Self {
                Self {
                    identifier,
                    children: DataChildren::new(),
                }
            }

            /// Add or replace a child.
            pub fn with_child(mut self, child: NormalizedNode) -> Self {
                self.insert(child);
                self
            }

            pub fn insert(&mut self, child: NormalizedNode) {
                self.children.insert(child.qname().clone(), child);
            }

            pub fn child(&self, qname: &QName) -> Option<&NormalizedNode> {
                self.children.get(qname)
            }
        }
    };
}

data_container!(ContainerNode, QName);
data_container!(MapEntryNode, NodeIdentifierWithPredicates);
data_container!(UnkeyedListEntryNode, QName);
data_container!(ChoiceNode, QName);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    pub identifier: QName,
    pub value: Value,
}

impl LeafNode {
    pub fn new(identifier: QName, value: Value) -> Self {
        Self { identifier, value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafSetNode {
    pub identifier: QName,
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapNode {
    pub identifier: QName,
    pub entries: Vec<MapEntryNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnkeyedListNode {
    pub identifier: QName,
    pub entries: Vec<UnkeyedListEntryNode>,
}

impl From<ContainerNode> for NormalizedNode {
    fn from(node: ContainerNode) -> Self {
        Self::Container(node)
    }
}

impl From<LeafNode> for NormalizedNode {
    fn from(node: LeafNode) -> Self {
        Self::Leaf(node)
    }
}

impl From<MapEntryNode> for NormalizedNode {
    fn from(node: MapEntryNode) -> Self {
        Self::MapEntry(node)
    }
}

impl From<ChoiceNode> for NormalizedNode {
    fn from(node: ChoiceNode) -> Self {
        Self::Choice(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QNameModule;

    #[test]
    fn test_container_children_keyed_by_name() {
        let ns = QNameModule::new("urn:test", None);
        let name = QName::new(&ns, "name");
        let node = ContainerNode::new(QName::new(&ns, "top"))
            .with_child(LeafNode::new(name.clone(), Value::String("a".into())).into())
            .with_child(LeafNode::new(name.clone(), Value::String("b".into())).into());
        assert_eq!(node.children.len(), 1);
        assert_eq!(
            node.child(&name).and_then(NormalizedNode::leaf_value),
            Some(&Value::String("b".into()))
        );
    }

    #[test]
    fn test_map_entry_identifier() {
        let ns = QNameModule::new("urn:test", None);
        let list = QName::new(&ns, "list");
        let key = QName::new(&ns, "id");
        let entry = MapEntryNode::new(NodeIdentifierWithPredicates::single(
            list.clone(),
            key,
            Value::Uint32(7),
        ));
        let node = NormalizedNode::from(entry);
        assert_eq!(node.qname(), &list);
        assert!(matches!(
            node.identifier(),
            PathArgument::NodeIdentifierWithPredicates(_)
        ));
        assert!(node.children().is_some());
    }
}
