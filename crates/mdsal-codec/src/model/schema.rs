// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema nodes and modules.

use super::path::SchemaPath;
use super::qname::{QName, QNameModule};
use super::types::{Status, TypeDefinition};

/// A node of the data tree, an operation's input/output, or a
/// notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSchemaNode {
    pub qname: QName,
    pub path: SchemaPath,
    pub status: Status,
    /// Contributed to its parent by an `augment` statement.
    pub augmenting: bool,
    /// Instantiated from a grouping.
    pub added_by_uses: bool,
    pub kind: NodeKind,
}

/// Node kinds and their kind-specific state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Container(ContainerSchema),
    List(ListSchema),
    Leaf(LeafSchema),
    LeafList(LeafListSchema),
    Choice(ChoiceSchema),
    Case(CaseSchema),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerSchema {
    pub presence: bool,
    pub children: Vec<DataSchemaNode>,
    pub augmentations: Vec<AugmentationSchema>,
    pub actions: Vec<OperationSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSchema {
    pub keys: Vec<QName>,
    pub ordered_by_user: bool,
    pub children: Vec<DataSchemaNode>,
    pub augmentations: Vec<AugmentationSchema>,
    pub actions: Vec<OperationSchema>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafSchema {
    pub type_def: TypeDefinition,
    pub default_value: Option<String>,
    pub mandatory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafListSchema {
    pub type_def: TypeDefinition,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChoiceSchema {
    /// Case nodes, each of [`NodeKind::Case`].
    pub cases: Vec<DataSchemaNode>,
    pub default_case: Option<QName>,
    pub augmentations: Vec<AugmentationSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseSchema {
    pub children: Vec<DataSchemaNode>,
    pub augmentations: Vec<AugmentationSchema>,
}

/// An `augment` statement as seen from its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentationSchema {
    pub target: SchemaPath,
    /// Module declaring the augment.
    pub module: QNameModule,
    /// Explicit generated-type name, if the augment carries one.
    pub identifier: Option<String>,
    /// Children contributed to the target.
    pub children: Vec<QName>,
}

/// An rpc or action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSchema {
    pub qname: QName,
    pub path: SchemaPath,
    pub status: Status,
    /// Container node named `input`.
    pub input: DataSchemaNode,
    /// Container node named `output`.
    pub output: DataSchemaNode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingSchema {
    pub qname: QName,
    pub path: SchemaPath,
    pub children: Vec<DataSchemaNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySchema {
    pub qname: QName,
    pub bases: Vec<QName>,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub module_name: String,
    pub prefix: String,
}

/// A module of the schema model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub name: String,
    pub prefix: String,
    pub qname_module: QNameModule,
    pub imports: Vec<Import>,
    pub typedefs: Vec<TypeDefinition>,
    pub identities: Vec<IdentitySchema>,
    pub groupings: Vec<GroupingSchema>,
    pub children: Vec<DataSchemaNode>,
    pub rpcs: Vec<OperationSchema>,
    /// Notification bodies, each of [`NodeKind::Container`].
    pub notifications: Vec<DataSchemaNode>,
    /// Augments declared by this module.
    pub augmentations: Vec<AugmentationSchema>,
}

impl Module {
    /// Module name bound to `prefix` in this module, including its own.
    pub fn module_name_for_prefix(&self, prefix: &str) -> Option<&str> {
        if prefix == self.prefix {
            return Some(&self.name);
        }
        self.imports
            .iter()
            .find(|i| i.prefix == prefix)
            .map(|i| i.module_name.as_str())
    }

    pub fn typedef(&self, local_name: &str) -> Option<&TypeDefinition> {
        self.typedefs
            .iter()
            .find(|t| t.qname.local_name() == local_name)
    }

    pub fn data_child(&self, qname: &QName) -> Option<&DataSchemaNode> {
        find_data_child(&self.children, qname)
    }
}

impl DataSchemaNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_) | NodeKind::LeafList(_))
    }

    pub fn is_choice_or_case(&self) -> bool {
        matches!(self.kind, NodeKind::Choice(_) | NodeKind::Case(_))
    }

    /// Direct schema children; cases for a choice.
    pub fn children(&self) -> &[DataSchemaNode] {
        match &self.kind {
            NodeKind::Container(c) => &c.children,
            NodeKind::List(l) => &l.children,
            NodeKind::Choice(c) => &c.cases,
            NodeKind::Case(c) => &c.children,
            NodeKind::Leaf(_) | NodeKind::LeafList(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<DataSchemaNode>> {
        match &mut self.kind {
            NodeKind::Container(c) => Some(&mut c.children),
            NodeKind::List(l) => Some(&mut l.children),
            NodeKind::Choice(c) => Some(&mut c.cases),
            NodeKind::Case(c) => Some(&mut c.children),
            NodeKind::Leaf(_) | NodeKind::LeafList(_) => None,
        }
    }

    pub fn augmentations(&self) -> &[AugmentationSchema] {
        match &self.kind {
            NodeKind::Container(c) => &c.augmentations,
            NodeKind::List(l) => &l.augmentations,
            NodeKind::Choice(c) => &c.augmentations,
            NodeKind::Case(c) => &c.augmentations,
            NodeKind::Leaf(_) | NodeKind::LeafList(_) => &[],
        }
    }

    pub(crate) fn augmentations_mut(&mut self) -> Option<&mut Vec<AugmentationSchema>> {
        match &mut self.kind {
            NodeKind::Container(c) => Some(&mut c.augmentations),
            NodeKind::List(l) => Some(&mut l.augmentations),
            NodeKind::Choice(c) => Some(&mut c.augmentations),
            NodeKind::Case(c) => Some(&mut c.augmentations),
            NodeKind::Leaf(_) | NodeKind::LeafList(_) => None,
        }
    }

    pub fn actions(&self) -> &[OperationSchema] {
        match &self.kind {
            NodeKind::Container(c) => &c.actions,
            NodeKind::List(l) => &l.actions,
            _ => &[],
        }
    }

    pub(crate) fn actions_mut(&mut self) -> Option<&mut Vec<OperationSchema>> {
        match &mut self.kind {
            NodeKind::Container(c) => Some(&mut c.actions),
            NodeKind::List(l) => Some(&mut l.actions),
            _ => None,
        }
    }

    /// Direct schema child by name.
    pub fn child(&self, qname: &QName) -> Option<&DataSchemaNode> {
        self.children().iter().find(|c| &c.qname == qname)
    }

    /// Data child by name, looking through choice and case nodes.
    pub fn data_child(&self, qname: &QName) -> Option<&DataSchemaNode> {
        find_data_child(self.children(), qname)
    }

    /// Key leaves of a list, empty for anything else.
    pub fn list_keys(&self) -> &[QName] {
        match &self.kind {
            NodeKind::List(l) => &l.keys,
            _ => &[],
        }
    }

    /// Type of a leaf or leaf-list.
    pub fn leaf_type(&self) -> Option<&TypeDefinition> {
        match &self.kind {
            NodeKind::Leaf(l) => Some(&l.type_def),
            NodeKind::LeafList(l) => Some(&l.type_def),
            _ => None,
        }
    }
}

/// Data child lookup, transparent through choice and case nodes.
pub(crate) fn find_data_child<'a>(
    children: &'a [DataSchemaNode],
    qname: &QName,
) -> Option<&'a DataSchemaNode> {
    for child in children {
        match &child.kind {
            NodeKind::Choice(choice) => {
                for case in &choice.cases {
                    if let Some(found) = find_data_child(case.children(), qname) {
                        return Some(found);
                    }
                }
            }
            NodeKind::Case(case) => {
                if let Some(found) = find_data_child(&case.children, qname) {
                    return Some(found);
                }
            }
            _ if &child.qname == qname => return Some(child),
            _ => {}
        }
    }
    None
}

impl OperationSchema {
    pub fn input_qname(&self) -> &QName {
        &self.input.qname
    }

    pub fn output_qname(&self) -> &QName {
        &self.output.qname
    }
}
