// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builders for assembling a [`SchemaContext`] in memory.
//!
//! Node builders only record names; schema paths are assigned when the
//! context is built. At that point `uses` statements are expanded (nodes take
//! the namespace of the using module and are flagged `added_by_uses`) and
//! augments are merged into their targets (flagged `augmenting`).

use super::context::SchemaContext;
use super::path::SchemaPath;
use super::qname::{QName, QNameModule};
use super::schema::{
    AugmentationSchema, CaseSchema, ChoiceSchema, ContainerSchema, DataSchemaNode, GroupingSchema,
    IdentitySchema, Import, LeafListSchema, LeafSchema, ListSchema, Module, NodeKind,
    OperationSchema,
};
use super::types::{Status, TypeDefinition};
use crate::error::SchemaError;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Draft {
    Container {
        name: String,
        body: NodeBuilder,
    },
    List {
        name: String,
        keys: Vec<String>,
        body: NodeBuilder,
    },
    Leaf {
        name: String,
        type_def: TypeDefinition,
        default_value: Option<String>,
        mandatory: bool,
    },
    LeafList {
        name: String,
        type_def: TypeDefinition,
    },
    Choice {
        name: String,
        body: ChoiceBuilder,
    },
    Uses(QName),
}

#[derive(Debug, Clone)]
struct OperationDraft {
    name: String,
    input: NodeBuilder,
    output: NodeBuilder,
}

/// Children of a container, list, case, grouping or operation body.
#[derive(Debug, Clone, Default)]
pub struct NodeBuilder {
    drafts: Vec<Draft>,
    actions: Vec<OperationDraft>,
    presence: bool,
    ordered_by_user: bool,
    status: Status,
}

impl NodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leaf(mut self, name: &str, type_def: impl Into<TypeDefinition>) -> Self {
        self.drafts.push(Draft::Leaf {
            name: name.to_string(),
            type_def: type_def.into(),
            default_value: None,
            mandatory: false,
        });
        self
    }

    pub fn leaf_with_default(
        mut self,
        name: &str,
        type_def: impl Into<TypeDefinition>,
        default_value: &str,
    ) -> Self {
        self.drafts.push(Draft::Leaf {
            name: name.to_string(),
            type_def: type_def.into(),
            default_value: Some(default_value.to_string()),
            mandatory: false,
        });
        self
    }

    pub fn mandatory_leaf(mut self, name: &str, type_def: impl Into<TypeDefinition>) -> Self {
        self.drafts.push(Draft::Leaf {
            name: name.to_string(),
            type_def: type_def.into(),
            default_value: None,
            mandatory: true,
        });
        self
    }

    pub fn leaf_list(mut self, name: &str, type_def: impl Into<TypeDefinition>) -> Self {
        self.drafts.push(Draft::LeafList {
            name: name.to_string(),
            type_def: type_def.into(),
        });
        self
    }

    pub fn container(mut self, name: &str, build: impl FnOnce(NodeBuilder) -> NodeBuilder) -> Self {
        self.drafts.push(Draft::Container {
            name: name.to_string(),
            body: build(NodeBuilder::new()),
        });
        self
    }

    pub fn list(
        mut self,
        name: &str,
        keys: &[&str],
        build: impl FnOnce(NodeBuilder) -> NodeBuilder,
    ) -> Self {
        self.drafts.push(Draft::List {
            name: name.to_string(),
            keys: keys.iter().map(|k| (*k).to_string()).collect(),
            body: build(NodeBuilder::new()),
        });
        self
    }

    pub fn choice(
        mut self,
        name: &str,
        build: impl FnOnce(ChoiceBuilder) -> ChoiceBuilder,
    ) -> Self {
        self.drafts.push(Draft::Choice {
            name: name.to_string(),
            body: build(ChoiceBuilder::default()),
        });
        self
    }

    /// Instantiate a grouping here.
    pub fn uses(mut self, grouping: QName) -> Self {
        self.drafts.push(Draft::Uses(grouping));
        self
    }

    pub fn action(
        mut self,
        name: &str,
        input: impl FnOnce(NodeBuilder) -> NodeBuilder,
        output: impl FnOnce(NodeBuilder) -> NodeBuilder,
    ) -> Self {
        self.actions.push(OperationDraft {
            name: name.to_string(),
            input: input(NodeBuilder::new()),
            output: output(NodeBuilder::new()),
        });
        self
    }

    /// Mark the enclosing container as a presence container.
    pub fn presence(mut self) -> Self {
        self.presence = true;
        self
    }

    /// Mark the enclosing list as ordered by the user.
    pub fn ordered_by_user(mut self) -> Self {
        self.ordered_by_user = true;
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

/// Cases of a choice.
#[derive(Debug, Clone, Default)]
pub struct ChoiceBuilder {
    cases: Vec<(String, NodeBuilder)>,
    default_case: Option<String>,
}

impl ChoiceBuilder {
    pub fn case(mut self, name: &str, build: impl FnOnce(NodeBuilder) -> NodeBuilder) -> Self {
        self.cases.push((name.to_string(), build(NodeBuilder::new())));
        self
    }

    pub fn default_case(mut self, name: &str) -> Self {
        self.default_case = Some(name.to_string());
        self
    }
}

#[derive(Debug, Clone)]
struct AugmentDraft {
    target: SchemaPath,
    identifier: Option<String>,
    body: NodeBuilder,
    cases: Option<ChoiceBuilder>,
}

/// One module of the context being built.
#[derive(Debug, Clone)]
pub struct ModuleBuilder {
    name: String,
    prefix: String,
    qname_module: QNameModule,
    imports: Vec<Import>,
    typedefs: Vec<TypeDefinition>,
    identities: Vec<IdentitySchema>,
    groupings: Vec<(String, NodeBuilder)>,
    body: NodeBuilder,
    rpcs: Vec<OperationDraft>,
    notifications: Vec<(String, NodeBuilder)>,
    augments: Vec<AugmentDraft>,
}

impl ModuleBuilder {
    pub fn new(name: &str, prefix: &str, qname_module: QNameModule) -> Self {
        Self {
            name: name.to_string(),
            prefix: prefix.to_string(),
            qname_module,
            imports: Vec::new(),
            typedefs: Vec::new(),
            identities: Vec::new(),
            groupings: Vec::new(),
            body: NodeBuilder::new(),
            rpcs: Vec::new(),
            notifications: Vec::new(),
            augments: Vec::new(),
        }
    }

    /// Name in this module's namespace.
    pub fn qname(&self, local_name: &str) -> QName {
        QName::new(&self.qname_module, local_name)
    }

    pub fn import(mut self, module_name: &str, prefix: &str) -> Self {
        self.imports.push(Import {
            module_name: module_name.to_string(),
            prefix: prefix.to_string(),
        });
        self
    }

    /// Declare a typedef. The definition's name and path are replaced.
    pub fn typedef(mut self, name: &str, mut def: TypeDefinition) -> Self {
        def.qname = self.qname(name);
        def.path = SchemaPath::root().child(def.qname.clone());
        self.typedefs.push(def);
        self
    }

    pub fn identity(mut self, name: &str, bases: &[QName]) -> Self {
        self.identities.push(IdentitySchema {
            qname: self.qname(name),
            bases: bases.to_vec(),
            status: Status::Current,
        });
        self
    }

    pub fn grouping(mut self, name: &str, build: impl FnOnce(NodeBuilder) -> NodeBuilder) -> Self {
        self.groupings.push((name.to_string(), build(NodeBuilder::new())));
        self
    }

    /// Add top-level data nodes.
    pub fn data(mut self, build: impl FnOnce(NodeBuilder) -> NodeBuilder) -> Self {
        let body = std::mem::take(&mut self.body);
        self.body = build(body);
        self
    }

    pub fn rpc(
        mut self,
        name: &str,
        input: impl FnOnce(NodeBuilder) -> NodeBuilder,
        output: impl FnOnce(NodeBuilder) -> NodeBuilder,
    ) -> Self {
        self.rpcs.push(OperationDraft {
            name: name.to_string(),
            input: input(NodeBuilder::new()),
            output: output(NodeBuilder::new()),
        });
        self
    }

    pub fn notification(
        mut self,
        name: &str,
        build: impl FnOnce(NodeBuilder) -> NodeBuilder,
    ) -> Self {
        self.notifications
            .push((name.to_string(), build(NodeBuilder::new())));
        self
    }

    /// Augment a container, list, case or operation body.
    pub fn augment(
        mut self,
        target: SchemaPath,
        build: impl FnOnce(NodeBuilder) -> NodeBuilder,
    ) -> Self {
        self.augments.push(AugmentDraft {
            target,
            identifier: None,
            body: build(NodeBuilder::new()),
            cases: None,
        });
        self
    }

    /// Augment with an explicit generated-type name.
    pub fn augment_named(
        mut self,
        identifier: &str,
        target: SchemaPath,
        build: impl FnOnce(NodeBuilder) -> NodeBuilder,
    ) -> Self {
        self.augments.push(AugmentDraft {
            target,
            identifier: Some(identifier.to_string()),
            body: build(NodeBuilder::new()),
            cases: None,
        });
        self
    }

    /// Augment a choice with additional cases.
    pub fn augment_choice(
        mut self,
        target: SchemaPath,
        build: impl FnOnce(ChoiceBuilder) -> ChoiceBuilder,
    ) -> Self {
        self.augments.push(AugmentDraft {
            target,
            identifier: None,
            body: NodeBuilder::new(),
            cases: Some(build(ChoiceBuilder::default())),
        });
        self
    }
}

/// Assembles modules into a [`SchemaContext`].
#[derive(Debug, Clone, Default)]
pub struct SchemaContextBuilder {
    modules: Vec<ModuleBuilder>,
}

type GroupingTable = HashMap<QName, NodeBuilder>;

impl SchemaContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module(mut self, module: ModuleBuilder) -> Self {
        self.modules.push(module);
        self
    }

    /// Resolve `uses`, apply augments and freeze the result.
    pub fn build(self) -> Result<SchemaContext, SchemaError> {
        let mut groupings = GroupingTable::new();
        for m in &self.modules {
            for (name, body) in &m.groupings {
                groupings.insert(m.qname(name), body.clone());
            }
        }

        let mut modules = Vec::with_capacity(self.modules.len());
        let mut pending = Vec::new();
        for m in self.modules {
            let ns = &m.qname_module;
            let root = SchemaPath::root();
            let mut module = Module {
                name: m.name.clone(),
                prefix: m.prefix.clone(),
                qname_module: ns.clone(),
                imports: m.imports.clone(),
                typedefs: m.typedefs.clone(),
                identities: m.identities.clone(),
                groupings: Vec::new(),
                children: materialize_all(&m.body, &root, ns, &groupings, &mut Vec::new())?,
                rpcs: Vec::new(),
                notifications: Vec::new(),
                augmentations: Vec::new(),
            };
            for (name, body) in &m.groupings {
                let qname = m.qname(name);
                let path = root.child(qname.clone());
                let children = materialize_all(body, &path, ns, &groupings, &mut vec![qname.clone()])?;
                module.groupings.push(GroupingSchema {
                    qname,
                    path,
                    children,
                });
            }
            for op in &m.rpcs {
                module
                    .rpcs
                    .push(materialize_operation(op, &root, ns, &groupings)?);
            }
            for (name, body) in &m.notifications {
                let qname = m.qname(name);
                let path = root.child(qname.clone());
                let children = materialize_all(body, &path, ns, &groupings, &mut Vec::new())?;
                module.notifications.push(DataSchemaNode {
                    qname,
                    path,
                    status: body.status,
                    augmenting: false,
                    added_by_uses: false,
                    kind: NodeKind::Container(ContainerSchema {
                        children,
                        ..Default::default()
                    }),
                });
            }
            for augment in m.augments {
                pending.push((ns.clone(), augment));
            }
            modules.push(module);
        }

        // Augments may target nodes contributed by other augments; keep
        // sweeping until every target has appeared.
        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            for (ns, augment) in pending {
                if find_data_mut(&mut modules, &augment.target).is_some() {
                    apply_augment(&mut modules, &ns, augment, &groupings)?;
                } else {
                    deferred.push((ns, augment));
                }
            }
            if deferred.len() == before {
                let (_, augment) = &deferred[0];
                return Err(SchemaError::InvalidPath(format!(
                    "augment target {} not found",
                    augment.target
                )));
            }
            pending = deferred;
        }

        for module in &modules {
            for node in &module.children {
                check_list_keys(node)?;
            }
        }

        Ok(SchemaContext::from_modules(modules))
    }
}

fn materialize_all(
    body: &NodeBuilder,
    parent: &SchemaPath,
    ns: &QNameModule,
    groupings: &GroupingTable,
    stack: &mut Vec<QName>,
) -> Result<Vec<DataSchemaNode>, SchemaError> {
    let mut out = Vec::new();
    for draft in &body.drafts {
        match draft {
            Draft::Uses(grouping) => {
                if stack.contains(grouping) {
                    return Err(SchemaError::InvalidPath(format!(
                        "grouping {} uses itself",
                        grouping
                    )));
                }
                let used = groupings.get(grouping).ok_or_else(|| {
                    SchemaError::InvalidPath(format!("unknown grouping {}", grouping))
                })?;
                stack.push(grouping.clone());
                let mut nodes = materialize_all(used, parent, ns, groupings, stack)?;
                stack.pop();
                for node in &mut nodes {
                    node.added_by_uses = true;
                }
                out.extend(nodes);
            }
            other => out.push(materialize(other, parent, ns, groupings, stack)?),
        }
    }
    Ok(out)
}

fn materialize(
    draft: &Draft,
    parent: &SchemaPath,
    ns: &QNameModule,
    groupings: &GroupingTable,
    stack: &mut Vec<QName>,
) -> Result<DataSchemaNode, SchemaError> {
    let (name, status, kind) = match draft {
        Draft::Container { name, body } => {
            let path = parent.child(QName::new(ns, name.as_str()));
            let kind = NodeKind::Container(ContainerSchema {
                presence: body.presence,
                children: materialize_all(body, &path, ns, groupings, stack)?,
                augmentations: Vec::new(),
                actions: materialize_actions(body, &path, ns, groupings)?,
            });
            (name, body.status, kind)
        }
        Draft::List { name, keys, body } => {
            let path = parent.child(QName::new(ns, name.as_str()));
            let kind = NodeKind::List(ListSchema {
                keys: keys.iter().map(|k| QName::new(ns, k.as_str())).collect(),
                ordered_by_user: body.ordered_by_user,
                children: materialize_all(body, &path, ns, groupings, stack)?,
                augmentations: Vec::new(),
                actions: materialize_actions(body, &path, ns, groupings)?,
            });
            (name, body.status, kind)
        }
        Draft::Leaf {
            name,
            type_def,
            default_value,
            mandatory,
        } => (
            name,
            type_def.status,
            NodeKind::Leaf(LeafSchema {
                type_def: type_def.clone(),
                default_value: default_value.clone(),
                mandatory: *mandatory,
            }),
        ),
        Draft::LeafList { name, type_def } => (
            name,
            type_def.status,
            NodeKind::LeafList(LeafListSchema {
                type_def: type_def.clone(),
            }),
        ),
        Draft::Choice { name, body } => {
            let path = parent.child(QName::new(ns, name.as_str()));
            let cases = body
                .cases
                .iter()
                .map(|(case, case_body)| materialize_case(case, case_body, &path, ns, groupings, stack))
                .collect::<Result<Vec<_>, _>>()?;
            let kind = NodeKind::Choice(ChoiceSchema {
                cases,
                default_case: body.default_case.as_ref().map(|d| QName::new(ns, d.as_str())),
                augmentations: Vec::new(),
            });
            (name, Status::Current, kind)
        }
        Draft::Uses(grouping) => {
            return Err(SchemaError::InvalidPath(format!(
                "unexpanded uses of {}",
                grouping
            )))
        }
    };
    let qname = QName::new(ns, name.as_str());
    Ok(DataSchemaNode {
        path: parent.child(qname.clone()),
        qname,
        status,
        augmenting: false,
        added_by_uses: false,
        kind,
    })
}

fn materialize_case(
    name: &str,
    body: &NodeBuilder,
    parent: &SchemaPath,
    ns: &QNameModule,
    groupings: &GroupingTable,
    stack: &mut Vec<QName>,
) -> Result<DataSchemaNode, SchemaError> {
    let qname = QName::new(ns, name);
    let path = parent.child(qname.clone());
    let children = materialize_all(body, &path, ns, groupings, stack)?;
    Ok(DataSchemaNode {
        qname,
        path,
        status: body.status,
        augmenting: false,
        added_by_uses: false,
        kind: NodeKind::Case(CaseSchema {
            children,
            augmentations: Vec::new(),
        }),
    })
}

fn materialize_actions(
    body: &NodeBuilder,
    parent: &SchemaPath,
    ns: &QNameModule,
    groupings: &GroupingTable,
) -> Result<Vec<OperationSchema>, SchemaError> {
    body.actions
        .iter()
        .map(|a| materialize_operation(a, parent, ns, groupings))
        .collect()
}

fn materialize_operation(
    op: &OperationDraft,
    parent: &SchemaPath,
    ns: &QNameModule,
    groupings: &GroupingTable,
) -> Result<OperationSchema, SchemaError> {
    let qname = QName::new(ns, op.name.as_str());
    let path = parent.child(qname.clone());
    let body = |name: &str, draft: &NodeBuilder| -> Result<DataSchemaNode, SchemaError> {
        let qname = QName::new(ns, name);
        let node_path = path.child(qname.clone());
        let children = materialize_all(draft, &node_path, ns, groupings, &mut Vec::new())?;
        Ok(DataSchemaNode {
            qname,
            path: node_path,
            status: Status::Current,
            augmenting: false,
            added_by_uses: false,
            kind: NodeKind::Container(ContainerSchema {
                children,
                ..Default::default()
            }),
        })
    };
    Ok(OperationSchema {
        input: body("input", &op.input)?,
        output: body("output", &op.output)?,
        qname,
        path,
        status: Status::Current,
    })
}

fn apply_augment(
    modules: &mut [Module],
    ns: &QNameModule,
    augment: AugmentDraft,
    groupings: &GroupingTable,
) -> Result<(), SchemaError> {
    let mut children = match &augment.cases {
        Some(cases) => cases
            .cases
            .iter()
            .map(|(name, body)| {
                materialize_case(name, body, &augment.target, ns, groupings, &mut Vec::new())
            })
            .collect::<Result<Vec<_>, _>>()?,
        None => materialize_all(&augment.body, &augment.target, ns, groupings, &mut Vec::new())?,
    };
    for child in &mut children {
        child.augmenting = true;
    }

    let schema = AugmentationSchema {
        target: augment.target.clone(),
        module: ns.clone(),
        identifier: augment.identifier.clone(),
        children: children.iter().map(|c| c.qname.clone()).collect(),
    };

    let invalid = |msg: &str| SchemaError::InvalidPath(format!("{}: {}", augment.target, msg));
    let target = find_data_mut(modules, &augment.target).ok_or_else(|| invalid("not found"))?;
    let is_choice = matches!(target.kind, NodeKind::Choice(_));
    if children
        .iter()
        .any(|c| is_choice != matches!(c.kind, NodeKind::Case(_)))
    {
        return Err(invalid("choices are augmented with cases only"));
    }
    if children.iter().any(|c| target.child(&c.qname).is_some()) {
        return Err(invalid("augment duplicates an existing child"));
    }
    target
        .children_mut()
        .ok_or_else(|| invalid("leaves cannot be augmented"))?
        .extend(children);
    if let Some(augmentations) = target.augmentations_mut() {
        augmentations.push(schema.clone());
    }

    if let Some(owner) = modules.iter_mut().find(|m| &m.qname_module == ns) {
        owner.augmentations.push(schema);
    }
    Ok(())
}

fn find_data_mut<'a>(
    modules: &'a mut [Module],
    path: &SchemaPath,
) -> Option<&'a mut DataSchemaNode> {
    let (first, rest) = path.components().split_first()?;
    let module = modules.iter_mut().find(|m| &m.qname_module == first.module())?;
    if let Some(pos) = module.children.iter().position(|c| &c.qname == first) {
        return descend_mut(&mut module.children[pos], rest);
    }
    if let Some(pos) = module.notifications.iter().position(|c| &c.qname == first) {
        return descend_mut(&mut module.notifications[pos], rest);
    }
    let pos = module.rpcs.iter().position(|r| &r.qname == first)?;
    descend_operation_mut(&mut module.rpcs[pos], rest)
}

fn descend_mut<'a>(node: &'a mut DataSchemaNode, rest: &[QName]) -> Option<&'a mut DataSchemaNode> {
    let Some((next, tail)) = rest.split_first() else {
        return Some(node);
    };
    if let Some(pos) = node.children().iter().position(|c| &c.qname == next) {
        let children = node.children_mut()?;
        return descend_mut(&mut children[pos], tail);
    }
    let pos = node.actions().iter().position(|a| &a.qname == next)?;
    let actions = node.actions_mut()?;
    descend_operation_mut(&mut actions[pos], tail)
}

fn descend_operation_mut<'a>(
    op: &'a mut OperationSchema,
    rest: &[QName],
) -> Option<&'a mut DataSchemaNode> {
    let (next, tail) = rest.split_first()?;
    if &op.input.qname == next {
        descend_mut(&mut op.input, tail)
    } else if &op.output.qname == next {
        descend_mut(&mut op.output, tail)
    } else {
        None
    }
}

fn check_list_keys(node: &DataSchemaNode) -> Result<(), SchemaError> {
    if let NodeKind::List(list) = &node.kind {
        for key in &list.keys {
            let is_leaf = node
                .child(key)
                .is_some_and(|c| matches!(c.kind, NodeKind::Leaf(_)));
            if !is_leaf {
                return Err(SchemaError::InvalidPath(format!(
                    "{}: key {} is not a leaf child",
                    node.path,
                    key.local_name()
                )));
            }
        }
    }
    for child in node.children() {
        check_list_keys(child)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BuiltinType, Revision};

    fn ns(uri: &str) -> QNameModule {
        QNameModule::new(uri, None)
    }

    #[test]
    fn test_paths_are_assigned() {
        let base = ns("urn:base");
        let ctx = SchemaContextBuilder::new()
            .module(ModuleBuilder::new("base", "b", base.clone()).data(|d| {
                d.container("top", |c| {
                    c.list("item", &["id"], |l| {
                        l.leaf("id", BuiltinType::String)
                            .choice("kind", |ch| {
                                ch.case("simple", |c| c.leaf("flag", BuiltinType::Empty))
                            })
                    })
                })
            }))
            .build()
            .unwrap();

        let flag = SchemaPath::new(
            ["top", "item", "kind", "simple", "flag"]
                .iter()
                .map(|n| QName::new(&base, *n))
                .collect(),
        );
        let node = ctx.find_data_node(&flag).unwrap();
        assert!(matches!(node.kind, NodeKind::Leaf(_)));
        assert_eq!(node.path, flag);
    }

    #[test]
    fn test_revisions_of_a_namespace() {
        let rev = |text: &str| QNameModule::new("urn:base", Some(Revision::parse(text).unwrap()));
        let ctx = SchemaContextBuilder::new()
            .module(ModuleBuilder::new("base", "b", rev("2020-02-01")))
            .module(ModuleBuilder::new("base", "b", rev("2014-07-01")))
            .module(ModuleBuilder::new("other", "o", ns("urn:other")))
            .build()
            .unwrap();
        let revisions: Vec<String> = ctx
            .modules_for_namespace("urn:base")
            .filter_map(|m| m.qname_module.revision())
            .map(|r| r.to_string())
            .collect();
        assert_eq!(revisions, vec!["2014-07-01", "2020-02-01"]);
        assert_eq!(ctx.modules_for_namespace("urn:missing").count(), 0);
    }

    #[test]
    fn test_uses_rebinds_namespace() {
        let lib = ns("urn:lib");
        let app = ns("urn:app");
        let lib_module = ModuleBuilder::new("lib", "l", lib.clone())
            .grouping("named", |g| g.leaf("name", BuiltinType::String));
        let grouping = lib_module.qname("named");
        let ctx = SchemaContextBuilder::new()
            .module(lib_module)
            .module(
                ModuleBuilder::new("app", "a", app.clone())
                    .import("lib", "l")
                    .data(|d| d.container("box", |c| c.uses(grouping))),
            )
            .build()
            .unwrap();

        let path = SchemaPath::new(vec![QName::new(&app, "box"), QName::new(&app, "name")]);
        let leaf = ctx.find_data_node(&path).unwrap();
        assert!(leaf.added_by_uses);
        assert!(ctx.is_in_grouping(&SchemaPath::new(vec![QName::new(&lib, "named")])));
    }

    #[test]
    fn test_augment_marks_children() {
        let base = ns("urn:base");
        let ext = ns("urn:ext");
        let top = SchemaPath::new(vec![QName::new(&base, "top")]);
        let ctx = SchemaContextBuilder::new()
            .module(
                ModuleBuilder::new("base", "b", base.clone())
                    .data(|d| d.container("top", |c| c)),
            )
            .module(
                ModuleBuilder::new("ext", "e", ext.clone())
                    .import("base", "b")
                    .augment(top.clone(), |a| a.leaf("extra", BuiltinType::Boolean)),
            )
            .build()
            .unwrap();

        let target = ctx.find_data_node(&top).unwrap();
        assert_eq!(target.augmentations().len(), 1);
        let extra = target.child(&QName::new(&ext, "extra")).unwrap();
        assert!(extra.augmenting);
        assert_eq!(ctx.module_by_name("ext").unwrap().augmentations.len(), 1);
    }

    #[test]
    fn test_missing_augment_target() {
        let base = ns("urn:base");
        let err = SchemaContextBuilder::new()
            .module(ModuleBuilder::new("base", "b", base.clone()).augment(
                SchemaPath::new(vec![QName::new(&base, "nowhere")]),
                |a| a.leaf("x", BuiltinType::String),
            ))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPath(_)));
    }

    #[test]
    fn test_list_key_must_be_leaf() {
        let base = ns("urn:base");
        let err = SchemaContextBuilder::new()
            .module(
                ModuleBuilder::new("base", "b", base)
                    .data(|d| d.list("items", &["id"], |l| l.leaf("name", BuiltinType::String))),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPath(_)));
    }

    #[test]
    fn test_recursive_grouping() {
        let base = ns("urn:base");
        let builder = ModuleBuilder::new("base", "b", base);
        let me = builder.qname("loop");
        let err = SchemaContextBuilder::new()
            .module(
                builder
                    .grouping("loop", |g| g.container("again", |c| c.uses(me.clone())))
                    .data(|d| d.container("root", |c| c.uses(me.clone()))),
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPath(_)));
    }
}
