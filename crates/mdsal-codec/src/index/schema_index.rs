// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema lookups used while indexing: parent modules and leafref targets.

use crate::error::SchemaError;
use crate::model::{
    DataSchemaNode, Module, NodeKind, PathExpression, PathStep, QNameModule, SchemaContext,
    SchemaNodeRef, SchemaPath,
};
use std::sync::Arc;

/// Read-only query layer over a [`SchemaContext`].
#[derive(Debug, Clone)]
pub struct SchemaIndex {
    context: Arc<SchemaContext>,
}

impl SchemaIndex {
    pub fn new(context: Arc<SchemaContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &SchemaContext {
        &self.context
    }

    pub fn shared_context(&self) -> &Arc<SchemaContext> {
        &self.context
    }

    /// Module owning the last component of `path`.
    pub fn find_parent_module(&self, path: &SchemaPath) -> Result<&Module, SchemaError> {
        let last = path
            .last()
            .ok_or_else(|| SchemaError::ModuleNotFound("<root>".into()))?;
        self.context
            .module_for(last.module())
            .ok_or_else(|| SchemaError::ModuleNotFound(last.module().to_string()))
    }

    pub fn is_in_grouping(&self, path: &SchemaPath) -> bool {
        self.context.is_in_grouping(path)
    }

    /// Resolve an absolute path expression against the data tree.
    ///
    /// Unprefixed steps take the namespace of `module`.
    pub fn find_data_tree_schema_node(
        &self,
        module: &Module,
        path: &PathExpression,
    ) -> Option<&DataSchemaNode> {
        if !path.is_absolute() {
            return None;
        }
        let mut current: Option<&DataSchemaNode> = None;
        for step in path.steps() {
            let PathStep::Child { prefix, name } = step else {
                return None;
            };
            let ns = self.resolve_prefix(module, prefix.as_deref());
            let children = match current {
                Some(node) => node.children(),
                None => self.top_level_children(ns.as_ref(), name)?,
            };
            current = Some(lookup_child(children, ns.as_ref(), name)?);
        }
        current
    }

    /// Resolve a relative path expression from the node at `origin`.
    ///
    /// Each `..` climbs one data node; choice and case nodes are skipped.
    /// Climbing past the top lands on the module's top-level nodes.
    pub fn find_data_schema_node_for_relative_xpath(
        &self,
        module: &Module,
        origin: &SchemaPath,
        path: &PathExpression,
    ) -> Option<&DataSchemaNode> {
        if path.is_absolute() {
            return None;
        }
        let mut ancestry = self.data_ancestry(origin);
        let mut steps = path.steps().iter().peekable();
        while let Some(PathStep::Parent) = steps.peek() {
            ancestry.pop()?;
            steps.next();
        }

        let mut base: Option<SchemaNodeRef<'_>> = match ancestry.last() {
            Some(p) => Some(self.context.find_node(p)?),
            None => None,
        };
        let mut found: Option<&DataSchemaNode> = None;
        for step in steps {
            let PathStep::Child { prefix, name } = step else {
                return None;
            };
            let ns = self.resolve_prefix(module, prefix.as_deref());
            let children: &[DataSchemaNode] = match base {
                Some(SchemaNodeRef::Data(node)) => node.children(),
                Some(SchemaNodeRef::Grouping(g)) => &g.children,
                Some(SchemaNodeRef::Operation(_)) => return None,
                None => self.top_level_children(ns.as_ref(), name)?,
            };
            let node = lookup_child(children, ns.as_ref(), name)?;
            base = Some(SchemaNodeRef::Data(node));
            found = Some(node);
        }
        found
    }

    /// Target of a leafref attached to the leaf at `leaf`. Predicates are
    /// ignored. Returns `Ok(None)` when the path does not resolve.
    pub fn resolve_leafref(
        &self,
        leaf: &SchemaPath,
        path: &PathExpression,
    ) -> Result<Option<&DataSchemaNode>, SchemaError> {
        let module = self.find_parent_module(leaf)?;
        Ok(if path.is_absolute() {
            self.find_data_tree_schema_node(module, path)
        } else {
            self.find_data_schema_node_for_relative_xpath(module, leaf, path)
        })
    }

    /// Whether walking the data tree from the root to `path` crosses a node
    /// contributed by an augment. `None` when the walk leaves the data tree.
    pub fn crosses_augmentation(&self, path: &SchemaPath) -> Option<bool> {
        let (first, rest) = path.components().split_first()?;
        let mut current = self
            .context
            .module_for(first.module())?
            .children
            .iter()
            .find(|c| &c.qname == first)?;
        if current.augmenting {
            return Some(true);
        }
        for qname in rest {
            current = current.child(qname)?;
            if current.augmenting {
                return Some(true);
            }
        }
        Some(false)
    }

    /// Paths of the data ancestors of `path`, `path` itself included,
    /// root-most first. Grouping roots count as data ancestors.
    fn data_ancestry(&self, path: &SchemaPath) -> Vec<SchemaPath> {
        path.prefixes()
            .filter(|prefix| match self.context.find_node(prefix) {
                Some(SchemaNodeRef::Data(node)) => !node.is_choice_or_case(),
                Some(SchemaNodeRef::Grouping(_)) => true,
                _ => false,
            })
            .collect()
    }

    fn resolve_prefix(&self, module: &Module, prefix: Option<&str>) -> Option<QNameModule> {
        match prefix {
            None => Some(module.qname_module.clone()),
            Some(p) => module
                .module_name_for_prefix(p)
                .and_then(|name| self.context.module_by_name(name))
                .map(|m| m.qname_module.clone()),
        }
    }

    fn top_level_children(
        &self,
        ns: Option<&QNameModule>,
        name: &str,
    ) -> Option<&[DataSchemaNode]> {
        if let Some(ns) = ns {
            return self.context.module_for(ns).map(|m| m.children.as_slice());
        }
        // Unknown prefix: the module whose top level carries the name.
        self.context
            .modules()
            .iter()
            .find(|m| lookup_child(&m.children, None, name).is_some())
            .map(|m| m.children.as_slice())
    }
}

/// Data child by name, looking through choice and case nodes. An exact
/// namespace match wins; otherwise a unique local-name match is accepted.
fn lookup_child<'a>(
    children: &'a [DataSchemaNode],
    ns: Option<&QNameModule>,
    name: &str,
) -> Option<&'a DataSchemaNode> {
    let mut candidates = Vec::new();
    collect_data_children(children, &mut candidates);
    let named: Vec<&DataSchemaNode> = candidates
        .into_iter()
        .filter(|c| c.qname.local_name() == name)
        .collect();
    if let Some(ns) = ns {
        if let Some(exact) = named.iter().find(|c| c.qname.module() == ns) {
            return Some(*exact);
        }
    }
    match named.as_slice() {
        [only] => Some(*only),
        _ => None,
    }
}

fn collect_data_children<'a>(children: &'a [DataSchemaNode], out: &mut Vec<&'a DataSchemaNode>) {
    for child in children {
        match &child.kind {
            NodeKind::Choice(_) | NodeKind::Case(_) => collect_data_children(child.children(), out),
            _ => out.push(child),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BuiltinType, ModuleBuilder, QName, SchemaContextBuilder, TypeDefinition};

    fn ns() -> QNameModule {
        QNameModule::new("urn:test:index", None)
    }

    fn index() -> SchemaIndex {
        let leafref = |p: &str| TypeDefinition::builtin(BuiltinType::leafref(p).unwrap());
        let ctx = SchemaContextBuilder::new()
            .module(
                ModuleBuilder::new("index", "ix", ns())
                    .grouping("g", |g| g.leaf("ref", leafref("../../name")))
                    .data(|d| {
                        d.container("top", |c| {
                            c.leaf("name", BuiltinType::String)
                                .choice("kind", |ch| {
                                    ch.case("a", |a| a.leaf("a-ref", leafref("../name")))
                                })
                                .container("inner", |i| i.leaf("up", leafref("../../name")))
                        })
                    }),
            )
            .build()
            .unwrap();
        SchemaIndex::new(Arc::new(ctx))
    }

    fn path(names: &[&str]) -> SchemaPath {
        SchemaPath::new(names.iter().map(|n| QName::new(&ns(), *n)).collect())
    }

    #[test]
    fn test_absolute_lookup() {
        let index = index();
        let module = index.find_parent_module(&path(&["top"])).unwrap();
        let expr = PathExpression::parse("/ix:top/ix:name").unwrap();
        let found = index.find_data_tree_schema_node(module, &expr).unwrap();
        assert_eq!(found.path, path(&["top", "name"]));
    }

    #[test]
    fn test_relative_lookup_skips_choice_and_case() {
        let index = index();
        let leaf = path(&["top", "kind", "a", "a-ref"]);
        let expr = PathExpression::parse("../name").unwrap();
        let found = index.resolve_leafref(&leaf, &expr).unwrap().unwrap();
        assert_eq!(found.path, path(&["top", "name"]));

        let nested = path(&["top", "inner", "up"]);
        let expr = PathExpression::parse("../../name").unwrap();
        let found = index.resolve_leafref(&nested, &expr).unwrap().unwrap();
        assert_eq!(found.path, path(&["top", "name"]));
    }

    #[test]
    fn test_grouping_leafref_does_not_resolve() {
        let index = index();
        assert!(index.is_in_grouping(&path(&["g", "ref"])));
        let expr = PathExpression::parse("../../name").unwrap();
        assert!(index
            .resolve_leafref(&path(&["g", "ref"]), &expr)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_parent_module_of_unknown_namespace() {
        let index = index();
        let other = QNameModule::new("urn:elsewhere", None);
        let err = index
            .find_parent_module(&SchemaPath::new(vec![QName::new(&other, "x")]))
            .unwrap_err();
        assert!(matches!(err, SchemaError::ModuleNotFound(_)));
    }
}
