// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The immutable set of modules a codec is built against.

use super::path::SchemaPath;
use super::qname::{QName, QNameModule};
use super::schema::{DataSchemaNode, GroupingSchema, IdentitySchema, Module, OperationSchema};
use super::types::{BuiltinType, Restrictions, TypeDefinition, TypeShape};
use crate::error::SchemaError;
use std::collections::HashSet;

/// Anything addressable by a [`SchemaPath`].
#[derive(Debug, Clone, Copy)]
pub enum SchemaNodeRef<'a> {
    Data(&'a DataSchemaNode),
    Operation(&'a OperationSchema),
    Grouping(&'a GroupingSchema),
}

impl<'a> SchemaNodeRef<'a> {
    pub fn as_data(&self) -> Option<&'a DataSchemaNode> {
        match self {
            Self::Data(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_operation(&self) -> Option<&'a OperationSchema> {
        match self {
            Self::Operation(op) => Some(op),
            _ => None,
        }
    }

    fn step(self, qname: &QName) -> Option<SchemaNodeRef<'a>> {
        match self {
            Self::Data(node) => node.child(qname).map(Self::Data).or_else(|| {
                node.actions()
                    .iter()
                    .find(|a| &a.qname == qname)
                    .map(Self::Operation)
            }),
            Self::Operation(op) => {
                if &op.input.qname == qname {
                    Some(Self::Data(&op.input))
                } else if &op.output.qname == qname {
                    Some(Self::Data(&op.output))
                } else {
                    None
                }
            }
            Self::Grouping(g) => g.children.iter().find(|c| &c.qname == qname).map(Self::Data),
        }
    }
}

/// A typedef chain: the starting type first, the built-in carrier last.
#[derive(Debug, Clone)]
pub struct TypeChain<'a> {
    links: Vec<&'a TypeDefinition>,
    builtin: &'a BuiltinType,
}

impl<'a> TypeChain<'a> {
    pub fn links(&self) -> &[&'a TypeDefinition] {
        &self.links
    }

    /// The built-in type terminating the chain.
    pub fn builtin(&self) -> &'a BuiltinType {
        self.builtin
    }

    /// Restrictions of every level, most derived first.
    pub fn restrictions(&self) -> impl Iterator<Item = &'a Restrictions> + '_ {
        self.links.iter().map(|d| &d.restrictions)
    }

    /// Nearest default along the chain.
    pub fn default_value(&self) -> Option<&'a str> {
        self.links.iter().find_map(|d| d.default_value.as_deref())
    }

    /// Nearest units along the chain.
    pub fn units(&self) -> Option<&'a str> {
        self.links.iter().find_map(|d| d.units.as_deref())
    }
}

/// Immutable schema model.
#[derive(Debug, Clone, Default)]
pub struct SchemaContext {
    modules: Vec<Module>,
}

impl SchemaContext {
    pub(crate) fn from_modules(mut modules: Vec<Module>) -> Self {
        modules.sort_by(|a, b| a.name.cmp(&b.name));
        Self { modules }
    }

    /// Modules ordered by name.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module_by_name(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn module_for(&self, module: &QNameModule) -> Option<&Module> {
        self.modules.iter().find(|m| &m.qname_module == module)
    }

    /// Every revision of the modules declaring `namespace`, oldest first.
    pub fn modules_for_namespace<'a>(
        &'a self,
        namespace: &'a str,
    ) -> impl Iterator<Item = &'a Module> + 'a {
        let mut found: Vec<&Module> = self
            .modules
            .iter()
            .filter(|m| m.qname_module.namespace() == namespace)
            .collect();
        found.sort_by_key(|m| m.qname_module.revision());
        found.into_iter()
    }

    pub fn typedef(&self, qname: &QName) -> Option<&TypeDefinition> {
        self.module_for(qname.module())?.typedef(qname.local_name())
    }

    pub fn identity(&self, qname: &QName) -> Option<&IdentitySchema> {
        self.module_for(qname.module())?
            .identities
            .iter()
            .find(|i| &i.qname == qname)
    }

    /// Whether `identity` derives from `base`, directly or not. An identity
    /// does not derive from itself.
    pub fn is_derived_identity(&self, identity: &QName, base: &QName) -> bool {
        let mut pending: Vec<QName> = self
            .identity(identity)
            .map(|schema| schema.bases.clone())
            .unwrap_or_default();
        let mut seen = HashSet::new();
        while let Some(current) = pending.pop() {
            if &current == base {
                return true;
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(schema) = self.identity(&current) {
                pending.extend(schema.bases.iter().cloned());
            }
        }
        false
    }

    /// Exact lookup of any schema node by path.
    pub fn find_node(&self, path: &SchemaPath) -> Option<SchemaNodeRef<'_>> {
        let (first, rest) = path.components().split_first()?;
        let module = self.module_for(first.module())?;
        let mut current = module
            .children
            .iter()
            .find(|c| &c.qname == first)
            .or_else(|| module.notifications.iter().find(|n| &n.qname == first))
            .map(SchemaNodeRef::Data)
            .or_else(|| {
                module
                    .rpcs
                    .iter()
                    .find(|r| &r.qname == first)
                    .map(SchemaNodeRef::Operation)
            })
            .or_else(|| {
                module
                    .groupings
                    .iter()
                    .find(|g| &g.qname == first)
                    .map(SchemaNodeRef::Grouping)
            })?;
        for qname in rest {
            current = current.step(qname)?;
        }
        Some(current)
    }

    pub fn find_data_node(&self, path: &SchemaPath) -> Option<&DataSchemaNode> {
        self.find_node(path)?.as_data()
    }

    /// Whether the path is rooted at a grouping rather than the data tree.
    pub fn is_in_grouping(&self, path: &SchemaPath) -> bool {
        let Some(first) = path.components().first() else {
            return false;
        };
        let Some(module) = self.module_for(first.module()) else {
            return false;
        };
        module.data_child(first).is_none()
            && !module.notifications.iter().any(|n| &n.qname == first)
            && !module.rpcs.iter().any(|r| &r.qname == first)
            && module.groupings.iter().any(|g| &g.qname == first)
    }

    /// Follow typedef references down to the built-in type.
    pub fn type_chain<'a>(&'a self, def: &'a TypeDefinition) -> Result<TypeChain<'a>, SchemaError> {
        let mut links = vec![def];
        let mut seen = HashSet::new();
        let mut current = def;
        loop {
            match &current.shape {
                TypeShape::Builtin(builtin) => return Ok(TypeChain { links, builtin }),
                TypeShape::Derived(base) => {
                    if !seen.insert(base.clone()) {
                        return Err(SchemaError::CyclicTypedef(base.clone()));
                    }
                    current = self
                        .typedef(base)
                        .ok_or_else(|| SchemaError::UnknownTypedef(base.clone()))?;
                    links.push(current);
                }
            }
        }
    }

    /// Built-in type at the end of a typedef chain.
    pub fn base_type<'a>(
        &'a self,
        def: &'a TypeDefinition,
    ) -> Result<&'a BuiltinType, SchemaError> {
        Ok(self.type_chain(def)?.builtin())
    }
}
