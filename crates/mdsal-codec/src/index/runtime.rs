// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binding runtime context: every generated type of a schema, indexed both
//! by schema path and by name.
//!
//! Built once, after the type provider, and read-only afterwards. A context
//! either builds completely or not at all.

use super::schema_index::SchemaIndex;
use super::type_provider::{identity_type_name, Renames, TypeProvider, TypeResolver};
use crate::binding::naming::{class_name, property_name, root_module_path};
use crate::binding::{GeneratedType, Property, TypeKind, TypeName, TypeRef};
use crate::config::CodecConfig;
use crate::error::SchemaError;
use crate::model::{
    AugmentationSchema, BuiltinType, DataSchemaNode, GroupingSchema, NodeKind, OperationSchema,
    PathExpression, QName, QNameModule, SchemaContext, SchemaPath, Status, TypeDefinition,
    TypeShape,
};
use std::collections::HashMap;
use std::sync::Arc;

/// An augmentation's generated type and the children it contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentationInfo {
    pub type_name: TypeName,
    pub target: SchemaPath,
    /// Module declaring the augment.
    pub module: QNameModule,
    pub children: Vec<QName>,
}

#[derive(Debug, Default)]
struct RuntimeTables {
    types_by_path: HashMap<SchemaPath, Arc<GeneratedType>>,
    types_by_name: HashMap<TypeName, Arc<GeneratedType>>,
    keys_by_list: HashMap<SchemaPath, Arc<GeneratedType>>,
    leaf_types: HashMap<SchemaPath, TypeRef>,
    augmentations_by_target: HashMap<SchemaPath, Vec<Arc<AugmentationInfo>>>,
    augmentation_by_child: HashMap<(SchemaPath, QName), Arc<AugmentationInfo>>,
    augmentation_by_name: HashMap<TypeName, Arc<AugmentationInfo>>,
    identity_by_name: HashMap<TypeName, QName>,
    identity_names: HashMap<QName, TypeName>,
}

/// Generated types of a schema and the reverse indexes the codecs need.
#[derive(Debug)]
pub struct BindingRuntimeContext {
    provider: TypeProvider,
    tables: RuntimeTables,
}

impl BindingRuntimeContext {
    /// Index `context`. Fails on the first schema inconsistency.
    pub fn build(
        context: Arc<SchemaContext>,
        renames: Renames,
        config: &CodecConfig,
    ) -> Result<Self, SchemaError> {
        config
            .validate()
            .map_err(|e| SchemaError::InvalidConfig(e.to_string()))?;
        let provider = TypeProvider::build(context, renames, config.clone())?;
        let tables = {
            let mut builder = RuntimeBuilder {
                resolver: provider.resolver(),
                index: provider.index(),
                config,
                tables: RuntimeTables::default(),
                deferred: Vec::new(),
            };
            builder.run()?;
            builder.tables
        };

        log::info!(
            "[runtime] indexed {} modules: {} generated types, {} typedef records, {} augmentations",
            provider.index().context().modules().len(),
            tables.types_by_name.len(),
            provider.typedefs().len(),
            tables.augmentation_by_name.len()
        );
        Ok(Self { provider, tables })
    }

    pub fn schema(&self) -> &SchemaContext {
        self.provider.index().context()
    }

    pub fn shared_schema(&self) -> &Arc<SchemaContext> {
        self.provider.index().shared_context()
    }

    pub fn index(&self) -> &SchemaIndex {
        self.provider.index()
    }

    pub fn type_provider(&self) -> &TypeProvider {
        &self.provider
    }

    pub fn config(&self) -> &CodecConfig {
        self.provider.config()
    }

    /// Generated type of the node at `path`.
    pub fn type_for_path(&self, path: &SchemaPath) -> Option<&Arc<GeneratedType>> {
        self.tables.types_by_path.get(path)
    }

    /// Any generated type by name, typedef records included.
    pub fn type_named(&self, name: &TypeName) -> Option<&Arc<GeneratedType>> {
        self.tables
            .types_by_name
            .get(name)
            .or_else(|| self.provider.typedefs().by_name(name))
    }

    /// Schema path of a container, list, choice, case, notification or
    /// operation type.
    pub fn path_for_type(&self, name: &TypeName) -> Option<&SchemaPath> {
        let record = self.tables.types_by_name.get(name)?;
        match record.kind {
            TypeKind::Augmentation | TypeKind::Identity | TypeKind::Key => None,
            _ => record.schema_path.as_ref(),
        }
    }

    /// Key type of the list at `list`.
    pub fn key_type(&self, list: &SchemaPath) -> Option<&Arc<GeneratedType>> {
        self.tables.keys_by_list.get(list)
    }

    /// Binding type of the leaf or leaf-list at `path`.
    pub fn leaf_type(&self, path: &SchemaPath) -> Option<&TypeRef> {
        self.tables.leaf_types.get(path)
    }

    pub fn augmentations_of(&self, target: &SchemaPath) -> &[Arc<AugmentationInfo>] {
        self.tables
            .augmentations_by_target
            .get(target)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Augmentation contributing `child` to `target`.
    pub fn augmentation_for_child(
        &self,
        target: &SchemaPath,
        child: &QName,
    ) -> Option<&Arc<AugmentationInfo>> {
        self.tables
            .augmentation_by_child
            .get(&(target.clone(), child.clone()))
    }

    pub fn augmentation_named(&self, name: &TypeName) -> Option<&Arc<AugmentationInfo>> {
        self.tables.augmentation_by_name.get(name)
    }

    pub fn identity_qname(&self, name: &TypeName) -> Option<&QName> {
        self.tables.identity_by_name.get(name)
    }

    pub fn identity_type(&self, identity: &QName) -> Option<&TypeName> {
        self.tables.identity_names.get(identity)
    }

    /// The rpc or action whose generated type is `name`.
    pub fn operation(&self, name: &TypeName) -> Option<&OperationSchema> {
        let path = self.path_for_type(name)?;
        self.schema().find_node(path)?.as_operation()
    }
}

struct RuntimeBuilder<'a> {
    resolver: TypeResolver<'a>,
    index: &'a SchemaIndex,
    config: &'a CodecConfig,
    tables: RuntimeTables,
    deferred: Vec<(SchemaPath, PathExpression)>,
}

impl<'a> RuntimeBuilder<'a> {
    fn run(&mut self) -> Result<(), SchemaError> {
        let ctx = self.index.context();
        for module in ctx.modules() {
            for identity in &module.identities {
                self.visit_identity(
                    identity.qname.clone(),
                    &identity.bases,
                    identity.status,
                    &module.name,
                )?;
            }
            for grouping in &module.groupings {
                self.visit_grouping(grouping, &module.name)?;
            }
            for node in &module.children {
                self.visit_node(node)?;
            }
            for notification in &module.notifications {
                let name = self.node_type_name(&notification.path)?;
                self.visit_body(notification, name, TypeKind::Notification, None)?;
            }
            for rpc in &module.rpcs {
                self.visit_operation(rpc)?;
            }
        }

        if self.config.deferred_leafref_validation {
            for (leaf, expr) in &self.deferred {
                self.resolver.check_deferred_leafref(expr, leaf)?;
            }
        }
        Ok(())
    }

    fn node_type_name(&self, path: &SchemaPath) -> Result<TypeName, SchemaError> {
        self.resolver
            .inline_type_name(path)
            .ok_or_else(|| SchemaError::InvalidPath(path.to_string()))
    }

    fn module_name(&self, path: &SchemaPath) -> Result<String, SchemaError> {
        Ok(self.index.find_parent_module(path)?.name.clone())
    }

    fn is_taken(&self, name: &TypeName) -> bool {
        self.tables.types_by_name.contains_key(name) || self.resolver.typedef_named(name).is_some()
    }

    fn register(
        &mut self,
        record: GeneratedType,
        by_path: bool,
    ) -> Result<Arc<GeneratedType>, SchemaError> {
        let existing = self
            .tables
            .types_by_name
            .get(&record.name)
            .or_else(|| self.resolver.typedef_named(&record.name));
        if let Some(first) = existing {
            return Err(SchemaError::NameCollision {
                name: record.name.clone(),
                first: first.schema_path.clone().unwrap_or_default(),
                second: record.schema_path.clone().unwrap_or_default(),
            });
        }
        let record = Arc::new(record);
        if by_path {
            if let Some(path) = &record.schema_path {
                self.tables.types_by_path.insert(path.clone(), record.clone());
            }
        }
        self.tables
            .types_by_name
            .insert(record.name.clone(), record.clone());
        Ok(record)
    }

    fn visit_identity(
        &mut self,
        qname: QName,
        bases: &[QName],
        status: Status,
        module_name: &str,
    ) -> Result<(), SchemaError> {
        let name = identity_type_name(&qname);
        let mut record = GeneratedType::new(name.clone(), TypeKind::Identity, module_name);
        let mut sorted = bases.to_vec();
        sorted.sort();
        record.extends = sorted.first().map(identity_type_name);
        record.deprecated = status == Status::Deprecated;
        self.register(record, false)?;
        self.tables.identity_by_name.insert(name.clone(), qname.clone());
        self.tables.identity_names.insert(qname, name);
        Ok(())
    }

    fn visit_grouping(
        &mut self,
        grouping: &GroupingSchema,
        module_name: &str,
    ) -> Result<(), SchemaError> {
        for child in &grouping.children {
            self.visit_node(child)?;
        }
        let name = self.node_type_name(&grouping.path)?;
        let mut record = GeneratedType::new(name, TypeKind::Grouping, module_name)
            .with_path(grouping.path.clone());
        record.properties = self.properties_of(&grouping.children)?;
        self.register(record, true)?;
        Ok(())
    }

    fn visit_node(&mut self, node: &DataSchemaNode) -> Result<(), SchemaError> {
        match &node.kind {
            NodeKind::Container(container) => {
                let name = self.node_type_name(&node.path)?;
                self.visit_body(node, name, TypeKind::Container, None)?;
                for action in &container.actions {
                    self.visit_operation(action)?;
                }
            }
            NodeKind::List(list) => {
                let name = self.node_type_name(&node.path)?;
                self.visit_body(node, name.clone(), TypeKind::ListEntry, None)?;
                if !list.keys.is_empty() {
                    self.visit_key(node, &name, &list.keys)?;
                }
                for action in &list.actions {
                    self.visit_operation(action)?;
                }
            }
            NodeKind::Choice(choice) => {
                let name = self.node_type_name(&node.path)?;
                let module_name = self.module_name(&node.path)?;
                let mut record = GeneratedType::new(name.clone(), TypeKind::Choice, module_name)
                    .with_path(node.path.clone());
                record.deprecated = node.status == Status::Deprecated;
                self.register(record, true)?;
                for case in &choice.cases {
                    let case_name = self.node_type_name(&case.path)?;
                    self.visit_body(case, case_name, TypeKind::Case, Some(name.clone()))?;
                }
            }
            NodeKind::Case(_) => {
                let name = self.node_type_name(&node.path)?;
                self.visit_body(node, name, TypeKind::Case, None)?;
            }
            NodeKind::Leaf(leaf) => self.visit_leaf(node, &leaf.type_def, false)?,
            NodeKind::LeafList(leaf_list) => self.visit_leaf(node, &leaf_list.type_def, true)?,
        }
        Ok(())
    }

    /// Record for a data container; children first, augmentations last.
    fn visit_body(
        &mut self,
        node: &DataSchemaNode,
        name: TypeName,
        kind: TypeKind,
        extends: Option<TypeName>,
    ) -> Result<(), SchemaError> {
        for child in node.children() {
            self.visit_node(child)?;
        }

        let mut record = GeneratedType::new(name.clone(), kind, self.module_name(&node.path)?)
            .with_path(node.path.clone());
        record.extends = extends;
        record.deprecated = node.status == Status::Deprecated;
        record.properties = self.properties_of(node.children().iter().filter(|c| !c.augmenting))?;
        self.register(record, true)?;

        if !matches!(node.kind, NodeKind::Choice(_)) {
            for augmentation in node.augmentations() {
                self.visit_augmentation(node, &name, augmentation)?;
            }
        }
        Ok(())
    }

    fn visit_key(
        &mut self,
        list: &DataSchemaNode,
        list_name: &TypeName,
        keys: &[QName],
    ) -> Result<(), SchemaError> {
        let mut record = GeneratedType::new(
            list_name.sibling(format!("{}Key", list_name.name())),
            TypeKind::Key,
            self.module_name(&list.path)?,
        )
        .with_path(list.path.clone());
        record.properties = self.properties_of(keys.iter().filter_map(|k| list.child(k)))?;
        let record = self.register(record, false)?;
        self.tables.keys_by_list.insert(list.path.clone(), record);
        Ok(())
    }

    fn visit_augmentation(
        &mut self,
        target: &DataSchemaNode,
        target_name: &TypeName,
        augmentation: &AugmentationSchema,
    ) -> Result<(), SchemaError> {
        let root = root_module_path(&augmentation.module);
        let name = match &augmentation.identifier {
            Some(identifier) => TypeName::new(root, class_name(identifier)),
            None => {
                let mut n = 1;
                loop {
                    let candidate =
                        TypeName::new(root.as_str(), format!("{}{}", target_name.name(), n));
                    if !self.is_taken(&candidate) {
                        break candidate;
                    }
                    n += 1;
                }
            }
        };

        let module_name = self
            .index
            .context()
            .module_for(&augmentation.module)
            .map(|m| m.name.clone())
            .unwrap_or_default();
        let mut record = GeneratedType::new(name.clone(), TypeKind::Augmentation, module_name)
            .with_path(target.path.clone());
        record.extends = Some(target_name.clone());
        record.properties =
            self.properties_of(augmentation.children.iter().filter_map(|q| target.child(q)))?;
        self.register(record, false)?;

        let info = Arc::new(AugmentationInfo {
            type_name: name.clone(),
            target: target.path.clone(),
            module: augmentation.module.clone(),
            children: augmentation.children.clone(),
        });
        for child in &info.children {
            self.tables
                .augmentation_by_child
                .insert((target.path.clone(), child.clone()), info.clone());
        }
        self.tables
            .augmentations_by_target
            .entry(target.path.clone())
            .or_default()
            .push(info.clone());
        self.tables.augmentation_by_name.insert(name, info);
        Ok(())
    }

    fn visit_operation(&mut self, op: &OperationSchema) -> Result<(), SchemaError> {
        let name = self.node_type_name(&op.path)?;
        let module_name = self.module_name(&op.path)?;
        let mut record = GeneratedType::new(name.clone(), TypeKind::Operation, module_name)
            .with_path(op.path.clone());
        record.deprecated = op.status == Status::Deprecated;
        self.register(record, true)?;

        let input = name.sibling(format!("{}Input", name.name()));
        self.visit_body(&op.input, input, TypeKind::Input, None)?;
        let output = name.sibling(format!("{}Output", name.name()));
        self.visit_body(&op.output, output, TypeKind::Output, None)
    }

    fn visit_leaf(
        &mut self,
        node: &DataSchemaNode,
        def: &TypeDefinition,
        is_list: bool,
    ) -> Result<(), SchemaError> {
        if let TypeShape::Builtin(
            builtin @ (BuiltinType::Enumeration(_) | BuiltinType::Bits(_) | BuiltinType::Union(_)),
        ) = &def.shape
        {
            let name = self.node_type_name(&node.path)?;
            let module_name = self.module_name(&node.path)?;
            let mut nested = Vec::new();
            let mut record = {
                let taken = |n: &TypeName| self.is_taken(n);
                self.resolver
                    .build_record(name, &module_name, &node.path, builtin, &taken, &mut nested)?
            };
            record.schema_path = Some(node.path.clone());
            record.restrictions = def.restrictions.clone();
            record.units = def.units.clone();
            for inner in nested {
                self.register(inner, false)?;
            }
            self.register(record, false)?;
        }

        let in_grouping = self.index.is_in_grouping(&node.path);
        let element = self.resolver.binding_type_for(def, &node.path, in_grouping)?;
        let type_ref = if is_list {
            TypeRef::ListOf(Box::new(element))
        } else {
            element
        };
        self.tables.leaf_types.insert(node.path.clone(), type_ref);

        if let BuiltinType::Leafref(expr) = self.index.context().type_chain(def)?.builtin() {
            if self.index.crosses_augmentation(&node.path) == Some(true) {
                self.deferred.push((node.path.clone(), expr.clone()));
            }
        }
        Ok(())
    }

    fn properties_of<'n>(
        &self,
        children: impl IntoIterator<Item = &'n DataSchemaNode>,
    ) -> Result<Vec<Property>, SchemaError> {
        children.into_iter().map(|c| self.property_for(c)).collect()
    }

    fn property_for(&self, child: &DataSchemaNode) -> Result<Property, SchemaError> {
        let type_ref = match &child.kind {
            NodeKind::Container(_) | NodeKind::Choice(_) | NodeKind::Case(_) => {
                TypeRef::Generated(self.node_type_name(&child.path)?)
            }
            NodeKind::List(_) => {
                TypeRef::ListOf(Box::new(TypeRef::Generated(self.node_type_name(&child.path)?)))
            }
            NodeKind::Leaf(_) | NodeKind::LeafList(_) => self
                .tables
                .leaf_types
                .get(&child.path)
                .cloned()
                .ok_or_else(|| SchemaError::InvalidPath(child.path.to_string()))?,
        };
        Ok(Property {
            name: property_name(child.qname.local_name()),
            yang_name: Some(child.qname.clone()),
            type_ref,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModuleBuilder, Revision, SchemaContextBuilder};

    fn ns() -> QNameModule {
        QNameModule::new("urn:test:runtime", Some(Revision::parse("2014-07-01").unwrap()))
    }

    fn aug_ns() -> QNameModule {
        QNameModule::new("urn:test:runtime-aug", Some(Revision::parse("2014-07-01").unwrap()))
    }

    fn q(name: &str) -> QName {
        QName::new(&ns(), name)
    }

    fn build(
        modules: Vec<ModuleBuilder>,
        config: &CodecConfig,
    ) -> Result<BindingRuntimeContext, SchemaError> {
        let ctx = modules
            .into_iter()
            .fold(SchemaContextBuilder::new(), |b, m| b.module(m))
            .build()?;
        BindingRuntimeContext::build(Arc::new(ctx), Renames::new(), config)
    }

    fn base() -> ModuleBuilder {
        ModuleBuilder::new("runtime", "rt", ns())
            .identity("base-id", &[])
            .data(|d| {
                d.container("top", |c| {
                    c.list("top-level-list", &["name"], |l| {
                        l.leaf("name", BuiltinType::String)
                            .leaf("state", BuiltinType::enumeration(&["up", "down"]))
                            .choice("choice-in-list", |ch| {
                                ch.case("simple-case", |s| s.leaf("simple", BuiltinType::Empty))
                            })
                    })
                })
            })
            .rpc("reset", |i| i.leaf("force", BuiltinType::Boolean), |o| o)
    }

    fn augment() -> ModuleBuilder {
        let target = SchemaPath::new(vec![q("top"), q("top-level-list")]);
        ModuleBuilder::new("runtime-aug", "aug", aug_ns())
            .import("runtime", "rt")
            .augment_named("tree-leaf-only-augment", target.clone(), |a| {
                a.leaf("simple-value", BuiltinType::String)
            })
            .augment(target, |a| a.leaf("other", BuiltinType::Int32))
    }

    #[test]
    fn test_types_for_containers_lists_and_keys() {
        let runtime = build(vec![base()], &CodecConfig::default()).unwrap();
        let list_path = SchemaPath::new(vec![q("top"), q("top-level-list")]);
        let list = runtime.type_for_path(&list_path).unwrap();
        assert_eq!(list.kind, TypeKind::ListEntry);
        assert_eq!(list.name.name(), "TopLevelList");
        assert_eq!(runtime.path_for_type(&list.name), Some(&list_path));

        let key = runtime.key_type(&list_path).unwrap();
        assert_eq!(key.name.name(), "TopLevelListKey");
        assert_eq!(key.properties.len(), 1);
        assert_eq!(key.properties[0].name, "name");

        let state = list.property("state").unwrap();
        let TypeRef::Generated(state_type) = &state.type_ref else {
            panic!("inline enumeration expected");
        };
        assert_eq!(runtime.type_named(state_type).unwrap().kind, TypeKind::Enumeration);

        let choice = list.property("choice_in_list").unwrap();
        assert!(matches!(choice.type_ref, TypeRef::Generated(_)));
    }

    #[test]
    fn test_operation_types() {
        let runtime = build(vec![base()], &CodecConfig::default()).unwrap();
        let rpc = runtime
            .type_for_path(&SchemaPath::new(vec![q("reset")]))
            .unwrap();
        assert_eq!(rpc.kind, TypeKind::Operation);
        let input = runtime
            .type_for_path(&SchemaPath::new(vec![q("reset"), q("input")]))
            .unwrap();
        assert_eq!(input.name.name(), "ResetInput");
        assert!(runtime.operation(&rpc.name).is_some());
    }

    #[test]
    fn test_augmentation_index() {
        let runtime = build(vec![base(), augment()], &CodecConfig::default()).unwrap();
        let target = SchemaPath::new(vec![q("top"), q("top-level-list")]);
        let augmentations = runtime.augmentations_of(&target);
        assert_eq!(augmentations.len(), 2);

        let named = runtime
            .augmentation_for_child(&target, &QName::new(&aug_ns(), "simple-value"))
            .unwrap();
        assert_eq!(named.type_name.name(), "TreeLeafOnlyAugment");
        let counted = runtime
            .augmentation_for_child(&target, &QName::new(&aug_ns(), "other"))
            .unwrap();
        assert_eq!(counted.type_name.name(), "TopLevelList1");

        // Augmented children are not properties of the target type.
        let list = runtime.type_for_path(&target).unwrap();
        assert!(list.property("simple_value").is_none());
        let augmentation = runtime.type_named(&named.type_name).unwrap();
        assert_eq!(augmentation.properties[0].name, "simple_value");
    }

    #[test]
    fn test_identity_maps() {
        let runtime = build(vec![base()], &CodecConfig::default()).unwrap();
        let name = runtime.identity_type(&q("base-id")).unwrap().clone();
        assert_eq!(name.name(), "BaseId");
        assert_eq!(runtime.identity_qname(&name), Some(&q("base-id")));
    }

    #[test]
    fn test_deferred_self_reference() {
        let target = SchemaPath::new(vec![q("top")]);
        let looping = ModuleBuilder::new("runtime-aug", "aug", aug_ns())
            .import("runtime", "rt")
            .augment(target, |a| {
                a.leaf("self-ref", BuiltinType::leafref("../aug:self-ref").unwrap())
            });
        let err = build(vec![base(), looping.clone()], &CodecConfig::default()).unwrap_err();
        assert!(matches!(err, SchemaError::SelfReferencingLeafref { .. }));

        let relaxed = CodecConfig {
            deferred_leafref_validation: false,
            ..CodecConfig::default()
        };
        let runtime = build(vec![base(), looping], &relaxed).unwrap();
        let leaf = SchemaPath::new(vec![q("top"), QName::new(&aug_ns(), "self-ref")]);
        assert_eq!(runtime.leaf_type(&leaf), Some(&TypeRef::Object));
    }

    #[test]
    fn test_name_collision() {
        let module = base().data(|d| d.container("top-level-list", |c| c));
        let mut renames = Renames::new();
        // Inline enumeration renamed onto the top-level container's type.
        renames.insert(
            SchemaPath::new(vec![q("top"), q("top-level-list"), q("state")]),
            crate::binding::naming::type_name_for_path(&SchemaPath::new(vec![q("top-level-list")]))
                .unwrap(),
        );
        let ctx = SchemaContextBuilder::new().module(module).build().unwrap();
        let err = BindingRuntimeContext::build(Arc::new(ctx), renames, &CodecConfig::default())
            .unwrap_err();
        assert!(matches!(err, SchemaError::NameCollision { .. }));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_indexing() {
        let config = CodecConfig {
            max_leafref_depth: 0,
            ..CodecConfig::default()
        };
        let err = build(vec![base()], &config).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidConfig(_)));
    }
}
