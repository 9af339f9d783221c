// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generated-type records for typedefs, and binding types for leaves.
//!
//! Construction runs in two phases: modules are ordered by their imports,
//! then each module's typedefs are folded into a [`TypedefCache`] in order
//! of base-chain depth, so every record's base is already present when the
//! record is built. The finished cache is never mutated again.

use super::module_sort::sort_modules;
use super::schema_index::SchemaIndex;
use crate::binding::naming::{
    class_name, enum_constant_name, nested_module_path, property_name, root_module_path,
    type_name_for_path,
};
use crate::binding::{
    EnumConstant, GeneratedType, Property, ScalarKind, TypeKind, TypeName, TypeRef, UnionMember,
};
use crate::config::{CodecConfig, IdentityAmbiguity};
use crate::error::SchemaError;
use crate::model::{
    BuiltinType, Module, PathExpression, QName, Revision, SchemaContext, SchemaPath, Status,
    TypeDefinition, TypeShape,
};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

/// Generated-type renames, keyed by the schema path of the named node.
pub type Renames = HashMap<SchemaPath, TypeName>;

type RevisionTable = BTreeMap<Option<Revision>, HashMap<String, Arc<GeneratedType>>>;

/// Typedef records keyed module name, then revision, then local name.
#[derive(Debug, Default)]
pub struct TypedefCache {
    by_module: HashMap<String, RevisionTable>,
    by_name: HashMap<TypeName, Arc<GeneratedType>>,
}

impl TypedefCache {
    pub fn get(
        &self,
        module_name: &str,
        revision: Option<Revision>,
        local_name: &str,
    ) -> Option<&Arc<GeneratedType>> {
        self.by_module
            .get(module_name)?
            .get(&revision)?
            .get(local_name)
    }

    pub fn by_name(&self, name: &TypeName) -> Option<&Arc<GeneratedType>> {
        self.by_name.get(name)
    }

    /// Every record, nested union members included.
    pub fn records(&self) -> impl Iterator<Item = &Arc<GeneratedType>> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    fn insert(
        &mut self,
        module: &Module,
        typedef: &TypeDefinition,
        record: GeneratedType,
    ) -> Result<(), SchemaError> {
        let record = self.publish(record)?;
        self.by_module
            .entry(module.name.clone())
            .or_default()
            .entry(module.qname_module.revision())
            .or_default()
            .insert(typedef.qname.local_name().to_string(), record);
        Ok(())
    }

    fn publish(&mut self, record: GeneratedType) -> Result<Arc<GeneratedType>, SchemaError> {
        if let Some(existing) = self.by_name.get(&record.name) {
            return Err(SchemaError::NameCollision {
                name: record.name.clone(),
                first: existing.schema_path.clone().unwrap_or_default(),
                second: record.schema_path.clone().unwrap_or_default(),
            });
        }
        let record = Arc::new(record);
        self.by_name.insert(record.name.clone(), record.clone());
        Ok(record)
    }
}

/// Frozen typedef records plus the lookups needed to type leaves.
#[derive(Debug)]
pub struct TypeProvider {
    index: SchemaIndex,
    config: CodecConfig,
    renames: Renames,
    typedefs: TypedefCache,
}

impl TypeProvider {
    /// Run both construction phases over `context`.
    pub fn build(
        context: Arc<SchemaContext>,
        renames: Renames,
        config: CodecConfig,
    ) -> Result<Self, SchemaError> {
        let index = SchemaIndex::new(context);
        let mut typedefs = TypedefCache::default();

        // Phase 1
        let modules = sort_modules(index.context())?;

        // Phase 2
        for module in modules {
            for typedef in typedefs_by_depth(index.context(), module)? {
                let built = TypeResolver {
                    index: &index,
                    config: &config,
                    renames: &renames,
                    typedefs: &typedefs,
                }
                .generated_type_for_extended_definition(module, typedef)?;
                if let Some((record, nested)) = built {
                    for inner in nested {
                        typedefs.publish(inner)?;
                    }
                    typedefs.insert(module, typedef, record)?;
                }
            }
        }

        log::debug!("[type-provider] {} typedef records", typedefs.len());
        Ok(Self {
            index,
            config,
            renames,
            typedefs,
        })
    }

    pub fn index(&self) -> &SchemaIndex {
        &self.index
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn typedefs(&self) -> &TypedefCache {
        &self.typedefs
    }

    pub fn resolver(&self) -> TypeResolver<'_> {
        TypeResolver {
            index: &self.index,
            config: &self.config,
            renames: &self.renames,
            typedefs: &self.typedefs,
        }
    }

    /// Record generated for the typedef `qname`, if it has one.
    pub fn typedef_record(&self, qname: &QName) -> Option<&Arc<GeneratedType>> {
        self.resolver().typedef_record(qname)
    }

    pub fn binding_type_for(
        &self,
        def: &TypeDefinition,
        leaf: &SchemaPath,
        in_grouping: bool,
    ) -> Result<TypeRef, SchemaError> {
        self.resolver().binding_type_for(def, leaf, in_grouping)
    }
}

/// Type resolution against a (possibly still growing) typedef cache.
#[derive(Clone, Copy)]
pub struct TypeResolver<'a> {
    index: &'a SchemaIndex,
    config: &'a CodecConfig,
    renames: &'a Renames,
    typedefs: &'a TypedefCache,
}

impl<'a> TypeResolver<'a> {
    fn context(&self) -> &'a SchemaContext {
        self.index.context()
    }

    pub fn typedef_record(&self, qname: &QName) -> Option<&'a Arc<GeneratedType>> {
        let module = self.context().module_for(qname.module())?;
        self.typedefs
            .get(&module.name, qname.revision(), qname.local_name())
    }

    pub fn typedef_named(&self, name: &TypeName) -> Option<&'a Arc<GeneratedType>> {
        self.typedefs.by_name(name)
    }

    /// Name of the generated type for an inline enumeration, bits or union
    /// leaf type.
    pub fn inline_type_name(&self, leaf: &SchemaPath) -> Option<TypeName> {
        self.renames
            .get(leaf)
            .cloned()
            .or_else(|| type_name_for_path(leaf))
    }

    /// Binding type of a leaf or leaf-list element of type `def`.
    pub fn binding_type_for(
        &self,
        def: &TypeDefinition,
        leaf: &SchemaPath,
        in_grouping: bool,
    ) -> Result<TypeRef, SchemaError> {
        let lenient = in_grouping && self.config.lenient_grouping_leafrefs;
        let mut visited = vec![leaf.clone()];
        self.resolve_type(def, leaf, lenient, &mut visited)
    }

    fn resolve_type(
        &self,
        def: &TypeDefinition,
        leaf: &SchemaPath,
        lenient: bool,
        visited: &mut Vec<SchemaPath>,
    ) -> Result<TypeRef, SchemaError> {
        match &def.shape {
            TypeShape::Derived(base) => match self.context().type_chain(def)?.builtin() {
                BuiltinType::Leafref(expr) => self.leafref_type(expr, leaf, lenient, visited),
                BuiltinType::Identityref(bases) => self.identity_type(bases, leaf),
                _ => self
                    .typedef_record(base)
                    .map(|r| TypeRef::Generated(r.name.clone()))
                    .ok_or_else(|| SchemaError::UnknownTypedef(base.clone())),
            },
            TypeShape::Builtin(builtin) => match builtin {
                BuiltinType::Leafref(expr) => self.leafref_type(expr, leaf, lenient, visited),
                BuiltinType::Identityref(bases) => self.identity_type(bases, leaf),
                BuiltinType::Enumeration(_) | BuiltinType::Bits(_) | BuiltinType::Union(_) => self
                    .inline_type_name(leaf)
                    .map(TypeRef::Generated)
                    .ok_or_else(|| SchemaError::InvalidPath(leaf.to_string())),
                BuiltinType::InstanceIdentifier => Ok(TypeRef::InstanceIdentifier),
                scalar => ScalarKind::for_builtin(scalar)
                    .map(TypeRef::Scalar)
                    .ok_or_else(|| SchemaError::InvalidPath(leaf.to_string())),
            },
        }
    }

    fn leafref_type(
        &self,
        expr: &PathExpression,
        leaf: &SchemaPath,
        lenient: bool,
        visited: &mut Vec<SchemaPath>,
    ) -> Result<TypeRef, SchemaError> {
        if self.is_leafref_self_reference(expr, leaf)? {
            return Err(SchemaError::SelfReferencingLeafref {
                leaf: leaf.clone(),
                leafref: expr.as_str().to_string(),
            });
        }
        if expr.has_predicates() {
            return Ok(TypeRef::Object);
        }

        let target = match self.index.resolve_leafref(leaf, expr)? {
            Some(target) if target.leaf_type().is_some() => target,
            _ if lenient && !expr.is_absolute() => {
                log::debug!(
                    "[type-provider] leafref {} of {} not found, assuming polymorphic object",
                    expr.as_str(),
                    leaf
                );
                return Ok(TypeRef::Object);
            }
            _ => {
                return Err(SchemaError::LeafrefTargetNotFound {
                    leaf: leaf.clone(),
                    leafref: expr.as_str().to_string(),
                })
            }
        };

        if &target.path == leaf {
            // Below an augmentation: reported by the deferred check.
            log::debug!("[type-provider] self-reference check of {} deferred", leaf);
            return Ok(TypeRef::Object);
        }
        if visited.contains(&target.path) || visited.len() > self.config.max_leafref_depth {
            return Err(SchemaError::LeafrefCycle(target.path.clone()));
        }
        visited.push(target.path.clone());

        let Some(target_type) = target.leaf_type() else {
            return Err(SchemaError::LeafrefTargetNotFound {
                leaf: leaf.clone(),
                leafref: expr.as_str().to_string(),
            });
        };
        let target_lenient =
            self.config.lenient_grouping_leafrefs && self.index.is_in_grouping(&target.path);
        self.resolve_type(target_type, &target.path, target_lenient, visited)
    }

    /// Whether the leafref on `leaf` resolves to `leaf` itself. Leaves below
    /// an augmentation are skipped here and checked by
    /// [`Self::check_deferred_leafref`].
    pub fn is_leafref_self_reference(
        &self,
        expr: &PathExpression,
        leaf: &SchemaPath,
    ) -> Result<bool, SchemaError> {
        if self.index.crosses_augmentation(leaf) == Some(true) {
            return Ok(false);
        }
        self.points_to_itself(expr, leaf)
    }

    /// Self-reference check ignoring augmentations.
    pub fn check_deferred_leafref(
        &self,
        expr: &PathExpression,
        leaf: &SchemaPath,
    ) -> Result<(), SchemaError> {
        if self.points_to_itself(expr, leaf)? {
            return Err(SchemaError::SelfReferencingLeafref {
                leaf: leaf.clone(),
                leafref: expr.as_str().to_string(),
            });
        }
        Ok(())
    }

    fn points_to_itself(
        &self,
        expr: &PathExpression,
        leaf: &SchemaPath,
    ) -> Result<bool, SchemaError> {
        Ok(self
            .index
            .resolve_leafref(leaf, expr)?
            .is_some_and(|target| &target.path == leaf))
    }

    /// Identity type referenced by an identityref.
    pub fn identity_type(&self, bases: &[QName], at: &SchemaPath) -> Result<TypeRef, SchemaError> {
        let mut sorted = bases.to_vec();
        sorted.sort();
        let Some(first) = sorted.first() else {
            return Err(SchemaError::InvalidPath(format!(
                "identityref at {} has no base",
                at
            )));
        };
        if sorted.len() > 1 {
            match self.config.identity_ambiguity {
                IdentityAmbiguity::Reject => {
                    return Err(SchemaError::AmbiguousIdentityref {
                        path: at.clone(),
                        count: sorted.len(),
                    })
                }
                IdentityAmbiguity::First => log::warn!(
                    "[type-provider] identityref at {} has {} bases, using only {}",
                    at,
                    sorted.len(),
                    first
                ),
            }
        }
        if self.context().identity(first).is_none() {
            return Err(SchemaError::MissingIdentity(first.clone()));
        }
        Ok(TypeRef::Identity(identity_type_name(first)))
    }

    /// Record for a typedef, plus records nested inside it. `None` for
    /// typedefs of leafref and identityref.
    pub fn generated_type_for_extended_definition(
        &self,
        module: &Module,
        typedef: &TypeDefinition,
    ) -> Result<Option<(GeneratedType, Vec<GeneratedType>)>, SchemaError> {
        if !self.context().type_chain(typedef)?.builtin().has_generated_type() {
            return Ok(None);
        }
        let name = self.renames.get(&typedef.path).cloned().unwrap_or_else(|| {
            TypeName::new(
                root_module_path(&module.qname_module),
                class_name(typedef.qname.local_name()),
            )
        });

        let mut nested = Vec::new();
        let mut record = match &typedef.shape {
            TypeShape::Derived(base) => {
                let parent = self
                    .typedef_record(base)
                    .ok_or_else(|| SchemaError::UnknownTypedef(base.clone()))?;
                let mut record = GeneratedType::new(name, parent.kind, &module.name);
                record.extends = Some(parent.name.clone());
                record.properties = parent.properties.clone();
                record.constants = parent.constants.clone();
                record.union_members = parent.union_members.clone();
                record
            }
            TypeShape::Builtin(builtin) => {
                let taken = |n: &TypeName| self.typedefs.by_name(n).is_some();
                self.build_record(name, &module.name, &typedef.path, builtin, &taken, &mut nested)?
            }
        };
        record.schema_path = Some(typedef.path.clone());
        record.restrictions = typedef.restrictions.clone();
        record.units = typedef.units.clone();
        record.deprecated = typedef.status == Status::Deprecated;
        Ok(Some((record, nested)))
    }

    /// Record for an enumeration, bits, union or scalar wrapper. Records for
    /// nested union members land in `nested`.
    pub fn build_record(
        &self,
        name: TypeName,
        module_name: &str,
        at: &SchemaPath,
        builtin: &BuiltinType,
        taken: &dyn Fn(&TypeName) -> bool,
        nested: &mut Vec<GeneratedType>,
    ) -> Result<GeneratedType, SchemaError> {
        let mut record = GeneratedType::new(name, TypeKind::Wrapper, module_name);
        match builtin {
            BuiltinType::Enumeration(pairs) => {
                record.kind = TypeKind::Enumeration;
                record.constants = pairs
                    .iter()
                    .map(|p| EnumConstant {
                        name: enum_constant_name(&p.name),
                        yang_name: p.name.clone(),
                        value: p.value,
                    })
                    .collect();
            }
            BuiltinType::Bits(bits) => {
                record.kind = TypeKind::Bits;
                record.properties = bits
                    .iter()
                    .map(|b| Property {
                        name: property_name(&b.name),
                        yang_name: None,
                        type_ref: TypeRef::Scalar(ScalarKind::Boolean),
                    })
                    .collect();
            }
            BuiltinType::Union(members) => {
                record.kind = TypeKind::Union;
                record.union_members =
                    self.union_members(&record.name, module_name, at, members, taken, nested)?;
                for member in &record.union_members {
                    if record.property(&member.property).is_none() {
                        record.properties.push(Property {
                            name: member.property.clone(),
                            yang_name: None,
                            type_ref: member.type_ref.clone(),
                        });
                    }
                }
            }
            BuiltinType::InstanceIdentifier => record.properties.push(Property {
                name: "value".into(),
                yang_name: None,
                type_ref: TypeRef::InstanceIdentifier,
            }),
            scalar => {
                let kind = ScalarKind::for_builtin(scalar).ok_or_else(|| {
                    SchemaError::InvalidPath(format!("{}: {} has no wrapper", at, scalar.name()))
                })?;
                record.properties.push(Property {
                    name: "value".into(),
                    yang_name: None,
                    type_ref: TypeRef::Scalar(kind),
                });
            }
        }
        Ok(record)
    }

    fn union_members(
        &self,
        owner: &TypeName,
        module_name: &str,
        at: &SchemaPath,
        members: &[TypeDefinition],
        taken: &dyn Fn(&TypeName) -> bool,
        nested: &mut Vec<GeneratedType>,
    ) -> Result<Vec<UnionMember>, SchemaError> {
        let mut out = Vec::with_capacity(members.len());
        for (member_index, member) in members.iter().enumerate() {
            let (property, type_ref) = match &member.shape {
                TypeShape::Derived(base) => {
                    let type_ref = match self.context().type_chain(member)?.builtin() {
                        BuiltinType::Leafref(expr) => self.member_leafref_type(expr, at)?,
                        BuiltinType::Identityref(bases) => self.identity_type(bases, at)?,
                        _ => self
                            .typedef_record(base)
                            .map(|r| TypeRef::Generated(r.name.clone()))
                            .ok_or_else(|| SchemaError::UnknownTypedef(base.clone()))?,
                    };
                    (property_name(base.local_name()), type_ref)
                }
                TypeShape::Builtin(builtin) => match builtin {
                    BuiltinType::Union(_) | BuiltinType::Enumeration(_) | BuiltinType::Bits(_) => {
                        let inner_name = nested_name(owner, builtin, taken, nested);
                        let record = self.build_record(
                            inner_name.clone(),
                            module_name,
                            at,
                            builtin,
                            taken,
                            nested,
                        )?;
                        nested.push(record);
                        let property = match builtin {
                            BuiltinType::Union(_) => property_name(inner_name.name()),
                            other => other.name().to_string(),
                        };
                        (property, TypeRef::Generated(inner_name))
                    }
                    BuiltinType::Leafref(expr) => {
                        ("leafref".to_string(), self.member_leafref_type(expr, at)?)
                    }
                    BuiltinType::Identityref(bases) => {
                        ("identityref".to_string(), self.identity_type(bases, at)?)
                    }
                    BuiltinType::InstanceIdentifier => {
                        ("instance_identifier".to_string(), TypeRef::InstanceIdentifier)
                    }
                    scalar => {
                        let kind = ScalarKind::for_builtin(scalar).ok_or_else(|| {
                            SchemaError::InvalidPath(format!("{}: unsupported union member", at))
                        })?;
                        (property_name(scalar.name()), TypeRef::Scalar(kind))
                    }
                },
            };
            out.push(UnionMember {
                property,
                member_index,
                type_ref,
            });
        }
        Ok(out)
    }

    /// Leafref member of a union. Inside a typedef there is no leaf to
    /// resolve relative paths from, so an unresolved path is polymorphic.
    fn member_leafref_type(
        &self,
        expr: &PathExpression,
        at: &SchemaPath,
    ) -> Result<TypeRef, SchemaError> {
        if self.context().find_node(at).is_some() {
            let lenient = self.config.lenient_grouping_leafrefs && self.index.is_in_grouping(at);
            return self.leafref_type(expr, at, lenient, &mut vec![at.clone()]);
        }
        match self.index.resolve_leafref(at, expr)? {
            Some(target) => match target.leaf_type() {
                Some(def) => self.binding_type_for(def, &target.path, false),
                None => Ok(TypeRef::Object),
            },
            None => Ok(TypeRef::Object),
        }
    }
}

/// Generated type of an identity.
pub fn identity_type_name(identity: &QName) -> TypeName {
    TypeName::new(
        root_module_path(identity.module()),
        class_name(identity.local_name()),
    )
}

/// First free name for a record nested in `owner`: `Owner_1`, `Owner_2`...
/// for unions, `Enumeration`/`Bits` below the owner otherwise.
fn nested_name(
    owner: &TypeName,
    builtin: &BuiltinType,
    taken: &dyn Fn(&TypeName) -> bool,
    nested: &[GeneratedType],
) -> TypeName {
    let candidate = |n: usize| match builtin {
        BuiltinType::Union(_) => owner.sibling(format!("{}_{}", owner.name(), n + 1)),
        other => {
            let base = class_name(other.name());
            let name = if n == 0 { base } else { format!("{}{}", base, n) };
            TypeName::new(nested_module_path(owner), name)
        }
    };
    let is_taken = |name: &TypeName| taken(name) || nested.iter().any(|r| &r.name == name);
    let mut n = 0;
    loop {
        let name = candidate(n);
        if !is_taken(&name) {
            return name;
        }
        n += 1;
    }
}

/// A module's typedefs ordered by base-chain depth, declaration order within
/// a depth.
fn typedefs_by_depth<'a>(
    ctx: &'a SchemaContext,
    module: &'a Module,
) -> Result<Vec<&'a TypeDefinition>, SchemaError> {
    let mut keyed = Vec::with_capacity(module.typedefs.len());
    for typedef in &module.typedefs {
        let depth = typedef_depth(ctx, typedef, &mut HashSet::new())?;
        keyed.push((depth, typedef));
    }
    keyed.sort_by_key(|(depth, _)| *depth);
    Ok(keyed.into_iter().map(|(_, t)| t).collect())
}

fn typedef_depth(
    ctx: &SchemaContext,
    def: &TypeDefinition,
    visiting: &mut HashSet<QName>,
) -> Result<usize, SchemaError> {
    match &def.shape {
        TypeShape::Builtin(BuiltinType::Union(members)) => {
            let mut deepest = 0;
            for member in members {
                deepest = deepest.max(typedef_depth(ctx, member, visiting)?);
            }
            Ok(1 + deepest)
        }
        TypeShape::Builtin(_) => Ok(1),
        TypeShape::Derived(base) => {
            if !visiting.insert(base.clone()) {
                return Err(SchemaError::CyclicTypedef(base.clone()));
            }
            let base_def = ctx
                .typedef(base)
                .ok_or_else(|| SchemaError::UnknownTypedef(base.clone()))?;
            let depth = 1 + typedef_depth(ctx, base_def, visiting)?;
            visiting.remove(base);
            Ok(depth)
        }
    }
}
