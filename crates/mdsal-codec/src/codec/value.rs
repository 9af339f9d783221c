// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Leaf value translation between [`Value`] and [`BindingValue`].

use super::identifier::IdentifierTranslator;
use crate::binding::{BindingValue, GeneratedType, TypeKind, TypeName, TypeRef};
use crate::data::Value;
use crate::error::{CodecError, SchemaError};
use crate::index::{identity_type_name, BindingRuntimeContext};
use crate::model::{
    BuiltinType, PathExpression, QName, SchemaPath, TypeChain, TypeDefinition,
};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Translates leaf values of one runtime context.
#[derive(Clone, Copy)]
pub struct ValueCodec<'a> {
    runtime: &'a BindingRuntimeContext,
}

impl<'a> ValueCodec<'a> {
    pub fn new(runtime: &'a BindingRuntimeContext) -> Self {
        Self { runtime }
    }

    /// Normalized value of the leaf at `leaf` to its binding form.
    pub fn decode(
        &self,
        def: &TypeDefinition,
        leaf: &SchemaPath,
        value: &Value,
    ) -> Result<BindingValue, CodecError> {
        let type_ref = self.element_type(def, leaf)?;
        self.decode_typed(def, leaf, &type_ref, value, 0)
    }

    /// Binding value of the leaf at `leaf` to its normalized form.
    pub fn encode(
        &self,
        def: &TypeDefinition,
        leaf: &SchemaPath,
        value: &BindingValue,
    ) -> Result<Value, CodecError> {
        let type_ref = self.element_type(def, leaf)?;
        self.encode_typed(def, leaf, &type_ref, value, 0)
    }

    /// Lexical form of a leaf value to its binding form.
    pub fn decode_literal(
        &self,
        def: &TypeDefinition,
        leaf: &SchemaPath,
        text: &str,
    ) -> Result<BindingValue, CodecError> {
        let value = self.parse_literal(def, leaf, text)?;
        self.decode(def, leaf, &value)
    }

    /// Lexical form of a leaf value to its normalized form.
    pub fn parse_literal(
        &self,
        def: &TypeDefinition,
        leaf: &SchemaPath,
        text: &str,
    ) -> Result<Value, CodecError> {
        self.parse_literal_at(def, leaf, text, 0)
    }

    fn parse_literal_at(
        &self,
        def: &TypeDefinition,
        leaf: &SchemaPath,
        text: &str,
        depth: usize,
    ) -> Result<Value, CodecError> {
        let chain = self.runtime.schema().type_chain(def)?;
        match chain.builtin() {
            BuiltinType::Leafref(expr) => match self.leafref_target(expr, leaf, depth)? {
                Some((target_def, target_path)) => {
                    self.parse_literal_at(target_def, target_path, text, depth + 1)
                }
                None => Ok(Value::String(text.to_string())),
            },
            BuiltinType::Identityref(_) => self.parse_identity(leaf, text).map(Value::IdentityRef),
            BuiltinType::Union(members) => {
                for member in members {
                    if let Ok(value) = self.parse_literal_at(member, leaf, text, depth) {
                        if self.decode(def, leaf, &value).is_ok() {
                            return Ok(value);
                        }
                    }
                }
                Err(CodecError::invalid_value(format!(
                    "'{}' matches no member of the union at {}",
                    text, leaf
                )))
            }
            BuiltinType::InstanceIdentifier => Err(CodecError::UnsupportedOperation(format!(
                "instance-identifier literal at {}",
                leaf
            ))),
            builtin => Value::parse_literal(builtin, text),
        }
    }

    /// Binding type of one value of the leaf (or leaf-list) at `leaf`.
    pub(crate) fn element_type(
        &self,
        def: &TypeDefinition,
        leaf: &SchemaPath,
    ) -> Result<TypeRef, CodecError> {
        let type_ref = match self.runtime.leaf_type(leaf) {
            Some(type_ref) => type_ref.clone(),
            None => self.runtime.type_provider().binding_type_for(
                def,
                leaf,
                self.runtime.index().is_in_grouping(leaf),
            )?,
        };
        Ok(match type_ref {
            TypeRef::ListOf(element) => *element,
            other => other,
        })
    }

    fn decode_typed(
        &self,
        def: &TypeDefinition,
        leaf: &SchemaPath,
        type_ref: &TypeRef,
        value: &Value,
        depth: usize,
    ) -> Result<BindingValue, CodecError> {
        if matches!(type_ref, TypeRef::Object) {
            return Ok(BindingValue::Object(value.clone()));
        }
        let chain = self.runtime.schema().type_chain(def)?;
        match chain.builtin() {
            BuiltinType::Leafref(expr) => {
                let (target_def, target_path) = self.required_target(expr, leaf, depth)?;
                self.decode_typed(target_def, target_path, type_ref, value, depth + 1)
            }
            BuiltinType::Identityref(bases) => {
                let Value::IdentityRef(identity) = value else {
                    return Err(mismatch(leaf, "identityref", value.kind_name()));
                };
                self.check_identity(identity, bases, leaf)?;
                Ok(BindingValue::Identity(self.identity_name(identity)))
            }
            BuiltinType::InstanceIdentifier => {
                let Value::InstanceIdentifier(path) = value else {
                    return Err(mismatch(leaf, "instance-identifier", value.kind_name()));
                };
                let binding = IdentifierTranslator::new(self.runtime)
                    .to_binding(path)?
                    .ok_or_else(|| {
                        CodecError::invalid_value(format!(
                            "{} does not address a binding object",
                            path
                        ))
                    })?;
                Ok(BindingValue::InstanceIdentifier(binding))
            }
            BuiltinType::Union(members) => {
                let record = self.record(type_ref, TypeKind::Union, leaf)?;
                for member in &record.union_members {
                    let Some(member_def) = members.get(member.member_index) else {
                        continue;
                    };
                    if let Ok(decoded) =
                        self.decode_typed(member_def, leaf, &member.type_ref, value, depth)
                    {
                        return Ok(BindingValue::union(
                            record.name.clone(),
                            member.property.clone(),
                            decoded,
                        ));
                    }
                }
                Err(CodecError::invalid_value(format!(
                    "{:?} matches no member of {}",
                    value, record.name
                )))
            }
            BuiltinType::Enumeration(pairs) => {
                let Value::Enum(yang_name) = value else {
                    return Err(mismatch(leaf, "enumeration", value.kind_name()));
                };
                if !pairs.iter().any(|p| &p.name == yang_name) {
                    return Err(CodecError::invalid_value(format!(
                        "'{}' is not an enum of {}",
                        yang_name, leaf
                    )));
                }
                let record = self.record(type_ref, TypeKind::Enumeration, leaf)?;
                let constant = record.constant_for_yang_name(yang_name).ok_or_else(|| {
                    CodecError::invalid_value(format!("{} has no constant for '{}'", record.name, yang_name))
                })?;
                Ok(BindingValue::enumeration(record.name.clone(), constant.name.clone()))
            }
            BuiltinType::Bits(bits) => {
                let Value::Bits(set) = value else {
                    return Err(mismatch(leaf, "bits", value.kind_name()));
                };
                if let Some(unknown) = set.iter().find(|n| !bits.iter().any(|b| &b.name == *n)) {
                    return Err(CodecError::invalid_value(format!(
                        "unknown bit '{}' at {}",
                        unknown, leaf
                    )));
                }
                let record = self.record(type_ref, TypeKind::Bits, leaf)?;
                let flags: BTreeMap<String, bool> = bits
                    .iter()
                    .map(|b| (b.name.clone(), set.contains(&b.name)))
                    .collect();
                Ok(BindingValue::Bits {
                    type_name: record.name.clone(),
                    flags,
                })
            }
            builtin => {
                if !scalar_matches(builtin, value) {
                    return Err(mismatch(leaf, builtin.name(), value.kind_name()));
                }
                check_restrictions(&chain, value, leaf)?;
                let scalar = scalar_to_binding(value)
                    .ok_or_else(|| mismatch(leaf, builtin.name(), value.kind_name()))?;
                Ok(match type_ref {
                    TypeRef::Generated(name) => BindingValue::typedef(name.clone(), scalar),
                    _ => scalar,
                })
            }
        }
    }

    fn encode_typed(
        &self,
        def: &TypeDefinition,
        leaf: &SchemaPath,
        type_ref: &TypeRef,
        value: &BindingValue,
        depth: usize,
    ) -> Result<Value, CodecError> {
        if matches!(type_ref, TypeRef::Object) {
            return match value {
                BindingValue::Object(inner) => Ok(inner.clone()),
                other => scalar_to_value(other)
                    .ok_or_else(|| mismatch(leaf, "object", other.kind_name())),
            };
        }
        let chain = self.runtime.schema().type_chain(def)?;
        match chain.builtin() {
            BuiltinType::Leafref(expr) => {
                let (target_def, target_path) = self.required_target(expr, leaf, depth)?;
                self.encode_typed(target_def, target_path, type_ref, value, depth + 1)
            }
            BuiltinType::Identityref(bases) => {
                let BindingValue::Identity(name) = value else {
                    return Err(mismatch(leaf, "identity", value.kind_name()));
                };
                let identity = self.runtime.identity_qname(name).ok_or_else(|| {
                    CodecError::invalid_value(format!("{} is not an identity type", name))
                })?;
                self.check_identity(identity, bases, leaf)?;
                Ok(Value::IdentityRef(identity.clone()))
            }
            BuiltinType::InstanceIdentifier => {
                let BindingValue::InstanceIdentifier(path) = value else {
                    return Err(mismatch(leaf, "instance-identifier", value.kind_name()));
                };
                let structural = IdentifierTranslator::new(self.runtime).to_structural(path)?;
                Ok(Value::InstanceIdentifier(structural))
            }
            BuiltinType::Union(members) => {
                let record = self.record(type_ref, TypeKind::Union, leaf)?;
                let (property, inner) = match value {
                    BindingValue::Union { member, value, .. } => (Some(member.as_str()), &**value),
                    other => (None, other),
                };
                for member in &record.union_members {
                    if property.is_some_and(|p| p != member.property) {
                        continue;
                    }
                    let Some(member_def) = members.get(member.member_index) else {
                        continue;
                    };
                    if let Ok(encoded) =
                        self.encode_typed(member_def, leaf, &member.type_ref, inner, depth)
                    {
                        return Ok(encoded);
                    }
                }
                Err(CodecError::invalid_value(format!(
                    "{} value does not fit {}",
                    value.kind_name(),
                    record.name
                )))
            }
            BuiltinType::Enumeration(pairs) => {
                let BindingValue::Enumeration { constant, .. } = value else {
                    return Err(mismatch(leaf, "enumeration", value.kind_name()));
                };
                let record = self.record(type_ref, TypeKind::Enumeration, leaf)?;
                let yang_name = record
                    .constant_named(constant)
                    .map(|c| c.yang_name.clone())
                    .filter(|name| pairs.iter().any(|p| &p.name == name))
                    .ok_or_else(|| {
                        CodecError::invalid_value(format!("{} has no constant {}", record.name, constant))
                    })?;
                Ok(Value::Enum(yang_name))
            }
            BuiltinType::Bits(bits) => {
                let BindingValue::Bits { flags, .. } = value else {
                    return Err(mismatch(leaf, "bits", value.kind_name()));
                };
                if let Some(unknown) = flags.keys().find(|n| !bits.iter().any(|b| &b.name == *n)) {
                    return Err(CodecError::invalid_value(format!(
                        "unknown bit '{}' at {}",
                        unknown, leaf
                    )));
                }
                let set: BTreeSet<String> = flags
                    .iter()
                    .filter(|(_, on)| **on)
                    .map(|(name, _)| name.clone())
                    .collect();
                Ok(Value::Bits(set))
            }
            builtin => {
                let scalar = match value {
                    BindingValue::Typedef { value, .. } => &**value,
                    other => other,
                };
                let encoded = scalar_to_value(scalar)
                    .filter(|v| scalar_matches(builtin, v))
                    .ok_or_else(|| mismatch(leaf, builtin.name(), scalar.kind_name()))?;
                check_restrictions(&chain, &encoded, leaf)?;
                Ok(encoded)
            }
        }
    }

    fn record(
        &self,
        type_ref: &TypeRef,
        kind: TypeKind,
        leaf: &SchemaPath,
    ) -> Result<&'a Arc<GeneratedType>, CodecError> {
        let TypeRef::Generated(name) = type_ref else {
            return Err(CodecError::invalid_value(format!(
                "{} has no generated type at {}",
                leaf,
                type_kind_name(kind)
            )));
        };
        self.runtime
            .type_named(name)
            .filter(|r| r.kind == kind)
            .ok_or_else(|| CodecError::invalid_value(format!("{} is not a known {}", name, type_kind_name(kind))))
    }

    fn leafref_target(
        &self,
        expr: &PathExpression,
        leaf: &SchemaPath,
        depth: usize,
    ) -> Result<Option<(&'a TypeDefinition, &'a SchemaPath)>, CodecError> {
        if depth >= self.runtime.config().max_leafref_depth {
            return Err(SchemaError::LeafrefCycle(leaf.clone()).into());
        }
        if expr.has_predicates() {
            return Ok(None);
        }
        let target = self.runtime.index().resolve_leafref(leaf, expr)?;
        Ok(target.and_then(|node| node.leaf_type().map(|def| (def, &node.path))))
    }

    fn required_target(
        &self,
        expr: &PathExpression,
        leaf: &SchemaPath,
        depth: usize,
    ) -> Result<(&'a TypeDefinition, &'a SchemaPath), CodecError> {
        self.leafref_target(expr, leaf, depth)?.ok_or_else(|| {
            CodecError::invalid_value(format!(
                "leafref {} of {} does not resolve",
                expr.as_str(),
                leaf
            ))
        })
    }

    fn check_identity(
        &self,
        identity: &QName,
        bases: &[QName],
        leaf: &SchemaPath,
    ) -> Result<(), CodecError> {
        let schema = self.runtime.schema();
        if schema.identity(identity).is_none() {
            return Err(CodecError::invalid_value(format!("unknown identity {}", identity)));
        }
        if !bases.is_empty() && !bases.iter().any(|b| schema.is_derived_identity(identity, b)) {
            return Err(CodecError::invalid_value(format!(
                "identity {} does not derive from the bases of {}",
                identity, leaf
            )));
        }
        Ok(())
    }

    fn identity_name(&self, identity: &QName) -> TypeName {
        self.runtime
            .identity_type(identity)
            .cloned()
            .unwrap_or_else(|| identity_type_name(identity))
    }

    /// `prefix:name` or `name`, prefixes resolved against the leaf's module.
    fn parse_identity(&self, leaf: &SchemaPath, text: &str) -> Result<QName, CodecError> {
        let module = self.runtime.index().find_parent_module(leaf)?;
        let (module, local) = match text.split_once(':') {
            Some((prefix, local)) => {
                let target = module
                    .module_name_for_prefix(prefix)
                    .and_then(|name| self.runtime.schema().module_by_name(name))
                    .ok_or_else(|| {
                        CodecError::invalid_value(format!("unknown prefix '{}' in '{}'", prefix, text))
                    })?;
                (target, local)
            }
            None => (module, text),
        };
        if local.is_empty() {
            return Err(CodecError::invalid_value(format!("'{}' is not an identity", text)));
        }
        Ok(QName::new(&module.qname_module, local))
    }
}

fn type_kind_name(kind: TypeKind) -> &'static str {
    match kind {
        TypeKind::Union => "union",
        TypeKind::Enumeration => "enumeration",
        TypeKind::Bits => "bits",
        _ => "type",
    }
}

fn mismatch(leaf: &SchemaPath, expected: &str, found: &str) -> CodecError {
    CodecError::invalid_value(format!("{}: expected {} value, got {}", leaf, expected, found))
}

fn scalar_matches(builtin: &BuiltinType, value: &Value) -> bool {
    match (builtin, value) {
        (BuiltinType::Decimal64 { fraction_digits }, Value::Decimal64(d)) => {
            d.fraction_digits() == *fraction_digits
        }
        (BuiltinType::Boolean, Value::Boolean(_))
        | (BuiltinType::Int8, Value::Int8(_))
        | (BuiltinType::Int16, Value::Int16(_))
        | (BuiltinType::Int32, Value::Int32(_))
        | (BuiltinType::Int64, Value::Int64(_))
        | (BuiltinType::Uint8, Value::Uint8(_))
        | (BuiltinType::Uint16, Value::Uint16(_))
        | (BuiltinType::Uint32, Value::Uint32(_))
        | (BuiltinType::Uint64, Value::Uint64(_))
        | (BuiltinType::String, Value::String(_))
        | (BuiltinType::Binary, Value::Binary(_))
        | (BuiltinType::Empty, Value::Empty) => true,
        _ => false,
    }
}

/// Range and length restrictions of every level of the chain.
fn check_restrictions(
    chain: &TypeChain<'_>,
    value: &Value,
    leaf: &SchemaPath,
) -> Result<(), CodecError> {
    let length = match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Binary(b) => Some(b.len()),
        _ => None,
    };
    for restrictions in chain.restrictions() {
        if let Some(n) = value.as_range_value() {
            if !restrictions.admits_value(n) {
                return Err(CodecError::invalid_value(format!(
                    "{:?} is outside the range of {}",
                    value, leaf
                )));
            }
        }
        if let Some(len) = length {
            if !restrictions.admits_length(len) {
                return Err(CodecError::invalid_value(format!(
                    "length {} is outside the bounds of {}",
                    len, leaf
                )));
            }
        }
    }
    Ok(())
}

pub(crate) fn scalar_to_binding(value: &Value) -> Option<BindingValue> {
    Some(match value {
        Value::Boolean(v) => BindingValue::Boolean(*v),
        Value::Int8(v) => BindingValue::Int8(*v),
        Value::Int16(v) => BindingValue::Int16(*v),
        Value::Int32(v) => BindingValue::Int32(*v),
        Value::Int64(v) => BindingValue::Int64(*v),
        Value::Uint8(v) => BindingValue::Uint8(*v),
        Value::Uint16(v) => BindingValue::Uint16(*v),
        Value::Uint32(v) => BindingValue::Uint32(*v),
        Value::Uint64(v) => BindingValue::Uint64(*v),
        Value::Decimal64(v) => BindingValue::Decimal(*v),
        Value::String(v) => BindingValue::String(v.clone()),
        Value::Binary(v) => BindingValue::Binary(v.clone()),
        Value::Empty => BindingValue::Empty,
        _ => return None,
    })
}

fn scalar_to_value(value: &BindingValue) -> Option<Value> {
    Some(match value {
        BindingValue::Boolean(v) => Value::Boolean(*v),
        BindingValue::Int8(v) => Value::Int8(*v),
        BindingValue::Int16(v) => Value::Int16(*v),
        BindingValue::Int32(v) => Value::Int32(*v),
        BindingValue::Int64(v) => Value::Int64(*v),
        BindingValue::Uint8(v) => Value::Uint8(*v),
        BindingValue::Uint16(v) => Value::Uint16(*v),
        BindingValue::Uint32(v) => Value::Uint32(*v),
        BindingValue::Uint64(v) => Value::Uint64(*v),
        BindingValue::Decimal(v) => Value::Decimal64(*v),
        BindingValue::String(v) => Value::String(v.clone()),
        BindingValue::Binary(v) => Value::Binary(v.clone()),
        BindingValue::Empty => Value::Empty,
        BindingValue::Object(v) => v.clone(),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;
    use crate::index::Renames;
    use crate::model::{ModuleBuilder, QNameModule, SchemaContextBuilder};

    fn ns() -> QNameModule {
        QNameModule::new("urn:test:value", None)
    }

    fn q(name: &str) -> QName {
        QName::new(&ns(), name)
    }

    fn runtime() -> BindingRuntimeContext {
        let module = ModuleBuilder::new("value", "v", ns())
            .typedef(
                "percent",
                TypeDefinition::builtin(BuiltinType::Uint8).with_range(0, 100),
            )
            .identity("crypto-base", &[])
            .identity("crypto-alg", &[q("crypto-base")])
            .identity("unrelated", &[])
            .data(|d| {
                d.container("top", |c| {
                    c.leaf("name", TypeDefinition::builtin(BuiltinType::String).with_length(1, 8))
                        .leaf("ratio", TypeDefinition::derived(q("percent")))
                        .leaf("flags", BuiltinType::bits(&["read", "write", "exec"]))
                        .leaf("state", BuiltinType::enumeration(&["up", "down"]))
                        .leaf(
                            "mode",
                            BuiltinType::Union(vec![BuiltinType::Int8.into(), BuiltinType::String.into()]),
                        )
                        .leaf("alg", BuiltinType::Identityref(vec![q("crypto-base")]))
                        .leaf("name-ref", BuiltinType::leafref("../name").unwrap())
                })
            });
        let ctx = SchemaContextBuilder::new().module(module).build().unwrap();
        BindingRuntimeContext::build(Arc::new(ctx), Renames::new(), &CodecConfig::default()).unwrap()
    }

    fn leaf(runtime: &BindingRuntimeContext, name: &str) -> (TypeDefinition, SchemaPath) {
        let path = SchemaPath::new(vec![q("top"), q(name)]);
        let def = runtime
            .schema()
            .find_data_node(&path)
            .and_then(|n| n.leaf_type())
            .unwrap()
            .clone();
        (def, path)
    }

    fn generated(runtime: &BindingRuntimeContext, path: &SchemaPath) -> TypeName {
        match runtime.leaf_type(path) {
            Some(TypeRef::Generated(name)) => name.clone(),
            other => panic!("generated type expected, got {:?}", other),
        }
    }

    #[test]
    fn test_typedef_value_is_wrapped() {
        let runtime = runtime();
        let codec = ValueCodec::new(&runtime);
        let (def, path) = leaf(&runtime, "ratio");
        let percent = generated(&runtime, &path);

        let decoded = codec.decode(&def, &path, &Value::Uint8(42)).unwrap();
        assert_eq!(decoded, BindingValue::typedef(percent, BindingValue::Uint8(42)));
        assert_eq!(codec.encode(&def, &path, &decoded).unwrap(), Value::Uint8(42));

        let err = codec.decode(&def, &path, &Value::Uint8(150)).unwrap_err();
        assert!(matches!(err, CodecError::InvalidValue(_)));
        let err = codec.decode(&def, &path, &Value::Uint16(42)).unwrap_err();
        assert!(matches!(err, CodecError::InvalidValue(_)));
    }

    #[test]
    fn test_string_length() {
        let runtime = runtime();
        let codec = ValueCodec::new(&runtime);
        let (def, path) = leaf(&runtime, "name");
        assert_eq!(
            codec.decode(&def, &path, &Value::String("eth0".into())).unwrap(),
            BindingValue::String("eth0".into())
        );
        assert!(codec.decode(&def, &path, &Value::String(String::new())).is_err());
        assert!(codec
            .encode(&def, &path, &BindingValue::String("much-too-long".into()))
            .is_err());
    }

    #[test]
    fn test_bits_carry_every_flag() {
        let runtime = runtime();
        let codec = ValueCodec::new(&runtime);
        let (def, path) = leaf(&runtime, "flags");
        let decoded = codec
            .decode(&def, &path, &Value::bits(["read", "exec"]))
            .unwrap();
        let BindingValue::Bits { flags, .. } = &decoded else {
            panic!("bits expected");
        };
        assert_eq!(flags.len(), 3);
        assert_eq!(flags.get("write"), Some(&false));
        assert_eq!(flags.get("exec"), Some(&true));
        assert_eq!(
            codec.encode(&def, &path, &decoded).unwrap(),
            Value::bits(["exec", "read"])
        );

        let err = codec.decode(&def, &path, &Value::bits(["delete"])).unwrap_err();
        assert!(matches!(err, CodecError::InvalidValue(_)));
    }

    #[test]
    fn test_enumeration_constants() {
        let runtime = runtime();
        let codec = ValueCodec::new(&runtime);
        let (def, path) = leaf(&runtime, "state");
        let state = generated(&runtime, &path);
        let decoded = codec.decode(&def, &path, &Value::Enum("down".into())).unwrap();
        assert_eq!(decoded, BindingValue::enumeration(state.clone(), "Down"));
        assert_eq!(codec.encode(&def, &path, &decoded).unwrap(), Value::Enum("down".into()));
        assert!(codec.decode(&def, &path, &Value::Enum("sideways".into())).is_err());
        assert!(codec
            .encode(&def, &path, &BindingValue::enumeration(state, "Sideways"))
            .is_err());
    }

    #[test]
    fn test_union_picks_first_matching_member() {
        let runtime = runtime();
        let codec = ValueCodec::new(&runtime);
        let (def, path) = leaf(&runtime, "mode");
        let mode = generated(&runtime, &path);

        assert_eq!(codec.parse_literal(&def, &path, "12").unwrap(), Value::Int8(12));
        assert_eq!(
            codec.parse_literal(&def, &path, "300").unwrap(),
            Value::String("300".into())
        );
        assert_eq!(
            codec.decode_literal(&def, &path, "12").unwrap(),
            BindingValue::union(mode.clone(), "int8", BindingValue::Int8(12))
        );

        let text = BindingValue::union(mode.clone(), "string", BindingValue::String("auto".into()));
        assert_eq!(codec.encode(&def, &path, &text).unwrap(), Value::String("auto".into()));
        // A bare value fits whichever member accepts it.
        assert_eq!(
            codec.encode(&def, &path, &BindingValue::Int8(-3)).unwrap(),
            Value::Int8(-3)
        );
        assert!(codec.encode(&def, &path, &BindingValue::Boolean(true)).is_err());
    }

    #[test]
    fn test_identityref_checks_derivation() {
        let runtime = runtime();
        let codec = ValueCodec::new(&runtime);
        let (def, path) = leaf(&runtime, "alg");

        let decoded = codec
            .decode(&def, &path, &Value::IdentityRef(q("crypto-alg")))
            .unwrap();
        let BindingValue::Identity(name) = &decoded else {
            panic!("identity expected");
        };
        assert_eq!(name.name(), "CryptoAlg");
        assert_eq!(
            codec.encode(&def, &path, &decoded).unwrap(),
            Value::IdentityRef(q("crypto-alg"))
        );

        assert!(codec
            .decode(&def, &path, &Value::IdentityRef(q("unrelated")))
            .is_err());
        assert!(codec
            .decode(&def, &path, &Value::IdentityRef(q("missing")))
            .is_err());
        assert_eq!(
            codec.parse_literal(&def, &path, "v:crypto-alg").unwrap(),
            Value::IdentityRef(q("crypto-alg"))
        );
        assert!(codec.parse_literal(&def, &path, "nope:crypto-alg").is_err());
    }

    #[test]
    fn test_leafref_uses_target_type() {
        let runtime = runtime();
        let codec = ValueCodec::new(&runtime);
        let (def, path) = leaf(&runtime, "name-ref");
        assert_eq!(runtime.leaf_type(&path), Some(&TypeRef::Scalar(crate::binding::ScalarKind::String)));
        assert_eq!(
            codec.decode(&def, &path, &Value::String("eth1".into())).unwrap(),
            BindingValue::String("eth1".into())
        );
        // The target's length restriction applies.
        assert!(codec.decode(&def, &path, &Value::String(String::new())).is_err());
    }
}
