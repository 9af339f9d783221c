// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema default values as binding constructions.
//!
//! A leaf default is first turned into a [`DefaultConstruction`], a small
//! expression tree describing how the binding value is built from the
//! literal. The construction renders as source text through `Display` and
//! can be evaluated into a [`BindingValue`].

use super::value::{scalar_to_binding, ValueCodec};
use crate::binding::{BindingValue, ScalarKind, TypeKind, TypeName, TypeRef};
use crate::data::Value;
use crate::error::CodecError;
use crate::index::BindingRuntimeContext;
use crate::model::{BuiltinType, NodeKind, SchemaPath, TypeDefinition};
use base64::Engine;
use std::collections::BTreeMap;
use std::fmt;

/// How a default literal becomes a binding value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultConstruction {
    /// Base64-decoded bytes.
    Bytes(Vec<u8>),
    Bits {
        type_name: TypeName,
        flags: BTreeMap<String, bool>,
    },
    Boolean(bool),
    Empty,
    /// Typed parse of a numeric or non-canonical literal.
    Parse {
        builtin: BuiltinType,
        literal: String,
    },
    EnumConstant {
        type_name: TypeName,
        constant: String,
    },
    Str(String),
    UnionFromChars {
        type_name: TypeName,
        literal: String,
    },
    /// Typedef wrapper around the base construction.
    Wrapped {
        type_name: TypeName,
        inner: Box<DefaultConstruction>,
    },
    /// Polymorphic leafref default, kept as text.
    Object(String),
}

impl fmt::Display for DefaultConstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(bytes) => {
                write!(f, "vec![")?;
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", b)?;
                }
                write!(f, "]")
            }
            Self::Bits { type_name, flags } => {
                write!(f, "{}::new(", type_name.name())?;
                for (i, on) in flags.values().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", on)?;
                }
                write!(f, ")")
            }
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Empty => write!(f, "Empty"),
            Self::Parse { builtin, literal } => {
                let carrier = ScalarKind::for_builtin(builtin)
                    .map(|k| k.rust_name())
                    .unwrap_or_else(|| builtin.name());
                write!(f, "{}::value_of({:?})", carrier, literal)
            }
            Self::EnumConstant {
                type_name,
                constant,
            } => write!(f, "{}::{}", type_name.name(), constant),
            Self::Str(s) => write!(f, "{:?}", s),
            Self::UnionFromChars { type_name, literal } => {
                write!(f, "{}::from_chars({:?})", type_name.name(), literal)
            }
            Self::Wrapped { type_name, inner } => write!(f, "{}::new({})", type_name.name(), inner),
            Self::Object(literal) => write!(f, "Object::from({:?})", literal),
        }
    }
}

/// Builds and evaluates default constructions for one runtime context.
#[derive(Clone, Copy)]
pub struct DefaultValueMaterializer<'a> {
    runtime: &'a BindingRuntimeContext,
}

impl<'a> DefaultValueMaterializer<'a> {
    pub fn new(runtime: &'a BindingRuntimeContext) -> Self {
        Self { runtime }
    }

    /// Construction of the default of the leaf at `leaf`, if it has one.
    pub fn default_construction(
        &self,
        leaf: &SchemaPath,
    ) -> Result<Option<DefaultConstruction>, CodecError> {
        let Some((def, literal)) = self.default_literal(leaf)? else {
            return Ok(None);
        };
        self.construction_for(def, leaf, literal).map(Some)
    }

    /// Default of the leaf at `leaf` as a binding value, if it has one.
    pub fn leaf_default(&self, leaf: &SchemaPath) -> Result<Option<BindingValue>, CodecError> {
        let Some((def, literal)) = self.default_literal(leaf)? else {
            return Ok(None);
        };
        let construction = self.construction_for(def, leaf, literal)?;
        self.evaluate(&construction, def, leaf).map(Some)
    }

    /// Construction of `literal` as a value of `def` at `leaf`.
    pub fn construction_for(
        &self,
        def: &TypeDefinition,
        leaf: &SchemaPath,
        literal: &str,
    ) -> Result<DefaultConstruction, CodecError> {
        let chain = self.runtime.schema().type_chain(def)?;
        let type_ref = ValueCodec::new(self.runtime).element_type(def, leaf)?;
        let base = match chain.builtin() {
            BuiltinType::Binary => DefaultConstruction::Bytes(
                base64::engine::general_purpose::STANDARD
                    .decode(literal.trim())
                    .map_err(|e| {
                        CodecError::invalid_value(format!("default of {} is not base64: {}", leaf, e))
                    })?,
            ),
            BuiltinType::Bits(bits) => {
                let named: Vec<&str> = literal.split_whitespace().collect();
                if let Some(unknown) = named.iter().find(|n| !bits.iter().any(|b| b.name == **n)) {
                    return Err(CodecError::invalid_value(format!(
                        "default of {} names unknown bit '{}'",
                        leaf, unknown
                    )));
                }
                return Ok(DefaultConstruction::Bits {
                    type_name: generated_name(&type_ref, leaf)?,
                    flags: bits
                        .iter()
                        .map(|b| (b.name.clone(), named.contains(&b.name.as_str())))
                        .collect(),
                });
            }
            BuiltinType::Boolean => match literal {
                "true" => DefaultConstruction::Boolean(true),
                "false" => DefaultConstruction::Boolean(false),
                other => DefaultConstruction::Parse {
                    builtin: BuiltinType::Boolean,
                    literal: other.to_string(),
                },
            },
            BuiltinType::Empty => DefaultConstruction::Empty,
            BuiltinType::Enumeration(_) => {
                let type_name = generated_name(&type_ref, leaf)?;
                let constant = self
                    .runtime
                    .type_named(&type_name)
                    .and_then(|r| r.constant_for_yang_name(literal))
                    .ok_or_else(|| {
                        CodecError::invalid_value(format!(
                            "default '{}' of {} is not an enum",
                            literal, leaf
                        ))
                    })?;
                return Ok(DefaultConstruction::EnumConstant {
                    type_name,
                    constant: constant.name.clone(),
                });
            }
            BuiltinType::Identityref(_) | BuiltinType::InstanceIdentifier => {
                return Err(CodecError::UnsupportedOperation(format!(
                    "{} default of {}",
                    chain.builtin().name(),
                    leaf
                )))
            }
            BuiltinType::Leafref(expr) => {
                if expr.has_predicates() || matches!(type_ref, TypeRef::Object) {
                    return Ok(DefaultConstruction::Object(literal.to_string()));
                }
                return match self.runtime.index().resolve_leafref(leaf, expr)? {
                    Some(target) => match target.leaf_type() {
                        Some(target_def) => self.construction_for(target_def, &target.path, literal),
                        None => Ok(DefaultConstruction::Object(literal.to_string())),
                    },
                    None => Ok(DefaultConstruction::Object(literal.to_string())),
                };
            }
            BuiltinType::String => DefaultConstruction::Str(literal.to_string()),
            BuiltinType::Union(_) => {
                return Ok(DefaultConstruction::UnionFromChars {
                    type_name: generated_name(&type_ref, leaf)?,
                    literal: literal.to_string(),
                })
            }
            builtin => DefaultConstruction::Parse {
                builtin: builtin.clone(),
                literal: literal.to_string(),
            },
        };

        Ok(match &type_ref {
            TypeRef::Generated(name)
                if self
                    .runtime
                    .type_named(name)
                    .is_some_and(|r| r.kind == TypeKind::Wrapper) =>
            {
                DefaultConstruction::Wrapped {
                    type_name: name.clone(),
                    inner: Box::new(base),
                }
            }
            _ => base,
        })
    }

    /// Evaluate a construction built for `def` at `leaf`.
    pub fn evaluate(
        &self,
        construction: &DefaultConstruction,
        def: &TypeDefinition,
        leaf: &SchemaPath,
    ) -> Result<BindingValue, CodecError> {
        Ok(match construction {
            DefaultConstruction::Bytes(bytes) => BindingValue::Binary(bytes.clone()),
            DefaultConstruction::Bits { type_name, flags } => BindingValue::Bits {
                type_name: type_name.clone(),
                flags: flags.clone(),
            },
            DefaultConstruction::Boolean(b) => BindingValue::Boolean(*b),
            DefaultConstruction::Empty => BindingValue::Empty,
            DefaultConstruction::Parse { builtin, literal } => {
                let value = Value::parse_literal(builtin, literal)?;
                scalar_to_binding(&value).ok_or_else(|| {
                    CodecError::invalid_value(format!("'{}' is not a {}", literal, builtin.name()))
                })?
            }
            DefaultConstruction::EnumConstant {
                type_name,
                constant,
            } => BindingValue::enumeration(type_name.clone(), constant.clone()),
            DefaultConstruction::Str(s) => BindingValue::String(s.clone()),
            DefaultConstruction::UnionFromChars { literal, .. } => {
                ValueCodec::new(self.runtime).decode_literal(def, leaf, literal)?
            }
            DefaultConstruction::Wrapped { type_name, inner } => {
                BindingValue::typedef(type_name.clone(), self.evaluate(inner, def, leaf)?)
            }
            DefaultConstruction::Object(literal) => BindingValue::Object(Value::String(literal.clone())),
        })
    }

    /// Type and default literal of the leaf at `leaf`: the leaf's own
    /// default, else the nearest one along its typedef chain.
    fn default_literal(
        &self,
        leaf: &SchemaPath,
    ) -> Result<Option<(&'a TypeDefinition, &'a str)>, CodecError> {
        let node = self.runtime.schema().find_data_node(leaf).ok_or_else(|| {
            CodecError::invalid_argument(format!("{} is not a schema node", leaf))
        })?;
        let NodeKind::Leaf(schema) = &node.kind else {
            return Err(CodecError::invalid_argument(format!("{} is not a leaf", leaf)));
        };
        let literal = match schema.default_value.as_deref() {
            Some(literal) => Some(literal),
            None => self.runtime.schema().type_chain(&schema.type_def)?.default_value(),
        };
        Ok(literal.map(|l| (&schema.type_def, l)))
    }
}

fn generated_name(type_ref: &TypeRef, leaf: &SchemaPath) -> Result<TypeName, CodecError> {
    match type_ref {
        TypeRef::Generated(name) => Ok(name.clone()),
        _ => Err(CodecError::invalid_value(format!("{} has no generated type", leaf))),
    }
}
