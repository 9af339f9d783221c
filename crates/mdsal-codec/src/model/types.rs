// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type definitions for leaves, leaf-lists and typedefs.

use super::path::{PathExpression, SchemaPath};
use super::qname::{QName, QNameModule};
use crate::error::SchemaError;

/// Namespace of the built-in YANG types.
pub const YANG_NAMESPACE: &str = "urn:ietf:params:xml:ns:yang:1";

/// Definition status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Current,
    Deprecated,
    Obsolete,
}

/// A named bit of a `bits` type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bit {
    pub name: String,
    pub position: u32,
}

/// A named value of an `enumeration` type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumPair {
    pub name: String,
    pub value: i32,
}

/// Inclusive interval used for range and length restrictions.
///
/// Decimal64 ranges are expressed in unscaled units of the type's
/// fraction digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueRange {
    pub min: i128,
    pub max: i128,
}

impl ValueRange {
    pub fn new(min: i128, max: i128) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: i128) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Value-space restrictions declared on one level of a type chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Restrictions {
    pub ranges: Vec<ValueRange>,
    pub lengths: Vec<ValueRange>,
    pub patterns: Vec<String>,
}

impl Restrictions {
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty() && self.lengths.is_empty() && self.patterns.is_empty()
    }

    /// An empty range list admits everything.
    pub fn admits_value(&self, value: i128) -> bool {
        self.ranges.is_empty() || self.ranges.iter().any(|r| r.contains(value))
    }

    pub fn admits_length(&self, length: usize) -> bool {
        let length = length as i128;
        self.lengths.is_empty() || self.lengths.iter().any(|r| r.contains(length))
    }
}

/// Built-in YANG types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Binary,
    Bits(Vec<Bit>),
    Boolean,
    Decimal64 { fraction_digits: u8 },
    Empty,
    Enumeration(Vec<EnumPair>),
    Identityref(Vec<QName>),
    InstanceIdentifier,
    Int8,
    Int16,
    Int32,
    Int64,
    Leafref(PathExpression),
    String,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Union(Vec<TypeDefinition>),
}

impl BuiltinType {
    /// Leafref over a path statement.
    pub fn leafref(path: &str) -> Result<Self, SchemaError> {
        Ok(Self::Leafref(PathExpression::parse(path)?))
    }

    /// Bits with positions assigned in declaration order.
    pub fn bits(names: &[&str]) -> Self {
        Self::Bits(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| Bit {
                    name: (*n).to_string(),
                    position: i as u32,
                })
                .collect(),
        )
    }

    /// Enumeration with values assigned in declaration order.
    pub fn enumeration(names: &[&str]) -> Self {
        Self::Enumeration(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| EnumPair {
                    name: (*n).to_string(),
                    value: i as i32,
                })
                .collect(),
        )
    }

    /// YANG keyword of the type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Bits(_) => "bits",
            Self::Boolean => "boolean",
            Self::Decimal64 { .. } => "decimal64",
            Self::Empty => "empty",
            Self::Enumeration(_) => "enumeration",
            Self::Identityref(_) => "identityref",
            Self::InstanceIdentifier => "instance-identifier",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Leafref(_) => "leafref",
            Self::String => "string",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Union(_) => "union",
        }
    }

    /// Whether a typedef over this type gets its own generated type.
    pub fn has_generated_type(&self) -> bool {
        !matches!(self, Self::Leafref(_) | Self::Identityref(_))
    }
}

/// Either a built-in type or a reference to a typedef.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeShape {
    Builtin(BuiltinType),
    Derived(QName),
}

/// A type as used by a leaf, a leaf-list, a union member or a typedef.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDefinition {
    /// Typedef name, referenced typedef name, or the built-in type's name.
    pub qname: QName,
    /// Declaration path for typedefs; root otherwise.
    pub path: SchemaPath,
    pub shape: TypeShape,
    pub default_value: Option<String>,
    pub units: Option<String>,
    pub status: Status,
    pub restrictions: Restrictions,
}

impl TypeDefinition {
    /// A typedef declaration or a restricted reference.
    pub fn new(qname: QName, shape: TypeShape) -> Self {
        Self {
            qname,
            path: SchemaPath::root(),
            shape,
            default_value: None,
            units: None,
            status: Status::Current,
            restrictions: Restrictions::default(),
        }
    }

    /// A use of a built-in type.
    pub fn builtin(builtin: BuiltinType) -> Self {
        let qname = QName::new(&QNameModule::new(YANG_NAMESPACE, None), builtin.name());
        Self::new(qname, TypeShape::Builtin(builtin))
    }

    /// A use of the typedef `typedef`.
    pub fn derived(typedef: QName) -> Self {
        Self::new(typedef.clone(), TypeShape::Derived(typedef))
    }

    pub fn with_range(mut self, min: i128, max: i128) -> Self {
        self.restrictions.ranges.push(ValueRange::new(min, max));
        self
    }

    pub fn with_length(mut self, min: i128, max: i128) -> Self {
        self.restrictions.lengths.push(ValueRange::new(min, max));
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.restrictions.patterns.push(pattern.into());
        self
    }

    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn builtin_type(&self) -> Option<&BuiltinType> {
        match &self.shape {
            TypeShape::Builtin(b) => Some(b),
            TypeShape::Derived(_) => None,
        }
    }

    pub fn base_typedef(&self) -> Option<&QName> {
        match &self.shape {
            TypeShape::Derived(q) => Some(q),
            TypeShape::Builtin(_) => None,
        }
    }
}

impl From<BuiltinType> for TypeDefinition {
    fn from(builtin: BuiltinType) -> Self {
        Self::builtin(builtin)
    }
}
