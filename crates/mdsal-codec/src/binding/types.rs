// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Generated type records.

use crate::model::{BuiltinType, QName, Restrictions, SchemaPath};
use std::fmt;
use std::sync::Arc;

/// Fully qualified name of a generated type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName {
    module_path: Arc<str>,
    name: Arc<str>,
}

impl TypeName {
    pub fn new(module_path: impl Into<Arc<str>>, name: impl Into<Arc<str>>) -> Self {
        Self {
            module_path: module_path.into(),
            name: name.into(),
        }
    }

    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Same module path, different simple name.
    pub fn sibling(&self, name: impl Into<Arc<str>>) -> Self {
        Self {
            module_path: self.module_path.clone(),
            name: name.into(),
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.module_path, self.name)
    }
}

/// Built-in scalar carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Decimal64,
    String,
    Binary,
    Empty,
}

impl ScalarKind {
    /// Scalar carrier of a built-in type, `None` for types needing a
    /// generated or referenced type.
    pub fn for_builtin(builtin: &BuiltinType) -> Option<Self> {
        Some(match builtin {
            BuiltinType::Boolean => Self::Boolean,
            BuiltinType::Int8 => Self::Int8,
            BuiltinType::Int16 => Self::Int16,
            BuiltinType::Int32 => Self::Int32,
            BuiltinType::Int64 => Self::Int64,
            BuiltinType::Uint8 => Self::Uint8,
            BuiltinType::Uint16 => Self::Uint16,
            BuiltinType::Uint32 => Self::Uint32,
            BuiltinType::Uint64 => Self::Uint64,
            BuiltinType::Decimal64 { .. } => Self::Decimal64,
            BuiltinType::String => Self::String,
            BuiltinType::Binary => Self::Binary,
            BuiltinType::Empty => Self::Empty,
            _ => return None,
        })
    }

    /// Rust spelling of the carrier.
    pub fn rust_name(&self) -> &'static str {
        match self {
            Self::Boolean => "bool",
            Self::Int8 => "i8",
            Self::Int16 => "i16",
            Self::Int32 => "i32",
            Self::Int64 => "i64",
            Self::Uint8 => "u8",
            Self::Uint16 => "u16",
            Self::Uint32 => "u32",
            Self::Uint64 => "u64",
            Self::Decimal64 => "Decimal64",
            Self::String => "String",
            Self::Binary => "Vec<u8>",
            Self::Empty => "Empty",
        }
    }
}

/// Binding type of a property.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Scalar(ScalarKind),
    Generated(TypeName),
    /// Reference to an identity deriving from the named base.
    Identity(TypeName),
    InstanceIdentifier,
    /// Polymorphic value: predicate leafrefs and unresolved grouping leafrefs.
    Object,
    ListOf(Box<TypeRef>),
}

/// What a generated type stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// Typedef of a scalar, one `value` property.
    Wrapper,
    Enumeration,
    Bits,
    Union,
    Container,
    ListEntry,
    Key,
    Choice,
    Case,
    Augmentation,
    Grouping,
    Identity,
    Notification,
    Input,
    Output,
    Operation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub yang_name: Option<QName>,
    pub type_ref: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumConstant {
    pub name: String,
    pub yang_name: String,
    pub value: i32,
}

/// A union member property, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionMember {
    pub property: String,
    /// Index into the union's member type list.
    pub member_index: usize,
    pub type_ref: TypeRef,
}

/// A generated type record. Immutable once published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedType {
    pub name: TypeName,
    pub kind: TypeKind,
    pub schema_path: Option<SchemaPath>,
    pub module_name: String,
    pub properties: Vec<Property>,
    pub extends: Option<TypeName>,
    pub restrictions: Restrictions,
    pub units: Option<String>,
    pub deprecated: bool,
    pub constants: Vec<EnumConstant>,
    pub union_members: Vec<UnionMember>,
}

impl GeneratedType {
    pub fn new(name: TypeName, kind: TypeKind, module_name: impl Into<String>) -> Self {
        Self {
            name,
            kind,
            schema_path: None,
            module_name: module_name.into(),
            properties: Vec::new(),
            extends: None,
            restrictions: Restrictions::default(),
            units: None,
            deprecated: false,
            constants: Vec::new(),
            union_members: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: SchemaPath) -> Self {
        self.schema_path = Some(path);
        self
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn union_member(&self, property: &str) -> Option<&UnionMember> {
        self.union_members.iter().find(|m| m.property == property)
    }

    pub fn constant_for_yang_name(&self, yang_name: &str) -> Option<&EnumConstant> {
        self.constants.iter().find(|c| c.yang_name == yang_name)
    }

    pub fn constant_named(&self, name: &str) -> Option<&EnumConstant> {
        self.constants.iter().find(|c| c.name == name)
    }
}
