// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed data objects.

use super::identifier::InstanceIdentifier;
use super::types::TypeName;
use crate::data::{Decimal64, Value};
use std::collections::BTreeMap;
use std::time::SystemTime;

/// Value of a binding property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingValue {
    Boolean(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Decimal(Decimal64),
    String(String),
    Binary(Vec<u8>),
    Empty,
    /// Scalar wrapped in a typedef's generated type.
    Typedef {
        type_name: TypeName,
        value: Box<BindingValue>,
    },
    Enumeration {
        type_name: TypeName,
        constant: String,
    },
    /// Every bit of the type, keyed and ordered by bit name.
    Bits {
        type_name: TypeName,
        flags: BTreeMap<String, bool>,
    },
    Union {
        type_name: TypeName,
        member: String,
        value: Box<BindingValue>,
    },
    Identity(TypeName),
    InstanceIdentifier(InstanceIdentifier),
    /// Polymorphic pass-through of a normalized value.
    Object(Value),
    /// Container, or the active case of a choice.
    Container(DataObject),
    List(Vec<DataObject>),
    LeafList(Vec<BindingValue>),
}

impl BindingValue {
    pub fn typedef(type_name: TypeName, value: BindingValue) -> Self {
        Self::Typedef {
            type_name,
            value: Box::new(value),
        }
    }

    pub fn enumeration(type_name: TypeName, constant: impl Into<String>) -> Self {
        Self::Enumeration {
            type_name,
            constant: constant.into(),
        }
    }

    pub fn union(type_name: TypeName, member: impl Into<String>, value: BindingValue) -> Self {
        Self::Union {
            type_name,
            member: member.into(),
            value: Box::new(value),
        }
    }

    /// Short name of the value's kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Int8(_) => "i8",
            Self::Int16(_) => "i16",
            Self::Int32(_) => "i32",
            Self::Int64(_) => "i64",
            Self::Uint8(_) => "u8",
            Self::Uint16(_) => "u16",
            Self::Uint32(_) => "u32",
            Self::Uint64(_) => "u64",
            Self::Decimal(_) => "decimal",
            Self::String(_) => "string",
            Self::Binary(_) => "binary",
            Self::Empty => "empty",
            Self::Typedef { .. } => "typedef",
            Self::Enumeration { .. } => "enumeration",
            Self::Bits { .. } => "bits",
            Self::Union { .. } => "union",
            Self::Identity(_) => "identity",
            Self::InstanceIdentifier(_) => "instance-identifier",
            Self::Object(_) => "object",
            Self::Container(_) => "container",
            Self::List(_) => "list",
            Self::LeafList(_) => "leaf-list",
        }
    }

    pub fn as_container(&self) -> Option<&DataObject> {
        match self {
            Self::Container(obj) => Some(obj),
            _ => None,
        }
    }
}

/// An instance of a generated data type: properties plus augmentations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataObject {
    type_name: TypeName,
    fields: BTreeMap<String, BindingValue>,
    augmentations: BTreeMap<TypeName, DataObject>,
}

impl DataObject {
    pub fn new(type_name: TypeName) -> Self {
        Self {
            type_name,
            fields: BTreeMap::new(),
            augmentations: BTreeMap::new(),
        }
    }

    pub fn type_name(&self) -> &TypeName {
        &self.type_name
    }

    /// Set a property (builder style).
    pub fn with(mut self, property: &str, value: BindingValue) -> Self {
        self.set(property, value);
        self
    }

    pub fn set(&mut self, property: &str, value: BindingValue) {
        self.fields.insert(property.to_string(), value);
    }

    pub fn get(&self, property: &str) -> Option<&BindingValue> {
        self.fields.get(property)
    }

    pub fn remove(&mut self, property: &str) -> Option<BindingValue> {
        self.fields.remove(property)
    }

    pub fn fields(&self) -> &BTreeMap<String, BindingValue> {
        &self.fields
    }

    /// Attach an augmentation (builder style).
    pub fn with_augmentation(mut self, augmentation: DataObject) -> Self {
        self.add_augmentation(augmentation);
        self
    }

    pub fn add_augmentation(&mut self, augmentation: DataObject) {
        self.augmentations
            .insert(augmentation.type_name.clone(), augmentation);
    }

    pub fn augmentation(&self, type_name: &TypeName) -> Option<&DataObject> {
        self.augmentations.get(type_name)
    }

    pub(crate) fn augmentation_entry(&mut self, type_name: &TypeName) -> &mut DataObject {
        self.augmentations
            .entry(type_name.clone())
            .or_insert_with(|| DataObject::new(type_name.clone()))
    }

    pub fn augmentations(&self) -> &BTreeMap<TypeName, DataObject> {
        &self.augmentations
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.augmentations.is_empty()
    }
}

/// A typed notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub body: DataObject,
    pub event_instant: Option<SystemTime>,
}

impl Notification {
    pub fn new(body: DataObject) -> Self {
        Self {
            body,
            event_instant: None,
        }
    }

    pub fn at(mut self, instant: SystemTime) -> Self {
        self.event_instant = Some(instant);
        self
    }
}
