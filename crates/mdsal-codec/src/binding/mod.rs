// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binding representation: generated type records, typed data objects and
//! typed instance identifiers.

mod identifier;
pub mod naming;
mod object;
mod types;

pub use identifier::{InstanceIdentifier, InstanceIdentifierBuilder, Key, PathStep};
pub use object::{BindingValue, DataObject, Notification};
pub use types::{
    EnumConstant, GeneratedType, Property, ScalarKind, TypeKind, TypeName, TypeRef, UnionMember,
};
