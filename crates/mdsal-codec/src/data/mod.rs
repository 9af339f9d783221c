// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Normalized representation: qualified-name keyed trees and structural
//! paths.

mod identifier;
mod node;
mod value;

pub use identifier::{NodeIdentifierWithPredicates, PathArgument, YangInstanceIdentifier};
pub use node::{
    ChoiceNode, ContainerNode, DataChildren, LeafNode, LeafSetNode, MapEntryNode, MapNode,
    NormalizedNode, UnkeyedListEntryNode, UnkeyedListNode,
};
pub use value::{Decimal64, Value};
