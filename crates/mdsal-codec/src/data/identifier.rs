// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural paths into a normalized tree.

use super::value::Value;
use crate::model::QName;
use std::collections::BTreeMap;
use std::fmt;

/// A list entry identifier: list name plus key leaf values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIdentifierWithPredicates {
    pub qname: QName,
    pub keys: BTreeMap<QName, Value>,
}

impl NodeIdentifierWithPredicates {
    pub fn new(qname: QName, keys: BTreeMap<QName, Value>) -> Self {
        Self { qname, keys }
    }

    /// Single-key shorthand.
    pub fn single(qname: QName, key: QName, value: Value) -> Self {
        Self::new(qname, BTreeMap::from([(key, value)]))
    }
}

/// One step of a [`YangInstanceIdentifier`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathArgument {
    NodeIdentifier(QName),
    NodeIdentifierWithPredicates(NodeIdentifierWithPredicates),
    /// A leaf-list entry.
    NodeWithValue(QName, Value),
}

impl PathArgument {
    pub fn qname(&self) -> &QName {
        match self {
            Self::NodeIdentifier(q) | Self::NodeWithValue(q, _) => q,
            Self::NodeIdentifierWithPredicates(p) => &p.qname,
        }
    }
}

impl fmt::Display for PathArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NodeIdentifier(q) => write!(f, "{}", q.local_name()),
            Self::NodeIdentifierWithPredicates(p) => {
                write!(f, "{}", p.qname.local_name())?;
                for (key, value) in &p.keys {
                    write!(f, "[{}={:?}]", key.local_name(), value)?;
                }
                Ok(())
            }
            Self::NodeWithValue(q, v) => write!(f, "{}[.={:?}]", q.local_name(), v),
        }
    }
}

/// Structural path: an immutable sequence of path arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YangInstanceIdentifier(Vec<PathArgument>);

impl YangInstanceIdentifier {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn new(arguments: Vec<PathArgument>) -> Self {
        Self(arguments)
    }

    /// Append a plain node identifier.
    pub fn node(mut self, qname: QName) -> Self {
        self.0.push(PathArgument::NodeIdentifier(qname));
        self
    }

    /// Append a list entry identifier.
    pub fn entry(mut self, entry: NodeIdentifierWithPredicates) -> Self {
        self.0.push(PathArgument::NodeIdentifierWithPredicates(entry));
        self
    }

    pub fn child(&self, argument: PathArgument) -> Self {
        let mut arguments = self.0.clone();
        arguments.push(argument);
        Self(arguments)
    }

    pub fn path_arguments(&self) -> &[PathArgument] {
        &self.0
    }

    pub fn last_path_argument(&self) -> Option<&PathArgument> {
        self.0.last()
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.0.split_last()?;
        Some(Self(init.to_vec()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for YangInstanceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for argument in &self.0 {
            write!(f, "/{}", argument)?;
        }
        Ok(())
    }
}
