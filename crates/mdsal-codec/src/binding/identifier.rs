// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed paths into the binding object model.

use super::object::BindingValue;
use super::types::TypeName;
use std::collections::BTreeMap;
use std::fmt;

/// Key of a list entry: key type plus key property values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub type_name: TypeName,
    pub values: BTreeMap<String, BindingValue>,
}

impl Key {
    pub fn new(type_name: TypeName) -> Self {
        Self {
            type_name,
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, property: &str, value: BindingValue) -> Self {
        self.values.insert(property.to_string(), value);
        self
    }
}

/// One step: a generated type and, for list entries, its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathStep {
    pub type_name: TypeName,
    pub key: Option<Key>,
}

/// Typed path. Immutable value type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceIdentifier {
    steps: Vec<PathStep>,
}

impl InstanceIdentifier {
    pub fn new(steps: Vec<PathStep>) -> Self {
        Self { steps }
    }

    pub fn builder() -> InstanceIdentifierBuilder {
        InstanceIdentifierBuilder::default()
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Type of the addressed object.
    pub fn target_type(&self) -> Option<&TypeName> {
        self.steps.last().map(|s| &s.type_name)
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Display for InstanceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "/{}", step.type_name.name())?;
            if let Some(key) = &step.key {
                for (property, value) in &key.values {
                    write!(f, "[{}={:?}]", property, value)?;
                }
            }
        }
        Ok(())
    }
}

/// Fluent builder for [`InstanceIdentifier`].
#[derive(Debug, Clone, Default)]
pub struct InstanceIdentifierBuilder {
    steps: Vec<PathStep>,
}

impl InstanceIdentifierBuilder {
    /// Container, case child, or wildcarded list.
    pub fn child(mut self, type_name: TypeName) -> Self {
        self.steps.push(PathStep {
            type_name,
            key: None,
        });
        self
    }

    /// Keyed list entry.
    pub fn keyed(mut self, type_name: TypeName, key: Key) -> Self {
        self.steps.push(PathStep {
            type_name,
            key: Some(key),
        });
        self
    }

    /// Step into an augmentation of the previous step.
    pub fn augmentation(self, type_name: TypeName) -> Self {
        self.child(type_name)
    }

    pub fn build(self) -> InstanceIdentifier {
        InstanceIdentifier { steps: self.steps }
    }
}
