// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema paths and leafref path expressions.

use super::qname::QName;
use crate::error::SchemaError;
use std::fmt;

/// Absolute path of a schema node: qualified names from the model root.
///
/// Choice and case nodes, grouping roots, operations and their
/// `input`/`output` containers all appear as ordinary components.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaPath(Vec<QName>);

impl SchemaPath {
    /// The model root.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(components: Vec<QName>) -> Self {
        Self(components)
    }

    /// Path of a direct child.
    pub fn child(&self, qname: QName) -> Self {
        let mut components = self.0.clone();
        components.push(qname);
        Self(components)
    }

    /// Path of the parent, `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        Some(Self(self.0[..self.0.len() - 1].to_vec()))
    }

    pub fn last(&self) -> Option<&QName> {
        self.0.last()
    }

    pub fn components(&self) -> &[QName] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn starts_with(&self, prefix: &SchemaPath) -> bool {
        self.0.starts_with(&prefix.0)
    }

    /// The first `len` components.
    pub fn truncated(&self, len: usize) -> Self {
        Self(self.0[..len.min(self.0.len())].to_vec())
    }

    /// Every non-root ancestor-or-self path, root-most first.
    pub fn prefixes(&self) -> impl Iterator<Item = SchemaPath> + '_ {
        (1..=self.0.len()).map(move |len| self.truncated(len))
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "/");
        }
        for component in &self.0 {
            write!(f, "/{}", component.local_name())?;
        }
        Ok(())
    }
}

/// One step of a leafref path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    /// `..`
    Parent,
    /// `prefix:name` or `name`
    Child {
        prefix: Option<String>,
        name: String,
    },
}

/// A parsed leafref `path` statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathExpression {
    original: String,
    absolute: bool,
    has_predicates: bool,
    steps: Vec<PathStep>,
}

impl PathExpression {
    /// Parse a leafref path. Predicates are recognised and kept out of the
    /// parsed steps.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let invalid = || SchemaError::InvalidPath(text.to_string());
        let (stripped, has_predicates) = strip_predicates(text).ok_or_else(invalid)?;
        let trimmed = stripped.trim();
        if trimmed.is_empty() {
            return Err(invalid());
        }

        let absolute = trimmed.starts_with('/');
        let body = if absolute { &trimmed[1..] } else { trimmed };
        let mut steps = Vec::new();
        for raw in body.split('/') {
            let segment = raw.trim();
            match segment {
                "" => return Err(invalid()),
                "." => {}
                ".." => {
                    if absolute {
                        return Err(invalid());
                    }
                    steps.push(PathStep::Parent);
                }
                _ => {
                    let (prefix, name) = match segment.split_once(':') {
                        Some((p, n)) => (Some(p.to_string()), n),
                        None => (None, segment),
                    };
                    if name.is_empty() || name.contains(':') {
                        return Err(invalid());
                    }
                    steps.push(PathStep::Child {
                        prefix,
                        name: name.to_string(),
                    });
                }
            }
        }

        Ok(Self {
            original: text.to_string(),
            absolute,
            has_predicates,
            steps,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// Whether the original text carries `[...]` predicates.
    pub fn has_predicates(&self) -> bool {
        self.has_predicates
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Number of leading `..` steps.
    pub fn parent_count(&self) -> usize {
        self.steps
            .iter()
            .take_while(|s| matches!(s, PathStep::Parent))
            .count()
    }

    /// The predicate-free rendering of this path.
    pub fn stripped(&self) -> String {
        let mut out = String::new();
        if self.absolute {
            out.push('/');
        }
        let rendered: Vec<String> = self
            .steps
            .iter()
            .map(|s| match s {
                PathStep::Parent => "..".to_string(),
                PathStep::Child {
                    prefix: Some(p),
                    name,
                } => format!("{}:{}", p, name),
                PathStep::Child { prefix: None, name } => name.clone(),
            })
            .collect();
        out.push_str(&rendered.join("/"));
        out
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

/// Remove balanced `[...]` segments. `None` on unbalanced brackets.
fn strip_predicates(text: &str) -> Option<(String, bool)> {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    let mut found = false;
    for ch in text.chars() {
        match ch {
            '[' => {
                depth += 1;
                found = true;
            }
            ']' => depth = depth.checked_sub(1)?,
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    (depth == 0).then_some((out, found))
}
