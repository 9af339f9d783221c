// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Qualified names.

use crate::error::SchemaError;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// A module revision date (`YYYY-MM-DD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Revision {
    year: u16,
    month: u8,
    day: u8,
}

impl Revision {
    /// Parse a `YYYY-MM-DD` revision date.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let invalid = || SchemaError::InvalidRevision(text.to_string());
        let mut parts = text.split('-');
        let (Some(y), Some(m), Some(d), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        if y.len() != 4 || m.len() != 2 || d.len() != 2 {
            return Err(invalid());
        }
        let year = y.parse::<u16>().map_err(|_| invalid())?;
        let month = m.parse::<u8>().map_err(|_| invalid())?;
        let day = d.parse::<u8>().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(invalid());
        }
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }
}

impl FromStr for Revision {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Namespace and optional revision of a module.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QNameModule {
    namespace: Arc<str>,
    revision: Option<Revision>,
}

impl QNameModule {
    pub fn new(namespace: impl Into<Arc<str>>, revision: Option<Revision>) -> Self {
        Self {
            namespace: namespace.into(),
            revision,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn revision(&self) -> Option<Revision> {
        self.revision
    }
}

impl fmt::Display for QNameModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.revision {
            Some(rev) => write!(f, "{}?revision={}", self.namespace, rev),
            None => write!(f, "{}", self.namespace),
        }
    }
}

/// A qualified name: module plus local name.
///
/// Ordering is namespace, then revision, then local name. Wherever an
/// unordered set of candidates has to be narrowed to one, this order decides.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QName {
    module: QNameModule,
    local_name: Arc<str>,
}

impl QName {
    pub fn new(module: &QNameModule, local_name: impl Into<Arc<str>>) -> Self {
        Self {
            module: module.clone(),
            local_name: local_name.into(),
        }
    }

    pub fn module(&self) -> &QNameModule {
        &self.module
    }

    pub fn namespace(&self) -> &str {
        self.module.namespace()
    }

    pub fn revision(&self) -> Option<Revision> {
        self.module.revision()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Same local name, bound to another module.
    pub fn bind_to(&self, module: &QNameModule) -> Self {
        Self {
            module: module.clone(),
            local_name: self.local_name.clone(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}){}", self.module, self.local_name)
    }
}
