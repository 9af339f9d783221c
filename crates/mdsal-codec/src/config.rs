// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec configuration.
//!
//! Supports both programmatic and file-based configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// What to do with an identityref naming more than one base identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityAmbiguity {
    /// Order the bases by qualified name, use the first and log a warning.
    #[default]
    First,
    /// Fail index construction.
    Reject,
}

/// Codec configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Policy for identityrefs with several bases.
    #[serde(default)]
    pub identity_ambiguity: IdentityAmbiguity,

    /// Unresolvable relative leafrefs inside groupings become polymorphic.
    #[serde(default = "default_true")]
    pub lenient_grouping_leafrefs: bool,

    /// Re-check leafrefs below augmentations once the schema is indexed.
    #[serde(default = "default_true")]
    pub deferred_leafref_validation: bool,

    /// Fill absent leaves with their schema default when decoding.
    #[serde(default)]
    pub materialize_defaults: bool,

    /// Longest leafref-to-leafref chain followed before giving up.
    #[serde(default = "default_max_leafref_depth")]
    pub max_leafref_depth: usize,
}

fn default_true() -> bool {
    true
}

fn default_max_leafref_depth() -> usize {
    32
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            identity_ambiguity: IdentityAmbiguity::First,
            lenient_grouping_leafrefs: true,
            deferred_leafref_validation: true,
            materialize_defaults: false,
            max_leafref_depth: default_max_leafref_depth(),
        }
    }
}

impl CodecConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Strict profile: ambiguous identityrefs are rejected.
    pub fn strict() -> Self {
        Self {
            identity_ambiguity: IdentityAmbiguity::Reject,
            ..Default::default()
        }
    }

    /// Enable default materialization on decode.
    pub fn with_materialized_defaults(mut self, enabled: bool) -> Self {
        self.materialize_defaults = enabled;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_leafref_depth == 0 {
            return Err(ConfigError::Invalid(
                "max_leafref_depth must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
