// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Naming rules for generated types and properties.
//!
//! Every module gets a root module path derived from its namespace and
//! revision, e.g. `urn:opendaylight:test` at `2014-07-01` becomes
//! `gen::v1::opendaylight::test::rev140701`. Nested types live below their
//! ancestors' property names.

use super::types::TypeName;
use crate::model::{QNameModule, SchemaPath};

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "static", "struct", "super", "trait", "true", "try", "type", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

const SCHEMES: &[&str] = &["urn", "http", "https"];

fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

fn escape_segment(segment: String) -> String {
    if segment.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", segment)
    } else if is_keyword(&segment) {
        format!("{}_", segment)
    } else {
        segment
    }
}

/// Root module path of a module's generated types.
pub fn root_module_path(module: &QNameModule) -> String {
    let mut segments: Vec<String> = module
        .namespace()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| escape_segment(s.to_ascii_lowercase()))
        .collect();
    if segments
        .first()
        .is_some_and(|s| SCHEMES.contains(&s.as_str()))
    {
        segments.remove(0);
    }
    let revision = match module.revision() {
        Some(rev) => format!(
            "rev{:02}{:02}{:02}",
            rev.year() % 100,
            rev.month(),
            rev.day()
        ),
        None => "norev".to_string(),
    };
    segments.insert(0, "gen::v1".to_string());
    segments.push(revision);
    segments.join("::")
}

/// `top-level-list` -> `TopLevelList`.
pub fn class_name(local_name: &str) -> String {
    let mut out = String::with_capacity(local_name.len());
    for part in local_name
        .split(|c: char| c == '-' || c == '_' || c == '.' || c.is_whitespace())
        .filter(|p| !p.is_empty())
    {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// `top-level-list` -> `top_level_list`, `TopLevelList` -> `top_level_list`.
pub fn property_name(local_name: &str) -> String {
    let mut out = String::with_capacity(local_name.len() + 4);
    let mut prev_lower = false;
    for ch in local_name.chars() {
        if ch == '-' || ch == '.' || ch == '_' || ch.is_whitespace() {
            if !out.ends_with('_') {
                out.push('_');
            }
            prev_lower = false;
        } else if ch.is_uppercase() {
            if prev_lower && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }
    escape_segment(out)
}

/// Enum constant for a YANG enum name.
pub fn enum_constant_name(yang_name: &str) -> String {
    class_name(yang_name)
}

/// Generated type name for the node at `path`.
///
/// The root comes from the node's own namespace; ancestors contribute one
/// module level each, choice and case nodes included.
pub fn type_name_for_path(path: &SchemaPath) -> Option<TypeName> {
    let (last, ancestors) = path.components().split_last()?;
    let mut module_path = root_module_path(last.module());
    for ancestor in ancestors {
        module_path.push_str("::");
        module_path.push_str(&property_name(ancestor.local_name()));
    }
    Some(TypeName::new(module_path, class_name(last.local_name())))
}

/// Module path for types nested inside `owner`.
pub fn nested_module_path(owner: &TypeName) -> String {
    format!("{}::{}", owner.module_path(), property_name(owner.name()))
}
