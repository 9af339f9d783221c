// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Import-order sorting of modules.

use crate::error::SchemaError;
use crate::model::{Module, SchemaContext};
use std::collections::HashMap;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Order modules so that every module follows the modules it imports.
///
/// Independent modules keep name order, so the result is deterministic for
/// a given context.
pub fn sort_modules(ctx: &SchemaContext) -> Result<Vec<&Module>, SchemaError> {
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut sorted = Vec::with_capacity(ctx.modules().len());
    for module in ctx.modules() {
        visit(ctx, module, &mut marks, &mut sorted)?;
    }
    Ok(sorted)
}

fn visit<'a>(
    ctx: &'a SchemaContext,
    module: &'a Module,
    marks: &mut HashMap<&'a str, Mark>,
    sorted: &mut Vec<&'a Module>,
) -> Result<(), SchemaError> {
    match marks.get(module.name.as_str()) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => return Err(SchemaError::CyclicImport(module.name.clone())),
        None => {}
    }
    marks.insert(&module.name, Mark::Visiting);

    let mut imports: Vec<&str> = module.imports.iter().map(|i| i.module_name.as_str()).collect();
    imports.sort_unstable();
    imports.dedup();
    for name in imports {
        let imported = ctx
            .module_by_name(name)
            .ok_or_else(|| SchemaError::ModuleNotFound(name.to_string()))?;
        visit(ctx, imported, marks, sorted)?;
    }

    marks.insert(&module.name, Mark::Done);
    sorted.push(module);
    Ok(())
}
