//! Transitive type dependency resolution.
//!
//! Discovers every struct type reachable from a root type, in encounter
//! order, without looping on cyclic or self-referential schemas.

use std::collections::HashSet;

use crate::types::Eip712Types;

/// Collect the struct types transitively referenced by `root`, inclusive
/// of `root` itself, in depth-first encounter order.
///
/// Each type name is added at most once and never re-expanded, so the
/// traversal terminates for arbitrary cyclic graphs. Primitive and array
/// field types are skipped, as is a root that is not declared in the
/// schema (which resolves to an empty list).
pub fn resolve_dependencies(root: &str, types: &Eip712Types) -> Vec<String> {
    let mut found = Vec::new();
    let mut seen = HashSet::new();
    visit(root, types, &mut found, &mut seen);
    found
}

fn visit(name: &str, types: &Eip712Types, found: &mut Vec<String>, seen: &mut HashSet<String>) {
    if seen.contains(name) {
        return;
    }

    // Only declared struct types are expanded; everything else is skipped.
    if let Some(fields) = types.get(name) {
        seen.insert(name.to_string());
        found.push(name.to_string());

        for field in fields {
            visit(&field.type_name, types, found, seen);
        }
    }
}
