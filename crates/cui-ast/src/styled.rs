use crate::imports::{ImportKind, find_imports_by_path};
use crate::source::SourceFile;
use crate::visit::{self, ancestor_of_kind, compact_text, named_children};

/// Module paths the Circuit UI components are published under, current scope
/// first.
pub const CIRCUIT_UI_PACKAGES: &[&str] = &["@sumup-oss/circuit-ui", "@sumup/circuit-ui"];

/// Names of variables assigned from `styled(base)` calls.
///
/// Covers `styled(Base)`, tagged templates on it and `.attrs(...)` chains,
/// since all of them contain the inner `styled(Base)` call.
pub fn find_styled_component_names(file: &SourceFile, base: &str) -> Vec<String> {
    let Some(root) = file.root() else {
        return Vec::new();
    };

    let mut names = Vec::new();
    for call in visit::collect_kinds(root, &["call_expression"]) {
        let is_styled = call
            .child_by_field_name("function")
            .is_some_and(|f| f.kind() == "identifier" && file.node_text(f) == "styled");
        if !is_styled {
            continue;
        }
        let wraps_base = call
            .child_by_field_name("arguments")
            .filter(|args| args.kind() == "arguments")
            .and_then(|args| named_children(args).into_iter().next())
            .is_some_and(|arg| compact_text(arg, file.text()) == base);
        if !wraps_base {
            continue;
        }

        let Some(declarator) = ancestor_of_kind(call, "variable_declarator") else {
            continue;
        };
        let Some(name) = declarator.child_by_field_name("name") else {
            continue;
        };
        if name.kind() != "identifier" {
            continue;
        }
        let name = file.node_text(name).to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Local names under which the Circuit UI component `qualified` is used.
///
/// `qualified` may be dotted (`Card.Header`); only its first segment has to be
/// imported, either by name or through a namespace import (`Circuit.Card`).
/// Every Circuit UI package is searched. Returns `None` when the segment is
/// not imported from any of them, otherwise each local reference
/// (re-dotted with the rest of the name) followed by its styled wrappers.
pub fn find_local_names(file: &SourceFile, qualified: &str) -> Option<Vec<String>> {
    let (base, sub) = match qualified.split_once('.') {
        Some((base, sub)) => (base, Some(sub)),
        None => (qualified, None),
    };

    let mut locals: Vec<String> = Vec::new();
    for package in CIRCUIT_UI_PACKAGES {
        for record in find_imports_by_path(file, package) {
            let local = match record.kind {
                ImportKind::Named if record.imported_name.as_deref() == Some(base) => {
                    record.local_name
                }
                ImportKind::Namespace => format!("{}.{base}", record.local_name),
                _ => continue,
            };
            let local = match sub {
                Some(sub) => format!("{local}.{sub}"),
                None => local,
            };
            if !locals.contains(&local) {
                locals.push(local);
            }
        }
    }
    if locals.is_empty() {
        return None;
    }

    let mut names = Vec::new();
    for local in locals {
        let wrappers = find_styled_component_names(file, &local);
        names.push(local);
        for wrapper in wrappers {
            if !names.contains(&wrapper) {
                names.push(wrapper);
            }
        }
    }
    Some(names)
}
