use std::collections::HashMap;
use std::ops::Range;

use tree_sitter::Node;

use crate::literal::StringLiteral;
use crate::source::SourceFile;
use crate::visit::{self, child_of_kind, named_children};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// `import Button from 'x'`
    Default,
    /// `import { Button } from 'x'` or `import { Button as B } from 'x'`
    Named,
    /// `import * as Circuit from 'x'`
    Namespace,
}

/// One binding introduced by an import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    pub kind: ImportKind,
    /// Name the binding has inside the importing module.
    pub local_name: String,
    /// Exported name for named imports.
    pub imported_name: Option<String>,
    /// Module path the binding comes from.
    pub source: String,
    /// Byte range of the whole specifier (`Button as B`).
    pub range: Range<usize>,
    /// Byte range of the exported name inside the specifier, for named imports.
    pub imported_range: Option<Range<usize>>,
}

impl ImportRecord {
    /// Whether the local binding differs from the exported name.
    pub fn is_aliased(&self) -> bool {
        self.imported_name
            .as_deref()
            .is_some_and(|name| name != self.local_name)
    }
}

/// An `import ... from '<source>'` statement, including side-effect imports.
#[derive(Debug, Clone, Copy)]
pub struct ImportDeclaration<'a> {
    pub node: Node<'a>,
    pub source: StringLiteral<'a>,
}

impl<'a> ImportDeclaration<'a> {
    pub fn source_value<'s>(&self, file: &'s SourceFile) -> &'s str {
        self.source.value(file.text())
    }

    /// Bindings introduced by this declaration, in source order.
    pub fn records(&self, file: &SourceFile) -> Vec<ImportRecord> {
        let source = self.source_value(file).to_string();
        let Some(clause) = child_of_kind(self.node, "import_clause") else {
            return Vec::new();
        };

        let mut records = Vec::new();
        for part in named_children(clause) {
            match part.kind() {
                "identifier" => records.push(ImportRecord {
                    kind: ImportKind::Default,
                    local_name: file.node_text(part).to_string(),
                    imported_name: None,
                    source: source.clone(),
                    range: part.byte_range(),
                    imported_range: None,
                }),
                "namespace_import" => {
                    if let Some(ident) = child_of_kind(part, "identifier") {
                        records.push(ImportRecord {
                            kind: ImportKind::Namespace,
                            local_name: file.node_text(ident).to_string(),
                            imported_name: None,
                            source: source.clone(),
                            range: part.byte_range(),
                            imported_range: None,
                        });
                    }
                }
                "named_imports" => {
                    for spec in named_children(part) {
                        if spec.kind() != "import_specifier" {
                            continue;
                        }
                        if let Some(record) = named_record(file, spec, &source) {
                            records.push(record);
                        }
                    }
                }
                _ => {}
            }
        }
        records
    }
}

fn named_record(file: &SourceFile, spec: Node<'_>, source: &str) -> Option<ImportRecord> {
    let name = spec.child_by_field_name("name")?;
    let (imported, imported_range) = match StringLiteral::from_node(name) {
        Some(lit) => (lit.value(file.text()).to_string(), lit.value_range()),
        None => (file.node_text(name).to_string(), name.byte_range()),
    };
    let local = spec
        .child_by_field_name("alias")
        .map(|alias| file.node_text(alias).to_string())
        .unwrap_or_else(|| imported.clone());

    Some(ImportRecord {
        kind: ImportKind::Named,
        local_name: local,
        imported_name: Some(imported),
        source: source.to_string(),
        range: spec.byte_range(),
        imported_range: Some(imported_range),
    })
}

/// Top-level import declarations in source order.
pub fn import_declarations(file: &SourceFile) -> Vec<ImportDeclaration<'_>> {
    let Some(root) = file.root() else {
        return Vec::new();
    };
    named_children(root)
        .into_iter()
        .filter(|node| node.kind() == "import_statement")
        .filter_map(|node| {
            let source = node
                .child_by_field_name("source")
                .and_then(StringLiteral::from_node)?;
            Some(ImportDeclaration { node, source })
        })
        .collect()
}

/// Bindings imported from `module_path`, across every declaration of it, in
/// source order.
///
/// A local name bound twice (invalid JavaScript, but parseable) is reported
/// once, with its first binding.
pub fn find_imports_by_path(file: &SourceFile, module_path: &str) -> Vec<ImportRecord> {
    let mut records: Vec<ImportRecord> = Vec::new();
    for decl in import_declarations(file) {
        if decl.source_value(file) != module_path {
            continue;
        }
        for record in decl.records(file) {
            if !records.iter().any(|r| r.local_name == record.local_name) {
                records.push(record);
            }
        }
    }
    records
}

/// Every imported binding in the file, keyed by local name.
///
/// A later import of the same local name (invalid JavaScript, but parseable)
/// does not replace the first.
pub fn local_bindings(file: &SourceFile) -> HashMap<String, ImportRecord> {
    let mut bindings = HashMap::new();
    for decl in import_declarations(file) {
        for record in decl.records(file) {
            bindings.entry(record.local_name.clone()).or_insert(record);
        }
    }
    bindings
}

/// A string that names a module: the source of an import or re-export, or
/// the argument of `require()` / dynamic `import()`.
#[derive(Debug, Clone, Copy)]
pub struct ModuleSource<'a> {
    pub statement: Node<'a>,
    pub literal: StringLiteral<'a>,
}

/// All module specifier strings in the file, in source order.
pub fn module_sources(file: &SourceFile) -> Vec<ModuleSource<'_>> {
    let Some(root) = file.root() else {
        return Vec::new();
    };

    let mut sources = Vec::new();
    visit::walk(root, |node| match node.kind() {
        "import_statement" | "export_statement" => {
            if let Some(literal) = node
                .child_by_field_name("source")
                .and_then(StringLiteral::from_node)
            {
                sources.push(ModuleSource {
                    statement: node,
                    literal,
                });
            }
        }
        "call_expression" => {
            let Some(function) = node.child_by_field_name("function") else {
                return;
            };
            let is_loader = match function.kind() {
                "import" => true,
                "identifier" => file.node_text(function) == "require",
                _ => false,
            };
            if !is_loader {
                return;
            }
            let first_arg = node
                .child_by_field_name("arguments")
                .and_then(|args| named_children(args).into_iter().next())
                .and_then(StringLiteral::from_node);
            if let Some(literal) = first_arg {
                sources.push(ModuleSource {
                    statement: node,
                    literal,
                });
            }
        }
        _ => {}
    });
    sources
}
