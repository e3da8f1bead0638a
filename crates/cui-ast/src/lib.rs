//! Syntax tree queries over JavaScript, TypeScript and JSX sources.
//!
//! Sources are parsed with tree-sitter into a [`SourceFile`]. Queries are
//! read-only; rewrites are expressed as [`SourceEdit`]s that are spliced into
//! the original text, so everything outside an edited range keeps its exact
//! formatting.

mod edit;
mod imports;
mod jsx;
mod language;
mod literal;
mod property;
mod source;
mod styled;
pub mod visit;

pub use edit::{EditError, SourceEdit, apply_edits};
pub use imports::{
    ImportDeclaration, ImportKind, ImportRecord, ModuleSource, find_imports_by_path,
    import_declarations, local_bindings, module_sources,
};
pub use jsx::{
    JsxAttribute, JsxElement, find_jsx_elements, jsx_attributes, jsx_elements,
    rename_jsx_attribute,
};
pub use language::{Dialect, Language};
pub use literal::StringLiteral;
pub use property::{PropertyPattern, find_property};
pub use source::{LineIndex, ParseError, Position, SourceFile};
pub use styled::{CIRCUIT_UI_PACKAGES, find_local_names, find_styled_component_names};

/// Re-exported so downstream crates can name tree nodes without depending on
/// tree-sitter directly.
pub use tree_sitter::Node;
