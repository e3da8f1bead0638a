//! Rule implementations. Each rule is configured with static data tables
//! and registered under one or more names in [`crate::registry`].

mod custom_properties;
mod deprecated_components;
mod deprecated_props;
mod lifecycle_imports;
mod package_scope;
mod prop_renames;
mod renamed_components;
mod theme_properties;

pub use custom_properties::InvalidCustomProperties;
pub use deprecated_components::{DeprecatedComponent, DeprecatedComponents};
pub use deprecated_props::{DeprecatedProps, DeprecatedPropsEntry};
pub use lifecycle_imports::{ComponentLifecycle, LifecycleImports};
pub use package_scope::RenamedPackageScope;
pub use prop_renames::PropRename;
pub use renamed_components::RenamedComponents;
pub use theme_properties::ThemeProperties;

use cui_ast::{CIRCUIT_UI_PACKAGES, Node};

/// Whether `source` is one of the Circuit UI entry modules (not a subpath).
pub(crate) fn is_circuit_ui(source: &str) -> bool {
    CIRCUIT_UI_PACKAGES.contains(&source)
}

/// Whether `source` is a Circuit UI entry module or one of its subpaths
/// (`@sumup-oss/circuit-ui/legacy`).
pub(crate) fn is_circuit_ui_module(source: &str) -> bool {
    CIRCUIT_UI_PACKAGES.iter().any(|package| {
        source
            .strip_prefix(package)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// The leftmost identifier of a JSX tag name: `Card` in `Card.Header.Title`.
pub(crate) fn base_identifier(mut node: Node<'_>) -> Option<Node<'_>> {
    loop {
        match node.kind() {
            "identifier" => return Some(node),
            "member_expression" => node = node.child_by_field_name("object")?,
            "nested_identifier" => node = node.named_child(0)?,
            _ => return None,
        }
    }
}
