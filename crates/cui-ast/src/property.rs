use tree_sitter::Node;

use crate::source::SourceFile;
use crate::visit;

/// Shape of a member-expression chain such as `theme.grid.tera`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyPattern {
    /// The object at the start of the chain: an identifier or `this`.
    Root(String),
    Member {
        object: Box<PropertyPattern>,
        property: String,
    },
}

impl PropertyPattern {
    /// Build the pattern for a dotted path. Returns `None` for an empty path
    /// or one with empty segments.
    pub fn parse(path: &str) -> Option<Self> {
        let mut segments = path.split('.');
        let root = segments.next().filter(|s| !s.is_empty())?;
        segments.try_fold(PropertyPattern::Root(root.to_string()), |object, property| {
            (!property.is_empty()).then(|| PropertyPattern::Member {
                object: Box::new(object),
                property: property.to_string(),
            })
        })
    }

    pub fn matches(&self, node: Node<'_>, source: &str) -> bool {
        match self {
            PropertyPattern::Root(name) => {
                matches!(node.kind(), "identifier" | "this") && &source[node.byte_range()] == name
            }
            PropertyPattern::Member { object, property } => {
                if node.kind() != "member_expression" {
                    return false;
                }
                let property_matches = node
                    .child_by_field_name("property")
                    .is_some_and(|p| &source[p.byte_range()] == property);
                property_matches
                    && node
                        .child_by_field_name("object")
                        .is_some_and(|o| object.matches(o, source))
            }
        }
    }
}

/// Member expressions with exactly the shape of `path`.
///
/// `theme.grid.tera` matches `theme.grid.tera`, `theme?.grid.tera` and the
/// inner part of `theme.grid.tera.maxWidth`, but not `props.theme.grid.tera`.
pub fn find_property<'a>(file: &'a SourceFile, path: &str) -> Vec<Node<'a>> {
    let (Some(root), Some(pattern)) = (file.root(), PropertyPattern::parse(path)) else {
        return Vec::new();
    };
    let mut found = Vec::new();
    visit::walk(root, |node| {
        if pattern.matches(node, file.text()) {
            found.push(node);
        }
    });
    found
}
