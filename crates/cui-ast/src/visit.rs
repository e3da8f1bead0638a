//! Tree traversal primitives.

use tree_sitter::Node;

/// Visit `root` and every descendant in document order.
///
/// Uses a cursor rather than recursion so deeply nested JSX cannot exhaust
/// the stack.
pub fn walk<'a, F>(root: Node<'a>, mut f: F)
where
    F: FnMut(Node<'a>),
{
    let mut cursor = root.walk();
    loop {
        f(cursor.node());
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

/// All descendants (including `root`) whose kind is one of `kinds`.
pub fn collect_kinds<'a>(root: Node<'a>, kinds: &[&str]) -> Vec<Node<'a>> {
    let mut out = Vec::new();
    walk(root, |node| {
        if kinds.contains(&node.kind()) {
            out.push(node);
        }
    });
    out
}

/// Nearest strict ancestor of `node` with the given kind.
pub fn ancestor_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut current = node.parent();
    while let Some(parent) = current {
        if parent.kind() == kind {
            return Some(parent);
        }
        current = parent.parent();
    }
    None
}

/// Named children of `node` as a vector.
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// First named child of `node` with the given kind.
pub fn child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    named_children(node).into_iter().find(|c| c.kind() == kind)
}

/// Source text of a node with all whitespace removed, e.g. `Card . Header`
/// becomes `Card.Header`.
pub fn compact_text(node: Node<'_>, source: &str) -> String {
    source[node.byte_range()]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceFile;

    #[test]
    fn test_walk_visits_in_document_order() -> anyhow::Result<()> {
        let file = SourceFile::parse("a.js", "a; b; c;")?;
        let root = file.root().unwrap();
        let names: Vec<_> = collect_kinds(root, &["identifier"])
            .into_iter()
            .map(|n| file.node_text(n).to_string())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
        Ok(())
    }

    #[test]
    fn test_walk_stays_inside_subtree() -> anyhow::Result<()> {
        let file = SourceFile::parse("a.js", "f(a); g(b);")?;
        let root = file.root().unwrap();
        let first_call = collect_kinds(root, &["call_expression"])[0];
        let names: Vec<_> = collect_kinds(first_call, &["identifier"])
            .into_iter()
            .map(|n| file.node_text(n).to_string())
            .collect();
        assert_eq!(names, ["f", "a"]);
        Ok(())
    }

    #[test]
    fn test_ancestor_of_kind() -> anyhow::Result<()> {
        let file = SourceFile::parse("a.js", "const x = f(y);")?;
        let root = file.root().unwrap();
        let call = collect_kinds(root, &["call_expression"])[0];
        let decl = ancestor_of_kind(call, "variable_declarator").unwrap();
        assert_eq!(file.node_text(decl), "x = f(y)");
        assert!(ancestor_of_kind(root, "program").is_none());
        Ok(())
    }
}
