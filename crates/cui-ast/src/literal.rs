use std::ops::Range;

use tree_sitter::Node;

/// A string literal, whatever shape the grammar gave it.
///
/// Module paths and other constant strings appear either as quoted strings
/// (`'x'`, `"x"`) or as template strings without substitutions (`` `x` ``).
/// Queries go through this type so they only deal with one accessor.
#[derive(Debug, Clone, Copy)]
pub enum StringLiteral<'a> {
    Quoted(Node<'a>),
    Template(Node<'a>),
}

impl<'a> StringLiteral<'a> {
    pub fn from_node(node: Node<'a>) -> Option<Self> {
        match node.kind() {
            "string" => Some(StringLiteral::Quoted(node)),
            "template_string" => {
                let mut cursor = node.walk();
                let has_substitution = node
                    .named_children(&mut cursor)
                    .any(|c| c.kind() == "template_substitution");
                (!has_substitution).then_some(StringLiteral::Template(node))
            }
            _ => None,
        }
    }

    pub fn node(&self) -> Node<'a> {
        match self {
            StringLiteral::Quoted(node) | StringLiteral::Template(node) => *node,
        }
    }

    /// Byte range of the contents, without delimiters.
    pub fn value_range(&self) -> Range<usize> {
        let range = self.node().byte_range();
        if range.len() < 2 {
            return range.end..range.end;
        }
        range.start + 1..range.end - 1
    }

    /// Contents without delimiters. Escapes are left as written.
    pub fn value<'s>(&self, source: &'s str) -> &'s str {
        &source[self.value_range()]
    }

    /// The delimiter character used in the source.
    pub fn quote(&self, source: &str) -> char {
        source[self.node().byte_range()].chars().next().unwrap_or('\'')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceFile;
    use crate::visit::collect_kinds;

    fn literals(file: &SourceFile) -> Vec<StringLiteral<'_>> {
        collect_kinds(file.root().unwrap(), &["string", "template_string"])
            .into_iter()
            .filter_map(StringLiteral::from_node)
            .collect()
    }

    #[test]
    fn test_quoted_and_template_normalize() -> anyhow::Result<()> {
        let file = SourceFile::parse("a.js", "a('@sumup/icons'); b(\"x\"); c(`y`); d(`${z}`);")?;
        let lits = literals(&file);
        let values: Vec<_> = lits.iter().map(|l| l.value(file.text())).collect();
        assert_eq!(values, ["@sumup/icons", "x", "y"]);
        assert_eq!(lits[0].quote(file.text()), '\'');
        assert_eq!(lits[1].quote(file.text()), '"');
        assert!(matches!(lits[2], StringLiteral::Template(_)));
        Ok(())
    }

    #[test]
    fn test_empty_string_value() -> anyhow::Result<()> {
        let file = SourceFile::parse("a.js", "a('');")?;
        let lits = literals(&file);
        assert_eq!(lits[0].value(file.text()), "");
        Ok(())
    }
}
