use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

use crate::edit::{EditError, SourceEdit, apply_edits};
use crate::language::Dialect;
use crate::visit;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFile(PathBuf),

    #[error("Failed to load grammar for {dialect:?}: {message}")]
    Grammar { dialect: Dialect, message: String },

    #[error("Parser gave up on {0}")]
    Aborted(PathBuf),

    #[error("Syntax error in {path} at {position}: unexpected `{snippet}`")]
    Syntax {
        path: PathBuf,
        position: Position,
        snippet: String,
    },
}

/// A 1-based line/column location. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets to line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset where the given 1-based line starts.
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line.checked_sub(1)?).copied()
    }

    pub fn position(&self, text: &str, offset: usize) -> Position {
        let offset = offset.min(text.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let start = self.line_starts[line];
        let column = text
            .get(start..offset)
            .map(|s| s.chars().count())
            .unwrap_or(offset - start);
        Position {
            line: line + 1,
            column: column + 1,
        }
    }
}

/// A parsed source file: the original text plus its syntax tree.
///
/// The tree is never modified. Rewrites produce a new text through
/// [`SourceFile::apply`], which callers re-parse if they need a tree again.
pub struct SourceFile {
    path: PathBuf,
    text: String,
    dialect: Dialect,
    tree: Option<Tree>,
    lines: LineIndex,
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("path", &self.path)
            .field("dialect", &self.dialect)
            .field("len", &self.text.len())
            .finish()
    }
}

impl SourceFile {
    /// Parse `text`, picking the grammar from the extension of `path`.
    pub fn parse(path: impl Into<PathBuf>, text: impl Into<String>) -> Result<Self, ParseError> {
        let path = path.into();
        let dialect =
            Dialect::from_path(&path).ok_or_else(|| ParseError::UnsupportedFile(path.clone()))?;
        Self::parse_as(path, text, dialect)
    }

    pub fn parse_as(
        path: impl Into<PathBuf>,
        text: impl Into<String>,
        dialect: Dialect,
    ) -> Result<Self, ParseError> {
        let path = path.into();
        let text = text.into();
        let lines = LineIndex::new(&text);

        let Some(grammar) = dialect.grammar() else {
            return Ok(Self {
                path,
                text,
                dialect,
                tree: None,
                lines,
            });
        };

        let mut parser = Parser::new();
        parser
            .set_language(&grammar)
            .map_err(|e| ParseError::Grammar {
                dialect,
                message: e.to_string(),
            })?;
        let tree = parser
            .parse(&text, None)
            .ok_or_else(|| ParseError::Aborted(path.clone()))?;

        let root = tree.root_node();
        if root.has_error() {
            let bad = first_error(root).unwrap_or(root);
            let position = lines.position(&text, bad.start_byte());
            let snippet: String = text[bad.byte_range()]
                .lines()
                .next()
                .unwrap_or_default()
                .chars()
                .take(40)
                .collect();
            debug!("{}: syntax error at {position}", path.display());
            return Err(ParseError::Syntax {
                path,
                position,
                snippet,
            });
        }

        Ok(Self {
            path,
            text,
            dialect,
            tree: Some(tree),
            lines,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    /// Root node of the tree, `None` for files without one (stylesheets).
    pub fn root(&self) -> Option<Node<'_>> {
        self.tree.as_ref().map(Tree::root_node)
    }

    pub fn node_text(&self, node: Node<'_>) -> &str {
        &self.text[node.byte_range()]
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    pub fn position(&self, offset: usize) -> Position {
        self.lines.position(&self.text, offset)
    }

    pub fn span(&self, range: &Range<usize>) -> (Position, Position) {
        (self.position(range.start), self.position(range.end))
    }

    /// Apply edits to the original text. Returns `None` when nothing changes.
    pub fn apply(&self, edits: Vec<SourceEdit>) -> Result<Option<String>, EditError> {
        if edits.is_empty() {
            return Ok(None);
        }
        let updated = apply_edits(&self.text, edits)?;
        Ok((updated != self.text).then_some(updated))
    }
}

fn first_error(root: Node<'_>) -> Option<Node<'_>> {
    let mut found = None;
    visit::walk(root, |node| {
        if found.is_none() && (node.is_error() || node.is_missing()) {
            found = Some(node);
        }
    });
    found
}
