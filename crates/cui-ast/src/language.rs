use std::path::Path;

/// Source language families a user can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    JavaScript,
    TypeScript,
    Css,
}

impl Language {
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Language::TypeScript => &["ts", "tsx", "mts", "cts"],
            Language::Css => &["css"],
        }
    }

    pub fn of_path(path: &Path) -> Option<Language> {
        Dialect::from_path(path).map(Dialect::language)
    }
}

/// Concrete grammar used to parse a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// JavaScript with JSX.
    Jsx,
    TypeScript,
    Tsx,
    /// Plain stylesheets have no syntax tree; only text rules apply.
    Css,
}

impl Dialect {
    pub fn from_path(path: &Path) -> Option<Dialect> {
        match path.extension()?.to_str()? {
            "js" | "jsx" | "mjs" | "cjs" => Some(Dialect::Jsx),
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            "css" => Some(Dialect::Css),
            _ => None,
        }
    }

    pub fn language(self) -> Language {
        match self {
            Dialect::Jsx => Language::JavaScript,
            Dialect::TypeScript | Dialect::Tsx => Language::TypeScript,
            Dialect::Css => Language::Css,
        }
    }

    pub(crate) fn grammar(self) -> Option<tree_sitter::Language> {
        match self {
            Dialect::Jsx => Some(tree_sitter_javascript::LANGUAGE.into()),
            Dialect::TypeScript => Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()),
            Dialect::Tsx => Some(tree_sitter_typescript::LANGUAGE_TSX.into()),
            Dialect::Css => None,
        }
    }
}
