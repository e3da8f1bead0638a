use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use serde::Deserialize;
use thiserror::Error;

/// Prefix every Circuit UI custom property starts with.
pub const CUSTOM_PROPERTY_PREFIX: &str = "--cui-";

const BUILTIN_SCHEMA: &str = include_str!("../data/custom-properties.json");

static BUILTIN: Lazy<TokenSchema> = Lazy::new(|| {
    TokenSchema::from_json(BUILTIN_SCHEMA).expect("embedded custom property schema is valid")
});

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Failed to read token schema {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid token schema: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid custom property name `{0}`")]
    InvalidName(String),

    #[error("Failed to compile custom property matcher: {0}")]
    Pattern(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SchemaEntry {
    Name(String),
    Token { name: String },
}

/// The set of valid design-token names, without the `--cui-` prefix.
pub struct TokenSchema {
    names: BTreeSet<String>,
    invalid: regress::Regex,
}

impl fmt::Debug for TokenSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSchema")
            .field("names", &self.names.len())
            .finish()
    }
}

impl TokenSchema {
    /// Custom properties published by `@sumup-oss/design-tokens`.
    pub fn builtin() -> &'static TokenSchema {
        &BUILTIN
    }

    pub fn new<I, S>(names: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            let name: String = name.into();
            let name = name
                .strip_prefix(CUSTOM_PROPERTY_PREFIX)
                .map(str::to_string)
                .unwrap_or(name);
            let well_formed = !name.is_empty()
                && name
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !well_formed {
                return Err(SchemaError::InvalidName(name));
            }
            set.insert(name);
        }

        let invalid = regress::Regex::new(&invalid_pattern(&set))
            .map_err(|e| SchemaError::Pattern(e.to_string()))?;
        Ok(Self {
            names: set,
            invalid,
        })
    }

    /// Parse a JSON array of names, or of objects with a `name` field.
    /// Names may be given with or without the `--cui-` prefix.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let entries: Vec<SchemaEntry> = serde_json::from_str(json)?;
        Self::new(entries.into_iter().map(|entry| match entry {
            SchemaEntry::Name(name) | SchemaEntry::Token { name } => name,
        }))
    }

    pub fn from_path(path: &Path) -> Result<Self, SchemaError> {
        let json = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Byte ranges of `--cui-*` tokens in `line` that are not valid names.
    pub fn invalid_tokens(&self, line: &str) -> Vec<Range<usize>> {
        self.invalid.find_iter(line).map(|m| m.range()).collect()
    }
}

/// `--cui-` followed by anything that is not exactly one of the valid names.
///
/// A valid name only counts when it is not extended by further name
/// characters, so `--cui-bg-normalxyz` does not pass as `--cui-bg-normal`.
fn invalid_pattern(names: &BTreeSet<String>) -> String {
    if names.is_empty() {
        return format!("{CUSTOM_PROPERTY_PREFIX}[\\w-]+");
    }
    // Longest first keeps the alternation cheap on shared prefixes.
    let mut sorted: Vec<&str> = names.iter().map(String::as_str).collect();
    sorted.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    format!(
        "{CUSTOM_PROPERTY_PREFIX}(?!(?:{})(?![\\w-]))[\\w-]+",
        sorted.join("|")
    )
}
