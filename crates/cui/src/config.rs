//! `cui.toml` project configuration.
//!
//! The file is looked up from the directory being processed towards the
//! filesystem root; the first one found wins. Relative paths inside it are
//! resolved against the directory that contains it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cui_rules::{Preset, RuleSetting};
use log::debug;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "cui.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub lint: LintConfig,
    pub tokens: TokensConfig,
    pub files: FilesConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    pub preset: Option<Preset>,
    pub rules: BTreeMap<String, RuleSetting>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TokensConfig {
    /// JSON file with the valid custom property names.
    pub schema: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    /// Glob patterns, relative to the processed directory, that files must
    /// match to be processed.
    pub include: Vec<String>,
}

/// A parsed config together with where it came from.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Resolve a path from the config file against the file's directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match self.path.as_deref().and_then(Path::parent) {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Walk up from `start` looking for `cui.toml`.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    let start = if start.is_file() {
        start.parent()?
    } else {
        start
    };
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

pub fn parse(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

/// Load the config that applies to `start`, or the defaults when there is none.
pub fn load(start: &Path) -> Result<LoadedConfig> {
    let start = start
        .canonicalize()
        .with_context(|| format!("Path not found: {}", start.display()))?;
    let Some(path) = find_config(&start) else {
        debug!("No {CONFIG_FILE} found above {}", start.display());
        return Ok(LoadedConfig::default());
    };

    debug!("Using config {}", path.display());
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = parse(&content).with_context(|| format!("Invalid config {}", path.display()))?;
    Ok(LoadedConfig {
        config,
        path: Some(path),
    })
}
