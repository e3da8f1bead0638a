use anyhow::{Context, Result};
use clap::ValueEnum;
use cui_ast::Language;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use log::debug;
use std::path::{Path, PathBuf};

use crate::config;

/// `--language` values.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageArg {
    Javascript,
    Typescript,
    Css,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Javascript => Language::JavaScript,
            LanguageArg::Typescript => Language::TypeScript,
            LanguageArg::Css => Language::Css,
        }
    }
}

/// Directories that hold installed or generated code, never sources.
const SKIPPED_DIRS: &[&str] = &["node_modules", "dist", "build", "vendor", "coverage"];

/// Compile include patterns. An empty list matches everything.
pub fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).with_context(|| format!("Invalid glob `{pattern}`"))?;
        builder.add(glob);
    }
    Ok(Some(builder.build()?))
}

fn has_language(path: &Path, languages: &[Language]) -> bool {
    Language::of_path(path).is_some_and(|language| languages.contains(&language))
}

/// Walk `paths` and collect source files of the given languages.
///
/// Features:
/// - Always recursive traversal
/// - Always respects git ignore patterns
/// - Skips hidden entries and dependency/build output directories
/// - Applies `include` globs to paths relative to the walked root
/// - Files passed explicitly are kept if their language matches
/// - Returns deterministically sorted, deduplicated paths
pub fn collect_source_files(
    paths: &[PathBuf],
    languages: &[Language],
    include: Option<&GlobSet>,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in paths {
        if root.is_file() {
            if has_language(root, languages) {
                files.push(root.clone());
            } else {
                debug!("Skipping {}: unsupported language", root.display());
            }
            continue;
        }
        if !root.is_dir() {
            anyhow::bail!("Path not found: {}", root.display());
        }

        let mut builder = WalkBuilder::new(root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_exclude(true)
            .git_global(true)
            .filter_entry(|entry| {
                if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    if let Some(name) = entry.file_name().to_str() {
                        if SKIPPED_DIRS.contains(&name) {
                            return false;
                        }
                    }
                }
                true
            });

        for result in builder.build() {
            let entry = result?;
            let path = entry.path();
            if !entry.file_type().is_some_and(|ft| ft.is_file()) || !has_language(path, languages) {
                continue;
            }
            if let Some(include) = include {
                let relative = path.strip_prefix(root).unwrap_or(path);
                if !include.is_match(relative) {
                    continue;
                }
            }
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files.dedup();
    debug!("Collected {} source files", files.len());
    Ok(files)
}

/// Collect source files under each of `paths` with the include globs that
/// apply to it.
///
/// `include` from the command line applies to every root. Without it each
/// root uses `files.include` from its own cui.toml, so no config is read
/// when globs are given explicitly.
pub fn collect_project_files(
    paths: &[PathBuf],
    languages: &[Language],
    include: &[String],
) -> Result<Vec<PathBuf>> {
    let explicit = build_globset(include)?;
    let mut files = Vec::new();
    for root in paths {
        let globs = if include.is_empty() {
            let loaded = config::load(root)?;
            build_globset(&loaded.config.files.include)?
        } else {
            explicit.clone()
        };
        files.extend(collect_source_files(
            std::slice::from_ref(root),
            languages,
            globs.as_ref(),
        )?);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn relative(root: &Path, files: Vec<PathBuf>) -> Vec<String> {
        files
            .into_iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_filters_languages_and_skipped_dirs() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let root = dir.path();
        for rel in [
            "src/App.jsx",
            "src/Card.tsx",
            "src/theme.css",
            "src/README.md",
            "node_modules/pkg/index.js",
            "dist/bundle.js",
            ".storybook/main.js",
            "lib/utils.mjs",
        ] {
            touch(root, rel);
        }

        let scripts = collect_source_files(
            &[root.to_path_buf()],
            &[Language::JavaScript, Language::TypeScript],
            None,
        )?;
        assert_eq!(
            relative(root, scripts),
            ["lib/utils.mjs", "src/App.jsx", "src/Card.tsx"]
        );

        let css = collect_source_files(&[root.to_path_buf()], &[Language::Css], None)?;
        assert_eq!(relative(root, css), ["src/theme.css"]);
        Ok(())
    }

    #[test]
    fn test_include_globs() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let root = dir.path();
        touch(root, "src/components/Button.jsx");
        touch(root, "scripts/build.js");

        let include = build_globset(&["src/**".to_string()])?;
        let files =
            collect_source_files(&[root.to_path_buf()], &[Language::JavaScript], include.as_ref())?;
        assert_eq!(relative(root, files), ["src/components/Button.jsx"]);
        Ok(())
    }

    #[test]
    fn test_include_globs_per_root() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let root = dir.path();
        fs::create_dir_all(root.join("a"))?;
        fs::write(root.join("a/cui.toml"), "[files]\ninclude = [\"src/**\"]\n")?;
        touch(root, "a/src/Button.jsx");
        touch(root, "a/stories/Button.stories.jsx");
        touch(root, "b/stories/Card.stories.jsx");

        let paths = [root.join("a"), root.join("b")];
        let files = collect_project_files(&paths, &[Language::JavaScript], &[])?;
        assert_eq!(
            relative(root, files),
            ["a/src/Button.jsx", "b/stories/Card.stories.jsx"]
        );

        let files =
            collect_project_files(&paths, &[Language::JavaScript], &["stories/**".to_string()])?;
        assert_eq!(
            relative(root, files),
            ["a/stories/Button.stories.jsx", "b/stories/Card.stories.jsx"]
        );
        Ok(())
    }

    #[test]
    fn test_explicit_globs_skip_config() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let root = dir.path();
        fs::write(root.join("cui.toml"), "[files\n")?;
        touch(root, "src/Button.jsx");

        let paths = [root.to_path_buf()];
        assert!(collect_project_files(&paths, &[Language::JavaScript], &[]).is_err());
        let files =
            collect_project_files(&paths, &[Language::JavaScript], &["src/**".to_string()])?;
        assert_eq!(relative(root, files), ["src/Button.jsx"]);
        Ok(())
    }

    #[test]
    fn test_explicit_files_and_missing_paths() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let root = dir.path();
        touch(root, "a.ts");
        let files = collect_source_files(
            &[root.join("a.ts"), root.join("a.ts")],
            &[Language::TypeScript],
            None,
        )?;
        assert_eq!(files.len(), 1);

        assert!(collect_source_files(&[root.join("nope")], &[Language::TypeScript], None).is_err());
        assert!(build_globset(&["src/[".to_string()]).is_err());
        Ok(())
    }
}
