use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use cui_ast::{Language, SourceFile};
use cui_rules::{
    Diagnostic, Preset, RuleContext, SelectedRule, Severity, TokenSchema, apply_fixes,
    get_lint_rule, select_lint_rules,
};
use cui_ui::prelude::*;
use log::debug;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config;
use crate::file_walker::{self, LanguageArg};
use crate::pipeline::{self, TaskOutcome};
use crate::report;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

/// Arguments for the `lint` command
#[derive(Args, Debug, Clone)]
#[command(about = "Check source files for outdated Circuit UI usage")]
pub struct LintArgs {
    /// Directories or files to lint. Defaults to the current directory.
    /// Rule settings come from the cui.toml that applies to the first path.
    #[arg(short, long = "path", value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Languages to process
    #[arg(
        short,
        long = "language",
        value_enum,
        default_values = ["javascript", "typescript", "css"]
    )]
    pub languages: Vec<LanguageArg>,

    /// Only process files matching these globs, relative to the path.
    /// Defaults to `files.include` of the cui.toml that applies to each path.
    #[arg(long, value_name = "GLOB")]
    pub include: Vec<String>,

    /// Rule set to run. Overrides `lint.preset` in cui.toml.
    #[arg(long, value_name = "PRESET")]
    pub preset: Option<Preset>,

    /// Run only these rules (see `cui list`)
    #[arg(short, long = "rule", value_name = "NAME")]
    pub rules: Vec<String>,

    /// Apply the fixes of fixable rules
    #[arg(long)]
    pub fix: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// JSON file with the valid custom property names
    #[arg(long, value_name = "FILE")]
    pub tokens: Option<PathBuf>,

    /// Number of files processed in parallel. Defaults to the number of CPUs.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

/// Lint result of one file.
#[derive(Debug)]
struct FileLint {
    /// The text the diagnostics refer to.
    source: String,
    diagnostics: Vec<Diagnostic>,
    fixed: bool,
}

/// Apply the fixes of every fixable rule, one rule at a time.
///
/// Rules run against the output of the previous one, so fixes of different
/// rules touching the same code do not conflict.
fn fix_file(file: SourceFile, rules: &[SelectedRule], ctx: &RuleContext<'_>) -> Result<SourceFile> {
    let mut current = file;
    for selected in rules.iter().filter(|r| r.entry.fixable) {
        let rule = &selected.entry.rule;
        if !rule.applies_to(&current) {
            continue;
        }
        let findings = rule
            .check(ctx, &current)
            .with_context(|| format!("{} failed", selected.entry.name))?;
        if let Some(updated) = apply_fixes(&current, &findings)
            .with_context(|| format!("{} produced an invalid fix", selected.entry.name))?
        {
            debug!("{}: applied {}", current.path().display(), selected.entry.name);
            current = SourceFile::parse_as(current.path().to_path_buf(), updated, current.dialect())?;
        }
    }
    Ok(current)
}

fn lint_file(
    rules: &[SelectedRule],
    ctx: &RuleContext<'_>,
    path: &Path,
    display: &str,
    fix: bool,
) -> Result<FileLint> {
    let original = pipeline::read_source(path)?;
    let original_text = original.text().to_string();
    let file = if fix {
        fix_file(original, rules, ctx)?
    } else {
        original
    };

    let fixed = file.text() != original_text;
    if fixed {
        pipeline::write_atomic(path, file.text())?;
    }

    let mut diagnostics = Vec::new();
    for selected in rules {
        if !selected.entry.rule.applies_to(&file) {
            continue;
        }
        let findings = selected
            .entry
            .rule
            .check(ctx, &file)
            .with_context(|| format!("{} failed", selected.entry.name))?;
        diagnostics.extend(findings.iter().map(|finding| {
            Diagnostic::from_finding(selected.entry.name, selected.severity, &file, display, finding)
        }));
    }
    diagnostics.sort_by(|a, b| {
        (a.range.start, a.range.end, &a.rule_name).cmp(&(b.range.start, b.range.end, &b.rule_name))
    });

    Ok(FileLint {
        source: file.text().to_string(),
        diagnostics,
        fixed,
    })
}

/// Execute the `lint` command
pub fn execute(args: LintArgs) -> Result<()> {
    // Unknown names fail before any file is touched.
    for name in &args.rules {
        get_lint_rule(name)?;
    }

    let paths = if args.paths.is_empty() {
        vec![std::env::current_dir()?]
    } else {
        args.paths.clone()
    };
    let base = std::env::current_dir()?;
    // Rule and token settings are shared by all paths.
    let loaded = config::load(&paths[0])?;

    let preset = args.preset.or(loaded.config.lint.preset).unwrap_or_default();
    let rules = select_lint_rules(preset, &args.rules, &loaded.config.lint.rules)
        .with_context(|| match &loaded.path {
            Some(path) => format!("Invalid lint configuration in {}", path.display()),
            None => "Invalid lint configuration".to_string(),
        })?;
    if rules.is_empty() {
        eprintln!("{} All lint rules are disabled", cui_ui::icons::warning());
        return Ok(());
    }

    let schema_path = match &args.tokens {
        Some(path) => Some(path.clone()),
        None => loaded.config.tokens.schema.as_deref().map(|p| loaded.resolve(p)),
    };
    let custom_schema = schema_path
        .map(|path| TokenSchema::from_path(&path))
        .transpose()?;
    let ctx = RuleContext {
        tokens: custom_schema.as_ref().unwrap_or(TokenSchema::builtin()),
    };

    let languages: Vec<Language> = args.languages.iter().copied().map(Language::from).collect();
    let files = file_walker::collect_project_files(&paths, &languages, &args.include)?;
    if files.is_empty() {
        eprintln!("{} No matching source files found", cui_ui::icons::warning());
        return Ok(());
    }

    pipeline::install_interrupt_handler();
    let pool = pipeline::build_pool(args.jobs)?;
    let spinner = Spinner::builder(format!("Linting {} files", files.len()))
        .hidden(args.format == OutputFormat::Json)
        .start();
    let results = pipeline::run_files(&pool, &files, |path| {
        lint_file(&rules, &ctx, path, &pipeline::display_path(path, &base), args.fix)
    });
    spinner.finish();

    let mut all = Vec::new();
    let mut failed = 0;
    let mut cancelled = 0;
    let mut fixed = 0;
    let color = colored::control::SHOULD_COLORIZE.should_colorize();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for result in results {
        let display = pipeline::display_path(&result.path, &base);
        match result.outcome {
            TaskOutcome::Done(lint) => {
                if lint.fixed {
                    fixed += 1;
                }
                if args.format == OutputFormat::Human {
                    report::render_file(&mut out, &display, &lint.source, &lint.diagnostics, color)?;
                }
                all.extend(lint.diagnostics);
            }
            TaskOutcome::Failed(message) => {
                failed += 1;
                eprintln!(
                    "{} {}: {}",
                    cui_ui::icons::error(),
                    display.with_style(Style::Red).bold(),
                    message
                );
            }
            TaskOutcome::Cancelled => cancelled += 1,
        }
    }

    if args.format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut out, &all)?;
        writeln!(out)?;
    }
    out.flush()?;

    let errors = all.iter().filter(|d| d.severity == Severity::Error).count();
    let warnings = all.len() - errors;
    if args.format == OutputFormat::Human {
        let summary = format!(
            "{} problems ({errors} errors, {warnings} warnings)",
            all.len()
        );
        if all.is_empty() {
            eprintln!("{} No problems found", cui_ui::icons::success());
        } else if errors > 0 {
            eprintln!("\n{} {}", cui_ui::icons::error(), summary.with_style(Style::Red).bold());
        } else {
            eprintln!("\n{} {}", cui_ui::icons::warning(), summary.with_style(Style::Yellow).bold());
        }
        let fixable = all.iter().filter(|d| d.fixable).count();
        if fixable > 0 && !args.fix {
            eprintln!("  {fixable} of them can be fixed with `cui lint --fix`");
        }
    }
    if fixed > 0 {
        eprintln!("Fixed {fixed} files");
    }

    if cancelled > 0 {
        anyhow::bail!("Interrupted, {cancelled} files were not linted");
    }
    if failed > 0 {
        anyhow::bail!("Failed to lint {failed} files");
    }
    if errors > 0 {
        anyhow::bail!("Lint found {errors} errors");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn strict() -> Vec<SelectedRule> {
        select_lint_rules(Preset::Strict, &[], &BTreeMap::new()).unwrap()
    }

    #[test]
    fn test_lint_file_reports_without_writing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("App.jsx");
        let source = "import { Sidebar } from '@sumup/circuit-ui';\n";
        std::fs::write(&path, source)?;

        let lint = lint_file(&strict(), &RuleContext::default(), &path, "App.jsx", false)?;
        assert!(!lint.fixed);
        let rules: Vec<_> = lint.diagnostics.iter().map(|d| d.rule_name.as_str()).collect();
        assert_eq!(
            rules,
            ["component-lifecycle-imports", "no-deprecated-components", "renamed-package-scope"]
        );
        assert_eq!(std::fs::read_to_string(&path)?, source);
        Ok(())
    }

    #[test]
    fn test_fixes_of_different_rules_compose() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("App.jsx");
        std::fs::write(&path, "import { Sidebar } from '@sumup/circuit-ui';\n")?;

        let lint = lint_file(&strict(), &RuleContext::default(), &path, "App.jsx", true)?;
        assert!(lint.fixed);
        assert_eq!(
            std::fs::read_to_string(&path)?,
            "import { Sidebar } from '@sumup-oss/circuit-ui/legacy';\n"
        );
        // Only the report-only deprecation is left.
        let rules: Vec<_> = lint.diagnostics.iter().map(|d| d.rule_name.as_str()).collect();
        assert_eq!(rules, ["no-deprecated-components"]);
        Ok(())
    }
}
