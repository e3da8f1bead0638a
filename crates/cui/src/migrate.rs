use anyhow::{Context, Result};
use clap::Args;
use cui_ast::Language;
use cui_rules::{RuleContext, Transform, apply_fixes, get_transform};
use cui_ui::prelude::*;
use log::{debug, warn};
use std::path::{Path, PathBuf};

use crate::file_walker::{self, LanguageArg};
use crate::pipeline::{self, FileResult, TaskOutcome};

/// Arguments for the `migrate` command
#[derive(Args, Debug, Clone)]
#[command(about = "Rewrite source files with a codemod")]
pub struct MigrateArgs {
    /// Name of the codemod to run (see `cui list`)
    #[arg(short, long, value_name = "NAME")]
    pub transform: String,

    /// Directories or files to migrate. Defaults to the current directory.
    #[arg(short, long = "path", value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Languages to process
    #[arg(short, long = "language", value_enum, default_values = ["javascript", "typescript"])]
    pub languages: Vec<LanguageArg>,

    /// Only process files matching these globs, relative to the path.
    /// Defaults to `files.include` of the cui.toml that applies to each path.
    #[arg(long, value_name = "GLOB")]
    pub include: Vec<String>,

    /// Report what would change without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Print a unified diff for every changed file
    #[arg(long)]
    pub diff: bool,

    /// Number of files processed in parallel. Defaults to the number of CPUs.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,
}

/// What happened to one file.
#[derive(Debug)]
pub enum FileOutcome {
    Changed { diff: Option<String> },
    Unchanged,
    Errored(String),
}

/// Run `transform` over one file, writing the result unless `dry_run`.
fn migrate_file(
    transform: &Transform,
    path: &Path,
    base: &Path,
    dry_run: bool,
    show_diff: bool,
) -> Result<FileOutcome> {
    let file = pipeline::read_source(path)?;
    if !transform.rule.applies_to(&file) {
        return Ok(FileOutcome::Unchanged);
    }

    let findings = transform
        .rule
        .check(&RuleContext::default(), &file)
        .with_context(|| format!("{} failed", transform.name))?;
    let Some(updated) = apply_fixes(&file, &findings)
        .with_context(|| format!("{} produced an invalid rewrite", transform.name))?
    else {
        return Ok(FileOutcome::Unchanged);
    };

    let diff = show_diff.then(|| {
        pipeline::unified_diff(&pipeline::display_path(path, base), file.text(), &updated)
    });
    if !dry_run {
        pipeline::write_atomic(path, &updated)?;
    }
    debug!("{}: {} edits", path.display(), findings.len());
    Ok(FileOutcome::Changed { diff })
}

fn outcome_of(result: TaskOutcome<FileOutcome>) -> Option<FileOutcome> {
    match result {
        TaskOutcome::Done(outcome) => Some(outcome),
        TaskOutcome::Failed(message) => Some(FileOutcome::Errored(message)),
        TaskOutcome::Cancelled => None,
    }
}

/// Execute the `migrate` command
pub fn execute(args: MigrateArgs) -> Result<()> {
    // Unknown names fail before any file is touched.
    let transform = get_transform(&args.transform)?;

    let paths = if args.paths.is_empty() {
        vec![std::env::current_dir()?]
    } else {
        args.paths.clone()
    };
    let base = std::env::current_dir()?;

    let supported = transform.rule.languages();
    let mut languages: Vec<Language> = Vec::new();
    for language in args.languages.iter().copied().map(Language::from) {
        if !supported.contains(&language) {
            warn!("{} does not apply to {language:?} files", transform.name);
            continue;
        }
        if !languages.contains(&language) {
            languages.push(language);
        }
    }

    let files = file_walker::collect_project_files(&paths, &languages, &args.include)?;
    if files.is_empty() {
        eprintln!("{} No matching source files found", cui_ui::icons::warning());
        return Ok(());
    }

    pipeline::install_interrupt_handler();
    let pool = pipeline::build_pool(args.jobs)?;
    let spinner = Spinner::builder(format!(
        "Running {} on {} files",
        transform.name,
        files.len()
    ))
    .start();
    let results = pipeline::run_files(&pool, &files, |path| {
        migrate_file(transform, path, &base, args.dry_run, args.diff)
    });
    spinner.finish();

    report(&results_with_outcomes(results), &base, args.dry_run)
}

fn results_with_outcomes(results: Vec<FileResult<FileOutcome>>) -> Vec<(PathBuf, Option<FileOutcome>)> {
    results
        .into_iter()
        .map(|r| (r.path, outcome_of(r.outcome)))
        .collect()
}

fn report(results: &[(PathBuf, Option<FileOutcome>)], base: &Path, dry_run: bool) -> Result<()> {
    let mut changed = 0;
    let mut unchanged = 0;
    let mut errored = 0;
    let mut cancelled = 0;

    for (path, outcome) in results {
        let display = pipeline::display_path(path, base);
        match outcome {
            Some(FileOutcome::Changed { diff }) => {
                changed += 1;
                if let Some(diff) = diff {
                    print!("{diff}");
                }
                eprintln!(
                    "{} {}",
                    cui_ui::icons::success(),
                    display.with_style(Style::Green).bold()
                );
            }
            Some(FileOutcome::Unchanged) => {
                unchanged += 1;
                debug!("{display}: unchanged");
            }
            Some(FileOutcome::Errored(message)) => {
                errored += 1;
                eprintln!(
                    "{} {}: {}",
                    cui_ui::icons::error(),
                    display.with_style(Style::Red).bold(),
                    message
                );
            }
            None => cancelled += 1,
        }
    }

    let verb = if dry_run { "would change" } else { "changed" };
    eprintln!("\n{changed} {verb}, {unchanged} unchanged, {errored} failed");
    if dry_run && changed > 0 {
        eprintln!("Dry run: no files were written");
    }

    if cancelled > 0 {
        anyhow::bail!("Interrupted, {cancelled} files were not processed");
    }
    if errored > 0 {
        anyhow::bail!("Migration failed for {errored} files");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_file_dry_run_and_write() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("Menu.jsx");
        let source = "import { Popover } from '@sumup-oss/circuit-ui';\nexport const M = () => <Popover />;\n";
        std::fs::write(&path, source)?;
        let transform = get_transform("component-names")?;

        let diff = match migrate_file(transform, &path, dir.path(), true, true)? {
            FileOutcome::Changed { diff: Some(diff) } => diff,
            other => panic!("expected a change, got {other:?}"),
        };
        assert!(diff.contains("+export const M = () => <ActionMenu />;"));
        assert_eq!(std::fs::read_to_string(&path)?, source);

        migrate_file(transform, &path, dir.path(), false, false)?;
        assert!(std::fs::read_to_string(&path)?.contains("<ActionMenu />"));

        // Second run has nothing left to do.
        assert!(matches!(
            migrate_file(transform, &path, dir.path(), false, false)?,
            FileOutcome::Unchanged
        ));
        Ok(())
    }

    #[test]
    fn test_report_fails_on_errors() {
        let base = Path::new("/repo");
        let ok = vec![(PathBuf::from("/repo/a.js"), Some(FileOutcome::Unchanged))];
        assert!(report(&ok, base, false).is_ok());

        let failed = vec![
            (PathBuf::from("/repo/a.js"), Some(FileOutcome::Unchanged)),
            (
                PathBuf::from("/repo/b.js"),
                Some(FileOutcome::Errored("Syntax error".into())),
            ),
        ];
        let err = report(&failed, base, false).unwrap_err();
        assert_eq!(err.to_string(), "Migration failed for 1 files");
    }
}
