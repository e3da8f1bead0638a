use anyhow::Result;
use clap::Args;
use cui_rules::{lint_rules, transforms};
use cui_ui::prelude::*;
use serde_json::json;
use std::io::Write;

/// Arguments for the `list` command
#[derive(Args, Debug, Clone)]
#[command(about = "List available codemods and lint rules")]
pub struct ListArgs {
    /// Print machine readable JSON
    #[arg(long)]
    pub json: bool,
}

fn to_json() -> serde_json::Value {
    let transforms: Vec<_> = transforms()
        .map(|t| json!({ "name": t.name, "description": t.description }))
        .collect();
    let rules: Vec<_> = lint_rules()
        .map(|r| {
            json!({
                "name": r.name,
                "description": r.description,
                "preset": r.preset.to_string(),
                "severity": r.default_severity,
                "fixable": r.fixable,
            })
        })
        .collect();
    json!({ "transforms": transforms, "lintRules": rules })
}

fn write_human<W: Write>(out: &mut W) -> std::io::Result<()> {
    let width = transforms()
        .map(|t| t.name.len())
        .chain(lint_rules().map(|r| r.name.len()))
        .max()
        .unwrap_or(0);

    writeln!(out, "{}", "Codemods (cui migrate --transform <name>)".bold())?;
    for transform in transforms() {
        writeln!(
            out,
            "  {:<width$}  {}",
            transform.name.with_style(Style::Cyan),
            transform.description
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", "Lint rules (cui lint --rule <name>)".bold())?;
    for rule in lint_rules() {
        let mut tags = vec![rule.preset.to_string(), rule.default_severity.to_string()];
        if rule.fixable {
            tags.push("fixable".to_string());
        }
        writeln!(
            out,
            "  {:<width$}  {} {}",
            rule.name.with_style(Style::Cyan),
            rule.description,
            format!("[{}]", tags.join(", ")).with_style(Style::Dim)
        )?;
    }
    Ok(())
}

/// Execute the `list` command
pub fn execute(args: ListArgs) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &to_json())?;
        writeln!(out)?;
    } else {
        write_human(&mut out)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_lists_every_entry() {
        let value = to_json();
        let transforms = value["transforms"].as_array().unwrap();
        assert_eq!(transforms.len(), cui_rules::list_transforms().len());
        assert_eq!(transforms[0]["name"], "component-names");

        let rules = value["lintRules"].as_array().unwrap();
        let lifecycle = rules
            .iter()
            .find(|r| r["name"] == "component-lifecycle-imports")
            .unwrap();
        assert_eq!(lifecycle["preset"], "strict");
        assert_eq!(lifecycle["severity"], "error");
        assert_eq!(lifecycle["fixable"], true);
    }

    #[test]
    fn test_human_output_mentions_fixable_rules() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_human(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Codemods (cui migrate --transform <name>)\n"));
        assert!(text.contains("renamed-package-scope"));
        assert!(text.contains("[recommended, error, fixable]"));
    }
}
