use std::io::{self, Write};

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, sources};
use cui_rules::{Diagnostic, Severity};

/// Render the diagnostics of one file with `ariadne`.
///
/// `source` must be the text the diagnostics were computed on.
pub fn render_file<W: Write>(
    writer: &mut W,
    display: &str,
    source: &str,
    diagnostics: &[Diagnostic],
    color: bool,
) -> io::Result<()> {
    for diagnostic in diagnostics {
        let (kind, label_color) = match diagnostic.severity {
            Severity::Error => (ReportKind::Error, Color::Red),
            Severity::Warning => (ReportKind::Warning, Color::Yellow),
        };
        let span = (display.to_string(), diagnostic.range.clone());
        let label = if diagnostic.fixable {
            format!("{} (fixable with --fix)", diagnostic.rule_name)
        } else {
            diagnostic.rule_name.clone()
        };

        Report::build(kind, span.clone())
            .with_config(
                Config::default()
                    .with_index_type(IndexType::Byte)
                    .with_color(color),
            )
            .with_code(&diagnostic.rule_name)
            .with_message(&diagnostic.message)
            .with_label(Label::new(span).with_message(label).with_color(label_color))
            .finish()
            .write(sources([(display.to_string(), source.to_string())]), &mut *writer)?;
    }
    Ok(())
}
