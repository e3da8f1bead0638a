use std::fmt;
use std::ops::Range;

use cui_ast::SourceFile;
use serde::{Deserialize, Serialize};

use crate::Finding;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A positioned lint message.
///
/// The serialized form is the integration contract with editors and CI
/// tooling: `ruleName`, `message`, `file`, `line`, `column`, `endLine`,
/// `endColumn` and `severity`. Lines and columns are 1-based and refer to the
/// text the rule checked, which after `--fix` is the fixed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub rule_name: String,
    pub message: String,
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub severity: Severity,
    #[serde(skip)]
    pub range: Range<usize>,
    #[serde(skip)]
    pub fixable: bool,
}

impl Diagnostic {
    /// Resolve a finding against the file it was produced for. `display_path`
    /// is what gets reported as `file`.
    pub fn from_finding(
        rule_name: &str,
        severity: Severity,
        file: &SourceFile,
        display_path: impl Into<String>,
        finding: &Finding,
    ) -> Self {
        let (start, end) = file.span(&finding.range);
        Self {
            rule_name: rule_name.to_string(),
            message: finding.message.clone(),
            file: display_path.into(),
            line: start.line,
            column: start.column,
            end_line: end.line,
            end_column: end.column,
            severity,
            range: finding.range.clone(),
            fixable: finding.is_fixable(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} {} ({})",
            self.file, self.line, self.column, self.severity, self.message, self.rule_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_json_shape() -> anyhow::Result<()> {
        let file = SourceFile::parse(
            "src/Form.jsx",
            "import { RadioButton } from '@sumup-oss/circuit-ui';\n",
        )?;
        let finding = Finding::report(9..20, "The RadioButton component is deprecated.");
        let diag = Diagnostic::from_finding(
            "no-deprecated-components",
            Severity::Error,
            &file,
            "src/Form.jsx",
            &finding,
        );
        insta::assert_json_snapshot!(diag, @r#"
        {
          "ruleName": "no-deprecated-components",
          "message": "The RadioButton component is deprecated.",
          "file": "src/Form.jsx",
          "line": 1,
          "column": 10,
          "endLine": 1,
          "endColumn": 21,
          "severity": "error"
        }
        "#);
        assert_eq!(
            diag.to_string(),
            "src/Form.jsx:1:10: error The RadioButton component is deprecated. (no-deprecated-components)"
        );
        Ok(())
    }
}
