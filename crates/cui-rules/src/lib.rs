//! Codemods and lint rules for code that consumes Circuit UI.
//!
//! Every rule implements [`Rule`]: it reads a parsed [`SourceFile`] and
//! returns [`Finding`]s. A finding may carry fix edits; `cui migrate` applies
//! them, `cui lint` reports findings as [`Diagnostic`]s and applies fixes only
//! when asked to.

use std::ops::Range;

use cui_ast::{EditError, Language, ParseError, SourceEdit, SourceFile};
use thiserror::Error;

mod diagnostic;
pub mod registry;
pub mod rules;
mod tokens;

pub use diagnostic::{Diagnostic, Severity};
pub use registry::{
    LintRule, Preset, RegistryError, RuleSetting, SelectedRule, Transform, get_lint_rule,
    get_transform, lint_rules, list_lint_rules, list_transforms, select_lint_rules, transforms,
};
pub use tokens::{SchemaError, TokenSchema};

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("Conflicting edits: {0}")]
    Edit(#[from] EditError),

    #[error("Rewrite produced invalid syntax")]
    InvalidRewrite(#[source] ParseError),
}

/// Shared, read-only inputs available to every rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub tokens: &'a TokenSchema,
}

impl Default for RuleContext<'static> {
    fn default() -> Self {
        Self {
            tokens: TokenSchema::builtin(),
        }
    }
}

/// One result of running a rule over a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub message: String,
    /// Byte range in the original source the finding points at.
    pub range: Range<usize>,
    /// Edits that resolve the finding. Empty for report-only findings.
    pub fix: Vec<SourceEdit>,
}

impl Finding {
    pub fn report(range: Range<usize>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            range,
            fix: Vec::new(),
        }
    }

    pub fn with_fix(mut self, edit: SourceEdit) -> Self {
        self.fix.push(edit);
        self
    }

    pub fn is_fixable(&self) -> bool {
        !self.fix.is_empty()
    }
}

const SCRIPT_LANGUAGES: &[Language] = &[Language::JavaScript, Language::TypeScript];

pub trait Rule: Send + Sync {
    /// Language families the rule understands. Files of other languages are
    /// never passed to [`Rule::check`].
    fn languages(&self) -> &'static [Language] {
        SCRIPT_LANGUAGES
    }

    fn check(&self, ctx: &RuleContext<'_>, file: &SourceFile) -> Result<Vec<Finding>, RuleError>;

    fn applies_to(&self, file: &SourceFile) -> bool {
        self.languages().contains(&file.dialect().language())
    }
}

/// Apply the fixes of `findings` to `file`.
///
/// Returns `None` when there is nothing to change. The rewritten text is
/// parsed again and rejected if it no longer parses.
pub fn apply_fixes(file: &SourceFile, findings: &[Finding]) -> Result<Option<String>, RuleError> {
    let edits: Vec<SourceEdit> = findings.iter().flat_map(|f| f.fix.iter().cloned()).collect();
    let Some(updated) = file.apply(edits)? else {
        return Ok(None);
    };
    SourceFile::parse_as(file.path(), updated.as_str(), file.dialect())
        .map_err(RuleError::InvalidRewrite)?;
    Ok(Some(updated))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Run `rule` over `source` parsed as `path`.
    pub fn check(rule: &dyn Rule, path: &str, source: &str) -> Vec<Finding> {
        let file = SourceFile::parse(path, source).expect("fixture parses");
        rule.check(&RuleContext::default(), &file).expect("rule runs")
    }

    /// Run `rule` and apply its fixes; returns the source unchanged when there
    /// are none.
    pub fn fix(rule: &dyn Rule, path: &str, source: &str) -> String {
        let file = SourceFile::parse(path, source).expect("fixture parses");
        let findings = rule.check(&RuleContext::default(), &file).expect("rule runs");
        apply_fixes(&file, &findings)
            .expect("fixes apply")
            .unwrap_or_else(|| source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_fixes_rejects_broken_output() -> anyhow::Result<()> {
        let file = SourceFile::parse("a.js", "const a = 1;")?;
        let finding = Finding::report(10..11, "oops").with_fix(SourceEdit::new(10..11, "("));
        let err = apply_fixes(&file, &[finding]).unwrap_err();
        assert!(matches!(err, RuleError::InvalidRewrite(_)));
        Ok(())
    }

    #[test]
    fn test_apply_fixes_without_fixes() -> anyhow::Result<()> {
        let file = SourceFile::parse("a.js", "const a = 1;")?;
        let finding = Finding::report(6..7, "report only");
        assert!(!finding.is_fixable());
        assert_eq!(apply_fixes(&file, &[finding])?, None);
        Ok(())
    }
}
