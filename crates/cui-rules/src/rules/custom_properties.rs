use cui_ast::{Language, SourceFile};

use crate::{Finding, Rule, RuleContext, RuleError};

/// Reports `--cui-*` custom properties that are not design tokens.
///
/// Works on the raw text line by line, so it covers stylesheets, CSS-in-JS
/// templates and plain strings alike.
pub struct InvalidCustomProperties;

impl Rule for InvalidCustomProperties {
    fn languages(&self) -> &'static [Language] {
        &[Language::JavaScript, Language::TypeScript, Language::Css]
    }

    fn check(&self, ctx: &RuleContext<'_>, file: &SourceFile) -> Result<Vec<Finding>, RuleError> {
        let mut findings = Vec::new();
        let mut offset = 0;
        for line in file.text().split_inclusive('\n') {
            for range in ctx.tokens.invalid_tokens(line) {
                let token = &line[range.clone()];
                findings.push(Finding::report(
                    offset + range.start..offset + range.end,
                    format!("Custom property `{token}` does not exist. Use one of the design tokens instead."),
                ));
            }
            offset += line.len();
        }
        Ok(findings)
    }
}
