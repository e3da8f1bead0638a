use cui_ast::{Language, SourceEdit, SourceFile, module_sources};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Finding, Rule, RuleContext, RuleError};

static CSS_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"@import\s+(?:url\(\s*)?["']([^"']+)["']"#).expect("valid @import pattern")
});

/// Moves module specifiers from old package names to new ones.
///
/// A mapping applies to the package itself and to any subpath of it, so
/// `@sumup/circuit-ui/legacy` becomes `@sumup-oss/circuit-ui/legacy`. Covers
/// imports, side-effect imports, re-exports, `require()`, dynamic `import()`
/// and stylesheet `@import`s.
pub struct RenamedPackageScope {
    mappings: Vec<(String, String)>,
}

impl RenamedPackageScope {
    pub fn new(mappings: &[(&str, &str)]) -> Self {
        Self {
            mappings: mappings
                .iter()
                .map(|(old, new)| (old.to_string(), new.to_string()))
                .collect(),
        }
    }

    /// The renamed specifier and the package mapping that produced it.
    fn rename(&self, specifier: &str) -> Option<(String, &str, &str)> {
        for (old, new) in &self.mappings {
            if let Some(rest) = specifier.strip_prefix(old.as_str()) {
                if rest.is_empty() || rest.starts_with('/') {
                    return Some((format!("{new}{rest}"), old, new));
                }
            }
        }
        None
    }

    fn finding(&self, specifier: &str, range: std::ops::Range<usize>) -> Option<Finding> {
        let (renamed, old, new) = self.rename(specifier)?;
        Some(
            Finding::report(
                range.clone(),
                format!("The {old} package has been renamed to {new}."),
            )
            .with_fix(SourceEdit::new(range, renamed)),
        )
    }
}

impl Rule for RenamedPackageScope {
    fn languages(&self) -> &'static [Language] {
        &[Language::JavaScript, Language::TypeScript, Language::Css]
    }

    fn check(&self, _ctx: &RuleContext<'_>, file: &SourceFile) -> Result<Vec<Finding>, RuleError> {
        if file.root().is_none() {
            let findings = CSS_IMPORT
                .captures_iter(file.text())
                .filter_map(|caps| caps.get(1))
                .filter_map(|m| self.finding(m.as_str(), m.range()))
                .collect();
            return Ok(findings);
        }

        let findings = module_sources(file)
            .into_iter()
            .filter_map(|source| {
                let literal = source.literal;
                self.finding(literal.value(file.text()), literal.value_range())
            })
            .collect();
        Ok(findings)
    }
}
