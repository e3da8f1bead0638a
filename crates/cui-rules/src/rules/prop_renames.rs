use cui_ast::{SourceFile, find_local_names, rename_jsx_attribute};

use crate::{Finding, Rule, RuleContext, RuleError};

/// Renames a prop on a set of Circuit UI components.
///
/// Only components imported from Circuit UI are touched, under whatever
/// local name or styled wrapper the file uses for them.
pub struct PropRename {
    pub components: &'static [&'static str],
    pub from: &'static str,
    pub to: &'static str,
}

impl Rule for PropRename {
    fn check(&self, _ctx: &RuleContext<'_>, file: &SourceFile) -> Result<Vec<Finding>, RuleError> {
        let mut findings: Vec<Finding> = Vec::new();
        for &component in self.components {
            let Some(tags) = find_local_names(file, component) else {
                continue;
            };
            for tag in &tags {
                for edit in rename_jsx_attribute(file, tag, self.from, self.to) {
                    if findings.iter().any(|f| f.range == edit.range) {
                        continue;
                    }
                    findings.push(
                        Finding::report(
                            edit.range.clone(),
                            format!(
                                "The `{}` prop of {component} has been renamed to `{}`.",
                                self.from, self.to
                            ),
                        )
                        .with_fix(edit),
                    );
                }
            }
        }
        findings.sort_by_key(|f| f.range.start);
        Ok(findings)
    }
}
