use cui_ast::{SourceEdit, SourceFile, find_property};

use crate::{Finding, Rule, RuleContext, RuleError};

/// Renames the last segment of theme member chains, e.g. `theme.grid.tera`
/// to `theme.grid.afterTera`.
pub struct ThemeProperties {
    /// Full chain and the new name of its last segment.
    pub renames: &'static [(&'static str, &'static str)],
}

impl Rule for ThemeProperties {
    fn check(&self, _ctx: &RuleContext<'_>, file: &SourceFile) -> Result<Vec<Finding>, RuleError> {
        let mut findings = Vec::new();
        for &(path, renamed) in self.renames {
            let parent = path.rsplit_once('.').map_or(path, |(parent, _)| parent);
            for node in find_property(file, path) {
                let Some(property) = node.child_by_field_name("property") else {
                    continue;
                };
                findings.push(
                    Finding::report(
                        node.byte_range(),
                        format!("`{path}` has been renamed to `{parent}.{renamed}`."),
                    )
                    .with_fix(SourceEdit::replace_node(property, renamed)),
                );
            }
        }
        findings.sort_by_key(|f| f.range.start);
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check, fix};

    const GRID: ThemeProperties = ThemeProperties {
        renames: &[("theme.grid.tera", "afterTera")],
    };

    #[test]
    fn test_renames_grid_breakpoint() {
        let source = r#"const styles = ({ theme }) => css`
  max-width: ${theme.grid.tera.maxWidth};
  ${theme.mq.tera} { gap: ${theme.grid.tera.gutter}; }
`;
const other = props.theme.grid.tera;
"#;
        insta::assert_snapshot!(fix(&GRID, "styles.js", source), @r#"
        const styles = ({ theme }) => css`
          max-width: ${theme.grid.afterTera.maxWidth};
          ${theme.mq.tera} { gap: ${theme.grid.afterTera.gutter}; }
        `;
        const other = props.theme.grid.tera;
        "#);
    }

    #[test]
    fn test_message_and_idempotence() {
        let source = "const a = theme.grid.tera;\n";
        let findings = check(&GRID, "a.ts", source);
        assert_eq!(findings[0].message, "`theme.grid.tera` has been renamed to `theme.grid.afterTera`.");
        let once = fix(&GRID, "a.ts", source);
        assert_eq!(once, "const a = theme.grid.afterTera;\n");
        assert!(check(&GRID, "a.ts", &once).is_empty());
    }
}
