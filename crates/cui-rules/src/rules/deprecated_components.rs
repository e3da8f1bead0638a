use std::collections::HashMap;

use cui_ast::{ImportKind, SourceFile, import_declarations};

use super::is_circuit_ui_module;
use crate::{Finding, Rule, RuleContext, RuleError};

/// A component that is still exported but should no longer be used.
#[derive(Debug, Clone, Copy)]
pub struct DeprecatedComponent {
    pub name: &'static str,
    pub alternative: &'static str,
}

/// Reports imports of deprecated components from Circuit UI, including its
/// `/legacy` and `/experimental` entry points.
pub struct DeprecatedComponents {
    deprecations: HashMap<&'static str, &'static str>,
}

impl DeprecatedComponents {
    pub fn new(deprecations: &[DeprecatedComponent]) -> Self {
        Self {
            deprecations: deprecations
                .iter()
                .map(|d| (d.name, d.alternative))
                .collect(),
        }
    }
}

impl Rule for DeprecatedComponents {
    fn check(&self, _ctx: &RuleContext<'_>, file: &SourceFile) -> Result<Vec<Finding>, RuleError> {
        let mut findings = Vec::new();
        for decl in import_declarations(file) {
            if !is_circuit_ui_module(decl.source_value(file)) {
                continue;
            }
            for record in decl.records(file) {
                if record.kind != ImportKind::Named {
                    continue;
                }
                let Some(name) = record.imported_name.as_deref() else {
                    continue;
                };
                if let Some(alternative) = self.deprecations.get(name) {
                    findings.push(Finding::report(
                        record.range.clone(),
                        format!("The {name} component has been deprecated. {alternative}"),
                    ));
                }
            }
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::check;

    fn rule() -> DeprecatedComponents {
        DeprecatedComponents::new(&[
            DeprecatedComponent {
                name: "RadioButton",
                alternative: "Use RadioButtonGroup instead.",
            },
            DeprecatedComponent {
                name: "InlineMessage",
                alternative: "Use the NotificationInline component instead.",
            },
        ])
    }

    #[test]
    fn test_flags_circuit_ui_import() {
        let source = "import { RadioButton } from '@sumup/circuit-ui';\n";
        let findings = check(&rule(), "Form.jsx", source);
        assert_eq!(findings.len(), 1);
        assert_eq!(&source[findings[0].range.clone()], "RadioButton");
        assert_eq!(
            findings[0].message,
            "The RadioButton component has been deprecated. Use RadioButtonGroup instead."
        );
        assert!(!findings[0].is_fixable());
    }

    #[test]
    fn test_ignores_other_packages() {
        let source = "import { RadioButton } from 'material-ui';\n";
        assert!(check(&rule(), "Form.jsx", source).is_empty());
    }

    #[test]
    fn test_aliased_and_mixed_imports() {
        let source = r#"import { Button, InlineMessage as Message, RadioButton } from '@sumup-oss/circuit-ui';
import RadioButtonDefault from '@sumup-oss/circuit-ui';
import { RadioButton as Legacy } from '@sumup-oss/circuit-ui/legacy';
"#;
        let flagged: Vec<_> = check(&rule(), "Form.tsx", source)
            .into_iter()
            .map(|f| &source[f.range])
            .collect();
        assert_eq!(
            flagged,
            ["InlineMessage as Message", "RadioButton", "RadioButton as Legacy"]
        );
    }

    #[test]
    fn test_lookalike_packages_are_ignored() {
        let source = "import { RadioButton } from '@sumup-oss/circuit-ui-extras';\n";
        assert!(check(&rule(), "Form.jsx", source).is_empty());
    }

    #[test]
    fn test_no_imports() {
        assert!(check(&rule(), "a.js", "export const a = 1;\n").is_empty());
    }
}
