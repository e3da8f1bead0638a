use std::collections::{HashMap, HashSet};

use cui_ast::{ImportKind, Node, SourceEdit, SourceFile, jsx_elements, local_bindings};

use super::{base_identifier, is_circuit_ui};
use crate::{Finding, Rule, RuleContext, RuleError};

/// Renames Circuit UI components at their JSX usage sites.
///
/// Tags are resolved through the file's imports first, so a same-named
/// component from another package is left alone. Unaliased imports keep
/// their specifier and only the usages are renamed, unless
/// [`RenamedComponents::with_import_renames`] is set. For aliased imports
/// (`{ Popover as Menu }`) the usages go through the alias, so the imported
/// name in the specifier is renamed instead. Member tags of namespace imports
/// (`<Circuit.Popover>`) have the component segment renamed.
pub struct RenamedComponents {
    renames: HashMap<&'static str, &'static str>,
    rename_imports: bool,
}

impl RenamedComponents {
    pub fn new(renames: &[(&'static str, &'static str)]) -> Self {
        Self {
            renames: renames.iter().copied().collect(),
            rename_imports: false,
        }
    }

    /// Also rename the specifier of unaliased imports, so the fixed file
    /// still binds every name it uses.
    pub fn with_import_renames(mut self) -> Self {
        self.rename_imports = true;
        self
    }
}

fn message(old: &str, new: &str) -> String {
    format!("The {old} component has been renamed to {new}.")
}

/// The namespace identifier and the member right after it in a tag name:
/// `Circuit` and `Popover` in `Circuit.Popover.Item`.
fn namespace_member(mut node: Node<'_>) -> Option<(Node<'_>, Node<'_>)> {
    while node.kind() == "member_expression" {
        let object = node.child_by_field_name("object")?;
        if object.kind() == "identifier" {
            return Some((object, node.child_by_field_name("property")?));
        }
        node = object;
    }
    None
}

impl RenamedComponents {
    fn rename_namespaced(
        &self,
        file: &SourceFile,
        namespaces: &HashSet<String>,
        name: Node<'_>,
        closing: Option<Node<'_>>,
    ) -> Option<Finding> {
        let (namespace, member) = namespace_member(name)?;
        if !namespaces.contains(file.node_text(namespace)) {
            return None;
        }
        let (&old, &new) = self.renames.get_key_value(file.node_text(member))?;
        let mut finding = Finding::report(name.byte_range(), message(old, new))
            .with_fix(SourceEdit::replace_node(member, new));
        if let Some((_, closing_member)) = closing.and_then(namespace_member) {
            finding = finding.with_fix(SourceEdit::replace_node(closing_member, new));
        }
        Some(finding)
    }
}

impl Rule for RenamedComponents {
    fn check(&self, _ctx: &RuleContext<'_>, file: &SourceFile) -> Result<Vec<Finding>, RuleError> {
        let mut findings = Vec::new();

        // Local identifier -> (old, new) for every renamed component that is
        // used under its own name.
        let mut usages: HashMap<String, (&str, &str)> = HashMap::new();
        let mut namespaces: HashSet<String> = HashSet::new();
        let bindings = local_bindings(file);
        for (local, record) in &bindings {
            if !is_circuit_ui(&record.source) {
                continue;
            }
            match record.kind {
                ImportKind::Namespace => {
                    namespaces.insert(local.clone());
                    continue;
                }
                ImportKind::Default => continue,
                ImportKind::Named => {}
            }
            let Some(imported) = record.imported_name.as_deref() else {
                continue;
            };
            let Some((&old, &new)) = self.renames.get_key_value(imported) else {
                continue;
            };
            // A second `ActionMenu` binding would not be valid code.
            let rename_import = self.rename_imports && !bindings.contains_key(new);
            if record.is_aliased() || rename_import {
                if let Some(range) = record.imported_range.clone() {
                    findings.push(
                        Finding::report(range.clone(), message(old, new))
                            .with_fix(SourceEdit::new(range, new)),
                    );
                }
            }
            if !record.is_aliased() {
                usages.insert(local.clone(), (old, new));
            }
        }

        if usages.is_empty() && namespaces.is_empty() {
            return Ok(sorted(findings));
        }

        for element in jsx_elements(file) {
            if let Some(finding) =
                self.rename_namespaced(file, &namespaces, element.name, element.closing_name)
            {
                findings.push(finding);
                continue;
            }
            let Some(base) = base_identifier(element.name) else {
                continue;
            };
            let Some(&(old, new)) = usages.get(file.node_text(base)) else {
                continue;
            };
            let mut finding = Finding::report(element.name.byte_range(), message(old, new))
                .with_fix(SourceEdit::replace_node(base, new));
            if let Some(closing) = element.closing_name.and_then(base_identifier) {
                finding = finding.with_fix(SourceEdit::replace_node(closing, new));
            }
            findings.push(finding);
        }

        Ok(sorted(findings))
    }
}

fn sorted(mut findings: Vec<Finding>) -> Vec<Finding> {
    findings.sort_by_key(|f| (f.range.start, f.range.end));
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check, fix};

    fn rule() -> RenamedComponents {
        RenamedComponents::new(&[("Popover", "ActionMenu"), ("Heading", "Headline")])
    }

    #[test]
    fn test_renames_usage_and_keeps_import() {
        let source = "import { Popover } from '@sumup-oss/circuit-ui';\n\nconst Menu = () => <Popover />;\n";
        assert_eq!(
            fix(&rule(), "Menu.jsx", source),
            "import { Popover } from '@sumup-oss/circuit-ui';\n\nconst Menu = () => <ActionMenu />;\n"
        );
    }

    #[test]
    fn test_renames_closing_and_member_tags() {
        let source = r#"import { Popover, Heading } from '@sumup/circuit-ui';

export const Page = () => (
  <Popover isOpen>
    <Popover.Item />
    <Heading as="h1">Title</Heading>
  </Popover>
);
"#;
        insta::assert_snapshot!(fix(&rule(), "Page.tsx", source), @r#"
        import { Popover, Heading } from '@sumup/circuit-ui';

        export const Page = () => (
          <ActionMenu isOpen>
            <ActionMenu.Item />
            <Headline as="h1">Title</Headline>
          </ActionMenu>
        );
        "#);
    }

    #[test]
    fn test_ignores_other_packages() {
        let source = "import { Popover } from 'material-ui';\n\nconst Menu = () => <Popover />;\n";
        assert!(check(&rule(), "Menu.jsx", source).is_empty());
        assert_eq!(fix(&rule(), "Menu.jsx", source), source);
    }

    #[test]
    fn test_aliased_import_renames_specifier() {
        let source = "import { Popover as Menu } from '@sumup-oss/circuit-ui';\n\nconst A = () => <Menu />;\n";
        assert_eq!(
            fix(&rule(), "A.jsx", source),
            "import { ActionMenu as Menu } from '@sumup-oss/circuit-ui';\n\nconst A = () => <Menu />;\n"
        );
    }

    #[test]
    fn test_second_run_is_a_fixed_point() {
        let source = r#"import { Popover } from '@sumup-oss/circuit-ui';

const A = () => (
  <Popover>
    <Popover.Item />
  </Popover>
);
"#;
        let once = fix(&rule(), "A.jsx", source);
        assert_ne!(once, source);
        assert_eq!(fix(&rule(), "A.jsx", &once), once);
    }

    #[test]
    fn test_findings_point_at_usages() {
        let source = "import { Popover } from '@sumup-oss/circuit-ui';\nconst A = () => <Popover />;\n";
        let findings = check(&rule(), "A.jsx", source);
        assert_eq!(findings.len(), 1);
        assert_eq!(&source[findings[0].range.clone()], "Popover");
        assert!(findings[0].range.start > source.find('\n').unwrap());
        assert_eq!(
            findings[0].message,
            "The Popover component has been renamed to ActionMenu."
        );
    }

    #[test]
    fn test_namespace_member_tags() {
        let source = r#"import * as Circuit from '@sumup-oss/circuit-ui';
import * as Other from 'material-ui';

const A = () => (
  <Circuit.Popover>
    <Circuit.Popover.Item />
    <Other.Popover />
  </Circuit.Popover>
);
"#;
        insta::assert_snapshot!(fix(&rule(), "A.jsx", source), @r#"
        import * as Circuit from '@sumup-oss/circuit-ui';
        import * as Other from 'material-ui';

        const A = () => (
          <Circuit.ActionMenu>
            <Circuit.ActionMenu.Item />
            <Other.Popover />
          </Circuit.ActionMenu>
        );
        "#);
    }

    #[test]
    fn test_import_renames_keep_bindings_valid() {
        let rule = rule().with_import_renames();
        let source = "import { Popover, Button } from '@sumup-oss/circuit-ui';\nconst A = () => <Popover />;\n";
        let fixed = fix(&rule, "A.jsx", source);
        assert_eq!(
            fixed,
            "import { ActionMenu, Button } from '@sumup-oss/circuit-ui';\nconst A = () => <ActionMenu />;\n"
        );
        assert!(check(&rule, "A.jsx", &fixed).is_empty());
    }

    #[test]
    fn test_import_rename_skipped_when_name_is_taken() {
        let rule = rule().with_import_renames();
        let source = "import { ActionMenu, Popover } from '@sumup-oss/circuit-ui';\nconst A = () => <Popover />;\n";
        assert_eq!(
            fix(&rule, "A.jsx", source),
            "import { ActionMenu, Popover } from '@sumup-oss/circuit-ui';\nconst A = () => <ActionMenu />;\n"
        );
    }

    #[test]
    fn test_no_imports_no_findings() {
        assert!(check(&rule(), "A.jsx", "const A = () => <Popover />;\n").is_empty());
    }
}
