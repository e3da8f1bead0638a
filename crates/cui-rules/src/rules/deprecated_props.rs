use std::collections::HashMap;

use cui_ast::{SourceFile, find_local_names, jsx_attributes, jsx_elements};

use crate::{Finding, Rule, RuleContext, RuleError};

/// Props that are deprecated on a group of components, with one piece of
/// guidance shared by all of them.
#[derive(Debug, Clone, Copy)]
pub struct DeprecatedPropsEntry {
    pub components: &'static [&'static str],
    pub props: &'static [&'static str],
    pub alternative: &'static str,
}

/// Reports deprecated props on Circuit UI components.
///
/// A tag matches when it is the component's own name, or a local alias or
/// styled wrapper of a component imported from Circuit UI.
pub struct DeprecatedProps {
    /// component -> prop -> alternative
    by_component: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl DeprecatedProps {
    pub fn new(entries: &[DeprecatedPropsEntry]) -> Self {
        let mut by_component: HashMap<_, HashMap<_, _>> = HashMap::new();
        for entry in entries {
            for &component in entry.components {
                let props = by_component.entry(component).or_default();
                for &prop in entry.props {
                    props.entry(prop).or_insert(entry.alternative);
                }
            }
        }
        Self { by_component }
    }

    /// Tag as written in the file -> component it refers to.
    fn tags(&self, file: &SourceFile) -> HashMap<String, &'static str> {
        let mut tags = HashMap::new();
        for &component in self.by_component.keys() {
            tags.insert(component.to_string(), component);
            for local in find_local_names(file, component).unwrap_or_default() {
                tags.insert(local, component);
            }
        }
        tags
    }
}

impl Rule for DeprecatedProps {
    fn check(&self, _ctx: &RuleContext<'_>, file: &SourceFile) -> Result<Vec<Finding>, RuleError> {
        let elements = jsx_elements(file);
        if elements.is_empty() {
            return Ok(Vec::new());
        }

        let tags = self.tags(file);
        let mut findings = Vec::new();
        for element in &elements {
            let Some(&component) = tags.get(&element.tag(file)) else {
                continue;
            };
            let props = &self.by_component[component];
            for attr in jsx_attributes(element) {
                let name = attr.name(file);
                if let Some(alternative) = props.get(name) {
                    findings.push(Finding::report(
                        attr.name.byte_range(),
                        format!("The {component}'s `{name}` prop is deprecated. {alternative}"),
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

    fn rule() -> DeprecatedProps {
        DeprecatedProps::new(&[
            DeprecatedPropsEntry {
                components: &["Body", "Headline", "Input"],
                props: &["noMargin"],
                alternative: "Use custom CSS or utility classes instead.",
            },
            DeprecatedPropsEntry {
                components: &["Button"],
                props: &["tracking"],
                alternative: "Use an `onClick` handler to dispatch user interaction events instead.",
            },
        ])
    }

    #[test]
    fn test_flags_matching_props() {
        let source = r#"import { Body, Button } from '@sumup-oss/circuit-ui';

const Card = () => (
  <div>
    <Body noMargin>Text</Body>
    <Button tracking={{ label: 'x' }} noMargin>Go</Button>
  </div>
);
"#;
        let findings = check(&rule(), "Card.jsx", source);
        let flagged: Vec<_> = findings.iter().map(|f| &source[f.range.clone()]).collect();
        assert_eq!(flagged, ["noMargin", "tracking"]);
        insta::assert_snapshot!(findings[1].message, @"The Button's `tracking` prop is deprecated. Use an `onClick` handler to dispatch user interaction events instead.");
    }

    #[test]
    fn test_follows_aliases_and_styled_wrappers() {
        let source = r#"import styled from '@emotion/styled';
import { Headline as Title } from '@sumup-oss/circuit-ui';

const Heading = styled(Title)`color: red;`;

const Page = () => (
  <>
    <Title noMargin />
    <Heading as="h2" noMargin />
  </>
);
"#;
        let findings = check(&rule(), "Page.tsx", source);
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| f.message.starts_with("The Headline's")));
    }

    #[test]
    fn test_other_props_and_tags_are_ignored() {
        let source = "const a = <Body size=\"one\" />;\nconst b = <Paragraph noMargin />;\n";
        assert!(check(&rule(), "a.jsx", source).is_empty());
    }
}
