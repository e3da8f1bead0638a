//! Named codemods and lint rules.
//!
//! Both tables are built once on first use and never change afterwards, so
//! entries can be shared freely between worker threads.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::Deserialize;
use thiserror::Error;

use crate::rules::{
    ComponentLifecycle, DeprecatedComponent, DeprecatedComponents, DeprecatedProps,
    DeprecatedPropsEntry, InvalidCustomProperties, LifecycleImports, PropRename,
    RenamedComponents, RenamedPackageScope, ThemeProperties,
};
use crate::{Rule, Severity};

const COMPONENT_RENAMES: &[(&str, &str)] = &[("Popover", "ActionMenu")];

const PACKAGE_SCOPES: &[(&str, &str)] = &[
    ("@sumup/circuit-ui", "@sumup-oss/circuit-ui"),
    ("@sumup/design-tokens", "@sumup-oss/design-tokens"),
    ("@sumup/icons", "@sumup-oss/icons"),
    ("@sumup/intl", "@sumup-oss/intl"),
    ("@sumup/eslint-plugin-circuit-ui", "@sumup-oss/eslint-plugin-circuit-ui"),
    ("@sumup/stylelint-plugin-circuit-ui", "@sumup-oss/stylelint-plugin-circuit-ui"),
];

const DEPRECATED_COMPONENTS: &[DeprecatedComponent] = &[
    DeprecatedComponent {
        name: "RadioButton",
        alternative: "Use the RadioButtonGroup component instead.",
    },
    DeprecatedComponent {
        name: "InlineMessage",
        alternative: "Use the NotificationInline component instead.",
    },
    DeprecatedComponent {
        name: "Sidebar",
        alternative: "Use the SideNavigation component instead.",
    },
    DeprecatedComponent {
        name: "SidebarContextProvider",
        alternative: "Use the SideNavigation component instead.",
    },
];

const DEPRECATED_PROPS: &[DeprecatedPropsEntry] = &[
    DeprecatedPropsEntry {
        components: &[
            "Body",
            "BodyLarge",
            "Headline",
            "SubHeadline",
            "Title",
            "Input",
            "TextArea",
            "Select",
            "CurrencyInput",
            "SearchInput",
            "RadioButtonGroup",
            "Checkbox",
            "Toggle",
            "ButtonGroup",
        ],
        props: &["noMargin"],
        alternative: "The default outer spacing has been removed. Add spacing with custom CSS instead.",
    },
    DeprecatedPropsEntry {
        components: &["Button", "IconButton", "CloseButton", "Anchor"],
        props: &["tracking"],
        alternative: "Use an `onClick` handler to dispatch user interaction events instead.",
    },
];

const LIFECYCLES: &[(&str, ComponentLifecycle)] = &[
    ("Sidebar", ComponentLifecycle::Legacy),
    ("SidebarContextProvider", ComponentLifecycle::Legacy),
    ("SidebarContextConsumer", ComponentLifecycle::Legacy),
    ("SelectorGroup", ComponentLifecycle::Legacy),
    ("Calendar", ComponentLifecycle::Experimental),
    ("RangePicker", ComponentLifecycle::Experimental),
    ("Toggletip", ComponentLifecycle::Experimental),
    ("Tooltip", ComponentLifecycle::Experimental),
];

/// A codemod selectable with `cui migrate --transform <name>`.
pub struct Transform {
    pub name: &'static str,
    pub description: &'static str,
    pub rule: Box<dyn Rule>,
}

/// A lint rule selectable with `cui lint --rule <name>`.
pub struct LintRule {
    pub name: &'static str,
    pub description: &'static str,
    /// The least strict preset that enables the rule.
    pub preset: Preset,
    pub default_severity: Severity,
    pub fixable: bool,
    pub rule: Box<dyn Rule>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Recommended,
    Strict,
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Recommended => write!(f, "recommended"),
            Preset::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommended" => Ok(Preset::Recommended),
            "strict" => Ok(Preset::Strict),
            other => Err(format!(
                "unknown preset `{other}` (expected `recommended` or `strict`)"
            )),
        }
    }
}

/// Per-rule override from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSetting {
    Off,
    Warn,
    Error,
}

/// A lint rule enabled for a run, with the severity it reports at.
#[derive(Clone, Copy)]
pub struct SelectedRule {
    pub entry: &'static LintRule,
    pub severity: Severity,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Unknown {kind} `{name}`. Available: {available}")]
    NotFound {
        kind: &'static str,
        name: String,
        available: String,
    },
}

fn transform_table() -> Vec<Transform> {
    vec![
        Transform {
            name: "component-names",
            description: "Rename JSX usages of renamed components (Popover to ActionMenu)",
            rule: Box::new(RenamedComponents::new(COMPONENT_RENAMES)),
        },
        Transform {
            name: "package-scope",
            description: "Move imports from the @sumup scope to @sumup-oss",
            rule: Box::new(RenamedPackageScope::new(PACKAGE_SCOPES)),
        },
        Transform {
            name: "input-deepref-prop",
            description: "Replace the deepRef prop of form inputs with ref",
            rule: Box::new(PropRename {
                components: &["Input", "TextArea", "CurrencyInput", "SearchInput"],
                from: "deepRef",
                to: "ref",
            }),
        },
        Transform {
            name: "toggle-checked-prop",
            description: "Replace the on prop of Toggle with checked",
            rule: Box::new(PropRename {
                components: &["Toggle"],
                from: "on",
                to: "checked",
            }),
        },
        Transform {
            name: "onchange-prop",
            description: "Replace the onToggle prop of Toggle with onChange",
            rule: Box::new(PropRename {
                components: &["Toggle"],
                from: "onToggle",
                to: "onChange",
            }),
        },
        Transform {
            name: "theme-grid-tera",
            description: "Rename theme.grid.tera to theme.grid.afterTera",
            rule: Box::new(ThemeProperties {
                renames: &[("theme.grid.tera", "afterTera")],
            }),
        },
        Transform {
            name: "theme-icon-sizes",
            description: "Rename the small, medium and large theme icon sizes",
            rule: Box::new(ThemeProperties {
                renames: &[
                    ("theme.iconSizes.small", "kilo"),
                    ("theme.iconSizes.medium", "mega"),
                    ("theme.iconSizes.large", "giga"),
                ],
            }),
        },
    ]
}

fn lint_rule_table() -> Vec<LintRule> {
    vec![
        LintRule {
            name: "no-deprecated-components",
            description: "Disallow imports of deprecated components",
            preset: Preset::Recommended,
            default_severity: Severity::Warning,
            fixable: false,
            rule: Box::new(DeprecatedComponents::new(DEPRECATED_COMPONENTS)),
        },
        LintRule {
            name: "no-deprecated-props",
            description: "Disallow deprecated component props",
            preset: Preset::Recommended,
            default_severity: Severity::Warning,
            fixable: false,
            rule: Box::new(DeprecatedProps::new(DEPRECATED_PROPS)),
        },
        LintRule {
            name: "no-renamed-components",
            description: "Disallow usages of renamed components; the fix renames imports too",
            preset: Preset::Recommended,
            default_severity: Severity::Error,
            fixable: true,
            rule: Box::new(RenamedComponents::new(COMPONENT_RENAMES).with_import_renames()),
        },
        LintRule {
            name: "renamed-package-scope",
            description: "Disallow imports from the former @sumup package scope",
            preset: Preset::Recommended,
            default_severity: Severity::Error,
            fixable: true,
            rule: Box::new(RenamedPackageScope::new(PACKAGE_SCOPES)),
        },
        LintRule {
            name: "no-invalid-custom-properties",
            description: "Disallow --cui-* custom properties that are not design tokens",
            preset: Preset::Recommended,
            default_severity: Severity::Error,
            fixable: false,
            rule: Box::new(InvalidCustomProperties),
        },
        LintRule {
            name: "component-lifecycle-imports",
            description: "Require legacy and experimental components to be imported from their entry points",
            preset: Preset::Strict,
            default_severity: Severity::Error,
            fixable: true,
            rule: Box::new(LifecycleImports::new(LIFECYCLES)),
        },
    ]
}

static TRANSFORMS: Lazy<BTreeMap<&'static str, Transform>> = Lazy::new(|| {
    transform_table()
        .into_iter()
        .map(|t| (t.name, t))
        .collect()
});

static LINT_RULES: Lazy<BTreeMap<&'static str, LintRule>> = Lazy::new(|| {
    lint_rule_table()
        .into_iter()
        .map(|r| (r.name, r))
        .collect()
});

/// Transform names in alphabetical order.
pub fn list_transforms() -> Vec<&'static str> {
    TRANSFORMS.keys().copied().collect()
}

/// Lint rule names in alphabetical order.
pub fn list_lint_rules() -> Vec<&'static str> {
    LINT_RULES.keys().copied().collect()
}

pub fn transforms() -> impl Iterator<Item = &'static Transform> {
    TRANSFORMS.values()
}

pub fn lint_rules() -> impl Iterator<Item = &'static LintRule> {
    LINT_RULES.values()
}

pub fn get_transform(name: &str) -> Result<&'static Transform, RegistryError> {
    TRANSFORMS.get(name).ok_or_else(|| RegistryError::NotFound {
        kind: "transform",
        name: name.to_string(),
        available: list_transforms().join(", "),
    })
}

pub fn get_lint_rule(name: &str) -> Result<&'static LintRule, RegistryError> {
    LINT_RULES.get(name).ok_or_else(|| RegistryError::NotFound {
        kind: "lint rule",
        name: name.to_string(),
        available: list_lint_rules().join(", "),
    })
}

/// Lint rules enabled for a run, sorted by name.
///
/// With an explicit `only` list those rules run at their default severity
/// regardless of `preset`. `overrides` are applied last: `off` disables a
/// rule, `warn` and `error` enable it at that severity. Every name is
/// validated, so a typo fails the run instead of silently doing nothing.
pub fn select_lint_rules(
    preset: Preset,
    only: &[String],
    overrides: &BTreeMap<String, RuleSetting>,
) -> Result<Vec<SelectedRule>, RegistryError> {
    let mut selected: BTreeMap<&'static str, SelectedRule> = BTreeMap::new();

    if only.is_empty() {
        for entry in lint_rules().filter(|r| r.preset <= preset) {
            selected.insert(
                entry.name,
                SelectedRule {
                    entry,
                    severity: entry.default_severity,
                },
            );
        }
    } else {
        for name in only {
            let entry = get_lint_rule(name)?;
            selected.insert(
                entry.name,
                SelectedRule {
                    entry,
                    severity: entry.default_severity,
                },
            );
        }
    }

    for (name, setting) in overrides {
        let entry = get_lint_rule(name)?;
        match setting {
            RuleSetting::Off => {
                selected.remove(entry.name);
            }
            RuleSetting::Warn | RuleSetting::Error => {
                let severity = if *setting == RuleSetting::Warn {
                    Severity::Warning
                } else {
                    Severity::Error
                };
                selected.insert(entry.name, SelectedRule { entry, severity });
            }
        }
    }

    log::debug!(
        "Selected lint rules: {}",
        selected.keys().copied().collect::<Vec<_>>().join(", ")
    );
    Ok(selected.into_values().collect())
}
