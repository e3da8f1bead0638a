use std::collections::HashMap;

use cui_ast::{ImportKind, SourceEdit, SourceFile, import_declarations};

use super::is_circuit_ui;
use crate::{Finding, Rule, RuleContext, RuleError};

/// Entry points components move to before they become stable or are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentLifecycle {
    Legacy,
    Experimental,
}

impl ComponentLifecycle {
    fn subpath(self) -> &'static str {
        match self {
            ComponentLifecycle::Legacy => "legacy",
            ComponentLifecycle::Experimental => "experimental",
        }
    }
}

/// Reports components imported from the package root although they are only
/// exported from its `/legacy` or `/experimental` entry point.
///
/// When every binding of a declaration moves to the same entry point, the
/// module path is fixed. Mixed declarations are reported only, since fixing
/// them would mean splitting the statement.
pub struct LifecycleImports {
    components: HashMap<&'static str, ComponentLifecycle>,
}

impl LifecycleImports {
    pub fn new(components: &[(&'static str, ComponentLifecycle)]) -> Self {
        Self {
            components: components.iter().copied().collect(),
        }
    }
}

impl Rule for LifecycleImports {
    fn check(&self, _ctx: &RuleContext<'_>, file: &SourceFile) -> Result<Vec<Finding>, RuleError> {
        let mut findings = Vec::new();
        for decl in import_declarations(file) {
            let package = decl.source_value(file);
            if !is_circuit_ui(package) {
                continue;
            }

            let records = decl.records(file);
            let moved: Vec<_> = records
                .iter()
                .filter(|r| r.kind == ImportKind::Named)
                .filter_map(|r| {
                    let name = r.imported_name.as_deref()?;
                    let lifecycle = *self.components.get(name)?;
                    Some((r, name, lifecycle))
                })
                .collect();
            let Some(&(_, _, first)) = moved.first() else {
                continue;
            };

            let fixable =
                moved.len() == records.len() && moved.iter().all(|&(_, _, l)| l == first);

            for (i, &(record, name, lifecycle)) in moved.iter().enumerate() {
                let target = format!("{package}/{}", lifecycle.subpath());
                let mut finding = Finding::report(
                    record.range.clone(),
                    format!("The {name} component must be imported from {target}."),
                );
                if fixable && i == 0 {
                    finding = finding.with_fix(SourceEdit::new(decl.source.value_range(), target));
                }
                findings.push(finding);
            }
        }
        Ok(findings)
    }
}
