//! jsx-sort-props rule implementation.
//!
//! Requires JSX attributes to be sorted alphabetically. A spread attribute
//! resets the ordering, matching how spreads override earlier props.
//!
//! ESLint equivalent: `react/jsx-sort-props` (ignoreCase and callbacksLast
//! options).

use serde_json::Value;
use stylint_diagnostics::{Diagnostic, Edit, Fix, FixAvailability, Violation};
use stylint_js_cst::CstNode;

use crate::{CheckContext, FromConfig, Rule, RuleOptions};

#[derive(Debug, Clone)]
pub struct UnsortedProp;

impl Violation for UnsortedProp {
    const FIX_AVAILABILITY: FixAvailability = FixAvailability::Always;

    fn message(&self) -> String {
        "Props should be sorted alphabetically.".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct CallbackPropNotLast;

impl Violation for CallbackPropNotLast {
    const FIX_AVAILABILITY: FixAvailability = FixAvailability::Always;

    fn message(&self) -> String {
        "Callbacks must be listed after all other props.".to_string()
    }
}

/// Configuration for the jsx-sort-props rule.
#[derive(Debug, Clone, Default)]
pub struct JsxSortProps {
    /// Compare names case-insensitively.
    pub ignore_case: bool,
    /// `onFoo` handlers sort after all other props.
    pub callbacks_last: bool,
}

const RELEVANT_KINDS: &[&str] = &["jsx_opening_element", "jsx_self_closing_element"];

impl FromConfig for JsxSortProps {
    const RULE_NAME: &'static str = "jsx-sort-props";

    fn from_config(options: &RuleOptions) -> Self {
        let Some(Value::Object(map)) = options.first() else {
            return Self::default();
        };
        Self {
            ignore_case: map
                .get("ignoreCase")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            callbacks_last: map
                .get("callbacksLast")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}

impl Rule for JsxSortProps {
    fn name(&self) -> &'static str {
        "jsx-sort-props"
    }

    fn relevant_kinds(&self) -> &'static [&'static str] {
        RELEVANT_KINDS
    }

    fn check(&self, _ctx: &CheckContext, node: &CstNode) -> Vec<Diagnostic> {
        if !RELEVANT_KINDS.contains(&node.kind()) {
            return vec![];
        }

        let mut diagnostics = Vec::new();
        // Spreads split the attribute list into independently sorted runs.
        let mut run: Vec<CstNode> = Vec::new();
        for child in node.children() {
            match child.kind() {
                "jsx_attribute" => run.push(child),
                "jsx_expression" => {
                    check_run(self, &run, &mut diagnostics);
                    run.clear();
                }
                _ => {}
            }
        }
        check_run(self, &run, &mut diagnostics);

        diagnostics
    }
}

fn attribute_name(attr: &CstNode) -> String {
    attr.children()
        .next()
        .map(|name| name.text().to_string())
        .unwrap_or_default()
}

fn is_callback(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('o')
        && chars.next() == Some('n')
        && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}

fn check_run(rule: &JsxSortProps, run: &[CstNode], diagnostics: &mut Vec<Diagnostic>) {
    for pair in run.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let mut prev_name = attribute_name(prev);
        let mut curr_name = attribute_name(curr);

        if rule.callbacks_last {
            match (is_callback(&prev_name), is_callback(&curr_name)) {
                (true, false) => {
                    diagnostics.push(swap_diagnostic(CallbackPropNotLast, prev, curr));
                    continue;
                }
                // A callback may follow anything; sorting applies within
                // each of the two groups separately.
                (false, true) => continue,
                _ => {}
            }
        }

        if rule.ignore_case {
            prev_name = prev_name.to_lowercase();
            curr_name = curr_name.to_lowercase();
        }
        if curr_name < prev_name {
            diagnostics.push(swap_diagnostic(UnsortedProp, prev, curr));
        }
    }
}

/// Report on the out-of-place attribute, fixing by swapping the pair.
fn swap_diagnostic(violation: impl Violation, prev: &CstNode, curr: &CstNode) -> Diagnostic {
    let fix = Fix::safe_edits(
        Edit::range_replacement(curr.text().to_string(), prev.range()),
        [Edit::range_replacement(prev.text().to_string(), curr.range())],
    );
    Diagnostic::new(violation, curr.range()).with_fix(fix)
}
