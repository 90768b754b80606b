//! arrow-spacing rule implementation.
//!
//! Checks the whitespace on both sides of an arrow function's `=>`.
//!
//! ESLint equivalent: `arrow-spacing`.

use serde_json::Value;
use stylint_diagnostics::{Diagnostic, Edit, Fix, FixAvailability, Violation};
use stylint_js_cst::CstNode;
use stylint_text_size::{TextRange, TextSize};

use crate::{CheckContext, FromConfig, Rule, RuleOptions};

/// Violation: a required space around `=>` is missing.
#[derive(Debug, Clone)]
pub struct MissingArrowSpace {
    pub before: bool,
}

impl Violation for MissingArrowSpace {
    const FIX_AVAILABILITY: FixAvailability = FixAvailability::Always;

    fn message(&self) -> String {
        if self.before {
            "Missing space before =>.".to_string()
        } else {
            "Missing space after =>.".to_string()
        }
    }
}

/// Violation: a forbidden space around `=>` is present.
#[derive(Debug, Clone)]
pub struct UnexpectedArrowSpace {
    pub before: bool,
}

impl Violation for UnexpectedArrowSpace {
    const FIX_AVAILABILITY: FixAvailability = FixAvailability::Always;

    fn message(&self) -> String {
        if self.before {
            "Unexpected space before =>.".to_string()
        } else {
            "Unexpected space after =>.".to_string()
        }
    }
}

/// Configuration for the arrow-spacing rule.
#[derive(Debug, Clone)]
pub struct ArrowSpacing {
    /// Require a space before `=>` (forbid it when false).
    pub before: bool,
    /// Require a space after `=>` (forbid it when false).
    pub after: bool,
}

const RELEVANT_KINDS: &[&str] = &["arrow_function"];

impl Default for ArrowSpacing {
    fn default() -> Self {
        Self {
            before: true,
            after: true,
        }
    }
}

impl FromConfig for ArrowSpacing {
    const RULE_NAME: &'static str = "arrow-spacing";

    fn from_config(options: &RuleOptions) -> Self {
        let defaults = Self::default();
        let Some(Value::Object(map)) = options.first() else {
            return defaults;
        };
        Self {
            before: map
                .get("before")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.before),
            after: map
                .get("after")
                .and_then(Value::as_bool)
                .unwrap_or(defaults.after),
        }
    }
}

impl Rule for ArrowSpacing {
    fn name(&self) -> &'static str {
        "arrow-spacing"
    }

    fn relevant_kinds(&self) -> &'static [&'static str] {
        RELEVANT_KINDS
    }

    fn check(&self, ctx: &CheckContext, node: &CstNode) -> Vec<Diagnostic> {
        if node.kind() != "arrow_function" {
            return vec![];
        }

        let Some(arrow) = node.children().find(|c| c.kind() == "=>") else {
            return vec![];
        };

        let mut diagnostics = Vec::new();

        if let Some(prev) = arrow.prev_sibling() {
            let gap = TextRange::new(prev.range().end(), arrow.range().start());
            diagnostics.extend(check_gap(ctx, gap, self.before, true));
        }
        if let Some(next) = arrow.next_sibling() {
            let gap = TextRange::new(arrow.range().end(), next.range().start());
            diagnostics.extend(check_gap(ctx, gap, self.after, false));
        }

        diagnostics
    }
}

fn check_gap(
    ctx: &CheckContext,
    gap: TextRange,
    want_space: bool,
    before: bool,
) -> Option<Diagnostic> {
    let text = ctx.text_at(gap);
    // Arrows broken across lines are indentation's business, not spacing's.
    if text.contains('\n') {
        return None;
    }

    if want_space && text.is_empty() {
        let fix = Fix::safe_edit(Edit::insertion(" ".to_string(), gap.start()));
        let at = TextRange::new(gap.start(), gap.start() + TextSize::new(2));
        Some(Diagnostic::new(MissingArrowSpace { before }, at).with_fix(fix))
    } else if !want_space && !text.is_empty() {
        let fix = Fix::safe_edit(Edit::range_deletion(gap));
        Some(Diagnostic::new(UnexpectedArrowSpace { before }, gap).with_fix(fix))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylint_js_parser::JsParser;

    fn check_source(source: &str, rule: &ArrowSpacing) -> Vec<Diagnostic> {
        let mut parser = JsParser::new();
        let result = parser.parse(source).expect("parse");
        let ctx = CheckContext::new(source);
        let mut diagnostics = Vec::new();
        for node in stylint_js_cst::TreeWalker::new(result.tree.root_node(), source) {
            if node.kind() == "arrow_function" {
                diagnostics.extend(rule.check(&ctx, &node));
            }
        }
        diagnostics
    }

    #[test]
    fn test_default_accepts_spaced_arrow() {
        let diagnostics = check_source("const f = (a) => a + 1;", &ArrowSpacing::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_missing_space_before() {
        let diagnostics = check_source("const f = (a)=> a;", &ArrowSpacing::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind.body, "Missing space before =>.");
        let edit = &diagnostics[0].fix.as_ref().unwrap().edits()[0];
        assert!(edit.is_insertion());
        assert_eq!(edit.content(), Some(" "));
    }

    #[test]
    fn test_missing_space_after() {
        let diagnostics = check_source("const f = (a) =>a;", &ArrowSpacing::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind.body, "Missing space after =>.");
    }

    #[test]
    fn test_forbidden_spaces() {
        let rule = ArrowSpacing {
            before: false,
            after: false,
        };
        let diagnostics = check_source("const f = (a) => a;", &rule);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .all(|d| d.fix.as_ref().unwrap().edits()[0].is_deletion()));
        assert!(check_source("const f = (a)=>a;", &rule).is_empty());
    }

    #[test]
    fn test_multiline_arrow_not_reported() {
        let diagnostics = check_source("const f = (a) =>\n    a;", &ArrowSpacing::default());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_from_config() {
        let rule =
            ArrowSpacing::from_config(&[serde_json::json!({ "before": false, "after": true })]);
        assert!(!rule.before);
        assert!(rule.after);
    }
}
