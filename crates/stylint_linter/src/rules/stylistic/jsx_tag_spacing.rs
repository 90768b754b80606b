//! jsx-tag-spacing rule implementation.
//!
//! Checks whitespace at fixed positions inside JSX tags: right after the
//! opening `<` and right before the `/>` of a self-closing tag.
//!
//! ESLint equivalent: `react/jsx-tag-spacing` (beforeSelfClosing and
//! afterOpening checks).

use serde_json::Value;
use stylint_diagnostics::{Diagnostic, Edit, Fix, FixAvailability, Violation};
use stylint_js_cst::CstNode;
use stylint_text_size::TextRange;

use crate::{CheckContext, FromConfig, Rule, RuleOptions};

#[derive(Debug, Clone)]
pub struct MissingSpaceBeforeSelfClosing;

impl Violation for MissingSpaceBeforeSelfClosing {
    const FIX_AVAILABILITY: FixAvailability = FixAvailability::Always;

    fn message(&self) -> String {
        "A space is required before closing bracket.".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct UnexpectedSpaceBeforeSelfClosing;

impl Violation for UnexpectedSpaceBeforeSelfClosing {
    const FIX_AVAILABILITY: FixAvailability = FixAvailability::Always;

    fn message(&self) -> String {
        "A space is forbidden before closing bracket.".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct UnexpectedSpaceAfterOpening;

impl Violation for UnexpectedSpaceAfterOpening {
    const FIX_AVAILABILITY: FixAvailability = FixAvailability::Always;

    fn message(&self) -> String {
        "A space is forbidden after opening bracket.".to_string()
    }
}

/// Whether a position requires or forbids a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpacePolicy {
    Always,
    Never,
}

impl SpacePolicy {
    fn parse(value: Option<&Value>, default: Self) -> Self {
        match value.and_then(Value::as_str) {
            Some("always") => Self::Always,
            Some("never") => Self::Never,
            _ => default,
        }
    }
}

/// Configuration for the jsx-tag-spacing rule.
#[derive(Debug, Clone)]
pub struct JsxTagSpacing {
    pub before_self_closing: SpacePolicy,
    pub after_opening: SpacePolicy,
}

const RELEVANT_KINDS: &[&str] = &["jsx_opening_element", "jsx_self_closing_element"];

impl Default for JsxTagSpacing {
    fn default() -> Self {
        Self {
            before_self_closing: SpacePolicy::Always,
            after_opening: SpacePolicy::Never,
        }
    }
}

impl FromConfig for JsxTagSpacing {
    const RULE_NAME: &'static str = "jsx-tag-spacing";

    fn from_config(options: &RuleOptions) -> Self {
        let defaults = Self::default();
        let Some(Value::Object(map)) = options.first() else {
            return defaults;
        };
        Self {
            before_self_closing: SpacePolicy::parse(
                map.get("beforeSelfClosing"),
                defaults.before_self_closing,
            ),
            after_opening: SpacePolicy::parse(map.get("afterOpening"), defaults.after_opening),
        }
    }
}

impl Rule for JsxTagSpacing {
    fn name(&self) -> &'static str {
        "jsx-tag-spacing"
    }

    fn relevant_kinds(&self) -> &'static [&'static str] {
        RELEVANT_KINDS
    }

    fn check(&self, ctx: &CheckContext, node: &CstNode) -> Vec<Diagnostic> {
        if !RELEVANT_KINDS.contains(&node.kind()) {
            return vec![];
        }

        let children: Vec<CstNode> = node.children().collect();
        let mut diagnostics = Vec::new();

        if let Some(angle) = children.iter().position(|c| c.kind() == "<") {
            if let Some(name) = children.get(angle + 1) {
                let gap = TextRange::new(
                    children[angle].range().end(),
                    name.range().start(),
                );
                diagnostics.extend(check_after_opening(ctx, gap, self.after_opening));
            }
        }

        if node.kind() == "jsx_self_closing_element" {
            // The closer is a single `/>` token.
            if let Some(closer) = children.iter().position(|c| c.kind() == "/>") {
                if closer > 0 {
                    let gap = TextRange::new(
                        children[closer - 1].range().end(),
                        children[closer].range().start(),
                    );
                    diagnostics.extend(check_before_self_closing(
                        ctx,
                        gap,
                        self.before_self_closing,
                    ));
                }
            }
        }

        diagnostics
    }
}

fn check_after_opening(
    ctx: &CheckContext,
    gap: TextRange,
    policy: SpacePolicy,
) -> Option<Diagnostic> {
    let text = ctx.text_at(gap);
    match policy {
        SpacePolicy::Never if !text.is_empty() => {
            let fix = Fix::safe_edit(Edit::range_deletion(gap));
            Some(Diagnostic::new(UnexpectedSpaceAfterOpening, gap).with_fix(fix))
        }
        _ => None,
    }
}

fn check_before_self_closing(
    ctx: &CheckContext,
    gap: TextRange,
    policy: SpacePolicy,
) -> Option<Diagnostic> {
    let text = ctx.text_at(gap);
    // A tag closed on its own line is left to the indent rule.
    if text.contains('\n') {
        return None;
    }
    match policy {
        SpacePolicy::Always if text.is_empty() => {
            let fix = Fix::safe_edit(Edit::insertion(" ".to_string(), gap.start()));
            Some(Diagnostic::new(MissingSpaceBeforeSelfClosing, gap).with_fix(fix))
        }
        SpacePolicy::Never if !text.is_empty() => {
            let fix = Fix::safe_edit(Edit::range_deletion(gap));
            Some(Diagnostic::new(UnexpectedSpaceBeforeSelfClosing, gap).with_fix(fix))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylint_js_parser::JsParser;

    fn check_source(source: &str, rule: &JsxTagSpacing) -> Vec<Diagnostic> {
        let mut parser = JsParser::new();
        let result = parser.parse(source).expect("parse");
        let ctx = CheckContext::new(source);
        let mut diagnostics = Vec::new();
        for node in stylint_js_cst::TreeWalker::new(result.tree.root_node(), source) {
            if RELEVANT_KINDS.contains(&node.kind()) {
                diagnostics.extend(rule.check(&ctx, &node));
            }
        }
        diagnostics
    }

    #[test]
    fn test_default_accepts_spaced_self_closing() {
        assert!(check_source("const x = <br />;", &JsxTagSpacing::default()).is_empty());
    }

    #[test]
    fn test_missing_space_before_self_closing() {
        let diagnostics = check_source("const x = <br/>;", &JsxTagSpacing::default());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].kind.body,
            "A space is required before closing bracket."
        );
        assert!(diagnostics[0].fix.as_ref().unwrap().edits()[0].is_insertion());
    }

    #[test]
    fn test_forbidden_space_before_self_closing() {
        let rule = JsxTagSpacing {
            before_self_closing: SpacePolicy::Never,
            after_opening: SpacePolicy::Never,
        };
        let diagnostics = check_source("const x = <br />;", &rule);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].kind.body,
            "A space is forbidden before closing bracket."
        );
    }

    #[test]
    fn test_space_after_opening_bracket() {
        let diagnostics = check_source("const x = < div>text</div>;", &JsxTagSpacing::default());
        assert!(!diagnostics.is_empty());
        assert_eq!(
            diagnostics[0].kind.body,
            "A space is forbidden after opening bracket."
        );
    }

    #[test]
    fn test_attributes_do_not_confuse_gap() {
        let source = "const x = <input type=\"text\" disabled />;";
        assert!(check_source(source, &JsxTagSpacing::default()).is_empty());
    }

    #[test]
    fn test_multiline_self_closing_left_alone() {
        let source = "const x = <input\n    disabled\n/>;";
        assert!(check_source(source, &JsxTagSpacing::default()).is_empty());
    }

    #[test]
    fn test_from_config() {
        let rule = JsxTagSpacing::from_config(&[serde_json::json!({
            "beforeSelfClosing": "never",
            "afterOpening": "never"
        })]);
        assert_eq!(rule.before_self_closing, SpacePolicy::Never);
    }
}
