//! End-to-end tests running configured rule sets over a file, including
//! suppression directives, the way the CLI drives the linter.

use serde_json::json;
use stylint_config::{MergedConfig, RcConfig};
use stylint_js_cst::{CstNode, TreeWalker};
use stylint_js_parser::JsParser;
use stylint_linter::{CheckContext, Rule, RuleRegistry, SuppressionContext};

/// Build rules from a .stylintrc.json snippet and lint, honoring
/// suppression comments. Returns (rule name, 1-indexed line) pairs.
fn lint_with_config(source: &str, rc_json: &str) -> Vec<(String, usize)> {
    let rc = RcConfig::parse(rc_json).expect("rules config");
    let merged = MergedConfig::new(&rc, None);
    let registry = RuleRegistry::builtin();

    let rules: Vec<Box<dyn Rule>> = merged
        .enabled_rules()
        .filter_map(|configured| registry.create_rule(&configured.name, &configured.options))
        .collect();

    let mut parser = JsParser::new();
    let result = parser.parse(source).expect("parse");
    let ctx = CheckContext::new(source);
    let suppressions = SuppressionContext::from_source(source);
    let root = CstNode::new(result.tree.root_node(), source);

    let mut found = Vec::new();
    for node in TreeWalker::new(root.inner(), source) {
        for rule in &rules {
            let kinds = rule.relevant_kinds();
            if !kinds.is_empty() && !kinds.contains(&node.kind()) {
                continue;
            }
            for diagnostic in rule.check(&ctx, &node) {
                if suppressions.is_suppressed(rule.name(), diagnostic.range.start()) {
                    continue;
                }
                let line = ctx
                    .source_code()
                    .line_column(diagnostic.range.start())
                    .line
                    .get();
                found.push((rule.name().to_string(), line));
            }
        }
    }
    found.sort();
    found
}

const FULL_CONFIG: &str = r#"{
    "rules": {
        "indent": ["error", 4],
        "arrow-spacing": "error",
        "jsx-sort-props": "warn",
        "jsx-tag-spacing": ["error", { "beforeSelfClosing": "always" }]
    }
}"#;

#[test]
fn test_multiple_rules_report_together() {
    let source = "const f = (a)=> a;\nif (x) {\n  f(1);\n}\n";
    let found = lint_with_config(source, FULL_CONFIG);
    assert_eq!(
        found,
        vec![
            ("arrow-spacing".to_string(), 1),
            ("indent".to_string(), 3),
        ]
    );
}

#[test]
fn test_jsx_rules_together() {
    let source = "const x = <div beta=\"2\" alpha=\"1\"/>;\n";
    let found = lint_with_config(source, FULL_CONFIG);
    let names: Vec<&str> = found.iter().map(|(name, _)| name.as_str()).collect();
    assert!(names.contains(&"jsx-sort-props"));
    assert!(names.contains(&"jsx-tag-spacing"));
}

#[test]
fn test_severity_off_disables_rule() {
    let source = "const f = (a)=>a;\n";
    let config = r#"{ "rules": { "arrow-spacing": "off", "indent": ["error", 4] } }"#;
    assert!(lint_with_config(source, config).is_empty());
}

#[test]
fn test_disable_next_line_directive() {
    let source = "function f() {\n// eslint-disable-next-line indent\n  return 1;\n}\n";
    let config = r#"{ "rules": { "indent": ["error", 4] } }"#;
    assert!(lint_with_config(source, config).is_empty());

    let without = "function f() {\n  return 1;\n}\n";
    assert_eq!(lint_with_config(without, config).len(), 1);
}

#[test]
fn test_disable_enable_region() {
    let source = "/* eslint-disable indent */\nif (a) {\nb();\n}\n/* eslint-enable indent */\nif (c) {\nd();\n}\n";
    let config = r#"{ "rules": { "indent": ["error", 4] } }"#;
    let found = lint_with_config(source, config);
    assert_eq!(found, vec![("indent".to_string(), 7)]);
}

#[test]
fn test_disable_directive_scopes_by_rule_name() {
    // Disabling one rule must not silence another.
    let source = "// eslint-disable-next-line arrow-spacing\nconst f = (a)=>a;\n";
    let found = lint_with_config(source, FULL_CONFIG);
    assert!(found.is_empty());

    let other = "// eslint-disable-next-line indent\nconst f = (a)=> a;\n";
    let found = lint_with_config(other, FULL_CONFIG);
    assert_eq!(found, vec![("arrow-spacing".to_string(), 2)]);
}

#[test]
fn test_wildcard_disable() {
    let source = "/* eslint-disable */\nconst f = (a)=>a;\nif (x) {\n  f(1);\n}\n";
    assert!(lint_with_config(source, FULL_CONFIG).is_empty());
}

#[test]
fn test_options_flow_from_config() {
    let source = "switch (x) {\n    case 1:\n        break;\n}\n";
    let flush = r#"{ "rules": { "indent": ["error", 4] } }"#;
    let offset = r#"{ "rules": { "indent": ["error", 4, { "SwitchCase": 1 }] } }"#;
    assert!(!lint_with_config(source, flush).is_empty());
    assert!(lint_with_config(source, offset).is_empty());
}

#[test]
fn test_unknown_rule_is_skippable() {
    let registry = RuleRegistry::builtin();
    assert!(registry.create_rule("no-such-rule", &[json!(1)]).is_none());
    assert!(registry.has_rule("indent"));
    assert!(registry.has_rule("jsx-sort-props"));
}
