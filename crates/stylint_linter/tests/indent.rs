//! Scenario tests for the indent rule.
//!
//! Each scenario lints a small program and compares the flagged lines
//! (1-indexed) against the expectation.


use serde_json::{json, Value};
use stylint_js_cst::CstNode;
use stylint_js_parser::JsParser;
use stylint_linter::rules::Indent;
use stylint_linter::{CheckContext, FromConfig, Rule};
use test_harness::assert_violation_lines;

/// Lint `source` with the given indent options; return flagged lines.
fn violation_lines(source: &str, options: &[Value]) -> Vec<usize> {
    let rule = Indent::from_config(options);
    let mut parser = JsParser::new();
    let result = parser.parse(source).expect("parse");
    let ctx = CheckContext::new(source);
    let root = CstNode::new(result.tree.root_node(), source);

    let mut lines: Vec<usize> = rule
        .check(&ctx, &root)
        .iter()
        .map(|d| ctx.source_code().line_column(d.range.start()).line.get())
        .collect();
    lines.sort_unstable();
    lines.dedup();
    lines
}

fn default_lines(source: &str) -> Vec<usize> {
    violation_lines(source, &[json!(4)])
}

#[test]
fn test_object_argument_in_call() {
    let clean = "foo({\n    a: 1,\n    b: 2,\n});\n";
    assert_violation_lines("clean object argument", &[], &default_lines(clean));

    let messy = "foo({\n  a: 1,\n      b: 2,\n});\n";
    assert_violation_lines("messy object argument", &[2, 3], &default_lines(messy));
}

#[test]
fn test_nested_calls() {
    let source = "outer(\n    inner(\n        deep\n    )\n);\n";
    assert_violation_lines("nested calls", &[], &default_lines(source));
}

#[test]
fn test_switch_inside_function() {
    let source = "function f(x) {\n    switch (x) {\n    case 1:\n        return 1;\n    default:\n        return 0;\n    }\n}\n";
    assert_violation_lines("flush switch cases", &[], &default_lines(source));

    let indented = "function f(x) {\n    switch (x) {\n        case 1:\n            return 1;\n    }\n}\n";
    assert_violation_lines(
        "SwitchCase: 1",
        &[],
        &violation_lines(indented, &[json!(4), json!({"SwitchCase": 1})]),
    );
    assert_violation_lines("SwitchCase default rejects", &[3, 4], &default_lines(indented));
}

#[test]
fn test_member_chain() {
    let clean = "const result = foo\n    .bar()\n    .baz();\n";
    assert_violation_lines("member chain", &[], &default_lines(clean));

    let messy = "const result = foo\n    .bar()\n        .baz();\n";
    assert_violation_lines("over-indented chain link", &[3], &default_lines(messy));

    let deep = "const result = foo\n        .bar()\n        .baz();\n";
    assert_violation_lines(
        "MemberExpression: 2",
        &[],
        &violation_lines(deep, &[json!(4), json!({"MemberExpression": 2})]),
    );
}

#[test]
fn test_ternary_branches() {
    let source = "const x = cond\n    ? a\n    : b;\n";
    assert_violation_lines("split ternary", &[], &default_lines(source));
}

#[test]
fn test_offset_ternary_expressions() {
    // Branch bodies sit one extra level past the `?`/`:` column.
    let source = "const x = cond ?\n        aaa :\n        bbb;\n";
    assert_violation_lines(
        "offsetTernaryExpressions on",
        &[],
        &violation_lines(
            source,
            &[json!(4), json!({"offsetTernaryExpressions": true})],
        ),
    );
    assert_violation_lines(
        "double offset rejected by default",
        &[2, 3],
        &default_lines(source),
    );
}

#[test]
fn test_nested_ternary_steps_in() {
    let source = "const x = a\n    ? b\n    : c\n        ? d\n        : e;\n";
    assert_violation_lines("nested ternary", &[], &default_lines(source));
}

#[test]
fn test_jsx_tree() {
    let source =
        "const el = (\n    <div>\n        <span>hi</span>\n    </div>\n);\n";
    assert_violation_lines("jsx tree", &[], &default_lines(source));

    let messy =
        "const el = (\n    <div>\n      <span>hi</span>\n    </div>\n);\n";
    assert_violation_lines("under-indented jsx child", &[3], &default_lines(messy));
}

#[test]
fn test_jsx_multiline_attributes() {
    let source = "const el = (\n    <input\n        type=\"text\"\n        disabled\n    />\n);\n";
    assert_violation_lines("jsx attributes", &[], &default_lines(source));
}

#[test]
fn test_jsx_self_closer_returns_to_tag_indent() {
    let messy = "const el = (\n    <input\n        type=\"text\"\n            />\n);\n";
    assert_violation_lines("over-indented self-closer", &[4], &default_lines(messy));
}

#[test]
fn test_template_literal_interior_is_free() {
    // Lines starting inside the template text carry no indent requirement.
    let source = "const s = `foo\nbar\n   baz`;\n";
    assert_violation_lines("template interior", &[], &default_lines(source));
}

#[test]
fn test_template_substitution() {
    let source = "const s = `head\n${\n    value\n}tail`;\n";
    assert_violation_lines("template substitution", &[], &default_lines(source));
}

#[test]
fn test_leading_semicolon_statement() {
    let source = "const a = 1\n;[1, 2].forEach(f);\n";
    assert_violation_lines("leading semicolon", &[], &default_lines(source));
}

#[test]
fn test_array_first_alignment() {
    let source = "const arr = [foo,\n             bar,\n             baz];\n";
    assert_violation_lines(
        "ArrayExpression: first",
        &[],
        &violation_lines(source, &[json!(4), json!({"ArrayExpression": "first"})]),
    );
    assert_violation_lines("first-aligned rejected by default", &[2, 3], &default_lines(source));
}

#[test]
fn test_outer_iife_body() {
    let source = "(function() {\nvar x = 1;\n})();\n";
    assert_violation_lines(
        "outerIIFEBody: 0",
        &[],
        &violation_lines(source, &[json!(4), json!({"outerIIFEBody": 0})]),
    );
    assert_violation_lines("iife body default", &[2], &default_lines(source));
    assert_violation_lines(
        "outerIIFEBody: off",
        &[],
        &violation_lines(source, &[json!(4), json!({"outerIIFEBody": "off"})]),
    );
}

#[test]
fn test_variable_declarator_keyword_offsets() {
    // const declarators continue at 3 units by convention `VariableDeclarator`.
    let source = "const a = 1,\n      b = 2;\n";
    assert_violation_lines(
        "VariableDeclarator first",
        &[],
        &violation_lines(
            source,
            &[json!(2), json!({"VariableDeclarator": "first"})],
        ),
    );
}

#[test]
fn test_declaration_terminator_locks_to_keyword() {
    // A terminator on its own line returns to the keyword's indent.
    let source = "const a = 1,\n    b = 2\n;\n";
    assert_violation_lines("terminator line", &[], &default_lines(source));

    let messy = "const a = 1,\n    b = 2\n    ;\n";
    assert_violation_lines("indented terminator", &[3], &default_lines(messy));
}

#[test]
fn test_first_alignment_follows_expected_anchor_position() {
    // Alignment is computed against where the first element should sit, so
    // a mis-indented opening line drags its aligned followers along with it.
    let source = "  const arr = [foo,\n               bar];\n";
    assert_violation_lines(
        "first alignment under mis-indented anchor",
        &[1, 2],
        &violation_lines(source, &[json!(4), json!({"ArrayExpression": "first"})]),
    );
}

#[test]
fn test_if_without_braces() {
    let source = "if (a)\n    b();\n";
    assert_violation_lines("braceless if", &[], &default_lines(source));

    let messy = "if (a)\nb();\n";
    assert_violation_lines("flush braceless body", &[2], &default_lines(messy));
}

#[test]
fn test_else_chain_stays_level() {
    let source = "if (a) {\n    b();\n} else if (c) {\n    d();\n} else {\n    e();\n}\n";
    assert_violation_lines("else chain", &[], &default_lines(source));
}

#[test]
fn test_deterministic_output() {
    let source = "function f() {\n  if (a) {\n   b();\n    }\n}\n";
    let first = default_lines(source);
    let second = default_lines(source);
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[test]
fn test_imports_and_exports() {
    let source = "import {\n    one,\n    two,\n} from 'mod';\n";
    assert_violation_lines("import specifiers", &[], &default_lines(source));
}

#[test]
fn test_binary_expression_continuation_is_free() {
    // Operator continuation lines accept any indent, matching how wrapped
    // conditions are conventionally aligned by hand.
    let source = "const ok = aaa &&\n           bbb;\n";
    assert_violation_lines("binary continuation", &[], &default_lines(source));
}
