//! Construct visitors: populate the offset graph from the CST.
//!
//! The tree is walked pre-order, so a parent claims its token ranges before
//! its children refine them. Because descriptors overwrite on set, the
//! innermost construct's claim on a token always wins.

use stylint_js_cst::CstNode;

use super::offsets::OffsetTable;
use super::options::{ElementOption, IndentOptions, MemberExpressionOption};
use super::tokens::TokenStream;

pub(super) fn populate(
    root: &CstNode,
    stream: &TokenStream,
    table: &mut OffsetTable,
    options: &IndentOptions,
) {
    visit(root, stream, table, options);
}

fn visit(node: &CstNode, stream: &TokenStream, table: &mut OffsetTable, options: &IndentOptions) {
    match node.kind() {
        "program" => {
            for child in node.named_children() {
                anchor_contents(&child, stream, table);
            }
        }
        "statement_block" => handle_block(node, stream, table, options),
        "class_body" => handle_braced_list(node, stream, table, ElementOption::Fixed(1)),
        "switch_body" => {
            handle_braced_list(node, stream, table, ElementOption::Fixed(options.switch_case));
        }
        "switch_case" | "switch_default" => handle_switch_case(node, stream, table),
        "object" | "object_pattern" => {
            handle_braced_list(node, stream, table, options.object_properties);
        }
        "array" | "array_pattern" => {
            handle_braced_list(node, stream, table, options.array_elements);
        }
        "arguments" => handle_braced_list(node, stream, table, options.call_arguments),
        "formal_parameters" => {
            let option = match node.parent().map(|p| p.kind()) {
                Some("function_declaration" | "generator_function_declaration") => {
                    options.function_declaration.parameters
                }
                _ => options.function_expression.parameters,
            };
            handle_braced_list(node, stream, table, option);
        }
        "named_imports" => handle_braced_list(node, stream, table, options.import_specifiers),
        "parenthesized_expression" | "jsx_expression" => {
            handle_braced_list(node, stream, table, ElementOption::Fixed(1));
        }
        "ternary_expression" => handle_ternary(node, stream, table, options),
        "member_expression" | "subscript_expression" => {
            handle_member(node, stream, table, options);
        }
        "variable_declaration" | "lexical_declaration" => {
            handle_variable_declaration(node, stream, table, options);
        }
        "variable_declarator" => handle_declarator(node, stream, table),
        "binary_expression" => handle_binary(node, stream, table),
        "template_string" => handle_template(node, stream, table),
        "jsx_element" => handle_jsx_element(node, stream, table),
        "jsx_fragment" => handle_jsx_fragment(node, stream, table),
        "jsx_opening_element" | "jsx_self_closing_element" => {
            handle_jsx_opening(node, stream, table);
        }
        "if_statement" => handle_if(node, stream, table),
        "else_clause" => handle_else(node, stream, table),
        "for_statement" | "for_in_statement" | "while_statement" | "labeled_statement" => {
            handle_single_body(node, "body", stream, table);
        }
        "do_statement" => handle_single_body(node, "body", stream, table),
        _ => {}
    }

    for child in node.children() {
        visit(&child, stream, table, options);
    }
}

/// First non-comment token index of a node.
fn tok(node: &CstNode, stream: &TokenStream) -> Option<usize> {
    stream.first_in(node.range())
}

/// Token index of an exact-position leaf such as a delimiter.
fn leaf_tok(node: &CstNode, stream: &TokenStream) -> Option<usize> {
    stream.at_start(node.range().start())
}

/// Tie every token of a node after its first to that first token, so
/// continuation lines of an unhandled construct match the construct's own
/// indent until an inner visitor claims them.
fn anchor_contents(node: &CstNode, stream: &TokenStream, table: &mut OffsetTable) {
    let Some(first) = tok(node, stream) else { return };
    let span = stream.token_span(node.range());
    table.set_offset_range(first + 1..span.end, first, 0);
}

/// A delimited element list: `{...}`, `(...)`, `[...]` and friends.
/// Elements are the node's named children strictly between the delimiters.
fn handle_braced_list(
    node: &CstNode,
    stream: &TokenStream,
    table: &mut OffsetTable,
    option: ElementOption,
) {
    let children: Vec<CstNode> = node.children().collect();
    let Some(left) = children.first() else { return };
    let Some(right) = children.last() else { return };
    let elements: Vec<&CstNode> = children
        .iter()
        .skip(1)
        .take(children.len().saturating_sub(2))
        .filter(|c| c.is_named() && c.kind() != "comment")
        .collect();
    element_list(stream, table, left, right, &elements, option);
}

fn element_list(
    stream: &TokenStream,
    table: &mut OffsetTable,
    left: &CstNode,
    right: &CstNode,
    elements: &[&CstNode],
    option: ElementOption,
) {
    let Some(left_tok) = leaf_tok(left, stream) else { return };
    let Some(right_tok) = leaf_tok(right, stream) else { return };
    let inner = left_tok + 1..right_tok;

    match option {
        ElementOption::Off => {
            table.ignore_range(inner);
        }
        ElementOption::Fixed(amount) => {
            table.set_offset_range(inner, left_tok, amount);
            for element in elements {
                anchor_contents(element, stream, table);
            }
        }
        ElementOption::First => {
            table.set_offset_range(inner, left_tok, 1);
            for element in elements {
                anchor_contents(element, stream, table);
            }
            if let Some(first_elem_tok) = elements.first().and_then(|e| tok(e, stream)) {
                for element in &elements[1..] {
                    if let Some(elem_tok) = tok(element, stream) {
                        table.align_under(elem_tok, first_elem_tok);
                    }
                }
            }
        }
    }

    table.lock(right_tok, left_tok);
}

/// Statement blocks: body indent depends on what owns the block.
fn handle_block(node: &CstNode, stream: &TokenStream, table: &mut OffsetTable, options: &IndentOptions) {
    let amount = match node.parent() {
        Some(parent) if parent.kind() == "class_static_block" => options.static_block_body,
        Some(parent) if is_function(&parent) => {
            if is_outer_iife(&parent) {
                match options.outer_iife_body {
                    MemberExpressionOption::Fixed(n) => n,
                    MemberExpressionOption::Off => {
                        ignore_block_interior(node, stream, table);
                        return;
                    }
                }
            } else if parent.kind() == "function_declaration"
                || parent.kind() == "generator_function_declaration"
            {
                options.function_declaration.body
            } else {
                options.function_expression.body
            }
        }
        _ => 1,
    };
    handle_braced_list(node, stream, table, ElementOption::Fixed(amount));
}

fn ignore_block_interior(node: &CstNode, stream: &TokenStream, table: &mut OffsetTable) {
    let children: Vec<CstNode> = node.children().collect();
    let (Some(left), Some(right)) = (children.first(), children.last()) else {
        return;
    };
    let (Some(left_tok), Some(right_tok)) = (leaf_tok(left, stream), leaf_tok(right, stream))
    else {
        return;
    };
    table.ignore_range(left_tok + 1..right_tok);
    table.lock(right_tok, left_tok);
}

fn is_function(node: &CstNode) -> bool {
    matches!(
        node.kind(),
        "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "generator_function"
            | "arrow_function"
            | "method_definition"
    )
}

/// An IIFE whose call sits in statement position at the top level.
fn is_outer_iife(func: &CstNode) -> bool {
    if !matches!(
        func.kind(),
        "function_expression" | "generator_function" | "arrow_function"
    ) {
        return false;
    }
    let Some(mut wrapper) = func.parent() else {
        return false;
    };
    if wrapper.kind() == "parenthesized_expression" {
        match wrapper.parent() {
            Some(p) => wrapper = p,
            None => return false,
        }
    }
    if wrapper.kind() != "call_expression" {
        return false;
    }
    let mut up = wrapper.parent();
    while let Some(n) = &up {
        match n.kind() {
            "parenthesized_expression" | "unary_expression" | "assignment_expression"
            | "sequence_expression" => up = n.parent(),
            _ => break,
        }
    }
    match up {
        Some(n) if n.kind() == "expression_statement" => {
            n.parent().is_some_and(|p| p.kind() == "program")
        }
        Some(n) if n.kind() == "variable_declarator" => n
            .parent()
            .and_then(|decl| decl.parent())
            .is_some_and(|p| p.kind() == "program"),
        _ => false,
    }
}

/// Case clauses: statements indent one unit past the `case` keyword, unless
/// the clause body is a single block (whose braces align with `case`).
fn handle_switch_case(node: &CstNode, stream: &TokenStream, table: &mut OffsetTable) {
    let Some(case_tok) = tok(node, stream) else { return };
    let children: Vec<CstNode> = node.children().collect();
    let Some(colon_pos) = children.iter().position(|c| c.kind() == ":") else {
        return;
    };
    let statements: Vec<&CstNode> = children[colon_pos + 1..]
        .iter()
        .filter(|c| c.is_named() && c.kind() != "comment")
        .collect();

    let amount = if statements.len() == 1 && statements[0].kind() == "statement_block" {
        0
    } else {
        1
    };

    let Some(colon_tok) = leaf_tok(&children[colon_pos], stream) else {
        return;
    };
    let span = stream.token_span(node.range());
    table.set_offset_range(colon_tok + 1..span.end, case_tok, amount);
    for statement in statements {
        anchor_contents(statement, stream, table);
    }
}

fn handle_ternary(
    node: &CstNode,
    stream: &TokenStream,
    table: &mut OffsetTable,
    options: &IndentOptions,
) {
    if options.flat_ternary_expressions {
        if let Some(parent) = node.parent() {
            if parent.kind() == "ternary_expression" {
                let is_alternative = parent
                    .child_by_field_name("alternative")
                    .is_some_and(|alt| alt.range() == node.range());
                if is_alternative {
                    return;
                }
            }
        }
    }

    let Some(condition) = node.child_by_field_name("condition") else {
        return;
    };
    let Some(first_tok) = tok(&condition, stream) else { return };

    for child in node.children() {
        if matches!(child.kind(), "?" | ":") {
            if let Some(t) = leaf_tok(&child, stream) {
                table.set_offset(t, first_tok, 1);
            }
        }
    }

    let amount = if options.offset_ternary_expressions { 2 } else { 1 };
    for field in ["consequence", "alternative"] {
        if let Some(branch) = node.child_by_field_name(field) {
            let span = stream.token_span(branch.range());
            table.set_offset_range(span, first_tok, amount);
            anchor_contents(&branch, stream, table);
        }
    }
}

/// Member and subscript access: the accessor tokens hang off the first token
/// of the whole chain.
fn handle_member(
    node: &CstNode,
    stream: &TokenStream,
    table: &mut OffsetTable,
    options: &IndentOptions,
) {
    let Some(anchor) = tok(node, stream) else { return };
    let children: Vec<CstNode> = node.children().collect();

    match options.member_expression {
        MemberExpressionOption::Fixed(amount) => {
            if node.kind() == "member_expression" {
                for child in &children {
                    if matches!(child.kind(), "." | "?.") {
                        if let Some(t) = leaf_tok(child, stream) {
                            table.set_offset(t, anchor, amount);
                        }
                    }
                }
                if let Some(property) = node.child_by_field_name("property") {
                    if let Some(t) = leaf_tok(&property, stream) {
                        table.set_offset(t, anchor, amount);
                    }
                }
            } else {
                // subscript: `[` hangs off the chain, contents hang off `[`
                let bracket = children.iter().find(|c| c.kind() == "[");
                let Some(bracket_tok) = bracket.and_then(|b| leaf_tok(b, stream)) else {
                    return;
                };
                table.set_offset(bracket_tok, anchor, amount);
                let span = stream.token_span(node.range());
                table.set_offset_range(bracket_tok + 1..span.end, bracket_tok, 1);
                if let Some(close) = children.iter().rfind(|c| c.kind() == "]") {
                    if let Some(t) = leaf_tok(close, stream) {
                        table.lock(t, bracket_tok);
                    }
                }
            }
        }
        MemberExpressionOption::Off => {
            for child in &children {
                if matches!(child.kind(), "." | "?." | "[" | "]") {
                    if let Some(t) = leaf_tok(child, stream) {
                        table.ignore(t);
                    }
                }
            }
            if let Some(property) = node.child_by_field_name("property") {
                if let Some(t) = leaf_tok(&property, stream) {
                    table.ignore(t);
                }
            }
        }
    }
}

fn handle_variable_declaration(
    node: &CstNode,
    stream: &TokenStream,
    table: &mut OffsetTable,
    options: &IndentOptions,
) {
    let Some(kw_tok) = tok(node, stream) else { return };
    let keyword = stream.token(kw_tok).kind;
    let option = options.variable_declarator.for_keyword(keyword);

    let span = stream.token_span(node.range());
    let declarators: Vec<CstNode> = node
        .named_children()
        .filter(|c| c.kind() == "variable_declarator")
        .collect();

    match option {
        ElementOption::Off => {
            table.ignore_range(kw_tok + 1..span.end);
            return;
        }
        ElementOption::Fixed(amount) => {
            table.set_offset_range(kw_tok + 1..span.end, kw_tok, amount);
            for declarator in &declarators {
                anchor_contents(declarator, stream, table);
            }
        }
        ElementOption::First => {
            table.set_offset_range(kw_tok + 1..span.end, kw_tok, 1);
            for declarator in &declarators {
                anchor_contents(declarator, stream, table);
            }
            if let Some(first_tok) = declarators.first().and_then(|d| tok(d, stream)) {
                for declarator in &declarators[1..] {
                    if let Some(t) = tok(declarator, stream) {
                        table.align_under(t, first_tok);
                    }
                }
            }
        }
    }

    // The statement terminator stays level with the keyword.
    if let Some(semi) = node.children().filter(|c| c.kind() == ";").last() {
        if let Some(t) = leaf_tok(&semi, stream) {
            table.lock(t, kw_tok);
        }
    }
}

/// Declarator initializers indent one unit past the declarator; the `=`
/// stays level with the name.
fn handle_declarator(node: &CstNode, stream: &TokenStream, table: &mut OffsetTable) {
    let Some(first_tok) = tok(node, stream) else { return };
    if let Some(value) = node.child_by_field_name("value") {
        let span = stream.token_span(value.range());
        table.set_offset_range(span, first_tok, 1);
        anchor_contents(&value, stream, table);
    }
    if let Some(eq) = node.children().find(|c| c.kind() == "=") {
        if let Some(t) = leaf_tok(&eq, stream) {
            table.lock(t, first_tok);
        }
    }
}

/// Operator continuations are indent-exempt: a line may start with the
/// operator or with the right-hand operand at whatever indent it has.
fn handle_binary(node: &CstNode, stream: &TokenStream, table: &mut OffsetTable) {
    if let Some(operator) = node.child_by_field_name("operator") {
        if let Some(t) = leaf_tok(&operator, stream) {
            table.ignore(t);
        }
    }
    if let Some(right) = node.child_by_field_name("right") {
        if let Some(t) = tok(&right, stream) {
            table.ignore(t);
        }
    }
}

fn handle_template(node: &CstNode, stream: &TokenStream, table: &mut OffsetTable) {
    let Some(template_tok) = tok(node, stream) else { return };
    let source_span = stream.token_span(node.range());

    for idx in source_span {
        if matches!(stream.token(idx).kind, "`" | "string_fragment") {
            table.ignore(idx);
        }
    }

    for child in node.named_children() {
        if child.kind() != "template_substitution" {
            continue;
        }
        let children: Vec<CstNode> = child.children().collect();
        let open = children.iter().find(|c| c.kind() == "${");
        let close = children.iter().rfind(|c| c.kind() == "}");
        let (Some(open_tok), Some(close_tok)) = (
            open.and_then(|c| leaf_tok(c, stream)),
            close.and_then(|c| leaf_tok(c, stream)),
        ) else {
            continue;
        };
        table.set_offset_range(open_tok + 1..close_tok, open_tok, 1);
        table.lock(close_tok, open_tok);

        // `${` on the template's first line follows the template; one that
        // trails a multi-line fragment keeps whatever indent it has.
        if stream.same_line(open_tok, template_tok) {
            table.lock(open_tok, template_tok);
        } else {
            table.ignore(open_tok);
        }
    }
}

fn handle_jsx_element(node: &CstNode, stream: &TokenStream, table: &mut OffsetTable) {
    let children: Vec<CstNode> = node.children().collect();
    let opening = children.iter().find(|c| c.kind() == "jsx_opening_element");
    let closing = children.iter().rfind(|c| c.kind() == "jsx_closing_element");
    let (Some(opening), Some(closing)) = (opening, closing) else {
        return;
    };
    let Some(anchor) = leaf_tok(opening, stream) else { return };

    let inner_range = stylint_text_size::TextRange::new(opening.range().end(), closing.range().start());
    let inner = stream.token_span(inner_range);
    table.set_offset_range(inner.clone(), anchor, 1);
    for idx in inner {
        if stream.token(idx).kind == "jsx_text" {
            table.ignore(idx);
        }
    }
    for child in &children {
        if child.is_named() && child.kind() != "jsx_opening_element" && child.kind() != "jsx_closing_element" {
            anchor_contents(child, stream, table);
        }
    }

    let closing_span = stream.token_span(closing.range());
    table.set_offset_range(closing_span, anchor, 0);
}

fn handle_jsx_fragment(node: &CstNode, stream: &TokenStream, table: &mut OffsetTable) {
    let span = stream.token_span(node.range());
    if span.len() < 5 {
        return;
    }
    let anchor = span.start;
    // `<` `>` ... `<` `/` `>`
    let closing_start = span.end - 3;
    let inner = anchor + 2..closing_start;
    table.set_offset_range(inner.clone(), anchor, 1);
    for idx in inner {
        if stream.token(idx).kind == "jsx_text" {
            table.ignore(idx);
        }
    }
    for child in node.named_children() {
        anchor_contents(&child, stream, table);
    }
    table.lock(anchor + 1, anchor);
    table.set_offset_range(closing_start..span.end, anchor, 0);
}

/// Opening (or self-closing) tags: attributes indent one unit past `<`; the
/// closing punctuation returns to the `<` indent.
fn handle_jsx_opening(node: &CstNode, stream: &TokenStream, table: &mut OffsetTable) {
    let span = stream.token_span(node.range());
    let Some(anchor) = stream.at_start(node.range().start()) else {
        return;
    };
    table.set_offset_range(anchor + 1..span.end, anchor, 1);
    for child in node.children() {
        if child.kind() == "jsx_attribute" {
            anchor_contents(&child, stream, table);
        }
        // A self-closing tag ends in a single `/>` token.
        if matches!(child.kind(), ">" | "/" | "/>") {
            if let Some(t) = leaf_tok(&child, stream) {
                table.lock(t, anchor);
            }
        }
    }
}

fn handle_if(node: &CstNode, stream: &TokenStream, table: &mut OffsetTable) {
    let Some(if_tok) = tok(node, stream) else { return };
    if let Some(consequence) = node.child_by_field_name("consequence") {
        if consequence.kind() != "statement_block" {
            let span = stream.token_span(consequence.range());
            table.set_offset_range(span, if_tok, 1);
            anchor_contents(&consequence, stream, table);
        }
    }
}

fn handle_else(node: &CstNode, stream: &TokenStream, table: &mut OffsetTable) {
    let Some(else_tok) = tok(node, stream) else { return };
    let Some(body) = node.named_children().next() else { return };
    match body.kind() {
        // `else if` and `else {` stay level with the else
        "statement_block" | "if_statement" => {}
        _ => {
            let span = stream.token_span(body.range());
            table.set_offset_range(span, else_tok, 1);
            anchor_contents(&body, stream, table);
        }
    }
}

/// Loops and labels: a braceless body indents one unit past the statement.
fn handle_single_body(node: &CstNode, field: &str, stream: &TokenStream, table: &mut OffsetTable) {
    let Some(first_tok) = tok(node, stream) else { return };
    let Some(body) = node.child_by_field_name(field) else {
        return;
    };
    if body.kind() != "statement_block" {
        let span = stream.token_span(body.range());
        table.set_offset_range(span, first_tok, 1);
        anchor_contents(&body, stream, table);
    }
}
