//! Node selectors for the `ignoredNodes` option.
//!
//! Supports a plain node name (`"ClassBody"`) or a direct-child chain
//! (`"CallExpression > ObjectExpression"`). Names may be ESTree node types,
//! which are aliased onto tree-sitter kinds, or raw tree-sitter kinds.

use stylint_js_cst::CstNode;

/// Map an ESTree node type onto the tree-sitter kinds it covers.
/// Unknown names pass through as literal tree-sitter kinds.
fn kinds_for(name: &str) -> Vec<String> {
    let kinds: &[&str] = match name {
        "Program" => &["program"],
        "BlockStatement" => &["statement_block"],
        "ClassBody" => &["class_body"],
        "StaticBlock" => &["class_static_block"],
        "ObjectExpression" => &["object"],
        "ObjectPattern" => &["object_pattern"],
        "ArrayExpression" => &["array"],
        "ArrayPattern" => &["array_pattern"],
        "CallExpression" => &["call_expression"],
        "NewExpression" => &["new_expression"],
        "MemberExpression" => &["member_expression", "subscript_expression"],
        "ConditionalExpression" => &["ternary_expression"],
        "BinaryExpression" | "LogicalExpression" => &["binary_expression"],
        "TemplateLiteral" => &["template_string"],
        "VariableDeclaration" => &["variable_declaration", "lexical_declaration"],
        "VariableDeclarator" => &["variable_declarator"],
        "FunctionDeclaration" => &["function_declaration"],
        "FunctionExpression" => &["function_expression"],
        "ArrowFunctionExpression" => &["arrow_function"],
        "SwitchStatement" => &["switch_statement"],
        "SwitchCase" => &["switch_case", "switch_default"],
        "IfStatement" => &["if_statement"],
        "ForStatement" => &["for_statement"],
        "ForInStatement" | "ForOfStatement" => &["for_in_statement"],
        "WhileStatement" => &["while_statement"],
        "DoWhileStatement" => &["do_statement"],
        "LabeledStatement" => &["labeled_statement"],
        "ImportDeclaration" => &["import_statement"],
        "ExportNamedDeclaration" | "ExportDefaultDeclaration" => &["export_statement"],
        "JSXElement" => &["jsx_element"],
        "JSXFragment" => &["jsx_fragment"],
        "JSXOpeningElement" => &["jsx_opening_element"],
        "JSXClosingElement" => &["jsx_closing_element"],
        "JSXAttribute" => &["jsx_attribute"],
        "JSXExpressionContainer" => &["jsx_expression"],
        _ => return vec![name.to_string()],
    };
    kinds.iter().map(|k| (*k).to_string()).collect()
}

/// The nearest ancestor that has an ESTree counterpart. Wrapper nodes that
/// only exist in the tree-sitter grammar are skipped so child chains match
/// the way they would against an ESTree AST.
fn effective_parent<'a>(node: &CstNode<'a>) -> Option<CstNode<'a>> {
    let mut current = node.parent();
    while let Some(parent) = current {
        if !matches!(parent.kind(), "arguments" | "formal_parameters") {
            return Some(parent);
        }
        current = parent.parent();
    }
    None
}

/// A parsed ignored-node selector.
#[derive(Debug, Clone)]
pub struct Selector {
    /// Kind alternatives per segment, outermost ancestor first. Each segment
    /// must be the direct parent of the next.
    segments: Vec<Vec<String>>,
}

impl Selector {
    pub fn parse(text: &str) -> Self {
        let segments = text
            .split('>')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(kinds_for)
            .collect();
        Self { segments }
    }

    /// Does `node` match this selector (checking its parent chain upward)?
    pub fn matches(&self, node: &CstNode) -> bool {
        let Some(last) = self.segments.last() else {
            return false;
        };
        if !last.iter().any(|k| k == node.kind()) {
            return false;
        }

        let mut current = effective_parent(node);
        for segment in self.segments.iter().rev().skip(1) {
            match current {
                Some(parent) if segment.iter().any(|k| k == parent.kind()) => {
                    current = effective_parent(&parent);
                }
                _ => return false,
            }
        }
        true
    }
}
