//! Option parsing and normalization for the indent rule.
//!
//! Raw JSON options are normalized once, at rule construction, into closed
//! sum types. Visitors branch on these types only, never on raw JSON.
//! Unrecognized or malformed entries fall back to their defaults.

use serde_json::Value;

use super::selectors::Selector;

/// The configured indentation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentUnit {
    Spaces(usize),
    Tab,
}

impl IndentUnit {
    /// Render `amount` units of indentation.
    pub fn render(self, amount: usize) -> String {
        match self {
            IndentUnit::Spaces(n) => " ".repeat(n * amount),
            IndentUnit::Tab => "\t".repeat(amount),
        }
    }
}

/// How the elements of a delimited list are indented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementOption {
    /// A fixed number of units past the line of the opening delimiter.
    Fixed(usize),
    /// Later elements align under the first element.
    First,
    /// Elements are not checked at all.
    Off,
}

impl ElementOption {
    fn parse(value: &Value, default: ElementOption) -> ElementOption {
        match value {
            Value::Number(n) => n
                .as_u64()
                .map(|n| ElementOption::Fixed(n as usize))
                .unwrap_or(default),
            Value::String(s) if s == "first" => ElementOption::First,
            Value::String(s) if s == "off" => ElementOption::Off,
            _ => default,
        }
    }
}

/// Per-keyword declarator indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableDeclaratorOptions {
    pub var: ElementOption,
    pub let_: ElementOption,
    pub const_: ElementOption,
}

impl Default for VariableDeclaratorOptions {
    fn default() -> Self {
        Self {
            var: ElementOption::Fixed(1),
            let_: ElementOption::Fixed(1),
            const_: ElementOption::Fixed(1),
        }
    }
}

impl VariableDeclaratorOptions {
    pub fn for_keyword(&self, keyword: &str) -> ElementOption {
        match keyword {
            "var" => self.var,
            "const" => self.const_,
            _ => self.let_,
        }
    }

    fn parse(value: &Value) -> Self {
        let default = Self::default();
        match value {
            Value::Object(map) => Self {
                var: map
                    .get("var")
                    .map(|v| ElementOption::parse(v, default.var))
                    .unwrap_or(default.var),
                let_: map
                    .get("let")
                    .map(|v| ElementOption::parse(v, default.let_))
                    .unwrap_or(default.let_),
                const_: map
                    .get("const")
                    .map(|v| ElementOption::parse(v, default.const_))
                    .unwrap_or(default.const_),
            },
            // A bare number or "first" applies to every keyword.
            other => {
                let all = ElementOption::parse(other, ElementOption::Fixed(1));
                Self {
                    var: all,
                    let_: all,
                    const_: all,
                }
            }
        }
    }
}

/// Parameter and body indentation for one function form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionIndentOptions {
    pub parameters: ElementOption,
    pub body: usize,
}

impl Default for FunctionIndentOptions {
    fn default() -> Self {
        Self {
            parameters: ElementOption::Fixed(1),
            body: 1,
        }
    }
}

impl FunctionIndentOptions {
    fn parse(value: &Value) -> Self {
        let default = Self::default();
        match value {
            Value::Object(map) => Self {
                parameters: map
                    .get("parameters")
                    .map(|v| ElementOption::parse(v, default.parameters))
                    .unwrap_or(default.parameters),
                body: map
                    .get("body")
                    .and_then(Value::as_u64)
                    .map(|n| n as usize)
                    .unwrap_or(default.body),
            },
            _ => default,
        }
    }
}

/// Member access indentation: fixed or unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberExpressionOption {
    Fixed(usize),
    Off,
}

/// Normalized options for the indent rule.
#[derive(Debug, Clone)]
pub struct IndentOptions {
    pub unit: IndentUnit,
    pub switch_case: usize,
    pub variable_declarator: VariableDeclaratorOptions,
    pub outer_iife_body: MemberExpressionOption,
    pub member_expression: MemberExpressionOption,
    pub function_declaration: FunctionIndentOptions,
    pub function_expression: FunctionIndentOptions,
    pub static_block_body: usize,
    pub call_arguments: ElementOption,
    pub array_elements: ElementOption,
    pub object_properties: ElementOption,
    pub import_specifiers: ElementOption,
    pub flat_ternary_expressions: bool,
    pub offset_ternary_expressions: bool,
    pub ignored_nodes: Vec<Selector>,
    pub ignore_comments: bool,
}

impl Default for IndentOptions {
    fn default() -> Self {
        Self {
            unit: IndentUnit::Spaces(4),
            switch_case: 0,
            variable_declarator: VariableDeclaratorOptions::default(),
            outer_iife_body: MemberExpressionOption::Fixed(1),
            member_expression: MemberExpressionOption::Fixed(1),
            function_declaration: FunctionIndentOptions::default(),
            function_expression: FunctionIndentOptions::default(),
            static_block_body: 1,
            call_arguments: ElementOption::Fixed(1),
            array_elements: ElementOption::Fixed(1),
            object_properties: ElementOption::Fixed(1),
            import_specifiers: ElementOption::Fixed(1),
            flat_ternary_expressions: false,
            offset_ternary_expressions: false,
            ignored_nodes: Vec::new(),
            ignore_comments: false,
        }
    }
}

fn parse_member_option(value: &Value, default: MemberExpressionOption) -> MemberExpressionOption {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|n| MemberExpressionOption::Fixed(n as usize))
            .unwrap_or(default),
        Value::String(s) if s == "off" => MemberExpressionOption::Off,
        _ => default,
    }
}

impl IndentOptions {
    /// Normalize the rule's options array: `[unit, { overrides }]`.
    pub fn from_json(options: &[Value]) -> Self {
        let mut opts = Self::default();

        if let Some(first) = options.first() {
            match first {
                Value::Number(n) => {
                    if let Some(n) = n.as_u64() {
                        opts.unit = IndentUnit::Spaces(n as usize);
                    }
                }
                Value::String(s) if s == "tab" => opts.unit = IndentUnit::Tab,
                _ => {}
            }
        }

        let Some(Value::Object(map)) = options.get(1) else {
            return opts;
        };

        if let Some(n) = map.get("SwitchCase").and_then(Value::as_u64) {
            opts.switch_case = n as usize;
        }
        if let Some(v) = map.get("VariableDeclarator") {
            opts.variable_declarator = VariableDeclaratorOptions::parse(v);
        }
        if let Some(v) = map.get("outerIIFEBody") {
            opts.outer_iife_body = parse_member_option(v, opts.outer_iife_body);
        }
        if let Some(v) = map.get("MemberExpression") {
            opts.member_expression = parse_member_option(v, opts.member_expression);
        }
        if let Some(v) = map.get("FunctionDeclaration") {
            opts.function_declaration = FunctionIndentOptions::parse(v);
        }
        if let Some(v) = map.get("FunctionExpression") {
            opts.function_expression = FunctionIndentOptions::parse(v);
        }
        if let Some(v) = map.get("StaticBlock") {
            if let Some(n) = v.get("body").and_then(Value::as_u64) {
                opts.static_block_body = n as usize;
            }
        }
        if let Some(v) = map.get("CallExpression") {
            if let Some(args) = v.get("arguments") {
                opts.call_arguments = ElementOption::parse(args, opts.call_arguments);
            }
        }
        if let Some(v) = map.get("ArrayExpression") {
            opts.array_elements = ElementOption::parse(v, opts.array_elements);
        }
        if let Some(v) = map.get("ObjectExpression") {
            opts.object_properties = ElementOption::parse(v, opts.object_properties);
        }
        if let Some(v) = map.get("ImportDeclaration") {
            opts.import_specifiers = ElementOption::parse(v, opts.import_specifiers);
        }
        if let Some(b) = map.get("flatTernaryExpressions").and_then(Value::as_bool) {
            opts.flat_ternary_expressions = b;
        }
        if let Some(b) = map.get("offsetTernaryExpressions").and_then(Value::as_bool) {
            opts.offset_ternary_expressions = b;
        }
        if let Some(Value::Array(items)) = map.get("ignoredNodes") {
            opts.ignored_nodes = items
                .iter()
                .filter_map(Value::as_str)
                .map(Selector::parse)
                .collect();
        }
        if let Some(b) = map.get("ignoreComments").and_then(Value::as_bool) {
            opts.ignore_comments = b;
        }

        opts
    }
}
