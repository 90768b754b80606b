//! The `indent` rule: offset-graph indentation checking.
//!
//! Every token's desired indentation is expressed as an offset from an
//! anchor token, populated by per-construct visitors over the CST. Each
//! physical line is then checked against the resolved indent of its first
//! token, and mismatches are reported with a fix replacing exactly the
//! line's leading whitespace.
//!
//! ESLint equivalent: `indent` (and `@stylistic/indent`).

mod offsets;
mod options;
mod resolve;
mod selectors;
mod tokens;
mod visitors;

pub use resolve::WrongIndentation;

use stylint_diagnostics::Diagnostic;
use stylint_js_cst::{CstNode, TreeWalker};

use crate::{CheckContext, FromConfig, Rule, RuleOptions};

use offsets::OffsetTable;
use options::IndentOptions;
use tokens::TokenStream;

/// Configuration-bearing rule struct.
#[derive(Debug, Clone, Default)]
pub struct Indent {
    options: IndentOptions,
}

const RELEVANT_KINDS: &[&str] = &["program"];

impl FromConfig for Indent {
    const RULE_NAME: &'static str = "indent";

    fn from_config(options: &RuleOptions) -> Self {
        Self {
            options: IndentOptions::from_json(options),
        }
    }
}

impl Rule for Indent {
    fn name(&self) -> &'static str {
        "indent"
    }

    fn relevant_kinds(&self) -> &'static [&'static str] {
        RELEVANT_KINDS
    }

    fn check(&self, ctx: &CheckContext, node: &CstNode) -> Vec<Diagnostic> {
        // One pass over the whole file, from the root only.
        if node.kind() != "program" || node.parent().is_some() {
            return vec![];
        }

        let source = ctx.source();
        let stream = TokenStream::build(node.inner(), source, ctx.line_index());
        if stream.is_empty() {
            return vec![];
        }

        let mut table = OffsetTable::new(stream.len(), self.options.unit);
        visitors::populate(node, &stream, &mut table, &self.options);

        if !self.options.ignored_nodes.is_empty() {
            for candidate in TreeWalker::new(node.inner(), source) {
                if self
                    .options
                    .ignored_nodes
                    .iter()
                    .any(|sel| sel.matches(&candidate))
                {
                    table.ignore_range(stream.token_span(candidate.range()));
                }
            }
        }

        resolve::check_lines(&stream, &table, &self.options)
    }
}
