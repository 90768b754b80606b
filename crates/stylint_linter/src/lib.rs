//! Stylistic JavaScript/JSX linter with auto-fix support.

pub mod registry;
pub mod rules;
pub mod suppression;

pub use registry::{FromConfig, RuleOptions, RuleRegistry};
pub use suppression::SuppressionContext;

use stylint_diagnostics::Diagnostic;
use stylint_js_cst::CstNode;
use stylint_source_file::{LineIndex, SourceCode};
use stylint_text_size::TextRange;

/// Context provided to rules during checking.
pub struct CheckContext<'a> {
    source: &'a str,
    line_index: LineIndex,
}

impl<'a> CheckContext<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            line_index: LineIndex::from_source_text(source),
        }
    }

    /// Get the source text.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Get the cached line index.
    pub fn line_index(&self) -> &LineIndex {
        &self.line_index
    }

    /// Get the source code helper for line/column info.
    pub fn source_code(&self) -> SourceCode<'a, '_> {
        SourceCode::new(self.source, &self.line_index)
    }

    /// Get text at a given range.
    pub fn text_at(&self, range: TextRange) -> &'a str {
        &self.source[range]
    }

    /// Get text before a position.
    pub fn text_before(&self, pos: stylint_text_size::TextSize) -> &'a str {
        &self.source[..usize::from(pos)]
    }

    /// Get text after a position.
    pub fn text_after(&self, pos: stylint_text_size::TextSize) -> &'a str {
        &self.source[usize::from(pos)..]
    }
}

/// Trait for lint rules.
pub trait Rule: Send + Sync {
    /// The rule's name (matching the rules-file key).
    fn name(&self) -> &'static str;

    /// Node kinds this rule cares about. Empty means run on all nodes.
    fn relevant_kinds(&self) -> &'static [&'static str] {
        &[]
    }

    /// Check a CST node for violations.
    fn check(&self, ctx: &CheckContext, node: &CstNode) -> Vec<Diagnostic>;
}

/// A diagnostic attributed to the rule that produced it.
#[derive(Debug)]
pub struct RuleDiagnostic {
    pub rule: &'static str,
    pub diagnostic: Diagnostic,
}

/// Result of linting a file.
#[derive(Debug, Default)]
pub struct LintResult {
    pub diagnostics: Vec<RuleDiagnostic>,
}

impl LintResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rule: &'static str, diagnostic: Diagnostic) {
        self.diagnostics.push(RuleDiagnostic { rule, diagnostic });
    }

    /// Order diagnostics by source position.
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by_key(|d| d.diagnostic.range.start());
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get all fixable diagnostics.
    pub fn fixable(&self) -> impl Iterator<Item = &RuleDiagnostic> {
        self.diagnostics.iter().filter(|d| d.diagnostic.fix.is_some())
    }
}
