//! Token position model for the indent rule.
//!
//! Flattens the CST into an ordered stream of leaf tokens (comments
//! included) and precomputes, per physical line, which token starts it.
//! Lines that begin inside a multi-line token (template literal text, block
//! comment continuations, JSX text) have no starting token and are never
//! independently checked.

use std::collections::HashMap;

use stylint_js_cst::leaf_tokens;
use stylint_source_file::LineIndex;
use stylint_text_size::{TextRange, TextSize};
use tree_sitter::Node;

/// One leaf token of the source.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub kind: &'static str,
    pub range: TextRange,
    pub is_comment: bool,
}

/// The flattened token stream with per-line lookups.
pub struct TokenStream<'src> {
    source: &'src str,
    tokens: Vec<TokenInfo>,
    /// Token index by exact start offset.
    by_start: HashMap<u32, usize>,
    /// Byte offset of each line start (zero-indexed lines).
    line_starts: Vec<TextSize>,
    /// For each line, the first token that *starts* on it.
    line_first_token: Vec<Option<usize>>,
}

impl<'src> TokenStream<'src> {
    pub fn build(root: Node<'src>, source: &'src str, line_index: &LineIndex) -> Self {
        let leaves = leaf_tokens(root, source);
        let mut tokens = Vec::with_capacity(leaves.len());
        let mut by_start = HashMap::with_capacity(leaves.len());
        for leaf in &leaves {
            // tree-sitter emits zero-width missing tokens during recovery
            if leaf.range().is_empty() {
                continue;
            }
            by_start.insert(leaf.range().start().to_u32(), tokens.len());
            tokens.push(TokenInfo {
                kind: leaf.kind(),
                range: leaf.range(),
                is_comment: leaf.is_comment(),
            });
        }

        let line_count = line_index.line_count();
        let line_starts: Vec<TextSize> = (0..line_count)
            .map(|i| {
                line_index.line_start(
                    stylint_source_file::OneIndexed::from_zero_indexed(i),
                    source,
                )
            })
            .collect();

        let mut line_first_token = vec![None; line_count];
        for (idx, token) in tokens.iter().enumerate() {
            let line = line_of_offset(&line_starts, token.range.start());
            if line_first_token[line].is_none() {
                line_first_token[line] = Some(idx);
            }
        }

        Self {
            source,
            tokens,
            by_start,
            line_starts,
            line_first_token,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token(&self, idx: usize) -> &TokenInfo {
        &self.tokens[idx]
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Token index for a token starting exactly at `start`.
    pub fn at_start(&self, start: TextSize) -> Option<usize> {
        self.by_start.get(&start.to_u32()).copied()
    }

    /// First non-comment token whose start lies within `range`.
    pub fn first_in(&self, range: TextRange) -> Option<usize> {
        let from = self.partition_point(range.start());
        self.tokens[from..]
            .iter()
            .position(|t| !t.is_comment && t.range.start() < range.end())
            .map(|i| from + i)
            .filter(|&i| range.contains(self.tokens[i].range.start()))
    }

    /// Last non-comment token whose start lies within `range`.
    pub fn last_in(&self, range: TextRange) -> Option<usize> {
        let from = self.partition_point(range.start());
        let mut found = None;
        for (i, t) in self.tokens[from..].iter().enumerate() {
            if t.range.start() >= range.end() {
                break;
            }
            if !t.is_comment {
                found = Some(from + i);
            }
        }
        found
    }

    /// Index of the first token at or after `offset`.
    fn partition_point(&self, offset: TextSize) -> usize {
        self.tokens.partition_point(|t| t.range.start() < offset)
    }

    /// Indices of all tokens (comments included) starting within `range`.
    pub fn token_span(&self, range: TextRange) -> std::ops::Range<usize> {
        self.partition_point(range.start())..self.partition_point(range.end())
    }

    /// Zero-indexed line a token starts on.
    pub fn token_line(&self, idx: usize) -> usize {
        line_of_offset(&self.line_starts, self.tokens[idx].range.start())
    }

    /// Column of a token's start, in characters from its line start.
    pub fn token_column(&self, idx: usize) -> usize {
        let start = self.tokens[idx].range.start();
        let line_start = self.line_starts[self.token_line(idx)];
        self.source[TextRange::new(line_start, start)].chars().count()
    }

    pub fn same_line(&self, a: usize, b: usize) -> bool {
        self.token_line(a) == self.token_line(b)
    }

    pub fn line_start_offset(&self, line: usize) -> TextSize {
        self.line_starts[line]
    }

    /// The token starting a line, if the line is independently checkable.
    /// Lines beginning inside a multi-line token yield None.
    pub fn checkable_line_start(&self, line: usize) -> Option<usize> {
        let idx = self.line_first_token[line]?;
        if idx > 0 {
            let prev_end = self.tokens[idx - 1].range.end();
            if prev_end > self.line_starts[line] {
                return None;
            }
        }
        Some(idx)
    }

    /// First token starting on a line, checkable or not.
    pub fn first_token_on_line(&self, line: usize) -> Option<usize> {
        self.line_first_token[line]
    }

    /// The leading whitespace actually present before a line's first token.
    pub fn actual_indent(&self, line: usize) -> &'src str {
        let start = self.line_starts[line];
        let end = self
            .line_first_token[line]
            .map(|idx| self.tokens[idx].range.start())
            .unwrap_or(start);
        &self.source[TextRange::new(start, end)]
    }

    /// Nearest non-comment token strictly before `idx`.
    pub fn prev_code_token(&self, idx: usize) -> Option<usize> {
        self.tokens[..idx].iter().rposition(|t| !t.is_comment)
    }

    /// Nearest non-comment token strictly after `idx`.
    pub fn next_code_token(&self, idx: usize) -> Option<usize> {
        self.tokens[idx + 1..]
            .iter()
            .position(|t| !t.is_comment)
            .map(|i| idx + 1 + i)
    }
}

fn line_of_offset(line_starts: &[TextSize], offset: TextSize) -> usize {
    match line_starts.binary_search(&offset) {
        Ok(i) => i,
        Err(i) => i - 1,
    }
}
