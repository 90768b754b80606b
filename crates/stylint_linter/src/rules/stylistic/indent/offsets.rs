//! The offset graph: desired indentation per token.
//!
//! Each token may carry one descriptor tying it to an anchor token. Setting
//! a descriptor overwrites any previous one, so later (inner) constructs win
//! over earlier (outer) ones under pre-order traversal. Resolution renders
//! the desired indentation of a token as a whitespace string by following
//! anchor links back to the root.

use super::options::IndentUnit;
use super::tokens::TokenStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OffsetMode {
    /// `amount` units past the anchor's indent; contributes nothing when the
    /// token sits on the anchor's line.
    Fixed,
    /// Match the anchor's resolved indent exactly, lines notwithstanding.
    Lock,
    /// Align under the anchor's column: the anchor line's resolved indent
    /// plus the anchor's distance from its line's first token.
    FirstElement,
}

#[derive(Debug, Clone, Copy)]
struct OffsetDesc {
    from: usize,
    amount: usize,
    mode: OffsetMode,
}

#[derive(Debug, Clone)]
enum Slot {
    Unresolved,
    InProgress,
    Done(Option<String>),
}

/// Desired-offset table over a token stream.
pub struct OffsetTable {
    descs: Vec<Option<OffsetDesc>>,
    ignored: Vec<bool>,
    unit: IndentUnit,
}

impl OffsetTable {
    pub fn new(token_count: usize, unit: IndentUnit) -> Self {
        Self {
            descs: vec![None; token_count],
            ignored: vec![false; token_count],
            unit,
        }
    }

    /// Offset `token` a fixed number of units past `from`.
    pub fn set_offset(&mut self, token: usize, from: usize, amount: usize) {
        if token != from {
            self.descs[token] = Some(OffsetDesc {
                from,
                amount,
                mode: OffsetMode::Fixed,
            });
        }
    }

    /// Make `token` match `from`'s resolved indent exactly.
    pub fn lock(&mut self, token: usize, from: usize) {
        if token != from {
            self.descs[token] = Some(OffsetDesc {
                from,
                amount: 0,
                mode: OffsetMode::Lock,
            });
        }
    }

    /// Align `token` directly under `from`'s column.
    pub fn align_under(&mut self, token: usize, from: usize) {
        if token != from {
            self.descs[token] = Some(OffsetDesc {
                from,
                amount: 0,
                mode: OffsetMode::FirstElement,
            });
        }
    }

    /// Fixed-offset every token in `tokens` (a half-open index range) from
    /// `from`, except `from` itself.
    pub fn set_offset_range(&mut self, tokens: std::ops::Range<usize>, from: usize, amount: usize) {
        for token in tokens {
            self.set_offset(token, from, amount);
        }
    }

    /// Mark a token as ignored: never reported, resolves to its line's
    /// actual indentation so dependents stay anchored.
    pub fn ignore(&mut self, token: usize) {
        self.ignored[token] = true;
    }

    pub fn ignore_range(&mut self, tokens: std::ops::Range<usize>) {
        for token in tokens {
            self.ignore(token);
        }
    }

    pub fn is_ignored(&self, token: usize) -> bool {
        self.ignored[token]
    }

    /// Resolve the desired indent of every token. `None` means "no
    /// expectation" (resolution failed or was capped), which suppresses
    /// reporting for lines led by that token.
    pub fn resolve_all(&self, stream: &TokenStream) -> Vec<Option<String>> {
        let mut memo = vec![Slot::Unresolved; self.descs.len()];
        for idx in 0..self.descs.len() {
            self.resolve(idx, stream, &mut memo);
        }
        memo.into_iter()
            .map(|slot| match slot {
                Slot::Done(v) => v,
                _ => None,
            })
            .collect()
    }

    fn resolve(&self, start: usize, stream: &TokenStream, memo: &mut [Slot]) {
        let mut stack = vec![start];
        // Walking more anchor links than there are tokens means a cycle or
        // pathological table; give up on the whole chain rather than loop.
        let step_cap = self.descs.len() + 1;
        let mut steps = 0usize;

        while let Some(&idx) = stack.last() {
            if matches!(memo[idx], Slot::Done(_)) {
                stack.pop();
                continue;
            }

            steps += 1;
            if steps > step_cap {
                for &pending in &stack {
                    memo[pending] = Slot::Done(None);
                }
                return;
            }

            let dependency = self.dependency_of(idx, stream);
            match dependency {
                Dependency::Value(value) => {
                    memo[idx] = Slot::Done(value);
                    stack.pop();
                }
                Dependency::Token(dep) => match &memo[dep] {
                    Slot::Done(base) => {
                        let value = base
                            .clone()
                            .map(|base| self.combine(idx, dep, base, stream));
                        memo[idx] = Slot::Done(value);
                        stack.pop();
                    }
                    Slot::InProgress => {
                        // Cycle: everything pending depends on it.
                        for &pending in &stack {
                            memo[pending] = Slot::Done(None);
                        }
                        return;
                    }
                    Slot::Unresolved => {
                        memo[idx] = Slot::InProgress;
                        stack.push(dep);
                    }
                },
            }
        }
    }

    /// What a token's resolution depends on: either a final value, or the
    /// token whose resolved indent must be combined in.
    fn dependency_of(&self, idx: usize, stream: &TokenStream) -> Dependency {
        if self.ignored[idx] {
            let line = stream.token_line(idx);
            return Dependency::Value(Some(stream.actual_indent(line).to_string()));
        }
        match self.descs[idx] {
            None => Dependency::Value(Some(String::new())),
            Some(desc) => match desc.mode {
                OffsetMode::Fixed | OffsetMode::Lock => Dependency::Token(desc.from),
                OffsetMode::FirstElement => {
                    let anchor_line = stream.token_line(desc.from);
                    match stream.first_token_on_line(anchor_line) {
                        Some(line_first) => Dependency::Token(line_first),
                        None => Dependency::Value(None),
                    }
                }
            },
        }
    }

    /// Combine a resolved dependency into the token's own indent.
    fn combine(&self, idx: usize, dep: usize, base: String, stream: &TokenStream) -> String {
        let desc = self.descs[idx].expect("combine is only called for described tokens");
        match desc.mode {
            OffsetMode::Lock => base,
            OffsetMode::Fixed => {
                if stream.same_line(idx, desc.from) {
                    base
                } else {
                    let mut out = base;
                    out.push_str(&self.unit.render(desc.amount));
                    out
                }
            }
            OffsetMode::FirstElement => {
                // Alignment targets the anchor's expected position, not its
                // actual column; followers of a mis-indented anchor line are
                // reported with it and settle together.
                let pad = stream.token_column(desc.from) - stream.token_column(dep);
                let mut out = base;
                out.push_str(&" ".repeat(pad));
                out
            }
        }
    }
}

enum Dependency {
    Value(Option<String>),
    Token(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylint_source_file::LineIndex;
    use stylint_js_parser::JsParser;

    fn with_stream<R>(source: &str, f: impl FnOnce(&TokenStream) -> R) -> R {
        let mut parser = JsParser::new();
        let result = parser.parse(source).unwrap();
        let line_index = LineIndex::from_source_text(source);
        let stream = TokenStream::build(result.tree.root_node(), source, &line_index);
        f(&stream)
    }

    #[test]
    fn test_root_tokens_resolve_to_empty() {
        with_stream("a;\nb;\n", |stream| {
            let table = OffsetTable::new(stream.len(), IndentUnit::Spaces(4));
            let resolved = table.resolve_all(stream);
            assert!(resolved.iter().all(|r| r.as_deref() == Some("")));
        });
    }

    #[test]
    fn test_fixed_offset_across_lines() {
        let source = "f(\n1\n);\n";
        with_stream(source, |stream| {
            let mut table = OffsetTable::new(stream.len(), IndentUnit::Spaces(4));
            // token 0 = "f", 1 = "(", 2 = "1", 3 = ")", 4 = ";"
            table.set_offset(2, 0, 1);
            let resolved = table.resolve_all(stream);
            assert_eq!(resolved[2].as_deref(), Some("    "));
        });
    }

    #[test]
    fn test_fixed_offset_same_line_contributes_nothing() {
        let source = "f(1);\n";
        with_stream(source, |stream| {
            let mut table = OffsetTable::new(stream.len(), IndentUnit::Spaces(4));
            table.set_offset(2, 0, 1);
            let resolved = table.resolve_all(stream);
            assert_eq!(resolved[2].as_deref(), Some(""));
        });
    }

    #[test]
    fn test_lock_follows_anchor_exactly() {
        let source = "f(\n1\n);\n";
        with_stream(source, |stream| {
            let mut table = OffsetTable::new(stream.len(), IndentUnit::Tab);
            table.set_offset(2, 0, 1);
            table.lock(3, 0);
            let resolved = table.resolve_all(stream);
            assert_eq!(resolved[2].as_deref(), Some("\t"));
            assert_eq!(resolved[3].as_deref(), Some(""));
        });
    }

    #[test]
    fn test_chained_offsets_accumulate() {
        let source = "a(\nb(\nc\n)\n)\n";
        with_stream(source, |stream| {
            let mut table = OffsetTable::new(stream.len(), IndentUnit::Spaces(2));
            // c offsets from b, b offsets from a
            let a = 0;
            let b = 2;
            let c = 4;
            table.set_offset(b, a, 1);
            table.set_offset(c, b, 1);
            let resolved = table.resolve_all(stream);
            assert_eq!(resolved[b].as_deref(), Some("  "));
            assert_eq!(resolved[c].as_deref(), Some("    "));
        });
    }

    #[test]
    fn test_align_under_column() {
        let source = "f(aa, bb,\ncc);\n";
        with_stream(source, |stream| {
            // tokens: f ( aa , bb , cc ) ;
            let mut table = OffsetTable::new(stream.len(), IndentUnit::Spaces(4));
            let first_arg = 2;
            let third_arg = 6;
            table.align_under(third_arg, first_arg);
            let resolved = table.resolve_all(stream);
            // "f(" is two columns wide, so aa sits at column 2
            assert_eq!(resolved[third_arg].as_deref(), Some("  "));
        });
    }

    #[test]
    fn test_ignored_token_contributes_actual_indent() {
        let source = "x;\n      y(\nz\n);\n";
        with_stream(source, |stream| {
            let mut table = OffsetTable::new(stream.len(), IndentUnit::Spaces(4));
            let y = 2;
            let z = 4;
            table.ignore(y);
            table.set_offset(z, y, 1);
            let resolved = table.resolve_all(stream);
            // y keeps its six spaces, z builds on top of them
            assert_eq!(resolved[y].as_deref(), Some("      "));
            assert_eq!(resolved[z].as_deref(), Some("          "));
        });
    }

    #[test]
    fn test_cycle_resolves_to_none() {
        let source = "a(\nb\n);\n";
        with_stream(source, |stream| {
            let mut table = OffsetTable::new(stream.len(), IndentUnit::Spaces(4));
            table.set_offset(0, 2, 1);
            table.set_offset(2, 0, 1);
            let resolved = table.resolve_all(stream);
            assert_eq!(resolved[0], None);
            assert_eq!(resolved[2], None);
        });
    }

    #[test]
    fn test_overwrite_on_set_last_writer_wins() {
        let source = "f(\ng\n);\n";
        with_stream(source, |stream| {
            let mut table = OffsetTable::new(stream.len(), IndentUnit::Spaces(4));
            table.set_offset(2, 0, 2);
            table.set_offset(2, 0, 1);
            let resolved = table.resolve_all(stream);
            assert_eq!(resolved[2].as_deref(), Some("    "));
        });
    }
}
