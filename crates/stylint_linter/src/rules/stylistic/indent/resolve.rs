//! Per-line resolution and violation emission for the indent rule.
//!
//! Walks every physical line, finds the token starting it, resolves its
//! desired indent through the offset graph, and diffs against the leading
//! whitespace actually present. Comments accept their own desired indent or
//! that of the nearest code on either side.

use stylint_diagnostics::{Diagnostic, Edit, Fix, FixAvailability, Violation};
use stylint_text_size::{TextRange, TextSize};

use super::offsets::OffsetTable;
use super::options::IndentOptions;
use super::tokens::TokenStream;

/// Violation: a line's leading whitespace does not match its desired indent.
#[derive(Debug, Clone)]
pub struct WrongIndentation {
    pub expected: String,
    pub actual: String,
}

impl Violation for WrongIndentation {
    const FIX_AVAILABILITY: FixAvailability = FixAvailability::Always;

    fn message(&self) -> String {
        format!(
            "Expected indentation of {} but found {}.",
            self.expected, self.actual
        )
    }
}

/// Human description of an indentation string: "4 spaces", "1 tab", "0".
fn describe(ws: &str) -> String {
    let spaces = ws.chars().filter(|&c| c == ' ').count();
    let tabs = ws.chars().filter(|&c| c == '\t').count();
    match (spaces, tabs) {
        (0, 0) => "0".to_string(),
        (s, 0) => format!("{s} {}", if s == 1 { "space" } else { "spaces" }),
        (0, t) => format!("{t} {}", if t == 1 { "tab" } else { "tabs" }),
        (s, t) => format!(
            "{s} {} and {t} {}",
            if s == 1 { "space" } else { "spaces" },
            if t == 1 { "tab" } else { "tabs" }
        ),
    }
}

pub(super) fn check_lines(
    stream: &TokenStream,
    table: &OffsetTable,
    options: &IndentOptions,
) -> Vec<Diagnostic> {
    let resolved = table.resolve_all(stream);
    let mut diagnostics = Vec::new();

    for line in 0..stream.line_count() {
        let Some(first) = stream.checkable_line_start(line) else {
            continue;
        };
        if table.is_ignored(first) {
            continue;
        }
        let actual = stream.actual_indent(line);

        let expected = if stream.token(first).is_comment {
            if options.ignore_comments {
                continue;
            }
            let Some(own) = resolved[first].as_deref() else {
                continue;
            };
            if comment_indent_acceptable(stream, &resolved, first, actual) {
                continue;
            }
            own
        } else {
            let Some(expected) = resolved[first].as_deref() else {
                continue;
            };
            expected
        };

        if expected == actual {
            continue;
        }

        let line_start = stream.line_start_offset(line);
        let token_start = stream.token(first).range.start();
        let ws_range = TextRange::new(line_start, token_start);

        let violation = WrongIndentation {
            expected: describe(expected),
            actual: describe(actual),
        };
        let fix = Fix::safe_edit(make_edit(expected, ws_range, line_start));
        diagnostics.push(Diagnostic::new(violation, ws_range).with_fix(fix));
    }

    diagnostics
}

/// A comment alone on its line also accepts the desired indent of the
/// nearest code token before or after it.
fn comment_indent_acceptable(
    stream: &TokenStream,
    resolved: &[Option<String>],
    comment: usize,
    actual: &str,
) -> bool {
    if resolved[comment].as_deref() == Some(actual) {
        return true;
    }
    if let Some(next) = stream.next_code_token(comment) {
        if resolved[next].as_deref() == Some(actual) {
            return true;
        }
    }
    if let Some(prev) = stream.prev_code_token(comment) {
        let prev_line = stream.token_line(prev);
        if let Some(prev_line_first) = stream.first_token_on_line(prev_line) {
            if resolved[prev_line_first].as_deref() == Some(actual) {
                return true;
            }
        }
    }
    false
}

fn make_edit(expected: &str, ws_range: TextRange, line_start: TextSize) -> Edit {
    if expected.is_empty() {
        Edit::range_deletion(ws_range)
    } else if ws_range.is_empty() {
        Edit::insertion(expected.to_string(), line_start)
    } else {
        Edit::range_replacement(expected.to_string(), ws_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_spaces() {
        assert_eq!(describe(""), "0");
        assert_eq!(describe(" "), "1 space");
        assert_eq!(describe("    "), "4 spaces");
    }

    #[test]
    fn test_describe_tabs() {
        assert_eq!(describe("\t"), "1 tab");
        assert_eq!(describe("\t\t"), "2 tabs");
    }

    #[test]
    fn test_describe_mixed() {
        assert_eq!(describe("  \t"), "2 spaces and 1 tab");
    }

    #[test]
    fn test_message_format() {
        let violation = WrongIndentation {
            expected: "4 spaces".to_string(),
            actual: "2 spaces".to_string(),
        };
        assert_eq!(
            violation.message(),
            "Expected indentation of 4 spaces but found 2 spaces."
        );
    }
}
