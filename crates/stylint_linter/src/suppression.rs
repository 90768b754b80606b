//! Suppression support for stylint.
//!
//! Supports the ESLint directive comments:
//! - `/* eslint-disable [rule, ...] */` / `/* eslint-enable [rule, ...] */`
//! - `// eslint-disable-line [rule, ...]`
//! - `// eslint-disable-next-line [rule, ...]`
//!
//! Suppressions work by tracking ranges where specific rules are disabled.
//! Directives are scanned from raw text before parsing, so they also apply
//! when the file fails to parse cleanly.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use stylint_text_size::TextSize;

lazy_static! {
    static ref DIRECTIVE: Regex = Regex::new(
        r"^\s*(eslint-disable-next-line|eslint-disable-line|eslint-disable|eslint-enable)\b\s*(.*)$"
    )
    .expect("directive pattern is valid");
}

/// A suppression region where a specific rule is disabled.
#[derive(Debug, Clone)]
pub struct SuppressionRegion {
    /// The rule name being suppressed (or "*" for all rules).
    pub rule: String,
    /// Start offset in the source.
    pub start: TextSize,
    /// End offset in the source (None means until end of file).
    pub end: Option<TextSize>,
}

/// Manages suppressions for a source file.
#[derive(Debug, Default)]
pub struct SuppressionContext {
    /// Suppression regions indexed by rule name.
    /// Key "*" matches all rules.
    regions: HashMap<String, Vec<SuppressionRegion>>,
}

/// Split a directive's rule list. An empty list means "all rules".
fn parse_rule_list(rest: &str) -> Vec<String> {
    let rest = rest.trim();
    // Anything after `--` is a human note, not a rule name.
    let rest = rest.split("--").next().unwrap_or("").trim();
    if rest.is_empty() {
        return vec!["*".to_string()];
    }
    rest.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl SuppressionContext {
    /// Create a new empty suppression context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse suppression directives from source code.
    pub fn from_source(source: &str) -> Self {
        let mut ctx = Self::new();
        ctx.scan(source);
        ctx
    }

    /// Scan the raw text for comments carrying directives.
    fn scan(&mut self, source: &str) {
        // Open block-scoped suppressions: rule -> start offset
        let mut open: HashMap<String, TextSize> = HashMap::new();

        let bytes = source.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() {
            if pos + 1 < bytes.len() && bytes[pos] == b'/' && bytes[pos + 1] == b'/' {
                let line_end = bytes[pos..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map(|i| pos + i)
                    .unwrap_or(bytes.len());
                let content = &source[pos + 2..line_end];

                self.process_directive(source, content, pos, &mut open);

                pos = line_end + 1;
                continue;
            }

            if pos + 1 < bytes.len() && bytes[pos] == b'/' && bytes[pos + 1] == b'*' {
                let close = source[pos + 2..].find("*/");
                let (content_end, comment_end) = match close {
                    Some(i) => (pos + 2 + i, pos + 2 + i + 2),
                    // Unclosed comment runs to end of file
                    None => (bytes.len(), bytes.len()),
                };
                let content = &source[pos + 2..content_end];

                self.process_directive(source, content, pos, &mut open);

                pos = comment_end;
                continue;
            }

            pos += 1;
        }

        // Close any remaining open suppressions at end of file
        let end_pos = TextSize::new(source.len() as u32);
        for (rule, start) in open {
            self.add_region(SuppressionRegion {
                rule,
                start,
                end: Some(end_pos),
            });
        }
    }

    /// Process one comment body for a directive.
    fn process_directive(
        &mut self,
        source: &str,
        content: &str,
        comment_pos: usize,
        open: &mut HashMap<String, TextSize>,
    ) {
        let Some(captures) = DIRECTIVE.captures(content) else {
            return;
        };
        let kind = captures.get(1).map_or("", |m| m.as_str());
        let rules = parse_rule_list(captures.get(2).map_or("", |m| m.as_str()));

        match kind {
            "eslint-disable" => {
                for rule in rules {
                    open.entry(rule).or_insert(TextSize::new(comment_pos as u32));
                }
            }
            "eslint-enable" => {
                if rules.iter().any(|r| r == "*") {
                    // Bare enable closes everything that is open.
                    let end = TextSize::new(comment_pos as u32);
                    for (rule, start) in open.drain() {
                        self.add_region(SuppressionRegion {
                            rule,
                            start,
                            end: Some(end),
                        });
                    }
                } else {
                    for rule in rules {
                        if let Some(start) = open.remove(&rule) {
                            self.add_region(SuppressionRegion {
                                rule,
                                start,
                                end: Some(TextSize::new(comment_pos as u32)),
                            });
                        }
                    }
                }
            }
            "eslint-disable-line" => {
                let (start, end) = line_bounds(source, comment_pos);
                for rule in rules {
                    self.add_region(SuppressionRegion {
                        rule,
                        start,
                        end: Some(end),
                    });
                }
            }
            "eslint-disable-next-line" => {
                let (_, line_end) = line_bounds(source, comment_pos);
                let next_start = usize::from(line_end).saturating_add(1).min(source.len());
                let (start, end) = line_bounds(source, next_start);
                for rule in rules {
                    self.add_region(SuppressionRegion {
                        rule,
                        start,
                        end: Some(end),
                    });
                }
            }
            _ => {}
        }
    }

    /// Add a suppression region.
    fn add_region(&mut self, region: SuppressionRegion) {
        self.regions
            .entry(region.rule.clone())
            .or_default()
            .push(region);
    }

    /// Check if a diagnostic at the given position for the given rule is suppressed.
    pub fn is_suppressed(&self, rule_name: &str, pos: TextSize) -> bool {
        for key in [rule_name, "*"] {
            if let Some(regions) = self.regions.get(key) {
                for region in regions {
                    if pos >= region.start {
                        match region.end {
                            Some(end) if pos < end => return true,
                            None => return true,
                            _ => {}
                        }
                    }
                }
            }
        }
        false
    }

    /// Check if there are any suppressions.
    pub fn has_suppressions(&self) -> bool {
        !self.regions.is_empty()
    }
}

/// Start and end offsets of the line containing `pos` (end excludes the newline).
fn line_bounds(source: &str, pos: usize) -> (TextSize, TextSize) {
    let pos = pos.min(source.len());
    let start = source[..pos].rfind('\n').map(|p| p + 1).unwrap_or(0);
    let end = source[pos..]
        .find('\n')
        .map(|p| pos + p)
        .unwrap_or(source.len());
    (TextSize::new(start as u32), TextSize::new(end as u32))
}
