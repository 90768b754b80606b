//! Line-oriented views over source text.
//!
//! `LineIndex` records the byte offset of every line start so byte offsets
//! can be translated to one-indexed line/column pairs without rescanning the
//! file. `SourceCode` bundles the text with its index for the common lookups
//! rules need.

use std::fmt;
use std::num::NonZeroUsize;

use stylint_text_size::{TextRange, TextSize};

/// A one-indexed line or column number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OneIndexed(NonZeroUsize);

impl OneIndexed {
    pub const MIN: Self = Self(NonZeroUsize::MIN);

    pub fn new(value: usize) -> Option<Self> {
        NonZeroUsize::new(value).map(Self)
    }

    /// Converts a zero-indexed value.
    pub fn from_zero_indexed(value: usize) -> Self {
        Self(NonZeroUsize::MIN.saturating_add(value))
    }

    pub const fn get(self) -> usize {
        self.0.get()
    }

    pub const fn to_zero_indexed(self) -> usize {
        self.0.get() - 1
    }

    pub fn saturating_add(self, rhs: usize) -> Self {
        Self(self.0.saturating_add(rhs))
    }

    pub fn saturating_sub(self, rhs: usize) -> Self {
        Self::new(self.get().saturating_sub(rhs)).unwrap_or(Self::MIN)
    }
}

impl fmt::Debug for OneIndexed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl fmt::Display for OneIndexed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// A one-indexed line/column pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: OneIndexed,
    pub column: OneIndexed,
}

/// Byte offsets of every line start in a source file.
#[derive(Clone, Debug)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
}

impl LineIndex {
    /// Builds the index by scanning for newlines once.
    pub fn from_source_text(text: &str) -> Self {
        let mut line_starts = Vec::with_capacity(text.len() / 32 + 1);
        line_starts.push(TextSize::new(0));
        for pos in memchr::memchr_iter(b'\n', text.as_bytes()) {
            line_starts.push(TextSize::new(u32::try_from(pos + 1).expect("file too large")));
        }
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// The line containing `offset`.
    pub fn line_of(&self, offset: TextSize) -> OneIndexed {
        match self.line_starts.binary_search(&offset) {
            Ok(idx) => OneIndexed::from_zero_indexed(idx),
            Err(idx) => OneIndexed::from_zero_indexed(idx - 1),
        }
    }

    /// The byte offset where `line` starts. Lines past the end clamp to the
    /// end of the text.
    pub fn line_start(&self, line: OneIndexed, text: &str) -> TextSize {
        self.line_starts
            .get(line.to_zero_indexed())
            .copied()
            .unwrap_or_else(|| TextSize::of(text))
    }

    /// The byte offset just past `line`, excluding its trailing newline.
    pub fn line_end_exclusive(&self, line: OneIndexed, text: &str) -> TextSize {
        let next = line.saturating_add(1);
        let end = self.line_start(next, text);
        let mut end_usize = usize::from(end);
        let bytes = text.as_bytes();
        if end_usize > 0 && bytes.get(end_usize - 1) == Some(&b'\n') {
            end_usize -= 1;
            if end_usize > 0 && bytes.get(end_usize - 1) == Some(&b'\r') {
                end_usize -= 1;
            }
        }
        TextSize::new(u32::try_from(end_usize).expect("file too large"))
    }

    pub fn source_location(&self, offset: TextSize, text: &str) -> SourceLocation {
        let line = self.line_of(offset);
        let start = self.line_start(line, text);
        let column = text[TextRange::new(start, offset)].chars().count();
        SourceLocation {
            line,
            column: OneIndexed::from_zero_indexed(column),
        }
    }
}

/// Source text paired with its line index.
#[derive(Clone, Copy, Debug)]
pub struct SourceCode<'src, 'index> {
    text: &'src str,
    index: &'index LineIndex,
}

impl<'src, 'index> SourceCode<'src, 'index> {
    pub fn new(text: &'src str, index: &'index LineIndex) -> Self {
        Self { text, index }
    }

    pub fn text(&self) -> &'src str {
        self.text
    }

    pub fn line_count(&self) -> usize {
        self.index.line_count()
    }

    pub fn line_column(&self, offset: TextSize) -> SourceLocation {
        self.index.source_location(offset, self.text)
    }

    pub fn line_of(&self, offset: TextSize) -> OneIndexed {
        self.index.line_of(offset)
    }

    pub fn line_start(&self, line: OneIndexed) -> TextSize {
        self.index.line_start(line, self.text)
    }

    /// The text of `line` without its trailing newline.
    pub fn line_text(&self, line: OneIndexed) -> &'src str {
        let start = self.index.line_start(line, self.text);
        let end = self.index.line_end_exclusive(line, self.text);
        &self.text[TextRange::new(start, end)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_starts() {
        let text = "ab\ncd\n\nef";
        let index = LineIndex::from_source_text(text);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_start(OneIndexed::from_zero_indexed(0), text), TextSize::new(0));
        assert_eq!(index.line_start(OneIndexed::from_zero_indexed(1), text), TextSize::new(3));
        assert_eq!(index.line_start(OneIndexed::from_zero_indexed(2), text), TextSize::new(6));
        assert_eq!(index.line_start(OneIndexed::from_zero_indexed(3), text), TextSize::new(7));
        // past the end clamps
        assert_eq!(index.line_start(OneIndexed::from_zero_indexed(9), text), TextSize::new(9));
    }

    #[test]
    fn line_of_offset() {
        let text = "ab\ncd\nef";
        let index = LineIndex::from_source_text(text);
        assert_eq!(index.line_of(TextSize::new(0)).get(), 1);
        assert_eq!(index.line_of(TextSize::new(2)).get(), 1);
        assert_eq!(index.line_of(TextSize::new(3)).get(), 2);
        assert_eq!(index.line_of(TextSize::new(7)).get(), 3);
    }

    #[test]
    fn location_of_offset() {
        let text = "let x = 1;\nlet y = 2;\n";
        let index = LineIndex::from_source_text(text);
        let code = SourceCode::new(text, &index);
        let loc = code.line_column(TextSize::new(15));
        assert_eq!(loc.line.get(), 2);
        assert_eq!(loc.column.get(), 5);
    }

    #[test]
    fn line_text_strips_newlines() {
        let text = "ab\r\ncd\nef";
        let index = LineIndex::from_source_text(text);
        let code = SourceCode::new(text, &index);
        assert_eq!(code.line_text(OneIndexed::from_zero_indexed(0)), "ab");
        assert_eq!(code.line_text(OneIndexed::from_zero_indexed(1)), "cd");
        assert_eq!(code.line_text(OneIndexed::from_zero_indexed(2)), "ef");
    }
}
