//! Byte-offset newtypes for addressing source text.
//!
//! `TextSize` is an absolute byte offset (or length) into a UTF-8 source
//! string; `TextRange` is a half-open `[start, end)` pair of offsets. Using
//! newtypes instead of raw `usize` keeps offsets from being confused with
//! line or column numbers anywhere in the workspace.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Index, Range, Sub, SubAssign};

/// An absolute byte offset into source text, or a byte length.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TextSize {
    raw: u32,
}

impl TextSize {
    pub const fn new(raw: u32) -> Self {
        Self { raw }
    }

    pub const fn to_u32(self) -> u32 {
        self.raw
    }

    pub const fn to_usize(self) -> usize {
        self.raw as usize
    }

    /// The size of `text` in bytes.
    pub fn of(text: &str) -> Self {
        Self {
            raw: u32::try_from(text.len()).expect("source text larger than 4 GiB"),
        }
    }

    pub fn checked_add(self, rhs: TextSize) -> Option<TextSize> {
        self.raw.checked_add(rhs.raw).map(Self::new)
    }

    pub fn checked_sub(self, rhs: TextSize) -> Option<TextSize> {
        self.raw.checked_sub(rhs.raw).map(Self::new)
    }
}

impl fmt::Debug for TextSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl fmt::Display for TextSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl From<u32> for TextSize {
    fn from(raw: u32) -> Self {
        Self::new(raw)
    }
}

impl From<TextSize> for u32 {
    fn from(size: TextSize) -> Self {
        size.raw
    }
}

impl From<TextSize> for usize {
    fn from(size: TextSize) -> Self {
        size.raw as usize
    }
}

impl TryFrom<usize> for TextSize {
    type Error = std::num::TryFromIntError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Ok(Self::new(u32::try_from(value)?))
    }
}

impl Add for TextSize {
    type Output = TextSize;

    fn add(self, rhs: TextSize) -> TextSize {
        TextSize::new(self.raw + rhs.raw)
    }
}

impl Sub for TextSize {
    type Output = TextSize;

    fn sub(self, rhs: TextSize) -> TextSize {
        TextSize::new(self.raw - rhs.raw)
    }
}

impl AddAssign for TextSize {
    fn add_assign(&mut self, rhs: TextSize) {
        self.raw += rhs.raw;
    }
}

impl SubAssign for TextSize {
    fn sub_assign(&mut self, rhs: TextSize) {
        self.raw -= rhs.raw;
    }
}

impl Sum for TextSize {
    fn sum<I: Iterator<Item = TextSize>>(iter: I) -> TextSize {
        iter.fold(TextSize::default(), Add::add)
    }
}

/// A half-open byte range `[start, end)` in source text.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRange {
    start: TextSize,
    end: TextSize,
}

impl TextRange {
    /// Creates a new range. Panics if `start > end`.
    pub fn new(start: TextSize, end: TextSize) -> Self {
        assert!(start <= end, "invalid range {start:?}..{end:?}");
        Self { start, end }
    }

    /// Creates a zero-length range at `offset`.
    pub const fn empty(offset: TextSize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Creates a range starting at `offset` with the given length.
    pub fn at(offset: TextSize, len: TextSize) -> Self {
        Self::new(offset, offset + len)
    }

    /// Creates a range spanning `0..end`.
    pub fn up_to(end: TextSize) -> Self {
        Self::new(TextSize::default(), end)
    }

    pub const fn start(self) -> TextSize {
        self.start
    }

    pub const fn end(self) -> TextSize {
        self.end
    }

    pub fn len(self) -> TextSize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn contains(self, offset: TextSize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn contains_inclusive(self, offset: TextSize) -> bool {
        self.start <= offset && offset <= self.end
    }

    pub fn contains_range(self, other: TextRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The intersection of two ranges, if they overlap or touch.
    pub fn intersect(self, other: TextRange) -> Option<TextRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start <= end {
            Some(TextRange::new(start, end))
        } else {
            None
        }
    }

    /// The smallest range covering both ranges.
    pub fn cover(self, other: TextRange) -> TextRange {
        TextRange::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn add_start(self, amount: TextSize) -> TextRange {
        TextRange::new(self.start + amount, self.end)
    }

    pub fn sub_start(self, amount: TextSize) -> TextRange {
        TextRange::new(self.start - amount, self.end)
    }

    pub fn add_end(self, amount: TextSize) -> TextRange {
        TextRange::new(self.start, self.end + amount)
    }

    /// Orders ranges by start, then by end.
    pub fn ordering(self, other: TextRange) -> Ordering {
        self.start
            .cmp(&other.start)
            .then(self.end.cmp(&other.end))
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl From<TextRange> for Range<usize> {
    fn from(range: TextRange) -> Self {
        range.start.into()..range.end.into()
    }
}

impl Index<TextRange> for str {
    type Output = str;

    fn index(&self, range: TextRange) -> &str {
        &self[Range::<usize>::from(range)]
    }
}

impl Index<TextRange> for String {
    type Output = str;

    fn index(&self, range: TextRange) -> &str {
        &self.as_str()[range]
    }
}

/// Types that occupy a range of source text.
pub trait Ranged {
    fn range(&self) -> TextRange;

    fn start(&self) -> TextSize {
        self.range().start()
    }

    fn end(&self) -> TextSize {
        self.range().end()
    }
}

impl Ranged for TextRange {
    fn range(&self) -> TextRange {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_eq_size;

    assert_eq_size!(TextSize, u32);
    assert_eq_size!(Option<TextSize>, u64);

    #[test]
    fn size_arithmetic() {
        let a = TextSize::new(4);
        let b = TextSize::new(6);
        assert_eq!(a + b, TextSize::new(10));
        assert_eq!(b - a, TextSize::new(2));
        assert_eq!(a.checked_sub(b), None);
        assert_eq!(usize::from(a), 4);
    }

    #[test]
    fn size_of_text() {
        assert_eq!(TextSize::of(""), TextSize::new(0));
        assert_eq!(TextSize::of("héllo"), TextSize::new(6));
    }

    #[test]
    fn range_contains() {
        let range = TextRange::new(TextSize::new(2), TextSize::new(5));
        assert!(!range.contains(TextSize::new(1)));
        assert!(range.contains(TextSize::new(2)));
        assert!(range.contains(TextSize::new(4)));
        assert!(!range.contains(TextSize::new(5)));
        assert!(range.contains_inclusive(TextSize::new(5)));
    }

    #[test]
    fn range_set_operations() {
        let a = TextRange::new(TextSize::new(0), TextSize::new(4));
        let b = TextRange::new(TextSize::new(2), TextSize::new(8));
        assert_eq!(
            a.intersect(b),
            Some(TextRange::new(TextSize::new(2), TextSize::new(4)))
        );
        assert_eq!(a.cover(b), TextRange::new(TextSize::new(0), TextSize::new(8)));

        let c = TextRange::new(TextSize::new(10), TextSize::new(12));
        assert_eq!(a.intersect(c), None);
    }

    #[test]
    fn str_indexing() {
        let text = "hello world";
        let range = TextRange::new(TextSize::new(6), TextSize::new(11));
        assert_eq!(&text[range], "world");
    }
}
