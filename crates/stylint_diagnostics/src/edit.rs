//! A single replacement of a source range.

use std::cmp::Ordering;

use stylint_text_size::{Ranged, TextRange, TextSize};

/// A text edit: delete `range` and insert `content` in its place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edit {
    range: TextRange,
    content: Option<Box<str>>,
}

impl Edit {
    /// Replaces `range` with `content`.
    pub fn range_replacement(content: String, range: TextRange) -> Self {
        debug_assert!(!content.is_empty(), "use `Edit::deletion` instead");
        Self {
            range,
            content: Some(Box::from(content)),
        }
    }

    /// Deletes `start..end`.
    pub fn deletion(start: TextSize, end: TextSize) -> Self {
        Self {
            range: TextRange::new(start, end),
            content: None,
        }
    }

    /// Deletes `range`.
    pub fn range_deletion(range: TextRange) -> Self {
        Self {
            range,
            content: None,
        }
    }

    /// Inserts `content` at `offset`.
    pub fn insertion(content: String, offset: TextSize) -> Self {
        debug_assert!(!content.is_empty(), "insertion content must not be empty");
        Self {
            range: TextRange::empty(offset),
            content: Some(Box::from(content)),
        }
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn is_insertion(&self) -> bool {
        self.range.is_empty()
    }

    pub fn is_deletion(&self) -> bool {
        self.content.is_none()
    }
}

impl Ranged for Edit {
    fn range(&self) -> TextRange {
        self.range
    }
}

impl Ord for Edit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.range
            .ordering(other.range)
            .then_with(|| self.content.cmp(&other.content))
    }
}

impl PartialOrd for Edit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_by_range_then_content() {
        let a = Edit::insertion("x".to_string(), TextSize::new(1));
        let b = Edit::deletion(TextSize::new(1), TextSize::new(3));
        let c = Edit::deletion(TextSize::new(4), TextSize::new(5));
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn kind_predicates() {
        let ins = Edit::insertion(" ".to_string(), TextSize::new(0));
        assert!(ins.is_insertion());
        assert!(!ins.is_deletion());

        let del = Edit::deletion(TextSize::new(0), TextSize::new(2));
        assert!(del.is_deletion());
        assert!(!del.is_insertion());
    }
}
