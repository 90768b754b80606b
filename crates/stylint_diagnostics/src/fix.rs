//! Fixes: one or more edits with an applicability level.

use stylint_text_size::{Ranged, TextSize};

use crate::Edit;

/// How confidently a fix can be applied automatically.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, is_macro::Is)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Applicability {
    /// Shown to the user but never applied automatically.
    DisplayOnly,
    /// May change program behavior; applied only on explicit opt-in.
    Unsafe,
    /// Preserves program behavior; applied by default.
    Safe,
}

/// A set of non-overlapping edits that repairs a violation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fix {
    edits: Vec<Edit>,
    applicability: Applicability,
}

impl Fix {
    /// A safe fix from a single edit.
    pub fn safe_edit(edit: Edit) -> Self {
        Self {
            edits: vec![edit],
            applicability: Applicability::Safe,
        }
    }

    /// A safe fix from multiple edits. Edits are stored sorted by range.
    pub fn safe_edits(edit: Edit, rest: impl IntoIterator<Item = Edit>) -> Self {
        let mut edits: Vec<Edit> = std::iter::once(edit).chain(rest).collect();
        edits.sort();
        Self {
            edits,
            applicability: Applicability::Safe,
        }
    }

    /// An unsafe fix from a single edit.
    pub fn unsafe_edit(edit: Edit) -> Self {
        Self {
            edits: vec![edit],
            applicability: Applicability::Unsafe,
        }
    }

    /// A display-only fix from a single edit.
    pub fn display_only_edit(edit: Edit) -> Self {
        Self {
            edits: vec![edit],
            applicability: Applicability::DisplayOnly,
        }
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn into_edits(self) -> Vec<Edit> {
        self.edits
    }

    pub fn applicability(&self) -> Applicability {
        self.applicability
    }

    /// Whether this fix should be applied at `applicability` or stricter.
    pub fn applies(&self, applicability: Applicability) -> bool {
        self.applicability >= applicability
    }

    pub fn min_start(&self) -> Option<TextSize> {
        self.edits.iter().map(Ranged::start).min()
    }
}
