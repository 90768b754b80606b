//! Violations and the diagnostics they produce.
//!
//! A rule defines one struct per distinct violation it can report and
//! implements [`Violation`] for it; [`Diagnostic::new`] pairs that violation
//! with the source range it covers. The violation type's name doubles as the
//! diagnostic code, so codes stay in sync with the types for free.

use stylint_text_size::TextRange;

use crate::Fix;

/// Whether a violation type can carry a fix.
#[derive(Copy, Clone, Debug, Default, Hash, PartialEq, Eq)]
pub enum FixAvailability {
    /// Every instance of the violation is fixable.
    Always,
    /// Fixability depends on the surrounding code.
    Sometimes,
    #[default]
    None,
}

/// A distinct, reportable rule violation.
pub trait Violation: std::fmt::Debug + Clone + Send + Sync {
    const FIX_AVAILABILITY: FixAvailability = FixAvailability::None;

    /// The user-facing message, including any computed values.
    fn message(&self) -> String;

    /// A short description of what the fix does, when one exists.
    fn fix_title(&self) -> Option<String> {
        None
    }
}

/// Code and message of a reported violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticKind {
    /// The violation type's name, e.g. "IndentationError".
    pub code: String,
    pub body: String,
}

/// A violation located in a source file, with an optional fix.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub range: TextRange,
    pub fix: Option<Fix>,
}

impl Diagnostic {
    #[allow(clippy::needless_pass_by_value)]
    pub fn new<V: Violation>(violation: V, range: TextRange) -> Self {
        let type_name = std::any::type_name::<V>();
        let code = type_name.rsplit("::").next().unwrap_or(type_name);
        Self {
            kind: DiagnosticKind {
                code: code.to_string(),
                body: violation.message(),
            },
            range,
            fix: None,
        }
    }

    #[must_use]
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn set_fix(&mut self, fix: Fix) {
        self.fix = Some(fix);
    }

    pub fn fixable(&self) -> bool {
        self.fix.is_some()
    }
}
