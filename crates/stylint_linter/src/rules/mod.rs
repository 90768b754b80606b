//! Lint rule implementations, grouped by category.

pub mod stylistic;

pub use stylistic::{ArrowSpacing, Indent, JsxSortProps, JsxTagSpacing};
