//! Stylistic rules: whitespace, indentation, and ordering conventions.

pub mod arrow_spacing;
pub mod indent;
pub mod jsx_sort_props;
pub mod jsx_tag_spacing;

pub use arrow_spacing::ArrowSpacing;
pub use indent::Indent;
pub use jsx_sort_props::JsxSortProps;
pub use jsx_tag_spacing::JsxTagSpacing;
