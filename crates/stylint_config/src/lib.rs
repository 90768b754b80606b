//! Configuration loading for stylint.
//!
//! Two layers, merged before any file is linted:
//!
//! - `.stylintrc.json` defines *what* rules run, their severity and options.
//! - `stylint.toml` (optional overlay) defines *how* violations are handled:
//!   per-rule fix modes and the unsafe-fix opt-in.

pub use merged_config::{ConfigError, ConfigLoader, ConfiguredRule, MergedConfig};
pub use overlay::{FixConfig, OverlayConfig, OverlayConfigError, RcReference, RuleMode};
pub use rc_config::{RcConfig, RcConfigError, RuleEntry, Severity};

mod merged_config;
mod overlay;
mod rc_config;
