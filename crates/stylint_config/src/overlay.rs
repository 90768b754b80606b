//! Parser for stylint.toml overlay configuration files.
//!
//! The overlay never defines which rules run; it only adjusts how their
//! violations are handled and can point at the rules file:
//!
//! ```toml
//! [fix]
//! unsafe_fixes = false
//!
//! [fix.rules]
//! indent = "fix"
//! arrow-spacing = "check"
//! jsx-sort-props = "suggest"
//! jsx-tag-spacing = "disabled"
//!
//! [stylintrc]
//! config = "config/stylintrc.json"
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OverlayConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// How a rule's violations are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleMode {
    #[default]
    Fix,
    /// Report only.
    Check,
    /// Report with the fix shown but not applied.
    Suggest,
    /// Skip the rule entirely, whatever the rules file says.
    Disabled,
}

impl RuleMode {
    fn from_keyword(keyword: &str) -> Option<Self> {
        // Accepted case-insensitively; "off" matches the rules-file idiom.
        Some(match keyword.to_lowercase().as_str() {
            "fix" => RuleMode::Fix,
            "check" => RuleMode::Check,
            "suggest" => RuleMode::Suggest,
            "disabled" | "disable" | "off" => RuleMode::Disabled,
            _ => return None,
        })
    }
}

impl<'de> Deserialize<'de> for RuleMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let keyword = String::deserialize(deserializer)?;
        RuleMode::from_keyword(&keyword).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "Invalid rule mode: {keyword}. Expected fix, check, suggest, or disabled"
            ))
        })
    }
}

/// The `[fix]` table.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FixConfig {
    /// Apply unsafe fixes without the --unsafe flag.
    #[serde(default)]
    pub unsafe_fixes: bool,

    #[serde(default)]
    pub rules: HashMap<String, RuleMode>,
}

/// The `[stylintrc]` table: where the rules file lives.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RcReference {
    pub config: Option<String>,
}

/// Root stylint.toml configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OverlayConfig {
    #[serde(default)]
    pub fix: FixConfig,

    #[serde(default)]
    pub stylintrc: RcReference,
}

impl OverlayConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, OverlayConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, OverlayConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// The fix mode for a rule; unlisted rules default to `Fix`.
    pub fn rule_mode(&self, rule_name: &str) -> RuleMode {
        self.fix
            .rules
            .get(rule_name)
            .copied()
            .unwrap_or_default()
    }

    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rule_mode(rule_name) != RuleMode::Disabled
    }

    pub fn should_fix(&self, rule_name: &str) -> bool {
        self.rule_mode(rule_name) == RuleMode::Fix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_overlay_is_all_defaults() {
        let config = OverlayConfig::parse("").unwrap();
        assert!(!config.fix.unsafe_fixes);
        assert!(config.stylintrc.config.is_none());
        // Everything fixes by default.
        assert_eq!(config.rule_mode("indent"), RuleMode::Fix);
        assert!(config.should_fix("indent"));
    }

    #[test]
    fn test_full_overlay() {
        let toml = r#"
[fix]
unsafe_fixes = true

[fix.rules]
indent = "fix"
arrow-spacing = "check"
jsx-sort-props = "suggest"
jsx-tag-spacing = "disabled"

[stylintrc]
config = "config/stylintrc.json"
"#;
        let config = OverlayConfig::parse(toml).unwrap();

        assert!(config.fix.unsafe_fixes);
        assert_eq!(config.rule_mode("arrow-spacing"), RuleMode::Check);
        assert_eq!(config.rule_mode("jsx-sort-props"), RuleMode::Suggest);
        assert_eq!(config.rule_mode("jsx-tag-spacing"), RuleMode::Disabled);
        assert_eq!(config.stylintrc.config.as_deref(), Some("config/stylintrc.json"));

        assert!(config.is_rule_enabled("indent"));
        assert!(!config.is_rule_enabled("jsx-tag-spacing"));
        assert!(config.should_fix("indent"));
        assert!(!config.should_fix("arrow-spacing"));
    }

    #[test]
    fn test_mode_keywords_are_case_insensitive() {
        assert_eq!(RuleMode::from_keyword("FIX"), Some(RuleMode::Fix));
        assert_eq!(RuleMode::from_keyword("Check"), Some(RuleMode::Check));
        assert_eq!(RuleMode::from_keyword("off"), Some(RuleMode::Disabled));
        assert_eq!(RuleMode::from_keyword("loud"), None);
    }

    #[test]
    fn test_invalid_mode_is_a_parse_error() {
        let toml = "[fix.rules]\nindent = \"loudly\"\n";
        assert!(matches!(
            OverlayConfig::parse(toml),
            Err(OverlayConfigError::Toml(_))
        ));
    }
}
