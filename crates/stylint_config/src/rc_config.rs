//! Parser for .stylintrc.json rule configuration files.
//!
//! The rules file follows the ESLint convention: a rule maps either to a
//! bare severity or to an array whose first entry is the severity and whose
//! remaining entries are rule-specific options, passed through opaquely.
//!
//! ```json
//! {
//!     "rules": {
//!         "indent": ["error", 4, { "SwitchCase": 1 }],
//!         "arrow-spacing": "warn",
//!         "jsx-tag-spacing": 2
//!     }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RcConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid severity for rule '{rule}': {value}")]
    InvalidSeverity { rule: String, value: String },
}

/// Severity of a configured rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Off,
    Warn,
    Error,
}

impl Severity {
    fn from_value(rule: &str, value: &Value) -> Result<Self, RcConfigError> {
        match value {
            Value::String(s) => match s.to_lowercase().as_str() {
                "off" => Ok(Severity::Off),
                "warn" => Ok(Severity::Warn),
                "error" => Ok(Severity::Error),
                _ => Err(RcConfigError::InvalidSeverity {
                    rule: rule.to_string(),
                    value: s.clone(),
                }),
            },
            Value::Number(n) => match n.as_u64() {
                Some(0) => Ok(Severity::Off),
                Some(1) => Ok(Severity::Warn),
                Some(2) => Ok(Severity::Error),
                _ => Err(RcConfigError::InvalidSeverity {
                    rule: rule.to_string(),
                    value: n.to_string(),
                }),
            },
            other => Err(RcConfigError::InvalidSeverity {
                rule: rule.to_string(),
                value: other.to_string(),
            }),
        }
    }

    pub fn is_enabled(self) -> bool {
        self != Severity::Off
    }
}

/// One configured rule: severity plus opaque options.
#[derive(Debug, Clone, Default)]
pub struct RuleEntry {
    pub severity: Severity,
    pub options: Vec<Value>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct RawRcConfig {
    #[serde(default)]
    rules: BTreeMap<String, Value>,
}

/// Parsed .stylintrc.json.
#[derive(Debug, Clone, Default)]
pub struct RcConfig {
    /// Rules by name, in file order (BTreeMap keeps iteration deterministic).
    pub rules: BTreeMap<String, RuleEntry>,
}

impl RcConfig {
    /// Parse a .stylintrc.json file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RcConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse .stylintrc.json content.
    pub fn parse(content: &str) -> Result<Self, RcConfigError> {
        let raw: RawRcConfig = serde_json::from_str(content)?;
        let mut rules = BTreeMap::new();
        for (name, value) in raw.rules {
            let entry = match value {
                Value::Array(items) => {
                    let mut items = items.into_iter();
                    let severity = match items.next() {
                        Some(first) => Severity::from_value(&name, &first)?,
                        None => Severity::default(),
                    };
                    RuleEntry {
                        severity,
                        options: items.collect(),
                    }
                }
                other => RuleEntry {
                    severity: Severity::from_value(&name, &other)?,
                    options: Vec::new(),
                },
            };
            rules.insert(name, entry);
        }
        Ok(Self { rules })
    }

    pub fn rule(&self, name: &str) -> Option<&RuleEntry> {
        self.rules.get(name)
    }
}
