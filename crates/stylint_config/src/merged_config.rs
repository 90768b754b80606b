//! Merged configuration from .stylintrc.json and stylint.toml.
//!
//! The rules file defines *what* rules run, their severity and options.
//! stylint.toml defines *how* violations are handled.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::{OverlayConfig, OverlayConfigError, RcConfig, RcConfigError, RuleMode, Severity};

/// Error during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading/parsing .stylintrc.json.
    #[error("Rules config error: {0}")]
    Rc(#[from] RcConfigError),
    /// Error reading/parsing stylint.toml.
    #[error("Overlay config error: {0}")]
    Overlay(#[from] OverlayConfigError),
    /// No configuration found.
    #[error("No configuration found")]
    NoConfig,
}

/// A configured rule with its options and mode.
#[derive(Debug, Clone)]
pub struct ConfiguredRule {
    /// The rule name (e.g. "indent").
    pub name: String,
    /// Severity from the rules file.
    pub severity: Severity,
    /// Rule options from the rules file, passed through opaquely.
    pub options: Vec<Value>,
    /// How to handle violations (from stylint.toml).
    pub mode: RuleMode,
}

impl ConfiguredRule {
    /// Check if this rule is enabled.
    pub fn is_enabled(&self) -> bool {
        self.severity.is_enabled() && self.mode != RuleMode::Disabled
    }

    /// Check if this rule should auto-fix.
    pub fn should_fix(&self) -> bool {
        self.mode == RuleMode::Fix
    }
}

/// Merged configuration combining .stylintrc.json and stylint.toml.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    /// All configured rules.
    pub rules: Vec<ConfiguredRule>,
    /// Whether to apply unsafe fixes.
    pub unsafe_fixes: bool,
}

impl MergedConfig {
    /// Create a merged config from the rules file and optional overlay.
    pub fn new(rc: &RcConfig, overlay: Option<&OverlayConfig>) -> Self {
        let overlay = overlay.cloned().unwrap_or_default();

        let rules = rc
            .rules
            .iter()
            .map(|(name, entry)| ConfiguredRule {
                name: name.clone(),
                severity: entry.severity,
                options: entry.options.clone(),
                mode: overlay.rule_mode(name),
            })
            .collect();

        Self {
            rules,
            unsafe_fixes: overlay.fix.unsafe_fixes,
        }
    }

    /// Get enabled rules (severity on and not disabled by the overlay).
    pub fn enabled_rules(&self) -> impl Iterator<Item = &ConfiguredRule> {
        self.rules.iter().filter(|r| r.is_enabled())
    }

    /// Get a specific rule by name.
    pub fn get_rule(&self, name: &str) -> Option<&ConfiguredRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Check if a rule is enabled.
    pub fn is_rule_enabled(&self, name: &str) -> bool {
        self.get_rule(name).map(|r| r.is_enabled()).unwrap_or(false)
    }
}

/// Builder for loading configuration from files.
pub struct ConfigLoader {
    rc_path: Option<std::path::PathBuf>,
    overlay_path: Option<std::path::PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new() -> Self {
        Self {
            rc_path: None,
            overlay_path: None,
        }
    }

    /// Set the .stylintrc.json path.
    pub fn rc(mut self, path: impl AsRef<Path>) -> Self {
        self.rc_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the stylint.toml path.
    pub fn overlay(mut self, path: impl AsRef<Path>) -> Self {
        self.overlay_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Try to find stylint.toml in common locations.
    pub fn find_overlay(mut self) -> Self {
        let candidates = ["stylint.toml", ".stylint.toml", "config/stylint.toml"];
        for candidate in candidates {
            if Path::new(candidate).exists() {
                self.overlay_path = Some(std::path::PathBuf::from(candidate));
                break;
            }
        }
        self
    }

    /// Try to find the rules file from stylint.toml or common locations.
    pub fn find_rc(mut self, overlay: Option<&OverlayConfig>) -> Self {
        if let Some(overlay) = overlay {
            if let Some(path) = &overlay.stylintrc.config {
                if Path::new(path).exists() {
                    self.rc_path = Some(std::path::PathBuf::from(path));
                    return self;
                }
            }
        }

        let candidates = [
            ".stylintrc.json",
            "stylintrc.json",
            "config/stylintrc.json",
        ];
        for candidate in candidates {
            if Path::new(candidate).exists() {
                self.rc_path = Some(std::path::PathBuf::from(candidate));
                break;
            }
        }
        self
    }

    /// Load and merge the configuration.
    pub fn load(self) -> Result<MergedConfig, ConfigError> {
        let overlay = match &self.overlay_path {
            Some(path) if path.exists() => Some(OverlayConfig::from_file(path)?),
            _ => None,
        };

        let rc_path = self.rc_path.or_else(|| {
            overlay
                .as_ref()
                .and_then(|o| o.stylintrc.config.as_ref().map(std::path::PathBuf::from))
        });

        let rc = match rc_path {
            Some(path) if path.exists() => RcConfig::from_file(&path)?,
            Some(path) => {
                return Err(ConfigError::Rc(RcConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Rules config not found: {}", path.display()),
                ))));
            }
            None => return Err(ConfigError::NoConfig),
        };

        Ok(MergedConfig::new(&rc, overlay.as_ref()))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
