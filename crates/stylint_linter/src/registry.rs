//! Rule registry for mapping rules-file keys to rule implementations.

use std::collections::HashMap;

use serde_json::Value;

use crate::Rule;

/// Rule options from the rules file: everything after the severity entry.
pub type RuleOptions = [Value];

/// Trait for rules that can be constructed from rules-file options.
pub trait FromConfig: Rule + Sized {
    /// The rules-file key this rule corresponds to.
    const RULE_NAME: &'static str;

    /// Create a rule instance from its options array.
    /// Unrecognized or missing entries fall back to defaults.
    fn from_config(options: &RuleOptions) -> Self;
}

/// A factory function that creates a boxed rule from options.
type RuleFactory = fn(&RuleOptions) -> Box<dyn Rule>;

/// Registry mapping rule names to rule factories.
pub struct RuleRegistry {
    factories: HashMap<&'static str, RuleFactory>,
}

impl RuleRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry with all built-in rules registered.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }

    /// Register a rule type that implements FromConfig.
    pub fn register<R: FromConfig + 'static>(&mut self) {
        self.factories
            .insert(R::RULE_NAME, |options| Box::new(R::from_config(options)));
    }

    /// Register all built-in rules.
    fn register_builtins(&mut self) {
        use crate::rules::{ArrowSpacing, Indent, JsxSortProps, JsxTagSpacing};

        self.register::<Indent>();
        self.register::<ArrowSpacing>();
        self.register::<JsxSortProps>();
        self.register::<JsxTagSpacing>();
    }

    /// Create a rule from a rule name and options.
    /// Returns None if the rule name is not recognized.
    pub fn create_rule(&self, rule_name: &str, options: &RuleOptions) -> Option<Box<dyn Rule>> {
        self.factories
            .get(rule_name)
            .map(|factory| factory(options))
    }

    /// Check if a rule name is registered.
    pub fn has_rule(&self, rule_name: &str) -> bool {
        self.factories.contains_key(rule_name)
    }

    /// Get all registered rule names.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
