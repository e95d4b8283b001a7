//! Built-in migration rules

use once_cell::sync::Lazy;
use shifter_core::{MigrationRule, RuleRegistry};

pub mod paged_list;
pub mod status_code_result;

pub use paged_list::{PAGED_LIST_USING, paged_list_using_rule};
pub use status_code_result::{HTTP_STATUS_CODE_RESULT, http_status_code_result_rule};

/// Collection of built-in migration rules
pub struct BuiltinRules;

impl BuiltinRules {
    /// Every built-in rule, in registration order
    pub fn all_rules() -> Vec<MigrationRule> {
        vec![paged_list_using_rule(), http_status_code_result_rule()]
    }

    /// Ids of the built-in rules
    pub fn ids() -> &'static [&'static str] {
        &[PAGED_LIST_USING, HTTP_STATUS_CODE_RESULT]
    }
}

static BUILTIN_REGISTRY: Lazy<RuleRegistry> = Lazy::new(|| {
    let mut registry = RuleRegistry::new();
    for rule in BuiltinRules::all_rules() {
        if let Err(e) = registry.register(rule) {
            tracing::error!("Failed to register built-in rule: {}", e);
        }
    }
    tracing::debug!("Initialized built-in rules registry with {} rules", registry.len());
    registry
});

/// Process-wide registry of the built-in rules, built on first use
pub fn builtin_registry() -> &'static RuleRegistry {
    &BUILTIN_REGISTRY
}
