//! The Rule contract, the Registry, the declarative rule interpreter,
//! and the diagnosis rule corpus (§4.4, §9).

#![deny(unsafe_code)]
#![warn(rust_2018_idioms)]

mod corpus;
mod declarative;
mod declarative_corpus;
mod registry;
mod rule;

pub use declarative::{CauseTemplate, ChainTemplateSpec, DeclarativeRule, EvidenceTemplate, PredicateSpec, RuleSpec};
pub use registry::Registry;
pub use rule::{Requirements, Rule};

use kubediag_types::DiagnosticError;
use tracing::debug;

/// Build the full ~60-rule registry: the hand-coded compound/cross-object
/// rules plus the embedded declarative corpus (§2, §4.4).
pub fn default_registry() -> Result<Registry, DiagnosticError> {
    let mut rules = corpus::programmatic_rules();
    rules.extend(declarative_corpus::declarative_rules()?);
    debug!(count = rules.len(), "building default rule registry");
    Registry::new(rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_builds_without_duplicate_names() {
        let registry = default_registry().expect("default registry builds");
        assert!(registry.len() >= 50);
    }

    #[test]
    fn default_registry_covers_every_documented_category() {
        let registry = default_registry().expect("default registry builds");
        let categories = registry.categories();
        for expected in [
            "scheduling",
            "storage",
            "image",
            "probe",
            "network",
            "admission",
            "node-pressure",
            "owner",
            "lifecycle",
        ] {
            assert!(categories.contains(&expected), "missing category {expected}");
        }
    }
}
