use crate::rule::Rule;
use kubediag_types::DiagnosticError;
use std::collections::HashSet;
use tracing::debug;

/// Discovers rules at engine construction time, validates uniqueness of
/// `name`, and holds them sorted by `(priority desc, name asc)` for
/// deterministic evaluation order (§4.4).
pub struct Registry {
    rules: Vec<Box<dyn Rule>>,
}

impl Registry {
    /// Build a registry from a set of rules (programmatic and/or
    /// declarative — the registry does not distinguish). Fails with
    /// `DuplicateRuleName` if two rules share a name; this is a
    /// `RuleMalformed` condition discovered at construction, not
    /// invocation (§7).
    pub fn new(mut rules: Vec<Box<dyn Rule>>) -> Result<Self, DiagnosticError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.name().to_string()) {
                return Err(DiagnosticError::DuplicateRuleName(rule.name().to_string()));
            }
        }

        rules.sort_by(|a, b| b.priority().cmp(&a.priority()).then_with(|| a.name().cmp(b.name())));

        debug!(count = rules.len(), "rule registry constructed");
        Ok(Registry { rules })
    }

    /// Rules in deterministic `(priority desc, name asc)` evaluation
    /// order.
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn categories(&self) -> Vec<&str> {
        let mut cats: Vec<&str> = self.rules.iter().map(|r| r.category()).collect();
        cats.sort_unstable();
        cats.dedup();
        cats
    }

    pub fn find(&self, name: &str) -> Option<&dyn Rule> {
        self.rules.iter().find(|r| r.name() == name).map(|b| b.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Requirements;
    use kubediag_graph::ObjectGraph;
    use kubediag_timeline::Timeline;
    use kubediag_types::CausalChain;

    struct Stub {
        name: &'static str,
        priority: i32,
    }

    impl Rule for Stub {
        fn name(&self) -> &str {
            self.name
        }
        fn category(&self) -> &str {
            "test"
        }
        fn priority(&self) -> i32 {
            self.priority
        }
        fn requires(&self) -> Requirements {
            Requirements::default()
        }
        fn blocks(&self) -> &[String] {
            &[]
        }
        fn rule_confidence(&self) -> f64 {
            0.5
        }
        fn matches(&self, _graph: &ObjectGraph, _timeline: &Timeline) -> bool {
            false
        }
        fn explain(&self, _graph: &ObjectGraph, _timeline: &Timeline) -> CausalChain {
            CausalChain::default()
        }
    }

    #[test]
    fn sorts_by_priority_desc_then_name_asc() {
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(Stub { name: "b", priority: 10 }),
            Box::new(Stub { name: "a", priority: 10 }),
            Box::new(Stub { name: "z", priority: 20 }),
        ];
        let registry = Registry::new(rules).unwrap();
        let names: Vec<&str> = registry.rules().iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["z", "a", "b"]);
    }

    #[test]
    fn rejects_duplicate_names() {
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(Stub { name: "dup", priority: 1 }),
            Box::new(Stub { name: "dup", priority: 2 }),
        ];
        assert!(matches!(Registry::new(rules), Err(DiagnosticError::DuplicateRuleName(_))));
    }
}
