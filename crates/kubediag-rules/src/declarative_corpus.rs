//! The data-driven half of the rule corpus (§4.4, §9): atomic,
//! single-signal rules described entirely as YAML, interpreted by
//! `crate::declarative::DeclarativeRule`. The compound and
//! cross-object rules live in `crate::corpus` instead.

use crate::declarative::{parse_rule_specs, DeclarativeRule};
use crate::rule::Rule;
use kubediag_types::DiagnosticError;

const CORPUS_YAML: &str = include_str!("declarative_corpus.yaml");

/// Parse and instantiate every rule in the embedded YAML corpus.
pub fn declarative_rules() -> Result<Vec<Box<dyn Rule>>, DiagnosticError> {
    let specs = parse_rule_specs(CORPUS_YAML)?;
    specs
        .into_iter()
        .map(|spec| DeclarativeRule::new(spec).map(|r| Box::new(r) as Box<dyn Rule>))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_corpus_parses_and_builds_without_duplicate_names() {
        let rules = declarative_rules().expect("embedded corpus is well-formed");
        assert!(rules.len() >= 30);
        let mut names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
        names.sort_unstable();
        let before = names.len();
        names.dedup();
        assert_eq!(names.len(), before, "declarative corpus must not declare duplicate rule names");
    }
}
