use serde::{Deserialize, Serialize};

/// Operator-supplied knobs for a single `explain` invocation (§4.5, §4.10).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// When non-empty, only rules in these categories are evaluated.
    pub enable_categories: Vec<String>,
    /// Rules in these categories are skipped even if `enable_categories`
    /// would otherwise admit them.
    pub disable_categories: Vec<String>,
    /// Attach `metadata.rules_evaluated_detail` to the output.
    pub verbose: bool,
    /// Recorded verbatim into `metadata.engine_version`.
    pub engine_version: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            enable_categories: Vec::new(),
            disable_categories: Vec::new(),
            verbose: false,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl EngineConfig {
    pub fn category_allowed(&self, category: &str) -> bool {
        if self.disable_categories.iter().any(|c| c == category) {
            return false;
        }
        if self.enable_categories.is_empty() {
            return true;
        }
        self.enable_categories.iter().any(|c| c == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_enable_list_allows_everything_not_disabled() {
        let config = EngineConfig { disable_categories: vec!["owner".into()], ..EngineConfig::default() };
        assert!(config.category_allowed("storage"));
        assert!(!config.category_allowed("owner"));
    }

    #[test]
    fn non_empty_enable_list_is_an_allowlist() {
        let config = EngineConfig { enable_categories: vec!["image".into()], ..EngineConfig::default() };
        assert!(config.category_allowed("image"));
        assert!(!config.category_allowed("storage"));
    }

    #[test]
    fn disable_wins_over_enable() {
        let config = EngineConfig {
            enable_categories: vec!["image".into()],
            disable_categories: vec!["image".into()],
            ..EngineConfig::default()
        };
        assert!(!config.category_allowed("image"));
    }
}
