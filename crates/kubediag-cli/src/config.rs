//! Loads `EngineConfig` knobs from an optional TOML/JSON file, then lets
//! CLI flags override individual fields (§4.10: "flags override file
//! values").

use crate::error::CliError;
use kubediag_engine::EngineConfig;
use std::path::Path;

pub fn load_base_config(path: Option<&Path>) -> Result<EngineConfig, CliError> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };

    let text = std::fs::read_to_string(path).map_err(|source| CliError::ConfigIo { path: path.display().to_string(), source })?;

    let is_toml = path.extension().and_then(|e| e.to_str()).map(|e| e.eq_ignore_ascii_case("toml")).unwrap_or(false);

    if is_toml {
        toml::from_str(&text).map_err(|err| CliError::ConfigParse { path: path.display().to_string(), detail: err.to_string() })
    } else {
        serde_json::from_str(&text).map_err(|err| CliError::ConfigParse { path: path.display().to_string(), detail: err.to_string() })
    }
}

/// CLI-flag overrides, applied on top of a file-loaded (or default)
/// `EngineConfig`. `None`/empty means "not specified on the command line".
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub enable_categories: Vec<String>,
    pub disable_categories: Vec<String>,
    pub verbose: bool,
    pub engine_version: Option<String>,
}

pub fn apply_overrides(mut config: EngineConfig, overrides: ConfigOverrides) -> EngineConfig {
    if !overrides.enable_categories.is_empty() {
        config.enable_categories = overrides.enable_categories;
    }
    if !overrides.disable_categories.is_empty() {
        config.disable_categories = overrides.disable_categories;
    }
    if overrides.verbose {
        config.verbose = true;
    }
    if let Some(version) = overrides.engine_version {
        config.engine_version = version;
    }
    config
}
