use thiserror::Error;

/// Errors surfaced while loading a raw snapshot from disk (§4.7). Never
/// attempts partial-parse recovery: a malformed document is a hard error.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to read {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("failed to parse {path} as JSON: {source}")]
    Json { path: String, #[source] source: serde_json::Error },

    #[error("required object '{0}' missing from split snapshot input")]
    MissingRequired(&'static str),
}
