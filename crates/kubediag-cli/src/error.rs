use kubediag_io::LoaderError;
use kubediag_types::DiagnosticError;
use thiserror::Error;

/// Errors that produce a nonzero exit code. A diagnosis itself never
/// fails this way — `explain` always returns an `Explanation`, setting
/// `metadata.error` on normalization failure. Only loading the snapshot
/// or constructing the registry can fail the invocation (§4.9).
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Loader(#[from] LoaderError),

    #[error("rule registry construction failed: {0}")]
    Registry(#[from] DiagnosticError),

    #[error("failed to read config file {path}: {source}")]
    ConfigIo { path: String, #[source] source: std::io::Error },

    #[error("failed to parse config file {path}: {detail}")]
    ConfigParse { path: String, detail: String },
}
