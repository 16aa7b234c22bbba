//! Reads raw snapshot input from disk (§4.7). Two shapes are accepted: a
//! single combined document matching `RawSnapshot` exactly, or one JSON
//! file per object kind assembled into a `RawSnapshot`. Either way the
//! emitted snapshot is exactly what the normalizer expects; unknown extra
//! keys are ignored via `serde`'s default behavior.

use crate::error::LoaderError;
use kubediag_graph::raw::{
    OneOrMany, RawEvent, RawNode, RawOwner, RawPod, RawPvc, RawServiceAccount, RawSnapshot, RawStorageClass,
};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Paths to a per-object-kind split snapshot. Only `pod` is required; the
/// rest mirror `RawSnapshot`'s optional fields.
#[derive(Debug, Default, Clone)]
pub struct SnapshotPaths {
    pub pod: Option<PathBuf>,
    pub events: Option<PathBuf>,
    pub pvc: Option<PathBuf>,
    pub pv: Option<PathBuf>,
    pub storageclass: Option<PathBuf>,
    pub node: Option<PathBuf>,
    pub owner: Option<PathBuf>,
    pub serviceaccount: Option<PathBuf>,
    pub secrets: Option<PathBuf>,
    pub configmaps: Option<PathBuf>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoaderError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoaderError::Io { path: path.display().to_string(), source })?;
    serde_json::from_str(&text).map_err(|source| LoaderError::Json { path: path.display().to_string(), source })
}

fn read_json_optional<T: DeserializeOwned>(path: Option<&PathBuf>) -> Result<Option<T>, LoaderError> {
    match path {
        Some(p) => Ok(Some(read_json(p)?)),
        None => Ok(None),
    }
}

/// Load a single combined document that already has the `RawSnapshot`
/// shape (pod, events, and any optional objects inline).
pub fn load_combined(path: impl AsRef<Path>) -> Result<RawSnapshot, LoaderError> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading combined snapshot");
    read_json(path)
}

/// Load a snapshot assembled from one JSON file per object kind.
pub fn load_split(paths: &SnapshotPaths) -> Result<RawSnapshot, LoaderError> {
    let pod_path = paths.pod.as_ref().ok_or(LoaderError::MissingRequired("pod"))?;
    let pod: RawPod = read_json(pod_path)?;
    let events: Vec<RawEvent> = match &paths.events {
        Some(p) => read_json(p)?,
        None => Vec::new(),
    };

    tracing::debug!(pod = %pod_path.display(), "loading split snapshot");

    Ok(RawSnapshot {
        pod,
        events,
        pvc: read_json_optional::<OneOrMany<RawPvc>>(paths.pvc.as_ref())?,
        pv: read_json_optional(paths.pv.as_ref())?,
        storageclass: read_json_optional::<OneOrMany<RawStorageClass>>(paths.storageclass.as_ref())?,
        node: read_json_optional::<RawNode>(paths.node.as_ref())?,
        owner: read_json_optional::<RawOwner>(paths.owner.as_ref())?,
        serviceaccount: read_json_optional::<RawServiceAccount>(paths.serviceaccount.as_ref())?,
        secrets: read_json_optional(paths.secrets.as_ref())?,
        configmaps: read_json_optional(paths.configmaps.as_ref())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("kubediag-io-test-{}-{}.json", std::process::id(), contents.len()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_combined_parses_minimal_snapshot() {
        let path = write_temp(r#"{"pod":{"metadata":{"name":"web-0"},"status":{"phase":"Pending"}},"events":[]}"#);
        let snapshot = load_combined(&path).unwrap();
        assert_eq!(snapshot.pod.metadata.name, "web-0");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn load_combined_missing_file_is_io_error() {
        let err = load_combined("/nonexistent/kubediag-test-path.json").unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn load_split_requires_pod() {
        let err = load_split(&SnapshotPaths::default()).unwrap_err();
        assert!(matches!(err, LoaderError::MissingRequired("pod")));
    }

    #[test]
    fn load_split_defaults_events_to_empty() {
        let pod_path = write_temp(r#"{"metadata":{"name":"web-0"},"status":{"phase":"Running"}}"#);
        let paths = SnapshotPaths { pod: Some(pod_path.clone()), ..Default::default() };
        let snapshot = load_split(&paths).unwrap();
        assert!(snapshot.events.is_empty());
        let _ = std::fs::remove_file(pod_path);
    }
}
