//! Data-file loading.
//!
//! Data sets are plain JSON documents resolved through an ordered list of fallback
//! path prefixes; the first file that both reads and parses wins. A file that
//! exists but fails to parse is logged and skipped, so a stale copy earlier in the
//! chain cannot mask a good one later. Exhausting every prefix is the
//! "data unavailable" error state.

use crate::error::{Error, Result};
use crate::model::{
    Braid, Credential, CredentialGraph, CredentialRelation, VineGraph, VineNode,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default prefixes mirroring where deployments place the data directory.
pub const DATA_PREFIXES: &[&str] = &["data", "arbor/data", "public/data", "."];

#[derive(Debug, Clone, Deserialize)]
pub struct VineDataFile {
    #[serde(default)]
    pub nodes: Vec<VineNode>,
    #[serde(default)]
    pub braids: Vec<Braid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CredentialDataFile {
    #[serde(default)]
    pub credentials: Vec<Credential>,
    #[serde(default)]
    pub relations: Vec<CredentialRelation>,
}

/// Resolves `name` against each prefix in order and returns the first JSON
/// document that parses as `T`.
pub fn load_json<T: DeserializeOwned>(name: &str, prefixes: &[&Path]) -> Result<T> {
    for prefix in prefixes {
        let path: PathBuf = prefix.join(name);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "data candidate unreadable");
                continue;
            }
        };
        match serde_json::from_str::<T>(&text) {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "data candidate failed to parse");
                continue;
            }
        }
    }
    Err(Error::DataUnavailable {
        name: name.to_string(),
    })
}

fn default_prefixes() -> Vec<&'static Path> {
    DATA_PREFIXES.iter().map(Path::new).collect()
}

/// Loads and validates a vine data set. `path` may be a direct file path; when it
/// is a bare name the fallback prefixes are searched.
pub fn load_vine_graph(path: &str) -> Result<VineGraph> {
    let data: VineDataFile = load_with_fallbacks(path)?;
    VineGraph::new(data.nodes, data.braids)
}

/// Loads and validates a credential data set.
pub fn load_credential_graph(path: &str) -> Result<CredentialGraph> {
    let data: CredentialDataFile = load_with_fallbacks(path)?;
    CredentialGraph::new(data.credentials, data.relations)
}

fn load_with_fallbacks<T: DeserializeOwned>(path: &str) -> Result<T> {
    let direct = Path::new(path);
    if direct.is_file() {
        let text = std::fs::read_to_string(direct)?;
        return serde_json::from_str(&text).map_err(|err| Error::InvalidData {
            path: path.to_string(),
            message: err.to_string(),
        });
    }
    load_json(path, &default_prefixes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn first_parseable_candidate_wins() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::create_dir_all(&a).unwrap();
        fs::create_dir_all(&b).unwrap();
        fs::write(a.join("x.json"), "not json").unwrap();
        fs::write(b.join("x.json"), r#"{"value": 7}"#).unwrap();

        #[derive(Deserialize)]
        struct Doc {
            value: i32,
        }

        let doc: Doc = load_json("x.json", &[&a, &b]).unwrap();
        assert_eq!(doc.value, 7);
    }

    #[test]
    fn exhausted_prefixes_report_data_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_json::<serde_json::Value>("missing.json", &[dir.path()]).unwrap_err();
        assert!(matches!(err, Error::DataUnavailable { .. }));
    }

    #[test]
    fn direct_path_with_bad_json_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vines.json");
        fs::write(&path, "{").unwrap();
        let err = load_vine_graph(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::InvalidData { .. }));
    }

    #[test]
    fn vine_file_loads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vines.json");
        fs::write(
            &path,
            r#"{
                "nodes": [
                    {"id": "a", "title": "A", "vine": "history", "time_height": 0.0, "shoots": ["b"]},
                    {"id": "b", "title": "B", "vine": "history", "time_height": 100.0}
                ]
            }"#,
        )
        .unwrap();
        let graph = load_vine_graph(path.to_str().unwrap()).unwrap();
        assert_eq!(graph.nodes().len(), 2);
        assert_eq!(graph.connections().len(), 1);
    }
}
