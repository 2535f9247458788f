//! Saved API responses
//!
//! Lets a run evaluate responses captured earlier with e.g.
//! `curl 'localhost:9200/_nodes/settings,os,process,jvm,plugins?flat_settings=true'`
//! and `curl 'localhost:9200/_nodes/stats/process'`.

use super::{FetchError, FetchResult, Fetcher, NODES_INFO_PATH, NODES_STATS_PATH};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

pub struct SnapshotFetcher {
    nodes_info: PathBuf,
    nodes_stats: PathBuf,
}

impl SnapshotFetcher {
    pub fn new(nodes_info: impl Into<PathBuf>, nodes_stats: impl Into<PathBuf>) -> Self {
        Self {
            nodes_info: nodes_info.into(),
            nodes_stats: nodes_stats.into(),
        }
    }
}

impl Fetcher for SnapshotFetcher {
    fn get(&self, path: &str, _query: &[(&str, &str)]) -> FetchResult<Value> {
        let file = match path {
            NODES_INFO_PATH => &self.nodes_info,
            NODES_STATS_PATH => &self.nodes_stats,
            other => {
                return Err(FetchError::Malformed {
                    path: other.to_string(),
                    message: "no snapshot file for this endpoint".to_string(),
                })
            }
        };
        debug!("Reading {} from {}", path, file.display());

        let content = std::fs::read_to_string(file).map_err(|source| FetchError::Io {
            path: file.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|e| FetchError::Malformed {
            path: path.to_string(),
            message: format!("{}: {}", file.display(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reads_each_endpoint_from_its_file() {
        let dir = tempfile::tempdir().unwrap();
        let info = dir.path().join("info.json");
        let stats = dir.path().join("stats.json");
        std::fs::write(&info, r#"{"nodes": {"a": {}}}"#).unwrap();
        std::fs::write(&stats, r#"{"nodes": {"b": {}}}"#).unwrap();

        let fetcher = SnapshotFetcher::new(&info, &stats);
        assert_eq!(
            fetcher.get(NODES_INFO_PATH, &[]).unwrap(),
            json!({"nodes": {"a": {}}})
        );
        assert_eq!(
            fetcher.get(NODES_STATS_PATH, &[]).unwrap(),
            json!({"nodes": {"b": {}}})
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = SnapshotFetcher::new(dir.path().join("nope.json"), dir.path().join("x"));
        assert!(matches!(
            fetcher.get(NODES_INFO_PATH, &[]),
            Err(FetchError::Io { .. })
        ));
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let info = dir.path().join("info.json");
        std::fs::write(&info, "not json").unwrap();
        let fetcher = SnapshotFetcher::new(&info, &info);
        assert!(matches!(
            fetcher.get(NODES_INFO_PATH, &[]),
            Err(FetchError::Malformed { .. })
        ));
    }
}
