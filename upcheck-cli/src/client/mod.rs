//! Cluster API access
//!
//! The checker needs two responses from the cluster: node info (settings,
//! os, process, jvm, plugins) and process stats. Both are fetched through
//! the [`Fetcher`] trait so the same evaluation runs against a live
//! cluster ([`HttpFetcher`]) or against saved responses
//! ([`SnapshotFetcher`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use upcheck::client::{fetch_cluster, HttpFetcher};
//!
//! let fetcher = HttpFetcher::new("http://localhost:9200", 30);
//! let raw = fetch_cluster(&fetcher)?;
//! ```

mod http;
mod snapshot;

pub use http::HttpFetcher;
pub use snapshot::SnapshotFetcher;

use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

/// Node info endpoint, requested with `flat_settings=true`
pub const NODES_INFO_PATH: &str = "/_nodes/settings,os,process,jvm,plugins";
/// Process stats endpoint (carries `max_file_descriptors`)
pub const NODES_STATS_PATH: &str = "/_nodes/stats/process";

/// Errors that abort an evaluation run
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {path} failed: {message}")]
    Http { path: String, message: String },

    #[error("Request to {path} returned HTTP {status}: {body}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {path}: {message}")]
    Malformed { path: String, message: String },

    #[error("Node {node_id} is missing from the process stats response")]
    MissingStats { node_id: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Source of raw cluster API responses
pub trait Fetcher: Send + Sync {
    /// GET `path` with the given query parameters and return the JSON body
    fn get(&self, path: &str, query: &[(&str, &str)]) -> FetchResult<Value>;
}

/// The two raw responses one evaluation run is built from
#[derive(Debug, Clone)]
pub struct RawCluster {
    pub nodes_info: Value,
    pub nodes_stats: Value,
}

/// Fetch node info and process stats concurrently. Either failure is fatal.
pub fn fetch_cluster(fetcher: &dyn Fetcher) -> FetchResult<RawCluster> {
    debug!("Fetching {} and {}", NODES_INFO_PATH, NODES_STATS_PATH);
    let (info, stats) = rayon::join(
        || fetcher.get(NODES_INFO_PATH, &[("flat_settings", "true")]),
        || fetcher.get(NODES_STATS_PATH, &[]),
    );
    Ok(RawCluster {
        nodes_info: info?,
        nodes_stats: stats?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records requested paths and answers from a fixed table
    struct StubFetcher {
        calls: Mutex<Vec<String>>,
        fail_stats: bool,
    }

    impl Fetcher for StubFetcher {
        fn get(&self, path: &str, query: &[(&str, &str)]) -> FetchResult<Value> {
            self.calls.lock().unwrap().push(path.to_string());
            if path == NODES_INFO_PATH {
                assert_eq!(query, &[("flat_settings", "true")]);
                return Ok(json!({"nodes": {}}));
            }
            if self.fail_stats {
                return Err(FetchError::Status {
                    path: path.to_string(),
                    status: 503,
                    body: "unavailable".into(),
                });
            }
            Ok(json!({"nodes": {"stats": true}}))
        }
    }

    #[test]
    fn test_fetch_cluster_requests_both_endpoints() {
        let fetcher = StubFetcher {
            calls: Mutex::new(vec![]),
            fail_stats: false,
        };
        let raw = fetch_cluster(&fetcher).unwrap();
        assert_eq!(raw.nodes_stats["nodes"]["stats"], json!(true));

        let mut calls = fetcher.calls.into_inner().unwrap();
        calls.sort();
        assert_eq!(calls, vec![NODES_INFO_PATH, NODES_STATS_PATH]);
    }

    #[test]
    fn test_fetch_cluster_fails_when_either_call_fails() {
        let fetcher = StubFetcher {
            calls: Mutex::new(vec![]),
            fail_stats: true,
        };
        let err = fetch_cluster(&fetcher).unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
    }
}
