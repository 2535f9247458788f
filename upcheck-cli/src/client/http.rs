//! Live cluster access over HTTP
//!
//! Uses ureq (sync HTTP). The two requests of a run are issued from
//! separate rayon tasks, so no async runtime is needed.

use super::{FetchError, FetchResult, Fetcher};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub struct HttpFetcher {
    base_url: String,
    agent: ureq::Agent,
}

fn make_agent(timeout_secs: u64) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // status codes are mapped to FetchError::Status below
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        .build()
        .new_agent()
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            agent: make_agent(timeout_secs),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, path: &str, query: &[(&str, &str)]) -> FetchResult<Value> {
        let url = self.url(path);
        debug!("GET {}", url);

        let mut req = self.agent.get(&url).header("Accept", "application/json");
        for (key, value) in query {
            req = req.query(*key, *value);
        }

        let response = req.call().map_err(|e| FetchError::Http {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.into_body().read_to_string().unwrap_or_default();
            return Err(FetchError::Status {
                path: path.to_string(),
                status,
                body,
            });
        }

        response
            .into_body()
            .read_json::<Value>()
            .map_err(|e| FetchError::Malformed {
                path: path.to_string(),
                message: e.to_string(),
            })
    }
}
