// src/client.rs

//! Connection parameters the UI layer uses to reach the backend.
//!
//! The supervisor never talks HTTP itself. These values describe the
//! contract the backend is expected to honour and are surfaced for whatever
//! client the host UI builds.

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// `[client]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendClientConfig {
    pub base_url: String,

    /// Per-request timeout, e.g. `"10s"` or `"1500ms"`.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    pub content_type: String,
}

impl Default for BackendClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
        }
    }
}

impl BackendClientConfig {
    /// Join an API path onto the base URL without doubling slashes.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    }
}
