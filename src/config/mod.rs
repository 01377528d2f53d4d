// SPDX-License-Identifier: MIT
//! Configuration — TOML-backed, every field optional with documented
//! defaults. A missing file means defaults; a malformed file logs the parse
//! error and falls back to defaults rather than refusing to start.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

const DEFAULT_API_BASE_URL: &str = "http://localhost:3001";
const DEFAULT_RUNTIME_INDEX_URL: &str = "https://cdn.jsdelivr.net/pyodide/v0.25.1/full/";
const DEFAULT_DEBOUNCE_MS: u64 = 350;
const DEFAULT_MAX_SUGGESTION_LINES: usize = 5;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// ScriptPad core configuration (`scriptpad.toml`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PadConfig {
    /// Base URL of the AI completion/generation service
    /// (default: http://localhost:3001).
    pub api_base_url: String,
    /// Quiet window before a completion request is sent (milliseconds).
    /// Default: 350.
    pub debounce_ms: u64,
    /// Maximum lines kept from a suggestion. Default: 5.
    pub max_suggestion_lines: usize,
    /// Where the embedded runtime's assets are fetched from during
    /// bootstrap. Default: the Pyodide CDN.
    pub runtime_index_url: String,
    /// Packages loaded as part of bootstrap, before the runtime is
    /// considered ready. Default: ["micropip"].
    pub baseline_packages: Vec<String>,
    /// Timeout for completion/generation HTTP requests (seconds).
    /// Default: 30.
    pub request_timeout_secs: u64,
}

impl Default for PadConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            max_suggestion_lines: DEFAULT_MAX_SUGGESTION_LINES,
            runtime_index_url: DEFAULT_RUNTIME_INDEX_URL.to_string(),
            baseline_packages: vec!["micropip".to_string()],
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl PadConfig {
    /// Strict load for embedders that want the error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config at {}", path.display()))
    }

    /// Load with logged fallback to defaults — never fails.
    pub fn load_or_default(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => {
                debug!(path = %path.display(), "no config file — using defaults");
                return Self::default();
            }
        };
        match toml::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                error!(path = %path.display(), err = %e, "failed to parse config — using defaults");
                Self::default()
            }
        }
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
