// SPDX-License-Identifier: MIT
// AI completion/generation service seam.
//
// The service is a black-box collaborator: `{code}` in, `{suggestion}` out
// for inline completions, `{prompt}` in, `{suggestion}` out for full-source
// generation. `HttpCompletionBackend` is the production implementation;
// tests substitute the trait.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the completion/generation service.
///
/// These never reach the user: inline completion failures collapse to "no
/// suggestion" and generation failures leave the editor unchanged.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion service request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion backend error: {0}")]
    Backend(String),
}

/// Internal result of a debounced completion query.
///
/// Deliberately an explicit tri-state rather than a `Result`: the scheduler
/// only acts on `Suggestion`, but keeping `Empty` and `Failed` distinct makes
/// the best-effort error swallowing a stated policy instead of an accident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Non-empty suggestion text from the service.
    Suggestion(String),
    /// The service answered with nothing useful.
    Empty,
    /// The request failed; already logged, surfaced as "no suggestion".
    Failed,
}

/// The AI service collaborator.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// End-of-line completion for the given buffer text.
    async fn complete(&self, code: &str) -> Result<String, CompletionError>;

    /// Full source generation for a natural-language prompt.
    async fn generate(&self, prompt: &str) -> Result<String, CompletionError>;
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct CompleteRequest<'a> {
    code: &'a str,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct SuggestionResponse {
    #[serde(default)]
    suggestion: String,
}

// ─── HTTP implementation ──────────────────────────────────────────────────────

/// Backend speaking the service's JSON API over HTTP.
pub struct HttpCompletionBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCompletionBackend {
    /// `base_url` is the service root, e.g. `http://localhost:3001` —
    /// `/api/complete` and `/api/generate` are appended per request.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post_suggestion<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, CompletionError> {
        let url = format!("{}{path}", self.base_url);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        let body: SuggestionResponse = resp.json().await?;
        Ok(body.suggestion)
    }
}

#[async_trait]
impl CompletionBackend for HttpCompletionBackend {
    async fn complete(&self, code: &str) -> Result<String, CompletionError> {
        self.post_suggestion("/api/complete", &CompleteRequest { code })
            .await
    }

    async fn generate(&self, prompt: &str) -> Result<String, CompletionError> {
        self.post_suggestion("/api/generate", &GenerateRequest { prompt })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let backend =
            HttpCompletionBackend::new("http://localhost:3001/", Duration::from_secs(5)).unwrap();
        assert_eq!(backend.base_url, "http://localhost:3001");
    }

    #[test]
    fn suggestion_response_defaults_to_empty() {
        let resp: SuggestionResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp.suggestion, "");
    }
}
