// SPDX-License-Identifier: MIT
//! Single-shot source generation — full-buffer code from a natural-language
//! prompt.
//!
//! The service contract says responses carry no markdown fencing and keep
//! consecutive top-level definitions on their own lines. Providers drift, so
//! the contract is enforced here before the text goes anywhere near the
//! editor. A failed or empty generation is a no-op: the editor is left
//! unchanged, never given partial or garbled text.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use super::backend::CompletionBackend;

/// ```` ``` ```` fences, with or without a `python` tag.
static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```(?:python)?").expect("fence regex"));

/// A `def`/`class` keyword glued to the end of the previous statement.
static GLUED_DEF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\S)(def |class )").expect("glued-def regex"));

/// Runs of three or more newlines.
static NEWLINE_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("newline regex"));

/// Result of a generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Sanitized source, ready to insert.
    Generated(String),
    /// Request failed or produced nothing usable — leave the editor alone.
    Failed,
}

/// Enforce the generation service contract on a raw response: strip fences,
/// split glued definitions onto fresh lines, collapse newline runs to one
/// blank line, trim.
pub fn sanitize_generated(raw: &str) -> String {
    let stripped = FENCE_RE.replace_all(raw, "");
    let split = GLUED_DEF_RE.replace_all(&stripped, "$1\n$2");
    let collapsed = NEWLINE_RUN_RE.replace_all(&split, "\n\n");
    collapsed.trim().to_string()
}

/// Ask the service for full source for `prompt` and sanitize the reply.
pub async fn generate_source(
    backend: &Arc<dyn CompletionBackend>,
    prompt: &str,
) -> GenerationOutcome {
    match backend.generate(prompt).await {
        Ok(raw) => {
            let code = sanitize_generated(&raw);
            if code.is_empty() {
                GenerationOutcome::Failed
            } else {
                GenerationOutcome::Generated(code)
            }
        }
        Err(e) => {
            warn!(err = %e, "generation request failed — leaving editor unchanged");
            GenerationOutcome::Failed
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
