// SPDX-License-Identifier: MIT
//! Inline completion scheduler — decides per edit event whether a completion
//! is warranted, throttles the service call, and bounds the proposal.
//!
//! Suggestions are only proposed with the cursor at the end of a non-blank
//! line; everything else yields "no suggestion" without touching the
//! debouncer. Service failures are swallowed by policy — inline completion
//! is a best-effort enhancement and must never interrupt typing.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use super::backend::{CompletionBackend, CompletionOutcome};
use super::debounce::Debouncer;

/// Zero-based cursor location in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: usize,
    /// Character offset within the line; equal to the line's character
    /// count when the cursor sits at end-of-line.
    pub column: usize,
}

/// One edit event's completion query. Ephemeral — superseded by the next
/// query; only the most recent query's result is shown by the editor.
#[derive(Debug, Clone)]
pub struct CompletionQuery {
    pub source: String,
    pub cursor: CursorPosition,
    pub triggered_at: Instant,
}

impl CompletionQuery {
    pub fn new(source: impl Into<String>, cursor: CursorPosition) -> Self {
        Self {
            source: source.into(),
            cursor,
            triggered_at: Instant::now(),
        }
    }
}

/// An insertable ghost-text proposal, anchored at the cursor it was
/// requested for. The editor collaborator renders it and accepts or
/// dismisses it wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionProposal {
    pub insert_text: String,
    pub anchor: CursorPosition,
}

/// Per-edit-event completion driver over a debounced backend query.
pub struct CompletionScheduler {
    debounced: Debouncer<String, CompletionOutcome>,
    max_lines: usize,
}

impl CompletionScheduler {
    /// `delay` is the debounce window; `max_lines` caps the proposal length.
    pub fn new(backend: Arc<dyn CompletionBackend>, delay: Duration, max_lines: usize) -> Self {
        let debounced = Debouncer::new(delay, move |code: String| {
            let backend = Arc::clone(&backend);
            async move {
                match backend.complete(&code).await {
                    Ok(text) if text.trim().is_empty() => CompletionOutcome::Empty,
                    Ok(text) => CompletionOutcome::Suggestion(text),
                    Err(e) => {
                        // Best-effort: never surfaced to the user.
                        debug!(err = %e, "completion request failed — no suggestion");
                        CompletionOutcome::Failed
                    }
                }
            }
        });
        Self { debounced, max_lines }
    }

    /// Eligibility gate: cursor at end of the current line, and the line is
    /// non-blank after trimming.
    pub fn is_eligible(buffer: &str, cursor: CursorPosition) -> bool {
        let line = buffer.lines().nth(cursor.line).unwrap_or("");
        cursor.column == line.chars().count() && !line.trim().is_empty()
    }

    /// Handle one edit/cursor-move event. Returns a bounded proposal, or
    /// `None` for ineligible positions, empty suggestions, and failures
    /// alike.
    pub async fn propose(&self, buffer: &str, cursor: CursorPosition) -> Option<SuggestionProposal> {
        if !Self::is_eligible(buffer, cursor) {
            return None;
        }

        let query = CompletionQuery::new(buffer, cursor);
        match self.debounced.trigger(query.source).await {
            CompletionOutcome::Suggestion(text) => {
                let insert_text = cap_lines(&text, self.max_lines);
                if insert_text.trim().is_empty() {
                    return None;
                }
                debug!(
                    lines = insert_text.lines().count(),
                    elapsed_ms = query.triggered_at.elapsed().as_millis() as u64,
                    "inline suggestion ready"
                );
                Some(SuggestionProposal {
                    insert_text,
                    anchor: query.cursor,
                })
            }
            CompletionOutcome::Empty | CompletionOutcome::Failed => None,
        }
    }
}

/// Keep at most the first `max` lines of `text`, joined by newlines.
fn cap_lines(text: &str, max: usize) -> String {
    text.lines().take(max).collect::<Vec<_>>().join("\n")
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::backend::CompletionError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedBackend {
        reply: String,
        calls: AtomicUsize,
    }

    impl FixedBackend {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl CompletionBackend for FixedBackend {
        async fn complete(&self, _code: &str) -> Result<String, CompletionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
        async fn generate(&self, _prompt: &str) -> Result<String, CompletionError> {
            Ok(self.reply.clone())
        }
    }

    fn scheduler(backend: Arc<dyn CompletionBackend>) -> CompletionScheduler {
        CompletionScheduler::new(backend, Duration::from_millis(10), 5)
    }

    fn end_of(line: usize, text: &str) -> CursorPosition {
        let len = text.lines().nth(line).unwrap_or("").chars().count();
        CursorPosition { line, column: len }
    }

    #[tokio::test(start_paused = true)]
    async fn cursor_mid_line_issues_no_query() {
        let backend = FixedBackend::new("anything");
        let sched = scheduler(backend.clone());

        let proposal = sched
            .propose("print('hi')", CursorPosition { line: 0, column: 3 })
            .await;
        assert!(proposal.is_none());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0, "zero debouncer calls");
    }

    #[tokio::test(start_paused = true)]
    async fn blank_line_issues_no_query() {
        let backend = FixedBackend::new("anything");
        let sched = scheduler(backend.clone());

        let proposal = sched
            .propose("   ", CursorPosition { line: 0, column: 3 })
            .await;
        assert!(proposal.is_none());
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn suggestion_is_capped_to_five_lines() {
        let reply = "l1\nl2\nl3\nl4\nl5\nl6\nl7\nl8";
        let backend = FixedBackend::new(reply);
        let sched = scheduler(backend);

        let buffer = "x = ";
        let proposal = sched.propose(buffer, end_of(0, buffer)).await.unwrap();
        assert_eq!(proposal.insert_text, "l1\nl2\nl3\nl4\nl5");
    }

    #[tokio::test(start_paused = true)]
    async fn whitespace_only_suggestion_is_discarded() {
        let backend = FixedBackend::new("  \n \n");
        let sched = scheduler(backend);

        let buffer = "x = ";
        assert!(sched.propose(buffer, end_of(0, buffer)).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn proposal_is_anchored_at_cursor() {
        let backend = FixedBackend::new("1 + 2");
        let sched = scheduler(backend);

        let buffer = "a = 1\nb = ";
        let cursor = end_of(1, buffer);
        let proposal = sched.propose(buffer, cursor).await.unwrap();
        assert_eq!(proposal.anchor, cursor);
        assert_eq!(proposal.insert_text, "1 + 2");
    }

    #[tokio::test(start_paused = true)]
    async fn backend_failure_is_swallowed() {
        struct FailingBackend;

        #[async_trait]
        impl CompletionBackend for FailingBackend {
            async fn complete(&self, _code: &str) -> Result<String, CompletionError> {
                Err(CompletionError::Backend("service down".into()))
            }
            async fn generate(&self, _prompt: &str) -> Result<String, CompletionError> {
                Err(CompletionError::Backend("service down".into()))
            }
        }

        let sched = scheduler(Arc::new(FailingBackend));
        let buffer = "x = ";
        assert!(sched.propose(buffer, end_of(0, buffer)).await.is_none());
    }
}
