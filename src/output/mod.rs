// SPDX-License-Identifier: MIT
//! Output sink — append-only capture of a run's interleaved stdout/stderr.
//!
//! The runtime's stream callbacks append chunks here as they are produced,
//! so a long-running or partially-erroring script shows progressive output.
//! Chunks are never mutated after append; the only reset is a whole-buffer
//! `clear()` from an explicit user action.

use std::sync::Mutex;

use tokio::sync::broadcast;

/// Which stream a chunk arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Stdout,
    Stderr,
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamKind::Stdout => write!(f, "stdout"),
            StreamKind::Stderr => write!(f, "stderr"),
        }
    }
}

/// One fragment of output, tagged with its source stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputChunk {
    pub stream: StreamKind,
    pub text: String,
}

/// Ordered, append-only output buffer shared between the runtime's stream
/// callbacks and the UI collaborator.
///
/// Ordering is exactly the arrival order of `append` calls — the order the
/// runtime's callbacks fire — even when stdout and stderr interleave.
/// There is no size bound; callers may `clear()`, the sink never evicts.
pub struct OutputSink {
    chunks: Mutex<Vec<OutputChunk>>,
    tx: broadcast::Sender<OutputChunk>,
}

impl Default for OutputSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1024);
        Self {
            chunks: Mutex::new(Vec::new()),
            tx,
        }
    }

    /// Append one chunk. Side effect only — never fails, never blocks.
    pub fn append(&self, stream: StreamKind, text: impl Into<String>) {
        let chunk = OutputChunk {
            stream,
            text: text.into(),
        };
        if let Ok(mut chunks) = self.chunks.lock() {
            chunks.push(chunk.clone());
        }
        // Ignore errors — no subscribers is fine.
        let _ = self.tx.send(chunk);
    }

    /// Atomically reset the buffer to empty.
    pub fn clear(&self) {
        if let Ok(mut chunks) = self.chunks.lock() {
            chunks.clear();
        }
    }

    /// Current ordered contents.
    pub fn snapshot(&self) -> Vec<OutputChunk> {
        self.chunks.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Render the buffer for display: one line per chunk, stderr chunks
    /// prefixed with `[ERROR] `.
    pub fn render(&self) -> String {
        let chunks = self.snapshot();
        let mut out = String::new();
        for chunk in &chunks {
            match chunk.stream {
                StreamKind::Stdout => {
                    out.push_str(&chunk.text);
                }
                StreamKind::Stderr => {
                    out.push_str("[ERROR] ");
                    out.push_str(&chunk.text);
                }
            }
            out.push('\n');
        }
        out
    }

    /// Subscribe to appended chunks (for live UI re-rendering).
    /// Lagging subscribers miss chunks rather than blocking producers.
    pub fn subscribe(&self) -> broadcast::Receiver<OutputChunk> {
        self.tx.subscribe()
    }

    pub fn len(&self) -> usize {
        self.chunks.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
