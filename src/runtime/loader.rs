// SPDX-License-Identifier: MIT
//! Runtime loader — lazy, single-flight bootstrap of the execution engine.
//!
//! # Lifecycle
//!
//! ```text
//! absent ──(first ensure_ready)──► loading ──► ready
//!                                     │
//!                                     └──────► failed (terminal)
//! ```
//!
//! The first caller triggers bootstrap; concurrent callers await the same
//! outcome. A bootstrap failure is captured once and replayed to every
//! pending and future caller — the loader never retries, and there is no
//! teardown other than session end. Re-bootstrapping the engine is
//! expensive, so the in-flight bootstrap is not cancellable.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::output::OutputSink;

use super::engine::{RuntimeError, RuntimeHandle, StreamHooks};

/// The host-supplied bootstrap operation: initialize the embedded engine
/// with the given stream hooks and hand back a ready handle.
type BootFn =
    Box<dyn Fn(StreamHooks) -> BoxFuture<'static, Result<RuntimeHandle, RuntimeError>> + Send + Sync>;

/// Outcome of the one bootstrap of this session. The error is `Arc`-shared
/// so every caller receives the same captured failure.
type BootOutcome = Result<RuntimeHandle, Arc<RuntimeError>>;

/// Lazily-initialized owner of the session's single [`RuntimeHandle`].
pub struct RuntimeLoader {
    cell: OnceCell<BootOutcome>,
    boot: BootFn,
    hooks: StreamHooks,
    baseline_packages: Vec<String>,
}

impl RuntimeLoader {
    /// Create a loader that will bootstrap via `boot`, wiring the engine's
    /// stream output into `sink`, and load `baseline_packages` before
    /// publishing the handle.
    ///
    /// Nothing happens until the first [`ensure_ready`](Self::ensure_ready).
    pub fn new<F, Fut>(sink: &Arc<OutputSink>, baseline_packages: Vec<String>, boot: F) -> Self
    where
        F: Fn(StreamHooks) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<RuntimeHandle, RuntimeError>> + Send + 'static,
    {
        Self {
            cell: OnceCell::new(),
            boot: Box::new(move |hooks| boot(hooks).boxed()),
            hooks: StreamHooks::for_sink(sink),
            baseline_packages,
        }
    }

    /// Get the ready handle, bootstrapping on first use.
    ///
    /// Idempotent: N concurrent callers during bootstrap see exactly one
    /// bootstrap sequence and resolve to the same handle (or the same
    /// captured error).
    pub async fn ensure_ready(&self) -> BootOutcome {
        self.cell
            .get_or_init(|| self.bootstrap())
            .await
            .clone()
    }

    async fn bootstrap(&self) -> BootOutcome {
        info!("bootstrapping script runtime");
        let handle = match (self.boot)(self.hooks.clone()).await {
            Ok(handle) => handle,
            Err(e) => {
                error!(err = %e, "runtime bootstrap failed");
                return Err(Arc::new(e));
            }
        };

        // The baseline set (micropip et al.) is part of becoming ready —
        // a failure here is as terminal as a failed engine init.
        if !self.baseline_packages.is_empty() {
            if let Err(e) = handle.load_packages(&self.baseline_packages).await {
                error!(err = %e, "baseline package load failed during bootstrap");
                return Err(Arc::new(RuntimeError::Bootstrap(format!(
                    "baseline package load failed: {e}"
                ))));
            }
        }

        info!("script runtime ready");
        Ok(handle)
    }

    /// Whether bootstrap has completed successfully.
    pub fn is_ready(&self) -> bool {
        matches!(self.cell.get(), Some(Ok(_)))
    }

    /// The captured terminal error, if bootstrap failed.
    pub fn bootstrap_error(&self) -> Option<Arc<RuntimeError>> {
        match self.cell.get() {
            Some(Err(e)) => Some(Arc::clone(e)),
            _ => None,
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
