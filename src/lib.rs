// SPDX-License-Identifier: MIT
//! ScriptPad Core — the coordination layer behind the ScriptPad editor.
//!
//! Two asynchronous, stateful external resources are managed from a single
//! reentrant UI: the embedded script runtime (lazily bootstrapped once per
//! session, output streams captured live) and the remote AI service
//! (debounced per keystroke, never duplicated in flight, never surfacing
//! errors into typing). The visual editor, tab management, and the AI
//! backend's prompt construction live outside this crate and are reached
//! through the traits and plain data types exposed here.

pub mod completion;
pub mod config;
pub mod executor;
pub mod logging;
pub mod output;
pub mod runtime;

use std::future::Future;
use std::sync::Arc;

use completion::{CompletionBackend, CompletionScheduler, GenerationOutcome, HttpCompletionBackend};
use config::PadConfig;
use executor::ExecutionManager;
use output::OutputSink;
use runtime::{RuntimeError, RuntimeHandle, RuntimeLoader, StreamHooks};

pub use executor::{ExecState, RunOutcome};
pub use output::{OutputChunk, StreamKind};

/// Shared application state wiring the coordination components together.
///
/// Cheaply cloneable — all clones share the same sink, loader, executor,
/// and scheduler.
#[derive(Clone)]
pub struct PadContext {
    pub config: Arc<PadConfig>,
    /// Ordered output buffer the UI renders from.
    pub sink: Arc<OutputSink>,
    /// Lazy owner of the session's single runtime handle.
    pub loader: Arc<RuntimeLoader>,
    /// One-at-a-time run driver.
    pub executor: Arc<ExecutionManager>,
    /// Debounced inline-completion driver.
    pub completions: Arc<CompletionScheduler>,
    /// AI service collaborator, shared by completions and generation.
    pub backend: Arc<dyn CompletionBackend>,
}

impl PadContext {
    /// Wire up a context with the HTTP backend from `config` and the given
    /// engine bootstrap function.
    ///
    /// `boot` receives the stream hooks that must carry the engine's
    /// stdout/stderr output; it runs at most once, on the first run request.
    pub fn new<F, Fut>(config: PadConfig, boot: F) -> anyhow::Result<Self>
    where
        F: Fn(StreamHooks) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<RuntimeHandle, RuntimeError>> + Send + 'static,
    {
        let backend: Arc<dyn CompletionBackend> = Arc::new(HttpCompletionBackend::new(
            &config.api_base_url,
            config.request_timeout(),
        )?);
        Ok(Self::with_backend(config, boot, backend))
    }

    /// Like [`new`](Self::new), but with a caller-supplied backend — used by
    /// tests and alternative service transports.
    pub fn with_backend<F, Fut>(
        config: PadConfig,
        boot: F,
        backend: Arc<dyn CompletionBackend>,
    ) -> Self
    where
        F: Fn(StreamHooks) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<RuntimeHandle, RuntimeError>> + Send + 'static,
    {
        let config = Arc::new(config);
        let sink = Arc::new(OutputSink::new());
        let loader = Arc::new(RuntimeLoader::new(
            &sink,
            config.baseline_packages.clone(),
            boot,
        ));
        let executor = Arc::new(ExecutionManager::new(Arc::clone(&loader), Arc::clone(&sink)));
        let completions = Arc::new(CompletionScheduler::new(
            Arc::clone(&backend),
            config.debounce_delay(),
            config.max_suggestion_lines,
        ));
        Self {
            config,
            sink,
            loader,
            executor,
            completions,
            backend,
        }
    }

    /// Single-shot source generation; failure leaves the editor unchanged.
    pub async fn generate(&self, prompt: &str) -> GenerationOutcome {
        completion::generate_source(&self.backend, prompt).await
    }
}
