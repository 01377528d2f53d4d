// SPDX-License-Identifier: MIT
// Script runtime seam — the trait the embedded execution engine implements,
// plus the stream hooks handed to it at bootstrap.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::output::{OutputSink, StreamKind};

/// Errors produced by the embedded runtime.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The engine failed to initialize. Terminal for the session — the
    /// loader replays this to every pending and future caller.
    #[error("runtime bootstrap failed: {0}")]
    Bootstrap(String),

    /// A package implied by the submitted source could not be loaded.
    #[error("package load failed: {0}")]
    PackageLoad(String),

    /// A trapped error raised while executing submitted source. Rendered
    /// into the output sink verbatim — the message is the runtime's own
    /// traceback text.
    #[error("{0}")]
    Execution(String),
}

/// Callback invoked for each chunk of stream output as it is produced.
pub type OutputHook = Arc<dyn Fn(&str) + Send + Sync>;

/// The stdout/stderr callbacks wired into the engine at bootstrap.
///
/// The engine must call these as output is produced, not buffer and flush
/// at the end of a run.
#[derive(Clone)]
pub struct StreamHooks {
    pub stdout: OutputHook,
    pub stderr: OutputHook,
}

impl StreamHooks {
    /// Hooks that append each chunk to the given sink with its stream tag.
    pub fn for_sink(sink: &Arc<OutputSink>) -> Self {
        let out = Arc::clone(sink);
        let err = Arc::clone(sink);
        Self {
            stdout: Arc::new(move |text| out.append(StreamKind::Stdout, text)),
            stderr: Arc::new(move |text| err.append(StreamKind::Stderr, text)),
        }
    }
}

/// An initialized execution engine.
///
/// Implementations wrap whatever embedded runtime the host provides. The
/// handle is created once by [`super::RuntimeLoader`] and shared read-only;
/// only the execution manager invokes `eval` on it.
#[async_trait]
pub trait ScriptRuntime: Send + Sync {
    /// Resolve and load the given runtime packages. Already-loaded packages
    /// are a no-op; unknown names are skipped silently (best-effort, the
    /// engine decides).
    async fn load_packages(&self, packages: &[String]) -> Result<(), RuntimeError>;

    /// Execute the submitted source as a single unit.
    ///
    /// Stream output goes through the [`StreamHooks`] given at bootstrap.
    /// Returns the final expression value rendered as text, if the
    /// execution model yields one.
    async fn eval(&self, source: &str) -> Result<Option<String>, RuntimeError>;
}

/// Shared reference to the one initialized engine of this session.
pub type RuntimeHandle = Arc<dyn ScriptRuntime>;
