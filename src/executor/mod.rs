// SPDX-License-Identifier: MIT
//! Execution lifecycle manager — drives one run at a time through the engine.
//!
//! # State machine
//!
//! ```text
//! Idle ──(run request)──► Preparing ──(engine ready, packages loaded)──► Running
//!   ▲                         │                                            │
//!   └──(bootstrap failed)─────┘◄───────(success or handled error)──────────┘
//! ```
//!
//! - **Idle**: no execution active. The only state that accepts a run.
//! - **Preparing**: awaiting engine readiness and loading the packages the
//!   submitted source imports.
//! - **Running**: the source is executing; stream output is flowing into the
//!   output sink live.
//!
//! Run requests while not Idle are dropped, not queued — a user mashing the
//! run button during an active run has no additional effect. Execution
//! errors never escape: they become one error-tagged sink line and the
//! manager returns to Idle. A run is not cancellable mid-flight; a genuinely
//! hung script holds the manager in Running for the rest of the session.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::output::{OutputSink, StreamKind};
use crate::runtime::imports::scan_imports;
use crate::runtime::RuntimeLoader;

/// Observable state of the execution manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    Idle,
    Preparing,
    Running,
}

impl std::fmt::Display for ExecState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecState::Idle => write!(f, "idle"),
            ExecState::Preparing => write!(f, "preparing"),
            ExecState::Running => write!(f, "running"),
        }
    }
}

/// How a run request ended. Informational — no variant carries an error to
/// propagate, because execution failure is never fatal to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Executed to completion.
    Completed,
    /// A trapped runtime error was rendered into the sink; session continues.
    Failed,
    /// Dropped — another run was already active.
    Rejected,
    /// The engine never became ready; the captured bootstrap error was
    /// rendered into the sink.
    BootstrapFailed,
}

/// Accepts one source string at a time and guarantees mutual exclusion —
/// no two executions ever run concurrently.
pub struct ExecutionManager {
    loader: Arc<RuntimeLoader>,
    sink: Arc<OutputSink>,
    state: Mutex<ExecState>,
}

impl ExecutionManager {
    pub fn new(loader: Arc<RuntimeLoader>, sink: Arc<OutputSink>) -> Self {
        Self {
            loader,
            sink,
            state: Mutex::new(ExecState::Idle),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ExecState {
        self.state.lock().map(|s| *s).unwrap_or(ExecState::Idle)
    }

    fn set_state(&self, next: ExecState) {
        if let Ok(mut state) = self.state.lock() {
            *state = next;
        }
    }

    /// Try to claim the Idle → Preparing transition. Returns false if a run
    /// is already active.
    fn try_begin(&self) -> bool {
        if let Ok(mut state) = self.state.lock() {
            if *state == ExecState::Idle {
                *state = ExecState::Preparing;
                return true;
            }
        }
        false
    }

    /// Execute `source` as a single unit, streaming output into the sink.
    ///
    /// All error paths are handled here: bootstrap and execution failures
    /// become error lines in the sink and the state returns to Idle on
    /// every path except a hung `eval`.
    pub async fn run(&self, source: &str) -> RunOutcome {
        if !self.try_begin() {
            debug!(state = %self.state(), "run request dropped — execution already active");
            return RunOutcome::Rejected;
        }

        let handle = match self.loader.ensure_ready().await {
            Ok(handle) => handle,
            Err(e) => {
                self.sink.append(StreamKind::Stderr, e.to_string());
                self.set_state(ExecState::Idle);
                return RunOutcome::BootstrapFailed;
            }
        };

        // Resolve packages implied by the source before executing it.
        let packages = scan_imports(source);
        if !packages.is_empty() {
            debug!(?packages, "loading packages for run");
            if let Err(e) = handle.load_packages(&packages).await {
                warn!(err = %e, "package resolution failed");
                self.sink.append(StreamKind::Stderr, e.to_string());
                self.set_state(ExecState::Idle);
                return RunOutcome::Failed;
            }
        }

        self.set_state(ExecState::Running);
        let outcome = match handle.eval(source).await {
            Ok(Some(value)) => {
                // Echo a non-unit final expression value as an output line.
                self.sink.append(StreamKind::Stdout, value);
                RunOutcome::Completed
            }
            Ok(None) => RunOutcome::Completed,
            Err(e) => {
                self.sink.append(StreamKind::Stderr, e.to_string());
                RunOutcome::Failed
            }
        };
        self.set_state(ExecState::Idle);
        outcome
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
