// SPDX-License-Identifier: MIT
//! Embedded script runtime — bootstrap, package loading, and execution seam.
//!
//! The runtime itself (a Pyodide-style engine living in the host page) is an
//! external collaborator reached through the [`ScriptRuntime`] trait. This
//! module owns the part the crate is responsible for: bootstrapping exactly
//! once per session with live output capture ([`loader::RuntimeLoader`]) and
//! the best-effort import scan that feeds package resolution
//! ([`imports::scan_imports`]).

pub mod engine;
pub mod imports;
pub mod loader;

pub use engine::{RuntimeError, RuntimeHandle, ScriptRuntime, StreamHooks};
pub use loader::RuntimeLoader;
