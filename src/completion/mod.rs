// SPDX-License-Identifier: MIT
// Inline completion and source generation — the AI-assistance half of the
// coordination layer.
//
// Every edit event flows through the scheduler's eligibility gate, then the
// debouncer, then the service backend; the result comes back as a bounded
// ghost-text proposal. Generation is the separate single-shot path for
// whole-buffer requests.

pub mod backend;
pub mod debounce;
pub mod generate;
pub mod scheduler;

pub use backend::{CompletionBackend, CompletionError, CompletionOutcome, HttpCompletionBackend};
pub use debounce::Debouncer;
pub use generate::{generate_source, sanitize_generated, GenerationOutcome};
pub use scheduler::{CompletionQuery, CompletionScheduler, CursorPosition, SuggestionProposal};
