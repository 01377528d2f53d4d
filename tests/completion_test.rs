// SPDX-License-Identifier: MIT
// Inline completion integration tests — debounce coalescing, proposal
// bounding, and generation sanitization through the public API.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use scriptpad::completion::{
    sanitize_generated, CompletionBackend, CompletionError, CompletionScheduler, CursorPosition,
    GenerationOutcome,
};
use scriptpad::config::PadConfig;
use scriptpad::runtime::{RuntimeError, RuntimeHandle, ScriptRuntime};
use scriptpad::PadContext;

// ─── Fakes ────────────────────────────────────────────────────────────────────

/// Records every completion request and replies with a fixed suggestion.
struct RecordingBackend {
    reply: String,
    calls: AtomicUsize,
    last_code: Mutex<String>,
}

impl RecordingBackend {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
            last_code: Mutex::new(String::new()),
        })
    }
}

#[async_trait]
impl CompletionBackend for RecordingBackend {
    async fn complete(&self, code: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_code.lock().unwrap() = code.to_string();
        Ok(self.reply.clone())
    }
    async fn generate(&self, _prompt: &str) -> Result<String, CompletionError> {
        Ok(format!("```python\n{}\n```", self.reply))
    }
}

struct NullRuntime;

#[async_trait]
impl ScriptRuntime for NullRuntime {
    async fn load_packages(&self, _packages: &[String]) -> Result<(), RuntimeError> {
        Ok(())
    }
    async fn eval(&self, _source: &str) -> Result<Option<String>, RuntimeError> {
        Ok(None)
    }
}

fn end_of_line(buffer: &str, line: usize) -> CursorPosition {
    let column = buffer.lines().nth(line).unwrap_or("").chars().count();
    CursorPosition { line, column }
}

// ─── Debounce through the scheduler ──────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn rapid_edits_collapse_to_one_service_call_with_latest_buffer() {
    let backend = RecordingBackend::new("math.sqrt(x)");
    let scheduler = CompletionScheduler::new(backend.clone(), Duration::from_millis(350), 5);

    // Three keystrokes inside the debounce window.
    let (p1, p2, p3) = tokio::join!(
        scheduler.propose("import math\ny = ", end_of_line("import math\ny = ", 1)),
        scheduler.propose("import math\ny = m", end_of_line("import math\ny = m", 1)),
        scheduler.propose("import math\ny = ma", end_of_line("import math\ny = ma", 1)),
    );

    assert_eq!(backend.calls.load(Ordering::SeqCst), 1, "one physical call");
    assert_eq!(
        *backend.last_code.lock().unwrap(),
        "import math\ny = ma",
        "the last trigger's buffer is sent"
    );
    // All coalesced triggers observe the same suggestion.
    for proposal in [&p1, &p2, &p3] {
        assert_eq!(
            proposal.as_ref().map(|p| p.insert_text.as_str()),
            Some("math.sqrt(x)")
        );
    }
}

#[tokio::test(start_paused = true)]
async fn ineligible_edits_never_reach_the_service() {
    let backend = RecordingBackend::new("anything");
    let scheduler = CompletionScheduler::new(backend.clone(), Duration::from_millis(350), 5);

    // Cursor mid-line.
    let mid = scheduler
        .propose("print('hello')", CursorPosition { line: 0, column: 5 })
        .await;
    // Blank line.
    let blank = scheduler
        .propose("x = 1\n    ", end_of_line("x = 1\n    ", 1))
        .await;

    assert!(mid.is_none());
    assert!(blank.is_none());
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn long_suggestions_are_capped_at_five_lines() {
    let eight_lines = (1..=8).map(|i| format!("line{i}")).collect::<Vec<_>>().join("\n");
    let backend = RecordingBackend::new(&eight_lines);
    let scheduler = CompletionScheduler::new(backend, Duration::from_millis(350), 5);

    let buffer = "def f():";
    let proposal = scheduler.propose(buffer, end_of_line(buffer, 0)).await.unwrap();
    assert_eq!(proposal.insert_text, "line1\nline2\nline3\nline4\nline5");
    assert_eq!(proposal.anchor, end_of_line(buffer, 0));
}

// ─── Full-context wiring ──────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn context_generation_sanitizes_the_reply() {
    let backend = RecordingBackend::new("def greet():\n    print('hi')");
    let mut config = PadConfig::default();
    config.baseline_packages.clear();
    let ctx = PadContext::with_backend(
        config,
        |_hooks| async { Ok(Arc::new(NullRuntime) as RuntimeHandle) },
        backend,
    );

    let outcome = ctx.generate("write a greeting function").await;
    assert_eq!(
        outcome,
        GenerationOutcome::Generated("def greet():\n    print('hi')".to_string()),
        "fences are stripped before the text reaches the editor"
    );
}

#[tokio::test(start_paused = true)]
async fn failed_service_yields_no_suggestion_and_no_generation() {
    struct DownBackend;

    #[async_trait]
    impl CompletionBackend for DownBackend {
        async fn complete(&self, _code: &str) -> Result<String, CompletionError> {
            Err(CompletionError::Backend("connection refused".into()))
        }
        async fn generate(&self, _prompt: &str) -> Result<String, CompletionError> {
            Err(CompletionError::Backend("connection refused".into()))
        }
    }

    let mut config = PadConfig::default();
    config.baseline_packages.clear();
    let ctx = PadContext::with_backend(
        config,
        |_hooks| async { Ok(Arc::new(NullRuntime) as RuntimeHandle) },
        Arc::new(DownBackend),
    );

    let buffer = "x = ";
    let proposal = ctx.completions.propose(buffer, end_of_line(buffer, 0)).await;
    assert!(proposal.is_none(), "completion failure is invisible");

    let generation = ctx.generate("anything").await;
    assert_eq!(generation, GenerationOutcome::Failed, "editor left unchanged");
}

// ─── Sanitizer contract ───────────────────────────────────────────────────────

#[test]
fn sanitizer_enforces_the_service_contract() {
    let raw = "```python\nimport math\ndef f(x):\n    return math.sqrt(x)def g(x):\n    return x\n\n\n\nprint(f(4))\n```";
    let clean = sanitize_generated(raw);
    assert!(!clean.contains("```"));
    assert!(clean.contains("return math.sqrt(x)\ndef g(x):"));
    assert!(!clean.contains("\n\n\n"));
}
