// SPDX-License-Identifier: MIT
//! Generic async debounce — collapses trigger bursts into one call and
//! guarantees a single outstanding invocation of the wrapped function.
//!
//! Each trigger records the latest arguments and pushes the delay deadline
//! forward. Once the quiet window elapses, the wrapped function runs with
//! whatever arguments were recorded last. Triggers that arrive while a call
//! is in flight do **not** start a second invocation — they resolve to the
//! same shared outcome. That is a correctness requirement, not an
//! optimization: without it, out-of-order responses could surface an older
//! suggestion after a newer one.
//!
//! No cancellation token is exposed; a caller that no longer wants a result
//! simply discards the resolved value. The call itself always runs to
//! completion (a background driver keeps it polled even if every awaiter is
//! dropped).

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use tokio::time::{sleep_until, Instant};

type DebouncedFn<A, T> = Arc<dyn Fn(A) -> BoxFuture<'static, T> + Send + Sync>;
type SharedCall<T> = Shared<BoxFuture<'static, T>>;

/// Mutable debounce state: the latest recorded arguments, the current quiet
/// deadline, and the one pending call (if any).
struct DebounceState<A, T> {
    latest: Option<A>,
    deadline: Instant,
    pending: Option<SharedCall<T>>,
}

/// Debounced wrapper around an async function `fn(A) -> T`.
///
/// Cheaply cloneable — all clones share the same timer and pending-call
/// state, so they count as one debounced instance.
pub struct Debouncer<A, T> {
    state: Arc<Mutex<DebounceState<A, T>>>,
    func: DebouncedFn<A, T>,
    delay: Duration,
}

impl<A, T> Clone for Debouncer<A, T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            func: Arc::clone(&self.func),
            delay: self.delay,
        }
    }
}

impl<A, T> Debouncer<A, T>
where
    A: Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(delay: Duration, func: F) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        Self {
            state: Arc::new(Mutex::new(DebounceState {
                latest: None,
                deadline: Instant::now(),
                pending: None,
            })),
            func: Arc::new(move |args| func(args).boxed()),
            delay,
        }
    }

    /// Record `args`, (re)start the quiet window, and await the outcome of
    /// the one eventual call.
    ///
    /// - No call pending: schedules a deferred call and awaits it.
    /// - Timer still counting down: pushes the deadline; this trigger and
    ///   the earlier ones share the same eventual call, made with the last
    ///   recorded arguments.
    /// - Call already in flight: piggybacks on its outcome.
    pub async fn trigger(&self, args: A) -> T {
        let call = {
            let mut state = self.state.lock().expect("debounce state poisoned");
            state.latest = Some(args);
            state.deadline = Instant::now() + self.delay;

            match &state.pending {
                Some(call) => call.clone(),
                None => {
                    let call = Self::schedule(Arc::clone(&self.state), Arc::clone(&self.func));
                    state.pending = Some(call.clone());
                    // Keep the call running even if every awaiter is dropped.
                    tokio::spawn(call.clone());
                    call
                }
            }
        };
        call.await
    }

    /// Build the deferred call: sleep until the deadline goes quiet (each
    /// trigger pushes it), invoke the function with the last recorded
    /// arguments, then clear the pending slot — only after resolution, so
    /// in-flight piggybacking stays correct.
    fn schedule(state: Arc<Mutex<DebounceState<A, T>>>, func: DebouncedFn<A, T>) -> SharedCall<T> {
        async move {
            loop {
                let deadline = {
                    let state = state.lock().expect("debounce state poisoned");
                    state.deadline
                };
                if Instant::now() >= deadline {
                    break;
                }
                sleep_until(deadline).await;
            }

            let args = {
                let mut state = state.lock().expect("debounce state poisoned");
                state
                    .latest
                    .take()
                    .expect("debounce fired without recorded arguments")
            };

            let result = func(args).await;

            let mut state = state.lock().expect("debounce state poisoned");
            state.pending = None;
            result
        }
        .boxed()
        .shared()
    }

    /// Whether a deferred or in-flight call currently exists.
    pub fn is_pending(&self) -> bool {
        self.state
            .lock()
            .map(|s| s.pending.is_some())
            .unwrap_or(false)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
