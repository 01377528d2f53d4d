// SPDX-License-Identifier: MIT
// Tracing setup for embedders. Library code only emits `tracing` events;
// calling this is optional and safe to repeat — a second init is a no-op.

/// Install a global subscriber at the given filter level.
///
/// `log_format` may be `"pretty"` (default, human-readable compact format)
/// or `"json"` (structured output for log aggregators).
pub fn init(log_level: &str, log_format: &str) {
    if log_format == "json" {
        let _ = tracing_subscriber::fmt()
            .json()
            .with_env_filter(log_level)
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(log_level)
            .compact()
            .try_init();
    }
}
