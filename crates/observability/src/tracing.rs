//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Directive used when neither `RUST_LOG` nor the configured filter parses.
pub const FALLBACK_FILTER: &str = "info";

/// Pick the active filter: a non-blank, parseable `RUST_LOG` first, then
/// `configured`, then [`FALLBACK_FILTER`].
pub fn resolve_filter(rust_log: Option<&str>, configured: &str) -> EnvFilter {
    rust_log
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .or_else(|| EnvFilter::try_new(configured).ok())
        .unwrap_or_else(|| EnvFilter::new(FALLBACK_FILTER))
}

/// Install the JSON subscriber, one flat object per event.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init(configured_filter: &str) -> bool {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = resolve_filter(rust_log.as_deref(), configured_filter);

    tracing_subscriber::fmt()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}
