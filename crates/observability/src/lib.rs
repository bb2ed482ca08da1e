//! Tracing/logging setup shared by every binary in the workspace.

/// Install the process-wide JSON log subscriber.
///
/// `filter` is the configured directive (`LOG_FILTER`); `RUST_LOG` still
/// takes precedence. Later calls are no-ops and return `false`.
pub fn init(filter: &str) -> bool {
    self::tracing::init(filter)
}

/// Tracing configuration (filters, layers).
pub mod tracing;
