//! Tracing/logging initialization.
//!
//! One JSON line per event, filtered through `RUST_LOG`. Repository and
//! service spans carry `product_id`, `operation` and, on failure, the error.

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Initialize with [`DEFAULT_FILTER`] as the fallback directive.
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// Initialize with a caller-chosen fallback directive (e.g. `"preorder_infra=debug"`).
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_with_default(directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init()
        .is_ok()
}
