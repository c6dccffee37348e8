//! Tracing configuration.
//!
//! The subscriber is only initialised when `UMOCK_LOG` (or `RUST_LOG`) is
//! set, so there is zero overhead in normal builds.
//!
//! ```bash
//! UMOCK_LOG=debug umock ...
//! UMOCK_LOG="umock_resolve=trace" umock ...
//! ```

use tracing_subscriber::EnvFilter;

/// Build an `EnvFilter` from `UMOCK_LOG`, falling back to `RUST_LOG`.
fn env_filter() -> Option<EnvFilter> {
    let directives = std::env::var("UMOCK_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()?;
    if directives.is_empty() {
        return None;
    }
    Some(EnvFilter::new(directives))
}

/// Initialise the global tracing subscriber from the environment.
///
/// Does nothing when no filter variable is set. Safe to call more than once;
/// later calls are ignored.
pub fn init_tracing() {
    let Some(filter) = env_filter() else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
