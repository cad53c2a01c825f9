//! Tracing subscriber setup for the binary.
//!
//! Log output goes to stderr so `get` and `export` can be piped.  The
//! filter comes from `PRJREM_LOG` (same syntax as `RUST_LOG`).

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "PRJREM_LOG";

const DEFAULT_FILTER: &str = "prjrem=warn";

/// Install the global subscriber.  Safe to call more than once; later
/// calls are ignored.
pub fn init() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
