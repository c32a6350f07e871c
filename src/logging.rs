//! Logging and tracing infrastructure for revealer.
//!
//! Structured logging through the tracing crate. `RUST_LOG` always wins over
//! the level requested by the caller. Both output modes write to stderr;
//! stdout carries command output only.

use std::sync::Once;
use tracing::info;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

static INIT: Once = Once::new();

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize the global tracing subscriber at `info`.
///
/// This should be called once at program startup.
/// Subsequent calls are ignored.
pub fn init_tracing() {
    init_tracing_with("info", false);
}

/// Initialize tracing with JSON output for structured logging.
pub fn init_tracing_json() {
    init_tracing_with("info", true);
}

/// Initialize tracing with an explicit default level and output mode.
///
/// Uses `try_init` so that a subscriber installed elsewhere (test harnesses,
/// embedding applications) is left in place.
pub fn init_tracing_with(default_level: &str, json: bool) {
    INIT.call_once(|| {
        let filter = env_filter(default_level);
        let installed = if json {
            let fmt_layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(true)
                .with_thread_ids(true)
                .with_current_span(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .is_ok()
        } else {
            let fmt_layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_writer(std::io::stderr);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .is_ok()
        };

        if installed {
            info!(json, "revealer tracing initialized");
        }
    });
}

/// Map a `-v` count to a default filter level.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}
