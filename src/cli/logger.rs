//! Logging setup for the CLI.
//!
//! Logs go to stderr through a compact `tracing` formatter so they never mix
//! with the report on stdout. Issues are reported separately, so by default
//! only errors are logged.
//!
//! The level is chosen in this order:
//! 1. `--verbose`: debug
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`
//! 4. errors only

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "i18n_extract=debug";
const DEFAULT_FILTER: &str = "i18n_extract=error";

/// Initialize the global tracing subscriber.
///
/// Calling it again is a no-op.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Initialize the global subscriber with a custom filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(DEFAULT_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}
