//! Logging setup for skillswapctl
//!
//! Logs go to stderr so command output stays clean.
//! Filter priority: $SKILLSWAP_LOG, then the config `log_level`, then `warn`.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "SKILLSWAP_LOG";

/// Build the filter without installing it
pub fn filter(config_level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(config_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(config_level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(config_level))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
