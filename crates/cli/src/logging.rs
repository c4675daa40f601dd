//! Logging setup
//!
//! Logs go to stderr so stdout carries only the browser tool's response.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "illdb=warn";
const VERBOSE_FILTER: &str = "illdb=debug";

/// Directive used when `RUST_LOG` is unset (or always, with --verbose)
fn fallback_directive(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Initialize the global subscriber
///
/// # Environment Variables
///
/// - `RUST_LOG`: filter directives (default: `illdb=warn`)
/// - `ILLDB_LOG_FORMAT`: `json` for structured output, anything else for pretty
pub fn init_logging(verbose: bool) {
    let log_format = std::env::var("ILLDB_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = if verbose {
        EnvFilter::new(fallback_directive(true))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(fallback_directive(false)))
    };

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }
}
