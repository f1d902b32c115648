//! Diagnostic logging setup.
//!
//! The parser logs routing decisions and failures through `tracing`. This
//! module installs a stderr subscriber so those events become visible.

use tracing_subscriber::EnvFilter;

use crate::error::{Error, Result};

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "BRANCHLINE_LOG";

/// Directives used when neither an explicit filter nor the environment
/// variable is set.
pub const DEFAULT_FILTER: &str = "warn";

/// Builds the filter from explicit directives, falling back to
/// [`LOG_ENV`] and then [`DEFAULT_FILTER`].
///
/// # Errors
///
/// Returns [`Error::LogFilter`] if explicit directives do not parse.
pub fn filter(directives: Option<&str>) -> Result<EnvFilter> {
    match directives {
        Some(directives) => EnvFilter::try_new(directives).map_err(|e| Error::LogFilter {
            filter: directives.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Installs the global subscriber writing to stderr.
///
/// # Errors
///
/// Returns [`Error::LogFilter`] if the directives do not parse or a global
/// subscriber is already installed.
pub fn init(directives: Option<&str>) -> Result<()> {
    let filter = filter(directives)?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| Error::LogFilter {
            filter: directives.unwrap_or(LOG_ENV).to_string(),
            reason: e.to_string(),
        })
}
