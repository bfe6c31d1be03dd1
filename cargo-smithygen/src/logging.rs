//! Log subscriber installation for the binary.

use tracing_subscriber::EnvFilter;

use crate::error::SmithygenError;

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "SMITHYGEN_LOG";

/// Filter applied when [`LOG_ENV`] is unset or invalid.
pub const DEFAULT_DIRECTIVES: &str = "warn";

/// Builds the filter from [`LOG_ENV`], falling back to [`DEFAULT_DIRECTIVES`].
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Installs a formatting subscriber writing to standard error.
///
/// # Errors
///
/// Fails when a global subscriber is already installed.
pub fn init() -> Result<(), SmithygenError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| SmithygenError::Logging(err.to_string()))
}
