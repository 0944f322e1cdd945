//! Infrastructure error type.

use crate::config::ConfigError;

/// Failures that stop the process: a bad environment, or a listener that
/// cannot bind.
///
/// Request-level failures never become an `Error`. Handlers turn them into
/// envelope responses (see [`ApiError`](crate::controller::ApiError)).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config: {0}")]
    Config(#[from] ConfigError),
}
