//! Error types for the surface marker node.

use thiserror::Error;

/// Errors raised while bringing the marker node up.
///
/// Only startup can fail. Once the registries are committed, click handling
/// never returns an error to the caller.
#[derive(Error, Debug)]
pub enum Error {
    /// The structural description could not be loaded.
    #[error("structural description unavailable: {0}")]
    ConfigurationUnavailable(String),

    /// The navigation executor never answered the startup handshake.
    #[error("action executor unreachable: {0}")]
    ExecutorUnreachable(String),

    /// A goal could not be handed to the executor.
    #[error("goal submission failed: {0}")]
    Submission(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Submission(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
