#![forbid(unsafe_code)]
//! Shared error type and result alias.

/// Errors surfaced by the encoding core.
///
/// Every variant is deterministic: re-running the failing call with the same
/// inputs reproduces the same error, so nothing here is retried internally.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Corrupt, truncated or unrecognised bytes.
    #[error("decode error: {0}")]
    Decode(String),
    /// Invalid configuration detected while building a factory or index set.
    #[error("configuration error: {0}")]
    Config(String),
    /// Caller asked for something the chosen index or partitioning cannot express.
    #[error("usage error: {0}")]
    Usage(String),
    /// I/O failure while reading configuration.
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed TOML configuration.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn decode(msg: impl Into<String>) -> Self {
        Error::Decode(msg.into())
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub(crate) fn usage(msg: impl Into<String>) -> Self {
        Error::Usage(msg.into())
    }
}
