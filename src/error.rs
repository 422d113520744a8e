//! Error types for the tracked cache
//!
//! Provides unified error handling using thiserror. A missing or expired key
//! is never an error: lookups return `Ok(None)` for that case.

use thiserror::Error;

/// Boxed error returned by fetch collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// == Cache Error Enum ==
/// Unified error type for the tracked cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Operation against a key holding the wrong kind of value
    #[error("Wrong type for key: {0}")]
    WrongType(String),

    /// Increment on a value that is not a decimal integer
    #[error("Value at key {0} is not an integer")]
    NotAnInteger(String),

    /// Increment would overflow a 64-bit signed integer
    #[error("Increment overflow at key: {0}")]
    Overflow(String),

    /// Stored bytes could not be converted by a typed accessor
    #[error("Parse error: {0}")]
    Parse(String),

    /// The underlying page fetch failed
    #[error("Fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: BoxError,
    },

    /// Writing replay output failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CacheError {
    /// Wraps a fetch collaborator failure for `url`.
    pub fn fetch(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        CacheError::Fetch {
            url: url.into(),
            source: source.into(),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the tracked cache.
pub type Result<T> = std::result::Result<T, CacheError>;
