//! Error types shared across the masthead crates.

use std::fmt;

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Stable code identifying why a content-source request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorCode {
    /// The source answered with a non-2xx status.
    UpstreamStatus,
    /// The request exceeded the transport timeout.
    Timeout,
    /// Connection or protocol failure before a response arrived.
    Transport,
    /// The response body did not match the expected shape.
    Decode,
}

impl SourceErrorCode {
    /// Stable string form, suitable for logs and assertions.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UpstreamStatus => "upstream_status",
            Self::Timeout => "timeout",
            Self::Transport => "transport",
            Self::Decode => "decode",
        }
    }
}

impl fmt::Display for SourceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error taxonomy for the site server.
///
/// `Config` is fatal at startup; `ContentSource` is recoverable (handlers fall
/// back to cached output when any exists); `NotFound` maps to a user-visible
/// not-found page.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing or invalid process configuration.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Upstream transport or server failure, including timeouts.
    #[error("content source error [{code}]: {message}")]
    ContentSource {
        code: SourceErrorCode,
        /// HTTP status received from the source, when one arrived at all.
        status: Option<u16>,
        message: String,
    },

    /// The source has no content with the requested identifier.
    #[error("content not found: {id}")]
    NotFound { id: String },
}

impl Error {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a not-found error for the given content identifier.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Content source answered with a non-2xx status.
    pub fn upstream_status(status: u16, detail: &str) -> Self {
        Self::ContentSource {
            code: SourceErrorCode::UpstreamStatus,
            status: Some(status),
            message: format!("upstream status {status}: {detail}"),
        }
    }

    /// Content source request timed out.
    pub fn timeout(url: &str) -> Self {
        Self::ContentSource {
            code: SourceErrorCode::Timeout,
            status: None,
            message: format!("request to {url} timed out"),
        }
    }

    /// Transport-level failure (connect, TLS, protocol).
    pub fn transport(source: &dyn fmt::Display) -> Self {
        Self::ContentSource {
            code: SourceErrorCode::Transport,
            status: None,
            message: source.to_string(),
        }
    }

    /// The response body could not be decoded.
    pub fn decode(source: &dyn fmt::Display) -> Self {
        Self::ContentSource {
            code: SourceErrorCode::Decode,
            status: None,
            message: source.to_string(),
        }
    }

    /// Whether this error means "no such content".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
