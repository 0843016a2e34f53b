//! Error types for remora.

use derive_more::{Display, Error, From};

/// Main error type for remora operations.
///
/// Variants group into four families: encoding (a structured value could
/// not be flattened), request assembly (bad URL, body source I/O),
/// transport (connection, TLS, and the distinguished deadline expiry),
/// and response decoding (gunzip or deserialization failures).
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// A structured value could not be flattened into parameters.
    #[display("encoding error: {_0}")]
    #[from(skip)]
    Encoding(#[error(not(source))] String),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// Reading a request body source failed during assembly.
    #[display("request assembly failed: {_0}")]
    #[from]
    Request(std::io::Error),

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// The call deadline elapsed before the transport produced a response.
    ///
    /// Reported preferentially: when a transport failure and an elapsed
    /// deadline are both present, the caller sees this variant.
    #[display("deadline elapsed")]
    Timeout,

    /// The response body claimed `gzip` but could not be decompressed.
    #[display("decompression failed: {_0}")]
    #[from(skip)]
    Decompress(#[error(not(source))] String),

    /// The response body could not be decoded into the requested shape.
    #[display("decode error at '{path}': {message}")]
    #[from(skip)]
    Decode {
        /// Path to the offending element (e.g. `user.address.city`),
        /// empty for syntax-level failures.
        path: String,
        /// Underlying decoder message.
        message: String,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an encoding error.
    #[must_use]
    pub fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create a decompression error.
    #[must_use]
    pub fn decompress(message: impl Into<String>) -> Self {
        Self::Decompress(message.into())
    }

    /// Create a decode error with path context.
    #[must_use]
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is the deadline-expiry error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if this error arose before any network activity
    /// (encoding or request assembly).
    #[must_use]
    pub const fn is_pre_transport(&self) -> bool {
        matches!(
            self,
            Self::Encoding(_) | Self::InvalidUrl(_) | Self::Request(_) | Self::InvalidRequest(_)
        )
    }

    /// Returns `true` if the response body could not be decoded.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Decompress(_) | Self::Decode { .. })
    }
}
