use thiserror::Error;

/// Failures at the wire level: the request never completed, or its body
/// could not be read. Protocol-level failures (the API reporting a non-zero
/// result) are not transport errors and live in the SDK crate.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request or connection attempt timed out
    #[error("request timed out")]
    Timeout,

    /// TCP/TLS connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// The request failed after the connection was established
    #[error("request failed: {0}")]
    Request(String),

    /// The response body could not be read to completion
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The request URL was rejected by the underlying client
    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    /// IO error while streaming a body
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;
