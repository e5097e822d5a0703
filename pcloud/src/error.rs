use pcloud_transport::TransportError;
use thiserror::Error;

/// SDK error taxonomy
///
/// Every failure mode is its own variant so callers dispatch on type, never
/// on message text. [`Error::Api`] is the dominant, expected path: the remote
/// service answered and explicitly reported a non-zero result code.
#[derive(Error, Debug)]
pub enum Error {
    /// The request never completed at the wire level; not retried here
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body was not valid JSON or did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The service reported failure via a non-zero `result` field
    #[error("api error {code}: {message}")]
    Api { code: u64, message: String },

    /// The caller's cancellation fired while waiting on admission or the wire
    #[error("operation cancelled")]
    Cancelled,

    /// A configuration or argument the client rejects outright
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let error = Error::Api {
            code: 2005,
            message: "Directory does not exist.".to_string(),
        };
        assert_eq!(error.to_string(), "api error 2005: Directory does not exist.");
    }

    #[test]
    fn test_transport_error_is_distinguishable() {
        let error = Error::from(TransportError::Timeout);
        assert!(matches!(error, Error::Transport(TransportError::Timeout)));
    }
}
