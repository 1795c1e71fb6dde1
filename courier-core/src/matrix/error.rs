use thiserror::Error;

/// Errors from [`crate::matrix::MatrixProvider::fetch_block`].
///
/// Every variant is recoverable from the builder's point of view: the
/// affected chunk is degraded rather than failing the whole matrix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// The request could not be sent or the connection failed.
    #[error("matrix request to {url} failed: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Underlying error message.
        message: String,
    },

    /// The request exceeded the configured timeout.
    #[error("matrix request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Timeout that elapsed, in seconds.
        timeout_secs: u64,
    },

    /// The service returned a non-success HTTP status.
    #[error("matrix request to {url} returned HTTP {status}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Underlying error message.
        message: String,
    },

    /// The service answered with an error code.
    #[error("routing service error {code}: {message}")]
    ServiceError {
        /// Provider error code.
        code: String,
        /// Provider message.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to parse matrix response: {message}")]
    ParseError {
        /// Decoder message.
        message: String,
    },

    /// The block returned does not match the requested dimensions.
    #[error("expected a {rows}x{columns} block")]
    ShapeMismatch {
        /// Requested origin count.
        rows: usize,
        /// Requested destination count.
        columns: usize,
    },
}
