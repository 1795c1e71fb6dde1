use thiserror::Error;

/// Errors from [`crate::geocode::GeocodingProvider::geocode`] and
/// [`crate::geocode::Geocoder::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The address was blank once normalised.
    #[error("address is empty")]
    EmptyAddress,

    /// The service answered but found no match.
    #[error("no geocoding result for {address:?}")]
    NoResult {
        /// Address that was looked up.
        address: String,
    },

    /// The request could not be sent or the connection failed.
    #[error("geocoding request to {url} failed: {message}")]
    NetworkError {
        /// Requested URL.
        url: String,
        /// Underlying error message.
        message: String,
    },

    /// The request exceeded the configured timeout.
    #[error("geocoding request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Timeout that elapsed, in seconds.
        timeout_secs: u64,
    },

    /// The service returned a non-success HTTP status.
    #[error("geocoding request to {url} returned HTTP {status}: {message}")]
    HttpError {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Underlying error message.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("failed to parse geocoding response: {message}")]
    ParseError {
        /// Decoder message.
        message: String,
    },

    /// The outbound request budget refused the call.
    #[error("geocoding request budget exhausted")]
    QuotaExhausted,
}
