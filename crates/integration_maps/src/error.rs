//! Maps error types

use thiserror::Error;

/// Errors that can occur during geocoding and routing
#[derive(Debug, Error)]
pub enum MapsError {
    /// Connection to the maps service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request returned a non-success status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// The provider reported an error status in the response body
    #[error("API error {status}: {message}")]
    ApiError {
        /// Provider status code, e.g. `REQUEST_DENIED`
        status: String,
        /// Provider message, if any
        message: String,
    },

    /// Address could not be resolved to coordinates
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// No driving route between the two points
    #[error("No route found from {from} to {to}")]
    NoRouteFound {
        /// Origin description
        from: String,
        /// Destination description
        to: String,
    },

    /// Provider cannot be used, e.g. no API key configured
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl MapsError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::RequestFailed(_) | Self::Timeout { .. }
        )
    }

    /// Map a reqwest transport error, distinguishing timeouts
    pub(crate) fn from_transport(err: &reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            Self::Timeout { timeout_secs }
        } else {
            Self::ConnectionFailed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(MapsError::ConnectionFailed("test".to_string()).is_retryable());
        assert!(MapsError::RequestFailed("HTTP 502".to_string()).is_retryable());
        assert!(MapsError::Timeout { timeout_secs: 10 }.is_retryable());
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!MapsError::AddressNotFound("x".to_string()).is_retryable());
        assert!(!MapsError::ProviderUnavailable("no key".to_string()).is_retryable());
        assert!(
            !MapsError::ApiError {
                status: "REQUEST_DENIED".to_string(),
                message: String::new(),
            }
            .is_retryable()
        );
        assert!(
            !MapsError::NoRouteFound {
                from: "A".to_string(),
                to: "B".to_string(),
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_error_display() {
        let err = MapsError::NoRouteFound {
            from: "24.86,67.00".to_string(),
            to: "24.90,67.10".to_string(),
        };
        assert!(err.to_string().contains("24.86,67.00"));

        let err = MapsError::Timeout { timeout_secs: 7 };
        assert!(err.to_string().contains('7'));
    }
}
