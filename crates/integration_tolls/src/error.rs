//! Toll client error types
//!
//! Only client construction can fail. Estimation itself never returns an
//! error; failures are classified on the returned quote.

use thiserror::Error;

/// Errors that can occur while setting up the toll client
#[derive(Debug, Error)]
pub enum TollError {
    /// HTTP client could not be initialized
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TollError::ConfigurationError("endpoint must not be empty".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: endpoint must not be empty"
        );
    }
}
