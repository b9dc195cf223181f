use thiserror::Error;

/// Failure to hand a line to the protocol layer.
///
/// Every variant degrades to the same "not sent" outcome for the caller;
/// the distinction only matters for logs.
#[derive(Debug, Error)]
pub enum TransmitError {
    #[error("not connected")]
    NotConnected,

    #[error("transmit failed: {0}")]
    Failed(String),
}

/// Errors related to bridge configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("failed to parse config file {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors raised while setting up the IRC client.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("irc client error: {0}")]
    Client(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transmit_error_display() {
        assert_eq!(TransmitError::NotConnected.to_string(), "not connected");
        let err = TransmitError::Failed("socket closed".to_string());
        assert_eq!(err.to_string(), "transmit failed: socket closed");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::Parse {
            path: "/tmp/config.toml".to_string(),
            reason: "expected `=`".to_string(),
        };
        assert!(err.to_string().contains("/tmp/config.toml"));
        assert!(err.to_string().contains("expected `=`"));
    }

    #[test]
    fn test_driver_error_display() {
        let err = DriverError::Client("connection refused".to_string());
        assert_eq!(err.to_string(), "irc client error: connection refused");
    }
}
