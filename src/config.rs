//! Console endpoint configuration.
//!
//! [`ConsoleConfig`] is supplied once at construction and consumed by the
//! transport; it is not retained by the [`Connection`](crate::Connection)
//! afterwards. Validation is eager: a bad host or port fails construction
//! rather than the first connect.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// ConsoleConfig
// ============================================================================

/// Address of a remote console server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Hostname or address of the console server.
    pub host: String,
    /// TCP port of the console server.
    pub port: u16,
}

impl ConsoleConfig {
    /// Creates a new configuration.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the host is empty or the port is zero.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(Error::config("host must not be empty"));
        }
        if self.port == 0 {
            return Err(Error::config("port must be non-zero"));
        }
        Ok(())
    }

    /// Renders the `host:port` dial address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = ConsoleConfig::new("localhost", 1234);
        assert!(config.validate().is_ok());
        assert_eq!(config.addr(), "localhost:1234");
    }

    #[test]
    fn test_empty_host_rejected() {
        let config = ConsoleConfig::new("", 1234);
        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_zero_port_rejected() {
        let config = ConsoleConfig::new("localhost", 0);
        let err = config.validate().unwrap_err();
        assert!(err.is_config_error());
    }
}
