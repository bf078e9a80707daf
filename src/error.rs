//! Error types for the snippet console
//!
//! Structured errors with thiserror. The binary wraps them in anyhow for context.
//! Capacity overflow, lex failures and compile failures are not errors here:
//! they are reported as data and the console keeps running.

use thiserror::Error;

/// Main error type for console operations
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// Configuration source could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Configuration parsed but holds unusable values
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML rendering error
    #[error("TOML error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Submit was requested outside of an async runtime
    #[error("No async runtime available to run the compiler")]
    RuntimeUnavailable,

    /// Help entry or suggestion index out of range
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Console command line could not be parsed
    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConsoleError::InvalidSelection("help entry 9".to_string());
        assert_eq!(err.to_string(), "Invalid selection: help entry 9");
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{");
        let err: ConsoleError = json_err.unwrap_err().into();
        assert!(matches!(err, ConsoleError::Serialization(_)));
    }
}
