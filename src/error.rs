//! Error Handling Infrastructure
//!
//! This module defines all error types used throughout the records tool.
//!
//! # Error Categories
//! - `Validation`: Malformed parameter count or shape, caught before any statement is built
//! - `Statement`: Failure raised by the engine while executing a statement
//! - `EmptyResult`: A query that succeeded but matched no rows
//! - `ConnectionFailed`: The data source could not be opened
//! - `ConfigError`: Configuration file or data source definition errors
//! - `InvalidInput`: Console input that could not be parsed
//! - `Io`: Console read/write failures
//!
//! The first four are resolved into an [`Outcome`](crate::output::Outcome) at
//! the dispatcher boundary. The rest are fatal and end the session.

use thiserror::Error;

/// Main error type for records operations
#[derive(Error, Debug)]
pub enum RecordsError {
    /// Parameter list rejected before touching the data store
    #[error("{0}")]
    Validation(String),

    /// Engine failure, message carried verbatim
    #[error("{0}")]
    Statement(String),

    /// Query returned zero rows
    #[error("No Data")]
    EmptyResult,

    /// Database connection failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Configuration error (file not found, invalid JSON, unsupported driver)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Console input could not be interpreted
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Console I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RecordsError {
    /// Convert error to a stable error code string
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::Statement(_) => "STATEMENT_FAILED",
            Self::EmptyResult => "NO_DATA",
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Io(_) => "IO_ERROR",
        }
    }

    /// Get human-readable error message
    #[must_use]
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Whether the error must end the session instead of becoming an outcome
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ConfigError(_) | Self::InvalidInput(_) | Self::Io(_))
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a statement error
    pub fn statement(message: impl Into<String>) -> Self {
        Self::Statement(message.into())
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::ConnectionFailed(message.into())
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<rusqlite::Error> for RecordsError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Statement(err.to_string())
    }
}

/// Result type alias for records operations
pub type Result<T> = std::result::Result<T, RecordsError>;
