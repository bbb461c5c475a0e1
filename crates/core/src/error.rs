//! Unified error types for the referral gateway.
//!
//! Error codes:
//! - CONFIG_001: Missing or invalid store configuration
//! - STORE_001-002: Spreadsheet store failures and timeouts
//! - VALID_001: Missing or malformed request parameter
//! - NOT_FOUND_001: Lookup yielded no record
//! - AUTH_001: Invalid credentials
//! - UNSUPPORTED_001: Declared but unimplemented capability
//! - INTERNAL_001: Unexpected fault

use std::time::Duration;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Stable error codes reported alongside messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// CONFIG_001: Credentials or spreadsheet id missing
    ConfigMissing,
    /// STORE_001: Remote store call failed
    StoreFailed,
    /// STORE_002: Remote store call exceeded its timeout
    StoreTimeout,
    /// VALID_001: Request parameter missing or malformed
    InvalidParameter,
    /// NOT_FOUND_001: Record not found
    NotFound,
    /// AUTH_001: Credentials rejected
    InvalidCredentials,
    /// UNSUPPORTED_001: Operation is declared but not supported
    NotSupported,
    /// INTERNAL_001: Unexpected fault
    Internal,
}

impl ErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigMissing => "CONFIG_001",
            Self::StoreFailed => "STORE_001",
            Self::StoreTimeout => "STORE_002",
            Self::InvalidParameter => "VALID_001",
            Self::NotFound => "NOT_FOUND_001",
            Self::InvalidCredentials => "AUTH_001",
            Self::NotSupported => "UNSUPPORTED_001",
            Self::Internal => "INTERNAL_001",
        }
    }
}

/// Unified error type for the referral gateway.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Credentials or spreadsheet id are missing.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network, auth, or quota failure talking to the store.
    #[error("failed to access {table}: {message}")]
    Store { table: String, message: String },

    /// A store call did not complete in time.
    #[error("timed out accessing {table} after {}ms", .after.as_millis())]
    StoreTimeout { table: String, after: Duration },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0} is not supported")]
    NotSupported(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn store(table: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Store {
            table: table.into(),
            message: msg.into(),
        }
    }

    pub fn store_timeout(table: impl Into<String>, after: Duration) -> Self {
        Self::StoreTimeout {
            table: table.into(),
            after,
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Shorthand for a missing required parameter.
    pub fn missing_param(name: &str) -> Self {
        Self::Validation(format!("{} is required", name))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_supported(what: impl Into<String>) -> Self {
        Self::NotSupported(what.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the stable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Config(_) => ErrorCode::ConfigMissing,
            Self::Store { .. } => ErrorCode::StoreFailed,
            Self::StoreTimeout { .. } => ErrorCode::StoreTimeout,
            Self::Validation(_) => ErrorCode::InvalidParameter,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Unauthorized(_) => ErrorCode::InvalidCredentials,
            Self::NotSupported(_) => ErrorCode::NotSupported,
            Self::Serialization(_) | Self::Internal(_) => ErrorCode::Internal,
        }
    }

    /// True for store reads/writes that failed or timed out.
    pub fn is_store_failure(&self) -> bool {
        matches!(self, Self::Store { .. } | Self::StoreTimeout { .. })
    }

    /// True for faults that indicate a bug rather than an expected outcome.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Serialization(_) | Self::Internal(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Serialization(format!("csv: {}", err))
    }
}
