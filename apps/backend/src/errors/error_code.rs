//! Error codes for the job board API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every code is SCREAMING_SNAKE_CASE and maps 1:1 to the string that
//! appears in HTTP responses.

use core::fmt;

/// Centralized error codes for the job board API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Missing, invalid or expired session token
    Unauthorized,
    /// Authenticated, but not the owner of the requested slice of data
    Forbidden,

    // Request Validation
    /// Login body without a usable email
    InvalidEmail,
    /// Request body could not be parsed into the expected record shape
    InvalidBody,
    /// Patch attempted to change an id or owner field
    ProtectedField,

    // Resource Not Found
    /// Job not found (or not visible to the caller)
    JobNotFound,
    /// Bit not found (or not visible to the caller)
    BitNotFound,
    /// General not found error
    NotFound,

    // System Errors
    /// Any failure inside the record store
    StoreFailure,
    /// Record store is not reachable
    StoreUnavailable,
    /// Configuration error
    ConfigError,
    /// Internal server error
    Internal,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",

            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidBody => "INVALID_BODY",
            Self::ProtectedField => "PROTECTED_FIELD",

            Self::JobNotFound => "JOB_NOT_FOUND",
            Self::BitNotFound => "BIT_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::StoreFailure => "STORE_FAILURE",
            Self::StoreUnavailable => "STORE_UNAVAILABLE",
            Self::ConfigError => "CONFIG_ERROR",
            Self::Internal => "INTERNAL",
        }
    }

    /// All codes, for uniqueness checks.
    pub const ALL: [ErrorCode; 12] = [
        Self::Unauthorized,
        Self::Forbidden,
        Self::InvalidEmail,
        Self::InvalidBody,
        Self::ProtectedField,
        Self::JobNotFound,
        Self::BitNotFound,
        Self::NotFound,
        Self::StoreFailure,
        Self::StoreUnavailable,
        Self::ConfigError,
        Self::Internal,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
