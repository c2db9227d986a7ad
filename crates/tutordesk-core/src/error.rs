//! Unified error types for the tutordesk core library.
//!
//! This module provides a unified error type [`TutordeskError`] that covers all
//! failure modes across the system: input validation, the storage sandbox
//! boundary, student record persistence, and configuration.
//!
//! # Design Principles
//!
//! - **Specific variants**: Each error variant captures exactly one failure mode
//! - **Safe messages**: Security-boundary errors never echo raw filesystem detail
//! - **HTTP-ready**: Error types include HTTP status codes and error codes

use std::path::PathBuf;
use thiserror::Error;

/// The unified error type for all tutordesk operations.
#[derive(Debug, Error)]
pub enum TutordeskError {
    // =========================================================================
    // VALIDATION ERRORS
    // =========================================================================
    /// The provided date string does not match `yyyy-MM-dd` or denotes an
    /// impossible calendar date.
    #[error("Invalid date: '{0}'. Expected a real calendar date in yyyy-MM-dd format (e.g., '2025-05-01').")]
    InvalidDateFormat(String),

    /// The provided weekday name is not one of the seven English weekday names.
    #[error("Invalid weekday: '{0}'. Expected a full weekday name such as 'Monday'.")]
    InvalidWeekday(String),

    /// A request argument is out of range or otherwise malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // =========================================================================
    // STORAGE ERRORS
    // =========================================================================
    /// A relative path would resolve outside the storage root.
    ///
    /// The message is deliberately fixed: traversal attempts must not leak
    /// resolved filesystem paths back to the caller.
    #[error("Path escapes the storage root and was denied")]
    PathTraversalDenied,

    /// The requested file or entry does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    // =========================================================================
    // CONFIGURATION ERRORS
    // =========================================================================
    /// The configuration file was not found at the expected path.
    #[error("Configuration file not found at: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// The configuration file exists but could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),

    // =========================================================================
    // PERSISTENCE & I/O ERRORS
    // =========================================================================
    /// The student record store failed to read or write a document.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A low-level I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized [`Result`] type for tutordesk operations.
pub type Result<T> = std::result::Result<T, TutordeskError>;

impl TutordeskError {
    /// Returns `true` if this error was detected before any I/O took place.
    #[inline]
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidDateFormat(_) | Self::InvalidWeekday(_) | Self::InvalidArgument(_)
        )
    }

    /// Returns `true` if this error is the storage sandbox rejecting a path.
    #[inline]
    #[must_use]
    pub fn is_traversal_denied(&self) -> bool {
        matches!(self, Self::PathTraversalDenied)
    }

    /// Returns an HTTP-appropriate status code for this error.
    #[inline]
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidDateFormat(_) | Self::InvalidWeekday(_) | Self::InvalidArgument(_) => 400,
            Self::PathTraversalDenied => 403,
            Self::NotFound(_) => 404,
            Self::ConfigNotFound(_) | Self::ConfigParse(_) | Self::Persistence(_) | Self::Io(_) => {
                500
            }
        }
    }

    /// Returns a machine-readable error code for API responses.
    #[inline]
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateFormat(_) => "INVALID_DATE_FORMAT",
            Self::InvalidWeekday(_) => "INVALID_WEEKDAY",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::PathTraversalDenied => "PATH_TRAVERSAL_DENIED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ConfigNotFound(_) => "CONFIG_NOT_FOUND",
            Self::ConfigParse(_) => "CONFIG_PARSE_ERROR",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::Io(_) => "IO_ERROR",
        }
    }
}

impl From<sled::Error> for TutordeskError {
    fn from(err: sled::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for TutordeskError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoErr, ErrorKind};

    #[test]
    fn test_validation_error_classification() {
        assert!(TutordeskError::InvalidDateFormat("2025-13-01".into()).is_validation_error());
        assert!(TutordeskError::InvalidWeekday("Funday".into()).is_validation_error());
        assert!(TutordeskError::InvalidArgument("rate must be non-negative".into())
            .is_validation_error());

        assert!(!TutordeskError::PathTraversalDenied.is_validation_error());
        assert!(!TutordeskError::NotFound("x.pdf".into()).is_validation_error());
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            TutordeskError::InvalidDateFormat("bad".into()).http_status_code(),
            400
        );
        assert_eq!(
            TutordeskError::InvalidWeekday("bad".into()).http_status_code(),
            400
        );
        assert_eq!(TutordeskError::PathTraversalDenied.http_status_code(), 403);
        assert_eq!(
            TutordeskError::NotFound("x".into()).http_status_code(),
            404
        );
        assert_eq!(
            TutordeskError::Persistence("disk full".into()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            TutordeskError::PathTraversalDenied.error_code(),
            "PATH_TRAVERSAL_DENIED"
        );
        assert_eq!(
            TutordeskError::InvalidDateFormat("x".into()).error_code(),
            "INVALID_DATE_FORMAT"
        );
    }

    #[test]
    fn test_traversal_message_does_not_leak_paths() {
        let msg = TutordeskError::PathTraversalDenied.to_string();
        assert!(!msg.contains('/'));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoErr::new(ErrorKind::NotFound, "file not found");
        let err: TutordeskError = io_err.into();
        assert!(matches!(err, TutordeskError::Io(_)));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<TutordeskError>();
        assert_sync::<TutordeskError>();
    }
}
