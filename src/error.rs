//! Error types for konto-console.
//!
//! Two layers of errors exist:
//!
//! - [`KontoError`] covers everything the crate can fail at (configuration,
//!   snapshot files, argument validation, I/O) and carries exit codes for
//!   the CLI.
//! - [`DispatchError`] is the typed outcome of a failed command round-trip.
//!   The dispatcher logs it and hands it back; the console state is never
//!   touched by a failed dispatch.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::dispatch::RequestId;

/// Primary error type for konto-console operations.
#[derive(Error, Debug)]
pub enum KontoError {
    /// Snapshot JSON could not be decoded.
    #[error("Failed to decode snapshot: {message}")]
    SnapshotDecode {
        /// Human-readable error message.
        message: String,
        /// Underlying serde_json error, if available.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// A command round-trip failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// A snapshot was delivered for a different role than the session's.
    #[error("Snapshot role '{found}' does not match session role '{expected}'")]
    RoleMismatch {
        /// Role of the running session.
        expected: String,
        /// Role found in the snapshot.
        found: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Human-readable error message.
        message: String,
    },

    /// Invalid configuration file.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Human-readable error message.
        message: String,
    },

    /// Invalid argument.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the invalid argument.
        name: String,
        /// Reason why the argument is invalid.
        reason: String,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    IoError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("Serialization error: {context}")]
    SerializationError {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying serde_json error.
        #[source]
        source: serde_json::Error,
    },

    /// Unsupported operation or feature.
    #[error("Unsupported: {feature}")]
    Unsupported {
        /// Name of the unsupported feature.
        feature: String,
    },
}

impl KontoError {
    /// Create a new snapshot decode error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::SnapshotDecode {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::IoError {
            context: context.into(),
            source,
        }
    }

    /// Create a new invalid argument error.
    #[must_use]
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::SnapshotDecode { .. } => exit_codes::EXIT_DATA_ERROR,
            Self::FileNotFound { .. } => exit_codes::EXIT_FILE_NOT_FOUND,
            Self::Dispatch(err) => match err.kind {
                FailureKind::AuthAbsent => exit_codes::EXIT_AUTH_ABSENT,
                FailureKind::Application { .. } => exit_codes::EXIT_REJECTED,
                _ => exit_codes::EXIT_UNAVAILABLE,
            },
            Self::RoleMismatch { .. } => exit_codes::EXIT_REJECTED,
            Self::ConfigError { .. } | Self::InvalidConfig { .. } => exit_codes::EXIT_CONFIG_ERROR,
            Self::InvalidArgument { .. } => exit_codes::EXIT_USAGE_ERROR,
            Self::IoError { .. } => exit_codes::EXIT_IO_ERROR,
            _ => exit_codes::EXIT_GENERAL_ERROR,
        }
    }

    /// Check if this error is recoverable by simply trying again.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Dispatch(err) => err.is_retryable(),
            _ => false,
        }
    }
}

/// Result type alias for konto-console operations.
pub type Result<T> = std::result::Result<T, KontoError>;

impl From<std::io::Error> for KontoError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            context: "I/O operation failed".to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for KontoError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            context: "JSON operation failed".to_string(),
            source: err,
        }
    }
}

/// Classification of a failed command round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// No auth token was present; nothing was sent.
    AuthAbsent,
    /// The request never completed (connection, DNS, HTTP status).
    Transport,
    /// The request did not complete within the configured timeout.
    Timeout,
    /// The reply was not a well-formed `ok`/`error` body.
    Malformed,
    /// The backend answered with `status: "error"`.
    Application {
        /// Machine-readable error code sent by the backend.
        code: String,
    },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthAbsent => f.write_str("not logged in"),
            Self::Transport => f.write_str("transport failure"),
            Self::Timeout => f.write_str("timed out"),
            Self::Malformed => f.write_str("malformed reply"),
            Self::Application { code } => write!(f, "rejected ({code})"),
        }
    }
}

/// A failed command round-trip.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Command '{action}' failed: {kind}: {detail}")]
pub struct DispatchError {
    /// What went wrong.
    pub kind: FailureKind,
    /// Action name of the command.
    pub action: String,
    /// Human-readable detail (backend text, transport message, ...).
    pub detail: String,
    /// Request id, when the request was actually issued.
    pub request: Option<RequestId>,
}

impl DispatchError {
    /// Create a new dispatch error.
    #[must_use]
    pub fn new(
        kind: FailureKind,
        action: impl Into<String>,
        detail: impl Into<String>,
        request: Option<RequestId>,
    ) -> Self {
        Self {
            kind,
            action: action.into(),
            detail: detail.into(),
            request,
        }
    }

    /// Whether the caller may sensibly retry the same command.
    ///
    /// The engine itself never retries.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind, FailureKind::Transport | FailureKind::Timeout)
    }

    /// Backend error code, for application errors.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match &self.kind {
            FailureKind::Application { code } => Some(code),
            _ => None,
        }
    }
}

/// Exit codes for CLI operations.
pub mod exit_codes {
    /// Operation completed successfully.
    pub const EXIT_SUCCESS: i32 = 0;
    /// General/unspecified error.
    pub const EXIT_GENERAL_ERROR: i32 = 1;
    /// No auth token available.
    pub const EXIT_AUTH_ABSENT: i32 = 2;
    /// Specified file not found.
    pub const EXIT_FILE_NOT_FOUND: i32 = 3;
    /// Backend rejected the command.
    pub const EXIT_REJECTED: i32 = 4;
    /// Invalid configuration.
    pub const EXIT_CONFIG_ERROR: i32 = 5;
    /// Invalid command-line usage (BSD standard).
    pub const EXIT_USAGE_ERROR: i32 = 64;
    /// Input data format error (BSD standard).
    pub const EXIT_DATA_ERROR: i32 = 65;
    /// Backend unavailable (BSD standard).
    pub const EXIT_UNAVAILABLE: i32 = 69;
    /// I/O error (BSD standard).
    pub const EXIT_IO_ERROR: i32 = 74;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let decode = KontoError::decode("bad");
        assert_eq!(decode.exit_code(), 65);

        let not_found = KontoError::FileNotFound {
            path: PathBuf::from("/test"),
        };
        assert_eq!(not_found.exit_code(), 3);

        let rejected: KontoError = DispatchError::new(
            FailureKind::Application { code: "0".into() },
            "benutzer-neu",
            "no",
            Some(RequestId(1)),
        )
        .into();
        assert_eq!(rejected.exit_code(), 4);

        let absent: KontoError =
            DispatchError::new(FailureKind::AuthAbsent, "benutzer-neu", "", None).into();
        assert_eq!(absent.exit_code(), 2);
    }

    #[test]
    fn test_is_recoverable() {
        let timeout: KontoError =
            DispatchError::new(FailureKind::Timeout, "x", "", Some(RequestId(3))).into();
        assert!(timeout.is_recoverable());

        let rejected: KontoError = DispatchError::new(
            FailureKind::Application { code: "500".into() },
            "x",
            "",
            Some(RequestId(3)),
        )
        .into();
        assert!(!rejected.is_recoverable());
        assert!(!KontoError::decode("x").is_recoverable());
    }

    #[test]
    fn test_dispatch_error_display() {
        let err = DispatchError::new(
            FailureKind::Application { code: "1".into() },
            "abo-neu",
            "E-Mail stimmt nicht",
            Some(RequestId(7)),
        );
        assert_eq!(
            err.to_string(),
            "Command 'abo-neu' failed: rejected (1): E-Mail stimmt nicht"
        );
        assert_eq!(err.code(), Some("1"));
    }
}
