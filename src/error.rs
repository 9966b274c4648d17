//! Error types and handling for Quire
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Broad error categories shown to the user.
///
/// Every [`QuireError`] maps onto exactly one kind; commands use it to pick
/// the status message and to decide whether a manual retry makes sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidCredential,
    InsufficientPermission,
    Conflict,
    NotFound,
    RemoteUnavailable,
    Validation,
    Local,
}

impl ErrorKind {
    /// Whether repeating the same action unchanged could succeed.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::RemoteUnavailable)
    }
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Main error type for Quire operations
#[derive(Error, Diagnostic, Debug)]
pub enum QuireError {
    // Credential errors
    #[error("Invalid or expired access token")]
    #[diagnostic(
        code(quire::auth::invalid_credential),
        help("Create a new personal access token and run 'quire login' again")
    )]
    InvalidCredential,

    #[error("You do not have write access to {repository} (permission: {level})")]
    #[diagnostic(
        code(quire::auth::insufficient_permission),
        help("Ask the repository owner to grant you write access")
    )]
    InsufficientPermission { repository: String, level: String },

    #[error("Not logged in")]
    #[diagnostic(
        code(quire::auth::not_authenticated),
        help("Run 'quire login' with a GitHub personal access token")
    )]
    NotAuthenticated,

    // Remote content errors
    #[error("Conflict on '{path}': the file changed since it was last read")]
    #[diagnostic(
        code(quire::remote::conflict),
        help("Run 'quire edit <name>' to fetch the current version and redo your changes")
    )]
    Conflict { path: String },

    #[error("Not found: {path}")]
    #[diagnostic(code(quire::remote::not_found))]
    NotFound { path: String },

    #[error("Remote unavailable: {reason}")]
    #[diagnostic(
        code(quire::remote::unavailable),
        help("Check your network connection and try again")
    )]
    RemoteUnavailable { reason: String },

    // Local input errors
    #[error("Validation failed: {}", format_field_errors(.errors))]
    #[diagnostic(code(quire::publish::validation_failed))]
    Validation { errors: Vec<FieldError> },

    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(quire::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}")]
    #[diagnostic(code(quire::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(quire::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("Failed to read file: {path}")]
    #[diagnostic(code(quire::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file: {path}")]
    #[diagnostic(code(quire::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(quire::fs::io_error))]
    IoError { message: String },

    // Local state errors
    #[error("No saved draft")]
    #[diagnostic(
        code(quire::draft::missing),
        help("Run 'quire edit <name>' or 'quire draft save' first")
    )]
    NoDraft,

    #[error("Unsupported shell: {shell}")]
    #[diagnostic(
        code(quire::cli::unsupported_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnsupportedShell { shell: String },

    #[error("Operation cancelled")]
    #[diagnostic(code(quire::ui::cancelled))]
    Cancelled,
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl QuireError {
    /// Map this error onto the user-facing taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuireError::InvalidCredential | QuireError::NotAuthenticated => {
                ErrorKind::InvalidCredential
            }
            QuireError::InsufficientPermission { .. } => ErrorKind::InsufficientPermission,
            QuireError::Conflict { .. } => ErrorKind::Conflict,
            QuireError::NotFound { .. } => ErrorKind::NotFound,
            QuireError::RemoteUnavailable { .. } => ErrorKind::RemoteUnavailable,
            QuireError::Validation { .. } => ErrorKind::Validation,
            _ => ErrorKind::Local,
        }
    }

    /// Field errors carried by a validation failure, empty otherwise
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            QuireError::Validation { errors } => errors,
            _ => &[],
        }
    }
}

impl From<std::io::Error> for QuireError {
    fn from(err: std::io::Error) -> Self {
        QuireError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for QuireError {
    fn from(err: serde_yaml::Error) -> Self {
        QuireError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for QuireError {
    fn from(err: serde_json::Error) -> Self {
        QuireError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for QuireError {
    fn from(err: reqwest::Error) -> Self {
        QuireError::RemoteUnavailable {
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for QuireError {
    fn from(err: inquire::InquireError) -> Self {
        match err {
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted => QuireError::Cancelled,
            other => QuireError::IoError {
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, QuireError>;
