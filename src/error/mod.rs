//! Error types and handling for usb-nas-cli
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Constructors for the most common variants live in sub-modules by domain:
//! - [`account`]: temporary account errors
//! - [`share`]: network share errors
//! - [`update`]: version check, download and replace errors

pub mod account;
pub mod share;
pub mod update;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for usb-nas-cli operations
#[derive(Error, Diagnostic, Debug)]
pub enum NasError {
    // Version errors
    #[error("Unparseable version: '{input}'")]
    #[diagnostic(
        code(usb_nas::version::unparseable),
        help("Versions must be three dot-separated numbers, e.g. 1.0.3")
    )]
    UnparseableVersion { input: String },

    // Update errors
    #[error("Network error: {message}")]
    #[diagnostic(code(usb_nas::update::network))]
    Network { message: String },

    #[error("Update failed: {message}")]
    #[diagnostic(
        code(usb_nas::update::failed),
        help("The running version was left untouched")
    )]
    Update { message: String },

    // Privilege errors
    #[error("Administrator privileges are required")]
    #[diagnostic(
        code(usb_nas::privilege::not_elevated),
        help("Run usb-nas-cli from an elevated prompt or accept the UAC request")
    )]
    NotElevated,

    #[error("Failed to relaunch with administrator privileges: {reason}")]
    #[diagnostic(code(usb_nas::privilege::elevation_failed))]
    ElevationFailed { reason: String },

    // Account errors
    #[error("Account '{name}' already exists")]
    #[diagnostic(
        code(usb_nas::account::exists),
        help("A local account with the minted name is already present; start a new cycle to mint another")
    )]
    AccountExists { name: String },

    #[error("Account operation failed for '{name}': {reason}")]
    #[diagnostic(code(usb_nas::account::failed))]
    AccountFailed { name: String, reason: String },

    // Share errors
    #[error("Share operation failed for '{name}': {reason}")]
    #[diagnostic(code(usb_nas::share::failed))]
    ShareFailed { name: String, reason: String },

    // Session state errors
    #[error("A share session is already active")]
    #[diagnostic(
        code(usb_nas::session::active),
        help("Stop the current share before starting another")
    )]
    SessionActive,

    #[error("No share session is active")]
    #[diagnostic(code(usb_nas::session::none_active))]
    NoActiveSession,

    // Operator input errors
    #[error("Invalid input: {message}")]
    #[diagnostic(code(usb_nas::input::invalid))]
    Input { message: String },

    #[error("Input cancelled")]
    #[diagnostic(code(usb_nas::input::cancelled))]
    InputCancelled,

    // Configuration errors
    #[error("Invalid configuration in {path}: {reason}")]
    #[diagnostic(code(usb_nas::config::invalid))]
    Config { path: String, reason: String },

    // System errors
    #[error("Failed to run {program}: {reason}")]
    #[diagnostic(code(usb_nas::system::command_failed))]
    Command { program: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(usb_nas::fs::io_error))]
    Io { message: String },
}

impl NasError {
    /// Whether this error came from operator input.
    ///
    /// Input errors (EOF, cancel, garbage) are treated as a request to exit
    /// rather than as failures.
    pub fn is_input(&self) -> bool {
        matches!(self, NasError::Input { .. } | NasError::InputCancelled)
    }
}

impl From<std::io::Error> for NasError {
    fn from(err: std::io::Error) -> Self {
        NasError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for NasError {
    fn from(err: serde_yaml::Error) -> Self {
        NasError::Config {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for NasError {
    fn from(err: serde_json::Error) -> Self {
        NasError::Command {
            program: "powershell".to_string(),
            reason: format!("unexpected JSON output: {err}"),
        }
    }
}

impl From<reqwest::Error> for NasError {
    fn from(err: reqwest::Error) -> Self {
        NasError::Network {
            message: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for NasError {
    fn from(err: inquire::InquireError) -> Self {
        match err {
            inquire::InquireError::OperationCanceled
            | inquire::InquireError::OperationInterrupted => NasError::InputCancelled,
            other => NasError::Input {
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, NasError>;
