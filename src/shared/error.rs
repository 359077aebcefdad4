use std::fmt;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow the invoking scheduler to distinguish between
/// different kinds of failures. A reconciliation that was aborted
/// because the scanning service reported per-item errors is still a
/// normal return (`Success`): the scheduler's redelivery policy is
/// the recovery path, not a non-zero exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success, including benign no-ops and aborted-but-redeliverable runs
    Success = 0,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (malformed event, retry exhaustion, config error)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for findings reconciliation.
///
/// Uses thiserror to derive Display and Error traits automatically,
/// reducing boilerplate while maintaining user-friendly error messages.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Finding entry {index} in the event is missing the mandatory \"Id\" field\n\n💡 Hint: Every entry under detail.findings must carry the scanning-service finding id")]
    MissingSourceId { index: usize },

    #[error("Scanning service returned {returned} detail record(s) for {requested} requested id(s)\n\n💡 Hint: The bulk response is required to be order-aligned with the request; a size mismatch makes the batch untrustworthy")]
    DetailCountMismatch { requested: usize, returned: usize },

    #[error("Event payload is not valid JSON: {details}")]
    MalformedEvent { details: String },

    #[error("Failed to read event payload from {source_name}: {details}")]
    EventReadError {
        source_name: String,
        details: String,
    },

    #[error("Missing required setting: {name}\n\n💡 Hint: Set '{config_key}' in reconciler.config.yml or pass {flag}")]
    MissingSetting {
        name: &'static str,
        config_key: &'static str,
        flag: &'static str,
    },
}
