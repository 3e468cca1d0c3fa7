//! Exit codes and structured error output.

use serde::Serialize;

use crate::duplicates::{DuplicateReport, FinderError};

/// Process exit codes.
///
/// - 0: duplicates found
/// - 1: fatal error (including a missing or non-directory root)
/// - 2: scan completed, no duplicates
/// - 130: interrupted (Ctrl+C)
///
/// Unreadable files and directories do not change the code of a completed
/// scan; they are listed in the report instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Scan completed and duplicates were found.
    Success = 0,
    /// An error stopped the run.
    GeneralError = 1,
    /// Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Scan was interrupted by the user.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "FD000",
            Self::GeneralError => "FD001",
            Self::NoDuplicates => "FD002",
            Self::Interrupted => "FD130",
        }
    }

    /// Exit code for a completed scan.
    #[must_use]
    pub fn for_scan(report: &DuplicateReport) -> Self {
        if report.is_empty() {
            Self::NoDuplicates
        } else {
            Self::Success
        }
    }

    /// Exit code for an error that escaped the application.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<FinderError>() {
            Some(FinderError::Interrupted) => Self::Interrupted,
            _ => Self::GeneralError,
        }
    }
}

/// Structured error information for `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "FD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
