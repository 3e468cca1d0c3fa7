//! JSON output for scripting.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "algorithm": "sha512",
//!   "duplicates": [
//!     {
//!       "hash": "9B71D224BD62F378...",
//!       "size": 5,
//!       "files": ["/tmp/a", "/tmp/b"]
//!     }
//!   ],
//!   "summary": {
//!     "total_files": 3,
//!     "total_duplicates": 2,
//!     "exit_code": 0,
//!     "exit_code_name": "FD000"
//!   }
//! }
//! ```
//!
//! The summary carries more counters than shown; see [`JsonSummary`].

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, DuplicateReport, ScanSummary};
use crate::error::ExitCode;
use crate::scanner::Algorithm;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Uppercase hexadecimal digest
    pub hash: String,
    /// File size in bytes
    pub size: u64,
    /// Absolute paths of the members
    pub files: Vec<String>,
}

impl From<&DuplicateGroup> for JsonDuplicateGroup {
    fn from(group: &DuplicateGroup) -> Self {
        Self {
            hash: group.hash_hex(),
            size: group.size,
            files: group
                .files
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Regular files discovered
    pub total_files: usize,
    /// Combined size of discovered files in bytes
    pub total_size: u64,
    /// Files skipped because their size was unique
    pub eliminated_by_size: usize,
    /// Files hashed successfully
    pub hashed_files: usize,
    /// Files that could not be read
    pub failed_files: usize,
    /// Duplicate groups
    pub duplicate_groups: usize,
    /// Files participating in any group
    pub total_duplicates: usize,
    /// Redundant copies (excluding one original per group)
    pub duplicate_files: usize,
    /// Bytes freed by removing the redundant copies
    pub reclaimable_space: u64,
    /// Wall time in milliseconds
    pub scan_duration_ms: u64,
    /// Paths that could not be listed or read, with the reason
    pub errors: Vec<String>,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "FD000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        let errors = summary
            .scan_errors
            .iter()
            .map(ToString::to_string)
            .chain(summary.hash_errors.iter().map(ToString::to_string))
            .collect();

        Self {
            total_files: summary.total_files,
            total_size: summary.total_size,
            eliminated_by_size: summary.eliminated_by_size,
            hashed_files: summary.hashed_files,
            failed_files: summary.failed_files,
            duplicate_groups: summary.duplicate_groups,
            total_duplicates: summary.total_duplicates,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            scan_duration_ms: u64::try_from(summary.scan_duration.as_millis()).unwrap_or(u64::MAX),
            errors,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Digest algorithm
    pub algorithm: Algorithm,
    /// Duplicate groups, largest files first
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the document for a finished scan.
    #[must_use]
    pub fn new(report: &DuplicateReport, summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            algorithm: report.algorithm,
            duplicates: report.groups.iter().map(JsonDuplicateGroup::from).collect(),
            summary: JsonSummary::from_scan_summary(summary, exit_code),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the document followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        if pretty {
            serde_json::to_writer_pretty(&mut *writer, self)?;
        } else {
            serde_json::to_writer(&mut *writer, self)?;
        }
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{Digest, HashError};
    use std::path::PathBuf;
    use std::time::Duration;

    fn report() -> DuplicateReport {
        let group = DuplicateGroup::new(
            Digest::from_bytes(&[0xab; 16]).unwrap(),
            Algorithm::Md5,
            1024,
            vec![PathBuf::from("/b.txt"), PathBuf::from("/a.txt")],
        );
        DuplicateReport {
            algorithm: Algorithm::Md5,
            groups: vec![group],
            total_duplicates: 2,
        }
    }

    #[test]
    fn test_json_output_empty() {
        let output = JsonOutput::new(
            &DuplicateReport::empty(Algorithm::Sha512),
            &ScanSummary::default(),
            ExitCode::NoDuplicates,
        );
        assert!(output.duplicates.is_empty());
        assert_eq!(output.summary.exit_code, 2);
        assert_eq!(output.summary.exit_code_name, "FD002");
    }

    #[test]
    fn test_json_document_shape() {
        let summary = ScanSummary {
            total_files: 3,
            scan_duration: Duration::from_millis(1234),
            ..Default::default()
        };
        let output = JsonOutput::new(&report(), &summary, ExitCode::Success);
        let parsed: serde_json::Value = serde_json::from_str(&output.to_json().unwrap()).unwrap();

        assert_eq!(parsed["algorithm"], "md5");
        assert_eq!(parsed["duplicates"][0]["hash"], "AB".repeat(16));
        assert_eq!(parsed["duplicates"][0]["files"][0], "/a.txt");
        assert_eq!(parsed["summary"]["total_files"], 3);
        assert_eq!(parsed["summary"]["scan_duration_ms"], 1234);
    }

    #[test]
    fn test_errors_listed() {
        let summary = ScanSummary {
            hash_errors: vec![HashError::NotFound(PathBuf::from("/gone"))],
            ..Default::default()
        };
        let output = JsonOutput::new(&report(), &summary, ExitCode::Success);
        assert_eq!(output.summary.errors, vec!["File not found: /gone".to_string()]);
        assert_eq!(output.summary.exit_code, 0);
    }

    #[test]
    fn test_compact_and_pretty() {
        let output = JsonOutput::new(&report(), &ScanSummary::default(), ExitCode::Success);
        assert!(!output.to_json().unwrap().contains('\n'));
        assert!(output.to_json_pretty().unwrap().contains('\n'));
    }

    #[test]
    fn test_write_to() {
        let output = JsonOutput::new(&report(), &ScanSummary::default(), ExitCode::Success);
        let mut buffer = Vec::new();
        output.write_to(&mut buffer, false).unwrap();

        let written = String::from_utf8(buffer).unwrap();
        assert!(written.starts_with('{'));
        assert!(written.ends_with("}\n"));
    }
}
