//! Output formatters for duplicate scan results.
//!
//! - [`text`]: the default human-readable report
//! - [`json`]: a single JSON document for automation
//!
//! # Example
//!
//! ```no_run
//! use fdup::duplicates::DuplicateFinder;
//! use fdup::error::ExitCode;
//! use fdup::output::JsonOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (report, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let code = ExitCode::for_scan(&report);
//! let output = JsonOutput::new(&report, &summary, code);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub use json::{JsonOutput, JsonOutputError};
pub use text::{write_algorithm_list, TextOutput};

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
