//! Command-line interface definitions for fdup.
//!
//! # Example
//!
//! ```bash
//! # Top-level files of the current directory, SHA-512
//! fdup
//!
//! # Whole tree, SHA-256, JSON report
//! fdup ~/Downloads -r -a sha256 --output json
//!
//! # Print every digest while scanning
//! fdup ~/Pictures -r -v
//!
//! # Supported algorithms
//! fdup alglist
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;
use crate::scanner::Algorithm;

/// Find files with identical content.
///
/// Files are first grouped by size; only sizes shared by two or more files
/// are hashed, concurrently, and files with equal digests are reported
/// together.
#[derive(Debug, Parser)]
#[command(name = "fdup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print each file's digest and searched directories (-v), or trace (-vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress and everything but errors and the report
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Read settings from this TOML file instead of the default location
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Scan options
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// List supported hash algorithms
    Alglist,
}

/// Arguments for a scan.
#[derive(Debug, Default, Args)]
pub struct ScanArgs {
    /// Directory to scan [default: .]
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Hash algorithm [default: sha512]
    #[arg(short, long, value_enum, value_name = "ALG")]
    pub algorithm: Option<Algorithm>,

    /// Hashing threads [default: available parallelism]
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,

    /// Read buffer per hashing thread (e.g. 64KiB, 1MiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub buffer_size: Option<u64>,

    /// Follow symbolic links (cycles are detected and skipped)
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Report format [default: text]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB.
/// Case-insensitive. Numbers without suffix are treated as bytes.
///
/// # Examples
///
/// ```
/// use fdup::cli::parse_size;
///
/// assert_eq!(parse_size("4096").unwrap(), 4096);
/// assert_eq!(parse_size("64KiB").unwrap(), 65_536);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid number,
/// or an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
