//! Human-readable report.
//!
//! ```text
//! Found 2 identical files
//! SHA512 9B71D224BD62F378...:
//! - /tmp/demo/a
//! - /tmp/demo/b
//!
//! Found 2 duplicates!
//! ```

use std::fmt::Display;
use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::{Paint, Style};

use crate::duplicates::{DuplicateReport, ScanSummary};
use crate::scanner::Algorithm;

const HEADER: Style = Style::new().bold();
const DIGEST: Style = Style::new().cyan();
const SUCCESS: Style = Style::new().green().bold();
const WARNING: Style = Style::new().yellow();
const DIM: Style = Style::new().dim();

/// Plain-text report writer.
#[derive(Debug, Clone, Copy)]
pub struct TextOutput<'a> {
    report: &'a DuplicateReport,
    summary: &'a ScanSummary,
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a writer for a finished scan.
    #[must_use]
    pub fn new(report: &'a DuplicateReport, summary: &'a ScanSummary) -> Self {
        Self {
            report,
            summary,
            color: true,
        }
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn paint<T: Display>(&self, value: T, style: Style) -> String {
        if self.color {
            value.paint(style).to_string()
        } else {
            value.to_string()
        }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns any error from the writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for group in &self.report.groups {
            writeln!(
                writer,
                "{}",
                self.paint(format!("Found {} identical files", group.len()), HEADER)
            )?;
            writeln!(
                writer,
                "{} {}:",
                group.algorithm.display_name(),
                self.paint(group.digest, DIGEST)
            )?;
            for path in &group.files {
                writeln!(writer, "- {}", path.display())?;
            }
            writeln!(writer)?;
        }

        if self.report.is_empty() {
            writeln!(writer, "{}", self.paint("No duplicates found!", HEADER))?;
        } else {
            writeln!(
                writer,
                "{}",
                self.paint(
                    format!("Found {} duplicates!", self.report.total_duplicates),
                    SUCCESS
                )
            )?;
            writeln!(
                writer,
                "{}",
                self.paint(
                    format!(
                        "{} reclaimable by keeping one copy per group",
                        ByteSize::b(self.report.reclaimable_space())
                    ),
                    DIM
                )
            )?;
        }

        let unreadable = self.summary.scan_errors.len() + self.summary.hash_errors.len();
        if unreadable > 0 {
            writeln!(
                writer,
                "{}",
                self.paint(
                    format!("{unreadable} paths could not be read; results may be incomplete"),
                    WARNING
                )
            )?;
        }

        Ok(())
    }
}

/// Write the `alglist` table.
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_algorithm_list<W: Write>(writer: &mut W, color: bool) -> io::Result<()> {
    let style = |text: String, style: Style| {
        if color {
            text.paint(style).to_string()
        } else {
            text
        }
    };

    writeln!(
        writer,
        "{}",
        style(format!("{:<10} {:<10} {:>5}", "NAME", "VALUE", "BITS"), HEADER)
    )?;
    for algorithm in Algorithm::ALL {
        let mut line = format!(
            "{:<10} {:<10} {:>5}",
            algorithm.display_name(),
            algorithm.cli_name(),
            algorithm.digest_len() * 8
        );
        if algorithm == Algorithm::default() {
            line.push_str("  (default)");
        }
        if algorithm.is_legacy() {
            line = style(format!("{line}  legacy: collisions are practical"), WARNING);
        }
        writeln!(writer, "{line}")?;
    }
    Ok(())
}
