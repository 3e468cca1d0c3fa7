//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-based file grouping (only shared sizes are hashed)
//! - Digest-based grouping of hashed files
//! - The final duplicate report
//! - The concurrent scan pipeline tying them together

pub mod finder;
pub mod groups;
pub mod report;

pub use finder::{
    default_threads, DuplicateFinder, FinderConfig, FinderError, ScanContext, ScanSummary,
};
pub use groups::{
    group_by_size, Admission, DuplicateGroup, GroupingStats, HashGroups, SizeGroups,
};
pub use report::DuplicateReport;
