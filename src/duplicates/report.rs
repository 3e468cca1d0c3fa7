//! Final duplicate report.
//!
//! Turns the completed digest → files map into the sets the operator sees:
//! only digests shared by two or more files survive, and the report carries
//! the number of files that take part in any of them.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use super::DuplicateGroup;
use crate::scanner::{Algorithm, Digest, FileRef};

/// Duplicate sets found by one scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateReport {
    /// Algorithm used for every digest in the report
    pub algorithm: Algorithm,
    /// Groups with two or more members, largest files first
    pub groups: Vec<DuplicateGroup>,
    /// Files participating in at least one group
    pub total_duplicates: usize,
}

impl DuplicateReport {
    /// Build a report from final hash groups.
    ///
    /// Groups are ordered by size (largest first) and then digest so the
    /// same tree always renders the same way, whatever order the hashing
    /// workers finished in.
    #[must_use]
    pub fn from_hash_groups(
        hash_groups: HashMap<Digest, Vec<Arc<FileRef>>>,
        algorithm: Algorithm,
    ) -> Self {
        let mut groups: Vec<DuplicateGroup> = hash_groups
            .into_iter()
            .filter(|(_, files)| files.len() > 1)
            .map(|(digest, files)| {
                let size = files.first().map_or(0, |f| f.size);
                log::debug!(
                    "Duplicate group {}: {} files, {} bytes each",
                    digest,
                    files.len(),
                    size
                );
                let paths = files.iter().map(|f| f.path.clone()).collect();
                DuplicateGroup::new(digest, algorithm, size, paths)
            })
            .collect();

        groups.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.digest.cmp(&b.digest)));
        let total_duplicates = groups.iter().map(DuplicateGroup::len).sum();

        Self {
            algorithm,
            groups,
            total_duplicates,
        }
    }

    /// An empty report ("no duplicates").
    #[must_use]
    pub fn empty(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            groups: Vec::new(),
            total_duplicates: 0,
        }
    }

    /// Whether no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of duplicate groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Redundant copies across all groups (excluding one original each).
    #[must_use]
    pub fn duplicate_files(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::duplicate_count).sum()
    }

    /// Space that removing the redundant copies would free.
    #[must_use]
    pub fn reclaimable_space(&self) -> u64 {
        self.groups.iter().map(DuplicateGroup::wasted_space).sum()
    }
}
