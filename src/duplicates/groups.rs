//! Size and hash grouping maps.
//!
//! # Overview
//!
//! Duplicate detection narrows files in two passes:
//!
//! 1. [`SizeGroups`] partitions files by exact byte length. A file whose
//!    length is unique can never have a content-identical twin, so it is
//!    never hashed.
//! 2. [`HashGroups`] partitions hashed files by digest.
//!
//! Both maps are written concurrently (the walker inserts sizes while
//! hashing workers insert digests), so every insertion is a single
//! get-or-create-then-append on a [`DashMap`] entry, performed under that
//! entry's shard lock. There is no read-check-write window in which an
//! update can be lost.
//!
//! # Example
//!
//! ```
//! use fdup::scanner::FileRef;
//! use fdup::duplicates::{group_by_size, GroupingStats};
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileRef::new(PathBuf::from("/file1.txt"), 1024),
//!     FileRef::new(PathBuf::from("/file2.txt"), 1024),
//!     FileRef::new(PathBuf::from("/file3.txt"), 2048),
//! ];
//!
//! let (groups, stats) = group_by_size(files);
//!
//! assert_eq!(stats.total_files, 3);
//! assert_eq!(stats.potential_duplicates, 2);  // Two 1024-byte files
//! assert_eq!(groups.len(), 1);  // Only one size group with multiple files
//! ```

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;

use crate::scanner::{Algorithm, Digest, FileRef};

/// Files that became hash candidates as the result of one insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// First file of its size; nothing to hash yet.
    Pending,
    /// The size group just reached two members; both must be hashed.
    Pair(Arc<FileRef>, Arc<FileRef>),
    /// The size group already had candidates; only the new file is added.
    Single(Arc<FileRef>),
}

impl Admission {
    /// Number of newly admitted candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Pending => 0,
            Self::Pair(..) => 2,
            Self::Single(_) => 1,
        }
    }

    /// Whether the insertion admitted nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl IntoIterator for Admission {
    type Item = Arc<FileRef>;
    type IntoIter = std::iter::Flatten<std::array::IntoIter<Option<Arc<FileRef>>, 2>>;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Self::Pending => [None, None],
            Self::Pair(first, second) => [Some(first), Some(second)],
            Self::Single(file) => [Some(file), None],
        }
        .into_iter()
        .flatten()
    }
}

/// Concurrent map from byte length to the files of that length.
#[derive(Debug, Default)]
pub struct SizeGroups {
    groups: DashMap<u64, Vec<Arc<FileRef>>>,
}

impl SizeGroups {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file into the group for its size.
    ///
    /// The append and the candidate decision happen under the same entry
    /// lock, so with any number of concurrent callers each file is admitted
    /// exactly once, and only once its size is shared by a second file.
    pub fn insert(&self, file: Arc<FileRef>) -> Admission {
        let mut group = self.groups.entry(file.size).or_default();
        group.push(Arc::clone(&file));
        match group.len() {
            1 => Admission::Pending,
            2 => Admission::Pair(Arc::clone(&group[0]), file),
            _ => Admission::Single(file),
        }
    }

    /// Number of distinct sizes seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no file has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Snapshot statistics about the grouping.
    #[must_use]
    pub fn stats(&self) -> GroupingStats {
        let mut stats = GroupingStats {
            unique_sizes: self.groups.len(),
            ..Default::default()
        };
        for group in self.groups.iter() {
            let count = group.value().len();
            stats.total_files += count;
            stats.total_size += group.key() * count as u64;
            if count > 1 {
                stats.potential_duplicates += count;
                stats.duplicate_groups += 1;
            } else {
                stats.eliminated_unique += count;
            }
        }
        stats
    }

    /// Consume the map, keeping only groups with two or more files.
    #[must_use]
    pub fn into_candidates(self) -> HashMap<u64, Vec<Arc<FileRef>>> {
        self.groups
            .into_iter()
            .filter(|(size, files)| {
                if files.len() > 1 {
                    true
                } else {
                    log::trace!("Eliminated unique size {}: {}", size, files[0].path.display());
                    false
                }
            })
            .collect()
    }
}

/// Concurrent map from content digest to the files with that digest.
#[derive(Debug, Default)]
pub struct HashGroups {
    groups: DashMap<Digest, Vec<Arc<FileRef>>>,
}

impl HashGroups {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hashed file to the group for its digest.
    pub fn insert(&self, digest: Digest, file: Arc<FileRef>) {
        self.groups.entry(digest).or_default().push(file);
    }

    /// Number of distinct digests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no file has been hashed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Consume the map once all writers are done.
    #[must_use]
    pub fn into_inner(self) -> HashMap<Digest, Vec<Arc<FileRef>>> {
        self.groups.into_iter().collect()
    }
}

/// Statistics from size grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of unique file sizes
    pub unique_sizes: usize,
    /// Number of files that could be duplicates (in groups of 2+)
    pub potential_duplicates: usize,
    /// Number of files eliminated as unique (singleton groups)
    pub eliminated_unique: usize,
    /// Number of size groups with 2+ files
    pub duplicate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by size grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Group files by size, dropping sizes held by a single file.
///
/// A synchronous convenience over [`SizeGroups`] for callers that already
/// have the full file list.
///
/// # Example
///
/// ```
/// use fdup::scanner::FileRef;
/// use fdup::duplicates::group_by_size;
/// use std::path::PathBuf;
///
/// let files = vec![
///     FileRef::new(PathBuf::from("/a.txt"), 100),
///     FileRef::new(PathBuf::from("/b.txt"), 100),
///     FileRef::new(PathBuf::from("/c.txt"), 200),
/// ];
///
/// let (groups, stats) = group_by_size(files);
///
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[&100].len(), 2);
/// assert_eq!(stats.eliminated_unique, 1);  // The 200-byte file
/// ```
#[must_use]
pub fn group_by_size(
    files: impl IntoIterator<Item = FileRef>,
) -> (HashMap<u64, Vec<Arc<FileRef>>>, GroupingStats) {
    let groups = SizeGroups::new();
    for file in files {
        groups.insert(Arc::new(file));
    }
    let stats = groups.stats();
    (groups.into_candidates(), stats)
}

/// A set of two or more files with identical content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Content digest shared by every member
    pub digest: Digest,
    /// Algorithm that produced the digest
    pub algorithm: Algorithm,
    /// File size in bytes (shared by every member)
    pub size: u64,
    /// Member paths, sorted
    pub files: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group. Paths are sorted for stable output.
    #[must_use]
    pub fn new(digest: Digest, algorithm: Algorithm, size: u64, mut files: Vec<PathBuf>) -> Self {
        files.sort();
        Self {
            digest,
            algorithm,
            size,
            files,
        }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Digest as uppercase hexadecimal.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        self.digest.to_hex()
    }

    /// Number of redundant copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Space taken by the redundant copies.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }
}
