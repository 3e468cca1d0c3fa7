//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Directory walking using walkdir
//! - Content hashing with a selectable algorithm
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`algorithm`]: The closed set of digest algorithms
//! - [`hasher`]: Streaming file hashing and the [`Digest`] value type
//!
//! # Example
//!
//! ```no_run
//! use fdup::scanner::{Algorithm, Hasher, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! let hasher = Hasher::new(Algorithm::Sha256);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => {
//!             let digest = hasher.hash_file(&file.path).unwrap();
//!             println!("{} {}", digest, file.path.display());
//!         }
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod algorithm;
pub mod hasher;
pub mod walker;

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

// Re-export main types
pub use algorithm::{Algorithm, MAX_DIGEST_LEN};
pub use hasher::{Digest, DigestParseError, Hasher, DEFAULT_BUFFER_SIZE};
pub use walker::Walker;

/// A discovered regular file.
///
/// Created once during traversal and never modified afterwards; the
/// grouping maps share it through `Arc<FileRef>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileRef {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileRef {
    /// Create a new FileRef.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Descend into subdirectories. When `false`, only files directly
    /// inside the root are reported.
    pub recursive: bool,

    /// Follow symbolic links during traversal.
    /// Symlink cycles are detected and reported as errors.
    pub follow_symlinks: bool,
}

impl WalkerConfig {
    /// Create a new walker configuration.
    #[must_use]
    pub fn new(recursive: bool, follow_symlinks: bool) -> Self {
        Self {
            recursive,
            follow_symlinks,
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The entry disappeared while it was being listed.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file or directory.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<std::io::Error>,
    },
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug, Clone)]
pub enum HashError {
    /// The file was removed after it was discovered.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl HashError {
    /// Path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound(path) | Self::PermissionDenied(path) | Self::Io { path, .. } => path,
        }
    }
}
