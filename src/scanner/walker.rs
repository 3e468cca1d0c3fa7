//! Directory walker built on walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and yielding every regular file as a [`FileRef`]. walkdir keeps an
//! explicit stack of open directory handles, so deep trees never grow the
//! call stack.
//!
//! # Features
//!
//! - Recursive or top-level-only traversal
//! - Optional symlink following (walkdir detects cycles)
//! - Per-entry errors are yielded as [`ScanError`] values and the walk
//!   continues with the remaining entries
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use fdup::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let config = WalkerConfig {
//!     recursive: true,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), config);
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::WalkDir;

use super::{FileRef, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// The root is not checked here; the caller validates it before walking.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// Once the flag is `true` the iterator ends at the next entry.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Walk the directory tree, yielding file entries.
    ///
    /// The iterator is lazy and its order is unspecified. Directories,
    /// sockets, devices and (unless following links) symlinks are skipped.
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRef, ScanError>> + '_ {
        let max_depth = if self.config.recursive { usize::MAX } else { 1 };

        WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(self.config.follow_symlinks)
            .into_iter()
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                    false
                } else {
                    true
                }
            })
            .filter_map(move |entry| match entry {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    if file_type.is_dir() {
                        log::debug!("Searching {}", entry.path().display());
                        return None;
                    }
                    if !file_type.is_file() {
                        log::trace!("Skipping non-regular file: {}", entry.path().display());
                        return None;
                    }
                    match entry.metadata() {
                        Ok(metadata) => Some(Ok(FileRef::new(entry.into_path(), metadata.len()))),
                        Err(e) => Some(Err(self.convert_error(e))),
                    }
                }
                Err(e) => Some(Err(self.convert_error(e))),
            })
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn convert_error(&self, err: walkdir::Error) -> ScanError {
        let path = err
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if err.loop_ancestor().is_some() {
            return ScanError::Io {
                path,
                source: Arc::new(io::Error::other("symlink loop detected")),
            };
        }

        match err.io_error().map(io::Error::kind) {
            Some(io::ErrorKind::PermissionDenied) => ScanError::PermissionDenied(path),
            Some(io::ErrorKind::NotFound) => ScanError::NotFound(path),
            _ => ScanError::Io {
                path,
                source: Arc::new(io::Error::from(err)),
            },
        }
    }
}
