//! Duplicate finder: the scan pipeline.
//!
//! # Overview
//!
//! [`DuplicateFinder`] drives one scan end to end:
//!
//! 1. **Walk**: the controlling thread walks the tree and inserts every
//!    regular file into [`SizeGroups`].
//! 2. **Hash**: as soon as a size is shared by two files, both are handed
//!    to a bounded rayon pool; every later file of that size is handed over
//!    on arrival. Hashing overlaps with the rest of the walk.
//! 3. **Group**: workers insert each digest into [`HashGroups`]. When the
//!    pool scope ends every task has finished, and the digest map is turned
//!    into a [`DuplicateReport`].
//!
//! All shared state lives in a [`ScanContext`] owned by the call, so two
//! scans never see each other's files.
//!
//! # Example
//!
//! ```no_run
//! use fdup::duplicates::{DuplicateFinder, FinderConfig};
//! use fdup::scanner::Algorithm;
//! use std::path::Path;
//!
//! let config = FinderConfig::default().with_algorithm(Algorithm::Sha256);
//! let finder = DuplicateFinder::new(config);
//! let (report, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! println!("{} groups, {} files hashed", report.len(), summary.hashed_files);
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::{DuplicateReport, HashGroups, SizeGroups};
use crate::progress::ProgressCallback;
use crate::scanner::{
    Algorithm, FileRef, HashError, Hasher, ScanError, Walker, WalkerConfig, DEFAULT_BUFFER_SIZE,
};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Worker threads used for hashing.
    pub threads: usize,
    /// Digest algorithm.
    pub algorithm: Algorithm,
    /// Read buffer size per hashing task.
    pub buffer_size: usize,
    /// Traversal options.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("threads", &self.threads)
            .field("algorithm", &self.algorithm)
            .field("buffer_size", &self.buffer_size)
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            algorithm: Algorithm::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            walker_config: WalkerConfig::default(),
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

/// Available parallelism, or 4 when it cannot be determined.
#[must_use]
pub fn default_threads() -> usize {
    std::thread::available_parallelism().map_or(4, std::num::NonZeroUsize::get)
}

impl FinderConfig {
    /// Set the number of hashing threads (at least 1).
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Set the digest algorithm.
    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set the per-task read buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Descend into subdirectories.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.walker_config.recursive = recursive;
        self
    }

    /// Follow symbolic links while walking.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.walker_config.follow_symlinks = follow;
        self
    }

    /// Replace the whole walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics from a completed scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Regular files discovered by the walk
    pub total_files: usize,
    /// Combined size of all discovered files in bytes
    pub total_size: u64,
    /// Files never hashed because their size was unique
    pub eliminated_by_size: usize,
    /// Files admitted for hashing
    pub hash_candidates: usize,
    /// Files hashed successfully
    pub hashed_files: usize,
    /// Files that could not be read for hashing
    pub failed_files: usize,
    /// Bytes read by hashing tasks
    pub bytes_hashed: u64,
    /// Duplicate groups in the report
    pub duplicate_groups: usize,
    /// Redundant copies (excluding one original per group)
    pub duplicate_files: usize,
    /// Files participating in any group
    pub total_duplicates: usize,
    /// Space that removing the redundant copies would free
    pub reclaimable_space: u64,
    /// Wall time of the scan
    pub scan_duration: Duration,
    /// Errors hit while walking
    pub scan_errors: Vec<ScanError>,
    /// Errors hit while hashing
    pub hash_errors: Vec<HashError>,
}

impl ScanSummary {
    /// Whether any non-fatal error occurred.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.scan_errors.is_empty() || !self.hash_errors.is_empty()
    }
}

/// Errors that abort a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root could not be inspected.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The hashing pool could not be started.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Per-scan shared state.
///
/// Borrowed by every hashing task for the lifetime of the pool scope.
pub struct ScanContext {
    sizes: SizeGroups,
    hashes: HashGroups,
    hasher: Hasher,
    scheduled: AtomicUsize,
    completed: AtomicUsize,
    hashed: AtomicUsize,
    failed: AtomicUsize,
    bytes_hashed: AtomicU64,
    hash_errors: Mutex<Vec<HashError>>,
    shutdown_flag: Option<Arc<AtomicBool>>,
    progress: Option<Arc<dyn ProgressCallback>>,
}

impl ScanContext {
    fn new(config: &FinderConfig) -> Self {
        Self {
            sizes: SizeGroups::new(),
            hashes: HashGroups::new(),
            hasher: Hasher::new(config.algorithm).with_buffer_size(config.buffer_size),
            scheduled: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            hashed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            bytes_hashed: AtomicU64::new(0),
            hash_errors: Mutex::new(Vec::new()),
            shutdown_flag: config.shutdown_flag.clone(),
            progress: config.progress_callback.clone(),
        }
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    /// Record newly admitted candidates and return the running total.
    fn schedule(&self, count: usize) -> usize {
        let total = self.scheduled.fetch_add(count, Ordering::SeqCst) + count;
        if let Some(ref callback) = self.progress {
            callback.on_total_update(total);
        }
        total
    }

    /// Hash one candidate and file it under its digest.
    fn hash_candidate(&self, file: Arc<FileRef>) {
        if self.is_shutdown_requested() {
            return;
        }

        match self.hasher.hash_file(&file.path) {
            Ok(digest) => {
                log::trace!("{} -> {}", file.path.display(), digest);
                self.hashed.fetch_add(1, Ordering::SeqCst);
                self.bytes_hashed.fetch_add(file.size, Ordering::Relaxed);
                if let Some(ref callback) = self.progress {
                    callback.on_file_hashed(&file.path, &digest.to_hex());
                }
                self.hashes.insert(digest, Arc::clone(&file));
            }
            Err(e) => {
                log::warn!("Failed to hash {}: {}", file.path.display(), e);
                self.failed.fetch_add(1, Ordering::SeqCst);
                let mut errors = match self.hash_errors.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                errors.push(e);
            }
        }

        let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(ref callback) = self.progress {
            callback.on_progress(done, &file.path.to_string_lossy());
        }
    }

    fn into_parts(self) -> (HashGroups, Vec<HashError>) {
        let errors = match self.hash_errors.into_inner() {
            Ok(errors) => errors,
            Err(poisoned) => poisoned.into_inner(),
        };
        (self.hashes, errors)
    }
}

/// Duplicate finder that orchestrates the scan pipeline.
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files under `path`.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if:
    /// - The path does not exist
    /// - The path is not a directory
    /// - The worker pool cannot be started
    /// - The scan is interrupted by shutdown signal
    ///
    /// Unreadable directories and files do not fail the scan; they are
    /// listed in [`ScanSummary::scan_errors`] and [`ScanSummary::hash_errors`].
    ///
    /// # Example
    ///
    /// ```no_run
    /// use fdup::duplicates::DuplicateFinder;
    /// use std::path::Path;
    ///
    /// let finder = DuplicateFinder::with_defaults();
    /// match finder.find_duplicates(Path::new(".")) {
    ///     Ok((report, summary)) => {
    ///         println!("Found {} duplicate groups", report.len());
    ///         println!("Can reclaim {} bytes", summary.reclaimable_space);
    ///     }
    ///     Err(e) => eprintln!("Scan failed: {}", e),
    /// }
    /// ```
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(DuplicateReport, ScanSummary), FinderError> {
        let root = validate_root(path)?;
        log::info!("Starting duplicate scan of {}", root.display());

        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }

        let mut walker = Walker::new(&root, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(Arc::clone(flag));
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_message(&format!("Searching {}", root.display()));
        }

        self.run_pipeline(walker.walk())
    }

    /// Find duplicates among an already collected file list.
    ///
    /// Runs the same grouping and hashing as [`Self::find_duplicates`]
    /// without walking. Entries whose file has since disappeared end up in
    /// [`ScanSummary::hash_errors`].
    ///
    /// # Errors
    ///
    /// Returns `FinderError::Interrupted` on shutdown and
    /// `FinderError::ThreadPool` if the pool cannot be started.
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileRef>,
    ) -> Result<(DuplicateReport, ScanSummary), FinderError> {
        if self.config.is_shutdown_requested() {
            return Err(FinderError::Interrupted);
        }
        self.run_pipeline(files.into_iter().map(Ok))
    }

    fn run_pipeline<I>(&self, entries: I) -> Result<(DuplicateReport, ScanSummary), FinderError>
    where
        I: Iterator<Item = Result<FileRef, ScanError>>,
    {
        let start_time = Instant::now();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads.max(1))
            .thread_name(|i| format!("fdup-hash-{i}"))
            .build()?;

        let ctx = ScanContext::new(&self.config);
        let mut summary = ScanSummary::default();
        let callback = self.config.progress_callback.clone();

        if let Some(ref cb) = callback {
            cb.on_phase_start("walking", 0);
            cb.on_phase_start("hashing", 0);
        }

        let shared = &ctx;
        pool.in_place_scope(|scope| {
            for entry in entries {
                match entry {
                    Ok(file) => {
                        summary.total_files += 1;
                        summary.total_size += file.size;
                        if let Some(ref cb) = callback {
                            cb.on_file_found(summary.total_files);
                        }

                        let admission = shared.sizes.insert(Arc::new(file));
                        if admission.is_empty() {
                            continue;
                        }
                        shared.schedule(admission.len());
                        for candidate in admission {
                            scope.spawn(move |_| shared.hash_candidate(candidate));
                        }
                    }
                    Err(e) => {
                        log::warn!("{}", e);
                        summary.scan_errors.push(e);
                    }
                }
            }

            log::debug!(
                "Walk finished: {} files, {} scheduled for hashing",
                summary.total_files,
                shared.scheduled.load(Ordering::SeqCst)
            );
            if let Some(ref cb) = callback {
                cb.on_phase_end("walking");
            }
        });

        if let Some(ref cb) = callback {
            cb.on_phase_end("hashing");
        }

        if ctx.is_shutdown_requested() {
            log::info!("Scan interrupted");
            return Err(FinderError::Interrupted);
        }

        let grouping = ctx.sizes.stats();
        summary.eliminated_by_size = grouping.eliminated_unique;
        summary.hash_candidates = ctx.scheduled.load(Ordering::SeqCst);
        summary.hashed_files = ctx.hashed.load(Ordering::SeqCst);
        summary.failed_files = ctx.failed.load(Ordering::SeqCst);
        summary.bytes_hashed = ctx.bytes_hashed.load(Ordering::SeqCst);

        let algorithm = self.config.algorithm;
        let (hashes, hash_errors) = ctx.into_parts();
        summary.hash_errors = hash_errors;

        let report = DuplicateReport::from_hash_groups(hashes.into_inner(), algorithm);
        summary.duplicate_groups = report.len();
        summary.duplicate_files = report.duplicate_files();
        summary.total_duplicates = report.total_duplicates;
        summary.reclaimable_space = report.reclaimable_space();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} files, {} hashed, {} duplicate groups in {:.2?}",
            summary.total_files,
            summary.hashed_files,
            summary.duplicate_groups,
            summary.scan_duration
        );

        Ok((report, summary))
    }
}

/// Check the root and make it absolute.
fn validate_root(path: &Path) -> Result<PathBuf, FinderError> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(FinderError::PathNotFound(path.to_path_buf()));
        }
        Err(source) => {
            return Err(FinderError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if !metadata.is_dir() {
        return Err(FinderError::NotADirectory(path.to_path_buf()));
    }
    std::path::absolute(path).map_err(|source| FinderError::Io {
        path: path.to_path_buf(),
        source,
    })
}
