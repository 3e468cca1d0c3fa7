//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements [`ProgressCallback`]
//! to display a walking spinner and a hashing bar on stderr.
//!
//! Callbacks arrive from the walking thread and from every hashing worker
//! at once. Implementations must be cheap, must never panic and must never
//! block for long: a slow callback stalls the scan.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress callback for duplicate finding phases.
///
/// Implement this trait to receive progress updates during
/// the duplicate detection pipeline.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase ("walking" or "hashing")
    /// * `total` - Items known so far (hashing grows while the walk runs)
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for every regular file the walk discovers.
    fn on_file_found(&self, _found: usize) {}

    /// Called when more files are scheduled for hashing.
    fn on_total_update(&self, _total: usize) {}

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Number of items completed so far (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called once a file's digest is known.
    fn on_file_hashed(&self, _path: &Path, _digest_hex: &str) {}

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Progress reporter using indicatif.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    hashing: Mutex<Option<ProgressBar>>,
    quiet: bool,
    echo_digests: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars or messages will be displayed.
    ///   Digest echo is controlled separately by [`Progress::with_digest_echo`].
    ///
    /// # Examples
    ///
    /// ```
    /// use fdup::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        let multi = if quiet {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        } else {
            MultiProgress::new()
        };
        Self {
            multi,
            walking: Mutex::new(None),
            hashing: Mutex::new(None),
            quiet,
            echo_digests: false,
        }
    }

    /// Print `path -> DIGEST` for every hashed file.
    #[must_use]
    pub fn with_digest_echo(mut self, enabled: bool) -> Self {
        self.echo_digests = enabled;
        self
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.green/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    /// Run `f` on a bar slot, ignoring a poisoned lock.
    fn with_bar(slot: &Mutex<Option<ProgressBar>>, f: impl FnOnce(&mut Option<ProgressBar>)) {
        let mut guard = match slot.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut guard);
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        match phase {
            "walking" => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::walking_style());
                pb.set_message("Searching");
                pb.enable_steady_tick(Duration::from_millis(100));
                Self::with_bar(&self.walking, |slot| *slot = Some(pb));
            }
            "hashing" => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::hashing_style());
                pb.set_message("Hashing");
                Self::with_bar(&self.hashing, |slot| *slot = Some(pb));
            }
            _ => {}
        }
    }

    fn on_file_found(&self, found: usize) {
        Self::with_bar(&self.walking, |slot| {
            if let Some(pb) = slot {
                pb.set_position(found as u64);
            }
        });
    }

    fn on_total_update(&self, total: usize) {
        Self::with_bar(&self.hashing, |slot| {
            if let Some(pb) = slot {
                pb.set_length(total as u64);
            }
        });
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        let msg = truncate_path(path, 30);
        Self::with_bar(&self.hashing, |slot| {
            if let Some(pb) = slot {
                pb.set_position(current as u64);
                pb.set_message(msg);
            }
        });
    }

    fn on_file_hashed(&self, path: &Path, digest_hex: &str) {
        if !self.echo_digests {
            return;
        }
        let line = format!("{} ->\n    {}", path.display(), digest_hex);
        // A hidden MultiProgress swallows println.
        if self.multi.is_hidden() {
            eprintln!("{line}");
        } else {
            let _ = self.multi.println(line);
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        match phase {
            "walking" => Self::with_bar(&self.walking, |slot| {
                if let Some(pb) = slot.take() {
                    pb.finish_with_message("Search complete");
                }
            }),
            "hashing" => Self::with_bar(&self.hashing, |slot| {
                if let Some(pb) = slot.take() {
                    pb.finish_and_clear();
                }
            }),
            _ => {}
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }
        let _ = self.multi.println(message);
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len >= max_len {
        let tail: String = file_name.chars().skip(name_len + 3 - max_len).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
