//! Ctrl+C handling.
//!
//! A single `Arc<AtomicBool>` is shared by the walker, every hashing task
//! and the application loop. Ctrl+C sets it; the walk stops at the next
//! entry, queued hashing tasks return without reading, and the finder
//! reports [`crate::duplicates::FinderError::Interrupted`]. The process then
//! exits with [`crate::error::ExitCode::Interrupted`].
//!
//! ```rust,no_run
//! use fdup::duplicates::FinderConfig;
//! use fdup::signal::install_handler;
//!
//! let handler = install_handler().unwrap();
//! let config = FinderConfig::default().with_shutdown_flag(handler.flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Shared shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// A handler with no shutdown requested and no signal hook.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether Ctrl+C was pressed or [`Self::request_shutdown`] called.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Raise the flag by hand.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clear the flag.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// The flag itself, for [`crate::duplicates::FinderConfig::with_shutdown_flag`].
    #[must_use]
    pub fn flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: Mutex<Option<ShutdownHandler>> = Mutex::new(None);

/// Hook Ctrl+C to a process-wide [`ShutdownHandler`].
///
/// The hook is registered once per process. Later calls get the same
/// handler back with its flag cleared, so the app can be run repeatedly
/// inside one test binary.
///
/// # Errors
///
/// Returns [`SignalError::InstallFailed`] if the OS refuses the hook.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    let mut slot = GLOBAL_HANDLER
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(handler) = slot.as_ref() {
        handler.reset();
        return Ok(handler.clone());
    }

    let handler = ShutdownHandler::new();
    let flag = handler.flag();

    let hooked = registered(ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "\nInterrupted. Stopping scan...");
        let _ = stderr.flush();
        log::info!("Shutdown signal received");
    }))?;
    log::debug!("Ctrl+C handler installed: {}", hooked);

    *slot = Some(handler.clone());
    Ok(handler)
}

/// Whether `set_handler` wired Ctrl+C to our flag.
///
/// A hook owned by other code is not fatal, but the scan can then only be
/// stopped through [`ShutdownHandler::request_shutdown`].
fn registered(result: Result<(), ctrlc::Error>) -> Result<bool, SignalError> {
    match result {
        Ok(()) => Ok(true),
        Err(ctrlc::Error::MultipleHandlers) => {
            log::warn!("A Ctrl+C handler is already registered; Ctrl+C will not stop the scan");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
