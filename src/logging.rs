//! Logging setup for fdup.
//!
//! Diagnostics go through the `log` facade to an `env_logger` backend on
//! stderr; stdout is reserved for the report. The level is chosen by, in
//! priority order:
//!
//! 1. `RUST_LOG`, if set
//! 2. `--quiet` (errors only)
//! 3. `-v` (debug, which also lists every directory searched) or `-vv` (trace)
//! 4. info
//!
//! ```rust,no_run
//! use fdup::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("visible with -v");
//! ```

use std::env;
use std::io::Write;

use env_logger::Builder;
use log::LevelFilter;

/// Install the global logger.
///
/// Only the first call in a process takes effect; later calls are ignored
/// so tests that spin up the app more than once do not panic.
pub fn init_logging(verbose: u8, quiet: bool) {
    let rust_log = env::var("RUST_LOG").ok();

    let mut builder = Builder::new();
    let level = match rust_log {
        Some(_) => {
            builder.parse_default_env();
            None
        }
        None => {
            let level = level_for(verbose, quiet);
            builder.filter_level(level);
            Some(level)
        }
    };

    configure_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        return;
    }

    match level {
        Some(level) => log::debug!("Logging initialized at level: {:?}", level),
        None => log::debug!("Logging initialized from RUST_LOG={:?}", rust_log),
    }
}

/// Map CLI flags to a level filter. Quiet wins over verbose.
fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        let timestamp = buf.timestamp_seconds();
        if verbose > 0 {
            writeln!(
                buf,
                "{timestamp} {style}{level:<5}{style:#} [{}] {}",
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{timestamp} {style}{level:<5}{style:#} {}", record.args())
        }
    });

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let style = buf.default_level_style(level);
            writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
        });
    }
}
