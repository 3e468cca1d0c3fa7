//! fdup - find files with identical content.
//!
//! Files under a root directory are grouped by size; only sizes shared by
//! two or more files are hashed, concurrently on a bounded pool, and files
//! with equal digests are reported together.
//!
//! The library half exposes the pipeline ([`duplicates::DuplicateFinder`])
//! and its building blocks; [`run_app`] is the command-line front end.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use cli::{Cli, Commands};
use config::Settings;
use duplicates::{DuplicateFinder, FinderConfig};
use error::ExitCode;
use output::{JsonOutput, OutputFormat, TextOutput};
use progress::Progress;
use scanner::WalkerConfig;

/// Run the application for parsed arguments.
///
/// The report goes to stdout; logs and progress go to stderr.
///
/// # Errors
///
/// Returns an error for a missing or non-directory root, bad settings,
/// an interrupted scan, or a failure writing the report. The error can be
/// mapped to a process exit code with [`ExitCode::for_error`].
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    let color = !cli.no_color && io::stdout().is_terminal();

    if cli.command == Some(Commands::Alglist) {
        output::write_algorithm_list(&mut io::stdout().lock(), color)?;
        return Ok(ExitCode::Success);
    }

    let settings = Settings::from_cli(&cli).context("Failed to load configuration")?;
    log::debug!("Effective settings: {:?}", settings);

    let root = cli.scan.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let handler = signal::install_handler()?;

    if settings.algorithm.is_legacy() {
        log::warn!(
            "{} is a legacy algorithm: distinct files can be crafted to collide",
            settings.algorithm
        );
    }

    let progress = Progress::new(cli.quiet || settings.output == OutputFormat::Json)
        .with_digest_echo(settings.verbose > 0 && !cli.quiet);

    let mut config = FinderConfig::default()
        .with_algorithm(settings.algorithm)
        .with_buffer_size(settings.buffer_size)
        .with_walker_config(WalkerConfig::new(
            settings.recursive,
            settings.follow_symlinks,
        ))
        .with_shutdown_flag(handler.flag())
        .with_progress_callback(Arc::new(progress));
    if let Some(threads) = settings.threads {
        config = config.with_threads(threads);
    }

    let finder = DuplicateFinder::new(config);
    let (report, summary) = finder.find_duplicates(&root)?;

    let code = ExitCode::for_scan(&report);
    let mut stdout = io::stdout().lock();
    match settings.output {
        OutputFormat::Text => TextOutput::new(&report, &summary)
            .with_color(color)
            .write_to(&mut stdout)
            .context("Failed to write report")?,
        OutputFormat::Json => JsonOutput::new(&report, &summary, code)
            .write_to(&mut stdout, true)
            .context("Failed to write report")?,
    }

    Ok(code)
}
