//! Layered settings.
//!
//! Values are merged, lowest priority first, from:
//!
//! 1. built-in defaults
//! 2. a TOML file: `--config FILE`, or `config.toml` in the platform config
//!    directory (`~/.config/fdup/config.toml` on Linux) when present
//! 3. `FDUP_*` environment variables (`FDUP_ALGORITHM=sha256`)
//! 4. command-line flags
//!
//! ```toml
//! recursive = true
//! algorithm = "blake3"
//! threads = 4
//! buffer_size = 65536
//! output = "json"
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, ScanArgs};
use crate::output::OutputFormat;
use crate::scanner::{Algorithm, DEFAULT_BUFFER_SIZE};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "FDUP_";

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Digest algorithm.
    pub algorithm: Algorithm,
    /// Verbosity (1 echoes each digest).
    pub verbose: u8,
    /// Hashing threads; `None` uses available parallelism.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    /// Read buffer per hashing thread in bytes.
    pub buffer_size: usize,
    /// Follow symbolic links.
    pub follow_symlinks: bool,
    /// Report format.
    pub output: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recursive: false,
            algorithm: Algorithm::default(),
            verbose: 0,
            threads: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            follow_symlinks: false,
            output: OutputFormat::default(),
        }
    }
}

/// Errors raised while loading settings.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// `--config` named a file that does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A source held a malformed or mistyped value.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

impl Settings {
    /// Load file and environment layers.
    ///
    /// `explicit` replaces the default file location and must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit file is missing or any layer
    /// fails to parse.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match explicit {
            Some(path) if !path.is_file() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path(),
        };
        Self::figment(file.as_deref())
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    /// The merged provider chain, without CLI flags.
    #[must_use]
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        if let Some(path) = file {
            log::debug!("Reading settings from {}", path.display());
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load every layer, finishing with the parsed command line.
    ///
    /// # Errors
    ///
    /// See [`Settings::load`].
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut settings = Self::load(cli.config.as_deref())?;
        settings.apply_args(&cli.scan, cli.verbose);
        Ok(settings)
    }

    /// Overlay flags the user actually passed.
    pub fn apply_args(&mut self, args: &ScanArgs, verbose: u8) {
        if args.recursive {
            self.recursive = true;
        }
        if let Some(algorithm) = args.algorithm {
            self.algorithm = algorithm;
        }
        if verbose > 0 {
            self.verbose = verbose;
        }
        if let Some(threads) = args.threads {
            self.threads = Some(threads);
        }
        if let Some(size) = args.buffer_size {
            self.buffer_size = usize::try_from(size).unwrap_or(usize::MAX);
        }
        if args.follow_symlinks {
            self.follow_symlinks = true;
        }
        if let Some(output) = args.output {
            self.output = output;
        }
    }
}

/// `config.toml` in the platform config directory, if it exists.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "fdup")?;
    let path = dirs.config_dir().join("config.toml");
    path.is_file().then_some(path)
}
