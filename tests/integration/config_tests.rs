use super::support::isolated;
use clap::Parser;
use fdup::cli::Cli;
use fdup::config::{ConfigError, Settings};
use fdup::error::ExitCode;
use fdup::output::OutputFormat;
use fdup::scanner::Algorithm;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_file_enables_recursion() {
    let dir = tempdir().unwrap();
    let tree = dir.path().join("tree");
    fs::create_dir_all(tree.join("sub")).unwrap();
    fs::write(tree.join("a"), b"deep").unwrap();
    fs::write(tree.join("sub").join("b"), b"deep").unwrap();

    let config = dir.path().join("fdup.toml");
    fs::write(&config, "recursive = true\noutput = \"json\"\n").unwrap();

    let cli = Cli::try_parse_from([
        "fdup",
        "--quiet",
        "--config",
        config.to_str().unwrap(),
        tree.to_str().unwrap(),
    ])
    .unwrap();

    let code = isolated(|_| fdup::run_app(cli)).unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_cli_flags_override_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("fdup.toml");
    fs::write(&config, "algorithm = \"md5\"\noutput = \"json\"\n").unwrap();

    let cli = Cli::try_parse_from([
        "fdup",
        "--config",
        config.to_str().unwrap(),
        "-a",
        "blake3",
        "-vv",
    ])
    .unwrap();
    let settings = isolated(|_| Settings::from_cli(&cli)).unwrap();

    assert_eq!(settings.algorithm, Algorithm::Blake3);
    assert_eq!(settings.output, OutputFormat::Json);
    assert_eq!(settings.verbose, 2);
}

#[test]
fn test_empty_config_keeps_defaults() {
    let settings = isolated(|config| Settings::load(Some(config))).unwrap();

    assert!(!settings.recursive);
    assert_eq!(settings.algorithm, Algorithm::Sha512);
    assert_eq!(settings.output, OutputFormat::Text);
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = tempdir().unwrap();
    let cli = Cli::try_parse_from([
        "fdup",
        "--quiet",
        "--config",
        dir.path().join("nope.toml").to_str().unwrap(),
        dir.path().to_str().unwrap(),
    ])
    .unwrap();

    let err = isolated(|_| fdup::run_app(cli)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::NotFound(_))
    ));
}

#[test]
fn test_malformed_config_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("fdup.toml");
    fs::write(&config, "invalid = toml").unwrap();

    let err = isolated(|_| Settings::load(Some(&config))).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}
