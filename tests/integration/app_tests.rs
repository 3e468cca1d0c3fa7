use super::support::isolated;
use clap::Parser;
use fdup::cli::Cli;
use fdup::error::ExitCode;
use std::fs;
use tempfile::tempdir;

fn run(args: &[&str]) -> anyhow::Result<ExitCode> {
    isolated(|config| {
        let config = config.to_str().unwrap();
        let mut argv = vec!["fdup", "--quiet", "--no-color", "--config", config];
        argv.extend_from_slice(args);
        fdup::run_app(Cli::try_parse_from(argv).unwrap())
    })
}

#[test]
fn test_exit_code_success_with_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"hello").unwrap();
    fs::write(dir.path().join("b"), b"hello").unwrap();
    fs::write(dir.path().join("c"), b"world").unwrap();

    let code = run(&[dir.path().to_str().unwrap()]).unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_exit_code_no_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("unique"), b"unique").unwrap();

    let code = run(&[dir.path().to_str().unwrap(), "--output", "json"]).unwrap();
    assert_eq!(code, ExitCode::NoDuplicates);
}

#[test]
fn test_recursive_flag_finds_nested_duplicates() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("a"), b"nested").unwrap();
    fs::write(dir.path().join("sub").join("b"), b"nested").unwrap();

    let path = dir.path().to_str().unwrap();
    assert_eq!(run(&[path]).unwrap(), ExitCode::NoDuplicates);
    assert_eq!(run(&[path, "-r", "-a", "md5"]).unwrap(), ExitCode::Success);
}

#[test]
fn test_missing_root_is_an_error() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");

    let err = run(&[missing.to_str().unwrap()]).unwrap_err();
    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    assert!(err.to_string().contains("Path not found"));
}

#[test]
fn test_alglist() {
    let code = run(&["alglist"]).unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_alglist_after_global_flags() {
    let code = isolated(|_| {
        fdup::run_app(Cli::try_parse_from(["fdup", "-q", "--no-color", "alglist"]).unwrap())
    })
    .unwrap();
    assert_eq!(code, ExitCode::Success);
}

#[cfg(unix)]
#[test]
fn test_read_errors_do_not_change_exit_code() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"dup").unwrap();
    fs::write(dir.path().join("b"), b"dup").unwrap();
    fs::write(dir.path().join("c"), b"one").unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    let found = run(&[dir.path().to_str().unwrap(), "-r"]);
    fs::remove_file(dir.path().join("b")).unwrap();
    let none = run(&[dir.path().to_str().unwrap(), "-r", "--output", "json"]);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(found.unwrap(), ExitCode::Success);
    assert_eq!(none.unwrap(), ExitCode::NoDuplicates);
}

#[cfg(unix)]
#[test]
fn test_symlink_loop_still_succeeds() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"hello").unwrap();
    fs::write(dir.path().join("b.txt"), b"hello").unwrap();
    fs::write(dir.path().join("c.txt"), b"world").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    std::os::unix::fs::symlink(dir.path(), dir.path().join("sub").join("loop")).unwrap();

    let code = run(&[dir.path().to_str().unwrap(), "-r", "--follow-symlinks"]).unwrap();
    assert_eq!(code, ExitCode::Success);
}
