use fdup::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use fdup::scanner::{Algorithm, FileRef, Hasher};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn names(paths: &[PathBuf]) -> BTreeSet<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_scan_hello_world() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"hello");
    write(dir.path(), "b", b"hello");
    write(dir.path(), "c", b"world");

    let finder = DuplicateFinder::with_defaults();
    let (report, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report.total_duplicates, 2);
    assert_eq!(names(&report.groups[0].files), BTreeSet::from(["a".into(), "b".into()]));
    assert_eq!(report.groups[0].algorithm, Algorithm::Sha512);
    assert_eq!(report.groups[0].digest.len(), 64);
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.hashed_files, 3);
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let (report, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(report.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.hashed_files, 0);
}

#[test]
fn test_scan_missing_root() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");

    match DuplicateFinder::with_defaults().find_duplicates(&missing) {
        Err(FinderError::PathNotFound(path)) => assert_eq!(path, missing),
        other => panic!("Expected PathNotFound, got {other:?}"),
    }
}

#[test]
fn test_non_recursive_ignores_subdirectories() {
    let dir = tempdir().unwrap();
    write(dir.path(), "top", b"same bytes");
    write(dir.path(), "sub/nested", b"same bytes");

    let flat = DuplicateFinder::new(FinderConfig::default());
    let (report, summary) = flat.find_duplicates(dir.path()).unwrap();
    assert!(report.is_empty());
    assert_eq!(summary.total_files, 1);

    let deep = DuplicateFinder::new(FinderConfig::default().with_recursive(true));
    let (report, summary) = deep.find_duplicates(dir.path()).unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(summary.total_files, 2);
}

#[test]
fn test_empty_files_are_duplicates_of_each_other() {
    let dir = tempdir().unwrap();
    write(dir.path(), "empty1", b"");
    write(dir.path(), "empty2", b"");
    write(dir.path(), "full", b"x");

    let (report, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report.groups[0].size, 0);
    assert_eq!(
        names(&report.groups[0].files),
        BTreeSet::from(["empty1".into(), "empty2".into()])
    );
}

#[test]
fn test_only_shared_sizes_are_hashed() {
    let dir = tempdir().unwrap();
    write(dir.path(), "s1", b"1");
    write(dir.path(), "s2a", b"22");
    write(dir.path(), "s2b", b"33");
    write(dir.path(), "s3a", b"444");
    write(dir.path(), "s3b", b"444");
    write(dir.path(), "s3c", b"555");

    let (report, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(summary.eliminated_by_size, 1);
    assert_eq!(summary.hash_candidates, 5);
    assert_eq!(summary.hashed_files, 5);
    assert_eq!(report.len(), 1);
    assert_eq!(report.total_duplicates, 2);
}

#[test]
fn test_every_algorithm_groups_the_same() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"alpha");
    write(dir.path(), "b", b"alpha");
    write(dir.path(), "c", b"gamma");
    write(dir.path(), "d", b"gamma");
    write(dir.path(), "e", b"delta");

    for algorithm in Algorithm::ALL {
        let finder = DuplicateFinder::new(FinderConfig::default().with_algorithm(algorithm));
        let (report, _) = finder.find_duplicates(dir.path()).unwrap();

        assert_eq!(report.len(), 2, "{algorithm}");
        assert_eq!(report.total_duplicates, 4, "{algorithm}");
        for group in &report.groups {
            assert_eq!(group.digest.len(), algorithm.digest_len());
            assert_eq!(group.algorithm, algorithm);
        }
    }
}

#[test]
fn test_group_digest_matches_direct_hash() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a", b"hash me");
    write(dir.path(), "b", b"hash me");

    let finder = DuplicateFinder::new(FinderConfig::default().with_algorithm(Algorithm::Sha256));
    let (report, _) = finder.find_duplicates(dir.path()).unwrap();

    let direct = Hasher::new(Algorithm::Sha256).hash_file(&a).unwrap();
    assert_eq!(report.groups[0].digest, direct);
    assert_eq!(report.groups[0].hash_hex(), direct.to_hex());
}

#[test]
fn test_many_files_many_threads() {
    let dir = tempdir().unwrap();
    for i in 0..200 {
        // Ten distinct contents of equal length.
        let content = format!("content-{:02}", i % 10);
        write(dir.path(), &format!("sub{}/f{i}", i % 7), content.as_bytes());
    }

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_recursive(true)
            .with_threads(8),
    );
    let (report, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 200);
    assert_eq!(summary.hashed_files, 200);
    assert_eq!(report.len(), 10);
    assert!(report.groups.iter().all(|g| g.len() == 20));
    assert_eq!(report.total_duplicates, 200);
}

#[test]
fn test_repeated_scans_are_identical() {
    let dir = tempdir().unwrap();
    for i in 0..30 {
        write(dir.path(), &format!("f{i}"), format!("{}", i % 3).as_bytes());
    }

    let finder = DuplicateFinder::new(FinderConfig::default().with_threads(4));
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_file_list_order_does_not_matter() {
    let dir = tempdir().unwrap();
    let mut files = Vec::new();
    for i in 0..12 {
        let content = format!("{}", i % 4);
        let path = write(dir.path(), &format!("f{i}"), content.as_bytes());
        files.push(FileRef::new(path, content.len() as u64));
    }

    let finder = DuplicateFinder::with_defaults();
    let (forward, _) = finder.find_duplicates_from_files(files.clone()).unwrap();
    files.reverse();
    let (backward, _) = finder.find_duplicates_from_files(files).unwrap();

    assert_eq!(forward, backward);
    assert_eq!(forward.len(), 4);
}

#[cfg(unix)]
#[test]
fn test_symlink_cycle_is_reported_not_fatal() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a", b"loop");
    write(dir.path(), "sub/b", b"loop");
    std::os::unix::fs::symlink(dir.path(), dir.path().join("sub/back")).unwrap();

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_recursive(true)
            .with_follow_symlinks(true),
    );
    let (report, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report.total_duplicates, 2);
    assert!(!summary.scan_errors.is_empty());
}
