use fdup::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use fdup::scanner::{FileRef, HashError};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_file_deleted_after_discovery() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    let c = dir.path().join("c");
    fs::write(&a, b"same").unwrap();
    fs::write(&b, b"same").unwrap();
    fs::write(&c, b"same").unwrap();

    // Discovered with its size, then removed before hashing.
    let files = vec![
        FileRef::new(a.clone(), 4),
        FileRef::new(b.clone(), 4),
        FileRef::new(c.clone(), 4),
    ];
    fs::remove_file(&c).unwrap();

    let (report, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_from_files(files)
        .unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report.groups[0].files, vec![a, b]);
    assert_eq!(summary.failed_files, 1);
    assert!(matches!(&summary.hash_errors[0], HashError::NotFound(p) if *p == c));
}

#[test]
fn test_lone_survivor_is_not_a_group() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::write(&a, b"pair").unwrap();
    fs::write(&b, b"pair").unwrap();

    let files = vec![FileRef::new(a, 4), FileRef::new(b.clone(), 4)];
    fs::remove_file(&b).unwrap();

    let (report, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_from_files(files)
        .unwrap();

    assert!(report.is_empty());
    assert_eq!(report.total_duplicates, 0);
    assert_eq!(summary.hash_candidates, 2);
    assert_eq!(summary.hashed_files, 1);
    assert_eq!(summary.failed_files, 1);
    assert!(matches!(&summary.hash_errors[0], HashError::NotFound(p) if *p == b));
}

#[test]
fn test_all_candidates_missing() {
    let files = vec![
        FileRef::new(PathBuf::from("nonexistent_1.txt"), 100),
        FileRef::new(PathBuf::from("nonexistent_2.txt"), 100),
    ];

    let (report, summary) = DuplicateFinder::with_defaults()
        .find_duplicates_from_files(files)
        .unwrap();

    assert!(report.is_empty());
    assert_eq!(summary.hashed_files, 0);
    assert_eq!(summary.failed_files, 2);
    assert!(summary.has_errors());
}

#[test]
fn test_shutdown_flag_interrupts() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"x").unwrap();

    let flag = Arc::new(AtomicBool::new(true));
    let finder = DuplicateFinder::new(FinderConfig::default().with_shutdown_flag(flag));

    assert!(matches!(
        finder.find_duplicates(dir.path()),
        Err(FinderError::Interrupted)
    ));
}

#[cfg(unix)]
fn running_as_root(probe: &std::path::Path) -> bool {
    fs::read_dir(probe).is_ok()
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_continues() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"dup").unwrap();
    fs::write(dir.path().join("b"), b"dup").unwrap();
    let locked = dir.path().join("locked");
    fs::create_dir(&locked).unwrap();
    fs::write(locked.join("hidden"), b"dup").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    if running_as_root(&locked) {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let finder = DuplicateFinder::new(FinderConfig::default().with_recursive(true));
    let result = finder.find_duplicates(dir.path());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let (report, summary) = result.unwrap();
    assert_eq!(report.len(), 1);
    assert_eq!(report.total_duplicates, 2);
    assert_eq!(summary.scan_errors.len(), 1);
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_is_excluded() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"dup").unwrap();
    fs::write(dir.path().join("b"), b"dup").unwrap();
    let secret = dir.path().join("secret");
    fs::write(&secret, b"dup").unwrap();
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();

    if fs::read(&secret).is_ok() {
        // Root ignores permission bits.
        return;
    }

    let (report, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(report.len(), 1);
    assert_eq!(report.total_duplicates, 2);
    assert_eq!(summary.failed_files, 1);
    assert!(matches!(&summary.hash_errors[0], HashError::PermissionDenied(_)));
}
