use super::*;
use std::fs;
use tempfile::TempDir;

/// Create a migrations directory holding empty files with the given names.
fn migrations_dir(files: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "-- +migrate up\n-- +migrate down\n").unwrap();
    }
    dir
}

fn versions(batch: &[Migration]) -> Vec<i64> {
    batch.iter().map(|m| m.version).collect()
}

#[test]
fn test_numeric_component_valid() {
    assert_eq!(numeric_component(Path::new("001_init.sql")), Ok(1));
    assert_eq!(
        numeric_component(Path::new("/tmp/m/20240131120000_add_users.sql")),
        Ok(20240131120000)
    );
}

#[test]
fn test_numeric_component_uses_first_underscore() {
    assert_eq!(numeric_component(Path::new("12_a_b_c.sql")), Ok(12));
}

#[test]
fn test_numeric_component_rejects_wrong_extension() {
    assert_eq!(
        numeric_component(Path::new("001_init.txt")),
        Err(FilenameError::WrongExtension)
    );
    assert_eq!(
        numeric_component(Path::new("001_init")),
        Err(FilenameError::WrongExtension)
    );
}

#[test]
fn test_numeric_component_rejects_missing_separator() {
    assert_eq!(
        numeric_component(Path::new("001.sql")),
        Err(FilenameError::MissingSeparator)
    );
}

#[test]
fn test_numeric_component_rejects_non_numeric() {
    assert_eq!(
        numeric_component(Path::new("abc_init.sql")),
        Err(FilenameError::NotNumeric("abc".to_string()))
    );
}

#[test]
fn test_numeric_component_rejects_zero_and_negative() {
    assert_eq!(
        numeric_component(Path::new("0_init.sql")),
        Err(FilenameError::NotPositive(0))
    );
    assert_eq!(
        numeric_component(Path::new("-3_init.sql")),
        Err(FilenameError::NotPositive(-3))
    );
}

#[test]
fn test_collect_forward_is_half_open_ascending() {
    let dir = migrations_dir(&["001_a.sql", "002_b.sql", "003_c.sql", "004_d.sql"]);
    let batch = collect_migrations(dir.path(), 1, 3).unwrap();
    assert_eq!(versions(&batch), vec![2, 3]);
}

#[test]
fn test_collect_reverse_is_half_open_descending() {
    let dir = migrations_dir(&["001_a.sql", "002_b.sql", "003_c.sql", "004_d.sql"]);
    let batch = collect_migrations(dir.path(), 4, 1).unwrap();
    assert_eq!(versions(&batch), vec![4, 3, 2]);
}

#[test]
fn test_collect_equal_versions_is_empty() {
    let dir = migrations_dir(&["001_a.sql", "002_b.sql"]);
    assert!(collect_migrations(dir.path(), 2, 2).unwrap().is_empty());
}

#[test]
fn test_collect_every_interval() {
    let dir = migrations_dir(&["001_a.sql", "002_b.sql", "003_c.sql"]);
    for current in 0..=3 {
        for target in 0..=3 {
            let got = versions(&collect_migrations(dir.path(), current, target).unwrap());
            let expected: Vec<i64> = if target > current {
                ((current + 1)..=target).collect()
            } else if target < current {
                ((target + 1)..=current).rev().collect()
            } else {
                Vec::new()
            };
            assert_eq!(got, expected, "current={current} target={target}");
        }
    }
}

#[test]
fn test_collect_links_neighbours_forward() {
    let dir = migrations_dir(&["001_a.sql", "002_b.sql", "003_c.sql"]);
    let batch = collect_migrations(dir.path(), 0, 3).unwrap();

    assert_eq!(batch[0].previous, NO_VERSION);
    assert_eq!(batch[0].next, 2);
    assert_eq!(batch[1].previous, 1);
    assert_eq!(batch[1].next, 3);
    assert_eq!(batch[2].previous, 2);
    assert_eq!(batch[2].next, NO_VERSION);
}

#[test]
fn test_collect_links_neighbours_reverse() {
    let dir = migrations_dir(&["001_a.sql", "002_b.sql", "003_c.sql"]);
    let batch = collect_migrations(dir.path(), 3, 0).unwrap();

    assert_eq!(versions(&batch), vec![3, 2, 1]);
    assert_eq!(batch[0].previous, NO_VERSION);
    assert_eq!(batch[0].next, 2);
    assert_eq!(batch[2].previous, 2);
    assert_eq!(batch[2].next, NO_VERSION);
}

#[test]
fn test_collect_skips_non_migration_files() {
    let dir = migrations_dir(&["001_init.sql", "abc_init.sql", "README.md", "notes.sql"]);
    let batch = collect_migrations(dir.path(), 0, 10).unwrap();
    assert_eq!(versions(&batch), vec![1]);
    assert_eq!(batch[0].file_name(), "001_init.sql");
}

#[test]
fn test_collect_walks_subdirectories() {
    let dir = migrations_dir(&["001_a.sql", "archive/002_b.sql", "archive/deep/003_c.sql"]);
    let batch = collect_migrations(dir.path(), 0, 3).unwrap();
    assert_eq!(versions(&batch), vec![1, 2, 3]);
    assert!(batch[2].source.ends_with("archive/deep/003_c.sql"));
}

#[test]
fn test_collect_duplicate_version_is_fatal() {
    let dir = migrations_dir(&["001_a.sql", "001_b.sql"]);
    let err = collect_migrations(dir.path(), 0, 5).unwrap_err();
    match err {
        CoreError::DuplicateVersion {
            version,
            first,
            second,
        } => {
            assert_eq!(version, 1);
            assert!(first.ends_with("001_a.sql"));
            assert!(second.ends_with("001_b.sql"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_collect_duplicate_outside_range_is_still_fatal() {
    let dir = migrations_dir(&["001_a.sql", "009_x.sql", "sub/09_y.sql"]);
    let err = collect_migrations(dir.path(), 0, 1).unwrap_err();
    assert!(matches!(err, CoreError::DuplicateVersion { version: 9, .. }));
}

#[test]
fn test_collect_missing_directory() {
    let dir = TempDir::new().unwrap();
    let err = collect_migrations(&dir.path().join("nope"), 0, 1).unwrap_err();
    assert!(matches!(err, CoreError::MigrationsDirNotFound { .. }));
}

#[test]
fn test_most_recent_version() {
    let dir = migrations_dir(&["001_a.sql", "010_b.sql", "sub/005_c.sql"]);
    assert_eq!(most_recent_version(dir.path()).unwrap(), 10);
}

#[test]
fn test_most_recent_version_empty_dir() {
    let dir = migrations_dir(&["README.md"]);
    assert!(matches!(
        most_recent_version(dir.path()),
        Err(CoreError::NoMigrations { .. })
    ));
}

#[test]
fn test_previous_version() {
    let dir = migrations_dir(&["001_a.sql", "002_b.sql", "005_c.sql"]);
    assert_eq!(previous_version(dir.path(), 5).unwrap(), 2);
    assert_eq!(previous_version(dir.path(), 2).unwrap(), 1);
}

#[test]
fn test_previous_version_of_first_is_zero() {
    let dir = migrations_dir(&["001_a.sql", "002_b.sql"]);
    assert_eq!(previous_version(dir.path(), 1).unwrap(), 0);
}

#[test]
fn test_previous_version_unknown() {
    let dir = migrations_dir(&["003_a.sql"]);
    assert!(matches!(
        previous_version(dir.path(), 2),
        Err(CoreError::NoPreviousVersion { version: 2 })
    ));
}
