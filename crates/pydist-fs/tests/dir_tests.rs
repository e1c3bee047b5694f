use assert_fs::prelude::*;
use predicates::prelude::*;
use pydist_fs::{Error, RobustnessConfig, dir};
use rstest::rstest;
use std::fs;
use std::time::{Duration, Instant};

fn fast_config() -> RobustnessConfig {
    RobustnessConfig {
        removal_timeout: Duration::from_millis(500),
        poll_interval: Duration::from_millis(5),
        ..RobustnessConfig::default()
    }
}

#[test]
fn remove_dir_and_wait_removes_tree() {
    let temp = assert_fs::TempDir::new().unwrap();
    let target = temp.child("3.11");
    target.child("python/bin/python3").write_str("bin").unwrap();
    target.child("hatch-dist.json").write_str("{}").unwrap();

    dir::remove_dir_and_wait(target.path(), fast_config()).unwrap();

    target.assert(predicate::path::missing());
}

#[test]
fn remove_dir_and_wait_on_missing_path_is_ok() {
    let temp = assert_fs::TempDir::new().unwrap();
    let target = temp.child("never-created");

    dir::remove_dir_and_wait(target.path(), fast_config()).unwrap();

    target.assert(predicate::path::missing());
}

#[test]
fn remove_dir_and_wait_reports_io_failure_without_waiting() {
    let temp = assert_fs::TempDir::new().unwrap();
    let target = temp.child("3.11");
    target.write_str("not a directory").unwrap();
    let config = RobustnessConfig {
        removal_timeout: Duration::from_secs(5),
        ..fast_config()
    };

    let started = Instant::now();
    let err = dir::remove_dir_and_wait(target.path(), config).unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(2), "{:?}", started.elapsed());
    match err {
        Error::Io { path, .. } => assert_eq!(path, target.path()),
        other => panic!("expected Io, got {other}"),
    }
    target.assert(predicate::path::is_file());
}

#[test]
fn rename_dir_moves_contents() {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = temp.child("scratch");
    source.child("python/bin/python3").write_str("bin").unwrap();
    let target = temp.child("3.10");

    dir::rename_dir(source.path(), target.path()).unwrap();

    source.assert(predicate::path::missing());
    target
        .child("python/bin/python3")
        .assert(predicate::str::contains("bin"));
}

#[rstest]
#[case::flat(&["a.txt"])]
#[case::nested(&["bin/python3", "lib/python3.11/os.py", "include/Python.h"])]
fn move_dir_copies_and_removes_source(#[case] files: &[&str]) {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = temp.child("scratch");
    for file in files {
        source.child(file).write_str(file).unwrap();
    }
    let target = temp.child("installed");

    dir::move_dir(source.path(), target.path()).unwrap();

    source.assert(predicate::path::missing());
    for file in files {
        target
            .child(file)
            .assert(predicate::str::diff(file.to_string()));
    }
}

#[test]
fn move_dir_missing_source_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    let result = dir::move_dir(&temp.path().join("missing"), &temp.path().join("target"));

    assert!(result.is_err());
    assert!(!temp.path().join("target").exists());
}

#[cfg(unix)]
#[test]
fn copy_dir_all_preserves_symlinks() {
    let temp = assert_fs::TempDir::new().unwrap();
    let source = temp.child("scratch");
    source.child("bin/python3.11").write_str("bin").unwrap();
    std::os::unix::fs::symlink("python3.11", source.path().join("bin/python3")).unwrap();

    let target = temp.path().join("copy");
    dir::copy_dir_all(source.path(), &target).unwrap();

    let link = fs::read_link(target.join("bin/python3")).unwrap();
    assert_eq!(link, std::path::PathBuf::from("python3.11"));
}
