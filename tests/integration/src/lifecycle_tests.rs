//! End-to-end lifecycle of a managed Python directory
//!
//! Exercises the complete flow: resolve -> install -> staleness -> upgrade ->
//! interrupted install recovery -> removal.

use std::fs;
use std::time::Duration;

use pydist_core::{PythonManager, RobustnessConfig};
use pydist_resolve::{Arch, Os, Platform, Resolver};
use pydist_test_utils::fakes::{FakeDownloader, FakeUnpacker, UnpackMode};
use pydist_test_utils::fixtures::{TestPythons, linux_resolver, snapshot};

const OLD_PYPY: &str = "https://downloads.python.org/pypy/pypy3.10-v7.3.11-linux64.tar.bz2";

fn robustness() -> RobustnessConfig {
    RobustnessConfig {
        removal_timeout: Duration::from_secs(2),
        poll_interval: Duration::from_millis(5),
        ..RobustnessConfig::default()
    }
}

#[test]
fn test_full_lifecycle() {
    let pythons = TestPythons::new();
    let downloader = FakeDownloader::new();
    let unpacker = FakeUnpacker::default();
    let manager = PythonManager::new(pythons.root(), linux_resolver(), &downloader, &unpacker)
        .with_robustness(robustness());

    // Fresh installs are current
    for name in ["pypy3.10", "3.11", "3.9"] {
        let installed = manager.install(name).unwrap();
        assert!(!installed.needs_update().unwrap());
    }
    let names: Vec<String> = manager.get_installed().unwrap().into_keys().collect();
    assert_eq!(names, vec!["3.9", "3.11", "pypy3.10"]);

    // An install recorded from an older PyPy release is stale
    pythons.write_metadata("pypy3.10", OLD_PYPY);
    let installed = manager.get_installed().unwrap();
    assert!(installed["pypy3.10"].needs_update().unwrap());
    assert!(!installed["3.11"].needs_update().unwrap());

    // Upgrading rewrites the metadata with the current source
    let upgraded = manager.install("pypy3.10").unwrap();
    assert!(!upgraded.needs_update().unwrap());
    assert_ne!(upgraded.metadata().unwrap().source.as_deref(), Some(OLD_PYPY));

    // Removing everything leaves only the rollback copy from the upgrade
    for (_, installed) in manager.get_installed().unwrap() {
        manager.remove(installed).unwrap();
    }
    assert!(manager.get_installed().unwrap().is_empty());
    assert_eq!(pythons.entries(), vec!["pypy3.10.bak"]);
}

#[test]
fn test_recovery_after_interrupted_install() {
    let pythons = TestPythons::new();
    let downloader = FakeDownloader::new();
    let good = FakeUnpacker::default();
    let manager = PythonManager::new(pythons.root(), linux_resolver(), &downloader, &good)
        .with_robustness(robustness());

    let original = manager.install("3.10").unwrap();
    let before = snapshot(original.path());

    // A swap that cannot place the new tree rolls back
    let broken = FakeUnpacker::new(UnpackMode::Nothing);
    let failing = PythonManager::new(pythons.root(), linux_resolver(), &downloader, &broken)
        .with_robustness(robustness());
    assert!(failing.install("3.10").is_err());
    assert_eq!(snapshot(&pythons.root().join("3.10")), before);

    // Simulate a crash between backup and swap: only the backup survives
    fs::rename(pythons.root().join("3.10"), pythons.root().join("3.10.bak")).unwrap();
    assert!(manager.get_installed().unwrap().is_empty());

    // The next install clears the stale backup and succeeds
    let reinstalled = manager.install("3.10").unwrap();
    assert!(reinstalled.python_path().is_file());
    assert_eq!(pythons.entries(), vec!["3.10"]);
}

#[test]
fn test_variant_override_flows_into_install() {
    let pythons = TestPythons::new();
    let downloader = FakeDownloader::new();
    let unpacker = FakeUnpacker::default();
    let resolver = Resolver::from_lookup(Platform::new(Os::Windows, Arch::X86_64), |key| {
        (key == "HATCH_PYTHON_VARIANT_WINDOWS").then(|| "static".to_string())
    });
    let manager = PythonManager::new(pythons.root(), resolver, &downloader, &unpacker)
        .with_robustness(robustness());

    let installed = manager.install("3.11").unwrap();

    assert!(downloader.urls()[0].contains("static"));
    assert!(installed.python_path().ends_with("python/python.exe"));
    assert!(installed.python_path().is_file());
}

#[test]
fn test_running_platform_resolves_every_known_name() {
    let Ok(resolver) = Resolver::from_env() else {
        eprintln!("Skipping test: unsupported platform");
        return;
    };

    for name in resolver.known_distributions() {
        match resolver.resolve(name, None) {
            Ok(distribution) => assert_eq!(distribution.name(), *name),
            Err(pydist_resolve::Error::NoMatchingBuild { .. }) => {
                eprintln!("Skipping {name}: no build for this platform");
            }
            Err(e) => panic!("{name}: {e}"),
        }
    }
}
