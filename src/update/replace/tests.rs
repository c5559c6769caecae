use super::*;
use crate::error::NasError;
use crate::update::naming::BinaryFile;
use crate::system::testing::RecordingSpawner;
use crate::update::testing::StaticTransport;
use tempfile::TempDir;

fn naming() -> BinaryNaming {
    BinaryNaming::new("tool", "exe")
}

fn no_wait() -> ReplaceTiming {
    ReplaceTiming::from_millis(0, 1)
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn staged_artifact(dir: &Path, version: Version, contents: &[u8]) -> UpdateArtifact {
    let staged_path = naming().staged_path(dir, &version);
    fs::write(&staged_path, contents).unwrap();
    UpdateArtifact {
        version,
        staged_path,
        target_path: naming().install_path(dir, &version),
    }
}

#[test]
fn test_stage_writes_staged_file() {
    let temp = TempDir::new().unwrap();
    let transport = StaticTransport::new("1.0.3").with_payload(b"MZ 1.0.3");
    let version = Version::new(1, 0, 3);

    let artifact = stage(&transport, &naming(), temp.path(), &version).unwrap();

    assert_eq!(artifact.staged_path, temp.path().join("tool-v1.0.3.exe.tmp"));
    assert_eq!(artifact.target_path, temp.path().join("tool-v1.0.3.exe"));
    assert_eq!(fs::read(&artifact.staged_path).unwrap(), b"MZ 1.0.3");
    assert_eq!(file_names(temp.path()), vec!["tool-v1.0.3.exe.tmp"]);
}

#[test]
fn test_partial_download_is_recognised_by_prune() {
    let temp = TempDir::new().unwrap();
    let version = Version::new(1, 0, 3);
    let download = partial_download(&naming(), temp.path(), &version).unwrap();
    let name = download.path().file_name().unwrap().to_string_lossy().into_owned();

    assert_eq!(
        naming().classify(&name).unwrap().unwrap(),
        BinaryFile::Partial(version)
    );

    // A killed process leaves the file behind
    let (_file, path) = download.keep().unwrap();
    let report = prune_stale_binaries(temp.path(), &Version::new(1, 0, 0), &naming(), None).unwrap();
    assert_eq!(report.removed, vec![path]);
    assert!(file_names(temp.path()).is_empty());
}

#[test]
fn test_failed_download_leaves_nothing_behind() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tool-v1.0.0.exe"), b"MZ old").unwrap();
    let transport = StaticTransport::new("1.0.3").failing_download();

    let result = stage(&transport, &naming(), temp.path(), &Version::new(1, 0, 3));

    assert!(matches!(result, Err(NasError::Network { .. })));
    assert_eq!(file_names(temp.path()), vec!["tool-v1.0.0.exe"]);
}

#[test]
fn test_empty_download_is_rejected() {
    let temp = TempDir::new().unwrap();
    let transport = StaticTransport::new("1.0.3").with_payload(b"");

    let result = stage(&transport, &naming(), temp.path(), &Version::new(1, 0, 3));

    assert!(matches!(result, Err(NasError::Update { .. })));
    assert!(file_names(temp.path()).is_empty());
}

#[test]
fn test_helper_file_name() {
    assert_eq!(helper_file_name(&naming()), "tool-update-helper.exe");
    assert_eq!(
        helper_file_name(&BinaryNaming::new("tool", "")),
        "tool-update-helper"
    );
}

#[test]
fn test_hand_off_copies_helper_and_launches_it() {
    let install = TempDir::new().unwrap();
    let helpers = TempDir::new().unwrap();
    let current = install.path().join("tool-v1.0.0.exe");
    fs::write(&current, b"MZ old").unwrap();
    let artifact = staged_artifact(install.path(), Version::new(1, 0, 3), b"MZ new");
    let spawner = RecordingSpawner::new();

    let helper = hand_off(&artifact, &current, helpers.path(), &naming(), &spawner).unwrap();

    assert_eq!(helper, helpers.path().join("tool-update-helper.exe"));
    assert_eq!(fs::read(&helper).unwrap(), b"MZ old");

    let launches = spawner.launches();
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].0, helper);
    assert_eq!(
        launches[0].1,
        vec![
            OsString::from("replace"),
            artifact.staged_path.clone().into_os_string(),
            artifact.target_path.clone().into_os_string(),
            OsString::from("1.0.3"),
        ]
    );
    // Nothing in the install directory changes until the helper runs
    assert!(current.exists());
    assert!(artifact.staged_path.exists());
}

#[test]
fn test_hand_off_launch_failure_is_error() {
    let install = TempDir::new().unwrap();
    let current = install.path().join("tool-v1.0.0.exe");
    fs::write(&current, b"MZ old").unwrap();
    let artifact = staged_artifact(install.path(), Version::new(1, 0, 3), b"MZ new");

    let result = hand_off(
        &artifact,
        &current,
        install.path(),
        &naming(),
        &RecordingSpawner::failing(),
    );
    assert!(result.is_err());
    assert!(current.exists());
}

#[test]
fn test_helper_swaps_prunes_and_launches() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tool-v1.0.0.exe"), b"MZ old").unwrap();
    fs::write(temp.path().join("tool.exe"), b"MZ legacy").unwrap();
    let artifact = staged_artifact(temp.path(), Version::new(1, 0, 3), b"MZ new");
    let spawner = RecordingSpawner::new();

    let outcome = run_helper(&artifact, &naming(), no_wait(), &spawner).unwrap();

    assert_eq!(outcome.target, temp.path().join("tool-v1.0.3.exe"));
    assert_eq!(outcome.removed.len(), 2);
    assert!(outcome.leftover.is_empty());
    assert_eq!(file_names(temp.path()), vec!["tool-v1.0.3.exe"]);
    assert_eq!(fs::read(&outcome.target).unwrap(), b"MZ new");

    let launches = spawner.launches();
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].0, outcome.target);
    assert!(launches[0].1.is_empty());
}

#[test]
fn test_helper_with_missing_staged_file_changes_nothing() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tool-v1.0.0.exe"), b"MZ old").unwrap();
    let version = Version::new(1, 0, 3);
    let artifact = UpdateArtifact {
        version,
        staged_path: naming().staged_path(temp.path(), &version),
        target_path: naming().install_path(temp.path(), &version),
    };
    let spawner = RecordingSpawner::new();

    let result = run_helper(&artifact, &naming(), no_wait(), &spawner);

    assert!(matches!(result, Err(NasError::Update { .. })));
    assert_eq!(file_names(temp.path()), vec!["tool-v1.0.0.exe"]);
    assert!(spawner.launches().is_empty());
}

#[test]
fn test_helper_with_empty_staged_file_changes_nothing() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tool-v1.0.0.exe"), b"MZ old").unwrap();
    let artifact = staged_artifact(temp.path(), Version::new(1, 0, 3), b"");
    let spawner = RecordingSpawner::new();

    let result = run_helper(&artifact, &naming(), no_wait(), &spawner);

    assert!(matches!(result, Err(NasError::Update { .. })));
    assert!(temp.path().join("tool-v1.0.0.exe").exists());
    assert!(!artifact.target_path.exists());
    assert!(spawner.launches().is_empty());
}

#[test]
fn test_prune_scan_failure_is_not_fatal() {
    let temp = TempDir::new().unwrap();
    let version = Version::new(1, 0, 3);
    let missing = temp.path().join("gone");
    let artifact = UpdateArtifact {
        version,
        staged_path: naming().staged_path(&missing, &version),
        target_path: naming().install_path(&missing, &version),
    };

    let (removed, leftover) = prune_until(
        &missing,
        &artifact,
        &naming(),
        Instant::now() + Duration::from_secs(5),
        Duration::from_millis(1),
    );
    assert!(removed.is_empty());
    assert!(leftover.is_empty());
}

#[test]
fn test_helper_keeps_newer_binaries() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tool-v2.0.0.exe"), b"MZ newer").unwrap();
    let artifact = staged_artifact(temp.path(), Version::new(1, 0, 3), b"MZ new");

    run_helper(&artifact, &naming(), no_wait(), &RecordingSpawner::new()).unwrap();

    assert_eq!(
        file_names(temp.path()),
        vec!["tool-v1.0.3.exe", "tool-v2.0.0.exe"]
    );
}

#[test]
fn test_remove_stale_helper() {
    let temp = TempDir::new().unwrap();
    assert!(!remove_stale_helper(temp.path(), &naming()));

    fs::write(temp.path().join("tool-update-helper.exe"), b"MZ").unwrap();
    assert!(remove_stale_helper(temp.path(), &naming()));
    assert!(file_names(temp.path()).is_empty());
}

#[test]
fn test_retry_until_gives_up_after_deadline() {
    let mut attempts = 0;
    let result: std::io::Result<()> = retry_until(Instant::now(), Duration::from_millis(1), || {
        attempts += 1;
        Err(std::io::Error::other("locked"))
    });
    assert!(result.is_err());
    assert_eq!(attempts, 1);
}

#[test]
fn test_retry_until_succeeds_after_transient_failures() {
    let mut attempts = 0;
    let deadline = Instant::now() + Duration::from_secs(5);
    let result = retry_until(deadline, Duration::from_millis(1), || {
        attempts += 1;
        if attempts < 3 {
            Err(std::io::Error::other("locked"))
        } else {
            Ok(attempts)
        }
    });
    assert_eq!(result.unwrap(), 3);
}
