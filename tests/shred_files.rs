use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use secure_shred::{Removal, RemovalStrategy, ShredError, ShredOptions, Shredder, SizePolicy};
use std::fs;
use std::path::Path;

fn random_contents(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = vec![0u8; len];
    rng.fill_bytes(&mut data);
    data
}

fn write_file(dir: &Path, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}

#[test]
fn test_exact_overwrite_keeps_length_and_changes_content() {
    let dir = tempfile::tempdir().unwrap();
    let original = random_contents(1, 10_000);
    let path = write_file(dir.path(), "ledger.csv", &original);

    let options = ShredOptions {
        size: SizePolicy::Exact,
        ..ShredOptions::default()
    };
    let report = Shredder::new(options).shred(&path).unwrap();

    assert_eq!(report.target_length, 10_000);
    assert_eq!(report.overwrite.bytes_written, 30_000);
    assert!(matches!(report.removal, Ok(Removal::Kept)));

    let after = fs::read(&path).unwrap();
    assert_eq!(after.len(), original.len());
    assert_ne!(after, original);
}

#[test]
fn test_explicit_size_grows_regular_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "small", b"tiny");

    let options = ShredOptions {
        iterations: 1,
        size: SizePolicy::Explicit(5000),
        ..ShredOptions::default()
    };
    let report = Shredder::new(options).shred(&path).unwrap();

    assert_eq!(report.target_length, 5000);
    assert_eq!(fs::metadata(&path).unwrap().len(), 5000);
}

#[test]
fn test_zero_pass_leaves_zeros() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "diary.txt", &random_contents(2, 3000));

    let options = ShredOptions {
        iterations: 2,
        zero_pass: true,
        force_sync: true,
        ..ShredOptions::default()
    };
    let report = Shredder::new(options)
        .with_block_size(1024)
        .shred(&path)
        .unwrap();

    assert_eq!(report.overwrite.iterations_completed, 3);
    assert_eq!(report.overwrite.bytes_written, 3 * 3072);
    assert!(fs::read(&path).unwrap().iter().all(|&b| b == 0));
}

#[test]
fn test_many_files_wiped_in_one_directory() {
    let dir = tempfile::tempdir().unwrap();
    let names = ["a", "bb", "report-2024.pdf", "0", "00"];
    let paths: Vec<_> = names
        .iter()
        .enumerate()
        .map(|(i, name)| write_file(dir.path(), name, &random_contents(i as u64, 700)))
        .collect();

    let options = ShredOptions {
        iterations: 1,
        removal: RemovalStrategy::Wipe,
        ..ShredOptions::default()
    };
    let mut shredder = Shredder::new(options);
    for path in &paths {
        let report = shredder.shred(path).unwrap();
        assert!(matches!(report.removal, Ok(Removal::Unlinked)));
    }

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_failed_file_does_not_stop_the_next() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");
    let present = write_file(dir.path(), "present", b"data");

    let options = ShredOptions {
        iterations: 1,
        removal: RemovalStrategy::Unlink,
        ..ShredOptions::default()
    };
    let mut shredder = Shredder::new(options);

    let err = shredder.shred(&missing).unwrap_err();
    assert!(matches!(err, ShredError::Open { .. }));
    assert!(!err.is_fatal());

    let report = shredder.shred(&present).unwrap();
    assert!(matches!(report.removal, Ok(Removal::Unlinked)));
    assert!(!present.exists());
}

#[test]
fn test_wipesync_reports_overwrite_and_not_implemented() {
    let dir = tempfile::tempdir().unwrap();
    let original = random_contents(9, 512);
    let path = write_file(dir.path(), "notes", &original);

    let options = ShredOptions {
        iterations: 1,
        size: SizePolicy::Exact,
        removal: RemovalStrategy::WipeSync,
        ..ShredOptions::default()
    };
    let report = Shredder::new(options).shred(&path).unwrap();

    assert_eq!(report.overwrite.iterations_completed, 1);
    assert_eq!(report.overwrite.bytes_written, 512);
    assert!(matches!(report.removal, Err(ShredError::NotImplemented("wipesync"))));
    assert_ne!(fs::read(&path).unwrap(), original);
}
