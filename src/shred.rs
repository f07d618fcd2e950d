//! Per-file driver tying the overwrite engine to the removal step.

use crate::config::ShredOptions;
use crate::entropy::RandomDevice;
use crate::error::{Result, ShredError};
use crate::overwrite::{OverwriteEngine, OverwritePlan, OverwriteReport};
use crate::removal::Removal;
use crate::size::target_length;
use crate::target::TargetFile;
use std::path::Path;

/// Outcome for one file whose passes all completed.
///
/// A failed removal does not undo the overwrite, so it is reported here
/// next to the pass totals instead of replacing them.
#[derive(Debug)]
pub struct FileReport {
    pub target_length: u64,
    pub overwrite: OverwriteReport,
    pub removal: std::result::Result<Removal, ShredError>,
}

/// Shreds files one after another with a shared random source.
#[derive(Debug)]
pub struct Shredder {
    options: ShredOptions,
    source: RandomDevice,
    block_size: Option<u64>,
}

impl Shredder {
    pub fn new(options: ShredOptions) -> Self {
        let source = RandomDevice::new(&options.random_source);
        Self {
            options,
            source,
            block_size: None,
        }
    }

    /// Uses `block_size` instead of the size each file reports.
    pub fn with_block_size(mut self, block_size: u64) -> Self {
        self.block_size = Some(block_size);
        self
    }

    /// Overwrites `path` and then removes it as configured.
    ///
    /// The file is closed before removal starts. `Err` means no pass
    /// completed; removal failures end up in [`FileReport::removal`].
    pub fn shred(&mut self, path: &Path) -> Result<FileReport> {
        let mut target = TargetFile::open(path, self.options.force)?;
        if let Some(block_size) = self.block_size {
            target = target.with_block_size(block_size);
        }

        let plan = OverwritePlan {
            target_length: target_length(
                target.size(),
                target.block_size(),
                self.options.size,
                target.is_regular(),
            ),
            iterations: self.options.iterations.max(1),
            force_sync: self.options.force_sync,
            zero_pass: self.options.zero_pass,
        };

        let block = usize::try_from(target.block_size()).unwrap_or(usize::MAX);
        let mut engine = OverwriteEngine::new(&mut self.source, block);
        let overwrite = engine.execute(path, &mut target, &plan)?;
        drop(target);

        let removal = self.options.removal.remove(path);
        match &removal {
            Ok(Removal::Unlinked) => tracing::info!("{}: removed", path.display()),
            Ok(Removal::Kept) => {}
            Err(e) => tracing::warn!("{}: overwritten but not removed: {}", path.display(), e),
        }

        Ok(FileReport {
            target_length: plan.target_length,
            overwrite,
            removal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::removal::RemovalStrategy;
    use std::fs;

    #[test]
    fn test_shred_keeps_rounded_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, vec![0x5Au8; 2000]).unwrap();

        let mut shredder = Shredder::new(ShredOptions::default()).with_block_size(1024);
        let report = shredder.shred(&path).unwrap();

        assert_eq!(report.target_length, 2048);
        assert_eq!(report.overwrite.iterations_completed, 3);
        assert_eq!(report.overwrite.bytes_written, 6144);
        assert!(matches!(report.removal, Ok(Removal::Kept)));

        let contents = fs::read(&path).unwrap();
        assert_eq!(contents.len(), 2048);
        assert_ne!(&contents[..2000], &[0x5Au8; 2000][..]);
    }

    #[test]
    fn test_shred_with_wipe() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secret.key");
        fs::write(&path, b"hunter2").unwrap();

        let options = ShredOptions {
            iterations: 1,
            removal: RemovalStrategy::Wipe,
            zero_pass: true,
            ..ShredOptions::default()
        };
        let report = Shredder::new(options).shred(&path).unwrap();

        assert_eq!(report.overwrite.iterations_completed, 2);
        assert!(matches!(report.removal, Ok(Removal::Unlinked)));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_random_source_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"payload").unwrap();

        let options = ShredOptions {
            random_source: dir.path().join("no-such-device"),
            removal: RemovalStrategy::Unlink,
            ..ShredOptions::default()
        };
        let err = Shredder::new(options).shred(&path).unwrap_err();

        assert!(err.is_fatal());
        // Nothing is removed when the overwrite did not happen.
        assert_eq!(fs::read(&path).unwrap(), b"payload");
    }

    #[test]
    fn test_failed_wipe_keeps_overwrite_totals() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ab");
        fs::write(&path, vec![0x11u8; 100]).unwrap();
        for &c in crate::obfuscate::ALPHABET.iter().filter(|&&c| c != b'.') {
            fs::write(dir.path().join((c as char).to_string()), b"").unwrap();
        }

        let options = ShredOptions {
            iterations: 2,
            removal: RemovalStrategy::Wipe,
            ..ShredOptions::default()
        };
        let report = Shredder::new(options)
            .with_block_size(2048)
            .shred(&path)
            .unwrap();

        assert_eq!(report.overwrite.iterations_completed, 2);
        assert_eq!(report.overwrite.bytes_written, 4096);
        match report.removal {
            Err(ShredError::RenameCollisionExhausted { from, length, .. }) => {
                assert_eq!(length, 1);
                assert_eq!(from, dir.path().join("00"));
                assert_eq!(fs::metadata(&from).unwrap().len(), 2048);
            }
            other => panic!("unexpected removal outcome: {other:?}"),
        }
    }
}
