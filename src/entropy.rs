//! Sources of the bytes written over a target.

use crate::error::{Result, ShredError};
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Default device random bytes are read from.
pub const DEFAULT_RANDOM_SOURCE: &str = "/dev/urandom";

/// Supplies the bytes for one write step.
///
/// `fill` may fill less than `buffer.len()` bytes; it returns how many it
/// produced and the caller loops for the rest.
pub trait ByteSource {
    fn fill(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Short label used in log output.
    fn label(&self) -> &'static str;
}

/// Reads unpredictable bytes from a random device.
///
/// The device is opened on the first call to [`ByteSource::fill`] and the
/// descriptor is reused for every later read. It is closed when the
/// `RandomDevice` is dropped.
#[derive(Debug)]
pub struct RandomDevice {
    path: PathBuf,
    file: Option<File>,
}

impl RandomDevice {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    fn handle(&mut self) -> Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                let file = File::open(&self.path).map_err(|source| ShredError::EntropyUnavailable {
                    path: self.path.clone(),
                    source,
                })?;
                tracing::debug!("opened random source {}", self.path.display());
                file
            }
        };
        Ok(self.file.insert(file))
    }
}

impl Default for RandomDevice {
    fn default() -> Self {
        Self::new(DEFAULT_RANDOM_SOURCE)
    }
}

impl ByteSource for RandomDevice {
    fn fill(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let file = self.handle()?;
        let read = loop {
            match file.read(buffer) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => break other,
            }
        };
        read.map_err(|source| ShredError::EntropyRead {
            path: self.path.clone(),
            source,
        })
    }

    fn label(&self) -> &'static str {
        "random"
    }
}

/// Produces zeros, for a final pass that hides the shredding.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroSource;

impl ByteSource for ZeroSource {
    fn fill(&mut self, buffer: &mut [u8]) -> Result<usize> {
        buffer.fill(0);
        Ok(buffer.len())
    }

    fn label(&self) -> &'static str {
        "000000"
    }
}
