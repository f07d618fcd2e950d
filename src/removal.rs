//! What happens to a target after its passes are done.

use crate::error::{Result, ShredError};
use crate::obfuscate;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// How a target is removed once its contents have been overwritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalStrategy {
    /// Leave the overwritten file in place.
    #[default]
    None,
    /// Unlink under the original name.
    Unlink,
    /// Rename through obfuscated names, then unlink.
    Wipe,
    /// Like `Wipe`, syncing the directory after every step. Not available.
    WipeSync,
}

/// What happened to the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Kept,
    Unlinked,
}

impl RemovalStrategy {
    pub fn name(self) -> &'static str {
        match self {
            RemovalStrategy::None => "none",
            RemovalStrategy::Unlink => "unlink",
            RemovalStrategy::Wipe => "wipe",
            RemovalStrategy::WipeSync => "wipesync",
        }
    }

    /// Removes `path`, whose contents the caller has already overwritten.
    pub fn remove(self, path: &Path) -> Result<Removal> {
        match self {
            RemovalStrategy::None => Ok(Removal::Kept),
            RemovalStrategy::Unlink => {
                fs::remove_file(path).map_err(|source| ShredError::Unlink {
                    path: path.to_path_buf(),
                    source,
                })?;
                Ok(Removal::Unlinked)
            }
            RemovalStrategy::Wipe => {
                obfuscate::wipe(path)?;
                Ok(Removal::Unlinked)
            }
            RemovalStrategy::WipeSync => Err(ShredError::NotImplemented(self.name())),
        }
    }
}

impl fmt::Display for RemovalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RemovalStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(RemovalStrategy::None),
            "unlink" => Ok(RemovalStrategy::Unlink),
            "wipe" => Ok(RemovalStrategy::Wipe),
            "wipesync" => Ok(RemovalStrategy::WipeSync),
            other => Err(format!(
                "unknown removal method '{other}' (expected none, unlink, wipe or wipesync)"
            )),
        }
    }
}
