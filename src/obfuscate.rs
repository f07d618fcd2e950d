//! Removal of a file under a series of meaningless, shrinking names.
//!
//! Before the final unlink the file is renamed once for every length from
//! its original name length down to one. At each length the candidate names
//! are tried in odometer order over [`ALPHABET`], starting from all `'0'`,
//! and every rename refuses to replace an existing entry. Nothing in the
//! directory is ever overwritten, and only one directory entry refers to the
//! file at any time.

use crate::error::{Result, ShredError};
use rustix::fs::{AtFlags, Mode, OFlags, RenameFlags};
use rustix::io::Errno;
use std::ffi::{OsStr, OsString};
use std::io;
use std::os::fd::OwnedFd;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

/// Characters obfuscated names are drawn from, in counting order.
pub const ALPHABET: &[u8; 64] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_.";

/// Advances `name` to the next value of a base-`alphabet.len()` counter
/// whose least significant digit is the last byte.
///
/// Returns `true` when the carry ran off the most significant position,
/// which leaves `name` back at all first characters. Bytes not in
/// `alphabet` count as its first character.
pub fn increment(name: &mut [u8], alphabet: &[u8]) -> bool {
    let Some(&first) = alphabet.first() else {
        return true;
    };

    for digit in name.iter_mut().rev() {
        let pos = alphabet.iter().position(|&c| c == *digit).unwrap_or(0);
        match alphabet.get(pos + 1) {
            Some(&next) => {
                *digit = next;
                return false;
            }
            None => *digit = first,
        }
    }

    true
}

/// Result of a completed wipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WipeReport {
    /// Every name the file was successfully renamed to, in order.
    pub renames: Vec<PathBuf>,
}

/// Renames `path` through shorter and shorter obfuscated names, then
/// unlinks it.
pub fn wipe(path: impl AsRef<Path>) -> Result<WipeReport> {
    let path = path.as_ref();
    let Some(base) = path.file_name() else {
        return Err(ShredError::InvalidPath(path.to_path_buf()));
    };

    let dir_path = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let dir = open_dir(dir_path).map_err(|source| ShredError::Open {
        path: dir_path.to_path_buf(),
        source,
    })?;

    let mut current: OsString = base.to_os_string();
    let mut renames = Vec::with_capacity(base.len());

    for length in (1..=base.as_bytes().len()).rev() {
        let mut candidate = vec![ALPHABET[0]; length];

        loop {
            let taken = if is_dot_entry(&candidate) {
                true
            } else {
                match rename_noreplace(&dir, current.as_os_str(), OsStr::from_bytes(&candidate)) {
                    Ok(()) => false,
                    Err(errno) if errno == Errno::EXIST => true,
                    Err(errno) => {
                        return Err(rename_failure(
                            dir_path,
                            dir_path.join(&current),
                            dir_path.join(OsStr::from_bytes(&candidate)),
                            errno,
                        ))
                    }
                }
            };

            if !taken {
                break;
            }
            if increment(&mut candidate, ALPHABET) {
                return Err(ShredError::RenameCollisionExhausted {
                    dir: dir_path.to_path_buf(),
                    from: dir_path.join(&current),
                    length,
                });
            }
        }

        let renamed = OsString::from_vec(candidate);
        tracing::info!(
            "{}: renamed to {}",
            dir_path.join(&current).display(),
            dir_path.join(&renamed).display()
        );
        renames.push(dir_path.join(&renamed));
        current = renamed;
    }

    rustix::fs::unlinkat(&dir, current.as_os_str(), AtFlags::empty()).map_err(|errno| ShredError::Unlink {
        path: dir_path.join(&current),
        source: io::Error::from(errno),
    })?;

    Ok(WipeReport { renames })
}

fn open_dir(path: &Path) -> io::Result<OwnedFd> {
    Ok(rustix::fs::open(
        path,
        OFlags::RDONLY | OFlags::DIRECTORY | OFlags::CLOEXEC,
        Mode::empty(),
    )?)
}

fn rename_noreplace(dir: &OwnedFd, from: &OsStr, to: &OsStr) -> std::result::Result<(), Errno> {
    rustix::fs::renameat_with(dir, from, dir, to, RenameFlags::NOREPLACE)
}

/// Maps a failed rename to an error naming where the file now is.
/// `EINVAL` from `renameat2` means the filesystem has no `RENAME_NOREPLACE`.
fn rename_failure(dir: &Path, from: PathBuf, to: PathBuf, errno: Errno) -> ShredError {
    if errno == Errno::INVAL {
        return ShredError::NoReplaceUnsupported {
            dir: dir.to_path_buf(),
            from,
        };
    }
    ShredError::Rename {
        from,
        to,
        source: io::Error::from(errno),
    }
}

fn is_dot_entry(name: &[u8]) -> bool {
    name == b"." || name == b".."
}
