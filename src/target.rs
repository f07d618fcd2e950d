//! Opening and validating the file to be overwritten.

use crate::error::{Result, ShredError};
use crate::overwrite::BlockSink;
use rustix::fs::OFlags;
use std::fs::{self, File, OpenOptions};
use std::io::{self, IsTerminal, Seek, SeekFrom};
use std::os::unix::fs::{FileTypeExt, MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

/// Block size used when the filesystem does not report one.
pub const DEFAULT_BLOCK_SIZE: u64 = 1024;

/// A writable handle on the file being shredded.
#[derive(Debug)]
pub struct TargetFile {
    path: PathBuf,
    file: File,
    size: u64,
    block_size: u64,
    is_regular: bool,
}

impl TargetFile {
    /// Opens `path` for writing and checks that it is a type that can be
    /// overwritten.
    ///
    /// FIFOs and sockets are rejected before they are opened, since opening
    /// a FIFO for writing blocks until a reader shows up. Terminals are
    /// rejected once the descriptor is available. With `force`, a target
    /// that cannot be opened because it lacks write permission gets owner
    /// write permission added and is opened again.
    pub fn open(path: impl AsRef<Path>, force: bool) -> Result<Self> {
        let path = path.as_ref();

        let meta = fs::metadata(path).map_err(|source| ShredError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        reject_special(path, meta.file_type())?;

        let file = match open_for_writing(path) {
            Err(e) if force && e.kind() == io::ErrorKind::PermissionDenied => {
                ensure_writable(path)?;
                open_for_writing(path)
            }
            other => other,
        }
        .map_err(|source| ShredError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_file(path, file)
    }

    /// Wraps an already open descriptor, reading its size and preferred
    /// block size from `fstat`.
    pub fn from_file(path: impl AsRef<Path>, mut file: File) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let open_err = |source| ShredError::Open {
            path: path.clone(),
            source,
        };

        let meta = file.metadata().map_err(open_err)?;
        let file_type = meta.file_type();
        reject_special(&path, file_type)?;
        if file_type.is_char_device() && file.is_terminal() {
            return Err(ShredError::InvalidTargetType {
                path,
                kind: "terminal",
            });
        }

        let is_regular = file_type.is_file();
        let size = if is_regular {
            meta.len()
        } else {
            // Block devices report a zero st_size.
            let end = file.seek(SeekFrom::End(0)).map_err(open_err)?;
            file.seek(SeekFrom::Start(0)).map_err(open_err)?;
            end
        };

        let block_size = match meta.blksize() {
            0 => DEFAULT_BLOCK_SIZE,
            n => n,
        };

        tracing::debug!(
            "{}: size {} bytes, block size {} bytes",
            path.display(),
            size,
            block_size
        );

        Ok(Self {
            path,
            file,
            size,
            block_size,
            is_regular,
        })
    }

    /// Overrides the reported block size.
    pub fn with_block_size(mut self, block_size: u64) -> Self {
        self.block_size = block_size.max(1);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn block_size(&self) -> u64 {
        self.block_size
    }

    pub fn is_regular(&self) -> bool {
        self.is_regular
    }
}

impl BlockSink for TargetFile {
    fn write_at(&mut self, buffer: &[u8], offset: u64) -> io::Result<usize> {
        Ok(rustix::io::pwrite(&self.file, buffer, offset)?)
    }

    fn sync(&mut self) -> io::Result<()> {
        Ok(rustix::fs::fdatasync(&self.file)?)
    }
}

fn open_for_writing(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .custom_flags(OFlags::NOCTTY.bits() as i32)
        .open(path)
}

fn reject_special(path: &Path, file_type: fs::FileType) -> Result<()> {
    let kind = if file_type.is_fifo() {
        "fifo"
    } else if file_type.is_socket() {
        "socket"
    } else if file_type.is_dir() {
        "directory"
    } else {
        return Ok(());
    };

    Err(ShredError::InvalidTargetType {
        path: path.to_path_buf(),
        kind,
    })
}

fn ensure_writable(path: &Path) -> Result<()> {
    let set_err = |source| ShredError::Open {
        path: path.to_path_buf(),
        source,
    };

    let mut perm = fs::metadata(path).map_err(set_err)?.permissions();
    let mode = perm.mode() | 0o200;
    perm.set_mode(mode);
    fs::set_permissions(path, perm).map_err(set_err)?;

    tracing::warn!("{}: added write permission ({:o})", path.display(), mode & 0o7777);
    Ok(())
}
