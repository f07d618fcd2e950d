use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while overwriting or removing a target.
#[derive(Error, Debug)]
pub enum ShredError {
    #[error("{path}: invalid file type ({kind})")]
    InvalidTargetType { path: PathBuf, kind: &'static str },

    #[error("{path}: failed to open: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("{path}: cannot open random source: {source}")]
    EntropyUnavailable { path: PathBuf, source: io::Error },

    #[error("{path}: error reading random source: {source}")]
    EntropyRead { path: PathBuf, source: io::Error },

    #[error("write error at offset {offset}: {source}")]
    Write { offset: u64, source: io::Error },

    #[error("{path}: pass {pass} failed: {source}")]
    Pass {
        path: PathBuf,
        pass: u32,
        #[source]
        source: Box<ShredError>,
    },

    #[error("{from}: no free name of length {length} left for renaming in {dir}")]
    RenameCollisionExhausted {
        dir: PathBuf,
        from: PathBuf,
        length: usize,
    },

    #[error("{dir}: filesystem cannot rename without replacing, leaving {from} in place")]
    NoReplaceUnsupported { dir: PathBuf, from: PathBuf },

    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("{path}: failed to remove: {source}")]
    Unlink { path: PathBuf, source: io::Error },

    #[error("{0}: has no file name to obfuscate")]
    InvalidPath(PathBuf),

    #[error("removal method '{0}' is not implemented")]
    NotImplemented(&'static str),
}

impl ShredError {
    /// True for failures of the random source, after which no further
    /// file may be processed.
    pub fn is_fatal(&self) -> bool {
        match self {
            ShredError::EntropyUnavailable { .. } | ShredError::EntropyRead { .. } => true,
            ShredError::Pass { source, .. } => source.is_fatal(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ShredError>;
