//! The multi-pass overwrite loop.

use crate::entropy::{ByteSource, ZeroSource};
use crate::error::{Result, ShredError};
use std::io;
use std::path::Path;

/// Destination of positioned writes.
///
/// Every write names its offset explicitly, so nothing depends on a file
/// cursor left behind by an earlier step or pass.
pub trait BlockSink {
    fn write_at(&mut self, buffer: &[u8], offset: u64) -> io::Result<usize>;

    /// Forces previously written data to stable storage.
    fn sync(&mut self) -> io::Result<()>;
}

/// What one run of the engine does to a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverwritePlan {
    /// Bytes written by every pass, computed once per file.
    pub target_length: u64,
    /// Number of random passes, at least one.
    pub iterations: u32,
    /// Flush after every write instead of only at the end of a pass.
    pub force_sync: bool,
    /// Finish with one extra pass of zeros.
    pub zero_pass: bool,
}

/// Totals reported after a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverwriteReport {
    pub iterations_completed: u32,
    pub bytes_written: u64,
}

impl OverwriteReport {
    pub fn average_bytes_written(&self) -> u64 {
        match self.iterations_completed {
            0 => 0,
            n => self.bytes_written / u64::from(n),
        }
    }
}

/// Runs one pass: fills `sink` from offset 0 up to `target_length` with
/// bytes from `source`, one block of `buffer` at a time.
///
/// The offset only ever advances by what the sink reports as written. A
/// write that makes no progress, or a source that returns nothing, aborts
/// the pass.
pub fn overwrite_pass(
    sink: &mut dyn BlockSink,
    source: &mut dyn ByteSource,
    buffer: &mut [u8],
    target_length: u64,
    force_sync: bool,
) -> Result<u64> {
    if buffer.is_empty() && target_length > 0 {
        return Err(ShredError::Write {
            offset: 0,
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty write buffer"),
        });
    }

    let mut offset = 0u64;

    while offset < target_length {
        let remaining = target_length - offset;
        let step = remaining.min(buffer.len() as u64) as usize;

        let filled = source.fill(&mut buffer[..step])?;
        if filled == 0 {
            return Err(ShredError::Write {
                offset,
                source: io::Error::new(io::ErrorKind::UnexpectedEof, "random source returned no data"),
            });
        }

        let written = match sink.write_at(&buffer[..filled], offset) {
            Ok(0) => Err(io::Error::from(io::ErrorKind::WriteZero)),
            other => other,
        }
        .map_err(|source| ShredError::Write { offset, source })?;

        if force_sync {
            sink.sync().map_err(|source| ShredError::Write { offset, source })?;
        }

        offset += written as u64;
    }

    Ok(offset)
}

/// Repeats [`overwrite_pass`] over one file, owning the scratch buffer the
/// passes share.
pub struct OverwriteEngine<'a> {
    source: &'a mut dyn ByteSource,
    buffer: Vec<u8>,
}

impl<'a> OverwriteEngine<'a> {
    /// `block_size` sets the size of each write step.
    pub fn new(source: &'a mut dyn ByteSource, block_size: usize) -> Self {
        Self {
            source,
            buffer: vec![0u8; block_size.max(1)],
        }
    }

    /// Runs every pass of `plan` in order and stops at the first failure.
    ///
    /// Each pass ends with a sync so its data is on disk before the next
    /// pass starts overwriting it.
    pub fn execute(&mut self, path: &Path, sink: &mut dyn BlockSink, plan: &OverwritePlan) -> Result<OverwriteReport> {
        let passes = plan.iterations + u32::from(plan.zero_pass);
        let mut report = OverwriteReport::default();

        for pass in 1..=passes {
            let mut zeros = ZeroSource;
            let source: &mut dyn ByteSource = if pass > plan.iterations {
                &mut zeros
            } else {
                &mut *self.source
            };

            tracing::info!("{}: pass {}/{} ({})...", path.display(), pass, passes, source.label());

            let written = overwrite_pass(sink, source, &mut self.buffer, plan.target_length, plan.force_sync)
                .and_then(|written| {
                    sink.sync().map_err(|source| ShredError::Write {
                        offset: written,
                        source,
                    })?;
                    Ok(written)
                })
                .map_err(|e| ShredError::Pass {
                    path: path.to_path_buf(),
                    pass,
                    source: Box::new(e),
                })?;

            tracing::debug!("{}: pass {} wrote {} bytes", path.display(), pass, written);
            report.iterations_completed = pass;
            report.bytes_written += written;
        }

        Ok(report)
    }
}
