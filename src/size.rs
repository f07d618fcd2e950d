//! Computation of how many bytes each pass overwrites.

/// How the overwrite length is derived from the target's reported size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizePolicy {
    /// Round up to the next multiple of the preferred block size so the
    /// slack at the end of the last allocated block is covered too.
    #[default]
    RoundUp,
    /// Overwrite exactly the reported size.
    Exact,
    /// Overwrite a caller-supplied number of bytes.
    Explicit(u64),
}

/// Returns the number of bytes one pass writes for a target of
/// `actual_size` bytes with preferred I/O size `block_size`.
///
/// An explicit size is clamped to `actual_size` for non-regular targets
/// only, so special files are never extended. Regular files are written to
/// the requested length as given.
pub fn target_length(actual_size: u64, block_size: u64, policy: SizePolicy, is_regular: bool) -> u64 {
    let block_size = block_size.max(1);

    match policy {
        SizePolicy::RoundUp => {
            if actual_size == 0 {
                block_size
            } else if actual_size % block_size == 0 {
                actual_size
            } else {
                (actual_size / block_size + 1).saturating_mul(block_size)
            }
        }
        SizePolicy::Exact => actual_size,
        SizePolicy::Explicit(n) if !is_regular && n > actual_size => actual_size,
        SizePolicy::Explicit(n) => n,
    }
}
