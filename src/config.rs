//! Per-invocation settings and size argument parsing.

use crate::entropy::DEFAULT_RANDOM_SOURCE;
use crate::removal::RemovalStrategy;
use crate::size::SizePolicy;
use std::path::PathBuf;

pub const DEFAULT_ITERATIONS: u32 = 3;

/// Settings applied to every file of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShredOptions {
    pub iterations: u32,
    pub size: SizePolicy,
    pub removal: RemovalStrategy,
    pub force_sync: bool,
    pub zero_pass: bool,
    pub force: bool,
    pub random_source: PathBuf,
}

impl Default for ShredOptions {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            size: SizePolicy::RoundUp,
            removal: RemovalStrategy::None,
            force_sync: false,
            zero_pass: false,
            force: false,
            random_source: PathBuf::from(DEFAULT_RANDOM_SOURCE),
        }
    }
}

/// Parses a byte count such as `4096`, `64K` or `2M`. Suffixes are powers
/// of 1024.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    let (digits, shift) = match s.char_indices().last() {
        Some((i, c)) if c.is_ascii_alphabetic() => {
            let shift = match c.to_ascii_uppercase() {
                'K' => 10,
                'M' => 20,
                'G' => 30,
                'T' => 40,
                _ => return Err(format!("invalid size suffix in '{s}'")),
            };
            (&s[..i], shift)
        }
        _ => (s, 0),
    };

    let value: u64 = digits
        .parse()
        .map_err(|_| format!("invalid size '{s}'"))?;
    value
        .checked_mul(1u64 << shift)
        .ok_or_else(|| format!("size '{s}' is too large"))
}
