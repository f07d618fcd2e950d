//! Overwrites files with unpredictable data and optionally removes them
//! through a sequence of obfuscated names.

pub mod config;
pub mod entropy;
pub mod error;
pub mod obfuscate;
pub mod overwrite;
pub mod removal;
pub mod shred;
pub mod size;
pub mod target;

pub use config::ShredOptions;
pub use error::{Result, ShredError};
pub use removal::{Removal, RemovalStrategy};
pub use shred::{FileReport, Shredder};
pub use size::SizePolicy;
