// secure_shred - overwrite files with random data, optionally remove them
// Usage:
//   secure_shred [OPTIONS] <FILE>...

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use secure_shred::config::{parse_size, DEFAULT_ITERATIONS};
use secure_shred::entropy::DEFAULT_RANDOM_SOURCE;
use secure_shred::{Removal, RemovalStrategy, ShredOptions, Shredder, SizePolicy};

/// Overwrite the specified FILE(s) repeatedly, in order to make it harder
/// for even very expensive hardware probing to recover the data.
#[derive(Parser, Debug)]
#[command(name = "secure_shred")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Overwrite N times instead of the default
    #[arg(short = 'n', long, value_name = "N", default_value_t = DEFAULT_ITERATIONS)]
    iterations: u32,

    /// Shred this many bytes (suffixes like K, M, G accepted)
    #[arg(short, long, value_name = "N", value_parser = parse_size)]
    size: Option<u64>,

    /// Do not round file sizes up to the next full block
    #[arg(short = 'x', long)]
    exact: bool,

    /// Deallocate and remove file after overwriting (same as --remove=wipe)
    #[arg(short = 'u')]
    unlink: bool,

    /// Like -u but give control on HOW to delete: none, unlink, wipe, wipesync
    #[arg(long, value_name = "HOW", num_args = 0..=1, default_missing_value = "wipe")]
    remove: Option<RemovalStrategy>,

    /// Flush every write to stable storage before the next one
    #[arg(long)]
    sync: bool,

    /// Add a final overwrite with zeros to hide shredding
    #[arg(short, long)]
    zero: bool,

    /// Change permissions to allow writing if necessary
    #[arg(short, long)]
    force: bool,

    /// Get random bytes from FILE
    #[arg(long, value_name = "FILE", default_value = DEFAULT_RANDOM_SOURCE)]
    random_source: PathBuf,

    /// Show progress (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,
}

impl Cli {
    fn options(&self) -> Result<ShredOptions> {
        if self.iterations == 0 {
            bail!("invalid number of passes: 0");
        }

        let size = match (self.size, self.exact) {
            (Some(n), _) => SizePolicy::Explicit(n),
            (None, true) => SizePolicy::Exact,
            (None, false) => SizePolicy::RoundUp,
        };

        let removal = match (self.remove, self.unlink) {
            (Some(how), _) => how,
            (None, true) => RemovalStrategy::Wipe,
            (None, false) => RemovalStrategy::None,
        };

        Ok(ShredOptions {
            iterations: self.iterations,
            size,
            removal,
            force_sync: self.sync,
            zero_pass: self.zero,
            force: self.force,
            random_source: self.random_source.clone(),
        })
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = match cli.options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(2);
        }
    };

    let mut shredder = Shredder::new(options);
    let mut ok = true;

    for path in &cli.files {
        match shredder.shred(path) {
            Ok(report) => {
                let outcome = match &report.removal {
                    Ok(Removal::Kept) => "kept",
                    Ok(Removal::Unlinked) => "removed",
                    Err(_) => "not removed",
                };
                tracing::info!(
                    "{}: {} passes, {} bytes written ({} per pass), {}",
                    path.display(),
                    report.overwrite.iterations_completed,
                    report.overwrite.bytes_written,
                    report.overwrite.average_bytes_written(),
                    outcome
                );
                if let Err(e) = report.removal {
                    eprintln!("Error: {} overwritten but not removed: {}", path.display(), e);
                    ok = false;
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ok = false;
                if e.is_fatal() {
                    break;
                }
            }
        }
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
