//! File logging for the CLI. Stdout is reserved for command output.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file name inside the data directory
pub const LOG_FILE: &str = "esoval.log";

/// Size-based rotation limits for the log file.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Rotation {
    /// Rotate once the file grows past this many bytes
    pub max_size: u64,
    /// Bytes of the newest entries kept after rotating
    pub keep_size: u64,
}

impl Default for Rotation {
    fn default() -> Self {
        Self {
            max_size: 5 * 1024 * 1024,
            keep_size: 1024 * 1024,
        }
    }
}

const ROTATION_MARKER: &[u8] = b"--- Log rotated (older entries removed) ---\n";

impl Rotation {
    /// Trim `path` down to its newest whole lines if it is over the limit.
    ///
    /// Returns whether the file was rewritten.
    pub(crate) fn apply(&self, path: &Path) -> io::Result<bool> {
        let size = match fs::metadata(path) {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        if size <= self.max_size {
            return Ok(false);
        }

        let tail = read_tail(path, size.saturating_sub(self.keep_size))?;
        let mut file = File::create(path)?;
        file.write_all(ROTATION_MARKER)?;
        file.write_all(whole_lines(&tail))?;
        Ok(true)
    }
}

fn read_tail(path: &Path, offset: u64) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut tail = Vec::new();
    file.read_to_end(&mut tail)?;
    Ok(tail)
}

/// Everything after the first newline; the cut almost always lands mid-line.
fn whole_lines(tail: &[u8]) -> &[u8] {
    match tail.iter().position(|&b| b == b'\n') {
        Some(i) => &tail[i + 1..],
        None => tail,
    }
}

/// Default filter when `RUST_LOG` is unset.
pub(crate) fn default_filter(level: &str) -> String {
    format!("esoval={level},esoval_core={level}")
}

/// Send `tracing` output for both crates to `{data_dir}/esoval.log`.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init_logging(data_dir: &Path, level: &str) -> color_eyre::Result<PathBuf> {
    fs::create_dir_all(data_dir)?;
    let log_path = data_dir.join(LOG_FILE);

    if let Err(e) = Rotation::default().apply(&log_path) {
        eprintln!("Warning: Failed to rotate log file: {e}");
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_thread_names(true),
        )
        .init();

    tracing::info!(log_path = %log_path.display(), "esoval logging initialized");
    Ok(log_path)
}
