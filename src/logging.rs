//! File-backed tracing setup
//!
//! The terminal belongs to the UI, so log lines go to a file. The filter is
//! taken from `RUST_LOG` and defaults to `usertable=info`.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "usertable=info";

/// Installs the global subscriber writing to `path`
///
/// Returns an error if the file cannot be opened or a subscriber is already
/// installed; the application then runs without logging.
pub fn init_file_logging(path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
}
