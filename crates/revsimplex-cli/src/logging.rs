use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Level;

/// `<dir>/<stem>_output.log` for input `<dir>/<stem>.<ext>`
pub fn default_log_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "revsimplex".to_string());
    input.with_file_name(format!("{}_output.log", stem))
}

/// Route `tracing` output to `path` as bare messages, one per line.
pub fn init(path: &Path, verbose: bool) -> Result<(), String> {
    let file = File::create(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .without_time()
        .with_level(false)
        .with_target(false)
        .with_max_level(level)
        .finish();

    tracing::subscriber::set_global_default(subscriber).map_err(|e| e.to_string())
}
