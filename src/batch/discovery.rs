use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::SynthConfig;
use crate::{SynthError, SynthResult};

/// Collect design files under `input`, sorted for reproducible ordering.
///
/// A file path yields itself when its extension is recognized and nothing
/// otherwise. A directory is walked recursively; entries that cannot be
/// read (dangling links, unreadable subdirectories) are logged and skipped.
///
/// # Errors
/// Returns an error if `input` does not exist.
pub fn discover_inputs(input: &Path, config: &SynthConfig) -> SynthResult<Vec<PathBuf>> {
    if input.is_file() {
        if config.is_source_file(input) {
            return Ok(vec![input.to_path_buf()]);
        }
        warn!(path = %input.display(), "not a Verilog/SystemVerilog file");
        return Ok(Vec::new());
    }
    if !input.is_dir() {
        return Err(SynthError::Message(format!(
            "input path does not exist: {}",
            input.display()
        )));
    }

    debug!(dir = %input.display(), "searching for design files");
    let mut files: Vec<PathBuf> = WalkDir::new(input)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && config.is_source_file(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    debug!(count = files.len(), "design files found");
    Ok(files)
}
