//! Per-flow transcript of stage commands and their output.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::process::{CommandSpec, ProcessOutput};

/// Append-only transcript file. Write failures are logged and otherwise
/// ignored: the transcript never changes a flow's outcome.
#[derive(Debug)]
pub struct Transcript {
    path: PathBuf,
    file: Option<File>,
}

impl Transcript {
    /// Create (truncate) the transcript at `path`.
    pub fn create(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file = match File::create(&path) {
            Ok(f) => Some(f),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to create transcript");
                None
            }
        };
        Transcript { path, file }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record one stage execution.
    pub fn record(&mut self, stage: &str, cmd: &CommandSpec, output: &ProcessOutput) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        let mut entry = String::new();
        entry.push_str(&format!("=== {stage} ===\n$ {cmd}\n"));
        if !output.stdout.is_empty() {
            entry.push_str("--- STDOUT ---\n");
            entry.push_str(&output.stdout);
            if !output.stdout.ends_with('\n') {
                entry.push('\n');
            }
        }
        if !output.stderr.is_empty() {
            entry.push_str("--- STDERR ---\n");
            entry.push_str(&output.stderr);
            if !output.stderr.ends_with('\n') {
                entry.push('\n');
            }
        }
        entry.push_str(&format!("exit status: {}\n\n", output.status));

        if let Err(e) = file.write_all(entry.as_bytes()) {
            warn!(path = %self.path.display(), error = %e, "failed to write transcript");
            self.file = None;
        }
    }
}

/// Save a tool's stdout followed by its stderr, the way Yosys logs are kept.
pub fn write_tool_log(path: &Path, output: &ProcessOutput) -> std::io::Result<()> {
    let mut contents = output.stdout.clone();
    if !output.stderr.is_empty() {
        contents.push_str("\n--- STDERR ---\n");
        contents.push_str(&output.stderr);
    }
    std::fs::write(path, contents)
}
