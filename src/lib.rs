pub mod analysis;
pub mod batch;
pub mod batch_cmd;
pub mod compare_cmd;
pub mod config;
pub mod core;
pub mod env_cmd;
pub mod flow;
pub mod metrics;
pub mod process;
pub mod report;

use std::path::Path;

use thiserror::Error;

pub use crate::config::{ConfigError, SynthConfig, ToolPaths};
pub use crate::core::{FlowResult, Strategy};

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl SynthError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        SynthError::Io { context: context.into(), source }
    }
}

pub type SynthResult<T> = Result<T, SynthError>;

// Shared helpers
pub fn now_string() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "".to_string())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    use sha256::digest;
    digest(bytes)
}

pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> SynthResult<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .map_err(|e| SynthError::io(format!("failed to create {}", dir.display()), e))?;
        }
    }
    let json = serde_json::to_vec_pretty(value)?;
    std::fs::write(path, json)
        .map_err(|e| SynthError::io(format!("failed to write {}", path.display()), e))
}
