//! Run configuration: defaults, optional TOML file and CLI overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_LUT_K: u32 = 6;
pub const DEFAULT_OUTPUT_DIR: &str = "build";
pub const DEFAULT_EXTENSIONS: &[&str] = &["sv", "v"];

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// lut_k is zero
    #[error("lut_k must be at least 1")]
    InvalidLutK,

    /// a tool path is empty
    #[error("tool path for {0} cannot be empty")]
    EmptyToolPath(&'static str),

    /// no input extensions configured
    #[error("extensions cannot be empty")]
    NoExtensions,

    /// config file could not be read
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// config file is not valid TOML for this schema
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Executables invoked by the flows.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub circt_verilog: PathBuf,
    pub circt_synth: PathBuf,
    pub circt_translate: PathBuf,
    pub yosys: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        ToolPaths {
            circt_verilog: PathBuf::from("circt-verilog"),
            circt_synth: PathBuf::from("circt-synth"),
            circt_translate: PathBuf::from("circt-translate"),
            yosys: PathBuf::from("yosys"),
        }
    }
}

impl ToolPaths {
    fn validate(&self) -> Result<(), ConfigError> {
        let entries = [
            ("circt_verilog", &self.circt_verilog),
            ("circt_synth", &self.circt_synth),
            ("circt_translate", &self.circt_translate),
            ("yosys", &self.yosys),
        ];
        for (name, path) in entries {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyToolPath(name));
            }
        }
        Ok(())
    }
}

/// On-disk configuration file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    lut_k: Option<u32>,
    output_dir: Option<PathBuf>,
    extensions: Option<Vec<String>>,
    #[serde(default)]
    tools: Option<ToolPaths>,
}

/// Effective configuration for a run.
#[derive(Debug, Clone)]
pub struct SynthConfig {
    /// LUT input count used by every strategy
    pub lut_k: u32,
    /// Root directory for artifacts and reports
    pub output_dir: PathBuf,
    /// Enable debug logging of commands and tool stderr
    pub verbose: bool,
    /// Recognized source file extensions (without dot, lowercase)
    pub extensions: Vec<String>,
    pub tools: ToolPaths,
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig {
            lut_k: DEFAULT_LUT_K,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            verbose: false,
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            tools: ToolPaths::default(),
        }
    }
}

/// Values supplied on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub lut_k: Option<u32>,
    pub output_dir: Option<PathBuf>,
    pub verbose: bool,
}

impl SynthConfig {
    /// Set the LUT size.
    pub fn with_lut_k(mut self, lut_k: u32) -> Self {
        self.lut_k = lut_k;
        self
    }

    /// Set the output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the tool paths.
    pub fn with_tools(mut self, tools: ToolPaths) -> Self {
        self.tools = tools;
        self
    }

    /// Build the effective config: defaults, then the optional file, then CLI flags.
    ///
    /// # Arguments
    /// * `file` - Optional TOML config file
    /// * `cli` - Command-line overrides, applied last
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or the merged
    /// config fails validation.
    pub fn load(file: Option<&Path>, cli: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = SynthConfig::default();

        if let Some(path) = file {
            let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            let parsed = Self::parse_file(&s).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            config.apply_file(parsed);
        }

        if let Some(k) = cli.lut_k {
            config.lut_k = k;
        }
        if let Some(dir) = cli.output_dir {
            config.output_dir = dir;
        }
        config.verbose = cli.verbose;

        config.validate()?;
        Ok(config)
    }

    fn parse_file(s: &str) -> Result<FileConfig, toml::de::Error> {
        toml::from_str(s)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(k) = file.lut_k {
            self.lut_k = k;
        }
        if let Some(dir) = file.output_dir {
            self.output_dir = dir;
        }
        if let Some(exts) = file.extensions {
            self.extensions = exts
                .into_iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect();
        }
        if let Some(tools) = file.tools {
            self.tools = tools;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lut_k == 0 {
            return Err(ConfigError::InvalidLutK);
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        self.tools.validate()
    }

    /// Whether `path` has one of the recognized source extensions.
    pub fn is_source_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let e = e.to_ascii_lowercase();
                self.extensions.iter().any(|x| *x == e)
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = SynthConfig::default();
        assert_eq!(cfg.lut_k, 6);
        assert_eq!(cfg.output_dir, PathBuf::from("build"));
        assert_eq!(cfg.tools.yosys, PathBuf::from("yosys"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synth-bench.toml");
        std::fs::write(
            &path,
            "lut_k = 4\noutput_dir = \"from-file\"\nextensions = [\".SV\"]\n\n[tools]\nyosys = \"/opt/yosys/bin/yosys\"\n",
        )
        .unwrap();

        let cfg = SynthConfig::load(
            Some(path.as_path()),
            CliOverrides { lut_k: Some(5), output_dir: None, verbose: true },
        )
        .unwrap();

        assert_eq!(cfg.lut_k, 5);
        assert_eq!(cfg.output_dir, PathBuf::from("from-file"));
        assert_eq!(cfg.extensions, vec!["sv".to_string()]);
        assert_eq!(cfg.tools.yosys, PathBuf::from("/opt/yosys/bin/yosys"));
        // unspecified tools keep their defaults
        assert_eq!(cfg.tools.circt_synth, PathBuf::from("circt-synth"));
        assert!(cfg.verbose);
    }

    #[test]
    fn test_zero_lut_k_rejected() {
        let err = SynthConfig::load(None, CliOverrides { lut_k: Some(0), ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLutK));
    }

    #[test]
    fn test_empty_tool_path_rejected() {
        let mut tools = ToolPaths::default();
        tools.circt_translate = PathBuf::new();
        let err = SynthConfig::default().with_tools(tools).validate().unwrap_err();
        assert_eq!(err.to_string(), "tool path for circt_translate cannot be empty");
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "lut_size = 4\n").unwrap();
        let err = SynthConfig::load(Some(path.as_path()), CliOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_is_source_file() {
        let cfg = SynthConfig::default();
        assert!(cfg.is_source_file(Path::new("rtl/top.sv")));
        assert!(cfg.is_source_file(Path::new("rtl/ALU.V")));
        assert!(!cfg.is_source_file(Path::new("rtl/top.vhd")));
        assert!(!cfg.is_source_file(Path::new("Makefile")));
    }
}
