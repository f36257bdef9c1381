//! Process runner trait and the `std::process` implementation.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

/// Exit status reported when a command could not be launched at all.
pub const LAUNCH_FAILURE_STATUS: i32 = -1;

/// A command line to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Working directory (inherits the current one when `None`)
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.to_string_lossy().into_owned())
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// File name of the program, used for labels and test matching.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.to_string_lossy().into_owned())
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let program = self.program.to_string_lossy();
        let parts = std::iter::once(program.as_ref()).chain(self.args.iter().map(String::as_str));
        match shlex::try_join(parts) {
            Ok(joined) => f.write_str(&joined),
            Err(_) => write!(f, "{} {}", program, self.args.join(" ")),
        }
    }
}

/// Captured result of one process execution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// A zero-status output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        ProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed output with the given status and stderr.
    pub fn failed(status: i32, stderr: impl Into<String>) -> Self {
        ProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Executes external commands.
///
/// Implementations must not fail: launch faults become a non-zero
/// [`ProcessOutput`].
pub trait ProcessRunner: Send + Sync {
    fn run(&self, cmd: &CommandSpec) -> ProcessOutput;
}

/// Runs commands with `std::process::Command`, blocking until exit.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    verbose: bool,
}

impl SystemRunner {
    pub fn new(verbose: bool) -> Self {
        SystemRunner { verbose }
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> ProcessOutput {
        debug!(command = %spec, "running");
        if let Some(ref cwd) = spec.cwd {
            debug!(cwd = %cwd.display(), "working directory");
        }

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(ref cwd) = spec.cwd {
            cmd.current_dir(cwd);
        }

        let output = match cmd.output() {
            Ok(o) => o,
            Err(e) => {
                let msg = if e.kind() == std::io::ErrorKind::NotFound {
                    format!("command not found: {}: {e}", spec.program.display())
                } else {
                    format!("error running {}: {e}", spec.program.display())
                };
                warn!(command = %spec, "{msg}");
                return ProcessOutput::failed(LAUNCH_FAILURE_STATUS, msg);
            }
        };

        // Killed by a signal: no exit code
        let status = output.status.code().unwrap_or(LAUNCH_FAILURE_STATUS);
        let result = ProcessOutput {
            status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.stderr.is_empty() {
            if !result.success() {
                warn!(command = %spec, status, stderr = %result.stderr.trim_end(), "command failed");
            } else if self.verbose {
                debug!(command = %spec, stderr = %result.stderr.trim_end(), "command stderr");
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_display_quotes_args() {
        let cmd = CommandSpec::new("yosys").arg("-s").arg("/tmp/my script.ys");
        let shown = cmd.to_string();
        assert!(shown.starts_with("yosys -s "));
        assert_eq!(
            shlex::split(&shown).unwrap(),
            vec!["yosys", "-s", "/tmp/my script.ys"]
        );
    }

    #[test]
    fn test_program_name() {
        let cmd = CommandSpec::new("/opt/circt/bin/circt-synth");
        assert_eq!(cmd.program_name(), "circt-synth");
    }

    #[test]
    fn test_missing_executable_is_failed_output() {
        let runner = SystemRunner::new(false);
        let out = runner.run(&CommandSpec::new("/nonexistent/definitely-not-a-tool"));
        assert_eq!(out.status, LAUNCH_FAILURE_STATUS);
        assert!(!out.success());
        assert!(out.stderr.contains("command not found"), "stderr: {}", out.stderr);
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout_stderr_and_status() {
        let runner = SystemRunner::new(true);
        let out = runner.run(
            &CommandSpec::new("sh")
                .arg("-c")
                .arg("echo out; echo err >&2; exit 3"),
        );
        assert_eq!(out.status, 3);
        assert_eq!(out.stdout, "out\n");
        assert_eq!(out.stderr, "err\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_respects_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let runner = SystemRunner::default();
        let out = runner.run(&CommandSpec::new("ls").current_dir(dir.path()));
        assert!(out.success());
        assert!(out.stdout.contains("marker.txt"));
    }
}
