//! Fail-fast stage sequencing.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::process::{CommandSpec, ProcessOutput, ProcessRunner};

use super::transcript::{Transcript, write_tool_log};

/// A stage that exited non-zero (or could not be launched).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage} failed: {detail}")]
pub struct StageFailure {
    pub stage: String,
    pub status: i32,
    detail: String,
}

impl StageFailure {
    pub fn new(stage: impl Into<String>, output: &ProcessOutput) -> Self {
        let stderr = output.stderr.trim_end();
        let detail = if stderr.is_empty() {
            format!("exit status {}", output.status)
        } else {
            stderr.to_string()
        };
        StageFailure {
            stage: stage.into(),
            status: output.status,
            detail,
        }
    }
}

/// Anything that aborts a flow.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Stage(#[from] StageFailure),
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl FlowError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        FlowError::Io { context: context.into(), source }
    }
}

/// Runs the stages of one flow in order and times the whole sequence.
///
/// The clock starts at [`StageSequence::start`], so `elapsed` covers every
/// stage that ran, including a failing one.
pub struct StageSequence<'a> {
    runner: &'a dyn ProcessRunner,
    transcript: Transcript,
    started: Instant,
    stages_run: usize,
}

impl<'a> StageSequence<'a> {
    pub fn start(runner: &'a dyn ProcessRunner, transcript_path: impl Into<PathBuf>) -> Self {
        StageSequence {
            runner,
            transcript: Transcript::create(transcript_path),
            started: Instant::now(),
            stages_run: 0,
        }
    }

    /// Run one stage. A non-zero exit becomes `Err(StageFailure)`.
    pub fn run(&mut self, stage: &str, cmd: &CommandSpec) -> Result<ProcessOutput, StageFailure> {
        let output = self.invoke(stage, cmd);
        Self::check(stage, output)
    }

    /// Like [`run`](Self::run), and also saves stdout+stderr to `log_path`
    /// before checking the status, so failed runs keep their log.
    pub fn run_logged(
        &mut self,
        stage: &str,
        cmd: &CommandSpec,
        log_path: &Path,
    ) -> Result<ProcessOutput, StageFailure> {
        let output = self.invoke(stage, cmd);
        if let Err(e) = write_tool_log(log_path, &output) {
            warn!(path = %log_path.display(), error = %e, "failed to save tool log");
        }
        Self::check(stage, output)
    }

    fn invoke(&mut self, stage: &str, cmd: &CommandSpec) -> ProcessOutput {
        info!(stage, "running stage");
        self.stages_run += 1;
        let output = self.runner.run(cmd);
        if !output.stdout.is_empty() {
            debug!(stage, stdout = %output.stdout.trim_end(), "stage stdout");
        }
        self.transcript.record(stage, cmd, &output);
        output
    }

    fn check(stage: &str, output: ProcessOutput) -> Result<ProcessOutput, StageFailure> {
        if output.success() {
            Ok(output)
        } else {
            Err(StageFailure::new(stage, &output))
        }
    }

    /// Time since the sequence started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Number of stages invoked so far.
    pub fn stages_run(&self) -> usize {
        self.stages_run
    }

    /// Where this sequence records its stage commands.
    pub fn transcript_path(&self) -> &Path {
        self.transcript.path()
    }
}
