//! Scripted process runner for testing.

use std::sync::Mutex;

use super::runner::{CommandSpec, LAUNCH_FAILURE_STATUS, ProcessOutput, ProcessRunner};

type Responder = Box<dyn Fn(&CommandSpec) -> ProcessOutput + Send + Sync>;

/// Process runner that answers from configured responders instead of
/// spawning processes, and records every invocation.
///
/// Responders are matched on the program's file name. A program with no
/// responder behaves like a missing executable.
#[derive(Default)]
pub struct ScriptedRunner {
    responders: Vec<(String, Responder)>,
    invocations: Mutex<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `program` with a custom closure.
    ///
    /// The closure may create files named in the arguments to simulate tool
    /// outputs.
    pub fn on<F>(mut self, program: impl Into<String>, f: F) -> Self
    where
        F: Fn(&CommandSpec) -> ProcessOutput + Send + Sync + 'static,
    {
        self.responders.push((program.into(), Box::new(f)));
        self
    }

    /// Make `program` exit 0 with the given stdout.
    pub fn succeed(self, program: impl Into<String>, stdout: &str) -> Self {
        let stdout = stdout.to_string();
        self.on(program, move |_| ProcessOutput::ok(stdout.clone()))
    }

    /// Make `program` exit with `status` and the given stderr.
    pub fn fail(self, program: impl Into<String>, status: i32, stderr: &str) -> Self {
        let stderr = stderr.to_string();
        self.on(program, move |_| ProcessOutput::failed(status, stderr.clone()))
    }

    /// All recorded invocations in call order.
    pub fn invocations(&self) -> Vec<CommandSpec> {
        self.invocations
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Program names of recorded invocations in call order.
    pub fn programs(&self) -> Vec<String> {
        self.invocations().iter().map(CommandSpec::program_name).collect()
    }

    pub fn invocation_count(&self) -> usize {
        self.invocations.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, cmd: &CommandSpec) -> ProcessOutput {
        self.invocations
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(cmd.clone());

        let name = cmd.program_name();
        match self.responders.iter().find(|(p, _)| *p == name) {
            Some((_, respond)) => respond(cmd),
            None => ProcessOutput::failed(
                LAUNCH_FAILURE_STATUS,
                format!("command not found: {}", cmd.program.display()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_invocations_in_order() {
        let runner = ScriptedRunner::new().succeed("a", "").succeed("b", "");
        runner.run(&CommandSpec::new("b"));
        runner.run(&CommandSpec::new("/usr/bin/a").arg("-x"));
        assert_eq!(runner.programs(), vec!["b", "a"]);
        assert_eq!(runner.invocations()[1].args, vec!["-x"]);
    }

    #[test]
    fn test_unknown_program_is_launch_failure() {
        let runner = ScriptedRunner::new();
        let out = runner.run(&CommandSpec::new("yosys"));
        assert_eq!(out.status, LAUNCH_FAILURE_STATUS);
        assert!(out.stderr.contains("command not found"));
        assert_eq!(runner.invocation_count(), 1);
    }

    #[test]
    fn test_fail_responder() {
        let runner = ScriptedRunner::new().fail("circt-synth", 2, "bad input");
        let out = runner.run(&CommandSpec::new("circt-synth"));
        assert_eq!(out, ProcessOutput::failed(2, "bad input"));
    }
}
