//! External process execution.
//!
//! Every tool invocation goes through a [`ProcessRunner`]. Runners never
//! return an error: a tool that is missing or cannot be started is reported
//! as a [`ProcessOutput`] with a non-zero status and the fault text in
//! `stderr`, so flows treat it exactly like a tool that ran and failed.

pub mod runner;
pub mod scripted;

// Re-export key types
pub use runner::{CommandSpec, LAUNCH_FAILURE_STATUS, ProcessOutput, ProcessRunner, SystemRunner};
pub use scripted::ScriptedRunner;
