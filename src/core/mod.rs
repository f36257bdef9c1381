//! Core types for synth-bench.
//!
//! This module contains the per-flow result record shared by every strategy
//! and the environment information embedded in reports.

pub mod env;
pub mod schema;

// Re-export key types for convenience
pub use env::EnvironmentInfo;
pub use schema::{FlowMetrics, FlowResult, Strategy};
