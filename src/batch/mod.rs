//! Batch comparison over a directory of designs.

pub mod discovery;
pub mod driver;

pub use discovery::discover_inputs;
pub use driver::{
    BatchRun, BatchSummary, FileOutcome, FileRecord, OverallSpeedup, WinTally, record_key, run_batch,
};
