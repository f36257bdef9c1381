//! Metric extraction from tool outputs.
//!
//! One parser per output shape. Every parser is total: missing files,
//! malformed documents and absent patterns all yield `None`, never an error.

pub mod abc_log;
pub mod blif;
pub mod longest_path;

pub use abc_log::{parse_abc_levels, read_abc_levels};
pub use blif::{count_blif_luts, read_blif_lut_count};
pub use longest_path::{parse_longest_path, read_longest_path};
