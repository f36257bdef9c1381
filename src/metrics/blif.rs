//! LUT counting in BLIF netlists.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

fn names_re() -> &'static Regex {
    static NAMES_RE: OnceLock<Regex> = OnceLock::new();
    // Safety: this regex literal is guaranteed to compile
    NAMES_RE.get_or_init(|| Regex::new(r"(?m)^\.names").unwrap())
}

/// Number of `.names` definitions (one per LUT).
///
/// Zero is reported as `None`: an empty netlist cannot be told apart from
/// one that was never written.
pub fn count_blif_luts(netlist: &str) -> Option<u64> {
    let count = names_re().find_iter(netlist).count() as u64;
    (count > 0).then_some(count)
}

/// Read a BLIF file and count its LUTs; unreadable files give `None`.
pub fn read_blif_lut_count(path: &Path) -> Option<u64> {
    match std::fs::read_to_string(path) {
        Ok(text) => count_blif_luts(&text),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "blif netlist not readable");
            None
        }
    }
}
