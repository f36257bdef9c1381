//! ABC statistics lines in Yosys logs.
//!
//! `print_stats` emits lines such as
//! `ABC: netlist : i/o = 10/ 4  lat = 0  nd = 23  edge = 80  area = 23  delay = 3.00  lev = 3`.
//! Successive optimisation passes print one line each; the last one is the
//! final mapped depth.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

fn netlist_re() -> &'static Regex {
    static NETLIST_RE: OnceLock<Regex> = OnceLock::new();
    // Safety: this regex literal is guaranteed to compile
    NETLIST_RE.get_or_init(|| Regex::new(r"ABC: netlist\s*:\s*.*?\s+lev\s*=\s*(\d+)").unwrap())
}

/// Depth from the last ABC netlist statistics line, if any.
pub fn parse_abc_levels(log: &str) -> Option<u64> {
    netlist_re()
        .captures_iter(log)
        .filter_map(|c| c.get(1)?.as_str().parse().ok())
        .last()
}

/// Read a log file and parse it; unreadable files give `None`.
pub fn read_abc_levels(path: &Path) -> Option<u64> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_abc_levels(&text),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "yosys log not readable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_line(lev: u32) -> String {
        format!(
            "ABC: netlist                       : i/o =   10/    4  lat =    0  nd =    23  edge =     80  area =    23.00  delay =  {lev}.00  lev = {lev}\n"
        )
    }

    #[test]
    fn test_last_match_wins() {
        // 9 is neither the first, the smallest nor the largest
        let log = format!(
            "3.1. Executing ABC pass\n{}ABC: + if -K 6\n{}{}End of script.\n",
            stats_line(12),
            stats_line(7),
            stats_line(9)
        );
        assert_eq!(parse_abc_levels(&log), Some(9));
    }

    #[test]
    fn test_last_match_even_when_larger() {
        let log = [stats_line(12), stats_line(9), stats_line(15)].concat();
        assert_eq!(parse_abc_levels(&log), Some(15));
    }

    #[test]
    fn test_compact_spacing() {
        assert_eq!(parse_abc_levels("ABC: netlist: i/o = 1/1 lev=4"), Some(4));
    }

    #[test]
    fn test_no_match_is_absent() {
        assert_eq!(parse_abc_levels(""), None);
        assert_eq!(parse_abc_levels("ABC: netlist : i/o = 1/1 nd = 2"), None);
        assert_eq!(parse_abc_levels("Yosys 0.38\nEnd of script."), None);
    }

    #[test]
    fn test_missing_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_abc_levels(&dir.path().join("missing.log")), None);
    }
}
