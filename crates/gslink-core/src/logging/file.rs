//! Log file that keeps the tail of the previous run.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Upper bound on how much of the previous run's log is carried over (1 MiB).
pub const MAX_PREVIOUS_LOG_BYTES: usize = 1024 * 1024;

/// Line written between the carried-over log and the current run.
pub const RUN_SEPARATOR: &str = "-----\n";

/// Return the part of a previous log worth keeping.
///
/// Logs no longer than `max` are kept whole. Longer ones keep their last
/// `max` bytes, minus the partial line at the cut.
#[must_use]
pub fn tail_previous_log(old: &[u8], max: usize) -> &[u8] {
    if old.len() <= max {
        return old;
    }
    let tail = &old[old.len() - max..];
    match tail.iter().position(|&b| b == b'\n') {
        Some(idx) => &tail[idx + 1..],
        None => &[],
    }
}

/// Open `path` for a new run: create missing parents, keep the previous
/// tail plus a separator, and leave the handle positioned for appending.
pub fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let old = match fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e),
    };

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;

    if let Some(old) = old {
        file.write_all(tail_previous_log(&old, MAX_PREVIOUS_LOG_BYTES))?;
        file.write_all(RUN_SEPARATOR.as_bytes())?;
    }
    Ok(file)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_log_kept_whole() {
        assert_eq!(tail_previous_log(b"a\nb\n", 100), b"a\nb\n");
    }

    #[test]
    fn long_log_cut_at_line_boundary() {
        // last 6 bytes are "3\n4444" -> drop the partial "3\n" line
        let old = b"1111\n2222\n3\n4444";
        assert_eq!(tail_previous_log(old, 6), b"4444");
    }

    #[test]
    fn cut_exactly_after_newline_drops_next_line() {
        // tail is "bb\ncc\n"; the first complete line after the cut starts at "cc"
        let old = b"aa\nbb\ncc\n";
        assert_eq!(tail_previous_log(old, 6), b"cc\n");
    }

    #[test]
    fn long_line_without_newline_is_dropped() {
        assert_eq!(tail_previous_log(b"xxxxxxxxxx", 4), b"");
    }

    #[test]
    fn new_file_has_no_separator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("log.txt");
        let mut file = open_log_file(&path).unwrap();
        file.write_all(b"first run\n").unwrap();
        drop(file);
        assert_eq!(fs::read_to_string(&path).unwrap(), "first run\n");
    }

    #[test]
    fn second_run_keeps_previous_with_separator() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, "first run\n").unwrap();

        let mut file = open_log_file(&path).unwrap();
        file.write_all(b"second run\n").unwrap();
        drop(file);

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "first run\n-----\nsecond run\n"
        );
    }
}
