//! Shared plumbing for the three sigtrace executables.
//!
//! Each tool takes one or more files, processes them independently, and
//! keeps going after a per-file failure. A failure is reported on stderr
//! and turns the final exit code non-zero; it never stops the remaining
//! arguments from being processed.

#![warn(missing_docs)]

use std::path::{Path, PathBuf};

/// Runs `process` over every file, reporting failures per file.
///
/// Returns the process exit code: 0 when every file succeeded, 1
/// otherwise.
pub fn run_over_files<E: std::fmt::Display>(
    files: &[PathBuf],
    mut process: impl FnMut(&Path) -> Result<(), E>,
) -> i32 {
    let mut failed = false;
    for path in files {
        if let Err(e) = process(path) {
            eprintln!("{}: {e}", path.display());
            failed = true;
        }
    }
    if failed {
        1
    } else {
        0
    }
}

/// Strips `suffix` from a path's file name, checking it is actually
/// there. Returns the path without the suffix.
pub fn strip_suffix(path: &Path, suffix: &str) -> Option<PathBuf> {
    let s = path.to_str()?;
    let stripped = s.strip_suffix(suffix)?;
    if stripped.is_empty() {
        return None;
    }
    Some(PathBuf::from(stripped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_suffix_removes_extension() {
        assert_eq!(
            strip_suffix(Path::new("top.vhd.xml"), ".xml"),
            Some(PathBuf::from("top.vhd"))
        );
        assert_eq!(
            strip_suffix(Path::new("top.vhd.optim.xml"), ".optim.xml"),
            Some(PathBuf::from("top.vhd"))
        );
    }

    #[test]
    fn strip_suffix_rejects_wrong_or_bare_names() {
        assert_eq!(strip_suffix(Path::new("top.vhd"), ".xml"), None);
        assert_eq!(strip_suffix(Path::new(".xml"), ".xml"), None);
    }

    #[test]
    fn run_over_files_continues_after_failure() {
        let files = vec![PathBuf::from("a"), PathBuf::from("b"), PathBuf::from("c")];
        let mut seen = Vec::new();
        let code = run_over_files(&files, |p| {
            seen.push(p.to_path_buf());
            if p == Path::new("b") {
                Err("boom")
            } else {
                Ok(())
            }
        });
        assert_eq!(code, 1);
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn run_over_files_success_is_zero() {
        let files = vec![PathBuf::from("a")];
        let code = run_over_files(&files, |_| Ok::<(), &str>(()));
        assert_eq!(code, 0);
    }
}
