//! Database of all source files in one tool invocation.

use crate::file::SourceFile;
use crate::span::{FileId, Span};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Owns the text of every loaded source file and resolves [`Span`]s to
/// human-readable coordinates.
pub struct SourceDb {
    files: Vec<SourceFile>,
}

impl SourceDb {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Reads a file from disk and registers it, returning its id.
    pub fn load_file(&mut self, path: &Path) -> Result<FileId, io::Error> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.insert(path.to_path_buf(), content))
    }

    /// Registers an in-memory source under a synthetic name.
    pub fn add_source(&mut self, name: impl Into<PathBuf>, content: String) -> FileId {
        self.insert(name.into(), content)
    }

    fn insert(&mut self, path: PathBuf, content: String) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32);
        self.files.push(SourceFile::new(id, path, content));
        id
    }

    /// Returns the file for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this database.
    pub fn get_file(&self, id: FileId) -> &SourceFile {
        &self.files[id.as_raw() as usize]
    }

    /// Resolves a span to path plus 1-based line/column coordinates.
    pub fn resolve_span(&self, span: Span) -> ResolvedSpan {
        let file = self.get_file(span.file);
        let (line, col) = file.line_col(span.start);
        ResolvedSpan {
            path: file.path.clone(),
            line,
            col,
        }
    }

    /// Returns the source text under a span.
    pub fn snippet(&self, span: Span) -> &str {
        self.get_file(span.file).snippet(span.start, span.end)
    }
}

impl Default for SourceDb {
    fn default() -> Self {
        Self::new()
    }
}

/// A span resolved to its file path and 1-based line/column position.
///
/// Displays as `path:line:col`, the prefix format of every diagnostic
/// line the tools print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// Path of the source file.
    pub path: PathBuf,
    /// 1-based line of the span start.
    pub line: u32,
    /// 1-based column of the span start.
    pub col: u32,
}

impl fmt::Display for ResolvedSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_get() {
        let mut db = SourceDb::new();
        let id = db.add_source("a.vhd", "entity a is end;".to_string());
        assert_eq!(db.get_file(id).content, "entity a is end;");
    }

    #[test]
    fn ids_are_sequential() {
        let mut db = SourceDb::new();
        let a = db.add_source("a.vhd", String::new());
        let b = db.add_source("b.vhd", String::new());
        assert_eq!(a.as_raw(), 0);
        assert_eq!(b.as_raw(), 1);
    }

    #[test]
    fn resolve_span_to_line_col() {
        let mut db = SourceDb::new();
        let id = db.add_source("t.vhd", "abc\ndef".to_string());
        let r = db.resolve_span(Span::new(id, 4, 7));
        assert_eq!(r.line, 2);
        assert_eq!(r.col, 1);
        assert_eq!(format!("{r}"), "t.vhd:2:1");
    }

    #[test]
    fn snippet_of_span() {
        let mut db = SourceDb::new();
        let id = db.add_source("t.vhd", "signal s : bit;".to_string());
        assert_eq!(db.snippet(Span::new(id, 0, 6)), "signal");
    }

    #[test]
    fn load_file_missing_is_io_error() {
        let mut db = SourceDb::new();
        assert!(db.load_file(Path::new("/nonexistent/x.vhd")).is_err());
    }
}
