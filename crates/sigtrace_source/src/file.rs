//! A single loaded source file with precomputed line offsets.

use crate::span::FileId;
use std::path::PathBuf;

/// One source file held by the [`SourceDb`](crate::SourceDb).
///
/// Line starts are computed once at load time so that byte offsets can be
/// mapped to 1-based line/column pairs with a binary search.
pub struct SourceFile {
    /// Identifier of this file within its database.
    pub id: FileId,
    /// Path the file was loaded from (or a synthetic name for in-memory
    /// sources used by tests).
    pub path: PathBuf,
    /// Full text of the file.
    pub content: String,
    line_starts: Vec<u32>,
}

impl SourceFile {
    /// Builds a `SourceFile`, indexing its line starts.
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let line_starts = line_starts(&content);
        Self {
            id,
            path,
            content,
            line_starts,
        }
    }

    /// Maps a byte offset to 1-based `(line, column)` coordinates.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        (idx as u32 + 1, offset - self.line_starts[idx] + 1)
    }

    /// Maps a byte offset to its 1-based line number.
    pub fn line_of(&self, offset: u32) -> u32 {
        self.line_col(offset).0
    }

    /// Returns the text between two byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }
}

fn line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, b) in content.bytes().enumerate() {
        if b == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}
