//! File identifiers and byte-offset ranges within source files.

use serde::{Deserialize, Serialize};

/// Opaque identifier of a file loaded into the [`SourceDb`](crate::SourceDb).
///
/// Ids are dense indices assigned in load order and are only meaningful
/// within the database that issued them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// A sentinel id for synthetic spans with no backing file.
    pub const DUMMY: FileId = FileId(u32::MAX);

    /// Creates a `FileId` from a raw index. Intended for tests and
    /// deserialization; normal code receives ids from the database.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// A byte range within one source file. `start` is inclusive, `end`
/// exclusive.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// The file this span points into.
    pub file: FileId,
    /// Inclusive start offset.
    pub start: u32,
    /// Exclusive end offset.
    pub end: u32,
}

impl Span {
    /// A span pointing nowhere, for nodes with no concrete location.
    pub const DUMMY: Span = Span {
        file: FileId::DUMMY,
        start: 0,
        end: 0,
    };

    /// Creates a span over `start..end` in `file`.
    pub fn new(file: FileId, start: u32, end: u32) -> Self {
        Self { file, start, end }
    }

    /// Returns the smallest span covering both `self` and `other`.
    ///
    /// # Panics
    ///
    /// Panics if the spans come from different files.
    pub fn merge(self, other: Span) -> Span {
        assert_eq!(self.file, other.file, "spans from different files");
        Span {
            file: self.file,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the span covers zero bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_id_roundtrip() {
        assert_eq!(FileId::from_raw(3).as_raw(), 3);
        assert_ne!(FileId::DUMMY, FileId::from_raw(0));
    }

    #[test]
    fn merge_covers_both() {
        let f = FileId::from_raw(0);
        let m = Span::new(f, 4, 10).merge(Span::new(f, 8, 20));
        assert_eq!((m.start, m.end), (4, 20));
    }

    #[test]
    fn merge_is_commutative() {
        let f = FileId::from_raw(0);
        let a = Span::new(f, 1, 5);
        let b = Span::new(f, 3, 9);
        assert_eq!(a.merge(b), b.merge(a));
    }

    #[test]
    fn len_and_empty() {
        let f = FileId::from_raw(0);
        assert_eq!(Span::new(f, 2, 7).len(), 5);
        assert!(Span::new(f, 7, 7).is_empty());
    }

    #[test]
    fn serde_roundtrip() {
        let s = Span::new(FileId::from_raw(1), 10, 20);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(s, serde_json::from_str::<Span>(&json).unwrap());
    }
}
