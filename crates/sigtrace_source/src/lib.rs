//! Source file management and span tracking for the sigtrace pipeline.
//!
//! The [`SourceDb`] owns the text of every VHDL file loaded into a run.
//! Tokens and tree nodes reference source locations through [`Span`] (a
//! [`FileId`] plus a byte range), which the database resolves back to
//! 1-based line/column coordinates for diagnostics and for the `line`
//! attribute carried by syntax tree nodes.

#![warn(missing_docs)]

pub mod db;
pub mod file;
pub mod span;

pub use db::{ResolvedSpan, SourceDb};
pub use file::SourceFile;
pub use span::{FileId, Span};
