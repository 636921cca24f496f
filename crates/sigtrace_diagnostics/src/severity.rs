//! Severity levels for diagnostics.

use serde::{Deserialize, Serialize};

/// How serious a diagnostic is.
///
/// Only [`Severity::Error`] makes a file invalid; warnings are informative
/// and never block the pipeline.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum Severity {
    /// Informational note.
    Note,
    /// Suspicious but acceptable input.
    Warning,
    /// Invalid input; the owning file fails.
    Error,
}
