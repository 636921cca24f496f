//! Terminal rendering of diagnostics.

use crate::diagnostic::Diagnostic;
use sigtrace_source::SourceDb;
use std::io::Write;

/// Renders diagnostics one per line as `<file>:<line>:<message>`.
///
/// The span's byte offset is resolved to a 1-based line number through the
/// [`SourceDb`]; the column is deliberately omitted to keep the format
/// grep-friendly and stable.
pub struct TerminalRenderer;

impl TerminalRenderer {
    /// Formats one diagnostic as a `<file>:<line>:<message>` line.
    pub fn format(diag: &Diagnostic, db: &SourceDb) -> String {
        let resolved = db.resolve_span(diag.span);
        format!(
            "{}:{}:{}",
            resolved.path.display(),
            resolved.line,
            diag.message
        )
    }

    /// Writes every diagnostic to `out`, one line each.
    pub fn render_all(
        diags: &[Diagnostic],
        db: &SourceDb,
        out: &mut impl Write,
    ) -> std::io::Result<()> {
        for diag in diags {
            writeln!(out, "{}", Self::format(diag, db))?;
        }
        Ok(())
    }
}
