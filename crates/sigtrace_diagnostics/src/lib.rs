//! Diagnostic accumulation and rendering for the sigtrace tools.
//!
//! Lexing and parsing never abort on user errors; they emit structured
//! [`Diagnostic`]s into a [`DiagnosticSink`] and keep going so one run can
//! surface every problem in a file. The [`TerminalRenderer`] prints each
//! diagnostic as a single `<file>:<line>:<message>` line on stderr.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::TerminalRenderer;
pub use severity::Severity;
pub use sink::DiagnosticSink;
