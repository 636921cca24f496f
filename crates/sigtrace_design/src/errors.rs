//! Errors raised while loading or analyzing a design.

/// A structural failure in the design model or the analysis walk.
///
/// These are distinct from lexer/parser diagnostics: they mean the tree
/// itself (usually a hand-edited or truncated file) does not have the
/// shape the pipeline guarantees, and the affected file cannot be
/// analyzed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DesignError {
    /// An architecture names an entity that is not in the same file.
    #[error("architecture '{architecture}' refers to unknown entity '{entity}'")]
    UnknownEntity {
        /// The architecture's name.
        architecture: String,
        /// The missing entity's name.
        entity: String,
    },

    /// A subtree the analyzer relies on is absent.
    #[error("missing '{0}' subtree")]
    MissingChild(&'static str),

    /// The file holds no architecture to analyze.
    #[error("no architecture in '{0}'")]
    NoArchitecture(String),
}
