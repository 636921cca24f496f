//! Design model and signal dependency analysis.
//!
//! The loader turns a normalized syntax tree into a [`Design`] of entities
//! and architectures; the analyzer walks each architecture's statements,
//! builds a boolean dependency matrix over its identifiers, closes it
//! transitively, and renders the in-port → out-port reachability as a DOT
//! graph.

#![warn(missing_docs)]

pub mod analyze;
pub mod dot;
pub mod errors;
pub mod loader;
pub mod matrix;
pub mod model;

pub use analyze::{analyze_architecture, DependencyAnalysis};
pub use errors::DesignError;
pub use loader::load_file;
pub use matrix::DepMatrix;
pub use model::{Architecture, Component, Design, DesignFile, Entity, Port, PortDirection, Signal};
