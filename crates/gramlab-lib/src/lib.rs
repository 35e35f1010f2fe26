//! Grammar-language workbench core.
//!
//! Takes `.gx` grammar sources through the full pipeline: lossless parse,
//! AST type inference, scope computation, cross-document linking, and
//! validation. The [`workspace::Workspace`] facade ties the stages
//! together; each stage is also usable on its own.

pub mod parser;
pub mod scope;
pub mod typemodel;
pub mod validate;
pub mod workspace;

use gramlab_core::Uri;

/// Failures of workspace-level operations. Anything scoped to a single
/// document (parse errors, unresolved references, validation findings) is
/// reported as diagnostics instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The build observed its cancel token between two documents.
    #[error("build cancelled")]
    Cancelled,
    #[error("unknown document `{0}`")]
    UnknownDocument(Uri),
}
