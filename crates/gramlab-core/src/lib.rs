//! Core contracts for the gramlab workbench.
//!
//! Everything the semantic passes and their consumers exchange lives here:
//! - `descriptions` - document URIs, node paths, declaration and reference
//!   descriptions (the serializable stand-ins for AST nodes)
//! - `scope` - the layered name-lookup contract
//! - `diagnostics` - kinds, collection, and rendering

pub mod descriptions;
pub mod diagnostics;
pub mod scope;

pub use descriptions::{AstNodeDescription, DescriptionTag, NodePath, ReferenceDescription, Uri};
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use scope::{EmptyScope, Scope, StreamScope};
