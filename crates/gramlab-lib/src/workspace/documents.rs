//! One parsed grammar document and its per-parse caches.

use gramlab_core::diagnostics::Diagnostics;
use gramlab_core::Uri;

use crate::parser::{self, Root};
use crate::scope::computation::{self, ScopeComputation};
use crate::typemodel::{self, TypeModel};

/// A parsed document with everything phase 1 derives from it. All fields
/// are rebuilt wholesale on re-parse; nothing is patched in place.
#[derive(Debug)]
pub struct GrammarDocument {
    pub uri: Uri,
    pub source: String,
    pub root: Root,
    /// Import target URIs, resolved against this document's own URI, in
    /// declaration order.
    pub imports: Vec<Uri>,
    pub type_model: TypeModel,
    pub scopes: ScopeComputation,
    pub parse_diagnostics: Diagnostics,
    /// Filled by the linker (phase 2) and the validator.
    pub semantic_diagnostics: Diagnostics,
}

impl GrammarDocument {
    /// Phase 1: parse, build the type model, compute scopes and exports.
    pub fn build(uri: Uri, source: impl Into<String>) -> Self {
        let source = source.into();
        let parsed = parser::parse(&source);
        let imports = parsed
            .root
            .imports()
            .filter_map(|import| import.path())
            .map(|path| uri.resolve(&path))
            .collect();
        let type_model = typemodel::build(&parsed.root);
        let scopes = computation::compute(&uri, &parsed.root);
        Self {
            uri,
            source,
            root: parsed.root,
            imports,
            type_model,
            scopes,
            parse_diagnostics: parsed.diagnostics,
            semantic_diagnostics: Diagnostics::new(),
        }
    }

    /// All diagnostics for this document, parse errors first.
    pub fn diagnostics(&self) -> impl Iterator<Item = &gramlab_core::diagnostics::Diagnostic> {
        self.parse_diagnostics
            .iter()
            .chain(self.semantic_diagnostics.iter())
    }
}
