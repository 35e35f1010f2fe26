//! Phase 2 reference resolution.
//!
//! Walks every reference occurrence in a document, asks the scope provider
//! for the visible scope, and records the resolved edges. Resolution
//! failures become diagnostics, never errors; a document with dangling
//! references still links everything else.

use gramlab_core::diagnostics::{DiagnosticKind, Diagnostics};
use gramlab_core::ReferenceDescription;

use crate::parser::ast::path_of;
use crate::parser::cst::SyntaxKind;
use crate::parser::SyntaxToken;
use crate::scope::provider::{category_of, ReferenceCategory, ScopeProvider};
use crate::typemodel::Primitive;
use crate::workspace::documents::GrammarDocument;

/// Everything phase 2 produces for one document.
#[derive(Debug, Default)]
pub struct LinkOutcome {
    pub references: Vec<ReferenceDescription>,
    pub diagnostics: Diagnostics,
}

/// Resolve all references of `document` against the provider's scopes.
pub fn link(document: &GrammarDocument, provider: &ScopeProvider<'_>) -> LinkOutcome {
    let mut outcome = LinkOutcome::default();

    for node in document.root.as_cst().descendants() {
        let Some(category) = category_of(&node) else {
            continue;
        };
        let Some(name) = reference_name(&node) else {
            continue;
        };
        // Primitive type names are built in, not declarations.
        if category == ReferenceCategory::AstType && Primitive::from_name(name.text()).is_some() {
            continue;
        }

        let scope = provider.scope_for(document, &node);
        match scope.element(name.text()) {
            Some(target) => {
                let local = target.uri == document.uri;
                outcome.references.push(ReferenceDescription {
                    source_uri: document.uri.clone(),
                    source_path: path_of(&node),
                    source_range: name.text_range(),
                    target_uri: target.uri,
                    target_path: target.path,
                    local,
                });
            }
            None => {
                outcome
                    .diagnostics
                    .report(DiagnosticKind::UnresolvedReference, name.text_range())
                    .message(name.text())
                    .emit();
            }
        }
    }

    outcome
}

fn reference_name(node: &crate::parser::SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == SyntaxKind::Id)
}
