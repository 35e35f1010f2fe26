//! Reference scoping.
//!
//! The two reference categories resolve differently, and the asymmetry is
//! deliberate: a grammar's structural rule graph is resolved workspace-wide
//! (rules link across files transparently), while declared-type references
//! are import-scoped so unrelated grammars that happen to share type names
//! never couple by accident.

use indexmap::IndexSet;

use gramlab_core::{AstNodeDescription, EmptyScope, Scope, Uri};

use crate::parser::{SyntaxKind, SyntaxNode};
use crate::workspace::documents::GrammarDocument;
use crate::workspace::index::WorkspaceIndex;

/// What a reference occurrence may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceCategory {
    /// Interface, union, or inferred type: `extends X`, `[X]`, `returns X`,
    /// `{X}`, attribute types.
    AstType,
    /// Parser or terminal rule: plain rule calls and `[X:TOKEN]` tokens.
    Rule,
}

/// The category a reference node resolves in, or `None` for non-reference
/// nodes.
pub fn category_of(node: &SyntaxNode) -> Option<ReferenceCategory> {
    match node.kind() {
        SyntaxKind::TypeRef => Some(ReferenceCategory::AstType),
        SyntaxKind::RuleCall => Some(ReferenceCategory::Rule),
        _ => None,
    }
}

/// Builds the layered lookup chain for one document's references.
pub struct ScopeProvider<'a> {
    index: &'a WorkspaceIndex,
    /// URIs reachable through the document's imports, the document itself
    /// included.
    import_closure: IndexSet<Uri>,
}

impl<'a> ScopeProvider<'a> {
    pub fn new(index: &'a WorkspaceIndex, import_closure: IndexSet<Uri>) -> Self {
        Self {
            index,
            import_closure,
        }
    }

    /// The scope visible to `reference`: local precomputed layers over a
    /// lazily-queried global layer. Non-reference nodes get the empty scope.
    pub fn scope_for(
        &self,
        document: &GrammarDocument,
        reference: &SyntaxNode,
    ) -> Box<dyn Scope + '_> {
        match category_of(reference) {
            Some(ReferenceCategory::AstType) => {
                let closure = &self.import_closure;
                let global = IndexScope {
                    index: self.index,
                    keep: move |d: &AstNodeDescription| {
                        d.tag.is_ast_type() && closure.contains(&d.uri)
                    },
                };
                document.scopes.precomputed.scope_at_filtered(
                    reference,
                    Box::new(global),
                    |d| d.tag.is_ast_type(),
                )
            }
            Some(ReferenceCategory::Rule) => {
                let global = IndexScope {
                    index: self.index,
                    keep: |d: &AstNodeDescription| d.tag.is_rule(),
                };
                document.scopes.precomputed.scope_at_filtered(
                    reference,
                    Box::new(global),
                    |d| d.tag.is_rule(),
                )
            }
            None => Box::new(EmptyScope),
        }
    }
}

/// Lazy scope layer over the workspace index; nothing is materialized until
/// a lookup actually reaches this layer.
struct IndexScope<'a, F> {
    index: &'a WorkspaceIndex,
    keep: F,
}

impl<F: Fn(&AstNodeDescription) -> bool> Scope for IndexScope<'_, F> {
    fn element(&self, name: &str) -> Option<AstNodeDescription> {
        self.index
            .all_elements()
            .filter(|d| (self.keep)(d))
            .find(|d| d.name == name)
            .cloned()
    }

    fn all(&self) -> Box<dyn Iterator<Item = AstNodeDescription> + '_> {
        Box::new(
            self.index
                .all_elements()
                .filter(|d| (self.keep)(d))
                .cloned(),
        )
    }
}
