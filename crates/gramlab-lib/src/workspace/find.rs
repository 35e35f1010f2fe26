//! Declaration and reference lookup over a linked workspace.

use rowan::TextSize;

use gramlab_core::{AstNodeDescription, ReferenceDescription, Uri};

use crate::workspace::documents::GrammarDocument;
use crate::workspace::index::WorkspaceIndex;

/// Options for [`find_references`].
#[derive(Debug, Clone, Default)]
pub struct FindReferencesOptions {
    /// Restrict results to edges originating in this document.
    pub source_uri: Option<Uri>,
    /// Prepend a synthetic edge for the declaration itself.
    pub include_declaration: bool,
}

/// The declaration under `offset` in `document`.
///
/// An offset inside a reference follows the recorded edge to its target; an
/// offset inside a declaration's name returns that declaration. `None`
/// when the offset hits neither, including when the reference under it
/// never resolved.
pub fn find_declaration(
    index: &WorkspaceIndex,
    document: &GrammarDocument,
    offset: TextSize,
) -> Option<AstNodeDescription> {
    if let Some(edge) = index
        .references_of(&document.uri)
        .iter()
        .find(|r| r.source_range.contains(offset))
    {
        if let Some(target) = index
            .exports_of(&edge.target_uri)
            .iter()
            .find(|d| d.path == edge.target_path)
        {
            return Some(target.clone());
        }
        // Local targets may live only in the precomputed scopes, e.g. the
        // type introduced by an inferring action.
        if edge.target_uri == document.uri {
            return document
                .scopes
                .precomputed
                .descriptions()
                .find(|d| d.path == edge.target_path)
                .cloned();
        }
        return None;
    }

    document
        .scopes
        .precomputed
        .descriptions()
        .find(|d| d.name_range.contains(offset))
        .cloned()
}

/// All recorded edges pointing at `target`, in index order.
pub fn find_references(
    index: &WorkspaceIndex,
    target: &AstNodeDescription,
    options: &FindReferencesOptions,
) -> Vec<ReferenceDescription> {
    let mut out = Vec::new();
    if options.include_declaration {
        out.push(ReferenceDescription {
            source_uri: target.uri.clone(),
            source_path: target.path.clone(),
            source_range: target.name_range,
            target_uri: target.uri.clone(),
            target_path: target.path.clone(),
            local: true,
        });
    }
    out.extend(
        index
            .find_all_references(&target.uri, &target.path)
            .filter(|r| match &options.source_uri {
                Some(uri) => &r.source_uri == uri,
                None => true,
            })
            .cloned(),
    );
    out
}
