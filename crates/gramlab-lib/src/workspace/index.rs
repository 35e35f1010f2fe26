//! Cross-document registry of exports and resolved reference edges.
//!
//! An explicit, injectable store keyed by document URI. Callers own its
//! lifetime and drive the `update`/`remove` lifecycle around document
//! changes; there is no ambient singleton. An entry is replaced atomically,
//! never read half-written.

use indexmap::IndexMap;
use tracing::{debug, trace};

use gramlab_core::{AstNodeDescription, DescriptionTag, NodePath, ReferenceDescription, Uri};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct IndexEntry {
    exports: Vec<AstNodeDescription>,
    references: Vec<ReferenceDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceIndex {
    entries: IndexMap<Uri, IndexEntry>,
}

impl WorkspaceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for `uri` with fresh exports. Outgoing references
    /// recorded for the previous parse are dropped; phase 2 re-records them.
    pub fn update_document(&mut self, uri: Uri, exports: Vec<AstNodeDescription>) {
        debug!(uri = %uri, exports = exports.len(), "updating index entry");
        self.entries.insert(
            uri,
            IndexEntry {
                exports,
                references: Vec::new(),
            },
        );
    }

    /// Record the outgoing references of `uri` after resolution.
    pub fn record_references(&mut self, uri: &Uri, references: Vec<ReferenceDescription>) {
        trace!(uri = %uri, references = references.len(), "recording references");
        if let Some(entry) = self.entries.get_mut(uri) {
            entry.references = references;
        }
    }

    pub fn remove_document(&mut self, uri: &Uri) {
        if self.entries.shift_remove(uri).is_some() {
            debug!(uri = %uri, "removed index entry");
        }
    }

    pub fn contains(&self, uri: &Uri) -> bool {
        self.entries.contains_key(uri)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Uri> {
        self.entries.keys()
    }

    pub fn exports_of(&self, uri: &Uri) -> &[AstNodeDescription] {
        self.entries
            .get(uri)
            .map_or(&[], |entry| entry.exports.as_slice())
    }

    pub fn references_of(&self, uri: &Uri) -> &[ReferenceDescription] {
        self.entries
            .get(uri)
            .map_or(&[], |entry| entry.references.as_slice())
    }

    /// All exported descriptions across the workspace, in document insertion
    /// order, lazily.
    pub fn all_elements(&self) -> impl Iterator<Item = &AstNodeDescription> {
        self.entries.values().flat_map(|entry| entry.exports.iter())
    }

    /// All exported descriptions carrying `tag`.
    pub fn all_elements_tagged(
        &self,
        tag: DescriptionTag,
    ) -> impl Iterator<Item = &AstNodeDescription> {
        self.all_elements().filter(move |d| d.tag == tag)
    }

    pub fn all_references(&self) -> impl Iterator<Item = &ReferenceDescription> {
        self.entries
            .values()
            .flat_map(|entry| entry.references.iter())
    }

    /// All reference edges pointing at the declaration identified by
    /// `uri` + `path`, lazily.
    pub fn find_all_references<'a>(
        &'a self,
        uri: &'a Uri,
        path: &'a NodePath,
    ) -> impl Iterator<Item = &'a ReferenceDescription> + 'a {
        self.all_references()
            .filter(move |r| &r.target_uri == uri && &r.target_path == path)
    }
}
