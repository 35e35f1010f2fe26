//! Multi-document workspace and the two-phase build.
//!
//! Phase 1 parses each changed document and derives everything local to it
//! (type model, exports, precomputed scopes), publishing the exports to the
//! index one document at a time. Phase 2 resolves references and validates
//! every document against the complete index. Cancellation is checked
//! between documents, never inside one, so the index only ever holds whole
//! entries.

pub mod documents;
pub mod find;
pub mod index;
pub mod linker;


use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use rowan::TextSize;
use tracing::debug;

use gramlab_core::diagnostics::Diagnostics;
use gramlab_core::{AstNodeDescription, ReferenceDescription, Uri};

use crate::scope::provider::ScopeProvider;
use crate::validate;
use crate::Error;

use documents::GrammarDocument;
use find::FindReferencesOptions;
use index::WorkspaceIndex;

/// Cooperative cancellation flag, shared between the build and whoever may
/// want to interrupt it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// All documents under management plus the shared index.
#[derive(Debug, Default)]
pub struct Workspace {
    documents: IndexMap<Uri, GrammarDocument>,
    /// Sources added or changed since the last completed phase 1.
    pending: IndexMap<Uri, String>,
    index: WorkspaceIndex,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document's source. Takes effect at the next [`build`](Self::build).
    pub fn add_document(&mut self, uri: Uri, source: impl Into<String>) {
        self.pending.insert(uri, source.into());
    }

    /// Drop a document. Its exports leave the index immediately; edges into
    /// it from other documents dangle until their next build.
    pub fn remove_document(&mut self, uri: &Uri) {
        self.pending.shift_remove(uri);
        self.documents.shift_remove(uri);
        self.index.remove_document(uri);
    }

    pub fn document(&self, uri: &Uri) -> Option<&GrammarDocument> {
        self.documents.get(uri)
    }

    pub fn documents(&self) -> impl Iterator<Item = &GrammarDocument> {
        self.documents.values()
    }

    pub fn index(&self) -> &WorkspaceIndex {
        &self.index
    }

    /// Run both build phases over the workspace.
    ///
    /// A cancelled build returns [`Error::Cancelled`] at the next document
    /// boundary. Documents already through phase 1 keep their new state and
    /// unprocessed sources stay pending, so a later build resumes where
    /// this one stopped.
    pub fn build(&mut self, cancel: &CancelToken) -> Result<(), Error> {
        // Phase 1: parse and publish exports, one document at a time.
        while let Some(uri) = self.pending.keys().next().cloned() {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let source = self
                .pending
                .shift_remove(&uri)
                .unwrap_or_default();
            let document = GrammarDocument::build(uri.clone(), source);
            self.index
                .update_document(uri.clone(), document.scopes.exports.clone());
            self.documents.insert(uri, document);
        }

        // Phase 2: link and validate against the complete index. Outcomes
        // are computed for every document before any is committed.
        let mut outcomes: Vec<(Uri, Vec<ReferenceDescription>, Diagnostics)> = Vec::new();
        for document in self.documents.values() {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let closure = self.import_closure(&document.uri);
            let provider = ScopeProvider::new(&self.index, closure);
            let outcome = linker::link(document, &provider);

            let imports: Vec<&GrammarDocument> = document
                .imports
                .iter()
                .filter_map(|uri| self.documents.get(uri))
                .collect();
            let mut diagnostics = outcome.diagnostics;
            diagnostics.extend(validate::validate(document, &imports));

            outcomes.push((document.uri.clone(), outcome.references, diagnostics));
        }

        for (uri, references, diagnostics) in outcomes {
            self.index.record_references(&uri, references);
            if let Some(document) = self.documents.get_mut(&uri) {
                document.semantic_diagnostics = diagnostics;
            }
        }
        debug!(documents = self.documents.len(), "workspace build complete");
        Ok(())
    }

    /// URIs reachable from `uri` through imports, the document itself
    /// included. Cycles are walked once.
    pub fn import_closure(&self, uri: &Uri) -> IndexSet<Uri> {
        let mut closure = IndexSet::new();
        let mut queue = vec![uri.clone()];
        while let Some(current) = queue.pop() {
            if !closure.insert(current.clone()) {
                continue;
            }
            if let Some(document) = self.documents.get(&current) {
                queue.extend(document.imports.iter().cloned());
            }
        }
        closure
    }

    /// The declaration under `offset` in the given document, if any.
    pub fn find_declaration(
        &self,
        uri: &Uri,
        offset: TextSize,
    ) -> Result<Option<AstNodeDescription>, Error> {
        let document = self
            .documents
            .get(uri)
            .ok_or_else(|| Error::UnknownDocument(uri.clone()))?;
        Ok(find::find_declaration(&self.index, document, offset))
    }

    /// All recorded references to `target`.
    pub fn find_references(
        &self,
        target: &AstNodeDescription,
        options: &FindReferencesOptions,
    ) -> Vec<ReferenceDescription> {
        find::find_references(&self.index, target, options)
    }
}
