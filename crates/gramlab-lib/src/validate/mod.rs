//! Grammar validation.
//!
//! One file per rule family. Every check accumulates into the shared
//! [`Diagnostics`] collection and never aborts; a violation in one rule
//! leaves all other checks running.
//!
//! Validation runs after linking, so checks that depend on resolved
//! references (declared-vs-inferred, cross-reference targets) see the full
//! one-hop import neighborhood.

mod keywords;
mod names;
mod refs;
mod types;
mod usage;

#[cfg(test)]
mod names_tests;
#[cfg(test)]
mod refs_tests;
#[cfg(test)]
mod types_tests;
#[cfg(test)]
mod usage_tests;

use gramlab_core::diagnostics::Diagnostics;

use crate::typemodel::{InterfaceInfo, RuleInfo, TypeDescriptor, TypeModel, UnionInfo};
use crate::workspace::documents::GrammarDocument;

/// Validate one document against its direct import neighborhood.
pub fn validate(document: &GrammarDocument, imports: &[&GrammarDocument]) -> Diagnostics {
    let mut out = Diagnostics::new();
    let env = TypeEnv::new(document, imports);

    names::check(document, imports, &mut out);
    types::check(document, &env, &mut out);
    keywords::check(document, &mut out);
    refs::check(document, &env, &mut out);
    usage::check(document, &mut out);

    out
}

/// Name lookup over the document's own type model and the models one import
/// hop away, local-first.
pub(crate) struct TypeEnv<'a> {
    models: Vec<&'a TypeModel>,
}

impl<'a> TypeEnv<'a> {
    pub(crate) fn new(document: &'a GrammarDocument, imports: &[&'a GrammarDocument]) -> Self {
        let mut models = vec![&document.type_model];
        models.extend(imports.iter().map(|d| &d.type_model));
        Self { models }
    }

    pub(crate) fn interface(&self, name: &str) -> Option<&'a InterfaceInfo> {
        self.models.iter().find_map(|m| m.interfaces.get(name))
    }

    pub(crate) fn union(&self, name: &str) -> Option<&'a UnionInfo> {
        self.models.iter().find_map(|m| m.unions.get(name))
    }

    pub(crate) fn rule(&self, name: &str) -> Option<&'a RuleInfo> {
        self.models.iter().find_map(|m| m.rules.get(name))
    }

    pub(crate) fn inferred(&self, name: &str) -> Option<&'a TypeDescriptor> {
        self.models.iter().find_map(|m| m.inferred.get(name))
    }
}
