//! Layered name lookup.
//!
//! A [`Scope`] is an ordered lookup object over zero or more layers of
//! descriptions. Lookup by name scans layers nearest-first, so an inner
//! layer shadows same-named entries of all outer layers. Iteration with
//! [`Scope::all`] chains layers lazily; a caller that only needs the first
//! match never touches outer layers.

use crate::descriptions::AstNodeDescription;

pub trait Scope {
    /// First description named `name`, scanning layers nearest-first.
    fn element(&self, name: &str) -> Option<AstNodeDescription>;

    /// All visible descriptions, nearest layer first.
    ///
    /// Shadowed outer entries are still yielded; callers wanting
    /// first-match semantics use [`element`](Self::element).
    fn all(&self) -> Box<dyn Iterator<Item = AstNodeDescription> + '_>;
}

/// The scope with no elements. Structural faults degrade to this instead of
/// failing a request.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyScope;

impl Scope for EmptyScope {
    fn element(&self, _name: &str) -> Option<AstNodeDescription> {
        None
    }

    fn all(&self) -> Box<dyn Iterator<Item = AstNodeDescription> + '_> {
        Box::new(std::iter::empty())
    }
}

/// One layer of descriptions over an optional outer scope. The outer scope
/// may borrow from an index; the lifetime ties the layered chain to it.
pub struct StreamScope<'a> {
    elements: Vec<AstNodeDescription>,
    outer: Option<Box<dyn Scope + 'a>>,
}

impl<'a> StreamScope<'a> {
    pub fn new(elements: Vec<AstNodeDescription>) -> Self {
        Self {
            elements,
            outer: None,
        }
    }

    pub fn with_outer(elements: Vec<AstNodeDescription>, outer: Box<dyn Scope + 'a>) -> Self {
        Self {
            elements,
            outer: Some(outer),
        }
    }

    /// This layer's own elements, in document order.
    pub fn local_elements(&self) -> &[AstNodeDescription] {
        &self.elements
    }
}

impl Scope for StreamScope<'_> {
    fn element(&self, name: &str) -> Option<AstNodeDescription> {
        self.elements
            .iter()
            .find(|d| d.name == name)
            .cloned()
            .or_else(|| self.outer.as_ref().and_then(|outer| outer.element(name)))
    }

    fn all(&self) -> Box<dyn Iterator<Item = AstNodeDescription> + '_> {
        let local = self.elements.iter().cloned();
        match &self.outer {
            Some(outer) => Box::new(local.chain(outer.all())),
            None => Box::new(local),
        }
    }
}
