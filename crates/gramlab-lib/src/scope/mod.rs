//! Scope computation and the scope provider.

pub mod computation;
pub mod provider;

#[cfg(test)]
mod provider_tests;

pub use computation::{compute, PrecomputedScopes, ScopeComputation};
pub use provider::{category_of, ReferenceCategory, ScopeProvider};
