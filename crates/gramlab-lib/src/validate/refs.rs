//! Cross-reference and fragment checks.

use indexmap::IndexSet;

use gramlab_core::diagnostics::{DiagnosticKind, Diagnostics};

use crate::parser::ast::CrossRef;
use crate::parser::cst::SyntaxKind;
use crate::typemodel::{Primitive, PropertyType};
use crate::workspace::documents::GrammarDocument;

use super::TypeEnv;

pub(super) fn check(document: &GrammarDocument, env: &TypeEnv<'_>, out: &mut Diagnostics) {
    check_cross_refs(document, env, out);
    check_assignments(document, env, out);
    check_unions(document, env, out);
}

/// Every `[T]` must resolve to a type whose instances are AST nodes.
/// Unresolved targets are left to the linker.
fn check_cross_refs(document: &GrammarDocument, env: &TypeEnv<'_>, out: &mut Diagnostics) {
    for node in document.root.as_cst().descendants() {
        if node.kind() != SyntaxKind::CrossRef {
            continue;
        }
        let Some(cross_ref) = CrossRef::cast(node.clone()) else {
            continue;
        };
        let Some(target) = cross_ref.target().and_then(|t| t.name()) else {
            continue;
        };

        let mut offending = IndexSet::new();
        collect_non_ast_alternatives(target.text(), env, &mut IndexSet::new(), &mut offending);
        if !offending.is_empty() {
            let detail = offending
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            out.report(DiagnosticKind::CrossRefToNonAstType, target.text_range())
                .message(detail)
                .emit();
        }

        // A cross-reference stored under `name` would shadow the name the
        // node itself is found by.
        if let Some(assignment) = node
            .ancestors()
            .find(|a| a.kind() == SyntaxKind::Assignment)
            .and_then(crate::parser::ast::Assignment::cast)
            && let Some(feature) = assignment.feature()
            && feature.text() == "name"
        {
            out.report(
                DiagnosticKind::CrossRefFeatureNamedName,
                feature.text_range(),
            )
            .emit();
        }
    }
}

/// Alternatives of `name` (after union expansion) that are not AST node
/// types, in declaration order.
fn collect_non_ast_alternatives<'a>(
    name: &'a str,
    env: &TypeEnv<'a>,
    visited: &mut IndexSet<&'a str>,
    out: &mut IndexSet<String>,
) {
    if !visited.insert(name) {
        return;
    }
    if Primitive::from_name(name).is_some() {
        out.insert(name.to_string());
        return;
    }
    if env.interface(name).is_some() || env.inferred(name).is_some() {
        return;
    }
    if let Some(union) = env.union(name) {
        for branch in &union.branches {
            match branch {
                PropertyType::Reference(target) => {
                    if env.interface(target).is_some() || env.inferred(target).is_some() {
                        continue;
                    }
                    if let Some(inner) = env.union(target) {
                        if is_data_type_union(inner, env) {
                            out.insert(target.clone());
                        } else {
                            collect_non_ast_alternatives(target, env, visited, out);
                        }
                    } else {
                        collect_non_ast_alternatives(target, env, visited, out);
                    }
                }
                PropertyType::Primitive(p) => {
                    out.insert(p.as_str().to_string());
                }
                PropertyType::Literal(value) => {
                    out.insert(format!("'{value}'"));
                }
                PropertyType::Node(_) | PropertyType::Union(_) => {}
            }
        }
        return;
    }
    if let Some(rule) = env.rule(name) {
        if rule.is_data_type() || rule.is_terminal() {
            out.insert(name.to_string());
        }
        return;
    }
    // Unresolved; reported by the linker.
}

/// A union alias whose every branch is a literal or primitive names a data
/// type, not a set of AST types.
fn is_data_type_union(union: &crate::typemodel::UnionInfo, env: &TypeEnv<'_>) -> bool {
    !union.branches.is_empty()
        && union.branches.iter().all(|b| match b {
            PropertyType::Literal(_) | PropertyType::Primitive(_) => true,
            PropertyType::Reference(name) => env
                .rule(name)
                .is_some_and(|r| r.is_data_type() || r.is_terminal()),
            _ => false,
        })
}

/// Checks that operate on the inferred shape of each assigned property.
fn check_assignments(document: &GrammarDocument, env: &TypeEnv<'_>, out: &mut Diagnostics) {
    for rule in document.type_model.rules.values() {
        for segment in &rule.segments {
            for attribute in &segment.attributes {
                let leaves = attribute.ty.leaves();

                let refs = leaves
                    .iter()
                    .filter(|l| matches!(l, PropertyType::Reference(_)))
                    .count();
                if refs > 0 && refs < leaves.len() {
                    out.report(DiagnosticKind::MixedCrossRefAlternatives, attribute.range)
                        .emit();
                }

                for leaf in &leaves {
                    if let PropertyType::Node(target) = leaf
                        && env.rule(target).is_some_and(|r| r.is_fragment())
                    {
                        out.report(DiagnosticKind::FragmentAssigned, attribute.range)
                            .message(format!(
                                "fragment rule `{target}` cannot be assigned to property `{}`",
                                attribute.name
                            ))
                            .emit();
                    }
                }
            }
        }
    }
}

/// Fragments produce no AST node of their own, so they cannot stand as a
/// union alternative.
fn check_unions(document: &GrammarDocument, env: &TypeEnv<'_>, out: &mut Diagnostics) {
    for union in document.type_model.unions.values() {
        for branch in &union.branches {
            if let PropertyType::Reference(name) = branch
                && env.rule(name).is_some_and(|r| r.is_fragment())
            {
                out.report(DiagnosticKind::FragmentInTypeUnion, union.name_range)
                    .message(name)
                    .emit();
            }
        }
    }
}
