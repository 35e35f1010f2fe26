//! Type-relationship checks: extends targets, declared vs inferred types,
//! and return-type obligations.

use indexmap::IndexSet;
use rowan::TextRange;

use gramlab_core::diagnostics::{DiagnosticKind, Diagnostics};

use crate::parser::ast::{Action, ParserRule, Root};
use crate::parser::cst::SyntaxKind;
use crate::typemodel::{Primitive, PropertyType, ReturnType, RuleInfo};
use crate::workspace::documents::GrammarDocument;

use super::TypeEnv;

pub(super) fn check(document: &GrammarDocument, env: &TypeEnv<'_>, out: &mut Diagnostics) {
    let root = &document.root;
    check_extends(document, env, out);
    check_actions(root, env, out);
    for rule in root.parser_rules() {
        let Some(name) = rule.name() else { continue };
        let Some(info) = document.type_model.rules.get(name.text()) else {
            continue;
        };
        check_infers_clause(&rule, env, out);
        check_return_obligations(&rule, info, env, out);
        check_mandatory_properties(info, env, out);
    }
}

/// `extends` may only name declared interfaces. Extending a union is an
/// error; extending a type that only exists through inference is fragile
/// (any edit to the inferring rule reshapes the supertype) and is flagged
/// as a warning.
fn check_extends(document: &GrammarDocument, env: &TypeEnv<'_>, out: &mut Diagnostics) {
    for interface in document.type_model.interfaces.values() {
        for sup in &interface.extends {
            if let Some(union) = env.union(&sup.name) {
                out.report(DiagnosticKind::ExtendsUnionType, sup.range).emit();
                let branches: Vec<&String> = union
                    .branches
                    .iter()
                    .filter_map(|b| match b {
                        PropertyType::Node(name) | PropertyType::Reference(name) => Some(name),
                        _ => None,
                    })
                    .collect();
                let all_inferred = !branches.is_empty()
                    && branches
                        .iter()
                        .all(|n| env.interface(n).is_none() && env.inferred(n).is_some());
                if all_inferred {
                    out.report(DiagnosticKind::ExtendsInferredType, sup.range)
                        .emit();
                }
            } else if env.interface(&sup.name).is_none() && env.inferred(&sup.name).is_some() {
                out.report(DiagnosticKind::ExtendsInferredType, sup.range)
                    .emit();
            }
        }
    }
}

/// `{infer X}` where `X` is a declared interface does not infer anything;
/// the action already resolves to the declaration.
fn check_actions(root: &Root, env: &TypeEnv<'_>, out: &mut Diagnostics) {
    for node in root.as_cst().descendants() {
        if node.kind() != SyntaxKind::Action {
            continue;
        }
        let Some(action) = Action::cast(node) else {
            continue;
        };
        if !action.is_infer() {
            continue;
        }
        let Some(name) = action.inferred_name() else {
            continue;
        };
        if env.interface(name.text()).is_some() {
            let infer_kw = action
                .as_cst()
                .children_with_tokens()
                .filter_map(|it| it.into_token())
                .find(|t| t.kind() == SyntaxKind::KwInfer);
            let range = match infer_kw {
                Some(kw) => TextRange::new(kw.text_range().start(), name.text_range().end()),
                None => name.text_range(),
            };
            out.report(DiagnosticKind::SuperfluousInfer, range)
                .message(name.text())
                .fix("remove the `infer` keyword", name.text())
                .emit();
        }
    }
}

/// `infers X` promises a fresh type; a declared interface `X` contradicts
/// that and must be referenced with `returns` instead.
fn check_infers_clause(rule: &ParserRule, env: &TypeEnv<'_>, out: &mut Diagnostics) {
    let Some(clause) = rule.infers_clause() else {
        return;
    };
    let Some(name) = clause.name() else { return };
    if env.interface(name.text()).is_some() || env.union(name.text()).is_some() {
        out.report(
            DiagnosticKind::ExplicitlyDeclaredType,
            clause.as_cst().text_range(),
        )
        .message(name.text())
        .fix(
            "use `returns` instead of `infers`",
            format!("returns {}", name.text()),
        )
        .emit();
    }
}

fn check_return_obligations(
    rule: &ParserRule,
    info: &RuleInfo,
    env: &TypeEnv<'_>,
    out: &mut Diagnostics,
) {
    if info.is_fragment() {
        return;
    }

    // A rule shadowing a declared type of the same name must say so.
    if info.returns.is_none() && info.infers.is_none() {
        if env.interface(&info.name).is_some() || env.union(&info.name).is_some() {
            out.report(DiagnosticKind::MissingReturns, info.name_range)
                .message(&info.name)
                .fix(
                    format!("add `returns {}`", info.name),
                    format!("{} returns {}", info.name, info.name),
                )
                .emit();
            return;
        }

        // A body that only matches text (keywords, terminals, data type
        // rules) produces a string, not an AST node.
        if info.value_only_body
            && rule.body().is_some()
            && info.calls.iter().all(|call| {
                env.rule(&call.name)
                    .is_some_and(|r| r.is_terminal() || r.is_data_type())
            })
        {
            out.report(DiagnosticKind::MissingDataTypeReturn, info.name_range)
                .emit();
        }
        return;
    }

    if info.is_data_type() && info.segments.iter().any(|s| !s.attributes.is_empty()) {
        out.report(
            DiagnosticKind::PrimitiveReturnWithAssignments,
            info.name_range,
        )
        .emit();
    }
}

/// Every non-optional, non-array, non-boolean property of a declared return
/// type (including inherited ones) must be assigned somewhere in the rule.
fn check_mandatory_properties(info: &RuleInfo, env: &TypeEnv<'_>, out: &mut Diagnostics) {
    let Some(ReturnType::Named(type_name)) = &info.returns else {
        return;
    };
    if env.interface(type_name).is_none() {
        return;
    }

    let mut assigned: IndexSet<&str> = IndexSet::new();
    collect_assigned(info, env, &mut IndexSet::new(), &mut assigned);

    let mut seen = IndexSet::new();
    let mut stack = vec![type_name.as_str()];
    while let Some(current) = stack.pop() {
        if !seen.insert(current) {
            continue;
        }
        let Some(interface) = env.interface(current) else {
            continue;
        };
        for attribute in interface.attributes.values() {
            let mandatory = !attribute.optional
                && !attribute.array
                && attribute.ty != PropertyType::Primitive(Primitive::Boolean);
            if mandatory && !assigned.contains(attribute.name.as_str()) {
                out.report(DiagnosticKind::MissingMandatoryProperty, info.name_range)
                    .message(&attribute.name)
                    .related_to("declared here", attribute.range)
                    .emit();
            }
        }
        stack.extend(interface.extends.iter().map(|s| s.name.as_str()));
    }
}

/// Properties assigned by a rule, following fragment calls.
fn collect_assigned<'a>(
    info: &'a RuleInfo,
    env: &TypeEnv<'a>,
    visited: &mut IndexSet<&'a str>,
    out: &mut IndexSet<&'a str>,
) {
    if !visited.insert(&info.name) {
        return;
    }
    for segment in &info.segments {
        out.extend(segment.attributes.iter().map(|a| a.name.as_str()));
    }
    for call in &info.calls {
        if let Some(callee) = env.rule(&call.name)
            && callee.is_fragment()
        {
            collect_assigned(callee, env, visited, out);
        }
    }
}
