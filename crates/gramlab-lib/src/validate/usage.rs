//! Unused-rule detection.
//!
//! Reachability starts at the entry rules and follows every rule call,
//! including calls between terminals and the token rules of
//! cross-references. Skipped entirely when the document has no entry rule,
//! since a library grammar reaches its rules only through importers.

use indexmap::IndexSet;

use gramlab_core::diagnostics::{DiagnosticKind, Diagnostics};

use crate::workspace::documents::GrammarDocument;

pub(super) fn check(document: &GrammarDocument, out: &mut Diagnostics) {
    let rules = &document.type_model.rules;
    let entries: Vec<&str> = rules
        .values()
        .filter(|r| r.is_entry())
        .map(|r| r.name.as_str())
        .collect();
    if entries.is_empty() {
        return;
    }

    let mut reachable: IndexSet<&str> = IndexSet::new();
    let mut stack = entries;
    while let Some(name) = stack.pop() {
        if !reachable.insert(name) {
            continue;
        }
        if let Some(rule) = rules.get(name) {
            stack.extend(rule.calls.iter().map(|c| c.name.as_str()));
        }
    }

    // A terminal mentioned inside another terminal's body is part of that
    // token definition even when the mentioning terminal is itself unused.
    let mut referenced_terminals: IndexSet<&str> = IndexSet::new();
    for rule in rules.values().filter(|r| r.is_terminal()) {
        referenced_terminals.extend(rule.calls.iter().map(|c| c.name.as_str()));
    }

    for rule in rules.values() {
        if rule.is_entry() || reachable.contains(rule.name.as_str()) {
            continue;
        }
        if rule.is_terminal() {
            let hidden = matches!(
                rule.kind,
                crate::typemodel::RuleKind::Terminal { hidden: true }
            );
            if hidden || referenced_terminals.contains(rule.name.as_str()) {
                continue;
            }
        }
        out.report(DiagnosticKind::UnusedRule, rule.name_range)
            .message(&rule.name)
            .emit();
    }
}
