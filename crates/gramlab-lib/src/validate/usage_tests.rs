use indoc::indoc;

use gramlab_core::diagnostics::{Diagnostic, DiagnosticKind, Severity};
use gramlab_core::Uri;

use crate::workspace::documents::GrammarDocument;

fn diagnostics_of(source: &str) -> Vec<Diagnostic> {
    let doc = GrammarDocument::build(Uri::new("file:///main.gx"), source);
    assert!(
        doc.parse_diagnostics.is_empty(),
        "unexpected parse errors: {:?}",
        doc.parse_diagnostics
    );
    super::validate(&doc, &[]).iter().cloned().collect()
}

fn unused(diagnostics: &[Diagnostic]) -> Vec<Diagnostic> {
    diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::UnusedRule)
        .cloned()
        .collect()
}

#[test]
fn unreachable_rule_gets_a_hint() {
    let diagnostics = diagnostics_of(indoc! {"
        entry Model: items+=Item*;
        Item: name=ID;
        Orphan: name=ID;
        terminal ID: /[a-z]+/;
    "});
    let findings = unused(&diagnostics);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].message, "rule `Orphan` is never used");
    assert_eq!(findings[0].severity(), Severity::Hint);
}

#[test]
fn no_entry_rule_disables_the_check() {
    let diagnostics = diagnostics_of(indoc! {"
        Item: name=ID;
        Orphan: name=ID;
        terminal ID: /[a-z]+/;
    "});
    assert_eq!(unused(&diagnostics).len(), 0);
}

#[test]
fn terminal_referenced_by_another_terminal_counts_as_used() {
    let diagnostics = diagnostics_of(indoc! {r"
        entry Model: name=ID;
        terminal ID: /[a-z]+/;
        terminal OTHER: FRAG;
        terminal FRAG: /[0-9]+/;
    "});
    let findings = unused(&diagnostics);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].message.contains("`OTHER`"));
}

#[test]
fn hidden_terminals_are_exempt() {
    let diagnostics = diagnostics_of(indoc! {r"
        entry Model: name=ID;
        terminal ID: /[a-z]+/;
        hidden terminal WS: /\s+/;
    "});
    assert_eq!(unused(&diagnostics).len(), 0);
}

#[test]
fn cross_ref_token_rule_keeps_its_terminal_alive() {
    let diagnostics = diagnostics_of(indoc! {r"
        entry Model: t=[Thing:QNAME] item=Thing;
        Thing: name=ID;
        terminal QNAME: /[a-z.]+/;
        terminal ID: /[a-z]+/;
    "});
    assert_eq!(unused(&diagnostics).len(), 0);
}

#[test]
fn fragments_reached_through_calls_are_used() {
    let diagnostics = diagnostics_of(indoc! {"
        entry Model: F;
        fragment F: name=ID;
        terminal ID: /[a-z]+/;
    "});
    assert_eq!(unused(&diagnostics).len(), 0);
}
