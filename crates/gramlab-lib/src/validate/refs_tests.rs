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

fn of_kind(diagnostics: &[Diagnostic], kind: DiagnosticKind) -> Vec<Diagnostic> {
    diagnostics
        .iter()
        .filter(|d| d.kind == kind)
        .cloned()
        .collect()
}

#[test]
fn cross_ref_to_an_inferred_type_is_fine() {
    let diagnostics = diagnostics_of(indoc! {"
        A: name=ID;
        X: r=[A];
        terminal ID: /[a-z]+/;
    "});
    assert_eq!(
        of_kind(&diagnostics, DiagnosticKind::CrossRefToNonAstType).len(),
        0
    );
}

#[test]
fn cross_ref_to_a_literal_alias_lists_its_alternatives() {
    let diagnostics = diagnostics_of(indoc! {"
        type B = 'x' | 'y';
        X: r=[B];
    "});
    let findings = of_kind(&diagnostics, DiagnosticKind::CrossRefToNonAstType);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].message.contains("'x', 'y'"));
}

#[test]
fn cross_ref_through_a_union_names_the_offending_branch() {
    let diagnostics = diagnostics_of(indoc! {"
        A: name=ID;
        type B = 'x' | 'y';
        type U = A | B;
        X: r=[U];
        terminal ID: /[a-z]+/;
    "});
    let findings = of_kind(&diagnostics, DiagnosticKind::CrossRefToNonAstType);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].message.contains("B"));
    assert!(!findings[0].message.contains("'x'"));
}

#[test]
fn cross_ref_to_a_terminal() {
    let diagnostics = diagnostics_of(indoc! {"
        X: r=[ID];
        terminal ID: /[a-z]+/;
    "});
    assert_eq!(
        of_kind(&diagnostics, DiagnosticKind::CrossRefToNonAstType).len(),
        1
    );
}

#[test]
fn mixed_cross_ref_and_value_alternatives() {
    let diagnostics = diagnostics_of(indoc! {"
        Thing: name=ID;
        X: v=([Thing] | ID);
        terminal ID: /[a-z]+/;
    "});
    let findings = of_kind(&diagnostics, DiagnosticKind::MixedCrossRefAlternatives);
    assert_eq!(findings.len(), 1);
}

#[test]
fn pure_cross_ref_alternatives_are_allowed() {
    let diagnostics = diagnostics_of(indoc! {"
        Thing: name=ID;
        Other: name=ID;
        X: v=([Thing] | [Other]);
        terminal ID: /[a-z]+/;
    "});
    assert_eq!(
        of_kind(&diagnostics, DiagnosticKind::MixedCrossRefAlternatives).len(),
        0
    );
}

#[test]
fn fragment_assigned_to_a_property() {
    let diagnostics = diagnostics_of(indoc! {"
        X: f=F;
        fragment F: name=ID;
        terminal ID: /[a-z]+/;
    "});
    let findings = of_kind(&diagnostics, DiagnosticKind::FragmentAssigned);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].message.contains("`F`"));
    assert!(findings[0].message.contains("`f`"));
}

#[test]
fn fragment_in_a_type_union() {
    let diagnostics = diagnostics_of(indoc! {"
        type T = A | F;
        A: name=ID;
        fragment F: name=ID;
        terminal ID: /[a-z]+/;
    "});
    let findings = of_kind(&diagnostics, DiagnosticKind::FragmentInTypeUnion);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].message.contains("`F`"));
}

#[test]
fn cross_ref_stored_under_name_warns() {
    let diagnostics = diagnostics_of(indoc! {"
        Thing: name=ID;
        X: name=[Thing];
        terminal ID: /[a-z]+/;
    "});
    let findings = of_kind(&diagnostics, DiagnosticKind::CrossRefFeatureNamedName);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].severity(), Severity::Warning);
}

#[test]
fn two_offending_branches_listed_in_declaration_order() {
    let diagnostics = diagnostics_of(indoc! {"
        type A = 'a';
        type B = 'b';
        type U = A | B;
        X: r=[U];
    "});
    let findings = of_kind(&diagnostics, DiagnosticKind::CrossRefToNonAstType);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].message.ends_with("A, B"));
}
