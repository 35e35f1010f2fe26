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
fn extending_a_union_of_inferred_types_reports_error_and_warning() {
    let diagnostics = diagnostics_of(indoc! {"
        interface I extends U { label: string }
        type U = A | B;
        A: name=ID;
        B: value=ID;
        terminal ID: /[a-z]+/;
    "});
    let errors = of_kind(&diagnostics, DiagnosticKind::ExtendsUnionType);
    let warnings = of_kind(&diagnostics, DiagnosticKind::ExtendsInferredType);
    assert_eq!(errors.len(), 1);
    assert_eq!(warnings.len(), 1);
    assert_eq!(errors[0].severity(), Severity::Error);
    assert_eq!(warnings[0].severity(), Severity::Warning);
    // Both point at the same supertype reference.
    assert_eq!(errors[0].range, warnings[0].range);
}

#[test]
fn extending_a_union_of_declared_interfaces_is_only_an_error() {
    let diagnostics = diagnostics_of(indoc! {"
        interface A { name: string }
        interface B { name: string }
        type U = A | B;
        interface I extends U { label: string }
    "});
    assert_eq!(of_kind(&diagnostics, DiagnosticKind::ExtendsUnionType).len(), 1);
    assert_eq!(
        of_kind(&diagnostics, DiagnosticKind::ExtendsInferredType).len(),
        0
    );
}

#[test]
fn extending_an_inferred_type_warns() {
    let diagnostics = diagnostics_of(indoc! {"
        A: name=ID;
        interface I extends A { label: string }
        terminal ID: /[a-z]+/;
    "});
    let warnings = of_kind(&diagnostics, DiagnosticKind::ExtendsInferredType);
    assert_eq!(warnings.len(), 1);
}

#[test]
fn superfluous_infer_carries_a_fix() {
    let diagnostics = diagnostics_of(indoc! {"
        interface Decl { name: string }
        X: {infer Decl} name=ID;
        terminal ID: /[a-z]+/;
    "});
    let findings = of_kind(&diagnostics, DiagnosticKind::SuperfluousInfer);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].message.contains("`Decl`"));
    let fix = findings[0].fix.as_ref().unwrap();
    assert_eq!(fix.replacement, "Decl");
}

#[test]
fn infers_clause_naming_a_declared_type() {
    let diagnostics = diagnostics_of(indoc! {"
        interface Decl { name: string }
        X infers Decl: name=ID;
        terminal ID: /[a-z]+/;
    "});
    let findings = of_kind(&diagnostics, DiagnosticKind::ExplicitlyDeclaredType);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].message.contains("`Decl`"));
}

#[test]
fn rule_shadowing_a_declared_interface_must_return_it() {
    let diagnostics = diagnostics_of(indoc! {"
        interface X { name: string }
        X: name=ID;
        terminal ID: /[a-z]+/;
    "});
    let findings = of_kind(&diagnostics, DiagnosticKind::MissingReturns);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].message, "rule must declare `returns X`");
}

#[test]
fn value_only_rule_needs_a_primitive_return() {
    let diagnostics = diagnostics_of(indoc! {"
        QNAME: ID ('.' ID)*;
        terminal ID: /[a-z]+/;
    "});
    assert_eq!(
        of_kind(&diagnostics, DiagnosticKind::MissingDataTypeReturn).len(),
        1
    );

    let diagnostics = diagnostics_of(indoc! {"
        QNAME returns string: ID ('.' ID)*;
        terminal ID: /[a-z]+/;
    "});
    assert_eq!(
        of_kind(&diagnostics, DiagnosticKind::MissingDataTypeReturn).len(),
        0
    );
}

#[test]
fn rule_calling_ast_rules_is_not_a_data_type_rule() {
    let diagnostics = diagnostics_of(indoc! {"
        Wrapper: Inner;
        Inner: name=ID;
        terminal ID: /[a-z]+/;
    "});
    assert_eq!(
        of_kind(&diagnostics, DiagnosticKind::MissingDataTypeReturn).len(),
        0
    );
}

#[test]
fn primitive_return_with_assignments() {
    let diagnostics = diagnostics_of(indoc! {"
        X returns string: name=ID;
        terminal ID: /[a-z]+/;
    "});
    assert_eq!(
        of_kind(&diagnostics, DiagnosticKind::PrimitiveReturnWithAssignments).len(),
        1
    );
}

#[test]
fn missing_mandatory_property_walks_the_extends_chain() {
    let diagnostics = diagnostics_of(indoc! {"
        interface Named { name: string }
        interface Decl extends Named { kind: string }
        X returns Decl: kind=ID;
        terminal ID: /[a-z]+/;
    "});
    let findings = of_kind(&diagnostics, DiagnosticKind::MissingMandatoryProperty);
    assert_eq!(findings.len(), 1);
    assert!(findings[0].message.contains("`name`"));
    assert_eq!(findings[0].related.len(), 1);
}

#[test]
fn optional_array_and_boolean_properties_are_exempt() {
    let diagnostics = diagnostics_of(indoc! {"
        interface Opts { flag: boolean  items: Opts[]  note?: string  name: string }
        X returns Opts: name=ID;
        terminal ID: /[a-z]+/;
    "});
    assert_eq!(
        of_kind(&diagnostics, DiagnosticKind::MissingMandatoryProperty).len(),
        0
    );
}

#[test]
fn fragment_assignments_satisfy_mandatory_properties() {
    let diagnostics = diagnostics_of(indoc! {"
        interface Named { name: string }
        X returns Named: F;
        fragment F: name=ID;
        terminal ID: /[a-z]+/;
    "});
    assert_eq!(
        of_kind(&diagnostics, DiagnosticKind::MissingMandatoryProperty).len(),
        0
    );
}
