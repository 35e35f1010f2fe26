use indoc::indoc;

use gramlab_core::diagnostics::{Diagnostic, DiagnosticKind, Severity};
use gramlab_core::Uri;

use crate::workspace::documents::GrammarDocument;

fn document(uri: &str, source: &str) -> GrammarDocument {
    GrammarDocument::build(Uri::new(uri), source)
}

fn diagnostics_of(source: &str) -> Vec<Diagnostic> {
    let doc = document("file:///main.gx", source);
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
fn reserved_rule_name() {
    let diagnostics = diagnostics_of(indoc! {"
        crate: name=ID;
        terminal ID: /[a-z]+/;
    "});
    let reserved = of_kind(&diagnostics, DiagnosticKind::ReservedName);
    assert_eq!(reserved.len(), 1);
    assert_eq!(reserved[0].message, "`crate` is reserved in generated code");
    assert_eq!(reserved[0].severity(), Severity::Error);
}

#[test]
fn reserved_assignment_feature() {
    let diagnostics = diagnostics_of(indoc! {"
        Expr: impl=ID;
        terminal ID: /[a-z]+/;
    "});
    let reserved = of_kind(&diagnostics, DiagnosticKind::ReservedName);
    assert_eq!(reserved.len(), 1);
    assert!(reserved[0].message.contains("`impl`"));
}

#[test]
fn reserved_interface_attribute() {
    let diagnostics = diagnostics_of(indoc! {"
        interface Decl { fn: string }
    "});
    let reserved = of_kind(&diagnostics, DiagnosticKind::ReservedName);
    assert_eq!(reserved.len(), 1);
}

#[test]
fn duplicate_rule_reported_at_second_occurrence() {
    let source = indoc! {"
        A: name=ID;
        A: value=ID;
        terminal ID: /[a-z]+/;
    "};
    let diagnostics = diagnostics_of(source);
    let duplicates = of_kind(&diagnostics, DiagnosticKind::DuplicateName);
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].message, "`A` is already defined");
    // Second `A`, on the second line.
    assert_eq!(u32::from(duplicates[0].range.start()), 12);
    assert_eq!(duplicates[0].related.len(), 1);
    assert_eq!(u32::from(duplicates[0].related[0].range.start()), 0);
}

#[test]
fn parser_and_terminal_rules_share_a_namespace() {
    let diagnostics = diagnostics_of(indoc! {"
        ID: name=WORD;
        terminal ID: /[a-z]+/;
        terminal WORD: /[a-z]+/;
    "});
    assert_eq!(of_kind(&diagnostics, DiagnosticKind::DuplicateName).len(), 1);
}

#[test]
fn rules_and_types_are_separate_namespaces() {
    let diagnostics = diagnostics_of(indoc! {"
        interface X { name: string }
        X returns X: name=ID;
        terminal ID: /[a-z]+/;
    "});
    assert_eq!(of_kind(&diagnostics, DiagnosticKind::DuplicateName).len(), 0);
}

#[test]
fn duplicate_type_alias_and_interface() {
    let diagnostics = diagnostics_of(indoc! {"
        interface T { name: string }
        type T = 'a' | 'b';
    "});
    assert_eq!(of_kind(&diagnostics, DiagnosticKind::DuplicateName).len(), 1);
}

#[test]
fn local_terminal_clashes_with_local_keyword() {
    let diagnostics = diagnostics_of(indoc! {"
        terminal FOO: /foo/;
        X: 'FOO' name=FOO;
    "});
    let clashes = of_kind(&diagnostics, DiagnosticKind::TerminalKeywordClash);
    assert_eq!(clashes.len(), 1);
    assert_eq!(clashes[0].severity(), Severity::Error);
    assert!(clashes[0].message.contains("`FOO`"));
    assert!(clashes[0].message.contains("this grammar"));
    // Underlines the terminal's name.
    assert_eq!(u32::from(clashes[0].range.start()), 9);
}

#[test]
fn imported_terminal_clash_lands_on_the_import_statement() {
    let a = document("file:///a.gx", "terminal ID: /[a-z]+/;");
    let b = document(
        "file:///b.gx",
        indoc! {"
            import './a'
            X: 'ID' name=WORD;
            terminal WORD: /[a-z]+/;
        "},
    );
    let diagnostics: Vec<Diagnostic> = super::validate(&b, &[&a]).iter().cloned().collect();
    let clashes = of_kind(&diagnostics, DiagnosticKind::TerminalKeywordClash);
    assert_eq!(clashes.len(), 1);
    let import = b.root.imports().next().unwrap();
    assert_eq!(clashes[0].range, import.as_cst().text_range());
    assert!(clashes[0].message.contains("imported terminal `ID`"));
}

#[test]
fn local_terminal_clash_with_imported_keyword() {
    let a = document("file:///a.gx", "KwRule: 'WORD' name=WORD;\nterminal WORD: /[a-z]+/;");
    let b = document(
        "file:///b.gx",
        indoc! {"
            import './a'
            terminal WORD: /[a-z]+/;
        "},
    );
    let diagnostics: Vec<Diagnostic> = super::validate(&b, &[&a]).iter().cloned().collect();
    let clashes = of_kind(&diagnostics, DiagnosticKind::TerminalKeywordClash);
    // b's own WORD terminal against a's keyword. a's identical clash is a's
    // diagnostic, not b's.
    assert_eq!(clashes.len(), 1);
    let import_range = b.root.imports().next().unwrap().as_cst().text_range();
    assert_eq!(clashes[0].range, import_range);
    assert!(clashes[0].message.contains("file:///a.gx"));
}

#[test]
fn reserved_self_and_gen_names() {
    let diagnostics = diagnostics_of(indoc! {"
        interface Self { gen: string }
    "});
    let reserved = of_kind(&diagnostics, DiagnosticKind::ReservedName);
    assert_eq!(reserved.len(), 2);
    assert!(reserved[0].message.contains("`Self`"));
    assert!(reserved[1].message.contains("`gen`"));
}

#[test]
fn terminals_and_keywords_clash_across_sibling_imports() {
    let a = document("file:///a.gx", "terminal TOK: /[a-z]+/;");
    let b = document(
        "file:///b.gx",
        "B: 'TOK' name=WORD;\nterminal WORD: /[a-z]+/;",
    );
    let c = document(
        "file:///c.gx",
        indoc! {"
            import './a'
            import './b'
            X: name=TOK;
        "},
    );
    let diagnostics: Vec<Diagnostic> = super::validate(&c, &[&a, &b]).iter().cloned().collect();
    let clashes = of_kind(&diagnostics, DiagnosticKind::TerminalKeywordClash);
    assert_eq!(clashes.len(), 1);
    // Reported on the statement importing the terminal's document.
    let import_range = c.root.imports().next().unwrap().as_cst().text_range();
    assert_eq!(clashes[0].range, import_range);
    assert!(clashes[0].message.contains("imported terminal `TOK`"));
    assert!(clashes[0].message.contains("file:///b.gx"));
}

#[test]
fn unrelated_documents_do_not_clash() {
    let a = document("file:///a.gx", "terminal ID: /[a-z]+/;");
    let b = document("file:///b.gx", "X: 'ID' name=WORD;\nterminal WORD: /[a-z]+/;");
    // No import between them: nothing connects the two namespaces.
    let diagnostics: Vec<Diagnostic> = super::validate(&b, &[&a]).iter().cloned().collect();
    assert_eq!(
        of_kind(&diagnostics, DiagnosticKind::TerminalKeywordClash).len(),
        0
    );
}
