//! Naming checks: reserved names, duplicates, and terminal/keyword clashes.

use indexmap::{IndexMap, IndexSet};
use rowan::TextRange;

use gramlab_core::diagnostics::{DiagnosticKind, Diagnostics};

use crate::parser::ast::{Keyword, Root};
use crate::parser::cst::SyntaxKind;
use crate::parser::SyntaxToken;
use crate::workspace::documents::GrammarDocument;

/// Identifiers that collide with keywords of the generated target language
/// and therefore cannot appear as rule, type, or property names.
const RESERVED: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "Self", "self", "static", "struct", "super", "trait", "true", "try", "typeof",
    "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

pub(super) fn check(
    document: &GrammarDocument,
    imports: &[&GrammarDocument],
    out: &mut Diagnostics,
) {
    let root = &document.root;
    check_reserved(root, out);
    check_duplicates(root, out);
    check_terminal_keyword_clashes(document, imports, out);
}

fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}

fn report_reserved(token: &SyntaxToken, out: &mut Diagnostics) {
    if is_reserved(token.text()) {
        out.report(DiagnosticKind::ReservedName, token.text_range())
            .message(token.text())
            .emit();
    }
}

fn check_reserved(root: &Root, out: &mut Diagnostics) {
    for rule in root.parser_rules() {
        if let Some(name) = rule.name() {
            report_reserved(&name, out);
        }
        if let Some(clause) = rule.infers_clause()
            && let Some(name) = clause.name()
        {
            report_reserved(&name, out);
        }
    }
    for terminal in root.terminal_rules() {
        if let Some(name) = terminal.name() {
            report_reserved(&name, out);
        }
    }
    for interface in root.interfaces() {
        if let Some(name) = interface.name() {
            report_reserved(&name, out);
        }
        for attribute in interface.attributes() {
            if let Some(name) = attribute.name() {
                report_reserved(&name, out);
            }
        }
    }
    for alias in root.type_aliases() {
        if let Some(name) = alias.name() {
            report_reserved(&name, out);
        }
    }
    // Assignment features become struct fields of the generated node types.
    for node in root.as_cst().descendants() {
        if node.kind() == SyntaxKind::Assignment
            && let Some(assignment) = crate::parser::ast::Assignment::cast(node)
            && let Some(feature) = assignment.feature()
        {
            report_reserved(&feature, out);
        }
    }
}

/// Rules share one namespace, interfaces and type aliases another.
fn check_duplicates(root: &Root, out: &mut Diagnostics) {
    let mut rules: IndexMap<String, TextRange> = IndexMap::new();
    let mut types: IndexMap<String, TextRange> = IndexMap::new();

    for decl in root.as_cst().children() {
        let (name, table) = match decl.kind() {
            SyntaxKind::ParserRule => (
                crate::parser::ast::ParserRule::cast(decl).and_then(|r| r.name()),
                &mut rules,
            ),
            SyntaxKind::TerminalRule => (
                crate::parser::ast::TerminalRule::cast(decl).and_then(|r| r.name()),
                &mut rules,
            ),
            SyntaxKind::InterfaceDecl => (
                crate::parser::ast::InterfaceDecl::cast(decl).and_then(|i| i.name()),
                &mut types,
            ),
            SyntaxKind::TypeAlias => (
                crate::parser::ast::TypeAlias::cast(decl).and_then(|a| a.name()),
                &mut types,
            ),
            _ => continue,
        };
        let Some(name) = name else { continue };
        match table.get(name.text()) {
            Some(first) => {
                out.report(DiagnosticKind::DuplicateName, name.text_range())
                    .message(name.text())
                    .related_to("first defined here", *first)
                    .emit();
            }
            None => {
                table.insert(name.text().to_string(), name.text_range());
            }
        }
    }
}

/// Keyword literals used anywhere in a document's parser rule bodies.
fn keyword_values(root: &Root) -> IndexSet<String> {
    root.as_cst()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::Keyword)
        .filter_map(Keyword::cast)
        .filter_map(|k| k.value())
        .collect()
}

/// A terminal rule whose name is also used as a keyword would make the two
/// token definitions shadow each other in the generated lexer. Checked one
/// import hop deep in both directions; clashes mediated by an import are
/// reported on the import statement that brings them together.
fn check_terminal_keyword_clashes(
    document: &GrammarDocument,
    imports: &[&GrammarDocument],
    out: &mut Diagnostics,
) {
    let local_keywords = keyword_values(&document.root);
    let local_terminals: Vec<SyntaxToken> = document
        .root
        .terminal_rules()
        .filter_map(|t| t.name())
        .collect();

    // Local terminal vs local keyword.
    for terminal in &local_terminals {
        if local_keywords.contains(terminal.text()) {
            out.report(DiagnosticKind::TerminalKeywordClash, terminal.text_range())
                .message(format!(
                    "terminal `{}` clashes with a keyword of the same name used in this grammar",
                    terminal.text()
                ))
                .emit();
        }
    }

    // Map each direct import statement to the document it brings in.
    let statements: Vec<_> = document.root.imports().collect();
    let resolved: Vec<(TextRange, &GrammarDocument)> = statements
        .iter()
        .zip(document.imports.iter())
        .filter_map(|(statement, uri)| {
            let imported = imports.iter().find(|d| &d.uri == uri)?;
            Some((statement.as_cst().text_range(), *imported))
        })
        .collect();

    for &(range, imported) in &resolved {
        let imported_keywords = keyword_values(&imported.root);

        // Imported terminal vs local keyword.
        for terminal in imported.root.terminal_rules().filter_map(|t| t.name()) {
            if local_keywords.contains(terminal.text()) {
                out.report(DiagnosticKind::TerminalKeywordClash, range)
                    .message(format!(
                        "imported terminal `{}` clashes with a keyword used in this grammar",
                        terminal.text()
                    ))
                    .emit();
            }
        }

        // Local terminal vs imported keyword.
        for terminal in &local_terminals {
            if imported_keywords.contains(terminal.text()) {
                out.report(DiagnosticKind::TerminalKeywordClash, range)
                    .message(format!(
                        "terminal `{}` clashes with a keyword used in `{}`",
                        terminal.text(),
                        imported.uri
                    ))
                    .emit();
            }
        }
    }

    // Terminal from one import vs keyword from another. Both documents only
    // meet here, so the clash is this document's to report.
    for &(range, provider) in &resolved {
        for &(_, other) in &resolved {
            if provider.uri == other.uri {
                continue;
            }
            let other_keywords = keyword_values(&other.root);
            for terminal in provider.root.terminal_rules().filter_map(|t| t.name()) {
                if other_keywords.contains(terminal.text()) {
                    out.report(DiagnosticKind::TerminalKeywordClash, range)
                        .message(format!(
                            "imported terminal `{}` clashes with a keyword used in `{}`",
                            terminal.text(),
                            other.uri
                        ))
                        .emit();
                }
            }
        }
    }
}
