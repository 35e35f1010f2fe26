use indoc::indoc;

use indexmap::IndexSet;

use gramlab_core::Uri;

use crate::parser::{SyntaxKind, SyntaxNode};
use crate::workspace::documents::GrammarDocument;
use crate::workspace::index::WorkspaceIndex;

use super::provider::{category_of, ReferenceCategory, ScopeProvider};

fn document(uri: &str, source: &str) -> GrammarDocument {
    GrammarDocument::build(Uri::new(uri), source)
}

fn index_of(documents: &[&GrammarDocument]) -> WorkspaceIndex {
    let mut index = WorkspaceIndex::new();
    for document in documents {
        index.update_document(document.uri.clone(), document.scopes.exports.clone());
    }
    index
}

/// First reference node of `kind` whose identifier reads `name`.
fn reference_node(document: &GrammarDocument, kind: SyntaxKind, name: &str) -> SyntaxNode {
    document
        .root
        .as_cst()
        .descendants()
        .find(|n| {
            n.kind() == kind
                && n.children_with_tokens()
                    .filter_map(|it| it.into_token())
                    .any(|t| t.kind() == SyntaxKind::Id && t.text() == name)
        })
        .unwrap()
}

#[test]
fn reference_categories() {
    let doc = document(
        "file:///main.gx",
        "X returns T: v=Other;\ninterface T { v: string }\nOther: name=ID;\nterminal ID: /[a-z]+/;\n",
    );
    let type_ref = reference_node(&doc, SyntaxKind::TypeRef, "T");
    let rule_call = reference_node(&doc, SyntaxKind::RuleCall, "Other");
    assert_eq!(category_of(&type_ref), Some(ReferenceCategory::AstType));
    assert_eq!(category_of(&rule_call), Some(ReferenceCategory::Rule));
    assert_eq!(category_of(doc.root.as_cst()), None);
}

#[test]
fn type_references_are_import_scoped_but_rule_calls_are_not() {
    let a = document("file:///a.gx", "interface Decl { name: string }\n");
    let c = document(
        "file:///c.gx",
        "interface Other { name: string }\nR: name=ID;\nterminal ID: /[a-z]+/;\n",
    );
    let b = document(
        "file:///b.gx",
        indoc! {"
            import './a'
            X returns Decl: name=WORD;
            Y returns Other: v=R;
            terminal WORD: /[a-z]+/;
        "},
    );
    let index = index_of(&[&a, &b, &c]);
    let closure: IndexSet<Uri> = [b.uri.clone(), a.uri.clone()].into_iter().collect();
    let provider = ScopeProvider::new(&index, closure);

    // `Decl` comes from the imported document.
    let decl_ref = reference_node(&b, SyntaxKind::TypeRef, "Decl");
    let resolved = provider.scope_for(&b, &decl_ref).element("Decl").unwrap();
    assert_eq!(resolved.uri, a.uri);

    // `Other` exists in the workspace but outside the import closure.
    let other_ref = reference_node(&b, SyntaxKind::TypeRef, "Other");
    assert!(provider.scope_for(&b, &other_ref).element("Other").is_none());

    // Rule calls resolve workspace-wide regardless of imports.
    let rule_call = reference_node(&b, SyntaxKind::RuleCall, "R");
    let resolved = provider.scope_for(&b, &rule_call).element("R").unwrap();
    assert_eq!(resolved.uri, c.uri);
}

#[test]
fn rule_scope_never_yields_types() {
    let a = document(
        "file:///a.gx",
        "Decl: name=ID;\nterminal ID: /[a-z]+/;\ninterface Thing { name: string }\n",
    );
    let index = index_of(&[&a]);
    let provider = ScopeProvider::new(&index, [a.uri.clone()].into_iter().collect());

    let rule_call = reference_node(&a, SyntaxKind::RuleCall, "ID");
    let scope = provider.scope_for(&a, &rule_call);
    assert!(scope.element("Thing").is_none());
    assert!(scope.element("ID").is_some());
}

#[test]
fn local_declarations_shadow_global_ones() {
    let a = document("file:///a.gx", "interface Node { name: string }\n");
    let b = document(
        "file:///b.gx",
        indoc! {"
            import './a'
            B infers Node: name=ID;
            C: c=[Node];
            terminal ID: /[a-z]+/;
        "},
    );
    let index = index_of(&[&a, &b]);
    let closure: IndexSet<Uri> = [b.uri.clone(), a.uri.clone()].into_iter().collect();
    let provider = ScopeProvider::new(&index, closure);

    let node_ref = reference_node(&b, SyntaxKind::TypeRef, "Node");
    let resolved = provider.scope_for(&b, &node_ref).element("Node").unwrap();
    assert_eq!(resolved.uri, b.uri);
}

#[test]
fn non_reference_nodes_get_the_empty_scope() {
    let a = document("file:///a.gx", "Decl: name=ID;\nterminal ID: /[a-z]+/;\n");
    let index = index_of(&[&a]);
    let provider = ScopeProvider::new(&index, [a.uri.clone()].into_iter().collect());

    let scope = provider.scope_for(&a, a.root.as_cst());
    assert!(scope.element("Decl").is_none());
    assert_eq!(scope.all().count(), 0);
}
