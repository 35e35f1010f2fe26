use indoc::indoc;

use super::ast::{self, AssignOp, Element, TypeBranchNode};
use super::parse;

fn parse_clean(source: &str) -> super::Root {
    let result = parse(source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        result.diagnostics
    );
    result.root
}

const SAMPLE: &str = indoc! {"
    grammar Sample
    import './common'

    entry Model: (persons+=Person)*;

    Person infers Human: 'person' name=ID friend=[Person:ID]?;

    Value returns string: ID;

    fragment NameClause: name=ID;

    terminal ID: /[a-z]+/;
    hidden terminal WS: /\\s+/;

    interface Named { name: string }
    interface Address extends Named { street: string  tags?: Tag[] }
    type Symbol = Person | 'builtin';
"};

#[test]
fn root_level_accessors() {
    let root = parse_clean(SAMPLE);

    assert_eq!(
        root.grammar_decl().and_then(|g| g.name()).unwrap().text(),
        "Sample"
    );
    let imports: Vec<_> = root.imports().filter_map(|i| i.path()).collect();
    assert_eq!(imports, vec!["./common"]);
    assert_eq!(root.parser_rules().count(), 4);
    assert_eq!(root.terminal_rules().count(), 2);
    assert_eq!(root.interfaces().count(), 2);
    assert_eq!(root.type_aliases().count(), 1);
}

#[test]
fn rule_modifiers_and_clauses() {
    let root = parse_clean(SAMPLE);
    let rules: Vec<_> = root.parser_rules().collect();

    assert!(rules[0].is_entry());
    assert!(!rules[0].is_fragment());
    assert!(rules[3].is_fragment());

    let person = &rules[1];
    assert_eq!(person.name().unwrap().text(), "Person");
    assert_eq!(
        person
            .infers_clause()
            .and_then(|c| c.name())
            .unwrap()
            .text(),
        "Human"
    );
    assert!(person.returns_clause().is_none());

    let value = &rules[2];
    assert_eq!(
        value
            .returns_clause()
            .and_then(|c| c.type_ref())
            .and_then(|t| t.name())
            .unwrap()
            .text(),
        "string"
    );
}

#[test]
fn assignment_operators_and_cross_refs() {
    let root = parse_clean(SAMPLE);
    let person = root.parser_rules().nth(1).unwrap();

    let Some(Element::Group(body)) = person.body() else {
        panic!("expected group body");
    };
    let items: Vec<_> = body.items().collect();

    let Element::Keyword(keyword) = &items[0] else {
        panic!("expected keyword");
    };
    assert_eq!(keyword.value().unwrap(), "person");

    let Element::Assignment(name) = &items[1] else {
        panic!("expected assignment");
    };
    assert_eq!(name.feature().unwrap().text(), "name");
    assert_eq!(name.op(), AssignOp::Single);

    let Element::Quantified(quantified) = &items[2] else {
        panic!("expected quantified element");
    };
    assert_eq!(quantified.operator().unwrap().text(), "?");
    let Some(Element::Assignment(friend)) = quantified.inner() else {
        panic!("expected assignment inside quantifier");
    };
    let Some(Element::CrossRef(cross_ref)) = friend.value() else {
        panic!("expected cross-reference value");
    };
    assert_eq!(
        cross_ref.target().and_then(|t| t.name()).unwrap().text(),
        "Person"
    );
    assert_eq!(
        cross_ref
            .token_rule()
            .and_then(|t| t.name())
            .unwrap()
            .text(),
        "ID"
    );
}

#[test]
fn append_operator() {
    let root = parse_clean("M: items+=Item*;");
    let rule = root.parser_rules().next().unwrap();
    let Some(Element::Quantified(quantified)) = rule.body() else {
        panic!("expected quantified body");
    };
    let Some(Element::Assignment(assignment)) = quantified.inner() else {
        panic!("expected assignment");
    };
    assert_eq!(assignment.op(), AssignOp::Append);
}

#[test]
fn flag_operator() {
    let root = parse_clean("M: published?='published';");
    let rule = root.parser_rules().next().unwrap();
    let Some(Element::Assignment(assignment)) = rule.body() else {
        panic!("expected assignment body");
    };
    assert_eq!(assignment.op(), AssignOp::Flag);
    assert_eq!(assignment.feature().unwrap().text(), "published");
}

#[test]
fn interface_attributes_and_branches() {
    let root = parse_clean(SAMPLE);
    let address = root.interfaces().nth(1).unwrap();

    assert_eq!(address.name().unwrap().text(), "Address");
    let extends: Vec<_> = address
        .extends()
        .filter_map(|t| t.name())
        .map(|t| t.text().to_owned())
        .collect();
    assert_eq!(extends, vec!["Named"]);

    let attrs: Vec<_> = address.attributes().collect();
    assert_eq!(attrs.len(), 2);
    assert!(!attrs[0].is_optional());
    assert!(attrs[1].is_optional());

    let tag_branches = attrs[1].type_expr().unwrap().branches();
    assert_eq!(tag_branches.len(), 1);
    assert!(tag_branches[0].array);
}

#[test]
fn type_alias_branches() {
    let root = parse_clean(SAMPLE);
    let alias = root.type_aliases().next().unwrap();
    let branches = alias.type_expr().unwrap().branches();

    assert_eq!(branches.len(), 2);
    match &branches[0].node {
        TypeBranchNode::Ref(r) => assert_eq!(r.name().unwrap().text(), "Person"),
        other => panic!("expected type reference, got {other:?}"),
    }
    match &branches[1].node {
        TypeBranchNode::Literal(l) => assert_eq!(l.value().unwrap(), "builtin"),
        other => panic!("expected literal type, got {other:?}"),
    }
}

#[test]
fn action_accessors() {
    let root = parse_clean("Pair: left=ID {infer Swap} right=ID; Wrap: inner=ID {Wrapped};");
    let rules: Vec<_> = root.parser_rules().collect();

    let Some(Element::Group(pair_body)) = rules[0].body() else {
        panic!("expected group body");
    };
    let actions: Vec<_> = pair_body
        .items()
        .filter_map(|e| match e {
            Element::Action(a) => Some(a),
            _ => None,
        })
        .collect();
    assert_eq!(actions.len(), 1);
    assert!(actions[0].is_infer());
    assert_eq!(actions[0].inferred_name().unwrap().text(), "Swap");

    let Some(Element::Group(wrap_body)) = rules[1].body() else {
        panic!("expected group body");
    };
    let declared: Vec<_> = wrap_body
        .items()
        .filter_map(|e| match e {
            Element::Action(a) => Some(a),
            _ => None,
        })
        .collect();
    assert!(!declared[0].is_infer());
    assert_eq!(
        declared[0]
            .type_ref()
            .and_then(|t| t.name())
            .unwrap()
            .text(),
        "Wrapped"
    );
}

#[test]
fn terminal_body_accessors() {
    let root = parse_clean("terminal BOOL: 'true' | 'false' | DIGIT;");
    let terminal = root.terminal_rules().next().unwrap();

    assert!(!terminal.is_hidden());
    let literals: Vec<_> = terminal
        .literal_tokens()
        .map(|t| ast::unquote(t.text()).to_owned())
        .collect();
    assert_eq!(literals, vec!["true", "false"]);
    let calls: Vec<_> = terminal
        .calls()
        .filter_map(|c| c.name())
        .map(|t| t.text().to_owned())
        .collect();
    assert_eq!(calls, vec!["DIGIT"]);
}

#[test]
fn node_paths_round_trip() {
    let root = parse_clean(SAMPLE);
    let person = root.parser_rules().nth(1).unwrap();
    let cross_ref = person
        .as_cst()
        .descendants()
        .find(|n| n.kind() == super::SyntaxKind::CrossRef)
        .unwrap();

    let path = ast::path_of(&cross_ref);
    let resolved = ast::node_at_path(root.as_cst(), &path).unwrap();
    assert_eq!(resolved, cross_ref);

    assert_eq!(ast::path_of(root.as_cst()).as_str(), "");
}

#[test]
fn unquote_handles_both_styles() {
    assert_eq!(ast::unquote("'person'"), "person");
    assert_eq!(ast::unquote("\"person\""), "person");
    assert_eq!(ast::unquote("bare"), "bare");
}
