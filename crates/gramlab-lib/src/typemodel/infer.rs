//! Type model construction from a parsed grammar.
//!
//! Depth-first traversal of each rule body. Assignments contribute
//! attributes to the current inference target; actions fork a fresh target
//! for the remainder of their alternative. Inferred types sharing a name
//! merge their attribute sets across sites; conflicts are left to the
//! validator.

use indexmap::IndexMap;

use crate::parser::ast::{
    AssignOp, Assignment, Element, InterfaceDecl, ParserRule, Root, TerminalRule, TypeAlias,
    TypeBranch, TypeBranchNode,
};

use super::types::{
    Attribute, CallSite, InterfaceInfo, Primitive, PropertyType, ReturnType, RuleInfo, RuleKind,
    SuperTypeRef, TypeDescriptor, TypeModel, TypeSegment, UnionInfo,
};

/// Build the type model for one parsed grammar document.
pub fn build(root: &Root) -> TypeModel {
    let mut model = TypeModel::default();

    for interface in root.interfaces() {
        if let Some(info) = interface_info(&interface) {
            model.interfaces.entry(info.name.clone()).or_insert(info);
        }
    }
    for alias in root.type_aliases() {
        if let Some(info) = union_info(&alias) {
            model.unions.entry(info.name.clone()).or_insert(info);
        }
    }
    for rule in root.parser_rules() {
        if let Some(info) = parser_rule_info(&rule) {
            model.rules.entry(info.name.clone()).or_insert(info);
        }
    }
    for terminal in root.terminal_rules() {
        if let Some(info) = terminal_rule_info(&terminal) {
            model.rules.entry(info.name.clone()).or_insert(info);
        }
    }

    merge_inferred(&mut model);
    model
}

fn merge_inferred(model: &mut TypeModel) {
    let mut inferred: IndexMap<String, TypeDescriptor> = IndexMap::new();
    for rule in model.rules.values() {
        if rule.is_data_type() {
            continue;
        }
        for segment in &rule.segments {
            let Some(site) = segment.inferred_site else {
                continue;
            };
            if model.interfaces.contains_key(&segment.target)
                || model.unions.contains_key(&segment.target)
            {
                continue;
            }
            let descriptor =
                inferred
                    .entry(segment.target.clone())
                    .or_insert_with(|| TypeDescriptor {
                        name: segment.target.clone(),
                        attributes: IndexMap::new(),
                        sites: Vec::new(),
                    });
            descriptor.sites.push(site);
            for attribute in &segment.attributes {
                descriptor
                    .attributes
                    .entry(attribute.name.clone())
                    .or_insert_with(|| attribute.clone());
            }
        }
    }
    model.inferred = inferred;
}

fn interface_info(interface: &InterfaceDecl) -> Option<InterfaceInfo> {
    let name_token = interface.name()?;
    let extends = interface
        .extends()
        .filter_map(|t| {
            let token = t.name()?;
            Some(SuperTypeRef {
                name: token.text().to_owned(),
                range: token.text_range(),
            })
        })
        .collect();
    let mut attributes = IndexMap::new();
    for attr in interface.attributes() {
        let Some(attr_name) = attr.name() else {
            continue;
        };
        let branches = attr
            .type_expr()
            .map(|e| e.branches())
            .unwrap_or_default();
        let attribute = Attribute {
            name: attr_name.text().to_owned(),
            ty: branches_type(&branches),
            optional: attr.is_optional(),
            array: branches.iter().any(|b| b.array),
            range: attr_name.text_range(),
        };
        attributes
            .entry(attribute.name.clone())
            .or_insert(attribute);
    }
    Some(InterfaceInfo {
        name: name_token.text().to_owned(),
        name_range: name_token.text_range(),
        extends,
        attributes,
    })
}

fn union_info(alias: &TypeAlias) -> Option<UnionInfo> {
    let name_token = alias.name()?;
    let branches = alias
        .type_expr()
        .map(|e| e.branches())
        .unwrap_or_default()
        .iter()
        .map(branch_type)
        .collect();
    Some(UnionInfo {
        name: name_token.text().to_owned(),
        name_range: name_token.text_range(),
        branches,
    })
}

fn branch_type(branch: &TypeBranch) -> PropertyType {
    match &branch.node {
        TypeBranchNode::Ref(type_ref) => {
            let name = type_ref
                .name()
                .map(|t| t.text().to_owned())
                .unwrap_or_default();
            match Primitive::from_name(&name) {
                Some(primitive) => PropertyType::Primitive(primitive),
                None => PropertyType::Reference(name),
            }
        }
        TypeBranchNode::Literal(literal) => {
            PropertyType::Literal(literal.value().unwrap_or_default())
        }
    }
}

fn branches_type(branches: &[TypeBranch]) -> PropertyType {
    let mut types: Vec<PropertyType> = branches.iter().map(branch_type).collect();
    match types.len() {
        1 => types.remove(0),
        _ => PropertyType::Union(types),
    }
}

fn terminal_rule_info(terminal: &TerminalRule) -> Option<RuleInfo> {
    let name_token = terminal.name()?;
    let calls = terminal
        .calls()
        .filter_map(|c| {
            let token = c.name()?;
            Some(CallSite {
                name: token.text().to_owned(),
                range: token.text_range(),
            })
        })
        .collect();
    Some(RuleInfo {
        name: name_token.text().to_owned(),
        name_range: name_token.text_range(),
        kind: RuleKind::Terminal {
            hidden: terminal.is_hidden(),
        },
        returns: None,
        infers: None,
        segments: Vec::new(),
        calls,
        value_only_body: true,
    })
}

fn parser_rule_info(rule: &ParserRule) -> Option<RuleInfo> {
    let name_token = rule.name()?;
    let name = name_token.text().to_owned();

    let returns = rule
        .returns_clause()
        .and_then(|c| c.type_ref())
        .and_then(|t| t.name())
        .map(|token| {
            let text = token.text();
            match Primitive::from_name(text) {
                Some(primitive) => ReturnType::Primitive(primitive),
                None => ReturnType::Named(text.to_owned()),
            }
        });
    let infers = rule
        .infers_clause()
        .and_then(|c| c.name())
        .map(|t| t.text().to_owned());

    let mut info = RuleInfo {
        name,
        name_range: name_token.text_range(),
        kind: RuleKind::Parser {
            entry: rule.is_entry(),
            fragment: rule.is_fragment(),
        },
        returns,
        infers,
        segments: Vec::new(),
        calls: Vec::new(),
        value_only_body: true,
    };

    let root_target = info.type_name().to_owned();
    let root_site = info.infers_own_type().then(|| {
        rule.infers_clause()
            .and_then(|c| c.name())
            .map(|t| t.text_range())
            .unwrap_or_else(|| name_token.text_range())
    });

    let mut walker = Walker {
        segments: vec![TypeSegment {
            target: root_target,
            inferred_site: root_site,
            attributes: Vec::new(),
        }],
        current: 0,
        calls: Vec::new(),
        value_only: true,
    };
    if let Some(body) = rule.body() {
        walker.walk(&body, Flags::default());
    }

    info.segments = walker.segments;
    info.calls = walker.calls;
    info.value_only_body = walker.value_only;
    Some(info)
}

#[derive(Debug, Clone, Copy, Default)]
struct Flags {
    optional: bool,
    array: bool,
}

struct Walker {
    segments: Vec<TypeSegment>,
    current: usize,
    calls: Vec<CallSite>,
    value_only: bool,
}

impl Walker {
    fn walk(&mut self, element: &Element, flags: Flags) {
        match element {
            Element::Alt(alt) => {
                let branches: Vec<Element> = alt.branches().collect();
                let branch_flags = if branches.len() > 1 {
                    Flags {
                        optional: true,
                        ..flags
                    }
                } else {
                    flags
                };
                let entry = self.current;
                for branch in &branches {
                    self.current = entry;
                    self.walk(branch, branch_flags);
                }
                self.current = entry;
            }
            Element::UnorderedGroup(group) => {
                for item in group.items() {
                    self.walk(&item, flags);
                }
            }
            Element::Group(group) => {
                for item in group.items() {
                    self.walk(&item, flags);
                }
            }
            Element::Quantified(quantified) => {
                use crate::parser::SyntaxKind;
                let flags = match quantified.operator().map(|t| t.kind()) {
                    Some(SyntaxKind::Question) => Flags {
                        optional: true,
                        ..flags
                    },
                    Some(SyntaxKind::Star) => Flags {
                        optional: true,
                        array: true,
                    },
                    Some(SyntaxKind::Plus) => Flags {
                        array: true,
                        ..flags
                    },
                    _ => flags,
                };
                if let Some(inner) = quantified.inner() {
                    self.walk(&inner, flags);
                }
            }
            Element::Assignment(assignment) => {
                self.value_only = false;
                self.record_assignment(assignment, flags);
            }
            Element::Action(action) => {
                self.value_only = false;
                let name = if action.is_infer() {
                    action.inferred_name()
                } else {
                    action.type_ref().and_then(|t| t.name())
                };
                let Some(name_token) = name else {
                    return;
                };
                self.segments.push(TypeSegment {
                    target: name_token.text().to_owned(),
                    inferred_site: action.is_infer().then(|| name_token.text_range()),
                    attributes: Vec::new(),
                });
                self.current = self.segments.len() - 1;
            }
            Element::CrossRef(cross_ref) => {
                self.value_only = false;
                // `[T:TOK]` uses TOK to lex the referenced name.
                if let Some(token) = cross_ref.token_rule().and_then(|c| c.name()) {
                    self.calls.push(CallSite {
                        name: token.text().to_owned(),
                        range: token.text_range(),
                    });
                }
            }
            Element::RuleCall(call) => {
                if let Some(token) = call.name() {
                    self.calls.push(CallSite {
                        name: token.text().to_owned(),
                        range: token.text_range(),
                    });
                }
            }
            Element::Keyword(_) => {}
        }
    }

    fn record_assignment(&mut self, assignment: &Assignment, flags: Flags) {
        let Some(feature) = assignment.feature() else {
            return;
        };
        // The value still contributes rule-call edges.
        if let Some(value) = assignment.value() {
            self.collect_calls(&value);
        }
        let ty = match assignment.op() {
            AssignOp::Flag => PropertyType::Primitive(Primitive::Boolean),
            _ => assignment
                .value()
                .map(|v| value_type(&v))
                .unwrap_or(PropertyType::Union(Vec::new())),
        };
        let attribute = Attribute {
            name: feature.text().to_owned(),
            ty,
            optional: flags.optional,
            array: flags.array || assignment.op() == AssignOp::Append,
            range: feature.text_range(),
        };
        self.segments[self.current].attributes.push(attribute);
    }

    fn collect_calls(&mut self, element: &Element) {
        match element {
            Element::RuleCall(call) => {
                if let Some(token) = call.name() {
                    self.calls.push(CallSite {
                        name: token.text().to_owned(),
                        range: token.text_range(),
                    });
                }
            }
            Element::Alt(alt) => {
                for branch in alt.branches() {
                    self.collect_calls(&branch);
                }
            }
            Element::Group(group) => {
                for item in group.items() {
                    self.collect_calls(&item);
                }
            }
            Element::UnorderedGroup(group) => {
                for item in group.items() {
                    self.collect_calls(&item);
                }
            }
            Element::Quantified(quantified) => {
                if let Some(inner) = quantified.inner() {
                    self.collect_calls(&inner);
                }
            }
            Element::Assignment(assignment) => {
                if let Some(value) = assignment.value() {
                    self.collect_calls(&value);
                }
            }
            Element::CrossRef(cross_ref) => {
                if let Some(token) = cross_ref.token_rule().and_then(|c| c.name()) {
                    self.calls.push(CallSite {
                        name: token.text().to_owned(),
                        range: token.text_range(),
                    });
                }
            }
            Element::Keyword(_) | Element::Action(_) => {}
        }
    }
}

/// The property type implied by an assignment's right-hand side.
fn value_type(element: &Element) -> PropertyType {
    let mut leaves = Vec::new();
    collect_value_leaves(element, &mut leaves);
    match leaves.len() {
        1 => leaves.remove(0),
        _ => PropertyType::Union(leaves),
    }
}

fn collect_value_leaves(element: &Element, out: &mut Vec<PropertyType>) {
    match element {
        Element::Keyword(keyword) => {
            out.push(PropertyType::Literal(keyword.value().unwrap_or_default()));
        }
        Element::RuleCall(call) => {
            let name = call
                .name()
                .map(|t| t.text().to_owned())
                .unwrap_or_default();
            out.push(PropertyType::Node(name));
        }
        Element::CrossRef(cross_ref) => {
            let name = cross_ref
                .target()
                .and_then(|t| t.name())
                .map(|t| t.text().to_owned())
                .unwrap_or_default();
            out.push(PropertyType::Reference(name));
        }
        Element::Alt(alt) => {
            for branch in alt.branches() {
                collect_value_leaves(&branch, out);
            }
        }
        Element::Group(group) => {
            for item in group.items() {
                collect_value_leaves(&item, out);
            }
        }
        Element::UnorderedGroup(group) => {
            for item in group.items() {
                collect_value_leaves(&item, out);
            }
        }
        Element::Quantified(quantified) => {
            if let Some(inner) = quantified.inner() {
                collect_value_leaves(&inner, out);
            }
        }
        Element::Assignment(_) | Element::Action(_) => {}
    }
}
