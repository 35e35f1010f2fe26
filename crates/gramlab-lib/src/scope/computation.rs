//! Per-document scope computation.
//!
//! A single top-down pass over a parsed document builds the export table
//! and the precomputed scopes. Both are recomputed wholesale on re-parse
//! and are order-stable: two computations over the same tree yield
//! identical contents.

use indexmap::IndexMap;

use gramlab_core::{AstNodeDescription, DescriptionTag, NodePath, Scope, StreamScope, Uri};

use crate::parser::ast::{self, Action, ParserRule, Root};
use crate::parser::{SyntaxKind, SyntaxNode, SyntaxToken};

/// Container node → declarations visible starting at that container.
///
/// Nested containers see their own entries plus everything visible at the
/// nearest enclosing container, chained rather than flattened.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrecomputedScopes {
    map: IndexMap<NodePath, Vec<AstNodeDescription>>,
}

impl PrecomputedScopes {
    pub fn add(&mut self, container: NodePath, description: AstNodeDescription) {
        self.map.entry(container).or_default().push(description);
    }

    pub fn at(&self, container: &NodePath) -> &[AstNodeDescription] {
        self.map.get(container).map_or(&[], Vec::as_slice)
    }

    /// Every description attached to any container, in insertion order.
    pub fn descriptions(&self) -> impl Iterator<Item = &AstNodeDescription> {
        self.map.values().flatten()
    }

    /// Layered scope visible at `node`, nearest container first.
    pub fn scope_at(&self, node: &SyntaxNode) -> Box<dyn Scope> {
        self.scope_at_over(node, Box::new(gramlab_core::EmptyScope))
    }

    /// Like [`scope_at`](Self::scope_at), with an explicit outermost layer.
    pub fn scope_at_over<'a>(
        &self,
        node: &SyntaxNode,
        global: Box<dyn Scope + 'a>,
    ) -> Box<dyn Scope + 'a> {
        self.scope_at_filtered(node, global, |_| true)
    }

    /// Layered scope with the local layers restricted by `keep`.
    pub fn scope_at_filtered<'a>(
        &self,
        node: &SyntaxNode,
        global: Box<dyn Scope + 'a>,
        keep: impl Fn(&AstNodeDescription) -> bool,
    ) -> Box<dyn Scope + 'a> {
        let mut layers: Vec<Vec<AstNodeDescription>> = Vec::new();
        let mut current = Some(node.clone());
        while let Some(container) = current {
            let entries: Vec<AstNodeDescription> = self
                .at(&ast::path_of(&container))
                .iter()
                .filter(|d| keep(d))
                .cloned()
                .collect();
            if !entries.is_empty() {
                layers.push(entries);
            }
            current = container.parent();
        }

        let mut scope = global;
        for layer in layers.into_iter().rev() {
            scope = Box::new(StreamScope::with_outer(layer, scope));
        }
        scope
    }
}

/// Result of one scope-computation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeComputation {
    /// Globally nameable declarations, in document order.
    pub exports: Vec<AstNodeDescription>,
    pub precomputed: PrecomputedScopes,
}

/// Compute exports and precomputed scopes for one document.
pub fn compute(uri: &Uri, root: &Root) -> ScopeComputation {
    let mut result = ScopeComputation::default();
    let root_path = ast::path_of(root.as_cst());

    for rule in root.parser_rules() {
        if let Some(description) = rule_description(uri, &rule) {
            export(&mut result, root_path.clone(), description);
        }
        if let Some(description) = inferred_rule_description(uri, &rule) {
            export(&mut result, root_path.clone(), description);
        }
        collect_action_types(uri, &rule, &mut result);
    }
    for terminal in root.terminal_rules() {
        if let Some(name) = terminal.name() {
            let description = describe(
                uri,
                terminal.as_cst(),
                &name,
                DescriptionTag::TerminalRule,
            );
            export(&mut result, root_path.clone(), description);
        }
    }
    for interface in root.interfaces() {
        if let Some(name) = interface.name() {
            let description = describe(
                uri,
                interface.as_cst(),
                &name,
                DescriptionTag::Interface,
            );
            export(&mut result, root_path.clone(), description);
        }
    }
    for alias in root.type_aliases() {
        if let Some(name) = alias.name() {
            let description =
                describe(uri, alias.as_cst(), &name, DescriptionTag::UnionType);
            export(&mut result, root_path.clone(), description);
        }
    }

    result
}

fn export(result: &mut ScopeComputation, container: NodePath, description: AstNodeDescription) {
    result.exports.push(description.clone());
    result.precomputed.add(container, description);
}

fn describe(
    uri: &Uri,
    node: &SyntaxNode,
    name_token: &SyntaxToken,
    tag: DescriptionTag,
) -> AstNodeDescription {
    AstNodeDescription {
        name: name_token.text().to_owned(),
        tag,
        uri: uri.clone(),
        path: ast::path_of(node),
        name_range: name_token.text_range(),
        full_range: node.text_range(),
    }
}

fn rule_description(uri: &Uri, rule: &ParserRule) -> Option<AstNodeDescription> {
    let name = rule.name()?;
    Some(describe(uri, rule.as_cst(), &name, DescriptionTag::Rule))
}

/// Synthetic `Interface`-tagged export for a rule that infers its own type.
/// Anchored at the rule node so the declared location matches the rule's
/// name token (or the `infers` name token when present).
fn inferred_rule_description(uri: &Uri, rule: &ParserRule) -> Option<AstNodeDescription> {
    if rule.is_fragment() || rule.returns_clause().is_some() {
        return None;
    }
    let rule_name = rule.name()?;
    match rule.infers_clause().and_then(|c| c.name()) {
        Some(infers_name) => Some(describe(
            uri,
            rule.as_cst(),
            &infers_name,
            DescriptionTag::Interface,
        )),
        None => Some(describe(
            uri,
            rule.as_cst(),
            &rule_name,
            DescriptionTag::Interface,
        )),
    }
}

/// Every `{infer X}` action exports a synthetic type anchored at the action
/// node. The description is also attached to the enclosing rule's container
/// so it is visible from anywhere inside that rule.
fn collect_action_types(uri: &Uri, rule: &ParserRule, result: &mut ScopeComputation) {
    let rule_path = ast::path_of(rule.as_cst());
    for node in rule.as_cst().descendants() {
        if node.kind() != SyntaxKind::Action {
            continue;
        }
        let Some(action) = Action::cast(node) else {
            continue;
        };
        let Some(name) = action.inferred_name() else {
            continue;
        };
        let description = describe(uri, action.as_cst(), &name, DescriptionTag::Interface);
        result.exports.push(description.clone());
        result.precomputed.add(rule_path.clone(), description);
    }
}
