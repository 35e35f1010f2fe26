//! Typed AST wrappers over CST nodes.
//!
//! Each struct wraps a `SyntaxNode` and provides typed accessors.
//! Cast is infallible for correct `SyntaxKind` - validation happens elsewhere.

use gramlab_core::NodePath;

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(GrammarDecl, GrammarDecl);
ast_node!(Import, Import);
ast_node!(ParserRule, ParserRule);
ast_node!(TerminalRule, TerminalRule);
ast_node!(InterfaceDecl, InterfaceDecl);
ast_node!(TypeAlias, TypeAlias);
ast_node!(ReturnsClause, ReturnsClause);
ast_node!(InfersClause, InfersClause);
ast_node!(Attribute, Attribute);
ast_node!(TypeExpr, TypeExpr);
ast_node!(TypeRef, TypeRef);
ast_node!(LiteralType, LiteralType);
ast_node!(Alt, Alt);
ast_node!(UnorderedGroup, UnorderedGroup);
ast_node!(Group, Group);
ast_node!(Assignment, Assignment);
ast_node!(CrossRef, CrossRef);
ast_node!(RuleCall, RuleCall);
ast_node!(Keyword, Keyword);
ast_node!(Action, Action);
ast_node!(Quantified, Quantified);

fn first_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == kind)
}

fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    first_token(node, kind).is_some()
}

/// Strip the surrounding quotes from a string literal's text.
pub fn unquote(text: &str) -> &str {
    let text = text
        .strip_prefix('\'')
        .or_else(|| text.strip_prefix('"'))
        .unwrap_or(text);
    text.strip_suffix('\'')
        .or_else(|| text.strip_suffix('"'))
        .unwrap_or(text)
}

/// Element: anything that can appear in a parser rule body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Element {
    Alt(Alt),
    UnorderedGroup(UnorderedGroup),
    Group(Group),
    Assignment(Assignment),
    CrossRef(CrossRef),
    RuleCall(RuleCall),
    Keyword(Keyword),
    Action(Action),
    Quantified(Quantified),
}

impl Element {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Alt => Alt::cast(node).map(Element::Alt),
            SyntaxKind::UnorderedGroup => {
                UnorderedGroup::cast(node).map(Element::UnorderedGroup)
            }
            SyntaxKind::Group => Group::cast(node).map(Element::Group),
            SyntaxKind::Assignment => Assignment::cast(node).map(Element::Assignment),
            SyntaxKind::CrossRef => CrossRef::cast(node).map(Element::CrossRef),
            SyntaxKind::RuleCall => RuleCall::cast(node).map(Element::RuleCall),
            SyntaxKind::Keyword => Keyword::cast(node).map(Element::Keyword),
            SyntaxKind::Action => Action::cast(node).map(Element::Action),
            SyntaxKind::Quantified => Quantified::cast(node).map(Element::Quantified),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Element::Alt(n) => n.as_cst(),
            Element::UnorderedGroup(n) => n.as_cst(),
            Element::Group(n) => n.as_cst(),
            Element::Assignment(n) => n.as_cst(),
            Element::CrossRef(n) => n.as_cst(),
            Element::RuleCall(n) => n.as_cst(),
            Element::Keyword(n) => n.as_cst(),
            Element::Action(n) => n.as_cst(),
            Element::Quantified(n) => n.as_cst(),
        }
    }
}

impl Root {
    pub fn grammar_decl(&self) -> Option<GrammarDecl> {
        self.0.children().find_map(GrammarDecl::cast)
    }

    pub fn imports(&self) -> impl Iterator<Item = Import> + '_ {
        self.0.children().filter_map(Import::cast)
    }

    pub fn parser_rules(&self) -> impl Iterator<Item = ParserRule> + '_ {
        self.0.children().filter_map(ParserRule::cast)
    }

    pub fn terminal_rules(&self) -> impl Iterator<Item = TerminalRule> + '_ {
        self.0.children().filter_map(TerminalRule::cast)
    }

    pub fn interfaces(&self) -> impl Iterator<Item = InterfaceDecl> + '_ {
        self.0.children().filter_map(InterfaceDecl::cast)
    }

    pub fn type_aliases(&self) -> impl Iterator<Item = TypeAlias> + '_ {
        self.0.children().filter_map(TypeAlias::cast)
    }
}

impl GrammarDecl {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::Id)
    }
}

impl Import {
    pub fn path_token(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::StringLit)
    }

    pub fn path(&self) -> Option<String> {
        self.path_token().map(|t| unquote(t.text()).to_owned())
    }
}

impl ParserRule {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::Id)
    }

    pub fn is_entry(&self) -> bool {
        has_token(&self.0, SyntaxKind::KwEntry)
    }

    pub fn is_fragment(&self) -> bool {
        has_token(&self.0, SyntaxKind::KwFragment)
    }

    pub fn returns_clause(&self) -> Option<ReturnsClause> {
        self.0.children().find_map(ReturnsClause::cast)
    }

    pub fn infers_clause(&self) -> Option<InfersClause> {
        self.0.children().find_map(InfersClause::cast)
    }

    pub fn body(&self) -> Option<Element> {
        self.0.children().find_map(Element::cast)
    }
}

impl ReturnsClause {
    pub fn type_ref(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }
}

impl InfersClause {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::Id)
    }
}

impl TerminalRule {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::Id)
    }

    pub fn is_hidden(&self) -> bool {
        has_token(&self.0, SyntaxKind::KwHidden)
    }

    /// Quoted literal alternatives in the terminal body.
    pub fn literal_tokens(&self) -> impl Iterator<Item = SyntaxToken> + '_ {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::StringLit)
    }

    /// References to other terminals in the body.
    pub fn calls(&self) -> impl Iterator<Item = RuleCall> + '_ {
        self.0.children().filter_map(RuleCall::cast)
    }
}

impl InterfaceDecl {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::Id)
    }

    /// Supertype references after `extends`.
    pub fn extends(&self) -> impl Iterator<Item = TypeRef> + '_ {
        self.0.children().filter_map(TypeRef::cast)
    }

    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.0.children().filter_map(Attribute::cast)
    }
}

impl Attribute {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::Id)
    }

    pub fn is_optional(&self) -> bool {
        has_token(&self.0, SyntaxKind::Question)
    }

    pub fn type_expr(&self) -> Option<TypeExpr> {
        self.0.children().find_map(TypeExpr::cast)
    }
}

/// One branch of a type union, with its `[]` suffix if present.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeBranch {
    pub node: TypeBranchNode,
    pub array: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeBranchNode {
    Ref(TypeRef),
    Literal(LiteralType),
}

impl TypeExpr {
    pub fn branches(&self) -> Vec<TypeBranch> {
        let mut branches: Vec<TypeBranch> = Vec::new();
        for element in self.0.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Node(node) => {
                    let node = match node.kind() {
                        SyntaxKind::TypeRef => {
                            TypeRef::cast(node).map(TypeBranchNode::Ref)
                        }
                        SyntaxKind::LiteralType => {
                            LiteralType::cast(node).map(TypeBranchNode::Literal)
                        }
                        _ => None,
                    };
                    if let Some(node) = node {
                        branches.push(TypeBranch { node, array: false });
                    }
                }
                rowan::NodeOrToken::Token(token) => {
                    if token.kind() == SyntaxKind::BracketOpen {
                        if let Some(last) = branches.last_mut() {
                            last.array = true;
                        }
                    }
                }
            }
        }
        branches
    }

    pub fn type_refs(&self) -> impl Iterator<Item = TypeRef> + '_ {
        self.0.children().filter_map(TypeRef::cast)
    }
}

impl TypeAlias {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::Id)
    }

    pub fn type_expr(&self) -> Option<TypeExpr> {
        self.0.children().find_map(TypeExpr::cast)
    }
}

impl TypeRef {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::Id)
    }
}

impl LiteralType {
    pub fn token(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::StringLit)
    }

    pub fn value(&self) -> Option<String> {
        self.token().map(|t| unquote(t.text()).to_owned())
    }
}

impl Alt {
    pub fn branches(&self) -> impl Iterator<Item = Element> + '_ {
        self.0.children().filter_map(Element::cast)
    }
}

impl UnorderedGroup {
    pub fn items(&self) -> impl Iterator<Item = Element> + '_ {
        self.0.children().filter_map(Element::cast)
    }
}

impl Group {
    pub fn items(&self) -> impl Iterator<Item = Element> + '_ {
        self.0.children().filter_map(Element::cast)
    }
}

/// How an assignment stores its value on the AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `=` single value
    Single,
    /// `+=` array accumulation
    Append,
    /// `?=` boolean flag
    Flag,
}

impl Assignment {
    pub fn feature(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::Id)
    }

    pub fn op(&self) -> AssignOp {
        if has_token(&self.0, SyntaxKind::PlusEquals) {
            AssignOp::Append
        } else if has_token(&self.0, SyntaxKind::QuestionEquals) {
            AssignOp::Flag
        } else {
            AssignOp::Single
        }
    }

    pub fn value(&self) -> Option<Element> {
        self.0.children().find_map(Element::cast)
    }
}

impl CrossRef {
    /// The referenced AST type between the brackets.
    pub fn target(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }

    /// The terminal reference after `:` if present.
    pub fn token_rule(&self) -> Option<RuleCall> {
        self.0.children().find_map(RuleCall::cast)
    }
}

impl RuleCall {
    pub fn name(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::Id)
    }
}

impl Keyword {
    pub fn token(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::StringLit)
    }

    pub fn value(&self) -> Option<String> {
        self.token().map(|t| unquote(t.text()).to_owned())
    }
}

impl Action {
    pub fn is_infer(&self) -> bool {
        has_token(&self.0, SyntaxKind::KwInfer)
    }

    /// Name token of an inferring action: `{infer Fresh}`.
    pub fn inferred_name(&self) -> Option<SyntaxToken> {
        self.is_infer()
            .then(|| first_token(&self.0, SyntaxKind::Id))
            .flatten()
    }

    /// Type reference of a non-inferring action: `{Declared}`.
    pub fn type_ref(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }
}

impl Quantified {
    pub fn inner(&self) -> Option<Element> {
        self.0.children().find_map(Element::cast)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind().is_quantifier())
    }
}

/// Stable path of a node below the document root, counting node children only.
pub fn path_of(node: &SyntaxNode) -> NodePath {
    let mut indices = Vec::new();
    let mut current = node.clone();
    while let Some(parent) = current.parent() {
        let index = parent
            .children()
            .position(|child| child == current)
            .unwrap_or(0);
        indices.push(index);
        current = parent;
    }
    let mut path = NodePath::root();
    for index in indices.into_iter().rev() {
        path = path.child(index);
    }
    path
}

/// Resolve a path produced by [`path_of`] against a document root.
pub fn node_at_path(root: &SyntaxNode, path: &NodePath) -> Option<SyntaxNode> {
    let mut current = root.clone();
    for segment in path.segments() {
        current = current.children().nth(segment)?;
    }
    Some(current)
}
