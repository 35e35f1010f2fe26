//! Type descriptors produced by the builder.
//!
//! One closed set of tagged variants per construct, so every pass that
//! branches on property shapes does so exhaustively.

use indexmap::IndexMap;
use rowan::TextRange;

/// Primitive data types a rule or attribute may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Number,
    Boolean,
    Bigint,
    Date,
}

impl Primitive {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "bigint" => Some(Self::Bigint),
            "Date" => Some(Self::Date),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Bigint => "bigint",
            Self::Date => "Date",
        }
    }
}

/// The syntactic shape of a property's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyType {
    Primitive(Primitive),
    /// Quoted literal type, e.g. `'+'`.
    Literal(String),
    /// Cross-reference to an AST type by name.
    Reference(String),
    /// Plain rule call; resolves to the called rule's type.
    Node(String),
    Union(Vec<PropertyType>),
}

impl PropertyType {
    /// Depth-first view of the leaf alternatives.
    pub fn leaves(&self) -> Vec<&PropertyType> {
        match self {
            PropertyType::Union(branches) => {
                branches.iter().flat_map(|b| b.leaves()).collect()
            }
            other => vec![other],
        }
    }
}

/// One attribute of an inferred or declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub ty: PropertyType,
    pub optional: bool,
    pub array: bool,
    /// Range of the feature name (or attribute name) token.
    pub range: TextRange,
}

/// A merged inferred type: union of the attributes contributed by every
/// inference site sharing this name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub name: String,
    pub attributes: IndexMap<String, Attribute>,
    /// Name ranges of the contributing rules and actions.
    pub sites: Vec<TextRange>,
}

/// A declared `interface`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    pub name: String,
    pub name_range: TextRange,
    pub extends: Vec<SuperTypeRef>,
    pub attributes: IndexMap<String, Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperTypeRef {
    pub name: String,
    pub range: TextRange,
}

/// A declared `type` alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionInfo {
    pub name: String,
    pub name_range: TextRange,
    pub branches: Vec<PropertyType>,
}

/// Return type clause of a parser rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    Primitive(Primitive),
    Named(String),
}

/// A rule-call edge, used for reachability and fragment checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    pub name: String,
    pub range: TextRange,
}

/// Attributes accumulated for one inference target within one rule body.
/// A rule starts with one segment; every action forks a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSegment {
    pub target: String,
    /// Anchor of the inference site; `None` when the target is declared
    /// elsewhere and this segment never materializes a type.
    pub inferred_site: Option<TextRange>,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Parser { entry: bool, fragment: bool },
    Terminal { hidden: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleInfo {
    pub name: String,
    pub name_range: TextRange,
    pub kind: RuleKind,
    pub returns: Option<ReturnType>,
    pub infers: Option<String>,
    pub segments: Vec<TypeSegment>,
    /// Rules and terminals this rule's body calls.
    pub calls: Vec<CallSite>,
    /// Whether the body consists only of keywords and rule calls, with no
    /// assignments, actions, or cross-references.
    pub value_only_body: bool,
}

impl RuleInfo {
    pub fn is_parser(&self) -> bool {
        matches!(self.kind, RuleKind::Parser { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, RuleKind::Terminal { .. })
    }

    pub fn is_entry(&self) -> bool {
        matches!(self.kind, RuleKind::Parser { entry: true, .. })
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.kind, RuleKind::Parser { fragment: true, .. })
    }

    /// Whether the rule produces a primitive value instead of an AST node.
    pub fn is_data_type(&self) -> bool {
        matches!(self.returns, Some(ReturnType::Primitive(_)))
    }

    /// The AST type this rule produces: the `infers` name, the `returns`
    /// name, or the rule's own name.
    pub fn type_name(&self) -> &str {
        if let Some(infers) = &self.infers {
            return infers;
        }
        match &self.returns {
            Some(ReturnType::Named(name)) => name,
            Some(ReturnType::Primitive(p)) => p.as_str(),
            None => &self.name,
        }
    }

    /// Whether this rule introduces an inferred type of its own.
    pub fn infers_own_type(&self) -> bool {
        self.is_parser() && !self.is_fragment() && self.returns.is_none()
    }
}

/// Everything the validator and scope computation need to know about the
/// types implied by one grammar document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeModel {
    pub interfaces: IndexMap<String, InterfaceInfo>,
    pub unions: IndexMap<String, UnionInfo>,
    pub rules: IndexMap<String, RuleInfo>,
    /// Inferred types merged across their inference sites, in first-site
    /// order.
    pub inferred: IndexMap<String, TypeDescriptor>,
}

impl TypeModel {
    /// Whether a name denotes a declared AST type.
    pub fn is_declared_type(&self, name: &str) -> bool {
        self.interfaces.contains_key(name) || self.unions.contains_key(name)
    }

    /// Whether a name denotes any known AST type, declared or inferred.
    pub fn is_ast_type(&self, name: &str) -> bool {
        self.is_declared_type(name) || self.inferred.contains_key(name)
    }
}
