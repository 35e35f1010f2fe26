use rowan::TextRange;
use serde::{Deserialize, Serialize};

/// All diagnostic kinds the pipeline can produce.
///
/// One variant per rule family so that tooling can key on the kind: a
/// distinct kind is the issue code that lets an editor offer the matching
/// rewrite (e.g. dropping a superfluous `infer`, or turning `infers` into
/// `returns`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    // --- Parsing ---
    UnexpectedToken,
    ExpectedDeclaration,
    ExpectedElement,
    UnclosedGroup,

    // --- Linking ---
    UnresolvedReference,

    // --- Naming ---
    ReservedName,
    DuplicateName,
    TerminalKeywordClash,

    // --- Type relationships ---
    ExtendsUnionType,
    ExtendsInferredType,
    SuperfluousInfer,
    ExplicitlyDeclaredType,
    MissingReturns,
    MissingDataTypeReturn,
    PrimitiveReturnWithAssignments,
    MissingMandatoryProperty,

    // --- Cross-references ---
    CrossRefToNonAstType,
    MixedCrossRefAlternatives,
    FragmentAssigned,
    FragmentInTypeUnion,
    CrossRefFeatureNamedName,

    // --- Keywords ---
    EmptyKeyword,
    WhitespaceOnlyKeyword,
    KeywordContainsWhitespace,

    // --- Structure ---
    OptionalInUnorderedGroup,
    UnusedRule,
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            Self::ExtendsInferredType
            | Self::KeywordContainsWhitespace
            | Self::CrossRefFeatureNamedName => Severity::Warning,
            Self::UnusedRule => Severity::Hint,
            _ => Severity::Error,
        }
    }

    /// Base message for this kind, used when no context is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnexpectedToken => "unexpected token",
            Self::ExpectedDeclaration => "expected a rule, interface, type, or import",
            Self::ExpectedElement => "expected a keyword, rule call, assignment, or group",
            Self::UnclosedGroup => "missing closing delimiter",

            Self::UnresolvedReference => "unresolved reference",

            Self::ReservedName => "name is reserved in generated code",
            Self::DuplicateName => "duplicate name",
            Self::TerminalKeywordClash => "terminal name clashes with a keyword",

            Self::ExtendsUnionType => "interfaces cannot extend union types",
            Self::ExtendsInferredType => "extending an inferred type is discouraged",
            Self::SuperfluousInfer => "type is already declared, the `infer` keyword is superfluous",
            Self::ExplicitlyDeclaredType => {
                "type is already explicitly declared and cannot be inferred"
            }
            Self::MissingReturns => "rule must declare its type using `returns`",
            Self::MissingDataTypeReturn => "data type rule must declare a primitive return type",
            Self::PrimitiveReturnWithAssignments => {
                "rules with assignments cannot return a primitive data type"
            }
            Self::MissingMandatoryProperty => "mandatory property is not assigned by the rule",

            Self::CrossRefToNonAstType => "cross-reference target must be an AST node type",
            Self::MixedCrossRefAlternatives => {
                "cross-references cannot be mixed with other alternatives in one assignment"
            }
            Self::FragmentAssigned => "fragment rules cannot be assigned to a property",
            Self::FragmentInTypeUnion => "fragment rules cannot appear in a type union",
            Self::CrossRefFeatureNamedName => {
                "cross-reference property named `name` shadows the declaration name"
            }

            Self::EmptyKeyword => "keyword cannot be empty",
            Self::WhitespaceOnlyKeyword => "keyword cannot only consist of whitespace",
            Self::KeywordContainsWhitespace => "keyword should not contain whitespace",

            Self::OptionalInUnorderedGroup => {
                "optional elements in unordered groups are not supported"
            }
            Self::UnusedRule => "this rule is never used",
        }
    }

    /// Template for contextual messages; `{}` is replaced with caller detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnresolvedReference => "could not resolve reference to `{}`".to_string(),
            Self::ReservedName => "`{}` is reserved in generated code".to_string(),
            Self::DuplicateName => "`{}` is already defined".to_string(),
            Self::SuperfluousInfer => {
                "`{}` is a declared interface, the `infer` keyword is superfluous".to_string()
            }
            Self::ExplicitlyDeclaredType => {
                "`{}` is already explicitly declared and cannot be inferred".to_string()
            }
            Self::MissingReturns => "rule must declare `returns {}`".to_string(),
            Self::MissingMandatoryProperty => {
                "mandatory property `{}` is not assigned by the rule".to_string()
            }
            Self::CrossRefToNonAstType => {
                "cross-reference target must be an AST node type, found primitive: {}".to_string()
            }
            // Names both the fragment and the property; the caller supplies
            // the whole sentence.
            Self::FragmentAssigned => "{}".to_string(),
            Self::FragmentInTypeUnion => {
                "fragment rule `{}` cannot appear in a type union".to_string()
            }
            Self::KeywordContainsWhitespace => {
                "keyword {} should not contain whitespace".to_string()
            }
            Self::UnusedRule => "rule `{}` is never used".to_string(),

            // Clash messages vary by where terminal and keyword live; the
            // caller supplies the whole sentence.
            Self::TerminalKeywordClash => "{}".to_string(),

            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → `fallback_message()`
    /// - `Some(detail)` → `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Severity {
    #[default]
    Error,
    Warning,
    /// Informational, e.g. unused-rule detection. Never fails a build.
    Hint,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

/// A machine-applicable rewrite attached to a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub replacement: String,
    pub description: String,
}

impl Fix {
    pub fn new(replacement: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
            description: description.into(),
        }
    }
}

/// A secondary range with its own label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub range: TextRange,
    pub message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

/// One diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// The range underlined in output.
    pub range: TextRange,
    pub message: String,
    pub fix: Option<Fix>,
    pub related: Vec<RelatedInfo>,
}

impl Diagnostic {
    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            message: kind.fallback_message().to_string(),
            fix: None,
            related: Vec::new(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        if let Some(fix) = &self.fix {
            write!(f, " (fix: {})", fix.description)?;
        }
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        Ok(())
    }
}
