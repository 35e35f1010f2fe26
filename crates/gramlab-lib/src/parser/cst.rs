//! Syntax kinds for the grammar language.
//!
//! `SyntaxKind` serves dual roles: token kinds (from lexer) and node kinds
//! (from parser). Logos derives token recognition; node kinds lack
//! token/regex attributes. `GxLang` implements Rowan's `Language` trait for
//! tree construction.

use logos::Logos;
use rowan::Language;

/// All token and node kinds. Tokens first, then nodes, then `__LAST` sentinel.
/// `#[repr(u16)]` enables safe transmute in `kind_from_raw`.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    /// `+=` array assignment. Defined before `Plus` for correct precedence.
    #[token("+=")]
    PlusEquals,

    /// `?=` boolean assignment. Defined before `Question`.
    #[token("?=")]
    QuestionEquals,

    #[token("=")]
    Equals,

    #[token("|")]
    Pipe,

    #[token("&")]
    Amp,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("?")]
    Question,

    #[token("grammar")]
    KwGrammar,

    #[token("import")]
    KwImport,

    #[token("entry")]
    KwEntry,

    #[token("fragment")]
    KwFragment,

    #[token("terminal")]
    KwTerminal,

    #[token("hidden")]
    KwHidden,

    #[token("returns")]
    KwReturns,

    #[token("infers")]
    KwInfers,

    #[token("infer")]
    KwInfer,

    #[token("interface")]
    KwInterface,

    #[token("extends")]
    KwExtends,

    #[token("type")]
    KwType,

    /// Identifier. Defined after keywords so they take precedence.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Id,

    /// Quoted literal, single or double quotes, quotes included.
    #[regex(r#""(?:[^"\\\n]|\\.)*""#)]
    #[regex(r"'(?:[^'\\\n]|\\.)*'")]
    StringLit,

    /// Terminal pattern `/.../`, delimiters included.
    #[regex(r"/(?:[^/\\\n]|\\.)+/")]
    RegexLit,

    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,

    /// Defined with a raised priority so `/* ... */` never lexes as a pattern.
    #[regex(r"/\*(?:[^*]|\*[^/])*\*/", priority = 10)]
    BlockComment,

    /// Coalesced unrecognized characters.
    Garbage,
    Error,

    // --- Node kinds (non-terminals) ---
    Root,
    GrammarDecl,
    Import,
    ParserRule,
    TerminalRule,
    InterfaceDecl,
    TypeAlias,
    ReturnsClause,
    InfersClause,
    Attribute,
    TypeExpr,
    TypeRef,
    LiteralType,
    Alt,
    UnorderedGroup,
    Group,
    Assignment,
    CrossRef,
    RuleCall,
    Keyword,
    Action,
    Quantified,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | LineComment | BlockComment)
    }

    #[inline]
    pub fn is_quantifier(self) -> bool {
        matches!(self, Star | Plus | Question)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GxLang {}

impl Language for GxLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: We've verified the value is in bounds, and SyntaxKind is repr(u16)
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for Rowan types parameterized by our language.
pub type SyntaxNode = rowan::SyntaxNode<GxLang>;
pub type SyntaxToken = rowan::SyntaxToken<GxLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// 64-bit bitset of `SyntaxKind`s for O(1) membership testing.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Panics at compile time if any kind's discriminant >= 64.
    #[inline]
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 64, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        if kind >= 64 {
            return false;
        }
        self.0 & (1 << kind) != 0
    }

    #[inline]
    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

/// Tokens that can start an element inside a rule body.
pub const ELEMENT_FIRST_TOKENS: TokenSet = TokenSet::new(&[
    SyntaxKind::Id,
    SyntaxKind::StringLit,
    SyntaxKind::BracketOpen,
    SyntaxKind::BraceOpen,
    SyntaxKind::ParenOpen,
]);

/// Tokens that can start a top-level declaration.
pub const DECLARATION_FIRST_TOKENS: TokenSet = TokenSet::new(&[
    SyntaxKind::KwImport,
    SyntaxKind::KwEntry,
    SyntaxKind::KwFragment,
    SyntaxKind::KwTerminal,
    SyntaxKind::KwHidden,
    SyntaxKind::KwInterface,
    SyntaxKind::KwType,
    SyntaxKind::Id,
]);
