//! Serializable stand-ins for AST nodes.
//!
//! Scope and index operations never require a document's full AST to be
//! resident: a declaration is represented by an [`AstNodeDescription`], a
//! resolved cross-reference edge by a [`ReferenceDescription`]. Both carry
//! just enough identity (URI + structural path) to locate the node again.

use std::fmt;

use rowan::TextRange;
use serde::{Deserialize, Serialize};

/// Identity of a document in the workspace.
///
/// Normalized string form, e.g. `file:///grammars/expr.gx`. Import paths are
/// resolved against the importing document's URI via [`Uri::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uri(String);

/// Default extension appended to import paths that lack one.
pub const GRAMMAR_EXTENSION: &str = ".gx";

impl Uri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve a textual import path against this document's URI.
    ///
    /// `./` and `../` segments are normalized; the grammar extension is
    /// appended when the path has none. `..` above the root is dropped.
    pub fn resolve(&self, import_path: &str) -> Uri {
        let (scheme, base_path) = match self.0.split_once("://") {
            Some((scheme, rest)) => (Some(scheme), rest),
            None => (None, self.0.as_str()),
        };

        let mut segments: Vec<&str> = base_path.split('/').collect();
        // Drop the document's own file name.
        segments.pop();

        for segment in import_path.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                other => segments.push(other),
            }
        }

        let mut path = segments.join("/");
        let file_name = path.rsplit('/').next().unwrap_or(&path);
        if !file_name.contains('.') {
            path.push_str(GRAMMAR_EXTENSION);
        }

        match scheme {
            Some(scheme) => Uri(format!("{scheme}://{path}")),
            None => Uri(path),
        }
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Uri {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Structural path of a node within its document.
///
/// Child-node indices from the root, e.g. `/3/0/2`. Stable for the lifetime
/// of one parse; a re-parse rebuilds all paths wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct NodePath(String);

impl NodePath {
    pub fn root() -> Self {
        Self(String::new())
    }

    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the `index`-th child node under this path.
    pub fn child(&self, index: usize) -> NodePath {
        NodePath(format!("{}/{}", self.0, index))
    }

    /// Child indices from the root, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .split('/')
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse().ok())
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What kind of declaration a description stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DescriptionTag {
    /// A parser rule.
    Rule,
    /// A terminal rule.
    TerminalRule,
    /// A declared interface, or a synthetic inferred-type export.
    Interface,
    /// A declared union type alias.
    UnionType,
}

impl DescriptionTag {
    /// Whether this tag belongs to the polymorphic AST-type category
    /// (valid target of `extends`, union branches, and cross-references).
    pub fn is_ast_type(self) -> bool {
        matches!(self, Self::Interface | Self::UnionType)
    }

    /// Whether this tag is a valid target of a rule call.
    pub fn is_rule(self) -> bool {
        matches!(self, Self::Rule | Self::TerminalRule)
    }
}

/// A lightweight, serializable stand-in for a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstNodeDescription {
    pub name: String,
    pub tag: DescriptionTag,
    /// Owning document.
    pub uri: Uri,
    /// Structural path of the declaration node within its document.
    pub path: NodePath,
    /// Range of the name token.
    pub name_range: TextRange,
    /// Range of the full declaration.
    pub full_range: TextRange,
}

impl AstNodeDescription {
    /// Whether `other` describes the same node.
    pub fn same_node(&self, other: &AstNodeDescription) -> bool {
        self.uri == other.uri && self.path == other.path
    }
}

/// One resolved cross-reference edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDescription {
    pub source_uri: Uri,
    /// Path of the reference node at the source.
    pub source_path: NodePath,
    /// Range of the reference text at the source.
    pub source_range: TextRange,
    pub target_uri: Uri,
    pub target_path: NodePath,
    /// Whether source and target live in the same document.
    pub local: bool,
}

impl ReferenceDescription {
    /// Whether this edge points at the given declaration.
    pub fn targets(&self, description: &AstNodeDescription) -> bool {
        self.target_uri == description.uri && self.target_path == description.path
    }
}
