//! Keyword hygiene and body-shape checks.

use gramlab_core::diagnostics::{DiagnosticKind, Diagnostics};

use crate::parser::ast::{Keyword, Quantified, UnorderedGroup};
use crate::parser::cst::SyntaxKind;
use crate::workspace::documents::GrammarDocument;

pub(super) fn check(document: &GrammarDocument, out: &mut Diagnostics) {
    for node in document.root.as_cst().descendants() {
        match node.kind() {
            SyntaxKind::Keyword => {
                if let Some(keyword) = Keyword::cast(node) {
                    check_keyword(&keyword, out);
                }
            }
            SyntaxKind::UnorderedGroup => {
                if let Some(group) = UnorderedGroup::cast(node) {
                    check_unordered_group(&group, out);
                }
            }
            _ => {}
        }
    }
}

fn check_keyword(keyword: &Keyword, out: &mut Diagnostics) {
    let Some(token) = keyword.token() else { return };
    let Some(value) = keyword.value() else { return };
    if value.is_empty() {
        out.report(DiagnosticKind::EmptyKeyword, token.text_range())
            .emit();
    } else if value.chars().all(char::is_whitespace) {
        out.report(DiagnosticKind::WhitespaceOnlyKeyword, token.text_range())
            .emit();
    } else if value.chars().any(char::is_whitespace) {
        out.report(DiagnosticKind::KeywordContainsWhitespace, token.text_range())
            .message(format!("`{value}`"))
            .emit();
    }
}

/// `&` groups match their members in any order, so a member that may be
/// absent makes the match ambiguous.
fn check_unordered_group(group: &UnorderedGroup, out: &mut Diagnostics) {
    for member in group.as_cst().children() {
        if member.kind() != SyntaxKind::Quantified {
            continue;
        }
        let Some(quantified) = Quantified::cast(member) else {
            continue;
        };
        let Some(operator) = quantified.operator() else {
            continue;
        };
        if matches!(operator.kind(), SyntaxKind::Question | SyntaxKind::Star) {
            out.report(DiagnosticKind::OptionalInUnorderedGroup, operator.text_range())
                .emit();
        }
    }
}
