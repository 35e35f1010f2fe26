//! Grammar productions for the grammar language.
//!
//! This module implements all `parse_*` methods as an extension of `Parser`.
//! The language covers parser rules, terminal rules, interfaces, and union
//! aliases, with Langium-style rule bodies.

use gramlab_core::diagnostics::DiagnosticKind;

use super::core::Parser;
use super::cst::{DECLARATION_FIRST_TOKENS, ELEMENT_FIRST_TOKENS, SyntaxKind};

impl Parser<'_> {
    pub(super) fn parse_root(&mut self) {
        self.start_node(SyntaxKind::Root);

        while !self.eof() {
            match self.current() {
                SyntaxKind::KwGrammar => self.parse_grammar_decl(),
                SyntaxKind::KwImport => self.parse_import(),
                SyntaxKind::KwEntry | SyntaxKind::KwFragment | SyntaxKind::Id => {
                    self.parse_parser_rule()
                }
                SyntaxKind::KwTerminal | SyntaxKind::KwHidden => self.parse_terminal_rule(),
                SyntaxKind::KwInterface => self.parse_interface(),
                SyntaxKind::KwType => self.parse_type_alias(),
                _ => self.error_and_bump(DiagnosticKind::ExpectedDeclaration),
            }
        }

        self.skip_trivia_to_buffer();
        self.drain_trivia();
        self.finish_node();
    }

    /// `grammar Name`
    fn parse_grammar_decl(&mut self) {
        self.start_node(SyntaxKind::GrammarDecl);
        self.bump();
        self.expect(SyntaxKind::Id, "grammar name");
        self.finish_node();
    }

    /// `import './path'` with an optional trailing `;`
    fn parse_import(&mut self) {
        self.start_node(SyntaxKind::Import);
        self.bump();
        self.expect(SyntaxKind::StringLit, "import path string");
        self.eat_token(SyntaxKind::Semicolon);
        self.finish_node();
    }

    /// `entry`? `fragment`? Name (`returns` Type | `infers` Name)? `:` body `;`
    fn parse_parser_rule(&mut self) {
        self.start_node(SyntaxKind::ParserRule);

        while matches!(
            self.current(),
            SyntaxKind::KwEntry | SyntaxKind::KwFragment
        ) {
            self.bump();
        }
        self.expect(SyntaxKind::Id, "rule name");

        match self.current() {
            SyntaxKind::KwReturns => {
                self.start_node(SyntaxKind::ReturnsClause);
                self.bump();
                self.parse_type_ref();
                self.finish_node();
            }
            SyntaxKind::KwInfers => {
                self.start_node(SyntaxKind::InfersClause);
                self.bump();
                self.expect(SyntaxKind::Id, "inferred type name");
                self.finish_node();
            }
            _ => {}
        }

        self.expect(SyntaxKind::Colon, "`:` before rule body");
        if self.currently_is_one_of(ELEMENT_FIRST_TOKENS) {
            self.parse_alternatives();
        } else {
            self.error(DiagnosticKind::ExpectedElement);
        }
        if !self.eat_token(SyntaxKind::Semicolon) {
            self.error_msg(DiagnosticKind::UnexpectedToken, "expected `;` after rule");
            self.synchronize_to_declaration();
        }

        self.finish_node();
    }

    /// `hidden`? `terminal` NAME `:` alternation of regexes, literals, and
    /// terminal references `;`
    fn parse_terminal_rule(&mut self) {
        self.start_node(SyntaxKind::TerminalRule);

        self.eat_token(SyntaxKind::KwHidden);
        self.expect(SyntaxKind::KwTerminal, "`terminal`");
        self.expect(SyntaxKind::Id, "terminal name");
        self.expect(SyntaxKind::Colon, "`:` before terminal body");

        loop {
            match self.current() {
                SyntaxKind::RegexLit | SyntaxKind::StringLit => self.bump(),
                SyntaxKind::Id => {
                    self.start_node(SyntaxKind::RuleCall);
                    self.bump();
                    self.finish_node();
                }
                _ => {
                    self.error(DiagnosticKind::ExpectedElement);
                    break;
                }
            }
            if !self.eat_token(SyntaxKind::Pipe) {
                break;
            }
        }

        if !self.eat_token(SyntaxKind::Semicolon) {
            self.error_msg(
                DiagnosticKind::UnexpectedToken,
                "expected `;` after terminal rule",
            );
            self.synchronize_to_declaration();
        }

        self.finish_node();
    }

    /// `interface Name extends A, B { attributes }`
    fn parse_interface(&mut self) {
        self.start_node(SyntaxKind::InterfaceDecl);
        self.bump();
        self.expect(SyntaxKind::Id, "interface name");

        if self.eat_token(SyntaxKind::KwExtends) {
            self.parse_type_ref();
            while self.eat_token(SyntaxKind::Comma) {
                self.parse_type_ref();
            }
        }

        if self.expect(SyntaxKind::BraceOpen, "`{`") {
            while self.currently_is(SyntaxKind::Id) {
                self.parse_attribute();
            }
            if !self.eat_token(SyntaxKind::BraceClose) {
                self.error(DiagnosticKind::UnclosedGroup);
                self.synchronize_to_declaration();
            }
        }
        self.eat_token(SyntaxKind::Semicolon);

        self.finish_node();
    }

    /// `name` `?`? `:` type expression
    fn parse_attribute(&mut self) {
        self.start_node(SyntaxKind::Attribute);
        self.bump();
        self.eat_token(SyntaxKind::Question);
        self.expect(SyntaxKind::Colon, "`:` after attribute name");
        self.parse_type_expr();
        self.finish_node();
    }

    /// `type Name = branches ;`
    fn parse_type_alias(&mut self) {
        self.start_node(SyntaxKind::TypeAlias);
        self.bump();
        self.expect(SyntaxKind::Id, "type alias name");
        self.expect(SyntaxKind::Equals, "`=`");
        self.parse_type_expr();
        if !self.eat_token(SyntaxKind::Semicolon) {
            self.error_msg(
                DiagnosticKind::UnexpectedToken,
                "expected `;` after type alias",
            );
            self.synchronize_to_declaration();
        }
        self.finish_node();
    }

    /// Union of type references and quoted literal types, each with an
    /// optional `[]` suffix.
    fn parse_type_expr(&mut self) {
        self.start_node(SyntaxKind::TypeExpr);
        loop {
            match self.current() {
                SyntaxKind::Id => self.parse_type_ref(),
                SyntaxKind::StringLit => {
                    self.start_node(SyntaxKind::LiteralType);
                    self.bump();
                    self.finish_node();
                }
                _ => {
                    self.error_msg(DiagnosticKind::UnexpectedToken, "expected a type");
                    break;
                }
            }
            if self.eat_token(SyntaxKind::BracketOpen)
                && !self.eat_token(SyntaxKind::BracketClose)
            {
                self.error(DiagnosticKind::UnclosedGroup);
            }
            if !self.eat_token(SyntaxKind::Pipe) {
                break;
            }
        }
        self.finish_node();
    }

    /// Single-identifier reference to a declared type or primitive.
    fn parse_type_ref(&mut self) {
        self.start_node(SyntaxKind::TypeRef);
        self.expect(SyntaxKind::Id, "type name");
        self.finish_node();
    }

    /// `a | b | c`, wrapping in an Alt node only when a `|` is present.
    pub(super) fn parse_alternatives(&mut self) {
        if !self.enter_recursion() {
            self.start_node(SyntaxKind::Error);
            self.error_msg(DiagnosticKind::UnexpectedToken, "rule body nested too deep");
            self.bump();
            self.finish_node();
            return;
        }

        let checkpoint = self.checkpoint();
        self.parse_unordered_group();
        if self.currently_is(SyntaxKind::Pipe) {
            self.start_node_at(checkpoint, SyntaxKind::Alt);
            while self.eat_token(SyntaxKind::Pipe) {
                self.parse_unordered_group();
            }
            self.finish_node();
        }

        self.exit_recursion();
    }

    /// `a & b`, wrapping only when a `&` is present.
    fn parse_unordered_group(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_sequence();
        if self.currently_is(SyntaxKind::Amp) {
            self.start_node_at(checkpoint, SyntaxKind::UnorderedGroup);
            while self.eat_token(SyntaxKind::Amp) {
                self.parse_sequence();
            }
            self.finish_node();
        }
    }

    /// An identifier followed by `:`, `returns`, or `infers` starts the next
    /// rule; a body missing its `;` must not swallow it.
    fn at_rule_start(&mut self) -> bool {
        self.currently_is(SyntaxKind::Id)
            && matches!(
                self.peek_nth(1),
                SyntaxKind::Colon | SyntaxKind::KwReturns | SyntaxKind::KwInfers
            )
    }

    fn at_sequence_element(&mut self) -> bool {
        self.currently_is_one_of(ELEMENT_FIRST_TOKENS) && !self.at_rule_start()
    }

    /// Juxtaposed elements, wrapped in a Group node when there are two or more.
    fn parse_sequence(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_element();
        if self.at_sequence_element() {
            self.start_node_at(checkpoint, SyntaxKind::Group);
            while self.at_sequence_element() {
                self.parse_element();
            }
            self.finish_node();
        }
    }

    /// One body element with an optional quantifier suffix.
    fn parse_element(&mut self) {
        let checkpoint = self.checkpoint();
        match self.current() {
            SyntaxKind::Id
                if matches!(
                    self.peek_nth(1),
                    SyntaxKind::Equals | SyntaxKind::PlusEquals | SyntaxKind::QuestionEquals
                ) =>
            {
                self.parse_assignment();
            }
            _ => self.parse_assignable(),
        }

        if self.current().is_quantifier() {
            self.start_node_at(checkpoint, SyntaxKind::Quantified);
            while self.current().is_quantifier() {
                self.bump();
            }
            self.finish_node();
        }
    }

    /// `feature=V`, `feature+=V`, or `feature?=V`
    fn parse_assignment(&mut self) {
        self.start_node(SyntaxKind::Assignment);
        self.bump();
        self.bump();
        if self.currently_is_one_of(ELEMENT_FIRST_TOKENS) {
            self.parse_assignable();
        } else {
            self.error(DiagnosticKind::ExpectedElement);
        }
        self.finish_node();
    }

    /// Keyword, cross-reference, action, rule call, or parenthesized body.
    fn parse_assignable(&mut self) {
        match self.current() {
            SyntaxKind::StringLit => {
                self.start_node(SyntaxKind::Keyword);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::BracketOpen => self.parse_cross_ref(),
            SyntaxKind::BraceOpen => self.parse_action(),
            SyntaxKind::ParenOpen => {
                self.start_node(SyntaxKind::Group);
                self.bump();
                if self.currently_is_one_of(ELEMENT_FIRST_TOKENS) {
                    self.parse_alternatives();
                } else {
                    self.error(DiagnosticKind::ExpectedElement);
                }
                if !self.eat_token(SyntaxKind::ParenClose) {
                    self.error(DiagnosticKind::UnclosedGroup);
                }
                self.finish_node();
            }
            SyntaxKind::Id => {
                self.start_node(SyntaxKind::RuleCall);
                self.bump();
                self.finish_node();
            }
            _ => self.error_and_bump(DiagnosticKind::ExpectedElement),
        }
    }

    /// `[Target]` or `[Target:TOKEN]`
    fn parse_cross_ref(&mut self) {
        self.start_node(SyntaxKind::CrossRef);
        self.bump();
        self.parse_type_ref();
        if self.eat_token(SyntaxKind::Colon) {
            self.start_node(SyntaxKind::RuleCall);
            self.expect(SyntaxKind::Id, "terminal name");
            self.finish_node();
        }
        if !self.eat_token(SyntaxKind::BracketClose) {
            self.error(DiagnosticKind::UnclosedGroup);
        }
        self.finish_node();
    }

    /// `{Declared}` or `{infer Fresh}`
    fn parse_action(&mut self) {
        self.start_node(SyntaxKind::Action);
        self.bump();
        if self.eat_token(SyntaxKind::KwInfer) {
            self.expect(SyntaxKind::Id, "inferred type name");
        } else {
            self.parse_type_ref();
        }
        if !self.eat_token(SyntaxKind::BraceClose) {
            self.error(DiagnosticKind::UnclosedGroup);
        }
        self.finish_node();
    }

    /// Skip tokens into an Error node until something that can start a
    /// declaration, or a `;` (consumed), comes up.
    fn synchronize_to_declaration(&mut self) {
        if self.eof() || self.currently_is_one_of(DECLARATION_FIRST_TOKENS) {
            return;
        }
        self.start_node(SyntaxKind::Error);
        while !self.eof() && !self.currently_is_one_of(DECLARATION_FIRST_TOKENS) {
            if self.currently_is(SyntaxKind::Semicolon) {
                self.bump();
                break;
            }
            self.bump();
        }
        self.finish_node();
    }
}
