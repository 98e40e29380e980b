//! Program and declaration parsing
//!
//! # Grammar
//!
//! ```text
//! program     ::= 'programa' IDENT '(' ')' '{' statement* terminate '}'
//! terminate   ::= 'terminar' ';'
//! declaration ::= type IDENT '=' expr ';'
//!               | type IDENT (',' IDENT)* ';'
//! type        ::= 'int' | 'float' | 'char'
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::diagnostics::SyntaxErrorKind;
use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse the whole program
    pub(crate) fn parse_program(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.current_location();

        let name = match self.parse_program_header() {
            Ok(name) => Some(name),
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                self.record(err);
                self.skip_past_body_open()?;
                None
            }
        };

        let statements = self.parse_statements(true)?;
        let terminate = self.parse_terminate()?;

        if !self.match_token(TokenKind::RBrace) {
            let err = self.error(
                SyntaxErrorKind::UnexpectedToken,
                "expected '}' after 'terminar;'",
            );
            if err.is_fatal() {
                return Err(err);
            }
            self.record(err);
            self.skip_through_closing_brace()?;
        }

        if let Some(token) = self.peek() {
            let err = ParseError {
                kind: SyntaxErrorKind::UnexpectedToken,
                message: format!("unexpected {} after the end of the program", token),
                location: token.location(),
            };
            self.record(err);
        }

        let mut children = vec![statements];
        children.extend(terminate);
        Ok(self.arena.alloc(NodeKind::Program, name, children, loc))
    }

    /// `programa NAME ( ) {`, returning the program name
    fn parse_program_header(&mut self) -> Result<String, ParseError> {
        self.expect_token(
            TokenKind::Programa,
            SyntaxErrorKind::UnexpectedToken,
            "at the start of the program",
        )?;
        let (name, _) =
            self.expect_identifier(SyntaxErrorKind::UnexpectedToken, "as the program name")?;
        self.expect_token(
            TokenKind::LParen,
            SyntaxErrorKind::UnexpectedToken,
            "after the program name",
        )?;
        self.expect_token(
            TokenKind::RParen,
            SyntaxErrorKind::UnexpectedToken,
            "in the program header",
        )?;
        self.expect_token(
            TokenKind::LBrace,
            SyntaxErrorKind::UnexpectedToken,
            "to open the program body",
        )?;
        Ok(name)
    }

    fn skip_past_body_open(&mut self) -> Result<(), ParseError> {
        while let Some(kind) = self.peek_kind() {
            self.advance();
            if kind == TokenKind::LBrace {
                return Ok(());
            }
        }
        Err(self.end_of_input("expected '{' to open the program body"))
    }

    /// `terminar;`, or `None` when the program ends without it
    fn parse_terminate(&mut self) -> Result<Option<NodeId>, ParseError> {
        if !self.check(TokenKind::Terminar) {
            let err = self.error(
                SyntaxErrorKind::MissingTerminate,
                "expected 'terminar;' before the end of the program",
            );
            if err.is_fatal() {
                return Err(err);
            }
            self.record(err);
            return Ok(None);
        }

        let loc = self.current_location();
        self.advance();
        if let Err(err) = self.expect_semicolon("after 'terminar'") {
            self.recover(err)?;
        }
        Ok(Some(self.arena.alloc(NodeKind::Terminate, None, Vec::new(), loc)))
    }

    /// Parse a variable declaration starting at its type keyword
    pub(crate) fn parse_declaration(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.current_location();
        let type_name = self
            .peek_kind()
            .and_then(TokenKind::lexeme)
            .unwrap_or_default()
            .to_string();
        self.advance();
        let type_node = self.arena.leaf(NodeKind::Type, type_name.as_str(), loc);

        let (first, first_loc) = self.expect_identifier(
            SyntaxErrorKind::MalformedDeclaration,
            &format!("after '{}'", type_name),
        )?;
        let first = self.arena.leaf(NodeKind::Variable, first, first_loc);

        if self.match_token(TokenKind::Assign) {
            let value = self.parse_value_expression(
                SyntaxErrorKind::MalformedDeclaration,
                "after '=' in declaration",
            )?;
            self.expect_semicolon("after declaration")?;
            return Ok(self.arena.alloc(
                NodeKind::DeclarationAssign,
                None,
                vec![type_node, first, value],
                loc,
            ));
        }

        let mut children = vec![type_node, first];
        while self.match_token(TokenKind::Comma) {
            let (name, name_loc) =
                self.expect_identifier(SyntaxErrorKind::MalformedDeclaration, "after ','")?;
            children.push(self.arena.leaf(NodeKind::Variable, name, name_loc));
        }

        match self.peek_kind() {
            Some(TokenKind::Assign) => Err(self.error(
                SyntaxErrorKind::MalformedDeclaration,
                "only a single variable can be initialized in a declaration",
            )),
            Some(TokenKind::Identifier) => Err(self.error(
                SyntaxErrorKind::MalformedDeclaration,
                "expected ',' between variable names",
            )),
            _ => {
                self.expect_semicolon("after declaration")?;
                Ok(self
                    .arena
                    .alloc(NodeKind::Declaration, None, children, loc))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::SyntaxErrorKind;
    use crate::parser::ast::NodeKind;
    use crate::parser::parse::Parser;
    use test_log::test;

    fn labels(source: &str) -> Vec<String> {
        let outcome = Parser::from_source(source).parse();
        let ast = outcome.ast.expect("tree");
        ast.preorder()
            .into_iter()
            .map(|(_, id)| ast.node(id).display_label())
            .collect()
    }

    #[test]
    fn test_declaration_list() {
        assert_eq!(
            labels("programa P() { int a, b; terminar; }"),
            vec![
                "Program: P",
                "Statements",
                "Declaration",
                "Type: int",
                "Variable: a",
                "Variable: b",
                "Terminate",
            ]
        );
    }

    #[test]
    fn test_declaration_with_initializer() {
        let outcome = Parser::from_source("programa P() { float x = 2.5; terminar; }").parse();
        let ast = outcome.ast.unwrap();
        let statements = ast.child(ast.root(), 0).unwrap();
        let decl = ast.child(statements, 0).unwrap();
        assert_eq!(ast.node(decl).kind, NodeKind::DeclarationAssign);
        let kinds: Vec<_> = ast.children(decl).map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![NodeKind::Type, NodeKind::Variable, NodeKind::Number]
        );
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_initializing_a_list_is_malformed() {
        let outcome = Parser::from_source("programa P() { int a, b = 1; terminar; }").parse();
        assert!(outcome.ast.is_some());
        assert_eq!(
            outcome.diagnostics.syntax_kinds(),
            vec![SyntaxErrorKind::MalformedDeclaration]
        );
    }

    #[test]
    fn test_missing_terminate_still_builds_program() {
        let outcome = Parser::from_source("programa P() { leer x; }").parse();
        let ast = outcome.ast.unwrap();
        assert_eq!(ast.root_node().children.len(), 1);
        assert_eq!(
            outcome.diagnostics.syntax_kinds(),
            vec![SyntaxErrorKind::MissingTerminate]
        );
    }

    #[test]
    fn test_terminate_without_semicolon() {
        let outcome = Parser::from_source("programa P() { leer x; terminar }").parse();
        assert_eq!(
            outcome.diagnostics.syntax_kinds(),
            vec![SyntaxErrorKind::MissingSemicolon]
        );
        let ast = outcome.ast.expect("tree");
        let kinds: Vec<_> = ast.children(ast.root()).map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NodeKind::Statements, NodeKind::Terminate]);
    }

    #[test]
    fn test_bad_header_skips_to_body() {
        let outcome = Parser::from_source("programa () { terminar; }").parse();
        let ast = outcome.ast.unwrap();
        assert_eq!(ast.root_node().label, None);
        assert_eq!(
            outcome.diagnostics.syntax_kinds(),
            vec![SyntaxErrorKind::UnexpectedToken]
        );
    }

    #[test]
    fn test_statements_after_terminate_are_reported() {
        let outcome = Parser::from_source("programa P() { terminar; leer x; }").parse();
        assert!(outcome.ast.is_some());
        assert_eq!(
            outcome.diagnostics.syntax_kinds(),
            vec![SyntaxErrorKind::UnexpectedToken]
        );
    }

    #[test]
    fn test_missing_closing_brace_is_fatal() {
        let outcome = Parser::from_source("programa P() { terminar;").parse();
        assert!(outcome.ast.is_none());
        assert_eq!(
            outcome.diagnostics.syntax_kinds(),
            vec![SyntaxErrorKind::UnexpectedEndOfInput]
        );
    }
}
