//! Statement parsing implementation
//!
//! This module handles parsing of every statement form:
//!
//! - Declarations: `int x = 5;`, `char a, b;`
//! - Assignments: `x = x + 1;`
//! - Input and output: `leer x;`, `imprimir("valor", x);`
//! - Control flow: `mientras (...) { ... }`, `si (...) { ... } sino { ... }`
//!
//! # Grammar
//!
//! ```text
//! statement  ::= declaration | assignment | print | read | while | if
//! assignment ::= IDENT '=' expr ';'
//! print      ::= 'imprimir' '(' arg (',' arg)* ')' ';'
//! arg        ::= STRING | IDENT
//! read       ::= 'leer' IDENT ';'
//! while      ::= 'mientras' '(' condition ')' block
//! if         ::= 'si' '(' condition ')' block ('sino' block)?
//! block      ::= '{' statement* '}'
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::diagnostics::SyntaxErrorKind;
use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse statements up to the closing `}` of the current block.
    ///
    /// The program body also stops at `terminar`. A statement that fails is
    /// dropped and the loop resumes after the next synchronizing token.
    pub(crate) fn parse_statements(&mut self, program_body: bool) -> Result<NodeId, ParseError> {
        let loc = self.current_location();
        let mut statements = Vec::new();

        loop {
            match self.peek_kind() {
                None | Some(TokenKind::RBrace) => break,
                Some(TokenKind::Terminar) if program_body => break,
                _ => {}
            }

            let mark = self.arena.mark();
            match self.parse_statement() {
                Ok(id) => statements.push(id),
                Err(err) => {
                    self.arena.truncate(mark);
                    self.recover(err)?;
                }
            }
        }

        Ok(self
            .arena
            .alloc(NodeKind::Statements, None, statements, loc))
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<NodeId, ParseError> {
        let Some(kind) = self.peek_kind() else {
            return Err(self.end_of_input("expected a statement"));
        };

        match kind {
            k if k.is_type_keyword() => self.parse_declaration(),
            TokenKind::Identifier => self.parse_assignment(),
            TokenKind::Imprimir => self.parse_print(),
            TokenKind::Leer => self.parse_read(),
            TokenKind::Mientras => self.parse_while(),
            TokenKind::Si => self.parse_if(),
            TokenKind::Integer | TokenKind::Float | TokenKind::Char | TokenKind::Str
                if self.peek_kind_ahead(1) == Some(TokenKind::Assign) =>
            {
                Err(self.error(
                    SyntaxErrorKind::MalformedAssignment,
                    "only a variable can be assigned to",
                ))
            }
            TokenKind::Sino => Err(self.error(
                SyntaxErrorKind::DanglingElse,
                "'sino' must follow the block of a 'si'",
            )),
            TokenKind::Terminar => Err(self.error(
                SyntaxErrorKind::UnexpectedToken,
                "'terminar' may only end the program",
            )),
            _ => Err(self.error(SyntaxErrorKind::UnexpectedToken, "expected a statement")),
        }
    }

    fn parse_assignment(&mut self) -> Result<NodeId, ParseError> {
        let (target, loc) = self.expect_identifier(
            SyntaxErrorKind::MalformedAssignment,
            "at the start of an assignment",
        )?;

        if !self.match_token(TokenKind::Assign) {
            return Err(self.error(
                SyntaxErrorKind::MalformedAssignment,
                format!("expected '=' after '{}'", target),
            ));
        }

        let value =
            self.parse_value_expression(SyntaxErrorKind::MalformedAssignment, "after '='")?;
        self.expect_semicolon("after assignment")?;

        Ok(self
            .arena
            .alloc(NodeKind::Assignment, Some(target), vec![value], loc))
    }

    fn parse_print(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.current_location();
        self.advance();

        self.expect_token(
            TokenKind::LParen,
            SyntaxErrorKind::MalformedArguments,
            "after 'imprimir'",
        )?;

        let mut contents = Vec::new();
        loop {
            let argument = match self.peek() {
                Some(token) if matches!(token.kind, TokenKind::Str | TokenKind::Identifier) => {
                    let text = token.text().unwrap_or_default().to_string();
                    let arg_loc = token.location();
                    self.advance();
                    self.arena.leaf(NodeKind::Content, text, arg_loc)
                }
                _ => {
                    return Err(self.error(
                        SyntaxErrorKind::MalformedArguments,
                        "expected a string or a variable to print",
                    ))
                }
            };
            contents.push(argument);

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        self.expect_token(
            TokenKind::RParen,
            SyntaxErrorKind::MalformedArguments,
            "to close the 'imprimir' arguments",
        )?;
        self.expect_semicolon("after 'imprimir(...)'")?;

        Ok(self.arena.alloc(NodeKind::Print, None, contents, loc))
    }

    fn parse_read(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.current_location();
        self.advance();

        let (name, name_loc) =
            self.expect_identifier(SyntaxErrorKind::UnexpectedToken, "after 'leer'")?;
        let variable = self.arena.leaf(NodeKind::Variable, name, name_loc);
        self.expect_semicolon("after 'leer'")?;

        Ok(self.arena.alloc(NodeKind::Read, None, vec![variable], loc))
    }

    fn parse_while(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.current_location();
        self.advance();

        let condition = self.parse_parenthesized_condition("'mientras'")?;
        let body = self.parse_block("'mientras'")?;

        Ok(self
            .arena
            .alloc(NodeKind::While, None, vec![condition, body], loc))
    }

    fn parse_if(&mut self) -> Result<NodeId, ParseError> {
        let loc = self.current_location();
        self.advance();

        let condition = self.parse_parenthesized_condition("'si'")?;
        let then_block = self.parse_block("'si'")?;

        if self.match_token(TokenKind::Sino) {
            let else_block = self.parse_block("'sino'")?;
            return Ok(self.arena.alloc(
                NodeKind::IfElse,
                None,
                vec![condition, then_block, else_block],
                loc,
            ));
        }

        Ok(self
            .arena
            .alloc(NodeKind::If, None, vec![condition, then_block], loc))
    }

    fn parse_parenthesized_condition(&mut self, owner: &str) -> Result<NodeId, ParseError> {
        self.expect_token(
            TokenKind::LParen,
            SyntaxErrorKind::MalformedCondition,
            &format!("after {}", owner),
        )?;
        let condition = self.parse_condition()?;
        self.expect_token(
            TokenKind::RParen,
            SyntaxErrorKind::MalformedCondition,
            &format!("to close the {} condition", owner),
        )?;
        Ok(condition)
    }

    /// `{ statement* }`
    fn parse_block(&mut self, owner: &str) -> Result<NodeId, ParseError> {
        self.expect_token(
            TokenKind::LBrace,
            SyntaxErrorKind::UnexpectedToken,
            &format!("to open the {} block", owner),
        )?;
        let statements = self.parse_statements(false)?;
        self.expect_token(
            TokenKind::RBrace,
            SyntaxErrorKind::UnexpectedToken,
            &format!("to close the {} block", owner),
        )?;
        Ok(statements)
    }
}

#[cfg(test)]
mod tests {
    use crate::diagnostics::SyntaxErrorKind;
    use crate::parser::ast::{Ast, NodeId, NodeKind};
    use crate::parser::parse::{ParseOutcome, Parser};
    use test_log::test;

    fn parse_body(body: &str) -> ParseOutcome {
        Parser::from_source(&format!("programa P() {{ {} terminar; }}", body)).parse()
    }

    fn statements(ast: &Ast) -> Vec<NodeId> {
        let block = ast.child(ast.root(), 0).unwrap();
        ast.node(block).children.clone()
    }

    #[test]
    fn test_print_arguments_become_contents() {
        let outcome = parse_body("imprimir(\"valor\", x);");
        let ast = outcome.ast.unwrap();
        let print = statements(&ast)[0];
        assert_eq!(ast.node(print).kind, NodeKind::Print);
        let labels: Vec<_> = ast.children(print).map(|n| n.display_label()).collect();
        assert_eq!(labels, vec!["Content: valor", "Content: x"]);
    }

    #[test]
    fn test_read_and_assignment() {
        let outcome = parse_body("leer x; y = x * 2;");
        let ast = outcome.ast.unwrap();
        let kinds: Vec<_> = statements(&ast)
            .into_iter()
            .map(|id| ast.node(id).kind)
            .collect();
        assert_eq!(kinds, vec![NodeKind::Read, NodeKind::Assignment]);
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_if_else_and_while_nesting() {
        let outcome = parse_body(
            "mientras (x < 10) { si (x == 5) { leer y; } sino { x = x + 1; } }",
        );
        assert!(outcome.diagnostics.is_empty());
        let ast = outcome.ast.unwrap();
        let while_id = statements(&ast)[0];
        assert_eq!(ast.node(while_id).kind, NodeKind::While);
        let body = ast.child(while_id, 1).unwrap();
        let branch = ast.child(body, 0).unwrap();
        assert_eq!(ast.node(branch).kind, NodeKind::IfElse);
        assert_eq!(ast.node(branch).children.len(), 3);
    }

    #[test]
    fn test_missing_semicolon_recovers_at_next_statement() {
        let outcome = parse_body("x = 1 leer y; leer z;");
        let ast = outcome.ast.unwrap();
        assert_eq!(
            outcome.diagnostics.syntax_kinds(),
            vec![SyntaxErrorKind::MissingSemicolon]
        );
        // "leer y;" is swallowed by the resync, "leer z;" survives
        assert_eq!(statements(&ast).len(), 1);
    }

    #[test]
    fn test_bad_print_arguments() {
        let outcome = parse_body("imprimir(\"a\",); leer x;");
        assert_eq!(
            outcome.diagnostics.syntax_kinds(),
            vec![SyntaxErrorKind::MalformedArguments]
        );
        assert_eq!(statements(&outcome.ast.unwrap()).len(), 1);
    }

    #[test]
    fn test_literal_assignment_target() {
        let outcome = parse_body("5 = x;");
        assert_eq!(
            outcome.diagnostics.syntax_kinds(),
            vec![SyntaxErrorKind::MalformedAssignment]
        );
    }

    #[test]
    fn test_dangling_else_skips_its_block() {
        let outcome = Parser::from_source("programa T() { sino { terminar; } terminar; }").parse();
        let ast = outcome.ast.unwrap();
        assert!(statements(&ast).is_empty());
        let errors: Vec<_> = outcome.diagnostics.iter().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].syntax_kind(), Some(SyntaxErrorKind::DanglingElse));
        assert_eq!(errors[0].line, 1);
    }

    #[test]
    fn test_error_inside_nested_block_keeps_outer_statement() {
        let outcome = parse_body("si (x > 1) { leer ; imprimir(x); }");
        let ast = outcome.ast.unwrap();
        assert_eq!(
            outcome.diagnostics.syntax_kinds(),
            vec![SyntaxErrorKind::UnexpectedToken]
        );
        let branch = statements(&ast)[0];
        let body = ast.child(branch, 1).unwrap();
        assert_eq!(ast.node(body).children.len(), 1);
    }

    #[test]
    fn test_missing_condition_paren() {
        let outcome = parse_body("mientras x < 1) { leer x; } leer y;");
        assert_eq!(
            outcome.diagnostics.syntax_kinds()[0],
            SyntaxErrorKind::MalformedCondition
        );
    }
}
