//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, helper methods, panic-mode recovery, and the parse
//! entry points.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, recovery and coordination
//! - `declarations`: the program header, `terminar`, and variable declarations
//! - `statements`: statement blocks and each statement form
//! - `expressions`: expressions and conditions with precedence climbing
//!
//! # Error recovery
//!
//! Productions return `Result<NodeId, ParseError>` and bail out with `?` on the
//! first problem. The statement loop catches the error, drops the nodes the
//! failed statement allocated, records a diagnostic and calls
//! [`Parser::synchronize`], which discards tokens up to the next `;` or `}`.
//! Running out of tokens before the program's closing `}` is the only error
//! that is never recovered; the parse then produces no tree.

use crate::config::KeywordCase;
use crate::diagnostics::{Diagnostic, DiagnosticLog, SyntaxErrorKind};
use crate::parser::ast::*;
use crate::parser::lexer::{Lexer, Token, TokenKind};
use std::fmt;
use tracing::{debug, trace};

/// Parser error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: SyntaxErrorKind,
    pub message: String,
    pub location: SourceLocation,
}

impl ParseError {
    pub fn into_diagnostic(self) -> Diagnostic {
        Diagnostic::syntax(self.kind, self.location, self.message)
    }

    pub fn is_fatal(&self) -> bool {
        self.kind == SyntaxErrorKind::UnexpectedEndOfInput
    }

    /// Re-tag a recoverable error with `kind`
    pub(crate) fn within(mut self, kind: SyntaxErrorKind) -> Self {
        if !self.is_fatal() {
            self.kind = kind;
        }
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parse error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Whether the parser is currently discarding tokens after an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserMode {
    Normal,
    Panic,
}

/// Result of a parse: the tree, if one could be built, and every syntax
/// diagnostic recorded on the way
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub ast: Option<Ast>,
    pub diagnostics: DiagnosticLog,
}

/// Recursive descent parser with panic-mode recovery
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    pub(crate) arena: NodeArena,
    diagnostics: DiagnosticLog,
    mode: ParserMode,
}

impl Parser {
    /// Create a parser over an already produced token stream
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            arena: NodeArena::new(),
            diagnostics: DiagnosticLog::new(),
            mode: ParserMode::Normal,
        }
    }

    /// Lex `source` with default settings and seed the log with any lexical
    /// diagnostics
    pub fn from_source(source: &str) -> Self {
        let mut lexer = Lexer::new(KeywordCase::default());
        let tokens = lexer.tokenize(source);
        let mut parser = Self::new(tokens);
        parser.diagnostics = DiagnosticLog::from(lexer.take_diagnostics());
        parser
    }

    /// Parse a complete program
    pub fn parse(mut self) -> ParseOutcome {
        let result = self.parse_program();
        self.finish(result)
    }

    /// Parse the whole token stream as a single expression
    pub fn parse_expression_tree(mut self) -> ParseOutcome {
        let result = self.parse_expression().and_then(|id| self.expect_end(id));
        self.finish(result)
    }

    /// Parse the whole token stream as a single condition
    pub fn parse_condition_tree(mut self) -> ParseOutcome {
        let result = self.parse_condition().and_then(|id| self.expect_end(id));
        self.finish(result)
    }

    pub fn mode(&self) -> ParserMode {
        self.mode
    }

    pub fn diagnostics(&self) -> &DiagnosticLog {
        &self.diagnostics
    }

    fn finish(mut self, result: Result<NodeId, ParseError>) -> ParseOutcome {
        let ast = match result {
            Ok(root) => Some(std::mem::take(&mut self.arena).finish(root)),
            Err(err) => {
                self.record(err);
                None
            }
        };
        debug!(
            built = ast.is_some(),
            errors = self.diagnostics.len(),
            "parse finished"
        );
        ParseOutcome {
            ast,
            diagnostics: self.diagnostics,
        }
    }

    fn expect_end(&mut self, id: NodeId) -> Result<NodeId, ParseError> {
        match self.peek() {
            None => Ok(id),
            Some(token) => Err(ParseError {
                kind: SyntaxErrorKind::UnexpectedToken,
                message: format!("unexpected {} after the end of the expression", token),
                location: token.location(),
            }),
        }
    }

    // ===== Recovery =====

    /// Record `err`, or hand it back if it is fatal
    pub(crate) fn recover(&mut self, err: ParseError) -> Result<(), ParseError> {
        if err.is_fatal() {
            return Err(err);
        }
        self.record(err);
        self.synchronize();
        Ok(())
    }

    pub(crate) fn record(&mut self, err: ParseError) {
        debug!(
            kind = err.kind.name(),
            line = err.location.line,
            column = err.location.column,
            "syntax error: {}",
            err.message
        );
        self.diagnostics.push(err.into_diagnostic());
    }

    /// Discard tokens until a synchronizing token.
    ///
    /// A `;` is consumed. A `}` closing a `{` that was itself discarded is
    /// consumed too; an unmatched `}` belongs to the enclosing block and is
    /// left in place.
    pub(crate) fn synchronize(&mut self) {
        self.mode = ParserMode::Panic;
        trace!(position = self.position, "entering panic mode");

        let mut depth = 0usize;
        let mut discarded = 0usize;
        while let Some(kind) = self.peek_kind() {
            match kind {
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    discarded += 1;
                    self.mode = ParserMode::Normal;
                    break;
                }
                TokenKind::RBrace if depth == 0 => {
                    self.mode = ParserMode::Normal;
                    break;
                }
                TokenKind::RBrace => {
                    depth -= 1;
                    self.advance();
                    discarded += 1;
                    if depth == 0 {
                        self.mode = ParserMode::Normal;
                        break;
                    }
                }
                TokenKind::LBrace => {
                    depth += 1;
                    self.advance();
                    discarded += 1;
                }
                _ => {
                    self.advance();
                    discarded += 1;
                }
            }
        }

        trace!(discarded, mode = ?self.mode, "synchronized");
    }

    /// Discard tokens through the `}` matching the current nesting level
    pub(crate) fn skip_through_closing_brace(&mut self) -> Result<(), ParseError> {
        let mut depth = 0usize;
        while let Some(kind) = self.peek_kind() {
            self.advance();
            match kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace if depth == 0 => return Ok(()),
                TokenKind::RBrace => depth -= 1,
                _ => {}
            }
        }
        Err(self.end_of_input("expected '}' to close the program"))
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    pub(crate) fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    pub(crate) fn peek_kind_ahead(&self, n: usize) -> Option<TokenKind> {
        self.tokens.get(self.position + n).map(|t| t.kind)
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn advance(&mut self) -> Option<&Token> {
        if self.is_at_end() {
            return None;
        }
        self.position += 1;
        self.tokens.get(self.position - 1)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub(crate) fn previous_location(&self) -> SourceLocation {
        self.position
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map(Token::location)
            .unwrap_or_else(|| SourceLocation::new(1, 1))
    }

    /// Location of the next token, or of the last token at end of input
    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(Token::location)
            .unwrap_or_else(|| SourceLocation::new(1, 1))
    }

    pub(crate) fn end_of_input(&self, expected: &str) -> ParseError {
        ParseError {
            kind: SyntaxErrorKind::UnexpectedEndOfInput,
            message: format!("{}, found end of input", expected),
            location: self.current_location(),
        }
    }

    /// Build an error at the current token; at end of input the error is
    /// always `UnexpectedEndOfInput`
    pub(crate) fn error(&self, kind: SyntaxErrorKind, expected: impl AsRef<str>) -> ParseError {
        match self.peek() {
            Some(token) => ParseError {
                kind,
                message: format!("{}, found {}", expected.as_ref(), token),
                location: token.location(),
            },
            None => self.end_of_input(expected.as_ref()),
        }
    }

    pub(crate) fn expect_token(
        &mut self,
        kind: TokenKind,
        error: SyntaxErrorKind,
        ctx: &str,
    ) -> Result<SourceLocation, ParseError> {
        if self.check(kind) {
            let loc = self.current_location();
            self.advance();
            Ok(loc)
        } else {
            Err(self.error(error, format!("expected {} {}", kind, ctx)))
        }
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), ParseError> {
        self.expect_token(TokenKind::Semicolon, SyntaxErrorKind::MissingSemicolon, ctx)
            .map(|_| ())
    }

    pub(crate) fn expect_identifier(
        &mut self,
        error: SyntaxErrorKind,
        ctx: &str,
    ) -> Result<(String, SourceLocation), ParseError> {
        match self.peek() {
            Some(token) if token.kind == TokenKind::Identifier => {
                let name = token.text().unwrap_or_default().to_string();
                let loc = token.location();
                self.advance();
                Ok((name, loc))
            }
            _ => Err(self.error(error, format!("expected identifier {}", ctx))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Stage;
    use test_log::test;

    fn tok(kind: TokenKind, column: usize) -> Token {
        Token::simple(kind, 1, column)
    }

    #[test]
    fn test_synchronize_consumes_semicolon() {
        let mut parser = Parser::new(vec![
            tok(TokenKind::Plus, 1),
            tok(TokenKind::Semicolon, 2),
            tok(TokenKind::Leer, 3),
        ]);
        parser.synchronize();
        assert_eq!(parser.peek_kind(), Some(TokenKind::Leer));
        assert_eq!(parser.mode(), ParserMode::Normal);
    }

    #[test]
    fn test_synchronize_leaves_unmatched_brace() {
        let mut parser = Parser::new(vec![tok(TokenKind::Plus, 1), tok(TokenKind::RBrace, 2)]);
        parser.synchronize();
        assert_eq!(parser.peek_kind(), Some(TokenKind::RBrace));
    }

    #[test]
    fn test_synchronize_skips_discarded_block() {
        let mut parser = Parser::new(vec![
            tok(TokenKind::Sino, 1),
            tok(TokenKind::LBrace, 2),
            tok(TokenKind::Terminar, 3),
            tok(TokenKind::Semicolon, 4),
            tok(TokenKind::RBrace, 5),
            tok(TokenKind::Terminar, 6),
        ]);
        parser.synchronize();
        assert_eq!(parser.peek_kind(), Some(TokenKind::Terminar));
        assert_eq!(parser.current_location().column, 6);
    }

    #[test]
    fn test_synchronize_at_end_stays_in_panic() {
        let mut parser = Parser::new(vec![tok(TokenKind::Plus, 1)]);
        parser.synchronize();
        assert!(parser.is_at_end());
        assert_eq!(parser.mode(), ParserMode::Panic);
    }

    #[test]
    fn test_error_at_end_is_fatal() {
        let parser = Parser::new(vec![tok(TokenKind::Leer, 1)]);
        let mut parser = parser;
        parser.advance();
        let err = parser.error(SyntaxErrorKind::MissingSemicolon, "expected ';'");
        assert!(err.is_fatal());
        assert_eq!(err.location, SourceLocation::new(1, 1));
    }

    #[test]
    fn test_from_source_seeds_lexical_diagnostics() {
        let outcome = Parser::from_source("programa P() { @ terminar; }").parse();
        assert!(outcome.ast.is_some());
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics.count_stage(Stage::Lexical), 1);
    }

    #[test]
    fn test_empty_input_yields_no_tree() {
        let outcome = Parser::new(Vec::new()).parse();
        assert!(outcome.ast.is_none());
        assert_eq!(
            outcome.diagnostics.syntax_kinds(),
            vec![SyntaxErrorKind::UnexpectedEndOfInput]
        );
    }
}
