//! Expression and condition parsing
//!
//! Arithmetic uses precedence climbing; conditions are a comparison of two
//! expressions, combined with `and`/`&&` (binding tighter) and `or`/`||`.
//! Every operator is left-associative.
//!
//! # Grammar
//!
//! ```text
//! condition  ::= or_cond
//! or_cond    ::= and_cond (('or' | '||') and_cond)*
//! and_cond   ::= comparison (('and' | '&&') comparison)*
//! comparison ::= expr ('<' | '<=' | '>' | '>=' | '==' | '!=') expr
//! expr       ::= term (('+' | '-') term)*
//! term       ::= factor (('*' | '/') factor)*
//! factor     ::= NUMBER | IDENT
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::diagnostics::SyntaxErrorKind;
use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

/// Binding power of an arithmetic operator token
fn arithmetic_precedence(kind: TokenKind) -> Option<(u8, BinOp)> {
    match kind {
        TokenKind::Plus => Some((1, BinOp::Add)),
        TokenKind::Minus => Some((1, BinOp::Sub)),
        TokenKind::Star => Some((2, BinOp::Mul)),
        TokenKind::Slash => Some((2, BinOp::Div)),
        _ => None,
    }
}

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<NodeId, ParseError> {
        self.parse_binary(1)
    }

    /// Right-hand side of a declaration or assignment.
    ///
    /// A leading operator is a missing left operand; anything else that
    /// cannot start an expression is reported as `missing`.
    pub(crate) fn parse_value_expression(
        &mut self,
        missing: SyntaxErrorKind,
        ctx: &str,
    ) -> Result<NodeId, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::Integer | TokenKind::Float | TokenKind::Identifier) => {
                self.parse_expression()
            }
            Some(kind) if kind.is_arithmetic() => Err(self.error(
                SyntaxErrorKind::MissingOperand,
                format!("missing left operand of {}", kind),
            )),
            _ => Err(self.error(missing, format!("expected an expression {}", ctx))),
        }
    }

    fn parse_binary(&mut self, min_precedence: u8) -> Result<NodeId, ParseError> {
        let mut left = self.parse_operand()?;

        while let Some((precedence, op)) = self.peek_kind().and_then(arithmetic_precedence) {
            if precedence < min_precedence {
                break;
            }
            let loc = self.current_location();
            self.advance();
            let right = self.parse_binary(precedence + 1)?;
            left = self
                .arena
                .alloc(NodeKind::BinaryOp(op), None, vec![left, right], loc);
        }

        Ok(left)
    }

    fn parse_operand(&mut self) -> Result<NodeId, ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.end_of_input("expected a number or a variable"));
        };
        let loc = token.location();

        let kind = match token.kind {
            TokenKind::Integer | TokenKind::Float => NodeKind::Number,
            TokenKind::Identifier => NodeKind::Variable,
            _ => {
                return Err(self.error(
                    SyntaxErrorKind::MissingOperand,
                    "expected a number or a variable as operand",
                ))
            }
        };
        let label = token.value_text();
        self.advance();

        Ok(self.arena.leaf(kind, label, loc))
    }

    /// Parse a condition; any recoverable failure inside it is reported as a
    /// malformed condition
    pub(crate) fn parse_condition(&mut self) -> Result<NodeId, ParseError> {
        self.parse_or_condition()
            .map_err(|err| err.within(SyntaxErrorKind::MalformedCondition))
    }

    fn parse_or_condition(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_and_condition()?;

        while let Some(kind @ (TokenKind::OrOr | TokenKind::OrWord)) = self.peek_kind() {
            let loc = self.current_location();
            self.advance();
            let right = self.parse_and_condition()?;
            left = self.logic_node(kind, left, right, loc);
        }

        Ok(left)
    }

    fn parse_and_condition(&mut self) -> Result<NodeId, ParseError> {
        let mut left = self.parse_comparison()?;

        while let Some(kind @ (TokenKind::AndAnd | TokenKind::AndWord)) = self.peek_kind() {
            let loc = self.current_location();
            self.advance();
            let right = self.parse_comparison()?;
            left = self.logic_node(kind, left, right, loc);
        }

        Ok(left)
    }

    fn logic_node(
        &mut self,
        kind: TokenKind,
        left: NodeId,
        right: NodeId,
        loc: SourceLocation,
    ) -> NodeId {
        let label = kind.lexeme().map(str::to_string);
        self.arena
            .alloc(NodeKind::ConditionLogic, label, vec![left, right], loc)
    }

    fn parse_comparison(&mut self) -> Result<NodeId, ParseError> {
        let left = self.parse_value_expression(
            SyntaxErrorKind::MalformedCondition,
            "on the left of the comparison",
        )?;

        let op = match self.peek_kind() {
            Some(kind) if kind.is_relational() => kind,
            _ => {
                return Err(self.error(
                    SyntaxErrorKind::MalformedCondition,
                    "expected a comparison operator",
                ))
            }
        };
        let loc = self.current_location();
        self.advance();

        let right = self.parse_value_expression(
            SyntaxErrorKind::MalformedCondition,
            "on the right of the comparison",
        )?;

        if let Some(kind) = self.peek_kind().filter(|k| k.is_relational()) {
            return Err(self.error(
                SyntaxErrorKind::MalformedCondition,
                format!("comparisons cannot be chained with {}", kind),
            ));
        }

        let label = op.lexeme().map(str::to_string);
        Ok(self
            .arena
            .alloc(NodeKind::Condition, label, vec![left, right], loc))
    }
}
