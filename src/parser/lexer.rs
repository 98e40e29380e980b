//! Lexer (tokenizer) for program source text
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Malformed input never stops the lexer: each problem is recorded as a lexical
//! [`Diagnostic`], the offending characters are discarded, and scanning resumes.
//! A `,` or `;` caught inside (or right after) a rejected span is salvaged as a
//! real token so the parser still sees the statement boundary.

use super::ast::SourceLocation;
use crate::config::KeywordCase;
use crate::diagnostics::{CharLiteralProblem, Diagnostic, LexErrorKind};
use rustc_hash::FxHashMap;
use std::fmt;
use tracing::{debug, trace};

/// Every token class the lexer can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Identifier,
    Integer,
    Float,
    Char,
    Str,

    // Reserved words
    Imprimir,
    Leer,
    Mientras,
    Programa,
    Si,
    Sino,
    Terminar,
    Int,
    FloatType,
    CharType,

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    Semicolon, // ;
    Comma,     // ,

    // Operators
    Assign,  // =
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    AndAnd,  // &&
    AndWord, // and
    OrOr,    // ||
    OrWord,  // or
    Lt,      // <
    Le,      // <=
    Gt,      // >
    Ge,      // >=
    EqEq,    // ==
    NotEq,   // !=
}

impl TokenKind {
    /// Upper-case name used in token reports
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Integer => "INTEGER",
            TokenKind::Float => "FLOAT_LITERAL",
            TokenKind::Char => "CHAR_LITERAL",
            TokenKind::Str => "STRING",
            TokenKind::Imprimir => "IMPRIMIR",
            TokenKind::Leer => "LEER",
            TokenKind::Mientras => "MIENTRAS",
            TokenKind::Programa => "PROGRAMA",
            TokenKind::Si => "SI",
            TokenKind::Sino => "SINO",
            TokenKind::Terminar => "TERMINAR",
            TokenKind::Int => "INT",
            TokenKind::FloatType => "FLOAT",
            TokenKind::CharType => "CHAR",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Assign => "EQUAL",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::AndAnd => "AND",
            TokenKind::AndWord => "AND_WORD",
            TokenKind::OrOr => "OR",
            TokenKind::OrWord => "OR_WORD",
            TokenKind::Lt => "LESS",
            TokenKind::Le => "LESS_EQUAL",
            TokenKind::Gt => "GREATER",
            TokenKind::Ge => "GREATER_EQUAL",
            TokenKind::EqEq => "EQUAL_EQUAL",
            TokenKind::NotEq => "NOT_EQUAL",
        }
    }

    /// Canonical spelling of fixed tokens; `None` for literals and identifiers
    pub fn lexeme(self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Identifier
            | TokenKind::Integer
            | TokenKind::Float
            | TokenKind::Char
            | TokenKind::Str => return None,
            TokenKind::Imprimir => "imprimir",
            TokenKind::Leer => "leer",
            TokenKind::Mientras => "mientras",
            TokenKind::Programa => "programa",
            TokenKind::Si => "si",
            TokenKind::Sino => "sino",
            TokenKind::Terminar => "terminar",
            TokenKind::Int => "int",
            TokenKind::FloatType => "float",
            TokenKind::CharType => "char",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Assign => "=",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::AndAnd => "&&",
            TokenKind::AndWord => "and",
            TokenKind::OrOr => "||",
            TokenKind::OrWord => "or",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
        };
        Some(text)
    }

    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::FloatType | TokenKind::CharType
        )
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            TokenKind::Lt
                | TokenKind::Le
                | TokenKind::Gt
                | TokenKind::Ge
                | TokenKind::EqEq
                | TokenKind::NotEq
        )
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Star | TokenKind::Slash
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(
            self,
            TokenKind::AndAnd | TokenKind::AndWord | TokenKind::OrOr | TokenKind::OrWord
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lexeme() {
            Some(text) => write!(f, "'{}'", text),
            None => match self {
                TokenKind::Identifier => write!(f, "identifier"),
                TokenKind::Integer => write!(f, "integer literal"),
                TokenKind::Float => write!(f, "float literal"),
                TokenKind::Char => write!(f, "character literal"),
                _ => write!(f, "string literal"),
            },
        }
    }
}

/// Literal payload carried by a token
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Integer(i64),
    Float(f64),
    Char(char),
    /// Identifier name or string contents
    Text(String),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Integer(n) => write!(f, "{}", n),
            TokenValue::Float(x) => write!(f, "{:?}", x),
            TokenValue::Char(c) => write!(f, "{}", c),
            TokenValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A classified lexical unit with its 1-based position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<TokenValue>,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: Option<TokenValue>, line: usize, column: usize) -> Self {
        Self {
            kind,
            value,
            line,
            column,
        }
    }

    /// A token without payload (keyword, operator, punctuation)
    pub fn simple(kind: TokenKind, line: usize, column: usize) -> Self {
        Self::new(kind, None, line, column)
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }

    /// Identifier name or string contents
    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Some(TokenValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// Literal value as shown in reports; fixed tokens show their spelling
    pub fn value_text(&self) -> String {
        match (&self.value, self.kind.lexeme()) {
            (Some(value), _) => value.to_string(),
            (None, Some(lexeme)) => lexeme.to_string(),
            (None, None) => String::new(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.value) {
            (TokenKind::Identifier, Some(value)) => write!(f, "identifier '{}'", value),
            (TokenKind::Str, Some(value)) => write!(f, "string literal \"{}\"", value),
            (TokenKind::Char, Some(value)) => write!(f, "character literal '{}'", value),
            (TokenKind::Integer, Some(value)) => write!(f, "integer literal {}", value),
            (TokenKind::Float, Some(value)) => write!(f, "float literal {}", value),
            (kind, _) => write!(f, "{}", kind),
        }
    }
}

/// Reserved-word lookup table
#[derive(Debug, Clone)]
pub struct KeywordTable {
    words: FxHashMap<&'static str, TokenKind>,
    case: KeywordCase,
}

impl KeywordTable {
    pub fn new(case: KeywordCase) -> Self {
        let words = [
            TokenKind::Imprimir,
            TokenKind::Leer,
            TokenKind::Mientras,
            TokenKind::Programa,
            TokenKind::Si,
            TokenKind::Sino,
            TokenKind::Terminar,
            TokenKind::Int,
            TokenKind::FloatType,
            TokenKind::CharType,
            TokenKind::AndWord,
            TokenKind::OrWord,
        ]
        .into_iter()
        .filter_map(|kind| kind.lexeme().map(|text| (text, kind)))
        .collect();

        Self { words, case }
    }

    pub fn lookup(&self, word: &str) -> Option<TokenKind> {
        match self.case {
            KeywordCase::Sensitive => self.words.get(word).copied(),
            KeywordCase::Insensitive => self.words.get(word.to_ascii_lowercase().as_str()).copied(),
        }
    }

    pub fn case(&self) -> KeywordCase {
        self.case
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::new(KeywordCase::default())
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_operator_char(ch: char) -> bool {
    matches!(ch, '+' | '-' | '*' | '/' | '=' | '<' | '>' | '!' | '&' | '|')
}

fn operator_kind(run: &str) -> Option<TokenKind> {
    let kind = match run {
        "+" => TokenKind::Plus,
        "-" => TokenKind::Minus,
        "*" => TokenKind::Star,
        "/" => TokenKind::Slash,
        "=" => TokenKind::Assign,
        "==" => TokenKind::EqEq,
        "!=" => TokenKind::NotEq,
        "<" => TokenKind::Lt,
        "<=" => TokenKind::Le,
        ">" => TokenKind::Gt,
        ">=" => TokenKind::Ge,
        "&&" => TokenKind::AndAnd,
        "||" => TokenKind::OrOr,
        _ => return None,
    };
    Some(kind)
}

/// Lexer over one input at a time
///
/// The run state (input, position, line counter, line start, diagnostics) is
/// replaced wholesale by [`Lexer::reset`], so a lexer can be reused across
/// unrelated inputs without leaking positions or errors between them.
pub struct Lexer {
    keywords: KeywordTable,
    input: Vec<char>,
    position: usize,
    line: usize,
    line_start: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    /// Create a lexer with no input loaded
    pub fn new(keyword_case: KeywordCase) -> Self {
        Self {
            keywords: KeywordTable::new(keyword_case),
            input: Vec::new(),
            position: 0,
            line: 1,
            line_start: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Create a lexer with `input` already loaded, for pulling tokens one by one
    pub fn with_input(input: &str, keyword_case: KeywordCase) -> Self {
        let mut lexer = Self::new(keyword_case);
        lexer.reset(input);
        lexer
    }

    /// Load a new input and clear all per-run state
    pub fn reset(&mut self, input: &str) {
        self.input = input.chars().collect();
        self.position = 0;
        self.line = 1;
        self.line_start = 0;
        self.diagnostics.clear();
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self, input: &str) -> Vec<Token> {
        self.reset(input);
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        debug!(
            tokens = tokens.len(),
            errors = self.diagnostics.len(),
            lines = self.line,
            "tokenized input"
        );
        tokens
    }

    /// Lexical diagnostics recorded since the last reset
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Produce the next token, or `None` at end of input
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            self.skip_whitespace_and_comments();

            let start = self.position;
            let ch = self.peek()?;

            let token = match ch {
                'a'..='z' | 'A'..='Z' | '_' => Some(self.identifier_or_keyword(start)),
                '0'..='9' => self.number_literal(start),
                '.' => self.leading_dot(start),
                '\'' => self.char_literal(start),
                '"' => self.string_literal(start),
                '(' => Some(self.single(TokenKind::LParen)),
                ')' => Some(self.single(TokenKind::RParen)),
                '{' => Some(self.single(TokenKind::LBrace)),
                '}' => Some(self.single(TokenKind::RBrace)),
                ';' => Some(self.single(TokenKind::Semicolon)),
                ',' => Some(self.single(TokenKind::Comma)),
                c if is_operator_char(c) => self.operator(start),
                c => {
                    self.advance();
                    self.report(LexErrorKind::IllegalChar(c), start);
                    None
                }
            };

            if let Some(token) = token {
                trace!(kind = ?token.kind, line = token.line, column = token.column, "token");
                return Some(token);
            }
        }
    }

    /// Identifier, reserved word, or word operator (`and`, `or`)
    fn identifier_or_keyword(&mut self, start: usize) -> Token {
        self.advance_while(is_ident_continue);
        let word: String = self.input[start..self.position].iter().collect();
        let (line, column) = self.position_of(start);

        match self.keywords.lookup(&word) {
            Some(kind) => Token::simple(kind, line, column),
            None => Token::new(TokenKind::Identifier, Some(TokenValue::Text(word)), line, column),
        }
    }

    /// Integer or float literal, or a digit-led identifier
    fn number_literal(&mut self, start: usize) -> Option<Token> {
        self.advance_while(|c| c.is_ascii_digit());

        if self.peek().is_some_and(is_ident_start) {
            self.advance_while(is_ident_continue);
            let lexeme = self.lexeme(start, self.position);
            self.report(LexErrorKind::InvalidIdentifier(lexeme), start);
            return self.salvage(start, self.position);
        }

        if self.peek() == Some('.') {
            self.advance_while(|c| c.is_ascii_digit() || c == '.');
            let lexeme = self.lexeme(start, self.position);
            let well_formed = lexeme.matches('.').count() == 1 && !lexeme.ends_with('.');
            return match lexeme.parse::<f64>() {
                Ok(value) if well_formed => {
                    let (line, column) = self.position_of(start);
                    Some(Token::new(TokenKind::Float, Some(TokenValue::Float(value)), line, column))
                }
                _ => {
                    self.report(LexErrorKind::MalformedNumber(lexeme), start);
                    None
                }
            };
        }

        let lexeme = self.lexeme(start, self.position);
        match lexeme.parse::<i64>() {
            Ok(value) => {
                let (line, column) = self.position_of(start);
                Some(Token::new(TokenKind::Integer, Some(TokenValue::Integer(value)), line, column))
            }
            Err(_) => {
                self.report(LexErrorKind::MalformedNumber(lexeme), start);
                None
            }
        }
    }

    /// A `.` that does not follow a digit run
    fn leading_dot(&mut self, start: usize) -> Option<Token> {
        if self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance_while(|c| c.is_ascii_digit() || c == '.');
            let lexeme = self.lexeme(start, self.position);
            self.report(LexErrorKind::MalformedNumber(lexeme), start);
        } else {
            self.advance();
            self.report(LexErrorKind::IllegalChar('.'), start);
        }
        None
    }

    /// Character literal: exactly one non-newline character between quotes
    fn char_literal(&mut self, start: usize) -> Option<Token> {
        let mut end = start + 1;
        while end < self.input.len() && self.input[end] != '\'' && self.input[end] != '\n' {
            end += 1;
        }

        let closed = end < self.input.len() && self.input[end] == '\'';
        let interior = end - start - 1;

        if closed && interior == 1 {
            let value = self.input[start + 1];
            self.position = end + 1;
            let (line, column) = self.position_of(start);
            return Some(Token::new(TokenKind::Char, Some(TokenValue::Char(value)), line, column));
        }

        let (reason, span_end) = match (closed, interior) {
            (false, _) => (CharLiteralProblem::Unterminated, end),
            (true, 0) => (CharLiteralProblem::Empty, end + 1),
            (true, _) => (CharLiteralProblem::TooLong, end + 1),
        };
        self.position = span_end;
        let lexeme = self.lexeme(start, span_end);
        self.report(LexErrorKind::InvalidCharLiteral { lexeme, reason }, start);
        self.salvage(start, span_end)
    }

    /// String literal without escapes; an unclosed quote is an illegal character
    fn string_literal(&mut self, start: usize) -> Option<Token> {
        let mut end = start + 1;
        while end < self.input.len() && self.input[end] != '"' && self.input[end] != '\n' {
            end += 1;
        }

        if end < self.input.len() && self.input[end] == '"' {
            let text = self.lexeme(start + 1, end);
            self.position = end + 1;
            let (line, column) = self.position_of(start);
            Some(Token::new(TokenKind::Str, Some(TokenValue::Text(text)), line, column))
        } else {
            self.advance();
            self.report(LexErrorKind::IllegalChar('"'), start);
            None
        }
    }

    /// Operator run, matched as a whole so `**` or `+=` is one error
    fn operator(&mut self, start: usize) -> Option<Token> {
        self.advance_while(is_operator_char);
        let run = self.lexeme(start, self.position);

        if let Some(kind) = operator_kind(&run) {
            let (line, column) = self.position_of(start);
            return Some(Token::simple(kind, line, column));
        }

        let mut chars = run.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => self.report(LexErrorKind::IllegalChar(c), start),
            _ => self.report(LexErrorKind::InvalidOperator(run), start),
        }
        None
    }

    /// Recover a `,` or `;` from a rejected span `[start, end)`, or from the
    /// character right after it. Lexing resumes after the salvaged character.
    fn salvage(&mut self, start: usize, end: usize) -> Option<Token> {
        let found = (start..end)
            .find(|&i| matches!(self.input[i], ',' | ';'))
            .or_else(|| match self.input.get(end) {
                Some(',') | Some(';') => Some(end),
                _ => None,
            });

        match found {
            Some(index) => {
                let kind = if self.input[index] == ',' {
                    TokenKind::Comma
                } else {
                    TokenKind::Semicolon
                };
                self.position = index + 1;
                let (line, column) = self.position_of(index);
                debug!(?kind, line, column, "salvaged separator from rejected span");
                Some(Token::simple(kind, line, column))
            }
            None => {
                self.position = end;
                None
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        let (line, column) = self.position_of(self.position);
        self.advance();
        Token::simple(kind, line, column)
    }

    fn report(&mut self, kind: LexErrorKind, start: usize) {
        let (line, column) = self.position_of(start);
        debug!(line, column, "lexical error: {}", kind);
        self.diagnostics
            .push(Diagnostic::lexical(kind, SourceLocation::new(line, column)));
    }

    /// Skip whitespace, newlines and `#` comments
    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\n' => {
                    self.advance();
                    self.line += 1;
                    self.line_start = self.position;
                }
                '#' => self.advance_while(|c| c != '\n'),
                _ => break,
            }
        }
    }

    /// 1-based line and column of an input index on the current line
    fn position_of(&self, index: usize) -> (usize, usize) {
        (self.line, index - self.line_start + 1)
    }

    fn lexeme(&self, start: usize, end: usize) -> String {
        self.input[start..end].iter().collect()
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.position += 1;
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        Some(ch)
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new(KeywordCase::default())
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}
