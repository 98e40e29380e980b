//! Diagnostic types shared by the lexer and the parser
//!
//! Nothing in the front end aborts on bad input. Both stages record a
//! [`Diagnostic`] into a [`DiagnosticLog`] and keep going; the log for one
//! analysis run is handed back to the caller together with the tokens and the
//! tree.
//!
//! The log also remembers which entry was recorded first. That marker is only
//! used for summary display and never hides the entries after it.

use crate::parser::ast::SourceLocation;
use std::fmt;

/// Which front-end stage produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexical,
    Syntax,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Lexical => write!(f, "Lexical"),
            Stage::Syntax => write!(f, "Syntax"),
        }
    }
}

/// Why a character literal was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharLiteralProblem {
    /// No closing quote before the end of the line
    Unterminated,
    /// `''`
    Empty,
    /// More than one character between the quotes
    TooLong,
}

impl fmt::Display for CharLiteralProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharLiteralProblem::Unterminated => write!(f, "missing closing quote"),
            CharLiteralProblem::Empty => write!(f, "empty literal"),
            CharLiteralProblem::TooLong => write!(f, "more than one character"),
        }
    }
}

/// Lexical error kinds
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexErrorKind {
    #[error("illegal character '{0}'")]
    IllegalChar(char),
    #[error("malformed number '{0}'")]
    MalformedNumber(String),
    #[error("invalid identifier '{0}': identifiers cannot start with a digit")]
    InvalidIdentifier(String),
    #[error("invalid character literal {lexeme}: {reason}")]
    InvalidCharLiteral {
        lexeme: String,
        reason: CharLiteralProblem,
    },
    #[error("invalid operator '{0}'")]
    InvalidOperator(String),
}

impl LexErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            LexErrorKind::IllegalChar(_) => "IllegalChar",
            LexErrorKind::MalformedNumber(_) => "MalformedNumber",
            LexErrorKind::InvalidIdentifier(_) => "InvalidIdentifier",
            LexErrorKind::InvalidCharLiteral { .. } => "InvalidCharLiteral",
            LexErrorKind::InvalidOperator(_) => "InvalidOperator",
        }
    }
}

/// Syntax error kinds, one per recovery production
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxErrorKind {
    #[error("missing ';'")]
    MissingSemicolon,
    #[error("malformed argument list")]
    MalformedArguments,
    #[error("malformed declaration")]
    MalformedDeclaration,
    #[error("malformed assignment")]
    MalformedAssignment,
    #[error("missing operand")]
    MissingOperand,
    #[error("malformed condition")]
    MalformedCondition,
    #[error("'sino' without a preceding 'si'")]
    DanglingElse,
    #[error("missing 'terminar'")]
    MissingTerminate,
    #[error("unexpected token")]
    UnexpectedToken,
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

impl SyntaxErrorKind {
    pub fn name(self) -> &'static str {
        match self {
            SyntaxErrorKind::MissingSemicolon => "MissingSemicolon",
            SyntaxErrorKind::MalformedArguments => "MalformedArguments",
            SyntaxErrorKind::MalformedDeclaration => "MalformedDeclaration",
            SyntaxErrorKind::MalformedAssignment => "MalformedAssignment",
            SyntaxErrorKind::MissingOperand => "MissingOperand",
            SyntaxErrorKind::MalformedCondition => "MalformedCondition",
            SyntaxErrorKind::DanglingElse => "DanglingElse",
            SyntaxErrorKind::MissingTerminate => "MissingTerminate",
            SyntaxErrorKind::UnexpectedToken => "UnexpectedToken",
            SyntaxErrorKind::UnexpectedEndOfInput => "UnexpectedEndOfInput",
        }
    }
}

/// Stage-specific kind of a [`Diagnostic`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical(LexErrorKind),
    Syntax(SyntaxErrorKind),
}

impl DiagnosticKind {
    pub fn stage(&self) -> Stage {
        match self {
            DiagnosticKind::Lexical(_) => Stage::Lexical,
            DiagnosticKind::Syntax(_) => Stage::Syntax,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticKind::Lexical(kind) => kind.name(),
            DiagnosticKind::Syntax(kind) => kind.name(),
        }
    }
}

/// One reported problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub line: usize,
    pub column: Option<usize>,
    pub message: String,
}

impl Diagnostic {
    pub fn lexical(kind: LexErrorKind, location: SourceLocation) -> Self {
        let message = kind.to_string();
        Self {
            kind: DiagnosticKind::Lexical(kind),
            line: location.line,
            column: Some(location.column),
            message,
        }
    }

    pub fn syntax(
        kind: SyntaxErrorKind,
        location: SourceLocation,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: DiagnosticKind::Syntax(kind),
            line: location.line,
            column: Some(location.column),
            message: message.into(),
        }
    }

    fn position(&self) -> (usize, usize) {
        (self.line, self.column.unwrap_or(0))
    }

    pub fn stage(&self) -> Stage {
        self.kind.stage()
    }

    /// The syntax kind, if this is a syntax diagnostic
    pub fn syntax_kind(&self) -> Option<SyntaxErrorKind> {
        match &self.kind {
            DiagnosticKind::Syntax(kind) => Some(*kind),
            DiagnosticKind::Lexical(_) => None,
        }
    }

    /// The lexical kind, if this is a lexical diagnostic
    pub fn lex_kind(&self) -> Option<&LexErrorKind> {
        match &self.kind {
            DiagnosticKind::Lexical(kind) => Some(kind),
            DiagnosticKind::Syntax(_) => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column {
            Some(column) => write!(
                f,
                "{} error ({}) at line {}, column {}: {}",
                self.stage(),
                self.kind.name(),
                self.line,
                column,
                self.message
            ),
            None => write!(
                f,
                "{} error ({}) at line {}: {}",
                self.stage(),
                self.kind.name(),
                self.line,
                self.message
            ),
        }
    }
}

impl std::error::Error for Diagnostic {}

/// Ordered diagnostics of one analysis run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticLog {
    entries: Vec<Diagnostic>,
    first_error: Option<usize>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        DiagnosticLog::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        if self.first_error.is_none() {
            self.first_error = Some(self.entries.len());
        }
        self.entries.push(diagnostic);
    }

    /// Append every entry of `other`, keeping this log's first error if set
    pub fn extend(&mut self, other: DiagnosticLog) {
        for diagnostic in other.entries {
            self.push(diagnostic);
        }
    }

    /// Interleave `other` with this log by source position.
    ///
    /// The sort is stable: entries at the same position keep this log's
    /// entries ahead of `other`'s, and each side keeps its own order. The
    /// first-error marker then points at the earliest entry in the source.
    pub fn merge(&mut self, other: DiagnosticLog) {
        self.entries.extend(other.entries);
        self.entries.sort_by_key(Diagnostic::position);
        self.first_error = if self.entries.is_empty() { None } else { Some(0) };
    }

    pub fn first_error(&self) -> Option<&Diagnostic> {
        self.first_error.map(|index| &self.entries[index])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn count_stage(&self, stage: Stage) -> usize {
        self.entries.iter().filter(|d| d.stage() == stage).count()
    }

    /// Every syntax kind in log order
    pub fn syntax_kinds(&self) -> Vec<SyntaxErrorKind> {
        self.entries.iter().filter_map(Diagnostic::syntax_kind).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.first_error = None;
    }
}

impl From<Vec<Diagnostic>> for DiagnosticLog {
    fn from(entries: Vec<Diagnostic>) -> Self {
        let first_error = if entries.is_empty() { None } else { Some(0) };
        Self {
            entries,
            first_error,
        }
    }
}

impl<'a> IntoIterator for &'a DiagnosticLog {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
