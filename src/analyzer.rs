//! One-call front end: text in, tokens + tree + diagnostics out

use crate::config::AnalyzerConfig;
use crate::diagnostics::{DiagnosticLog, Stage};
use crate::parser::ast::Ast;
use crate::parser::lexer::{Lexer, Token};
use crate::parser::parse::Parser;
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

/// Everything produced by one analysis run
#[derive(Debug, Clone)]
pub struct Analysis {
    pub tokens: Vec<Token>,
    /// `None` only when the input ended before the program was closed
    pub ast: Option<Ast>,
    /// Lexical and syntax diagnostics interleaved in source order
    pub diagnostics: DiagnosticLog,
}

impl Analysis {
    pub fn is_clean(&self) -> bool {
        self.ast.is_some() && self.diagnostics.is_empty()
    }

    /// 0 when clean, 1 when diagnostics were recorded, 2 when no tree was built
    pub fn exit_code(&self) -> u8 {
        match (&self.ast, self.diagnostics.is_empty()) {
            (None, _) => 2,
            (Some(_), true) => 0,
            (Some(_), false) => 1,
        }
    }
}

/// Runs the lexer and the parser over whole source texts.
///
/// Each call to [`Analyzer::analyze`] builds a fresh lexer and parser, so
/// line numbers and diagnostics never carry over between runs.
#[derive(Debug, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
    runs: usize,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config, runs: 0 }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Number of completed `analyze` calls
    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn analyze(&mut self, source: &str) -> Analysis {
        let mut lexer = Lexer::new(self.config.keyword_case);
        let tokens = lexer.tokenize(source);
        let mut diagnostics = DiagnosticLog::from(lexer.take_diagnostics());

        let outcome = Parser::new(tokens.clone()).parse();
        diagnostics.merge(outcome.diagnostics);

        self.runs += 1;
        info!(
            run = self.runs,
            tokens = tokens.len(),
            lexical = diagnostics.count_stage(Stage::Lexical),
            syntax = diagnostics.count_stage(Stage::Syntax),
            tree = outcome.ast.is_some(),
            "analysis finished"
        );

        Analysis {
            tokens,
            ast: outcome.ast,
            diagnostics,
        }
    }

    /// Read `path` as UTF-8 and analyze it
    pub fn analyze_file(&mut self, path: impl AsRef<Path>) -> io::Result<Analysis> {
        let source = fs::read_to_string(path)?;
        Ok(self.analyze(&source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeywordCase;
    use crate::diagnostics::SyntaxErrorKind;
    use test_log::test;

    #[test]
    fn test_runs_are_isolated() {
        let mut analyzer = Analyzer::default();
        let first = analyzer.analyze("programa A() {\n\n @ terminar; }");
        let second = analyzer.analyze("programa B() { terminar; }");

        assert_eq!(first.diagnostics.len(), 1);
        assert_eq!(first.exit_code(), 1);
        assert!(second.is_clean());
        assert_eq!(second.exit_code(), 0);
        assert!(second.tokens.iter().all(|t| t.line == 1));
        assert_eq!(analyzer.runs(), 2);
    }

    #[test]
    fn test_diagnostics_follow_source_order() {
        let mut analyzer = Analyzer::default();
        let analysis = analyzer.analyze("programa P() {\n x = ;\n\n leer @ y;\n terminar;\n}");

        let order: Vec<_> = analysis
            .diagnostics
            .iter()
            .map(|d| (d.stage(), d.line))
            .collect();
        assert_eq!(order, vec![(Stage::Syntax, 2), (Stage::Lexical, 4)]);

        let first = analysis.diagnostics.first_error().unwrap();
        assert_eq!(first.syntax_kind(), Some(SyntaxErrorKind::MalformedAssignment));
        assert_eq!(first.line, 2);
    }

    #[test]
    fn test_case_sensitive_keywords() {
        let config = AnalyzerConfig::default().with_keyword_case(KeywordCase::Sensitive);
        let mut analyzer = Analyzer::new(config);
        let analysis = analyzer.analyze("PROGRAMA A() { terminar; }");
        assert!(analysis.ast.is_some());
        assert!(!analysis.diagnostics.is_empty());

        let mut analyzer = Analyzer::default();
        assert!(analyzer.analyze("PROGRAMA A() { TERMINAR; }").is_clean());
    }
}
