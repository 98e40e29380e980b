//! Plain-text tables for tokens and diagnostics

use crate::diagnostics::DiagnosticLog;
use crate::parser::lexer::Token;
use std::fmt::Write;

/// One row per token: kind, value, line, column
pub fn token_report(tokens: &[Token]) -> String {
    let kind_width = tokens
        .iter()
        .map(|t| t.kind.name().len())
        .max()
        .unwrap_or(0)
        .max("KIND".len());
    let value_width = tokens
        .iter()
        .map(|t| t.value_text().chars().count())
        .max()
        .unwrap_or(0)
        .max("VALUE".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<kw$}  {:<vw$}  {:>4}  {:>6}",
        "KIND",
        "VALUE",
        "LINE",
        "COLUMN",
        kw = kind_width,
        vw = value_width
    );
    for token in tokens {
        let _ = writeln!(
            out,
            "{:<kw$}  {:<vw$}  {:>4}  {:>6}",
            token.kind.name(),
            token.value_text(),
            token.line,
            token.column,
            kw = kind_width,
            vw = value_width
        );
    }
    out
}

/// One row per diagnostic in log order, followed by a summary line
pub fn diagnostic_report(log: &DiagnosticLog) -> String {
    if log.is_empty() {
        return "No errors found.\n".to_string();
    }

    let kind_width = log
        .iter()
        .map(|d| d.kind.name().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for diagnostic in log {
        let column = diagnostic
            .column
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<7}  {:<kw$}  {:>4}:{:<4}  {}",
            diagnostic.stage().to_string(),
            diagnostic.kind.name(),
            diagnostic.line,
            column,
            diagnostic.message,
            kw = kind_width
        );
    }
    if let Some(first) = log.first_error() {
        let _ = writeln!(out, "{} error(s); first: {}", log.len(), first);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use test_log::test;

    #[test]
    fn test_token_report_has_one_row_per_token() {
        let analysis = Analyzer::default().analyze("int x = 5;");
        let report = token_report(&analysis.tokens);
        let lines: Vec<_> = report.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with("KIND"));
        assert!(lines[2].starts_with("IDENTIFIER"));
        assert!(lines[2].contains(" x "));
    }

    #[test]
    fn test_diagnostic_report() {
        let analysis = Analyzer::default().analyze("programa P() { sino { } terminar; }");
        let report = diagnostic_report(&analysis.diagnostics);
        assert!(report.contains("DanglingElse"));
        assert!(report.contains("1 error(s)"));

        let clean = Analyzer::default().analyze("programa P() { terminar; }");
        assert_eq!(diagnostic_report(&clean.diagnostics), "No errors found.\n");
    }

    #[test]
    fn test_summary_names_earliest_error() {
        let analysis = Analyzer::default().analyze("programa P() {\n leer ;\n @\n terminar;\n}");
        let report = diagnostic_report(&analysis.diagnostics);
        let summary = report.lines().last().unwrap();
        assert!(summary.starts_with("2 error(s); first: Syntax error"), "{summary}");
        assert!(summary.contains("at line 2"));
    }
}
