//! # Introduction
//!
//! sintax tokenizes and parses programs written in a small imperative
//! language with Spanish reserved words. Neither stage stops at the first
//! problem: every lexical and syntax error is collected, and the parser
//! recovers in panic mode so that one analysis run reports as much as it can.
//!
//! ```text
//! programa Test() {
//!     int x = 5;
//!     imprimir("valor", x);
//!     terminar;
//! }
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST → Printer / Graph / TUI
//!            ↘ diagnostics ↙
//! ```
//!
//! 1. [`parser`]: the [`parser::lexer::Lexer`], the recursive descent
//!    [`parser::parse::Parser`], and the arena-backed [`parser::ast::Ast`].
//! 2. [`diagnostics`]: lexical and syntax error kinds and the per-run
//!    [`diagnostics::DiagnosticLog`].
//! 3. [`analyzer`]: runs both stages over a text with a fresh state each time.
//! 4. [`output`]: indented tree printer, graph/DOT export, report tables.
//! 5. [`ui`]: ratatui-based viewer; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use sintax::analyzer::Analyzer;
//! use sintax::output::printer::render_tree;
//!
//! let mut analyzer = Analyzer::default();
//! let analysis = analyzer.analyze("programa P() { leer x; terminar; }");
//! assert!(analysis.diagnostics.is_empty());
//! assert!(render_tree(analysis.ast.as_ref().unwrap()).starts_with("Program: P"));
//! ```

pub mod analyzer;
pub mod config;
pub mod diagnostics;
pub mod output;
pub mod parser;
pub mod ui;
