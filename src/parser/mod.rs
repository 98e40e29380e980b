//! Front end for the `programa ... terminar;` language
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST) with panic-mode recovery
//! - [`ast`]: Arena-backed AST node definitions
//!
//! # Language
//!
//! - Types: `int`, `float`, `char`
//! - Statements: declarations, assignments, `imprimir`, `leer`, `mientras`,
//!   `si`/`sino`
//! - Expressions: `+ - * /` over numbers and variables
//! - Conditions: one comparison per operand pair, joined by `and`/`&&` and
//!   `or`/`||`
//! - `#` starts a comment running to the end of the line
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
pub mod lexer;
pub mod parse;

mod declarations;
mod expressions;
mod statements;
