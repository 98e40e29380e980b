//! Indented tree printer

use crate::parser::ast::Ast;
use std::fmt;

const INDENT: &str = "  ";

/// Render `ast` in pre-order, one node per line, two spaces per depth level.
///
/// ```text
/// Program: Test
///   Statements
///     Read
///       Variable: x
///   Terminate
/// ```
pub fn render_tree(ast: &Ast) -> String {
    let mut out = String::new();
    for (depth, id) in ast.preorder() {
        for _ in 0..depth {
            out.push_str(INDENT);
        }
        out.push_str(&ast.node(id).display_label());
        out.push('\n');
    }
    out
}

/// [`Display`](fmt::Display) adapter returned by [`Ast::display`]
pub struct TreeDisplay<'a>(&'a Ast);

impl fmt::Display for TreeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_tree(self.0))
    }
}

impl Ast {
    pub fn display(&self) -> TreeDisplay<'_> {
        TreeDisplay(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;
    use test_log::test;

    #[test]
    fn test_render_indents_by_depth() {
        let ast = Parser::from_source("programa Test() { leer x; terminar; }")
            .parse()
            .ast
            .unwrap();
        assert_eq!(
            render_tree(&ast),
            "Program: Test\n  Statements\n    Read\n      Variable: x\n  Terminate\n"
        );
        assert_eq!(ast.display().to_string(), render_tree(&ast));
    }
}
