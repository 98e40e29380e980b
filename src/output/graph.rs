//! Graph description of a syntax tree
//!
//! Vertices are numbered in depth-first pre-order starting at 0, so the root
//! is always vertex 0. Each edge carries the child's position under its
//! parent.

use crate::parser::ast::{Ast, NodeId};
use petgraph::dot::{Config, Dot};
use petgraph::prelude::*;
use petgraph::visit::EdgeRef;

/// A syntax tree as a directed graph
#[derive(Debug, Clone)]
pub struct GraphExport {
    graph: DiGraph<String, usize>,
}

impl GraphExport {
    pub fn from_ast(ast: &Ast) -> Self {
        let mut graph = DiGraph::with_capacity(ast.len(), ast.len().saturating_sub(1));
        let root = graph.add_node(ast.root_node().display_label());
        Self::add_children(ast, ast.root(), root, &mut graph);
        Self { graph }
    }

    fn add_children(
        ast: &Ast,
        id: NodeId,
        vertex: NodeIndex,
        graph: &mut DiGraph<String, usize>,
    ) {
        for (position, &child) in ast.node(id).children.iter().enumerate() {
            let child_vertex = graph.add_node(ast.node(child).display_label());
            graph.add_edge(vertex, child_vertex, position);
            Self::add_children(ast, child, child_vertex, graph);
        }
    }

    /// `(vertex, label)` in vertex order
    pub fn nodes(&self) -> Vec<(usize, &str)> {
        self.graph
            .node_indices()
            .map(|index| (index.index(), self.graph[index].as_str()))
            .collect()
    }

    /// `(parent, child)` pairs, parents in pre-order and children in order
    pub fn edges(&self) -> Vec<(usize, usize)> {
        self.graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index()))
            .collect()
    }

    pub fn graph(&self) -> &DiGraph<String, usize> {
        &self.graph
    }

    /// Graphviz DOT text
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::with_config(&self.graph, &[Config::EdgeNoLabel]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;
    use test_log::test;

    fn export(source: &str) -> GraphExport {
        GraphExport::from_ast(&Parser::from_source(source).parse().ast.unwrap())
    }

    #[test]
    fn test_vertices_follow_preorder() {
        let graph = export("programa G() { leer x; terminar; }");
        assert_eq!(
            graph.nodes(),
            vec![
                (0, "Program: G"),
                (1, "Statements"),
                (2, "Read"),
                (3, "Variable: x"),
                (4, "Terminate"),
            ]
        );
        assert_eq!(graph.edges(), vec![(0, 1), (1, 2), (2, 3), (0, 4)]);
    }

    #[test]
    fn test_one_edge_per_child() {
        let graph = export("programa G() { int a, b, c; terminar; }");
        assert_eq!(graph.edges().len(), graph.nodes().len() - 1);
    }

    #[test]
    fn test_dot_output() {
        let dot = export("programa G() { terminar; }").to_dot();
        assert!(dot.starts_with("digraph {"));
        assert!(dot.contains("Program: G"));
        assert!(dot.contains("0 -> 1"));
    }
}
