// AST (Abstract Syntax Tree) definitions for the analyzer
//
// Nodes live in a flat arena owned by `Ast` and refer to their children by
// index. Children are always allocated before their parent, so a node's id is
// greater than the ids of everything below it.

use std::fmt;

/// Index of a node inside its [`Ast`] arena
pub type NodeId = usize;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
        }
    }
}

/// Node tags
///
/// The table below lists the children each kind carries, in order:
///
/// ```text
/// Program            [Statements, Terminate]          label: program name
/// Statements         [statement*]
/// Declaration        [Type, Variable+]
/// DeclarationAssign  [Type, Variable, expr]
/// Assignment         [expr]                           label: target
/// Print              [Content+]
/// Read               [Variable]
/// While / If         [condition, Statements]
/// IfElse             [condition, Statements, Statements]
/// Condition          [expr, expr]                     label: relational operator
/// ConditionLogic     [condition, condition]           label: logical operator
/// BinaryOp(op)       [expr, expr]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Statements,
    Declaration,
    DeclarationAssign,
    Assignment,
    Print,
    Content,
    Read,
    While,
    If,
    IfElse,
    Condition,
    ConditionLogic,
    Number,
    Variable,
    BinaryOp(BinOp),
    Terminate,
    Type,
}

impl NodeKind {
    /// Display name used by the printer and the graph exporter
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Program => "Program",
            NodeKind::Statements => "Statements",
            NodeKind::Declaration => "Declaration",
            NodeKind::DeclarationAssign => "DeclarationAssign",
            NodeKind::Assignment => "Assignment",
            NodeKind::Print => "Print",
            NodeKind::Content => "Content",
            NodeKind::Read => "Read",
            NodeKind::While => "While",
            NodeKind::If => "If",
            NodeKind::IfElse => "IfElse",
            NodeKind::Condition => "Condition",
            NodeKind::ConditionLogic => "ConditionLogic",
            NodeKind::Number => "Number",
            NodeKind::Variable => "Variable",
            NodeKind::BinaryOp(BinOp::Add) => "Add",
            NodeKind::BinaryOp(BinOp::Sub) => "Sub",
            NodeKind::BinaryOp(BinOp::Mul) => "Mul",
            NodeKind::BinaryOp(BinOp::Div) => "Div",
            NodeKind::Terminate => "Terminate",
            NodeKind::Type => "Type",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single tree node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub label: Option<String>,
    pub children: Vec<NodeId>,
    pub location: SourceLocation,
}

impl Node {
    /// `Kind` or `Kind: label`
    pub fn display_label(&self) -> String {
        match &self.label {
            Some(label) => format!("{}: {}", self.kind, label),
            None => self.kind.to_string(),
        }
    }
}

/// Arena used while a tree is being built
///
/// Allocation is append-only; [`NodeArena::truncate`] rolls back everything
/// allocated after a mark, which is how a failed statement is discarded.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        NodeArena::default()
    }

    pub fn alloc(
        &mut self,
        kind: NodeKind,
        label: Option<String>,
        children: Vec<NodeId>,
        location: SourceLocation,
    ) -> NodeId {
        debug_assert!(children.iter().all(|&child| child < self.nodes.len()));
        self.nodes.push(Node {
            kind,
            label,
            children,
            location,
        });
        self.nodes.len() - 1
    }

    pub fn leaf(&mut self, kind: NodeKind, label: impl Into<String>, location: SourceLocation) -> NodeId {
        self.alloc(kind, Some(label.into()), Vec::new(), location)
    }

    pub fn mark(&self) -> usize {
        self.nodes.len()
    }

    pub fn truncate(&mut self, mark: usize) {
        self.nodes.truncate(mark);
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Seal the arena into a tree rooted at `root`
    pub fn finish(self, root: NodeId) -> Ast {
        Ast {
            nodes: self.nodes,
            root,
        }
    }
}

/// A finished syntax tree
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn root_node(&self) -> &Node {
        self.node(self.root)
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.nodes[id].children.iter().map(move |&child| &self.nodes[child])
    }

    /// Child `index` of node `id`, if present
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.nodes[id].children.get(index).copied()
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first pre-order walk from the root, yielding `(depth, id)`
    pub fn preorder(&self) -> Vec<(usize, NodeId)> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(0, self.root)];
        while let Some((depth, id)) = stack.pop() {
            order.push((depth, id));
            for &child in self.nodes[id].children.iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        order
    }

    /// Structural comparison that ignores arena layout
    pub fn same_shape(&self, other: &Ast) -> bool {
        fn eq(a: &Ast, a_id: NodeId, b: &Ast, b_id: NodeId) -> bool {
            let (x, y) = (a.node(a_id), b.node(b_id));
            x.kind == y.kind
                && x.label == y.label
                && x.location == y.location
                && x.children.len() == y.children.len()
                && x
                    .children
                    .iter()
                    .zip(&y.children)
                    .all(|(&l, &r)| eq(a, l, b, r))
        }
        eq(self, self.root, other, other.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn sample() -> Ast {
        let mut arena = NodeArena::new();
        let loc = SourceLocation::new(1, 1);
        let one = arena.leaf(NodeKind::Number, "1", loc);
        let two = arena.leaf(NodeKind::Number, "2", loc);
        let add = arena.alloc(NodeKind::BinaryOp(BinOp::Add), None, vec![one, two], loc);
        arena.finish(add)
    }

    #[test]
    fn test_preorder_visits_parent_before_children() {
        let ast = sample();
        let order: Vec<_> = ast
            .preorder()
            .into_iter()
            .map(|(depth, id)| (depth, ast.node(id).display_label()))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, "Add".to_string()),
                (1, "Number: 1".to_string()),
                (1, "Number: 2".to_string()),
            ]
        );
    }

    #[test]
    fn test_truncate_drops_late_allocations() {
        let mut arena = NodeArena::new();
        let loc = SourceLocation::default();
        arena.leaf(NodeKind::Variable, "x", loc);
        let mark = arena.mark();
        arena.leaf(NodeKind::Variable, "y", loc);
        arena.truncate(mark);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_same_shape() {
        assert!(sample().same_shape(&sample()));
    }
}
