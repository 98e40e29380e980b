//! Renderings of an analysis run
//!
//! - [`printer`]: indented text form of a syntax tree
//! - [`graph`]: node/edge description of a tree, with Graphviz DOT output
//! - [`report`]: token and diagnostic tables

pub mod graph;
pub mod printer;
pub mod report;
