// End-to-end tests: analyzer, file loading, exports and the command line

use std::io::Write;
use std::path::Path;
use std::process::Command;

use sintax::analyzer::Analyzer;
use sintax::config::{AnalyzerConfig, KeywordCase};
use sintax::diagnostics::{Stage, SyntaxErrorKind};
use sintax::output::graph::GraphExport;
use sintax::output::printer::render_tree;
use sintax::parser::ast::NodeKind;
use tempfile::NamedTempFile;

fn source_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

#[test]
fn test_clean_demo_program() {
    let path = Path::new("demos/ejemplo.txt");
    let analysis = Analyzer::default()
        .analyze_file(path)
        .expect("Failed to read demo file");

    assert!(analysis.is_clean(), "{:?}", analysis.diagnostics);
    let ast = analysis.ast.unwrap();
    assert_eq!(ast.root_node().label.as_deref(), Some("Ejemplo"));

    let block = ast.child(ast.root(), 0).unwrap();
    let kinds: Vec<_> = ast.children(block).map(|n| n.kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::DeclarationAssign,
            NodeKind::DeclarationAssign,
            NodeKind::Declaration,
            NodeKind::Read,
            NodeKind::While,
        ]
    );
}

#[test]
fn test_error_demo_reports_everything() {
    let analysis = Analyzer::default()
        .analyze_file("demos/errores.txt")
        .expect("Failed to read demo file");

    assert_eq!(analysis.diagnostics.count_stage(Stage::Lexical), 2);
    assert_eq!(
        analysis.diagnostics.syntax_kinds(),
        vec![
            SyntaxErrorKind::MissingSemicolon,
            SyntaxErrorKind::MissingOperand,
            SyntaxErrorKind::UnexpectedToken,
            SyntaxErrorKind::DanglingElse,
            SyntaxErrorKind::MalformedCondition,
            SyntaxErrorKind::MalformedDeclaration,
        ]
    );

    let syntax_lines: Vec<_> = analysis
        .diagnostics
        .iter()
        .filter(|d| d.stage() == Stage::Syntax)
        .map(|d| d.line)
        .collect();
    assert_eq!(syntax_lines, vec![3, 4, 5, 6, 7, 8]);

    // Only `leer x;` survives
    let ast = analysis.ast.as_ref().expect("tree");
    let block = ast.child(ast.root(), 0).unwrap();
    assert_eq!(ast.node(block).children.len(), 1);
    assert_eq!(analysis.exit_code(), 1);
}

#[test]
fn test_analyze_file_from_tempfile() {
    let file = source_file("PROGRAMA Temp() {\n  LEER x;\n  TERMINAR;\n}\n");

    let mut analyzer = Analyzer::default();
    let analysis = analyzer.analyze_file(file.path()).expect("read");
    assert!(analysis.is_clean());

    let strict = AnalyzerConfig::default().with_keyword_case(KeywordCase::Sensitive);
    let analysis = Analyzer::new(strict).analyze_file(file.path()).expect("read");
    assert!(!analysis.diagnostics.is_empty());
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Analyzer::default().analyze_file(dir.path().join("nope.txt"));
    assert!(result.is_err());
}

#[test]
fn test_reused_analyzer_does_not_leak_state() {
    let mut analyzer = Analyzer::default();
    let noisy = analyzer.analyze("\n\n\n@ programa A() { terminar; }");
    let quiet = analyzer.analyze("programa B() { terminar; }");

    assert_eq!(noisy.diagnostics.len(), 1);
    assert_eq!(noisy.diagnostics.as_slice()[0].line, 4);
    assert!(quiet.diagnostics.is_empty());
    assert_eq!(quiet.tokens[0].line, 1);
}

#[test]
fn test_printing_is_idempotent() {
    let analysis = Analyzer::default()
        .analyze_file("demos/ejemplo.txt")
        .unwrap();
    let ast = analysis.ast.unwrap();
    assert_eq!(render_tree(&ast), render_tree(&ast));
    assert_eq!(render_tree(&ast).lines().count(), ast.len());
}

#[test]
fn test_graph_matches_tree() {
    let analysis = Analyzer::default()
        .analyze_file("demos/ejemplo.txt")
        .unwrap();
    let ast = analysis.ast.unwrap();
    let graph = GraphExport::from_ast(&ast);

    assert_eq!(graph.nodes().len(), ast.len());
    assert_eq!(graph.edges().len(), ast.len() - 1);
    assert_eq!(graph.nodes()[0], (0, "Program: Ejemplo"));
    // Every vertex but the root has exactly one parent
    let mut parents = vec![0; ast.len()];
    for (_, child) in graph.edges() {
        parents[child] += 1;
    }
    assert!(parents[1..].iter().all(|&p| p == 1));
}

#[test]
fn test_cli_exit_codes_and_reports() {
    let bin = env!("CARGO_BIN_EXE_sintax");

    let clean = source_file("programa P() { leer x; terminar; }");
    let output = Command::new(bin)
        .arg(clean.path())
        .arg("--tree")
        .output()
        .expect("run sintax");
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Program: P\n"));

    let noisy = source_file("programa P() { leer ; terminar; }");
    let output = Command::new(bin)
        .arg(noisy.path())
        .arg("--diagnostics")
        .output()
        .expect("run sintax");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("UnexpectedToken"));

    let broken = source_file("programa P() { leer x;");
    let output = Command::new(bin)
        .arg(broken.path())
        .output()
        .expect("run sintax");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_cli_writes_dot_file() {
    let bin = env!("CARGO_BIN_EXE_sintax");
    let dir = tempfile::tempdir().unwrap();
    let dot_path = dir.path().join("tree.dot");
    let source = source_file("programa P() { terminar; }");

    let status = Command::new(bin)
        .arg(source.path())
        .arg("--tree")
        .arg("--dot")
        .arg(&dot_path)
        .status()
        .expect("run sintax");
    assert!(status.success());

    let dot = std::fs::read_to_string(&dot_path).unwrap();
    assert!(dot.contains("digraph"));
    assert!(dot.contains("Program: P"));
}
