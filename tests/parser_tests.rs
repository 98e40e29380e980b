// Integration tests for the parser and its error recovery

use sintax::diagnostics::SyntaxErrorKind;
use sintax::output::printer::render_tree;
use sintax::parser::ast::{Ast, BinOp, NodeKind};
use sintax::parser::lexer::Lexer;
use sintax::parser::parse::{ParseOutcome, Parser};

fn parse(source: &str) -> ParseOutcome {
    let tokens = Lexer::default().tokenize(source);
    Parser::new(tokens).parse()
}

fn statement_kinds(ast: &Ast) -> Vec<NodeKind> {
    let block = ast.child(ast.root(), 0).expect("Statements");
    ast.children(block).map(|n| n.kind).collect()
}

#[test]
fn test_sample_program_tree() {
    let source = r#"
        programa Test() {
            int x = 5;
            imprimir("valor", x);
            terminar;
        }
    "#;

    let outcome = parse(source);
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    let ast = outcome.ast.expect("tree");

    assert_eq!(
        render_tree(&ast),
        "\
Program: Test
  Statements
    DeclarationAssign
      Type: int
      Variable: x
      Number: 5
    Print
      Content: valor
      Content: x
  Terminate
"
    );
}

#[test]
fn test_dangling_else() {
    let outcome = parse("programa T() { sino { terminar; } terminar; }");

    let ast = outcome.ast.expect("parse completes");
    assert!(statement_kinds(&ast).is_empty());
    assert_eq!(
        outcome.diagnostics.syntax_kinds(),
        vec![SyntaxErrorKind::DanglingElse]
    );
    assert_eq!(outcome.diagnostics.as_slice()[0].line, 1);
}

#[test]
fn test_arithmetic_precedence() {
    let outcome = parse("programa P() { x = 1 + 2 * 3; terminar; }");
    let ast = outcome.ast.unwrap();

    let block = ast.child(ast.root(), 0).unwrap();
    let assignment = ast.child(block, 0).unwrap();
    assert_eq!(ast.node(assignment).label.as_deref(), Some("x"));

    let add = ast.child(assignment, 0).unwrap();
    assert_eq!(ast.node(add).kind, NodeKind::BinaryOp(BinOp::Add));
    let mul = ast.child(add, 1).unwrap();
    assert_eq!(ast.node(mul).kind, NodeKind::BinaryOp(BinOp::Mul));
}

#[test]
fn test_recovery_keeps_following_statements() {
    let source = "programa P() {\n  int x = ;\n  leer x;\n  y = 3 +;\n  imprimir(y);\n  terminar;\n}";
    let outcome = parse(source);

    assert_eq!(
        outcome.diagnostics.syntax_kinds(),
        vec![
            SyntaxErrorKind::MalformedDeclaration,
            SyntaxErrorKind::MissingOperand,
        ]
    );
    let lines: Vec<_> = outcome.diagnostics.iter().map(|d| d.line).collect();
    assert_eq!(lines, vec![2, 4]);

    let ast = outcome.ast.unwrap();
    assert_eq!(statement_kinds(&ast), vec![NodeKind::Read, NodeKind::Print]);
}

#[test]
fn test_first_error_marker() {
    let outcome = parse("programa P() { leer; imprimir x; terminar; }");
    assert_eq!(outcome.diagnostics.len(), 2);
    assert_eq!(
        outcome.diagnostics.first_error().and_then(|d| d.syntax_kind()),
        Some(SyntaxErrorKind::UnexpectedToken)
    );
    assert_eq!(
        outcome.diagnostics.syntax_kinds()[1],
        SyntaxErrorKind::MalformedArguments
    );
}

#[test]
fn test_conditions_in_control_flow() {
    let source = "programa P() { mientras (a < b and c >= 1 or d != 2) { si (a == b) { leer a; } } terminar; }";
    let outcome = parse(source);
    assert!(outcome.diagnostics.is_empty());

    let ast = outcome.ast.unwrap();
    let block = ast.child(ast.root(), 0).unwrap();
    let while_id = ast.child(block, 0).unwrap();
    let condition = ast.child(while_id, 0).unwrap();
    assert_eq!(ast.node(condition).display_label(), "ConditionLogic: or");
    let left = ast.child(condition, 0).unwrap();
    assert_eq!(ast.node(left).display_label(), "ConditionLogic: and");
}

#[test]
fn test_unclosed_block_produces_no_tree() {
    let outcome = parse("programa P() { mientras (a < 1) { leer a; terminar; }");
    assert!(outcome.ast.is_none());
    assert_eq!(
        outcome.diagnostics.syntax_kinds().last(),
        Some(&SyntaxErrorKind::UnexpectedEndOfInput)
    );
}

#[test]
fn test_trailing_input_is_reported_once() {
    let outcome = parse("programa P() { terminar; } leer x; leer y;");
    assert!(outcome.ast.is_some());
    assert_eq!(
        outcome.diagnostics.syntax_kinds(),
        vec![SyntaxErrorKind::UnexpectedToken]
    );
}

#[test]
fn test_parse_is_deterministic() {
    let source = "programa P() { int a, b; a = b / 2; sino { } terminar; }";
    let first = parse(source);
    let second = parse(source);

    assert!(first.ast.unwrap().same_shape(&second.ast.unwrap()));
    assert_eq!(first.diagnostics, second.diagnostics);
}
