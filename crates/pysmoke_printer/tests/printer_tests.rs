//! DOT printer tests.

use bumpalo::Bump;
use pysmoke_parser::Parser;
use pysmoke_printer::{module_to_dot, DotPrinter, PrinterOptions};

/// Helper: parse `source` and render it with `options`.
fn dot_with(source: &str, options: PrinterOptions) -> String {
    let arena = Bump::new();
    let mut parser = Parser::new(&arena, "test.py", source);
    let module = parser.parse_module();
    assert!(parser.take_diagnostics().is_empty());
    DotPrinter::with_options(options).print_module(&module)
}

fn dot(source: &str) -> String {
    dot_with(source, PrinterOptions::default())
}

#[test]
fn test_empty_module() {
    assert_eq!(
        dot(""),
        "digraph \"parse_tree\" {\n    node [shape=box, fontname=\"monospace\"];\n    n0 [label=\"Module\\ntest.py\"];\n}\n"
    );
}

#[test]
fn test_assignment_tree() {
    let out = dot("x = 1 + 2\n");
    let lines: Vec<_> = out.lines().map(str::trim).collect();
    assert_eq!(
        &lines[2..lines.len() - 1],
        &[
            "n0 [label=\"Module\\ntest.py\"];",
            "n1 [label=\"AssignStatement\"];",
            "n0 -> n1;",
            "n2 [label=\"Identifier\\nx\"];",
            "n1 -> n2;",
            "n3 [label=\"BinaryExpression\\n+\"];",
            "n1 -> n3;",
            "n4 [label=\"NumericLiteral\\n1\"];",
            "n3 -> n4;",
            "n5 [label=\"NumericLiteral\\n2\"];",
            "n3 -> n5;",
        ]
    );
}

#[test]
fn test_suites_are_labelled() {
    let out = dot("if x:\n    pass\nelse:\n    y\n");
    assert!(out.contains("[label=\"then\"]"));
    assert!(out.contains("[label=\"else\"]"));
    assert!(out.contains("[label=\"PassStatement\"]"));
}

#[test]
fn test_string_labels_are_escaped() {
    let out = dot("print(\"say \\\"hi\\\"\")\n");
    assert!(out.contains("StringLiteral\\n\\\"say \\\"hi\\\"\\\"\""), "{}", out);
}

#[test]
fn test_compare_and_augmented_labels() {
    let out = dot("a < b is not c\nn += 1\n");
    assert!(out.contains("CompareExpression\\n< is not"));
    assert!(out.contains("AugAssignStatement\\n+="));
}

#[test]
fn test_include_spans() {
    let options = PrinterOptions {
        include_spans: true,
        ..PrinterOptions::default()
    };
    let out = dot_with("x = 1\n", options);
    assert!(out.contains("Identifier\\nx\\n[0, 1)"));
    assert!(out.contains("NumericLiteral\\n1\\n[4, 5)"));
}

#[test]
fn test_every_node_has_one_parent() {
    let arena = Bump::new();
    let source = include_str!("../../pysmoke_compiler/fixtures/smoke.py");
    let mut parser = Parser::new(&arena, "smoke.py", source);
    let module = parser.parse_module();
    let out = module_to_dot(&module);

    let nodes = out.lines().filter(|l| l.contains("[label=")).count();
    let edges = out.lines().filter(|l| l.contains("->")).count();
    assert!(nodes > 50);
    assert_eq!(edges, nodes - 1);
    assert!(out.contains("FunctionDef"));
    assert!(out.contains("ClassDef"));
    assert!(out.contains("Identifier\\nfactorial"));
}
