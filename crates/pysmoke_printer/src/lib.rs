//! pysmoke_printer: Parse tree output.
//!
//! Renders a parsed module as a Graphviz DOT digraph: one box per AST node,
//! labelled with its kind and, for leaves and operators, its source text,
//! with edges from each node to its children in source order.

use pysmoke_ast::node::*;
use pysmoke_ast::visitor::{for_each_child, NodeRef};
use std::fmt::Write;

/// Options for the printer.
pub struct PrinterOptions {
    /// Name of the emitted digraph.
    pub graph_name: String,
    /// Append the `[start, end)` byte range to every label.
    pub include_spans: bool,
    /// Indentation string.
    pub indent_str: String,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            graph_name: "parse_tree".to_string(),
            include_spans: false,
            indent_str: "    ".to_string(),
        }
    }
}

/// The printer converts a module into DOT text.
pub struct DotPrinter {
    output: String,
    next_id: u32,
    options: PrinterOptions,
}

impl Default for DotPrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl DotPrinter {
    pub fn new() -> Self {
        Self::with_options(PrinterOptions::default())
    }

    pub fn with_options(options: PrinterOptions) -> Self {
        Self {
            output: String::with_capacity(4096),
            next_id: 0,
            options,
        }
    }

    /// Print a module to a DOT string.
    pub fn print_module(&mut self, module: &Module<'_>) -> String {
        self.output.clear();
        self.next_id = 0;

        let name = escape(&self.options.graph_name);
        let _ = writeln!(self.output, "digraph \"{}\" {{", name);
        self.write_line("node [shape=box, fontname=\"monospace\"];");

        let mut label = format!("Module\\n{}", escape(&module.file_name));
        if self.options.include_spans {
            let _ = write!(label, "\\n[{}, {})", module.data.range.pos, module.data.range.end);
        }
        let root = self.write_node(&label);
        for stmt in module.body {
            self.print_node(NodeRef::Statement(stmt), root);
        }

        self.output.push_str("}\n");
        std::mem::take(&mut self.output)
    }

    fn print_node(&mut self, node: NodeRef<'_, '_>, parent: u32) {
        let mut label = node_label(node);
        if self.options.include_spans {
            if let Some(data) = node_data(node) {
                let _ = write!(label, "\\n[{}, {})", data.range.pos, data.range.end);
            }
        }
        let id = self.write_node(&label);
        let edge = format!("n{} -> n{};", parent, id);
        self.write_line(&edge);

        let mut children = Vec::new();
        for_each_child(node, |child| children.push(child));
        for child in children {
            self.print_node(child, id);
        }
    }

    fn write_node(&mut self, label: &str) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let line = format!("n{} [label=\"{}\"];", id, label);
        self.write_line(&line);
        id
    }

    fn write_line(&mut self, line: &str) {
        self.output.push_str(&self.options.indent_str);
        self.output.push_str(line);
        self.output.push('\n');
    }
}

/// Convenience: render `module` with default options.
pub fn module_to_dot(module: &Module<'_>) -> String {
    DotPrinter::new().print_module(module)
}

fn node_data<'r>(node: NodeRef<'r, '_>) -> Option<&'r NodeData> {
    match node {
        NodeRef::Statement(n) => Some(n.data()),
        NodeRef::Expression(n) => Some(n.data()),
        NodeRef::Parameter(n) => Some(&n.data),
        NodeRef::Argument(n) => Some(&n.data),
        NodeRef::Identifier(n) => Some(&n.data),
        NodeRef::Suite(..) => None,
    }
}

/// The already-escaped label of a node.
fn node_label(node: NodeRef<'_, '_>) -> String {
    let kind = format!("{:?}", node.kind());
    let detail = match node {
        NodeRef::Suite(name, _) => return name.to_string(),
        NodeRef::Identifier(id) => Some(id.name.to_string()),
        NodeRef::Expression(expr) => match expr {
            Expression::Name(id) => Some(id.name.to_string()),
            Expression::Integer(n) => Some(n.value.to_string()),
            Expression::Float(n) => Some(format!("{:?}", n.value)),
            Expression::String(s) => Some(format!("\"{}\"", s.value)),
            Expression::Binary(n) => Some(n.operator.display_text().to_string()),
            Expression::Unary(n) => Some(n.operator.display_text().to_string()),
            Expression::Compare(n) => Some(
                n.comparisons
                    .iter()
                    .map(|c| c.operator.text())
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            _ => None,
        },
        NodeRef::Statement(Statement::AugAssign(n)) => {
            Some(format!("{}=", n.operator.display_text()))
        }
        _ => None,
    };
    match detail {
        Some(text) => format!("{}\\n{}", kind, escape(&text)),
        None => kind,
    }
}

/// Escape text for use inside a double-quoted DOT string.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("say \"hi\"\n"), "say \\\"hi\\\"\\n");
        assert_eq!(escape("a\\b"), "a\\\\b");
    }
}
