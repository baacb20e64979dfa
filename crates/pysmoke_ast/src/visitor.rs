//! AST visitor trait for traversing the syntax tree.
//!
//! Provides both an `AstVisitor` trait for customizable traversal and
//! a `for_each_child` function for generic iteration over all children.

use crate::node::*;
use crate::syntax_kind::SyntaxKind;

/// A visitor that traverses the AST. Implement this trait to perform
/// operations on each node kind. Default implementations walk into children.
pub trait AstVisitor<'a> {
    fn visit_module(&mut self, node: &Module<'a>) {
        self.visit_statements(node.body);
    }

    fn visit_statements(&mut self, statements: &[Statement<'a>]) {
        for stmt in statements {
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, stmt: &Statement<'a>) {
        match stmt {
            Statement::FunctionDef(n) => self.visit_function_def(n),
            Statement::ClassDef(n) => self.visit_class_def(n),
            Statement::Return(n) => {
                if let Some(value) = n.value {
                    self.visit_expression(value);
                }
            }
            Statement::If(n) => {
                self.visit_expression(n.condition);
                self.visit_statements(n.then_body);
                self.visit_statements(n.else_body);
            }
            Statement::While(n) => {
                self.visit_expression(n.condition);
                self.visit_statements(n.body);
                self.visit_statements(n.else_body);
            }
            Statement::For(n) => self.visit_for_statement(n),
            Statement::Assign(n) => self.visit_assign_statement(n),
            Statement::AugAssign(n) => {
                self.visit_expression(n.target);
                self.visit_expression(n.value);
            }
            Statement::Expression(n) => self.visit_expression(n.expression),
            Statement::Pass(_)
            | Statement::Break(_)
            | Statement::Continue(_)
            | Statement::Missing(_) => {}
        }
    }

    fn visit_function_def(&mut self, node: &FunctionDef<'a>) {
        for param in node.parameters {
            if let Some(default) = param.default {
                self.visit_expression(default);
            }
        }
        self.visit_statements(node.body);
    }

    fn visit_class_def(&mut self, node: &ClassDef<'a>) {
        for base in node.bases {
            self.visit_expression(base);
        }
        self.visit_statements(node.body);
    }

    fn visit_for_statement(&mut self, node: &ForStatement<'a>) {
        self.visit_expression(node.iterable);
        self.visit_statements(node.body);
        self.visit_statements(node.else_body);
    }

    fn visit_assign_statement(&mut self, node: &AssignStatement<'a>) {
        self.visit_expression(node.value);
        self.visit_expression(node.target);
    }

    fn visit_expression(&mut self, expr: &Expression<'a>) {
        walk_expression(self, expr);
    }

    fn visit_name(&mut self, _node: &Identifier<'a>) {}
}

/// Walk the children of an expression with `visitor`.
pub fn walk_expression<'a, V: AstVisitor<'a> + ?Sized>(visitor: &mut V, expr: &Expression<'a>) {
    match expr {
        Expression::Name(n) => visitor.visit_name(n),
        Expression::Binary(n) => {
            visitor.visit_expression(n.left);
            visitor.visit_expression(n.right);
        }
        Expression::Unary(n) => visitor.visit_expression(n.operand),
        Expression::Compare(n) => {
            visitor.visit_expression(n.left);
            for cmp in n.comparisons {
                visitor.visit_expression(cmp.right);
            }
        }
        Expression::Call(n) => {
            visitor.visit_expression(n.callee);
            for arg in n.arguments {
                visitor.visit_expression(arg.value);
            }
        }
        Expression::Attribute(n) => visitor.visit_expression(n.object),
        Expression::Subscript(n) => {
            visitor.visit_expression(n.object);
            visitor.visit_expression(n.index);
        }
        Expression::List(n) => {
            for element in n.elements {
                visitor.visit_expression(element);
            }
        }
        Expression::Integer(_)
        | Expression::Float(_)
        | Expression::String(_)
        | Expression::Boolean(_)
        | Expression::None(_)
        | Expression::Missing(_) => {}
    }
}

// ============================================================================
// Generic child iteration
// ============================================================================

/// A borrowed reference to any node, for generic tree walks.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'r, 'a> {
    Statement(&'r Statement<'a>),
    Expression(&'r Expression<'a>),
    Parameter(&'r Parameter<'a>),
    Argument(&'r Argument<'a>),
    Identifier(&'r Identifier<'a>),
    /// A named group of statements (`body`, `else`), so tree dumps can tell
    /// the branches of an `if` apart.
    Suite(&'static str, &'r [Statement<'a>]),
}

impl<'r, 'a> NodeRef<'r, 'a> {
    pub fn kind(&self) -> SyntaxKind {
        match self {
            NodeRef::Statement(n) => n.kind(),
            NodeRef::Expression(n) => n.kind(),
            NodeRef::Parameter(n) => n.data.kind,
            NodeRef::Argument(n) => n.data.kind,
            NodeRef::Identifier(n) => n.data.kind,
            NodeRef::Suite(..) => SyntaxKind::Unknown,
        }
    }
}

/// Call `f` for every direct child of `node`, in source order.
pub fn for_each_child<'r, 'a>(node: NodeRef<'r, 'a>, mut f: impl FnMut(NodeRef<'r, 'a>)) {
    fn suite<'r, 'a>(name: &'static str, body: &'r [Statement<'a>], f: &mut dyn FnMut(NodeRef<'r, 'a>)) {
        if !body.is_empty() {
            f(NodeRef::Suite(name, body));
        }
    }
    match node {
        NodeRef::Suite(_, body) => body.iter().for_each(|s| f(NodeRef::Statement(s))),
        NodeRef::Identifier(_) => {}
        NodeRef::Parameter(p) => {
            f(NodeRef::Identifier(&p.name));
            if let Some(default) = p.default {
                f(NodeRef::Expression(default));
            }
        }
        NodeRef::Argument(a) => {
            if let Some(name) = &a.name {
                f(NodeRef::Identifier(name));
            }
            f(NodeRef::Expression(a.value));
        }
        NodeRef::Statement(stmt) => match stmt {
            Statement::FunctionDef(n) => {
                f(NodeRef::Identifier(&n.name));
                n.parameters.iter().for_each(|p| f(NodeRef::Parameter(p)));
                suite("body", n.body, &mut f);
            }
            Statement::ClassDef(n) => {
                f(NodeRef::Identifier(&n.name));
                n.bases.iter().for_each(|b| f(NodeRef::Expression(b)));
                suite("body", n.body, &mut f);
            }
            Statement::Return(n) => {
                if let Some(value) = n.value {
                    f(NodeRef::Expression(value));
                }
            }
            Statement::If(n) => {
                f(NodeRef::Expression(n.condition));
                suite("then", n.then_body, &mut f);
                suite("else", n.else_body, &mut f);
            }
            Statement::While(n) => {
                f(NodeRef::Expression(n.condition));
                suite("body", n.body, &mut f);
                suite("else", n.else_body, &mut f);
            }
            Statement::For(n) => {
                f(NodeRef::Identifier(&n.target));
                f(NodeRef::Expression(n.iterable));
                suite("body", n.body, &mut f);
                suite("else", n.else_body, &mut f);
            }
            Statement::Assign(n) => {
                f(NodeRef::Expression(n.target));
                f(NodeRef::Expression(n.value));
            }
            Statement::AugAssign(n) => {
                f(NodeRef::Expression(n.target));
                f(NodeRef::Expression(n.value));
            }
            Statement::Expression(n) => f(NodeRef::Expression(n.expression)),
            Statement::Pass(_)
            | Statement::Break(_)
            | Statement::Continue(_)
            | Statement::Missing(_) => {}
        },
        NodeRef::Expression(expr) => match expr {
            Expression::Binary(n) => {
                f(NodeRef::Expression(n.left));
                f(NodeRef::Expression(n.right));
            }
            Expression::Unary(n) => f(NodeRef::Expression(n.operand)),
            Expression::Compare(n) => {
                f(NodeRef::Expression(n.left));
                n.comparisons.iter().for_each(|c| f(NodeRef::Expression(c.right)));
            }
            Expression::Call(n) => {
                f(NodeRef::Expression(n.callee));
                n.arguments.iter().for_each(|a| f(NodeRef::Argument(a)));
            }
            Expression::Attribute(n) => {
                f(NodeRef::Expression(n.object));
                f(NodeRef::Identifier(&n.name));
            }
            Expression::Subscript(n) => {
                f(NodeRef::Expression(n.object));
                f(NodeRef::Expression(n.index));
            }
            Expression::List(n) => n.elements.iter().for_each(|e| f(NodeRef::Expression(e))),
            Expression::Name(_)
            | Expression::Integer(_)
            | Expression::Float(_)
            | Expression::String(_)
            | Expression::Boolean(_)
            | Expression::None(_)
            | Expression::Missing(_) => {}
        },
    }
}
