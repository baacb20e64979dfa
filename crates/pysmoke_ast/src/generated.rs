//! Accessor helpers for AST node enums.

use crate::node::*;
use crate::syntax_kind::SyntaxKind;
use pysmoke_core::text::TextSpan;

impl<'a> Statement<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Statement::FunctionDef(n) => &n.data,
            Statement::ClassDef(n) => &n.data,
            Statement::Return(n) => &n.data,
            Statement::If(n) => &n.data,
            Statement::While(n) => &n.data,
            Statement::For(n) => &n.data,
            Statement::Assign(n) => &n.data,
            Statement::AugAssign(n) => &n.data,
            Statement::Expression(n) => &n.data,
            Statement::Pass(d) => d,
            Statement::Break(d) => d,
            Statement::Continue(d) => d,
            Statement::Missing(d) => d,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    pub fn span(&self) -> TextSpan {
        self.data().span()
    }
}

impl<'a> Expression<'a> {
    pub fn data(&self) -> &NodeData {
        match self {
            Expression::Name(n) => &n.data,
            Expression::Integer(n) => &n.data,
            Expression::Float(n) => &n.data,
            Expression::String(n) => &n.data,
            Expression::Boolean(n) => &n.data,
            Expression::None(d) => d,
            Expression::Binary(n) => &n.data,
            Expression::Unary(n) => &n.data,
            Expression::Compare(n) => &n.data,
            Expression::Call(n) => &n.data,
            Expression::Attribute(n) => &n.data,
            Expression::Subscript(n) => &n.data,
            Expression::List(n) => &n.data,
            Expression::Missing(d) => d,
        }
    }

    /// Mutable access, used by the parser to flag parenthesized expressions.
    pub fn data_mut(&mut self) -> &mut NodeData {
        match self {
            Expression::Name(n) => &mut n.data,
            Expression::Integer(n) => &mut n.data,
            Expression::Float(n) => &mut n.data,
            Expression::String(n) => &mut n.data,
            Expression::Boolean(n) => &mut n.data,
            Expression::None(d) => d,
            Expression::Binary(n) => &mut n.data,
            Expression::Unary(n) => &mut n.data,
            Expression::Compare(n) => &mut n.data,
            Expression::Call(n) => &mut n.data,
            Expression::Attribute(n) => &mut n.data,
            Expression::Subscript(n) => &mut n.data,
            Expression::List(n) => &mut n.data,
            Expression::Missing(d) => d,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    pub fn span(&self) -> TextSpan {
        self.data().span()
    }

    /// Whether the expression may appear on the left of `=`.
    pub fn is_assignment_target(&self) -> bool {
        matches!(
            self,
            Expression::Name(_) | Expression::Attribute(_) | Expression::Subscript(_)
        )
    }

    /// Short description used in "Cannot assign to ..." diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Expression::Name(_) => "name",
            Expression::Integer(_)
            | Expression::Float(_)
            | Expression::String(_)
            | Expression::Boolean(_)
            | Expression::None(_) => "literal",
            Expression::Binary(_) | Expression::Unary(_) => "expression",
            Expression::Compare(_) => "comparison",
            Expression::Call(_) => "function call",
            Expression::Attribute(_) => "attribute",
            Expression::Subscript(_) => "subscript",
            Expression::List(_) => "list display",
            Expression::Missing(_) => "expression",
        }
    }
}
