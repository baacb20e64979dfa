//! AST node definitions.
//!
//! Nodes reference child nodes and text via arena-allocated references, so
//! a whole tree is freed at once when its arena goes away.

use crate::syntax_kind::SyntaxKind;
use crate::types::NodeFlags;
use pysmoke_core::intern::InternedString;
use pysmoke_core::text::{TextRange, TextSpan};

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// Common data shared by all AST nodes.
#[derive(Debug, Clone)]
pub struct NodeData {
    pub kind: SyntaxKind,
    pub range: TextRange,
    pub flags: NodeFlags,
}

impl NodeData {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            kind,
            range: TextRange::new(pos, end),
            flags: NodeFlags::NONE,
        }
    }

    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn span(&self) -> TextSpan {
        self.range.to_span()
    }
}

/// A list of nodes, allocated in the arena.
pub type NodeList<'a, T> = &'a [T];

// ============================================================================
// Module
// ============================================================================

/// A parsed source file.
#[derive(Debug)]
pub struct Module<'a> {
    pub data: NodeData,
    pub body: NodeList<'a, Statement<'a>>,
    pub file_name: String,
    pub text: String,
}

// ============================================================================
// Identifier
// ============================================================================

#[derive(Debug, Clone)]
pub struct Identifier<'a> {
    pub data: NodeData,
    /// The interned text of this identifier.
    pub text: InternedString,
    /// The identifier as written in source.
    pub name: &'a str,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug)]
pub enum Statement<'a> {
    FunctionDef(FunctionDef<'a>),
    ClassDef(ClassDef<'a>),
    Return(ReturnStatement<'a>),
    If(IfStatement<'a>),
    While(WhileStatement<'a>),
    For(ForStatement<'a>),
    Assign(AssignStatement<'a>),
    AugAssign(AugAssignStatement<'a>),
    Expression(ExpressionStatement<'a>),
    Pass(NodeData),
    Break(NodeData),
    Continue(NodeData),
    Missing(NodeData),
}

#[derive(Debug)]
pub struct FunctionDef<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub parameters: NodeList<'a, Parameter<'a>>,
    pub body: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct Parameter<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub default: Option<&'a Expression<'a>>,
}

#[derive(Debug)]
pub struct ClassDef<'a> {
    pub data: NodeData,
    pub name: Identifier<'a>,
    pub bases: NodeList<'a, Expression<'a>>,
    pub body: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct ReturnStatement<'a> {
    pub data: NodeData,
    pub value: Option<&'a Expression<'a>>,
}

/// `if` / `elif` / `else`. An `elif` chain is a nested `IfStatement` as the
/// single statement of `else_body`.
#[derive(Debug)]
pub struct IfStatement<'a> {
    pub data: NodeData,
    pub condition: &'a Expression<'a>,
    pub then_body: NodeList<'a, Statement<'a>>,
    pub else_body: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct WhileStatement<'a> {
    pub data: NodeData,
    pub condition: &'a Expression<'a>,
    pub body: NodeList<'a, Statement<'a>>,
    /// Runs when the loop ends without `break`.
    pub else_body: NodeList<'a, Statement<'a>>,
}

#[derive(Debug)]
pub struct ForStatement<'a> {
    pub data: NodeData,
    pub target: Identifier<'a>,
    pub iterable: &'a Expression<'a>,
    pub body: NodeList<'a, Statement<'a>>,
    /// Runs when the loop ends without `break`.
    pub else_body: NodeList<'a, Statement<'a>>,
}

/// `target = value`. The target is a name, attribute or subscript.
#[derive(Debug)]
pub struct AssignStatement<'a> {
    pub data: NodeData,
    pub target: &'a Expression<'a>,
    pub value: &'a Expression<'a>,
}

/// `target op= value`. `operator` is the binary operator (`+` for `+=`).
#[derive(Debug)]
pub struct AugAssignStatement<'a> {
    pub data: NodeData,
    pub target: &'a Expression<'a>,
    pub operator: SyntaxKind,
    pub value: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct ExpressionStatement<'a> {
    pub data: NodeData,
    pub expression: &'a Expression<'a>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug)]
pub enum Expression<'a> {
    Name(Identifier<'a>),
    Integer(IntegerLiteral),
    Float(FloatLiteral),
    String(StringLiteral<'a>),
    Boolean(BooleanLiteral),
    None(NodeData),
    Binary(BinaryExpression<'a>),
    Unary(UnaryExpression<'a>),
    Compare(CompareExpression<'a>),
    Call(CallExpression<'a>),
    Attribute(AttributeExpression<'a>),
    Subscript(SubscriptExpression<'a>),
    List(ListExpression<'a>),
    Missing(NodeData),
}

#[derive(Debug)]
pub struct IntegerLiteral {
    pub data: NodeData,
    pub value: i64,
}

#[derive(Debug)]
pub struct FloatLiteral {
    pub data: NodeData,
    pub value: f64,
}

#[derive(Debug)]
pub struct StringLiteral<'a> {
    pub data: NodeData,
    /// The cooked value, escapes already resolved.
    pub value: &'a str,
}

#[derive(Debug)]
pub struct BooleanLiteral {
    pub data: NodeData,
    pub value: bool,
}

/// Arithmetic, bitwise and boolean (`and` / `or`) binary operations.
#[derive(Debug)]
pub struct BinaryExpression<'a> {
    pub data: NodeData,
    pub left: &'a Expression<'a>,
    pub operator: SyntaxKind,
    pub right: &'a Expression<'a>,
}

/// `-x`, `+x`, `~x`, `not x`.
#[derive(Debug)]
pub struct UnaryExpression<'a> {
    pub data: NodeData,
    pub operator: SyntaxKind,
    pub operand: &'a Expression<'a>,
}

/// A comparison chain: `a < b <= c` is one node with two comparisons.
#[derive(Debug)]
pub struct CompareExpression<'a> {
    pub data: NodeData,
    pub left: &'a Expression<'a>,
    pub comparisons: NodeList<'a, Comparison<'a>>,
}

#[derive(Debug)]
pub struct Comparison<'a> {
    pub operator: CompareOperator,
    pub right: &'a Expression<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOperator {
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
    In,
    NotIn,
    Is,
    IsNot,
}

impl CompareOperator {
    pub fn text(self) -> &'static str {
        match self {
            CompareOperator::Less => "<",
            CompareOperator::Greater => ">",
            CompareOperator::LessEqual => "<=",
            CompareOperator::GreaterEqual => ">=",
            CompareOperator::Equal => "==",
            CompareOperator::NotEqual => "!=",
            CompareOperator::In => "in",
            CompareOperator::NotIn => "not in",
            CompareOperator::Is => "is",
            CompareOperator::IsNot => "is not",
        }
    }
}

#[derive(Debug)]
pub struct CallExpression<'a> {
    pub data: NodeData,
    pub callee: &'a Expression<'a>,
    pub arguments: NodeList<'a, Argument<'a>>,
}

/// A call argument; `name` is set for keyword arguments (`sep=", "`).
#[derive(Debug)]
pub struct Argument<'a> {
    pub data: NodeData,
    pub name: Option<Identifier<'a>>,
    pub value: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct AttributeExpression<'a> {
    pub data: NodeData,
    pub object: &'a Expression<'a>,
    pub name: Identifier<'a>,
}

#[derive(Debug)]
pub struct SubscriptExpression<'a> {
    pub data: NodeData,
    pub object: &'a Expression<'a>,
    pub index: &'a Expression<'a>,
}

#[derive(Debug)]
pub struct ListExpression<'a> {
    pub data: NodeData,
    pub elements: NodeList<'a, Expression<'a>>,
}
