//! Operator precedence for binary operators.

use pysmoke_ast::node::CompareOperator;
use pysmoke_ast::syntax_kind::SyntaxKind;

/// Operator precedence levels, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OperatorPrecedence {
    Lowest = 0,
    LogicalOr = 1,
    LogicalAnd = 2,
    /// Prefix `not`. Binds looser than comparisons, tighter than `and`.
    LogicalNot = 3,
    Comparison = 4,
    BitwiseOr = 5,
    BitwiseXor = 6,
    BitwiseAnd = 7,
    Shift = 8,
    Additive = 9,
    Multiplicative = 10,
    Invalid = 255,
}

/// Get the binary operator precedence for a given token kind.
///
/// `**` is absent: it binds tighter than unary minus and is parsed with the
/// unary operators. `not in` needs a lookahead and is handled by the parser.
pub fn get_binary_operator_precedence(kind: SyntaxKind) -> OperatorPrecedence {
    match kind {
        SyntaxKind::OrKeyword => OperatorPrecedence::LogicalOr,
        SyntaxKind::AndKeyword => OperatorPrecedence::LogicalAnd,
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanEqualsToken
        | SyntaxKind::EqualsEqualsToken
        | SyntaxKind::ExclamationEqualsToken
        | SyntaxKind::InKeyword
        | SyntaxKind::IsKeyword => OperatorPrecedence::Comparison,
        SyntaxKind::BarToken => OperatorPrecedence::BitwiseOr,
        SyntaxKind::CaretToken => OperatorPrecedence::BitwiseXor,
        SyntaxKind::AmpersandToken => OperatorPrecedence::BitwiseAnd,
        SyntaxKind::LessThanLessThanToken | SyntaxKind::GreaterThanGreaterThanToken => {
            OperatorPrecedence::Shift
        }
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => OperatorPrecedence::Additive,
        SyntaxKind::AsteriskToken
        | SyntaxKind::SlashToken
        | SyntaxKind::SlashSlashToken
        | SyntaxKind::PercentToken => OperatorPrecedence::Multiplicative,
        _ => OperatorPrecedence::Invalid,
    }
}

/// Map a single-token comparison operator to its AST form.
pub fn compare_operator(kind: SyntaxKind) -> Option<CompareOperator> {
    let operator = match kind {
        SyntaxKind::LessThanToken => CompareOperator::Less,
        SyntaxKind::GreaterThanToken => CompareOperator::Greater,
        SyntaxKind::LessThanEqualsToken => CompareOperator::LessEqual,
        SyntaxKind::GreaterThanEqualsToken => CompareOperator::GreaterEqual,
        SyntaxKind::EqualsEqualsToken => CompareOperator::Equal,
        SyntaxKind::ExclamationEqualsToken => CompareOperator::NotEqual,
        SyntaxKind::InKeyword => CompareOperator::In,
        SyntaxKind::IsKeyword => CompareOperator::Is,
        _ => return None,
    };
    Some(operator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_ordering() {
        let or = get_binary_operator_precedence(SyntaxKind::OrKeyword);
        let and = get_binary_operator_precedence(SyntaxKind::AndKeyword);
        let cmp = get_binary_operator_precedence(SyntaxKind::LessThanToken);
        let add = get_binary_operator_precedence(SyntaxKind::PlusToken);
        let mul = get_binary_operator_precedence(SyntaxKind::SlashSlashToken);
        assert!(or < and && and < OperatorPrecedence::LogicalNot);
        assert!(OperatorPrecedence::LogicalNot < cmp && cmp < add && add < mul);
        assert_eq!(
            get_binary_operator_precedence(SyntaxKind::AsteriskAsteriskToken),
            OperatorPrecedence::Invalid
        );
    }
}
