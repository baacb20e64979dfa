//! Parser utility functions.

use pysmoke_ast::syntax_kind::SyntaxKind;
use std::num::ParseIntError;

/// Keywords that start Python statements this parser does not support.
pub fn is_unsupported_statement_keyword(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::ImportKeyword
            | SyntaxKind::FromKeyword
            | SyntaxKind::TryKeyword
            | SyntaxKind::ExceptKeyword
            | SyntaxKind::FinallyKeyword
            | SyntaxKind::WithKeyword
            | SyntaxKind::RaiseKeyword
            | SyntaxKind::AssertKeyword
            | SyntaxKind::DelKeyword
            | SyntaxKind::GlobalKeyword
            | SyntaxKind::NonlocalKeyword
            | SyntaxKind::LambdaKeyword
            | SyntaxKind::YieldKeyword
            | SyntaxKind::AsyncKeyword
            | SyntaxKind::AwaitKeyword
            | SyntaxKind::AsKeyword
    )
}

/// Parse the digits of an integer token (`42`, `0xff`, `0o17`, `0b101`).
/// Separators were already removed by the scanner.
pub fn parse_integer_literal(text: &str) -> Result<i64, ParseIntError> {
    let (digits, radix) = match text.get(..2) {
        Some("0x") | Some("0X") => (&text[2..], 16),
        Some("0o") | Some("0O") => (&text[2..], 8),
        Some("0b") | Some("0B") => (&text[2..], 2),
        _ => (text, 10),
    };
    i64::from_str_radix(digits, radix)
}

/// Parse a float token (`3.14`, `1e3`, `.5`, `2.`).
pub fn parse_float_literal(text: &str) -> Option<f64> {
    text.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::IntErrorKind;

    #[test]
    fn test_parse_integer_literal() {
        assert_eq!(parse_integer_literal("42"), Ok(42));
        assert_eq!(parse_integer_literal("0xff"), Ok(255));
        assert_eq!(parse_integer_literal("0o17"), Ok(15));
        assert_eq!(parse_integer_literal("0b101"), Ok(5));
        let err = parse_integer_literal("99999999999999999999").unwrap_err();
        assert_eq!(*err.kind(), IntErrorKind::PosOverflow);
        let err = parse_integer_literal("0x").unwrap_err();
        assert_eq!(*err.kind(), IntErrorKind::Empty);
    }

    #[test]
    fn test_parse_float_literal() {
        assert_eq!(parse_float_literal("3.5"), Some(3.5));
        assert_eq!(parse_float_literal("1e3"), Some(1000.0));
        assert_eq!(parse_float_literal(".5"), Some(0.5));
        assert_eq!(parse_float_literal("2."), Some(2.0));
    }
}
