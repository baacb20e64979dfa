//! Character classification used by the scanner.

use unicode_xid::UnicodeXID;

/// Tab stops are every 8 columns when measuring indentation.
pub const TAB_WIDTH: u32 = 8;

#[inline]
pub fn is_line_break(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

/// Whitespace that may separate tokens on a single line.
#[inline]
pub fn is_white_space_single_line(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\u{000C}')
}

#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    ch == '_' || ch.is_xid_start()
}

#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    ch == '_' || ch.is_xid_continue()
}

/// Whether `ch` is a digit in the given radix (2, 8, 10 or 16).
#[inline]
pub fn is_radix_digit(ch: char, radix: u32) -> bool {
    ch.is_digit(radix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_chars() {
        assert!(is_identifier_start('_'));
        assert!(is_identifier_start('é'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_part('1'));
        assert!(!is_identifier_part('-'));
    }

    #[test]
    fn test_radix_digits() {
        assert!(is_radix_digit('f', 16));
        assert!(!is_radix_digit('8', 8));
        assert!(is_radix_digit('1', 2));
    }
}
