//! Scanner integration tests.
//!
//! Verifies tokenization of Python source, including the layout tokens
//! derived from indentation.

use pysmoke_ast::syntax_kind::SyntaxKind;
use pysmoke_ast::types::TokenFlags;
use pysmoke_core::text::LineMap;
use pysmoke_scanner::{Scanner, TokenListing};

/// Helper: scan all tokens from source and return as (kind, value) pairs.
fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut scanner = Scanner::new(source);
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push((kind, scanner.token_value().to_string()));
    }
    tokens
}

/// Helper: scan all token kinds.
fn scan_kinds(source: &str) -> Vec<SyntaxKind> {
    scan_all(source).into_iter().map(|(k, _)| k).collect()
}

use SyntaxKind::*;

#[test]
fn test_empty_source() {
    assert!(scan_all("").is_empty());
}

#[test]
fn test_whitespace_and_comments_only() {
    assert!(scan_all("   \n\t  ").is_empty());
    assert!(scan_all("# just a comment\n\n   # another\n").is_empty());
}

#[test]
fn test_simple_statement_gets_newline() {
    assert_eq!(
        scan_kinds("x = 1\n"),
        vec![Identifier, EqualsToken, NumericLiteral, NewLineToken]
    );
}

#[test]
fn test_missing_final_newline_is_synthesized() {
    assert_eq!(
        scan_kinds("x = 1"),
        vec![Identifier, EqualsToken, NumericLiteral, NewLineToken]
    );
}

#[test]
fn test_indent_and_dedent() {
    let source = "def f():\n    return 1\nx = 2\n";
    assert_eq!(
        scan_kinds(source),
        vec![
            DefKeyword,
            Identifier,
            OpenParenToken,
            CloseParenToken,
            ColonToken,
            NewLineToken,
            IndentToken,
            ReturnKeyword,
            NumericLiteral,
            NewLineToken,
            DedentToken,
            Identifier,
            EqualsToken,
            NumericLiteral,
            NewLineToken,
        ]
    );
}

#[test]
fn test_multiple_dedents_at_once() {
    let source = "if a:\n    if b:\n        c\nd\n";
    let kinds = scan_kinds(source);
    let dedents = kinds.iter().filter(|k| **k == DedentToken).count();
    let indents = kinds.iter().filter(|k| **k == IndentToken).count();
    assert_eq!(indents, 2);
    assert_eq!(dedents, 2);
    // Both dedents come right before `d`.
    let d_index = kinds.len() - 2;
    assert_eq!(kinds[d_index - 1], DedentToken);
    assert_eq!(kinds[d_index - 2], DedentToken);
}

#[test]
fn test_dedents_synthesized_at_end_of_file() {
    let kinds = scan_kinds("while x:\n    if y:\n        z");
    assert_eq!(
        &kinds[kinds.len() - 3..],
        &[NewLineToken, DedentToken, DedentToken]
    );
}

#[test]
fn test_blank_and_comment_lines_do_not_affect_layout() {
    let source = "if x:\n\n    # note\n    y\n\n# trailing\n";
    assert_eq!(
        scan_kinds(source),
        vec![
            IfKeyword,
            Identifier,
            ColonToken,
            NewLineToken,
            IndentToken,
            Identifier,
            NewLineToken,
            DedentToken,
        ]
    );
}

#[test]
fn test_newlines_inside_brackets_are_ignored() {
    let source = "print(1,\n      2)\n";
    assert_eq!(
        scan_kinds(source),
        vec![
            Identifier,
            OpenParenToken,
            NumericLiteral,
            CommaToken,
            NumericLiteral,
            CloseParenToken,
            NewLineToken,
        ]
    );
}

#[test]
fn test_backslash_continuation() {
    assert_eq!(
        scan_kinds("x = 1 + \\\n    2\n"),
        vec![Identifier, EqualsToken, NumericLiteral, PlusToken, NumericLiteral, NewLineToken]
    );
}

#[test]
fn test_inconsistent_dedent_reports_error() {
    let mut scanner = Scanner::new("if x:\n    y\n  z\n");
    scanner.scan_all();
    let diags = scanner.diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.diagnostics()[0].code, 1003);
}

#[test]
fn test_tabs_expand_to_multiples_of_eight() {
    // A tab and eight spaces are the same indentation.
    let mut scanner = Scanner::new("if x:\n\ty\n        z\n");
    let kinds: Vec<_> = scanner.scan_all().into_iter().map(|t| t.kind).collect();
    assert!(scanner.diagnostics().is_empty());
    assert_eq!(kinds.iter().filter(|k| **k == IndentToken).count(), 1);
}

#[test]
fn test_numeric_literals() {
    let tokens = scan_all("42 3.14 0xFF 0o17 0b1010 1_000 1e3 .5");
    let values: Vec<_> = tokens
        .iter()
        .filter(|(k, _)| *k == NumericLiteral)
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(values, vec!["42", "3.14", "0xFF", "0o17", "0b1010", "1000", "1e3", ".5"]);
}

#[test]
fn test_float_flags() {
    let mut scanner = Scanner::new("2.5e-3");
    assert_eq!(scanner.scan(), NumericLiteral);
    assert!(scanner.token_flags().contains(TokenFlags::FLOATING_POINT));
    assert!(scanner.token_flags().contains(TokenFlags::SCIENTIFIC));
    assert_eq!(scanner.token_value(), "2.5e-3");

    let mut scanner = Scanner::new("7");
    scanner.scan();
    assert!(!scanner.token_flags().contains(TokenFlags::FLOATING_POINT));
}

#[test]
fn test_invalid_numeric_literal() {
    let mut scanner = Scanner::new("12abc");
    scanner.scan_all();
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1005);
}

#[test]
fn test_leading_zeros_in_decimal_integer() {
    let mut scanner = Scanner::new("012");
    scanner.scan_all();
    let diagnostics = scanner.diagnostics().diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, 1007);
    assert_eq!(
        diagnostics[0].message_text,
        "Leading zeros in decimal integer literal '012' are not permitted."
    );

    for source in ["0", "00", "0_0", "0.5", "012.5", "01e3", "0x1f", "10"] {
        let mut scanner = Scanner::new(source);
        scanner.scan_all();
        assert!(scanner.diagnostics().is_empty(), "{}", source);
    }
}

#[test]
fn test_string_literals() {
    let tokens = scan_all(r#"'hello' "world""#);
    assert_eq!(tokens[0], (StringLiteral, "hello".to_string()));
    assert_eq!(tokens[1], (StringLiteral, "world".to_string()));
}

#[test]
fn test_string_escapes() {
    let tokens = scan_all(r#""a\nb\t\\\"c\'""#);
    assert_eq!(tokens[0].1, "a\nb\t\\\"c'");
}

#[test]
fn test_triple_quoted_string_spans_lines() {
    let mut scanner = Scanner::new("s = \"\"\"one\ntwo\"\"\"\n");
    let tokens = scanner.scan_all();
    assert_eq!(tokens[2].kind, StringLiteral);
    assert_eq!(tokens[2].text, "one\ntwo");
    assert!(tokens[2].flags.contains(TokenFlags::TRIPLE_QUOTED));
    assert_eq!(tokens[3].kind, NewLineToken);
}

#[test]
fn test_unterminated_string() {
    let mut scanner = Scanner::new("x = 'abc\ny = 1\n");
    let tokens = scanner.scan_all();
    assert!(tokens[2].flags.contains(TokenFlags::UNTERMINATED));
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1002);
    // Scanning resumes on the next line.
    assert!(tokens.iter().any(|t| t.text == "y"));
}

#[test]
fn test_keywords() {
    assert_eq!(
        scan_kinds("def class if elif else while for in return pass break continue"),
        vec![
            DefKeyword,
            ClassKeyword,
            IfKeyword,
            ElifKeyword,
            ElseKeyword,
            WhileKeyword,
            ForKeyword,
            InKeyword,
            ReturnKeyword,
            PassKeyword,
            BreakKeyword,
            ContinueKeyword,
            NewLineToken,
        ]
    );
    assert_eq!(
        scan_kinds("True False None and or not is"),
        vec![
            TrueKeyword,
            FalseKeyword,
            NoneKeyword,
            AndKeyword,
            OrKeyword,
            NotKeyword,
            IsKeyword,
            NewLineToken,
        ]
    );
}

#[test]
fn test_identifiers() {
    let tokens = scan_all("_private self.name café");
    assert_eq!(tokens[0], (Identifier, "_private".to_string()));
    assert_eq!(tokens[1], (Identifier, "self".to_string()));
    assert_eq!(tokens[2].0, DotToken);
    assert_eq!(tokens[3], (Identifier, "name".to_string()));
    assert_eq!(tokens[4], (Identifier, "café".to_string()));
}

#[test]
fn test_operators() {
    assert_eq!(
        scan_kinds("+ - * ** / // % < > <= >= == != & | ^ ~ << >> ->"),
        vec![
            PlusToken,
            MinusToken,
            AsteriskToken,
            AsteriskAsteriskToken,
            SlashToken,
            SlashSlashToken,
            PercentToken,
            LessThanToken,
            GreaterThanToken,
            LessThanEqualsToken,
            GreaterThanEqualsToken,
            EqualsEqualsToken,
            ExclamationEqualsToken,
            AmpersandToken,
            BarToken,
            CaretToken,
            TildeToken,
            LessThanLessThanToken,
            GreaterThanGreaterThanToken,
            MinusGreaterThanToken,
            NewLineToken,
        ]
    );
}

#[test]
fn test_assignment_operators() {
    assert_eq!(
        scan_kinds("= += -= *= /= //= %= **="),
        vec![
            EqualsToken,
            PlusEqualsToken,
            MinusEqualsToken,
            AsteriskEqualsToken,
            SlashEqualsToken,
            SlashSlashEqualsToken,
            PercentEqualsToken,
            AsteriskAsteriskEqualsToken,
            NewLineToken,
        ]
    );
}

#[test]
fn test_invalid_character() {
    let mut scanner = Scanner::new("x = $\n");
    let tokens = scanner.scan_all();
    assert_eq!(tokens[2].kind, Unknown);
    let diag = &scanner.diagnostics().diagnostics()[0];
    assert_eq!(diag.code, 1001);
    assert!(diag.message_text.contains('$'));
}

#[test]
fn test_unmatched_closing_bracket() {
    let mut scanner = Scanner::new("x)\n");
    scanner.scan_all();
    assert_eq!(scanner.diagnostics().diagnostics()[0].code, 1006);
}

#[test]
fn test_end_of_file_repeats() {
    let mut scanner = Scanner::new("x");
    scanner.scan_all();
    assert_eq!(scanner.scan(), EndOfFileToken);
    assert_eq!(scanner.scan(), EndOfFileToken);
}

#[test]
fn test_token_positions() {
    let mut scanner = Scanner::new("ab = 'cd'");
    let tokens = scanner.scan_all();
    assert_eq!((tokens[0].pos, tokens[0].end), (0, 2));
    assert_eq!((tokens[1].pos, tokens[1].end), (3, 4));
    assert_eq!((tokens[2].pos, tokens[2].end), (5, 9));
}

#[test]
fn test_token_listing() {
    let source = "x = 'hi'\n";
    let mut scanner = Scanner::new(source);
    let tokens = scanner.scan_all();
    let line_map = LineMap::new(source);
    let listing = TokenListing::new(&tokens, &line_map).to_string();
    let lines: Vec<_> = listing.lines().collect();
    assert!(lines[0].starts_with("Index"));
    assert!(lines[2].contains("IDENTIFIER") && lines[2].contains("1:1"));
    assert!(lines[3].contains("OPERATOR") && lines[3].contains("1:3"));
    assert!(lines[4].contains("STRING") && lines[4].contains("\"hi\""));
    assert!(lines[5].contains("NEWLINE"));
    assert!(lines[6].contains("EOF"));
}
