//! The scanner.
//!
//! Converts source text into a stream of tokens that the parser consumes
//! one `scan()` at a time. Besides ordinary tokens it tracks indentation and
//! bracket nesting so that logical lines end in `NewLineToken` and blocks
//! open and close with `IndentToken` / `DedentToken`.

use crate::char_codes::*;
use crate::token::TokenInfo;
use pysmoke_ast::syntax_kind::SyntaxKind;
use pysmoke_ast::types::TokenFlags;
use pysmoke_core::text::TextSpan;
use pysmoke_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};

/// Saved scanner state for lookahead.
pub struct ScannerState {
    pos: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
    indent_stack: Vec<u32>,
    pending_dedents: u32,
    bracket_depth: u32,
    at_line_start: bool,
    line_open: bool,
    diagnostic_count: usize,
}

pub struct Scanner {
    /// The source text being scanned.
    text: String,
    /// File name attached to diagnostics.
    file_name: String,
    /// Current byte position in the text.
    pos: usize,
    /// Start of the current token (after leading trivia).
    token_start: usize,
    token: SyntaxKind,
    /// Identifier name, cooked string value or literal digits.
    token_value: String,
    token_flags: TokenFlags,
    /// Widths of the open blocks; the bottom entry is always 0.
    indent_stack: Vec<u32>,
    /// Dedents still owed from a single indentation drop.
    pending_dedents: u32,
    /// Open `(`, `[` and `{` count; newlines are trivia while positive.
    bracket_depth: u32,
    /// The next token is the first of a physical line.
    at_line_start: bool,
    /// A logical line has produced tokens and not yet been terminated.
    line_open: bool,
    diagnostics: DiagnosticCollection,
}

impl Scanner {
    pub fn new(text: &str) -> Self {
        Self::with_file_name(text, "<input>")
    }

    pub fn with_file_name(text: &str, file_name: &str) -> Self {
        Self {
            text: text.to_string(),
            file_name: file_name.to_string(),
            pos: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: TokenFlags::NONE,
            indent_stack: vec![0],
            pending_dedents: 0,
            bracket_depth: 0,
            at_line_start: true,
            line_open: false,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    pub fn text_len(&self) -> usize {
        self.text.len()
    }

    /// Look ahead: save state, call f, restore state and return result.
    pub fn look_ahead<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let state = self.save_state();
        let result = f(self);
        self.restore_state(state);
        result
    }

    #[inline]
    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    #[inline]
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    #[inline]
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Get the current position (end of current token).
    #[inline]
    pub fn token_end(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn token_flags(&self) -> TokenFlags {
        self.token_flags
    }

    pub fn diagnostics(&self) -> &DiagnosticCollection {
        &self.diagnostics
    }

    /// Take the accumulated diagnostics, leaving an empty collection.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn token_info(&self) -> TokenInfo {
        TokenInfo {
            kind: self.token,
            pos: self.token_start as u32,
            end: self.pos as u32,
            text: self.token_value.clone(),
            flags: self.token_flags,
        }
    }

    pub fn save_state(&self) -> ScannerState {
        ScannerState {
            pos: self.pos,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            indent_stack: self.indent_stack.clone(),
            pending_dedents: self.pending_dedents,
            bracket_depth: self.bracket_depth,
            at_line_start: self.at_line_start,
            line_open: self.line_open,
            diagnostic_count: self.diagnostics.len(),
        }
    }

    /// Restore a saved state. Diagnostics reported since the save are dropped
    /// so speculative scanning never reports twice.
    pub fn restore_state(&mut self, state: ScannerState) {
        self.pos = state.pos;
        self.token_start = state.token_start;
        self.token = state.token;
        self.token_value = state.token_value;
        self.token_flags = state.token_flags;
        self.indent_stack = state.indent_stack;
        self.pending_dedents = state.pending_dedents;
        self.bracket_depth = state.bracket_depth;
        self.at_line_start = state.at_line_start;
        self.line_open = state.line_open;
        if self.diagnostics.len() > state.diagnostic_count {
            let mut kept = DiagnosticCollection::new();
            for diag in self.diagnostics.diagnostics().iter().take(state.diagnostic_count) {
                kept.add(diag.clone());
            }
            self.diagnostics = kept;
        }
    }

    /// Scan the whole input, returning every token including the final
    /// `EndOfFileToken`.
    pub fn scan_all(&mut self) -> Vec<TokenInfo> {
        let mut tokens = Vec::new();
        loop {
            let kind = self.scan();
            tokens.push(self.token_info());
            if kind == SyntaxKind::EndOfFileToken {
                return tokens;
            }
        }
    }

    // ========================================================================
    // Character access
    // ========================================================================

    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    /// Look at the character `offset` characters past the current one.
    #[inline]
    fn char_at(&self, offset: usize) -> Option<char> {
        self.text[self.pos..].chars().nth(offset)
    }

    #[inline]
    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn error_at(&mut self, start: usize, end: usize, message: &DiagnosticMessage, args: &[&str]) {
        let span = TextSpan::from_bounds(start as u32, end as u32);
        self.diagnostics
            .add(Diagnostic::with_location(&self.file_name, span, message, args));
    }

    /// Consume `\n`, `\r\n` or `\r`. Returns false at end of input.
    fn consume_line_break(&mut self) -> bool {
        match self.current_char() {
            Some('\r') => {
                self.pos += 1;
                if self.current_char() == Some('\n') {
                    self.pos += 1;
                }
                true
            }
            Some('\n') => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.current_char() {
            if is_line_break(ch) {
                break;
            }
            self.advance();
        }
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    /// Scan the next token and return its kind.
    pub fn scan(&mut self) -> SyntaxKind {
        self.token_flags = TokenFlags::NONE;
        self.token_value.clear();
        self.token = self.scan_token();
        match self.token {
            SyntaxKind::NewLineToken => self.line_open = false,
            SyntaxKind::IndentToken | SyntaxKind::DedentToken | SyntaxKind::EndOfFileToken => {}
            _ => self.line_open = true,
        }
        self.token
    }

    fn scan_token(&mut self) -> SyntaxKind {
        if self.pending_dedents > 0 {
            self.pending_dedents -= 1;
            self.token_start = self.pos;
            return SyntaxKind::DedentToken;
        }

        if self.at_line_start && self.bracket_depth == 0 {
            self.at_line_start = false;
            if let Some(layout) = self.scan_indentation() {
                return layout;
            }
        }

        self.skip_trivia();
        self.token_start = self.pos;

        let Some(ch) = self.current_char() else {
            return self.scan_end_of_file();
        };

        match ch {
            '\n' | '\r' => {
                self.consume_line_break();
                self.at_line_start = true;
                SyntaxKind::NewLineToken
            }
            '(' => self.open_bracket(SyntaxKind::OpenParenToken),
            '[' => self.open_bracket(SyntaxKind::OpenBracketToken),
            '{' => self.open_bracket(SyntaxKind::OpenBraceToken),
            ')' => self.close_bracket(SyntaxKind::CloseParenToken, ")"),
            ']' => self.close_bracket(SyntaxKind::CloseBracketToken, "]"),
            '}' => self.close_bracket(SyntaxKind::CloseBraceToken, "}"),
            ',' => { self.pos += 1; SyntaxKind::CommaToken }
            ':' => { self.pos += 1; SyntaxKind::ColonToken }
            ';' => { self.pos += 1; SyntaxKind::SemicolonToken }
            '~' => { self.pos += 1; SyntaxKind::TildeToken }
            '@' => { self.pos += 1; SyntaxKind::AtToken }
            '.' => {
                if self.char_at(1).map_or(false, is_digit) {
                    self.scan_number()
                } else {
                    self.pos += 1;
                    SyntaxKind::DotToken
                }
            }
            '+' => self.scan_operator(SyntaxKind::PlusToken, Some(SyntaxKind::PlusEqualsToken)),
            '%' => self.scan_operator(SyntaxKind::PercentToken, Some(SyntaxKind::PercentEqualsToken)),
            '&' => self.scan_operator(SyntaxKind::AmpersandToken, None),
            '|' => self.scan_operator(SyntaxKind::BarToken, None),
            '^' => self.scan_operator(SyntaxKind::CaretToken, None),
            '-' => {
                if self.char_at(1) == Some('>') {
                    self.pos += 2;
                    SyntaxKind::MinusGreaterThanToken
                } else {
                    self.scan_operator(SyntaxKind::MinusToken, Some(SyntaxKind::MinusEqualsToken))
                }
            }
            '*' => self.scan_doubled(
                '*',
                SyntaxKind::AsteriskToken,
                SyntaxKind::AsteriskEqualsToken,
                SyntaxKind::AsteriskAsteriskToken,
                SyntaxKind::AsteriskAsteriskEqualsToken,
            ),
            '/' => self.scan_doubled(
                '/',
                SyntaxKind::SlashToken,
                SyntaxKind::SlashEqualsToken,
                SyntaxKind::SlashSlashToken,
                SyntaxKind::SlashSlashEqualsToken,
            ),
            '<' => {
                if self.char_at(1) == Some('<') {
                    self.pos += 2;
                    SyntaxKind::LessThanLessThanToken
                } else {
                    self.scan_operator(SyntaxKind::LessThanToken, Some(SyntaxKind::LessThanEqualsToken))
                }
            }
            '>' => {
                if self.char_at(1) == Some('>') {
                    self.pos += 2;
                    SyntaxKind::GreaterThanGreaterThanToken
                } else {
                    self.scan_operator(SyntaxKind::GreaterThanToken, Some(SyntaxKind::GreaterThanEqualsToken))
                }
            }
            '=' => self.scan_operator(SyntaxKind::EqualsToken, Some(SyntaxKind::EqualsEqualsToken)),
            '!' if self.char_at(1) == Some('=') => {
                self.pos += 2;
                SyntaxKind::ExclamationEqualsToken
            }
            '\'' | '"' => self.scan_string_literal(ch),
            '0'..='9' => self.scan_number(),
            _ if is_identifier_start(ch) => self.scan_identifier(),
            _ => {
                self.advance();
                let invalid = ch.to_string();
                self.error_at(self.token_start, self.pos, &messages::INVALID_CHARACTER, &[&invalid]);
                self.token_value = invalid;
                SyntaxKind::Unknown
            }
        }
    }

    /// Skip spaces, comments, `\` line continuations and, inside brackets,
    /// line breaks.
    fn skip_trivia(&mut self) {
        loop {
            match self.current_char() {
                Some(ch) if is_white_space_single_line(ch) => self.pos += 1,
                Some('#') => self.skip_comment(),
                Some('\\') => {
                    if self.char_at(1).map_or(false, is_line_break) {
                        self.pos += 1;
                        self.consume_line_break();
                    } else {
                        let start = self.pos;
                        self.pos += 1;
                        self.error_at(start, self.pos, &messages::UNEXPECTED_LINE_CONTINUATION, &[]);
                    }
                }
                Some(ch) if is_line_break(ch) && self.bracket_depth > 0 => {
                    self.consume_line_break();
                }
                _ => return,
            }
        }
    }

    /// Measure the indentation of the next non-blank line and compare it with
    /// the open blocks. Blank and comment-only lines are consumed whole.
    fn scan_indentation(&mut self) -> Option<SyntaxKind> {
        loop {
            let line_start = self.pos;
            let mut width = 0u32;
            while let Some(ch) = self.current_char() {
                match ch {
                    ' ' => width += 1,
                    '\t' => width = (width / TAB_WIDTH + 1) * TAB_WIDTH,
                    '\u{000C}' => width = 0,
                    _ => break,
                }
                self.pos += 1;
            }

            match self.current_char() {
                None => return None,
                Some('#') => {
                    self.skip_comment();
                    if !self.consume_line_break() {
                        return None;
                    }
                }
                Some(ch) if is_line_break(ch) => {
                    self.consume_line_break();
                }
                Some(_) => {
                    self.token_start = self.pos;
                    let current = self.current_indent();
                    if width > current {
                        self.indent_stack.push(width);
                        return Some(SyntaxKind::IndentToken);
                    }
                    if width < current {
                        let mut dedents = 0u32;
                        while width < self.current_indent() {
                            self.indent_stack.pop();
                            dedents += 1;
                        }
                        if width != self.current_indent() {
                            self.error_at(line_start, self.pos, &messages::UNINDENT_DOES_NOT_MATCH, &[]);
                            self.indent_stack.push(width);
                        }
                        self.pending_dedents = dedents - 1;
                        return Some(SyntaxKind::DedentToken);
                    }
                    return None;
                }
            }
        }
    }

    #[inline]
    fn current_indent(&self) -> u32 {
        self.indent_stack.last().copied().unwrap_or(0)
    }

    /// End of input: close the open line, then every open block.
    fn scan_end_of_file(&mut self) -> SyntaxKind {
        if self.line_open {
            self.at_line_start = true;
            return SyntaxKind::NewLineToken;
        }
        if self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            return SyntaxKind::DedentToken;
        }
        SyntaxKind::EndOfFileToken
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    fn open_bracket(&mut self, kind: SyntaxKind) -> SyntaxKind {
        self.pos += 1;
        self.bracket_depth += 1;
        kind
    }

    fn close_bracket(&mut self, kind: SyntaxKind, text: &str) -> SyntaxKind {
        self.pos += 1;
        if self.bracket_depth == 0 {
            self.error_at(self.token_start, self.pos, &messages::UNMATCHED_CLOSING_BRACKET, &[text]);
        } else {
            self.bracket_depth -= 1;
        }
        kind
    }

    /// `op` or, when followed by `=`, `op_equals`.
    fn scan_operator(&mut self, single: SyntaxKind, with_equals: Option<SyntaxKind>) -> SyntaxKind {
        match with_equals {
            Some(kind) if self.char_at(1) == Some('=') => {
                self.pos += 2;
                kind
            }
            _ => {
                self.pos += 1;
                single
            }
        }
    }

    /// Operators that also have a doubled form: `*`, `*=`, `**`, `**=`.
    fn scan_doubled(
        &mut self,
        ch: char,
        single: SyntaxKind,
        single_equals: SyntaxKind,
        double: SyntaxKind,
        double_equals: SyntaxKind,
    ) -> SyntaxKind {
        if self.char_at(1) == Some(ch) {
            if self.char_at(2) == Some('=') {
                self.pos += 3;
                double_equals
            } else {
                self.pos += 2;
                double
            }
        } else if self.char_at(1) == Some('=') {
            self.pos += 2;
            single_equals
        } else {
            self.pos += 1;
            single
        }
    }

    fn scan_identifier(&mut self) -> SyntaxKind {
        let start = self.pos;
        while let Some(ch) = self.current_char() {
            if !is_identifier_part(ch) {
                break;
            }
            self.advance();
        }
        self.token_value = self.text[start..self.pos].to_string();
        SyntaxKind::from_keyword(&self.token_value).unwrap_or(SyntaxKind::Identifier)
    }

    /// Consume digits of `radix`, allowing single `_` separators.
    fn scan_digits(&mut self, radix: u32, out: &mut String) -> bool {
        let mut any = false;
        while let Some(ch) = self.current_char() {
            if is_radix_digit(ch, radix) {
                out.push(ch);
                any = true;
                self.pos += 1;
            } else if ch == '_' && any && self.char_at(1).map_or(false, |c| is_radix_digit(c, radix)) {
                self.pos += 1;
            } else {
                break;
            }
        }
        any
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let mut value = String::new();

        if self.current_char() == Some('0') {
            let radix = match self.char_at(1) {
                Some('x') | Some('X') => 16,
                Some('o') | Some('O') => 8,
                Some('b') | Some('B') => 2,
                _ => 10,
            };
            if radix != 10 {
                self.pos += 2;
                value.push('0');
                value.push(match radix {
                    16 => 'x',
                    8 => 'o',
                    _ => 'b',
                });
                if !self.scan_digits(radix, &mut value) {
                    self.consume_identifier_tail();
                    let text = self.text[start..self.pos].to_string();
                    self.error_at(start, self.pos, &messages::INVALID_NUMERIC_LITERAL, &[&text]);
                }
                self.token_value = value;
                return SyntaxKind::NumericLiteral;
            }
        }

        self.scan_digits(10, &mut value);
        if self.current_char() == Some('.') {
            self.token_flags |= TokenFlags::FLOATING_POINT;
            value.push('.');
            self.pos += 1;
            self.scan_digits(10, &mut value);
        }
        if matches!(self.current_char(), Some('e') | Some('E')) {
            self.token_flags |= TokenFlags::FLOATING_POINT | TokenFlags::SCIENTIFIC;
            value.push('e');
            self.pos += 1;
            if let Some(sign @ ('+' | '-')) = self.current_char() {
                value.push(sign);
                self.pos += 1;
            }
            if !self.scan_digits(10, &mut value) {
                let text = self.text[start..self.pos].to_string();
                self.error_at(start, self.pos, &messages::INVALID_NUMERIC_LITERAL, &[&text]);
            }
        }
        if self.current_char().map_or(false, is_identifier_start) {
            self.consume_identifier_tail();
            let text = self.text[start..self.pos].to_string();
            self.error_at(start, self.pos, &messages::INVALID_NUMERIC_LITERAL, &[&text]);
        } else if !self.token_flags.contains(TokenFlags::FLOATING_POINT)
            && value.starts_with('0')
            && value.bytes().any(|b| b != b'0')
        {
            // `0`, `00` and `0_0` are fine; `012` is not.
            let text = self.text[start..self.pos].to_string();
            self.error_at(start, self.pos, &messages::LEADING_ZEROS_IN_DECIMAL_LITERAL, &[&text]);
        }
        self.token_value = value;
        SyntaxKind::NumericLiteral
    }

    fn consume_identifier_tail(&mut self) {
        while self.current_char().map_or(false, is_identifier_part) {
            self.advance();
        }
    }

    fn scan_string_literal(&mut self, quote: char) -> SyntaxKind {
        let triple = self.char_at(1) == Some(quote) && self.char_at(2) == Some(quote);
        if quote == '\'' {
            self.token_flags |= TokenFlags::SINGLE_QUOTE;
        }
        if triple {
            self.token_flags |= TokenFlags::TRIPLE_QUOTED;
            self.pos += 3;
        } else {
            self.pos += 1;
        }

        let mut result = String::new();
        loop {
            let Some(ch) = self.current_char() else {
                self.unterminated_string();
                break;
            };
            if ch == quote {
                if !triple {
                    self.pos += 1;
                    break;
                }
                if self.char_at(1) == Some(quote) && self.char_at(2) == Some(quote) {
                    self.pos += 3;
                    break;
                }
            }
            if is_line_break(ch) && !triple {
                self.unterminated_string();
                break;
            }
            if ch == '\\' {
                self.token_flags |= TokenFlags::CONTAINS_ESCAPE;
                self.pos += 1;
                self.scan_escape(&mut result);
                continue;
            }
            if ch == '\r' {
                // Normalize CRLF and lone CR inside triple-quoted strings.
                self.consume_line_break();
                result.push('\n');
                continue;
            }
            result.push(ch);
            self.advance();
        }
        self.token_value = result;
        SyntaxKind::StringLiteral
    }

    fn unterminated_string(&mut self) {
        self.token_flags |= TokenFlags::UNTERMINATED;
        self.error_at(self.token_start, self.pos, &messages::UNTERMINATED_STRING_LITERAL, &[]);
    }

    /// Cook one escape sequence; the backslash is already consumed.
    fn scan_escape(&mut self, out: &mut String) {
        let Some(ch) = self.current_char() else {
            out.push('\\');
            return;
        };
        match ch {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            '\n' | '\r' => {
                // Backslash-newline joins the lines.
                self.consume_line_break();
                return;
            }
            other => {
                out.push('\\');
                out.push(other);
            }
        }
        self.advance();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restore_state_drops_speculative_diagnostics() {
        let mut scanner = Scanner::new("x $ y");
        scanner.scan();
        let state = scanner.save_state();
        scanner.scan();
        assert_eq!(scanner.diagnostics().len(), 1);
        scanner.restore_state(state);
        assert!(scanner.diagnostics().is_empty());
        assert_eq!(scanner.token(), SyntaxKind::Identifier);
        assert_eq!(scanner.token_value(), "x");
    }

    #[test]
    fn test_look_ahead_restores_layout() {
        let mut scanner = Scanner::new("if x:\n    y\n");
        for _ in 0..4 {
            scanner.scan();
        }
        assert_eq!(scanner.token(), SyntaxKind::NewLineToken);
        let next = scanner.look_ahead(|s| s.scan());
        assert_eq!(next, SyntaxKind::IndentToken);
        assert_eq!(scanner.scan(), SyntaxKind::IndentToken);
    }
}
