//! Token information produced by the scanner.

use pysmoke_ast::syntax_kind::SyntaxKind;
use pysmoke_ast::types::TokenFlags;
use pysmoke_core::text::LineMap;
use std::fmt;

/// Information about a scanned token.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub kind: SyntaxKind,
    /// Start position in the source text.
    pub pos: u32,
    /// End position in the source text (exclusive).
    pub end: u32,
    /// The text of the token (identifier name, cooked string value, digits).
    pub text: String,
    pub flags: TokenFlags,
}

impl TokenInfo {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            kind,
            pos,
            end,
            text: String::new(),
            flags: TokenFlags::NONE,
        }
    }

    pub fn with_text(mut self, text: String) -> Self {
        self.text = text;
        self
    }

    pub fn len(&self) -> u32 {
        self.end - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    /// The value column of the token listing.
    pub fn display_value(&self) -> String {
        match self.kind {
            SyntaxKind::StringLiteral => format!("{:?}", self.text),
            SyntaxKind::Identifier | SyntaxKind::NumericLiteral => self.text.clone(),
            kind => kind.display_text().to_string(),
        }
    }
}

/// Tabular rendering of a token stream:
///
/// ```text
/// Index  | Type       | Value                | Line:Col
/// ```
pub struct TokenListing<'t> {
    pub tokens: &'t [TokenInfo],
    pub line_map: &'t LineMap,
}

impl<'t> TokenListing<'t> {
    pub fn new(tokens: &'t [TokenInfo], line_map: &'t LineMap) -> Self {
        Self { tokens, line_map }
    }
}

impl fmt::Display for TokenListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<6} | {:<10} | {:<20} | Line:Col", "Index", "Type", "Value")?;
        writeln!(f, "{}", "-".repeat(52))?;
        for (index, token) in self.tokens.iter().enumerate() {
            let location = self.line_map.line_and_column_of(token.pos);
            writeln!(
                f,
                "{:<6} | {:<10} | {:<20} | {}",
                index,
                token.kind.token_class(),
                token.display_value(),
                location
            )?;
        }
        Ok(())
    }
}
