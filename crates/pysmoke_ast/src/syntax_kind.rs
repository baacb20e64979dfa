//! SyntaxKind enum - all token and node kinds of the Python subset.

/// The kind of a syntax token or node in the AST.
///
/// Ranges are contiguous so that `is_keyword` and friends are simple
/// integer comparisons; keep new variants inside their group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    Unknown = 0,
    EndOfFileToken,

    // Layout
    NewLineToken,
    IndentToken,
    DedentToken,

    // Literals
    NumericLiteral,
    StringLiteral,

    // Punctuation
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    OpenBraceToken,
    CloseBraceToken,
    CommaToken,
    ColonToken,
    DotToken,
    SemicolonToken,
    MinusGreaterThanToken,
    AtToken,

    // Operators
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

    // Assignment
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    SlashEqualsToken,
    SlashSlashEqualsToken,
    PercentEqualsToken,
    AsteriskAsteriskEqualsToken,

    // Identifiers
    Identifier,

    // ========================================================================
    // Keywords
    // ========================================================================
    FalseKeyword,
    NoneKeyword,
    TrueKeyword,
    AndKeyword,
    AsKeyword,
    AssertKeyword,
    AsyncKeyword,
    AwaitKeyword,
    BreakKeyword,
    ClassKeyword,
    ContinueKeyword,
    DefKeyword,
    DelKeyword,
    ElifKeyword,
    ElseKeyword,
    ExceptKeyword,
    FinallyKeyword,
    ForKeyword,
    FromKeyword,
    GlobalKeyword,
    IfKeyword,
    ImportKeyword,
    InKeyword,
    IsKeyword,
    LambdaKeyword,
    NonlocalKeyword,
    NotKeyword,
    OrKeyword,
    PassKeyword,
    RaiseKeyword,
    ReturnKeyword,
    TryKeyword,
    WhileKeyword,
    WithKeyword,
    YieldKeyword,

    // ========================================================================
    // Nodes
    // ========================================================================
    Module,

    // Statements
    FunctionDef,
    Parameter,
    ClassDef,
    ReturnStatement,
    IfStatement,
    WhileStatement,
    ForStatement,
    AssignStatement,
    AugAssignStatement,
    ExpressionStatement,
    PassStatement,
    BreakStatement,
    ContinueStatement,
    MissingStatement,

    // Expressions
    BinaryExpression,
    UnaryExpression,
    CompareExpression,
    CallExpression,
    Argument,
    AttributeExpression,
    SubscriptExpression,
    ListExpression,
    MissingExpression,
}

/// Python keywords in source spelling, paired with their kind.
const KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("False", SyntaxKind::FalseKeyword),
    ("None", SyntaxKind::NoneKeyword),
    ("True", SyntaxKind::TrueKeyword),
    ("and", SyntaxKind::AndKeyword),
    ("as", SyntaxKind::AsKeyword),
    ("assert", SyntaxKind::AssertKeyword),
    ("async", SyntaxKind::AsyncKeyword),
    ("await", SyntaxKind::AwaitKeyword),
    ("break", SyntaxKind::BreakKeyword),
    ("class", SyntaxKind::ClassKeyword),
    ("continue", SyntaxKind::ContinueKeyword),
    ("def", SyntaxKind::DefKeyword),
    ("del", SyntaxKind::DelKeyword),
    ("elif", SyntaxKind::ElifKeyword),
    ("else", SyntaxKind::ElseKeyword),
    ("except", SyntaxKind::ExceptKeyword),
    ("finally", SyntaxKind::FinallyKeyword),
    ("for", SyntaxKind::ForKeyword),
    ("from", SyntaxKind::FromKeyword),
    ("global", SyntaxKind::GlobalKeyword),
    ("if", SyntaxKind::IfKeyword),
    ("import", SyntaxKind::ImportKeyword),
    ("in", SyntaxKind::InKeyword),
    ("is", SyntaxKind::IsKeyword),
    ("lambda", SyntaxKind::LambdaKeyword),
    ("nonlocal", SyntaxKind::NonlocalKeyword),
    ("not", SyntaxKind::NotKeyword),
    ("or", SyntaxKind::OrKeyword),
    ("pass", SyntaxKind::PassKeyword),
    ("raise", SyntaxKind::RaiseKeyword),
    ("return", SyntaxKind::ReturnKeyword),
    ("try", SyntaxKind::TryKeyword),
    ("while", SyntaxKind::WhileKeyword),
    ("with", SyntaxKind::WithKeyword),
    ("yield", SyntaxKind::YieldKeyword),
];

impl SyntaxKind {
    /// Map identifier text to its keyword kind, if it is a keyword.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        KEYWORDS
            .iter()
            .find(|(spelling, _)| *spelling == text)
            .map(|(_, kind)| *kind)
    }

    pub fn is_keyword(self) -> bool {
        let v = self as u16;
        v >= SyntaxKind::FalseKeyword as u16 && v <= SyntaxKind::YieldKeyword as u16
    }

    pub fn is_punctuation(self) -> bool {
        let v = self as u16;
        v >= SyntaxKind::OpenParenToken as u16 && v <= SyntaxKind::AsteriskAsteriskEqualsToken as u16
    }

    pub fn is_layout(self) -> bool {
        matches!(
            self,
            SyntaxKind::NewLineToken | SyntaxKind::IndentToken | SyntaxKind::DedentToken
        )
    }

    pub fn is_token(self) -> bool {
        (self as u16) < SyntaxKind::Module as u16
    }

    /// Whether this kind is `=` or an augmented assignment.
    pub fn is_assignment_operator(self) -> bool {
        let v = self as u16;
        v >= SyntaxKind::EqualsToken as u16 && v <= SyntaxKind::AsteriskAsteriskEqualsToken as u16
    }

    /// The binary operator an augmented assignment applies (`+=` -> `+`).
    pub fn augmented_operator(self) -> Option<SyntaxKind> {
        match self {
            SyntaxKind::PlusEqualsToken => Some(SyntaxKind::PlusToken),
            SyntaxKind::MinusEqualsToken => Some(SyntaxKind::MinusToken),
            SyntaxKind::AsteriskEqualsToken => Some(SyntaxKind::AsteriskToken),
            SyntaxKind::SlashEqualsToken => Some(SyntaxKind::SlashToken),
            SyntaxKind::SlashSlashEqualsToken => Some(SyntaxKind::SlashSlashToken),
            SyntaxKind::PercentEqualsToken => Some(SyntaxKind::PercentToken),
            SyntaxKind::AsteriskAsteriskEqualsToken => Some(SyntaxKind::AsteriskAsteriskToken),
            _ => None,
        }
    }

    /// Whether this token kind starts a comparison operator.
    pub fn is_comparison_operator(self) -> bool {
        matches!(
            self,
            SyntaxKind::LessThanToken
                | SyntaxKind::GreaterThanToken
                | SyntaxKind::LessThanEqualsToken
                | SyntaxKind::GreaterThanEqualsToken
                | SyntaxKind::EqualsEqualsToken
                | SyntaxKind::ExclamationEqualsToken
                | SyntaxKind::InKeyword
                | SyntaxKind::IsKeyword
                | SyntaxKind::NotKeyword
        )
    }

    pub fn keyword_text(self) -> Option<&'static str> {
        KEYWORDS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(spelling, _)| *spelling)
    }

    pub fn punctuation_text(self) -> Option<&'static str> {
        let text = match self {
            SyntaxKind::OpenParenToken => "(",
            SyntaxKind::CloseParenToken => ")",
            SyntaxKind::OpenBracketToken => "[",
            SyntaxKind::CloseBracketToken => "]",
            SyntaxKind::OpenBraceToken => "{",
            SyntaxKind::CloseBraceToken => "}",
            SyntaxKind::CommaToken => ",",
            SyntaxKind::ColonToken => ":",
            SyntaxKind::DotToken => ".",
            SyntaxKind::SemicolonToken => ";",
            SyntaxKind::MinusGreaterThanToken => "->",
            SyntaxKind::AtToken => "@",
            SyntaxKind::PlusToken => "+",
            SyntaxKind::MinusToken => "-",
            SyntaxKind::AsteriskToken => "*",
            SyntaxKind::AsteriskAsteriskToken => "**",
            SyntaxKind::SlashToken => "/",
            SyntaxKind::SlashSlashToken => "//",
            SyntaxKind::PercentToken => "%",
            SyntaxKind::LessThanToken => "<",
            SyntaxKind::GreaterThanToken => ">",
            SyntaxKind::LessThanEqualsToken => "<=",
            SyntaxKind::GreaterThanEqualsToken => ">=",
            SyntaxKind::EqualsEqualsToken => "==",
            SyntaxKind::ExclamationEqualsToken => "!=",
            SyntaxKind::AmpersandToken => "&",
            SyntaxKind::BarToken => "|",
            SyntaxKind::CaretToken => "^",
            SyntaxKind::TildeToken => "~",
            SyntaxKind::LessThanLessThanToken => "<<",
            SyntaxKind::GreaterThanGreaterThanToken => ">>",
            SyntaxKind::EqualsToken => "=",
            SyntaxKind::PlusEqualsToken => "+=",
            SyntaxKind::MinusEqualsToken => "-=",
            SyntaxKind::AsteriskEqualsToken => "*=",
            SyntaxKind::SlashEqualsToken => "/=",
            SyntaxKind::SlashSlashEqualsToken => "//=",
            SyntaxKind::PercentEqualsToken => "%=",
            SyntaxKind::AsteriskAsteriskEqualsToken => "**=",
            _ => return None,
        };
        Some(text)
    }

    /// Source spelling of a fixed-text token, or a descriptive name otherwise.
    pub fn display_text(self) -> &'static str {
        if let Some(text) = self.punctuation_text().or_else(|| self.keyword_text()) {
            return text;
        }
        match self {
            SyntaxKind::EndOfFileToken => "end of file",
            SyntaxKind::NewLineToken => "newline",
            SyntaxKind::IndentToken => "indent",
            SyntaxKind::DedentToken => "dedent",
            SyntaxKind::NumericLiteral => "number",
            SyntaxKind::StringLiteral => "string",
            SyntaxKind::Identifier => "identifier",
            _ => "token",
        }
    }

    /// Token class used by the token listing (mirrors the classic lexer's
    /// KEYWORD / IDENTIFIER / NUMBER / STRING / OPERATOR / layout columns).
    pub fn token_class(self) -> &'static str {
        match self {
            k if k.is_keyword() => "KEYWORD",
            k if k.is_punctuation() => "OPERATOR",
            SyntaxKind::Identifier => "IDENTIFIER",
            SyntaxKind::NumericLiteral => "NUMBER",
            SyntaxKind::StringLiteral => "STRING",
            SyntaxKind::NewLineToken => "NEWLINE",
            SyntaxKind::IndentToken => "INDENT",
            SyntaxKind::DedentToken => "DEDENT",
            SyntaxKind::EndOfFileToken => "EOF",
            _ => "ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup_round_trips() {
        for (spelling, kind) in KEYWORDS {
            assert!(kind.is_keyword(), "{spelling}");
            assert_eq!(SyntaxKind::from_keyword(spelling), Some(*kind));
            assert_eq!(kind.keyword_text(), Some(*spelling));
        }
        assert_eq!(SyntaxKind::from_keyword("self"), None);
        assert_eq!(SyntaxKind::from_keyword("print"), None);
    }

    #[test]
    fn test_group_predicates() {
        assert!(SyntaxKind::PlusEqualsToken.is_assignment_operator());
        assert!(SyntaxKind::EqualsToken.is_assignment_operator());
        assert!(!SyntaxKind::EqualsEqualsToken.is_assignment_operator());
        assert!(SyntaxKind::SlashSlashToken.is_punctuation());
        assert!(!SyntaxKind::Identifier.is_punctuation());
        assert!(SyntaxKind::DedentToken.is_layout());
        assert!(SyntaxKind::YieldKeyword.is_token());
        assert!(!SyntaxKind::FunctionDef.is_token());
    }

    #[test]
    fn test_augmented_operator() {
        assert_eq!(SyntaxKind::PlusEqualsToken.augmented_operator(), Some(SyntaxKind::PlusToken));
        assert_eq!(SyntaxKind::EqualsToken.augmented_operator(), None);
    }
}
