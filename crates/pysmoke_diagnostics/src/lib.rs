//! pysmoke_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Scanner, parser and binder problems are accumulated as diagnostics rather
//! than aborting, so one pass reports every problem it can find.

use pysmoke_core::text::TextSpan;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Warning => write!(f, "warning"),
            DiagnosticCategory::Error => write!(f, "error"),
            DiagnosticCategory::Message => write!(f, "message"),
        }
    }
}

/// A diagnostic message template with a code and category.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    /// The message template string. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with location information and resolved message text.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub file: Option<String>,
    pub span: Option<TextSpan>,
    pub message_text: String,
    pub code: u32,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Create a new diagnostic without location info.
    pub fn new(message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            file: None,
            span: None,
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    /// Create a new diagnostic with file and span info.
    pub fn with_location(
        file: &str,
        span: TextSpan,
        message: &DiagnosticMessage,
        args: &[&str],
    ) -> Self {
        Self {
            file: Some(file.to_string()),
            span: Some(span),
            message_text: format_message(message.message, args),
            code: message.code,
            category: message.category,
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    /// The `PY1234` style code.
    pub fn code_text(&self) -> String {
        format!("PY{}", self.code)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref file) = self.file {
            write!(f, "{}", file)?;
            if let Some(span) = self.span {
                write!(f, "({})", span.start)?;
            }
            write!(f, ": ")?;
        }
        write!(f, "{} {}: {}", self.category, self.code_text(), self.message_text)
    }
}

/// Format a diagnostic message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// A collection of diagnostics accumulated during a phase.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Sort diagnostics by file and position.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            let file_cmp = a.file.cmp(&b.file);
            if file_cmp != std::cmp::Ordering::Equal {
                return file_cmp;
            }
            let a_pos = a.span.map(|s| s.start).unwrap_or(0);
            let b_pos = b.span.map(|s| s.start).unwrap_or(0);
            a_pos.cmp(&b_pos)
        });
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, Error, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Error, message: $msg }
        };
        ($code:expr, Warning, $msg:expr) => {
            DiagnosticMessage { code: $code, category: DiagnosticCategory::Warning, message: $msg }
        };
    }

    // ========================================================================
    // Scanner errors (1000-1099)
    // ========================================================================
    pub const INVALID_CHARACTER: DiagnosticMessage = diag!(1001, Error, "Invalid character '{0}'.");
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1002, Error, "Unterminated string literal.");
    pub const UNINDENT_DOES_NOT_MATCH: DiagnosticMessage = diag!(1003, Error, "Unindent does not match any outer indentation level.");
    pub const UNEXPECTED_LINE_CONTINUATION: DiagnosticMessage = diag!(1004, Error, "Unexpected character after line continuation character.");
    pub const INVALID_NUMERIC_LITERAL: DiagnosticMessage = diag!(1005, Error, "Invalid numeric literal '{0}'.");
    pub const UNMATCHED_CLOSING_BRACKET: DiagnosticMessage = diag!(1006, Error, "Unmatched '{0}'.");
    pub const LEADING_ZEROS_IN_DECIMAL_LITERAL: DiagnosticMessage = diag!(1007, Error, "Leading zeros in decimal integer literal '{0}' are not permitted.");

    // ========================================================================
    // Parser errors (1100-1199)
    // ========================================================================
    pub const _0_EXPECTED: DiagnosticMessage = diag!(1100, Error, "'{0}' expected.");
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage = diag!(1101, Error, "Identifier expected.");
    pub const EXPRESSION_EXPECTED: DiagnosticMessage = diag!(1102, Error, "Expression expected.");
    pub const EXPECTED_AN_INDENTED_BLOCK: DiagnosticMessage = diag!(1103, Error, "Expected an indented block.");
    pub const UNEXPECTED_INDENT: DiagnosticMessage = diag!(1104, Error, "Unexpected indent.");
    pub const INVALID_ASSIGNMENT_TARGET: DiagnosticMessage = diag!(1105, Error, "Cannot assign to {0}.");
    pub const UNSUPPORTED_STATEMENT: DiagnosticMessage = diag!(1106, Error, "'{0}' statements are not supported.");
    pub const UNEXPECTED_TOKEN: DiagnosticMessage = diag!(1107, Error, "Unexpected token '{0}'.");
    pub const MAXIMUM_NESTING_DEPTH_EXCEEDED: DiagnosticMessage = diag!(1108, Error, "Maximum nesting depth exceeded.");
    pub const POSITIONAL_ARGUMENT_FOLLOWS_KEYWORD: DiagnosticMessage = diag!(1109, Error, "Positional argument follows keyword argument.");
    pub const NON_DEFAULT_PARAMETER_FOLLOWS_DEFAULT: DiagnosticMessage = diag!(1110, Error, "Non-default parameter follows default parameter.");
    pub const _0_OUTSIDE_FUNCTION: DiagnosticMessage = diag!(1111, Error, "'{0}' outside function.");
    pub const _0_OUTSIDE_LOOP: DiagnosticMessage = diag!(1112, Error, "'{0}' not properly in loop.");
    pub const INTEGER_LITERAL_TOO_LARGE: DiagnosticMessage = diag!(1113, Error, "Integer literal '{0}' does not fit in 64 bits.");

    // ========================================================================
    // Binder diagnostics (2000-2099)
    // ========================================================================
    pub const DUPLICATE_PARAMETER: DiagnosticMessage = diag!(2001, Error, "Duplicate argument '{0}' in function definition.");
    pub const CANNOT_FIND_NAME: DiagnosticMessage = diag!(2002, Warning, "Cannot find name '{0}'.");
    pub const SELF_EXPECTED_AS_FIRST_PARAMETER: DiagnosticMessage = diag!(2003, Warning, "Method '{0}' does not take 'self' as its first parameter.");
}
