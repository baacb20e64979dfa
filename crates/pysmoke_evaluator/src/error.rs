//! Runtime errors raised while evaluating a module.

use pysmoke_core::text::TextSpan;
use thiserror::Error;

/// An exception that escaped to the top level. Every variant except
/// `Output` carries the span of the node that raised it.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("NameError: {message}")]
    NameError { message: String, span: TextSpan },

    #[error("TypeError: {message}")]
    TypeError { message: String, span: TextSpan },

    #[error("AttributeError: {message}")]
    AttributeError { message: String, span: TextSpan },

    #[error("ZeroDivisionError: {message}")]
    ZeroDivisionError { message: String, span: TextSpan },

    #[error("IndexError: {message}")]
    IndexError { message: String, span: TextSpan },

    #[error("ValueError: {message}")]
    ValueError { message: String, span: TextSpan },

    #[error("OverflowError: {message}")]
    OverflowError { message: String, span: TextSpan },

    #[error("RecursionError: {message}")]
    RecursionError { message: String, span: TextSpan },

    #[error("failed to write program output: {0}")]
    Output(#[from] std::io::Error),
}

impl RuntimeError {
    pub fn name_error(span: TextSpan, message: impl Into<String>) -> Self {
        Self::NameError { message: message.into(), span }
    }

    pub fn type_error(span: TextSpan, message: impl Into<String>) -> Self {
        Self::TypeError { message: message.into(), span }
    }

    pub fn attribute_error(span: TextSpan, message: impl Into<String>) -> Self {
        Self::AttributeError { message: message.into(), span }
    }

    pub fn zero_division(span: TextSpan, message: impl Into<String>) -> Self {
        Self::ZeroDivisionError { message: message.into(), span }
    }

    pub fn index_error(span: TextSpan, message: impl Into<String>) -> Self {
        Self::IndexError { message: message.into(), span }
    }

    pub fn value_error(span: TextSpan, message: impl Into<String>) -> Self {
        Self::ValueError { message: message.into(), span }
    }

    pub fn overflow(span: TextSpan, message: impl Into<String>) -> Self {
        Self::OverflowError { message: message.into(), span }
    }

    pub fn recursion(span: TextSpan) -> Self {
        Self::RecursionError {
            message: "maximum recursion depth exceeded".to_string(),
            span,
        }
    }

    /// The Python exception name, e.g. `TypeError`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NameError { .. } => "NameError",
            Self::TypeError { .. } => "TypeError",
            Self::AttributeError { .. } => "AttributeError",
            Self::ZeroDivisionError { .. } => "ZeroDivisionError",
            Self::IndexError { .. } => "IndexError",
            Self::ValueError { .. } => "ValueError",
            Self::OverflowError { .. } => "OverflowError",
            Self::RecursionError { .. } => "RecursionError",
            Self::Output(_) => "OSError",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::NameError { message, .. }
            | Self::TypeError { message, .. }
            | Self::AttributeError { message, .. }
            | Self::ZeroDivisionError { message, .. }
            | Self::IndexError { message, .. }
            | Self::ValueError { message, .. }
            | Self::OverflowError { message, .. }
            | Self::RecursionError { message, .. } => message.clone(),
            Self::Output(err) => err.to_string(),
        }
    }

    pub fn span(&self) -> Option<TextSpan> {
        match self {
            Self::NameError { span, .. }
            | Self::TypeError { span, .. }
            | Self::AttributeError { span, .. }
            | Self::ZeroDivisionError { span, .. }
            | Self::IndexError { span, .. }
            | Self::ValueError { span, .. }
            | Self::OverflowError { span, .. }
            | Self::RecursionError { span, .. } => Some(*span),
            Self::Output(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_python_exception_name() {
        let err = RuntimeError::zero_division(TextSpan::new(4, 5), "division by zero");
        assert_eq!(err.to_string(), "ZeroDivisionError: division by zero");
        assert_eq!(err.kind(), "ZeroDivisionError");
        assert_eq!(err.span(), Some(TextSpan::new(4, 5)));
    }

    #[test]
    fn test_output_error_has_no_span() {
        let err = RuntimeError::from(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"));
        assert!(err.span().is_none());
        assert_eq!(err.message(), "closed");
    }
}
