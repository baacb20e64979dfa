//! pysmoke_core: Core utilities shared by every pysmoke phase.
//!
//! Provides string interning and text spans used throughout the scanner,
//! parser, binder and evaluator.

pub mod intern;
pub mod text;

// Re-export commonly used types
pub use intern::{InternedString, StringInterner};
pub use text::{LineAndColumn, LineMap, TextRange, TextSpan};
