//! pysmoke_scanner: Tokenizer for the Python subset.
//!
//! Produces tokens from source text, synthesizing the layout tokens
//! (`NewLineToken`, `IndentToken`, `DedentToken`) that carry Python's
//! block structure, with support for:
//! - integer (decimal, hex, octal, binary) and float literals
//! - single, double and triple quoted strings with escapes
//! - implicit line joining inside brackets and `\` continuations
//! - Unicode identifiers

mod char_codes;
mod scanner;
mod token;

pub use scanner::{Scanner, ScannerState};
pub use token::{TokenInfo, TokenListing};
