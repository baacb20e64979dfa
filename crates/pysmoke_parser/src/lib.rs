//! pysmoke_parser: Recursive descent parser for the Python subset.
//!
//! Parses token streams from the scanner into an arena-allocated AST.

mod parser;
mod precedence;
mod utilities;

pub use parser::{Parser, DEFAULT_MAX_PARSE_DEPTH};
