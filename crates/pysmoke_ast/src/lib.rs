//! pysmoke_ast: Abstract Syntax Tree definitions for the Python subset.
//!
//! Defines the SyntaxKind enum, arena-allocated node types, flag types and
//! a visitor for walking the tree.

pub mod generated;
pub mod node;
pub mod syntax_kind;
pub mod types;
pub mod visitor;

// Re-export key types
pub use node::*;
pub use syntax_kind::SyntaxKind;
pub use types::*;
