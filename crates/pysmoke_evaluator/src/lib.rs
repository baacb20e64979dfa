//! pysmoke_evaluator: Tree-walking interpreter for the Python subset.
//!
//! Executes a parsed `Module` directly from the arena AST. Values are
//! reference counted; output goes to any `std::io::Write` sink.

mod builtins;
mod environment;
mod error;
mod interpreter;
mod ops;
mod value;

pub use builtins::Builtin;
pub use error::RuntimeError;
pub use interpreter::{Interpreter, DEFAULT_MAX_RECURSION_DEPTH};
pub use value::{format_float, BoundMethod, Class, Function, Instance, RangeValue, Value};
