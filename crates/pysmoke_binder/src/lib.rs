//! pysmoke_binder: Symbol table construction and scope analysis.
//!
//! The binder walks the AST, declares a symbol for every function, class,
//! parameter, variable and `self` attribute, infers a coarse data type for
//! each, and reports names that resolve nowhere.

mod binder;
mod scope;
mod symbol;

pub use binder::{Binder, BUILTIN_NAMES};
pub use scope::{Scope, ScopeKind};
pub use symbol::{DataType, Symbol, SymbolKind, SymbolTable};
