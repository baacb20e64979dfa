//! Scope management for the binder.

use indexmap::IndexMap;
use pysmoke_ast::types::{ScopeId, SymbolId};
use pysmoke_core::intern::InternedString;
use rustc_hash::FxBuildHasher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    Function,
    Class,
}

/// A scope in the binding phase. Scopes form a chain from inner to outer
/// through `parent`; the module scope is the root at level 0.
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    /// The function or class that opened the scope, `<module>` for the root.
    pub name: String,
    pub level: u32,
    pub parent: Option<ScopeId>,
    /// The symbols declared in this scope, in declaration order.
    pub locals: IndexMap<InternedString, SymbolId, FxBuildHasher>,
}

impl Scope {
    pub fn new(id: ScopeId, kind: ScopeKind, name: &str, parent: Option<&Scope>) -> Self {
        Self {
            id,
            kind,
            name: name.to_string(),
            level: parent.map_or(0, |p| p.level + 1),
            parent: parent.map(|p| p.id),
            locals: IndexMap::default(),
        }
    }

    pub fn get(&self, name: InternedString) -> Option<SymbolId> {
        self.locals.get(&name).copied()
    }
}
