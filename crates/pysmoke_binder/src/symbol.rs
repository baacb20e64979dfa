//! Symbol and symbol table definitions.

use crate::scope::{Scope, ScopeKind};
use pysmoke_ast::types::{ScopeId, SymbolFlags, SymbolId};
use pysmoke_core::intern::InternedString;
use std::fmt;

/// What kind of entity a symbol names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Class,
    Parameter,
    /// A function defined directly in a class body.
    Method,
    /// An instance attribute assigned through `self.name = ...`.
    Attribute,
}

impl SymbolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SymbolKind::Variable => "Variable",
            SymbolKind::Function => "Function",
            SymbolKind::Class => "Class",
            SymbolKind::Parameter => "Parameter",
            SymbolKind::Method => "Method",
            SymbolKind::Attribute => "Attribute",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The coarse type inferred from a symbol's first binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Float,
    String,
    Boolean,
    List,
    None,
    /// An object created by calling a class.
    Instance,
    Unknown,
}

impl DataType {
    pub fn as_str(self) -> &'static str {
        match self {
            DataType::Integer => "Integer",
            DataType::Float => "Float",
            DataType::String => "String",
            DataType::Boolean => "Boolean",
            DataType::List => "List",
            DataType::None => "None",
            DataType::Instance => "Instance",
            DataType::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A symbol represents a named entity in the program.
#[derive(Debug, Clone)]
pub struct Symbol {
    /// Unique identifier for this symbol.
    pub id: SymbolId,
    /// The name of this symbol (interned).
    pub name: InternedString,
    /// The actual text name of this symbol.
    pub name_text: String,
    pub kind: SymbolKind,
    pub data_type: DataType,
    pub flags: SymbolFlags,
    /// 1-based line of the declaring identifier.
    pub line: u32,
    /// 1-based column of the declaring identifier.
    pub column: u32,
    pub scope: ScopeId,
    pub scope_level: u32,
    /// Parameters of a function or method, in order.
    pub parameters: Vec<SymbolId>,
    /// The body scope of a function, method or class.
    pub members: Option<ScopeId>,
}

impl Symbol {
    pub fn new(name: InternedString, name_text: &str, kind: SymbolKind) -> Self {
        Self {
            id: SymbolId::INVALID,
            name,
            name_text: name_text.to_string(),
            kind,
            data_type: DataType::Unknown,
            flags: SymbolFlags::NONE,
            line: 0,
            column: 0,
            scope: ScopeId::MODULE,
            scope_level: 0,
            parameters: Vec::new(),
            members: None,
        }
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_flags(mut self, flags: SymbolFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = line;
        self.column = column;
        self
    }
}

/// Every scope and symbol of a bound module. Scopes are kept after they are
/// closed so the whole table can be inspected and dumped afterwards.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    symbols: Vec<Symbol>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// A table holding only the empty module scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(ScopeId::MODULE, ScopeKind::Module, "<module>", None)],
            symbols: Vec::new(),
        }
    }

    pub fn add_scope(&mut self, kind: ScopeKind, name: &str, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        let scope = Scope::new(id, kind, name, Some(&self.scopes[parent.index()]));
        self.scopes.push(scope);
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }

    pub fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Insert `symbol` into `scope`.
    ///
    /// Returns `Err` with the existing symbol when the scope already holds
    /// the name; the first declaration is kept.
    pub fn insert(&mut self, scope: ScopeId, mut symbol: Symbol) -> Result<SymbolId, SymbolId> {
        if let Some(existing) = self.scopes[scope.index()].get(symbol.name) {
            return Err(existing);
        }
        let id = SymbolId(self.symbols.len() as u32);
        symbol.id = id;
        symbol.scope = scope;
        symbol.scope_level = self.scopes[scope.index()].level;
        self.scopes[scope.index()].locals.insert(symbol.name, id);
        self.symbols.push(symbol);
        Ok(id)
    }

    pub fn lookup_in_scope(&self, scope: ScopeId, name: InternedString) -> Option<SymbolId> {
        self.scopes[scope.index()].get(name)
    }

    /// Search from `scope` outward to the module scope.
    pub fn lookup(&self, scope: ScopeId, name: InternedString) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id.index()];
            if let Some(symbol) = scope.get(name) {
                return Some(symbol);
            }
            current = scope.parent;
        }
        None
    }

    /// All symbols with the given source name, in declaration order.
    pub fn find_by_text<'t>(&'t self, name: &'t str) -> impl Iterator<Item = &'t Symbol> + 't {
        self.symbols.iter().filter(move |s| s.name_text == name)
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Symbol Table Contents:")?;
        writeln!(f, "=====================")?;
        for scope in &self.scopes {
            writeln!(f)?;
            writeln!(f, "=== Scope Level {} ({}) ===", scope.level, scope.name)?;
            for id in scope.locals.values() {
                let symbol = self.symbol(*id);
                writeln!(
                    f,
                    "Name: {:<15} | Type: {:<10} | Data Type: {:<10} | Line: {:<4} | Column: {}",
                    symbol.name_text,
                    symbol.kind.as_str(),
                    symbol.data_type.as_str(),
                    symbol.line,
                    symbol.column
                )?;
            }
        }
        Ok(())
    }
}
