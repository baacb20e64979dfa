//! Flag types and id newtypes shared by the scanner, parser and binder.

bitflags::bitflags! {
    /// Flags for AST nodes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u32 {
        const NONE                  = 0;
        /// The node was synthesized by error recovery.
        const THIS_NODE_HAS_ERROR   = 1 << 0;
        /// The expression was wrapped in parentheses in source.
        const PARENTHESIZED         = 1 << 1;
        /// The suite was written on the header line (`if x: pass`).
        const SINGLE_LINE_SUITE     = 1 << 2;
    }
}

bitflags::bitflags! {
    /// Flags describing the token the scanner just produced.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u32 {
        const NONE                  = 0;
        const UNTERMINATED          = 1 << 0;
        /// Numeric literal has a fraction or exponent.
        const FLOATING_POINT        = 1 << 1;
        const SCIENTIFIC            = 1 << 2;
        /// String literal contained a backslash escape.
        const CONTAINS_ESCAPE       = 1 << 3;
        const TRIPLE_QUOTED         = 1 << 4;
        const SINGLE_QUOTE          = 1 << 5;
    }
}

bitflags::bitflags! {
    /// Per-symbol state recorded by the binder.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SymbolFlags: u32 {
        const NONE          = 0;
        /// A value was bound when the symbol was declared.
        const INITIALIZED   = 1 << 0;
        /// The name was bound again after its first declaration.
        const REASSIGNED    = 1 << 1;
        /// The name is read somewhere.
        const REFERENCED    = 1 << 2;
    }
}

/// Symbol ID for referencing symbols in the binder's symbol arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct SymbolId(pub u32);

impl SymbolId {
    pub const INVALID: SymbolId = SymbolId(u32::MAX);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Scope ID for referencing scopes in the binder's scope arena.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const MODULE: ScopeId = ScopeId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}
