//! Symbols and the symbol table.
//!
//! A symbol is the identity of a declaration. It is created during the
//! declaration scan with only a name, kind and declaring node; its type and
//! everything derived from it are filled in lazily when the resolver first
//! needs them. [`InitState`] tracks that lazy initialization so re-entering a
//! symbol that is still being initialized can be reported as a cycle.

mod flags;
mod kind;

pub use flags::SymbolFlags;
pub use kind::SymbolKind;

use std::ops::{Index, IndexMut};

use rustc_hash::FxHashMap;
use tern_ir::{Name, NodeId, Span, SymbolId, TypeId};

use crate::{MemberId, OverloadKind, ScopeId};

/// Lazy initialization progress of a symbol.
///
/// Transitions only move forward. Observing `InProgress` while resolving the
/// same symbol again means its declaration depends on itself.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum InitState {
    #[default]
    Uninitialized,
    InProgress,
    Done,
}

/// Folded value of a constant symbol.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Constant {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(Name),
}

impl Constant {
    pub fn as_int(self) -> Option<i64> {
        match self {
            Constant::Int(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: Name,
    pub kind: SymbolKind,
    pub flags: SymbolFlags,
    pub state: InitState,
    /// Resolved type. `None` until initialization assigns one.
    pub ty: Option<TypeId>,
    /// First declaration fragment; further fragments hang off its sibling chain.
    pub node: Option<NodeId>,
    pub span: Span,
    pub enclosing: Option<SymbolId>,
    /// Scope the symbol is declared in.
    pub scope: Option<ScopeId>,
    /// Scope the symbol opens for its members, arguments or body.
    pub own_scope: Option<ScopeId>,
    /// Type parameters declared directly on this symbol.
    pub parameters: Vec<SymbolId>,
    /// Argument variables of a function.
    pub arguments: Vec<SymbolId>,
    /// The base member this member overrides.
    pub overridden_member: Option<MemberId>,
    /// Merge candidates while the symbol is `Unmerged`.
    pub identical_members: Vec<MemberId>,
    /// Target of a `Forwarded` symbol.
    pub forwarded_to: Option<SymbolId>,
    /// Operator overloads registered on an object symbol.
    pub overloads: FxHashMap<OverloadKind, Vec<SymbolId>>,
    pub constant: Option<Constant>,
    /// Name to emit instead of the source name (`@EmitAs`).
    pub emit_as: Option<Name>,
    /// Headers the backend must include (`@NeedsInclude`).
    pub includes: Vec<Name>,
}

impl Symbol {
    pub fn new(id: SymbolId, name: Name, kind: SymbolKind, span: Span) -> Self {
        Symbol {
            id,
            name,
            kind,
            flags: SymbolFlags::empty(),
            state: InitState::Uninitialized,
            ty: None,
            node: None,
            span,
            enclosing: None,
            scope: None,
            own_scope: None,
            parameters: Vec::new(),
            arguments: Vec::new(),
            overridden_member: None,
            identical_members: Vec::new(),
            forwarded_to: None,
            overloads: FxHashMap::default(),
            constant: None,
            emit_as: None,
            includes: Vec::new(),
        }
    }

    #[inline]
    pub fn has(&self, flags: SymbolFlags) -> bool {
        self.flags.contains(flags)
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.state == InitState::Done
    }

    /// Move from `Uninitialized` to `InProgress`.
    ///
    /// # Panics
    /// Panics if initialization already started; callers check the state first.
    pub fn begin_initialization(&mut self) {
        assert_eq!(
            self.state,
            InitState::Uninitialized,
            "{:?} initialized twice",
            self.id
        );
        self.state = InitState::InProgress;
    }

    /// Move from `InProgress` to `Done`.
    ///
    /// # Panics
    /// Panics if initialization never started.
    pub fn finish_initialization(&mut self) {
        assert_eq!(
            self.state,
            InitState::InProgress,
            "{:?} finished without starting",
            self.id
        );
        self.state = InitState::Done;
    }

    /// Resolved type, or the error type if none was assigned.
    #[inline]
    pub fn ty_or_error(&self) -> TypeId {
        self.ty.unwrap_or(TypeId::ERROR)
    }

    pub fn register_overload(&mut self, kind: OverloadKind, function: SymbolId) {
        self.overloads.entry(kind).or_default().push(function);
    }
}

/// Owns every symbol of a compilation.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    pub fn create(&mut self, name: Name, kind: SymbolKind, span: Span) -> SymbolId {
        let id = SymbolId::from_usize(self.symbols.len());
        self.symbols.push(Symbol::new(id, name, kind, span));
        id
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Follow `forwarded_to` links to the symbol that does the work.
    pub fn resolve_forwarding(&self, mut id: SymbolId) -> SymbolId {
        while let Some(target) = self[id].forwarded_to {
            if target == id {
                break;
            }
            id = target;
        }
        id
    }

    /// Walk `enclosing` links starting at (and excluding) `id`.
    pub fn enclosing_chain(&self, id: SymbolId) -> impl Iterator<Item = SymbolId> + '_ {
        std::iter::successors(self[id].enclosing, move |&s| self[s].enclosing)
    }
}

impl Index<SymbolId> for SymbolTable {
    type Output = Symbol;

    #[inline]
    fn index(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }
}

impl IndexMut<SymbolId> for SymbolTable {
    #[inline]
    fn index_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.index()]
    }
}

#[cfg(test)]
mod tests;
