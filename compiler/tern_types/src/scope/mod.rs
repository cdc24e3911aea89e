//! Lexical scopes.
//!
//! A scope is a name table plus a link to its lexical parent. A scope bound
//! to a type (object bodies, namespaces) keeps no names of its own: lookups
//! and insertions go to the type's member table, which is how members of
//! `this` and inherited members become visible inside a class body.

use rustc_hash::FxHashMap;
use tern_ir::{Name, SymbolId, TypeId};

use crate::{MemberId, ScopeId, TypeCache};

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ScopeKind {
    Global,
    Namespace,
    Object,
    /// Type parameters of a generic declaration.
    Parameters,
    /// Arguments of a function.
    Function,
    /// A block inside a function body.
    Local,
}

#[derive(Clone, Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub ty: Option<TypeId>,
    /// Declaration that opened this scope.
    pub symbol: Option<SymbolId>,
    locals: FxHashMap<Name, MemberId>,
}

#[derive(Clone, Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
}

impl ScopeArena {
    pub fn new() -> Self {
        ScopeArena::default()
    }

    pub fn create(&mut self, kind: ScopeKind, parent: Option<ScopeId>, symbol: Option<SymbolId>) -> ScopeId {
        let id = ScopeId::from_usize(self.scopes.len());
        self.scopes.push(Scope {
            kind,
            parent,
            ty: None,
            symbol,
            locals: FxHashMap::default(),
        });
        id
    }

    /// Route this scope's names through `ty`'s member table.
    ///
    /// Names inserted before binding stay visible.
    pub fn bind_type(&mut self, scope: ScopeId, ty: TypeId) {
        self.scopes[scope.index()].ty = Some(ty);
    }

    #[inline]
    pub fn get(&self, scope: ScopeId) -> &Scope {
        &self.scopes[scope.index()]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Look `name` up in this scope only.
    pub fn find_local(&self, scope: ScopeId, name: Name, types: &TypeCache) -> Option<MemberId> {
        let current = &self.scopes[scope.index()];
        if let Some(&member) = current.locals.get(&name) {
            return Some(member);
        }
        current.ty.and_then(|ty| types.find_member(ty, name))
    }

    /// Look `name` up in this scope and then its lexical parents.
    ///
    /// Returns the scope the name was found in together with its member.
    pub fn find(&self, scope: ScopeId, name: Name, types: &TypeCache) -> Option<(ScopeId, MemberId)> {
        self.chain(scope)
            .find_map(|s| self.find_local(s, name, types).map(|member| (s, member)))
    }

    /// Add `member` under `name`, or return the member already declared there.
    pub fn insert(&mut self, scope: ScopeId, name: Name, member: MemberId, types: &mut TypeCache) -> Result<(), MemberId> {
        let current = &mut self.scopes[scope.index()];
        match current.ty {
            Some(ty) => types.insert_member(ty, name, member),
            None => {
                if let Some(&existing) = current.locals.get(&name) {
                    return Err(existing);
                }
                current.locals.insert(name, member);
                Ok(())
            }
        }
    }

    /// This scope followed by its lexical parents.
    pub fn chain(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |&s| self.scopes[s.index()].parent)
    }

    /// Nearest scope (including `scope`) of one of `kinds`.
    pub fn nearest(&self, scope: ScopeId, kinds: &[ScopeKind]) -> Option<ScopeId> {
        self.chain(scope)
            .find(|&s| kinds.contains(&self.scopes[s.index()].kind))
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests unwrap lookups they just set up")]
mod tests;
