use pretty_assertions::assert_eq;
use tern_ir::{Span, StringInterner};

use super::*;
use crate::{Member, SymbolKind, SymbolTable, TypeKind};

struct Fixture {
    interner: StringInterner,
    symbols: SymbolTable,
    types: TypeCache,
    scopes: ScopeArena,
}

impl Fixture {
    fn new() -> Self {
        Fixture {
            interner: StringInterner::new(),
            symbols: SymbolTable::new(),
            types: TypeCache::new(),
            scopes: ScopeArena::new(),
        }
    }

    fn declare(&mut self, scope: ScopeId, name: &str) -> Result<MemberId, MemberId> {
        let name = self.interner.intern(name);
        let symbol = self.symbols.create(name, SymbolKind::LocalVariable, Span::DUMMY);
        let member = self.types.new_member(Member::own(symbol));
        self.scopes
            .insert(scope, name, member, &mut self.types)
            .map(|()| member)
    }
}

#[test]
fn find_walks_lexical_parents() {
    let mut f = Fixture::new();
    let global = f.scopes.create(ScopeKind::Global, None, None);
    let local = f.scopes.create(ScopeKind::Local, Some(global), None);
    let outer = f.declare(global, "x");
    let x = f.interner.intern("x");

    assert_eq!(f.scopes.find_local(local, x, &f.types), None);
    assert_eq!(f.scopes.find(local, x, &f.types), Some((global, outer.unwrap())));
}

#[test]
fn inner_declarations_shadow_outer_ones() {
    let mut f = Fixture::new();
    let global = f.scopes.create(ScopeKind::Global, None, None);
    let local = f.scopes.create(ScopeKind::Local, Some(global), None);
    f.declare(global, "x").unwrap();
    let inner = f.declare(local, "x").unwrap();
    let x = f.interner.intern("x");
    assert_eq!(f.scopes.find(local, x, &f.types), Some((local, inner)));
}

#[test]
fn duplicate_insert_returns_existing_member() {
    let mut f = Fixture::new();
    let global = f.scopes.create(ScopeKind::Global, None, None);
    let first = f.declare(global, "x").unwrap();
    assert_eq!(f.declare(global, "x"), Err(first));
}

#[test]
fn bound_scopes_use_the_member_table() {
    let mut f = Fixture::new();
    let global = f.scopes.create(ScopeKind::Global, None, None);
    let name = f.interner.intern("Point");
    let class = f.symbols.create(name, SymbolKind::Class, Span::DUMMY);
    let ty = f.types.create_named(TypeKind::Class, class);
    let body = f.scopes.create(ScopeKind::Object, Some(global), Some(class));
    f.scopes.bind_type(body, ty);

    let member = f.declare(body, "x").unwrap();
    let x = f.interner.intern("x");
    assert_eq!(f.types.find_member(ty, x), Some(member));
    assert_eq!(f.scopes.find_local(body, x, &f.types), Some(member));
    assert_eq!(f.scopes.find_local(global, x, &f.types), None);
}

#[test]
fn nearest_finds_enclosing_kind() {
    let mut f = Fixture::new();
    let global = f.scopes.create(ScopeKind::Global, None, None);
    let function = f.scopes.create(ScopeKind::Function, Some(global), None);
    let block = f.scopes.create(ScopeKind::Local, Some(function), None);
    assert_eq!(f.scopes.nearest(block, &[ScopeKind::Function]), Some(function));
    assert_eq!(f.scopes.nearest(block, &[ScopeKind::Object]), None);
    assert_eq!(f.scopes.chain(block).count(), 3);
}
