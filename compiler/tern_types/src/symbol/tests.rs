use pretty_assertions::assert_eq;
use tern_ir::{ModifierKind, Span, StringInterner, SymbolId};

use super::*;

fn table_with(names: &[&str]) -> (SymbolTable, Vec<SymbolId>) {
    let interner = StringInterner::new();
    let mut table = SymbolTable::new();
    let ids = names
        .iter()
        .map(|name| table.create(interner.intern(name), SymbolKind::Automatic, Span::DUMMY))
        .collect();
    (table, ids)
}

#[test]
fn ids_follow_creation_order() {
    let (table, ids) = table_with(&["a", "b", "c"]);
    assert_eq!(ids, vec![SymbolId::new(0), SymbolId::new(1), SymbolId::new(2)]);
    assert_eq!(table.len(), 3);
    assert!(table.iter().all(|s| s.state == InitState::Uninitialized));
}

#[test]
fn initialization_moves_forward() {
    let (mut table, ids) = table_with(&["a"]);
    let symbol = &mut table[ids[0]];
    symbol.begin_initialization();
    assert_eq!(symbol.state, InitState::InProgress);
    assert!(!symbol.is_initialized());
    symbol.finish_initialization();
    assert!(symbol.is_initialized());
}

#[test]
#[should_panic(expected = "initialized twice")]
fn initialization_cannot_restart() {
    let (mut table, ids) = table_with(&["a"]);
    table[ids[0]].begin_initialization();
    table[ids[0]].begin_initialization();
}

#[test]
#[should_panic(expected = "finished without starting")]
fn initialization_cannot_skip_in_progress() {
    let (mut table, ids) = table_with(&["a"]);
    table[ids[0]].finish_initialization();
}

#[test]
fn forwarding_chains_resolve_to_the_end() {
    let (mut table, ids) = table_with(&["a", "b", "c"]);
    table[ids[0]].forwarded_to = Some(ids[1]);
    table[ids[1]].forwarded_to = Some(ids[2]);
    assert_eq!(table.resolve_forwarding(ids[0]), ids[2]);
    assert_eq!(table.resolve_forwarding(ids[2]), ids[2]);
}

#[test]
fn enclosing_chain_walks_outward() {
    let (mut table, ids) = table_with(&["ns", "class", "method"]);
    table[ids[1]].enclosing = Some(ids[0]);
    table[ids[2]].enclosing = Some(ids[1]);
    assert_eq!(table.enclosing_chain(ids[2]).collect::<Vec<_>>(), vec![ids[1], ids[0]]);
}

#[test]
fn modifiers_map_to_flags() {
    assert_eq!(SymbolFlags::from_modifier(ModifierKind::Pure), SymbolFlags::PURE);
    let flags = SymbolFlags::PRIVATE | SymbolFlags::STATIC;
    assert_eq!(flags.visibility(), SymbolFlags::PRIVATE);
}

#[test]
fn overloads_accumulate_per_kind() {
    let (mut table, ids) = table_with(&["Vec", "add", "add2"]);
    table[ids[0]].register_overload(OverloadKind::Add, ids[1]);
    table[ids[0]].register_overload(OverloadKind::Add, ids[2]);
    assert_eq!(table[ids[0]].overloads[&OverloadKind::Add], vec![ids[1], ids[2]]);
    assert!(!table[ids[0]].overloads.contains_key(&OverloadKind::Compare));
}

#[test]
fn kind_predicates() {
    assert!(SymbolKind::Class.is_type());
    assert!(SymbolKind::EnumFlags.is_enum());
    assert!(SymbolKind::MergedInstanceFunction.is_function());
    assert!(SymbolKind::MergedInstanceFunction.is_instance_member());
    assert!(SymbolKind::ArgumentVariable.is_local());
    assert!(!SymbolKind::GlobalVariable.is_instance_member());
    assert_eq!(SymbolKind::EnumFlags.to_string(), "flags enum");
}
