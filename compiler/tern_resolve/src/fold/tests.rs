use pretty_assertions::assert_eq;
use tern_ir::{AstBuilder, BinaryOp, NodeArena, Span, StringInterner, TypeId, UnaryOp};
use tern_types::{Constant, SymbolFlags, SymbolKind, SymbolTable};

use super::*;

fn fold(nodes: &mut NodeArena, symbols: &SymbolTable, interner: &StringInterner, node: NodeId) {
    let mut cx = FoldContext {
        nodes,
        symbols,
        interner,
    };
    DefaultConstantFolder.fold(&mut cx, node);
}

#[test]
fn folds_nested_integer_arithmetic() {
    let interner = StringInterner::new();
    let symbols = SymbolTable::new();
    let mut nodes = NodeArena::new();
    let mut b = AstBuilder::new(&mut nodes, &interner, 0);
    let one = b.int(1);
    let two = b.int(2);
    let three = b.int(3);
    let product = b.binary(BinaryOp::Multiply, two, three);
    let sum = b.binary(BinaryOp::Add, one, product);
    nodes[sum].ty = Some(TypeId::INT);

    fold(&mut nodes, &symbols, &interner, sum);
    assert_eq!(nodes.kind(sum), &NodeKind::Int(7));
    assert_eq!(nodes[sum].ty, Some(TypeId::INT));
}

#[test]
fn folds_casts_and_comparisons() {
    let interner = StringInterner::new();
    let symbols = SymbolTable::new();
    let mut nodes = NodeArena::new();
    let mut b = AstBuilder::new(&mut nodes, &interner, 0);
    let one = b.int(1);
    b.arena().wrap(one, |value| NodeKind::ImplicitCast { value });
    let half = b.double(0.5);
    let less = b.binary(BinaryOp::Less, one, half);
    b.arena()[one].ty = Some(TypeId::DOUBLE);

    fold(&mut nodes, &symbols, &interner, less);
    assert_eq!(nodes.kind(less), &NodeKind::Bool(false));
}

#[test]
fn folds_string_concatenation_and_logic() {
    let interner = StringInterner::new();
    let symbols = SymbolTable::new();
    let mut nodes = NodeArena::new();
    let mut b = AstBuilder::new(&mut nodes, &interner, 0);
    let left = b.string("ab");
    let right = b.string("cd");
    let joined = b.binary(BinaryOp::Add, left, right);
    let yes = b.boolean(true);
    let negated = b.unary(UnaryOp::Not, yes);

    fold(&mut nodes, &symbols, &interner, joined);
    fold(&mut nodes, &symbols, &interner, negated);
    assert_eq!(nodes.kind(joined), &NodeKind::String(interner.intern("abcd")));
    assert_eq!(nodes.kind(negated), &NodeKind::Bool(false));
}

#[test]
fn replaces_references_to_constant_symbols() {
    let interner = StringInterner::new();
    let mut symbols = SymbolTable::new();
    let limit = symbols.create(interner.intern("limit"), SymbolKind::GlobalVariable, Span::DUMMY);
    symbols[limit].flags |= SymbolFlags::CONST;
    symbols[limit].constant = Some(Constant::Int(10));
    let counter = symbols.create(interner.intern("counter"), SymbolKind::GlobalVariable, Span::DUMMY);
    symbols[counter].constant = Some(Constant::Int(3));

    let mut nodes = NodeArena::new();
    let mut b = AstBuilder::new(&mut nodes, &interner, 0);
    let constant = b.name("limit");
    let variable = b.name("counter");
    let arena = b.arena();
    arena[constant].symbol = Some(limit);
    arena[constant].ty = Some(TypeId::INT);
    arena[variable].symbol = Some(counter);

    fold(&mut nodes, &symbols, &interner, constant);
    fold(&mut nodes, &symbols, &interner, variable);
    assert_eq!(nodes.kind(constant), &NodeKind::Int(10));
    assert_eq!(nodes[constant].ty, Some(TypeId::INT));
    assert_eq!(nodes.kind(variable), &NodeKind::Name(interner.intern("counter")));
}

#[test]
fn leaves_division_by_zero_alone() {
    let interner = StringInterner::new();
    let symbols = SymbolTable::new();
    let mut nodes = NodeArena::new();
    let mut b = AstBuilder::new(&mut nodes, &interner, 0);
    let one = b.int(1);
    let zero = b.int(0);
    let quotient = b.binary(BinaryOp::Divide, one, zero);

    fold(&mut nodes, &symbols, &interner, quotient);
    assert!(matches!(nodes.kind(quotient), NodeKind::Binary { .. }));
    assert_eq!(constant_of(&nodes, one), Some(Constant::Int(1)));
}
