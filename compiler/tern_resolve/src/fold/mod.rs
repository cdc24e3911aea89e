//! Constant folding collaborator.
//!
//! The resolver hands resolved subtrees to a [`ConstantFolder`] wherever a
//! constant is required (global and const initializers, enum values, switch
//! cases, assert arguments, defines, annotation arguments). The folder
//! rewrites constant subtrees into literal nodes in place and keeps each
//! node's resolved type.

use tern_ir::{BinaryOp, NodeArena, NodeId, NodeKind, StringInterner, TypeId, UnaryOp};
use tern_types::{Constant, SymbolKind, SymbolTable};

/// What a folder may read and rewrite.
pub struct FoldContext<'a> {
    pub nodes: &'a mut NodeArena,
    pub symbols: &'a SymbolTable,
    pub interner: &'a StringInterner,
}

pub trait ConstantFolder {
    /// Rewrite the constant parts of `node` into literals.
    fn fold(&self, cx: &mut FoldContext<'_>, node: NodeId);
}

/// Folds literal operators, casts and references to constant symbols.
#[derive(Copy, Clone, Debug, Default)]
pub struct DefaultConstantFolder;

impl ConstantFolder for DefaultConstantFolder {
    fn fold(&self, cx: &mut FoldContext<'_>, node: NodeId) {
        tern_stack::ensure_sufficient_stack(|| fold_node(cx, node));
    }
}

/// Literal value of a folded node.
pub fn constant_of(nodes: &NodeArena, node: NodeId) -> Option<Constant> {
    match *nodes.kind(node) {
        NodeKind::Bool(value) => Some(Constant::Bool(value)),
        NodeKind::Int(value) => Some(Constant::Int(value)),
        NodeKind::Double(value) => Some(Constant::Double(value)),
        NodeKind::String(value) => Some(Constant::String(value)),
        _ => None,
    }
}

fn literal(constant: Constant) -> NodeKind {
    match constant {
        Constant::Bool(value) => NodeKind::Bool(value),
        Constant::Int(value) => NodeKind::Int(value),
        Constant::Double(value) => NodeKind::Double(value),
        Constant::String(value) => NodeKind::String(value),
    }
}

fn rewrite(cx: &mut FoldContext<'_>, node: NodeId, constant: Constant) {
    let ty = cx.nodes[node].ty;
    cx.nodes.replace(node, literal(constant));
    cx.nodes[node].ty = ty;
}

fn fold_node(cx: &mut FoldContext<'_>, node: NodeId) {
    for child in cx.nodes.kind(node).children() {
        fold_node(cx, child);
    }
    if let Some(constant) = evaluate(cx, node) {
        rewrite(cx, node, constant);
    }
}

fn evaluate(cx: &FoldContext<'_>, node: NodeId) -> Option<Constant> {
    let nodes = &*cx.nodes;
    match nodes.kind(node) {
        NodeKind::Name(_) | NodeKind::Dot { .. } => {
            let symbol = &cx.symbols[nodes[node].symbol?];
            let is_constant = symbol.kind == SymbolKind::EnumValue
                || symbol.kind == SymbolKind::Define
                || symbol.has(tern_types::SymbolFlags::CONST);
            if is_constant {
                symbol.constant
            } else {
                None
            }
        }
        NodeKind::ImplicitCast { value } | NodeKind::Cast { value, .. } => {
            convert(constant_of(nodes, *value)?, nodes[node].ty?)
        }
        NodeKind::Unary { op, value } => unary(*op, constant_of(nodes, *value)?),
        NodeKind::Binary { op, left, right } => binary(
            cx.interner,
            *op,
            constant_of(nodes, *left)?,
            constant_of(nodes, *right)?,
        ),
        _ => None,
    }
}

#[expect(clippy::cast_possible_truncation, reason = "casts truncate like the target language")]
#[expect(clippy::cast_precision_loss, reason = "int to double widening is the language rule")]
fn convert(value: Constant, to: TypeId) -> Option<Constant> {
    match (value, to) {
        (Constant::Int(v), TypeId::DOUBLE | TypeId::FLOAT) => Some(Constant::Double(v as f64)),
        (Constant::Double(v), TypeId::INT) => Some(Constant::Int(v as i64)),
        (Constant::Double(v), TypeId::DOUBLE | TypeId::FLOAT) => Some(Constant::Double(v)),
        (Constant::Int(v), TypeId::BOOL) => Some(Constant::Bool(v != 0)),
        (Constant::Bool(v), TypeId::INT) => Some(Constant::Int(i64::from(v))),
        (Constant::Bool(v), TypeId::DOUBLE | TypeId::FLOAT) => {
            Some(Constant::Double(if v { 1.0 } else { 0.0 }))
        }
        (Constant::Bool(_), TypeId::BOOL) | (Constant::String(_), TypeId::STRING) => Some(value),
        // Enum types keep the integer representation.
        (Constant::Int(_), _) => Some(value),
        _ => None,
    }
}

fn unary(op: UnaryOp, value: Constant) -> Option<Constant> {
    match (op, value) {
        (UnaryOp::Negate, Constant::Int(v)) => v.checked_neg().map(Constant::Int),
        (UnaryOp::Negate, Constant::Double(v)) => Some(Constant::Double(-v)),
        (UnaryOp::Positive, Constant::Int(_) | Constant::Double(_)) => Some(value),
        (UnaryOp::Complement, Constant::Int(v)) => Some(Constant::Int(!v)),
        (UnaryOp::Not, Constant::Bool(v)) => Some(Constant::Bool(!v)),
        _ => None,
    }
}

fn binary(interner: &StringInterner, op: BinaryOp, left: Constant, right: Constant) -> Option<Constant> {
    match (left, right) {
        (Constant::Int(a), Constant::Int(b)) => int_binary(op, a, b),
        (Constant::Double(a), Constant::Double(b)) => double_binary(op, a, b),
        (Constant::Bool(a), Constant::Bool(b)) => match op {
            BinaryOp::LogicalAnd => Some(Constant::Bool(a && b)),
            BinaryOp::LogicalOr => Some(Constant::Bool(a || b)),
            BinaryOp::Equal => Some(Constant::Bool(a == b)),
            BinaryOp::NotEqual => Some(Constant::Bool(a != b)),
            _ => None,
        },
        (Constant::String(a), Constant::String(b)) => match op {
            BinaryOp::Add => {
                let joined = format!("{}{}", interner.lookup(a), interner.lookup(b));
                Some(Constant::String(interner.intern(&joined)))
            }
            BinaryOp::Equal => Some(Constant::Bool(a == b)),
            BinaryOp::NotEqual => Some(Constant::Bool(a != b)),
            _ => None,
        },
        _ => None,
    }
}

fn int_binary(op: BinaryOp, a: i64, b: i64) -> Option<Constant> {
    let int = |value: Option<i64>| value.map(Constant::Int);
    match op {
        BinaryOp::Add => int(a.checked_add(b)),
        BinaryOp::Subtract => int(a.checked_sub(b)),
        BinaryOp::Multiply => int(a.checked_mul(b)),
        BinaryOp::Divide => int(a.checked_div(b)),
        BinaryOp::Remainder => int(a.checked_rem(b)),
        BinaryOp::ShiftLeft => int(u32::try_from(b).ok().and_then(|s| a.checked_shl(s))),
        BinaryOp::ShiftRight => int(u32::try_from(b).ok().and_then(|s| a.checked_shr(s))),
        BinaryOp::BitAnd => Some(Constant::Int(a & b)),
        BinaryOp::BitOr => Some(Constant::Int(a | b)),
        BinaryOp::BitXor => Some(Constant::Int(a ^ b)),
        _ => compare(op, a.cmp(&b)),
    }
}

fn double_binary(op: BinaryOp, a: f64, b: f64) -> Option<Constant> {
    match op {
        BinaryOp::Add => Some(Constant::Double(a + b)),
        BinaryOp::Subtract => Some(Constant::Double(a - b)),
        BinaryOp::Multiply => Some(Constant::Double(a * b)),
        BinaryOp::Divide => Some(Constant::Double(a / b)),
        _ => compare(op, a.partial_cmp(&b)?),
    }
}

fn compare(op: BinaryOp, ordering: std::cmp::Ordering) -> Option<Constant> {
    use std::cmp::Ordering::{Equal, Greater, Less};
    let result = match op {
        BinaryOp::Equal => ordering == Equal,
        BinaryOp::NotEqual => ordering != Equal,
        BinaryOp::Less => ordering == Less,
        BinaryOp::LessEqual => ordering != Greater,
        BinaryOp::Greater => ordering == Greater,
        BinaryOp::GreaterEqual => ordering != Less,
        _ => return None,
    };
    Some(Constant::Bool(result))
}

#[cfg(test)]
mod tests;
