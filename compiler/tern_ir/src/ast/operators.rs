//! Unary and binary operators.

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Negate,
    Positive,
    Not,
    Complement,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl UnaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Positive => "+",
            UnaryOp::Not => "!",
            UnaryOp::Complement => "~",
            UnaryOp::PreIncrement | UnaryOp::PostIncrement => "++",
            UnaryOp::PreDecrement | UnaryOp::PostDecrement => "--",
        }
    }

    /// `++` and `--` in either position.
    pub fn is_increment_or_decrement(self) -> bool {
        matches!(
            self,
            UnaryOp::PreIncrement
                | UnaryOp::PreDecrement
                | UnaryOp::PostIncrement
                | UnaryOp::PostDecrement
        )
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Power,
    ShiftLeft,
    ShiftRight,
    BitAnd,
    BitOr,
    BitXor,
    LogicalAnd,
    LogicalOr,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    In,
    Assign,
    AssignAdd,
    AssignSubtract,
    AssignMultiply,
    AssignDivide,
    AssignRemainder,
    AssignShiftLeft,
    AssignShiftRight,
    AssignBitAnd,
    AssignBitOr,
    AssignBitXor,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Remainder => "%",
            BinaryOp::Power => "**",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::In => "in",
            BinaryOp::Assign => "=",
            BinaryOp::AssignAdd => "+=",
            BinaryOp::AssignSubtract => "-=",
            BinaryOp::AssignMultiply => "*=",
            BinaryOp::AssignDivide => "/=",
            BinaryOp::AssignRemainder => "%=",
            BinaryOp::AssignShiftLeft => "<<=",
            BinaryOp::AssignShiftRight => ">>=",
            BinaryOp::AssignBitAnd => "&=",
            BinaryOp::AssignBitOr => "|=",
            BinaryOp::AssignBitXor => "^=",
        }
    }

    /// `=` and every compound assignment.
    pub fn is_assign(self) -> bool {
        matches!(self, BinaryOp::Assign) || self.compound_base().is_some()
    }

    /// The arithmetic operator a compound assignment applies (`+=` -> `+`).
    pub fn compound_base(self) -> Option<BinaryOp> {
        Some(match self {
            BinaryOp::AssignAdd => BinaryOp::Add,
            BinaryOp::AssignSubtract => BinaryOp::Subtract,
            BinaryOp::AssignMultiply => BinaryOp::Multiply,
            BinaryOp::AssignDivide => BinaryOp::Divide,
            BinaryOp::AssignRemainder => BinaryOp::Remainder,
            BinaryOp::AssignShiftLeft => BinaryOp::ShiftLeft,
            BinaryOp::AssignShiftRight => BinaryOp::ShiftRight,
            BinaryOp::AssignBitAnd => BinaryOp::BitAnd,
            BinaryOp::AssignBitOr => BinaryOp::BitOr,
            BinaryOp::AssignBitXor => BinaryOp::BitXor,
            _ => return None,
        })
    }

    /// `<`, `<=`, `>`, `>=`.
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual
        )
    }

    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOp::Equal | BinaryOp::NotEqual)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compound_assignments_map_to_their_operator() {
        assert_eq!(BinaryOp::AssignAdd.compound_base(), Some(BinaryOp::Add));
        assert_eq!(BinaryOp::AssignBitXor.compound_base(), Some(BinaryOp::BitXor));
        assert_eq!(BinaryOp::Assign.compound_base(), None);
        assert!(BinaryOp::Assign.is_assign());
        assert!(BinaryOp::AssignShiftLeft.is_assign());
        assert!(!BinaryOp::Add.is_assign());
    }

    #[test]
    fn relational_and_equality_are_disjoint() {
        assert!(BinaryOp::Less.is_relational());
        assert!(!BinaryOp::Less.is_equality());
        assert!(BinaryOp::NotEqual.is_equality());
        assert!(!BinaryOp::NotEqual.is_relational());
    }
}
