//! Overloadable operators.

use tern_ir::{BinaryOp, UnaryOp};

/// An operator a class can overload with an `@Operator("…")` function.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum OverloadKind {
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
    /// `<=>`, backing all four relational operators.
    Compare,
    /// `in`, looked up on the right operand.
    In,
    /// `[]`
    Index,
    /// `[]=`
    AssignIndex,
    Negate,
    Positive,
    Complement,
}

impl OverloadKind {
    /// Parse the token written in an `@Operator` annotation.
    pub fn from_token(token: &str) -> Option<OverloadKind> {
        Some(match token {
            "+" => OverloadKind::Add,
            "-" => OverloadKind::Subtract,
            "*" => OverloadKind::Multiply,
            "/" => OverloadKind::Divide,
            "%" => OverloadKind::Remainder,
            "**" => OverloadKind::Power,
            "<<" => OverloadKind::ShiftLeft,
            ">>" => OverloadKind::ShiftRight,
            "&" => OverloadKind::BitAnd,
            "|" => OverloadKind::BitOr,
            "^" => OverloadKind::BitXor,
            "<=>" => OverloadKind::Compare,
            "in" => OverloadKind::In,
            "[]" => OverloadKind::Index,
            "[]=" => OverloadKind::AssignIndex,
            "unary-" => OverloadKind::Negate,
            "unary+" => OverloadKind::Positive,
            "~" => OverloadKind::Complement,
            _ => return None,
        })
    }

    pub fn token(self) -> &'static str {
        match self {
            OverloadKind::Add => "+",
            OverloadKind::Subtract => "-",
            OverloadKind::Multiply => "*",
            OverloadKind::Divide => "/",
            OverloadKind::Remainder => "%",
            OverloadKind::Power => "**",
            OverloadKind::ShiftLeft => "<<",
            OverloadKind::ShiftRight => ">>",
            OverloadKind::BitAnd => "&",
            OverloadKind::BitOr => "|",
            OverloadKind::BitXor => "^",
            OverloadKind::Compare => "<=>",
            OverloadKind::In => "in",
            OverloadKind::Index => "[]",
            OverloadKind::AssignIndex => "[]=",
            OverloadKind::Negate => "unary-",
            OverloadKind::Positive => "unary+",
            OverloadKind::Complement => "~",
        }
    }

    /// Number of arguments an overload takes besides the receiver.
    pub fn argument_count(self) -> usize {
        match self {
            OverloadKind::Negate | OverloadKind::Positive | OverloadKind::Complement => 0,
            OverloadKind::AssignIndex => 2,
            _ => 1,
        }
    }

    /// The overload backing a binary operator. Equality and logical
    /// operators cannot be overloaded.
    pub fn from_binary(op: BinaryOp) -> Option<OverloadKind> {
        Some(match op {
            BinaryOp::Add => OverloadKind::Add,
            BinaryOp::Subtract => OverloadKind::Subtract,
            BinaryOp::Multiply => OverloadKind::Multiply,
            BinaryOp::Divide => OverloadKind::Divide,
            BinaryOp::Remainder => OverloadKind::Remainder,
            BinaryOp::Power => OverloadKind::Power,
            BinaryOp::ShiftLeft => OverloadKind::ShiftLeft,
            BinaryOp::ShiftRight => OverloadKind::ShiftRight,
            BinaryOp::BitAnd => OverloadKind::BitAnd,
            BinaryOp::BitOr => OverloadKind::BitOr,
            BinaryOp::BitXor => OverloadKind::BitXor,
            BinaryOp::Less | BinaryOp::LessEqual | BinaryOp::Greater | BinaryOp::GreaterEqual => {
                OverloadKind::Compare
            }
            BinaryOp::In => OverloadKind::In,
            _ => return None,
        })
    }

    pub fn from_unary(op: UnaryOp) -> Option<OverloadKind> {
        match op {
            UnaryOp::Negate => Some(OverloadKind::Negate),
            UnaryOp::Positive => Some(OverloadKind::Positive),
            UnaryOp::Complement => Some(OverloadKind::Complement),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip() {
        for kind in [
            OverloadKind::Add,
            OverloadKind::Compare,
            OverloadKind::In,
            OverloadKind::AssignIndex,
            OverloadKind::Negate,
            OverloadKind::Complement,
        ] {
            assert_eq!(OverloadKind::from_token(kind.token()), Some(kind));
        }
        assert_eq!(OverloadKind::from_token("=="), None);
    }

    #[test]
    fn relational_operators_share_compare() {
        assert_eq!(
            OverloadKind::from_binary(BinaryOp::GreaterEqual),
            Some(OverloadKind::Compare)
        );
        assert_eq!(OverloadKind::from_binary(BinaryOp::Equal), None);
        assert_eq!(OverloadKind::from_binary(BinaryOp::LogicalAnd), None);
    }

    #[test]
    fn argument_counts_match_arity() {
        assert_eq!(OverloadKind::Negate.argument_count(), 0);
        assert_eq!(OverloadKind::Add.argument_count(), 1);
        assert_eq!(OverloadKind::AssignIndex.argument_count(), 2);
    }
}
