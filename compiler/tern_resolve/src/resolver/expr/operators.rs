//! Typing rules for unary, binary and assignment operators.
//!
//! Built-in rules come first; an operator with no matching rule falls back to
//! an overload on the operand type.
//!
//! | Operator            | Operands                     | Result              |
//! |---------------------|------------------------------|---------------------|
//! | `&&` `\|\|` `!`     | bool                         | bool                |
//! | `==` `!=`           | common implicit type         | bool                |
//! | `<` `<=` `>` `>=`   | common implicit type         | bool                |
//! | `+` with a string   | other side via `toString()`  | string              |
//! | `+ - * /`           | numeric (enum as int)        | common numeric type |
//! | `%` `<<` `>>`       | integer-like                 | int                 |
//! | `& \| ^`            | same flags type, or integers | flags type or int   |
//! | `**`                | numeric, via `math.pow`      | double              |

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{BinaryOp, NodeId, NodeKind, TypeId, UnaryOp};
use tern_types::{OverloadKind, SymbolFlags, SymbolKind};

use crate::resolver::Resolver;

impl Resolver<'_> {
    pub(super) fn resolve_binary(&mut self, node: NodeId, op: BinaryOp, left: NodeId, right: NodeId) -> TypeId {
        if op.is_assign() {
            return self.resolve_assignment(node, op, left, right);
        }
        if matches!(op, BinaryOp::LogicalAnd | BinaryOp::LogicalOr) {
            self.resolve_condition(left);
            self.resolve_condition(right);
            return TypeId::BOOL;
        }
        let (left_ty, right_ty) = self.resolve_operands(left, right);
        if left_ty.is_error() || right_ty.is_error() {
            return TypeId::ERROR;
        }
        self.apply_binary(node, op, left, right)
    }

    /// Resolve both operands, typing whichever needs context from the other.
    fn resolve_operands(&mut self, left: NodeId, right: NodeId) -> (TypeId, TypeId) {
        if self.needs_context(left) && !self.needs_context(right) {
            let right_ty = self.resolve_value(right, None);
            let left_ty = self.resolve_value(left, Some(right_ty));
            (left_ty, right_ty)
        } else {
            let left_ty = self.resolve_value(left, None);
            let right_ty = self.resolve_value(right, Some(left_ty));
            (left_ty, right_ty)
        }
    }

    /// Type a binary operator over resolved operands.
    fn apply_binary(&mut self, node: NodeId, op: BinaryOp, left: NodeId, right: NodeId) -> TypeId {
        let left_ty = self.type_of(left);
        let right_ty = self.type_of(right);
        let numeric = |r: &Self, ty: TypeId| r.types.is_numeric(ty) || r.types.is_enum(ty);

        match op {
            BinaryOp::In => {
                return self
                    .resolve_operator_call(node, OverloadKind::In, right, &[left])
                    .unwrap_or_else(|| {
                        self.report_operator_mismatch(node, op.as_symbol(), &[left_ty, right_ty]);
                        TypeId::ERROR
                    });
            }
            BinaryOp::Equal | BinaryOp::NotEqual => {
                let Some(common) = self.types.common_implicit_type(left_ty, right_ty) else {
                    self.report_operator_mismatch(node, op.as_symbol(), &[left_ty, right_ty]);
                    return TypeId::ERROR;
                };
                self.convert_to(left, common);
                self.convert_to(right, common);
                return TypeId::BOOL;
            }
            BinaryOp::Add if left_ty == TypeId::STRING || right_ty == TypeId::STRING => {
                if left_ty != TypeId::STRING {
                    self.convert_to_string(left);
                }
                if right_ty != TypeId::STRING {
                    self.convert_to_string(right);
                }
                return TypeId::STRING;
            }
            BinaryOp::Power if numeric(self, left_ty) && numeric(self, right_ty) => {
                return self.lower_power(node, left, right);
            }
            _ if op.is_relational() => {
                let common = if numeric(self, left_ty) && numeric(self, right_ty) {
                    self.promote(left, right)
                } else {
                    self.types.common_implicit_type(left_ty, right_ty)
                };
                if let Some(common) = common {
                    self.convert_to(left, common);
                    self.convert_to(right, common);
                    return TypeId::BOOL;
                }
            }
            _ => {}
        }

        if numeric(self, left_ty) && numeric(self, right_ty) {
            if let Some(ty) = self.numeric_binary(op, left, right) {
                return ty;
            }
        }
        if let Some(kind) = OverloadKind::from_binary(op) {
            if let Some(ty) = self.resolve_operator_call(node, kind, left, &[right]) {
                return ty;
            }
        }
        self.report_operator_mismatch(node, op.as_symbol(), &[left_ty, right_ty]);
        TypeId::ERROR
    }

    /// Built-in rules for numeric and enum operands.
    fn numeric_binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> Option<TypeId> {
        let left_ty = self.type_of(left);
        let right_ty = self.type_of(right);
        match op {
            BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide => {
                let common = self.promote(left, right)?;
                self.convert_to(left, common);
                self.convert_to(right, common);
                Some(common)
            }
            BinaryOp::Remainder | BinaryOp::ShiftLeft | BinaryOp::ShiftRight => {
                self.integer_operands(left, right)
            }
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => {
                if left_ty == right_ty && self.types.is_flags(left_ty) {
                    return Some(left_ty);
                }
                self.integer_operands(left, right)
            }
            _ => None,
        }
    }

    /// Common type of two numeric operands, with enum values read as `int`.
    fn promote(&mut self, left: NodeId, right: NodeId) -> Option<TypeId> {
        let as_number = |r: &Self, ty: TypeId| if r.types.is_enum(ty) { TypeId::INT } else { ty };
        let left_ty = as_number(self, self.type_of(left));
        let right_ty = as_number(self, self.type_of(right));
        self.types.common_implicit_type(left_ty, right_ty)
    }

    fn integer_operands(&mut self, left: NodeId, right: NodeId) -> Option<TypeId> {
        let left_ty = self.type_of(left);
        let right_ty = self.type_of(right);
        if !self.types.is_integer_like(left_ty) || !self.types.is_integer_like(right_ty) {
            return None;
        }
        self.convert_to(left, TypeId::INT);
        self.convert_to(right, TypeId::INT);
        Some(TypeId::INT)
    }

    /// Rewrite a resolved operand into `operand.toString()`.
    fn convert_to_string(&mut self, operand: NodeId) {
        let ty = self.type_of(operand);
        if ty.is_error() {
            return;
        }
        if ty == TypeId::NULL {
            self.convert_to(operand, TypeId::STRING);
            return;
        }
        self.ensure_members(ty);
        let member = self.types.find_member(ty, self.names.to_string);
        let Some(member) = member else {
            self.report(
                Diagnostic::error(ErrorCode::E2032)
                    .with_message(format!("`{}` cannot be appended to a string", self.show(ty)))
                    .with_label(self.span(operand), "has no `toString()`"),
            );
            return;
        };
        let function = self.member_symbol(member);
        let function_ty = self.member_type(member);
        let name = self.names.to_string;
        // operand  =>  Call(Dot(operand, toString), [])
        self.nodes.wrap(operand, |value| NodeKind::Dot {
            target: Some(value),
            name,
        });
        self.nodes[operand].symbol = Some(function);
        self.set_type(operand, function_ty);
        self.nodes.wrap(operand, |callee| NodeKind::Call {
            target: callee,
            arguments: Vec::new(),
        });
        self.set_type(operand, TypeId::STRING);
    }

    /// Rewrite `a ** b` into `math.pow(a, b)`.
    fn lower_power(&mut self, node: NodeId, left: NodeId, right: NodeId) -> TypeId {
        self.convert_to(left, TypeId::DOUBLE);
        self.convert_to(right, TypeId::DOUBLE);
        let Some(math) = self.math else {
            return TypeId::DOUBLE;
        };
        let Some(member) = self.types.find_member(math, self.names.pow) else {
            return TypeId::DOUBLE;
        };
        let pow = self.member_symbol(member);
        let pow_ty = self.member_type(member);
        let span = self.span(node);
        let namespace = self.nodes.alloc(NodeKind::Type(math), span);
        self.set_type(namespace, math);
        let callee = self.nodes.alloc(
            NodeKind::Dot {
                target: Some(namespace),
                name: self.names.pow,
            },
            span,
        );
        self.nodes[callee].symbol = Some(pow);
        self.set_type(callee, pow_ty);
        self.nodes.replace(
            node,
            NodeKind::Call {
                target: callee,
                arguments: vec![left, right],
            },
        );
        tracing::trace!(?node, "lowered `**` to math.pow");
        TypeId::DOUBLE
    }

    // ========================================
    // Unary Operators
    // ========================================

    pub(super) fn resolve_unary(
        &mut self,
        node: NodeId,
        op: UnaryOp,
        value: NodeId,
        context: Option<TypeId>,
    ) -> TypeId {
        if op == UnaryOp::Not {
            self.resolve_condition(value);
            return TypeId::BOOL;
        }
        let inner_context = (op == UnaryOp::Complement).then_some(context).flatten();
        let ty = self.resolve_value(value, inner_context);
        if ty.is_error() {
            return TypeId::ERROR;
        }
        if op.is_increment_or_decrement() {
            if !self.types.is_numeric(ty) {
                self.report_operator_mismatch(node, op.as_symbol(), &[ty]);
                return TypeId::ERROR;
            }
            self.check_assignable(value);
            return ty;
        }

        match op {
            UnaryOp::Negate | UnaryOp::Positive if self.types.is_numeric(ty) => return ty,
            UnaryOp::Negate | UnaryOp::Positive if self.types.is_enum(ty) => {
                self.convert_to(value, TypeId::INT);
                return TypeId::INT;
            }
            UnaryOp::Complement if self.types.is_flags(ty) => return ty,
            UnaryOp::Complement if self.types.is_integer_like(ty) => {
                self.convert_to(value, TypeId::INT);
                return TypeId::INT;
            }
            _ => {}
        }
        if let Some(kind) = OverloadKind::from_unary(op) {
            if let Some(result) = self.resolve_operator_call(node, kind, value, &[]) {
                return result;
            }
        }
        self.report_operator_mismatch(node, op.as_symbol(), &[ty]);
        TypeId::ERROR
    }

    // ========================================
    // Assignment
    // ========================================

    fn resolve_assignment(&mut self, node: NodeId, op: BinaryOp, left: NodeId, right: NodeId) -> TypeId {
        if let NodeKind::Index { target, index } = *self.nodes.kind(left) {
            return self.resolve_index_assignment(node, op, left, target, index, right);
        }
        let target_ty = self.resolve_value(left, None);
        if target_ty.is_error() {
            self.resolve_value(right, None);
            return TypeId::ERROR;
        }
        let value_ty = self.resolve_value(right, Some(target_ty));
        if !self.check_assignable(left) || value_ty.is_error() {
            return TypeId::ERROR;
        }

        let Some(base) = op.compound_base() else {
            self.convert_to(right, target_ty);
            return target_ty;
        };
        if base == BinaryOp::Add && target_ty == TypeId::STRING {
            if value_ty != TypeId::STRING {
                self.convert_to_string(right);
            }
            return TypeId::STRING;
        }
        let numeric = self.types.is_numeric(target_ty) || self.types.is_enum(target_ty);
        let value_numeric = self.types.is_numeric(value_ty) || self.types.is_enum(value_ty);
        let result = if numeric && value_numeric {
            self.compound_numeric(base, left, right)
        } else {
            None
        };
        let Some(result) = result else {
            self.report_operator_mismatch(node, op.as_symbol(), &[target_ty, value_ty]);
            return TypeId::ERROR;
        };
        if result != target_ty && !self.types.can_implicitly_convert(result, target_ty) {
            self.report_mismatch(self.span(node), target_ty, result);
            return TypeId::ERROR;
        }
        target_ty
    }

    /// Type `left base right` for a compound assignment without rewriting the target.
    fn compound_numeric(&mut self, base: BinaryOp, left: NodeId, right: NodeId) -> Option<TypeId> {
        let left_ty = self.type_of(left);
        let right_ty = self.type_of(right);
        match base {
            BinaryOp::Add | BinaryOp::Subtract | BinaryOp::Multiply | BinaryOp::Divide => {
                let as_number = |r: &Self, ty: TypeId| if r.types.is_enum(ty) { TypeId::INT } else { ty };
                let common = self
                    .types
                    .common_implicit_type(as_number(self, left_ty), as_number(self, right_ty))?;
                self.convert_to(right, common);
                Some(common)
            }
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor
                if left_ty == right_ty && self.types.is_flags(left_ty) =>
            {
                Some(left_ty)
            }
            _ => {
                if !self.types.is_integer_like(left_ty) || !self.types.is_integer_like(right_ty) {
                    return None;
                }
                self.convert_to(right, TypeId::INT);
                Some(TypeId::INT)
            }
        }
    }

    /// `a[i] = v` through an `[]=` overload.
    fn resolve_index_assignment(
        &mut self,
        node: NodeId,
        op: BinaryOp,
        left: NodeId,
        target: NodeId,
        index: NodeId,
        right: NodeId,
    ) -> TypeId {
        if op != BinaryOp::Assign {
            self.resolve_value(left, None);
            self.resolve_value(right, None);
            self.report(
                Diagnostic::error(ErrorCode::E2036)
                    .with_message(format!("`{}` cannot be applied to an indexed element", op.as_symbol()))
                    .with_label(self.span(node), "write `a[i] = a[i] op v` instead"),
            );
            return TypeId::ERROR;
        }
        let target_ty = self.resolve_value(target, None);
        let index_context = self.overload_argument_context(target_ty, OverloadKind::AssignIndex, 0);
        let value_context = self.overload_argument_context(target_ty, OverloadKind::AssignIndex, 1);
        let index_ty = self.resolve_value(index, index_context);
        let value_ty = self.resolve_value(right, value_context);
        if target_ty.is_error() || index_ty.is_error() || value_ty.is_error() {
            return TypeId::ERROR;
        }
        match self.resolve_operator_call(node, OverloadKind::AssignIndex, target, &[index, right]) {
            Some(ty) => ty,
            None => {
                self.report(
                    Diagnostic::error(ErrorCode::E2036)
                        .with_message(format!("elements of `{}` cannot be assigned", self.show(target_ty)))
                        .with_label(self.span(left), "no `[]=` operator"),
                );
                TypeId::ERROR
            }
        }
    }

    /// Check that a resolved node names a variable that may be written.
    ///
    /// Also reports a pure function writing a variable it does not own.
    fn check_assignable(&mut self, target: NodeId) -> bool {
        let is_reference = matches!(self.nodes.kind(target), NodeKind::Name(_) | NodeKind::Dot { .. });
        let symbol = self.nodes[target]
            .symbol
            .filter(|&s| is_reference && self.symbols[s].kind.is_variable());
        let Some(symbol) = symbol else {
            if !self.type_of(target).is_error() {
                self.report(
                    Diagnostic::error(ErrorCode::E2036)
                        .with_message("cannot assign to this expression")
                        .with_label(self.span(target), "not a variable"),
                );
            }
            return false;
        };
        let name = self.symbol_name(symbol);
        let kind = self.symbols[symbol].kind;
        if self.has_flag(symbol, SymbolFlags::CONST) || kind == SymbolKind::EnumValue {
            self.report(
                Diagnostic::error(ErrorCode::E2036)
                    .with_message(format!("cannot assign to constant `{name}`"))
                    .with_label(self.span(target), "constant")
                    .with_secondary_label(self.symbols[symbol].span, "declared here"),
            );
            return false;
        }
        if let Some(function) = self.cx.function {
            let owned = self.symbols.enclosing_chain(symbol).any(|s| s == function);
            if self.has_flag(function, SymbolFlags::PURE) && !owned {
                self.report(
                    Diagnostic::error(ErrorCode::E2015)
                        .with_message(format!(
                            "pure function `{}` assigns `{name}`, which it does not own",
                            self.symbol_name(function)
                        ))
                        .with_label(self.span(target), "side effect"),
                );
            }
        }
        true
    }
}
