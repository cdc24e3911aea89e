//! Variables, enum values, aliases and defines.

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{NodeId, NodeKind, SymbolId, TypeId};
use tern_types::{Constant, SymbolFlags, SymbolKind};

use crate::fold::constant_of;
use crate::resolver::Resolver;

impl Resolver<'_> {
    pub(super) fn initialize_variable(&mut self, symbol: SymbolId) {
        self.validate_modifiers(symbol);
        let Some(node) = self.symbols[symbol].node else {
            return;
        };
        let NodeKind::Variable { ty, value, .. } = self.nodes.kind(node) else {
            panic!("variable symbol declared by a {}", self.nodes.kind(node).describe());
        };
        let (declared, value) = (*ty, *value);
        let name = self.symbol_name(symbol);
        let span = self.symbols[symbol].span;
        let kind = self.symbols[symbol].kind;
        let is_const = self.has_flag(symbol, SymbolFlags::CONST);

        let declared = declared.map(|node| self.resolve_type(node));
        let ty = match (declared, value) {
            (Some(declared), Some(value)) => {
                self.resolve_value(value, Some(declared));
                self.convert_to(value, declared);
                declared
            }
            (Some(declared), None) => {
                if is_const {
                    self.report_const_without_value(symbol);
                }
                declared
            }
            (None, Some(value)) => {
                let found = self.resolve_value(value, None);
                if found == TypeId::NULL {
                    self.report(
                        Diagnostic::error(ErrorCode::E2012)
                            .with_message(format!("cannot infer the type of `{name}` from `null`"))
                            .with_label(span, "needs an explicit type"),
                    );
                    TypeId::ERROR
                } else if found == TypeId::VOID {
                    self.report(
                        Diagnostic::error(ErrorCode::E2013)
                            .with_message(format!("`{name}` is initialized with a value of type `void`"))
                            .with_label(self.span(value), "has no value"),
                    );
                    TypeId::ERROR
                } else {
                    found
                }
            }
            (None, None) => {
                if is_const {
                    self.report_const_without_value(symbol);
                } else {
                    self.report(
                        Diagnostic::error(ErrorCode::E2012)
                            .with_message(format!("`{name}` needs a type or an initial value"))
                            .with_label(span, "type cannot be inferred"),
                    );
                }
                TypeId::ERROR
            }
        };
        self.symbols[symbol].ty = Some(ty);

        let Some(value) = value else {
            return;
        };
        let is_global = kind == SymbolKind::GlobalVariable;
        if !is_const && !is_global {
            return;
        }
        if !self.is_pure_expression(value) {
            self.report(
                Diagnostic::error(ErrorCode::E2015)
                    .with_message(format!("initializer of `{name}` must be pure"))
                    .with_label(self.span(value), "calls an impure function or assigns")
                    .with_note("global and const initializers run without side effects"),
            );
        }
        self.fold(value);
        if is_const && !self.type_of(value).is_error() {
            match constant_of(self.nodes, value) {
                Some(constant) => self.symbols[symbol].constant = Some(constant),
                None => self.report_not_constant(value, &format!("value of const `{name}`")),
            }
        }
    }

    fn report_const_without_value(&mut self, symbol: SymbolId) {
        let name = self.symbol_name(symbol);
        self.report(
            Diagnostic::error(ErrorCode::E2014)
                .with_message(format!("const `{name}` has no value"))
                .with_label(self.symbols[symbol].span, "needs an initializer"),
        );
    }

    pub(crate) fn report_not_constant(&mut self, node: NodeId, what: &str) {
        self.report(
            Diagnostic::error(ErrorCode::E2047)
                .with_message(format!("{what} must be a constant"))
                .with_label(self.span(node), "not a constant expression"),
        );
    }

    /// Give an enum value its type and integer constant.
    ///
    /// Values without an initializer count up from the previous value
    /// (starting at 0), or take `1 << index` in a flags enum.
    pub(super) fn initialize_enum_value(&mut self, symbol: SymbolId) {
        self.validate_modifiers(symbol);
        let Some(owner) = self.symbols[symbol].enclosing else {
            return;
        };
        let enum_type = self.symbols[owner].ty_or_error();
        self.symbols[symbol].ty = Some(enum_type);
        let Some(node) = self.symbols[symbol].node else {
            return;
        };
        let NodeKind::Variable { value, .. } = self.nodes.kind(node) else {
            panic!("enum value declared by a {}", self.nodes.kind(node).describe());
        };
        let value = *value;

        let number = match value {
            Some(value) => {
                self.resolve_value(value, Some(TypeId::INT));
                self.convert_to(value, TypeId::INT);
                self.fold(value);
                match constant_of(self.nodes, value) {
                    Some(Constant::Int(number)) => number,
                    _ => {
                        if !self.type_of(value).is_error() {
                            let name = self.symbol_name(symbol);
                            self.report_not_constant(value, &format!("value of `{name}`"));
                        }
                        0
                    }
                }
            }
            None => self.automatic_enum_value(owner, symbol),
        };
        self.symbols[symbol].constant = Some(Constant::Int(number));
    }

    fn automatic_enum_value(&mut self, owner: SymbolId, symbol: SymbolId) -> i64 {
        let values = self.enum_values(owner);
        let index = values.iter().position(|&v| v == symbol).unwrap_or(0);
        if self.symbols[owner].kind == SymbolKind::EnumFlags {
            return u32::try_from(index)
                .ok()
                .and_then(|shift| 1_i64.checked_shl(shift))
                .filter(|&bit| bit > 0)
                .unwrap_or_else(|| {
                    let name = self.symbol_name(symbol);
                    self.report(
                        Diagnostic::error(ErrorCode::E2047)
                            .with_message(format!("flags value `{name}` does not fit in 63 bits"))
                            .with_label(self.symbols[symbol].span, "too many flags"),
                    );
                    0
                });
        }
        let Some(&previous) = index.checked_sub(1).and_then(|i| values.get(i)) else {
            return 0;
        };
        self.initialize_symbol(previous);
        self.symbols[previous]
            .constant
            .and_then(Constant::as_int)
            .map_or(0, |n| n.wrapping_add(1))
    }

    pub(super) fn initialize_alias(&mut self, symbol: SymbolId) {
        self.validate_modifiers(symbol);
        let Some(node) = self.symbols[symbol].node else {
            return;
        };
        let NodeKind::Alias { value, .. } = self.nodes.kind(node) else {
            panic!("alias declared by a {}", self.nodes.kind(node).describe());
        };
        let value = *value;
        let ty = self.resolve_type(value);
        self.symbols[symbol].ty = Some(ty);
    }

    pub(super) fn initialize_define(&mut self, symbol: SymbolId) {
        self.validate_modifiers(symbol);
        let Some(node) = self.symbols[symbol].node else {
            return;
        };
        let NodeKind::Define { value, .. } = self.nodes.kind(node) else {
            panic!("define declared by a {}", self.nodes.kind(node).describe());
        };
        let value = *value;
        let ty = self.resolve_value(value, None);
        self.symbols[symbol].ty = Some(ty);
        self.fold(value);
        if ty.is_error() {
            return;
        }
        match constant_of(self.nodes, value) {
            Some(constant) => self.symbols[symbol].constant = Some(constant),
            None => {
                let name = self.symbol_name(symbol);
                self.report_not_constant(value, &format!("value of define `{name}`"));
            }
        }
    }
}
