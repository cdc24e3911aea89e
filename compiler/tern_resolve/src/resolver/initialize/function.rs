//! Function signatures and override checks.

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{NodeKind, SymbolId, TypeId};
use tern_types::{SymbolFlags, SymbolKind};

use crate::resolver::Resolver;

impl Resolver<'_> {
    pub(super) fn initialize_function(&mut self, symbol: SymbolId) {
        self.validate_modifiers(symbol);
        if let Some(object) = self.enclosing_object(symbol) {
            self.initialize_if_fresh(object);
        }
        let Some(node) = self.symbols[symbol].node else {
            return;
        };
        let NodeKind::Function { result, body, .. } = self.nodes.kind(node) else {
            panic!("function symbol declared by a {}", self.nodes.kind(node).describe());
        };
        let (result, has_body) = (*result, body.is_some());

        let own_scope = self.symbols[symbol].own_scope.unwrap_or(self.global_scope);
        let arguments = self.symbols[symbol].arguments.clone();
        let mut argument_types = Vec::with_capacity(arguments.len());
        for argument in arguments {
            self.initialize_symbol(argument);
            argument_types.push(self.symbols[argument].ty_or_error());
        }

        let kind = self.symbols[symbol].kind;
        let result = if kind == SymbolKind::Constructor {
            self.enclosing_object(symbol)
                .map_or(TypeId::ERROR, |o| self.symbols[o].ty_or_error())
        } else {
            match result {
                Some(result) => self.with_scope(own_scope, |r| r.resolve_type(result)),
                None => TypeId::VOID,
            }
        };
        let ty = self.types.function_type(result, &argument_types);
        self.symbols[symbol].ty = Some(ty);

        if kind == SymbolKind::InstanceFunction {
            self.check_override(symbol, ty);
        }

        let span = self.symbols[symbol].span;
        let is_abstract = self.has_flag(symbol, SymbolFlags::ABSTRACT);
        let imported = self.has_flag(symbol, SymbolFlags::IMPORT);
        if is_abstract && has_body {
            self.report(
                Diagnostic::error(ErrorCode::E2029)
                    .with_message(format!(
                        "abstract function `{}` cannot have a body",
                        self.symbol_name(symbol)
                    ))
                    .with_label(span, "abstract, but has a body"),
            );
        } else if !is_abstract && !imported && !has_body {
            self.report(
                Diagnostic::error(ErrorCode::E2029)
                    .with_message(format!("function `{}` has no body", self.symbol_name(symbol)))
                    .with_label(span, "body required")
                    .with_note("mark the function `abstract` or `import`, or give it a body"),
            );
        }
    }

    /// Check an instance function against the base member it overrides.
    fn check_override(&mut self, symbol: SymbolId, ty: TypeId) {
        let name = self.symbol_name(symbol);
        let span = self.symbols[symbol].span;
        let is_override = self.has_flag(symbol, SymbolFlags::OVERRIDE);

        let Some(base_member) = self.symbols[symbol].overridden_member else {
            if is_override {
                self.report(
                    Diagnostic::error(ErrorCode::E2026)
                        .with_message(format!("`{name}` is marked `override` but overrides nothing"))
                        .with_label(span, "no base member with this name"),
                );
            }
            return;
        };

        let base_type = self.member_type(base_member);
        let base = self.member_symbol(base_member);
        if !self.symbols[base].kind.is_function() {
            return;
        }
        let base_span = self.symbols[base].span;

        if !self.has_flag(base, SymbolFlags::VIRTUAL) {
            self.report(
                Diagnostic::error(ErrorCode::E2023)
                    .with_message(format!("cannot override non-virtual `{name}`"))
                    .with_label(span, "overrides a non-virtual member")
                    .with_secondary_label(base_span, "base member declared here"),
            );
            return;
        }
        if !is_override {
            self.report(
                Diagnostic::error(ErrorCode::E2022)
                    .with_message(format!("`{name}` overrides a base member but is not marked `override`"))
                    .with_label(span, "add `override`")
                    .with_secondary_label(base_span, "overridden member declared here"),
            );
        }
        if base_type != ty && !base_type.is_error() && !ty.is_error() {
            self.report(
                Diagnostic::error(ErrorCode::E2024)
                    .with_message(format!(
                        "`{name}` has type `{}` but overrides a member of type `{}`",
                        self.show(ty),
                        self.show(base_type)
                    ))
                    .with_label(span, "type differs from the overridden member")
                    .with_secondary_label(base_span, "overridden member declared here"),
            );
        }
        if self.has_flag(base, SymbolFlags::PURE) != self.has_flag(symbol, SymbolFlags::PURE) {
            self.report(
                Diagnostic::error(ErrorCode::E2025)
                    .with_message(format!("`{name}` and the member it overrides differ in purity"))
                    .with_label(span, "purity differs")
                    .with_secondary_label(base_span, "overridden member declared here"),
            );
        }
        self.symbols[symbol].flags |= SymbolFlags::VIRTUAL;
    }
}
