//! Lazy symbol initialization.
//!
//! Every symbol moves through `Uninitialized -> InProgress -> Done` exactly
//! once. Initialization resolves whatever the symbol's declaration refers to
//! (types, bases, constant values), initializing those symbols first, so a
//! symbol met again while `InProgress` is a dependency cycle:
//!
//! ```text
//! const a = b      initialize a ─▶ resolve `b` ─▶ initialize b
//! const b = a                          ▲                  │
//!                                      └── resolve `a` ◀──┘  a is InProgress: cycle
//! ```
//!
//! Every symbol on the cycle is reported and ends with the error type.

mod function;
mod merge;
mod object;
mod variable;

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{ModifierKind, NodeId, Span, SymbolId, TypeId};
use tern_types::{InitState, SymbolKind};

use super::Resolver;

impl Resolver<'_> {
    /// Initialize `symbol` unless it is already done.
    pub(crate) fn initialize_symbol(&mut self, symbol: SymbolId) {
        match self.symbols[symbol].state {
            InitState::Done => {}
            InitState::InProgress => self.report_cycle(symbol),
            InitState::Uninitialized => {
                tern_stack::ensure_sufficient_stack(|| self.initialize_fresh(symbol));
            }
        }
    }

    /// Initialize `symbol` only if nothing has started on it yet.
    ///
    /// Used where a symbol that is already initializing further up the stack
    /// is fine to see half-built, e.g. an object looked up from inside its
    /// own member's initializer.
    pub(crate) fn initialize_if_fresh(&mut self, symbol: SymbolId) {
        if self.symbols[symbol].state == InitState::Uninitialized {
            self.initialize_symbol(symbol);
        }
    }

    fn initialize_fresh(&mut self, symbol: SymbolId) {
        let kind = self.symbols[symbol].kind;
        tracing::trace!(name = self.symbol_name(symbol), ?kind, "initializing");
        self.symbols[symbol].begin_initialization();
        self.init_stack.push(symbol);

        let cx = self.declaration_context(symbol);
        self.with_context(cx, |r| r.initialize_kind(symbol, kind));

        self.init_stack.pop();
        if self.cyclic.contains(&symbol) || self.symbols[symbol].ty.is_none() {
            self.symbols[symbol].ty = Some(TypeId::ERROR);
        }
        self.symbols[symbol].finish_initialization();
        self.process_annotations(symbol);
        tracing::trace!(
            name = self.symbol_name(symbol),
            ty = %self.show(self.symbols[symbol].ty_or_error()),
            "initialized"
        );
    }

    fn initialize_kind(&mut self, symbol: SymbolId, kind: SymbolKind) {
        match kind {
            SymbolKind::Namespace => self.validate_modifiers(symbol),
            SymbolKind::Enum | SymbolKind::EnumFlags => self.initialize_enum(symbol),
            SymbolKind::Class | SymbolKind::Interface => self.initialize_object(symbol),
            SymbolKind::GlobalFunction
            | SymbolKind::InstanceFunction
            | SymbolKind::Constructor
            | SymbolKind::LocalFunction => self.initialize_function(symbol),
            SymbolKind::GlobalVariable
            | SymbolKind::InstanceVariable
            | SymbolKind::LocalVariable
            | SymbolKind::ArgumentVariable => self.initialize_variable(symbol),
            SymbolKind::EnumValue => self.initialize_enum_value(symbol),
            SymbolKind::TypeParameter => self.validate_modifiers(symbol),
            SymbolKind::Alias => self.initialize_alias(symbol),
            SymbolKind::Define => self.initialize_define(symbol),
            SymbolKind::Unmerged => self.initialize_unmerged(symbol),
            // Produced by merging, which assigns their type.
            SymbolKind::Forwarded | SymbolKind::MergedInstanceFunction | SymbolKind::Ambiguous => {}
            // An extension that never found its declaration.
            SymbolKind::Automatic => {}
        }
    }

    /// Report a dependency cycle closing at `symbol`.
    fn report_cycle(&mut self, symbol: SymbolId) {
        let Some(start) = self.init_stack.iter().rposition(|&s| s == symbol) else {
            return;
        };
        let members: Vec<SymbolId> = self.init_stack[start..].to_vec();
        let names: Vec<&str> = members.iter().map(|&s| self.symbol_name(s)).collect();
        let path = names.join("` -> `");
        for &member in &members {
            if !self.cyclic.insert(member) {
                continue;
            }
            let name = self.symbol_name(member);
            let span = self.symbols[member].span;
            self.report(
                Diagnostic::error(ErrorCode::E2004)
                    .with_message(format!("`{name}` depends on itself"))
                    .with_label(span, "part of a dependency cycle")
                    .with_note(format!("cycle: `{path}` -> `{}`", self.symbol_name(symbol))),
            );
        }
        self.symbols[symbol].ty = Some(TypeId::ERROR);
        tracing::debug!(name = self.symbol_name(symbol), length = members.len(), "cycle");
    }

    /// Every declaration node of `symbol`, primary first.
    pub(crate) fn fragments_of(&self, symbol: SymbolId) -> Vec<NodeId> {
        match self.symbols[symbol].node {
            Some(first) => self.nodes.fragments(first).collect(),
            None => Vec::new(),
        }
    }

    // ========================================
    // Modifiers
    // ========================================

    /// Check the modifiers written on each of `symbol`'s fragments.
    pub(crate) fn validate_modifiers(&mut self, symbol: SymbolId) {
        let kind = self.symbols[symbol].kind;
        let allowed = allowed_modifiers(kind);
        let mut written: Vec<(ModifierKind, Span)> = Vec::new();

        for fragment in self.fragments_of(symbol) {
            let Some(header) = self.nodes.kind(fragment).header() else {
                continue;
            };
            let modifiers = header.modifiers.clone();
            for (index, modifier) in modifiers.iter().enumerate() {
                if modifiers[..index].iter().any(|m| m.kind == modifier.kind) {
                    self.report(
                        Diagnostic::warning(ErrorCode::W2002)
                            .with_message(format!("`{}` is written more than once", modifier.kind))
                            .with_label(modifier.span, "duplicate modifier"),
                    );
                    continue;
                }
                if !allowed.contains(&modifier.kind) {
                    self.report(
                        Diagnostic::error(ErrorCode::E2005)
                            .with_message(format!(
                                "`{}` is not allowed on a {}",
                                modifier.kind,
                                kind.describe()
                            ))
                            .with_label(modifier.span, "not allowed here"),
                    );
                    continue;
                }
                written.push((modifier.kind, modifier.span));
            }
        }

        let visibilities: Vec<(ModifierKind, Span)> = written
            .iter()
            .copied()
            .filter(|(m, _)| {
                matches!(
                    m,
                    ModifierKind::Public | ModifierKind::Private | ModifierKind::Protected
                )
            })
            .collect();
        if let Some(&(first, _)) = visibilities.first() {
            if let Some(&(second, span)) = visibilities.iter().find(|(m, _)| *m != first) {
                self.report(
                    Diagnostic::error(ErrorCode::E2005)
                        .with_message(format!("`{first}` conflicts with `{second}`"))
                        .with_label(span, "conflicting visibility"),
                );
            }
        }
        let has = |kind: ModifierKind| written.iter().find(|(m, _)| *m == kind).map(|&(_, s)| s);
        if let (Some(_), Some(span)) = (has(ModifierKind::Abstract), has(ModifierKind::Final)) {
            self.report(
                Diagnostic::error(ErrorCode::E2005)
                    .with_message("`abstract` conflicts with `final`")
                    .with_label(span, "conflicting modifier"),
            );
        }
    }
}

/// Modifiers a declaration of `kind` may carry.
fn allowed_modifiers(kind: SymbolKind) -> &'static [ModifierKind] {
    use ModifierKind::{
        Abstract, Const, Export, Final, Import, Inline, Override, Private, Protected, Public,
        Pure, Static, Virtual,
    };
    match kind {
        SymbolKind::Namespace => &[Public, Private, Import, Export],
        SymbolKind::Class => &[Public, Private, Protected, Final, Abstract, Import, Export],
        SymbolKind::Interface | SymbolKind::Enum | SymbolKind::EnumFlags => {
            &[Public, Private, Protected, Import, Export]
        }
        SymbolKind::GlobalFunction => &[Public, Private, Protected, Pure, Static, Inline, Import, Export],
        SymbolKind::InstanceFunction => &[
            Public, Private, Protected, Pure, Final, Virtual, Override, Abstract, Inline, Import,
            Export,
        ],
        SymbolKind::Constructor => &[Public, Private, Protected, Pure, Inline, Import],
        SymbolKind::LocalFunction => &[Pure, Inline],
        SymbolKind::GlobalVariable => &[Public, Private, Protected, Const, Static, Import, Export],
        SymbolKind::InstanceVariable => &[Public, Private, Protected],
        SymbolKind::LocalVariable | SymbolKind::ArgumentVariable => &[Const],
        SymbolKind::Alias | SymbolKind::Define => &[Public, Private, Protected],
        SymbolKind::EnumValue
        | SymbolKind::TypeParameter
        | SymbolKind::Automatic
        | SymbolKind::Unmerged
        | SymbolKind::Forwarded
        | SymbolKind::Ambiguous
        | SymbolKind::MergedInstanceFunction => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifier_sets_follow_declaration_kind() {
        assert!(!allowed_modifiers(SymbolKind::InstanceVariable).contains(&ModifierKind::Const));
        assert!(allowed_modifiers(SymbolKind::InstanceFunction).contains(&ModifierKind::Override));
        assert!(!allowed_modifiers(SymbolKind::GlobalFunction).contains(&ModifierKind::Override));
        assert!(allowed_modifiers(SymbolKind::TypeParameter).is_empty());
    }
}
