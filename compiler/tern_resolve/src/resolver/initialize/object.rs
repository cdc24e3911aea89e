//! Classes, interfaces and enums.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{Name, NodeId, NodeKind, SymbolId, TypeId};
use tern_types::{Member, MemberId, SymbolFlags, SymbolKind, TypeKind};

use crate::resolver::Resolver;

impl Resolver<'_> {
    #[tracing::instrument(level = "debug", skip_all, fields(name = self.symbol_name(symbol)))]
    pub(super) fn initialize_object(&mut self, symbol: SymbolId) {
        self.validate_modifiers(symbol);
        let ty = self.symbols[symbol].ty_or_error();
        let is_class = self.symbols[symbol].kind == SymbolKind::Class;

        let bases = self.resolve_bases(symbol, is_class);
        self.types.set_relevant_types(ty, bases.clone());
        self.inherit_members(symbol, ty, &bases);

        let imported = self.has_flag(symbol, SymbolFlags::IMPORT);
        if is_class && !imported && self.types.find_member(ty, self.names.constructor).is_none() {
            self.generate_default_constructor(symbol);
        }
        self.types.complete(ty);
        self.register_operator_overloads(ty);

        if is_class && !imported && !self.has_flag(symbol, SymbolFlags::ABSTRACT) {
            self.check_abstract_members(symbol, ty);
        }
    }

    /// Resolve the base list of an object, reporting illegal bases.
    fn resolve_bases(&mut self, symbol: SymbolId, is_class: bool) -> Vec<TypeId> {
        let Some(primary) = self.symbols[symbol].node else {
            return Vec::new();
        };
        let NodeKind::Object { bases, .. } = self.nodes.kind(primary) else {
            return Vec::new();
        };
        let bases = bases.clone();
        // Bases see the type parameters but not the object's own members.
        let scope = self.symbols[symbol]
            .own_scope
            .and_then(|s| self.scopes.get(s).parent)
            .unwrap_or(self.global_scope);

        let mut resolved = Vec::with_capacity(bases.len());
        for (index, base) in bases.into_iter().enumerate() {
            let base_ty = self.with_scope(scope, |r| r.resolve_type(base));
            if base_ty.is_error() {
                continue;
            }
            let kind = self.types.kind(base_ty);
            let legal = match kind {
                TypeKind::Class => is_class && index == 0,
                TypeKind::Interface => true,
                _ => false,
            };
            if !legal {
                let note = if is_class {
                    "a class may extend one class, written first, and any number of interfaces"
                } else {
                    "an interface may only extend interfaces"
                };
                self.report(
                    Diagnostic::error(ErrorCode::E2009)
                        .with_message(format!(
                            "`{}` cannot be a base of `{}`",
                            self.show(base_ty),
                            self.symbol_name(symbol)
                        ))
                        .with_label(self.span(base), "invalid base type")
                        .with_note(note),
                );
                continue;
            }
            let Some(base_symbol) = self.types.symbol(base_ty) else {
                continue;
            };
            if kind == TypeKind::Class && self.has_flag(base_symbol, SymbolFlags::FINAL) {
                self.report(
                    Diagnostic::error(ErrorCode::E2010)
                        .with_message(format!("cannot extend final class `{}`", self.show(base_ty)))
                        .with_label(self.span(base), "final class")
                        .with_secondary_label(self.symbols[base_symbol].span, "declared final here"),
                );
                continue;
            }
            // Strict: a base reaching back to this object is a cycle.
            self.initialize_symbol(base_symbol);
            if self.cyclic.contains(&symbol) || self.symbols[base_symbol].ty_or_error().is_error() {
                continue;
            }
            resolved.push(base_ty);
        }
        resolved
    }

    /// Add inherited members to `ty`'s member table.
    ///
    /// A name inherited from one base becomes a member depending on the base
    /// member. A name inherited from several bases becomes an `Unmerged`
    /// symbol, classified when initialized. An own member with an inherited
    /// name records the base member it overrides.
    fn inherit_members(&mut self, symbol: SymbolId, ty: TypeId, bases: &[TypeId]) {
        let own: Vec<(Name, MemberId)> = self.types.members_of(ty);
        let mut order: Vec<Name> = Vec::new();
        let mut inherited: FxHashMap<Name, SmallVec<[MemberId; 2]>> = FxHashMap::default();

        for &base in bases {
            for (name, member) in self.types.members_of(base) {
                if name == self.names.constructor {
                    continue;
                }
                if let Some(&(_, own_member)) = own.iter().find(|(n, _)| *n == name) {
                    let own_symbol = self.types.member(own_member).symbol;
                    let current = &mut self.symbols[own_symbol];
                    if current.kind.is_function() && current.overridden_member.is_none() {
                        current.overridden_member = Some(member);
                    }
                    continue;
                }
                let candidates = inherited.entry(name).or_insert_with(|| {
                    order.push(name);
                    SmallVec::new()
                });
                if !candidates.contains(&member) {
                    candidates.push(member);
                }
            }
        }

        let span = self.symbols[symbol].span;
        let own_scope = self.symbols[symbol].own_scope;
        for name in order {
            let Some(candidates) = inherited.remove(&name) else {
                continue;
            };
            let member = if let [single] = candidates.as_slice() {
                let base_symbol = self.types.member(*single).symbol;
                Member::dependent(base_symbol, *single, None)
            } else {
                let unmerged = self.new_symbol(name, SymbolKind::Unmerged, span);
                let current = &mut self.symbols[unmerged];
                current.enclosing = Some(symbol);
                current.scope = own_scope;
                current.identical_members = candidates.to_vec();
                tracing::debug!(
                    name = self.interner.lookup(name),
                    candidates = candidates.len(),
                    "unmerged member"
                );
                Member::own(unmerged)
            };
            let member = self.types.new_member(member);
            self.types.set_member(ty, name, member);
        }
    }

    /// Initialize own functions carrying annotations so `@Operator`
    /// overloads are registered before the type is used.
    fn register_operator_overloads(&mut self, ty: TypeId) {
        for (_, member) in self.types.members_of(ty) {
            if self.types.member(member).is_inherited() {
                continue;
            }
            let function = self.types.member(member).symbol;
            if self.symbols[function].kind != SymbolKind::InstanceFunction {
                continue;
            }
            let annotated = self.fragments_of(function).into_iter().any(|f| {
                self.nodes
                    .kind(f)
                    .header()
                    .is_some_and(|h| !h.annotations.is_empty())
            });
            if annotated {
                self.initialize_if_fresh(function);
            }
        }
    }

    /// Report abstract members a concrete class leaves unimplemented.
    fn check_abstract_members(&mut self, symbol: SymbolId, ty: TypeId) {
        for (name, member) in self.types.members_of(ty) {
            let candidate = self.types.member(member).symbol;
            if self.symbols[candidate].kind == SymbolKind::Unmerged {
                self.initialize_symbol(candidate);
            }
            let target = self.symbols.resolve_forwarding(candidate);
            if !self.has_flag(target, SymbolFlags::ABSTRACT) {
                continue;
            }
            let class = self.symbol_name(symbol);
            let name = self.interner.lookup(name);
            self.report(
                Diagnostic::error(ErrorCode::E2027)
                    .with_message(format!("`{class}` does not implement abstract member `{name}`"))
                    .with_label(self.symbols[symbol].span, "missing implementation")
                    .with_secondary_label(self.symbols[target].span, "declared abstract here")
                    .with_note("implement the member or mark the class `abstract`"),
            );
        }
    }

    // ========================================
    // Enums
    // ========================================

    #[tracing::instrument(level = "debug", skip_all, fields(name = self.symbol_name(symbol)))]
    pub(super) fn initialize_enum(&mut self, symbol: SymbolId) {
        self.validate_modifiers(symbol);
        let ty = self.symbols[symbol].ty_or_error();
        let values = self.enum_values(symbol);
        for &value in &values {
            self.initialize_symbol(value);
        }
        let imported = self.has_flag(symbol, SymbolFlags::IMPORT);
        if !imported && self.types.find_member(ty, self.names.to_string).is_none() {
            self.generate_enum_to_string(symbol, &values);
        }
        self.types.complete(ty);
        self.register_operator_overloads(ty);
    }

    /// Value symbols of an enum in declaration order.
    pub(crate) fn enum_values(&self, symbol: SymbolId) -> Vec<SymbolId> {
        let mut values = Vec::new();
        for fragment in self.fragments_of(symbol) {
            let block = match self.nodes.kind(fragment) {
                NodeKind::Enum { block, .. } | NodeKind::Extension { block, .. } => *block,
                _ => continue,
            };
            values.extend(
                self.block_statements(block)
                    .into_iter()
                    .filter(|&s| matches!(self.nodes.kind(s), NodeKind::Variable { .. }))
                    .filter_map(|s: NodeId| self.nodes[s].symbol)
                    .filter(|&s| self.symbols[s].kind == SymbolKind::EnumValue),
            );
        }
        values
    }
}
