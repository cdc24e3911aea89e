//! Classification of members inherited from several bases.
//!
//! | Candidates                                   | Result                    |
//! |----------------------------------------------|---------------------------|
//! | one underlying symbol, one type              | `Forwarded` to it         |
//! | some non-virtual, none instance members      | `Ambiguous`               |
//! | some non-virtual, an instance member among   | error: cannot merge       |
//! | all virtual, types differ                    | error: ambiguous type     |
//! | all virtual, same type                       | `MergedInstanceFunction`  |

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{SymbolId, TypeId};
use tern_types::{SymbolFlags, SymbolKind};

use crate::resolver::Resolver;

impl Resolver<'_> {
    pub(super) fn initialize_unmerged(&mut self, symbol: SymbolId) {
        let candidates = self.symbols[symbol].identical_members.clone();
        let mut targets = Vec::with_capacity(candidates.len());
        let mut types = Vec::with_capacity(candidates.len());
        for &member in &candidates {
            types.push(self.member_type(member));
            targets.push(self.member_symbol(member));
        }
        let name = self.symbol_name(symbol);
        let span = self.symbols[symbol].span;
        let Some((&first_target, &first_type)) = targets.first().zip(types.first()) else {
            return;
        };

        if targets.iter().all(|&t| t == first_target) && types.iter().all(|&t| t == first_type) {
            let current = &mut self.symbols[symbol];
            current.kind = SymbolKind::Forwarded;
            current.forwarded_to = Some(first_target);
            current.ty = Some(first_type);
            tracing::debug!(name, "merged as forwarded");
            return;
        }

        if targets.iter().any(|&t| !self.has_flag(t, SymbolFlags::VIRTUAL)) {
            if targets.iter().all(|&t| !self.symbols[t].kind.is_instance_member()) {
                self.symbols[symbol].kind = SymbolKind::Ambiguous;
                self.symbols[symbol].ty = Some(TypeId::ERROR);
                tracing::debug!(name, "merged as ambiguous");
                return;
            }
            let mut diagnostic = Diagnostic::error(ErrorCode::E2019)
                .with_message(format!("cannot merge the inherited members named `{name}`"))
                .with_label(span, "inherits conflicting members")
                .with_note("only virtual functions of the same type can be merged");
            for &target in &targets {
                diagnostic = diagnostic.with_secondary_label(self.symbols[target].span, "candidate");
            }
            self.report(diagnostic);
            self.symbols[symbol].ty = Some(TypeId::ERROR);
            return;
        }

        if types.iter().any(|&t| t != first_type) {
            let listed: Vec<String> = types.iter().map(|&t| format!("`{}`", self.show(t))).collect();
            self.report(
                Diagnostic::error(ErrorCode::E2020)
                    .with_message(format!("inherited members named `{name}` disagree on their type"))
                    .with_label(span, "ambiguous merged type")
                    .with_note(format!("candidate types: {}", listed.join(", "))),
            );
            self.symbols[symbol].ty = Some(TypeId::ERROR);
            return;
        }

        let all_abstract = targets.iter().all(|&t| self.has_flag(t, SymbolFlags::ABSTRACT));
        let first_pure = self.has_flag(first_target, SymbolFlags::PURE);
        if targets.iter().any(|&t| self.has_flag(t, SymbolFlags::PURE) != first_pure) {
            self.report(
                Diagnostic::error(ErrorCode::E2021)
                    .with_message(format!("inherited members named `{name}` disagree on purity"))
                    .with_label(span, "merged here"),
            );
        }
        let mut flags = SymbolFlags::VIRTUAL;
        if all_abstract {
            flags |= SymbolFlags::ABSTRACT;
        }
        if first_pure {
            flags |= SymbolFlags::PURE;
        }
        let current = &mut self.symbols[symbol];
        current.kind = SymbolKind::MergedInstanceFunction;
        current.flags |= flags;
        current.ty = Some(first_type);
        tracing::debug!(name, all_abstract, "merged instance function");
    }
}
