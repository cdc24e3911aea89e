//! Operator overload resolution.
//!
//! Overloads are functions registered with `@Operator("…")` on the operand
//! type or one of its bases. Each candidate is ranked against the argument
//! types; a unique best match rewrites the operator node in place:
//!
//! ```text
//! a + b        =>  a.add(b)
//! a[i]         =>  a.get(i)
//! a[i] = v     =>  a.set(i, v)
//! x in a       =>  a.contains(x)
//! a < b        =>  a.compare(b) < 0
//! ```

use rustc_hash::FxHashSet;
use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{NodeId, NodeKind, SymbolId, TypeId};
use tern_types::OverloadKind;

use crate::resolver::Resolver;

/// How well a candidate's arguments accept the given argument types.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
enum MatchRank {
    None,
    Inexact,
    Exact,
}

/// A registered overload reachable from the receiver type.
#[derive(Copy, Clone, Debug)]
struct Candidate {
    function: SymbolId,
    /// Function type as seen from the receiver type.
    ty: TypeId,
}

impl Resolver<'_> {
    /// Overloads of `kind` on `receiver` and its bases, as members of `receiver`.
    fn overload_candidates(&mut self, receiver: TypeId, kind: OverloadKind) -> Vec<Candidate> {
        if receiver.is_error() || !(self.types.kind(receiver).is_object() || self.types.is_enum(receiver)) {
            return Vec::new();
        }
        self.ensure_members(receiver);

        let mut pending = vec![receiver];
        let mut visited = FxHashSet::default();
        let mut seen = FxHashSet::default();
        let mut candidates = Vec::new();
        while let Some(ty) = pending.pop() {
            if !visited.insert(ty) {
                continue;
            }
            pending.extend(self.types.get(ty).relevant_types.iter().copied());
            let Some(owner) = self.types.symbol(ty) else {
                continue;
            };
            self.initialize_if_fresh(owner);
            let registered = self.symbols[owner]
                .overloads
                .get(&kind)
                .cloned()
                .unwrap_or_default();
            for function in registered {
                let name = self.symbols[function].name;
                let Some(member) = self.types.find_member(receiver, name) else {
                    continue;
                };
                let target = self.member_symbol(member);
                if !seen.insert(target) {
                    continue;
                }
                let ty = self.member_type(member);
                if !ty.is_error() {
                    candidates.push(Candidate {
                        function: target,
                        ty,
                    });
                }
            }
        }
        candidates
    }

    /// Expected type of argument `index` when exactly one overload exists.
    pub(super) fn overload_argument_context(
        &mut self,
        receiver: TypeId,
        kind: OverloadKind,
        index: usize,
    ) -> Option<TypeId> {
        match self.overload_candidates(receiver, kind).as_slice() {
            [only] => self.types.function_arguments(only.ty).get(index).copied(),
            _ => None,
        }
    }

    fn rank(&self, function_type: TypeId, arguments: &[TypeId]) -> MatchRank {
        let expected = self.types.function_arguments(function_type);
        if expected.len() != arguments.len() {
            return MatchRank::None;
        }
        let mut rank = MatchRank::Exact;
        for (&want, &have) in expected.iter().zip(arguments) {
            if want == have {
                continue;
            }
            if !self.types.can_implicitly_convert(have, want) {
                return MatchRank::None;
            }
            rank = MatchRank::Inexact;
        }
        rank
    }

    /// Rewrite `node` into a call of the best `kind` overload on `receiver`.
    ///
    /// `receiver` and `arguments` must already be resolved. Returns `None`
    /// if the receiver type has no overload of this kind at all, leaving the
    /// node untouched; otherwise returns the type of the rewritten node, or
    /// the error type after reporting a failed match.
    pub(super) fn resolve_operator_call(
        &mut self,
        node: NodeId,
        kind: OverloadKind,
        receiver: NodeId,
        arguments: &[NodeId],
    ) -> Option<TypeId> {
        let receiver_ty = self.type_of(receiver);
        let candidates = self.overload_candidates(receiver_ty, kind);
        if candidates.is_empty() {
            return None;
        }
        let argument_types: Vec<TypeId> = arguments.iter().map(|&a| self.type_of(a)).collect();
        if argument_types.iter().any(|t| t.is_error()) {
            return Some(TypeId::ERROR);
        }

        let ranked: Vec<(MatchRank, Candidate)> = candidates
            .iter()
            .map(|&c| (self.rank(c.ty, &argument_types), c))
            .collect();
        let best = ranked.iter().map(|(rank, _)| *rank).max().unwrap_or(MatchRank::None);
        let listed: Vec<String> = argument_types.iter().map(|&t| self.show(t)).collect();
        if best == MatchRank::None {
            self.report(
                Diagnostic::error(ErrorCode::E2030)
                    .with_message(format!(
                        "no `{}` overload on `{}` accepts ({})",
                        kind.token(),
                        self.show(receiver_ty),
                        listed.join(", ")
                    ))
                    .with_label(self.span(node), "no matching operator"),
            );
            return Some(TypeId::ERROR);
        }
        let winners: Vec<Candidate> = ranked
            .into_iter()
            .filter(|(rank, _)| *rank == best)
            .map(|(_, c)| c)
            .collect();
        let [winner] = winners.as_slice() else {
            let mut diagnostic = Diagnostic::error(ErrorCode::E2031)
                .with_message(format!(
                    "ambiguous `{}` overload on `{}` for ({})",
                    kind.token(),
                    self.show(receiver_ty),
                    listed.join(", ")
                ))
                .with_label(self.span(node), "several overloads match equally well");
            for candidate in &winners {
                diagnostic =
                    diagnostic.with_secondary_label(self.symbols[candidate.function].span, "candidate");
            }
            self.report(diagnostic);
            return Some(TypeId::ERROR);
        };
        let winner = *winner;

        tracing::debug!(
            operator = kind.token(),
            function = self.symbol_name(winner.function),
            ?best,
            "operator overload selected"
        );
        Some(self.rewrite_as_call(node, kind, receiver, arguments, winner))
    }

    fn rewrite_as_call(
        &mut self,
        node: NodeId,
        kind: OverloadKind,
        receiver: NodeId,
        arguments: &[NodeId],
        winner: Candidate,
    ) -> TypeId {
        let span = self.span(node);
        let name = self.symbols[winner.function].name;
        let callee = self.nodes.alloc(
            NodeKind::Dot {
                target: Some(receiver),
                name,
            },
            span,
        );
        self.nodes[callee].symbol = Some(winner.function);
        self.set_type(callee, winner.ty);

        let expected = self.types.function_arguments(winner.ty).to_vec();
        for (&argument, &want) in arguments.iter().zip(&expected) {
            self.convert_to(argument, want);
        }
        let result = self.types.function_result(winner.ty).unwrap_or(TypeId::ERROR);
        let call = NodeKind::Call {
            target: callee,
            arguments: arguments.to_vec(),
        };

        if kind != OverloadKind::Compare {
            self.nodes.replace(node, call);
            return result;
        }
        let NodeKind::Binary { op, .. } = *self.nodes.kind(node) else {
            panic!("comparison overload on a {}", self.nodes.kind(node).describe());
        };
        let call = self.nodes.alloc(call, span);
        self.set_type(call, result);
        let zero = self.nodes.alloc(NodeKind::Int(0), span);
        self.set_type(zero, TypeId::INT);
        if result != TypeId::INT {
            self.convert_to(call, TypeId::INT);
        }
        self.nodes.replace(
            node,
            NodeKind::Binary {
                op,
                left: call,
                right: zero,
            },
        );
        TypeId::BOOL
    }

    /// Report an operator that has neither a built-in rule nor an overload.
    pub(super) fn report_operator_mismatch(&mut self, node: NodeId, operator: &str, operands: &[TypeId]) {
        if operands.iter().any(|t| t.is_error()) {
            return;
        }
        let listed: Vec<String> = operands.iter().map(|&t| format!("`{}`", self.show(t))).collect();
        self.report(
            Diagnostic::error(ErrorCode::E2032)
                .with_message(format!(
                    "operator `{operator}` does not apply to {}",
                    listed.join(" and ")
                ))
                .with_label(self.span(node), "no built-in rule or overload"),
        );
    }
}
