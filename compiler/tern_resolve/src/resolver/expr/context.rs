//! Context-typed expressions: list and map literals and hooks.

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{NodeId, NodeKind, TypeId, UnaryOp};

use crate::resolver::Resolver;

impl Resolver<'_> {
    /// Whether `node` can only be typed with help from its context.
    pub(super) fn needs_context(&self, node: NodeId) -> bool {
        match self.nodes.kind(node) {
            NodeKind::List { .. } | NodeKind::Map { .. } | NodeKind::Hook { .. } => true,
            NodeKind::Dot { target: None, .. } => true,
            NodeKind::Unary {
                op: UnaryOp::Complement,
                value,
            } => self.needs_context(*value),
            _ => false,
        }
    }

    /// Substitutions of `ty` if it is an instantiation of `generic`.
    fn substitutions_of(&self, ty: Option<TypeId>, generic: TypeId) -> Option<Vec<TypeId>> {
        let ty = self.types.get(ty?);
        if ty.generic != Some(generic) {
            return None;
        }
        ty.substitutions.as_deref().map(<[TypeId]>::to_vec)
    }

    pub(super) fn resolve_list(&mut self, node: NodeId, values: &[NodeId], context: Option<TypeId>) -> TypeId {
        let element = match self.substitutions_of(context, TypeId::LIST).as_deref() {
            Some(&[element]) => Some(element),
            _ => None,
        };
        let element = match element {
            Some(element) => {
                for &value in values {
                    self.resolve_value(value, Some(element));
                    self.convert_to(value, element);
                }
                element
            }
            None => match self.infer_common_type(node, values, "list") {
                Some(element) => element,
                None => return TypeId::ERROR,
            },
        };
        if element.is_error() {
            return TypeId::ERROR;
        }
        self.types.parameterize(TypeId::LIST, &[element])
    }

    pub(super) fn resolve_map(&mut self, node: NodeId, entries: &[NodeId], context: Option<TypeId>) -> TypeId {
        let pairs: Vec<(NodeId, NodeId, NodeId)> = entries
            .iter()
            .map(|&entry| match self.nodes.kind(entry) {
                NodeKind::Pair { key, value } => (entry, *key, *value),
                other => panic!("map entry is a {}", other.describe()),
            })
            .collect();

        let (key, value) = match self.substitutions_of(context, TypeId::MAP).as_deref() {
            Some(&[key, value]) => {
                for &(entry, k, v) in &pairs {
                    self.resolve_value(k, Some(key));
                    self.convert_to(k, key);
                    self.resolve_value(v, Some(value));
                    self.convert_to(v, value);
                    self.set_type(entry, value);
                }
                (key, value)
            }
            _ => {
                let keys: Vec<NodeId> = pairs.iter().map(|&(_, k, _)| k).collect();
                let values: Vec<NodeId> = pairs.iter().map(|&(_, _, v)| v).collect();
                let key = self.infer_common_type(node, &keys, "map");
                let value = if key.is_some() {
                    self.infer_common_type(node, &values, "map")
                } else {
                    None
                };
                for &(entry, _, _) in &pairs {
                    self.set_type(entry, value.unwrap_or(TypeId::ERROR));
                }
                match key.zip(value) {
                    Some(types) => types,
                    None => return TypeId::ERROR,
                }
            }
        };
        if key.is_error() || value.is_error() {
            return TypeId::ERROR;
        }
        self.types.parameterize(TypeId::MAP, &[key, value])
    }

    /// Resolve literal elements without context and convert them to the
    /// type they all share.
    fn infer_common_type(&mut self, literal: NodeId, values: &[NodeId], what: &str) -> Option<TypeId> {
        let Some(&first) = values.first() else {
            self.report_uninferable(literal, what);
            return None;
        };
        let mut common = self.resolve_value(first, None);
        for &value in &values[1..] {
            let ty = self.resolve_value(value, None);
            match self.types.common_implicit_type(common, ty) {
                Some(next) => common = next,
                None => {
                    self.report(
                        Diagnostic::error(ErrorCode::E2001)
                            .with_message(format!(
                                "{what} elements have no common type: `{}` and `{}`",
                                self.show(common),
                                self.show(ty)
                            ))
                            .with_label(self.span(value), "incompatible element"),
                    );
                    return Some(TypeId::ERROR);
                }
            }
        }
        if common == TypeId::NULL || common == TypeId::VOID {
            self.report_uninferable(literal, what);
            return Some(TypeId::ERROR);
        }
        for &value in values {
            self.convert_to(value, common);
        }
        Some(common)
    }

    fn report_uninferable(&mut self, node: NodeId, what: &str) {
        self.report(
            Diagnostic::error(ErrorCode::E2012)
                .with_message(format!("cannot infer the element type of this {what} literal"))
                .with_label(self.span(node), "element type unknown")
                .with_note("give the literal an expected type, e.g. through a declared variable"),
        );
    }

    pub(super) fn resolve_hook(
        &mut self,
        test: NodeId,
        yes: NodeId,
        no: NodeId,
        context: Option<TypeId>,
    ) -> TypeId {
        self.resolve_condition(test);
        let (yes_ty, no_ty) = if context.is_none() && self.needs_context(yes) && !self.needs_context(no) {
            let no_ty = self.resolve_value(no, None);
            let yes_ty = self.resolve_value(yes, Some(no_ty));
            (yes_ty, no_ty)
        } else {
            let yes_ty = self.resolve_value(yes, context);
            let no_ty = self.resolve_value(no, context.or(Some(yes_ty)));
            (yes_ty, no_ty)
        };
        if yes_ty.is_error() || no_ty.is_error() {
            return TypeId::ERROR;
        }
        let Some(common) = self.types.common_implicit_type(yes_ty, no_ty) else {
            self.report(
                Diagnostic::error(ErrorCode::E2001)
                    .with_message(format!(
                        "branches of `?:` have no common type: `{}` and `{}`",
                        self.show(yes_ty),
                        self.show(no_ty)
                    ))
                    .with_label(self.span(no), "incompatible branch")
                    .with_secondary_label(self.span(yes), "other branch"),
            );
            return TypeId::ERROR;
        };
        self.convert_to(yes, common);
        self.convert_to(no, common);
        common
    }
}
