//! Calls, `new`, `super(...)` and indexing.

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{NodeId, NodeKind, SymbolId, TypeId};
use tern_types::{OverloadKind, SymbolFlags, SymbolKind, TypeKind};

use crate::resolver::Resolver;

impl Resolver<'_> {
    pub(super) fn resolve_call(&mut self, node: NodeId, target: NodeId, arguments: &[NodeId]) -> TypeId {
        let callee_ty = self.resolve_value(target, None);
        if callee_ty.is_error() {
            self.resolve_arguments(arguments, &[]);
            return TypeId::ERROR;
        }
        if self.types.kind(callee_ty) != TypeKind::Function {
            self.report(
                Diagnostic::error(ErrorCode::E2034)
                    .with_message(format!("`{}` is not callable", self.show(callee_ty)))
                    .with_label(self.span(target), "not a function"),
            );
            self.resolve_arguments(arguments, &[]);
            return TypeId::ERROR;
        }
        let callee = self.nodes[target].symbol;

        let inferable = self.inferable_parameters(target, callee_ty);
        let callee_ty = if inferable.is_empty() {
            let expected = self.types.function_arguments(callee_ty).to_vec();
            self.resolve_arguments(arguments, &expected);
            callee_ty
        } else {
            self.resolve_arguments(arguments, &[]);
            let inferred = self.infer_type_arguments(node, callee, callee_ty, &inferable, arguments);
            self.set_type(target, inferred)
        };
        if callee_ty.is_error() {
            return TypeId::ERROR;
        }

        let result = self.types.function_result(callee_ty).unwrap_or(TypeId::ERROR);
        let expected = self.types.function_arguments(callee_ty).to_vec();
        let what = callee.map_or("function", |s| self.symbol_name(s));
        self.check_arguments(node, what, &expected, arguments);
        self.check_call_purity(node, callee);
        result
    }

    /// Type parameters of a generic callee that its type still mentions.
    fn inferable_parameters(&self, target: NodeId, callee_ty: TypeId) -> Vec<TypeId> {
        if matches!(self.nodes.kind(target), NodeKind::Parameterize { .. }) {
            return Vec::new();
        }
        let Some(callee) = self.nodes[target].symbol else {
            return Vec::new();
        };
        if !self.types.mentions_parameter(callee_ty) {
            return Vec::new();
        }
        self.symbols[callee]
            .parameters
            .iter()
            .map(|&p| self.symbols[p].ty_or_error())
            .collect()
    }

    /// Bind each type parameter from the first argument declared with exactly
    /// that parameter type, then substitute the callee type.
    fn infer_type_arguments(
        &mut self,
        node: NodeId,
        callee: Option<SymbolId>,
        callee_ty: TypeId,
        parameters: &[TypeId],
        arguments: &[NodeId],
    ) -> TypeId {
        let declared = self.types.function_arguments(callee_ty).to_vec();
        let mut bound: Vec<Option<TypeId>> = vec![None; parameters.len()];
        for (&want, &argument) in declared.iter().zip(arguments) {
            let Some(index) = parameters.iter().position(|&p| p == want) else {
                continue;
            };
            let have = self.type_of(argument);
            bound[index] = match bound[index] {
                None => Some(have),
                Some(previous) => self.types.common_implicit_type(previous, have).or(Some(previous)),
            };
        }

        let mut substitutions = Vec::with_capacity(parameters.len());
        for (&parameter, binding) in parameters.iter().zip(bound) {
            match binding {
                Some(ty) if ty.is_error() => return TypeId::ERROR,
                Some(ty) if ty != TypeId::NULL && ty != TypeId::VOID => substitutions.push(ty),
                _ => {
                    let function = callee.map_or("function", |s| self.symbol_name(s));
                    self.report(
                        Diagnostic::error(ErrorCode::E2012)
                            .with_message(format!(
                                "cannot infer type argument `{}` of `{function}`",
                                self.show(parameter)
                            ))
                            .with_label(self.span(node), "type argument unknown")
                            .with_note("pass the type arguments explicitly"),
                    );
                    return TypeId::ERROR;
                }
            }
        }
        tracing::debug!(?substitutions, "inferred type arguments");
        self.types.substitute(callee_ty, parameters, &substitutions)
    }

    /// Resolve argument values, using the declared argument types as context.
    fn resolve_arguments(&mut self, arguments: &[NodeId], expected: &[TypeId]) {
        for (index, &argument) in arguments.iter().enumerate() {
            self.resolve_value(argument, expected.get(index).copied());
        }
    }

    /// Check the argument count and convert resolved arguments.
    fn check_arguments(&mut self, node: NodeId, what: &str, expected: &[TypeId], arguments: &[NodeId]) {
        if expected.len() != arguments.len() {
            self.report(
                Diagnostic::error(ErrorCode::E2035)
                    .with_message(format!(
                        "`{what}` takes {} argument(s) but {} were supplied",
                        expected.len(),
                        arguments.len()
                    ))
                    .with_label(self.span(node), "wrong number of arguments"),
            );
            return;
        }
        for (&argument, &want) in arguments.iter().zip(expected) {
            self.convert_to(argument, want);
        }
    }

    /// Report a call from a pure function to a function that may have effects.
    fn check_call_purity(&mut self, node: NodeId, callee: Option<SymbolId>) {
        let Some(function) = self.cx.function else {
            return;
        };
        if !self.has_flag(function, SymbolFlags::PURE) {
            return;
        }
        if callee.is_some_and(|c| self.is_pure_callee(c)) {
            return;
        }
        let name = callee.map_or("this function", |c| self.symbol_name(c));
        self.report(
            Diagnostic::error(ErrorCode::E2015)
                .with_message(format!(
                    "pure function `{}` calls `{name}`, which is not pure",
                    self.symbol_name(function)
                ))
                .with_label(self.span(node), "impure call"),
        );
    }

    /// Functions a pure function may call.
    pub(crate) fn is_pure_callee(&self, callee: SymbolId) -> bool {
        self.symbols[callee].kind.is_function()
            && self.symbols[callee]
                .flags
                .intersects(SymbolFlags::PURE | SymbolFlags::IMPORT)
    }

    pub(super) fn resolve_new(&mut self, node: NodeId, ty: NodeId, arguments: &[NodeId]) -> TypeId {
        let object = self.resolve_type(ty);
        if object.is_error() {
            self.resolve_arguments(arguments, &[]);
            return TypeId::ERROR;
        }
        self.ensure_members(object);
        let kind = self.types.kind(object);
        let is_abstract = self
            .types
            .symbol(object)
            .is_some_and(|s| self.has_flag(s, SymbolFlags::ABSTRACT));
        if kind == TypeKind::Interface || (kind == TypeKind::Class && is_abstract) {
            self.report(
                Diagnostic::error(ErrorCode::E2028)
                    .with_message(format!("cannot instantiate abstract type `{}`", self.show(object)))
                    .with_label(self.span(node), "abstract")
                    .with_note("instantiate a concrete class that implements it"),
            );
            self.resolve_arguments(arguments, &[]);
            return object;
        }
        if kind != TypeKind::Class {
            self.report(
                Diagnostic::error(ErrorCode::E2006)
                    .with_message(format!("`{}` cannot be created with `new`", self.show(object)))
                    .with_label(self.span(ty), "not a class"),
            );
            self.resolve_arguments(arguments, &[]);
            return TypeId::ERROR;
        }

        let Some(member) = self.types.find_member(object, self.names.constructor) else {
            self.report(
                Diagnostic::error(ErrorCode::E2034)
                    .with_message(format!("`{}` has no constructor", self.show(object)))
                    .with_label(self.span(node), "cannot construct"),
            );
            self.resolve_arguments(arguments, &[]);
            return object;
        };
        let constructor = self.member_symbol(member);
        let constructor_ty = self.member_type(member);
        self.nodes[node].symbol = Some(constructor);
        self.check_access(node, constructor);

        let expected = self.types.function_arguments(constructor_ty).to_vec();
        self.resolve_arguments(arguments, &expected);
        if !constructor_ty.is_error() {
            let what = self.show(object);
            self.check_arguments(node, &what, &expected, arguments);
        }
        self.check_call_purity(node, Some(constructor));
        object
    }

    pub(super) fn resolve_super_call(&mut self, node: NodeId, arguments: &[NodeId]) -> TypeId {
        let Some(base_constructor) = self.base_constructor(node) else {
            self.resolve_arguments(arguments, &[]);
            return TypeId::ERROR;
        };
        let (constructor, constructor_ty) = base_constructor;
        self.nodes[node].symbol = Some(constructor);
        let expected = self.types.function_arguments(constructor_ty).to_vec();
        self.resolve_arguments(arguments, &expected);
        if !constructor_ty.is_error() {
            self.check_arguments(node, "super", &expected, arguments);
        }
        self.check_call_purity(node, Some(constructor));
        TypeId::VOID
    }

    /// Base class constructor a `super(...)` call at `node` refers to.
    fn base_constructor(&mut self, node: NodeId) -> Option<(SymbolId, TypeId)> {
        let in_constructor = self
            .cx
            .function
            .is_some_and(|f| self.symbols[f].kind == SymbolKind::Constructor);
        let problem = if in_constructor {
            let object = self.cx.object.map_or(TypeId::ERROR, |o| self.symbols[o].ty_or_error());
            match self.types.base_class(object) {
                Some(base) => {
                    self.ensure_members(base);
                    match self.types.find_member(base, self.names.constructor) {
                        Some(member) => {
                            let constructor = self.member_symbol(member);
                            return Some((constructor, self.member_type(member)));
                        }
                        None => format!("base class `{}` has no constructor", self.show(base)),
                    }
                }
                None if object.is_error() => return None,
                None => format!("`{}` has no base class", self.show(object)),
            }
        } else {
            "`super` can only be called from a constructor".to_owned()
        };
        self.report(
            Diagnostic::error(ErrorCode::E2044)
                .with_message(problem)
                .with_label(self.span(node), "invalid `super` call"),
        );
        None
    }

    pub(super) fn resolve_index(&mut self, node: NodeId, target: NodeId, index: NodeId) -> TypeId {
        let target_ty = self.resolve_value(target, None);
        let context = self.overload_argument_context(target_ty, OverloadKind::Index, 0);
        let index_ty = self.resolve_value(index, context);
        if target_ty.is_error() || index_ty.is_error() {
            return TypeId::ERROR;
        }
        match self.resolve_operator_call(node, OverloadKind::Index, target, &[index]) {
            Some(ty) => ty,
            None => {
                self.report_operator_mismatch(node, "[]", &[target_ty, index_ty]);
                TypeId::ERROR
            }
        }
    }
}
