//! Function bodies and statements.

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{NodeId, NodeKind, SymbolId, TypeId};
use tern_types::{Constant, ScopeKind, SymbolKind};

use super::{Context, Resolver};
use crate::fold::constant_of;

impl Resolver<'_> {
    /// Resolve the member initializers and body of a function.
    #[tracing::instrument(level = "debug", skip_all, fields(name = self.symbol_name(function)))]
    pub(crate) fn resolve_function_body(&mut self, function: SymbolId) {
        self.initialize_symbol(function);
        let Some(node) = self.symbols[function].node else {
            return;
        };
        let NodeKind::Function {
            initializers, body, ..
        } = self.nodes.kind(node)
        else {
            panic!("function body of a {}", self.nodes.kind(node).describe());
        };
        let (initializers, body) = (initializers.clone(), *body);
        let Some(body) = body else {
            return;
        };

        let kind = self.symbols[function].kind;
        let (object, is_static) = if kind == SymbolKind::LocalFunction {
            (self.cx.object, self.cx.is_static)
        } else {
            let is_static = !matches!(kind, SymbolKind::InstanceFunction | SymbolKind::Constructor);
            (self.enclosing_object(function), is_static)
        };
        let cx = Context {
            scope: self.symbols[function].own_scope.unwrap_or(self.global_scope),
            function: Some(function),
            object,
            is_static,
            loop_depth: 0,
            switch_depth: 0,
        };
        self.with_context(cx, |r| {
            for initializer in initializers {
                r.resolve_member_initializer(function, initializer);
            }
            r.resolve_block(body);
        });
    }

    fn resolve_member_initializer(&mut self, function: SymbolId, node: NodeId) {
        let NodeKind::MemberInitializer { name, value } = *self.nodes.kind(node) else {
            panic!("member initializer list holds a {}", self.nodes.kind(node).describe());
        };
        let object = self.cx.object.map(|o| self.symbols[o].ty_or_error());
        let target = object
            .filter(|_| self.symbols[function].kind == SymbolKind::Constructor)
            .and_then(|ty| self.types.find_member(ty, name))
            .map(|member| self.member_symbol(member))
            .filter(|&s| {
                self.symbols[s].kind == SymbolKind::InstanceVariable && self.symbols[s].enclosing == self.cx.object
            });
        let Some(target) = target else {
            self.report(
                Diagnostic::error(ErrorCode::E2045)
                    .with_message(format!(
                        "`{}` is not an instance variable this constructor can initialize",
                        self.interner.lookup(name)
                    ))
                    .with_label(self.span(node), "unknown member initializer"),
            );
            self.resolve_value(value, None);
            self.set_type(node, TypeId::ERROR);
            return;
        };
        self.initialize_symbol(target);
        let ty = self.symbols[target].ty_or_error();
        self.nodes[node].symbol = Some(target);
        self.set_type(node, ty);
        self.resolve_value(value, Some(ty));
        self.convert_to(value, ty);
    }

    /// Resolve a block in a fresh local scope.
    pub(crate) fn resolve_block(&mut self, block: NodeId) {
        let scope = self.scopes.create(ScopeKind::Local, Some(self.cx.scope), None);
        let statements = self.block_statements(block);
        self.with_scope(scope, |r| {
            for statement in statements {
                r.resolve_statement(statement);
            }
        });
        self.set_type(block, TypeId::VOID);
    }

    fn resolve_statement(&mut self, node: NodeId) {
        if !self.depth.enter() {
            self.depth.exit();
            self.report(
                Diagnostic::error(ErrorCode::E2046)
                    .with_message("statement is nested too deeply")
                    .with_label(self.span(node), "nesting limit reached here"),
            );
            return;
        }
        tern_stack::ensure_sufficient_stack(|| self.resolve_statement_kind(node));
        self.depth.exit();
        if self.nodes[node].ty.is_none() {
            self.set_type(node, TypeId::VOID);
        }
    }

    fn resolve_statement_kind(&mut self, node: NodeId) {
        match self.nodes.kind(node).clone() {
            NodeKind::Expression { value } => self.resolve_expression_statement(value),
            NodeKind::Variable { .. } | NodeKind::Function { .. } => self.resolve_local_declaration(node),
            NodeKind::Return { value } => self.resolve_return(node, value),
            NodeKind::Break => self.check_loop_control(node, "break", self.cx.loop_depth + self.cx.switch_depth),
            NodeKind::Continue => self.check_loop_control(node, "continue", self.cx.loop_depth),
            NodeKind::Block { .. } => self.resolve_block(node),
            NodeKind::If { test, yes, no } => {
                self.resolve_condition(test);
                self.resolve_block(yes);
                if let Some(no) = no {
                    self.resolve_block(no);
                }
            }
            NodeKind::While { test, block } => {
                self.resolve_condition(test);
                self.resolve_loop_body(block);
            }
            NodeKind::For {
                setup,
                test,
                update,
                block,
            } => {
                let scope = self.scopes.create(ScopeKind::Local, Some(self.cx.scope), None);
                self.with_scope(scope, |r| {
                    if let Some(setup) = setup {
                        r.resolve_for_clause(setup);
                    }
                    if let Some(test) = test {
                        r.resolve_condition(test);
                    }
                    if let Some(update) = update {
                        r.resolve_for_clause(update);
                    }
                    r.resolve_loop_body(block);
                });
            }
            NodeKind::Switch { value, cases } => self.resolve_switch(value, &cases),
            NodeKind::Assert { value } => {
                self.resolve_condition(value);
                self.fold(value);
            }
            other => panic!("a {} is not a statement", other.describe()),
        }
    }

    /// `for` setup and update clauses are statements or bare expressions.
    fn resolve_for_clause(&mut self, node: NodeId) {
        match self.nodes.kind(node) {
            NodeKind::Expression { .. } | NodeKind::Variable { .. } => self.resolve_statement(node),
            _ => {
                self.resolve_value(node, None);
            }
        }
    }

    fn resolve_loop_body(&mut self, block: NodeId) {
        let cx = Context {
            loop_depth: self.cx.loop_depth + 1,
            ..self.cx
        };
        self.with_context(cx, |r| r.resolve_block(block));
    }

    fn resolve_expression_statement(&mut self, value: NodeId) {
        let has_effect = self.has_effect(value);
        self.resolve_value(value, None);
        if !has_effect && self.options.warn_unused_expressions {
            self.report(
                Diagnostic::warning(ErrorCode::W2001)
                    .with_message("expression value is unused")
                    .with_label(self.span(value), "this has no effect"),
            );
        }
    }

    /// Expressions that are worth evaluating for their effect alone.
    fn has_effect(&self, node: NodeId) -> bool {
        match self.nodes.kind(node) {
            NodeKind::Call { .. } | NodeKind::New { .. } | NodeKind::SuperCall { .. } => true,
            NodeKind::Binary { op, .. } => op.is_assign(),
            NodeKind::Unary { op, .. } => op.is_increment_or_decrement(),
            _ => false,
        }
    }

    fn resolve_local_declaration(&mut self, node: NodeId) {
        let symbol = self.declare_local(node);
        if self.symbols[symbol].kind == SymbolKind::LocalFunction {
            self.insert_local(symbol);
            self.initialize_symbol(symbol);
            self.resolve_function_body(symbol);
            return;
        }
        self.initialize_symbol(symbol);
        self.insert_local(symbol);
    }

    fn resolve_return(&mut self, node: NodeId, value: Option<NodeId>) {
        let Some(function) = self.cx.function else {
            panic!("return outside of a function body");
        };
        let kind = self.symbols[function].kind;
        let ty = self.symbols[function].ty_or_error();
        if ty.is_error() {
            if let Some(value) = value {
                self.resolve_value(value, None);
            }
            return;
        }
        let expected = if kind == SymbolKind::Constructor {
            TypeId::VOID
        } else {
            self.types.function_result(ty).unwrap_or(TypeId::ERROR)
        };
        let name = self.symbol_name(function);
        match value {
            Some(value) if expected == TypeId::VOID => {
                self.resolve_value(value, None);
                self.report(
                    Diagnostic::error(ErrorCode::E2037)
                        .with_message(format!("`{name}` does not return a value"))
                        .with_label(self.span(value), "unexpected return value"),
                );
            }
            Some(value) => {
                self.resolve_value(value, Some(expected));
                self.convert_to(value, expected);
            }
            None if expected != TypeId::VOID && !expected.is_error() => {
                self.report(
                    Diagnostic::error(ErrorCode::E2037)
                        .with_message(format!("`{name}` must return a `{}`", self.show(expected)))
                        .with_label(self.span(node), "missing return value"),
                );
            }
            None => {}
        }
    }

    fn check_loop_control(&mut self, node: NodeId, keyword: &str, depth: u32) {
        if depth > 0 {
            return;
        }
        let place = if keyword == "break" { "a loop or switch" } else { "a loop" };
        self.report(
            Diagnostic::error(ErrorCode::E2038)
                .with_message(format!("`{keyword}` outside of {place}"))
                .with_label(self.span(node), "nothing to leave here"),
        );
    }

    fn resolve_switch(&mut self, value: NodeId, cases: &[NodeId]) {
        let ty = self.resolve_value(value, None);
        let mut seen: Vec<(Constant, NodeId)> = Vec::new();
        let mut default: Option<NodeId> = None;

        for &case in cases {
            let NodeKind::Case { values, block } = self.nodes.kind(case).clone() else {
                panic!("switch holds a {}", self.nodes.kind(case).describe());
            };
            if values.is_empty() {
                if let Some(first) = default {
                    self.report(
                        Diagnostic::error(ErrorCode::E2040)
                            .with_message("switch has more than one default case")
                            .with_label(self.span(case), "second default")
                            .with_secondary_label(self.span(first), "first default here"),
                    );
                } else {
                    default = Some(case);
                }
            }
            for value in values {
                self.resolve_case_value(case, value, ty, &mut seen);
            }
            self.set_type(case, TypeId::VOID);
            let cx = Context {
                switch_depth: self.cx.switch_depth + 1,
                ..self.cx
            };
            self.with_context(cx, |r| r.resolve_block(block));
        }
    }

    /// `seen` pairs each handled constant with the case branch that handles it.
    fn resolve_case_value(
        &mut self,
        case: NodeId,
        value: NodeId,
        ty: TypeId,
        seen: &mut Vec<(Constant, NodeId)>,
    ) {
        let context = (!ty.is_error()).then_some(ty);
        let case_ty = self.resolve_value(value, context);
        self.convert_to(value, ty);
        self.fold(value);
        if ty.is_error() || case_ty.is_error() {
            return;
        }
        let Some(constant) = constant_of(self.nodes, value) else {
            self.report_not_constant(value, "case value");
            return;
        };
        if let Some(&(_, first)) = seen.iter().find(|(c, _)| *c == constant) {
            self.report(
                Diagnostic::error(ErrorCode::E2039)
                    .with_message("duplicate case value")
                    .with_label(self.span(value), "already handled")
                    .with_secondary_label(self.span(first), "first case with this value"),
            );
            return;
        }
        seen.push((constant, case));
    }
}
