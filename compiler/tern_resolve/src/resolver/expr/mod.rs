//! Expression resolution.
//!
//! `resolve_expr` types a node and records the type on it. Some rules
//! rewrite the node in place; a node's id always stays the root of whatever
//! it became:
//!
//! - implicit conversions wrap the converted node in `ImplicitCast`
//! - operator overloads, string concatenation and `**` become calls
//! - `.name` without a target gains a `Type` target from the context
//!
//! An optional context type flows down to constructs that cannot type
//! themselves: list and map literals, `.name`, and hooks or complements
//! over them.

mod calls;
mod context;
mod operators;
mod overload;

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{Name, NodeId, NodeKind, SymbolId, TypeId};
use tern_types::{MemberId, ScopeKind, SymbolFlags, SymbolKind, TypeKind};

use super::Resolver;

/// How a member was reached.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Access {
    /// A bare name, with `this` implied for instance members.
    Name,
    /// `Type.member`
    ThroughType,
    /// `value.member`
    ThroughValue,
}

impl Resolver<'_> {
    /// Resolve an expression, record its type on the node and return it.
    pub(crate) fn resolve_expr(&mut self, node: NodeId, context: Option<TypeId>) -> TypeId {
        if !self.depth.enter() {
            self.depth.exit();
            self.report(
                Diagnostic::error(ErrorCode::E2046)
                    .with_message("expression is nested too deeply")
                    .with_label(self.span(node), "nesting limit reached here")
                    .with_note(format!(
                        "the limit is {} levels",
                        self.options.max_nesting_depth
                    )),
            );
            return self.set_type(node, TypeId::ERROR);
        }
        let ty = tern_stack::ensure_sufficient_stack(|| self.resolve_expr_kind(node, context));
        self.depth.exit();
        self.set_type(node, ty)
    }

    fn resolve_expr_kind(&mut self, node: NodeId, context: Option<TypeId>) -> TypeId {
        match self.nodes.kind(node).clone() {
            NodeKind::Name(name) => self.resolve_name(node, name),
            NodeKind::Dot { target, name } => self.resolve_dot(node, target, name, context),
            NodeKind::This => self.resolve_this(node),
            NodeKind::Null => TypeId::NULL,
            NodeKind::Bool(_) => TypeId::BOOL,
            NodeKind::Int(_) => TypeId::INT,
            NodeKind::Double(_) => TypeId::DOUBLE,
            NodeKind::String(_) => TypeId::STRING,
            NodeKind::Type(ty) => ty,
            NodeKind::List { values } => self.resolve_list(node, &values, context),
            NodeKind::Map { entries } => self.resolve_map(node, &entries, context),
            NodeKind::Call { target, arguments } => self.resolve_call(node, target, &arguments),
            NodeKind::SuperCall { arguments } => self.resolve_super_call(node, &arguments),
            NodeKind::New { ty, arguments } => self.resolve_new(node, ty, &arguments),
            NodeKind::Cast { ty, value } => self.resolve_cast(node, ty, value),
            NodeKind::ImplicitCast { value } => match self.nodes[node].ty {
                Some(ty) => ty,
                None => self.resolve_expr(value, context),
            },
            NodeKind::Hook { test, yes, no } => self.resolve_hook(test, yes, no, context),
            NodeKind::Index { target, index } => self.resolve_index(node, target, index),
            NodeKind::Parameterize { target, arguments } => {
                self.resolve_parameterize(node, target, &arguments)
            }
            NodeKind::Unary { op, value } => self.resolve_unary(node, op, value, context),
            NodeKind::Binary { op, left, right } => self.resolve_binary(node, op, left, right),
            other => panic!("a {} is not an expression", other.describe()),
        }
    }

    /// Resolve an expression that must produce a value.
    pub(crate) fn resolve_value(&mut self, node: NodeId, context: Option<TypeId>) -> TypeId {
        let ty = self.resolve_expr(node, context);
        if ty.is_error() || !self.is_type_reference(node) {
            return ty;
        }
        self.report(
            Diagnostic::error(ErrorCode::E2007)
                .with_message(format!("`{}` is a type, not a value", self.show(ty)))
                .with_label(self.span(node), "expected a value"),
        );
        self.set_type(node, TypeId::ERROR)
    }

    /// Resolve an expression that must name a type, and return that type.
    pub(crate) fn resolve_type(&mut self, node: NodeId) -> TypeId {
        let ty = self.resolve_expr(node, None);
        if ty.is_error() {
            return ty;
        }
        if self.is_type_reference(node) && self.types.kind(ty) != TypeKind::Namespace {
            return ty;
        }
        self.report(
            Diagnostic::error(ErrorCode::E2006)
                .with_message("expected a type")
                .with_label(self.span(node), "not a type"),
        );
        self.set_type(node, TypeId::ERROR)
    }

    /// Whether a resolved node names a type rather than a value.
    pub(crate) fn is_type_reference(&self, node: NodeId) -> bool {
        match self.nodes.kind(node) {
            NodeKind::Type(_) => true,
            NodeKind::Name(name) if *name == self.names.void => self.nodes[node].symbol.is_none(),
            NodeKind::Name(_) | NodeKind::Dot { .. } | NodeKind::Parameterize { .. } => self.nodes
                [node]
                .symbol
                .is_some_and(|s| self.symbols[s].kind.is_type()),
            _ => false,
        }
    }

    /// Convert a resolved node to `to`, inserting an `ImplicitCast`.
    ///
    /// Reports a mismatch and returns `false` if no implicit conversion exists.
    pub(crate) fn convert_to(&mut self, node: NodeId, to: TypeId) -> bool {
        let from = self.type_of(node);
        if from == to || from.is_error() || to.is_error() {
            return true;
        }
        if from == TypeId::VOID {
            self.report(
                Diagnostic::error(ErrorCode::E2013)
                    .with_message(format!("expected `{}`, found a `void` value", self.show(to)))
                    .with_label(self.span(node), "has no value"),
            );
            return false;
        }
        if !self.types.can_implicitly_convert(from, to) {
            self.report_mismatch(self.span(node), to, from);
            return false;
        }
        self.nodes.wrap(node, |value| NodeKind::ImplicitCast { value });
        self.set_type(node, to);
        true
    }

    /// Resolve a condition and convert it to `bool`.
    pub(crate) fn resolve_condition(&mut self, node: NodeId) {
        self.resolve_value(node, Some(TypeId::BOOL));
        self.convert_to(node, TypeId::BOOL);
    }

    /// Make sure `ty`'s member table is built.
    pub(crate) fn ensure_members(&mut self, ty: TypeId) {
        if let Some(symbol) = self.types.symbol(ty) {
            self.initialize_if_fresh(symbol);
        }
    }

    // ========================================
    // Names and Members
    // ========================================

    fn resolve_name(&mut self, node: NodeId, name: Name) -> TypeId {
        if name == self.names.void {
            return TypeId::VOID;
        }
        let Some((_, member)) = self.scopes.find(self.cx.scope, name, &self.types) else {
            let diagnostic = tern_diagnostic::undeclared_symbol(self.span(node), self.interner.lookup(name));
            self.report(diagnostic);
            return TypeId::ERROR;
        };
        self.use_member(node, member, Access::Name)
    }

    fn resolve_this(&mut self, node: NodeId) -> TypeId {
        match self.cx.object {
            Some(object) if !self.cx.is_static => {
                self.nodes[node].symbol = Some(object);
                self.symbols[object].ty_or_error()
            }
            _ => {
                self.report(
                    Diagnostic::error(ErrorCode::E2017)
                        .with_message("`this` is not available here")
                        .with_label(self.span(node), "no instance in a static context"),
                );
                TypeId::ERROR
            }
        }
    }

    fn resolve_dot(
        &mut self,
        node: NodeId,
        target: Option<NodeId>,
        name: Name,
        context: Option<TypeId>,
    ) -> TypeId {
        let Some(target) = target else {
            return self.resolve_unparented_dot(node, name, context);
        };
        let container = self.resolve_expr(target, None);
        if container.is_error() {
            return TypeId::ERROR;
        }
        let access = if self.is_type_reference(target) {
            Access::ThroughType
        } else {
            Access::ThroughValue
        };
        self.ensure_members(container);
        let Some(member) = self.types.find_member(container, name) else {
            self.report(
                Diagnostic::error(ErrorCode::E2002)
                    .with_message(format!(
                        "`{}` has no member named `{}`",
                        self.show(container),
                        self.interner.lookup(name)
                    ))
                    .with_label(self.span(node), "unknown member"),
            );
            return TypeId::ERROR;
        };
        self.use_member(node, member, access)
    }

    /// `.name`: member of the context type, e.g. an enum value.
    fn resolve_unparented_dot(&mut self, node: NodeId, name: Name, context: Option<TypeId>) -> TypeId {
        let Some(context) = context else {
            self.report(
                Diagnostic::error(ErrorCode::E2012)
                    .with_message(format!(
                        "cannot tell which type `.{}` belongs to",
                        self.interner.lookup(name)
                    ))
                    .with_label(self.span(node), "no type expected here")
                    .with_note("write the type explicitly, e.g. `Type.name`"),
            );
            return TypeId::ERROR;
        };
        if context.is_error() {
            return TypeId::ERROR;
        }
        let target = self.nodes.alloc(NodeKind::Type(context), self.span(node));
        self.nodes.replace(
            node,
            NodeKind::Dot {
                target: Some(target),
                name,
            },
        );
        self.resolve_dot(node, Some(target), name, None)
    }

    /// Record a member use on `node` and return the member's type.
    fn use_member(&mut self, node: NodeId, member: MemberId, access: Access) -> TypeId {
        let symbol = self.types.member(member).symbol;
        let is_named_type =
            self.symbols[symbol].kind.is_type() && self.symbols[symbol].ty.is_some();
        if !is_named_type {
            self.initialize_symbol(symbol);
        }
        let name = self.symbol_name(symbol);
        if self.symbols[symbol].kind == SymbolKind::Ambiguous {
            self.report(
                Diagnostic::error(ErrorCode::E2018)
                    .with_message(format!("`{name}` is ambiguous"))
                    .with_label(self.span(node), "inherited from more than one base")
                    .with_note("qualify the name with the base that declares it"),
            );
            return TypeId::ERROR;
        }
        let target = self.symbols.resolve_forwarding(symbol);
        self.nodes[node].symbol = Some(target);
        self.check_access(node, target);
        self.check_static_access(node, target, access);
        if is_named_type {
            return self.symbols[symbol].ty_or_error();
        }
        self.member_type(member)
    }

    fn check_static_access(&mut self, node: NodeId, target: SymbolId, access: Access) {
        let kind = self.symbols[target].kind;
        let name = self.symbol_name(target);
        let in_object = self.symbols[target]
            .enclosing
            .is_some_and(|e| self.symbols[e].kind.is_object() || self.symbols[e].kind.is_enum());
        let is_static_member =
            in_object && matches!(kind, SymbolKind::GlobalFunction | SymbolKind::GlobalVariable);
        let message = match access {
            Access::Name if kind.is_instance_member() && self.cx.is_static => {
                format!("instance member `{name}` used without an instance")
            }
            Access::ThroughType if kind.is_instance_member() => {
                format!("instance member `{name}` accessed through its type")
            }
            Access::ThroughValue if is_static_member || kind == SymbolKind::EnumValue => {
                format!("static member `{name}` accessed through an instance")
            }
            _ => return,
        };
        self.report(
            Diagnostic::error(ErrorCode::E2017)
                .with_message(message)
                .with_label(self.span(node), "wrong context for this member"),
        );
    }

    /// Report use of a private or protected member from outside its reach.
    fn check_access(&mut self, node: NodeId, target: SymbolId) {
        let flags = self.symbols[target].flags;
        if !flags.intersects(SymbolFlags::PRIVATE | SymbolFlags::PROTECTED) {
            return;
        }
        let Some(owner) = self.symbols[target].enclosing else {
            return;
        };
        let inside_owner = self
            .scopes
            .chain(self.cx.scope)
            .any(|s| self.scopes.get(s).symbol == Some(owner));
        if inside_owner {
            return;
        }
        if flags.contains(SymbolFlags::PROTECTED) {
            let owner_type = self.symbols[owner].ty_or_error();
            let in_subclass = self
                .scopes
                .chain(self.cx.scope)
                .filter(|&s| self.scopes.get(s).kind == ScopeKind::Object)
                .filter_map(|s| self.scopes.get(s).ty)
                .any(|ty| self.types.has_base_type(ty, owner_type));
            if in_subclass {
                return;
            }
        }
        let visibility = if flags.contains(SymbolFlags::PRIVATE) {
            "private"
        } else {
            "protected"
        };
        self.report(
            Diagnostic::error(ErrorCode::E2016)
                .with_message(format!(
                    "`{}` is {visibility} to `{}`",
                    self.symbol_name(target),
                    self.symbol_name(owner)
                ))
                .with_label(self.span(node), "not accessible here")
                .with_secondary_label(self.symbols[target].span, "declared here"),
        );
    }

    // ========================================
    // Types
    // ========================================

    fn resolve_parameterize(&mut self, node: NodeId, target: NodeId, arguments: &[NodeId]) -> TypeId {
        let generic = self.resolve_expr(target, None);
        let substitutions: Vec<TypeId> = arguments.iter().map(|&a| self.resolve_type(a)).collect();
        let symbol = self.nodes[target].symbol;
        self.nodes[node].symbol = symbol;
        if generic.is_error() || substitutions.iter().any(|t| t.is_error()) {
            return TypeId::ERROR;
        }

        let (expected, what) = if self.is_type_reference(target) {
            let definition = self.types.get(generic);
            let expected = if definition.is_parameterized() {
                0
            } else {
                definition.parameters.len()
            };
            (expected, self.show(generic))
        } else {
            let expected = symbol.map_or(0, |s| self.symbols[s].parameters.len());
            (expected, symbol.map_or_else(String::new, |s| self.symbol_name(s).to_owned()))
        };
        if expected != substitutions.len() {
            self.report(
                Diagnostic::error(ErrorCode::E2008)
                    .with_message(format!(
                        "`{what}` takes {expected} type argument(s), found {}",
                        substitutions.len()
                    ))
                    .with_label(self.span(node), "wrong number of type arguments"),
            );
            return TypeId::ERROR;
        }

        if self.is_type_reference(target) {
            return self.types.parameterize(generic, &substitutions);
        }
        let parameters: Vec<TypeId> = symbol
            .map(|s| {
                self.symbols[s]
                    .parameters
                    .iter()
                    .map(|&p| self.symbols[p].ty_or_error())
                    .collect()
            })
            .unwrap_or_default();
        self.types.substitute(generic, &parameters, &substitutions)
    }

    fn resolve_cast(&mut self, node: NodeId, ty: NodeId, value: NodeId) -> TypeId {
        let target = self.resolve_type(ty);
        let found = self.resolve_value(value, Some(target));
        if target.is_error() || found.is_error() {
            return target;
        }
        if !self.types.can_explicitly_convert(found, target) {
            self.report(
                Diagnostic::error(ErrorCode::E2033)
                    .with_message(format!(
                        "cannot cast `{}` to `{}`",
                        self.show(found),
                        self.show(target)
                    ))
                    .with_label(self.span(node), "invalid cast"),
            );
        }
        target
    }
}
