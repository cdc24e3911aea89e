//! Declaration scan.
//!
//! Walks declaration blocks top-down and gives every declared name a symbol
//! before anything is resolved, so later passes can refer to declarations in
//! any order. The scan runs in two steps per block list:
//!
//! 1. Every declaration gets an `Automatic` placeholder in its scope. A
//!    namespace or extension reusing a name becomes another fragment of the
//!    existing symbol instead of a new symbol.
//! 2. Each placeholder gets its final kind, type and scopes, and the member
//!    blocks of all its fragments are scanned in turn.

use tern_diagnostic::{Diagnostic, ErrorCode};
use tern_ir::{NodeId, NodeKind, ObjectKind, Span, SymbolId, TypeId};
use tern_types::{Member, ScopeId, ScopeKind, SymbolFlags, SymbolKind, TypeCache, TypeKind};

use super::Resolver;

impl Resolver<'_> {
    /// Declare every declaration found in `blocks` into `scope`.
    pub(crate) fn declare_blocks(
        &mut self,
        blocks: &[NodeId],
        scope: ScopeId,
        enclosing: Option<SymbolId>,
    ) {
        let mut created = Vec::new();
        for &block in blocks {
            for statement in self.block_statements(block) {
                if let Some(symbol) = self.declare_placeholder(statement, scope, enclosing) {
                    created.push(symbol);
                }
            }
        }
        for symbol in created {
            self.assign_final_kind(symbol);
        }
    }

    /// Declare a synthesized declaration node appended to a member block.
    pub(crate) fn declare_synthesized(
        &mut self,
        node: NodeId,
        scope: ScopeId,
        enclosing: SymbolId,
    ) -> Option<SymbolId> {
        let symbol = self.declare_placeholder(node, scope, Some(enclosing))?;
        self.assign_final_kind(symbol);
        Some(symbol)
    }

    /// Create a placeholder for `node`, or chain it onto an existing symbol.
    ///
    /// Returns the new symbol, or `None` when `node` joined an existing one
    /// or is not a declaration.
    fn declare_placeholder(
        &mut self,
        node: NodeId,
        scope: ScopeId,
        enclosing: Option<SymbolId>,
    ) -> Option<SymbolId> {
        let header = self.nodes.kind(node).header()?;
        let (name, span) = (header.name, header.name_span);

        if let Some(existing) = self.scopes.find_local(scope, name, &self.types) {
            let existing = self.types.member(existing).symbol;
            if self.joins_fragments(existing, node) {
                self.append_fragment(existing, node);
                return None;
            }
            self.report_duplicate(span, existing);
            // Still declared so its body resolves, but unreachable by name.
            let orphan = self.placeholder(node, scope, enclosing);
            return Some(orphan);
        }

        let symbol = self.placeholder(node, scope, enclosing);
        let member = self.types.new_member(Member::own(symbol));
        if let Err(existing) = self.scopes.insert(scope, name, member, &mut self.types) {
            panic!("{existing:?} appeared in a scope checked a moment ago");
        }
        Some(symbol)
    }

    fn placeholder(&mut self, node: NodeId, scope: ScopeId, enclosing: Option<SymbolId>) -> SymbolId {
        let Some(header) = self.nodes.kind(node).header() else {
            panic!("placeholder for a {}", self.nodes.kind(node).describe());
        };
        let (name, span) = (header.name, header.name_span);
        let symbol = self.new_symbol(name, SymbolKind::Automatic, span);
        let current = &mut self.symbols[symbol];
        current.node = Some(node);
        current.scope = Some(scope);
        current.enclosing = enclosing;
        self.nodes[node].symbol = Some(symbol);
        tracing::trace!(name = self.interner.lookup(name), ?symbol, "declared");
        symbol
    }

    /// Whether `node` may become another fragment of `existing`.
    fn joins_fragments(&self, existing: SymbolId, node: NodeId) -> bool {
        if self.symbols[existing].kind != SymbolKind::Automatic {
            return false;
        }
        let Some(first) = self.symbols[existing].node else {
            return false;
        };
        let mut fragments = self.nodes.fragments(first);
        match self.nodes.kind(node) {
            NodeKind::Extension { .. } => true,
            NodeKind::Namespace { .. } => fragments.all(|f| {
                matches!(
                    self.nodes.kind(f),
                    NodeKind::Namespace { .. } | NodeKind::Extension { .. }
                )
            }),
            NodeKind::Object { .. } | NodeKind::Enum { .. } => {
                fragments.all(|f| matches!(self.nodes.kind(f), NodeKind::Extension { .. }))
            }
            _ => false,
        }
    }

    fn append_fragment(&mut self, symbol: SymbolId, node: NodeId) {
        let Some(first) = self.symbols[symbol].node else {
            return;
        };
        if let Some(last) = self.nodes.fragments(first).last() {
            self.nodes[last].sibling = Some(node);
        }
        self.nodes[node].symbol = Some(symbol);
    }

    pub(crate) fn report_duplicate(&mut self, span: Span, existing: SymbolId) {
        let name = self.symbol_name(existing);
        let first = self.symbols[existing].span;
        self.report(
            Diagnostic::error(ErrorCode::E2003)
                .with_message(format!("`{name}` is already declared in this scope"))
                .with_label(span, "redeclared here")
                .with_secondary_label(first, "first declared here"),
        );
    }

    // ========================================
    // Final Kinds
    // ========================================

    /// Give a placeholder its final kind, type and scopes.
    fn assign_final_kind(&mut self, symbol: SymbolId) {
        let Some(first) = self.symbols[symbol].node else {
            return;
        };
        let mut fragments: Vec<NodeId> = self.nodes.fragments(first).collect();
        let Some(primary) = fragments
            .iter()
            .position(|&f| !matches!(self.nodes.kind(f), NodeKind::Extension { .. }))
        else {
            let name = self.symbol_name(symbol);
            let span = self.symbols[symbol].span;
            self.report(
                Diagnostic::error(ErrorCode::E2011)
                    .with_message(format!("extension of `{name}`, which is never declared"))
                    .with_label(span, "no matching declaration"),
            );
            self.symbols[symbol].ty = Some(TypeId::ERROR);
            return;
        };
        if primary > 0 {
            self.canonicalize_fragments(symbol, &mut fragments, primary);
        }

        let mut flags = SymbolFlags::empty();
        for &fragment in &fragments {
            if let Some(header) = self.nodes.kind(fragment).header() {
                for modifier in &header.modifiers {
                    flags |= SymbolFlags::from_modifier(modifier.kind);
                }
            }
        }
        let enclosing = self.symbols[symbol].enclosing;
        if enclosing.is_some_and(|e| self.has_flag(e, SymbolFlags::IMPORT)) {
            flags |= SymbolFlags::IMPORT;
        }
        self.symbols[symbol].flags = flags;

        let primary = fragments[0];
        match self.nodes.kind(primary) {
            NodeKind::Namespace { .. } => self.declare_namespace(symbol, &fragments),
            NodeKind::Enum { is_flags, .. } => {
                let is_flags = *is_flags;
                self.declare_enum(symbol, is_flags, &fragments);
            }
            NodeKind::Object {
                kind, parameters, ..
            } => {
                let (kind, parameters) = (*kind, parameters.clone());
                self.declare_object(symbol, kind, &parameters, &fragments);
            }
            NodeKind::Function { .. } => self.declare_function(symbol, primary),
            NodeKind::Variable { .. } => self.declare_variable(symbol),
            NodeKind::Alias { .. } => self.symbols[symbol].kind = SymbolKind::Alias,
            NodeKind::Define { .. } => self.symbols[symbol].kind = SymbolKind::Define,
            other => panic!("a {} cannot be declared in a block", other.describe()),
        }
    }

    /// Move the primary declaration to the front of the fragment chain.
    fn canonicalize_fragments(&mut self, symbol: SymbolId, fragments: &mut Vec<NodeId>, primary: usize) {
        let node = fragments.remove(primary);
        fragments.insert(0, node);
        for pair in fragments.windows(2) {
            self.nodes[pair[0]].sibling = Some(pair[1]);
        }
        if let Some(&last) = fragments.last() {
            self.nodes[last].sibling = None;
        }
        self.symbols[symbol].node = Some(node);
    }

    fn fragment_block(&self, fragment: NodeId) -> NodeId {
        match self.nodes.kind(fragment) {
            NodeKind::Namespace { block, .. }
            | NodeKind::Extension { block, .. }
            | NodeKind::Enum { block, .. }
            | NodeKind::Object { block, .. } => *block,
            other => panic!("a {} has no member block", other.describe()),
        }
    }

    fn declare_members(&mut self, symbol: SymbolId, fragments: &[NodeId], scope: ScopeId) {
        let blocks: Vec<NodeId> = fragments.iter().map(|&f| self.fragment_block(f)).collect();
        self.declare_blocks(&blocks, scope, Some(symbol));
    }

    fn declare_namespace(&mut self, symbol: SymbolId, fragments: &[NodeId]) {
        self.symbols[symbol].kind = SymbolKind::Namespace;
        let ty = self.types.create_named(TypeKind::Namespace, symbol);
        self.symbols[symbol].ty = Some(ty);
        let scope = self.open_type_scope(symbol, ScopeKind::Namespace, ty, None);
        self.declare_members(symbol, fragments, scope);
        self.types.complete(ty);
    }

    fn declare_enum(&mut self, symbol: SymbolId, is_flags: bool, fragments: &[NodeId]) {
        let (kind, type_kind) = if is_flags {
            (SymbolKind::EnumFlags, TypeKind::EnumFlags)
        } else {
            (SymbolKind::Enum, TypeKind::Enum)
        };
        self.symbols[symbol].kind = kind;
        let ty = self.types.create_named(type_kind, symbol);
        self.symbols[symbol].ty = Some(ty);
        let scope = self.open_type_scope(symbol, ScopeKind::Object, ty, None);
        self.declare_members(symbol, fragments, scope);
    }

    fn declare_object(
        &mut self,
        symbol: SymbolId,
        kind: ObjectKind,
        parameters: &[NodeId],
        fragments: &[NodeId],
    ) {
        let (symbol_kind, type_kind) = match kind {
            ObjectKind::Class => (SymbolKind::Class, TypeKind::Class),
            ObjectKind::Interface => (SymbolKind::Interface, TypeKind::Interface),
        };
        self.symbols[symbol].kind = symbol_kind;

        let builtin = if self.symbols[symbol].span.is_prelude() {
            TypeCache::builtin_for_name(self.symbol_name(symbol))
        } else {
            None
        };
        let ty = match builtin {
            Some(ty) => {
                self.types.bind_builtin(ty, symbol);
                ty
            }
            None => self.types.create_named(type_kind, symbol),
        };
        self.symbols[symbol].ty = Some(ty);

        let outer = self.declare_type_parameters(symbol, parameters);
        let parameter_types = self.symbols[symbol]
            .parameters
            .iter()
            .map(|&p| self.symbols[p].ty_or_error())
            .collect();
        self.types.set_parameters(ty, parameter_types);

        let scope = self.open_type_scope(symbol, ScopeKind::Object, ty, Some(outer));
        self.declare_members(symbol, fragments, scope);
    }

    /// Open the member scope of a named type, routed through its member table.
    fn open_type_scope(
        &mut self,
        symbol: SymbolId,
        kind: ScopeKind,
        ty: TypeId,
        parent: Option<ScopeId>,
    ) -> ScopeId {
        let parent = parent.or(self.symbols[symbol].scope);
        let scope = self.scopes.create(kind, parent, Some(symbol));
        self.scopes.bind_type(scope, ty);
        self.symbols[symbol].own_scope = Some(scope);
        scope
    }

    /// Declare `symbol`'s type parameters and return the scope its body sees.
    fn declare_type_parameters(&mut self, symbol: SymbolId, parameters: &[NodeId]) -> ScopeId {
        let declared_in = self.symbols[symbol].scope.unwrap_or(self.global_scope);
        if parameters.is_empty() {
            return declared_in;
        }

        let scope = self
            .scopes
            .create(ScopeKind::Parameters, Some(declared_in), Some(symbol));
        let mut own = Vec::with_capacity(parameters.len());
        for &node in parameters {
            let Some(parameter) = self.declare_placeholder(node, scope, Some(symbol)) else {
                continue;
            };
            self.symbols[parameter].kind = SymbolKind::TypeParameter;
            let ty = self.types.create_named(TypeKind::Parameter, parameter);
            self.types.complete(ty);
            self.symbols[parameter].ty = Some(ty);
            own.push(parameter);
        }
        self.symbols[symbol].parameters = own;
        scope
    }

    pub(crate) fn declare_function(&mut self, symbol: SymbolId, node: NodeId) {
        let NodeKind::Function {
            parameters,
            arguments,
            body,
            ..
        } = self.nodes.kind(node)
        else {
            panic!("declare_function on a {}", self.nodes.kind(node).describe());
        };
        let (parameters, arguments, has_body) = (parameters.clone(), arguments.clone(), body.is_some());

        let enclosing_kind = self.symbols[symbol].enclosing.map(|e| self.symbols[e].kind);
        let in_object = enclosing_kind.is_some_and(|k| k.is_object() || k.is_enum());
        let mut flags = self.symbols[symbol].flags;
        let kind = if in_object && self.symbols[symbol].name == self.names.constructor {
            SymbolKind::Constructor
        } else if in_object && !flags.contains(SymbolFlags::STATIC) {
            SymbolKind::InstanceFunction
        } else {
            SymbolKind::GlobalFunction
        };
        if kind == SymbolKind::InstanceFunction
            && enclosing_kind == Some(SymbolKind::Interface)
            && !has_body
        {
            flags |= SymbolFlags::ABSTRACT;
        }
        if flags.intersects(SymbolFlags::ABSTRACT | SymbolFlags::OVERRIDE) {
            flags |= SymbolFlags::VIRTUAL;
        }
        let current = &mut self.symbols[symbol];
        current.kind = kind;
        current.flags = flags;

        let outer = self.declare_type_parameters(symbol, &parameters);
        let scope = self.scopes.create(ScopeKind::Function, Some(outer), Some(symbol));
        self.symbols[symbol].own_scope = Some(scope);

        for argument in arguments {
            let Some(id) = self.declare_placeholder(argument, scope, Some(symbol)) else {
                continue;
            };
            self.symbols[id].kind = SymbolKind::ArgumentVariable;
            let flags = self
                .nodes
                .kind(argument)
                .header()
                .map(|h| {
                    h.modifiers
                        .iter()
                        .fold(SymbolFlags::empty(), |acc, m| acc | SymbolFlags::from_modifier(m.kind))
                })
                .unwrap_or_default();
            self.symbols[id].flags = flags;
            self.symbols[symbol].arguments.push(id);
        }
    }

    fn declare_variable(&mut self, symbol: SymbolId) {
        let enclosing_kind = self.symbols[symbol].enclosing.map(|e| self.symbols[e].kind);
        let is_static = self.has_flag(symbol, SymbolFlags::STATIC);
        self.symbols[symbol].kind = match enclosing_kind {
            Some(SymbolKind::Enum | SymbolKind::EnumFlags) => SymbolKind::EnumValue,
            Some(SymbolKind::Class | SymbolKind::Interface) if !is_static => {
                SymbolKind::InstanceVariable
            }
            _ => SymbolKind::GlobalVariable,
        };
    }

    // ========================================
    // Locals
    // ========================================

    /// Declare a local variable or function found in a function body.
    ///
    /// The symbol is not added to any scope; the caller inserts it once
    /// it is initialized so it cannot be referenced by its own initializer.
    pub(crate) fn declare_local(&mut self, node: NodeId) -> SymbolId {
        let scope = self.cx.scope;
        let symbol = self.placeholder(node, scope, self.cx.function);
        let flags = self
            .nodes
            .kind(node)
            .header()
            .map(|h| {
                h.modifiers
                    .iter()
                    .fold(SymbolFlags::empty(), |acc, m| acc | SymbolFlags::from_modifier(m.kind))
            })
            .unwrap_or_default();
        self.symbols[symbol].flags = flags;
        match self.nodes.kind(node) {
            NodeKind::Function { .. } => {
                self.declare_function(symbol, node);
                self.symbols[symbol].kind = SymbolKind::LocalFunction;
            }
            NodeKind::Variable { .. } => self.symbols[symbol].kind = SymbolKind::LocalVariable,
            other => panic!("a {} cannot be declared inside a function body", other.describe()),
        }
        symbol
    }

    /// Make an initialized local visible in the current scope.
    pub(crate) fn insert_local(&mut self, symbol: SymbolId) {
        let name = self.symbols[symbol].name;
        let span = self.symbols[symbol].span;
        let member = self.types.new_member(Member::own(symbol));
        if let Err(existing) = self.scopes.insert(self.cx.scope, name, member, &mut self.types) {
            let existing = self.types.member(existing).symbol;
            self.report_duplicate(span, existing);
        }
    }
}
