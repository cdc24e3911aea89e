//! Program-level resolver.
//!
//! The `Resolver` owns the symbol table, type cache and scope arena for one
//! run and drives resolution of a whole program.
//!
//! # Architecture
//!
//! ```text
//! Pass 0: Prelude
//!   - Build the prelude file and insert it in front of the program's files
//!
//! Pass 1: Declaration scan
//!   1a: Create a placeholder symbol per declared name, chaining extension
//!       and namespace fragments onto one symbol
//!   1b: Assign final kinds, create named types and scopes, recurse into
//!       member blocks
//!
//! Pass 2: Initialization
//!   - Initialize every symbol in creation order; initialization pulls in
//!     whatever it references first (bases, member types, constants)
//!
//! Pass 3: Function bodies
//!   - Resolve statements and expressions, rewriting the tree in place
//!
//! Pass 4: Entry point
//! ```
//!
//! # Component Structure
//!
//! ```text
//! Resolver
//! ├── Immutable Context
//! │   ├── interner, options, folder
//! │   └── names: WellKnownNames
//! │
//! ├── Tree
//! │   └── nodes: &mut NodeArena   (annotated and rewritten in place)
//! │
//! ├── Semantic Storage
//! │   ├── symbols: SymbolTable
//! │   ├── types: TypeCache
//! │   └── scopes: ScopeArena
//! │
//! ├── Initialization
//! │   ├── init_stack              (symbols currently initializing)
//! │   └── cyclic                  (symbols found on a cycle)
//! │
//! ├── Resolution Context
//! │   ├── cx: Context             (scope, function, object, loops)
//! │   └── depth: DepthGuard
//! │
//! └── Diagnostics
//!     └── log: DiagnosticQueue
//! ```

mod annotations;
mod declare;
mod expr;
mod initialize;
mod purity;
mod stmt;
mod synth;

use rustc_hash::FxHashSet;
use tern_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode, ErrorGuaranteed};
use tern_ir::{Name, NodeArena, NodeId, NodeKind, Span, StringInterner, SymbolId, TypeId};
use tern_stack::DepthGuard;
use tern_types::{
    MemberId, ScopeArena, ScopeId, ScopeKind, SymbolFlags, SymbolKind, SymbolTable, TypeCache,
};

use crate::fold::{ConstantFolder, DefaultConstantFolder, FoldContext};
use crate::names::WellKnownNames;
use crate::options::ResolverOptions;
use crate::prelude::build_prelude;

/// Everything a resolution run produces besides the annotated tree.
#[derive(Debug)]
pub struct ResolveOutput {
    pub symbols: SymbolTable,
    pub types: TypeCache,
    pub scopes: ScopeArena,
    /// Every symbol in creation order, synthesized ones included.
    pub all_symbols: Vec<SymbolId>,
    /// The validated `@EntryPoint` function.
    pub entry_point: Option<SymbolId>,
    pub diagnostics: DiagnosticQueue,
    /// The prelude file inserted in front of the program's files.
    pub prelude: NodeId,
    pub global_scope: ScopeId,
}

impl ResolveOutput {
    /// Proof that at least one error was reported.
    pub fn has_errors(&self) -> Option<ErrorGuaranteed> {
        self.diagnostics.has_errors()
    }
}

/// Resolve `program` with the default constant folder.
pub fn resolve_program(
    nodes: &mut NodeArena,
    program: NodeId,
    interner: &StringInterner,
    options: &ResolverOptions,
) -> ResolveOutput {
    resolve_program_with_folder(nodes, program, interner, options, &DefaultConstantFolder)
}

/// Resolve `program`, folding constants with `folder`.
///
/// # Panics
/// Panics if `program` is not a `Program` node whose children are `File`s.
#[tracing::instrument(level = "debug", skip_all, fields(nodes = nodes.len()))]
pub fn resolve_program_with_folder(
    nodes: &mut NodeArena,
    program: NodeId,
    interner: &StringInterner,
    options: &ResolverOptions,
    folder: &dyn ConstantFolder,
) -> ResolveOutput {
    let mut resolver = Resolver::new(nodes, interner, options, folder);
    let prelude = resolver.run(program);
    resolver.finish(prelude)
}

/// Where resolution currently happens.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Context {
    pub scope: ScopeId,
    /// Function whose body or signature is being resolved.
    pub function: Option<SymbolId>,
    /// Innermost class, interface or enum around the code.
    pub object: Option<SymbolId>,
    /// No `this` is available.
    pub is_static: bool,
    pub loop_depth: u32,
    pub switch_depth: u32,
}

pub(crate) struct Resolver<'a> {
    // === Immutable Context ===
    interner: &'a StringInterner,
    options: &'a ResolverOptions,
    folder: &'a dyn ConstantFolder,
    names: WellKnownNames,

    // === Tree ===
    nodes: &'a mut NodeArena,

    // === Semantic Storage ===
    symbols: SymbolTable,
    types: TypeCache,
    scopes: ScopeArena,
    global_scope: ScopeId,
    all_symbols: Vec<SymbolId>,
    entry_point: Option<SymbolId>,
    /// Type of the prelude's `math` namespace, the target of `**`.
    math: Option<TypeId>,

    // === Initialization ===
    init_stack: Vec<SymbolId>,
    cyclic: FxHashSet<SymbolId>,

    // === Resolution Context ===
    cx: Context,
    depth: DepthGuard,

    // === Diagnostics ===
    log: DiagnosticQueue,
}

impl<'a> Resolver<'a> {
    fn new(
        nodes: &'a mut NodeArena,
        interner: &'a StringInterner,
        options: &'a ResolverOptions,
        folder: &'a dyn ConstantFolder,
    ) -> Self {
        let mut scopes = ScopeArena::new();
        let global_scope = scopes.create(ScopeKind::Global, None, None);
        Resolver {
            interner,
            options,
            folder,
            names: WellKnownNames::new(interner),
            nodes,
            symbols: SymbolTable::new(),
            types: TypeCache::new(),
            scopes,
            global_scope,
            all_symbols: Vec::new(),
            entry_point: None,
            math: None,
            init_stack: Vec::new(),
            cyclic: FxHashSet::default(),
            cx: Context {
                scope: global_scope,
                function: None,
                object: None,
                is_static: true,
                loop_depth: 0,
                switch_depth: 0,
            },
            depth: DepthGuard::new(options.max_nesting_depth),
            log: DiagnosticQueue::with_config(options.diagnostics.clone()),
        }
    }

    // ========================================
    // Passes
    // ========================================

    /// Run every pass and return the prelude file.
    fn run(&mut self, program: NodeId) -> NodeId {
        let prelude = build_prelude(self.nodes, self.interner);
        let files = match &mut self.nodes[program].kind {
            NodeKind::Program { files } => {
                files.insert(0, prelude);
                files.clone()
            }
            other => panic!("resolver expects a program, found {}", other.describe()),
        };
        self.nodes[prelude].parent = Some(program);

        let blocks: Vec<NodeId> = files
            .iter()
            .map(|&file| match self.nodes.kind(file) {
                NodeKind::File { block } => *block,
                other => panic!("program child is a {}, not a file", other.describe()),
            })
            .collect();

        self.declare_program(&blocks);
        self.initialize_all();
        self.resolve_bodies();
        self.check_entry_point(program);
        prelude
    }

    #[tracing::instrument(level = "debug", skip_all, fields(files = blocks.len()))]
    fn declare_program(&mut self, blocks: &[NodeId]) {
        self.declare_blocks(blocks, self.global_scope, None);
        self.math = self
            .scopes
            .find_local(self.global_scope, self.names.math, &self.types)
            .and_then(|member| self.symbols[self.types.member(member).symbol].ty)
            .filter(|ty| !ty.is_error());
    }

    /// Initialize every symbol. Symbols created along the way are picked up too.
    #[tracing::instrument(level = "debug", skip_all)]
    fn initialize_all(&mut self) {
        let mut next = 0;
        while let Some(&symbol) = self.all_symbols.get(next) {
            self.initialize_symbol(symbol);
            next += 1;
        }
        tracing::debug!(symbols = self.all_symbols.len(), "initialized");
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn resolve_bodies(&mut self) {
        let mut next = 0;
        while let Some(&symbol) = self.all_symbols.get(next) {
            next += 1;
            let kind = self.symbols[symbol].kind;
            if matches!(
                kind,
                SymbolKind::GlobalFunction | SymbolKind::InstanceFunction | SymbolKind::Constructor
            ) {
                self.resolve_function_body(symbol);
            }
        }
    }

    fn check_entry_point(&mut self, program: NodeId) {
        if self.options.require_entry_point && self.entry_point.is_none() {
            self.report(
                Diagnostic::error(ErrorCode::E2042)
                    .with_message("program has no entry point")
                    .with_label(self.nodes.span(program), "no `@EntryPoint` function found")
                    .with_note("mark a global function taking no arguments with `@EntryPoint`"),
            );
        }
    }

    fn finish(self, prelude: NodeId) -> ResolveOutput {
        tracing::debug!(
            symbols = self.symbols.len(),
            types = self.types.len(),
            errors = self.log.error_count(),
            "resolution finished"
        );
        ResolveOutput {
            symbols: self.symbols,
            types: self.types,
            scopes: self.scopes,
            all_symbols: self.all_symbols,
            entry_point: self.entry_point,
            diagnostics: self.log,
            prelude,
            global_scope: self.global_scope,
        }
    }

    // ========================================
    // Context Management
    // ========================================

    /// Run `f` with `cx` as the current context.
    pub(crate) fn with_context<T>(&mut self, cx: Context, f: impl FnOnce(&mut Self) -> T) -> T {
        let saved = std::mem::replace(&mut self.cx, cx);
        let result = f(self);
        self.cx = saved;
        result
    }

    /// Run `f` with only the current scope replaced.
    pub(crate) fn with_scope<T>(&mut self, scope: ScopeId, f: impl FnOnce(&mut Self) -> T) -> T {
        let cx = Context { scope, ..self.cx };
        self.with_context(cx, f)
    }

    /// Context that code attached to `symbol`'s declaration resolves in.
    pub(crate) fn declaration_context(&self, symbol: SymbolId) -> Context {
        let current = &self.symbols[symbol];
        let scope = current.scope.unwrap_or(self.global_scope);
        if matches!(current.kind, SymbolKind::LocalVariable | SymbolKind::LocalFunction) {
            return Context { scope, ..self.cx };
        }
        let is_static = !matches!(
            current.kind,
            SymbolKind::InstanceVariable
                | SymbolKind::InstanceFunction
                | SymbolKind::MergedInstanceFunction
                | SymbolKind::Constructor
        );
        Context {
            scope,
            function: None,
            object: self.enclosing_object(symbol),
            is_static,
            loop_depth: 0,
            switch_depth: 0,
        }
    }

    /// Nearest enclosing class, interface or enum of `symbol`.
    pub(crate) fn enclosing_object(&self, symbol: SymbolId) -> Option<SymbolId> {
        self.symbols
            .enclosing_chain(symbol)
            .find(|&s| self.symbols[s].kind.is_object() || self.symbols[s].kind.is_enum())
    }

    // ========================================
    // Symbols
    // ========================================

    /// Create a symbol and register it for initialization.
    pub(crate) fn new_symbol(&mut self, name: Name, kind: SymbolKind, span: Span) -> SymbolId {
        let id = self.symbols.create(name, kind, span);
        self.all_symbols.push(id);
        id
    }

    pub(crate) fn symbol_name(&self, symbol: SymbolId) -> &'static str {
        self.interner.lookup(self.symbols[symbol].name)
    }

    /// Symbol behind a member, with forwarding followed.
    pub(crate) fn member_symbol(&self, member: MemberId) -> SymbolId {
        self.symbols
            .resolve_forwarding(self.types.member(member).symbol)
    }

    /// Type of a member, initializing its symbol first.
    pub(crate) fn member_type(&mut self, member: MemberId) -> TypeId {
        let symbol = self.types.member(member).symbol;
        self.initialize_symbol(symbol);
        if let Some(target) = self.symbols[symbol].forwarded_to {
            self.initialize_symbol(target);
        }
        self.types.member_type(member, &self.symbols)
    }

    pub(crate) fn has_flag(&self, symbol: SymbolId, flag: SymbolFlags) -> bool {
        self.symbols[symbol].has(flag)
    }

    // ========================================
    // Nodes
    // ========================================

    pub(crate) fn span(&self, node: NodeId) -> Span {
        self.nodes.span(node)
    }

    /// Statements of a `Block` node.
    ///
    /// # Panics
    /// Panics if `block` is not a block.
    pub(crate) fn block_statements(&self, block: NodeId) -> Vec<NodeId> {
        match self.nodes.kind(block) {
            NodeKind::Block { statements } => statements.clone(),
            other => panic!("expected a block, found {}", other.describe()),
        }
    }

    pub(crate) fn set_type(&mut self, node: NodeId, ty: TypeId) -> TypeId {
        self.nodes[node].ty = Some(ty);
        ty
    }

    /// Resolved type of an already resolved node.
    pub(crate) fn type_of(&self, node: NodeId) -> TypeId {
        self.nodes[node].ty.unwrap_or(TypeId::ERROR)
    }

    /// Fold the constant parts of `node` in place.
    pub(crate) fn fold(&mut self, node: NodeId) {
        let mut cx = FoldContext {
            nodes: &mut *self.nodes,
            symbols: &self.symbols,
            interner: self.interner,
        };
        self.folder.fold(&mut cx, node);
    }

    // ========================================
    // Diagnostics
    // ========================================

    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        self.log.push(diagnostic);
    }

    /// Render a type for a diagnostic message.
    pub(crate) fn show(&self, ty: TypeId) -> String {
        self.types.display(ty, &self.symbols, self.interner)
    }

    /// Report a failed implicit conversion unless either side is already an error.
    pub(crate) fn report_mismatch(&mut self, span: Span, expected: TypeId, found: TypeId) {
        if expected.is_error() || found.is_error() {
            return;
        }
        let diagnostic =
            tern_diagnostic::type_mismatch(span, &self.show(expected), &self.show(found));
        self.report(diagnostic);
    }
}
