//! Declarations the resolver writes itself.
//!
//! Synthesized functions are ordinary tree nodes appended to their owner's
//! primary block and declared like source declarations, so the rest of the
//! resolver (and later stages) treat them uniformly. Their symbols carry
//! `SYNTHESIZED`.

use tern_ir::{DeclHeader, Name, NodeId, NodeKind, Span, SymbolId, TypeId};
use tern_types::{Constant, SymbolFlags, SymbolKind};

use super::Resolver;

impl Resolver<'_> {
    /// Give a class without a constructor one that forwards to the base
    /// constructor and initializes every instance variable lacking a value.
    ///
    /// Arguments are the base constructor's arguments followed by those
    /// variables in source order.
    pub(crate) fn generate_default_constructor(&mut self, class: SymbolId) {
        let ty = self.symbols[class].ty_or_error();
        let span = self.symbols[class].span;
        let mut pure = true;

        let mut base_arguments: Vec<(Name, TypeId)> = Vec::new();
        let base_constructor = self.types.base_class(ty).and_then(|base| {
            self.ensure_members(base);
            self.types.find_member(base, self.names.constructor)
        });
        if let Some(member) = base_constructor {
            let constructor = self.member_symbol(member);
            let constructor_ty = self.member_type(member);
            pure &= self.is_pure_callee(constructor);
            let names = self.symbols[constructor].arguments.iter().map(|&a| self.symbols[a].name);
            let types = self.types.function_arguments(constructor_ty).iter().copied();
            base_arguments = names.zip(types).collect();
        }

        let mut fields: Vec<SymbolId> = Vec::new();
        for (_, member) in self.types.members_of(ty) {
            if self.types.member(member).is_inherited() {
                continue;
            }
            let field = self.types.member(member).symbol;
            if self.symbols[field].kind != SymbolKind::InstanceVariable {
                continue;
            }
            self.initialize_symbol(field);
            match self.variable_value(field) {
                Some(value) => pure &= self.is_pure_expression(value),
                None => fields.push(field),
            }
        }
        fields.sort_by_key(|&f| (self.symbols[f].span.file, self.symbols[f].span.start));

        let mut arguments = Vec::with_capacity(base_arguments.len() + fields.len());
        for &(name, ty) in &base_arguments {
            arguments.push(self.synthesized_argument(name, ty, span));
        }
        let mut initializers = Vec::with_capacity(fields.len());
        for &field in &fields {
            let name = self.symbols[field].name;
            let ty = self.symbols[field].ty_or_error();
            arguments.push(self.synthesized_argument(name, ty, span));
            let value = self.nodes.alloc(NodeKind::Name(name), span);
            initializers.push(self.nodes.alloc(NodeKind::MemberInitializer { name, value }, span));
        }

        let mut statements = Vec::new();
        if base_constructor.is_some() {
            let forwarded = base_arguments
                .iter()
                .map(|&(name, _)| self.nodes.alloc(NodeKind::Name(name), span))
                .collect();
            let call = self.nodes.alloc(NodeKind::SuperCall { arguments: forwarded }, span);
            statements.push(self.nodes.alloc(NodeKind::Expression { value: call }, span));
        }
        let body = self.nodes.alloc(NodeKind::Block { statements }, span);
        let function = NodeKind::Function {
            header: DeclHeader::new(self.names.constructor, span),
            parameters: Vec::new(),
            arguments,
            result: None,
            initializers,
            body: Some(body),
        };

        let mut flags = SymbolFlags::SYNTHESIZED;
        if pure {
            flags |= SymbolFlags::PURE;
        }
        if let Some(symbol) = self.add_synthesized(class, function, span, flags) {
            tracing::debug!(
                class = self.symbol_name(class),
                arguments = self.symbols[symbol].arguments.len(),
                pure,
                "synthesized default constructor"
            );
        }
    }

    /// Give an enum a `toString()` returning each value's name.
    ///
    /// Values forming a contiguous run index into a list of names; sparse
    /// values go through a switch with an empty-string default.
    pub(crate) fn generate_enum_to_string(&mut self, enumeration: SymbolId, values: &[SymbolId]) {
        let span = self.symbols[enumeration].span;
        let mut entries: Vec<(i64, Name)> = values
            .iter()
            .filter_map(|&v| {
                let number = self.symbols[v].constant.and_then(Constant::as_int)?;
                Some((number, self.symbols[v].name))
            })
            .collect();
        entries.sort_by_key(|&(number, _)| number);
        let contiguous = entries
            .first()
            .is_some_and(|&(min, _)| entries.iter().map(|&(n, _)| n).zip(min..).all(|(n, want)| n == want));

        let body = match entries.first() {
            Some(&(min, _)) if contiguous => self.to_string_lookup(&entries, min, span),
            Some(_) => self.to_string_switch(&entries, span),
            None => {
                let empty = self.synthesized_string("", span);
                vec![self.nodes.alloc(NodeKind::Return { value: Some(empty) }, span)]
            }
        };
        let body = self.nodes.alloc(NodeKind::Block { statements: body }, span);
        let result = self.nodes.alloc(NodeKind::Type(TypeId::STRING), span);
        let function = NodeKind::Function {
            header: DeclHeader::new(self.names.to_string, span),
            parameters: Vec::new(),
            arguments: Vec::new(),
            result: Some(result),
            initializers: Vec::new(),
            body: Some(body),
        };
        let flags = SymbolFlags::SYNTHESIZED | SymbolFlags::INLINE | SymbolFlags::PURE;
        if self.add_synthesized(enumeration, function, span, flags).is_some() {
            tracing::debug!(
                name = self.symbol_name(enumeration),
                values = entries.len(),
                contiguous,
                "synthesized enum toString"
            );
        }
    }

    /// `return [names…][(this as int) - min];`
    fn to_string_lookup(&mut self, entries: &[(i64, Name)], min: i64, span: Span) -> Vec<NodeId> {
        let names = entries
            .iter()
            .map(|&(_, name)| self.nodes.alloc(NodeKind::String(name), span))
            .collect();
        let list = self.nodes.alloc(NodeKind::List { values: names }, span);
        let mut offset = self.this_as_int(span);
        if min != 0 {
            let min = self.nodes.alloc(NodeKind::Int(min), span);
            offset = self.nodes.alloc(
                NodeKind::Binary {
                    op: tern_ir::BinaryOp::Subtract,
                    left: offset,
                    right: min,
                },
                span,
            );
        }
        let index = self.nodes.alloc(
            NodeKind::Index {
                target: list,
                index: offset,
            },
            span,
        );
        vec![self.nodes.alloc(NodeKind::Return { value: Some(index) }, span)]
    }

    /// `switch (this as int) { case n: return "name"; … default: return ""; }`
    fn to_string_switch(&mut self, entries: &[(i64, Name)], span: Span) -> Vec<NodeId> {
        let mut cases = Vec::with_capacity(entries.len() + 1);
        let mut previous = None;
        for &(number, name) in entries {
            // Aliases share a value; the first name wins.
            if previous == Some(number) {
                continue;
            }
            previous = Some(number);
            let value = self.nodes.alloc(NodeKind::Int(number), span);
            let text = self.nodes.alloc(NodeKind::String(name), span);
            cases.push(self.return_case(vec![value], text, span));
        }
        let empty = self.synthesized_string("", span);
        cases.push(self.return_case(Vec::new(), empty, span));
        let value = self.this_as_int(span);
        vec![self.nodes.alloc(NodeKind::Switch { value, cases }, span)]
    }

    fn return_case(&mut self, values: Vec<NodeId>, result: NodeId, span: Span) -> NodeId {
        let ret = self.nodes.alloc(NodeKind::Return { value: Some(result) }, span);
        let block = self.nodes.alloc(NodeKind::Block { statements: vec![ret] }, span);
        self.nodes.alloc(NodeKind::Case { values, block }, span)
    }

    fn this_as_int(&mut self, span: Span) -> NodeId {
        let this = self.nodes.alloc(NodeKind::This, span);
        let int = self.nodes.alloc(NodeKind::Type(TypeId::INT), span);
        self.nodes.alloc(NodeKind::Cast { ty: int, value: this }, span)
    }

    fn synthesized_string(&mut self, text: &str, span: Span) -> NodeId {
        let text = self.interner.intern(text);
        self.nodes.alloc(NodeKind::String(text), span)
    }

    fn synthesized_argument(&mut self, name: Name, ty: TypeId, span: Span) -> NodeId {
        let ty = self.nodes.alloc(NodeKind::Type(ty), span);
        self.nodes.alloc(
            NodeKind::Variable {
                header: DeclHeader::new(name, span),
                ty: Some(ty),
                value: None,
            },
            span,
        )
    }

    /// Initial value of a variable's declaration, if it has one.
    fn variable_value(&self, variable: SymbolId) -> Option<NodeId> {
        let node = self.symbols[variable].node?;
        match self.nodes.kind(node) {
            NodeKind::Variable { value, .. } => *value,
            _ => None,
        }
    }

    /// Append a synthesized function to `owner`'s primary block and declare it.
    fn add_synthesized(
        &mut self,
        owner: SymbolId,
        function: NodeKind,
        span: Span,
        flags: SymbolFlags,
    ) -> Option<SymbolId> {
        let primary = self.symbols[owner].node?;
        let block = match self.nodes.kind(primary) {
            NodeKind::Object { block, .. } | NodeKind::Enum { block, .. } => *block,
            _ => return None,
        };
        let scope = self.symbols[owner].own_scope?;
        let node = self.nodes.alloc(function, span);
        self.nodes.push_statement(block, node);
        let symbol = self.declare_synthesized(node, scope, owner)?;
        self.symbols[symbol].flags |= flags;
        Some(symbol)
    }
}
