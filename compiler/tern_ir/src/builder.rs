//! Programmatic syntax tree construction.
//!
//! The front end and tests build trees through [`AstBuilder`] instead of
//! assembling [`NodeKind`] values by hand. Every node receives a distinct
//! span in increasing order, so diagnostics stay ordered by construction.

use crate::ast::{BinaryOp, DeclHeader, NodeKind, ObjectKind, UnaryOp};
use crate::{NodeArena, NodeId, Span, StringInterner, TypeId};

pub struct AstBuilder<'a> {
    arena: &'a mut NodeArena,
    interner: &'a StringInterner,
    file: u32,
    offset: u32,
}

impl<'a> AstBuilder<'a> {
    pub fn new(arena: &'a mut NodeArena, interner: &'a StringInterner, file: u32) -> Self {
        AstBuilder {
            arena,
            interner,
            file,
            offset: 0,
        }
    }

    pub fn arena(&mut self) -> &mut NodeArena {
        &mut *self.arena
    }

    fn next_span(&mut self) -> Span {
        let start = self.offset;
        self.offset += 1;
        Span::new(self.file, start, start + 1)
    }

    fn node(&mut self, kind: NodeKind) -> NodeId {
        let span = self.next_span();
        self.arena.alloc(kind, span)
    }

    fn nodes(&mut self, kinds: impl IntoIterator<Item = NodeKind>) -> Vec<NodeId> {
        kinds.into_iter().map(|kind| self.node(kind)).collect()
    }

    // Declarations

    pub fn header(&mut self, name: &str) -> DeclHeader {
        let span = self.next_span();
        DeclHeader::new(self.interner.intern(name), span)
    }

    pub fn annotation(&mut self, name: &str, arguments: Vec<NodeId>) -> NodeId {
        let name = self.interner.intern(name);
        self.node(NodeKind::Annotation { name, arguments })
    }

    pub fn block(&mut self, statements: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::Block { statements })
    }

    pub fn namespace(&mut self, header: DeclHeader, members: Vec<NodeId>) -> NodeId {
        let block = self.block(members);
        self.node(NodeKind::Namespace { header, block })
    }

    pub fn extension(&mut self, header: DeclHeader, members: Vec<NodeId>) -> NodeId {
        let block = self.block(members);
        self.node(NodeKind::Extension { header, block })
    }

    fn object(
        &mut self,
        kind: ObjectKind,
        header: DeclHeader,
        parameters: &[&str],
        bases: Vec<NodeId>,
        members: Vec<NodeId>,
    ) -> NodeId {
        let parameters = parameters
            .iter()
            .map(|name| self.type_parameter(name))
            .collect();
        let block = self.block(members);
        self.node(NodeKind::Object {
            header,
            kind,
            parameters,
            bases,
            block,
        })
    }

    pub fn class(
        &mut self,
        header: DeclHeader,
        parameters: &[&str],
        bases: Vec<NodeId>,
        members: Vec<NodeId>,
    ) -> NodeId {
        self.object(ObjectKind::Class, header, parameters, bases, members)
    }

    pub fn interface(
        &mut self,
        header: DeclHeader,
        parameters: &[&str],
        bases: Vec<NodeId>,
        members: Vec<NodeId>,
    ) -> NodeId {
        self.object(ObjectKind::Interface, header, parameters, bases, members)
    }

    pub fn enumeration(&mut self, header: DeclHeader, values: Vec<NodeId>) -> NodeId {
        let block = self.block(values);
        self.node(NodeKind::Enum {
            header,
            is_flags: false,
            block,
        })
    }

    pub fn flags(&mut self, header: DeclHeader, values: Vec<NodeId>) -> NodeId {
        let block = self.block(values);
        self.node(NodeKind::Enum {
            header,
            is_flags: true,
            block,
        })
    }

    /// An enum value with an optional explicit initializer.
    pub fn enum_value(&mut self, name: &str, value: Option<NodeId>) -> NodeId {
        let header = self.header(name);
        self.variable(header, None, value)
    }

    pub fn type_parameter(&mut self, name: &str) -> NodeId {
        let header = self.header(name);
        self.node(NodeKind::TypeParameter { header })
    }

    pub fn function(
        &mut self,
        header: DeclHeader,
        arguments: Vec<NodeId>,
        result: Option<NodeId>,
        body: Option<Vec<NodeId>>,
    ) -> NodeId {
        self.generic_function(header, &[], arguments, result, body)
    }

    pub fn generic_function(
        &mut self,
        header: DeclHeader,
        parameters: &[&str],
        arguments: Vec<NodeId>,
        result: Option<NodeId>,
        body: Option<Vec<NodeId>>,
    ) -> NodeId {
        let parameters = parameters
            .iter()
            .map(|name| self.type_parameter(name))
            .collect();
        let body = body.map(|statements| self.block(statements));
        self.node(NodeKind::Function {
            header,
            parameters,
            arguments,
            result,
            initializers: Vec::new(),
            body,
        })
    }

    /// A constructor (`def new`).
    pub fn constructor(
        &mut self,
        header: DeclHeader,
        arguments: Vec<NodeId>,
        initializers: Vec<NodeId>,
        body: Vec<NodeId>,
    ) -> NodeId {
        let body = Some(self.block(body));
        self.node(NodeKind::Function {
            header,
            parameters: Vec::new(),
            arguments,
            result: None,
            initializers,
            body,
        })
    }

    pub fn member_initializer(&mut self, name: &str, value: NodeId) -> NodeId {
        let name = self.interner.intern(name);
        self.node(NodeKind::MemberInitializer { name, value })
    }

    pub fn argument(&mut self, name: &str, ty: NodeId) -> NodeId {
        let header = self.header(name);
        self.variable(header, Some(ty), None)
    }

    pub fn variable(
        &mut self,
        header: DeclHeader,
        ty: Option<NodeId>,
        value: Option<NodeId>,
    ) -> NodeId {
        self.node(NodeKind::Variable { header, ty, value })
    }

    pub fn alias(&mut self, header: DeclHeader, value: NodeId) -> NodeId {
        self.node(NodeKind::Alias { header, value })
    }

    pub fn define(&mut self, header: DeclHeader, value: NodeId) -> NodeId {
        self.node(NodeKind::Define { header, value })
    }

    pub fn file(&mut self, statements: Vec<NodeId>) -> NodeId {
        let block = self.block(statements);
        self.node(NodeKind::File { block })
    }

    pub fn program(&mut self, files: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::Program { files })
    }

    // Statements

    pub fn expr(&mut self, value: NodeId) -> NodeId {
        self.node(NodeKind::Expression { value })
    }

    pub fn ret(&mut self, value: Option<NodeId>) -> NodeId {
        self.node(NodeKind::Return { value })
    }

    pub fn brk(&mut self) -> NodeId {
        self.node(NodeKind::Break)
    }

    pub fn cont(&mut self) -> NodeId {
        self.node(NodeKind::Continue)
    }

    pub fn if_(&mut self, test: NodeId, yes: Vec<NodeId>, no: Option<Vec<NodeId>>) -> NodeId {
        let yes = self.block(yes);
        let no = no.map(|statements| self.block(statements));
        self.node(NodeKind::If { test, yes, no })
    }

    pub fn while_(&mut self, test: NodeId, body: Vec<NodeId>) -> NodeId {
        let block = self.block(body);
        self.node(NodeKind::While { test, block })
    }

    pub fn for_(
        &mut self,
        setup: Option<NodeId>,
        test: Option<NodeId>,
        update: Option<NodeId>,
        body: Vec<NodeId>,
    ) -> NodeId {
        let block = self.block(body);
        self.node(NodeKind::For {
            setup,
            test,
            update,
            block,
        })
    }

    pub fn switch(&mut self, value: NodeId, cases: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::Switch { value, cases })
    }

    /// A switch case; no values makes it the default case.
    pub fn case(&mut self, values: Vec<NodeId>, body: Vec<NodeId>) -> NodeId {
        let block = self.block(body);
        self.node(NodeKind::Case { values, block })
    }

    pub fn assert(&mut self, value: NodeId) -> NodeId {
        self.node(NodeKind::Assert { value })
    }

    // Expressions

    pub fn name(&mut self, name: &str) -> NodeId {
        let name = self.interner.intern(name);
        self.node(NodeKind::Name(name))
    }

    pub fn dot(&mut self, target: NodeId, name: &str) -> NodeId {
        let name = self.interner.intern(name);
        self.node(NodeKind::Dot {
            target: Some(target),
            name,
        })
    }

    /// `.name` with no target.
    pub fn unparented_dot(&mut self, name: &str) -> NodeId {
        let name = self.interner.intern(name);
        self.node(NodeKind::Dot { target: None, name })
    }

    pub fn this(&mut self) -> NodeId {
        self.node(NodeKind::This)
    }

    pub fn null(&mut self) -> NodeId {
        self.node(NodeKind::Null)
    }

    pub fn boolean(&mut self, value: bool) -> NodeId {
        self.node(NodeKind::Bool(value))
    }

    pub fn int(&mut self, value: i64) -> NodeId {
        self.node(NodeKind::Int(value))
    }

    pub fn double(&mut self, value: f64) -> NodeId {
        self.node(NodeKind::Double(value))
    }

    pub fn string(&mut self, value: &str) -> NodeId {
        let value = self.interner.intern(value);
        self.node(NodeKind::String(value))
    }

    pub fn list(&mut self, values: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::List { values })
    }

    pub fn map(&mut self, entries: Vec<(NodeId, NodeId)>) -> NodeId {
        let entries = self.nodes(
            entries
                .into_iter()
                .map(|(key, value)| NodeKind::Pair { key, value }),
        );
        self.node(NodeKind::Map { entries })
    }

    pub fn call(&mut self, target: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::Call { target, arguments })
    }

    /// `target.name(arguments…)`
    pub fn method_call(&mut self, target: NodeId, name: &str, arguments: Vec<NodeId>) -> NodeId {
        let callee = self.dot(target, name);
        self.call(callee, arguments)
    }

    pub fn super_call(&mut self, arguments: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::SuperCall { arguments })
    }

    pub fn new_object(&mut self, ty: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::New { ty, arguments })
    }

    pub fn cast(&mut self, ty: NodeId, value: NodeId) -> NodeId {
        self.node(NodeKind::Cast { ty, value })
    }

    pub fn hook(&mut self, test: NodeId, yes: NodeId, no: NodeId) -> NodeId {
        self.node(NodeKind::Hook { test, yes, no })
    }

    pub fn index(&mut self, target: NodeId, index: NodeId) -> NodeId {
        self.node(NodeKind::Index { target, index })
    }

    pub fn parameterize(&mut self, target: NodeId, arguments: Vec<NodeId>) -> NodeId {
        self.node(NodeKind::Parameterize { target, arguments })
    }

    /// `Name<arguments…>`, the usual way generic types are written.
    pub fn generic(&mut self, name: &str, arguments: Vec<NodeId>) -> NodeId {
        let target = self.name(name);
        self.parameterize(target, arguments)
    }

    pub fn unary(&mut self, op: UnaryOp, value: NodeId) -> NodeId {
        self.node(NodeKind::Unary { op, value })
    }

    pub fn binary(&mut self, op: BinaryOp, left: NodeId, right: NodeId) -> NodeId {
        self.node(NodeKind::Binary { op, left, right })
    }

    pub fn assign(&mut self, left: NodeId, right: NodeId) -> NodeId {
        self.binary(BinaryOp::Assign, left, right)
    }

    pub fn ty(&mut self, ty: TypeId) -> NodeId {
        self.node(NodeKind::Type(ty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ModifierKind;

    #[test]
    fn spans_increase_in_build_order() {
        let interner = StringInterner::new();
        let mut arena = NodeArena::new();
        let mut b = AstBuilder::new(&mut arena, &interner, 3);
        let one = b.int(1);
        let two = b.int(2);
        let sum = b.binary(BinaryOp::Add, one, two);
        let arena = b.arena();
        assert!(arena.span(one) < arena.span(two));
        assert!(arena.span(two) < arena.span(sum));
        assert_eq!(arena.span(sum).file, 3);
    }

    #[test]
    fn class_creates_type_parameters_and_block() {
        let interner = StringInterner::new();
        let mut arena = NodeArena::new();
        let mut b = AstBuilder::new(&mut arena, &interner, 0);
        let header = b.header("Box").with_modifier(ModifierKind::Final);
        let class = b.class(header, &["T"], Vec::new(), Vec::new());
        let NodeKind::Object {
            header,
            parameters,
            block,
            ..
        } = b.arena().kind(class).clone()
        else {
            panic!("expected object");
        };
        assert!(header.has_modifier(ModifierKind::Final));
        assert_eq!(parameters.len(), 1);
        assert_eq!(b.arena().parent(parameters[0]), Some(class));
        assert_eq!(b.arena().parent(block), Some(class));
        assert_eq!(interner.lookup(header.name), "Box");
    }

    #[test]
    fn method_call_builds_dot_target() {
        let interner = StringInterner::new();
        let mut arena = NodeArena::new();
        let mut b = AstBuilder::new(&mut arena, &interner, 0);
        let receiver = b.name("items");
        let call = b.method_call(receiver, "push", Vec::new());
        let NodeKind::Call { target, .. } = b.arena().kind(call).clone() else {
            panic!("expected call");
        };
        assert!(matches!(
            b.arena().kind(target),
            NodeKind::Dot { target: Some(t), .. } if *t == receiver
        ));
    }
}
