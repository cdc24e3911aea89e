//! Syntax tree nodes.
//!
//! Each [`NodeKind`] variant carries exactly the children its construct may
//! have: fixed slots are `NodeId`, optional slots `Option<NodeId>` and lists
//! `Vec<NodeId>`. Literal content lives in the payload as well, so a node can
//! never hold a child shape its kind does not allow.
//!
//! Nodes live in a [`NodeArena`](crate::NodeArena). Parent links and the
//! resolver's annotations (`ty`, `symbol`) sit beside the kind on [`Node`].

mod modifiers;
mod operators;

pub use modifiers::{DeclHeader, Modifier, ModifierKind};
pub use operators::{BinaryOp, UnaryOp};

use smallvec::SmallVec;

use crate::{Name, NodeId, Span, SymbolId, TypeId};

/// Whether an object declaration is a class or an interface.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ObjectKind {
    Class,
    Interface,
}

/// Child list returned by [`NodeKind::children`].
pub type Children = SmallVec<[NodeId; 4]>;

#[derive(Clone, PartialEq, Debug)]
pub enum NodeKind {
    // Structure
    Program {
        files: Vec<NodeId>,
    },
    File {
        block: NodeId,
    },
    Block {
        statements: Vec<NodeId>,
    },
    /// Switch case. An empty `values` list is the default case.
    Case {
        values: Vec<NodeId>,
        block: NodeId,
    },
    /// `@Name(arguments…)`
    Annotation {
        name: Name,
        arguments: Vec<NodeId>,
    },
    /// `name = value` in a constructor's initializer list.
    MemberInitializer {
        name: Name,
        value: NodeId,
    },

    // Declarations
    Namespace {
        header: DeclHeader,
        block: NodeId,
    },
    Enum {
        header: DeclHeader,
        is_flags: bool,
        block: NodeId,
    },
    Object {
        header: DeclHeader,
        kind: ObjectKind,
        /// `TypeParameter` nodes.
        parameters: Vec<NodeId>,
        bases: Vec<NodeId>,
        block: NodeId,
    },
    /// Additional members for an object or namespace declared elsewhere.
    Extension {
        header: DeclHeader,
        block: NodeId,
    },
    /// Functions, methods and constructors (named `new`).
    Function {
        header: DeclHeader,
        parameters: Vec<NodeId>,
        /// `Variable` nodes.
        arguments: Vec<NodeId>,
        result: Option<NodeId>,
        /// `MemberInitializer` nodes, constructors only.
        initializers: Vec<NodeId>,
        body: Option<NodeId>,
    },
    Variable {
        header: DeclHeader,
        ty: Option<NodeId>,
        value: Option<NodeId>,
    },
    TypeParameter {
        header: DeclHeader,
    },
    Alias {
        header: DeclHeader,
        value: NodeId,
    },
    Define {
        header: DeclHeader,
        value: NodeId,
    },

    // Statements
    Expression {
        value: NodeId,
    },
    Return {
        value: Option<NodeId>,
    },
    Break,
    Continue,
    If {
        test: NodeId,
        yes: NodeId,
        no: Option<NodeId>,
    },
    While {
        test: NodeId,
        block: NodeId,
    },
    For {
        setup: Option<NodeId>,
        test: Option<NodeId>,
        update: Option<NodeId>,
        block: NodeId,
    },
    Switch {
        value: NodeId,
        /// `Case` nodes.
        cases: Vec<NodeId>,
    },
    Assert {
        value: NodeId,
    },

    // Expressions
    Name(Name),
    /// Member access. A missing target is an unparented access such as
    /// `.Red`, which takes its type from the surrounding context.
    Dot {
        target: Option<NodeId>,
        name: Name,
    },
    This,
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(Name),
    List {
        values: Vec<NodeId>,
    },
    /// `Pair` nodes.
    Map {
        entries: Vec<NodeId>,
    },
    Pair {
        key: NodeId,
        value: NodeId,
    },
    Call {
        target: NodeId,
        arguments: Vec<NodeId>,
    },
    SuperCall {
        arguments: Vec<NodeId>,
    },
    New {
        ty: NodeId,
        arguments: Vec<NodeId>,
    },
    Cast {
        ty: NodeId,
        value: NodeId,
    },
    /// Conversion inserted by the resolver; the target type is the node's `ty`.
    ImplicitCast {
        value: NodeId,
    },
    Hook {
        test: NodeId,
        yes: NodeId,
        no: NodeId,
    },
    Index {
        target: NodeId,
        index: NodeId,
    },
    Parameterize {
        target: NodeId,
        arguments: Vec<NodeId>,
    },
    Unary {
        op: UnaryOp,
        value: NodeId,
    },
    Binary {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },
    /// Reference to an already-known type, used by synthesized code.
    Type(TypeId),
}

impl NodeKind {
    /// All child nodes in source order.
    pub fn children(&self) -> Children {
        fn header_annotations(header: &DeclHeader, out: &mut Children) {
            out.extend(header.annotations.iter().copied());
        }

        let mut out = Children::new();
        match self {
            NodeKind::Program { files } => out.extend(files.iter().copied()),
            NodeKind::File { block } => out.push(*block),
            NodeKind::Block { statements } => out.extend(statements.iter().copied()),
            NodeKind::Case { values, block } => {
                out.extend(values.iter().copied());
                out.push(*block);
            }
            NodeKind::Annotation { arguments, .. }
            | NodeKind::SuperCall { arguments }
            | NodeKind::List { values: arguments }
            | NodeKind::Map { entries: arguments } => out.extend(arguments.iter().copied()),
            NodeKind::MemberInitializer { value, .. }
            | NodeKind::Expression { value }
            | NodeKind::Assert { value }
            | NodeKind::ImplicitCast { value }
            | NodeKind::Unary { value, .. } => out.push(*value),
            NodeKind::Namespace { header, block }
            | NodeKind::Extension { header, block }
            | NodeKind::Enum { header, block, .. } => {
                header_annotations(header, &mut out);
                out.push(*block);
            }
            NodeKind::Object {
                header,
                parameters,
                bases,
                block,
                ..
            } => {
                header_annotations(header, &mut out);
                out.extend(parameters.iter().copied());
                out.extend(bases.iter().copied());
                out.push(*block);
            }
            NodeKind::Function {
                header,
                parameters,
                arguments,
                result,
                initializers,
                body,
            } => {
                header_annotations(header, &mut out);
                out.extend(parameters.iter().copied());
                out.extend(arguments.iter().copied());
                out.extend(*result);
                out.extend(initializers.iter().copied());
                out.extend(*body);
            }
            NodeKind::Variable { header, ty, value } => {
                header_annotations(header, &mut out);
                out.extend(*ty);
                out.extend(*value);
            }
            NodeKind::TypeParameter { header } => header_annotations(header, &mut out),
            NodeKind::Alias { header, value } | NodeKind::Define { header, value } => {
                header_annotations(header, &mut out);
                out.push(*value);
            }
            NodeKind::Return { value } => out.extend(*value),
            NodeKind::If { test, yes, no } => {
                out.push(*test);
                out.push(*yes);
                out.extend(*no);
            }
            NodeKind::While { test, block } => {
                out.push(*test);
                out.push(*block);
            }
            NodeKind::For {
                setup,
                test,
                update,
                block,
            } => {
                out.extend(*setup);
                out.extend(*test);
                out.extend(*update);
                out.push(*block);
            }
            NodeKind::Switch { value, cases } => {
                out.push(*value);
                out.extend(cases.iter().copied());
            }
            NodeKind::Dot { target, .. } => out.extend(*target),
            NodeKind::Pair { key, value } => {
                out.push(*key);
                out.push(*value);
            }
            NodeKind::Call { target, arguments }
            | NodeKind::Parameterize { target, arguments } => {
                out.push(*target);
                out.extend(arguments.iter().copied());
            }
            NodeKind::New { ty, arguments } => {
                out.push(*ty);
                out.extend(arguments.iter().copied());
            }
            NodeKind::Cast { ty, value } => {
                out.push(*ty);
                out.push(*value);
            }
            NodeKind::Hook { test, yes, no } => {
                out.push(*test);
                out.push(*yes);
                out.push(*no);
            }
            NodeKind::Index { target, index } => {
                out.push(*target);
                out.push(*index);
            }
            NodeKind::Binary { left, right, .. } => {
                out.push(*left);
                out.push(*right);
            }
            NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Name(_)
            | NodeKind::This
            | NodeKind::Null
            | NodeKind::Bool(_)
            | NodeKind::Int(_)
            | NodeKind::Double(_)
            | NodeKind::String(_)
            | NodeKind::Type(_) => {}
        }
        out
    }

    /// Header of a declaration node.
    pub fn header(&self) -> Option<&DeclHeader> {
        match self {
            NodeKind::Namespace { header, .. }
            | NodeKind::Enum { header, .. }
            | NodeKind::Object { header, .. }
            | NodeKind::Extension { header, .. }
            | NodeKind::Function { header, .. }
            | NodeKind::Variable { header, .. }
            | NodeKind::TypeParameter { header }
            | NodeKind::Alias { header, .. }
            | NodeKind::Define { header, .. } => Some(header),
            _ => None,
        }
    }

    pub fn is_declaration(&self) -> bool {
        self.header().is_some()
    }

    /// Literal nodes produced by constant folding.
    pub fn is_constant(&self) -> bool {
        matches!(
            self,
            NodeKind::Bool(_) | NodeKind::Int(_) | NodeKind::Double(_) | NodeKind::String(_)
        )
    }

    /// Short description used in diagnostics and panics.
    pub fn describe(&self) -> &'static str {
        match self {
            NodeKind::Program { .. } => "program",
            NodeKind::File { .. } => "file",
            NodeKind::Block { .. } => "block",
            NodeKind::Case { .. } => "case",
            NodeKind::Annotation { .. } => "annotation",
            NodeKind::MemberInitializer { .. } => "member initializer",
            NodeKind::Namespace { .. } => "namespace",
            NodeKind::Enum { is_flags: false, .. } => "enum",
            NodeKind::Enum { is_flags: true, .. } => "flags enum",
            NodeKind::Object {
                kind: ObjectKind::Class,
                ..
            } => "class",
            NodeKind::Object {
                kind: ObjectKind::Interface,
                ..
            } => "interface",
            NodeKind::Extension { .. } => "extension",
            NodeKind::Function { .. } => "function",
            NodeKind::Variable { .. } => "variable",
            NodeKind::TypeParameter { .. } => "type parameter",
            NodeKind::Alias { .. } => "alias",
            NodeKind::Define { .. } => "define",
            NodeKind::Expression { .. } => "expression statement",
            NodeKind::Return { .. } => "return",
            NodeKind::Break => "break",
            NodeKind::Continue => "continue",
            NodeKind::If { .. } => "if",
            NodeKind::While { .. } => "while",
            NodeKind::For { .. } => "for",
            NodeKind::Switch { .. } => "switch",
            NodeKind::Assert { .. } => "assert",
            NodeKind::Name(_) => "name",
            NodeKind::Dot { .. } => "member access",
            NodeKind::This => "this",
            NodeKind::Null => "null",
            NodeKind::Bool(_) => "bool literal",
            NodeKind::Int(_) => "int literal",
            NodeKind::Double(_) => "double literal",
            NodeKind::String(_) => "string literal",
            NodeKind::List { .. } => "list literal",
            NodeKind::Map { .. } => "map literal",
            NodeKind::Pair { .. } => "pair",
            NodeKind::Call { .. } => "call",
            NodeKind::SuperCall { .. } => "super call",
            NodeKind::New { .. } => "new",
            NodeKind::Cast { .. } => "cast",
            NodeKind::ImplicitCast { .. } => "implicit cast",
            NodeKind::Hook { .. } => "hook",
            NodeKind::Index { .. } => "index",
            NodeKind::Parameterize { .. } => "type application",
            NodeKind::Unary { .. } => "unary expression",
            NodeKind::Binary { .. } => "binary expression",
            NodeKind::Type(_) => "type",
        }
    }
}

/// A syntax tree node plus the resolver's annotations.
#[derive(Clone, PartialEq, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    pub parent: Option<NodeId>,
    /// Next declaration fragment of the same symbol (namespaces and extensions).
    pub sibling: Option<NodeId>,
    pub ty: Option<TypeId>,
    pub symbol: Option<SymbolId>,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node {
            kind,
            span,
            parent: None,
            sibling: None,
            ty: None,
            symbol: None,
        }
    }
}
