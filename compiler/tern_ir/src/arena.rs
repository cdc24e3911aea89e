//! Node arena.

use std::ops::{Index, IndexMut};

use crate::ast::{Node, NodeKind};
use crate::{NodeId, Span};

/// Owns every node of a program.
///
/// Allocation links each child to its parent. Rewrites keep node ids stable:
/// [`replace`](NodeArena::replace) swaps a node's kind in place and
/// [`wrap`](NodeArena::wrap) moves a node's content into a fresh child so the
/// original id becomes the wrapper.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        NodeArena { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        NodeArena {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Allocate a node and point its children back at it.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId::from_usize(self.nodes.len());
        for child in kind.children() {
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes.push(Node::new(kind, span));
        id
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    #[inline]
    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Replace a node's kind, keeping its id, span, parent and sibling.
    ///
    /// Resolver annotations are cleared since they described the old kind.
    pub fn replace(&mut self, id: NodeId, kind: NodeKind) {
        for child in kind.children() {
            self.nodes[child.index()].parent = Some(id);
        }
        let node = &mut self.nodes[id.index()];
        node.kind = kind;
        node.ty = None;
        node.symbol = None;
    }

    /// Move `id`'s content into a new child node and turn `id` into the node
    /// built by `make` around that child.
    ///
    /// Returns the id of the moved content. The parent's child slot keeps
    /// pointing at `id`, which is now the wrapper.
    pub fn wrap(&mut self, id: NodeId, make: impl FnOnce(NodeId) -> NodeKind) -> NodeId {
        let inner = NodeId::from_usize(self.nodes.len());
        let outer = &mut self.nodes[id.index()];
        let moved = Node {
            kind: std::mem::replace(&mut outer.kind, NodeKind::Null),
            span: outer.span,
            parent: Some(id),
            sibling: None,
            ty: outer.ty.take(),
            symbol: outer.symbol.take(),
        };
        let moved_children = moved.kind.children();
        self.nodes.push(moved);
        for child in moved_children {
            self.nodes[child.index()].parent = Some(inner);
        }
        let kind = make(inner);
        self.replace(id, kind);
        inner
    }

    /// Append a statement to a `Block` node.
    ///
    /// # Panics
    /// Panics if `block` is not a block.
    pub fn push_statement(&mut self, block: NodeId, statement: NodeId) {
        match &mut self.nodes[block.index()].kind {
            NodeKind::Block { statements } => statements.push(statement),
            other => panic!("push_statement on {}", other.describe()),
        }
        self.nodes[statement.index()].parent = Some(block);
    }

    /// Walk parent links starting at (and excluding) `id`.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&node| self.parent(node))
    }

    /// Iterate the declaration fragments chained from `first` through `sibling`.
    pub fn fragments(&self, first: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(first), move |&node| self.nodes[node.index()].sibling)
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl IndexMut<NodeId> for NodeArena {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}
