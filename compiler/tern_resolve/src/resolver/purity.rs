//! Purity of resolved expressions.

use tern_ir::{NodeId, NodeKind};

use super::Resolver;

impl Resolver<'_> {
    /// Whether evaluating a resolved expression has no side effects.
    ///
    /// Assignments, `++`/`--` and calls of functions that are neither pure
    /// nor imported make an expression impure.
    pub(crate) fn is_pure_expression(&self, node: NodeId) -> bool {
        let pure_here = match self.nodes.kind(node) {
            NodeKind::Binary { op, .. } => !op.is_assign(),
            NodeKind::Unary { op, .. } => !op.is_increment_or_decrement(),
            NodeKind::Call { target, .. } => self.nodes[*target]
                .symbol
                .is_some_and(|callee| self.is_pure_callee(callee)),
            NodeKind::New { .. } | NodeKind::SuperCall { .. } => self.nodes[node]
                .symbol
                .is_some_and(|constructor| self.is_pure_callee(constructor)),
            _ => true,
        };
        pure_here
            && self
                .nodes
                .kind(node)
                .children()
                .into_iter()
                .all(|child| self.is_pure_expression(child))
    }
}
