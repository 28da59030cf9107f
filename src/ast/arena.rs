//! Node storage.
//!
//! All nodes of one or more trees live in a single [`Ast`] arena and are
//! addressed by generational [`NodeId`] handles. Freeing a node bumps its
//! slot's generation, so handles to freed nodes are detected and panic
//! instead of silently reading a recycled slot.

use super::kind::NodeKind;
use super::node::Node;
use std::fmt;

/// Handle to a node in an [`Ast`] arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index, self.generation)
    }
}

pub(crate) struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// An AST arena.
///
/// Owns every node; all structural operations (construction, mutation,
/// traversal, rendering) are methods on the arena taking [`NodeId`]s.
#[derive(Default)]
pub struct Ast {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl Ast {
    pub fn new() -> Self {
        Ast {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 1,
                    node: Some(node),
                });
                NodeId {
                    index,
                    generation: 1,
                }
            }
        }
    }

    fn dealloc(&mut self, id: NodeId) {
        let slot = &mut self.slots[id.index as usize];
        debug_assert_eq!(slot.generation, id.generation);
        slot.node = None;
        slot.generation += 1;
        self.free.push(id.index);
    }

    /// True if `id` refers to a live node in this arena.
    pub fn contains(&self, id: NodeId) -> bool {
        matches!(
            self.slots.get(id.index as usize),
            Some(slot) if slot.generation == id.generation && slot.node.is_some()
        )
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[track_caller]
    pub(crate) fn get(&self, id: NodeId) -> &Node {
        match self.slots.get(id.index as usize) {
            Some(slot) if slot.generation == id.generation => match &slot.node {
                Some(node) => node,
                None => panic!("stale NodeId: {:?}", id),
            },
            _ => panic!("stale NodeId: {:?}", id),
        }
    }

    #[track_caller]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        match self.slots.get_mut(id.index as usize) {
            Some(slot) if slot.generation == id.generation => match &mut slot.node {
                Some(node) => node,
                None => panic!("stale NodeId: {:?}", id),
            },
            _ => panic!("stale NodeId: {:?}", id),
        }
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.get(id).kind
    }

    /// Frees a detached subtree, invalidating every handle into it.
    ///
    /// # Panics
    ///
    /// Panics if the node is attached to a parent, or if `id` is stale.
    pub fn free(&mut self, id: NodeId) {
        assert!(
            self.get(id).parent.is_none(),
            "cannot free an attached node: {:?}",
            id
        );
        self.free_subtree(id);
    }

    pub(crate) fn free_subtree(&mut self, id: NodeId) {
        for child in self.children(id) {
            self.free_subtree(child);
        }
        self.dealloc(id);
    }
}

#[cfg(test)]
mod tests {
    use super::super::kind::NodeKind;
    use super::*;

    #[test]
    fn test_alloc_reuses_freed_slots_with_new_generation() {
        let mut ast = Ast::new();
        let a = ast.node(NodeKind::Variable);
        let before = ast.len();
        ast.free(a);
        assert!(!ast.contains(a));
        let b = ast.node(NodeKind::Variable);
        assert_eq!(ast.len(), before);
        assert_ne!(a, b);
        assert!(ast.contains(b));
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn test_stale_handle_panics() {
        let mut ast = Ast::new();
        let a = ast.node(NodeKind::Variable);
        ast.free(a);
        ast.kind(a);
    }

    #[test]
    #[should_panic(expected = "cannot free an attached node")]
    fn test_free_attached_panics() {
        let mut ast = Ast::new();
        let var = ast.node(NodeKind::Variable);
        let neg = ast.node_with(NodeKind::Negative, &[var.into()]);
        let _ = neg;
        ast.free(var);
    }

    #[test]
    fn test_free_invalidates_whole_subtree() {
        let mut ast = Ast::new();
        let var = ast.node(NodeKind::Variable);
        let neg = ast.node_with(NodeKind::Negative, &[var.into()]);
        ast.free(neg);
        assert!(!ast.contains(neg));
        assert!(!ast.contains(var));
    }
}
