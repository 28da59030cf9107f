//! Node-side tree surgery: detach, replace, swap, insert, and sibling
//! navigation.
//!
//! These operations act on a node through its parent link, whatever the
//! container shape. Misuse (operating on a detached node, list-only
//! operations on a slot child, replacing a slot child with several nodes)
//! panics; see each method's `# Panics` section.

use super::arena::{Ast, NodeId};
use super::kind::NodeKind;
use super::node::{Attr, ParentLink};

impl Ast {
    #[track_caller]
    fn parent_link(&self, id: NodeId) -> ParentLink {
        match self.get(id).parent {
            Some(link) => link,
            None => panic!("node has no parent: {:?}", id),
        }
    }

    /// Detaches `id` from its parent. The node stays alive and becomes the
    /// root of its own tree.
    ///
    /// # Panics
    ///
    /// Panics if the node has no parent.
    #[track_caller]
    pub fn detach(&mut self, id: NodeId) {
        match self.parent_link(id) {
            ParentLink::Slot { parent, attr } => self.set_child_at(parent, attr, None),
            ParentLink::Array { parent, .. } | ParentLink::Chain { parent, .. } => {
                self.list_remove_node(parent, id)
            }
        }
    }

    /// Replaces `id` in its parent with `nodes`. A slot child accepts at
    /// most one replacement; a list element accepts any number, including
    /// none (which is a removal). `id` itself ends up detached and may
    /// appear once among `nodes` to be reinserted without copying.
    ///
    /// # Panics
    ///
    /// Panics if the node has no parent, or if a slot child is given more
    /// than one replacement.
    #[track_caller]
    pub fn replace_with(&mut self, id: NodeId, nodes: &[NodeId]) {
        match self.parent_link(id) {
            ParentLink::Slot { parent, attr } => {
                assert!(
                    nodes.len() <= 1,
                    "cannot replace a slot child with {} nodes",
                    nodes.len()
                );
                self.set_child_at(parent, attr, nodes.first().copied());
            }
            ParentLink::Array { parent, .. } | ParentLink::Chain { parent, .. } => {
                self.list_replace_node(parent, id, nodes)
            }
        }
    }

    /// Exchanges the positions of `a` and `b`, covering all four
    /// attached/detached combinations. Swapping a node with itself, or two
    /// detached nodes, is a no-op.
    pub fn swap_with(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        match (self.is_attached(a), self.is_attached(b)) {
            (true, true) => {
                // Park a placeholder in a's position so b's position can
                // take a first.
                let placeholder = self.node(NodeKind::Default);
                self.replace_with(a, &[placeholder]);
                self.replace_with(b, &[a]);
                self.replace_with(placeholder, &[b]);
                self.free(placeholder);
            }
            (true, false) => self.replace_with(a, &[b]),
            (false, true) => self.replace_with(b, &[a]),
            (false, false) => {}
        }
    }

    /// Inserts `nodes` into the parent list right after `id`.
    ///
    /// # Panics
    ///
    /// Panics if the node has no parent or its parent is not a list.
    #[track_caller]
    pub fn insert_next(&mut self, id: NodeId, nodes: &[NodeId]) {
        let parent = self.require_list_parent(id);
        self.list_insert_after(parent, id, nodes);
    }

    /// Inserts `nodes` into the parent list right before `id`.
    ///
    /// # Panics
    ///
    /// Panics if the node has no parent or its parent is not a list.
    #[track_caller]
    pub fn insert_prev(&mut self, id: NodeId, nodes: &[NodeId]) {
        let parent = self.require_list_parent(id);
        self.list_insert_before(parent, id, nodes);
    }

    #[track_caller]
    fn require_list_parent(&self, id: NodeId) -> NodeId {
        let parent = self.parent_link(id).parent();
        assert!(
            self.get(parent).kind.is_list(),
            "parent of {:?} is not a list",
            id
        );
        parent
    }

    /// The next sibling under this node's parent, whatever its shape. For a
    /// slot parent this skips empty slots.
    ///
    /// # Panics
    ///
    /// Panics if the node has no parent.
    #[track_caller]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent_link(id).parent();
        self.node_after(parent, id)
    }

    /// The previous sibling under this node's parent.
    ///
    /// # Panics
    ///
    /// Panics if the node has no parent.
    #[track_caller]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent_link(id).parent();
        self.node_before(parent, id)
    }

    /// The next sibling, requiring a list parent.
    ///
    /// # Panics
    ///
    /// Panics if the node has no parent or its parent is not a list.
    #[track_caller]
    pub fn list_next(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.require_list_parent(id);
        self.node_after(parent, id)
    }

    /// The previous sibling, requiring a list parent.
    ///
    /// # Panics
    ///
    /// Panics if the node has no parent or its parent is not a list.
    #[track_caller]
    pub fn list_prev(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.require_list_parent(id);
        self.node_before(parent, id)
    }

    /// Parent-side navigation: the child of `parent` that follows `child`.
    /// For a slot parent, empty slots in between are skipped.
    ///
    /// # Panics
    ///
    /// Panics if `child` is not a child of `parent`.
    #[track_caller]
    pub fn node_after(&self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        match self.get(child).parent {
            Some(ParentLink::Slot { parent: p, attr }) if p == parent => self
                .slots_of(parent)
                .iter()
                .skip(attr + 1)
                .find_map(|a| match a {
                    Attr::Child(Some(c)) => Some(*c),
                    _ => None,
                }),
            Some(ParentLink::Array { parent: p, index }) if p == parent => {
                self.at(parent, index as isize + 1)
            }
            Some(ParentLink::Chain { parent: p, next, .. }) if p == parent => next,
            _ => panic!("node is not a child of the given parent"),
        }
    }

    /// Parent-side navigation: the child of `parent` that precedes `child`.
    ///
    /// # Panics
    ///
    /// Panics if `child` is not a child of `parent`.
    #[track_caller]
    pub fn node_before(&self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        match self.get(child).parent {
            Some(ParentLink::Slot { parent: p, attr }) if p == parent => self
                .slots_of(parent)
                .iter()
                .take(attr)
                .rev()
                .find_map(|a| match a {
                    Attr::Child(Some(c)) => Some(*c),
                    _ => None,
                }),
            Some(ParentLink::Array { parent: p, index }) if p == parent => {
                if index == 0 {
                    None
                } else {
                    self.at(parent, index as isize - 1)
                }
            }
            Some(ParentLink::Chain { parent: p, prev, .. }) if p == parent => prev,
            _ => panic!("node is not a child of the given parent"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::kind::NodeKind;
    use super::*;

    fn var(ast: &mut Ast, name: &str) -> NodeId {
        ast.node_with(NodeKind::Variable, &[name.into()])
    }

    #[test]
    fn test_detach_from_slot() {
        let mut ast = Ast::new();
        let x = var(&mut ast, "x");
        let neg = ast.node_with(NodeKind::Negative, &[x.into()]);
        ast.detach(x);
        assert_eq!(ast.child(neg, "expr"), None);
        assert!(!ast.is_attached(x));
    }

    #[test]
    fn test_detach_from_list() {
        let mut ast = Ast::new();
        let a = var(&mut ast, "a");
        let b = var(&mut ast, "b");
        let list = ast.chain(&[a, b]);
        ast.detach(a);
        assert_eq!(ast.list_len(list), 1);
        assert!(!ast.is_attached(a));
    }

    #[test]
    #[should_panic(expected = "node has no parent")]
    fn test_detach_without_parent_panics() {
        let mut ast = Ast::new();
        let x = var(&mut ast, "x");
        ast.detach(x);
        ast.detach(x);
    }

    #[test]
    fn test_detach_and_reattach_keeps_identity() {
        let mut ast = Ast::new();
        let x = var(&mut ast, "x");
        let neg = ast.node_with(NodeKind::Negative, &[x.into()]);
        ast.detach(x);
        let pos = ast.node_with(NodeKind::Positive, &[x.into()]);
        // x was detached, so it moved without being copied.
        assert_eq!(ast.child(pos, "expr"), Some(x));
        assert_eq!(ast.child(neg, "expr"), None);
    }

    #[test]
    fn test_replace_with_in_slot() {
        let mut ast = Ast::new();
        let x = var(&mut ast, "x");
        let y = var(&mut ast, "y");
        let neg = ast.node_with(NodeKind::Negative, &[x.into()]);
        ast.replace_with(x, &[y]);
        assert_eq!(ast.child(neg, "expr"), Some(y));
        assert!(!ast.is_attached(x));
    }

    #[test]
    #[should_panic(expected = "cannot replace a slot child with 2 nodes")]
    fn test_replace_slot_child_with_two_panics() {
        let mut ast = Ast::new();
        let x = var(&mut ast, "x");
        let neg = ast.node_with(NodeKind::Negative, &[x.into()]);
        let _ = neg;
        let a = var(&mut ast, "a");
        let b = var(&mut ast, "b");
        ast.replace_with(x, &[a, b]);
    }

    #[test]
    fn test_replace_list_element_with_several() {
        let mut ast = Ast::new();
        let a = var(&mut ast, "a");
        let b = var(&mut ast, "b");
        let list = ast.array(&[a, b]);
        let x = var(&mut ast, "x");
        let y = var(&mut ast, "y");
        ast.replace_with(a, &[x, y]);
        assert_eq!(ast.list_nodes(list), [x, y, b]);
    }

    #[test]
    fn test_replace_list_element_with_none_removes() {
        let mut ast = Ast::new();
        let a = var(&mut ast, "a");
        let b = var(&mut ast, "b");
        let list = ast.chain(&[a, b]);
        ast.replace_with(a, &[]);
        assert_eq!(ast.list_nodes(list), [b]);
    }

    #[test]
    fn test_swap_both_attached() {
        let mut ast = Ast::new();
        let x = var(&mut ast, "x");
        let neg = ast.node_with(NodeKind::Negative, &[x.into()]);
        let y = var(&mut ast, "y");
        let list = ast.array(&[y]);
        let live = ast.len();

        ast.swap_with(x, y);
        assert_eq!(ast.child(neg, "expr"), Some(y));
        assert_eq!(ast.list_nodes(list), [x]);
        // The placeholder used internally was freed again.
        assert_eq!(ast.len(), live);
    }

    #[test]
    fn test_swap_attached_with_detached() {
        let mut ast = Ast::new();
        let x = var(&mut ast, "x");
        let neg = ast.node_with(NodeKind::Negative, &[x.into()]);
        let y = var(&mut ast, "y");
        ast.swap_with(x, y);
        assert_eq!(ast.child(neg, "expr"), Some(y));
        assert!(!ast.is_attached(x));

        // And the symmetric call.
        ast.swap_with(x, y);
        assert_eq!(ast.child(neg, "expr"), Some(x));
    }

    #[test]
    fn test_swap_detached_pair_and_self_are_noops() {
        let mut ast = Ast::new();
        let x = var(&mut ast, "x");
        let y = var(&mut ast, "y");
        ast.swap_with(x, y);
        assert!(!ast.is_attached(x) && !ast.is_attached(y));
        let neg = ast.node_with(NodeKind::Negative, &[x.into()]);
        ast.swap_with(x, x);
        assert_eq!(ast.child(neg, "expr"), Some(x));
    }

    #[test]
    fn test_insert_next_and_prev() {
        let mut ast = Ast::new();
        let a = var(&mut ast, "a");
        let b = var(&mut ast, "b");
        let list = ast.chain(&[a, b]);
        let x = var(&mut ast, "x");
        let y = var(&mut ast, "y");
        ast.insert_next(a, &[x]);
        ast.insert_prev(a, &[y]);
        assert_eq!(ast.list_nodes(list), [y, a, x, b]);
    }

    #[test]
    #[should_panic(expected = "is not a list")]
    fn test_insert_next_under_slot_parent_panics() {
        let mut ast = Ast::new();
        let x = var(&mut ast, "x");
        let neg = ast.node_with(NodeKind::Negative, &[x.into()]);
        let _ = neg;
        let y = var(&mut ast, "y");
        ast.insert_next(x, &[y]);
    }

    #[test]
    fn test_sibling_navigation_skips_empty_slots() {
        let mut ast = Ast::new();
        // If with cond and else but no then: cond's next sibling is else.
        let cond = var(&mut ast, "c");
        let els = ast.node(NodeKind::Block);
        let if_ = ast.node_full(
            NodeKind::If,
            &[cond.into()],
            &[("else", els.into())],
        );
        let labels = ast.child(if_, "labels").unwrap();
        assert_eq!(ast.next_sibling(cond), Some(els));
        assert_eq!(ast.prev_sibling(cond), Some(labels));
        assert_eq!(ast.next_sibling(els), None);
        assert_eq!(ast.node_after(if_, cond), Some(els));
        assert_eq!(ast.node_before(if_, labels), None);
    }

    #[test]
    fn test_list_next_prev() {
        let mut ast = Ast::new();
        let a = var(&mut ast, "a");
        let b = var(&mut ast, "b");
        let c = var(&mut ast, "c");
        for list in [ast.array(&[a, b, c]), {
            let a2 = var(&mut ast, "a");
            let b2 = var(&mut ast, "b");
            let c2 = var(&mut ast, "c");
            ast.chain(&[a2, b2, c2])
        }] {
            let elems = ast.list_nodes(list);
            assert_eq!(ast.list_next(elems[0]), Some(elems[1]));
            assert_eq!(ast.list_prev(elems[2]), Some(elems[1]));
            assert_eq!(ast.list_prev(elems[0]), None);
            assert_eq!(ast.list_next(elems[2]), None);
        }
    }

    #[test]
    #[should_panic(expected = "not a child of the given parent")]
    fn test_node_after_foreign_child_panics() {
        let mut ast = Ast::new();
        let x = var(&mut ast, "x");
        let neg = ast.node_with(NodeKind::Negative, &[x.into()]);
        let _ = neg;
        let other = ast.node(NodeKind::Block);
        ast.node_after(other, x);
    }
}
