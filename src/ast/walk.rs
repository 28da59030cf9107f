//! Tree traversal.
//!
//! Traversal callbacks steer the walk through their [`Visit`] return value:
//! `Continue` descends normally, `Prune` skips the current node's children,
//! and `Abort` stops the whole walk. `depth_first` reports both edge
//! directions through [`Step`]; a pruned node's `Ascending` step is still
//! delivered, and a non-`Continue` answer to an `Ascending` step aborts.

use super::arena::{Ast, NodeId};
use super::node::{Attr, Body};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    Continue,
    /// Skip the current node's children.
    Prune,
    /// Stop the entire walk.
    Abort,
}

/// One step of a depth-first walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Entering the node, before its children.
    Descending(NodeId),
    /// Leaving the node, after its children.
    Ascending(NodeId),
}

impl Ast {
    /// Non-empty child slots (or list elements), in schema order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match &self.get(id).body {
            Body::Slots(attrs) => attrs
                .iter()
                .filter_map(|a| match a {
                    Attr::Child(Some(c)) => Some(*c),
                    _ => None,
                })
                .collect(),
            Body::Array(_) | Body::Chain { .. } => self.list_nodes(id),
        }
    }

    /// Like [`children`](Self::children), back to front.
    pub fn children_rev(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = self.children(id);
        out.reverse();
        out
    }

    /// Full depth-first walk delivering [`Step`]s. Returns `false` if the
    /// walk was aborted.
    pub fn depth_first<F>(&self, root: NodeId, mut f: F) -> bool
    where
        F: FnMut(Step) -> Visit,
    {
        self.df(root, &mut f, false)
    }

    /// [`depth_first`](Self::depth_first) visiting children back to front.
    pub fn reverse_depth_first<F>(&self, root: NodeId, mut f: F) -> bool
    where
        F: FnMut(Step) -> Visit,
    {
        self.df(root, &mut f, true)
    }

    fn df<F>(&self, id: NodeId, f: &mut F, rev: bool) -> bool
    where
        F: FnMut(Step) -> Visit,
    {
        match f(Step::Descending(id)) {
            Visit::Abort => return false,
            Visit::Prune => {}
            Visit::Continue => {
                let kids = if rev {
                    self.children_rev(id)
                } else {
                    self.children(id)
                };
                for child in kids {
                    if !self.df(child, f, rev) {
                        return false;
                    }
                }
            }
        }
        matches!(f(Step::Ascending(id)), Visit::Continue)
    }

    /// Visits each node before its children. `Prune` skips descent into the
    /// current node. Returns `false` if aborted.
    pub fn preorder<F>(&self, root: NodeId, mut f: F) -> bool
    where
        F: FnMut(NodeId) -> Visit,
    {
        self.pre(root, &mut f, false)
    }

    pub fn reverse_preorder<F>(&self, root: NodeId, mut f: F) -> bool
    where
        F: FnMut(NodeId) -> Visit,
    {
        self.pre(root, &mut f, true)
    }

    fn pre<F>(&self, id: NodeId, f: &mut F, rev: bool) -> bool
    where
        F: FnMut(NodeId) -> Visit,
    {
        match f(id) {
            Visit::Abort => return false,
            Visit::Prune => return true,
            Visit::Continue => {}
        }
        let kids = if rev {
            self.children_rev(id)
        } else {
            self.children(id)
        };
        for child in kids {
            if !self.pre(child, f, rev) {
                return false;
            }
        }
        true
    }

    /// Visits each node after its children. `Prune` is meaningless here and
    /// treated as `Continue`. Returns `false` if aborted.
    pub fn postorder<F>(&self, root: NodeId, mut f: F) -> bool
    where
        F: FnMut(NodeId) -> Visit,
    {
        self.post(root, &mut f, false)
    }

    pub fn reverse_postorder<F>(&self, root: NodeId, mut f: F) -> bool
    where
        F: FnMut(NodeId) -> Visit,
    {
        self.post(root, &mut f, true)
    }

    fn post<F>(&self, id: NodeId, f: &mut F, rev: bool) -> bool
    where
        F: FnMut(NodeId) -> Visit,
    {
        let kids = if rev {
            self.children_rev(id)
        } else {
            self.children(id)
        };
        for child in kids {
            if !self.post(child, f, rev) {
                return false;
            }
        }
        !matches!(f(id), Visit::Abort)
    }
}

#[cfg(test)]
mod tests {
    use super::super::kind::NodeKind;
    use super::*;

    // Builds (a + b) * c and returns (mul, add, a, b, c).
    fn sample(ast: &mut Ast) -> (NodeId, NodeId, NodeId, NodeId, NodeId) {
        let a = ast.node_with(NodeKind::Variable, &["a".into()]);
        let b = ast.node_with(NodeKind::Variable, &["b".into()]);
        let add = ast.node_with(NodeKind::Add, &[a.into(), b.into()]);
        let c = ast.node_with(NodeKind::Variable, &["c".into()]);
        let mul = ast.node_with(NodeKind::Multiply, &[add.into(), c.into()]);
        (mul, add, a, b, c)
    }

    #[test]
    fn test_preorder_order() {
        let mut ast = Ast::new();
        let (mul, add, a, b, c) = sample(&mut ast);
        let mut seen = Vec::new();
        let done = ast.preorder(mul, |n| {
            seen.push(n);
            Visit::Continue
        });
        assert!(done);
        assert_eq!(seen, [mul, add, a, b, c]);
    }

    #[test]
    fn test_postorder_order() {
        let mut ast = Ast::new();
        let (mul, add, a, b, c) = sample(&mut ast);
        let mut seen = Vec::new();
        ast.postorder(mul, |n| {
            seen.push(n);
            Visit::Continue
        });
        assert_eq!(seen, [a, b, add, c, mul]);
    }

    #[test]
    fn test_reverse_preorder_is_mirrored() {
        let mut ast = Ast::new();
        let (mul, add, a, b, c) = sample(&mut ast);
        let mut seen = Vec::new();
        ast.reverse_preorder(mul, |n| {
            seen.push(n);
            Visit::Continue
        });
        assert_eq!(seen, [mul, c, add, b, a]);
    }

    #[test]
    fn test_postorder_equals_reversed_reverse_preorder() {
        let mut ast = Ast::new();
        let (mul, ..) = sample(&mut ast);
        let mut post = Vec::new();
        ast.postorder(mul, |n| {
            post.push(n);
            Visit::Continue
        });
        let mut rpre = Vec::new();
        ast.reverse_preorder(mul, |n| {
            rpre.push(n);
            Visit::Continue
        });
        rpre.reverse();
        assert_eq!(post, rpre);
    }

    #[test]
    fn test_depth_first_steps() {
        let mut ast = Ast::new();
        let (mul, add, a, b, c) = sample(&mut ast);
        let mut steps = Vec::new();
        ast.depth_first(mul, |s| {
            steps.push(s);
            Visit::Continue
        });
        use Step::*;
        assert_eq!(
            steps,
            [
                Descending(mul),
                Descending(add),
                Descending(a),
                Ascending(a),
                Descending(b),
                Ascending(b),
                Ascending(add),
                Descending(c),
                Ascending(c),
                Ascending(mul),
            ]
        );
    }

    #[test]
    fn test_prune_skips_children_but_emits_ascending() {
        let mut ast = Ast::new();
        let (mul, add, a, b, c) = sample(&mut ast);
        let mut steps = Vec::new();
        ast.depth_first(mul, |s| {
            steps.push(s);
            match s {
                Step::Descending(n) if n == add => Visit::Prune,
                _ => Visit::Continue,
            }
        });
        use Step::*;
        assert_eq!(
            steps,
            [
                Descending(mul),
                Descending(add),
                Ascending(add),
                Descending(c),
                Ascending(c),
                Ascending(mul),
            ]
        );
        assert!(!steps.contains(&Descending(a)));
        assert!(!steps.contains(&Descending(b)));
    }

    #[test]
    fn test_abort_stops_walk() {
        let mut ast = Ast::new();
        let (mul, add, ..) = sample(&mut ast);
        let mut seen = Vec::new();
        let done = ast.preorder(mul, |n| {
            seen.push(n);
            if n == add {
                Visit::Abort
            } else {
                Visit::Continue
            }
        });
        assert!(!done);
        assert_eq!(seen, [mul, add]);
    }

    #[test]
    fn test_non_continue_at_ascending_aborts() {
        let mut ast = Ast::new();
        let (mul, add, ..) = sample(&mut ast);
        let mut steps = Vec::new();
        let done = ast.depth_first(mul, |s| {
            steps.push(s);
            match s {
                Step::Ascending(n) if n == add => Visit::Prune,
                _ => Visit::Continue,
            }
        });
        assert!(!done);
        assert_eq!(*steps.last().unwrap(), Step::Ascending(add));
    }

    #[test]
    fn test_traversal_crosses_list_containers() {
        let mut ast = Ast::new();
        let x = ast.node_with(NodeKind::Variable, &["x".into()]);
        let stmt = ast.node_with(NodeKind::ExpressionStatement, &[x.into()]);
        let block = ast.node(NodeKind::Block);
        let stmts = ast.child(block, "stmts").unwrap();
        ast.push(stmts, stmt);
        let stmt = ast.first_node(stmts).unwrap();
        let x = ast.child(stmt, "expr").unwrap();

        let mut seen = Vec::new();
        ast.preorder(block, |n| {
            seen.push(n);
            Visit::Continue
        });
        let labels = ast.child(block, "labels").unwrap();
        assert_eq!(seen, [block, labels, stmts, stmt, x]);
    }
}
