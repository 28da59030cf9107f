//! List-container operations.
//!
//! The two list kinds share one public API. `NodeArray` stores a `Vec` of
//! element handles and keeps each element's back-reference index current;
//! `NodeChain` threads prev/next handles through the elements and walks from
//! whichever end is closer for positional access.
//!
//! Adding nodes follows the same copy-on-attach discipline as child slots,
//! with one refinement for splicing: a node being replaced may reappear once
//! among the incoming nodes without being copied, since the operation removes
//! it first.
//!
//! Indices are `isize` where negative wrapping applies (`-1` is the last
//! element) and `usize` where it does not.

use super::arena::{Ast, NodeId};
use super::node::{Body, ParentLink};

impl Ast {
    #[track_caller]
    fn assert_list(&self, list: NodeId) {
        let kind = self.get(list).kind;
        assert!(kind.is_list(), "not a list: {}", kind);
    }

    /// Number of elements.
    #[track_caller]
    pub fn list_len(&self, list: NodeId) -> usize {
        match &self.get(list).body {
            Body::Array(v) => v.len(),
            Body::Chain { len, .. } => *len,
            Body::Slots(_) => panic!("not a list: {}", self.get(list).kind),
        }
    }

    #[track_caller]
    pub fn list_is_empty(&self, list: NodeId) -> bool {
        self.list_len(list) == 0
    }

    /// All elements, front to back.
    #[track_caller]
    pub fn list_nodes(&self, list: NodeId) -> Vec<NodeId> {
        match &self.get(list).body {
            Body::Array(v) => v.clone(),
            Body::Chain { first, .. } => {
                let mut out = Vec::new();
                let mut cur = *first;
                while let Some(node) = cur {
                    out.push(node);
                    cur = self.chain_next(node);
                }
                out
            }
            Body::Slots(_) => panic!("not a list: {}", self.get(list).kind),
        }
    }

    fn wrap_index(&self, list: NodeId, i: isize) -> isize {
        if i < 0 {
            i + self.list_len(list) as isize
        } else {
            i
        }
    }

    /// The element at `i`; negative indices count from the back. `None` when
    /// out of range.
    #[track_caller]
    pub fn at(&self, list: NodeId, i: isize) -> Option<NodeId> {
        let i = self.wrap_index(list, i);
        if i < 0 || i as usize >= self.list_len(list) {
            return None;
        }
        let i = i as usize;
        match &self.get(list).body {
            Body::Array(v) => Some(v[i]),
            Body::Chain { .. } => Some(self.chain_get(list, i)),
            Body::Slots(_) => unreachable!(),
        }
    }

    /// Up to `n` elements starting at `i` (negative `i` wraps). Empty when
    /// `i` is out of range.
    #[track_caller]
    pub fn slice(&self, list: NodeId, i: isize, n: usize) -> Vec<NodeId> {
        let len = self.list_len(list);
        let i = self.wrap_index(list, i);
        if i < 0 || i as usize > len {
            return Vec::new();
        }
        let i = i as usize;
        let n = n.min(len - i);
        match &self.get(list).body {
            Body::Array(v) => v[i..i + n].to_vec(),
            Body::Chain { .. } => {
                let mut out = Vec::with_capacity(n);
                if n > 0 {
                    let mut cur = Some(self.chain_get(list, i));
                    for _ in 0..n {
                        let node = cur.unwrap();
                        out.push(node);
                        cur = self.chain_next(node);
                    }
                }
                out
            }
            Body::Slots(_) => unreachable!(),
        }
    }

    #[track_caller]
    pub fn first_node(&self, list: NodeId) -> Option<NodeId> {
        match &self.get(list).body {
            Body::Array(v) => v.first().copied(),
            Body::Chain { first, .. } => *first,
            Body::Slots(_) => panic!("not a list: {}", self.get(list).kind),
        }
    }

    #[track_caller]
    pub fn last_node(&self, list: NodeId) -> Option<NodeId> {
        match &self.get(list).body {
            Body::Array(v) => v.last().copied(),
            Body::Chain { last, .. } => *last,
            Body::Slots(_) => panic!("not a list: {}", self.get(list).kind),
        }
    }

    /// The first `n` elements, clamped to the list length.
    #[track_caller]
    pub fn first_n(&self, list: NodeId, n: usize) -> Vec<NodeId> {
        self.slice(list, 0, n)
    }

    /// The last `n` elements, clamped to the list length.
    #[track_caller]
    pub fn last_n(&self, list: NodeId, n: usize) -> Vec<NodeId> {
        let len = self.list_len(list);
        let n = n.min(len);
        self.slice(list, (len - n) as isize, n)
    }

    /// Index of the first element structurally equal to `node`.
    #[track_caller]
    pub fn index_of(&self, list: NodeId, node: NodeId) -> Option<usize> {
        self.assert_list(list);
        self.list_nodes(list)
            .iter()
            .position(|&e| self.eq(e, node))
    }

    /// Index of the last element structurally equal to `node`.
    #[track_caller]
    pub fn rindex_of(&self, list: NodeId, node: NodeId) -> Option<usize> {
        self.assert_list(list);
        self.list_nodes(list)
            .iter()
            .rposition(|&e| self.eq(e, node))
    }

    // ----------------------------------------------------------------
    // Mutation
    // ----------------------------------------------------------------

    #[track_caller]
    pub fn push(&mut self, list: NodeId, node: NodeId) {
        self.push_all(list, &[node]);
    }

    #[track_caller]
    pub fn push_all(&mut self, list: NodeId, nodes: &[NodeId]) {
        self.assert_list(list);
        let nodes = self.add_prep(nodes, &[]);
        match &self.get(list).body {
            Body::Array(_) => {
                let at = self.list_len(list);
                self.array_insert(list, at, &nodes);
            }
            Body::Chain { last, .. } => {
                let last = *last;
                self.chain_link(list, last, &nodes, None);
                self.chain_adjust_len(list, nodes.len() as isize);
            }
            Body::Slots(_) => unreachable!(),
        }
    }

    /// Appends the elements of another list (copy-on-attach copies them,
    /// since they are attached to `other`).
    #[track_caller]
    pub fn concat(&mut self, list: NodeId, other: NodeId) {
        let elems = self.list_nodes(other);
        self.push_all(list, &elems);
    }

    #[track_caller]
    pub fn unshift(&mut self, list: NodeId, node: NodeId) {
        self.unshift_all(list, &[node]);
    }

    #[track_caller]
    pub fn unshift_all(&mut self, list: NodeId, nodes: &[NodeId]) {
        self.assert_list(list);
        let nodes = self.add_prep(nodes, &[]);
        match &self.get(list).body {
            Body::Array(_) => self.array_insert(list, 0, &nodes),
            Body::Chain { first, .. } => {
                let first = *first;
                self.chain_link(list, None, &nodes, first);
                self.chain_adjust_len(list, nodes.len() as isize);
            }
            Body::Slots(_) => unreachable!(),
        }
    }

    /// Removes and returns the last element, detached.
    #[track_caller]
    pub fn pop(&mut self, list: NodeId) -> Option<NodeId> {
        let last = self.last_node(list)?;
        self.remove_element(list, last);
        Some(last)
    }

    /// Removes and returns the last `n` elements (clamped), detached, in
    /// list order.
    #[track_caller]
    pub fn pop_n(&mut self, list: NodeId, n: usize) -> Vec<NodeId> {
        let taken = self.last_n(list, n);
        let at = self.list_len(list) - taken.len();
        self.remove_range(list, at, taken.len());
        taken
    }

    /// Removes and returns the first element, detached.
    #[track_caller]
    pub fn shift(&mut self, list: NodeId) -> Option<NodeId> {
        let first = self.first_node(list)?;
        self.remove_element(list, first);
        Some(first)
    }

    /// Removes and returns the first `n` elements (clamped), detached.
    #[track_caller]
    pub fn shift_n(&mut self, list: NodeId, n: usize) -> Vec<NodeId> {
        let taken = self.first_n(list, n);
        self.remove_range(list, 0, taken.len());
        taken
    }

    /// Inserts `nodes` before index `i`; `i == len` appends.
    ///
    /// # Panics
    ///
    /// Panics if `i > len`.
    #[track_caller]
    pub fn insert_at(&mut self, list: NodeId, i: usize, nodes: &[NodeId]) {
        let len = self.list_len(list);
        assert!(i <= len, "index {} out of list (length {})", i, len);
        let nodes = self.add_prep(nodes, &[]);
        self.insert_prepped(list, i, &nodes);
    }

    /// Removes and returns the element at `i`, detached; `None` when out of
    /// range.
    #[track_caller]
    pub fn delete_at(&mut self, list: NodeId, i: usize) -> Option<NodeId> {
        if i >= self.list_len(list) {
            return None;
        }
        let node = self.at(list, i as isize).unwrap();
        self.remove_element(list, node);
        Some(node)
    }

    /// Replaces the element at `i` (negative wraps) with `node`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    #[track_caller]
    pub fn set_at(&mut self, list: NodeId, i: isize, node: NodeId) {
        let len = self.list_len(list);
        let wrapped = self.wrap_index(list, i);
        assert!(
            wrapped >= 0 && (wrapped as usize) < len,
            "index {} out of list (length {})",
            i,
            len
        );
        self.splice(list, wrapped, 1, &[node]);
    }

    /// Slice assignment: removes `n` elements at `i` (negative wraps,
    /// `n` clamped) and inserts `nodes` in their place. A removed node may
    /// be reused once among `nodes` without being copied.
    ///
    /// # Panics
    ///
    /// Panics if `i` lands past the end of the list.
    #[track_caller]
    pub fn splice(&mut self, list: NodeId, i: isize, n: usize, nodes: &[NodeId]) {
        let len = self.list_len(list);
        let wrapped = self.wrap_index(list, i);
        assert!(
            wrapped >= 0 && wrapped as usize <= len,
            "index {} out of list (length {})",
            i,
            len
        );
        let at = wrapped as usize;
        let old = self.slice(list, wrapped, n);
        let nodes = self.add_prep(nodes, &old);
        self.remove_range(list, at, old.len());
        self.insert_prepped(list, at, &nodes);
    }

    /// Detaches every element, leaving the list empty.
    #[track_caller]
    pub fn clear_list(&mut self, list: NodeId) {
        let len = self.list_len(list);
        self.remove_range(list, 0, len);
    }

    /// Replaces the whole contents with `nodes`.
    #[track_caller]
    pub fn replace_all(&mut self, list: NodeId, nodes: &[NodeId]) {
        let len = self.list_len(list);
        self.splice(list, 0, len, nodes);
    }

    /// Inserts `nodes` before the element `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` is not an element of `list`.
    #[track_caller]
    pub fn list_insert_before(&mut self, list: NodeId, at: NodeId, nodes: &[NodeId]) {
        let i = self.element_index(list, at);
        let nodes = self.add_prep(nodes, &[]);
        self.insert_prepped(list, i, &nodes);
    }

    /// Inserts `nodes` after the element `at`.
    ///
    /// # Panics
    ///
    /// Panics if `at` is not an element of `list`.
    #[track_caller]
    pub fn list_insert_after(&mut self, list: NodeId, at: NodeId, nodes: &[NodeId]) {
        let i = self.element_index(list, at);
        let nodes = self.add_prep(nodes, &[]);
        self.insert_prepped(list, i + 1, &nodes);
    }

    /// Replaces the element `old` with `nodes` (any number, including none).
    /// `old` may be reused among `nodes` without being copied.
    ///
    /// # Panics
    ///
    /// Panics if `old` is not an element of `list`.
    #[track_caller]
    pub fn list_replace_node(&mut self, list: NodeId, old: NodeId, nodes: &[NodeId]) {
        let i = self.element_index(list, old);
        let nodes = self.add_prep(nodes, &[old]);
        self.remove_range(list, i, 1);
        self.insert_prepped(list, i, &nodes);
    }

    /// Detaches the element `node` from `list`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not an element of `list`.
    #[track_caller]
    pub(crate) fn list_remove_node(&mut self, list: NodeId, node: NodeId) {
        let i = self.element_index(list, node);
        self.remove_range(list, i, 1);
    }

    #[track_caller]
    fn element_index(&self, list: NodeId, node: NodeId) -> usize {
        self.assert_list(list);
        match self.get(node).parent {
            Some(ParentLink::Array { parent, index }) if parent == list => index,
            Some(ParentLink::Chain { parent, .. }) if parent == list => {
                let mut i = 0;
                let mut cur = self.first_node(list);
                while let Some(e) = cur {
                    if e == node {
                        return i;
                    }
                    i += 1;
                    cur = self.chain_next(e);
                }
                unreachable!("chain element not reachable from head")
            }
            _ => panic!("node is not a child of the list"),
        }
    }

    // ----------------------------------------------------------------
    // add_prep: copy-on-attach for batch insertion
    // ----------------------------------------------------------------

    /// Prepares `nodes` for insertion: an attached node is deep-copied
    /// unless it is one of `replaced` (consumed once per occurrence); a
    /// detached node appearing twice in the batch is copied on its second
    /// occurrence.
    fn add_prep(&mut self, nodes: &[NodeId], replaced: &[NodeId]) -> Vec<NodeId> {
        let mut remaining: Vec<NodeId> = replaced.to_vec();
        let mut out: Vec<NodeId> = Vec::with_capacity(nodes.len());
        for &node in nodes {
            let reused = remaining
                .iter()
                .position(|&r| r == node)
                .map(|i| remaining.swap_remove(i))
                .is_some();
            let chosen = if (self.get(node).parent.is_some() && !reused)
                || out.contains(&node)
            {
                self.deep_copy(node)
            } else {
                node
            };
            out.push(chosen);
        }
        out
    }

    /// Inserts already-prepped nodes before index `i` (`i <= len`).
    fn insert_prepped(&mut self, list: NodeId, i: usize, nodes: &[NodeId]) {
        if nodes.is_empty() {
            return;
        }
        match &self.get(list).body {
            Body::Array(_) => self.array_insert(list, i, nodes),
            Body::Chain { .. } => {
                let (a, b) = if i == self.list_len(list) {
                    (self.last_node(list), None)
                } else {
                    let b = self.chain_get(list, i);
                    (self.chain_prev(b), Some(b))
                };
                self.chain_link(list, a, nodes, b);
                self.chain_adjust_len(list, nodes.len() as isize);
            }
            Body::Slots(_) => unreachable!(),
        }
    }

    /// Detaches `n` elements starting at index `i` (`i + n <= len`).
    fn remove_range(&mut self, list: NodeId, i: usize, n: usize) {
        if n == 0 {
            return;
        }
        match &self.get(list).body {
            Body::Array(_) => {
                let removed: Vec<NodeId> = match &mut self.get_mut(list).body {
                    Body::Array(v) => v.drain(i..i + n).collect(),
                    _ => unreachable!(),
                };
                for node in removed {
                    self.get_mut(node).parent = None;
                }
                self.array_renumber(list, i);
            }
            Body::Chain { .. } => {
                let removed = self.slice(list, i as isize, n);
                let a = self.chain_prev(removed[0]);
                let b = self.chain_next(*removed.last().unwrap());
                self.chain_link2(list, a, b);
                for &node in &removed {
                    self.get_mut(node).parent = None;
                }
                self.chain_adjust_len(list, -(n as isize));
            }
            Body::Slots(_) => unreachable!(),
        }
    }

    fn remove_element(&mut self, list: NodeId, node: NodeId) {
        match self.get(node).parent {
            Some(ParentLink::Array { index, .. }) => self.remove_range(list, index, 1),
            Some(ParentLink::Chain { prev, next, .. }) => {
                self.chain_link2(list, prev, next);
                self.get_mut(node).parent = None;
                self.chain_adjust_len(list, -1);
            }
            _ => unreachable!(),
        }
    }

    // ----------------------------------------------------------------
    // Array internals
    // ----------------------------------------------------------------

    fn array_insert(&mut self, list: NodeId, i: usize, nodes: &[NodeId]) {
        match &mut self.get_mut(list).body {
            Body::Array(v) => {
                for (k, &node) in nodes.iter().enumerate() {
                    v.insert(i + k, node);
                }
            }
            _ => unreachable!(),
        }
        self.array_renumber(list, i);
    }

    /// Rewrites the back-reference of every element from index `from`,
    /// including elements just inserted (which get their full parent link
    /// here).
    fn array_renumber(&mut self, list: NodeId, from: usize) {
        let elems = match &self.get(list).body {
            Body::Array(v) => v[from..].to_vec(),
            _ => unreachable!(),
        };
        for (offset, node) in elems.into_iter().enumerate() {
            self.get_mut(node).parent = Some(ParentLink::Array {
                parent: list,
                index: from + offset,
            });
        }
    }

    // ----------------------------------------------------------------
    // Chain internals
    // ----------------------------------------------------------------

    pub(crate) fn chain_next(&self, node: NodeId) -> Option<NodeId> {
        match self.get(node).parent {
            Some(ParentLink::Chain { next, .. }) => next,
            _ => unreachable!("not a chain element"),
        }
    }

    pub(crate) fn chain_prev(&self, node: NodeId) -> Option<NodeId> {
        match self.get(node).parent {
            Some(ParentLink::Chain { prev, .. }) => prev,
            _ => unreachable!("not a chain element"),
        }
    }

    fn chain_set_next(&mut self, node: NodeId, value: Option<NodeId>) {
        match &mut self.get_mut(node).parent {
            Some(ParentLink::Chain { next, .. }) => *next = value,
            _ => unreachable!("not a chain element"),
        }
    }

    fn chain_set_prev(&mut self, node: NodeId, value: Option<NodeId>) {
        match &mut self.get_mut(node).parent {
            Some(ParentLink::Chain { prev, .. }) => *prev = value,
            _ => unreachable!("not a chain element"),
        }
    }

    fn chain_set_first(&mut self, list: NodeId, value: Option<NodeId>) {
        match &mut self.get_mut(list).body {
            Body::Chain { first, .. } => *first = value,
            _ => unreachable!(),
        }
    }

    fn chain_set_last(&mut self, list: NodeId, value: Option<NodeId>) {
        match &mut self.get_mut(list).body {
            Body::Chain { last, .. } => *last = value,
            _ => unreachable!(),
        }
    }

    fn chain_adjust_len(&mut self, list: NodeId, delta: isize) {
        match &mut self.get_mut(list).body {
            Body::Chain { len, .. } => *len = (*len as isize + delta) as usize,
            _ => unreachable!(),
        }
    }

    /// Wires `nodes` in between neighbors `a` and `b`, setting each node's
    /// full chain link (parent, prev, next) and updating the ends.
    fn chain_link(
        &mut self,
        list: NodeId,
        a: Option<NodeId>,
        nodes: &[NodeId],
        b: Option<NodeId>,
    ) {
        if nodes.is_empty() {
            self.chain_link2(list, a, b);
            return;
        }
        for (i, &node) in nodes.iter().enumerate() {
            let prev = if i == 0 { a } else { Some(nodes[i - 1]) };
            let next = nodes.get(i + 1).copied().or(b);
            self.get_mut(node).parent = Some(ParentLink::Chain {
                parent: list,
                prev,
                next,
            });
        }
        let first = nodes[0];
        let last = *nodes.last().unwrap();
        match a {
            Some(a) => self.chain_set_next(a, Some(first)),
            None => self.chain_set_first(list, Some(first)),
        }
        match b {
            Some(b) => self.chain_set_prev(b, Some(last)),
            None => self.chain_set_last(list, Some(last)),
        }
    }

    /// Connects neighbors `a` and `b` directly (the removal counterpart of
    /// [`chain_link`](Self::chain_link)).
    fn chain_link2(&mut self, list: NodeId, a: Option<NodeId>, b: Option<NodeId>) {
        match a {
            Some(a) => self.chain_set_next(a, b),
            None => self.chain_set_first(list, b),
        }
        match b {
            Some(b) => self.chain_set_prev(b, a),
            None => self.chain_set_last(list, a),
        }
    }

    /// The `i`th chain element, walking from the closer end. `i` must be in
    /// range.
    fn chain_get(&self, list: NodeId, i: usize) -> NodeId {
        let (first, last, len) = match &self.get(list).body {
            Body::Chain { first, last, len } => (*first, *last, *len),
            _ => unreachable!(),
        };
        debug_assert!(i < len);
        if i < len / 2 {
            let mut node = first.unwrap();
            for _ in 0..i {
                node = self.chain_next(node).unwrap();
            }
            node
        } else {
            let mut node = last.unwrap();
            for _ in 0..(len - 1 - i) {
                node = self.chain_prev(node).unwrap();
            }
            node
        }
    }
}
