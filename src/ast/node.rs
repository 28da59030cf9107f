//! Node representation, construction, and the attach protocol.
//!
//! A [`Node`] is a kind plus its schema-ordered attributes. Child attributes
//! hold [`NodeId`] handles; the arena enforces the one-parent invariant
//! through the writer protocol in [`Ast::set_child`]: storing a node that is
//! already attached elsewhere stores a deep copy instead, so the original
//! stays where it is and the new slot owns an independent subtree.

use super::arena::{Ast, NodeId};
use super::kind::NodeKind;
use super::pos::Pos;
use super::schema::{self, DefaultValue};
use super::value::{kw, Value};

/// One attribute slot of a node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Attr {
    Field(Value),
    Child(Option<NodeId>),
}

/// Where a node is attached.
///
/// Every attached node stores exactly one of these; detached nodes store
/// none. The variants mirror the three container shapes: a named child slot,
/// an index-addressed array, and a doubly-linked chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ParentLink {
    Slot {
        parent: NodeId,
        attr: usize,
    },
    Array {
        parent: NodeId,
        index: usize,
    },
    Chain {
        parent: NodeId,
        prev: Option<NodeId>,
        next: Option<NodeId>,
    },
}

impl ParentLink {
    pub(crate) fn parent(&self) -> NodeId {
        match *self {
            ParentLink::Slot { parent, .. }
            | ParentLink::Array { parent, .. }
            | ParentLink::Chain { parent, .. } => parent,
        }
    }
}

/// Attribute storage for one node. List-container nodes store their elements
/// directly; every other kind stores schema-ordered attribute slots.
#[derive(Debug, Clone)]
pub(crate) enum Body {
    Slots(Vec<Attr>),
    Array(Vec<NodeId>),
    Chain {
        first: Option<NodeId>,
        last: Option<NodeId>,
        len: usize,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) pos: Option<Pos>,
    pub(crate) parent: Option<ParentLink>,
    pub(crate) body: Body,
}

/// A constructor argument: either an opaque field value or a child node.
#[derive(Debug, Clone)]
pub enum Arg {
    Value(Value),
    Node(NodeId),
    /// Explicitly leave the attribute unset, overriding its default.
    Nil,
}

impl From<NodeId> for Arg {
    fn from(id: NodeId) -> Self {
        Arg::Node(id)
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        Arg::Value(v)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Value(Value::from(s))
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Arg::Value(Value::Int(n))
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Value(Value::Bool(b))
    }
}

impl From<f64> for Arg {
    fn from(x: f64) -> Self {
        Arg::Value(Value::Float(x))
    }
}

impl Ast {
    /// Creates a node of `kind` with every attribute at its default.
    ///
    /// For the list kinds this creates an empty list.
    pub fn node(&mut self, kind: NodeKind) -> NodeId {
        self.node_full(kind, &[], &[])
    }

    /// Creates a node with positional constructor arguments, in the kind's
    /// declared positional order.
    pub fn node_with(&mut self, kind: NodeKind, positional: &[Arg]) -> NodeId {
        self.node_full(kind, positional, &[])
    }

    /// Creates a node with positional and named arguments. Named arguments
    /// may target any attribute and win over a positional argument for the
    /// same attribute. Unset attributes take their schema default.
    ///
    /// # Panics
    ///
    /// Panics on more positional arguments than the kind accepts, an unknown
    /// named attribute, a field value passed for a child slot (or vice
    /// versa), or any argument passed to a list kind.
    pub fn node_full(
        &mut self,
        kind: NodeKind,
        positional: &[Arg],
        named: &[(&str, Arg)],
    ) -> NodeId {
        if kind.is_list() {
            assert!(
                positional.is_empty() && named.is_empty(),
                "{} takes no constructor arguments (build lists with Ast::array / Ast::chain)",
                kind
            );
            return self.alloc_list(kind);
        }

        let schema = schema::of(kind);
        assert!(
            positional.len() <= schema.init_order.len(),
            "too many positional arguments for {}: {} given, {} accepted",
            kind,
            positional.len(),
            schema.init_order.len()
        );
        for (name, _) in named {
            assert!(
                schema.index_of(name).is_some(),
                "{} has no attribute `{}`",
                kind,
                name
            );
        }

        let blank: Vec<Attr> = schema
            .attributes
            .iter()
            .map(|a| {
                if a.child {
                    Attr::Child(None)
                } else {
                    Attr::Field(Value::None)
                }
            })
            .collect();
        let id = self.alloc(Node {
            kind,
            pos: None,
            parent: None,
            body: Body::Slots(blank),
        });

        for (i, attr) in schema.attributes.iter().enumerate() {
            let named_arg = named.iter().find(|(n, _)| *n == attr.name).map(|(_, a)| a);
            let positional_arg = schema
                .init_order
                .iter()
                .position(|&ai| ai == i)
                .and_then(|pi| positional.get(pi));
            match named_arg.or(positional_arg) {
                Some(Arg::Value(v)) => {
                    assert!(
                        !attr.child,
                        "{}.{} is a child attribute, not a field",
                        kind, attr.name
                    );
                    self.write_field(id, i, v.clone());
                }
                Some(Arg::Node(n)) => {
                    assert!(
                        attr.child,
                        "{}.{} is a field attribute, not a child",
                        kind, attr.name
                    );
                    self.set_child_at(id, i, Some(*n));
                }
                Some(Arg::Nil) => {}
                None => self.apply_default(id, i, attr.default),
            }
        }
        id
    }

    fn apply_default(&mut self, id: NodeId, attr: usize, default: DefaultValue) {
        match default {
            DefaultValue::None => {}
            DefaultValue::False => self.write_field(id, attr, Value::Bool(false)),
            DefaultValue::Zero => self.write_field(id, attr, Value::Int(0)),
            DefaultValue::DecFormat => self.write_field(id, attr, Value::Kw(kw::DEC)),
            DefaultValue::EmptyArray => {
                let list = self.alloc_list(NodeKind::NodeArray);
                self.set_child_at(id, attr, Some(list));
            }
            DefaultValue::EmptyChain => {
                let list = self.alloc_list(NodeKind::NodeChain);
                self.set_child_at(id, attr, Some(list));
            }
            DefaultValue::EmptyBlock => {
                let block = self.node(NodeKind::Block);
                self.set_child_at(id, attr, Some(block));
            }
        }
    }

    pub(crate) fn alloc_list(&mut self, kind: NodeKind) -> NodeId {
        let body = match kind {
            NodeKind::NodeArray => Body::Array(Vec::new()),
            NodeKind::NodeChain => Body::Chain {
                first: None,
                last: None,
                len: 0,
            },
            other => panic!("not a list kind: {}", other),
        };
        self.alloc(Node {
            kind,
            pos: None,
            parent: None,
            body,
        })
    }

    /// Creates a `NodeArray` holding `elems` (copy-on-attach applies).
    pub fn array(&mut self, elems: &[NodeId]) -> NodeId {
        let list = self.alloc_list(NodeKind::NodeArray);
        self.push_all(list, elems);
        list
    }

    /// Creates a `NodeChain` holding `elems` (copy-on-attach applies).
    pub fn chain(&mut self, elems: &[NodeId]) -> NodeId {
        let list = self.alloc_list(NodeKind::NodeChain);
        self.push_all(list, elems);
        list
    }

    // ----------------------------------------------------------------
    // Attribute access
    // ----------------------------------------------------------------

    #[track_caller]
    fn attr_index(&self, id: NodeId, name: &str) -> usize {
        let kind = self.get(id).kind;
        match schema::of(kind).index_of(name) {
            Some(i) => i,
            None => panic!("{} has no attribute `{}`", kind, name),
        }
    }

    /// Reads a field attribute by name.
    ///
    /// # Panics
    ///
    /// Panics if the node has no such attribute or it is a child slot.
    #[track_caller]
    pub fn field(&self, id: NodeId, name: &str) -> &Value {
        let i = self.attr_index(id, name);
        match &self.slots_of(id)[i] {
            Attr::Field(v) => v,
            Attr::Child(_) => panic!(
                "{}.{} is a child attribute, not a field",
                self.get(id).kind,
                name
            ),
        }
    }

    /// Reads a flag field; an unset value counts as `false`.
    #[track_caller]
    pub fn flag(&self, id: NodeId, name: &str) -> bool {
        self.field(id, name).as_bool()
    }

    /// Reads a string or keyword field, `None` when unset.
    #[track_caller]
    pub fn field_str(&self, id: NodeId, name: &str) -> Option<&str> {
        self.field(id, name).as_str()
    }

    /// Writes a field attribute by name.
    ///
    /// # Panics
    ///
    /// Panics if the node has no such attribute or it is a child slot.
    #[track_caller]
    pub fn set_field(&mut self, id: NodeId, name: &str, value: Value) {
        let i = self.attr_index(id, name);
        match &self.slots_of(id)[i] {
            Attr::Field(_) => self.write_field(id, i, value),
            Attr::Child(_) => panic!(
                "{}.{} is a child attribute, not a field",
                self.get(id).kind,
                name
            ),
        }
    }

    /// Reads a child slot by name.
    ///
    /// # Panics
    ///
    /// Panics if the node has no such attribute or it is a field.
    #[track_caller]
    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        let i = self.attr_index(id, name);
        match self.slots_of(id)[i] {
            Attr::Child(c) => c,
            Attr::Field(_) => panic!(
                "{}.{} is a field attribute, not a child",
                self.get(id).kind,
                name
            ),
        }
    }

    /// Writes a child slot by name, following the attach protocol:
    ///
    /// - storing the slot's current occupant is a no-op;
    /// - the previous occupant (if any) is detached, not freed;
    /// - a newcomer that is attached elsewhere is deep-copied, and the copy
    ///   is stored.
    ///
    /// # Panics
    ///
    /// Panics if the node has no such attribute or it is a field.
    #[track_caller]
    pub fn set_child(&mut self, id: NodeId, name: &str, value: Option<NodeId>) {
        let i = self.attr_index(id, name);
        match self.slots_of(id)[i] {
            Attr::Child(_) => self.set_child_at(id, i, value),
            Attr::Field(_) => panic!(
                "{}.{} is a field attribute, not a child",
                self.get(id).kind,
                name
            ),
        }
    }

    /// Attribute names of this node's kind, in schema order.
    pub fn attribute_names(&self, id: NodeId) -> Vec<&'static str> {
        schema::of(self.get(id).kind)
            .attributes
            .iter()
            .map(|a| a.name)
            .collect()
    }

    pub fn pos(&self, id: NodeId) -> Option<&Pos> {
        self.get(id).pos.as_ref()
    }

    pub fn set_pos(&mut self, id: NodeId, pos: Option<Pos>) {
        self.get_mut(id).pos = pos;
    }

    /// The node this one is attached under, or `None` if detached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent.map(|link| link.parent())
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.get(id).parent.is_some()
    }

    /// Walks `parent` links to the top of the tree containing `id`.
    pub fn root(&self, id: NodeId) -> NodeId {
        let mut cur = id;
        while let Some(p) = self.parent(cur) {
            cur = p;
        }
        cur
    }

    // ----------------------------------------------------------------
    // Internal slot plumbing
    // ----------------------------------------------------------------

    #[track_caller]
    pub(crate) fn slots_of(&self, id: NodeId) -> &[Attr] {
        match &self.get(id).body {
            Body::Slots(attrs) => attrs,
            _ => panic!("{} has no named attributes", self.get(id).kind),
        }
    }

    fn write_field(&mut self, id: NodeId, attr: usize, value: Value) {
        match &mut self.get_mut(id).body {
            Body::Slots(attrs) => attrs[attr] = Attr::Field(value),
            _ => unreachable!(),
        }
    }

    fn write_child_slot(&mut self, id: NodeId, attr: usize, value: Option<NodeId>) {
        match &mut self.get_mut(id).body {
            Body::Slots(attrs) => attrs[attr] = Attr::Child(value),
            _ => unreachable!(),
        }
    }

    pub(crate) fn set_child_at(&mut self, parent: NodeId, attr: usize, value: Option<NodeId>) {
        let old = match self.slots_of(parent)[attr] {
            Attr::Child(c) => c,
            Attr::Field(_) => unreachable!(),
        };
        if old == value {
            return;
        }
        if let Some(old) = old {
            self.get_mut(old).parent = None;
        }
        let value = match value {
            Some(v) if self.get(v).parent.is_some() => Some(self.deep_copy(v)),
            other => other,
        };
        if let Some(v) = value {
            self.get_mut(v).parent = Some(ParentLink::Slot { parent, attr });
        }
        self.write_child_slot(parent, attr, value);
    }

    // ----------------------------------------------------------------
    // Copying
    // ----------------------------------------------------------------

    /// Recursive structural copy. The copy is detached; children are copied
    /// recursively, fields by value, and `pos` is preserved.
    pub fn deep_copy(&mut self, id: NodeId) -> NodeId {
        let src = self.get(id);
        let kind = src.kind;
        let pos = src.pos.clone();
        match &src.body {
            Body::Slots(attrs) => {
                let attrs_src = attrs.clone();
                let blank = attrs_src
                    .iter()
                    .map(|a| match a {
                        Attr::Field(v) => Attr::Field(v.clone()),
                        Attr::Child(_) => Attr::Child(None),
                    })
                    .collect();
                let copy = self.alloc(Node {
                    kind,
                    pos,
                    parent: None,
                    body: Body::Slots(blank),
                });
                for (i, attr) in attrs_src.iter().enumerate() {
                    if let Attr::Child(Some(child)) = attr {
                        let child_copy = self.deep_copy(*child);
                        self.get_mut(child_copy).parent =
                            Some(ParentLink::Slot { parent: copy, attr: i });
                        self.write_child_slot(copy, i, Some(child_copy));
                    }
                }
                copy
            }
            Body::Array(elems) => {
                let elems = elems.clone();
                let copy = self.alloc(Node {
                    kind,
                    pos,
                    parent: None,
                    body: Body::Array(Vec::with_capacity(elems.len())),
                });
                for (i, &elem) in elems.iter().enumerate() {
                    let elem_copy = self.deep_copy(elem);
                    self.get_mut(elem_copy).parent =
                        Some(ParentLink::Array { parent: copy, index: i });
                    match &mut self.get_mut(copy).body {
                        Body::Array(v) => v.push(elem_copy),
                        _ => unreachable!(),
                    }
                }
                copy
            }
            Body::Chain { .. } => {
                let elems = self.list_nodes(id);
                let copy = self.alloc(Node {
                    kind,
                    pos,
                    parent: None,
                    body: Body::Chain {
                        first: None,
                        last: None,
                        len: 0,
                    },
                });
                let copies: Vec<NodeId> =
                    elems.iter().map(|&e| self.deep_copy(e)).collect();
                for (i, &elem_copy) in copies.iter().enumerate() {
                    let prev = if i == 0 { None } else { Some(copies[i - 1]) };
                    let next = copies.get(i + 1).copied();
                    self.get_mut(elem_copy).parent = Some(ParentLink::Chain {
                        parent: copy,
                        prev,
                        next,
                    });
                }
                if let Body::Chain { first, last, len } = &mut self.get_mut(copy).body {
                    *first = copies.first().copied();
                    *last = copies.last().copied();
                    *len = copies.len();
                }
                copy
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::kind::NodeKind;
    use super::*;

    #[test]
    fn test_defaults_are_applied() {
        let mut ast = Ast::new();
        let decl = ast.node(NodeKind::Declaration);
        assert_eq!(*ast.field(decl, "storage"), Value::None);
        assert!(!ast.flag(decl, "inline"));
        let declarators = ast.child(decl, "declarators").unwrap();
        assert_eq!(ast.kind(declarators), NodeKind::NodeArray);
        assert!(ast.list_is_empty(declarators));
    }

    #[test]
    fn test_positional_and_named_construction() {
        let mut ast = Ast::new();
        let var = ast.node_with(NodeKind::Variable, &["x".into()]);
        assert_eq!(ast.field_str(var, "name"), Some("x"));

        let int = ast.node(NodeKind::Int);
        let decl = ast.node_full(
            NodeKind::Declaration,
            &[int.into()],
            &[("storage", Arg::Value(Value::Kw(kw::STATIC)))],
        );
        assert_eq!(ast.field_str(decl, "storage"), Some("static"));
        assert_eq!(ast.child(decl, "type"), Some(int));
    }

    #[test]
    fn test_named_wins_over_positional() {
        let mut ast = Ast::new();
        let var = ast.node_full(
            NodeKind::Variable,
            &["x".into()],
            &[("name", Arg::from("y"))],
        );
        assert_eq!(ast.field_str(var, "name"), Some("y"));
    }

    #[test]
    #[should_panic(expected = "has no attribute")]
    fn test_unknown_named_attribute_panics() {
        let mut ast = Ast::new();
        ast.node_full(NodeKind::Variable, &[], &[("nam", Arg::from("x"))]);
    }

    #[test]
    #[should_panic(expected = "too many positional arguments")]
    fn test_positional_overflow_panics() {
        let mut ast = Ast::new();
        ast.node_with(NodeKind::Variable, &["x".into(), "y".into()]);
    }

    #[test]
    fn test_set_child_detaches_previous_occupant() {
        let mut ast = Ast::new();
        let a = ast.node_with(NodeKind::Variable, &["a".into()]);
        let b = ast.node_with(NodeKind::Variable, &["b".into()]);
        let neg = ast.node_with(NodeKind::Negative, &[a.into()]);
        assert_eq!(ast.parent(a), Some(neg));

        ast.set_child(neg, "expr", Some(b));
        assert_eq!(ast.parent(a), None);
        assert_eq!(ast.parent(b), Some(neg));
        assert!(ast.contains(a));
    }

    #[test]
    fn test_attach_attached_node_stores_a_copy() {
        let mut ast = Ast::new();
        let x = ast.node_with(NodeKind::Variable, &["x".into()]);
        let neg = ast.node_with(NodeKind::Negative, &[x.into()]);
        let pos = ast.node_with(NodeKind::Positive, &[x.into()]);

        // x itself moved nowhere; pos got a structurally equal copy.
        assert_eq!(ast.parent(x), Some(neg));
        let copy = ast.child(pos, "expr").unwrap();
        assert_ne!(copy, x);
        assert!(ast.eq(copy, x));
    }

    #[test]
    fn test_set_child_same_occupant_is_noop() {
        let mut ast = Ast::new();
        let x = ast.node_with(NodeKind::Variable, &["x".into()]);
        let neg = ast.node_with(NodeKind::Negative, &[x.into()]);
        ast.set_child(neg, "expr", Some(x));
        assert_eq!(ast.child(neg, "expr"), Some(x));
        assert_eq!(ast.parent(x), Some(neg));
    }

    #[test]
    fn test_deep_copy_is_equal_and_distinct() {
        let mut ast = Ast::new();
        let x = ast.node_with(NodeKind::Variable, &["x".into()]);
        let y = ast.node_with(NodeKind::Variable, &["y".into()]);
        let add = ast.node_with(NodeKind::Add, &[x.into(), y.into()]);
        ast.set_pos(add, Some(Pos::new(Some("t.c"), 3, 1)));

        let copy = ast.deep_copy(add);
        assert_ne!(copy, add);
        assert!(ast.eq(copy, add));
        assert_eq!(ast.parent(copy), None);
        assert_eq!(ast.pos(copy), ast.pos(add));
        assert_ne!(ast.child(copy, "expr1"), ast.child(add, "expr1"));
    }

    #[test]
    fn test_root_walks_to_top() {
        let mut ast = Ast::new();
        let x = ast.node_with(NodeKind::Variable, &["x".into()]);
        let neg = ast.node_with(NodeKind::Negative, &[x.into()]);
        let stmt = ast.node_with(NodeKind::ExpressionStatement, &[neg.into()]);
        assert_eq!(ast.root(x), stmt);
        assert_eq!(ast.root(stmt), stmt);
    }
}
