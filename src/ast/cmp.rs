//! Structural equality and hashing.
//!
//! Two nodes are equal when they have the same kind and equal attributes in
//! schema order. `pos` never participates. The two list kinds compare by
//! element sequence only, so a `NodeArray` equals a `NodeChain` with equal
//! elements in the same order — and their hashes agree.

use super::arena::{Ast, NodeId};
use super::node::{Attr, Body};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

// Stands in for an empty child slot when xor-combining attribute hashes.
const NIL_HASH: u64 = 0x9e37_79b9_7f4a_7c15;

impl Ast {
    /// Structural equality within one arena.
    pub fn eq(&self, a: NodeId, b: NodeId) -> bool {
        self.structural_eq(a, self, b)
    }

    /// Structural equality across arenas (`other` may be `self`).
    pub fn structural_eq(&self, a: NodeId, other: &Ast, b: NodeId) -> bool {
        let na = self.get(a);
        let nb = other.get(b);
        if na.kind.is_list() || nb.kind.is_list() {
            if !(na.kind.is_list() && nb.kind.is_list()) {
                return false;
            }
            let ea = self.list_nodes(a);
            let eb = other.list_nodes(b);
            return ea.len() == eb.len()
                && ea
                    .iter()
                    .zip(&eb)
                    .all(|(&x, &y)| self.structural_eq(x, other, y));
        }
        if na.kind != nb.kind {
            return false;
        }
        match (&na.body, &nb.body) {
            (Body::Slots(xs), Body::Slots(ys)) => {
                xs.iter().zip(ys).all(|(x, y)| match (x, y) {
                    (Attr::Field(u), Attr::Field(v)) => u == v,
                    (Attr::Child(None), Attr::Child(None)) => true,
                    (Attr::Child(Some(u)), Attr::Child(Some(v))) => {
                        self.structural_eq(*u, other, *v)
                    }
                    _ => false,
                })
            }
            _ => unreachable!(),
        }
    }

    /// Structural hash, consistent with [`structural_eq`](Self::structural_eq):
    /// equal nodes hash equally, including across the two list
    /// representations. Attribute hashes combine by xor, so the hash is
    /// order-insensitive but cheap and stable.
    pub fn structural_hash(&self, id: NodeId) -> u64 {
        let node = self.get(id);
        if node.kind.is_list() {
            return self
                .list_nodes(id)
                .iter()
                .fold(0u64, |acc, &e| acc ^ self.structural_hash(e));
        }
        // seed with the kind so same-shaped nodes of different kinds
        // (Add/Subtract, Less/More) land in different buckets; list kinds
        // stay unseeded above so array and chain hashes agree
        let mut hasher = DefaultHasher::new();
        node.kind.hash(&mut hasher);
        let seed = hasher.finish();
        match &node.body {
            Body::Slots(attrs) => attrs.iter().fold(seed, |acc, attr| {
                acc ^ match attr {
                    Attr::Field(v) => {
                        let mut hasher = DefaultHasher::new();
                        v.hash_into(&mut hasher);
                        hasher.finish()
                    }
                    Attr::Child(None) => NIL_HASH,
                    Attr::Child(Some(c)) => self.structural_hash(*c),
                }
            }),
            _ => unreachable!(),
        }
    }
}
