//! The node framework: arena, kinds, construction, mutation, lists, and
//! traversal.
//!
//! Everything revolves around [`Ast`], the arena that owns all nodes, and
//! [`NodeId`], the generational handle used to address them. Trees are built
//! with [`Ast::node_with`] and friends, reshaped through the attach protocol
//! ([`Ast::set_child`], [`Ast::detach`], [`Ast::replace_with`], the list
//! operations), and walked with [`Ast::depth_first`] and the pre/post-order
//! variants.

mod arena;
mod cmp;
mod edit;
mod kind;
mod list;
mod node;
mod pos;
pub mod schema;
mod value;
mod walk;

pub use arena::{Ast, NodeId};
pub use kind::NodeKind;
pub use node::Arg;
pub use pos::Pos;
pub use value::{kw, Value};
pub use walk::{Step, Visit};
