//! # Introduction
//!
//! ctree parses, builds, mutates, and re-renders C99 abstract syntax trees.
//! Nodes live in an arena ([`ast::Ast`]) and are addressed by generational
//! handles ([`ast::NodeId`]); the tree can be reshaped through an attach
//! protocol that keeps parent links consistent, walked with prunable
//! traversals, and printed back as C source.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Preprocessor (cc -E) → Lexer → Parser → Ast → to_c / dump
//! ```
//!
//! 1. [`preprocessor`] — shells out to the system `cc -E`, keeping line
//!    markers so node positions point into the original files.
//! 2. [`parser`] — tokenises preprocessed source and builds nodes; typedef
//!    names are parser configuration.
//! 3. [`ast`] — the node framework: construction from per-kind schemas,
//!    attach/detach/replace mutation, two list representations, structural
//!    equality and hashing, pre/post-order traversal.
//! 4. Rendering — [`ast::Ast::to_c`] prints minimal-parenthesis C source;
//!    [`ast::Ast::dump`] prints the structural tree for debugging.
//! 5. [`ui`] — ratatui-based AST inspector; not part of the stable library
//!    API.
//!
//! ## Building trees by hand
//!
//! ```
//! use ctree::ast::{Ast, NodeKind};
//!
//! let mut ast = Ast::new();
//! let x = ast.node_with(NodeKind::Variable, &["x".into()]);
//! let one = ast.node_with(NodeKind::IntLiteral, &[1.into()]);
//! let sum = ast.node_with(NodeKind::Add, &[x.into(), one.into()]);
//! assert_eq!(ast.to_c(sum), "x + 1");
//! ```

pub mod ast;
pub mod parser;
pub mod preprocessor;
mod render;
pub mod ui;
