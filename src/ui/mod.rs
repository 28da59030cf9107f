//! Terminal AST inspector built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]** — application state, keyboard event loop, pane focus,
//!   tree expansion
//! - **[`panes`]** — stateless render functions for each visible pane
//!   (source, node tree, status bar)
//! - **[`theme`]** — centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with an [`Ast`],
//! a root node, and the source text, then call [`App::run`] to start the
//! event loop.
//!
//! [`Ast`]: crate::ast::Ast
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
