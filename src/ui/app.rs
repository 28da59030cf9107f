//! Main TUI application state and logic

use crate::ast::{Ast, NodeId};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use rustc_hash::FxHashSet;
use std::io;
use std::time::Duration;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tree,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tree,
            FocusedPane::Tree => FocusedPane::Source,
        }
    }
}

/// One visible row of the flattened node tree.
pub struct TreeRow {
    pub node: NodeId,
    /// Attribute name this node sits under, if any.
    pub label: Option<&'static str>,
    pub depth: usize,
    pub has_children: bool,
    pub expanded: bool,
}

/// The main application state
pub struct App {
    pub ast: Ast,
    pub root: NodeId,
    pub source_code: String,

    pub focused_pane: FocusedPane,
    pub source_scroll: usize,
    pub tree_scroll: usize,

    /// Flattened visible rows, rebuilt whenever expansion changes.
    pub rows: Vec<TreeRow>,
    pub selected: usize,
    expanded: FxHashSet<NodeId>,

    pub should_quit: bool,
}

impl App {
    pub fn new(ast: Ast, root: NodeId, source_code: String) -> Self {
        let mut app = App {
            ast,
            root,
            source_code,
            focused_pane: FocusedPane::Tree,
            source_scroll: 0,
            tree_scroll: 0,
            rows: Vec::new(),
            selected: 0,
            expanded: FxHashSet::default(),
            should_quit: false,
        };
        app.expanded.insert(root);
        app.rebuild_rows();
        app
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn rebuild_rows(&mut self) {
        self.rows.clear();
        self.push_row(self.root, None, 0);
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    fn push_row(&mut self, node: NodeId, label: Option<&'static str>, depth: usize) {
        let children = self.labeled_children(node);
        let expanded = self.expanded.contains(&node);
        self.rows.push(TreeRow {
            node,
            label,
            depth,
            has_children: !children.is_empty(),
            expanded,
        });
        if expanded {
            for (child_label, child) in children {
                self.push_row(child, child_label, depth + 1);
            }
        }
    }

    /// Children with the attribute names they hang off of; list elements
    /// have no label.
    fn labeled_children(&self, node: NodeId) -> Vec<(Option<&'static str>, NodeId)> {
        if self.ast.kind(node).is_list() {
            return self
                .ast
                .list_nodes(node)
                .into_iter()
                .map(|c| (None, c))
                .collect();
        }
        crate::ast::schema::of(self.ast.kind(node))
            .attributes
            .iter()
            .filter(|a| a.child)
            .filter_map(|a| self.ast.child(node, a.name).map(|c| (Some(a.name), c)))
            .collect()
    }

    fn selected_node(&self) -> Option<NodeId> {
        self.rows.get(self.selected).map(|r| r.node)
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(pane_area);

        let current_line = self
            .selected_node()
            .and_then(|id| self.ast.pos(id))
            .map(|pos| pos.line as usize);

        super::panes::render_source_pane(
            frame,
            columns[0],
            &self.source_code,
            current_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_tree_pane(
            frame,
            columns[1],
            &self.ast,
            &self.rows,
            self.selected,
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        super::panes::render_status_bar(frame, status_area, &self.ast, self.selected_node());
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Tree => {
                    self.selected = self.selected.saturating_sub(1);
                }
                FocusedPane::Source => {
                    self.source_scroll = self.source_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Tree => {
                    if self.selected + 1 < self.rows.len() {
                        self.selected += 1;
                    }
                }
                FocusedPane::Source => {
                    self.source_scroll = self.source_scroll.saturating_add(1);
                }
            },
            KeyCode::Right => {
                if let Some(row) = self.rows.get(self.selected) {
                    if row.has_children && !row.expanded {
                        self.expanded.insert(row.node);
                        self.rebuild_rows();
                    } else if row.has_children {
                        // already expanded: move into the first child
                        self.selected += 1;
                    }
                }
            }
            KeyCode::Left => {
                if let Some(row) = self.rows.get(self.selected) {
                    if row.expanded {
                        self.expanded.remove(&row.node);
                        self.rebuild_rows();
                    } else if let Some(parent) = self.ast.parent(row.node) {
                        // collapse onto the parent row
                        if let Some(idx) = self.rows.iter().position(|r| r.node == parent) {
                            self.selected = idx;
                        }
                    }
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(row) = self.rows.get(self.selected) {
                    if row.has_children {
                        if row.expanded {
                            self.expanded.remove(&row.node);
                        } else {
                            self.expanded.insert(row.node);
                        }
                        self.rebuild_rows();
                    }
                }
            }
            KeyCode::Home => {
                if self.focused_pane == FocusedPane::Tree {
                    self.selected = 0;
                }
            }
            KeyCode::End => {
                if self.focused_pane == FocusedPane::Tree {
                    self.selected = self.rows.len().saturating_sub(1);
                }
            }
            _ => {}
        }
    }
}
