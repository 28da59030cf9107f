//! Rendering logic for each TUI pane

use crate::ast::{Ast, NodeId, Value};
use crate::ast::schema::{self, DefaultValue};
use crate::ui::app::TreeRow;
use crate::ui::theme::DEFAULT_THEME;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Simple syntax highlighting for C code
fn highlight_source_code(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Handle comments
        if c == '/' && i + 1 < chars.len() && chars[i + 1] == '/' {
            if !current_word.is_empty() {
                spans.push(Span::raw(current_word.clone()));
                current_word.clear();
            }
            spans.push(Span::styled(
                line[i..].to_string(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            break;
        }

        // Handle strings
        if c == '"' {
            if !current_word.is_empty() {
                spans.push(Span::raw(current_word.clone()));
                current_word.clear();
            }
            let mut end = i + 1;
            while end < chars.len() && chars[end] != '"' {
                if chars[end] == '\\' {
                    end += 2;
                } else {
                    end += 1;
                }
            }
            if end < chars.len() {
                end += 1;
            }
            spans.push(Span::styled(
                line[i..end.min(chars.len())].to_string(),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        if !c.is_alphanumeric() && c != '_' {
            if !current_word.is_empty() {
                let style = keyword_style(&current_word);
                spans.push(Span::styled(current_word.clone(), style));
                current_word.clear();
            }
            spans.push(Span::raw(c.to_string()));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    if !current_word.is_empty() {
        let style = keyword_style(&current_word);
        spans.push(Span::styled(current_word, style));
    }

    Line::from(spans)
}

fn keyword_style(word: &str) -> Style {
    match word {
        "int" | "char" | "void" | "float" | "double" | "long" | "short" | "unsigned"
        | "signed" | "_Bool" | "_Complex" | "_Imaginary" => {
            Style::default().fg(DEFAULT_THEME.kind)
        }
        "struct" | "union" | "enum" | "typedef" | "return" | "if" | "else" | "while" | "for"
        | "do" | "switch" | "case" | "default" | "break" | "continue" | "goto" | "sizeof"
        | "const" | "volatile" | "restrict" | "static" | "extern" | "register" | "auto"
        | "inline" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        _ => {
            if word.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                Style::default().fg(DEFAULT_THEME.number)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            }
        }
    }
}

fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Render the source code pane, highlighting the selected node's line.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    current_line: Option<usize>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Source ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Keep the selected node's line in view
    if let Some(line) = current_line {
        let idx = line.saturating_sub(1);
        if idx < *scroll_offset {
            *scroll_offset = idx;
        } else if idx >= *scroll_offset + visible_height {
            *scroll_offset = idx + 1 - visible_height;
        }
    }
    if total_lines > visible_height {
        *scroll_offset = (*scroll_offset).min(total_lines - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let is_current = current_line == Some(line_num);

            let num_style = if is_current {
                Style::default()
                    .fg(DEFAULT_THEME.border_focused)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut content_line = highlight_source_code(line);
            if is_current {
                let bg = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content_line.spans {
                    span.style = span.style.patch(bg);
                }
            }

            let mut final_spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
            final_spans.extend(content_line.spans);
            Line::from(final_spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

/// One-line summary of a node: kind, set flags, and the telling fields.
pub fn node_summary(ast: &Ast, id: NodeId) -> Vec<Span<'static>> {
    let kind = ast.kind(id);
    let mut spans = vec![Span::styled(
        kind.name().to_string(),
        Style::default().fg(DEFAULT_THEME.kind),
    )];
    if kind.is_list() {
        spans.push(Span::styled(
            format!(" [{}]", ast.list_len(id)),
            Style::default().fg(DEFAULT_THEME.comment),
        ));
        return spans;
    }
    let mut flags = Vec::new();
    for attr in schema::of(kind).attributes {
        if attr.child {
            continue;
        }
        let value = ast.field(id, attr.name);
        if attr.default == DefaultValue::False {
            if value.as_bool() {
                flags.push(attr.name);
            }
            continue;
        }
        match value {
            Value::None => {}
            Value::Str(s) => spans.push(Span::styled(
                format!(" {:?}", s),
                Style::default().fg(DEFAULT_THEME.string),
            )),
            other => spans.push(Span::styled(
                format!(" {}", other),
                Style::default().fg(DEFAULT_THEME.number),
            )),
        }
    }
    if !flags.is_empty() {
        spans.push(Span::styled(
            format!(" ({})", flags.join(" ")),
            Style::default().fg(DEFAULT_THEME.flag),
        ));
    }
    spans
}

/// Render the node tree pane.
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    ast: &Ast,
    rows: &[TreeRow],
    selected: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Nodes ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if selected < *scroll_offset {
        *scroll_offset = selected;
    } else if selected >= *scroll_offset + visible_height {
        *scroll_offset = selected + 1 - visible_height;
    }

    let visible: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, row)| {
            let marker = if row.has_children {
                if row.expanded {
                    "▾ "
                } else {
                    "▸ "
                }
            } else {
                "  "
            };
            let mut spans = vec![Span::raw(format!(
                "{}{}",
                "  ".repeat(row.depth),
                marker
            ))];
            if let Some(label) = &row.label {
                spans.push(Span::styled(
                    format!("{}: ", label),
                    Style::default().fg(DEFAULT_THEME.attr),
                ));
            }
            spans.extend(node_summary(ast, row.node));
            let mut line = Line::from(spans);
            if idx == selected {
                let bg = Style::default().bg(DEFAULT_THEME.selection_bg);
                for span in &mut line.spans {
                    span.style = span.style.patch(bg);
                }
            }
            line
        })
        .collect();

    let paragraph = Paragraph::new(visible).block(block);
    frame.render_widget(paragraph, area);
}

/// Render the one-line status bar at the bottom.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    ast: &Ast,
    selected: Option<NodeId>,
) {
    let mut spans = vec![Span::styled(
        " q quit  tab focus  ↑/↓ move  →/← expand/collapse ",
        Style::default().fg(DEFAULT_THEME.comment),
    )];
    if let Some(id) = selected {
        spans.push(Span::styled(
            format!(" {} ", ast.kind(id)),
            Style::default().fg(DEFAULT_THEME.kind),
        ));
        if let Some(pos) = ast.pos(id) {
            spans.push(Span::styled(
                format!("@ {} ", pos),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
        }
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
