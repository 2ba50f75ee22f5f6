//! Interactive menu browser.
//!
//! Materializes the persisted records as a terminal menu: compact menus are
//! nested lists, expandable menus render their child submenus side by side.
//! Leaf activation appends the group into the `--target` document.

use std::{
    io,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use nglib::{Document, append_group, menu::MenuNode};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::ctx::AppContext;

mod registry;

pub use registry::{LeafEntry, MenuRegistry, Row};

/// Cursor position: a flat row in compact menus, a cell in expanded ones.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Cursor {
    Row(usize),
    Cell { col: usize, row: usize },
}

struct Browser {
    ctx: AppContext,
    registry: MenuRegistry,
    /// Menu ids from root downwards; empty means the root listing.
    stack: Vec<String>,
    cursor: Cursor,
    target: Option<PathBuf>,
    status: Option<String>,
}

/// Run the browser until the user quits.
pub fn run(ctx: &AppContext, target: Option<&Path>) -> anyhow::Result<()> {
    let registry = MenuRegistry::load(&ctx.store(), &ctx.load_library()?)
        .context("loading menu records")?;
    let mut browser = Browser {
        ctx: ctx.clone(),
        registry,
        stack: Vec::new(),
        cursor: Cursor::Row(0),
        target: target.map(Path::to_path_buf),
        status: None,
    };

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    loop {
        terminal.draw(|f| browser.draw(f))?;
        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if matches!(key.kind, KeyEventKind::Release | KeyEventKind::Repeat) {
                continue;
            }
            if browser.handle_key(key) {
                break;
            }
        }
    }
    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

impl Browser {
    fn current_menu(&self) -> Option<&MenuNode> {
        let id = self.stack.last()?;
        self.registry.menu(id)
    }

    /// Selectable entries of the current view, in display order.
    fn rows(&self) -> Vec<Row> {
        match self.current_menu() {
            Some(menu) => self.registry.rows_of(menu),
            None => self
                .registry
                .roots
                .iter()
                .map(|r| Row::Submenu(r.id.clone()))
                .collect(),
        }
    }

    fn expanded(&self) -> bool {
        self.current_menu().is_some_and(|m| m.is_expandable)
    }

    /// Columns of an expanded menu: one per child submenu, plus a leading
    /// column for the menu's own leaves when it has any.
    fn columns(&self) -> Vec<(String, Vec<String>)> {
        let Some(menu) = self.current_menu() else {
            return Vec::new();
        };
        let mut columns = Vec::new();

        let own = self.registry.leaf_ids_of(menu);
        if !own.is_empty() {
            columns.push((menu.label.clone(), own));
        }
        for row in self.registry.rows_of(menu) {
            if let Row::Submenu(id) = row
                && let Some(child) = self.registry.menu(&id)
            {
                columns.push((child.label.clone(), self.registry.leaf_ids_of(child)));
            }
        }
        columns
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.status = None;
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Esc | KeyCode::Backspace => {
                if self.stack.pop().is_some() {
                    self.reset_cursor();
                }
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Up => self.move_row(-1),
            KeyCode::Down => self.move_row(1),
            KeyCode::Left => self.move_col(-1),
            KeyCode::Right => self.move_col(1),
            KeyCode::Enter => self.activate(),
            _ => {}
        }
        false
    }

    fn reset_cursor(&mut self) {
        self.cursor = if self.expanded() {
            Cursor::Cell { col: 0, row: 0 }
        } else {
            let rows = self.rows();
            Cursor::Row(rows.iter().position(Row::is_selectable).unwrap_or(0))
        };
    }

    fn move_row(&mut self, delta: i32) {
        match self.cursor {
            Cursor::Row(current) => {
                let rows = self.rows();
                let mut i = current as i32;
                loop {
                    i += delta;
                    if i < 0 || i as usize >= rows.len() {
                        return;
                    }
                    if rows[i as usize].is_selectable() {
                        self.cursor = Cursor::Row(i as usize);
                        return;
                    }
                }
            }
            Cursor::Cell { col, row } => {
                let columns = self.columns();
                let len = columns.get(col).map_or(0, |(_, ids)| ids.len());
                let next = row as i32 + delta;
                if next >= 0 && (next as usize) < len {
                    self.cursor = Cursor::Cell {
                        col,
                        row: next as usize,
                    };
                }
            }
        }
    }

    fn move_col(&mut self, delta: i32) {
        if let Cursor::Cell { col, row } = self.cursor {
            let columns = self.columns();
            let next = col as i32 + delta;
            if next >= 0 && (next as usize) < columns.len() {
                let col = next as usize;
                let row = row.min(columns[col].1.len().saturating_sub(1));
                self.cursor = Cursor::Cell { col, row };
            }
        }
    }

    fn activate(&mut self) {
        let id = match self.cursor {
            Cursor::Row(i) => match self.rows().get(i) {
                Some(Row::Submenu(id)) => {
                    self.stack.push(id.clone());
                    self.reset_cursor();
                    return;
                }
                Some(Row::Leaf(id)) => id.clone(),
                _ => return,
            },
            Cursor::Cell { col, row } => {
                let columns = self.columns();
                match columns.get(col).and_then(|(_, ids)| ids.get(row)) {
                    Some(id) => id.clone(),
                    None => return,
                }
            }
        };
        self.activate_leaf(&id);
    }

    fn activate_leaf(&mut self, id: &str) {
        let Some(leaf) = self.registry.leaf(id) else {
            return;
        };
        let Some(target) = self.target.clone() else {
            self.status = Some("no --target document given".to_string());
            return;
        };

        let group = leaf.item.node_tree.clone();
        let width = Some(leaf.item.width);
        let source = leaf.source.clone();
        let result = Document::load(&target)
            .and_then(|mut doc| {
                let outcome = append_group(&source, &group, &mut doc, None, width)?;
                doc.save(&target)?;
                Ok(outcome)
            });
        self.status = Some(match result {
            Ok(outcome) if outcome.reused => {
                format!("bound existing '{}' as '{}'", outcome.group, outcome.node)
            }
            Ok(outcome) => format!("imported '{}' as '{}'", outcome.group, outcome.node),
            Err(e) => format!("append failed: {e}"),
        });
    }

    /// Reload every record; all-or-nothing swap.
    fn reload(&mut self) {
        let library = match self.ctx.load_library() {
            Ok(lib) => lib,
            Err(e) => {
                self.status = Some(format!("reload failed: {e}"));
                return;
            }
        };
        match MenuRegistry::load(&self.ctx.store(), &library) {
            Ok(registry) => {
                self.registry = registry;
                self.stack.retain(|id| self.registry.menu(id).is_some());
                self.reset_cursor();
                self.status = Some("reloaded".to_string());
            }
            Err(e) => self.status = Some(format!("reload failed: {e}")),
        }
    }

    fn breadcrumb(&self) -> String {
        let mut parts = vec!["library".to_string()];
        for id in &self.stack {
            if let Some(menu) = self.registry.menu(id) {
                parts.push(menu.label.clone());
            }
        }
        parts.join(" / ")
    }

    fn draw(&mut self, frame: &mut Frame) {
        let [body, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());

        if self.expanded() {
            self.draw_expanded(frame, body);
        } else {
            self.draw_compact(frame, body);
        }

        let hint = self
            .status
            .as_deref()
            .unwrap_or("enter: open/activate  esc: back  r: reload  q: quit");
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                hint,
                Style::default().fg(Color::DarkGray),
            ))),
            footer,
        );
    }

    fn draw_compact(&self, frame: &mut Frame, area: Rect) {
        let rows = self.rows();
        let selected = match self.cursor {
            Cursor::Row(i) => i,
            Cursor::Cell { .. } => 0,
        };

        let lines: Vec<Line> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| self.row_line(row, i == selected))
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .title(self.breadcrumb());
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn row_line(&self, row: &Row, selected: bool) -> Line<'static> {
        let style = if selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        match row {
            Row::Submenu(id) => {
                let label = match self.current_menu() {
                    Some(_) => self
                        .registry
                        .menu(id)
                        .map(|m| m.label.clone())
                        .unwrap_or_default(),
                    None => self
                        .registry
                        .roots
                        .iter()
                        .find(|r| &r.id == id)
                        .map(|r| r.label.clone())
                        .unwrap_or_default(),
                };
                Line::from(Span::styled(format!("▸ {label}"), style))
            }
            Row::Leaf(id) => {
                let label = self
                    .registry
                    .leaf(id)
                    .map(|l| l.item.display_label().to_string())
                    .unwrap_or_default();
                Line::from(Span::styled(format!("  {label}"), style))
            }
            Row::Separator => Line::from(Span::styled(
                "──────────",
                Style::default().fg(Color::DarkGray),
            )),
        }
    }

    fn draw_expanded(&self, frame: &mut Frame, area: Rect) {
        let columns = self.columns();
        if columns.is_empty() {
            return;
        }
        let (sel_col, sel_row) = match self.cursor {
            Cursor::Cell { col, row } => (col, row),
            Cursor::Row(_) => (0, 0),
        };

        let constraints: Vec<Constraint> = columns
            .iter()
            .map(|_| Constraint::Ratio(1, columns.len() as u32))
            .collect();
        let areas = Layout::horizontal(constraints).split(area);

        for (col, ((title, ids), slot)) in columns.iter().zip(areas.iter()).enumerate() {
            let lines: Vec<Line> = ids
                .iter()
                .enumerate()
                .map(|(row, id)| {
                    let label = self
                        .registry
                        .leaf(id)
                        .map(|l| l.item.display_label().to_string())
                        .unwrap_or_default();
                    let style = if col == sel_col && row == sel_row {
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Cyan)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    Line::from(Span::styled(label, style))
                })
                .collect();

            let block = Block::default()
                .borders(Borders::ALL)
                .title(title.clone());
            frame.render_widget(Paragraph::new(lines).block(block), *slot);
        }
    }
}
