//! User table screen rendering
//!
//! Renders the title bar, status lines (loading, cache hint, error), the user
//! table and a footer with key hints.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::cache::CacheStore;
use crate::controller::LoadOutcome;
use crate::data::UserSource;

/// Column headers, in display order
const HEADERS: [&str; 4] = ["Name", "Email", "Phone", "Website"];

/// Renders the whole user table screen
pub fn render_user_table<S: CacheStore, R: UserSource>(frame: &mut Frame, app: &App<S, R>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(1), // Status
            Constraint::Min(3),    // Table
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_status(frame, chunks[1], app);
    render_table(frame, chunks[2], app);
    render_footer(frame, chunks[3]);
}

fn render_header<S: CacheStore, R: UserSource>(frame: &mut Frame, area: Rect, app: &App<S, R>) {
    let mut spans = vec![Span::styled(
        "Users",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(last_load) = app.last_load {
        spans.push(Span::styled(
            format!("  (loaded {})", last_load.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

/// Picks the single status line to show, most urgent first
fn status_line<S: CacheStore, R: UserSource>(app: &App<S, R>) -> Option<Line<'static>> {
    if app.is_busy() {
        return Some(Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::Cyan),
        )));
    }
    if let Some(error) = app.controller.error() {
        return Some(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        )));
    }
    if let Some(hint) = app.controller.cache_hint() {
        return Some(Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(Color::Gray),
        )));
    }
    match app.last_outcome {
        Some(LoadOutcome::Fetched { count }) => Some(Line::from(Span::styled(
            format!("{} users fetched", count),
            Style::default().fg(Color::Green),
        ))),
        _ => None,
    }
}

fn render_status<S: CacheStore, R: UserSource>(frame: &mut Frame, area: Rect, app: &App<S, R>) {
    if let Some(line) = status_line(app) {
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn render_table<S: CacheStore, R: UserSource>(frame: &mut Frame, area: Rect, app: &App<S, R>) {
    let block = Block::default().borders(Borders::ALL);

    if app.users().is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No users loaded. Press l to load.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h))).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows = app.users().iter().map(|user| {
        Row::new(vec![
            Cell::from(user.name.clone()),
            Cell::from(user.email.clone()),
            Cell::from(user.phone.clone()),
            Cell::from(user.website.clone()),
        ])
    });

    let widths = [
        Constraint::Percentage(25),
        Constraint::Percentage(30),
        Constraint::Percentage(25),
        Constraint::Percentage(20),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default().with_selected(Some(app.selected_index));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        "l: load  c: clear cache  j/k: move  ?: help  q: quit",
        Style::default().fg(Color::DarkGray),
    )));
    frame.render_widget(footer, area);
}
