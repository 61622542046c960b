//! UI widgets for the dashboard

pub mod order_book;
pub mod sidebar;
pub mod tape;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{Dashboard, SessionState};
use crate::domain::TickType;

/// Buy up in red, sell down in green (Taiwan convention)
pub fn aggressor_color(tick_type: TickType) -> Color {
    match tick_type {
        TickType::Buy => Color::Red,
        TickType::Sell => Color::Green,
        TickType::Unknown => Color::Gray,
    }
}

/// Price text; integral prices print without decimals
pub fn format_price(price: f64) -> String {
    format!("{}", price)
}

pub fn format_opt_price(price: Option<f64>) -> String {
    price.map(format_price).unwrap_or_else(|| "-".to_string())
}

/// Draw the main UI layout
pub fn draw(frame: &mut Frame, dashboard: &mut Dashboard) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Status
        ])
        .split(frame.area());

    draw_header(frame, dashboard, chunks[0]);
    draw_main(frame, dashboard, chunks[1]);
    draw_footer(frame, dashboard, chunks[2]);
}

fn draw_header(frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let state = dashboard.state();
    let status_color = match state {
        SessionState::Connected => Color::Green,
        SessionState::Shutdown => Color::DarkGray,
        _ => Color::Yellow,
    };

    let contract = dashboard
        .contract()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "-".to_string());

    let header_text = format!(" Status: {} | Contract: {}", state.label(), contract);

    let header = Paragraph::new(header_text)
        .style(Style::default().fg(status_color))
        .block(Block::default().borders(Borders::ALL).title(" SJTop "));

    frame.render_widget(header, area);
}

fn draw_main(frame: &mut Frame, dashboard: &mut Dashboard, area: Rect) {
    let mut constraints = Vec::with_capacity(3);
    if dashboard.selector.is_visible() {
        constraints.push(Constraint::Length(28)); // Sidebar
    }
    constraints.push(Constraint::Min(48)); // Tape
    constraints.push(Constraint::Length(76)); // Order book

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    let mut idx = 0;
    if dashboard.selector.is_visible() {
        sidebar::draw(frame, &dashboard.selector, chunks[idx]);
        idx += 1;
    }
    tape::draw(frame, &mut dashboard.tape, chunks[idx]);
    order_book::draw(frame, &mut dashboard.order_book, chunks[idx + 1]);
}

fn draw_footer(frame: &mut Frame, dashboard: &Dashboard, area: Rect) {
    let mut spans = vec![Span::raw(format!(" {}", dashboard.status.message()))];
    if let Some(notice) = dashboard.status.notice() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(notice.to_string(), Style::default().fg(Color::Yellow)));
    }

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" q=quit b=sidebar j/k=nav enter=select "),
    );

    frame.render_widget(footer, area);
}
