//! Trade tape widget

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::{aggressor_color, format_opt_price, format_price};
use crate::application::dashboard::{TapeRow, TradeTapePanel};

fn tape_row(row: &TapeRow) -> Row<'static> {
    let color = aggressor_color(row.aggressor);
    Row::new(vec![
        Cell::from(row.time_label()),
        Cell::from(Span::styled(format_opt_price(row.bid), Style::default().fg(Color::Green))),
        Cell::from(Span::styled(format_price(row.price), Style::default().fg(color))),
        Cell::from(Span::styled(format_opt_price(row.ask), Style::default().fg(Color::Red))),
        Cell::from(Span::styled(row.volume.to_string(), Style::default().fg(color))),
    ])
}

/// Draw the tape for the current contract
pub fn draw(frame: &mut Frame, panel: &mut TradeTapePanel, area: Rect) {
    let title = match panel.contract() {
        Some(c) => format!(" Ticks {} ", c.code),
        None => " Ticks ".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let rows = panel.render();
    if rows.is_empty() {
        let empty = Paragraph::new(" No recent ticks")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Time", "Bid", "Deal", "Ask", "Vol"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows.iter().map(tape_row).collect::<Vec<_>>(),
        [
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(5),
        ],
    )
    .header(header)
    .block(block)
    .column_spacing(1);

    frame.render_widget(table, area);
}
