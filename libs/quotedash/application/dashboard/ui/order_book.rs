//! Depth table widget: cumulative volume bars, levels and last trade

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::{aggressor_color, format_price};
use crate::application::dashboard::{BarSpan, DepthRow, OrderBookPanel};
use crate::domain::BookSide;

const BAR_WIDTH: u16 = 40;
const RATIO_BAR_WIDTH: usize = 20;
const FILL: &str = "█";

/// Bar as spans: blank lead, filled span, blank tail
fn bar_spans(bar: &BarSpan, width: usize, color: Color) -> Line<'static> {
    let (lead, filled, tail) = bar.segments(width);
    Line::from(vec![
        Span::raw(" ".repeat(lead)),
        Span::styled(FILL.repeat(filled), Style::default().fg(color)),
        Span::raw(" ".repeat(tail)),
    ])
}

/// Two-tone bar: filled part in `fg`, remainder in `bg`
fn split_bar(bar: &BarSpan, width: usize, fg: Color, bg: Color) -> Line<'static> {
    if bar.size <= 0.0 {
        return Line::from(Span::styled(" ".repeat(width), Style::default().fg(Color::DarkGray)));
    }
    let (lead, filled, tail) = bar.segments(width);
    Line::from(vec![
        Span::styled(FILL.repeat(lead), Style::default().fg(bg)),
        Span::styled(FILL.repeat(filled), Style::default().fg(fg)),
        Span::styled(FILL.repeat(tail), Style::default().fg(bg)),
    ])
}

fn level_row(row: &DepthRow, bar_width: usize) -> Row<'static> {
    let (color, alignment) = match row.side {
        BookSide::Ask => (Color::Green, Alignment::Right),
        BookSide::Bid => (Color::Red, Alignment::Left),
    };

    // Blank cells for levels the broker did not fill
    let (volume, price) = if row.level.is_empty() {
        (String::new(), String::new())
    } else {
        (row.level.volume.to_string(), format_price(row.level.price))
    };

    Row::new(vec![
        Cell::from(bar_spans(&row.bar, bar_width, color)),
        Cell::from(Line::from(volume).alignment(alignment)),
        Cell::from(Line::from(price).alignment(alignment)),
    ])
    .style(Style::default().fg(color))
}

/// Draw the order book panel
pub fn draw(frame: &mut Frame, panel: &mut OrderBookPanel, area: Rect) {
    let snapshot = panel.render();

    let title = if snapshot.title.is_empty() {
        " Order Book ".to_string()
    } else {
        format!(" {} ", snapshot.title)
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(11), // Header + 10 levels
            Constraint::Length(3),  // Totals and last trade
            Constraint::Min(0),
        ])
        .split(inner);

    let bar_width = BAR_WIDTH.min(inner.width.saturating_sub(22)) as usize;
    let rows: Vec<Row> = snapshot
        .rows
        .iter()
        .map(|row| level_row(row, bar_width))
        .collect();

    let header = Row::new(vec!["", "BidAskVolume", "BidAskPrice"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let table = Table::new(
        rows,
        [
            Constraint::Length(bar_width as u16),
            Constraint::Length(12),
            Constraint::Length(11),
        ],
    )
    .header(header)
    .column_spacing(1);

    frame.render_widget(table, chunks[0]);

    // Totals: resting bid share of the book on the left
    let totals = Line::from(vec![
        Span::styled(format!("{:>8}", snapshot.ask_total), Style::default().fg(Color::Green)),
        Span::raw(" "),
        Span::styled(format!("{:<8}", snapshot.bid_total), Style::default().fg(Color::Red)),
        Span::raw(" "),
    ]);
    let mut total_line = totals;
    total_line
        .spans
        .extend(split_bar(&snapshot.total_bar, bar_width, Color::Red, Color::Green).spans);

    let trade_line = match &snapshot.last_trade {
        Some(trade) => {
            let color = aggressor_color(trade.tick_type);
            let mut spans = vec![
                Span::styled(
                    format!(
                        "{} {} x {} {} ",
                        trade.datetime.format("%H:%M:%S"),
                        format_price(trade.price),
                        trade.volume,
                        trade.tick_type
                    ),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ];
            spans.extend(
                split_bar(&snapshot.ratio_bar, RATIO_BAR_WIDTH, Color::Red, Color::Green).spans,
            );
            spans.push(Span::styled(
                format!(" {:.4}%", snapshot.buy_ratio * 100.0),
                Style::default().fg(color),
            ));
            Line::from(spans)
        }
        None => Line::from(Span::styled(
            "No trades yet",
            Style::default().fg(Color::DarkGray),
        )),
    };

    frame.render_widget(Paragraph::new(vec![total_line, trade_line]), chunks[1]);
}
