//! Sidebar widget - displays the contract list

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::application::dashboard::{ContractSelector, SelectorEntry};

/// Draw the sidebar with the grouped contract list
pub fn draw(frame: &mut Frame, selector: &ContractSelector, area: Rect) {
    let cursor = selector.cursor();
    let active = selector.active_code();

    let items: Vec<ListItem> = selector
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| match entry {
            SelectorEntry::Group(label) => ListItem::new(Line::from(Span::styled(
                label.clone(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            ))),
            SelectorEntry::Contract(contract) => {
                let is_cursor = cursor == Some(i);
                let is_active = active == Some(contract.code.as_str());

                let style = if is_cursor {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else if is_active {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::White)
                };

                let prefix = if is_active { "* " } else { "  " };

                // Truncate symbol to fit sidebar
                let name = if contract.symbol.chars().count() > 22 {
                    let head: String = contract.symbol.chars().take(19).collect();
                    format!("{}...", head)
                } else {
                    contract.symbol.clone()
                };

                ListItem::new(Line::from(vec![
                    Span::styled(prefix, style),
                    Span::styled(name, style),
                ]))
            }
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Contracts "))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));

    let mut state = ListState::default();
    state.select(cursor);

    frame.render_stateful_widget(list, area, &mut state);
}
