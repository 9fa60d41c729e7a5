//! Small layout and widget helpers shared by the views

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use vigil_modules::Tab;

use super::theme::{self, KEY};

/// A rectangle centred in `area`, sized in percent
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

pub fn panel(title: impl std::fmt::Display) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(format!(" {} ", title), theme::title()))
}

/// Tab strip for a module's sub-views
pub fn tab_strip<T: Tab>(current: T) -> Tabs<'static> {
    let titles: Vec<&'static str> = T::ALL.iter().map(|t| t.label()).collect();
    let selected = T::ALL.iter().position(|t| *t == current).unwrap_or(0);
    Tabs::new(titles)
        .select(selected)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(theme::highlight())
}

/// `[key] label` pair for the status bar
pub fn hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(format!("[{}]", key), Style::default().fg(KEY)),
        Span::raw(format!(" {}  ", label)),
    ]
}

pub fn hints(pairs: &[(&'static str, &'static str)]) -> Line<'static> {
    Line::from(
        pairs
            .iter()
            .flat_map(|&(key, label)| hint(key, label))
            .collect::<Vec<_>>(),
    )
}

/// Clear `area` and draw a bordered popup with `lines`
pub fn popup(f: &mut Frame, area: Rect, title: impl std::fmt::Display, lines: Vec<Line<'_>>) {
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(panel(title)), area);
}

/// `label: value` line
pub fn field_line<'a>(label: &'a str, value: impl Into<String>, focused: bool) -> Line<'a> {
    let marker = if focused { "▶ " } else { "  " };
    let style = if focused {
        Style::default().fg(KEY)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{:<12}", label), Style::default().fg(theme::DIM)),
        Span::styled(value.into(), style),
    ])
}
