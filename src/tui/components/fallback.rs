use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

pub(crate) fn render_fallback_content(frame: &mut Frame, area: Rect, required_width: u16) {
    let content_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(7),
            Constraint::Fill(1),
        ])
        .split(area);

    let horizontal_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(40.min(area.width)),
            Constraint::Fill(1),
        ])
        .split(content_layout[1]);

    let text = format!(
        "Screen width insufficient\n\nFlight board requires {required_width} columns\nCurrent: {} columns\nPlease expand terminal size",
        area.width
    );

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default())
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, horizontal_layout[1]);
}
