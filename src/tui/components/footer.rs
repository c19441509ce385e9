use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Paragraph};

use crate::tui::styles::{FOOTER_COLOR, FOOTER_TEXT};

pub(crate) fn render_footer_content(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(FOOTER_TEXT)
        .style(Style::default().fg(FOOTER_COLOR))
        .block(Block::default());
    frame.render_widget(footer, area);
}
