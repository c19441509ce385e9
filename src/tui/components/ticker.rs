use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ticker::TickerMode;
use crate::tui::models::AppState;
use crate::tui::styles::{TICKER_BG, TICKER_MESSAGE_COLOR, TICKER_STATUS_COLOR};

/// 開始列から、先頭の余白と左に隠れる列数を求める
fn placement(column: i64, width: u16) -> (usize, u16) {
    if column >= 0 {
        (column.min(i64::from(width)) as usize, 0)
    } else {
        (0, column.unsigned_abs().min(u64::from(u16::MAX)) as u16)
    }
}

pub(crate) fn render_ticker_content(frame: &mut Frame, app_state: &AppState, area: Rect) {
    let state = app_state.ticker.state();
    let style = match state.mode {
        TickerMode::Static => Style::default()
            .fg(TICKER_MESSAGE_COLOR)
            .add_modifier(Modifier::BOLD),
        TickerMode::Status => Style::default().fg(TICKER_STATUS_COLOR),
    };

    let (padding, hidden) = placement(app_state.ticker_column(), area.width);
    let line = Line::from(vec![
        Span::raw(" ".repeat(padding)),
        Span::styled(state.text.clone(), style),
    ]);
    let ticker = Paragraph::new(line)
        .style(Style::default().bg(TICKER_BG))
        .scroll((0, hidden));
    frame.render_widget(ticker, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement() {
        // [正常系] 右側から入ってくる
        assert_eq!(placement(30, 80), (30, 0));
        // [正常系] 左側に抜けていく
        assert_eq!(placement(-5, 80), (0, 5));
        // [正常系] 表示領域の外
        assert_eq!(placement(120, 80), (80, 0));
    }
}
