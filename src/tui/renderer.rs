use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::tui::components::{flight_table, footer, header, ticker};
use crate::tui::models::AppState;
use crate::tui::styles::{FOOTER_HEIGHT, HEADER_HEIGHT, PADDING_HEIGHT, TICKER_HEIGHT};

/// 全UIコンポーネントを統制するメインレンダー関数
pub(crate) fn render(frame: &mut Frame, app_state: &mut AppState) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),  // ヘッダー
            Constraint::Length(PADDING_HEIGHT), // パディング
            Constraint::Min(0),                 // フライト情報
            Constraint::Length(TICKER_HEIGHT),  // ティッカー
            Constraint::Length(FOOTER_HEIGHT),  // フッター
        ])
        .split(frame.area());

    header::render_header_content(frame, app_state, main_layout[0]);
    flight_table::render_flight_tables(frame, app_state, main_layout[2]);
    ticker::render_ticker_content(frame, app_state, main_layout[3]);
    footer::render_footer_content(frame, main_layout[4]);
}
