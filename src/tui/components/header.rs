use chrono::{DateTime, TimeZone};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::services::Weather;
use crate::tui::models::AppState;
use crate::tui::styles::{APP_TITLE, HEADER_COLOR, HEADER_DATE_COLOR};

/// HH:MM(24時間表記)
fn clock_text<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%H:%M").to_string()
}

/// 曜日と日付
fn date_text<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%A, %-d %B %Y").to_string()
}

fn weather_text(weather: &Weather) -> String {
    format!("{} {} {}", weather.icon, weather.temp, weather.condition)
}

/// 左・中央・右の3つに分けて1行に並べる
fn spread_line<'a>(left: Vec<Span<'a>>, center: Vec<Span<'a>>, right: Vec<Span<'a>>, width: u16) -> Line<'a> {
    fn span_width(spans: &[Span]) -> usize {
        spans.iter().map(Span::width).sum()
    }
    let total_width = width as usize;
    let (left_len, center_len, right_len) = (span_width(&left), span_width(&center), span_width(&right));

    // 中央寄せのためのパディング計算
    let center_padding = (total_width.saturating_sub(center_len) / 2).saturating_sub(left_len);
    let right_padding =
        total_width.saturating_sub(left_len + center_padding + center_len + right_len);

    let mut spans = left;
    spans.push(Span::raw(" ".repeat(center_padding)));
    spans.extend(center);
    spans.push(Span::raw(" ".repeat(right_padding)));
    spans.extend(right);
    Line::from(spans)
}

pub(crate) fn render_header_content(frame: &mut Frame, app_state: &AppState, area: Rect) {
    let bold = Style::default()
        .fg(HEADER_COLOR)
        .add_modifier(Modifier::BOLD);

    // 1行目: 空港・タイトル・時刻
    let first = spread_line(
        vec![
            Span::styled(app_state.config.airport_code.clone(), bold),
            Span::raw(" "),
            Span::raw(app_state.config.airport_location.clone()),
        ],
        vec![Span::styled(APP_TITLE, bold)],
        vec![Span::styled(clock_text(&app_state.now), bold)],
        area.width,
    );

    // 2行目: 日付・天気
    let second = spread_line(
        vec![Span::styled(
            date_text(&app_state.now),
            Style::default().fg(HEADER_DATE_COLOR),
        )],
        Vec::new(),
        vec![Span::raw(weather_text(&app_state.weather))],
        area.width,
    );

    let header = Paragraph::new(vec![first, second]).block(Block::default());
    frame.render_widget(header, area);
}
