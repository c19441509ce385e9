use std::fmt::Display;

use chrono::{Local, TimeZone};
use itertools::Itertools;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction as LayoutDirection, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Cell, Paragraph, Row, Table};

use crate::app_config::city_name;
use crate::flight::status::format_time;
use crate::flight::{Direction, FlightRecord};
use crate::tui::badges::AirlineBadges;
use crate::tui::components::fallback::render_fallback_content;
use crate::tui::models::AppState;
use crate::tui::styles::{
    BADGE_TEXT_COLOR, CITY_PLACEHOLDER, EST_COLUMN_WIDTH, EST_PLACEHOLDER, FLIGHT_COLUMN_WIDTH,
    GATE_COLUMN_WIDTH, GATE_PLACEHOLDER, MIN_CITY_COLUMN_WIDTH, ROW_EVEN_BG, ROW_ODD_BG,
    ROW_TEXT_COLOR, STATUS_ACTIVE_COLOR, STATUS_CANCELLED_COLOR, STATUS_COLUMN_WIDTH,
    STATUS_DEFAULT_COLOR, STATUS_DELAYED_COLOR, STATUS_LANDED_COLOR, TABLE_HEADER_COLOR,
    TABLE_TITLE_COLOR, TABLE_TITLE_HEIGHT, TIME_COLUMN_WIDTH,
};

/// 列間の余白
const COLUMN_SPACING: u16 = 1;

/// テーブル表示に必要な最小幅
pub(crate) fn required_width() -> u16 {
    let columns = [
        TIME_COLUMN_WIDTH,
        MIN_CITY_COLUMN_WIDTH,
        FLIGHT_COLUMN_WIDTH,
        GATE_COLUMN_WIDTH,
        STATUS_COLUMN_WIDTH,
        EST_COLUMN_WIDTH,
    ];
    columns.iter().sum::<u16>() + COLUMN_SPACING * (columns.len() as u16 - 1)
}

/// 相手側空港の表示
/// 対応表にあれば"都市名 (IATA)"
fn city_text(code: Option<&str>) -> String {
    match code {
        Some(code) => match city_name(code) {
            Some(city) => format!("{city} ({code})"),
            None => code.to_string(),
        },
        None => CITY_PLACEHOLDER.to_string(),
    }
}

fn status_color(status: &str) -> Color {
    match status.to_lowercase().as_str() {
        "active" | "scheduled" | "en-route" => STATUS_ACTIVE_COLOR,
        "delayed" => STATUS_DELAYED_COLOR,
        "cancelled" | "diverted" | "incident" => STATUS_CANCELLED_COLOR,
        "landed" => STATUS_LANDED_COLOR,
        _ => STATUS_DEFAULT_COLOR,
    }
}

/// 1行分の表示内容
#[derive(Debug, Clone, PartialEq, Eq)]
struct FlightRowData {
    time: String,
    city: String,
    airline: String,
    flight: String,
    gate: String,
    status: String,
    estimated: String,
}

impl FlightRowData {
    fn new<Tz>(record: &FlightRecord, direction: Direction, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let leg = record.leg(direction);
        Self {
            time: format_time(leg.scheduled, tz).unwrap_or_else(|| "--:--".to_string()),
            city: city_text(record.counterpart(direction).airport.as_deref()),
            airline: record.airline_code().to_string(),
            flight: record.flight_number().to_string(),
            gate: leg.gate.clone().unwrap_or_else(|| GATE_PLACEHOLDER.to_string()),
            status: record.display_status(direction).to_string(),
            estimated: format_time(leg.estimated, tz).unwrap_or_else(|| EST_PLACEHOLDER.to_string()),
        }
    }

    fn into_row(self, index: usize, badges: &mut AirlineBadges) -> Row<'static> {
        let background = if index % 2 == 0 { ROW_EVEN_BG } else { ROW_ODD_BG };
        let badge = badges.get(&self.airline);
        let flight = Line::from(vec![
            Span::styled(
                format!(" {:<2} ", badge.code),
                Style::default()
                    .fg(BADGE_TEXT_COLOR)
                    .bg(badge.color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::raw(self.flight),
        ]);
        let status_style = Style::default()
            .fg(status_color(&self.status))
            .add_modifier(Modifier::BOLD);

        Row::new(vec![
            Cell::from(self.time),
            Cell::from(self.city),
            Cell::from(flight),
            Cell::from(self.gate),
            Cell::from(self.status.to_uppercase()).style(status_style),
            Cell::from(self.estimated),
        ])
        .style(Style::default().fg(ROW_TEXT_COLOR).bg(background))
    }
}

/// テンプレートに応じて出発・到着テーブルを描画する
pub(crate) fn render_flight_tables(frame: &mut Frame, app_state: &mut AppState, area: Rect) {
    // 画面幅が不足している場合はFallback画面を表示
    let required = required_width();
    if area.width < required {
        render_fallback_content(frame, area, required);
        return;
    }

    let template = app_state.config.template;
    let directions = [
        (Direction::Departures, template.shows_departures()),
        (Direction::Arrivals, template.shows_arrivals()),
    ]
    .into_iter()
    .filter_map(|(direction, shown)| shown.then_some(direction))
    .collect_vec();

    let areas = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints(directions.iter().map(|_| Constraint::Fill(1)))
        .split(area);

    for (direction, area) in directions.into_iter().zip(areas.iter()) {
        render_flight_table(frame, app_state, direction, *area);
    }
}

fn render_flight_table(frame: &mut Frame, app_state: &mut AppState, direction: Direction, area: Rect) {
    let layout = Layout::default()
        .direction(LayoutDirection::Vertical)
        .constraints([Constraint::Length(TABLE_TITLE_HEIGHT), Constraint::Min(0)])
        .split(area);

    let title = Paragraph::new(Span::styled(
        direction.title(),
        Style::default()
            .fg(TABLE_TITLE_COLOR)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(title, layout[0]);

    let row_data = app_state
        .flights(direction)
        .iter()
        .map(|record| FlightRowData::new(record, direction, &Local))
        .collect_vec();
    let rows = row_data
        .into_iter()
        .enumerate()
        .map(|(index, data)| data.into_row(index, &mut app_state.badges))
        .collect_vec();

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let table = Table::new(
        rows,
        [
            Constraint::Length(TIME_COLUMN_WIDTH),
            Constraint::Min(MIN_CITY_COLUMN_WIDTH),
            Constraint::Length(FLIGHT_COLUMN_WIDTH),
            Constraint::Length(GATE_COLUMN_WIDTH),
            Constraint::Length(STATUS_COLUMN_WIDTH),
            Constraint::Length(EST_COLUMN_WIDTH),
        ],
    )
    .column_spacing(COLUMN_SPACING)
    .block(Block::default())
    .header(
        Row::new(vec![
            Cell::from("TIME").style(bold),
            Cell::from(direction.counterpart_title()).style(bold),
            Cell::from("FLIGHT").style(bold),
            Cell::from("GATE").style(bold),
            Cell::from("STATUS").style(bold),
            Cell::from("EST").style(bold),
        ])
        .style(Style::default().fg(TABLE_HEADER_COLOR)),
    );

    frame.render_widget(table, layout[1]);
}
