use chrono::{DateTime, Local, Utc};
use crossterm::event;
use ratatui::text::Span;

use crate::app_config::AppConfig;
use crate::config::Config;
use crate::flight::status::status_updates;
use crate::flight::{Direction, FlightBoard, FlightRecord, normalize};
use crate::services::Weather;
use crate::ticker::Ticker;
use crate::tui::badges::AirlineBadges;
use crate::tui::styles::CELL_WIDTH_PX;

#[derive(Debug, Clone)]
pub(crate) enum Event {
    Init,
    Quit,
    Error,
    Render,
    Key(event::KeyEvent),
}

/// ワーカーから画面への更新
#[derive(Debug, Clone)]
pub(crate) enum UpdateMessage {
    Clock(DateTime<Local>),
    Weather(Weather),
    Flights(FlightBoard),
    Config(AppConfig),
}

/// 表示幅をティッカーの座標系(ピクセル)に変換する
pub(crate) fn text_width(text: &str) -> f64 {
    Span::raw(text).width() as f64 * CELL_WIDTH_PX
}

pub(crate) struct AppState {
    pub(crate) config: AppConfig,
    pub(crate) now: DateTime<Local>,
    pub(crate) weather: Weather,
    /// 最後に取得に成功した生データ
    board: FlightBoard,
    pub(crate) departures: Vec<FlightRecord>,
    pub(crate) arrivals: Vec<FlightRecord>,
    pub(crate) ticker: Ticker,
    pub(crate) badges: AirlineBadges,
}

impl AppState {
    pub(crate) fn new(config: &Config) -> Self {
        Self::with_ticker(AppConfig::from(config), Ticker::new)
    }

    pub(crate) fn with_ticker(config: AppConfig, ticker: impl FnOnce(&AppConfig) -> Ticker) -> Self {
        Self {
            ticker: ticker(&config),
            config,
            now: Local::now(),
            weather: Weather::loading(),
            board: FlightBoard::default(),
            departures: Vec::new(),
            arrivals: Vec::new(),
            badges: AirlineBadges::new(),
        }
    }

    pub(crate) fn apply_update(&mut self, update: UpdateMessage) {
        match update {
            UpdateMessage::Clock(now) => self.now = now,
            UpdateMessage::Weather(weather) => self.weather = weather,
            UpdateMessage::Flights(board) => {
                self.ticker.set_statuses(status_updates(&board, &Local));
                self.board = board;
                self.renormalize(Utc::now());
            }
            UpdateMessage::Config(config) => {
                let rows_changed = config.rows_count != self.config.rows_count;
                self.ticker.apply_config(&config);
                self.config = config;
                if rows_changed {
                    self.renormalize(Utc::now());
                }
            }
        }
    }

    /// 保持している生データから表示リストを作り直す
    pub(crate) fn renormalize(&mut self, now: DateTime<Utc>) {
        let rows = self.config.rows_count;
        self.departures = normalize(&self.board.departures, Direction::Departures, now, rows);
        self.arrivals = normalize(&self.board.arrivals, Direction::Arrivals, now, rows);
    }

    pub(crate) fn flights(&self, direction: Direction) -> &[FlightRecord] {
        match direction {
            Direction::Departures => &self.departures,
            Direction::Arrivals => &self.arrivals,
        }
    }

    /// ティッカーを1フレーム進める
    pub(crate) fn advance_ticker(&mut self, columns: u16) -> bool {
        let viewport = f64::from(columns) * CELL_WIDTH_PX;
        self.ticker.advance(viewport, text_width)
    }

    /// ティッカーのテキスト開始位置(列)
    pub(crate) fn ticker_column(&self) -> i64 {
        (self.ticker.state().offset / CELL_WIDTH_PX).floor() as i64
    }
}
