use std::time::Duration as StdDuration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::app_config::AppConfig;

/// ティッカーのスクロール方向
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TickerDirection {
    #[default]
    Left,
    Right,
}

impl TickerDirection {
    /// ホストのオプション値から変換
    /// "left"以外は全て右方向として扱う
    pub(crate) fn from_option(value: &str) -> Self {
        if value == "left" {
            TickerDirection::Left
        } else {
            TickerDirection::Right
        }
    }
}

/// 表示モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickerMode {
    /// 固定メッセージ
    Static,
    /// フライト情報のローテーション
    Status,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TickerState {
    pub(crate) mode: TickerMode,
    pub(crate) text: String,
    /// 表示領域左端からのテキスト位置(ピクセル)
    pub(crate) offset: f64,
}

pub(crate) struct Ticker {
    state: TickerState,
    message: String,
    direction: TickerDirection,
    speed: u32,
    frequency: u32,
    show_default: bool,
    statuses: Vec<String>,
    /// 次のフレームで開始位置に戻すか
    needs_reset: bool,
    rng: StdRng,
}

impl Ticker {
    pub(crate) fn new(config: &AppConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    pub(crate) fn with_rng(config: &AppConfig, rng: StdRng) -> Self {
        Self {
            state: TickerState {
                mode: TickerMode::Static,
                text: config.ticker_text.clone(),
                offset: 0.0,
            },
            message: config.ticker_text.clone(),
            direction: config.ticker_direction,
            speed: config.ticker_speed,
            frequency: config.ticker_frequency,
            show_default: config.show_default_ticker,
            statuses: Vec::new(),
            needs_reset: true,
            rng,
        }
    }

    pub(crate) fn state(&self) -> &TickerState {
        &self.state
    }

    /// 1フレームあたりの移動量
    fn delta(&self) -> f64 {
        f64::from(self.speed) / 10.0
    }

    /// フレーム間隔
    /// `frequency`は1秒あたりのフレーム数(既定は20)で、ディスプレイのリフレッシュレートには同期しない
    /// 1フレームの移動量は`speed / 10`で一定のため、画面を横切るフレーム数は`frequency`に依存しない
    pub(crate) fn frame_period(&self) -> StdDuration {
        StdDuration::from_secs(1) / self.frequency.max(1)
    }

    fn start_offset(&self, viewport_width: f64, text_width: f64) -> f64 {
        match self.direction {
            TickerDirection::Left => viewport_width,
            TickerDirection::Right => -text_width,
        }
    }

    /// 1フレーム分スクロールを進める
    /// テキストが表示領域を抜けきった場合はtrueを返す
    pub(crate) fn advance(&mut self, viewport_width: f64, measure: impl Fn(&str) -> f64) -> bool {
        if self.needs_reset {
            self.state.offset = self.start_offset(viewport_width, measure(&self.state.text));
            self.needs_reset = false;
        }

        let text_width = measure(&self.state.text);
        let delta = self.delta();
        let exited = match self.direction {
            TickerDirection::Left => {
                self.state.offset -= delta;
                self.state.offset < -text_width
            }
            TickerDirection::Right => {
                self.state.offset += delta;
                self.state.offset > viewport_width
            }
        };

        if exited {
            self.toggle();
            self.state.offset = self.start_offset(viewport_width, measure(&self.state.text));
        }
        exited
    }

    /// 固定メッセージとフライト情報を切り替える
    fn toggle(&mut self) {
        if !self.show_default || self.statuses.is_empty() {
            self.show_message();
            return;
        }

        match self.state.mode {
            TickerMode::Static => {
                // 重複ありの一様ランダム
                let index = self.rng.random_range(0..self.statuses.len());
                self.state.mode = TickerMode::Status;
                self.state.text = self.statuses[index].clone();
            }
            TickerMode::Status => self.show_message(),
        }
    }

    fn show_message(&mut self) {
        self.state.mode = TickerMode::Static;
        self.state.text = self.message.clone();
    }

    /// ローテーション候補を差し替える
    pub(crate) fn set_statuses(&mut self, statuses: Vec<String>) {
        self.statuses = statuses;
        if self.statuses.is_empty() && self.state.mode == TickerMode::Status {
            self.show_message();
        }
    }

    pub(crate) fn apply_config(&mut self, config: &AppConfig) {
        if self.direction != config.ticker_direction || self.speed != config.ticker_speed {
            self.needs_reset = true;
        }
        self.direction = config.ticker_direction;
        self.speed = config.ticker_speed;
        self.frequency = config.ticker_frequency;
        self.show_default = config.show_default_ticker;
        self.message = config.ticker_text.clone();

        if self.state.mode == TickerMode::Static || !self.show_default {
            self.show_message();
        }
    }
}
