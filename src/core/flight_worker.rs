use std::sync::Arc;

use chrono::Duration;
use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

use super::{WorkerError, send_update};
use crate::app_config::AppConfig;
use crate::flight::{Direction, FlightBoard};
use crate::services::FlightSource;
use crate::services::SourceError;
use crate::tui::models::UpdateMessage;

/// 取得対象を決める設定項目
#[derive(Debug, Clone, PartialEq, Eq)]
struct FetchKey {
    airport_code: String,
    token: String,
}

impl From<&AppConfig> for FetchKey {
    fn from(config: &AppConfig) -> Self {
        Self {
            airport_code: config.airport_code.clone(),
            token: config.api_token.clone(),
        }
    }
}

pub struct FlightWorker {
    token: CancellationToken,

    /// フライト情報の取得元
    source: Arc<dyn FlightSource>,

    /// 更新間隔
    interval: Duration,

    /// 設定のスナップショット
    config_rx: watch::Receiver<AppConfig>,

    /// 手動更新の通知(処理中の要求も取りこぼさない)
    refresh_rx: watch::Receiver<()>,

    /// UpdateMessage送信用チャネル
    update_tx: mpsc::Sender<UpdateMessage>,
}

impl FlightWorker {
    pub fn new(
        token: CancellationToken,
        source: Arc<dyn FlightSource>,
        interval: Duration,
        config_rx: watch::Receiver<AppConfig>,
        refresh_rx: watch::Receiver<()>,
        update_tx: mpsc::Sender<UpdateMessage>,
    ) -> Self {
        Self {
            token,
            source,
            interval,
            config_rx,
            refresh_rx,
            update_tx,
        }
    }

    pub async fn run(mut self) -> Result<(), WorkerError> {
        info!("Starting Flight Worker");
        let mut ticker = interval(self.interval.to_std()?);
        let mut key = FetchKey::from(&*self.config_rx.borrow_and_update());
        let mut config_open = true;
        let mut refresh_open = true;

        loop {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                _ = ticker.tick() => {}
                changed = self.refresh_rx.changed(), if refresh_open => {
                    if changed.is_err() {
                        refresh_open = false;
                        continue;
                    }
                    debug!("Manual flight refresh requested");
                }
                changed = self.config_rx.changed(), if config_open => {
                    if changed.is_err() {
                        config_open = false;
                        continue;
                    }
                    let next = FetchKey::from(&*self.config_rx.borrow_and_update());
                    // 空港コードかトークンが変わった時だけ再取得する
                    if next == key {
                        continue;
                    }
                    key = next;
                }
            }

            let result = tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                result = self.fetch_board(&key) => result,
            };
            match result {
                Ok(board) => {
                    debug!(
                        "Fetched {} departures and {} arrivals for {}",
                        board.departures.len(),
                        board.arrivals.len(),
                        key.airport_code
                    );
                    send_update(&self.token, &self.update_tx, UpdateMessage::Flights(board))
                        .await?;
                }
                // 前回の表示を維持する
                Err(e) => warn!("Failed to update flight data for {}: {e}", key.airport_code),
            }
        }

        info!("Flight Worker is stopping");
        Ok(())
    }

    /// 出発と到着を並行して取得する
    /// どちらかが失敗した場合は全体を失敗とする
    async fn fetch_board(&self, key: &FetchKey) -> Result<FlightBoard, SourceError> {
        let (departures, arrivals) = tokio::join!(
            self.source
                .fetch_flights(Direction::Departures, &key.airport_code, &key.token),
            self.source
                .fetch_flights(Direction::Arrivals, &key.airport_code, &key.token),
        );

        Ok(FlightBoard {
            departures: departures?,
            arrivals: arrivals?,
        })
    }
}
