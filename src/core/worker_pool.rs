use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use super::WorkerError;
use super::bridge_worker::{BridgeSource, BridgeWorker};
use super::clock_worker::ClockWorker;
use super::flight_worker::FlightWorker;
use super::weather_worker::WeatherWorker;
use crate::app_config::AppConfig;
use crate::config::Config;
use crate::services::{FlightSource, WeatherService, WeatherSource};
use crate::tui::models::UpdateMessage;

#[derive(Debug, Error)]
pub enum WorkerPoolError {
    #[error(transparent)]
    WorkerError(#[from] WorkerError),
    #[error("Worker task failed: {0}")]
    JoinError(#[from] JoinError),
}

/// 外部データの取得元
pub struct Sources {
    pub flights: Arc<dyn FlightSource>,
    pub weather: Arc<dyn WeatherSource>,
}

pub struct WorkerPool {
    bridge_worker: BridgeWorker,
    clock_worker: ClockWorker,
    weather_worker: WeatherWorker,
    flight_worker: FlightWorker,
}

impl WorkerPool {
    pub fn new(
        token: CancellationToken,
        cfg: &Config,
        sources: Sources,
        bridge_source: Option<BridgeSource>,
        refresh_rx: watch::Receiver<()>,
        update_sender: mpsc::Sender<UpdateMessage>,
    ) -> Self {
        // 設定はBridge Workerが所有し、他のワーカーはスナップショットを購読する
        let app_config = AppConfig::from(cfg);
        let (config_tx, config_rx) = watch::channel(app_config.clone());

        let bridge_worker = BridgeWorker::new(
            token.clone(),
            app_config,
            config_tx,
            bridge_source,
            update_sender.clone(),
        );
        let clock_worker = ClockWorker::new(token.clone(), update_sender.clone());
        let weather_worker = WeatherWorker::new(
            token.clone(),
            WeatherService::new(sources.weather, cfg.refresh.weather_cache_ttl),
            cfg.refresh.weather,
            config_rx.clone(),
            refresh_rx.clone(),
            update_sender.clone(),
        );
        let flight_worker = FlightWorker::new(
            token,
            sources.flights,
            cfg.refresh.flights,
            config_rx,
            refresh_rx,
            update_sender,
        );

        Self {
            bridge_worker,
            clock_worker,
            weather_worker,
            flight_worker,
        }
    }

    pub async fn run(self) -> Result<(), WorkerPoolError> {
        // 全てのワーカーを並行実行
        let tasks = vec![
            tokio::spawn(self.bridge_worker.run()),
            tokio::spawn(self.clock_worker.run()),
            tokio::spawn(self.weather_worker.run()),
            tokio::spawn(self.flight_worker.run()),
        ];

        // 全てのタスクが完了するまで待機
        for task in tasks {
            task.await??;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::timeout;
    use tokio_test::assert_ok;

    use super::*;
    use crate::flight::{Direction, FlightRecord};
    use crate::services::{SourceError, Weather};

    struct StaticFlights;

    #[async_trait]
    impl FlightSource for StaticFlights {
        async fn fetch_flights(
            &self,
            _direction: Direction,
            _airport_code: &str,
            _token: &str,
        ) -> Result<Vec<FlightRecord>, SourceError> {
            Ok(Vec::new())
        }
    }

    struct StaticWeather;

    #[async_trait]
    impl WeatherSource for StaticWeather {
        async fn fetch_weather(&self, _location: &str) -> Result<Weather, SourceError> {
            Ok(Weather::loading())
        }
    }

    fn create_test_sources() -> Sources {
        Sources {
            flights: Arc::new(StaticFlights),
            weather: Arc::new(StaticWeather),
        }
    }

    #[test]
    fn test_worker_pool_error() {
        // [正常系] エラーの表示確認
        let error = WorkerPoolError::from(WorkerError::ChannelSendError);
        assert_eq!(error.to_string(), "Channel send error");
    }

    #[tokio::test]
    async fn test_worker_pool_run() {
        // [正常系] 全ワーカーが更新を送り、キャンセルで全て停止する
        let token = CancellationToken::new();
        let (update_tx, mut update_rx) = mpsc::channel(100);
        let pool = WorkerPool::new(
            token.clone(),
            &Config::default(),
            create_test_sources(),
            None,
            watch::channel(()).1,
            update_tx,
        );
        let handle = tokio::spawn(pool.run());

        let mut clock = false;
        let mut weather = false;
        let mut flights = false;
        while !(clock && weather && flights) {
            match timeout(Duration::from_millis(500), update_rx.recv()).await {
                Ok(Some(UpdateMessage::Clock(_))) => clock = true,
                Ok(Some(UpdateMessage::Weather(_))) => weather = true,
                Ok(Some(UpdateMessage::Flights(_))) => flights = true,
                other => panic!("unexpected message: {other:?}"),
            }
        }

        token.cancel();
        let result = timeout(Duration::from_millis(500), handle).await.unwrap();
        assert_ok!(result.unwrap());
    }

    #[tokio::test]
    async fn test_worker_pool_fifo_without_writer() {
        // [正常系] ホスト側が接続していなくても他のワーカーは動作する
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.fifo");
        let status = std::process::Command::new("mkfifo")
            .arg(&path)
            .status()
            .unwrap();
        assert!(status.success());

        let token = CancellationToken::new();
        let (update_tx, mut update_rx) = mpsc::channel(100);
        let pool = WorkerPool::new(
            token.clone(),
            &Config::default(),
            create_test_sources(),
            Some(BridgeSource::Path(path)),
            watch::channel(()).1,
            update_tx,
        );
        let handle = tokio::spawn(pool.run());

        let clock = async {
            loop {
                if let Some(UpdateMessage::Clock(_)) = update_rx.recv().await {
                    break;
                }
            }
        };
        assert!(timeout(Duration::from_millis(500), clock).await.is_ok());

        // [正常系] キャンセルで全て停止する
        token.cancel();
        let result = timeout(Duration::from_millis(500), handle).await.unwrap();
        assert_ok!(result.unwrap());
    }
}
