use chrono::Duration;
use log::{debug, info};
use tokio::sync::{mpsc, watch};
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

use super::{WorkerError, send_update};
use crate::app_config::AppConfig;
use crate::services::WeatherService;
use crate::tui::models::UpdateMessage;

pub struct WeatherWorker {
    token: CancellationToken,

    /// キャッシュ付きの天気取得
    service: WeatherService,

    /// 更新間隔
    interval: Duration,

    /// 設定のスナップショット
    config_rx: watch::Receiver<AppConfig>,

    /// 手動更新の通知(処理中の要求も取りこぼさない)
    refresh_rx: watch::Receiver<()>,

    /// UpdateMessage送信用チャネル
    update_tx: mpsc::Sender<UpdateMessage>,
}

impl WeatherWorker {
    pub fn new(
        token: CancellationToken,
        service: WeatherService,
        interval: Duration,
        config_rx: watch::Receiver<AppConfig>,
        refresh_rx: watch::Receiver<()>,
        update_tx: mpsc::Sender<UpdateMessage>,
    ) -> Self {
        Self {
            token,
            service,
            interval,
            config_rx,
            refresh_rx,
            update_tx,
        }
    }

    pub async fn run(mut self) -> Result<(), WorkerError> {
        info!("Starting Weather Worker");
        let mut ticker = interval(self.interval.to_std()?);
        let mut location = self.config_rx.borrow_and_update().airport_location.clone();
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
                    debug!("Manual weather refresh requested");
                }
                changed = self.config_rx.changed(), if config_open => {
                    if changed.is_err() {
                        config_open = false;
                        continue;
                    }
                    let next = self.config_rx.borrow_and_update().airport_location.clone();
                    // 所在地が変わった時だけ再取得する
                    if next == location {
                        continue;
                    }
                    location = next;
                }
            }

            let weather = tokio::select! {
                biased;
                _ = self.token.cancelled() => break,
                weather = self.service.fetch_weather(&location) => weather,
            };
            send_update(&self.token, &self.update_tx, UpdateMessage::Weather(weather)).await?;
        }

        info!("Weather Worker is stopping");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration as StdDuration;

    use async_trait::async_trait;
    use mockall::mock;
    use tokio::time::timeout;
    use tokio_test::assert_ok;

    use super::*;
    use crate::config::Config;
    use crate::services::{SourceError, Weather, WeatherSource};

    mock! {
        Source {}

        #[async_trait]
        impl WeatherSource for Source {
            async fn fetch_weather(&self, location: &str) -> Result<Weather, SourceError>;
        }
    }

    fn weather_for(location: &str) -> Weather {
        Weather {
            temp: "10°C".to_string(),
            condition: location.to_string(),
            icon: "☁️",
        }
    }

    async fn next_weather(rx: &mut mpsc::Receiver<UpdateMessage>) -> Weather {
        match timeout(StdDuration::from_millis(500), rx.recv()).await {
            Ok(Some(UpdateMessage::Weather(weather))) => weather,
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_weather_worker_location_change() {
        let mut source = MockSource::new();
        source
            .expect_fetch_weather()
            .returning(|location| Ok(weather_for(location)));
        let service = WeatherService::new(Arc::new(source), Duration::seconds(600));

        let mut app_config = AppConfig::from(&Config::default());
        let (config_tx, config_rx) = watch::channel(app_config.clone());
        let (_refresh_tx, refresh_rx) = watch::channel(());
        let (update_tx, mut update_rx) = mpsc::channel(10);
        let token = CancellationToken::new();
        let worker = WeatherWorker::new(
            token.clone(),
            service,
            Duration::seconds(3600),
            config_rx,
            refresh_rx,
            update_tx,
        );
        let handle = tokio::spawn(worker.run());

        // [正常系] 起動直後に取得する
        assert_eq!(next_weather(&mut update_rx).await.condition, "WARSAW");

        // [正常系] 所在地以外の変更では再取得しない
        app_config.ticker_text = "Hello".to_string();
        config_tx.send_replace(app_config.clone());
        // [正常系] 所在地が変われば再取得する
        app_config.set_airport("BER");
        config_tx.send_replace(app_config.clone());
        assert_eq!(next_weather(&mut update_rx).await.condition, "BERLIN");

        token.cancel();
        let result = timeout(StdDuration::from_millis(500), handle).await.unwrap();
        assert_ok!(result.unwrap());
        assert!(update_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_weather_worker_failure_sentinel() {
        // [異常系] 取得失敗時は代替表示を送る
        let mut source = MockSource::new();
        source
            .expect_fetch_weather()
            .returning(|_| Err(SourceError::StatusError(401)));
        let service = WeatherService::new(Arc::new(source), Duration::seconds(600));

        let (_config_tx, config_rx) = watch::channel(AppConfig::from(&Config::default()));
        let (_refresh_tx, refresh_rx) = watch::channel(());
        let (update_tx, mut update_rx) = mpsc::channel(10);
        let token = CancellationToken::new();
        let worker = WeatherWorker::new(
            token.clone(),
            service,
            Duration::seconds(3600),
            config_rx,
            refresh_rx,
            update_tx,
        );
        let handle = tokio::spawn(worker.run());

        assert_eq!(next_weather(&mut update_rx).await, Weather::unavailable());

        token.cancel();
        handle.await.unwrap().unwrap();
    }
}
