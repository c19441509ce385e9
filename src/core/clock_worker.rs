use std::time::Duration;

use chrono::Local;
use log::info;
use tokio::sync::mpsc;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

use super::{WorkerError, send_update};
use crate::tui::models::UpdateMessage;

/// 時計の更新間隔
const CLOCK_INTERVAL: Duration = Duration::from_secs(1);

pub struct ClockWorker {
    token: CancellationToken,
    update_tx: mpsc::Sender<UpdateMessage>,
}

impl ClockWorker {
    pub fn new(token: CancellationToken, update_tx: mpsc::Sender<UpdateMessage>) -> Self {
        Self { token, update_tx }
    }

    pub async fn run(self) -> Result<(), WorkerError> {
        info!("Starting Clock Worker");
        let mut ticker = interval(CLOCK_INTERVAL);

        loop {
            tokio::select! {
                biased;
                _ = self.token.cancelled() => {
                    info!("Clock Worker is stopping");
                    break;
                }
                _ = ticker.tick() => {
                    send_update(&self.token, &self.update_tx, UpdateMessage::Clock(Local::now())).await?;
                }
            }
        }

        Ok(())
    }
}
