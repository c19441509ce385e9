use std::sync::Arc;

use anyhow::Result;
use log::info;
use thiserror::Error;
use tokio::signal::ctrl_c;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::services::{AviationStackClient, OpenWeatherClient};
use crate::tui::models::UpdateMessage;

pub mod bridge_worker;
pub mod clock_worker;
pub mod flight_worker;
pub mod weather_worker;
pub mod worker_pool;

pub use bridge_worker::BridgeSource;
pub use worker_pool::{Sources, WorkerPool};

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Channel send error")]
    ChannelSendError,
    #[error("Invalid refresh interval")]
    InvalidInterval(#[from] chrono::OutOfRangeError),
    #[error(transparent)]
    BridgeReadError(#[from] std::io::Error),
}

/// 画面への更新を送信する
/// キャンセル後は何も送らない
pub(crate) async fn send_update(
    token: &CancellationToken,
    tx: &mpsc::Sender<UpdateMessage>,
    message: UpdateMessage,
) -> Result<(), WorkerError> {
    if token.is_cancelled() {
        return Ok(());
    }
    tx.send(message)
        .await
        .map_err(|_| WorkerError::ChannelSendError)
}

pub async fn run_display_workers(
    token: CancellationToken,
    config: &Config,
    refresh_rx: watch::Receiver<()>,
    update_sender: mpsc::Sender<UpdateMessage>,
) -> Result<()> {
    let sources = Sources {
        flights: Arc::new(AviationStackClient::new(&config.api)?),
        weather: Arc::new(OpenWeatherClient::new(&config.api)?),
    };

    // ホストブリッジの入力はワーカー内で開く
    let bridge_source = config.bridge.path.clone().map(BridgeSource::Path);

    let pool = WorkerPool::new(
        token.clone(),
        config,
        sources,
        bridge_source,
        refresh_rx,
        update_sender,
    );

    let _ctrl_c_handle = ctrl_c_handler(token.clone());
    pool.run().await?;

    Ok(())
}

fn ctrl_c_handler(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        if ctrl_c().await.is_ok() {
            info!("Ctrl + C received, shutting down...");
            token.cancel();
        }
    })
}
