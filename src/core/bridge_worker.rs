use std::path::{Path, PathBuf};

use log::{debug, info};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;

use super::{WorkerError, send_update};
use crate::app_config::AppConfig;
use crate::bridge::HostMessage;
use crate::tui::models::UpdateMessage;

/// ホストからのメッセージ入力
pub type BridgeReader = Box<dyn AsyncBufRead + Send + Unpin>;

/// メッセージの入力元
pub enum BridgeSource {
    /// ファイルまたは名前付きパイプ
    Path(PathBuf),
    Reader(BridgeReader),
}

/// 入力元のパスを開く
/// 名前付きパイプは読み書き両用で開くため、書き込み側がいなくてもブロックせず
/// 書き込み側が切断してもEOFにならない
async fn open_bridge(path: &Path) -> Result<BridgeReader, std::io::Error> {
    #[cfg(target_os = "linux")]
    {
        use std::os::unix::fs::FileTypeExt;
        use tokio::net::unix::pipe;

        if tokio::fs::metadata(path).await?.file_type().is_fifo() {
            let receiver = pipe::OpenOptions::new()
                .read_write(true)
                .open_receiver(path)?;
            return Ok(Box::new(BufReader::new(receiver)));
        }
    }

    let file = tokio::fs::File::open(path).await?;
    Ok(Box::new(BufReader::new(file)))
}

/// ホストからのメッセージを受け取り、設定を管理する
pub struct BridgeWorker {
    token: CancellationToken,

    /// 現在の設定(このワーカーだけが書き換える)
    config: AppConfig,

    /// 設定のスナップショット配信
    config_tx: watch::Sender<AppConfig>,

    /// メッセージ入力元(設定されていない場合はNone)
    source: Option<BridgeSource>,

    /// UpdateMessage送信用チャネル
    update_tx: mpsc::Sender<UpdateMessage>,
}

impl BridgeWorker {
    pub fn new(
        token: CancellationToken,
        config: AppConfig,
        config_tx: watch::Sender<AppConfig>,
        source: Option<BridgeSource>,
        update_tx: mpsc::Sender<UpdateMessage>,
    ) -> Self {
        Self {
            token,
            config,
            config_tx,
            source,
            update_tx,
        }
    }

    pub async fn run(mut self) -> Result<(), WorkerError> {
        info!("Starting Bridge Worker");

        let reader = match self.source.take() {
            Some(BridgeSource::Path(path)) => {
                info!("Reading host messages from {}", path.display());
                tokio::select! {
                    biased;
                    _ = self.token.cancelled() => None,
                    reader = open_bridge(&path) => Some(reader?),
                }
            }
            Some(BridgeSource::Reader(reader)) => Some(reader),
            None => None,
        };

        if let Some(reader) = reader {
            let mut lines = reader.lines();
            loop {
                let line = tokio::select! {
                    biased;
                    _ = self.token.cancelled() => break,
                    line = lines.next_line() => line?,
                };
                let Some(line) = line else {
                    debug!("Host message stream closed");
                    break;
                };
                self.handle_line(&line).await?;
            }
        }

        // 入力が終わっても設定の配信はキャンセルまで維持する
        self.token.cancelled().await;
        info!("Bridge Worker is stopping");
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) -> Result<(), WorkerError> {
        let Some(message) = HostMessage::parse_line(line) else {
            return Ok(());
        };
        if !message.apply(&mut self.config) {
            return Ok(());
        }

        debug!("Configuration updated by host");
        self.config_tx.send_replace(self.config.clone());
        send_update(
            &self.token,
            &self.update_tx,
            UpdateMessage::Config(self.config.clone()),
        )
        .await
    }
}
