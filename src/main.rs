use anyhow::Result;
use config::Config;
use env_logger::Env;
use log::{error, info};
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tui::models::UpdateMessage;

use crate::cli::Cli;

mod app_config;
mod bridge;
mod cli;
mod config;
mod core;
mod flight;
mod services;
mod ticker;
mod tui;

#[tokio::main]
async fn main() -> Result<()> {
    #[cfg(all(debug_assertions, feature = "tokio-console"))]
    console_subscriber::init();
    env_logger::init_from_env(Env::default().default_filter_or("error"));
    color_eyre::install().map_err(|e| {
        error!("Failed to install color_eyre: {e}");
        anyhow::anyhow!("Failed to install color_eyre")
    })?;

    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)?;
    cli.apply(&mut config);
    info!("Displaying flights for {}", config.airport);

    // UpdateMessage用のチャネルを作成
    let (update_sender, update_receiver) = mpsc::channel::<UpdateMessage>(1000);
    let token = CancellationToken::new();
    // 手動更新の通知
    let (refresh_sender, refresh_receiver) = watch::channel(());

    // データ取得タスクを起動
    let worker_token = token.clone();
    let config_for_workers = config.clone();
    let worker_handle = tokio::spawn(async move {
        if let Err(e) = core::run_display_workers(
            worker_token,
            &config_for_workers,
            refresh_receiver,
            update_sender,
        )
        .await
        {
            let err_msg = format!("Error has occurred in display workers: {e}");
            ratatui::restore();
            error!("{err_msg}");
        }
    });

    // TUIタスクを起動
    let tui_token = token.clone();
    let tui_handle = tokio::spawn(async move {
        if let Err(e) = tui::run_tui(tui_token, update_receiver, &config, refresh_sender).await {
            let err_msg = format!("Error has occurred in TUI: {e}");
            ratatui::restore();
            error!("{err_msg}");
        }
    });

    // どちらかのタスクが終了するまで待機
    tokio::select! {
        _ = worker_handle => {},
        _ = tui_handle => {},
    }
    token.cancel();

    Ok(())
}
