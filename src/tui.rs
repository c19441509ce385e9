use color_eyre::Result;
use events::{EventHandler, handle_key_event};
use models::{AppState, Event, UpdateMessage};
use ratatui::DefaultTerminal;
use renderer::render;
use tokio::sync::{mpsc, watch};
use tokio::time::{Interval, MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use crate::config::Config;

pub(crate) mod badges;
pub(crate) mod components;
pub(crate) mod events;
pub(crate) mod models;
pub(crate) mod renderer;
pub(crate) mod styles;

pub(crate) async fn run_tui(
    token: CancellationToken,
    update_receiver: mpsc::Receiver<UpdateMessage>,
    config: &Config,
    refresh: watch::Sender<()>,
) -> Result<()> {
    let terminal = ratatui::init();
    let result = run(token, terminal, update_receiver, config, refresh).await;
    ratatui::restore();
    result
}

/// ティッカーのフレーム用タイマー
fn frame_timer(app_state: &AppState) -> Interval {
    let mut timer = interval(app_state.ticker.frame_period());
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}

async fn run(
    token: CancellationToken,
    mut terminal: DefaultTerminal,
    mut update_receiver: mpsc::Receiver<UpdateMessage>,
    config: &Config,
    refresh: watch::Sender<()>,
) -> Result<()> {
    let mut events = EventHandler::new();
    let event_sender = events.get_sender();
    let mut app_state = AppState::new(config);
    let mut frames = frame_timer(&app_state);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            Some(event) = events.next() => {
                match event {
                    Event::Quit => {
                        token.cancel();
                        break;
                    },
                    Event::Init | Event::Render => {
                        terminal.draw(|frame| render(frame, &mut app_state))?;
                    },
                    Event::Key(key) => handle_key_event(key, &refresh, &event_sender),
                    Event::Error => {}
                }
            }
            _ = frames.tick() => {
                let columns = terminal.size()?.width;
                app_state.advance_ticker(columns);
                terminal.draw(|frame| render(frame, &mut app_state))?;
            }
            Some(update_message) = update_receiver.recv() => {
                let period = app_state.ticker.frame_period();
                app_state.apply_update(update_message);
                // フレームレートが変わった場合はタイマーを作り直す
                if app_state.ticker.frame_period() != period {
                    frames = frame_timer(&app_state);
                }
                terminal.draw(|frame| render(frame, &mut app_state))?;
            }
        }
    }
    Ok(())
}
