use crossterm::event::{Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyModifiers};
use futures::{FutureExt, StreamExt};
use log::debug;
use tokio::sync::{mpsc, watch};

use crate::tui::models::Event;

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
    task: tokio::task::JoinHandle<()>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task_tx = tx.clone();
        let task = tokio::spawn(async move {
            let mut reader = EventStream::new();

            if task_tx.send(Event::Init).is_err() {
                return;
            }
            while let Some(maybe_event) = reader.next().fuse().await {
                let event = match maybe_event {
                    Ok(CrosstermEvent::Key(key)) => {
                        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
                            Event::Quit
                        } else {
                            Event::Key(key)
                        }
                    }
                    Ok(CrosstermEvent::Resize(_, _)) => Event::Render,
                    Ok(_) => continue,
                    Err(_) => Event::Error,
                };
                // 受信側がいなくなったら終了
                if task_tx.send(event).is_err() {
                    break;
                }
            }
        });
        Self { rx, tx, task }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn get_sender(&self) -> mpsc::UnboundedSender<Event> {
        self.tx.clone()
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub fn handle_key_event(key: KeyEvent, refresh: &watch::Sender<()>, event_sender: &mpsc::UnboundedSender<Event>) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Char('R') => {
            debug!("Manual refresh requested");
            refresh.send_replace(());
            let _ = event_sender.send(Event::Render);
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            let _ = event_sender.send(Event::Quit);
        }
        _ => {}
    }
}
