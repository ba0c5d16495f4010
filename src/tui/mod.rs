//! Full-screen terminal UI.
//!
//! The terminal plays the page: a heading that toggles the chat, the event
//! log filling the screen, and the chat panel floating above it. All state
//! lives in [`App`] on the UI task; round-trips run on spawned tasks and
//! report back over a channel.

mod app;
mod draw;
mod layout;

pub use app::{App, PANEL_MARGIN};
pub use layout::{PanelLayout, ScreenLayout};

use crate::client::{BackendReply, ChatBackend, ClientError};
use crate::config::ChatConfig;
use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, layout::Size, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const TICK: Duration = Duration::from_millis(120);

type Reply = Result<BackendReply, ClientError>;

/// Run the chat UI until the user quits.
pub async fn run(config: &ChatConfig, backend: Arc<dyn ChatBackend>) -> anyhow::Result<()> {
    let _guard = TerminalGuard::new().context("failed to configure terminal")?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(io::stdout())).context("failed to initialize terminal")?;
    terminal.clear().context("failed to clear terminal")?;

    let (width, height) = crossterm::terminal::size().context("failed to query terminal size")?;
    let mut app = App::new(config, Size { width, height });

    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel::<Reply>();
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK);
    let mut redraw = true;

    tracing::info!("Chat UI started ({}x{})", width, height);

    loop {
        if redraw {
            terminal
                .draw(|frame| draw::render(frame, &mut app))
                .context("failed to draw frame")?;
            redraw = false;
        }

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(event)) => {
                    if let Some(pending) = app.handle_event(event) {
                        dispatch(Arc::clone(&backend), pending.message, reply_tx.clone());
                    }
                    redraw = true;
                }
                Some(Err(err)) => {
                    tracing::warn!("Terminal event error: {}", err);
                    redraw = true;
                }
                None => break,
            },
            Some(reply) = reply_rx.recv() => {
                app.settle(reply);
                redraw = true;
            }
            _ = ticker.tick() => {
                if app.on_tick() {
                    redraw = true;
                }
            }
        }

        if app.should_quit() {
            break;
        }
    }

    terminal.show_cursor().ok();
    tracing::info!("Chat UI stopped");
    Ok(())
}

/// Send `message` on its own task and post the result back to the UI.
fn dispatch(backend: Arc<dyn ChatBackend>, message: String, reply_tx: mpsc::UnboundedSender<Reply>) {
    tokio::spawn(async move {
        let task = tokio::spawn(async move { backend.send(&message).await });
        let reply = match task.await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!("Chat request task failed: {}", err);
                Err(ClientError::Transport(err.to_string()))
            }
        };
        if reply_tx.send(reply).is_err() {
            tracing::debug!("UI closed before the reply arrived");
        }
    });
}

/// Raw mode, alternate screen and mouse capture for the lifetime of the UI.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> anyhow::Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let guard = Self;
        let mut stdout = io::stdout();
        stdout
            .execute(EnterAlternateScreen)
            .context("failed to enter alternate screen")?;
        stdout
            .execute(EnableMouseCapture)
            .context("failed to enable mouse capture")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut stdout = io::stdout();
        let _ = stdout.execute(DisableMouseCapture);
        let _ = stdout.execute(LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}
