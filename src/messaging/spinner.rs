//! Animated typing indicator.
//!
//! The TUI draws [`frame_at`] on each tick; the one-shot transcript mode
//! runs a [`Spinner`] on its own task while the request is in flight.

use crossterm::{
    cursor::{Hide, MoveToColumn, Show},
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
    ExecutableCommand,
};
use std::io::{stdout, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Spinner animation frames.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Frame for a given tick count.
pub fn frame_at(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Spinner configuration.
#[derive(Clone)]
pub struct SpinnerConfig {
    /// Animation frames.
    pub frames: Vec<&'static str>,
    /// Frame duration in milliseconds.
    pub interval_ms: u64,
    /// Spinner color.
    pub color: Color,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            frames: SPINNER_FRAMES.to_vec(),
            interval_ms: 80,
            color: Color::Cyan,
        }
    }
}

/// Shared between the handle and the animation task. A frame is only drawn
/// while holding the lock and only if `stopped` is still false.
#[derive(Debug, Default)]
struct SpinnerState {
    stopped: bool,
    frames_drawn: usize,
}

fn lock(state: &Mutex<SpinnerState>) -> MutexGuard<'_, SpinnerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A running spinner. Dropping it stops the animation.
pub struct SpinnerHandle {
    state: Arc<Mutex<SpinnerState>>,
    stop_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SpinnerHandle {
    /// Stop the spinner and clear its line.
    ///
    /// No frame is drawn once this returns, so the caller may write to the
    /// line straight away.
    pub fn stop(&mut self) {
        let mut state = lock(&self.state);
        if state.stopped {
            return;
        }
        state.stopped = true;
        let mut stdout = stdout();
        let _ = stdout.execute(MoveToColumn(0));
        let _ = stdout.execute(Clear(ClearType::CurrentLine));
        let _ = stdout.execute(Show);
        drop(state);
        let _ = self.stop_tx.send(true);
    }

    /// Stop the spinner and wait for its task to exit.
    pub async fn stop_and_wait(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    #[cfg(test)]
    fn frames_drawn(&self) -> usize {
        lock(&self.state).frames_drawn
    }
}

impl Drop for SpinnerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spinner for showing activity.
pub struct Spinner {
    config: SpinnerConfig,
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            config: SpinnerConfig::default(),
        }
    }

    pub fn with_config(config: SpinnerConfig) -> Self {
        Self { config }
    }

    /// Start animating `message` on the current line.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, message: impl Into<String>) -> SpinnerHandle {
        let config = self.config.clone();
        let message = message.into();
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let state = Arc::new(Mutex::new(SpinnerState::default()));
        let shared = Arc::clone(&state);

        let task = tokio::spawn(async move {
            let mut frame_idx = 0;
            let mut stdout = stdout();

            loop {
                {
                    let mut state = lock(&shared);
                    if state.stopped {
                        break;
                    }
                    if state.frames_drawn == 0 {
                        let _ = stdout.execute(Hide);
                    }
                    let frame = config.frames[frame_idx % config.frames.len()];
                    let _ = stdout.execute(MoveToColumn(0));
                    let _ = stdout.execute(Clear(ClearType::CurrentLine));
                    let _ = stdout.execute(SetForegroundColor(config.color));
                    let _ = stdout.execute(Print(format!("{} {}", frame, message)));
                    let _ = stdout.execute(ResetColor);
                    let _ = stdout.flush();
                    state.frames_drawn += 1;
                }

                frame_idx += 1;

                tokio::select! {
                    _ = tokio::time::sleep(Duration::from_millis(config.interval_ms)) => {}
                    _ = stop_rx.changed() => { break; }
                }
            }
        });

        SpinnerHandle {
            state,
            stop_tx,
            task: Some(task),
        }
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}
