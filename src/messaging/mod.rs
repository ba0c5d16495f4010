//! Messaging model for shopchat.
//!
//! Everything that flows between the backend and the screen lives here:
//!
//! ```text
//!   POST /chat ──► ChatResponse ──► ChatEvent* ──┬──► MessageLog (ChatBubble)
//!                                                └──► EventLog   (EventEntry)
//! ```
//!
//! ## Key Components
//!
//! - [`ChatEvent`]: closed set of backend event kinds
//! - [`Markup`]: escaped chat text; the only unescaped path takes `&'static str`
//! - [`MessageLog`] / [`EventLog`]: append-only logs that follow their newest entry
//! - [`TranscriptView`]: prints both logs to stdout for one-shot mode
//! - [`Spinner`]: typing indicator animation

mod log;
mod markup;
mod renderer;
mod spinner;
mod types;

pub use log::{ChatBubble, EventCategory, EventEntry, EventLog, MessageLog, ScrollState, Sender};
pub use markup::Markup;
pub use renderer::{RenderStyle, TranscriptView};
pub use spinner::{frame_at, Spinner, SpinnerConfig, SpinnerHandle, SPINNER_FRAMES};
pub use types::*;
