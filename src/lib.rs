//! shopchat Library
//!
//! Chat client for the shopping assistant backend: a floating, draggable
//! chat panel over a live event log, driven from the terminal.
//!
//! ## Main Components
//!
//! - [`chat`] - Dispatch loop (`ChatController`), the `ChatView` contract, quick actions
//! - [`client`] - `ChatBackend` trait and the reqwest client for `POST /chat`
//! - [`config`] - Settings file and XDG directories
//! - [`messaging`] - Wire types, escaped markup, message/event logs, transcript rendering
//! - [`panel`] - Panel visibility and drag geometry
//! - [`tui`] - The ratatui front end
//!
//! ## Quick Start
//!
//! ```ignore
//! use shopchat::{ChatController, HttpChatClient, TranscriptView};
//!
//! let client = HttpChatClient::new("http://127.0.0.1:8000");
//! let mut controller = ChatController::new("Aryan", "Shopping Assistant");
//! let mut view = TranscriptView::stdout();
//! controller.submit(&mut view, &client, "List all my orders").await;
//! ```

pub mod chat;
pub mod client;
pub mod config;
pub mod messaging;
pub mod panel;
pub mod tui;

// Re-export commonly used types
pub use chat::{ChatController, ChatSurface, ChatView, QuickAction, SubmitOutcome};
pub use client::{BackendReply, ChatBackend, ClientError, HttpChatClient};
pub use config::{ChatConfig, ConfigError, XdgDirs};
pub use messaging::{ChatEvent, ChatResponse, ErrorDetail, Markup, TranscriptView};
pub use panel::{PanelGeometry, PanelState};
