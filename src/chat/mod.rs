//! Chat dispatch loop.
//!
//! A submission is split in two halves around the network round-trip:
//!
//! 1. [`ChatController::begin_submit`] validates the input, echoes it to both
//!    logs, disables submit and shows the typing placeholder.
//! 2. [`ChatController::settle`] renders whatever came back and always
//!    returns the view to an interactive state.
//!
//! The TUI spawns the request between the two so the UI task keeps running;
//! [`ChatController::submit`] awaits it inline for one-shot use and tests.

mod actions;
mod surface;

pub use actions::{QuickAction, UnknownAction};
pub use surface::ChatSurface;

use crate::client::{BackendReply, ChatBackend, ClientError};
use crate::config::ChatConfig;
use crate::messaging::{ChatBubble, ChatEvent, ErrorDetail, EventEntry};

/// Display surface the dispatch loop writes to.
pub trait ChatView {
    fn append_bubble(&mut self, bubble: ChatBubble);
    fn show_typing(&mut self);
    /// Must tolerate being called when no placeholder is shown.
    fn remove_typing(&mut self);
    fn append_event(&mut self, entry: EventEntry);
    fn set_submit_enabled(&mut self, enabled: bool);
    fn clear_input(&mut self);
}

/// A message accepted for sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub message: String,
}

/// How a round-trip ended, after rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend answered; `events` is the number received.
    Rendered { events: usize },
    /// The backend answered with a non-success status.
    ServerError(ErrorDetail),
    /// No answer could be obtained.
    ClientError(String),
}

impl SubmitOutcome {
    pub fn is_error(&self) -> bool {
        !matches!(self, SubmitOutcome::Rendered { .. })
    }
}

/// Owns the submit-in-flight flag and the names used for attribution.
pub struct ChatController {
    user_name: String,
    assistant_name: String,
    in_flight: bool,
}

impl ChatController {
    pub fn new(user_name: impl Into<String>, assistant_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            assistant_name: assistant_name.into(),
            in_flight: false,
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(&config.user_name, &config.assistant_name)
    }

    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    /// Log the session start entry.
    pub fn start<V: ChatView + ?Sized>(&self, view: &mut V) {
        view.append_event(EventEntry::system("System", "Chat started."));
    }

    /// Whether a request is currently in flight (submit disabled).
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Accept `input` for sending.
    ///
    /// Returns `None` without touching the view when the trimmed input is
    /// empty or a request is already in flight.
    pub fn begin_submit<V: ChatView + ?Sized>(
        &mut self,
        view: &mut V,
        input: &str,
    ) -> Option<PendingRequest> {
        let message = input.trim();
        if message.is_empty() {
            return None;
        }
        if self.in_flight {
            tracing::debug!("Ignoring submit while a request is in flight");
            return None;
        }

        view.append_bubble(ChatBubble::user(message));
        view.append_event(EventEntry::user(
            &self.user_name,
            format!("--- Received message: {} ---", message),
        ));
        view.clear_input();
        self.in_flight = true;
        view.set_submit_enabled(false);
        view.show_typing();

        tracing::debug!("Submitting chat message ({} chars)", message.len());
        Some(PendingRequest {
            message: message.to_string(),
        })
    }

    /// Render the result of a round-trip and re-enable submit.
    pub fn settle<V: ChatView + ?Sized>(
        &mut self,
        view: &mut V,
        outcome: Result<BackendReply, ClientError>,
    ) -> SubmitOutcome {
        view.remove_typing();

        let result = match outcome {
            Ok(BackendReply::Success(response)) => {
                let events = response.events();
                let count = events.len();
                self.fan_out(view, events);
                SubmitOutcome::Rendered { events: count }
            }
            Ok(BackendReply::Failure {
                status,
                reason,
                body,
            }) => {
                let detail = ErrorDetail::from_failure(status, &reason, body.as_ref());
                tracing::warn!("Chat request failed with status {}: {}", status, detail);
                let text = format!("Error processing your request: {}", detail);
                self.report_failure(view, &text, "");
                SubmitOutcome::ServerError(detail)
            }
            Err(err) => {
                tracing::error!("Chat request failed: {}", err);
                let text = format!("An unexpected error occurred: {}", err);
                self.report_failure(view, &text, " ---");
                SubmitOutcome::ClientError(err.to_string())
            }
        };

        self.in_flight = false;
        view.set_submit_enabled(true);
        view.remove_typing();
        result
    }

    /// Run a full submission, awaiting the backend inline.
    ///
    /// Returns `None` when the input was rejected.
    pub async fn submit<V, B>(&mut self, view: &mut V, backend: &B, input: &str) -> Option<SubmitOutcome>
    where
        V: ChatView + ?Sized,
        B: ChatBackend + ?Sized,
    {
        let pending = self.begin_submit(view, input)?;
        let outcome = backend.send(&pending.message).await;
        Some(self.settle(view, outcome))
    }

    fn fan_out<V: ChatView + ?Sized>(&self, view: &mut V, events: Vec<ChatEvent>) {
        for event in events {
            match event {
                ChatEvent::FinalResponse { text, agent_name } => {
                    let author = agent_name
                        .filter(|name| !name.is_empty())
                        .unwrap_or_else(|| self.assistant_name.clone());
                    view.append_bubble(ChatBubble::agent(&text));
                    view.append_event(EventEntry::agent(
                        &author,
                        format!(
                            "---> Captured final response text event from {}: {} ---",
                            author, text
                        ),
                    ));
                }
                ChatEvent::AgentTransfer { from, to } => {
                    view.append_event(EventEntry::system(
                        "System",
                        format!("Transferring from {} to {}", from, to),
                    ));
                }
                ChatEvent::Error { message, .. } => {
                    view.append_bubble(ChatBubble::agent(&format!("Error: {}", message)));
                    view.append_event(EventEntry::system("Error", message));
                }
                ChatEvent::IntermediateMessage { author, text } => {
                    tracing::debug!("Intermediate message from {}: {}", author, text);
                    view.append_event(EventEntry::agent(author, text));
                }
                ChatEvent::Unknown => {
                    tracing::debug!("Ignoring unrecognized chat event");
                }
            }
        }
    }

    fn report_failure<V: ChatView + ?Sized>(&self, view: &mut V, text: &str, trailer: &str) {
        view.append_bubble(ChatBubble::agent(text));
        view.append_event(EventEntry::agent(
            &self.assistant_name,
            format!(
                "---> Captured final response text event from {}: {}{}",
                self.assistant_name, text, trailer
            ),
        ));
    }
}
