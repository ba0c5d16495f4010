//! In-memory chat surface shared by the TUI and the tests.

use super::{ChatView, QuickAction};
use crate::messaging::{ChatBubble, EventEntry, EventLog, MessageLog};

/// Message log, event log and the input controls of one chat panel.
#[derive(Debug, Clone)]
pub struct ChatSurface {
    pub messages: MessageLog,
    pub events: EventLog,
    pub input: String,
    pub submit_enabled: bool,
    pub input_focused: bool,
}

impl Default for ChatSurface {
    fn default() -> Self {
        Self {
            messages: MessageLog::new(),
            events: EventLog::new(),
            input: String::new(),
            submit_enabled: true,
            input_focused: false,
        }
    }
}

impl ChatSurface {
    /// Fill the input with the action's prompt and focus it.
    ///
    /// Returns `true` when the action should be submitted right away.
    pub fn apply_action(&mut self, action: QuickAction) -> bool {
        self.input = action.prompt().to_string();
        self.input_focused = true;
        action.submits_immediately()
    }

    /// Dispatch a button by its intent tag.
    ///
    /// An unrecognized tag empties and focuses the input.
    pub fn apply_tag(&mut self, tag: &str) -> bool {
        match tag.parse::<QuickAction>() {
            Ok(action) => self.apply_action(action),
            Err(err) => {
                tracing::debug!("{}", err);
                self.input.clear();
                self.input_focused = true;
                false
            }
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }
}

impl ChatView for ChatSurface {
    fn append_bubble(&mut self, bubble: ChatBubble) {
        self.messages.push(bubble);
    }

    fn show_typing(&mut self) {
        self.messages.show_typing();
    }

    fn remove_typing(&mut self) {
        self.messages.remove_typing();
    }

    fn append_event(&mut self, entry: EventEntry) {
        self.events.push(entry);
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_action_fills_and_focuses() {
        let mut surface = ChatSurface::default();
        surface.input = "leftover".to_string();

        let submit = surface.apply_action(QuickAction::Status);

        assert!(!submit);
        assert_eq!(surface.input, "What is the status of order ");
        assert!(surface.input_focused);
    }

    #[test]
    fn test_list_orders_requests_submit() {
        let mut surface = ChatSurface::default();
        assert!(surface.apply_action(QuickAction::ListOrders));
        assert_eq!(surface.input, "List all my orders");
    }

    #[test]
    fn test_apply_tag_dispatches_known_tags() {
        let mut surface = ChatSurface::default();
        assert!(!surface.apply_tag("cancel"));
        assert_eq!(surface.input, "Cancel order ");
        assert!(surface.apply_tag("list_orders"));
    }

    #[test]
    fn test_unknown_tag_clears_and_focuses() {
        let mut surface = ChatSurface::default();
        surface.input = "draft".to_string();

        assert!(!surface.apply_tag("refund"));

        assert_eq!(surface.input, "");
        assert!(surface.input_focused);
    }

    #[test]
    fn test_input_editing() {
        let mut surface = ChatSurface::default();
        surface.push_char('h');
        surface.push_char('é');
        surface.pop_char();
        assert_eq!(surface.input, "h");
        surface.clear_input();
        surface.pop_char();
        assert_eq!(surface.input, "");
    }
}
