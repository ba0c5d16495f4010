//! Message log and event log models.

use super::markup::strip_controls;
use super::Markup;

/// Who a chat bubble belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Agent,
}

impl Sender {
    pub fn icon(self) -> &'static str {
        match self {
            Sender::User => "👤",
            Sender::Agent => "🤖",
        }
    }
}

/// A single entry in the message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatBubble {
    pub sender: Sender,
    pub body: Markup,
}

impl ChatBubble {
    pub fn user(text: &str) -> Self {
        Self {
            sender: Sender::User,
            body: Markup::escape(text),
        }
    }

    pub fn agent(text: &str) -> Self {
        Self {
            sender: Sender::Agent,
            body: Markup::escape(text),
        }
    }

    /// Markup for the bubble, icon included.
    pub fn html(&self) -> String {
        format!("{} {}", self.sender.icon(), self.body)
    }

    /// On-screen text for the bubble, icon included.
    pub fn display_text(&self) -> String {
        format!("{} {}", self.sender.icon(), self.body.display_text())
    }
}

/// Scroll position measured in lines from the newest content.
///
/// Appending resets it so the view follows the latest entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    from_bottom: usize,
}

impl ScrollState {
    pub fn from_bottom(&self) -> usize {
        self.from_bottom
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.from_bottom = self.from_bottom.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.from_bottom = self.from_bottom.saturating_sub(lines);
    }

    pub fn follow_latest(&mut self) {
        self.from_bottom = 0;
    }

    /// Clamp against the amount of content that can actually scroll.
    pub fn clamp(&mut self, max: usize) {
        self.from_bottom = self.from_bottom.min(max);
    }
}

/// The chat message log.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    bubbles: Vec<ChatBubble>,
    typing: bool,
    pub scroll: ScrollState,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bubble: ChatBubble) {
        self.bubbles.push(bubble);
        self.scroll.follow_latest();
    }

    pub fn bubbles(&self) -> &[ChatBubble] {
        &self.bubbles
    }

    pub fn show_typing(&mut self) {
        self.typing = true;
        self.scroll.follow_latest();
    }

    /// Remove the typing placeholder. Safe to call when it is not shown.
    pub fn remove_typing(&mut self) {
        self.typing = false;
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// The placeholder bubble shown while a reply is pending.
    pub fn typing_bubble(&self) -> Option<ChatBubble> {
        self.typing.then(|| ChatBubble {
            sender: Sender::Agent,
            body: Markup::trusted("typing..."),
        })
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }
}

/// Category of an event log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    User,
    Agent,
    System,
}

impl EventCategory {
    /// Capitalized label used in entry titles.
    pub fn label(self) -> &'static str {
        match self {
            EventCategory::User => "User",
            EventCategory::Agent => "Agent",
            EventCategory::System => "System",
        }
    }
}

/// One entry in the event log. The message is always plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEntry {
    pub category: EventCategory,
    pub author: String,
    pub message: String,
}

impl EventEntry {
    pub fn new(category: EventCategory, author: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category,
            author: author.into(),
            message: message.into(),
        }
    }

    pub fn user(author: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(EventCategory::User, author, message)
    }

    pub fn agent(author: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(EventCategory::Agent, author, message)
    }

    pub fn system(author: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(EventCategory::System, author, message)
    }

    /// `"{author} - {Category}"`.
    pub fn title(&self) -> String {
        strip_controls(&format!("{} - {}", self.author, self.category.label()))
    }

    /// The message with terminal control characters neutralized.
    pub fn display_message(&self) -> String {
        strip_controls(&self.message)
    }
}

/// The structured event log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Vec<EventEntry>,
    pub scroll: ScrollState,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: EventEntry) {
        self.entries.push(entry);
        self.scroll.follow_latest();
    }

    pub fn entries(&self) -> &[EventEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bubble_html_escapes_body() {
        let bubble = ChatBubble::agent("<img src=x>");
        assert_eq!(bubble.html(), "🤖 &lt;img src=x&gt;");
        assert_eq!(bubble.display_text(), "🤖 <img src=x>");
    }

    #[test]
    fn test_user_bubble_icon() {
        assert!(ChatBubble::user("hi").html().starts_with("👤 "));
    }

    #[test]
    fn test_push_follows_latest() {
        let mut log = MessageLog::new();
        log.scroll.scroll_up(5);
        log.push(ChatBubble::user("hello"));
        assert_eq!(log.scroll.from_bottom(), 0);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_typing_removal_is_idempotent() {
        let mut log = MessageLog::new();
        log.show_typing();
        assert!(log.is_typing());
        assert_eq!(
            log.typing_bubble().map(|b| b.display_text()),
            Some("🤖 typing...".to_string())
        );
        log.remove_typing();
        log.remove_typing();
        assert!(!log.is_typing());
        assert!(log.typing_bubble().is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn test_event_title_capitalizes_category() {
        assert_eq!(EventEntry::user("Aryan", "x").title(), "Aryan - User");
        assert_eq!(EventEntry::agent("Bot", "x").title(), "Bot - Agent");
        assert_eq!(EventEntry::system("Error", "x").title(), "Error - System");
    }

    #[test]
    fn test_event_message_neutralizes_escapes() {
        let entry = EventEntry::agent("Bot\u{1b}[2J", "done\u{1b}[31m\nnext");
        assert_eq!(entry.display_message(), "done\u{fffd}[31m\nnext");
        assert_eq!(entry.title(), "Bot\u{fffd}[2J - Agent");
    }

    #[test]
    fn test_scroll_state_clamps() {
        let mut scroll = ScrollState::default();
        scroll.scroll_up(10);
        scroll.clamp(3);
        assert_eq!(scroll.from_bottom(), 3);
        scroll.scroll_down(10);
        assert_eq!(scroll.from_bottom(), 0);
    }

    #[test]
    fn test_event_log_push_follows_latest() {
        let mut log = EventLog::new();
        log.scroll.scroll_up(2);
        log.push(EventEntry::system("System", "Chat started."));
        assert_eq!(log.scroll.from_bottom(), 0);
        assert_eq!(log.entries()[0].message, "Chat started.");
    }
}
