//! Show/hide state of the chat panel and the event log.

/// Whether a panel is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Shown,
}

impl Visibility {
    pub fn flipped(self) -> Self {
        match self {
            Visibility::Hidden => Visibility::Shown,
            Visibility::Shown => Visibility::Hidden,
        }
    }

    pub fn is_shown(self) -> bool {
        self == Visibility::Shown
    }
}

/// What a click landed on, as far as dismissal is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Inside the chat panel.
    Panel,
    /// The heading toggle control.
    Toggle,
    /// Anywhere else.
    Elsewhere,
}

/// Visibility of the chat panel and the event log.
///
/// Opening or closing the chat panel always forces the event log visible;
/// the event log has no toggle of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelState {
    pub chat: Visibility,
    pub event_log: Visibility,
}

impl PanelState {
    /// State at startup: chat hidden, event log shown.
    pub fn on_load() -> Self {
        Self {
            chat: Visibility::Hidden,
            event_log: Visibility::Shown,
        }
    }

    /// Flip the chat panel.
    pub fn toggle(&mut self) {
        self.chat = self.chat.flipped();
        self.event_log = Visibility::Shown;
        tracing::debug!("Chat panel {:?}", self.chat);
    }

    /// Dismiss the chat panel on a click outside it.
    ///
    /// Returns `true` if the panel was hidden.
    pub fn click_outside(&mut self, target: ClickTarget) -> bool {
        if self.chat.is_shown() && target == ClickTarget::Elsewhere {
            self.chat = Visibility::Hidden;
            return true;
        }
        false
    }
}

impl Default for PanelState {
    fn default() -> Self {
        Self::on_load()
    }
}
