//! TUI application state and input handling.

use super::layout::{PanelLayout, ScreenLayout};
use crate::chat::{ChatController, ChatSurface, PendingRequest, SubmitOutcome};
use crate::client::{BackendReply, ClientError};
use crate::config::ChatConfig;
use crate::panel::{ClickTarget, PanelGeometry, PanelState};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect, Size};

/// Distance of the panel from the bottom-right corner on load.
pub const PANEL_MARGIN: u16 = 2;

const PAGE_LINES: usize = 5;
const WHEEL_LINES: usize = 3;

/// The whole interactive state, owned by the UI task.
pub struct App {
    pub surface: ChatSurface,
    controller: ChatController,
    pub panel: PanelState,
    pub geometry: PanelGeometry,
    viewport: Size,
    toggle_label: String,
    tick: usize,
    should_quit: bool,
}

impl App {
    pub fn new(config: &ChatConfig, viewport: Size) -> Self {
        let mut surface = ChatSurface::default();
        let controller = ChatController::from_config(config);
        controller.start(&mut surface);

        Self {
            surface,
            controller,
            panel: PanelState::on_load(),
            geometry: PanelGeometry::new(
                Size {
                    width: config.panel_width,
                    height: config.panel_height,
                },
                PANEL_MARGIN,
            ),
            viewport,
            toggle_label: format!("Chat with {}", config.assistant_name),
            tick: 0,
            should_quit: false,
        }
    }

    pub fn toggle_label(&self) -> &str {
        &self.toggle_label
    }

    pub fn tick(&self) -> usize {
        self.tick
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn is_busy(&self) -> bool {
        self.controller.is_busy()
    }

    pub fn screen(&self) -> ScreenLayout {
        ScreenLayout::compute(
            Rect::new(0, 0, self.viewport.width, self.viewport.height),
            &self.toggle_label,
        )
    }

    /// Panel regions, or `None` while the panel is hidden.
    pub fn panel_layout(&self) -> Option<PanelLayout> {
        self.panel
            .chat
            .is_shown()
            .then(|| PanelLayout::compute(self.geometry.rendered_rect(self.viewport)))
    }

    /// Advance the animation. Returns `true` when a redraw is needed.
    pub fn on_tick(&mut self) -> bool {
        self.tick = self.tick.wrapping_add(1);
        self.surface.messages.is_typing()
    }

    /// Apply a terminal event. Returns a request to send, if one was accepted.
    pub fn handle_event(&mut self, event: Event) -> Option<PendingRequest> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                self.viewport = Size { width, height };
                None
            }
            _ => None,
        }
    }

    /// Render a finished round-trip.
    pub fn settle(&mut self, reply: Result<BackendReply, ClientError>) -> SubmitOutcome {
        let outcome = self.controller.settle(&mut self.surface, reply);
        if outcome.is_error() {
            tracing::warn!("Chat request failed: {:?}", outcome);
        }
        outcome
    }

    fn toggle(&mut self) {
        self.panel.toggle();
        let shown = self.panel.chat.is_shown();
        self.surface.input_focused = shown;
        if !shown {
            self.geometry.release();
        }
        tracing::debug!("Chat panel toggled, shown: {}", shown);
    }

    fn submit(&mut self) -> Option<PendingRequest> {
        let input = self.surface.input.clone();
        self.controller.begin_submit(&mut self.surface, &input)
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<PendingRequest> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
                return None;
            }
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return None;
            }
            KeyCode::F(2) => {
                self.toggle();
                return None;
            }
            KeyCode::Char('t') if ctrl => {
                self.toggle();
                return None;
            }
            _ => {}
        }

        if !self.panel.chat.is_shown() {
            match key.code {
                KeyCode::PageUp => self.surface.events.scroll.scroll_up(PAGE_LINES),
                KeyCode::PageDown => self.surface.events.scroll.scroll_down(PAGE_LINES),
                _ => {}
            }
            return None;
        }

        match key.code {
            KeyCode::Enter => return self.submit(),
            KeyCode::Backspace => self.surface.pop_char(),
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.surface.input_focused = true;
                self.surface.push_char(c);
            }
            KeyCode::PageUp => self.surface.messages.scroll.scroll_up(PAGE_LINES),
            KeyCode::PageDown => self.surface.messages.scroll.scroll_down(PAGE_LINES),
            _ => {}
        }
        None
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Option<PendingRequest> {
        let pos = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.press(pos),
            MouseEventKind::Drag(MouseButton::Left) => {
                self.geometry.drag_to(pos, self.viewport);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if self.geometry.release() {
                    tracing::trace!("Drag ended at {:?}", pos);
                }
                None
            }
            MouseEventKind::ScrollUp => {
                self.scroll_at(pos, true);
                None
            }
            MouseEventKind::ScrollDown => {
                self.scroll_at(pos, false);
                None
            }
            _ => None,
        }
    }

    fn press(&mut self, pos: Position) -> Option<PendingRequest> {
        // The panel is drawn above the heading, so it wins any overlap.
        let layout = self
            .panel_layout()
            .filter(|layout| layout.outer.contains(pos));
        let target = if layout.is_some() {
            ClickTarget::Panel
        } else if self.screen().toggle.contains(pos) {
            ClickTarget::Toggle
        } else {
            ClickTarget::Elsewhere
        };
        if self.panel.click_outside(target) {
            self.surface.input_focused = false;
            tracing::debug!("Chat panel dismissed by outside click");
            return None;
        }
        let Some(layout) = layout else {
            if target == ClickTarget::Toggle {
                self.toggle();
            }
            return None;
        };

        if layout.header.contains(pos) {
            self.geometry.press_header(pos, self.viewport);
            return None;
        }
        if let Some((tag, _)) = layout.actions.iter().find(|(_, rect)| rect.contains(pos)) {
            if self.surface.apply_tag(tag) {
                return self.submit();
            }
            return None;
        }
        if layout.send.contains(pos) {
            return self.submit();
        }
        self.surface.input_focused = layout.input.contains(pos);
        None
    }

    fn scroll_at(&mut self, pos: Position, up: bool) {
        let in_messages = self
            .panel_layout()
            .is_some_and(|layout| layout.messages.contains(pos));
        let in_events = !in_messages && self.screen().event_log.contains(pos);

        let scroll = if in_messages {
            &mut self.surface.messages.scroll
        } else if in_events {
            &mut self.surface.events.scroll
        } else {
            return;
        };
        if up {
            scroll.scroll_up(WHEEL_LINES);
        } else {
            scroll.scroll_down(WHEEL_LINES);
        }
    }
}
