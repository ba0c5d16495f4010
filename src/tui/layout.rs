//! Screen and panel regions, shared by drawing and mouse hit-testing.

use crate::chat::QuickAction;
use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

pub const SEND_LABEL: &str = "[Send]";

/// Fixed regions of the page behind the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLayout {
    pub heading: Rect,
    /// The clickable part of the heading.
    pub toggle: Rect,
    pub event_log: Rect,
}

impl ScreenLayout {
    pub fn compute(area: Rect, toggle_label: &str) -> Self {
        let heading = Rect::new(area.x, area.y, area.width, area.height.min(1));
        let toggle_width = (label_width(toggle_label) as u16).min(heading.width.saturating_sub(1));
        let toggle = Rect::new(
            heading.x.saturating_add(1),
            heading.y,
            toggle_width,
            heading.height,
        );
        let event_log = Rect::new(
            area.x,
            area.y + heading.height,
            area.width,
            area.height.saturating_sub(heading.height),
        );
        Self {
            heading,
            toggle,
            event_log,
        }
    }
}

/// Regions inside the floating chat panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelLayout {
    pub outer: Rect,
    /// Top border row; the drag handle.
    pub header: Rect,
    /// Quick-action buttons that fit on the action row, by intent tag.
    pub actions: Vec<(&'static str, Rect)>,
    pub messages: Rect,
    pub input: Rect,
    pub send: Rect,
}

impl PanelLayout {
    pub fn compute(outer: Rect) -> Self {
        let header = Rect::new(outer.x, outer.y, outer.width, outer.height.min(1));
        let inner = Rect::new(
            outer.x.saturating_add(1),
            outer.y.saturating_add(1),
            outer.width.saturating_sub(2),
            outer.height.saturating_sub(2),
        );

        let action_row = Rect::new(inner.x, inner.y, inner.width, inner.height.min(1));
        let input_row = Rect::new(
            inner.x,
            inner.bottom().saturating_sub(1).max(inner.y),
            inner.width,
            inner.height.saturating_sub(1).min(1),
        );
        let messages = Rect::new(
            inner.x,
            action_row.bottom(),
            inner.width,
            inner.height.saturating_sub(2),
        );

        let send_width = (SEND_LABEL.len() as u16).min(input_row.width);
        let send = Rect::new(
            input_row.right().saturating_sub(send_width),
            input_row.y,
            send_width,
            input_row.height,
        );
        let input = Rect::new(
            input_row.x,
            input_row.y,
            input_row.width.saturating_sub(send_width + 1),
            input_row.height,
        );

        Self {
            outer,
            header,
            actions: action_buttons(action_row),
            messages,
            input,
            send,
        }
    }
}

/// Caption as drawn on a button.
pub fn button_caption(action: QuickAction) -> String {
    format!("[{}]", action.label())
}

/// Buttons laid out left to right, one cell apart. Buttons that do not fit
/// are left off.
fn action_buttons(row: Rect) -> Vec<(&'static str, Rect)> {
    let mut buttons = Vec::new();
    if row.height == 0 {
        return buttons;
    }
    let mut x = row.x;
    for action in QuickAction::ALL {
        let width = label_width(&button_caption(action)) as u16;
        if x.saturating_add(width) > row.right() {
            break;
        }
        buttons.push((action.tag(), Rect::new(x, row.y, width, 1)));
        x = x.saturating_add(width + 1);
    }
    buttons
}

fn label_width(text: &str) -> usize {
    text.width()
}
