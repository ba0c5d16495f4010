//! Frame rendering.

use super::app::App;
use super::layout::{button_caption, PanelLayout, ScreenLayout, SEND_LABEL};
use crate::chat::QuickAction;
use crate::messaging::{frame_at, ChatBubble, EventCategory, EventEntry, ScrollState, Sender};
use crate::panel::Cursor;
use ratatui::{
    layout::{Alignment, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
    Frame,
};
use std::ops::Range;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const INPUT_PLACEHOLDER: &str = "Type your message...";

fn category_color(category: EventCategory) -> Color {
    match category {
        EventCategory::User => Color::Cyan,
        EventCategory::Agent => Color::Green,
        EventCategory::System => Color::Yellow,
    }
}

fn sender_color(sender: Sender) -> Color {
    match sender {
        Sender::User => Color::Cyan,
        Sender::Agent => Color::Green,
    }
}

/// Draw the whole screen. Scroll offsets are clamped to the content here.
pub fn render(frame: &mut Frame, app: &mut App) {
    let screen = app.screen();
    draw_heading(frame, &screen, app.toggle_label());
    draw_event_log(frame, screen.event_log, app);
    if let Some(layout) = app.panel_layout() {
        draw_panel(frame, &layout, app);
    }
}

fn draw_heading(frame: &mut Frame, screen: &ScreenLayout, label: &str) {
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(
            label.to_string(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ),
        Span::styled(
            "   F2 toggle chat  Esc quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), screen.heading);
}

fn draw_event_log(frame: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::bordered()
        .title(" Event Log ")
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = usize::from(inner.width).max(1);
    let lines: Vec<Line> = app
        .surface
        .events
        .entries()
        .iter()
        .flat_map(|entry| event_lines(entry, width))
        .collect();

    let window = visible_window(
        lines.len(),
        usize::from(inner.height),
        &mut app.surface.events.scroll,
    );
    let visible: Vec<Line> = lines[window].to_vec();
    frame.render_widget(Paragraph::new(visible), inner);
}

fn event_lines(entry: &EventEntry, width: usize) -> Vec<Line<'static>> {
    let color = category_color(entry.category);
    let mut lines = vec![Line::from(Span::styled(
        entry.title(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(
        textwrap::wrap(&entry.display_message(), width)
            .into_iter()
            .map(|part| Line::from(Span::styled(part.into_owned(), Style::default().fg(color)))),
    );
    lines
}

fn draw_panel(frame: &mut Frame, layout: &PanelLayout, app: &mut App) {
    frame.render_widget(Clear, layout.outer);

    let (grip, header_style) = match app.geometry.cursor() {
        Cursor::Grab => ("⠿", Style::default().fg(Color::Cyan)),
        Cursor::Grabbing => (
            "✥",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    };
    let block = Block::bordered()
        .title(Line::from(Span::styled(
            format!(" {} {} ", grip, app.toggle_label()),
            header_style,
        )))
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, layout.outer);

    for (tag, rect) in &layout.actions {
        let Ok(action) = tag.parse::<QuickAction>() else {
            continue;
        };
        let style = if action.submits_immediately() {
            Style::default().fg(Color::Magenta)
        } else {
            Style::default().fg(Color::Blue)
        };
        frame.render_widget(Paragraph::new(button_caption(action)).style(style), *rect);
    }

    draw_messages(frame, layout.messages, app);
    draw_input(frame, layout, app);
}

fn draw_messages(frame: &mut Frame, area: Rect, app: &mut App) {
    let width = usize::from(area.width).max(1);
    let mut lines: Vec<Line> = Vec::new();
    for bubble in app.surface.messages.bubbles() {
        lines.extend(bubble_lines(bubble, &bubble.display_text(), width));
        lines.push(Line::default());
    }
    if let Some(typing) = app.surface.messages.typing_bubble() {
        let text = format!("{} {}", frame_at(app.tick()), typing.display_text());
        lines.extend(bubble_lines(&typing, &text, width));
    }

    let window = visible_window(
        lines.len(),
        usize::from(area.height),
        &mut app.surface.messages.scroll,
    );
    let visible: Vec<Line> = lines[window].to_vec();
    frame.render_widget(Paragraph::new(visible), area);
}

fn bubble_lines(bubble: &ChatBubble, text: &str, width: usize) -> Vec<Line<'static>> {
    let style = Style::default().fg(sender_color(bubble.sender));
    let alignment = match bubble.sender {
        Sender::User => Alignment::Right,
        Sender::Agent => Alignment::Left,
    };
    textwrap::wrap(text, width)
        .into_iter()
        .map(|part| Line::from(Span::styled(part.into_owned(), style)).alignment(alignment))
        .collect()
}

fn draw_input(frame: &mut Frame, layout: &PanelLayout, app: &App) {
    let surface = &app.surface;
    let width = usize::from(layout.input.width);
    let visible = tail(&surface.input, width.saturating_sub(1));

    let field_style = Style::default().bg(Color::Black);
    let field = if surface.input.is_empty() {
        Paragraph::new(INPUT_PLACEHOLDER).style(field_style.fg(Color::DarkGray))
    } else {
        Paragraph::new(visible).style(field_style)
    };
    frame.render_widget(field, layout.input);

    let send_style = if surface.submit_enabled {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(Paragraph::new(SEND_LABEL).style(send_style), layout.send);

    if surface.input_focused && layout.input.width > 0 {
        let typed = visible.width();
        frame.set_cursor_position(Position::new(
            layout.input.x + typed as u16,
            layout.input.y,
        ));
    }
}

/// The longest end of `text` that fits in `width` terminal columns.
fn tail(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in text.char_indices().rev() {
        used += c.width().unwrap_or(0);
        if used > width {
            return &text[idx + c.len_utf8()..];
        }
    }
    text
}

/// Lines to show for `total` lines of content in `height` rows, honoring and
/// clamping `scroll`.
fn visible_window(total: usize, height: usize, scroll: &mut ScrollState) -> Range<usize> {
    scroll.clamp(total.saturating_sub(height));
    let end = total - scroll.from_bottom();
    let start = end.saturating_sub(height);
    start..end
}
