//! Line-oriented transcript renderer for one-shot mode.

use super::{ChatBubble, EventCategory, EventEntry, Sender, Spinner, SpinnerHandle};
use crate::chat::ChatView;
use crossterm::{
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    QueueableCommand,
};
use std::io::{self, IsTerminal, Stdout, Write};

/// Render style configuration.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub user_color: Color,
    pub agent_color: Color,
    pub system_color: Color,
    pub title_color: Color,
    /// Emit color escapes at all.
    pub color: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            user_color: Color::Cyan,
            agent_color: Color::Green,
            system_color: Color::Yellow,
            title_color: Color::DarkGrey,
            color: true,
        }
    }
}

impl RenderStyle {
    /// Style without any escape sequences.
    pub fn plain() -> Self {
        Self {
            color: false,
            ..Self::default()
        }
    }

    fn category_color(&self, category: EventCategory) -> Color {
        match category {
            EventCategory::User => self.user_color,
            EventCategory::Agent => self.agent_color,
            EventCategory::System => self.system_color,
        }
    }
}

/// Writes bubbles and event entries to a terminal stream as they arrive.
///
/// I/O failures cannot surface through [`ChatView`], so the first one is
/// kept and returned by [`TranscriptView::finish`].
pub struct TranscriptView<W: Write = Stdout> {
    out: W,
    style: RenderStyle,
    spinner: Option<Spinner>,
    typing: Option<SpinnerHandle>,
    error: Option<io::Error>,
}

impl TranscriptView<Stdout> {
    /// Render to stdout. Colors and the typing animation are used only on a
    /// terminal.
    pub fn stdout() -> Self {
        let out = io::stdout();
        if out.is_terminal() {
            Self::new(out, RenderStyle::default()).with_spinner(Spinner::new())
        } else {
            Self::new(out, RenderStyle::plain())
        }
    }
}

impl<W: Write> TranscriptView<W> {
    pub fn new(out: W, style: RenderStyle) -> Self {
        Self {
            out,
            style,
            spinner: None,
            typing: None,
            error: None,
        }
    }

    /// Animate `spinner` while waiting for a reply.
    pub fn with_spinner(mut self, spinner: Spinner) -> Self {
        self.spinner = Some(spinner);
        self
    }

    /// Flush and hand back the writer, or the first write error.
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(handle) = self.typing.as_mut() {
            handle.stop();
        }
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()?;
        Ok(self.out)
    }

    fn colored(&mut self, color: Color, text: &str) -> io::Result<()> {
        if self.style.color {
            self.out
                .queue(SetForegroundColor(color))?
                .queue(Print(text))?
                .queue(ResetColor)?;
        } else {
            self.out.queue(Print(text))?;
        }
        Ok(())
    }

    fn write_bubble(&mut self, bubble: &ChatBubble) -> io::Result<()> {
        let color = match bubble.sender {
            Sender::User => self.style.user_color,
            Sender::Agent => self.style.agent_color,
        };
        self.colored(color, &bubble.display_text())?;
        self.out.queue(Print("\n"))?;
        self.out.flush()
    }

    fn write_event(&mut self, entry: &EventEntry) -> io::Result<()> {
        if self.style.color {
            self.out.queue(SetAttribute(Attribute::Dim))?;
        }
        let title = format!("[{}] ", entry.title());
        let title_color = self.style.title_color;
        self.colored(title_color, &title)?;
        if self.style.color {
            self.out.queue(SetAttribute(Attribute::Reset))?;
        }
        let color = self.style.category_color(entry.category);
        self.colored(color, &entry.display_message())?;
        self.out.queue(Print("\n"))?;
        self.out.flush()
    }

    fn record(&mut self, result: io::Result<()>) {
        if let Err(err) = result {
            tracing::warn!("Transcript write failed: {}", err);
            self.error.get_or_insert(err);
        }
    }
}

impl<W: Write> ChatView for TranscriptView<W> {
    fn append_bubble(&mut self, bubble: ChatBubble) {
        let result = self.write_bubble(&bubble);
        self.record(result);
    }

    fn show_typing(&mut self) {
        if self.typing.is_some() {
            return;
        }
        if let Some(spinner) = &self.spinner {
            self.typing = Some(spinner.start("typing..."));
        }
    }

    fn remove_typing(&mut self) {
        if let Some(mut handle) = self.typing.take() {
            handle.stop();
        }
    }

    fn append_event(&mut self, entry: EventEntry) {
        let result = self.write_event(&entry);
        self.record(result);
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        tracing::trace!("Submit enabled: {}", enabled);
    }

    fn clear_input(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain() -> TranscriptView<Vec<u8>> {
        TranscriptView::new(Vec::new(), RenderStyle::plain())
    }

    fn output(view: TranscriptView<Vec<u8>>) -> String {
        String::from_utf8(view.finish().unwrap()).unwrap()
    }

    #[test]
    fn test_bubbles_render_decoded_text() {
        let mut view = plain();
        view.append_bubble(ChatBubble::user("hi"));
        view.append_bubble(ChatBubble::agent("<b>x</b>"));

        assert_eq!(output(view), "👤 hi\n🤖 <b>x</b>\n");
    }

    #[test]
    fn test_event_entries_include_title() {
        let mut view = plain();
        view.append_event(EventEntry::system("System", "Chat started."));
        view.append_event(EventEntry::agent("OrderAgent", "done"));

        assert_eq!(
            output(view),
            "[System - System] Chat started.\n[OrderAgent - Agent] done\n"
        );
    }

    #[test]
    fn test_typing_without_spinner_writes_nothing() {
        let mut view = plain();
        view.show_typing();
        view.remove_typing();
        view.remove_typing();
        view.set_submit_enabled(false);
        view.clear_input();

        assert_eq!(output(view), "");
    }

    #[test]
    fn test_colored_output_contains_escapes() {
        let mut view = TranscriptView::new(Vec::new(), RenderStyle::default());
        view.append_bubble(ChatBubble::agent("ok"));

        let text = output(view);
        assert!(text.contains("\u{1b}["));
        assert!(text.contains("🤖 ok"));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_first_write_error_is_reported_on_finish() {
        let mut view = TranscriptView::new(FailingWriter, RenderStyle::plain());
        view.append_bubble(ChatBubble::user("hi"));
        view.append_event(EventEntry::user("Aryan", "hi"));

        let err = view.finish().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
