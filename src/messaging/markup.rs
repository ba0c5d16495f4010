//! Escaped chat markup.
//!
//! Every piece of text that reaches the message log is wrapped in
//! [`Markup`]. The only way to skip escaping is [`Markup::trusted`], which
//! takes a `&'static str`, so server and user text can never bypass it.

use std::borrow::Cow;
use std::fmt;

/// A fragment of chat markup whose `<` and `>` are already escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup(Cow<'static, str>);

impl Markup {
    /// Escape arbitrary text.
    pub fn escape(text: &str) -> Self {
        Self(Cow::Owned(text.replace('<', "&lt;").replace('>', "&gt;")))
    }

    /// Use a fixed, compile-time string as-is.
    pub fn trusted(fragment: &'static str) -> Self {
        Self(Cow::Borrowed(fragment))
    }

    /// The escaped fragment.
    pub fn as_html(&self) -> &str {
        &self.0
    }

    /// Text as it appears on screen.
    ///
    /// Decodes the two entities produced by [`Markup::escape`] and replaces
    /// control characters (other than newline and tab) so no terminal escape
    /// sequence can be smuggled through a chat message.
    pub fn display_text(&self) -> String {
        strip_controls(&self.0.replace("&lt;", "<").replace("&gt;", ">"))
    }
}

/// Replace control characters other than newline and tab.
pub(crate) fn strip_controls(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_control() && c != '\n' && c != '\t' {
                char::REPLACEMENT_CHARACTER
            } else {
                c
            }
        })
        .collect()
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_angle_brackets() {
        let markup = Markup::escape("<script>alert(1)</script>");
        assert_eq!(markup.as_html(), "&lt;script&gt;alert(1)&lt;/script&gt;");
        assert!(!markup.as_html().contains('<'));
    }

    #[test]
    fn test_trusted_is_verbatim() {
        let markup = Markup::trusted("<b>typing</b>");
        assert_eq!(markup.as_html(), "<b>typing</b>");
    }

    #[test]
    fn test_display_text_decodes_entities() {
        let markup = Markup::escape("a < b > c");
        assert_eq!(markup.display_text(), "a < b > c");
    }

    #[test]
    fn test_display_text_strips_control_sequences() {
        let markup = Markup::escape("hi\x1b[2Jthere\nnext");
        assert_eq!(markup.display_text(), "hi\u{FFFD}[2Jthere\nnext");
    }
}
