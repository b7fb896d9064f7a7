use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::ui::Theme;

/// Status bar showing keyboard shortcuts and window statistics
pub struct StatusBar<'a> {
    hints: Vec<(&'a str, &'a str)>,
    badge: Option<&'a str>,
    right_text: Option<String>,
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self {
            hints: Vec::new(),
            badge: None,
            right_text: None,
        }
    }

    /// Add keyboard hints as (key, description) pairs
    pub fn hints<I>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.hints = hints.into_iter().collect();
        self
    }

    /// Highlighted marker shown before the hints
    pub fn badge(mut self, badge: &'a str) -> Self {
        self.badge = Some(badge);
        self
    }

    /// Set text to display on the right side
    pub fn right<S: Into<String>>(mut self, text: S) -> Self {
        self.right_text = Some(text.into());
        self
    }
}

impl Default for StatusBar<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        buf.set_style(area, Theme::status_bar());

        let mut spans = Vec::new();
        if let Some(badge) = self.badge {
            spans.push(Span::styled(format!(" {} ", badge), Theme::paused()));
            spans.push(Span::styled(" ", Theme::status_bar()));
        }
        for (i, (key, desc)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", Theme::status_bar()));
            }
            spans.push(Span::styled(format!("[{}]", key), Theme::status_bar_key()));
            spans.push(Span::styled(format!(" {}", desc), Theme::status_bar()));
        }

        let line = Line::from(spans);
        let line_width = line.width() as u16;

        // Render hints on the left
        buf.set_line(area.x + 1, area.y, &line, area.width.saturating_sub(2));

        // Render right text if it does not overlap the hints
        if let Some(right) = self.right_text {
            let right_width = right.width() as u16;
            let right_span = Span::styled(&right, Theme::status_bar());
            let right_x = area.x + area.width.saturating_sub(right_width + 1);
            if right_x > area.x + line_width + 2 {
                buf.set_span(right_x, area.y, &right_span, right_width);
            }
        }
    }
}

/// Hints for the top view
pub fn top_hints(paused: bool) -> Vec<(&'static str, &'static str)> {
    vec![
        ("q", "Quit"),
        ("p", if paused { "Resume" } else { "Pause" }),
        ("?", "Help"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_renders_hints_and_right_text() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new()
            .hints(top_hints(false))
            .right("10/100")
            .render(area, &mut buf);

        let text = row_text(&buf, 0);
        assert!(text.contains("[q] Quit"));
        assert!(text.contains("[p] Pause"));
        assert!(text.trim_end().ends_with("10/100"));
    }

    #[test]
    fn test_right_text_dropped_when_too_narrow() {
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new()
            .hints(top_hints(true))
            .right("window 10/100")
            .render(area, &mut buf);

        assert!(!row_text(&buf, 0).contains("window"));
    }
}
