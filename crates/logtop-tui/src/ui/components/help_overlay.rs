use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::ui::Layout;

/// Help overlay showing keybindings and column meanings
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame) {
        let popup_area = Layout::centered(frame.area(), 52, 17);

        // Clear the background
        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled(
                "Keybindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Self::key_line("p/Space", "Pause or resume the display"),
            Self::key_line("Ctrl+l", "Redraw now"),
            Self::key_line("?", "Toggle this help"),
            Self::key_line("q/Esc", "Quit and print the summary"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Columns",
                Style::default().fg(Color::Yellow),
            )]),
            Self::key_line("#", "Rank in the window"),
            Self::key_line("count", "Occurrences in the window"),
            Self::key_line("%", "Share of the window"),
            Self::key_line("line", "Line, control bytes shown as '.'"),
            Line::from(""),
            Line::from(Span::styled(
                "Counting continues while paused.",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let help_widget = Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(Span::styled(
                    " Help ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        );

        frame.render_widget(help_widget, popup_area);
    }

    fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("  {:>8}", key), Style::default().fg(Color::Green)),
            Span::styled(format!("  {}", desc), Style::default().fg(Color::White)),
        ])
    }
}
