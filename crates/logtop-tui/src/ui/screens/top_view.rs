use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    app::AppState,
    ui::{
        components::{top_hints, HelpOverlay, StatusBar},
        Layout, Theme,
    },
};

const RANK_WIDTH: u16 = 5;
const COUNT_WIDTH: u16 = 9;
const PERCENT_WIDTH: u16 = 7;
const COLUMN_SPACING: u16 = 1;

/// Full-screen ranking of the most frequent lines
pub struct TopScreen;

impl TopScreen {
    pub fn render(frame: &mut Frame, state: &AppState) {
        let (header, content, status) = Layout::main(frame.area());

        Self::render_header(frame, header, state);
        Self::render_table(frame, content, state);
        Self::render_status_bar(frame, status, state);

        if state.help_visible {
            HelpOverlay::render(frame);
        }
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let snapshot = &state.snapshot;

        let title = Line::from(vec![
            Span::styled("logtop", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(
                format!("{}/{} in window", snapshot.window_len, snapshot.capacity),
                Theme::text(),
            ),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(format!("{} lines read", snapshot.total_fed), Theme::text()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(format!("{:.2} lines/s", state.rate()), Theme::text_highlight()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(format!("{} distinct", snapshot.distinct), Theme::text()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(state.elapsed_label(), Theme::text()),
        ]);

        let header = Paragraph::new(title).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    fn render_table(frame: &mut Frame, area: Rect, state: &AppState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border())
            .title(Span::styled(" Top lines ", Theme::title()));

        if state.snapshot.window_len == 0 {
            let waiting = Paragraph::new(Line::from(Span::styled(
                "Waiting for input...",
                Theme::text_dim(),
            )))
            .block(block);
            frame.render_widget(waiting, area);
            return;
        }

        let line_width = area
            .width
            .saturating_sub(2 + RANK_WIDTH + COUNT_WIDTH + PERCENT_WIDTH + 3 * COLUMN_SPACING)
            as usize;

        let rows = state.snapshot.rows.iter().map(|row| {
            Row::new(vec![
                Cell::from(Line::from(format!("{}", row.rank)).right_aligned()),
                Cell::from(Line::from(format!("{}", row.count)).right_aligned())
                    .style(Theme::count()),
                Cell::from(Line::from(format!("{:.1}%", row.frequency)).right_aligned()),
                Cell::from(truncate_to_width(&row.display(), line_width)),
            ])
            .style(Theme::row(row.rank))
        });

        let header = Row::new(vec![
            Cell::from(Line::from("#").right_aligned()),
            Cell::from(Line::from("count").right_aligned()),
            Cell::from(Line::from("%").right_aligned()),
            Cell::from("line"),
        ])
        .style(Theme::table_header());

        let table = Table::new(
            rows,
            [
                Constraint::Length(RANK_WIDTH),
                Constraint::Length(COUNT_WIDTH),
                Constraint::Length(PERCENT_WIDTH),
                Constraint::Min(1),
            ],
        )
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .block(block);

        frame.render_widget(table, area);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let right = format!(
            "updated {} │ every {}s",
            state.refreshed_at.format("%H:%M:%S"),
            state.interval.as_secs()
        );

        let mut bar = StatusBar::new().hints(top_hints(state.paused)).right(right);
        if state.paused {
            bar = bar.badge("PAUSED");
        }
        frame.render_widget(bar, area);
    }
}

/// Cut `text` to at most `max` display columns, marking the cut with `…`
fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}
