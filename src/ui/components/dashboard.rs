use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::session::result::ChallengeSummary;
use crate::ui::theme::Theme;
use crate::vocab::WordStatus;

pub struct Dashboard<'a> {
    pub summary: &'a ChallengeSummary,
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(summary: &'a ChallengeSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let s = self.summary;

        // a clean run gets its own banner
        let title = if s.is_perfect() {
            t!("result.perfect_title")
        } else {
            t!("result.title")
        };
        let block = Block::bordered()
            .title(format!(" {title} "))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            s.grade().label(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let acc_color = if s.accuracy >= 80.0 {
            colors.success()
        } else if s.accuracy >= 60.0 {
            colors.warning()
        } else {
            colors.error()
        };
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("  {}: ", t!("result.accuracy")),
                Style::default().fg(colors.fg()),
            ),
            Span::styled(
                format!("{:.0}%", s.accuracy),
                Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "  ({})",
                    t!("result.correct_of", correct = s.correct, total = s.total)
                ),
                Style::default().fg(colors.muted()),
            ),
        ]))
        .render(layout[1], buf);

        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("  {}: ", t!("result.wrong")),
                Style::default().fg(colors.fg()),
            ),
            Span::styled(format!("{}", s.wrong), Style::default().fg(colors.error())),
            Span::styled(
                format!("   {}: ", t!("result.timed_out")),
                Style::default().fg(colors.fg()),
            ),
            Span::styled(
                format!("{}", s.timed_out),
                Style::default().fg(colors.warning()),
            ),
        ]))
        .render(layout[2], buf);

        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("  {}: ", t!("result.time")),
                Style::default().fg(colors.fg()),
            ),
            Span::styled(
                format!("{:.0}s", s.elapsed_secs),
                Style::default().fg(colors.fg()),
            ),
        ]))
        .render(layout[3], buf);

        let mut missed_lines = Vec::new();
        if !s.missed.is_empty() {
            missed_lines.push(Line::from(Span::styled(
                format!("  {}:", t!("result.missed")),
                Style::default().fg(colors.fg()),
            )));
            for word in &s.missed {
                missed_lines.push(Line::from(vec![
                    Span::styled(
                        format!("    {}", word.word),
                        Style::default().fg(colors.status(WordStatus::Unknown)),
                    ),
                    Span::styled(
                        format!("  {}", word.meaning),
                        Style::default().fg(colors.muted()),
                    ),
                ]));
            }
        }
        Paragraph::new(missed_lines)
            .wrap(Wrap { trim: false })
            .render(layout[4], buf);

        Paragraph::new(Line::from(Span::styled(
            format!("  {}", t!("result.hints")),
            Style::default().fg(colors.accent()),
        )))
        .render(layout[5], buf);
    }
}
