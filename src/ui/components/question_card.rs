use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;

use crate::quiz::Question;
use crate::session::challenge::Outcome;
use crate::ui::theme::Theme;

const OPTION_KEYS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn option_key(idx: usize) -> char {
    OPTION_KEYS.get(idx).copied().unwrap_or('?')
}

/// Option index for a pressed key: `a`-`d` or `1`-`4`.
pub fn option_index(ch: char) -> Option<usize> {
    match ch.to_ascii_lowercase() {
        c @ 'a'..='d' => Some(c as usize - 'a' as usize),
        c @ '1'..='4' => Some(c as usize - '1' as usize),
        _ => None,
    }
}

/// A challenge question and its options. Once answered, the correct option
/// is shown in green and a wrong pick in red.
pub struct QuestionCard<'a> {
    question: &'a Question,
    selected: Option<usize>,
    outcome: Option<Outcome>,
    theme: &'a Theme,
}

impl<'a> QuestionCard<'a> {
    pub fn new(question: &'a Question, theme: &'a Theme) -> Self {
        Self {
            question,
            selected: None,
            outcome: None,
            theme,
        }
    }

    pub fn answered(mut self, selected: Option<usize>, outcome: Outcome) -> Self {
        self.selected = selected;
        self.outcome = Some(outcome);
        self
    }
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.question.kind.label()))
            .border_style(Style::default().fg(colors.border_focused()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", self.question.question),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        let correct = self.question.correct_index();
        for (i, option) in self.question.options.iter().enumerate() {
            let mut style = Style::default().fg(colors.fg());
            if self.outcome.is_some() {
                if Some(i) == correct {
                    style = Style::default()
                        .fg(colors.success())
                        .add_modifier(Modifier::BOLD);
                } else if Some(i) == self.selected {
                    style = Style::default()
                        .fg(colors.error())
                        .add_modifier(Modifier::CROSSED_OUT);
                } else {
                    style = Style::default().fg(colors.muted());
                }
            }
            lines.push(Line::from(Span::styled(
                format!("   [{}] {option}", option_key(i)),
                style,
            )));
        }

        if let Some(outcome) = self.outcome {
            let (text, color) = match outcome {
                Outcome::Correct => (t!("quiz.correct"), colors.success()),
                Outcome::Wrong => (
                    t!("quiz.wrong", answer = self.question.correct_answer),
                    colors.error(),
                ),
                Outcome::TimeUp => (
                    t!("quiz.time_up", answer = self.question.correct_answer),
                    colors.warning(),
                ),
            };
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("  {text}"),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )));
            if let Some(example) = &self.question.word.example {
                lines.push(Line::from(Span::styled(
                    format!("  {example}"),
                    Style::default().fg(colors.muted()),
                )));
            }
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_keys_map_both_ways() {
        assert_eq!(option_index('a'), Some(0));
        assert_eq!(option_index('D'), Some(3));
        assert_eq!(option_index('3'), Some(2));
        assert_eq!(option_index('e'), None);
        assert_eq!(option_key(1), 'B');
    }
}
