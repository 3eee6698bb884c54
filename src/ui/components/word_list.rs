use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::ui::theme::Theme;
use crate::vocab::{Word, WordStatus};

pub fn status_marker(status: WordStatus) -> &'static str {
    match status {
        WordStatus::Known => "✓",
        WordStatus::Unknown => "?",
        WordStatus::Unmarked => " ",
    }
}

/// First row to draw so that `selected` stays on screen.
pub fn scroll_offset(selected: usize, visible_rows: usize) -> usize {
    if visible_rows == 0 {
        0
    } else {
        selected.saturating_sub(visible_rows - 1)
    }
}

pub struct WordList<'a> {
    title: String,
    words: &'a [&'a Word],
    selected: usize,
    show_meaning: bool,
    theme: &'a Theme,
}

impl<'a> WordList<'a> {
    pub fn new(title: String, words: &'a [&'a Word], selected: usize, theme: &'a Theme) -> Self {
        Self {
            title,
            words,
            selected,
            show_meaning: true,
            theme,
        }
    }

    pub fn hide_meaning(mut self, hide: bool) -> Self {
        self.show_meaning = !hide;
        self
    }
}

impl Widget for WordList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if self.words.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                format!("  {}", t!("word_list.empty")),
                Style::default().fg(colors.muted()),
            )))
            .render(inner, buf);
            return;
        }

        let rows = inner.height as usize;
        let offset = scroll_offset(self.selected, rows);
        let word_width = self
            .words
            .iter()
            .map(|w| w.word.chars().count())
            .max()
            .unwrap_or(0)
            .min(24);

        let lines: Vec<Line> = self
            .words
            .iter()
            .enumerate()
            .skip(offset)
            .take(rows)
            .map(|(i, word)| {
                let is_selected = i == self.selected;
                let mut word_style = Style::default().fg(colors.status(word.status));
                if is_selected {
                    word_style = word_style.bg(colors.accent_dim()).add_modifier(Modifier::BOLD);
                }
                let meaning = if self.show_meaning {
                    word.meaning.as_str()
                } else {
                    ""
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {} ", status_marker(word.status)),
                        Style::default().fg(colors.status(word.status)),
                    ),
                    Span::styled(format!("{:<word_width$}", word.word), word_style),
                    Span::styled(format!("  {meaning}"), Style::default().fg(colors.muted())),
                ])
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_keeps_selection_visible() {
        assert_eq!(scroll_offset(0, 10), 0);
        assert_eq!(scroll_offset(9, 10), 0);
        assert_eq!(scroll_offset(10, 10), 1);
        assert_eq!(scroll_offset(5, 0), 0);
    }
}
