use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use rust_i18n::t;

use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
}

impl MenuItem {
    pub fn new(key: &str, label: &str, description: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            description: description.to_string(),
        }
    }
}

/// Vertical list of keyed entries under a title. Used for the main menu and
/// any other pick-one screen.
pub struct Menu<'a> {
    pub title: String,
    pub subtitle: String,
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(title: &str, subtitle: &str, items: Vec<MenuItem>, theme: &'a Theme) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            items,
            selected: 0,
            theme,
        }
    }

    pub fn main(theme: &'a Theme) -> Self {
        Self::new(
            "vocabdr",
            &t!("menu.subtitle"),
            vec![
                MenuItem::new(
                    "1",
                    &t!("menu.word_list.label"),
                    &t!("menu.word_list.description"),
                ),
                MenuItem::new(
                    "2",
                    &t!("menu.flashcards.label"),
                    &t!("menu.flashcards.description"),
                ),
                MenuItem::new(
                    "3",
                    &t!("menu.dictation.label"),
                    &t!("menu.dictation.description"),
                ),
                MenuItem::new(
                    "4",
                    &t!("menu.challenge.label"),
                    &t!("menu.challenge.description"),
                ),
                MenuItem::new(
                    "b",
                    &t!("menu.books.label"),
                    &t!("menu.books.description"),
                ),
                MenuItem::new(
                    "m",
                    &t!("menu.mistakes.label"),
                    &t!("menu.mistakes.description"),
                ),
                MenuItem::new(
                    "c",
                    &t!("menu.check_in.label"),
                    &t!("menu.check_in.description"),
                ),
                MenuItem::new(
                    "s",
                    &t!("menu.settings.label"),
                    &t!("menu.settings.description"),
                ),
            ],
            theme,
        )
    }

    pub fn next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.items.get(self.selected).map(|i| i.key.as_str())
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                &*self.title,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(&*self.subtitle, Style::default().fg(colors.fg()))),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        // keep the selection visible when the list is taller than the area
        let rows = (layout[2].height / 2).max(1) as usize;
        let offset = self.selected.saturating_sub(rows - 1);

        let mut lines = Vec::new();
        for (i, item) in self.items.iter().enumerate().skip(offset).take(rows) {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });
            lines.push(Line::from(Span::styled(
                format!(" {indicator} [{}] {}", item.key, item.label),
                label_style,
            )));
            lines.push(Line::from(Span::styled(
                format!("     {}", item.description),
                Style::default().fg(colors.muted()),
            )));
        }
        Paragraph::new(lines).render(layout[2], buf);
    }
}
