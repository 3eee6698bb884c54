use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::{Theme, ThemeColors};

/// Countdown for the active challenge question. The bar drains from the
/// right and turns warning, then error, as the deadline nears.
pub struct ProgressBar<'a> {
    pub label: String,
    pub remaining_secs: u32,
    pub total_secs: u32,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(label: &str, remaining_secs: u32, total_secs: u32, theme: &'a Theme) -> Self {
        Self {
            label: label.to_string(),
            remaining_secs: remaining_secs.min(total_secs),
            total_secs: total_secs.max(1),
            theme,
        }
    }

    pub fn ratio(&self) -> f64 {
        self.remaining_secs as f64 / self.total_secs as f64
    }
}

fn fill_color(colors: &ThemeColors, ratio: f64) -> Color {
    if ratio <= 0.3 {
        colors.error()
    } else if ratio <= 0.6 {
        colors.warning()
    } else {
        colors.success()
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let ratio = self.ratio();
        let fill = fill_color(colors, ratio);
        let filled_width = (ratio * inner.width as f64).round() as u16;
        for x in inner.x..inner.x + inner.width {
            let bg = if x < inner.x + filled_width {
                fill
            } else {
                colors.bar_empty()
            };
            buf[(x, inner.y)].set_style(Style::default().fg(colors.fg()).bg(bg));
        }

        let text = format!("{}s", self.remaining_secs);
        let text_x = inner.x + inner.width.saturating_sub(text.len() as u16) / 2;
        buf.set_string(text_x, inner.y, &text, Style::default().fg(colors.fg()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_and_changes_color() {
        let theme = Theme::default();
        let colors = &theme.colors;
        assert_eq!(fill_color(colors, 1.0), colors.success());
        assert_eq!(fill_color(colors, 0.5), colors.warning());
        assert_eq!(fill_color(colors, 0.2), colors.error());

        let bar = ProgressBar::new("Q1", 20, 10, &theme);
        assert_eq!(bar.ratio(), 1.0);
        let bar = ProgressBar::new("Q1", 3, 0, &theme);
        assert_eq!(bar.total_secs, 1);
        assert_eq!(bar.ratio(), 0.0);
    }

    #[test]
    fn renders_remaining_seconds() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        ProgressBar::new("Q1", 7, 10, &theme).render(area, &mut buf);
        let row: String = (0..20).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("7s"));
    }
}
