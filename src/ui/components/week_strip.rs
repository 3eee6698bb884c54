use chrono::{Datelike, Duration, NaiveDate};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Widget};
use rust_i18n::t;

use crate::store::check_in::week_start;
use crate::ui::theme::{Theme, ThemeColors};

const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Monday-first row of the current week's check-ins plus streak counters.
pub struct WeekStrip<'a> {
    week: [bool; 7],
    today: NaiveDate,
    streak: u32,
    total_days: usize,
    theme: &'a Theme,
}

impl<'a> WeekStrip<'a> {
    pub fn new(
        week: [bool; 7],
        today: NaiveDate,
        streak: u32,
        total_days: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            week,
            today,
            streak,
            total_days,
            theme,
        }
    }
}

impl Widget for WeekStrip<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("check_in.this_week")))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 4 || inner.width < 36 {
            return;
        }

        let monday = week_start(self.today);
        let cell_w = (inner.width / 7).max(5);
        for (i, label) in DAY_LABELS.iter().enumerate() {
            let x = inner.x + i as u16 * cell_w + 1;
            if x + 3 > inner.x + inner.width {
                break;
            }
            let date = monday + Duration::days(i as i64);
            let is_today = date == self.today;
            let label_style = if is_today {
                Style::default()
                    .fg(colors.highlight())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.muted())
            };
            buf.set_string(x, inner.y, label, label_style);
            buf.set_string(x, inner.y + 1, format!("{:>2}", date.day()), label_style);

            let (ch, color) = day_cell(self.week[i], date > self.today, colors);
            buf.set_string(x + 1, inner.y + 2, ch.to_string(), Style::default().fg(color));
        }

        let summary = t!(
            "check_in.summary",
            streak = day_count(self.streak as usize),
            total = day_count(self.total_days)
        );
        buf.set_string(
            inner.x + 1,
            inner.y + 3,
            summary,
            Style::default().fg(colors.fg()),
        );
    }
}

pub fn day_count(days: usize) -> String {
    if days == 1 {
        t!("check_in.day_one", count = days).to_string()
    } else {
        t!("check_in.day_other", count = days).to_string()
    }
}

fn day_cell(checked: bool, future: bool, colors: &ThemeColors) -> (char, Color) {
    match (checked, future) {
        (true, _) => ('█', colors.success()),
        (false, true) => (' ', colors.accent_dim()),
        (false, false) => ('·', colors.accent_dim()),
    }
}

/// Plain-text week strip for the `check-in` subcommand.
pub fn week_strip_text(week: [bool; 7], today: NaiveDate) -> String {
    let monday = week_start(today);
    let mut out = String::new();
    for (i, label) in DAY_LABELS.iter().enumerate() {
        let date = monday + Duration::days(i as i64);
        let mark = if week[i] {
            "x"
        } else if date > today {
            " "
        } else {
            "."
        };
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&format!("{label}[{mark}]"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_strip_marks_checked_and_future_days() {
        // 2024-05-08 is a Wednesday
        let today = NaiveDate::from_ymd_opt(2024, 5, 8).unwrap();
        let week = [true, false, true, false, false, false, false];
        assert_eq!(
            week_strip_text(week, today),
            "Mon[x] Tue[.] Wed[x] Thu[ ] Fri[ ] Sat[ ] Sun[ ]"
        );
    }

    #[test]
    fn day_count_pluralizes() {
        assert_eq!(day_count(1), "1 day");
        assert_eq!(day_count(3), "3 days");
    }
}
