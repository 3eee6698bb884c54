use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    Continue,
    Submit,
    Cancel,
}

/// Editable text field. In multiline mode Enter inserts a newline and
/// Ctrl+D submits.
pub struct LineInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
    multiline: bool,
    masked: bool,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
            multiline: false,
            masked: false,
        }
    }

    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    /// Text as it should be drawn. `cursor_char` marks the cursor when the
    /// field has focus.
    pub fn display(&self, cursor_char: Option<char>) -> String {
        let mut out = String::with_capacity(self.text.len() + 1);
        for (i, ch) in self.text.chars().enumerate() {
            if i == self.cursor {
                out.extend(cursor_char);
            }
            out.push(if self.masked && ch != '\n' { '*' } else { ch });
        }
        if self.cursor >= self.text.chars().count() {
            out.extend(cursor_char);
        }
        out
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return InputResult::Cancel,
            KeyCode::Char('d') if ctrl && self.multiline => return InputResult::Submit,
            KeyCode::Enter if self.multiline => self.insert('\n'),
            KeyCode::Enter => return InputResult::Submit,
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => {
                if self.cursor < self.text.chars().count() {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.text.chars().count(),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.remove_at(self.cursor);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.text.chars().count() {
                    self.remove_at(self.cursor);
                }
            }
            KeyCode::Char('u') if ctrl => {
                self.text.clear();
                self.cursor = 0;
            }
            KeyCode::Char('w') if ctrl => self.delete_word_back(),
            KeyCode::Char(ch) if !ctrl => self.insert(ch),
            _ => {}
        }
        InputResult::Continue
    }

    fn insert(&mut self, ch: char) {
        let byte_offset = self.char_to_byte(self.cursor);
        self.text.insert(byte_offset, ch);
        self.cursor += 1;
    }

    fn remove_at(&mut self, char_idx: usize) {
        let byte_offset = self.char_to_byte(char_idx);
        if let Some(ch) = self.text[byte_offset..].chars().next() {
            self.text
                .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
        }
    }

    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    /// unix-word-rubout: skip whitespace, then non-whitespace.
    fn delete_word_back(&mut self) {
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = self.cursor;
        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        let start_byte = self.char_to_byte(pos);
        let end_byte = self.char_to_byte(self.cursor);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    #[test]
    fn edits_multibyte_text() {
        let mut input = LineInput::new("苹果");
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "果");
        input.handle(key(KeyCode::Char('青')));
        assert_eq!(input.value(), "青果");
        input.handle(key(KeyCode::Delete));
        assert_eq!(input.value(), "青");
    }

    #[test]
    fn enter_submits_single_line() {
        let mut input = LineInput::new("");
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(input.handle(key(KeyCode::Esc)), InputResult::Cancel);
    }

    #[test]
    fn multiline_enter_inserts_newline() {
        let mut input = LineInput::new("apple,苹果").multiline();
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Continue);
        input.handle(key(KeyCode::Char('b')));
        assert_eq!(input.value(), "apple,苹果\nb");
        assert_eq!(input.handle(ctrl('d')), InputResult::Submit);
    }

    #[test]
    fn ctrl_w_deletes_previous_word() {
        let mut input = LineInput::new("hello big world  ");
        input.handle(ctrl('w'));
        assert_eq!(input.value(), "hello big ");
        input.handle(ctrl('u'));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn masked_display_hides_characters() {
        let input = LineInput::new("pw").masked();
        assert_eq!(input.display(Some('_')), "**_");
        let mut plain = LineInput::new("ab");
        plain.handle(key(KeyCode::Home));
        assert_eq!(plain.display(Some('|')), "|ab");
    }
}
