use icu_normalizer::ComposingNormalizerBorrowed;

use crate::session::MistakeRecorder;
use crate::vocab::Word;

/// Trimmed, NFC-normalized, case-insensitive spelling check.
pub fn spelling_matches(input: &str, expected: &str) -> bool {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    let a = nfc.normalize(input.trim()).to_lowercase();
    let b = nfc.normalize(expected.trim()).to_lowercase();
    !a.is_empty() && a == b
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DictationPhase {
    Typing,
    Checked { correct: bool },
    Finished,
}

/// Spell each word from its meaning. One attempt per word.
pub struct DictationSession {
    words: Vec<Word>,
    index: usize,
    input: String,
    phase: DictationPhase,
    correct: usize,
}

impl DictationSession {
    pub fn new(words: Vec<Word>) -> Self {
        let phase = if words.is_empty() {
            DictationPhase::Finished
        } else {
            DictationPhase::Typing
        };
        Self {
            words,
            index: 0,
            input: String::new(),
            phase,
            correct: 0,
        }
    }

    pub fn current(&self) -> Option<&Word> {
        match self.phase {
            DictationPhase::Finished => None,
            _ => self.words.get(self.index),
        }
    }

    pub fn phase(&self) -> DictationPhase {
        self.phase
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn push_char(&mut self, ch: char) {
        if self.phase == DictationPhase::Typing {
            self.input.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if self.phase == DictationPhase::Typing {
            self.input.pop();
        }
    }

    /// Check the typed answer. Blank input is ignored.
    pub fn submit(&mut self, recorder: &mut dyn MistakeRecorder) -> Option<bool> {
        if self.phase != DictationPhase::Typing || self.input.trim().is_empty() {
            return None;
        }
        let word = self.words.get(self.index)?;
        let correct = spelling_matches(&self.input, &word.word);
        if correct {
            self.correct += 1;
        } else {
            recorder.record_mistake(word);
        }
        self.phase = DictationPhase::Checked { correct };
        Some(correct)
    }

    pub fn next(&mut self) -> DictationPhase {
        if let DictationPhase::Checked { .. } = self.phase {
            self.input.clear();
            if self.index + 1 < self.words.len() {
                self.index += 1;
                self.phase = DictationPhase::Typing;
            } else {
                self.phase = DictationPhase::Finished;
            }
        }
        self.phase
    }

    /// (correct, total)
    pub fn score(&self) -> (usize, usize) {
        (self.correct, self.words.len())
    }

    pub fn progress(&self) -> (usize, usize) {
        (self.index.min(self.words.len()), self.words.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_ignores_case_whitespace_and_composition() {
        assert!(spelling_matches("  Apple ", "apple"));
        // decomposed e + combining acute
        assert!(spelling_matches("cafe\u{301}", "café"));
        assert!(!spelling_matches("aple", "apple"));
        assert!(!spelling_matches("", ""));
    }

    fn type_word(s: &mut DictationSession, text: &str) {
        for ch in text.chars() {
            s.push_char(ch);
        }
    }

    #[test]
    fn wrong_spelling_is_recorded() {
        let mut s = DictationSession::new(vec![
            Word::new(1, "apple", "苹果"),
            Word::new(2, "water", "水"),
        ]);
        let mut missed: Vec<Word> = Vec::new();

        type_word(&mut s, "appel");
        s.backspace();
        s.backspace();
        type_word(&mut s, "le");
        assert_eq!(s.input(), "apple");
        assert_eq!(s.submit(&mut missed), Some(true));
        // typing is locked until next
        s.push_char('x');
        assert_eq!(s.input(), "apple");

        assert_eq!(s.next(), DictationPhase::Typing);
        assert_eq!(s.input(), "");
        type_word(&mut s, "watr");
        assert_eq!(s.submit(&mut missed), Some(false));
        assert_eq!(missed.len(), 1);
        assert_eq!(missed[0].word, "water");

        assert_eq!(s.next(), DictationPhase::Finished);
        assert_eq!(s.score(), (1, 2));
    }

    #[test]
    fn blank_submit_does_nothing() {
        let mut s = DictationSession::new(vec![Word::new(1, "apple", "苹果")]);
        let mut missed: Vec<Word> = Vec::new();
        type_word(&mut s, "   ");
        assert_eq!(s.submit(&mut missed), None);
        assert_eq!(s.phase(), DictationPhase::Typing);
        assert!(missed.is_empty());
    }
}
