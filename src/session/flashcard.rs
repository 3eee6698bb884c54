use crate::vocab::{Word, WordStatus};

/// Card-by-card review. The front shows the word, the back its meaning and example.
pub struct FlashcardSession {
    words: Vec<Word>,
    index: usize,
    flipped: bool,
}

impl FlashcardSession {
    pub fn new(words: Vec<Word>) -> Self {
        Self {
            words,
            index: 0,
            flipped: false,
        }
    }

    pub fn current(&self) -> Option<&Word> {
        self.words.get(self.index)
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn flip(&mut self) {
        if !self.words.is_empty() {
            self.flipped = !self.flipped;
        }
    }

    /// Advance to the next card. Returns false at the end of the deck.
    pub fn next(&mut self) -> bool {
        if self.index + 1 < self.words.len() {
            self.index += 1;
            self.flipped = false;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            self.flipped = false;
            true
        } else {
            false
        }
    }

    /// Toggle `status` on the current card and return the word with its new status.
    pub fn mark(&mut self, status: WordStatus) -> Option<&Word> {
        let word = self.words.get_mut(self.index)?;
        word.status = word.status.toggled(status);
        Some(word)
    }

    /// (1-based position, total)
    pub fn progress(&self) -> (usize, usize) {
        if self.words.is_empty() {
            (0, 0)
        } else {
            (self.index + 1, self.words.len())
        }
    }
}
