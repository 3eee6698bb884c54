pub mod challenge;
pub mod dictation;
pub mod flashcard;
pub mod result;

use crate::vocab::Word;

/// Receives every wrong or timed-out answer.
pub trait MistakeRecorder {
    fn record_mistake(&mut self, word: &Word);
}

/// Collects missed words in memory.
impl MistakeRecorder for Vec<Word> {
    fn record_mistake(&mut self, word: &Word) {
        self.push(word.clone());
    }
}
