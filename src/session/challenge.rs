use std::time::Instant;

use crate::quiz::Question;
use crate::session::MistakeRecorder;
use crate::session::result::ChallengeSummary;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Wrong,
    TimeUp,
}

impl Outcome {
    pub fn is_correct(self) -> bool {
        self == Outcome::Correct
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Answering,
    Answered(Outcome),
    Completed,
}

#[derive(Clone, Debug)]
pub struct AnswerRecord {
    pub question_idx: usize,
    pub outcome: Outcome,
}

/// Timed multiple-choice run over a fixed list of questions.
///
/// One question is active at a time. While answering, each `tick` takes a
/// second off the countdown; reaching zero counts as a wrong answer. Wrong
/// and timed-out answers are handed to the `MistakeRecorder`. Nothing here
/// is persisted, so dropping the session abandons it.
pub struct ChallengeSession {
    questions: Vec<Question>,
    index: usize,
    phase: Phase,
    duration_secs: u32,
    remaining_secs: u32,
    selected: Option<usize>,
    answers: Vec<AnswerRecord>,
    started_at: Instant,
    finished_at: Option<Instant>,
}

impl ChallengeSession {
    pub fn new(questions: Vec<Question>, duration_secs: u32) -> Self {
        let duration_secs = duration_secs.max(1);
        let now = Instant::now();
        let empty = questions.is_empty();
        Self {
            questions,
            index: 0,
            phase: if empty { Phase::Completed } else { Phase::Answering },
            duration_secs,
            remaining_secs: duration_secs,
            selected: None,
            answers: Vec::new(),
            started_at: now,
            finished_at: if empty { Some(now) } else { None },
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn current(&self) -> Option<&Question> {
        if self.is_complete() {
            None
        } else {
            self.questions.get(self.index)
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn score(&self) -> usize {
        self.answers.iter().filter(|a| a.outcome.is_correct()).count()
    }

    pub fn elapsed_secs(&self) -> f64 {
        let end = self.finished_at.unwrap_or_else(Instant::now);
        end.duration_since(self.started_at).as_secs_f64()
    }

    /// Answer the active question. Ignored unless answering and `option_idx` is in range.
    pub fn select(
        &mut self,
        option_idx: usize,
        recorder: &mut dyn MistakeRecorder,
    ) -> Option<Outcome> {
        if self.phase != Phase::Answering {
            return None;
        }
        let question = self.questions.get(self.index)?;
        if option_idx >= question.options.len() {
            return None;
        }
        let outcome = if question.is_correct(option_idx) {
            Outcome::Correct
        } else {
            Outcome::Wrong
        };
        self.selected = Some(option_idx);
        self.settle(outcome, recorder);
        Some(outcome)
    }

    /// One second of countdown. Returns `TimeUp` on the tick that reaches zero.
    pub fn tick(&mut self, recorder: &mut dyn MistakeRecorder) -> Option<Outcome> {
        if self.phase != Phase::Answering {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.settle(Outcome::TimeUp, recorder);
            return Some(Outcome::TimeUp);
        }
        None
    }

    fn settle(&mut self, outcome: Outcome, recorder: &mut dyn MistakeRecorder) {
        if !outcome.is_correct() {
            recorder.record_mistake(&self.questions[self.index].word);
        }
        self.answers.push(AnswerRecord {
            question_idx: self.index,
            outcome,
        });
        self.phase = Phase::Answered(outcome);
    }

    /// Move past a shown result: to the next question, or to `Completed` after the last.
    pub fn next(&mut self) -> Phase {
        if let Phase::Answered(_) = self.phase {
            if self.index + 1 < self.questions.len() {
                self.index += 1;
                self.remaining_secs = self.duration_secs;
                self.selected = None;
                self.phase = Phase::Answering;
            } else {
                self.phase = Phase::Completed;
                self.finished_at = Some(Instant::now());
            }
        }
        self.phase
    }

    pub fn summary(&self) -> ChallengeSummary {
        ChallengeSummary::from_session(&self.questions, &self.answers, self.elapsed_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::question::{QuestionType, build_question};
    use crate::vocab::Word;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn questions(n: usize) -> Vec<Question> {
        let words: Vec<Word> = ["apple", "water", "friend", "window"]
            .iter()
            .zip(["苹果", "水", "朋友", "窗户"])
            .enumerate()
            .map(|(i, (w, m))| Word::new(i as i64 + 1, w, m))
            .collect();
        let mut rng = SmallRng::seed_from_u64(42);
        (0..n)
            .map(|i| build_question(&words, i, QuestionType::EnToCn, &mut rng))
            .collect()
    }

    fn wrong_index(q: &Question) -> usize {
        q.options
            .iter()
            .position(|o| *o != q.correct_answer)
            .unwrap()
    }

    #[test]
    fn ten_silent_ticks_time_out_and_record_mistake() {
        let mut session = ChallengeSession::new(questions(2), 10);
        let mut missed: Vec<Word> = Vec::new();
        let current_word = session.current().unwrap().word.clone();

        for _ in 0..9 {
            assert_eq!(session.tick(&mut missed), None);
        }
        assert_eq!(session.remaining_secs(), 1);
        assert_eq!(session.tick(&mut missed), Some(Outcome::TimeUp));
        assert_eq!(session.phase(), Phase::Answered(Outcome::TimeUp));
        assert_eq!(missed, vec![current_word]);

        // timer frozen once answered
        assert_eq!(session.tick(&mut missed), None);
        assert_eq!(session.remaining_secs(), 0);
    }

    #[test]
    fn correct_answer_freezes_timer_without_mistake() {
        let mut session = ChallengeSession::new(questions(2), 15);
        let mut missed: Vec<Word> = Vec::new();
        session.tick(&mut missed);
        let idx = session.current().unwrap().correct_index().unwrap();
        assert_eq!(session.select(idx, &mut missed), Some(Outcome::Correct));
        assert!(missed.is_empty());
        assert_eq!(session.tick(&mut missed), None);
        assert_eq!(session.remaining_secs(), 14);
        // second selection ignored
        assert_eq!(session.select(0, &mut missed), None);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn wrong_answer_records_mistake() {
        let mut session = ChallengeSession::new(questions(1), 10);
        let mut missed: Vec<Word> = Vec::new();
        let idx = wrong_index(session.current().unwrap());
        assert_eq!(session.select(idx, &mut missed), Some(Outcome::Wrong));
        assert_eq!(missed.len(), 1);
        assert_eq!(session.selected(), Some(idx));
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut session = ChallengeSession::new(questions(1), 10);
        let mut missed: Vec<Word> = Vec::new();
        assert_eq!(session.select(99, &mut missed), None);
        assert_eq!(session.phase(), Phase::Answering);
    }

    #[test]
    fn next_only_after_result_and_resets_state() {
        let mut session = ChallengeSession::new(questions(2), 10);
        let mut missed: Vec<Word> = Vec::new();
        assert_eq!(session.next(), Phase::Answering);
        assert_eq!(session.index(), 0);

        session.tick(&mut missed);
        session.select(0, &mut missed);
        assert_eq!(session.next(), Phase::Answering);
        assert_eq!(session.index(), 1);
        assert_eq!(session.remaining_secs(), 10);
        assert_eq!(session.selected(), None);

        session.select(0, &mut missed);
        assert_eq!(session.next(), Phase::Completed);
        assert!(session.current().is_none());
        let summary = session.summary();
        assert_eq!(summary.correct + summary.wrong + summary.timed_out, 2);
    }

    #[test]
    fn summary_counts_outcomes() {
        let mut session = ChallengeSession::new(questions(3), 10);
        let mut missed: Vec<Word> = Vec::new();

        let idx = session.current().unwrap().correct_index().unwrap();
        session.select(idx, &mut missed);
        session.next();
        let idx = wrong_index(session.current().unwrap());
        session.select(idx, &mut missed);
        session.next();
        for _ in 0..10 {
            session.tick(&mut missed);
        }
        session.next();

        let summary = session.summary();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.correct, 1);
        assert_eq!(summary.wrong, 1);
        assert_eq!(summary.timed_out, 1);
        assert_eq!(summary.missed.len(), 2);
        assert!((summary.accuracy - 100.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn empty_session_is_complete() {
        let session = ChallengeSession::new(Vec::new(), 10);
        assert!(session.is_complete());
        assert!(session.current().is_none());
        assert_eq!(session.summary().total, 0);
    }
}
