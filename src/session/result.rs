use chrono::{DateTime, Utc};
use rust_i18n::t;
use serde::{Deserialize, Serialize};

use crate::quiz::Question;
use crate::session::challenge::{AnswerRecord, Outcome};
use crate::vocab::Word;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Grade {
    Perfect,
    Great,
    NotBad,
    KeepPracticing,
}

impl Grade {
    pub fn label(self) -> String {
        match self {
            Grade::Perfect => t!("result.grade.perfect"),
            Grade::Great => t!("result.grade.great"),
            Grade::NotBad => t!("result.grade.not_bad"),
            Grade::KeepPracticing => t!("result.grade.keep_practicing"),
        }
        .to_string()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChallengeSummary {
    pub total: usize,
    pub correct: usize,
    pub wrong: usize,
    pub timed_out: usize,
    pub accuracy: f64,
    pub elapsed_secs: f64,
    pub timestamp: DateTime<Utc>,
    pub missed: Vec<Word>,
}

impl ChallengeSummary {
    pub fn from_session(questions: &[Question], answers: &[AnswerRecord], elapsed_secs: f64) -> Self {
        let count = |o: Outcome| answers.iter().filter(|a| a.outcome == o).count();
        let correct = count(Outcome::Correct);
        let total = questions.len();
        let accuracy = if total > 0 {
            (correct as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        let missed = answers
            .iter()
            .filter(|a| !a.outcome.is_correct())
            .filter_map(|a| questions.get(a.question_idx))
            .map(|q| q.word.clone())
            .collect();

        Self {
            total,
            correct,
            wrong: count(Outcome::Wrong),
            timed_out: count(Outcome::TimeUp),
            accuracy,
            elapsed_secs,
            timestamp: Utc::now(),
            missed,
        }
    }

    /// Every question answered correctly.
    pub fn is_perfect(&self) -> bool {
        self.total > 0 && self.correct == self.total
    }

    pub fn grade(&self) -> Grade {
        match self.accuracy {
            a if a >= 100.0 => Grade::Perfect,
            a if a >= 80.0 => Grade::Great,
            a if a >= 60.0 => Grade::NotBad,
            _ => Grade::KeepPracticing,
        }
    }
}
