use rand::Rng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rust_i18n::t;
use serde::Serialize;

use crate::quiz::misspell;
use crate::vocab::Word;

const DISTRACTORS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    EnToCn,
    CnToEn,
    Spelling,
}

impl QuestionType {
    pub const ALL: [QuestionType; 3] = [
        QuestionType::EnToCn,
        QuestionType::CnToEn,
        QuestionType::Spelling,
    ];

    pub fn label(self) -> String {
        match self {
            QuestionType::EnToCn => t!("quiz.en_to_cn"),
            QuestionType::CnToEn => t!("quiz.cn_to_en"),
            QuestionType::Spelling => t!("quiz.spelling"),
        }
        .to_string()
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub question: String,
    pub correct_answer: String,
    pub options: Vec<String>,
    pub word: Word,
}

impl Question {
    pub fn is_correct(&self, option_idx: usize) -> bool {
        self.options
            .get(option_idx)
            .is_some_and(|o| *o == self.correct_answer)
    }

    /// Index of the first option equal to the correct answer.
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.correct_answer)
    }
}

/// One question per word with an independently rolled type, returned in shuffled order.
pub fn generate_questions(words: &[Word], rng: &mut SmallRng) -> Vec<Question> {
    let mut questions: Vec<Question> = (0..words.len())
        .map(|idx| {
            let kind = QuestionType::ALL[rng.gen_range(0..QuestionType::ALL.len())];
            build_question(words, idx, kind, rng)
        })
        .collect();
    questions.shuffle(rng);
    questions
}

/// Build a question of the given type for `words[idx]`, drawing distractors from the
/// other positions in `words`.
pub fn build_question(
    words: &[Word],
    idx: usize,
    kind: QuestionType,
    rng: &mut SmallRng,
) -> Question {
    let word = &words[idx];
    let (question, correct_answer, distractors) = match kind {
        QuestionType::EnToCn => (
            word.word.clone(),
            word.meaning.clone(),
            pick_others(words, idx, rng)
                .into_iter()
                .map(|w| w.meaning.clone())
                .collect(),
        ),
        QuestionType::CnToEn => (
            word.meaning.clone(),
            word.word.clone(),
            pick_others(words, idx, rng)
                .into_iter()
                .map(|w| w.word.clone())
                .collect(),
        ),
        QuestionType::Spelling => (
            t!("quiz.spelling_prompt", meaning = word.meaning).to_string(),
            word.word.clone(),
            misspell::misspellings(&word.word, rng),
        ),
    };

    let mut options: Vec<String> = Vec::with_capacity(distractors.len() + 1);
    options.push(correct_answer.clone());
    options.extend(distractors);
    options.shuffle(rng);

    Question {
        kind,
        question,
        correct_answer,
        options,
        word: word.clone(),
    }
}

fn pick_others<'a>(words: &'a [Word], idx: usize, rng: &mut SmallRng) -> Vec<&'a Word> {
    let mut others: Vec<&Word> = words
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != idx)
        .map(|(_, w)| w)
        .collect();
    others.shuffle(rng);
    others.truncate(DISTRACTORS);
    others
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn sample_words(n: usize) -> Vec<Word> {
        let pool = [
            ("apple", "苹果"),
            ("water", "水"),
            ("friend", "朋友"),
            ("window", "窗户"),
            ("travel", "旅行"),
            ("quiet", "安静的"),
        ];
        pool.iter()
            .cycle()
            .take(n)
            .enumerate()
            .map(|(i, (w, m))| Word::new(i as i64 + 1, w, m))
            .collect()
    }

    #[test]
    fn one_question_per_word_and_answer_in_options() {
        for seed in 0..100 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let words = sample_words(6);
            let questions = generate_questions(&words, &mut rng);
            assert_eq!(questions.len(), words.len());

            let mut ids: Vec<_> = questions.iter().map(|q| q.word.id.clone()).collect();
            ids.sort();
            let mut expected: Vec<_> = words.iter().map(|w| w.id.clone()).collect();
            expected.sort();
            assert_eq!(ids, expected);

            for q in &questions {
                assert!(q.options.contains(&q.correct_answer), "seed {seed}: {q:?}");
                assert!(q.options.len() <= 4);
                assert!(q.correct_index().is_some_and(|i| q.is_correct(i)));
            }
        }
    }

    #[test]
    fn empty_input_yields_no_questions() {
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(generate_questions(&[], &mut rng).is_empty());
    }

    #[test]
    fn small_pool_produces_fewer_options() {
        let mut rng = SmallRng::seed_from_u64(5);
        let words = sample_words(2);
        let q = build_question(&words, 0, QuestionType::EnToCn, &mut rng);
        assert_eq!(q.options.len(), 2);
        assert_eq!(q.correct_answer, "苹果");

        let single = sample_words(1);
        let q = build_question(&single, 0, QuestionType::CnToEn, &mut rng);
        assert_eq!(q.options, vec!["apple".to_string()]);
    }

    #[test]
    fn cn_to_en_prompts_with_meaning() {
        let mut rng = SmallRng::seed_from_u64(9);
        let words = sample_words(5);
        let q = build_question(&words, 2, QuestionType::CnToEn, &mut rng);
        assert_eq!(q.question, "朋友");
        assert_eq!(q.correct_answer, "friend");
        assert_eq!(q.options.len(), 4);
        assert!(!q.options.contains(&"朋友".to_string()));
    }

    #[test]
    fn spelling_uses_misspellings_of_the_answer() {
        let mut rng = SmallRng::seed_from_u64(11);
        let words = sample_words(4);
        let q = build_question(&words, 3, QuestionType::Spelling, &mut rng);
        assert!(q.question.contains("窗户"));
        assert_eq!(q.correct_answer, "window");
        assert_eq!(q.options.len(), 4);

        let short = vec![Word::new(1, "ox", "牛")];
        let q = build_question(&short, 0, QuestionType::Spelling, &mut rng);
        assert_eq!(q.options.len(), 2);
    }

    #[test]
    fn duplicate_meanings_are_not_deduplicated() {
        let mut rng = SmallRng::seed_from_u64(2);
        let words = vec![
            Word::new(1, "big", "大的"),
            Word::new(2, "large", "大的"),
        ];
        let q = build_question(&words, 0, QuestionType::EnToCn, &mut rng);
        assert_eq!(q.options, vec!["大的".to_string(), "大的".to_string()]);
        assert!(q.is_correct(0) && q.is_correct(1));
    }

    #[test]
    fn serializes_type_as_kebab_case() {
        let mut rng = SmallRng::seed_from_u64(4);
        let words = sample_words(3);
        let q = build_question(&words, 0, QuestionType::EnToCn, &mut rng);
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "en-to-cn");
        assert!(json["correctAnswer"].is_string());
    }
}
