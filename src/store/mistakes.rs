use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::session::MistakeRecorder;
use crate::store::local::LocalStorage;
use crate::store::schema::MISTAKES_KEY;
use crate::vocab::{Word, WordId};

/// Source key of the bundled books. Their ids are unique across all books.
pub const BOOK_SOURCE: &str = "book";

fn default_source() -> String {
    BOOK_SOURCE.to_string()
}

/// One word answered wrongly on one day; repeated misses bump `error_count`.
/// Word ids are only unique within `source`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakeRecord {
    #[serde(default = "default_source")]
    pub source: String,
    pub word_id: WordId,
    pub word: String,
    pub meaning: String,
    pub date: NaiveDate,
    pub error_count: u32,
}

impl MistakeRecord {
    pub fn is_same_word(&self, source: &str, word_id: &WordId) -> bool {
        self.source == source && self.word_id == *word_id
    }
}

/// A missed word to practice, with the source it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct ReviewWord {
    pub source: String,
    pub word: Word,
}

impl ReviewWord {
    /// Whether `word` is this review entry. Matches on text as well as id so
    /// that equal ids from different sources stay apart.
    pub fn matches(&self, word: &Word) -> bool {
        self.word.id == word.id && self.word.word == word.word
    }
}

/// Distinct (source, word) pairs, most total errors first. Each word's
/// `mistakes` holds the days it was missed.
pub fn review_words(records: &[MistakeRecord]) -> Vec<ReviewWord> {
    let mut by_word: Vec<(u32, ReviewWord)> = Vec::new();
    for record in records {
        match by_word
            .iter_mut()
            .find(|(_, r)| record.is_same_word(&r.source, &r.word.id))
        {
            Some((total, review)) => {
                *total += record.error_count;
                review.word.mistakes.push(record.date);
            }
            None => {
                let mut word = Word::new(record.word_id.clone(), &record.word, &record.meaning);
                word.mistakes.push(record.date);
                by_word.push((
                    record.error_count,
                    ReviewWord {
                        source: record.source.clone(),
                        word,
                    },
                ));
            }
        }
    }
    by_word.sort_by(|a, b| b.0.cmp(&a.0));
    by_word.into_iter().map(|(_, r)| r).collect()
}

pub struct MistakeLog {
    storage: LocalStorage,
}

impl MistakeLog {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn records(&self) -> Vec<MistakeRecord> {
        self.storage.get_or_default(MISTAKES_KEY)
    }

    pub fn write(&self, records: &[MistakeRecord]) -> Result<()> {
        self.storage.set(MISTAKES_KEY, records)
    }

    pub fn record(&self, source: &str, word: &Word, date: NaiveDate) -> Result<MistakeRecord> {
        let mut records = self.records();
        let entry = match records
            .iter_mut()
            .find(|r| r.is_same_word(source, &word.id) && r.date == date)
        {
            Some(existing) => {
                existing.error_count += 1;
                existing.clone()
            }
            None => {
                let record = MistakeRecord {
                    source: source.to_string(),
                    word_id: word.id.clone(),
                    word: word.word.clone(),
                    meaning: word.meaning.clone(),
                    date,
                    error_count: 1,
                };
                records.push(record.clone());
                record
            }
        };
        self.write(&records)?;
        Ok(entry)
    }

    /// Records grouped by day, newest day first.
    pub fn by_date(&self) -> Vec<(NaiveDate, Vec<MistakeRecord>)> {
        let mut groups: BTreeMap<NaiveDate, Vec<MistakeRecord>> = BTreeMap::new();
        for record in self.records() {
            groups.entry(record.date).or_default().push(record);
        }
        groups.into_iter().rev().collect()
    }

    /// Remove every record matching one of the (source, word id, date) `keys`.
    /// Returns how many were removed.
    pub fn delete(&self, keys: &[(String, WordId, NaiveDate)]) -> Result<usize> {
        let records = self.records();
        let before = records.len();
        let kept: Vec<MistakeRecord> = records
            .into_iter()
            .filter(|r| {
                !keys
                    .iter()
                    .any(|(source, id, d)| r.is_same_word(source, id) && *d == r.date)
            })
            .collect();
        let removed = before - kept.len();
        if removed > 0 {
            self.write(&kept)?;
        }
        Ok(removed)
    }

    pub fn clear(&self) -> Result<()> {
        self.write(&[])
    }
}

/// Records misses for words of one source into the local log, dated today.
pub struct LocalMistakes<'a> {
    pub log: &'a MistakeLog,
    pub source: &'a str,
}

impl MistakeRecorder for LocalMistakes<'_> {
    fn record_mistake(&mut self, word: &Word) {
        let today = Local::now().date_naive();
        if let Err(e) = self.log.record(self.source, word, today) {
            log::error!("failed to record mistake for {}: {e}", word.word);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn make_log() -> (TempDir, MistakeLog) {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, MistakeLog::new(storage))
    }

    #[test]
    fn same_word_same_day_increments_counter() {
        let (_dir, log) = make_log();
        let word = Word::new(7, "borrow", "借入");
        log.record(BOOK_SOURCE, &word, date("2024-04-01")).unwrap();
        let second = log.record(BOOK_SOURCE, &word, date("2024-04-01")).unwrap();
        assert_eq!(second.error_count, 2);

        let records = log.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].error_count, 2);
    }

    #[test]
    fn different_days_create_separate_entries() {
        let (_dir, log) = make_log();
        let word = Word::new(7, "borrow", "借入");
        log.record(BOOK_SOURCE, &word, date("2024-04-01")).unwrap();
        log.record(BOOK_SOURCE, &word, date("2024-04-02")).unwrap();
        let records = log.records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.error_count == 1));
    }

    #[test]
    fn custom_and_numeric_ids_do_not_collide() {
        let (_dir, log) = make_log();
        log.record(BOOK_SOURCE, &Word::new(1, "a", "x"), date("2024-04-01")).unwrap();
        log.record(BOOK_SOURCE, &Word::new("1", "a", "x"), date("2024-04-01")).unwrap();
        assert_eq!(log.records().len(), 2);
    }

    #[test]
    fn equal_ids_from_different_sources_stay_apart() {
        let (_dir, log) = make_log();
        let day = date("2024-04-01");
        log.record(BOOK_SOURCE, &Word::new(1001, "apple", "苹果"), day).unwrap();
        log.record("remote-custom:3", &Word::new(1001, "river", "河"), day).unwrap();

        let records = log.records();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.error_count == 1));
        assert_eq!(records[1].word, "river");

        let review = review_words(&log.records());
        assert_eq!(review.len(), 2);
        assert_eq!(review[1].source, "remote-custom:3");

        let removed = log
            .delete(&[("remote-custom:3".to_string(), WordId::Num(1001), day)])
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(log.records()[0].word, "apple");
    }

    #[test]
    fn records_without_source_load_as_book() {
        let (_dir, log) = make_log();
        log.storage
            .set(
                MISTAKES_KEY,
                &serde_json::json!([{
                    "wordId": 1002, "word": "b", "meaning": "y",
                    "date": "2024-04-01", "errorCount": 3
                }]),
            )
            .unwrap();
        assert_eq!(log.records()[0].source, BOOK_SOURCE);
    }

    #[test]
    fn by_date_is_newest_first() {
        let (_dir, log) = make_log();
        log.record(BOOK_SOURCE, &Word::new(1, "a", "x"), date("2024-04-01")).unwrap();
        log.record(BOOK_SOURCE, &Word::new(2, "b", "y"), date("2024-04-03")).unwrap();
        log.record(BOOK_SOURCE, &Word::new(3, "c", "z"), date("2024-04-03")).unwrap();
        let groups = log.by_date();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, date("2024-04-03"));
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].0, date("2024-04-01"));
    }

    #[test]
    fn delete_filters_by_identity() {
        let (_dir, log) = make_log();
        log.record(BOOK_SOURCE, &Word::new(1, "a", "x"), date("2024-04-01")).unwrap();
        log.record(BOOK_SOURCE, &Word::new(1, "a", "x"), date("2024-04-02")).unwrap();
        let book = || BOOK_SOURCE.to_string();
        let removed = log
            .delete(&[(book(), WordId::Num(1), date("2024-04-01"))])
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(log.records()[0].date, date("2024-04-02"));
        assert_eq!(
            log.delete(&[(book(), WordId::Num(9), date("2024-04-02"))]).unwrap(),
            0
        );
    }

    #[test]
    fn review_words_sorted_by_total_errors() {
        let (_dir, log) = make_log();
        let a = Word::new(1, "a", "x");
        let b = Word::new(2, "b", "y");
        log.record(BOOK_SOURCE, &a, date("2024-04-01")).unwrap();
        log.record(BOOK_SOURCE, &b, date("2024-04-01")).unwrap();
        log.record(BOOK_SOURCE, &b, date("2024-04-01")).unwrap();
        log.record(BOOK_SOURCE, &b, date("2024-04-02")).unwrap();
        let review = review_words(&log.records());
        assert_eq!(review.len(), 2);
        assert_eq!(review[0].word.word, "b");
        assert_eq!(review[0].word.error_count(), 2);
        assert!(review[0].matches(&b));
        assert!(!review[0].matches(&a));
    }

    #[test]
    fn recorder_uses_today_and_source() {
        let (_dir, log) = make_log();
        let mut recorder = LocalMistakes {
            log: &log,
            source: "custom:cv-1",
        };
        recorder.record_mistake(&Word::new("cv-1-1", "quiet", "安静的"));
        let records = log.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, Local::now().date_naive());
        assert_eq!(records[0].source, "custom:cv-1");
    }

    #[test]
    fn clear_empties_log() {
        let (_dir, log) = make_log();
        log.record(BOOK_SOURCE, &Word::new(1, "a", "x"), date("2024-04-01")).unwrap();
        log.clear().unwrap();
        assert!(log.records().is_empty());
    }
}
