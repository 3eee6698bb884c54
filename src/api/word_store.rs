use std::collections::{BTreeMap, HashMap};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::http::HttpClient;
use crate::session::MistakeRecorder;
use crate::store::mistakes::MistakeRecord;
use crate::vocab::{Word, WordId, WordStatus};

const WORDS_PATH: &str = "/api/words/list";
const MARK_PATH: &str = "/api/userWords/mark";
const ADD_MISTAKE_PATH: &str = "/api/userWords/mistakes/add";
const MISTAKES_PATH: &str = "/api/userWords/mistakes/list";

/// A remote word with the days it was answered wrongly (`word.mistakes`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakeEntry {
    pub category: String,
    pub subcategory: String,
    pub word: Word,
}

impl MistakeEntry {
    /// One row per missed day, counting repeats on the same day.
    pub fn records(&self) -> Vec<MistakeRecord> {
        let mut per_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
        for day in &self.word.mistakes {
            *per_day.entry(*day).or_default() += 1;
        }
        let source = remote_source(&self.category, &self.subcategory);
        per_day
            .into_iter()
            .map(|(date, error_count)| MistakeRecord {
                source: source.clone(),
                word_id: self.word.id.clone(),
                word: self.word.word.clone(),
                meaning: self.word.meaning.clone(),
                date,
                error_count,
            })
            .collect()
    }
}

/// Mistake source key for a remote book.
pub fn remote_source(category: &str, subcategory: &str) -> String {
    format!("remote:{category}/{subcategory}")
}

/// The (category, subcategory) of a key made by [`remote_source`].
pub fn parse_remote_source(source: &str) -> Option<(&str, &str)> {
    source.strip_prefix("remote:")?.split_once('/')
}

type BookKey = (String, String);

fn book_key(category: &str, subcategory: &str) -> BookKey {
    (category.to_string(), subcategory.to_string())
}

/// Remote word lists keyed by (category, subcategory), cached after the first
/// successful fetch. Mutations merge into the cache only when the server
/// answers 200; nothing is re-fetched afterwards.
pub struct WordStore {
    client: HttpClient,
    words: HashMap<BookKey, Vec<Word>>,
    mistakes: Option<Vec<MistakeEntry>>,
}

impl WordStore {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            words: HashMap::new(),
            mistakes: None,
        }
    }

    pub fn cached(&self, category: &str, subcategory: &str) -> Option<&[Word]> {
        self.words
            .get(&book_key(category, subcategory))
            .map(Vec::as_slice)
    }

    /// Cached words for the book, fetching them first if needed. Empty when the
    /// fetch fails.
    pub fn words(&mut self, category: &str, subcategory: &str) -> &[Word] {
        let key = book_key(category, subcategory);
        if !self.words.contains_key(&key) {
            let response = self.client.post(
                WORDS_PATH,
                &json!({ "category": category, "subcategory": subcategory }),
            );
            if response.is_success() {
                if let Some(words) = response.data_as::<Vec<Word>>() {
                    log::info!("loaded {} words for {category}/{subcategory}", words.len());
                    self.words.insert(key.clone(), words);
                }
            }
        }
        self.words.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn invalidate(&mut self, category: &str, subcategory: &str) {
        self.words.remove(&book_key(category, subcategory));
    }

    pub fn mark(&mut self, category: &str, subcategory: &str, id: i64, status: WordStatus) -> bool {
        let response = self.client.post(
            MARK_PATH,
            &json!({
                "category": category,
                "subcategory": subcategory,
                "wordId": id,
                "status": status,
            }),
        );
        if !response.is_success() {
            return false;
        }
        let target = WordId::Num(id);
        if let Some(list) = self.words.get_mut(&book_key(category, subcategory)) {
            let merged: Vec<Word> = list
                .drain(..)
                .map(|w| if w.id == target { Word { status, ..w } } else { w })
                .collect();
            *list = merged;
        }
        true
    }

    pub fn add_mistake(&mut self, category: &str, subcategory: &str, id: i64) -> bool {
        let response = self.client.post(
            ADD_MISTAKE_PATH,
            &json!({ "category": category, "subcategory": subcategory, "wordId": id }),
        );
        if !response.is_success() {
            return false;
        }

        let today = Local::now().date_naive();
        let target = WordId::Num(id);
        let mut missed: Option<Word> = None;
        if let Some(list) = self.words.get_mut(&book_key(category, subcategory)) {
            if let Some(word) = list.iter_mut().find(|w| w.id == target) {
                word.mistakes.push(today);
                missed = Some(word.clone());
            }
        }

        if let Some(entries) = self.mistakes.as_mut() {
            match entries.iter_mut().find(|e| {
                e.word.id == target && e.category == category && e.subcategory == subcategory
            }) {
                Some(entry) => entry.word.mistakes.push(today),
                None => {
                    if let Some(word) = missed {
                        entries.push(MistakeEntry {
                            category: category.to_string(),
                            subcategory: subcategory.to_string(),
                            word,
                        });
                    }
                }
            }
        }
        true
    }

    pub fn mistakes(&mut self) -> &[MistakeEntry] {
        if self.mistakes.is_none() {
            let response = self.client.post(MISTAKES_PATH, &json!({}));
            if response.is_success() {
                self.mistakes = response.data_as::<Vec<MistakeEntry>>();
            }
        }
        self.mistakes.as_deref().unwrap_or(&[])
    }
}

/// Routes challenge and dictation misses for one remote book to the server.
pub struct RemoteMistakes<'a> {
    pub store: &'a mut WordStore,
    pub category: &'a str,
    pub subcategory: &'a str,
}

impl MistakeRecorder for RemoteMistakes<'_> {
    fn record_mistake(&mut self, word: &Word) {
        match word.id.as_num() {
            Some(id) => {
                if !self.store.add_mistake(self.category, self.subcategory, id) {
                    log::warn!("server did not accept mistake for {}", word.word);
                }
            }
            None => log::warn!("cannot report mistake for non-remote word {}", word.id),
        }
    }
}
