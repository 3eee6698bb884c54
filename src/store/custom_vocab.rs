use anyhow::Result;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::local::LocalStorage;
use crate::store::schema::CUSTOM_VOCABULARIES_KEY;
use crate::vocab::{Word, WordId, WordStatus};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CustomVocabError {
    #[error("vocabulary name must not be empty")]
    EmptyName,

    #[error("no valid `word,meaning` lines found")]
    NoWords,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomWord {
    pub id: String,
    pub word: String,
    pub meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_cn: Option<String>,
    #[serde(default)]
    pub status: WordStatus,
}

impl CustomWord {
    pub fn to_word(&self) -> Word {
        Word {
            id: WordId::Text(self.id.clone()),
            word: self.word.clone(),
            meaning: self.meaning.clone(),
            example: self.example.clone(),
            example_cn: self.example_cn.clone(),
            tags: Vec::new(),
            status: self.status,
            mistakes: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomVocabulary {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub words: Vec<CustomWord>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl CustomVocabulary {
    pub fn to_words(&self) -> Vec<Word> {
        self.words.iter().map(CustomWord::to_word).collect()
    }
}

/// A non-empty input line that could not be turned into a word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseIssue {
    pub line: usize,
    pub content: String,
}

/// Parse `word,meaning[,example[,exampleCn]]` lines. Words get ids `<prefix>-<n>`.
///
/// A full-width `，` separates fields only on lines without an ASCII comma;
/// otherwise it stays part of the field (`放弃，抛弃` is one meaning).
pub fn parse_words(text: &str, id_prefix: &str) -> (Vec<CustomWord>, Vec<ParseIssue>) {
    let mut words = Vec::new();
    let mut issues = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = if line.contains(',') {
            line.split(',').map(str::trim).collect()
        } else {
            line.split('，').map(str::trim).collect()
        };
        let word = fields.first().copied().unwrap_or_default();
        let meaning = fields.get(1).copied().unwrap_or_default();
        if word.is_empty() || meaning.is_empty() {
            issues.push(ParseIssue {
                line: idx + 1,
                content: line.to_string(),
            });
            continue;
        }
        let optional = |i: usize| {
            fields
                .get(i)
                .filter(|f| !f.is_empty())
                .map(|f| f.to_string())
        };
        words.push(CustomWord {
            id: format!("{id_prefix}-{}", words.len() + 1),
            word: word.to_string(),
            meaning: meaning.to_string(),
            example: optional(2),
            example_cn: optional(3),
            status: WordStatus::Unmarked,
        });
    }

    (words, issues)
}

pub struct CustomVocabularies {
    storage: LocalStorage,
}

impl CustomVocabularies {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn all(&self) -> Vec<CustomVocabulary> {
        self.storage.get_or_default(CUSTOM_VOCABULARIES_KEY)
    }

    pub fn write(&self, vocabularies: &[CustomVocabulary]) -> Result<()> {
        self.storage.set(CUSTOM_VOCABULARIES_KEY, vocabularies)
    }

    pub fn get(&self, id: &str) -> Option<CustomVocabulary> {
        self.all().into_iter().find(|v| v.id == id)
    }

    /// Parse `text` and store it as a new vocabulary. Lines that fail to parse
    /// are returned alongside the created vocabulary.
    pub fn create(
        &self,
        name: &str,
        emoji: &str,
        text: &str,
    ) -> Result<(CustomVocabulary, Vec<ParseIssue>)> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CustomVocabError::EmptyName.into());
        }
        let created_at = Utc::now();
        let suffix: u16 = rand::thread_rng().r#gen();
        let id = format!("cv-{:x}-{suffix:04x}", created_at.timestamp_millis());

        let (words, issues) = parse_words(text, &id);
        if words.is_empty() {
            return Err(CustomVocabError::NoWords.into());
        }

        let vocabulary = CustomVocabulary {
            id,
            name: name.to_string(),
            emoji: if emoji.trim().is_empty() {
                "📒".to_string()
            } else {
                emoji.trim().to_string()
            },
            words,
            created_at,
        };
        let mut all = self.all();
        all.push(vocabulary.clone());
        self.write(&all)?;
        log::info!(
            "created custom vocabulary {} with {} words",
            vocabulary.id,
            vocabulary.words.len()
        );
        Ok((vocabulary, issues))
    }

    /// Returns false when no vocabulary had that id.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let all = self.all();
        let before = all.len();
        let kept: Vec<CustomVocabulary> = all.into_iter().filter(|v| v.id != id).collect();
        if kept.len() == before {
            return Ok(false);
        }
        self.write(&kept)?;
        Ok(true)
    }

    pub fn set_word_status(&self, vocab_id: &str, word_id: &str, status: WordStatus) -> Result<bool> {
        let mut all = self.all();
        let Some(word) = all
            .iter_mut()
            .filter(|v| v.id == vocab_id)
            .flat_map(|v| v.words.iter_mut())
            .find(|w| w.id == word_id)
        else {
            return Ok(false);
        };
        word.status = status;
        self.write(&all)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_store() -> (TempDir, CustomVocabularies) {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, CustomVocabularies::new(storage))
    }

    #[test]
    fn parse_words_fields_and_issues() {
        let text = "apple, 苹果, I like apples., 我喜欢苹果。\n\n  water,水\nbroken line\n,missing word\nriver，河";
        let (words, issues) = parse_words(text, "cv");
        assert_eq!(words.len(), 3);
        assert_eq!(words[0].id, "cv-1");
        assert_eq!(words[0].example.as_deref(), Some("I like apples."));
        assert_eq!(words[0].example_cn.as_deref(), Some("我喜欢苹果。"));
        assert_eq!(words[1].word, "water");
        assert!(words[1].example.is_none());
        assert_eq!(words[2].meaning, "河");
        assert_eq!(
            issues.iter().map(|i| i.line).collect::<Vec<_>>(),
            vec![4, 5]
        );
    }

    #[test]
    fn full_width_comma_inside_meaning_is_kept() {
        let (words, issues) = parse_words("abandon,放弃，抛弃\nleave，离开", "cv");
        assert!(issues.is_empty());
        assert_eq!(words[0].meaning, "放弃，抛弃");
        assert!(words[0].example.is_none());
        // no ASCII comma on the line: full-width comma separates
        assert_eq!(words[1].word, "leave");
        assert_eq!(words[1].meaning, "离开");
    }

    #[test]
    fn create_then_delete_is_idempotent() {
        let (_dir, store) = make_store();
        let (vocab, issues) = store.create("Fruits", "🍎", "apple,苹果\npear,梨").unwrap();
        assert!(issues.is_empty());
        assert_eq!(store.all().len(), 1);
        assert_eq!(store.get(&vocab.id).unwrap().words.len(), 2);

        assert!(store.delete(&vocab.id).unwrap());
        assert!(store.all().is_empty());
        assert!(!store.delete(&vocab.id).unwrap());
        assert!(!store.delete("cv-nope").unwrap());
        assert!(store.all().is_empty());
    }

    #[test]
    fn create_rejects_empty_name_and_empty_words() {
        let (_dir, store) = make_store();
        let err = store.create("  ", "", "a,b").unwrap_err();
        assert_eq!(
            err.downcast_ref::<CustomVocabError>(),
            Some(&CustomVocabError::EmptyName)
        );
        let err = store.create("Empty", "", "no separators here").unwrap_err();
        assert_eq!(
            err.downcast_ref::<CustomVocabError>(),
            Some(&CustomVocabError::NoWords)
        );
        assert!(store.all().is_empty());
    }

    #[test]
    fn default_emoji_and_timestamp_format() {
        let (_dir, store) = make_store();
        let (vocab, _) = store.create("Verbs", " ", "run,跑").unwrap();
        assert_eq!(vocab.emoji, "📒");
        let raw: serde_json::Value = store.storage.get(CUSTOM_VOCABULARIES_KEY).unwrap();
        assert!(raw[0]["createdAt"].is_i64());
        assert_eq!(raw[0]["words"][0]["word"], "run");
    }

    #[test]
    fn set_word_status_updates_only_target() {
        let (_dir, store) = make_store();
        let (vocab, _) = store.create("Fruits", "🍎", "apple,苹果\npear,梨").unwrap();
        let target = vocab.words[1].id.clone();
        assert!(store.set_word_status(&vocab.id, &target, WordStatus::Known).unwrap());
        assert!(!store.set_word_status(&vocab.id, "missing", WordStatus::Known).unwrap());

        let words = store.get(&vocab.id).unwrap().to_words();
        assert_eq!(words[0].status, WordStatus::Unmarked);
        assert_eq!(words[1].status, WordStatus::Known);
        assert_eq!(words[1].id, WordId::Text(target));
    }
}
