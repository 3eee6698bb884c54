use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Remote and bundled words carry a numeric id; custom words carry a generated string id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WordId {
    Num(i64),
    Text(String),
}

impl WordId {
    pub fn as_num(&self) -> Option<i64> {
        match self {
            WordId::Num(n) => Some(*n),
            WordId::Text(_) => None,
        }
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordId::Num(n) => write!(f, "{n}"),
            WordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for WordId {
    fn from(n: i64) -> Self {
        WordId::Num(n)
    }
}

impl From<&str> for WordId {
    fn from(s: &str) -> Self {
        WordId::Text(s.to_string())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordStatus {
    #[default]
    Unmarked,
    Known,
    Unknown,
}

impl WordStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            WordStatus::Unmarked => "unmarked",
            WordStatus::Known => "known",
            WordStatus::Unknown => "unknown",
        }
    }

    /// Pressing the same mark twice clears it.
    pub fn toggled(self, target: WordStatus) -> WordStatus {
        if self == target {
            WordStatus::Unmarked
        } else {
            target
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: WordId,
    pub word: String,
    pub meaning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_cn: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: WordStatus,
    #[serde(default)]
    pub mistakes: Vec<NaiveDate>,
}

impl Word {
    pub fn new(id: impl Into<WordId>, word: &str, meaning: &str) -> Self {
        Self {
            id: id.into(),
            word: word.to_string(),
            meaning: meaning.to_string(),
            example: None,
            example_cn: None,
            tags: Vec::new(),
            status: WordStatus::Unmarked,
            mistakes: Vec::new(),
        }
    }

    pub fn error_count(&self) -> usize {
        self.mistakes.len()
    }
}

/// Words matching `status`, or all words when `status` is `None`.
pub fn filter_by_status(words: &[Word], status: Option<WordStatus>) -> Vec<&Word> {
    words
        .iter()
        .filter(|w| status.is_none_or(|s| w.status == s))
        .collect()
}
