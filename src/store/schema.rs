use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const CHECK_IN_KEY: &str = "vocabulary_check_in";
pub const MISTAKES_KEY: &str = "vocabulary_mistakes";
pub const CUSTOM_VOCABULARIES_KEY: &str = "custom_vocabularies";
pub const WORD_STATUSES_KEY: &str = "vocabulary_word_statuses";
pub const TIMER_DURATION_KEY: &str = "challenge_timer_duration";
pub const USER_KEY: &str = "user";

/// Every key owned by local storage, in export order.
pub const ALL_KEYS: [&str; 6] = [
    CHECK_IN_KEY,
    MISTAKES_KEY,
    CUSTOM_VOCABULARIES_KEY,
    WORD_STATUSES_KEY,
    TIMER_DURATION_KEY,
    USER_KEY,
];

pub const EXPORT_VERSION: u32 = 1;

/// Backup document. Keys missing from `entries` are absent in the exported store
/// and are removed on import.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExportData {
    pub vocabdr_export_version: u32,
    pub exported_at: DateTime<Utc>,
    pub entries: BTreeMap<String, serde_json::Value>,
}
