use std::collections::BTreeMap;

use anyhow::Result;

use crate::store::local::LocalStorage;
use crate::store::schema::WORD_STATUSES_KEY;
use crate::vocab::{Word, WordStatus};

/// Local known/unknown marks for numerically identified words.
pub struct WordStatuses {
    storage: LocalStorage,
}

impl WordStatuses {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn map(&self) -> BTreeMap<i64, WordStatus> {
        self.storage.get_or_default(WORD_STATUSES_KEY)
    }

    pub fn status(&self, id: i64) -> WordStatus {
        self.map().get(&id).copied().unwrap_or_default()
    }

    /// Unmarked entries are dropped rather than stored.
    pub fn set(&self, id: i64, status: WordStatus) -> Result<()> {
        let mut map = self.map();
        if status == WordStatus::Unmarked {
            map.remove(&id);
        } else {
            map.insert(id, status);
        }
        self.storage.set(WORD_STATUSES_KEY, &map)
    }

    /// Overlay stored marks onto `words`. Words without a numeric id are left alone.
    pub fn apply(&self, words: &mut [Word]) {
        let map = self.map();
        for word in words.iter_mut() {
            if let Some(id) = word.id.as_num() {
                word.status = map.get(&id).copied().unwrap_or_default();
            }
        }
    }
}
