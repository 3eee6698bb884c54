use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::store::local::LocalStorage;
use crate::store::schema::USER_KEY;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub token: String,
}

/// The signed-in user, if any.
pub struct UserSlot {
    storage: LocalStorage,
}

impl UserSlot {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> Option<User> {
        self.storage.get(USER_KEY)
    }

    pub fn save(&self, user: &User) -> Result<()> {
        self.storage.set(USER_KEY, user)
    }

    pub fn clear(&self) -> Result<()> {
        self.storage.remove(USER_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_load_clear() {
        let dir = TempDir::new().unwrap();
        let slot = UserSlot::new(LocalStorage::with_base_dir(dir.path().to_path_buf()).unwrap());
        assert!(slot.load().is_none());

        let user = User {
            id: 3,
            email: "a@b.co".to_string(),
            nickname: "ann".to_string(),
            token: "t0k".to_string(),
        };
        slot.save(&user).unwrap();
        assert_eq!(slot.load(), Some(user));
        slot.clear().unwrap();
        assert!(slot.load().is_none());
    }
}
