use serde::{Deserialize, Serialize};

use crate::api::http::HttpClient;

const CATEGORIES_PATH: &str = "/api/wordCategories";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subcategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub word_count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

pub struct CategoryStore {
    client: HttpClient,
    categories: Option<Vec<WordCategory>>,
}

impl CategoryStore {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            categories: None,
        }
    }

    pub fn categories(&mut self) -> &[WordCategory] {
        if self.categories.is_none() {
            let response = self.client.get(CATEGORIES_PATH);
            if response.is_success() {
                self.categories = response.data_as::<Vec<WordCategory>>();
            }
        }
        self.categories.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::http::Method;
    use crate::api::testing::MockTransport;
    use serde_json::json;

    #[test]
    fn categories_use_get_and_cache() {
        let mock = MockTransport::new();
        mock.respond(
            CATEGORIES_PATH,
            json!({"code": 200, "data": [
                {"id": "exam", "name": "Exams", "subcategories": [
                    {"id": "cet4", "name": "CET-4", "wordCount": 4500}
                ]}
            ]}),
        );
        let mut store = CategoryStore::new(mock.client());
        let categories = store.categories();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].subcategories[0].word_count, 4500);
        store.categories();
        assert_eq!(mock.calls_to(CATEGORIES_PATH), 1);
        assert_eq!(mock.last_call_method(CATEGORIES_PATH), Some(Method::Get));
    }

    #[test]
    fn failure_leaves_cache_empty_and_retries_next_time() {
        let mock = MockTransport::new();
        let mut store = CategoryStore::new(mock.client());
        assert!(store.categories().is_empty());
        assert!(store.categories().is_empty());
        assert_eq!(mock.calls_to(CATEGORIES_PATH), 2);
    }
}
