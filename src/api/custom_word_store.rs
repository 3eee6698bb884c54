use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::http::HttpClient;
use crate::store::custom_vocab::CustomWord;
use crate::vocab::Word;

const LIST_PATH: &str = "/api/customWordCategory/list";
const CREATE_PATH: &str = "/api/customWordCategory/create";
const DELETE_PATH: &str = "/api/customWordCategory/delete";
const ADD_WORDS_PATH: &str = "/api/customWords/add";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCategory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub words: Vec<Word>,
}

/// Server-side custom word categories.
pub struct CustomWordStore {
    client: HttpClient,
    categories: Option<Vec<CustomCategory>>,
}

impl CustomWordStore {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            categories: None,
        }
    }

    pub fn categories(&mut self) -> &[CustomCategory] {
        if self.categories.is_none() {
            let response = self.client.post(LIST_PATH, &json!({}));
            if response.is_success() {
                self.categories = response.data_as::<Vec<CustomCategory>>();
            }
        }
        self.categories.as_deref().unwrap_or(&[])
    }

    pub fn create(&mut self, name: &str, emoji: &str) -> Option<CustomCategory> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let response = self
            .client
            .post(CREATE_PATH, &json!({ "name": name, "emoji": emoji }));
        if !response.is_success() {
            return None;
        }
        let created = response.data_as::<CustomCategory>()?;
        if let Some(categories) = self.categories.as_mut() {
            categories.push(created.clone());
        }
        Some(created)
    }

    pub fn delete(&mut self, id: i64) -> bool {
        let response = self.client.post(DELETE_PATH, &json!({ "id": id }));
        if !response.is_success() {
            return false;
        }
        if let Some(categories) = self.categories.as_mut() {
            categories.retain(|c| c.id != id);
        }
        true
    }

    /// Upload words into a category. The words echoed back by the server are
    /// appended to the cached category.
    pub fn add_words(&mut self, category_id: i64, words: &[CustomWord]) -> bool {
        let payload: Vec<serde_json::Value> = words
            .iter()
            .map(|w| {
                json!({
                    "word": w.word,
                    "meaning": w.meaning,
                    "example": w.example,
                    "exampleCn": w.example_cn,
                })
            })
            .collect();
        let response = self.client.post(
            ADD_WORDS_PATH,
            &json!({ "categoryId": category_id, "words": payload }),
        );
        if !response.is_success() {
            return false;
        }
        let saved = response.data_as::<Vec<Word>>().unwrap_or_default();
        if let Some(category) = self
            .categories
            .as_mut()
            .and_then(|cs| cs.iter_mut().find(|c| c.id == category_id))
        {
            category.words.extend(saved);
        }
        true
    }
}
