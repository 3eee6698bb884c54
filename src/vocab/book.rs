use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::vocab::word::Word;

#[derive(Embed)]
#[folder = "assets/books/"]
struct BookAssets;

/// A vocabulary book shipped with the binary.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    pub category: String,
    pub subcategory: String,
    pub words: Vec<Word>,
}

pub struct BookCatalog {
    books: Vec<Book>,
}

impl BookCatalog {
    pub fn load() -> Self {
        let mut books: Vec<Book> = BookAssets::iter()
            .filter(|name| name.ends_with(".json"))
            .filter_map(|name| {
                let file = BookAssets::get(&name)?;
                match serde_json::from_slice::<Book>(file.data.as_ref()) {
                    Ok(book) => Some(book),
                    Err(e) => {
                        log::warn!("skipping bundled book {name}: {e}");
                        None
                    }
                }
            })
            .collect();
        books.sort_by(|a, b| a.name.cmp(&b.name));
        Self { books }
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_books_parse_and_have_numeric_ids() {
        let catalog = BookCatalog::load();
        assert!(!catalog.books().is_empty());
        for book in catalog.books() {
            assert!(!book.words.is_empty(), "{} has no words", book.id);
            for word in &book.words {
                assert!(word.id.as_num().is_some(), "{}: {}", book.id, word.word);
                assert!(!word.meaning.is_empty());
            }
        }
    }

    #[test]
    fn get_by_id() {
        let catalog = BookCatalog::load();
        assert!(catalog.get("daily-basics").is_some());
        assert!(catalog.get("missing").is_none());
    }
}
