pub mod book;
pub mod word;

pub use word::{Word, WordId, WordStatus};
