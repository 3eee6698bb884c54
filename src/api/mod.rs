pub mod category_store;
pub mod custom_word_store;
pub mod http;
pub mod user_store;
pub mod word_store;

pub use http::HttpClient;
