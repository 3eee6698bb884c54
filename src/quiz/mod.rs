pub mod misspell;
pub mod question;

pub use question::{Question, generate_questions};
