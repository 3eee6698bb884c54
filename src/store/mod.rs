pub mod check_in;
pub mod custom_vocab;
pub mod local;
pub mod mistakes;
pub mod schema;
pub mod settings;
pub mod user;
pub mod word_status;

pub use local::LocalStorage;
