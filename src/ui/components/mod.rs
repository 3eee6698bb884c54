pub mod dashboard;
pub mod menu;
pub mod progress_bar;
pub mod question_card;
pub mod week_strip;
pub mod word_list;
