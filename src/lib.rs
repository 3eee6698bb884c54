// Library target for benchmarks and integration tests.
// The binary entry point is main.rs; this file re-declares the module tree so
// that harnesses can import types via `vocabdr::quiz::*` / `vocabdr::store::*`.
// Most UI code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

rust_i18n::i18n!("locales", fallback = "en");

pub mod quiz;
pub mod session;
pub mod store;
pub mod vocab;

// Private: required transitively by the public modules' tests and app wiring
mod api;
mod app;
mod config;
mod event;
mod speech;
mod ui;
