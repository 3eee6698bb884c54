use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub const MIN_CHALLENGE_SIZE: usize = 1;
pub const MAX_CHALLENGE_SIZE: usize = 100;
/// UI locales with a translation file under `locales/`.
pub const LANGUAGES: [&str; 2] = ["en", "zh-CN"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Remote API root. Remote stores are disabled when unset.
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default = "default_challenge_size")]
    pub challenge_size: usize,
    #[serde(default = "default_speech_enabled")]
    pub speech_enabled: bool,
    #[serde(default = "default_speech_command")]
    pub speech_command: String,
    #[serde(default = "default_book")]
    pub default_book: String,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_challenge_size() -> usize {
    20
}
fn default_speech_enabled() -> bool {
    false
}
fn default_speech_command() -> String {
    "espeak".to_string()
}
fn default_book() -> String {
    "daily-basics".to_string()
}
fn default_language() -> String {
    "en".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            api_base_url: None,
            challenge_size: default_challenge_size(),
            speech_enabled: default_speech_enabled(),
            speech_command: default_speech_command(),
            default_book: default_book(),
            language: default_language(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vocabdr")
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Clamp out-of-range values and drop a blank API url.
    pub fn validate(&mut self) {
        self.challenge_size = self
            .challenge_size
            .clamp(MIN_CHALLENGE_SIZE, MAX_CHALLENGE_SIZE);
        if self
            .api_base_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            self.api_base_url = None;
        }
        if self.speech_command.trim().is_empty() {
            self.speech_command = default_speech_command();
        }
        if !LANGUAGES.contains(&self.language.as_str()) {
            log::warn!("unsupported language {:?}, using en", self.language);
            self.language = default_language();
        }
    }
}
