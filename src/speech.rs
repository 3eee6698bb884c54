use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("speech is disabled")]
    Disabled,

    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Reads text aloud. A new utterance cancels the one still playing.
pub trait Speaker: Send + Sync {
    fn speak(&self, text: &str, lang: &str) -> Result<(), SpeechError>;
    fn stop(&self);
}

/// Shells out to an espeak-compatible program (`<cmd> -v <lang> <text>`).
pub struct CommandSpeaker {
    command: String,
    rate: u32,
    current: Mutex<Option<Child>>,
}

impl CommandSpeaker {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            // slightly slower than espeak's 175 wpm default
            rate: 150,
            current: Mutex::new(None),
        }
    }

    fn voice(lang: &str) -> &str {
        match lang {
            "en-US" | "en" => "en-us",
            "zh-CN" | "zh" => "cmn",
            other => other,
        }
    }
}

impl Speaker for CommandSpeaker {
    fn speak(&self, text: &str, lang: &str) -> Result<(), SpeechError> {
        self.stop();
        let child = Command::new(&self.command)
            .arg("-v")
            .arg(Self::voice(lang))
            .arg("-s")
            .arg(self.rate.to_string())
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                command: self.command.clone(),
                source,
            })?;
        if let Ok(mut current) = self.current.lock() {
            *current = Some(child);
        }
        Ok(())
    }

    fn stop(&self) {
        let Ok(mut current) = self.current.lock() else {
            return;
        };
        if let Some(mut child) = current.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for CommandSpeaker {
    fn drop(&mut self) {
        self.stop();
    }
}

pub struct NullSpeaker;

impl Speaker for NullSpeaker {
    fn speak(&self, _text: &str, _lang: &str) -> Result<(), SpeechError> {
        Err(SpeechError::Disabled)
    }

    fn stop(&self) {}
}

pub fn speaker_from_config(enabled: bool, command: &str) -> Box<dyn Speaker> {
    if enabled {
        Box::new(CommandSpeaker::new(command))
    } else {
        Box::new(NullSpeaker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_reports_spawn_error() {
        let speaker = CommandSpeaker::new("vocabdr-no-such-speech-program");
        let err = speaker.speak("apple", "en-US").unwrap_err();
        assert!(matches!(err, SpeechError::Spawn { .. }));
    }

    #[test]
    fn null_speaker_is_disabled() {
        assert!(matches!(
            NullSpeaker.speak("apple", "en-US"),
            Err(SpeechError::Disabled)
        ));
    }

    #[test]
    fn voice_mapping() {
        assert_eq!(CommandSpeaker::voice("en-US"), "en-us");
        assert_eq!(CommandSpeaker::voice("fr"), "fr");
    }
}
