use anyhow::{Result, bail};

use crate::store::local::LocalStorage;
use crate::store::schema::TIMER_DURATION_KEY;

pub const TIMER_CHOICES: [u32; 5] = [10, 15, 20, 25, 30];
pub const DEFAULT_TIMER_SECS: u32 = 10;

/// Challenge countdown length, persisted under its own storage key.
pub struct ChallengeSettings {
    storage: LocalStorage,
}

impl ChallengeSettings {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn timer_duration(&self) -> u32 {
        match self.storage.get::<u32>(TIMER_DURATION_KEY) {
            Some(secs) if TIMER_CHOICES.contains(&secs) => secs,
            Some(secs) => {
                log::warn!("ignoring unsupported timer duration {secs}s");
                DEFAULT_TIMER_SECS
            }
            None => DEFAULT_TIMER_SECS,
        }
    }

    pub fn set_timer_duration(&self, secs: u32) -> Result<()> {
        if !TIMER_CHOICES.contains(&secs) {
            bail!("timer duration must be one of {TIMER_CHOICES:?}, got {secs}");
        }
        self.storage.set(TIMER_DURATION_KEY, &secs)
    }

    /// Step to the next (or previous) allowed duration, wrapping around.
    pub fn cycle_timer_duration(&self, forward: bool) -> Result<u32> {
        let current = self.timer_duration();
        let idx = TIMER_CHOICES
            .iter()
            .position(|&s| s == current)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % TIMER_CHOICES.len()
        } else if idx == 0 {
            TIMER_CHOICES.len() - 1
        } else {
            idx - 1
        };
        let secs = TIMER_CHOICES[next];
        self.set_timer_duration(secs)?;
        Ok(secs)
    }
}
