use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timing and player-count settings for a single game.
///
/// Every value is required; nothing is defaulted. Durations are whole seconds.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct GameSettings {
    /// Advisory upper bound on the number of players.
    #[serde(rename = "MAX_PLAYERS")]
    pub max_players: u64,
    /// The game is cancelled if fewer players have joined once the wait window closes.
    #[serde(rename = "MIN_PLAYERS")]
    pub min_players: u64,
    /// Length of the join window.
    #[serde(rename = "WAIT_TIME")]
    pub wait_time: u64,
    /// Interval at which newly joined players are announced during the join window.
    #[serde(rename = "NOTIFY_TIME")]
    pub notify_time: u64,
    #[serde(rename = "NIGHT_TIME")]
    pub night_time: u64,
    #[serde(rename = "DAY_TIME")]
    pub day_time: u64,
    #[serde(rename = "LYNCH_TIME")]
    pub lynch_time: u64,
}

const KEYS: [&str; 7] = [
    "MAX_PLAYERS",
    "MIN_PLAYERS",
    "WAIT_TIME",
    "NOTIFY_TIME",
    "NIGHT_TIME",
    "DAY_TIME",
    "LYNCH_TIME",
];

impl GameSettings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self, GameError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the settings through `lookup`, which maps a setting name to its raw value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GameError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut values = [0u64; 7];
        for (value, name) in values.iter_mut().zip(KEYS) {
            let raw = lookup(name).ok_or(GameError::MissingSetting(name))?;
            *value = parse_setting(name, &raw)?;
        }
        let [max_players, min_players, wait_time, notify_time, night_time, day_time, lynch_time] =
            values;
        let settings = Self {
            max_players,
            min_players,
            wait_time,
            notify_time,
            night_time,
            day_time,
            lynch_time,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that every value is positive and the player range is not inverted.
    pub fn validate(&self) -> Result<(), GameError> {
        for (name, value) in KEYS.into_iter().zip(self.values()) {
            if value == 0 {
                return Err(GameError::InvalidSetting {
                    name,
                    value: value.to_string(),
                });
            }
        }
        if self.min_players > self.max_players {
            return Err(GameError::InvalidPlayerRange {
                min: self.min_players,
                max: self.max_players,
            });
        }
        Ok(())
    }

    /// Gets the length of the given phase.
    pub fn phase_duration(&self, phase: super::Phase) -> Duration {
        use super::Phase::*;
        Duration::from_secs(match phase {
            Night => self.night_time,
            Day => self.day_time,
            Lynch => self.lynch_time,
        })
    }

    fn values(&self) -> [u64; 7] {
        [
            self.max_players,
            self.min_players,
            self.wait_time,
            self.notify_time,
            self.night_time,
            self.day_time,
            self.lynch_time,
        ]
    }
}

fn parse_setting(name: &'static str, raw: &str) -> Result<u64, GameError> {
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(GameError::InvalidSetting {
            name,
            value: raw.to_string(),
        }),
    }
}
