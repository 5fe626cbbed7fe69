use crate::common::types::User;
use crate::errors::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Terminal outcome of a game, produced exactly once
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GameResult {
    Winner { user: User },
    RevealCapReached,
    TimedOut,
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Winner { user } => write!(f, "winner({})", user.name),
            GameResult::RevealCapReached => write!(f, "reveal_cap_reached"),
            GameResult::TimedOut => write!(f, "timed_out"),
        }
    }
}

/// Shortest accepted round, in seconds
pub const MIN_DURATION_SECS: f64 = 0.001;

/// Longest accepted round, in seconds
pub const MAX_DURATION_SECS: f64 = 86_400.0;

/// Per-round settings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GameSettings {
    pub total_duration_secs: f64,
    /// Fraction of letters to reveal; derived from the word length when `None`
    pub reveal_fraction: Option<f64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            total_duration_secs: 30.0,
            reveal_fraction: None,
        }
    }
}

impl GameSettings {
    pub fn new(total_duration_secs: f64, reveal_fraction: Option<f64>) -> Self {
        Self {
            total_duration_secs,
            reveal_fraction,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let duration = self.total_duration_secs;
        if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&duration) {
            return Err(ConfigurationError::InvalidValue {
                field: "duration".to_string(),
                value: duration.to_string(),
                reason: format!(
                    "must be between {} and {} seconds",
                    MIN_DURATION_SECS, MAX_DURATION_SECS
                ),
            });
        }

        if let Some(fraction) = self.reveal_fraction {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(ConfigurationError::InvalidValue {
                    field: "reveal_fraction".to_string(),
                    value: fraction.to_string(),
                    reason: "must be in (0, 1]".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Picture and secret word for one game
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordCard {
    pub image: PathBuf,
    pub word: String,
}

impl WordCard {
    pub fn new(image: impl Into<PathBuf>, word: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            word: word.into(),
        }
    }
}

/// Summary returned once a game has finished
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameReport {
    pub game_id: String,
    pub word: String,
    pub result: GameResult,
    pub reveals: usize,
    pub hidden_remaining: usize,
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(secs.max(0.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_validation() {
        assert!(GameSettings::default().validate().is_ok());
        assert!(GameSettings::new(0.0, None).validate().is_err());
        assert!(GameSettings::new(f64::NAN, None).validate().is_err());
        assert!(GameSettings::new(10.0, Some(0.0)).validate().is_err());
        assert!(GameSettings::new(10.0, Some(1.01)).validate().is_err());
        assert!(GameSettings::new(10.0, Some(1.0)).validate().is_ok());
    }

    #[test]
    fn test_duration_bounds() {
        assert!(GameSettings::new(1e20, None).validate().is_err());
        assert!(GameSettings::new(f64::INFINITY, None).validate().is_err());
        assert!(GameSettings::new(MAX_DURATION_SECS + 1.0, None).validate().is_err());
        assert!(GameSettings::new(1e-12, None).validate().is_err());
        assert!(GameSettings::new(-5.0, None).validate().is_err());

        assert!(GameSettings::new(MAX_DURATION_SECS, None).validate().is_ok());
        assert!(GameSettings::new(MIN_DURATION_SECS, None).validate().is_ok());
    }

    #[test]
    fn test_report_serializes_outcome_tag() {
        let report = GameReport {
            game_id: "g-1".to_string(),
            word: "cat".to_string(),
            result: GameResult::Winner {
                user: User::new(5, "ada"),
            },
            reveals: 1,
            hidden_remaining: 2,
            elapsed: Duration::from_millis(1500),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["result"]["outcome"], "winner");
        assert_eq!(json["result"]["user"]["name"], "ada");
        assert_eq!(json["elapsed"], 1.5);
    }
}
