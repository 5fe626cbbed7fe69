//! Configuration management with validation and defaults
//!
//! Defaults match the classic game: 30 second rounds, an auto-derived reveal
//! fraction and a `!` command prefix. A TOML file and `SKRIBBL_*`
//! environment variables can override any of them.

use crate::errors::{ConfigurationError, SkribblResult};
use crate::game::types::{GameSettings, WordCard};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete bot configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkribblConfig {
    pub game: GameDefaults,
    pub engine: EngineConfig,
    pub bot: BotConfig,
    pub words: Vec<WordEntry>,
}

/// Round defaults used when a command does not override them
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameDefaults {
    pub duration_secs: f64,
    /// Fraction of letters to reveal; derived from the word length when unset
    pub reveal_fraction: Option<f64>,
}

impl Default for GameDefaults {
    fn default() -> Self {
        Self {
            duration_secs: 30.0,
            reveal_fraction: None,
        }
    }
}

/// How non-alphabetic characters appear in the masked word
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Replaced by a wide blank so word gaps stay visible
    #[default]
    Blank,
    /// Shown as-is
    Verbatim,
}

/// Engine timing and rendering knobs
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on how long the guess listener blocks per wait
    pub poll_interval_ms: u64,
    pub announce_interval_secs: u64,
    pub hidden_glyph: String,
    pub render_mode: RenderMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            announce_interval_secs: 10,
            hidden_glyph: "⬛ ".to_string(),
            render_mode: RenderMode::Blank,
        }
    }
}

impl EngineConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Command surface settings
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub command_prefix: String,
    pub name: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_prefix: "!".to_string(),
            name: "skribbl".to_string(),
        }
    }
}

/// One picture/word pair in the catalog
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordEntry {
    pub image: PathBuf,
    pub word: String,
}

impl From<&WordEntry> for WordCard {
    fn from(entry: &WordEntry) -> Self {
        WordCard::new(entry.image.clone(), entry.word.clone())
    }
}

impl SkribblConfig {
    /// Catalog used when the config file has no `[[words]]` entries
    pub fn default_words() -> Vec<WordEntry> {
        vec![WordEntry {
            image: PathBuf::from("images/image.png"),
            word: "example word".to_string(),
        }]
    }

    /// Game settings for one round, applying command overrides on top of defaults
    pub fn game_settings(
        &self,
        duration_secs: Option<f64>,
        reveal_fraction: Option<f64>,
    ) -> SkribblResult<GameSettings> {
        let settings = GameSettings {
            total_duration_secs: duration_secs.unwrap_or(self.game.duration_secs),
            reveal_fraction: reveal_fraction.or(self.game.reveal_fraction),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration for logical consistency
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        GameSettings {
            total_duration_secs: self.game.duration_secs,
            reveal_fraction: self.game.reveal_fraction,
        }
        .validate()?;

        if self.engine.poll_interval_ms == 0 {
            return Err(ConfigurationError::ValidationFailed(
                "engine.poll_interval_ms must be > 0".to_string(),
            ));
        }

        if self.engine.announce_interval_secs == 0 {
            return Err(ConfigurationError::ValidationFailed(
                "engine.announce_interval_secs must be > 0".to_string(),
            ));
        }

        if self.bot.command_prefix.trim().is_empty() {
            return Err(ConfigurationError::ValidationFailed(
                "bot.command_prefix must not be empty".to_string(),
            ));
        }

        if self.words.is_empty() {
            return Err(ConfigurationError::ValidationFailed(
                "at least one [[words]] entry is required".to_string(),
            ));
        }

        if let Some(entry) = self.words.iter().find(|entry| entry.word.trim().is_empty()) {
            return Err(ConfigurationError::InvalidValue {
                field: "words.word".to_string(),
                value: entry.word.clone(),
                reason: format!("blank word for image {}", entry.image.display()),
            });
        }

        Ok(())
    }
}

/// Configuration loader with environment variable support
#[derive(Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> SkribblResult<SkribblConfig> {
        let mut config = match &self.config_path {
            Some(path) => Self::load_from_file(path)?,
            None => SkribblConfig::default(),
        };

        if config.words.is_empty() {
            config.words = SkribblConfig::default_words();
        }

        Self::apply_env_overrides(&mut config)?;
        config.validate()?;

        Ok(config)
    }

    fn load_from_file(path: &Path) -> SkribblResult<SkribblConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Ok(toml::from_str(&content)?)
    }

    fn apply_env_overrides(config: &mut SkribblConfig) -> Result<(), ConfigurationError> {
        if let Some(duration) = Self::env_parse::<f64>("SKRIBBL_DURATION_SECS")? {
            config.game.duration_secs = duration;
        }
        if let Some(fraction) = Self::env_parse::<f64>("SKRIBBL_REVEAL_FRACTION")? {
            config.game.reveal_fraction = Some(fraction);
        }
        if let Some(poll) = Self::env_parse::<u64>("SKRIBBL_POLL_INTERVAL_MS")? {
            config.engine.poll_interval_ms = poll;
        }
        if let Ok(prefix) = env::var("SKRIBBL_COMMAND_PREFIX") {
            config.bot.command_prefix = prefix;
        }

        Ok(())
    }

    fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigurationError> {
        match env::var(key) {
            Ok(value) => value
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| ConfigurationError::InvalidValue {
                    field: key.to_string(),
                    value,
                    reason: "could not be parsed".to_string(),
                }),
            Err(_) => Ok(None),
        }
    }
}
