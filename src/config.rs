//! Configuration types for the voice command pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration for the rover voice front end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoverConfig {
    /// Streaming recognition settings (wake word, locale).
    pub recognition: RecognitionConfig,
    /// Remote movement service settings.
    pub movements: MovementsConfig,
    /// Spoken confirmation settings.
    pub confirmation: ConfirmationConfig,
    /// Movement history view settings.
    pub history: HistoryConfig,
}

/// Streaming recognition configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    /// Wake word that must prefix any spoken command.
    pub wake_word: String,
    /// BCP 47 locale tag for recognition and spoken confirmations.
    pub locale: String,
    /// Minimum length (characters) of the text after the wake word for it
    /// to count as a command phrase.
    pub min_command_len: usize,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            wake_word: "tony".to_owned(),
            locale: "es-MX".to_owned(),
            min_command_len: crate::gate::MIN_COMMAND_LEN,
        }
    }
}

/// Remote movement service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementsConfig {
    /// Base URL of the movement service API.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_s: u64,
}

impl Default for MovementsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5500/api".to_owned(),
            request_timeout_s: 10,
        }
    }
}

/// Spoken confirmation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmationConfig {
    /// Whether dispatched movements are confirmed aloud.
    pub enabled: bool,
    /// Readiness phrase spoken when listening starts. `{wake}` is
    /// replaced with the configured wake word, capitalized.
    pub readiness_phrase: String,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            readiness_phrase: "Listo. Di {wake} y tu orden.".to_owned(),
        }
    }
}

impl ConfirmationConfig {
    /// Resolve the readiness phrase for a given wake word.
    #[must_use]
    pub fn readiness_for(&self, wake_word: &str) -> String {
        let mut chars = wake_word.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        self.readiness_phrase.replace("{wake}", &capitalized)
    }
}

/// Movement history view configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Poll interval in seconds while the history view is open.
    pub poll_interval_s: u64,
    /// How many recent movements to fetch per poll.
    pub fetch_count: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            poll_interval_s: 2,
            fetch_count: 20,
        }
    }
}

impl RoverConfig {
    /// Load configuration from a TOML file, falling back to defaults for
    /// missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::VoiceError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot
    /// be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::VoiceError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from `path`, writing defaults there first when
    /// the file does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be parsed or the
    /// defaults cannot be written.
    pub fn load_or_init(path: &std::path::Path) -> crate::error::Result<Self> {
        if path.exists() {
            return Self::from_file(path);
        }
        let config = Self::default();
        config.save_to_file(path)?;
        Ok(config)
    }

    /// Default config file path: `config.toml` under the platform config
    /// directory (see [`crate::paths::config_dir`]).
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        crate::paths::config_dir().join("config.toml")
    }
}
