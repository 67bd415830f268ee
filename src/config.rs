//! Configuration management for diarist.
//!
//! Configuration is loaded from `~/.config/diarist/config.toml`. Every field
//! has a default, so the file is optional.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote service settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Persona registered with the service at startup.
    #[serde(default)]
    pub assistant: AssistantConfig,
    /// Where diary entries are written.
    #[serde(default)]
    pub diary: DiaryConfig,
}

/// Settings for the hosted Assistants API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Model backing the assistant (default: gpt-4o).
    #[serde(default = "default_model")]
    pub model: String,
    /// Service endpoint (default: the hosted OpenAI API).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API key (prefer OPENAI_API_KEY env var).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Delay between run status polls, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_poll_interval_ms() -> u64 {
    1000
}

/// The persona the service speaks as.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Display name of the persona.
    #[serde(default = "default_assistant_name")]
    pub name: String,
    /// Instructions that shape the persona's voice.
    #[serde(default = "default_instructions")]
    pub instructions: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: default_assistant_name(),
            instructions: default_instructions(),
        }
    }
}

fn default_assistant_name() -> String {
    "Reflective Diary Companion".to_string()
}

fn default_instructions() -> String {
    r#"You are a thoughtful and empathetic journal companion.
Listen to the user's experiences, emotions, and reflections.
Respond in a way that encourages deeper reflection and understanding.
When summarizing, structure it in a diary format with a meaningful title."#
        .to_string()
}

/// Diary output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiaryConfig {
    /// Directory for dated summary files (default: ./diary).
    #[serde(default = "default_diary_dir")]
    pub dir: PathBuf,
}

impl Default for DiaryConfig {
    fn default() -> Self {
        Self {
            dir: default_diary_dir(),
        }
    }
}

fn default_diary_dir() -> PathBuf {
    PathBuf::from("./diary")
}

impl Config {
    /// Get the config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("diarist"))
            .context("Could not determine config directory")
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, using defaults if not found.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// API key from the config file, falling back to the environment.
    pub fn api_key(&self) -> Result<String> {
        self.api
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                anyhow!(
                    "OpenAI API key not found. Set OPENAI_API_KEY environment variable \
                     or add api_key to the config file."
                )
            })
    }

    /// Delay between run status polls.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.api.poll_interval_ms)
    }
}
