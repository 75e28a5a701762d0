use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use speech::SpeechConfig;
use thiserror::Error;
use tracing::debug;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "gemspeak.toml";
pub const FETCH_VAR: &str = "GEMINI_FETCH";

const DEFAULT_FETCH_COMMAND: &str = "npx gemini-fetch";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub speech: SpeechConfig,
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Program and leading arguments; the URL is appended.
    pub command: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            command: DEFAULT_FETCH_COMMAND.to_string(),
        }
    }
}

impl Config {
    /// Load `explicit`, else `gemspeak.toml` if present, else defaults; then
    /// apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::read(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::read(fallback)?
                } else {
                    Config::default()
                }
            }
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "reading config");
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `PLAY`, `TTS`, `PAUSE` and `GEMINI_FETCH` replace configured commands.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        self.speech.apply_overrides(&lookup);
        if let Some(command) = lookup(FETCH_VAR).filter(|c| !c.trim().is_empty()) {
            self.fetch.command = command;
        }
    }
}
