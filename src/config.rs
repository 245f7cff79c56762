use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, instrument};

/// Settings read from the TOML file, overridden by `WORDLE_CORNER__*`
/// environment variables (`WORDLE_CORNER__STORAGE__BACKEND=memory`).
#[derive(Deserialize, Debug, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub words: WordsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logs: LogsConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
}

impl AppConfig {
    pub const ENV_PREFIX: &'static str = "WORDLE_CORNER";
    pub const DEFAULT_FILE: &'static str = "wordle-corner.toml";

    /// Without an explicit path, `wordle-corner.toml` in the working
    /// directory is used if it exists.
    #[instrument(name = "config")]
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let file = match path {
            Some(path) => ::config::File::from(path).format(::config::FileFormat::Toml),
            None => ::config::File::new(Self::DEFAULT_FILE, ::config::FileFormat::Toml)
                .required(false),
        };

        let config: Self = ::config::Config::builder()
            .add_source(file)
            .add_source(::config::Environment::with_prefix(Self::ENV_PREFIX).separator("__"))
            .build()
            .map_err(Error::Read)?
            .try_deserialize()
            .map_err(Error::Parse)?;

        debug!(?config, "loaded config");
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("file read error: {0}")]
    Read(::config::ConfigError),

    #[error("parsing error: {0}")]
    Parse(::config::ConfigError),
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct WordsConfig {
    pub answers: PathBuf,
    pub guesses: PathBuf,
}

impl Default for WordsConfig {
    fn default() -> Self {
        Self {
            answers: PathBuf::from("words/answers.txt"),
            guesses: PathBuf::from("words/guesses.txt"),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Json,
    Memory,
    MongoDb,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory holding `games.json` and `scores.json`.
    pub data_dir: PathBuf,
    pub mongodb_url: Option<String>,
    pub mongodb_database: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            data_dir: PathBuf::from("data"),
            mongodb_url: None,
            mongodb_database: "wordle_corner".to_owned(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LogsConfig {
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogsConfig {
    fn default() -> Self {
        Self {
            filter: "wordle_corner=info".to_owned(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(default)]
pub struct LeaderboardConfig {
    pub server_limit: usize,
    pub global_limit: usize,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            server_limit: 5,
            global_limit: 10,
        }
    }
}
