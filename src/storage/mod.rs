//! Where games and scores live between messages.

use tracing::info;

use crate::{
    config::{StorageBackend, StorageConfig},
    ids::{ChannelId, PlayerId, ServerId},
    wordle::{record::GameRecord, stats::UserScoreRecord},
};

mod json;
pub use json::JsonStorage;

mod memory;
pub use memory::MemoryStorage;

#[cfg(feature = "mongodb")]
mod mongodb;
#[cfg(feature = "mongodb")]
pub use self::mongodb::MongoStorage;

/// One stored score, with who it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub server: ServerId,
    pub player: PlayerId,
    pub score: UserScoreRecord,
}

#[allow(async_fn_in_trait)]
pub trait Storage {
    async fn load_game(
        &self,
        server: &ServerId,
        channel: &ChannelId,
    ) -> Result<Option<GameRecord>, StorageError>;

    async fn save_game(
        &self,
        server: &ServerId,
        channel: &ChannelId,
        game: &GameRecord,
    ) -> Result<(), StorageError>;

    async fn delete_game(&self, server: &ServerId, channel: &ChannelId)
        -> Result<(), StorageError>;

    /// A player with nothing stored gets a zeroed record.
    async fn load_score(
        &self,
        server: &ServerId,
        player: &PlayerId,
    ) -> Result<UserScoreRecord, StorageError>;

    async fn save_score(
        &self,
        server: &ServerId,
        player: &PlayerId,
        score: &UserScoreRecord,
    ) -> Result<(), StorageError>;

    async fn server_scores(&self, server: &ServerId) -> Result<Vec<ScoreEntry>, StorageError>;

    async fn all_scores(&self) -> Result<Vec<ScoreEntry>, StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("data file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("data file is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stored game for channel {channel} is corrupt: {reason}")]
    CorruptGame { channel: ChannelId, reason: String },

    #[error("storage backend `{0:?}` is not available in this build")]
    Unsupported(StorageBackend),

    #[error("mongodb_url must be set to use the mongodb backend")]
    MissingUrl,

    #[cfg(feature = "mongodb")]
    #[error("error from mongodb: {0}")]
    MongoDb(#[from] ::mongodb::error::Error),

    #[cfg(feature = "mongodb")]
    #[error("could not convert to bson: {0}")]
    BsonSer(#[from] ::mongodb::bson::ser::Error),
}

/// The backend picked in the config file.
#[derive(Debug)]
pub enum AnyStorage {
    Json(JsonStorage),
    Memory(MemoryStorage),
    #[cfg(feature = "mongodb")]
    MongoDb(MongoStorage),
}

impl AnyStorage {
    pub async fn connect(config: &StorageConfig) -> Result<Self, StorageError> {
        info!(backend = ?config.backend, "opening storage");

        match config.backend {
            StorageBackend::Json => Ok(Self::Json(JsonStorage::open(&config.data_dir).await?)),
            StorageBackend::Memory => Ok(Self::Memory(MemoryStorage::new())),
            #[cfg(feature = "mongodb")]
            StorageBackend::MongoDb => {
                let url = config.mongodb_url.as_deref().ok_or(StorageError::MissingUrl)?;
                Ok(Self::MongoDb(
                    MongoStorage::connect(url, &config.mongodb_database).await?,
                ))
            }
            #[cfg(not(feature = "mongodb"))]
            StorageBackend::MongoDb => Err(StorageError::Unsupported(config.backend)),
        }
    }
}

macro_rules! dispatch {
    ($self:ident.$method:ident($($arg:expr),*)) => {
        match $self {
            Self::Json(storage) => storage.$method($($arg),*).await,
            Self::Memory(storage) => storage.$method($($arg),*).await,
            #[cfg(feature = "mongodb")]
            Self::MongoDb(storage) => storage.$method($($arg),*).await,
        }
    };
}

impl Storage for AnyStorage {
    async fn load_game(
        &self,
        server: &ServerId,
        channel: &ChannelId,
    ) -> Result<Option<GameRecord>, StorageError> {
        dispatch!(self.load_game(server, channel))
    }

    async fn save_game(
        &self,
        server: &ServerId,
        channel: &ChannelId,
        game: &GameRecord,
    ) -> Result<(), StorageError> {
        dispatch!(self.save_game(server, channel, game))
    }

    async fn delete_game(
        &self,
        server: &ServerId,
        channel: &ChannelId,
    ) -> Result<(), StorageError> {
        dispatch!(self.delete_game(server, channel))
    }

    async fn load_score(
        &self,
        server: &ServerId,
        player: &PlayerId,
    ) -> Result<UserScoreRecord, StorageError> {
        dispatch!(self.load_score(server, player))
    }

    async fn save_score(
        &self,
        server: &ServerId,
        player: &PlayerId,
        score: &UserScoreRecord,
    ) -> Result<(), StorageError> {
        dispatch!(self.save_score(server, player, score))
    }

    async fn server_scores(&self, server: &ServerId) -> Result<Vec<ScoreEntry>, StorageError> {
        dispatch!(self.server_scores(server))
    }

    async fn all_scores(&self) -> Result<Vec<ScoreEntry>, StorageError> {
        dispatch!(self.all_scores())
    }
}
