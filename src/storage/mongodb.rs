use mongodb::{
    bson::{doc, from_document, to_document, Document},
    options::{ClientOptions, ReplaceOptions},
    Client, Collection,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{
    ids::{ChannelId, PlayerId, ServerId},
    wordle::{record::GameRecord, stats::UserScoreRecord},
};

use super::{ScoreEntry, Storage, StorageError};

/// Games and scores in two collections, one document per key.
#[derive(Debug, Clone)]
pub struct MongoStorage {
    // raw documents, so a bad game record surfaces as corruption instead of
    // a driver error
    games: Collection<Document>,
    scores: Collection<ScoreDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScoreDocument {
    server: ServerId,
    player: PlayerId,
    score: UserScoreRecord,
}

impl From<ScoreDocument> for ScoreEntry {
    fn from(value: ScoreDocument) -> Self {
        Self {
            server: value.server,
            player: value.player,
            score: value.score,
        }
    }
}

impl MongoStorage {
    #[instrument(skip(url))]
    pub async fn connect(url: &str, database: &str) -> Result<Self, StorageError> {
        let mut options = ClientOptions::parse(url).await?;
        options.app_name = Some("wordle-corner".to_owned());

        let db = Client::with_options(options)?.database(database);
        debug!("connected to mongodb");

        Ok(Self {
            games: db.collection("wordle_games"),
            scores: db.collection("wordle_scores"),
        })
    }

    fn upsert() -> ReplaceOptions {
        ReplaceOptions::builder().upsert(true).build()
    }
}

fn game_filter(server: &ServerId, channel: &ChannelId) -> Document {
    doc! { "server": server.as_str(), "channel": channel.as_str() }
}

fn score_filter(server: &ServerId, player: &PlayerId) -> Document {
    doc! { "server": server.as_str(), "player": player.as_str() }
}

impl Storage for MongoStorage {
    async fn load_game(
        &self,
        server: &ServerId,
        channel: &ChannelId,
    ) -> Result<Option<GameRecord>, StorageError> {
        let Some(document) = self
            .games
            .find_one(game_filter(server, channel), None)
            .await?
        else {
            return Ok(None);
        };

        let corrupt = |reason: String| {
            warn!(%server, %channel, %reason, "unreadable game record");
            StorageError::CorruptGame {
                channel: channel.clone(),
                reason,
            }
        };

        let game = document
            .get_document("game")
            .map_err(|err| corrupt(err.to_string()))?;

        from_document(game.clone())
            .map(Some)
            .map_err(|err| corrupt(err.to_string()))
    }

    async fn save_game(
        &self,
        server: &ServerId,
        channel: &ChannelId,
        game: &GameRecord,
    ) -> Result<(), StorageError> {
        let mut document = game_filter(server, channel);
        document.insert("game", to_document(game)?);

        self.games
            .replace_one(game_filter(server, channel), document, Self::upsert())
            .await?;
        Ok(())
    }

    async fn delete_game(
        &self,
        server: &ServerId,
        channel: &ChannelId,
    ) -> Result<(), StorageError> {
        self.games
            .delete_one(game_filter(server, channel), None)
            .await?;
        Ok(())
    }

    async fn load_score(
        &self,
        server: &ServerId,
        player: &PlayerId,
    ) -> Result<UserScoreRecord, StorageError> {
        Ok(self
            .scores
            .find_one(score_filter(server, player), None)
            .await?
            .map(|document| document.score)
            .unwrap_or_default())
    }

    async fn save_score(
        &self,
        server: &ServerId,
        player: &PlayerId,
        score: &UserScoreRecord,
    ) -> Result<(), StorageError> {
        let document = ScoreDocument {
            server: server.clone(),
            player: player.clone(),
            score: *score,
        };

        self.scores
            .replace_one(score_filter(server, player), document, Self::upsert())
            .await?;
        Ok(())
    }

    async fn server_scores(&self, server: &ServerId) -> Result<Vec<ScoreEntry>, StorageError> {
        let mut cursor = self
            .scores
            .find(doc! { "server": server.as_str() }, None)
            .await?;

        let mut entries = Vec::new();
        while cursor.advance().await? {
            entries.push(cursor.deserialize_current()?.into());
        }
        Ok(entries)
    }

    async fn all_scores(&self) -> Result<Vec<ScoreEntry>, StorageError> {
        let mut cursor = self.scores.find(None, None).await?;

        let mut entries = Vec::new();
        while cursor.advance().await? {
            entries.push(cursor.deserialize_current()?.into());
        }
        Ok(entries)
    }
}
