use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::{
    ids::{ChannelId, PlayerId, ServerId},
    wordle::{record::GameRecord, stats::UserScoreRecord},
};

use super::{ScoreEntry, Storage, StorageError};

/// Keeps everything in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    games: RwLock<BTreeMap<(ServerId, ChannelId), GameRecord>>,
    scores: RwLock<BTreeMap<ServerId, BTreeMap<PlayerId, UserScoreRecord>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    async fn load_game(
        &self,
        server: &ServerId,
        channel: &ChannelId,
    ) -> Result<Option<GameRecord>, StorageError> {
        let guard = self.games.read().await;
        Ok(guard.get(&(server.clone(), channel.clone())).cloned())
    }

    async fn save_game(
        &self,
        server: &ServerId,
        channel: &ChannelId,
        game: &GameRecord,
    ) -> Result<(), StorageError> {
        let mut guard = self.games.write().await;
        guard.insert((server.clone(), channel.clone()), game.clone());
        Ok(())
    }

    async fn delete_game(
        &self,
        server: &ServerId,
        channel: &ChannelId,
    ) -> Result<(), StorageError> {
        let mut guard = self.games.write().await;
        guard.remove(&(server.clone(), channel.clone()));
        Ok(())
    }

    async fn load_score(
        &self,
        server: &ServerId,
        player: &PlayerId,
    ) -> Result<UserScoreRecord, StorageError> {
        let guard = self.scores.read().await;
        Ok(guard
            .get(server)
            .and_then(|players| players.get(player))
            .copied()
            .unwrap_or_default())
    }

    async fn save_score(
        &self,
        server: &ServerId,
        player: &PlayerId,
        score: &UserScoreRecord,
    ) -> Result<(), StorageError> {
        let mut guard = self.scores.write().await;
        guard
            .entry(server.clone())
            .or_default()
            .insert(player.clone(), *score);
        Ok(())
    }

    async fn server_scores(&self, server: &ServerId) -> Result<Vec<ScoreEntry>, StorageError> {
        let guard = self.scores.read().await;
        Ok(guard
            .get(server)
            .into_iter()
            .flatten()
            .map(|(player, score)| ScoreEntry {
                server: server.clone(),
                player: player.clone(),
                score: *score,
            })
            .collect())
    }

    async fn all_scores(&self) -> Result<Vec<ScoreEntry>, StorageError> {
        let guard = self.scores.read().await;
        Ok(guard
            .iter()
            .flat_map(|(server, players)| {
                players.iter().map(move |(player, score)| ScoreEntry {
                    server: server.clone(),
                    player: player.clone(),
                    score: *score,
                })
            })
            .collect())
    }
}
