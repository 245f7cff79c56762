use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs, sync::Mutex};
use tracing::{debug, trace, warn};

use crate::{
    ids::{ChannelId, PlayerId, ServerId},
    wordle::{record::GameRecord, stats::UserScoreRecord},
};

use super::{ScoreEntry, Storage, StorageError};

// games are kept as raw values so one bad record can't hide the others
type GamesFile = BTreeMap<ServerId, BTreeMap<ChannelId, serde_json::Value>>;
type ScoresFile = BTreeMap<ServerId, BTreeMap<PlayerId, UserScoreRecord>>;

/// `games.json` and `scores.json` in one directory, each a two-level map
/// keyed by server id.
///
/// Every operation rewrites the whole file through a temporary file and a
/// rename.
#[derive(Debug)]
pub struct JsonStorage {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl JsonStorage {
    pub const GAMES_FILE: &'static str = "games.json";
    pub const SCORES_FILE: &'static str = "scores.json";

    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_owned();
        fs::create_dir_all(&dir).await?;
        debug!(dir = %dir.display(), "using json storage");

        Ok(Self {
            dir,
            lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn games_path(&self) -> PathBuf {
        self.dir.join(Self::GAMES_FILE)
    }

    fn scores_path(&self) -> PathBuf {
        self.dir.join(Self::SCORES_FILE)
    }
}

async fn read_file<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StorageError> {
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            trace!(path = %path.display(), "no file yet");
            return Ok(T::default());
        }
        Err(err) => return Err(err.into()),
    };

    if contents.trim().is_empty() {
        return Ok(T::default());
    }

    Ok(serde_json::from_str(&contents)?)
}

async fn write_file<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let contents = serde_json::to_string_pretty(value)?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("data.json");
    let tmp_path = path.with_file_name(format!(".{file_name}.tmp-{}", std::process::id()));

    fs::write(&tmp_path, contents).await?;
    fs::rename(&tmp_path, path).await?;

    trace!(path = %path.display(), "wrote file");
    Ok(())
}

impl Storage for JsonStorage {
    async fn load_game(
        &self,
        server: &ServerId,
        channel: &ChannelId,
    ) -> Result<Option<GameRecord>, StorageError> {
        let _guard = self.lock.lock().await;
        let games: GamesFile = read_file(&self.games_path()).await?;

        let Some(value) = games.get(server).and_then(|channels| channels.get(channel)) else {
            return Ok(None);
        };

        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|err| {
                warn!(%server, %channel, %err, "unreadable game record");
                StorageError::CorruptGame {
                    channel: channel.clone(),
                    reason: err.to_string(),
                }
            })
    }

    async fn save_game(
        &self,
        server: &ServerId,
        channel: &ChannelId,
        game: &GameRecord,
    ) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let path = self.games_path();

        let mut games: GamesFile = read_file(&path).await?;
        games
            .entry(server.clone())
            .or_default()
            .insert(channel.clone(), serde_json::to_value(game)?);

        write_file(&path, &games).await
    }

    async fn delete_game(
        &self,
        server: &ServerId,
        channel: &ChannelId,
    ) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        let path = self.games_path();

        let mut games: GamesFile = read_file(&path).await?;
        let Some(channels) = games.get_mut(server) else {
            return Ok(());
        };

        if channels.remove(channel).is_none() {
            return Ok(());
        }
        if channels.is_empty() {
            games.remove(server);
        }

        write_file(&path, &games).await
    }

    async fn load_score(
        &self,
        server: &ServerId,
        player: &PlayerId,
    ) -> Result<UserScoreRecord, StorageError> {
        let _guard = self.lock.lock().await;
        let scores: ScoresFile = read_file(&self.scores_path()).await?;

        Ok(scores
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
        let _guard = self.lock.lock().await;
        let path = self.scores_path();

        let mut scores: ScoresFile = read_file(&path).await?;
        scores
            .entry(server.clone())
            .or_default()
            .insert(player.clone(), *score);

        write_file(&path, &scores).await
    }

    async fn server_scores(&self, server: &ServerId) -> Result<Vec<ScoreEntry>, StorageError> {
        let _guard = self.lock.lock().await;
        let mut scores: ScoresFile = read_file(&self.scores_path()).await?;

        Ok(scores
            .remove(server)
            .into_iter()
            .flatten()
            .map(|(player, score)| ScoreEntry {
                server: server.clone(),
                player,
                score,
            })
            .collect())
    }

    async fn all_scores(&self) -> Result<Vec<ScoreEntry>, StorageError> {
        let _guard = self.lock.lock().await;
        let scores: ScoresFile = read_file(&self.scores_path()).await?;

        Ok(scores
            .into_iter()
            .flat_map(|(server, players)| {
                players.into_iter().map(move |(player, score)| ScoreEntry {
                    server: server.clone(),
                    player,
                    score,
                })
            })
            .collect())
    }
}
