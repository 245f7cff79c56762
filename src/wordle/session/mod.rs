//! Game lifecycle per channel: create, guess, finish, quit.
//!
//! Every operation on a channel runs under that channel's lock from the
//! moment the game is loaded until it is saved or deleted, so guesses from
//! different players in one channel are applied one at a time.

use tracing::{debug, error, info, instrument};

use crate::{
    config::LeaderboardConfig,
    errors::TracingError,
    ids::{ChannelId, PlayerId, ServerId},
    storage::{Storage, StorageError},
};

use super::{
    core::{GuessError, GuessResult, Word},
    game::GameState,
    leaderboard::{global_leaderboard, server_leaderboard, LeaderboardEntry},
    options::Difficulty,
    record::GameRecord,
    stats::UserScoreRecord,
    words_list::WordList,
};

mod locks;
pub use locks::{KeyGuard, KeyedLocks};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("There is already an ongoing game. Type `guess {{your guess}}` to join the round.")]
    AlreadyRunning,

    #[error("This channel doesn't have an active Wordle game.")]
    NoGame,

    #[error("You cannot quit a Hard mode Wordle game.")]
    CannotQuitHard,

    #[error("the stored game was unreadable and has been removed: {0}")]
    CorruptGame(String),

    #[error(transparent)]
    Guess(#[from] GuessError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What a game-ending guess did to the guesser's score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub player: PlayerId,
    pub won: bool,
    pub answer: Word,
    pub guesses_used: usize,
    pub points: u32,
    /// The player's record after this game.
    pub score: UserScoreRecord,
}

#[derive(Debug, Clone)]
pub struct GuessOutcome {
    pub game: GameState,
    pub result: GuessResult,
    pub completion: Option<Completion>,
}

pub struct GameSessions<S, W> {
    storage: S,
    words: W,
    channels: KeyedLocks<(ServerId, ChannelId)>,
    players: KeyedLocks<(ServerId, PlayerId)>,
    leaderboard: LeaderboardConfig,
}

impl<S: Storage, W: WordList> GameSessions<S, W> {
    pub fn new(storage: S, words: W, leaderboard: LeaderboardConfig) -> Self {
        Self {
            storage,
            words,
            channels: KeyedLocks::new(),
            players: KeyedLocks::new(),
            leaderboard,
        }
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[instrument(skip(self))]
    pub async fn new_game(
        &self,
        server: &ServerId,
        channel: &ChannelId,
        difficulty: Difficulty,
    ) -> Result<GameState, SessionError> {
        let _guard = self.channels.lock(&(server.clone(), channel.clone())).await;

        match self.load(server, channel).await {
            Ok(Some(game)) if !game.is_finished() => return Err(SessionError::AlreadyRunning),
            Ok(_) | Err(SessionError::CorruptGame(_)) => (),
            Err(err) => return Err(err),
        }

        let game = GameState::start(&self.words, difficulty, channel.clone());
        self.storage
            .save_game(server, channel, &GameRecord::from(&game))
            .await?;

        info!(%difficulty, "started a game");
        Ok(game)
    }

    /// Applies `raw` from `player`. When the guess ends the game, the game is
    /// removed and then the player is credited, so a failed removal can't
    /// lead to the same game being scored twice.
    #[instrument(skip(self))]
    pub async fn guess(
        &self,
        server: &ServerId,
        channel: &ChannelId,
        player: &PlayerId,
        raw: &str,
    ) -> Result<GuessOutcome, SessionError> {
        let _guard = self.channels.lock(&(server.clone(), channel.clone())).await;

        let mut game = self.load_active(server, channel).await?;
        let result = game.apply_guess(raw, &self.words).map_err(|err| {
            err.trace();
            SessionError::from(err)
        })?;

        if !result.is_finished() {
            self.storage
                .save_game(server, channel, &GameRecord::from(&game))
                .await?;

            return Ok(GuessOutcome {
                game,
                result,
                completion: None,
            });
        }

        self.storage.delete_game(server, channel).await?;
        let completion = self.complete(server, player, &game).await?;

        Ok(GuessOutcome {
            game,
            result,
            completion: Some(completion),
        })
    }

    /// Ends a normal game early and reveals its answer.
    #[instrument(skip(self))]
    pub async fn quit(&self, server: &ServerId, channel: &ChannelId) -> Result<Word, SessionError> {
        let _guard = self.channels.lock(&(server.clone(), channel.clone())).await;

        let game = self.load_active(server, channel).await?;
        if game.difficulty().is_hard() {
            return Err(SessionError::CannotQuitHard);
        }

        self.storage.delete_game(server, channel).await?;
        info!(guesses = game.guesses_used(), "game quit");

        Ok(game.answer())
    }

    #[instrument(skip(self))]
    pub async fn status(
        &self,
        server: &ServerId,
        channel: &ChannelId,
    ) -> Result<GameState, SessionError> {
        let _guard = self.channels.lock(&(server.clone(), channel.clone())).await;
        self.load_active(server, channel).await
    }

    pub async fn score(
        &self,
        server: &ServerId,
        player: &PlayerId,
    ) -> Result<UserScoreRecord, SessionError> {
        Ok(self.storage.load_score(server, player).await?)
    }

    pub async fn server_leaderboard(
        &self,
        server: &ServerId,
    ) -> Result<Vec<LeaderboardEntry>, SessionError> {
        let members = self.storage.server_scores(server).await?;
        let everyone = self.storage.all_scores().await?;
        Ok(server_leaderboard(members, everyone, self.leaderboard.server_limit))
    }

    pub async fn global_leaderboard(&self) -> Result<Vec<LeaderboardEntry>, SessionError> {
        let scores = self.storage.all_scores().await?;
        Ok(global_leaderboard(scores, self.leaderboard.global_limit))
    }

    async fn complete(
        &self,
        server: &ServerId,
        player: &PlayerId,
        game: &GameState,
    ) -> Result<Completion, SessionError> {
        let _guard = self.players.lock(&(server.clone(), player.clone())).await;

        let mut score = self.storage.load_score(server, player).await?;
        let guesses_used = game.guesses_used();
        let won = game.is_solved();

        let points = if won {
            score.record_win(game.difficulty(), guesses_used)
        } else {
            score.record_loss();
            0
        };

        self.storage.save_score(server, player, &score).await?;
        info!(%player, won, guesses_used, points, "game finished");

        Ok(Completion {
            player: player.clone(),
            won,
            answer: game.answer(),
            guesses_used,
            points,
            score,
        })
    }

    /// Like [`Self::load`], but a missing or already finished game is
    /// [`SessionError::NoGame`].
    async fn load_active(
        &self,
        server: &ServerId,
        channel: &ChannelId,
    ) -> Result<GameState, SessionError> {
        match self.load(server, channel).await? {
            Some(game) if game.is_finished() => {
                debug!("removing a finished game that was left behind");
                self.storage.delete_game(server, channel).await?;
                Err(SessionError::NoGame)
            }
            Some(game) => Ok(game),
            None => Err(SessionError::NoGame),
        }
    }

    /// A record that can't be read back is deleted and reported.
    async fn load(
        &self,
        server: &ServerId,
        channel: &ChannelId,
    ) -> Result<Option<GameState>, SessionError> {
        let record = match self.storage.load_game(server, channel).await {
            Ok(Some(record)) => record,
            Ok(None) => return Ok(None),
            Err(StorageError::CorruptGame { reason, .. }) => {
                return Err(self.discard(server, channel, reason).await)
            }
            Err(err) => return Err(err.into()),
        };

        match GameState::try_from(record) {
            Ok(game) => Ok(Some(game)),
            Err(err) => Err(self.discard(server, channel, err.to_string()).await),
        }
    }

    async fn discard(&self, server: &ServerId, channel: &ChannelId, reason: String) -> SessionError {
        error!(%server, %channel, %reason, "deleting corrupt game");

        match self.storage.delete_game(server, channel).await {
            Ok(()) => SessionError::CorruptGame(reason),
            Err(err) => err.into(),
        }
    }
}
