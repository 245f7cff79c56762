//! Line-based front end. Every input line is treated as a chat message from
//! the current player in the current channel; lines starting with `/`
//! change who is talking and where.

use std::fmt::Write as _;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, instrument};

use crate::{
    errors::{Error, TracingError},
    ids::{ChannelId, PlayerId, ServerId},
    storage::Storage,
    wordle::{
        as_emoji::AsEmoji,
        commands::{Command, HELP},
        game::GameState,
        leaderboard::LeaderboardEntry,
        options::Difficulty,
        session::{Completion, GameSessions, GuessOutcome, SessionError},
        stats::UserScoreRecord,
        words_list::WordList,
    },
};

const SWITCH_HELP: &str = "\
`/player <name>` - talk as someone else
`/channel <name>` - move to another channel
`/server <name>` - move to another server";

pub struct Console<S, W> {
    sessions: GameSessions<S, W>,
    server: ServerId,
    channel: ChannelId,
    player: PlayerId,
}

impl<S: Storage, W: WordList> Console<S, W> {
    pub fn new(
        sessions: GameSessions<S, W>,
        server: ServerId,
        channel: ChannelId,
        player: PlayerId,
    ) -> Self {
        Self {
            sessions,
            server,
            channel,
            player,
        }
    }

    /// Reads until `input` closes, writing one reply per handled line.
    pub async fn run(
        &mut self,
        input: impl AsyncBufRead + Unpin,
        mut output: impl AsyncWrite + Unpin,
    ) -> Result<(), Error> {
        let mut lines = input.lines();

        while let Some(line) = lines.next_line().await? {
            if let Some(reply) = self.handle(&line).await {
                output.write_all(reply.as_bytes()).await?;
                output.write_all(b"\n").await?;
                output.flush().await?;
            }
        }

        info!("input closed");
        Ok(())
    }

    /// `None` when the line isn't meant for the game.
    pub async fn handle(&mut self, line: &str) -> Option<String> {
        if let Some(switch) = line.trim().strip_prefix('/') {
            return Some(self.switch(switch));
        }

        let command = Command::parse(line)?;
        match self.execute(command).await {
            Ok(reply) => reply,
            Err(err) => {
                err.trace();
                Some(error_reply(&err))
            }
        }
    }

    fn switch(&mut self, input: &str) -> String {
        let mut words = input.split_whitespace();

        match (words.next(), words.next(), words.next()) {
            (Some("player"), Some(id), None) => {
                self.player = PlayerId::from(id);
                format!("You are now `{id}`.")
            }
            (Some("channel"), Some(id), None) => {
                self.channel = ChannelId::from(id);
                format!("Moved to #{id}.")
            }
            (Some("server"), Some(id), None) => {
                self.server = ServerId::from(id);
                format!("Moved to server `{id}`.")
            }
            _ => SWITCH_HELP.to_owned(),
        }
    }

    #[instrument(skip(self), fields(server = %self.server, channel = %self.channel, player = %self.player))]
    async fn execute(&self, command: Command) -> Result<Option<String>, SessionError> {
        let (server, channel, player) = (&self.server, &self.channel, &self.player);
        debug!("running command");

        let reply = match command {
            Command::NewGame(difficulty) => {
                self.sessions.new_game(server, channel, difficulty).await?;
                started_reply(difficulty)
            }
            Command::Guess(raw) => match self.sessions.guess(server, channel, player, &raw).await {
                Ok(outcome) => guess_reply(&outcome),
                // a guess with nothing to guess at is just chatter
                Err(SessionError::NoGame) => return Ok(None),
                Err(err) => return Err(err),
            },
            Command::Status => match self.sessions.status(server, channel).await {
                Ok(game) => status_reply(&game),
                Err(SessionError::NoGame) => {
                    "This channel has no active Wordle game. Start one with `new wordle`.".to_owned()
                }
                Err(err) => return Err(err),
            },
            Command::Quit => {
                let answer = self.sessions.quit(server, channel).await?;
                format!(
                    "The Wordle game has been quit. The word was **{}**. \
                     Start a new one with `new wordle` when you're ready!",
                    answer.to_string().to_uppercase()
                )
            }
            Command::Points(target) => {
                let target = target.as_ref().unwrap_or(player);
                let score = self.sessions.score(server, target).await?;
                points_reply(target, player, &score)
            }
            Command::Stats(target) => {
                let target = target.as_ref().unwrap_or(player);
                let score = self.sessions.score(server, target).await?;
                stats_reply(target, &score)
            }
            Command::Top => {
                let board = self.sessions.server_leaderboard(server).await?;
                leaderboard_reply(
                    "Top Wordle players in this server",
                    "No one in this server has any Wordle points yet. \
                     Solve a puzzle to get on the board!",
                    &board,
                )
            }
            Command::Global => {
                let board = self.sessions.global_leaderboard().await?;
                leaderboard_reply(
                    "Top Wordle players globally",
                    "No one has any Wordle points yet globally. \
                     Solve a puzzle to get on the board!",
                    &board,
                )
            }
            Command::Help => format!("{HELP}\n\n{SWITCH_HELP}"),
        };

        Ok(Some(reply))
    }
}

fn error_reply(err: &SessionError) -> String {
    match err {
        SessionError::Storage(_) => "Something went wrong saving the game. Try again later.".to_owned(),
        SessionError::CorruptGame(_) => {
            "This channel's game couldn't be read and has been removed. Start a new one with `new wordle`."
                .to_owned()
        }
        other => other.to_string(),
    }
}

fn started_reply(difficulty: Difficulty) -> String {
    match difficulty {
        Difficulty::Normal => "A new Wordle game has started. Type `guess {your guess}` to start playing!\n\
             Normal mode: unlimited guesses, but you lose a point for each guess beyond the first."
            .to_owned(),
        Difficulty::Hard => "A new Wordle game has started. Type `guess {your guess}` to start playing!\n\
             Hard mode: 6 guesses, and every hint you uncover must be used in later guesses."
            .to_owned(),
    }
}

fn guess_reply(outcome: &GuessOutcome) -> String {
    let mut reply = outcome.game.emoji_with_letters();

    match &outcome.completion {
        Some(completion) => {
            reply.push_str("\n\n");
            reply.push_str(&completion_reply(completion, outcome.game.difficulty()));
        }
        None => {
            if let Some(limit) = outcome.game.limit() {
                let left = limit.get().saturating_sub(outcome.game.guesses_used());
                let _ = write!(reply, "\n\n{left} guesses left.");
            }
        }
    }

    reply
}

fn completion_reply(completion: &Completion, difficulty: Difficulty) -> String {
    let answer = completion.answer.to_string().to_uppercase();

    if completion.won {
        let tries = match completion.guesses_used {
            1 => "1 try".to_owned(),
            n => format!("{n} tries"),
        };
        format!(
            "Correct! `{player}` guessed **{answer}** in {tries} and gained {points} points! \
             ({difficulty} mode)",
            player = completion.player,
            points = completion.points,
        )
    } else if difficulty.is_hard() {
        format!(
            "RIP - since this was hard mode, you only get 6 tries to guess the word! \
             The correct word was: **{answer}**"
        )
    } else {
        format!("Game over! The correct word was: **{answer}**")
    }
}

fn status_reply(game: &GameState) -> String {
    let mut reply = format!("{} mode, {} guesses so far", game.difficulty(), game.guesses_used());
    if let Some(limit) = game.limit() {
        let _ = write!(reply, " out of {}", limit.get());
    }
    reply.push('.');

    if game.guesses_used() > 0 {
        reply.push_str("\n\n");
        reply.push_str(&game.emoji_with_letters());
    }

    reply.push_str("\n\n");
    reply.push_str(&game.keyboard_state().emoji_with_letters());
    reply
}

fn points_reply(target: &PlayerId, sender: &PlayerId, score: &UserScoreRecord) -> String {
    if target == sender {
        format!("You have {} points!", score.points)
    } else {
        format!("`{target}` has {} points!", score.points)
    }
}

fn stats_reply(target: &PlayerId, score: &UserScoreRecord) -> String {
    format!(
        "Wordle stats for `{target}`\n\
         Points: {points}\n\
         Games won: {won} of {played}\n\
         Total guesses: {total}\n\
         Average guesses per win: {average:.2}\n\
         First-try wins: {first}",
        points = score.points,
        won = score.games_won,
        played = score.games_played,
        total = score.total_guesses,
        average = score.average_guesses(),
        first = score.first_attempt_guesses,
    )
}

fn leaderboard_reply(title: &str, empty: &str, board: &[LeaderboardEntry]) -> String {
    if board.is_empty() {
        return empty.to_owned();
    }

    board.iter().fold(format!("{title}:"), |mut reply, entry| {
        let _ = write!(
            reply,
            "\n{}. `{}` - {} points",
            entry.rank, entry.player, entry.points
        );
        reply
    })
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::{leaderboard_reply, stats_reply, Console};
    use crate::{
        config::LeaderboardConfig,
        ids::{ChannelId, PlayerId, ServerId},
        storage::MemoryStorage,
        wordle::{
            core::Word, leaderboard::LeaderboardEntry, session::GameSessions,
            stats::UserScoreRecord, words_list::WordsList,
        },
    };

    fn console() -> Console<MemoryStorage, WordsList> {
        let parse = |list: &[&str]| -> Vec<Word> {
            list.iter().map(|w| Word::from_str(w).unwrap()).collect()
        };
        let words = WordsList::from_words(parse(&["crane"]), parse(&["trace", "couch"])).unwrap();

        Console::new(
            GameSessions::new(MemoryStorage::new(), words, LeaderboardConfig::default()),
            ServerId::new("local"),
            ChannelId::new("general"),
            PlayerId::new("ada"),
        )
    }

    #[tokio::test]
    async fn chatter_is_ignored() {
        let mut console = console();

        assert_eq!(console.handle("hello there").await, None);
        // no game yet
        assert_eq!(console.handle("guess crane").await, None);
    }

    #[tokio::test]
    #[traced_test]
    async fn plays_a_round() {
        let mut console = console();

        let started = console.handle("new wordle hard").await.unwrap();
        assert!(started.contains("Hard mode"));

        let first = console.handle("guess trace").await.unwrap();
        assert_eq!(first, " T  R  A  C  E \n⬛🟩🟩🟨🟩\n\n5 guesses left.");

        let repeat = console.handle("guess TRACE").await.unwrap();
        assert_eq!(repeat, "`trace` has already been guessed");

        console.handle("/player bo").await.unwrap();
        let last = console.handle("guess crane").await.unwrap();
        assert!(last.ends_with("Correct! `bo` guessed **CRANE** in 2 tries and gained 18 points! (hard mode)"));

        assert_eq!(console.handle("wordle points").await.unwrap(), "You have 18 points!");
        assert_eq!(
            console.handle("wordle points ada").await.unwrap(),
            "`ada` has 0 points!"
        );
        assert!(logs_contain("game finished"));
    }

    #[tokio::test]
    async fn hard_games_cannot_be_quit() {
        let mut console = console();
        console.handle("new wordle hard").await.unwrap();

        assert_eq!(
            console.handle("wordle quit").await.unwrap(),
            "You cannot quit a Hard mode Wordle game."
        );

        console.handle("/channel random").await.unwrap();
        console.handle("new wordle").await.unwrap();
        assert!(console
            .handle("wordle quit")
            .await
            .unwrap()
            .contains("The word was **CRANE**"));
    }

    #[tokio::test]
    async fn status_shows_keyboard() {
        let mut console = console();

        assert!(console
            .handle("wordle status")
            .await
            .unwrap()
            .starts_with("This channel has no active Wordle game."));

        console.handle("new wordle").await.unwrap();
        console.handle("guess couch").await.unwrap();

        let status = console.handle("wordle status").await.unwrap();
        assert!(status.starts_with("normal mode, 1 guesses so far."));
        assert!(status.contains(" C  O  U  C  H \n🟩⬛⬛⬛⬛"));
        assert!(status.ends_with(" Z  X  C  V  B  N  M \n⬜⬜🟩⬜⬜⬜⬜"));
    }

    #[tokio::test]
    async fn run_writes_replies() {
        let mut console = console();
        let input: &[u8] = b"new wordle\nsmall talk\nwordle top\n";
        let mut output = Vec::new();

        console.run(input, &mut output).await.unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.lines().filter(|line| line.is_empty()).count(), 0);
        assert!(output.starts_with("A new Wordle game has started."));
        assert!(output.ends_with("Solve a puzzle to get on the board!\n"));
    }

    #[test]
    fn stats_average_has_two_decimals() {
        let score = UserScoreRecord {
            points: 34,
            games_won: 3,
            games_played: 4,
            total_guesses: 7,
            first_attempt_guesses: 1,
        };

        assert!(stats_reply(&PlayerId::new("ada"), &score).contains("Average guesses per win: 2.33"));
    }

    #[test]
    fn leaderboard_lines() {
        let board = [
            LeaderboardEntry {
                rank: 1,
                player: PlayerId::new("ada"),
                points: 30,
            },
            LeaderboardEntry {
                rank: 2,
                player: PlayerId::new("bo"),
                points: 12,
            },
        ];

        assert_eq!(
            leaderboard_reply("Top", "nobody", &board),
            "Top:\n1. `ada` - 30 points\n2. `bo` - 12 points"
        );
        assert_eq!(leaderboard_reply("Top", "nobody", &[]), "nobody");
    }
}
