pub mod core;
pub use self::core::{Guess, GuessError, GuessResult, LetterState, Word};

pub mod as_emoji;
pub use as_emoji::AsEmoji;

pub mod commands;
pub use commands::Command;

pub mod game;
pub use game::{GameState, Keyboard};

pub mod hard_mode;
pub use hard_mode::{HardModeConstraints, HardModeViolation};

pub mod leaderboard;
pub use leaderboard::LeaderboardEntry;

pub mod options;
pub use options::{Difficulty, GuessesLimit};

pub mod record;
pub use record::{GameRecord, RecordError};

pub mod scoring;
pub use scoring::calculate_points;

pub mod session;
pub use session::{Completion, GameSessions, GuessOutcome, SessionError};

pub mod stats;
pub use stats::UserScoreRecord;

pub mod words_list;
pub use words_list::{WordList, WordsList, WordsListError};
