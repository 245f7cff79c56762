use thiserror::Error as ThisError;
use tracing::{debug, error, info, warn, Level};

use crate::{
    config,
    storage::StorageError,
    wordle::{
        core::GuessError, record::RecordError, session::SessionError, words_list::WordsListError,
    },
};

/// Errors that know how loudly they should be logged.
pub trait TracingError: std::error::Error {
    fn level(&self) -> Level;

    fn trace(&self) {
        match self.level() {
            Level::ERROR => error!(error = %self),
            Level::WARN => warn!(error = %self),
            Level::INFO => info!(error = %self),
            _ => debug!(error = %self),
        }
    }
}

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("problem loading config file: {0}")]
    Config(#[from] config::Error),

    #[error("problem loading words lists: {0}")]
    Words(#[from] WordsListError),

    #[error("console i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

impl TracingError for Error {
    fn level(&self) -> Level {
        match self {
            Self::Session(err) => err.level(),
            Self::Storage(err) => err.level(),
            _ => Level::ERROR,
        }
    }
}

// a rejected guess is part of normal play
impl TracingError for GuessError {
    fn level(&self) -> Level {
        Level::DEBUG
    }
}

impl TracingError for RecordError {
    fn level(&self) -> Level {
        Level::ERROR
    }
}

impl TracingError for StorageError {
    fn level(&self) -> Level {
        Level::ERROR
    }
}

impl TracingError for WordsListError {
    fn level(&self) -> Level {
        Level::ERROR
    }
}

impl TracingError for config::Error {
    fn level(&self) -> Level {
        Level::ERROR
    }
}

impl TracingError for SessionError {
    fn level(&self) -> Level {
        match self {
            Self::Guess(err) => err.level(),
            Self::AlreadyRunning | Self::NoGame | Self::CannotQuitHard => Level::INFO,
            Self::CorruptGame(_) => Level::ERROR,
            Self::Storage(err) => err.level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tracing::Level;
    use tracing_test::traced_test;

    use super::TracingError;
    use crate::wordle::{core::GuessError, session::SessionError};

    #[test]
    fn player_mistakes_stay_quiet() {
        assert_eq!(GuessError::InvalidCharacters.level(), Level::DEBUG);
        assert_eq!(SessionError::NoGame.level(), Level::INFO);
        assert_eq!(
            SessionError::CorruptGame("bad answer".to_owned()).level(),
            Level::ERROR
        );
    }

    #[test]
    #[traced_test]
    fn trace_emits_message() {
        SessionError::CannotQuitHard.trace();
        assert!(logs_contain("You cannot quit a Hard mode Wordle game."));
    }
}
