use std::{convert::Infallible, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

mod word;
pub use word::{ParseWordError, Word};

pub mod guess;
pub use guess::{parse_guess, Guess, GuessError, GuessResult, Statuses};

/// Result of comparing one guessed letter against the answer.
///
/// Variants are ordered from least to most informative, so the best
/// state seen for a letter is simply the maximum.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize,
)]
pub enum LetterState {
    #[default]
    #[serde(rename = "grey")]
    NotPresent,
    #[serde(rename = "yellow")]
    WrongPlace,
    #[serde(rename = "green")]
    Correct,
}

impl LetterState {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Correct => "green",
            Self::WrongPlace => "yellow",
            Self::NotPresent => "grey",
        }
    }
}

impl FromStr for LetterState {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "O" => Self::Correct,
            "o" => Self::WrongPlace,
            "." => Self::NotPresent,
            _ => Self::default(),
        })
    }
}

impl Display for LetterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Correct => "O",
            Self::WrongPlace => "o",
            Self::NotPresent => ".",
        })
    }
}
