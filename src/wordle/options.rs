use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Unlimited guesses, fewer points the longer it takes.
    #[default]
    Normal,
    /// Six guesses, and revealed hints have to be used.
    Hard,
}

impl Difficulty {
    pub fn guesses_limit(self) -> Option<GuessesLimit> {
        match self {
            Self::Normal => None,
            Self::Hard => Some(GuessesLimit::default()),
        }
    }

    pub const fn is_hard(self) -> bool {
        matches!(self, Self::Hard)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown difficulty `{0}`, expected `normal` or `hard`")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseDifficultyError(s.to_owned())),
        }
    }
}

/// Cap on the number of guesses in a game. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GuessesLimit(usize);

impl GuessesLimit {
    pub fn new(limit: usize) -> Self {
        assert!(limit != 0, "limit cannot be 0");
        Self(limit)
    }

    pub fn try_new(limit: usize) -> Option<Self> {
        (limit != 0).then_some(Self(limit))
    }

    pub const fn get(self) -> usize {
        self.0
    }

    pub fn reached_by(self, guesses: usize) -> bool {
        guesses >= self.0
    }
}

impl Display for GuessesLimit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}", self.0))
    }
}

impl PartialEq<usize> for GuessesLimit {
    fn eq(&self, other: &usize) -> bool {
        &self.0 == other
    }
}

impl Default for GuessesLimit {
    fn default() -> Self {
        Self(6)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::{Difficulty, GuessesLimit};

    #[test]
    fn hard_is_capped_at_six() {
        assert_eq!(Difficulty::Hard.guesses_limit(), Some(GuessesLimit::new(6)));
        assert_eq!(Difficulty::Normal.guesses_limit(), None);
    }

    #[test]
    fn zero_limit_means_unlimited() {
        assert_eq!(GuessesLimit::try_new(0), None);
        assert!(GuessesLimit::new(6).reached_by(6));
        assert!(!GuessesLimit::new(6).reached_by(5));
    }

    #[test]
    fn parse() {
        assert_eq!(Difficulty::from_str(" HARD ").unwrap(), Difficulty::Hard);
        assert_eq!(Difficulty::from_str("normal").unwrap(), Difficulty::Normal);
        assert!(Difficulty::from_str("expert").is_err());
    }
}
