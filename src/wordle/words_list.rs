use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use rand::prelude::SliceRandom;
use tracing::{debug, info};

use super::core::{ParseWordError, Word};

/// Where answers come from and which guesses are accepted.
pub trait WordList {
    fn random_solution(&self) -> Word;

    fn is_valid_guess(&self, guess: &Word) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum WordsListError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path}:{line}: {source}")]
    InvalidWord {
        path: PathBuf,
        line: usize,
        source: ParseWordError,
    },

    #[error("answers list should not be empty")]
    NoAnswers,
}

/// Word lists read from two newline-separated files.
///
/// Every answer is also accepted as a guess.
#[derive(Debug, Clone)]
pub struct WordsList {
    answers: Vec<Word>,
    guesses: HashSet<Word>,
}

impl WordsList {
    pub fn load(
        answers: impl AsRef<Path>,
        guesses: impl AsRef<Path>,
    ) -> Result<Self, WordsListError> {
        let answers = read_words(answers.as_ref())?;
        let guesses = read_words(guesses.as_ref())?;

        let list = Self::from_words(answers, guesses)?;
        info!(
            answers = list.answers.len(),
            guesses = list.guesses.len(),
            "loaded words lists"
        );

        Ok(list)
    }

    pub fn from_words(
        answers: impl IntoIterator<Item = Word>,
        guesses: impl IntoIterator<Item = Word>,
    ) -> Result<Self, WordsListError> {
        let answers: Vec<Word> = answers.into_iter().collect();
        if answers.is_empty() {
            return Err(WordsListError::NoAnswers);
        }

        let mut guesses: HashSet<Word> = guesses.into_iter().collect();
        guesses.extend(answers.iter().copied());

        Ok(Self { answers, guesses })
    }

    pub fn answers(&self) -> &[Word] {
        &self.answers
    }
}

impl WordList for WordsList {
    fn random_solution(&self) -> Word {
        // never empty, checked in from_words
        let answer = self
            .answers
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or_default();

        debug!("picked a new answer");
        answer
    }

    fn is_valid_guess(&self, guess: &Word) -> bool {
        self.guesses.contains(guess)
    }
}

fn read_words(path: &Path) -> Result<Vec<Word>, WordsListError> {
    let contents = fs::read_to_string(path).map_err(|source| WordsListError::Read {
        path: path.to_owned(),
        source,
    })?;

    contents
        .lines()
        .enumerate()
        .map(|(index, line)| (index, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(index, line)| {
            Word::from_str(line).map_err(|source| WordsListError::InvalidWord {
                path: path.to_owned(),
                line: index + 1,
                source,
            })
        })
        .collect()
}
