use std::{
    collections::HashMap,
    ops::{Index, Not},
    slice::Iter,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use super::{Guess, LetterState};

const WORD_LENGTH: usize = 5;

/// A five-letter lowercase word.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word {
    letters: [char; WORD_LENGTH],
}

impl Word {
    pub const LENGTH: usize = WORD_LENGTH;

    pub fn iter(&self) -> Iter<'_, char> {
        self.letters.iter()
    }

    pub const fn letters(&self) -> [char; Self::LENGTH] {
        self.letters
    }

    pub fn contains(&self, letter: char) -> bool {
        self.letters.contains(&letter)
    }

    fn letter_counts(&self) -> HashMap<char, usize> {
        let mut counts = HashMap::with_capacity(Self::LENGTH);
        for letter in self.iter() {
            *counts.entry(*letter).or_insert(0) += 1;
        }
        counts
    }

    /// Scores `guess` against this word as the answer.
    ///
    /// Exact matches are marked first and consume their letter; the
    /// remaining letters are then marked as misplaced while unmatched
    /// copies are left in the answer. Extra repeats stay grey.
    pub fn guess(&self, guess: &Word) -> Guess {
        let mut scored = Guess::new(guess);
        let mut letter_counts = self.letter_counts();

        for (index, (letter, state)) in scored.iter_mut().enumerate() {
            if self[index] == *letter {
                *state = LetterState::Correct;
                if let Some(count) = letter_counts.get_mut(&*letter) {
                    *count = count.saturating_sub(1);
                }
            }
        }

        for (letter, state) in scored.iter_mut() {
            if *state == LetterState::Correct {
                continue;
            }

            if let Some(count) = letter_counts.get_mut(&*letter).filter(|count| **count > 0) {
                trace!("{}: wrong place", letter);

                *state = LetterState::WrongPlace;
                *count -= 1;
            }
        }

        scored
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseWordError {
    #[error("word `{0}` must have 5 letters but has {}", .0.chars().count())]
    WrongLength(String),

    #[error("word `{0}` must only contain the letters a-z")]
    NotAlphabetic(String),
}

impl FromStr for Word {
    type Err = ParseWordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters: [char; Self::LENGTH] = s
            .chars()
            .collect::<Vec<char>>()
            .try_into()
            .map_err(|_| ParseWordError::WrongLength(s.to_owned()))?;

        if letters.iter().all(char::is_ascii_alphabetic).not() {
            return Err(ParseWordError::NotAlphabetic(s.to_owned()));
        }

        Ok(Self {
            letters: letters.map(|ch| ch.to_ascii_lowercase()),
        })
    }
}

impl TryFrom<String> for Word {
    type Error = ParseWordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(&value)
    }
}

impl From<Word> for String {
    fn from(value: Word) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letters.iter().collect::<String>())
    }
}

impl PartialEq<&str> for Word {
    fn eq(&self, other: &&str) -> bool {
        self.letters.iter().copied().eq(other.chars())
    }
}

impl IntoIterator for Word {
    type Item = char;
    type IntoIter = std::array::IntoIter<char, WORD_LENGTH>;

    fn into_iter(self) -> Self::IntoIter {
        self.letters.into_iter()
    }
}

impl Index<usize> for Word {
    type Output = char;

    fn index(&self, index: usize) -> &Self::Output {
        self.letters.index(index)
    }
}
