use std::{
    fmt::Display,
    ops::{Index, IndexMut},
    str::FromStr,
};

use crate::wordle::hard_mode::HardModeViolation;

use super::{LetterState, ParseWordError, Word};

/// Per-position states of one scored guess.
pub type Statuses = [LetterState; Word::LENGTH];

/// A guessed word with the state of each of its letters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Guess {
    letters: [(char, LetterState); Word::LENGTH],
}

impl Guess {
    pub fn new(word: &Word) -> Self {
        let letters = word.letters().map(|ch| (ch, LetterState::NotPresent));

        Self { letters }
    }

    pub fn from_parts(word: &Word, statuses: Statuses) -> Self {
        let mut guess = Self::new(word);
        for (letter, state) in guess.letters.iter_mut().zip(statuses) {
            letter.1 = state;
        }
        guess
    }

    pub fn is_correct(&self) -> bool {
        self.letters
            .iter()
            .all(|(_, state)| *state == LetterState::Correct)
    }

    pub fn states(&self) -> Statuses {
        self.letters.map(|(_, state)| state)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(char, LetterState)> + '_ {
        self.letters.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (char, LetterState)> + '_ {
        self.letters.iter_mut()
    }
}

impl IntoIterator for Guess {
    type Item = (char, LetterState);
    type IntoIter = std::array::IntoIter<(char, LetterState), { Word::LENGTH }>;

    fn into_iter(self) -> Self::IntoIter {
        self.letters.into_iter()
    }
}

impl Index<usize> for Guess {
    type Output = (char, LetterState);

    fn index(&self, index: usize) -> &Self::Output {
        self.letters.index(index)
    }
}

impl IndexMut<usize> for Guess {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        self.letters.index_mut(index)
    }
}

impl Display for Guess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let txt = self
            .letters
            .iter()
            .map(|letter| letter.1.to_string())
            .collect::<String>();

        f.write_str(&txt)
    }
}

impl PartialEq<&str> for Guess {
    fn eq(&self, other: &&str) -> bool {
        &self.to_string() == other
    }
}

/// Outcome of one accepted guess, as stored in the game history.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GuessResult {
    statuses: Statuses,
    correct: bool,
    finished: bool,
}

impl GuessResult {
    pub const fn new(statuses: Statuses, correct: bool, finished: bool) -> Self {
        Self {
            statuses,
            correct,
            finished,
        }
    }

    pub const fn statuses(&self) -> Statuses {
        self.statuses
    }

    pub const fn is_correct(&self) -> bool {
        self.correct
    }

    pub const fn is_finished(&self) -> bool {
        self.finished
    }
}

/// Reasons a guess is turned away. None of them change the game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuessError {
    #[error("this game is already over")]
    GameOver,

    #[error("guess has {0} letters, should have exactly 5")]
    InvalidLength(usize),

    #[error("guesses can only contain letters")]
    InvalidCharacters,

    #[error("`{0}` has already been guessed")]
    DuplicateGuess(Word),

    #[error("`{0}` is not in the list of valid words")]
    NotAWord(Word),

    #[error("hard mode: {0}")]
    HardMode(#[from] HardModeViolation),
}

impl From<ParseWordError> for GuessError {
    fn from(value: ParseWordError) -> Self {
        match value {
            ParseWordError::WrongLength(s) => Self::InvalidLength(s.chars().count()),
            ParseWordError::NotAlphabetic(_) => Self::InvalidCharacters,
        }
    }
}

/// Checks the shape of raw player input and normalizes it to lowercase.
pub fn parse_guess(raw: &str) -> Result<Word, GuessError> {
    Ok(Word::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use paste::paste;
    use pretty_assertions::assert_eq;

    use super::{parse_guess, GuessError};

    macro_rules! string_match {
        ($($word:ident, $guess:ident => $result:expr;)+) => {
            use std::str::FromStr;

            paste! {
                $(
                    #[test]
                    fn [<$word _ $guess>]() {
                        let word = super::Word::from_str(&stringify!($word)).unwrap();
                        let guess = super::Word::from_str(&stringify!($guess)).unwrap();
                        pretty_assertions::assert_eq!(
                            word.guess(&guess), $result
                        )
                    }
                )+
            }
        };
    }

    string_match! {
        amber, amber => "OOOOO";
        amber, arbor => "O.O.O";
        amber, handy => ".o...";
        addra, opals => "..o..";
        mummy, tummy => ".OOOO";
        crane, trace => ".OOoO";
        allot, lolly => "ooO..";

        vital, audio => "o..o.";
        scene, eager => "o..o.";
        today, level => ".....";
        phone, crown => "..O.o";
        royal, newly => "...oo";
        baker, dying => ".....";
        blind, began => "O...o";
        movie, storm => "..o.o";
        spend, super => "O.oo.";
        still, worth => "...o.";
        build, usage => "o....";
        badly, alive => "oo...";
        split, house => "...o.";
        quite, trust => "o.o..";
        flash, death => "..O.O";
        peter, crime => ".o..o";
        these, smith => "o..oo";
        solve, shoot => "O.o..";
        event, dealt => ".o..O";
    }

    #[test]
    fn parse_checks_length_before_characters() {
        assert_eq!(parse_guess("abc1"), Err(GuessError::InvalidLength(4)));
        assert_eq!(parse_guess("ab c1"), Err(GuessError::InvalidCharacters));
        assert_eq!(parse_guess("TRACE").unwrap(), "trace");
    }

    #[test]
    fn results_keep_flags() {
        let answer = super::Word::from_str("crane").unwrap();
        let scored = answer.guess(&answer);
        let result = super::GuessResult::new(scored.states(), scored.is_correct(), true);

        assert!(result.is_correct());
        assert!(result.is_finished());
        assert_eq!(super::Guess::from_parts(&answer, result.statuses()), scored);
    }
}
