use std::collections::{BTreeMap, BTreeSet};

use tracing::trace;

use super::core::{LetterState, Statuses, Word};

/// Hints revealed so far in a hard mode game.
///
/// Green letters pin their position. Yellow letters only have to show up
/// again somewhere; reusing the slot they were already wrong in is allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HardModeConstraints {
    green: BTreeMap<usize, char>,
    // kept in the order the letters were first revealed
    yellow: Vec<(char, BTreeSet<usize>)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HardModeViolation {
    /// `position` counts from 1.
    #[error("position {position} must be '{}'", .letter.to_ascii_uppercase())]
    WrongLetterAt { position: usize, letter: char },

    #[error("must use '{}' from previous guesses", .0.to_ascii_uppercase())]
    MissingLetter(char),
}

impl HardModeConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.green.is_empty() && self.yellow.is_empty()
    }

    pub const fn green(&self) -> &BTreeMap<usize, char> {
        &self.green
    }

    pub fn yellow(&self) -> impl Iterator<Item = (char, &BTreeSet<usize>)> + '_ {
        self.yellow
            .iter()
            .map(|(letter, positions)| (*letter, positions))
    }

    pub fn validate(&self, guess: &Word) -> Result<(), HardModeViolation> {
        for (&position, &letter) in &self.green {
            if guess[position] != letter {
                return Err(HardModeViolation::WrongLetterAt {
                    position: position + 1,
                    letter,
                });
            }
        }

        for (letter, _) in &self.yellow {
            if !guess.contains(*letter) {
                return Err(HardModeViolation::MissingLetter(*letter));
            }
        }

        Ok(())
    }

    pub fn update(&mut self, guess: &Word, statuses: &Statuses) {
        for (position, (&letter, state)) in guess.iter().zip(statuses).enumerate() {
            match state {
                LetterState::Correct => {
                    trace!(position, %letter, "green constraint");
                    self.green.insert(position, letter);
                }
                LetterState::WrongPlace => self.add_yellow(letter, position),
                LetterState::NotPresent => (),
            }
        }
    }

    pub(crate) fn insert_green(&mut self, position: usize, letter: char) {
        self.green.insert(position, letter);
    }

    pub(crate) fn add_yellow(&mut self, letter: char, position: usize) {
        if let Some((_, positions)) = self.yellow.iter_mut().find(|(l, _)| *l == letter) {
            positions.insert(position);
        } else {
            trace!(position, %letter, "yellow constraint");
            self.yellow.push((letter, BTreeSet::from([position])));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;

    use super::{HardModeConstraints, HardModeViolation};
    use crate::wordle::core::Word;

    fn word(s: &str) -> Word {
        Word::from_str(s).unwrap()
    }

    fn after(answer: &str, guesses: &[&str]) -> HardModeConstraints {
        let answer = word(answer);
        let mut constraints = HardModeConstraints::new();
        for guess in guesses {
            let guess = word(guess);
            constraints.update(&guess, &answer.guess(&guess).states());
        }
        constraints
    }

    #[test]
    fn starts_empty() {
        let constraints = HardModeConstraints::new();
        assert!(constraints.is_empty());
        assert_eq!(constraints.validate(&word("zzzzz")), Ok(()));
    }

    #[test]
    fn green_must_be_kept() {
        let constraints = after("crane", &["couch"]);

        assert_eq!(
            constraints.validate(&word("trace")),
            Err(HardModeViolation::WrongLetterAt {
                position: 1,
                letter: 'c'
            })
        );
        assert_eq!(constraints.validate(&word("crane")), Ok(()));
    }

    #[test]
    fn yellow_must_be_present() {
        // 'r' is yellow at position 0
        let constraints = after("crane", &["rusty"]);

        assert_eq!(
            constraints.validate(&word("month")),
            Err(HardModeViolation::MissingLetter('r'))
        );
        assert_eq!(constraints.validate(&word("brain")), Ok(()));
    }

    #[test]
    fn yellow_may_reuse_wrong_position() {
        let constraints = after("crane", &["rusty"]);
        assert_eq!(constraints.validate(&word("rebar")), Ok(()));
    }

    #[test]
    fn greens_checked_before_yellows() {
        // green 'c' at 0, yellow 'r' from "curry"
        let constraints = after("crane", &["curry"]);

        assert_eq!(
            constraints.validate(&word("month")),
            Err(HardModeViolation::WrongLetterAt {
                position: 1,
                letter: 'c'
            })
        );
    }

    #[test]
    fn yellows_reported_in_reveal_order() {
        let constraints = after("crane", &["nerds", "alloy"]);
        let order: Vec<char> = constraints.yellow().map(|(letter, _)| letter).collect();

        assert_eq!(order, vec!['n', 'e', 'r', 'a']);
        assert_eq!(
            constraints.validate(&word("bumpy")),
            Err(HardModeViolation::MissingLetter('n'))
        );
    }

    #[test]
    fn yellow_positions_are_a_set() {
        let constraints = after("crane", &["rusty", "rebus"]);
        let positions: Vec<usize> = constraints
            .yellow()
            .find(|(letter, _)| *letter == 'r')
            .map(|(_, positions)| positions.iter().copied().collect())
            .unwrap();

        assert_eq!(positions, vec![0]);
    }

    #[test]
    fn violation_messages() {
        assert_eq!(
            HardModeViolation::WrongLetterAt {
                position: 3,
                letter: 'a'
            }
            .to_string(),
            "position 3 must be 'A'"
        );
        assert_eq!(
            HardModeViolation::MissingLetter('r').to_string(),
            "must use 'R' from previous guesses"
        );
    }
}
