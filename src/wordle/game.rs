use std::{collections::BTreeMap, ops::Deref};

use chrono::{DateTime, Utc};
use tinyvec::TinyVec;
use tracing::{debug, trace};

use crate::ids::ChannelId;

use super::{
    core::{parse_guess, Guess, GuessError, GuessResult, LetterState, Word},
    hard_mode::HardModeConstraints,
    options::{Difficulty, GuessesLimit},
    words_list::WordList,
};

/// The puzzle running in one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(super) answer: Word,
    pub(super) difficulty: Difficulty,
    pub(super) limit: Option<GuessesLimit>,
    pub(super) guesses: TinyVec<[Word; 6]>,
    pub(super) results: TinyVec<[GuessResult; 6]>,
    pub(super) constraints: HardModeConstraints,
    pub(super) channel_id: ChannelId,
    pub(super) created_at: DateTime<Utc>,
}

impl GameState {
    pub fn new(answer: Word, difficulty: Difficulty, channel_id: ChannelId) -> Self {
        Self {
            answer,
            difficulty,
            limit: difficulty.guesses_limit(),
            guesses: TinyVec::default(),
            results: TinyVec::default(),
            constraints: HardModeConstraints::new(),
            channel_id,
            created_at: Utc::now(),
        }
    }

    pub fn start(words: &impl WordList, difficulty: Difficulty, channel_id: ChannelId) -> Self {
        Self::new(words.random_solution(), difficulty, channel_id)
    }

    /// Checks and scores one guess.
    ///
    /// A rejected guess leaves the game exactly as it was.
    pub fn apply_guess(
        &mut self,
        raw: &str,
        words: &impl WordList,
    ) -> Result<GuessResult, GuessError> {
        if self.is_finished() {
            return Err(GuessError::GameOver);
        }

        let guess = parse_guess(raw)?;

        if self.guesses.contains(&guess) {
            return Err(GuessError::DuplicateGuess(guess));
        }

        if !words.is_valid_guess(&guess) {
            return Err(GuessError::NotAWord(guess));
        }

        if self.difficulty.is_hard() {
            self.constraints.validate(&guess)?;
        }

        let scored = self.answer.guess(&guess);
        let statuses = scored.states();
        let correct = guess == self.answer;

        if self.difficulty.is_hard() {
            self.constraints.update(&guess, &statuses);
        }

        self.guesses.push(guess);
        let finished =
            correct || self.limit.is_some_and(|limit| limit.reached_by(self.guesses.len()));

        let result = GuessResult::new(statuses, correct, finished);
        self.results.push(result);

        debug!(%guess, result = %scored, correct, finished, "accepted guess");
        Ok(result)
    }

    /// Best state seen so far for every letter of the alphabet.
    pub fn keyboard_state(&self) -> Keyboard {
        let mut keys: BTreeMap<char, Option<LetterState>> =
            ('a'..='z').map(|letter| (letter, None)).collect();

        for (word, result) in self.guesses.iter().zip(self.results.iter()) {
            for (letter, state) in word.iter().zip(result.statuses()) {
                let key = keys.entry(*letter).or_default();
                *key = (*key).max(Some(state));
            }
        }

        trace!(guesses = self.guesses.len(), "built keyboard");
        Keyboard(keys)
    }

    pub fn history(&self) -> impl Iterator<Item = Guess> + '_ {
        self.guesses
            .iter()
            .zip(self.results.iter())
            .map(|(word, result)| Guess::from_parts(word, result.statuses()))
    }

    pub fn last_result(&self) -> Option<&GuessResult> {
        self.results.last()
    }

    pub fn is_finished(&self) -> bool {
        self.last_result().is_some_and(GuessResult::is_finished)
    }

    pub fn is_solved(&self) -> bool {
        self.last_result().is_some_and(GuessResult::is_correct)
    }

    pub fn guesses_used(&self) -> usize {
        self.guesses.len()
    }

    pub const fn answer(&self) -> Word {
        self.answer
    }

    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub const fn limit(&self) -> Option<GuessesLimit> {
        self.limit
    }

    pub fn guesses(&self) -> &[Word] {
        &self.guesses
    }

    pub fn results(&self) -> &[GuessResult] {
        &self.results
    }

    pub const fn constraints(&self) -> &HardModeConstraints {
        &self.constraints
    }

    pub const fn channel_id(&self) -> &ChannelId {
        &self.channel_id
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Letter → best state observed, `None` while a letter is unguessed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyboard(BTreeMap<char, Option<LetterState>>);

impl Keyboard {
    pub fn get(&self, letter: char) -> Option<LetterState> {
        self.0
            .get(&letter.to_ascii_lowercase())
            .copied()
            .flatten()
    }

    pub fn unused_letters(&self) -> impl Iterator<Item = char> + '_ {
        self.0
            .iter()
            .filter(|(_, state)| state.is_none())
            .map(|(letter, _)| *letter)
    }
}

impl Deref for Keyboard {
    type Target = BTreeMap<char, Option<LetterState>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    use super::GameState;
    use crate::{
        ids::ChannelId,
        wordle::{
            core::{GuessError, LetterState, Word},
            hard_mode::HardModeViolation,
            options::Difficulty,
            words_list::WordList,
        },
    };

    /// Accepts everything except words starting with 'x'.
    struct Lenient;

    impl WordList for Lenient {
        fn random_solution(&self) -> Word {
            Word::from_str("crane").unwrap()
        }

        fn is_valid_guess(&self, guess: &Word) -> bool {
            guess[0] != 'x'
        }
    }

    fn game(difficulty: Difficulty) -> GameState {
        GameState::start(&Lenient, difficulty, ChannelId::new("general"))
    }

    #[test]
    #[traced_test]
    fn correct_guess_finishes() {
        let mut game = game(Difficulty::Normal);

        let result = game.apply_guess("CRANE", &Lenient).unwrap();

        assert!(result.is_correct());
        assert!(result.is_finished());
        assert!(game.is_solved());
        assert_eq!(game.guesses(), &[Word::from_str("crane").unwrap()]);
        assert!(logs_contain("accepted guess"));
    }

    #[test]
    fn duplicate_guess_rejected() {
        let mut game = game(Difficulty::Normal);
        game.apply_guess("trace", &Lenient).unwrap();

        assert_eq!(
            game.apply_guess("Trace", &Lenient),
            Err(GuessError::DuplicateGuess(Word::from_str("trace").unwrap()))
        );
        assert_eq!(game.guesses_used(), 1);
        assert_eq!(game.results().len(), 1);
    }

    #[test]
    fn rejected_guesses_leave_state_alone() {
        let mut game = game(Difficulty::Hard);
        let before = game.clone();

        assert_eq!(
            game.apply_guess("cran", &Lenient),
            Err(GuessError::InvalidLength(4))
        );
        assert_eq!(
            game.apply_guess("cr4ne", &Lenient),
            Err(GuessError::InvalidCharacters)
        );
        assert_eq!(
            game.apply_guess("xylem", &Lenient),
            Err(GuessError::NotAWord(Word::from_str("xylem").unwrap()))
        );
        assert_eq!(game, before);
    }

    #[test]
    fn hard_mode_keeps_greens() {
        let mut game = game(Difficulty::Hard);
        game.apply_guess("couch", &Lenient).unwrap();

        assert_eq!(
            game.apply_guess("trace", &Lenient),
            Err(GuessError::HardMode(HardModeViolation::WrongLetterAt {
                position: 1,
                letter: 'c'
            }))
        );
        assert_eq!(game.guesses_used(), 1);
    }

    #[test]
    fn hard_mode_keeps_yellows() {
        let mut game = game(Difficulty::Hard);
        game.apply_guess("rusty", &Lenient).unwrap();

        assert_eq!(
            game.apply_guess("month", &Lenient),
            Err(GuessError::HardMode(HardModeViolation::MissingLetter('r')))
        );
        // same wrong spot is fine
        assert!(game.apply_guess("rebar", &Lenient).is_ok());
    }

    #[test]
    fn normal_mode_ignores_hints() {
        let mut game = game(Difficulty::Normal);
        game.apply_guess("couch", &Lenient).unwrap();

        assert!(game.apply_guess("month", &Lenient).is_ok());
        assert!(game.constraints().is_empty());
    }

    #[test]
    fn hard_mode_ends_after_six() {
        let mut game = game(Difficulty::Hard);
        let misses = ["bumpy", "sixth", "godly", "whiff", "jumbo", "pudgy"];

        for (i, miss) in misses.iter().enumerate() {
            let result = game.apply_guess(miss, &Lenient).unwrap();
            assert!(!result.is_correct());
            assert_eq!(result.is_finished(), i == misses.len() - 1);
        }

        assert!(game.is_finished());
        assert!(!game.is_solved());
        assert_eq!(
            game.apply_guess("crane", &Lenient),
            Err(GuessError::GameOver)
        );
    }

    #[test]
    fn normal_mode_is_unlimited() {
        let mut game = game(Difficulty::Normal);

        for miss in ["bumpy", "sixth", "godly", "whiff", "jumbo", "pudgy", "fizzy"] {
            assert!(!game.apply_guess(miss, &Lenient).unwrap().is_finished());
        }
        assert_eq!(game.limit(), None);
    }

    #[test]
    fn keyboard_never_downgrades() {
        let mut game = game(Difficulty::Normal);
        game.apply_guess("trace", &Lenient).unwrap();
        game.apply_guess("react", &Lenient).unwrap();

        let keyboard = game.keyboard_state();

        assert_eq!(keyboard.len(), 26);
        assert_eq!(keyboard.get('r'), Some(LetterState::Correct));
        assert_eq!(keyboard.get('e'), Some(LetterState::Correct));
        assert_eq!(keyboard.get('a'), Some(LetterState::Correct));
        assert_eq!(keyboard.get('c'), Some(LetterState::WrongPlace));
        assert_eq!(keyboard.get('t'), Some(LetterState::NotPresent));
        assert_eq!(keyboard.get('z'), None);
        assert!(!keyboard.unused_letters().any(|letter| letter == 't'));
    }

    #[test]
    fn keyboard_keeps_green_over_later_grey() {
        let mut game = game(Difficulty::Normal);
        game.apply_guess("trace", &Lenient).unwrap();

        // the extra r's are grey, crane only has one
        let result = game.apply_guess("error", &Lenient).unwrap();
        assert_eq!(
            result.statuses(),
            [
                LetterState::WrongPlace,
                LetterState::Correct,
                LetterState::NotPresent,
                LetterState::NotPresent,
                LetterState::NotPresent,
            ]
        );

        let keyboard = game.keyboard_state();
        assert_eq!(keyboard.get('r'), Some(LetterState::Correct));
        assert_eq!(keyboard.get('e'), Some(LetterState::Correct));
        assert_eq!(keyboard.get('o'), Some(LetterState::NotPresent));
    }

    #[test]
    fn history_pairs_words_with_results() {
        let mut game = game(Difficulty::Normal);
        game.apply_guess("trace", &Lenient).unwrap();

        let history: Vec<String> = game.history().map(|guess| guess.to_string()).collect();
        assert_eq!(history, vec![".OOoO".to_owned()]);
    }
}
