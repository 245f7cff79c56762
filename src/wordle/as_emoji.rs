use std::borrow::Cow;

use super::{
    core::{Guess, LetterState},
    game::{GameState, Keyboard},
};

const KEYBOARD_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

/// Shown for keys that haven't been guessed yet.
const UNUSED: &str = "⬜";

pub trait AsEmoji {
    fn as_emoji(&self) -> Cow<str>;

    /// Letters on one line, colours under them.
    fn emoji_with_letters(&self) -> String {
        self.as_emoji().into()
    }
}

impl AsEmoji for LetterState {
    fn as_emoji(&self) -> Cow<str> {
        match self {
            Self::Correct => "🟩",
            Self::WrongPlace => "🟨",
            Self::NotPresent => "⬛",
        }
        .into()
    }
}

impl AsEmoji for Option<LetterState> {
    fn as_emoji(&self) -> Cow<str> {
        match self {
            Some(state) => state.as_emoji(),
            None => UNUSED.into(),
        }
    }
}

impl AsEmoji for Guess {
    fn as_emoji(&self) -> Cow<str> {
        self.iter()
            .map(|(_, state)| state.as_emoji())
            .collect::<String>()
            .into()
    }

    fn emoji_with_letters(&self) -> String {
        let (letters, states) =
            self.iter()
                .fold((String::new(), String::new()), |(letters, states), (letter, state)| {
                    (
                        letters + " " + &letter.to_ascii_uppercase().to_string() + " ",
                        states + &state.as_emoji(),
                    )
                });

        letters + "\n" + &states
    }
}

impl AsEmoji for GameState {
    fn as_emoji(&self) -> Cow<str> {
        self.history()
            .map(|guess| guess.as_emoji().into_owned())
            .collect::<Vec<_>>()
            .join("\n")
            .into()
    }

    fn emoji_with_letters(&self) -> String {
        self.history()
            .map(|guess| guess.emoji_with_letters())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl AsEmoji for Keyboard {
    fn as_emoji(&self) -> Cow<str> {
        KEYBOARD_ROWS
            .iter()
            .map(|row| {
                row.chars()
                    .map(|letter| self.get(letter).as_emoji().into_owned())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
            .into()
    }

    fn emoji_with_letters(&self) -> String {
        KEYBOARD_ROWS
            .iter()
            .map(|row| {
                let letters = row
                    .chars()
                    .map(|letter| format!(" {} ", letter.to_ascii_uppercase()))
                    .collect::<String>();
                let states = row
                    .chars()
                    .map(|letter| self.get(letter).as_emoji().into_owned())
                    .collect::<String>();

                letters + "\n" + &states
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
