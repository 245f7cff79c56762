use std::str::FromStr;

use crate::ids::PlayerId;

use super::options::Difficulty;

/// A chat message that means something to the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NewGame(Difficulty),
    Guess(String),
    Status,
    Quit,
    /// `None` means the sender.
    Points(Option<PlayerId>),
    Stats(Option<PlayerId>),
    Top,
    Global,
    Help,
}

pub const HELP: &str = "\
`new wordle` - start a new game (normal difficulty)
`new wordle normal` - unlimited guesses, one point less for every guess after the first
`new wordle hard` - 6 guesses, and revealed hints must be used
`guess <word>` - make a guess (5-letter word)
`wordle status` - show the current game
`wordle points [player]` - show points
`wordle stats [player]` - show detailed statistics
`wordle top` - top players in this server
`wordle global` - top players everywhere
`wordle quit` - quit the current game (normal mode only)
`wordle help` - show this message";

impl Command {
    /// Anything that isn't a command is `None` and should be ignored.
    pub fn parse(message: &str) -> Option<Self> {
        let words: Vec<&str> = message.split_whitespace().collect();
        let keyword = |index: usize| words.get(index).map(|word| word.to_lowercase());

        match (keyword(0)?.as_str(), keyword(1).as_deref(), words.len()) {
            ("new", Some("wordle"), 2) => Some(Self::NewGame(Difficulty::Normal)),
            ("new", Some("wordle"), 3) => Difficulty::from_str(words[2]).ok().map(Self::NewGame),
            ("guess", Some(_), 2) => Some(Self::Guess(words[1].to_owned())),
            ("wordle", Some(sub), len) => Self::parse_wordle(sub, words.get(2).copied(), len),
            _ => None,
        }
    }

    fn parse_wordle(sub: &str, target: Option<&str>, len: usize) -> Option<Self> {
        let target = target.map(PlayerId::from);

        match (sub, len) {
            ("points", 2 | 3) => Some(Self::Points(target)),
            ("stats" | "statistics", 2 | 3) => Some(Self::Stats(target)),
            ("status", 2) => Some(Self::Status),
            ("quit", 2) => Some(Self::Quit),
            ("top", 2) => Some(Self::Top),
            ("global", 2) => Some(Self::Global),
            ("help", 2) => Some(Self::Help),
            _ => None,
        }
    }
}
