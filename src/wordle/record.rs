use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use tinyvec::TinyVec;

use crate::ids::ChannelId;

use super::{
    core::{GuessResult, LetterState, ParseWordError, Statuses, Word},
    game::GameState,
    hard_mode::HardModeConstraints,
    options::{Difficulty, GuessesLimit},
};

/// Stored form of a [`GameState`].
///
/// Field names match the `games.json` files written by earlier versions of
/// the bot, so those files load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub answer: String,
    pub difficulty: Difficulty,
    #[serde(rename = "maxGuesses")]
    pub max_guesses: usize,
    pub guesses: Vec<String>,
    pub channel_id: ChannelId,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    pub is_hard_mode: bool,
    #[serde(default)]
    pub green_constraints: BTreeMap<String, String>,
    #[serde(default)]
    pub yellow_constraints: YellowRecord,
    pub guess_results: Vec<GuessResultRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessResultRecord {
    pub statuses: Vec<LetterState>,
    pub is_correct: bool,
    pub is_finished: bool,
    /// Always empty for stored results.
    #[serde(default)]
    pub error: String,
}

/// Yellow letters in the order they were revealed, each with the positions
/// it was seen in. Serialized as a map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YellowRecord(pub Vec<(String, Vec<usize>)>);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("invalid word: {0}")]
    Word(#[from] ParseWordError),

    #[error("`{0}` appears more than once in the guesses")]
    DuplicateGuess(Word),

    #[error("{guesses} guesses but {results} results")]
    Misaligned { guesses: usize, results: usize },

    #[error("guess {index} has {count} statuses")]
    StatusCount { index: usize, count: usize },

    #[error("guess {index} comes after the game finished")]
    GuessAfterFinish { index: usize },

    #[error("`{0}` is not a board position")]
    Position(String),

    #[error("`{0}` is not a single letter")]
    Letter(String),

    #[error("difficulty is {difficulty} but is_hard_mode is {is_hard_mode}")]
    HardModeFlag {
        difficulty: Difficulty,
        is_hard_mode: bool,
    },
}

impl From<&GameState> for GameRecord {
    fn from(game: &GameState) -> Self {
        let green_constraints = game
            .constraints
            .green()
            .iter()
            .map(|(position, letter)| (position.to_string(), letter.to_string()))
            .collect();

        let yellow_constraints = YellowRecord(
            game.constraints
                .yellow()
                .map(|(letter, positions)| {
                    (letter.to_string(), positions.iter().copied().collect())
                })
                .collect(),
        );

        let guess_results = game
            .results
            .iter()
            .map(|result| GuessResultRecord {
                statuses: result.statuses().to_vec(),
                is_correct: result.is_correct(),
                is_finished: result.is_finished(),
                error: String::new(),
            })
            .collect();

        Self {
            answer: game.answer.to_string(),
            difficulty: game.difficulty,
            max_guesses: game.limit.map_or(0, GuessesLimit::get),
            guesses: game.guesses.iter().map(Word::to_string).collect(),
            channel_id: game.channel_id.clone(),
            created_at: game.created_at,
            is_hard_mode: game.difficulty.is_hard(),
            green_constraints,
            yellow_constraints,
            guess_results,
        }
    }
}

impl From<GameState> for GameRecord {
    fn from(game: GameState) -> Self {
        Self::from(&game)
    }
}

impl TryFrom<GameRecord> for GameState {
    type Error = RecordError;

    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        if record.is_hard_mode != record.difficulty.is_hard() {
            return Err(RecordError::HardModeFlag {
                difficulty: record.difficulty,
                is_hard_mode: record.is_hard_mode,
            });
        }

        if record.guesses.len() != record.guess_results.len() {
            return Err(RecordError::Misaligned {
                guesses: record.guesses.len(),
                results: record.guess_results.len(),
            });
        }

        let answer = Word::from_str(&record.answer)?;

        let mut guesses: TinyVec<[Word; 6]> = TinyVec::default();
        for raw in &record.guesses {
            let word = Word::from_str(raw)?;
            if guesses.contains(&word) {
                return Err(RecordError::DuplicateGuess(word));
            }
            guesses.push(word);
        }

        let mut results: TinyVec<[GuessResult; 6]> = TinyVec::default();
        for (index, result) in record.guess_results.iter().enumerate() {
            if results.last().is_some_and(GuessResult::is_finished) {
                return Err(RecordError::GuessAfterFinish { index });
            }

            let statuses: Statuses =
                result
                    .statuses
                    .as_slice()
                    .try_into()
                    .map_err(|_| RecordError::StatusCount {
                        index,
                        count: result.statuses.len(),
                    })?;

            results.push(GuessResult::new(
                statuses,
                result.is_correct,
                result.is_finished,
            ));
        }

        let mut constraints = HardModeConstraints::new();
        for (position, letter) in &record.green_constraints {
            constraints.insert_green(parse_position(position)?, parse_letter(letter)?);
        }
        for (letter, positions) in &record.yellow_constraints.0 {
            let letter = parse_letter(letter)?;
            for position in positions {
                if *position >= Word::LENGTH {
                    return Err(RecordError::Position(position.to_string()));
                }
                constraints.add_yellow(letter, *position);
            }
        }

        Ok(Self {
            answer,
            difficulty: record.difficulty,
            limit: GuessesLimit::try_new(record.max_guesses),
            guesses,
            results,
            constraints,
            channel_id: record.channel_id,
            created_at: record.created_at,
        })
    }
}

fn parse_position(raw: &str) -> Result<usize, RecordError> {
    raw.trim()
        .parse::<usize>()
        .ok()
        .filter(|position| *position < Word::LENGTH)
        .ok_or_else(|| RecordError::Position(raw.to_owned()))
}

fn parse_letter(raw: &str) -> Result<char, RecordError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter.is_ascii_alphabetic() => Ok(letter.to_ascii_lowercase()),
        _ => Err(RecordError::Letter(raw.to_owned())),
    }
}

impl Serialize for YellowRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (letter, positions) in &self.0 {
            map.serialize_entry(letter, positions)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for YellowRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct YellowVisitor;

        impl<'de> Visitor<'de> for YellowVisitor {
            type Value = YellowRecord;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of letters to lists of positions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, Vec<usize>)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));

                while let Some((letter, positions)) = access.next_entry::<String, Vec<usize>>()? {
                    match entries.iter_mut().find(|(existing, _)| *existing == letter) {
                        Some((_, existing)) => existing.extend(positions),
                        None => entries.push((letter, positions)),
                    }
                }

                Ok(YellowRecord(entries))
            }
        }

        deserializer.deserialize_map(YellowVisitor)
    }
}

/// RFC 3339 timestamps. Zone-less ISO timestamps from older files are read
/// as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Earlier files hold epoch seconds as a float; some hand-edited ones
    /// hold a naive ISO string.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Seconds(seconds) => from_epoch_seconds(seconds)
                .ok_or_else(|| D::Error::custom(format!("timestamp {seconds} is out of range"))),
            Raw::Text(raw) => from_text(&raw).map_err(D::Error::custom),
        }
    }

    // rounded to microseconds, the precision the float was written with
    fn from_epoch_seconds(seconds: f64) -> Option<DateTime<Utc>> {
        if !seconds.is_finite() {
            return None;
        }

        #[allow(clippy::cast_possible_truncation)]
        let micros = (seconds * 1_000_000.0).round() as i64;
        let nanos = u32::try_from(micros.rem_euclid(1_000_000) * 1_000).ok()?;

        Utc.timestamp_opt(micros.div_euclid(1_000_000), nanos).single()
    }

    fn from_text(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Ok(parsed.with_timezone(&Utc));
        }

        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Utc.from_utc_datetime(&naive))
    }
}
