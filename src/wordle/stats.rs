use serde::{Deserialize, Serialize};

use super::{options::Difficulty, scoring::calculate_points};

/// Running totals for one player in one server.
///
/// Older stored records may lack the guess counters, so every field
/// defaults to zero when missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserScoreRecord {
    pub points: u32,
    pub games_won: u32,
    pub games_played: u32,
    pub total_guesses: u32,
    pub first_attempt_guesses: u32,
}

impl UserScoreRecord {
    /// Credits a solved game and returns the points it earned.
    pub fn record_win(&mut self, difficulty: Difficulty, guesses_used: usize) -> u32 {
        let points = calculate_points(difficulty, guesses_used);
        let guesses = u32::try_from(guesses_used).unwrap_or(u32::MAX);

        self.points = self.points.saturating_add(points);
        self.games_won += 1;
        self.games_played += 1;
        self.total_guesses = self.total_guesses.saturating_add(guesses);
        if guesses_used == 1 {
            self.first_attempt_guesses += 1;
        }

        points
    }

    pub fn record_loss(&mut self) {
        self.games_played += 1;
    }

    /// Mean number of guesses per solved game, or zero before the first win.
    pub fn average_guesses(&self) -> f64 {
        if self.games_won == 0 {
            0.0
        } else {
            f64::from(self.total_guesses) / f64::from(self.games_won)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::UserScoreRecord;
    use crate::wordle::options::Difficulty;

    #[test]
    fn win_updates_every_counter() {
        let mut score = UserScoreRecord::default();

        assert_eq!(score.record_win(Difficulty::Hard, 3), 16);
        assert_eq!(score.record_win(Difficulty::Normal, 1), 10);

        assert_eq!(
            score,
            UserScoreRecord {
                points: 26,
                games_won: 2,
                games_played: 2,
                total_guesses: 4,
                first_attempt_guesses: 1,
            }
        );
        assert_eq!(score.average_guesses(), 2.0);
    }

    #[test]
    fn loss_only_counts_the_game() {
        let mut score = UserScoreRecord::default();
        score.record_loss();

        assert_eq!(score.games_played, 1);
        assert_eq!(score.points, 0);
        assert_eq!(score.average_guesses(), 0.0);
    }

    #[test]
    fn missing_fields_default() {
        let score: UserScoreRecord =
            serde_json::from_str(r#"{"points": 12, "gamesWon": 1, "gamesPlayed": 3}"#).unwrap();

        assert_eq!(score.total_guesses, 0);
        assert_eq!(score.first_attempt_guesses, 0);
        assert_eq!(
            serde_json::to_value(score).unwrap()["gamesPlayed"],
            serde_json::json!(3)
        );
    }
}
