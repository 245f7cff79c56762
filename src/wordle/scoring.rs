use super::options::Difficulty;

const NORMAL_FIRST_TRY_POINTS: u32 = 10;

/// Points awarded for solving a puzzle in `guesses_used` guesses.
pub fn calculate_points(difficulty: Difficulty, guesses_used: usize) -> u32 {
    match difficulty {
        Difficulty::Hard => match guesses_used {
            1 => 20,
            2 => 18,
            3 => 16,
            4 => 14,
            5 => 12,
            6 => 10,
            _ => 0,
        },
        Difficulty::Normal => {
            let extra_guesses = guesses_used.saturating_sub(1);
            u32::try_from(extra_guesses)
                .map_or(0, |extra| NORMAL_FIRST_TRY_POINTS.saturating_sub(extra))
        }
    }
}
