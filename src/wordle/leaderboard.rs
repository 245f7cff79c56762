use std::collections::{BTreeMap, BTreeSet};

use crate::{ids::PlayerId, storage::ScoreEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    /// Starts at 1.
    pub rank: usize,
    pub player: PlayerId,
    pub points: u32,
}

/// Top `limit` players of one server, ranked by their points from every
/// server. Anyone with a record in `members` counts as part of the server.
pub fn server_leaderboard(
    members: impl IntoIterator<Item = ScoreEntry>,
    everyone: impl IntoIterator<Item = ScoreEntry>,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    let members: BTreeSet<PlayerId> = members.into_iter().map(|entry| entry.player).collect();

    rank(
        totals(everyone)
            .into_iter()
            .filter(|(player, _)| members.contains(player)),
        limit,
    )
}

/// Top `limit` players counting their points from every server.
pub fn global_leaderboard(
    scores: impl IntoIterator<Item = ScoreEntry>,
    limit: usize,
) -> Vec<LeaderboardEntry> {
    rank(totals(scores), limit)
}

fn totals(scores: impl IntoIterator<Item = ScoreEntry>) -> BTreeMap<PlayerId, u32> {
    let mut totals: BTreeMap<PlayerId, u32> = BTreeMap::new();
    for entry in scores {
        let total = totals.entry(entry.player).or_default();
        *total = total.saturating_add(entry.score.points);
    }
    totals
}

// highest points first, ties by player id; players without points are left out
fn rank(points: impl IntoIterator<Item = (PlayerId, u32)>, limit: usize) -> Vec<LeaderboardEntry> {
    let mut players: Vec<(PlayerId, u32)> = points
        .into_iter()
        .filter(|(_, points)| *points > 0)
        .collect();

    players.sort_by(|(a_id, a_points), (b_id, b_points)| {
        b_points.cmp(a_points).then_with(|| a_id.cmp(b_id))
    });

    players
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(index, (player, points))| LeaderboardEntry {
            rank: index + 1,
            player,
            points,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{global_leaderboard, server_leaderboard, LeaderboardEntry};
    use crate::{
        ids::{PlayerId, ServerId},
        storage::ScoreEntry,
        wordle::stats::UserScoreRecord,
    };

    fn entry(server: &str, player: &str, points: u32) -> ScoreEntry {
        ScoreEntry {
            server: ServerId::new(server),
            player: PlayerId::new(player),
            score: UserScoreRecord {
                points,
                ..UserScoreRecord::default()
            },
        }
    }

    fn names(board: &[LeaderboardEntry]) -> Vec<(&str, u32)> {
        board
            .iter()
            .map(|entry| (entry.player.as_str(), entry.points))
            .collect()
    }

    #[test]
    fn server_board_sorted_and_limited() {
        let scores = vec![
            entry("1", "cy", 12),
            entry("1", "ada", 30),
            entry("1", "bo", 12),
            entry("1", "dee", 0),
            entry("1", "eve", 5),
        ];
        let board = server_leaderboard(scores.clone(), scores, 3);

        assert_eq!(names(&board), vec![("ada", 30), ("bo", 12), ("cy", 12)]);
        assert_eq!(board[2].rank, 3);
    }

    #[test]
    fn server_board_uses_global_totals() {
        let members = vec![entry("1", "ada", 5), entry("1", "bo", 0)];
        let everyone = vec![
            entry("1", "ada", 5),
            entry("1", "bo", 0),
            entry("2", "bo", 40),
            entry("2", "cy", 100),
        ];

        let board = server_leaderboard(members, everyone, 5);

        assert_eq!(names(&board), vec![("bo", 40), ("ada", 5)]);
    }

    #[test]
    fn global_board_sums_servers() {
        let board = global_leaderboard(
            vec![
                entry("1", "ada", 10),
                entry("2", "ada", 15),
                entry("1", "bo", 20),
                entry("3", "cy", 0),
            ],
            10,
        );

        assert_eq!(names(&board), vec![("ada", 25), ("bo", 20)]);
    }

    #[test]
    fn empty_board() {
        assert!(server_leaderboard(Vec::new(), vec![entry("2", "cy", 3)], 5).is_empty());
    }
}
