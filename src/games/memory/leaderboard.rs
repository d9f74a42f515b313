//! Ranking of completed games.

use super::{Game, GameStatus};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::instrument;

/// Number of entries on the leaderboard.
pub const LEADERBOARD_SIZE: usize = 5;

/// One ranked game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// Game identifier.
    pub game_id: String,
    /// Rounds needed to finish.
    pub attempt_count: u32,
    /// Creation time.
    pub start_time: DateTime<Utc>,
    /// Completion time.
    pub end_time: Option<DateTime<Utc>>,
    /// `end_time - start_time` in milliseconds.
    pub duration_ms: i64,
}

impl From<&Game> for LeaderboardEntry {
    fn from(game: &Game) -> Self {
        Self {
            game_id: game.id().to_string(),
            attempt_count: game.attempt_count(),
            start_time: game.start_time(),
            end_time: game.end_time(),
            duration_ms: game.duration_ms(),
        }
    }
}

/// Leaderboard order: fewer attempts first, then earlier end time.
pub fn leaderboard_order(a: &Game, b: &Game) -> Ordering {
    a.attempt_count()
        .cmp(&b.attempt_count())
        .then_with(|| a.end_time().cmp(&b.end_time()))
}

/// Keeps the completed games, orders them for the leaderboard and truncates
/// to `limit`.
#[instrument(skip(games))]
pub fn rank(games: impl IntoIterator<Item = Game>, limit: usize) -> Vec<Game> {
    let mut completed: Vec<Game> = games
        .into_iter()
        .filter(|g| g.status() == GameStatus::Completed)
        .collect();
    completed.sort_by(leaderboard_order);
    completed.truncate(limit);
    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::memory::{Board, GameSnapshot, Position};
    use chrono::{Duration, TimeZone};

    fn completed(id: &str, attempts: u32, start: DateTime<Utc>, minutes: i64) -> Game {
        Game::try_from(GameSnapshot {
            id: id.to_string(),
            board: Board::random(),
            matched_cards: Position::all().collect(),
            status: GameStatus::Completed,
            start_time: start,
            end_time: Some(start + Duration::minutes(minutes)),
            attempt_count: attempts,
            version: 1,
        })
        .unwrap()
    }

    #[test]
    fn orders_by_attempts_then_end_time() {
        let start = Utc.with_ymd_and_hms(2025, 10, 4, 10, 0, 0).unwrap();
        let games = vec![
            completed("slow", 10, start, 5),
            completed("fast", 10, start, 3),
            completed("many", 15, start, 2),
        ];
        let ranked: Vec<LeaderboardEntry> = rank(games, LEADERBOARD_SIZE)
            .iter()
            .map(LeaderboardEntry::from)
            .collect();
        let ids: Vec<_> = ranked.iter().map(|e| e.game_id.as_str()).collect();
        assert_eq!(ids, ["fast", "slow", "many"]);
        assert_eq!(ranked[0].duration_ms, 3 * 60 * 1000);
        assert_eq!(ranked[1].duration_ms, 5 * 60 * 1000);
    }

    #[test]
    fn tiebreak_uses_end_time_not_duration() {
        let early = Utc.with_ymd_and_hms(2025, 10, 4, 9, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 10, 4, 10, 0, 0).unwrap();
        // Longer game that finished first wins the tie.
        let games = vec![completed("short", 9, late, 1), completed("long", 9, early, 20)];
        let ranked = rank(games, LEADERBOARD_SIZE);
        assert_eq!(ranked[0].id(), "long");
    }

    #[test]
    fn skips_in_progress_and_truncates() {
        let start = Utc.with_ymd_and_hms(2025, 10, 4, 10, 0, 0).unwrap();
        let mut games: Vec<Game> = (0..7)
            .map(|i| completed(&format!("g{i}"), 8 + i, start, 1))
            .collect();
        games.push(Game::new("open".to_string(), Board::random(), start));

        let ranked = rank(games, LEADERBOARD_SIZE);
        assert_eq!(ranked.len(), 5);
        assert!(ranked.iter().all(|g| g.id() != "open"));
        assert_eq!(ranked[0].attempt_count(), 8);
    }

    #[test]
    fn empty_when_nothing_completed() {
        let games = vec![Game::new("open".to_string(), Board::random(), Utc::now())];
        assert!(rank(games, LEADERBOARD_SIZE).is_empty());
        assert!(rank(Vec::new(), LEADERBOARD_SIZE).is_empty());
    }
}
