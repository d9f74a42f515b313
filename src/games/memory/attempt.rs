//! Immutable history of accepted rounds.

use super::{CardType, Position, RoundOutcome};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;

/// Record of one accepted round. Never modified once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    /// Owning game.
    #[serde(skip)]
    pub game_id: String,
    /// 1-based, dense within a game.
    pub attempt_number: u32,
    /// Positions as submitted.
    pub positions: [Position; 2],
    /// Cards revealed at those positions.
    pub values: [CardType; 2],
    /// Whether the two cards matched.
    pub is_match: bool,
    /// When the round was recorded.
    pub timestamp: DateTime<Utc>,
}

impl Attempt {
    /// Builds the history entry for an accepted round.
    pub fn from_round(game_id: &str, outcome: &RoundOutcome, timestamp: DateTime<Utc>) -> Self {
        Self {
            game_id: game_id.to_string(),
            attempt_number: outcome.attempt_number,
            positions: [outcome.card1.position, outcome.card2.position],
            values: [outcome.card1.value, outcome.card2.value],
            is_match: outcome.is_match,
            timestamp,
        }
    }
}

/// Attempt history of one game, ascending by attempt number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameHistory {
    /// Game identifier.
    pub game_id: String,
    /// Accepted rounds in order.
    pub attempts: Vec<Attempt>,
}
