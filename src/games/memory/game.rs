//! The game aggregate and its round state machine.
//!
//! A game moves from `InProgress` to `Completed` exactly once, when the last
//! pair is matched. Completed games reject every further round.

use super::{Board, CardType, GameError, InvariantError, Position, TOTAL_CARDS};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Lifecycle status of a game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GameStatus {
    /// Pairs remain hidden.
    InProgress,
    /// All eight pairs are matched. Terminal.
    Completed,
}

/// A memory match game.
///
/// Invariants:
/// - `matched_cards` has even length, at most 16, no duplicates
/// - `status` is `Completed` iff all 16 cards are matched
/// - `end_time` is set iff `status` is `Completed`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    id: String,
    board: Board,
    matched_cards: Vec<Position>,
    status: GameStatus,
    start_time: DateTime<Utc>,
    end_time: Option<DateTime<Utc>>,
    attempt_count: u32,
    version: i32,
}

/// Every stored field of a game, used to rebuild it from persistence.
#[derive(Debug, Clone)]
pub struct GameSnapshot {
    /// Game identifier.
    pub id: String,
    /// Hidden board.
    pub board: Board,
    /// Matched positions in the order they were found.
    pub matched_cards: Vec<Position>,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Creation time.
    pub start_time: DateTime<Utc>,
    /// Completion time.
    pub end_time: Option<DateTime<Utc>>,
    /// Accepted rounds so far.
    pub attempt_count: u32,
    /// Optimistic concurrency version.
    pub version: i32,
}

impl Game {
    /// Creates a fresh in-progress game.
    #[instrument(skip(board))]
    pub fn new(id: String, board: Board, start_time: DateTime<Utc>) -> Self {
        debug!(game_id = %id, "Creating game");
        Self {
            id,
            board,
            matched_cards: Vec::new(),
            status: GameStatus::InProgress,
            start_time,
            end_time: None,
            attempt_count: 0,
            version: 0,
        }
    }

    /// Game identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The hidden board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Positions confirmed as pairs, in submission order.
    pub fn matched_cards(&self) -> &[Position] {
        &self.matched_cards
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Creation time.
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Completion time, present only for completed games.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    /// Number of accepted rounds.
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// Version of the stored record this game was loaded from.
    pub fn version(&self) -> i32 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    /// Returns true once every pair is matched.
    pub fn is_completed(&self) -> bool {
        self.status == GameStatus::Completed
    }

    /// Returns true if the position is part of a matched pair.
    pub fn is_matched(&self, position: Position) -> bool {
        self.matched_cards.contains(&position)
    }

    /// Milliseconds between start and completion, 0 while in progress.
    pub fn duration_ms(&self) -> i64 {
        self.end_time
            .map(|end| (end - self.start_time).num_milliseconds())
            .unwrap_or(0)
    }

    /// Evaluates one round: reveals both cards, records a match, and detects
    /// completion.
    ///
    /// Validation happens before any mutation, so a rejected round leaves the
    /// game untouched. `now` becomes the end time if this round completes
    /// the game.
    #[instrument(
        skip(self, first, second),
        fields(game_id = %self.id, first = %first, second = %second)
    )]
    pub fn play_round(
        &mut self,
        first: Position,
        second: Position,
        now: DateTime<Utc>,
    ) -> Result<RoundOutcome, GameError> {
        if first == second {
            warn!("Same card selected twice");
            return Err(GameError::DuplicateSelection(first));
        }
        if self.is_completed() {
            warn!("Round submitted to completed game");
            return Err(GameError::GameAlreadyCompleted(self.id.clone()));
        }
        if let Some(&taken) = [first, second].iter().find(|&&p| self.is_matched(p)) {
            warn!(position = %taken, "Card already matched");
            return Err(GameError::PositionAlreadyMatched(taken));
        }

        let value1 = self.board.card_at(first);
        let value2 = self.board.card_at(second);
        let is_match = value1 == value2;

        self.attempt_count += 1;
        let attempt_number = self.attempt_count;

        if is_match {
            self.matched_cards.push(first);
            self.matched_cards.push(second);
            debug!(matched = self.matched_cards.len(), "Pair matched");
        }

        let game_completed = self.matched_cards.len() == TOTAL_CARDS;
        if game_completed {
            self.status = GameStatus::Completed;
            self.end_time = Some(now);
            info!(attempts = self.attempt_count, "Game completed");
        }

        Ok(RoundOutcome {
            is_match,
            card1: RevealedCard::new(first, value1),
            card2: RevealedCard::new(second, value2),
            game_completed,
            attempt_number,
        })
    }

    /// Public view of the game. The board is never included.
    pub fn state(&self) -> GameStateView {
        GameStateView {
            game_id: self.id.clone(),
            status: self.status,
            matched_cards: self.matched_cards.clone(),
            attempt_count: self.attempt_count,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    /// Captures every stored field.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            id: self.id.clone(),
            board: self.board,
            matched_cards: self.matched_cards.clone(),
            status: self.status,
            start_time: self.start_time,
            end_time: self.end_time,
            attempt_count: self.attempt_count,
            version: self.version,
        }
    }
}

impl TryFrom<GameSnapshot> for Game {
    type Error = InvariantError;

    /// Rebuilds a game, refusing snapshots that break the aggregate invariants.
    fn try_from(s: GameSnapshot) -> Result<Self, Self::Error> {
        let matched = s.matched_cards.len();
        if matched % 2 != 0 || matched > TOTAL_CARDS {
            return Err(InvariantError::new(format!(
                "Game '{}' has {} matched cards",
                s.id, matched
            )));
        }
        for (i, position) in s.matched_cards.iter().enumerate() {
            if s.matched_cards[..i].contains(position) {
                return Err(InvariantError::new(format!(
                    "Game '{}' lists {} twice",
                    s.id, position
                )));
            }
        }
        let completed = s.status == GameStatus::Completed;
        if completed != (matched == TOTAL_CARDS) {
            return Err(InvariantError::new(format!(
                "Game '{}' is {} with {} matched cards",
                s.id, s.status, matched
            )));
        }
        if completed != s.end_time.is_some() {
            return Err(InvariantError::new(format!(
                "Game '{}' end time disagrees with status",
                s.id
            )));
        }
        Ok(Self {
            id: s.id,
            board: s.board,
            matched_cards: s.matched_cards,
            status: s.status,
            start_time: s.start_time,
            end_time: s.end_time,
            attempt_count: s.attempt_count,
            version: s.version,
        })
    }
}

/// A card turned face up during a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RevealedCard {
    /// Where the card sits.
    pub position: Position,
    /// Its face.
    pub value: CardType,
}

impl RevealedCard {
    /// Pairs a position with its card.
    pub fn new(position: Position, value: CardType) -> Self {
        Self { position, value }
    }
}

/// Result of an accepted round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoundOutcome {
    /// Both cards show the same animal.
    pub is_match: bool,
    /// First card, as submitted.
    pub card1: RevealedCard,
    /// Second card, as submitted.
    pub card2: RevealedCard,
    /// This round matched the final pair.
    pub game_completed: bool,
    /// 1-based number of this round within the game.
    pub attempt_number: u32,
}

/// Game state as shown to players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameStateView {
    /// Game identifier.
    pub game_id: String,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Matched positions.
    pub matched_cards: Vec<Position>,
    /// Accepted rounds.
    pub attempt_count: u32,
    /// Creation time.
    pub start_time: DateTime<Utc>,
    /// Completion time.
    pub end_time: Option<DateTime<Utc>>,
}
