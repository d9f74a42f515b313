//! Rejections raised while validating a round.

use super::Position;
use tracing::instrument;

/// Reason a memory game operation was rejected.
///
/// Every variant aborts the operation before anything is persisted. The
/// payload identifies the offending input for logs; the message is fixed
/// per kind.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// Coordinate text is not a column `A`-`D` followed by a row `1`-`4`.
    #[display("Invalid card position format. Must be A-D and 1-4 (e.g., A1, B3, D4)")]
    InvalidPosition(String),

    /// Both positions of a round are the same card.
    #[display("Cannot select the same card twice")]
    DuplicateSelection(Position),

    /// No game exists with the given identifier.
    #[display("Game with ID '{}' not found", _0)]
    GameNotFound(String),

    /// The game has already been completed.
    #[display("Game is already completed")]
    GameAlreadyCompleted(String),

    /// The position belongs to a pair that was already matched.
    #[display("One or both cards are already matched")]
    PositionAlreadyMatched(Position),
}

impl std::error::Error for GameError {}

/// A board or game record that breaks the aggregate's invariants.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Invariant violated: {} at {}:{}", message, file, line)]
pub struct InvariantError {
    /// What is inconsistent.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl InvariantError {
    /// Creates an error at the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
