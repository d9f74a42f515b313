//! Memory match: find the eight animal pairs on a hidden 4x4 board.

mod attempt;
mod board;
mod card;
mod error;
mod game;
mod leaderboard;
mod position;

pub use attempt::{Attempt, GameHistory};
pub use board::{Board, TOTAL_CARDS, TOTAL_PAIRS};
pub use card::CardType;
pub use error::{GameError, InvariantError};
pub use game::{Game, GameSnapshot, GameStateView, GameStatus, RevealedCard, RoundOutcome};
pub use leaderboard::{LEADERBOARD_SIZE, LeaderboardEntry, leaderboard_order, rank};
pub use position::Position;
