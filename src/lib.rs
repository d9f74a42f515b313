//! Memory Match library - server-side engine for a card matching game
//!
//! Players flip two cards per round on a hidden 4x4 board of eight animal
//! pairs. The engine validates rounds, records their history, and ranks
//! completed games.
//!
//! # Architecture
//!
//! - **Games**: board generation, position codec, round state machine, ranking
//! - **Store**: persistence interface with in-memory and SQLite backends
//! - **Service**: create / state / play / history / leaderboard operations
//! - **Server**: axum REST layer with an OpenAPI document
//!
//! # Example
//!
//! ```
//! use memory_match::{GameService, InMemoryGameStore};
//!
//! # fn example() -> Result<(), memory_match::ServiceError> {
//! let service = GameService::new(InMemoryGameStore::new());
//! let created = service.create_game()?;
//! let outcome = service.play_round(&created.game_id, "A1", "B2")?;
//! assert_eq!(outcome.attempt_number, 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod db;
mod games;
mod openapi;
mod server;
mod service;
mod store;

// Crate-level exports - Configuration
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Persistence
pub use db::{DbError, DbErrorKind, GameRepository, MIGRATIONS};
pub use store::{GameStore, InMemoryGameStore, SaveOutcome};

// Crate-level exports - Service layer
pub use service::{GAME_CREATED_MESSAGE, GameCreated, GameService, ServiceError};

// Crate-level exports - HTTP server
pub use openapi::{OPENAPI_PATH, openapi_document};
pub use server::{ApiError, AppState, PlayRoundRequest, router};

// Crate-level exports - Game types (memory match)
pub use games::memory::{
    Attempt, Board, CardType, Game, GameError, GameHistory, GameSnapshot, GameStateView,
    GameStatus, InvariantError, LEADERBOARD_SIZE, LeaderboardEntry, Position, RevealedCard,
    RoundOutcome, TOTAL_CARDS, TOTAL_PAIRS, leaderboard_order, rank,
};
