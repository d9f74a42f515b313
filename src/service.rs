//! Game operations: create, inspect, play, and rank.

use chrono::Utc;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::db::DbError;
use crate::games::memory::{
    Attempt, Board, Game, GameError, GameHistory, GameStateView, LEADERBOARD_SIZE,
    LeaderboardEntry, Position, RoundOutcome,
};
use crate::store::{GameStore, SaveOutcome};

/// Message returned when a game is created.
pub const GAME_CREATED_MESSAGE: &str = "New game created successfully";

/// Response to game creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameCreated {
    /// Session key for the new game.
    pub game_id: String,
    /// Human-readable confirmation.
    pub message: String,
}

/// Failure of a service operation.
#[derive(Debug, Clone, derive_more::Display, derive_more::From)]
pub enum ServiceError {
    /// The request was rejected by the game rules.
    #[from]
    #[display("{_0}")]
    Game(GameError),

    /// The store failed.
    #[from]
    #[display("{_0}")]
    Storage(DbError),

    /// Another round on the same game was saved first.
    #[display("Game '{_0}' was updated by another request, retry the round")]
    ConcurrentUpdate(String),
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Game(e) => Some(e),
            Self::Storage(e) => Some(e),
            Self::ConcurrentUpdate(_) => None,
        }
    }
}

/// Memory game operations over a [`GameStore`].
///
/// Holds no game state of its own; every call loads what it needs.
#[derive(Debug, Clone)]
pub struct GameService<S> {
    store: S,
}

impl<S: GameStore> GameService<S> {
    /// Creates a service backed by `store`.
    #[instrument(skip(store))]
    pub fn new(store: S) -> Self {
        info!("Creating GameService");
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Starts a new game on a freshly shuffled board.
    #[instrument(skip(self))]
    pub fn create_game(&self) -> Result<GameCreated, ServiceError> {
        self.create_game_with_board(Board::random())
    }

    /// Starts a new game on the given board.
    #[instrument(skip(self, board))]
    pub fn create_game_with_board(&self, board: Board) -> Result<GameCreated, ServiceError> {
        let game_id = Uuid::new_v4().to_string();
        let game = Game::new(game_id.clone(), board, Utc::now());
        self.store.create_game(&game)?;

        info!(game_id = %game_id, "Game created");
        Ok(GameCreated {
            game_id,
            message: GAME_CREATED_MESSAGE.to_string(),
        })
    }

    /// Returns the public state of a game.
    #[instrument(skip(self))]
    pub fn game_state(&self, game_id: &str) -> Result<GameStateView, ServiceError> {
        Ok(self.load(game_id)?.state())
    }

    /// Plays one round.
    ///
    /// Checks run in a fixed order and stop at the first failure: position
    /// syntax, duplicate selection, game existence, completion, already
    /// matched cards. Nothing is written unless every check passes.
    #[instrument(skip(self))]
    pub fn play_round(
        &self,
        game_id: &str,
        position1: &str,
        position2: &str,
    ) -> Result<RoundOutcome, ServiceError> {
        let first = Position::parse(position1)?;
        let second = Position::parse(position2)?;
        if position1 == position2 {
            warn!(position = %first, "Same card selected twice");
            return Err(GameError::DuplicateSelection(first).into());
        }

        let mut game = self.load(game_id)?;
        let outcome = game.play_round(first, second, Utc::now())?;

        if self.store.save_game(&game)? == SaveOutcome::Stale {
            warn!(game_id, "Concurrent round detected");
            return Err(ServiceError::ConcurrentUpdate(game_id.to_string()));
        }

        let attempt = Attempt::from_round(game_id, &outcome, Utc::now());
        self.store.append_attempt(&attempt)?;

        info!(
            game_id,
            attempt_number = outcome.attempt_number,
            is_match = outcome.is_match,
            game_completed = outcome.game_completed,
            "Round played"
        );
        Ok(outcome)
    }

    /// Returns every accepted round of a game, oldest first.
    #[instrument(skip(self))]
    pub fn history(&self, game_id: &str) -> Result<GameHistory, ServiceError> {
        self.load(game_id)?;
        let attempts = self.store.list_attempts(game_id)?;
        debug!(count = attempts.len(), "History loaded");
        Ok(GameHistory {
            game_id: game_id.to_string(),
            attempts,
        })
    }

    /// Returns the top completed games.
    #[instrument(skip(self))]
    pub fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>, ServiceError> {
        let games = self.store.list_completed_games(LEADERBOARD_SIZE)?;
        debug!(count = games.len(), "Leaderboard loaded");
        Ok(games.iter().map(LeaderboardEntry::from).collect())
    }

    fn load(&self, game_id: &str) -> Result<Game, ServiceError> {
        self.store.get_game(game_id)?.ok_or_else(|| {
            debug!(game_id, "Game not found");
            GameError::GameNotFound(game_id.to_string()).into()
        })
    }
}
