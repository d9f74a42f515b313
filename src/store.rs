//! Persistence interface for games and their attempt history.

use crate::db::{DbError, DbErrorKind};
use crate::games::memory::{Attempt, Game, rank};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

/// Result of a versioned save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record was replaced and its version advanced.
    Saved,
    /// The stored version moved on since the game was loaded. Nothing was written.
    Stale,
}

/// Storage used by [`GameService`](crate::GameService).
///
/// Games are stored as whole aggregates. `save_game` compares the stored
/// version with [`Game::version`] and only writes when they agree.
pub trait GameStore: Send + Sync {
    /// Inserts a freshly created game.
    fn create_game(&self, game: &Game) -> Result<(), DbError>;

    /// Loads a game, `None` if no game has this id.
    fn get_game(&self, game_id: &str) -> Result<Option<Game>, DbError>;

    /// Replaces the stored game if it is still at `game.version()`.
    fn save_game(&self, game: &Game) -> Result<SaveOutcome, DbError>;

    /// Appends a history entry.
    fn append_attempt(&self, attempt: &Attempt) -> Result<(), DbError>;

    /// Lists a game's attempts, ascending by attempt number.
    fn list_attempts(&self, game_id: &str) -> Result<Vec<Attempt>, DbError>;

    /// Lists completed games by fewest attempts then earliest end time.
    fn list_completed_games(&self, limit: usize) -> Result<Vec<Game>, DbError>;
}

/// Process-local store backed by shared maps.
///
/// Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGameStore {
    games: Arc<Mutex<HashMap<String, Game>>>,
    attempts: Arc<Mutex<Vec<Attempt>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, DbError> {
    mutex.lock().map_err(|e| {
        DbError::new(
            DbErrorKind::Connection,
            format!("Store lock poisoned: {}", e),
        )
    })
}

impl InMemoryGameStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory game store");
        Self::default()
    }
}

impl GameStore for InMemoryGameStore {
    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn create_game(&self, game: &Game) -> Result<(), DbError> {
        let mut games = lock(&self.games)?;
        if games.contains_key(game.id()) {
            warn!("Game already exists");
            return Err(DbError::new(
                DbErrorKind::Conflict,
                format!("Game '{}' already exists", game.id()),
            ));
        }
        games.insert(game.id().to_string(), game.clone());
        debug!("Game stored");
        Ok(())
    }

    #[instrument(skip(self))]
    fn get_game(&self, game_id: &str) -> Result<Option<Game>, DbError> {
        let game = lock(&self.games)?.get(game_id).cloned();
        if game.is_none() {
            debug!("Game not found");
        }
        Ok(game)
    }

    #[instrument(skip(self, game), fields(game_id = %game.id(), version = game.version()))]
    fn save_game(&self, game: &Game) -> Result<SaveOutcome, DbError> {
        let mut games = lock(&self.games)?;
        let Some(stored) = games.get_mut(game.id()) else {
            return Err(DbError::new(
                DbErrorKind::Missing,
                format!("Game '{}' does not exist", game.id()),
            ));
        };
        if stored.version() != game.version() {
            warn!(stored_version = stored.version(), "Stale save rejected");
            return Ok(SaveOutcome::Stale);
        }
        let mut updated = game.clone();
        updated.set_version(game.version() + 1);
        *stored = updated;
        debug!("Game saved");
        Ok(SaveOutcome::Saved)
    }

    #[instrument(
        skip(self, attempt),
        fields(game_id = %attempt.game_id, attempt_number = attempt.attempt_number)
    )]
    fn append_attempt(&self, attempt: &Attempt) -> Result<(), DbError> {
        let mut attempts = lock(&self.attempts)?;
        let duplicate = attempts
            .iter()
            .any(|a| a.game_id == attempt.game_id && a.attempt_number == attempt.attempt_number);
        if duplicate {
            return Err(DbError::new(
                DbErrorKind::Conflict,
                format!(
                    "Attempt {} already recorded for game '{}'",
                    attempt.attempt_number, attempt.game_id
                ),
            ));
        }
        attempts.push(attempt.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    fn list_attempts(&self, game_id: &str) -> Result<Vec<Attempt>, DbError> {
        let mut attempts: Vec<Attempt> = lock(&self.attempts)?
            .iter()
            .filter(|a| a.game_id == game_id)
            .cloned()
            .collect();
        attempts.sort_by_key(|a| a.attempt_number);
        debug!(count = attempts.len(), "Attempts loaded");
        Ok(attempts)
    }

    #[instrument(skip(self))]
    fn list_completed_games(&self, limit: usize) -> Result<Vec<Game>, DbError> {
        let games: Vec<Game> = lock(&self.games)?.values().cloned().collect();
        Ok(rank(games, limit))
    }
}
