//! SQLite repository for games and attempt history.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::models::{AttemptRow, GameChanges, GameRow, NewAttempt};
use crate::db::{DbError, DbErrorKind, schema};
use crate::games::memory::{Attempt, Game, GameStatus};
use crate::store::{GameStore, SaveOutcome};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applied to every connection: wait up to 5s on a locked file, WAL journal.
const CONNECTION_PRAGMAS: &str = "PRAGMA busy_timeout = 5000; PRAGMA journal_mode = WAL;";

/// Database repository for game and attempt records.
///
/// Opens a fresh connection per call, so clones can be shared freely
/// between request handlers.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Creates a repository for an already migrated database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new(DbErrorKind::Connection, "Database path is empty"));
        }
        info!(path = %db_path, "Creating GameRepository");
        Ok(Self { db_path })
    }

    /// Creates a repository and applies any pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, DbError> {
        let repo = Self::new(db_path)?;
        repo.run_migrations()?;
        Ok(repo)
    }

    /// Applies pending migrations and returns how many ran.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<usize, DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(DbErrorKind::Migration, format!("Migration failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(applied.len())
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })?;
        conn.batch_execute(CONNECTION_PRAGMAS).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to configure '{}': {}", self.db_path, e),
            )
        })?;
        Ok(conn)
    }
}

impl GameStore for GameRepository {
    #[instrument(skip(self, game), fields(game_id = %game.id()))]
    fn create_game(&self, game: &Game) -> Result<(), DbError> {
        debug!("Inserting game");
        let mut conn = self.connection()?;
        let row = GameRow::from_game(game)?;

        diesel::insert_into(schema::games::table)
            .values(&row)
            .execute(&mut conn)?;

        info!("Game inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    fn get_game(&self, game_id: &str) -> Result<Option<Game>, DbError> {
        debug!("Loading game");
        let mut conn = self.connection()?;

        let row: Option<GameRow> = schema::games::table
            .filter(schema::games::id.eq(game_id))
            .select(GameRow::as_select())
            .first(&mut conn)
            .optional()?;

        match row {
            Some(row) => row.into_game().map(Some),
            None => {
                debug!("Game not found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, game), fields(game_id = %game.id(), version = game.version()))]
    fn save_game(&self, game: &Game) -> Result<SaveOutcome, DbError> {
        debug!("Saving game");
        let mut conn = self.connection()?;
        let changes = GameChanges::next_version(game)?;

        let updated = diesel::update(
            schema::games::table
                .filter(schema::games::id.eq(game.id()))
                .filter(schema::games::version.eq(game.version())),
        )
        .set(&changes)
        .execute(&mut conn)?;

        if updated == 1 {
            debug!("Game saved");
            return Ok(SaveOutcome::Saved);
        }

        let exists = schema::games::table
            .filter(schema::games::id.eq(game.id()))
            .count()
            .get_result::<i64>(&mut conn)?
            > 0;
        if !exists {
            return Err(DbError::new(
                DbErrorKind::Missing,
                format!("Game '{}' does not exist", game.id()),
            ));
        }
        warn!("Stale save rejected");
        Ok(SaveOutcome::Stale)
    }

    #[instrument(
        skip(self, attempt),
        fields(game_id = %attempt.game_id, attempt_number = attempt.attempt_number)
    )]
    fn append_attempt(&self, attempt: &Attempt) -> Result<(), DbError> {
        debug!("Recording attempt");
        let mut conn = self.connection()?;
        let row = NewAttempt::from_attempt(attempt)?;

        diesel::insert_into(schema::attempts::table)
            .values(&row)
            .execute(&mut conn)?;

        debug!("Attempt recorded");
        Ok(())
    }

    #[instrument(skip(self))]
    fn list_attempts(&self, game_id: &str) -> Result<Vec<Attempt>, DbError> {
        debug!("Loading attempts");
        let mut conn = self.connection()?;

        let rows: Vec<AttemptRow> = schema::attempts::table
            .filter(schema::attempts::game_id.eq(game_id))
            .order(schema::attempts::attempt_number.asc())
            .select(AttemptRow::as_select())
            .load(&mut conn)?;

        info!(count = rows.len(), "Attempts loaded");
        rows.into_iter().map(AttemptRow::into_attempt).collect()
    }

    #[instrument(skip(self))]
    fn list_completed_games(&self, limit: usize) -> Result<Vec<Game>, DbError> {
        debug!("Loading completed games");
        let mut conn = self.connection()?;
        let limit = i64::try_from(limit).map_err(|_| {
            DbError::new(DbErrorKind::Query, format!("Limit out of range: {}", limit))
        })?;

        let rows: Vec<GameRow> = schema::games::table
            .filter(schema::games::status.eq(GameStatus::Completed.to_string()))
            .order((
                schema::games::attempt_count.asc(),
                schema::games::end_time.asc(),
            ))
            .limit(limit)
            .select(GameRow::as_select())
            .load(&mut conn)?;

        info!(count = rows.len(), "Completed games loaded");
        rows.into_iter().map(GameRow::into_game).collect()
    }
}
