//! Database rows and their conversion to domain types.

use std::str::FromStr;

use chrono::NaiveDateTime;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::{DbError, DbErrorKind, schema};
use crate::games::memory::{Attempt, Board, CardType, Game, GameSnapshot, GameStatus, Position};

/// Stored game record. Board and matched cards are JSON text.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Insertable)]
#[diesel(table_name = schema::games)]
pub struct GameRow {
    id: String,
    board: String,
    matched_cards: String,
    status: String,
    start_time: NaiveDateTime,
    end_time: Option<NaiveDateTime>,
    attempt_count: i32,
    version: i32,
}

impl GameRow {
    /// Serializes a game into a row.
    #[instrument(skip(game), fields(game_id = %game.id()))]
    pub fn from_game(game: &Game) -> Result<Self, DbError> {
        Ok(Self {
            id: game.id().to_string(),
            board: serde_json::to_string(game.board())?,
            matched_cards: serde_json::to_string(game.matched_cards())?,
            status: game.status().to_string(),
            start_time: game.start_time().naive_utc(),
            end_time: game.end_time().map(|t| t.naive_utc()),
            attempt_count: to_db_int(game.attempt_count())?,
            version: game.version(),
        })
    }

    /// Rebuilds the game, rejecting rows that violate its invariants.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn into_game(self) -> Result<Game, DbError> {
        let board: Board = serde_json::from_str(&self.board)?;
        let matched_cards: Vec<Position> = serde_json::from_str(&self.matched_cards)?;
        let status = GameStatus::from_str(&self.status)
            .map_err(|_| DbError::corrupt(format!("Invalid status: '{}'", self.status)))?;
        let attempt_count = u32::try_from(self.attempt_count).map_err(|_| {
            DbError::corrupt(format!("Invalid attempt count: {}", self.attempt_count))
        })?;

        let game = Game::try_from(GameSnapshot {
            id: self.id,
            board,
            matched_cards,
            status,
            start_time: self.start_time.and_utc(),
            end_time: self.end_time.map(|t| t.and_utc()),
            attempt_count,
            version: self.version,
        })?;
        Ok(game)
    }
}

/// Columns replaced when a game is saved.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::games)]
#[diesel(treat_none_as_null = true)]
pub struct GameChanges {
    matched_cards: String,
    status: String,
    end_time: Option<NaiveDateTime>,
    attempt_count: i32,
    version: i32,
}

impl GameChanges {
    /// Mutable columns of `game`, with the version advanced by one.
    #[instrument(skip(game), fields(game_id = %game.id()))]
    pub fn next_version(game: &Game) -> Result<Self, DbError> {
        Ok(Self {
            matched_cards: serde_json::to_string(game.matched_cards())?,
            status: game.status().to_string(),
            end_time: game.end_time().map(|t| t.naive_utc()),
            attempt_count: to_db_int(game.attempt_count())?,
            version: game.version() + 1,
        })
    }
}

/// Stored attempt record.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = schema::attempts)]
pub struct AttemptRow {
    id: i32,
    game_id: String,
    attempt_number: i32,
    position1: String,
    position2: String,
    value1: String,
    value2: String,
    is_match: bool,
    timestamp: NaiveDateTime,
}

impl AttemptRow {
    /// Converts the row back into an [`Attempt`].
    #[instrument(skip(self), fields(id = self.id, game_id = %self.game_id))]
    pub fn into_attempt(self) -> Result<Attempt, DbError> {
        let position = |text: &str| {
            Position::parse(text)
                .map_err(|_| DbError::corrupt(format!("Invalid stored position: '{}'", text)))
        };
        let card = |text: &str| {
            CardType::from_str(text)
                .map_err(|_| DbError::corrupt(format!("Invalid card value: '{}'", text)))
        };
        let attempt_number = u32::try_from(self.attempt_number).map_err(|_| {
            DbError::corrupt(format!("Invalid attempt number: {}", self.attempt_number))
        })?;

        Ok(Attempt {
            attempt_number,
            positions: [position(&self.position1)?, position(&self.position2)?],
            values: [card(&self.value1)?, card(&self.value2)?],
            is_match: self.is_match,
            timestamp: self.timestamp.and_utc(),
            game_id: self.game_id,
        })
    }
}

/// Insertable attempt record.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::attempts)]
pub struct NewAttempt {
    game_id: String,
    attempt_number: i32,
    position1: String,
    position2: String,
    value1: String,
    value2: String,
    is_match: bool,
    timestamp: NaiveDateTime,
}

impl NewAttempt {
    /// Flattens an [`Attempt`] into columns.
    #[instrument(
        skip(attempt),
        fields(game_id = %attempt.game_id, attempt_number = attempt.attempt_number)
    )]
    pub fn from_attempt(attempt: &Attempt) -> Result<Self, DbError> {
        let [p1, p2] = attempt.positions;
        let [v1, v2] = attempt.values;
        Ok(Self::new(
            attempt.game_id.clone(),
            to_db_int(attempt.attempt_number)?,
            p1.to_string(),
            p2.to_string(),
            v1.name().to_string(),
            v2.name().to_string(),
            attempt.is_match,
            attempt.timestamp.naive_utc(),
        ))
    }
}

fn to_db_int(value: u32) -> Result<i32, DbError> {
    i32::try_from(value)
        .map_err(|_| DbError::new(DbErrorKind::Query, format!("Counter out of range: {}", value)))
}
