//! Storage failures shared by every [`GameStore`](crate::GameStore).

use derive_more::{Display, Error};
use diesel::result::DatabaseErrorKind;
use tracing::instrument;

/// What went wrong in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum DbErrorKind {
    /// The database could not be opened or configured.
    Connection,
    /// Schema migration failed.
    Migration,
    /// A statement failed.
    Query,
    /// A record with the same key already exists.
    Conflict,
    /// The record to update does not exist.
    Missing,
    /// A stored record does not decode into a valid game or attempt.
    Corrupt,
}

/// Storage error tagged with its kind and the line that raised it.
#[derive(Debug, Clone, Display, Error)]
#[display("Database error ({}): {} at {}:{}", kind, message, file, line)]
pub struct DbError {
    /// Failure category.
    pub kind: DbErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DbError {
    /// Creates an error of the given kind at the caller's location.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: DbErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for a [`DbErrorKind::Corrupt`] error.
    #[track_caller]
    pub fn corrupt(message: impl Into<String>) -> Self {
        Self::new(DbErrorKind::Corrupt, message)
    }
}

impl From<diesel::result::Error> for DbError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        let kind = match &err {
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                DbErrorKind::Conflict
            }
            diesel::result::Error::NotFound => DbErrorKind::Missing,
            _ => DbErrorKind::Query,
        };
        Self::new(kind, err.to_string())
    }
}

impl From<diesel::ConnectionError> for DbError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(DbErrorKind::Connection, err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::corrupt(format!("Malformed stored JSON: {}", err))
    }
}

impl From<crate::games::memory::InvariantError> for DbError {
    #[track_caller]
    fn from(err: crate::games::memory::InvariantError) -> Self {
        Self::corrupt(err.message)
    }
}
