//! Board coordinates: column letter followed by row digit.

use super::GameError;
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;
use tracing::instrument;

/// Column symbols, left to right.
pub const COLUMN_SYMBOLS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Row symbols, top to bottom.
pub const ROW_SYMBOLS: [char; 4] = ['1', '2', '3', '4'];

/// A cell on the 4x4 board.
///
/// Rendered as column then row, so `B3` is row index 2, column index 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Creates a position from zero-based indices. Returns `None` outside `[0, 3]`.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < ROW_SYMBOLS.len() && col < COLUMN_SYMBOLS.len()).then_some(Self {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Parses coordinate text such as `"C2"`.
    ///
    /// Exactly two characters, uppercase column then row. Anything else,
    /// including surrounding whitespace, is rejected.
    #[instrument]
    pub fn parse(text: &str) -> Result<Self, GameError> {
        let invalid = || GameError::InvalidPosition(text.to_string());

        let mut chars = text.chars();
        let (Some(c), Some(r), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };

        let col = COLUMN_SYMBOLS.iter().position(|&x| x == c).ok_or_else(invalid)?;
        let row = ROW_SYMBOLS.iter().position(|&x| x == r).ok_or_else(invalid)?;
        Self::new(row, col).ok_or_else(invalid)
    }

    /// Renders the coordinate text for a pair of indices.
    pub fn encode(row: usize, col: usize) -> Option<String> {
        Self::new(row, col).map(|p| p.to_string())
    }

    /// Zero-based row index.
    pub fn row(self) -> usize {
        self.row as usize
    }

    /// Zero-based column index.
    pub fn col(self) -> usize {
        self.col as usize
    }

    /// All 16 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..ROW_SYMBOLS.len()).flat_map(|row| (0..COLUMN_SYMBOLS.len()).map(move |col| Self {
            row: row as u8,
            col: col as u8,
        }))
    }
}

impl JsonSchema for Position {
    fn schema_name() -> Cow<'static, str> {
        "Position".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "pattern": "^[A-D][1-4]$",
            "description": "Column A-D followed by row 1-4",
            "examples": ["A1", "B3", "D4"]
        })
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", COLUMN_SYMBOLS[self.col()], ROW_SYMBOLS[self.row()])
    }
}

impl FromStr for Position {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Position {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Position> for String {
    fn from(value: Position) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_corners_and_middle() {
        let a1 = Position::parse("A1").unwrap();
        assert_eq!((a1.row(), a1.col()), (0, 0));

        let d4 = Position::parse("D4").unwrap();
        assert_eq!((d4.row(), d4.col()), (3, 3));

        let b3 = Position::parse("B3").unwrap();
        assert_eq!((b3.row(), b3.col()), (2, 1));

        let c2 = Position::parse("C2").unwrap();
        assert_eq!((c2.row(), c2.col()), (1, 2));
    }

    #[test]
    fn accepts_exactly_sixteen_texts() {
        let mut accepted = 0;
        for c in ['A', 'B', 'C', 'D', 'E', 'Z', 'a'] {
            for r in ['0', '1', '2', '3', '4', '5', '9'] {
                if Position::parse(&format!("{c}{r}")).is_ok() {
                    accepted += 1;
                }
            }
        }
        assert_eq!(accepted, 16);
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["", "A", "A11", "AA", "11", "a1", "d4", " A1", "A1 ", "E1", "A5", "A0", "Z9"] {
            assert_eq!(
                Position::parse(text),
                Err(GameError::InvalidPosition(text.to_string())),
                "{text:?} should be rejected"
            );
        }
    }

    #[test]
    fn text_round_trip() {
        for pos in Position::all() {
            let text = pos.to_string();
            assert_eq!(Position::parse(&text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn index_round_trip() {
        for row in 0..4 {
            for col in 0..4 {
                let text = Position::encode(row, col).unwrap();
                let pos = Position::parse(&text).unwrap();
                assert_eq!((pos.row(), pos.col()), (row, col));
            }
        }
        assert_eq!(Position::encode(4, 0), None);
        assert_eq!(Position::encode(0, 4), None);
    }

    #[test]
    fn serde_as_text() {
        let pos = Position::parse("B2").unwrap();
        assert_eq!(serde_json::to_string(&pos).unwrap(), "\"B2\"");
        let back: Position = serde_json::from_str("\"B2\"").unwrap();
        assert_eq!(back, pos);
        assert!(serde_json::from_str::<Position>("\"b2\"").is_err());
    }
}
