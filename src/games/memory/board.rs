//! The hidden 4x4 board and its generator.

use super::{CardType, InvariantError, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of rows on the board.
pub const ROWS: usize = 4;
/// Number of columns on the board.
pub const COLUMNS: usize = 4;
/// Total number of cards.
pub const TOTAL_CARDS: usize = ROWS * COLUMNS;
/// Number of pairs to find.
pub const TOTAL_PAIRS: usize = TOTAL_CARDS / 2;

/// 4x4 grid of cards, row-major. Each card type occupies exactly two cells.
///
/// Built once when a game is created and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[[CardType; 4]; 4]", into = "[[CardType; 4]; 4]")]
pub struct Board {
    cells: [[CardType; COLUMNS]; ROWS],
}

impl Board {
    /// Generates a uniformly shuffled board from the thread-local RNG.
    #[instrument]
    pub fn random() -> Self {
        Self::shuffled(&mut rand::thread_rng())
    }

    /// Generates a shuffled board from the given RNG.
    ///
    /// The deck holds each card type twice, in declaration order, and is
    /// shuffled with Fisher-Yates before being laid out row by row.
    #[instrument(skip(rng))]
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = deck();
        for i in (1..deck.len()).rev() {
            let j = rng.gen_range(0..=i);
            deck.swap(i, j);
        }
        Self::from_deck(deck)
    }

    /// Lays out a flat deck row-major: cell `(r, c)` takes `deck[r * 4 + c]`.
    fn from_deck(deck: [CardType; TOTAL_CARDS]) -> Self {
        let mut cells = [[CardType::Cat; COLUMNS]; ROWS];
        for (index, card) in deck.into_iter().enumerate() {
            cells[index / COLUMNS][index % COLUMNS] = card;
        }
        Self { cells }
    }

    /// Builds a board from explicit rows, checking the two-of-each invariant.
    pub fn from_rows(cells: [[CardType; COLUMNS]; ROWS]) -> Result<Self, InvariantError> {
        for card in CardType::ALL {
            let count = cells.iter().flatten().filter(|&&c| c == card).count();
            if count != 2 {
                return Err(InvariantError::new(format!(
                    "Board must contain exactly two '{}' cards, found {}",
                    card, count
                )));
            }
        }
        Ok(Self { cells })
    }

    /// Returns the card at a position.
    pub fn card_at(&self, position: Position) -> CardType {
        self.cells[position.row()][position.col()]
    }

    /// Returns every card in row-major order.
    pub fn cards(&self) -> impl Iterator<Item = CardType> + '_ {
        self.cells.iter().flatten().copied()
    }
}

/// Unshuffled deck: two consecutive slots per card type.
fn deck() -> [CardType; TOTAL_CARDS] {
    let mut deck = [CardType::Cat; TOTAL_CARDS];
    for (index, card) in CardType::ALL.into_iter().enumerate() {
        deck[index * 2] = card;
        deck[index * 2 + 1] = card;
    }
    deck
}

impl TryFrom<[[CardType; COLUMNS]; ROWS]> for Board {
    type Error = InvariantError;

    fn try_from(value: [[CardType; COLUMNS]; ROWS]) -> Result<Self, Self::Error> {
        Self::from_rows(value)
    }
}

impl From<Board> for [[CardType; COLUMNS]; ROWS] {
    fn from(value: Board) -> Self {
        value.cells
    }
}
