//! Board state: the permutation of tiles over slots

use serde::{Deserialize, Serialize};

use crate::error::BoardError;
use crate::rng::SimpleRng;

/// A piece of the image, identified by the region it was cut from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    correct_row: usize,
    correct_col: usize,
}

impl Tile {
    pub const fn new(correct_row: usize, correct_col: usize) -> Self {
        Self {
            correct_row,
            correct_col,
        }
    }

    pub const fn correct_row(&self) -> usize {
        self.correct_row
    }

    pub const fn correct_col(&self) -> usize {
        self.correct_col
    }

    /// Slot this tile occupies in a solved board
    pub const fn home_slot(&self, grid_size: usize) -> usize {
        self.correct_row * grid_size + self.correct_col
    }
}

/// Tiles in slot order; `tiles[slot]` is the tile currently in `slot`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    grid_size: usize,
    tiles: Vec<Tile>,
}

impl Board {
    /// The solved board, tiles in row-major order
    pub fn solved(grid_size: usize) -> Result<Self, BoardError> {
        if grid_size == 0 {
            return Err(BoardError::EmptyGrid);
        }
        let tiles = (0..grid_size)
            .flat_map(|row| (0..grid_size).map(move |col| Tile::new(row, col)))
            .collect();
        Ok(Self { grid_size, tiles })
    }

    /// A uniformly shuffled board. Boards with more than one tile are
    /// reshuffled until they do not start out solved.
    pub fn shuffled(grid_size: usize, rng: &mut SimpleRng) -> Result<Self, BoardError> {
        let mut board = Self::solved(grid_size)?;
        loop {
            rng.shuffle(&mut board.tiles);
            if board.len() < 2 || !board.is_solved() {
                return Ok(board);
            }
            tracing::debug!(grid_size, "shuffle produced the solved board; reshuffling");
        }
    }

    /// Rebuild a board from an explicit arrangement. The tiles must be a
    /// permutation of the canonical set for `grid_size`.
    pub fn from_tiles(grid_size: usize, tiles: Vec<Tile>) -> Option<Self> {
        if grid_size == 0 || tiles.len() != grid_size * grid_size {
            return None;
        }
        let mut seen = vec![false; tiles.len()];
        for tile in &tiles {
            if tile.correct_row >= grid_size || tile.correct_col >= grid_size {
                return None;
            }
            let home = tile.home_slot(grid_size);
            if std::mem::replace(&mut seen[home], true) {
                return None;
            }
        }
        Some(Self { grid_size, tiles })
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, slot: usize) -> Option<Tile> {
        self.tiles.get(slot).copied()
    }

    /// Current (row, col) of a slot
    pub fn slot_position(&self, slot: usize) -> (usize, usize) {
        (slot / self.grid_size, slot % self.grid_size)
    }

    fn check_slot(&self, slot: usize) -> Result<(), BoardError> {
        if slot < self.tiles.len() {
            Ok(())
        } else {
            Err(BoardError::SlotOutOfRange {
                slot,
                len: self.tiles.len(),
            })
        }
    }

    /// Exchange the tiles in two slots. Returns `Ok(false)` for a self-swap,
    /// which leaves the board untouched.
    pub fn swap(&mut self, a: usize, b: usize) -> Result<bool, BoardError> {
        if a == b {
            return Ok(false);
        }
        self.check_slot(a)?;
        self.check_slot(b)?;
        self.tiles.swap(a, b);
        Ok(true)
    }

    pub fn is_solved(&self) -> bool {
        self.tiles
            .iter()
            .enumerate()
            .all(|(slot, tile)| tile.home_slot(self.grid_size) == slot)
    }

    /// Number of tiles not in their home slot
    pub fn misplaced(&self) -> usize {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(slot, tile)| tile.home_slot(self.grid_size) != *slot)
            .count()
    }
}
