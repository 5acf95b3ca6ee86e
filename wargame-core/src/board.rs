//! Square board geometry and the unit grid

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::units::Unit;

/// Standard board dimension (5x5)
pub const DEFAULT_DIM: u8 = 5;

/// Largest dimension the coordinate notation can express
pub const MAX_DIM: u8 = 16;

const ROW_LABELS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const COL_LABELS: &[u8; 16] = b"0123456789abcdef";

/// Orthogonal direction vectors (drow, dcol)
/// Index: 0=up, 1=left, 2=down, 3=right
pub const ORTHOGONAL: [(i8, i8); 4] = [
    (-1, 0), // up
    (0, -1), // left
    (1, 0),  // down
    (0, 1),  // right
];

/// All eight surrounding direction vectors, row-major
pub const SURROUNDING: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Board cell coordinate (row, col), row 0 at the top
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: i8,
    pub col: i8,
}

impl Coord {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Check if this coordinate lies on a `dim` x `dim` board
    pub fn is_within(&self, dim: u8) -> bool {
        let dim = dim as i8;
        self.row >= 0 && self.row < dim && self.col >= 0 && self.col < dim
    }

    pub fn offset(&self, drow: i8, dcol: i8) -> Coord {
        Coord::new(self.row + drow, self.col + dcol)
    }

    /// The four orthogonal neighbors (up, left, down, right), unclipped
    pub fn adjacent(&self) -> impl Iterator<Item = Coord> {
        let origin = *self;
        ORTHOGONAL.iter().map(move |&(dr, dc)| origin.offset(dr, dc))
    }

    /// The eight surrounding cells, diagonals included, unclipped
    pub fn surrounding(&self) -> impl Iterator<Item = Coord> {
        let origin = *self;
        SURROUNDING.iter().map(move |&(dr, dc)| origin.offset(dr, dc))
    }

    pub fn is_adjacent(&self, other: Coord) -> bool {
        self.manhattan(other) == 1
    }

    pub fn manhattan(&self, other: Coord) -> i32 {
        (self.row as i32 - other.row as i32).abs() + (self.col as i32 - other.col as i32).abs()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = usize::try_from(self.row)
            .ok()
            .and_then(|r| ROW_LABELS.get(r))
            .map_or('?', |&b| b as char);
        let col = usize::try_from(self.col)
            .ok()
            .and_then(|c| COL_LABELS.get(c))
            .map_or('?', |&b| b as char);
        write!(f, "{}{}", row, col)
    }
}

/// Error parsing a coordinate such as `B3`
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("not a coordinate: '{0}' (expected e.g. C4)")]
pub struct ParseCoordError(pub String);

impl FromStr for Coord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let (Some(r), Some(c), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ParseCoordError(s.to_string()));
        };

        let row = ROW_LABELS
            .iter()
            .position(|&b| b as char == r.to_ascii_uppercase());
        let col = COL_LABELS
            .iter()
            .position(|&b| b as char == c.to_ascii_lowercase());

        match (row, col) {
            (Some(row), Some(col)) => Ok(Coord::new(row as i8, col as i8)),
            _ => Err(ParseCoordError(s.to_string())),
        }
    }
}

/// Square grid of optional units, row-major
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    dim: u8,
    cells: Vec<Option<Unit>>,
}

impl Board {
    pub fn empty(dim: u8) -> Self {
        Self {
            dim,
            cells: vec![None; dim as usize * dim as usize],
        }
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.is_within(self.dim)
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.row as usize * self.dim as usize + coord.col as usize)
        } else {
            None
        }
    }

    /// Unit at `coord`; `None` for empty or off-board cells
    pub fn get(&self, coord: Coord) -> Option<&Unit> {
        self.index(coord).and_then(|i| self.cells[i].as_ref())
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Unit> {
        self.index(coord).and_then(move |i| self.cells[i].as_mut())
    }

    pub fn is_empty(&self, coord: Coord) -> bool {
        self.index(coord).is_some_and(|i| self.cells[i].is_none())
    }

    /// Place (or clear) a cell. Off-board writes are ignored.
    pub fn set(&mut self, coord: Coord, unit: Option<Unit>) {
        if let Some(i) = self.index(coord) {
            self.cells[i] = unit;
        }
    }

    pub fn take(&mut self, coord: Coord) -> Option<Unit> {
        self.index(coord).and_then(|i| self.cells[i].take())
    }

    /// Occupied cells in row-major order
    pub fn units(&self) -> impl Iterator<Item = (Coord, &Unit)> + '_ {
        let dim = self.dim as usize;
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            cell.as_ref()
                .map(|unit| (Coord::new((i / dim) as i8, (i % dim) as i8), unit))
        })
    }
}
