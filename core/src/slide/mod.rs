//! 2048: tiles slide toward one edge and equal neighbours merge.

use core::fmt;
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;
pub use spawner::*;

mod spawner;

/// Tile value, `0` is an empty cell.
pub type Tile = u32;

pub const GRID_SIZE: Coord = 4;

/// Largest tile `Board::from_rows` accepts: a full board of them still sums within `u32`.
pub const MAX_TILE: Tile = 1 << 27;

type Line = SmallVec<[Tile; 8]>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Rows are lanes along axis 1, columns along axis 0.
    const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis(1),
            Self::Up | Self::Down => Axis(0),
        }
    }

    /// Whether the leading edge is at the end of the lane.
    const fn is_reversed(self) -> bool {
        matches!(self, Self::Right | Self::Down)
    }
}

/// Slides one line toward index 0 and merges equal neighbours, each tile at most once.
///
/// Returns the merge gain, the sum of all tiles produced by merging.
pub fn slide_line(line: &mut [Tile]) -> u32 {
    let mut packed: Line = line.iter().copied().filter(|&tile| tile != 0).collect();
    let mut gain = 0u32;

    let mut i = 0;
    while i + 1 < packed.len() {
        if packed[i] == packed[i + 1] {
            packed[i] = packed[i].saturating_mul(2);
            gain = gain.saturating_add(packed[i]);
            packed.remove(i + 1);
        }
        i += 1;
    }

    let padded = packed.into_iter().chain(core::iter::repeat(0));
    for (slot, tile) in line.iter_mut().zip(padded) {
        *slot = tile;
    }
    gain
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    tiles: Array2<Tile>,
}

impl Board {
    pub fn empty() -> Self {
        let side = usize::from(GRID_SIZE);
        Self {
            tiles: Array2::default([side, side]),
        }
    }

    pub fn from_rows<R: AsRef<[Tile]>>(rows: &[R]) -> Result<Self> {
        let side = usize::from(GRID_SIZE);
        if rows.len() != side || rows.iter().any(|row| row.as_ref().len() != side) {
            return Err(GameError::InvalidBoardShape);
        }

        let mut board = Self::empty();
        for (row, values) in rows.iter().enumerate() {
            for (col, &tile) in values.as_ref().iter().enumerate() {
                if tile != 0 && (tile < 2 || tile > MAX_TILE || !tile.is_power_of_two()) {
                    return Err(GameError::InvalidTile);
                }
                board.tiles[[row, col]] = tile;
            }
        }
        Ok(board)
    }

    pub fn size(&self) -> Coord2 {
        board_size(&self.tiles)
    }

    pub fn tile_at(&self, coords: Coord2) -> Tile {
        self.tiles[coords.to_nd_index()]
    }

    pub fn sum(&self) -> u32 {
        self.tiles.iter().fold(0, |sum, &tile| sum.saturating_add(tile))
    }

    pub fn max_tile(&self) -> Tile {
        self.tiles.iter().copied().max().unwrap_or(0)
    }

    pub fn empty_cells(&self) -> SmallVec<[Coord2; 16]> {
        self.tiles
            .indexed_iter()
            .filter(|&(_, &tile)| tile == 0)
            .map(|((row, col), _)| (row as Coord, col as Coord))
            .collect()
    }

    /// Board after sliding every lane toward `direction`, plus the merge gain. No tile is spawned.
    pub fn shifted(&self, direction: Direction) -> (Self, u32) {
        let mut tiles = self.tiles.clone();
        let mut gain = 0u32;

        for mut lane in tiles.lanes_mut(direction.axis()) {
            let mut line: Line = lane.iter().copied().collect();
            if direction.is_reversed() {
                line.reverse();
            }
            gain = gain.saturating_add(slide_line(&mut line));
            if direction.is_reversed() {
                line.reverse();
            }
            for (slot, tile) in lane.iter_mut().zip(line) {
                *slot = tile;
            }
        }

        (Self { tiles }, gain)
    }

    pub fn can_shift(&self, direction: Direction) -> bool {
        self.shifted(direction).0 != *self
    }

    /// No empty cell and no horizontally or vertically adjacent equal pair.
    pub fn is_stuck(&self) -> bool {
        if self.tiles.iter().any(|&tile| tile == 0) {
            return false;
        }

        let (rows, cols) = self.tiles.dim();
        for ((row, col), &tile) in self.tiles.indexed_iter() {
            if col + 1 < cols && self.tiles[[row, col + 1]] == tile {
                return false;
            }
            if row + 1 < rows && self.tiles[[row + 1, col]] == tile {
                return false;
            }
        }
        true
    }

    /// Places one tile from `spawner` into an empty cell. `None` when the board is full.
    pub fn spawn_tile<S: TileSpawner + ?Sized>(&mut self, spawner: &mut S) -> Option<(Coord2, Tile)> {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return None;
        }

        let (index, tile) = spawner.spawn(empty.len());
        if index >= empty.len() {
            log::warn!(
                "Spawner picked cell {} but only {} are free, using the last one",
                index,
                empty.len()
            );
        }
        let coords = empty[index.min(empty.len() - 1)];
        self.tiles[coords.to_nd_index()] = tile;
        Some((coords, tile))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.rows() {
            for (col, tile) in row.iter().enumerate() {
                if col > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{:>4}", tile)?;
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SlideOutcome {
    NoChange,
    Moved,
    GameOver,
}

impl SlideOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Moved | Self::GameOver => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game2048 {
    board: Board,
    score: u32,
    move_count: u32,
    last_spawn: Option<Coord2>,
    status: Status,
}

impl Game2048 {
    /// Empty board with two spawned tiles.
    pub fn new<S: TileSpawner + ?Sized>(spawner: &mut S) -> Self {
        let mut board = Board::empty();
        board.spawn_tile(spawner);
        let last_spawn = board.spawn_tile(spawner).map(|(coords, _)| coords);
        let mut game = Self::from_board(board);
        game.last_spawn = last_spawn;
        game
    }

    pub fn from_board(board: Board) -> Self {
        let status = if board.is_stuck() {
            Status::Lost
        } else {
            Status::InProgress
        };
        Self {
            board,
            score: 0,
            move_count: 0,
            last_spawn: None,
            status,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn last_spawn(&self) -> Option<Coord2> {
        self.last_spawn
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn make_move<S: TileSpawner + ?Sized>(
        &mut self,
        direction: Direction,
        spawner: &mut S,
    ) -> SlideOutcome {
        if self.status.is_finished() {
            return SlideOutcome::NoChange;
        }

        let (board, gain) = self.board.shifted(direction);
        if board == self.board {
            log::trace!("{:?} does not move any tile", direction);
            return SlideOutcome::NoChange;
        }

        self.board = board;
        self.score = self.score.saturating_add(gain);
        self.move_count += 1;
        self.last_spawn = self.board.spawn_tile(spawner).map(|(coords, _)| coords);

        if self.board.is_stuck() {
            log::debug!("no moves left, final score {}", self.score);
            self.status = Status::Lost;
            SlideOutcome::GameOver
        } else {
            SlideOutcome::Moved
        }
    }
}
