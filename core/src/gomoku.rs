//! Gomoku: five in a row on a 15×15 board, no draw.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

pub const BOARD_SIZE: Coord = 15;
pub const WIN_LENGTH: usize = 5;

/// Forward halves of the four lines through a cell: horizontal, vertical, diagonal, anti-diagonal.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

pub type Line = SmallVec<[Coord2; 9]>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Gomoku {
    board: Array2<Option<Player>>,
    current_player: Player,
    last_move: Option<Coord2>,
    winner: Option<Player>,
    winning_line: Line,
}

impl Gomoku {
    pub fn new() -> Self {
        let side = usize::from(BOARD_SIZE);
        Self {
            board: Array2::default([side, side]),
            current_player: Player::X,
            last_move: None,
            winner: None,
            winning_line: Line::new(),
        }
    }

    pub fn size(&self) -> Coord2 {
        board_size(&self.board)
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Player> {
        self.board[coords.to_nd_index()]
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn last_move(&self) -> Option<Coord2> {
        self.last_move
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Cells of the run that decided the game, empty while in progress.
    pub fn winning_line(&self) -> &[Coord2] {
        &self.winning_line
    }

    pub fn status(&self) -> Status {
        if self.winner.is_some() {
            Status::Won
        } else {
            Status::InProgress
        }
    }

    pub fn place(&mut self, coords: Coord2) -> Result<PlaceOutcome> {
        let (rows, cols) = self.size();
        if coords.0 >= rows || coords.1 >= cols {
            return Err(GameError::InvalidCoords);
        }

        if self.winner.is_some() || self.cell_at(coords).is_some() {
            return Ok(PlaceOutcome::NoChange);
        }

        let player = self.current_player;
        self.board[coords.to_nd_index()] = Some(player);
        self.last_move = Some(coords);
        self.current_player = player.other();

        if let Some(line) = self.find_line_through(coords) {
            log::debug!("{} wins with {} in a row at {:?}", player, line.len(), coords);
            self.winner = Some(player);
            self.winning_line = line;
            return Ok(PlaceOutcome::Won(player));
        }
        Ok(PlaceOutcome::Placed)
    }

    /// Only lines through the newest stone can have become winning.
    fn find_line_through(&self, coords: Coord2) -> Option<Line> {
        let player = self.cell_at(coords)?;
        let size = self.size();

        AXES.iter().find_map(|&(dr, dc)| {
            let mut line = Line::new();
            line.push(coords);
            self.extend_run(&mut line, coords, (dr, dc), player, size);
            self.extend_run(&mut line, coords, (-dr, -dc), player, size);
            (line.len() >= WIN_LENGTH).then_some(line)
        })
    }

    fn extend_run(
        &self,
        line: &mut Line,
        from: Coord2,
        delta: (isize, isize),
        player: Player,
        size: Coord2,
    ) {
        let mut pos = from;
        while let Some(next) = apply_delta(pos, delta, size) {
            if self.cell_at(next) != Some(player) {
                break;
            }
            line.push(next);
            pos = next;
        }
    }
}

impl Default for Gomoku {
    fn default() -> Self {
        Self::new()
    }
}
