//! Tic-Tac-Toe on a 3×3 board addressed by cell index `0..9`, row-major.

use serde::{Deserialize, Serialize};

use crate::*;

pub const CELL_COUNT: usize = 9;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToe {
    cells: [Option<Player>; CELL_COUNT],
    current_player: Player,
    winner: Option<Player>,
    winning_line: Option<[usize; 3]>,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            cells: [None; CELL_COUNT],
            current_player: Player::X,
            winner: None,
            winning_line: None,
        }
    }

    pub fn cells(&self) -> &[Option<Player>; CELL_COUNT] {
        &self.cells
    }

    pub fn cell_at(&self, index: usize) -> Option<Player> {
        self.cells.get(index).copied().flatten()
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn winning_line(&self) -> Option<[usize; 3]> {
        self.winning_line
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// A full board without a winner is a draw.
    pub fn status(&self) -> Status {
        if self.winner.is_some() {
            Status::Won
        } else if self.is_full() {
            Status::Draw
        } else {
            Status::InProgress
        }
    }

    pub fn place(&mut self, index: usize) -> Result<PlaceOutcome> {
        if index >= CELL_COUNT {
            return Err(GameError::InvalidCoords);
        }

        if self.status().is_finished() || self.cells[index].is_some() {
            return Ok(PlaceOutcome::NoChange);
        }

        let player = self.current_player;
        self.cells[index] = Some(player);
        self.current_player = player.other();

        if let Some(line) = self.find_line() {
            log::debug!("{} wins on {:?}", player, line);
            self.winner = Some(player);
            self.winning_line = Some(line);
            Ok(PlaceOutcome::Won(player))
        } else if self.is_full() {
            log::debug!("board full, draw");
            Ok(PlaceOutcome::Draw)
        } else {
            Ok(PlaceOutcome::Placed)
        }
    }

    fn find_line(&self) -> Option<[usize; 3]> {
        LINES.iter().copied().find(|&[a, b, c]| {
            self.cells[a].is_some() && self.cells[a] == self.cells[b] && self.cells[a] == self.cells[c]
        })
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(game: &mut TicTacToe, moves: &[usize]) -> PlaceOutcome {
        moves
            .iter()
            .map(|&index| game.place(index).unwrap())
            .last()
            .unwrap_or(PlaceOutcome::NoChange)
    }

    #[test]
    fn top_row_wins_for_x() {
        let mut game = TicTacToe::new();
        // X X _ / O O _ / _ _ _
        assert_eq!(play(&mut game, &[0, 3, 1, 4]), PlaceOutcome::Placed);
        assert_eq!(game.current_player(), Player::X);

        assert_eq!(game.place(2).unwrap(), PlaceOutcome::Won(Player::X));
        assert_eq!(game.winner(), Some(Player::X));
        assert_eq!(game.winning_line(), Some([0, 1, 2]));
        assert_eq!(game.status(), Status::Won);
    }

    #[test]
    fn diagonal_wins_for_o() {
        let mut game = TicTacToe::new();
        assert_eq!(
            play(&mut game, &[1, 0, 2, 4, 5, 8]),
            PlaceOutcome::Won(Player::O)
        );
        assert_eq!(game.winning_line(), Some([0, 4, 8]));
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        let mut game = TicTacToe::new();
        // X O X / X O O / O X X
        let outcome = play(&mut game, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);

        assert_eq!(outcome, PlaceOutcome::Draw);
        assert_eq!(game.status(), Status::Draw);
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn win_on_last_cell_is_not_a_draw() {
        let mut game = TicTacToe::new();
        // X O X / O X O / O X X
        let outcome = play(&mut game, &[0, 1, 2, 3, 4, 5, 7, 6, 8]);

        assert_eq!(outcome, PlaceOutcome::Won(Player::X));
        assert_eq!(game.status(), Status::Won);
    }

    #[test]
    fn occupied_cells_and_finished_games_reject_moves() {
        let mut game = TicTacToe::new();
        game.place(4).unwrap();
        assert_eq!(game.place(4).unwrap(), PlaceOutcome::NoChange);
        assert_eq!(game.current_player(), Player::O);

        play(&mut game, &[0, 1, 3, 7]);
        assert_eq!(game.winner(), Some(Player::X));
        assert_eq!(game.place(8).unwrap(), PlaceOutcome::NoChange);
        assert_eq!(game.cell_at(8), None);
    }

    #[test]
    fn index_past_the_board_is_an_error() {
        let mut game = TicTacToe::new();
        assert_eq!(game.place(9), Err(GameError::InvalidCoords));
    }
}
