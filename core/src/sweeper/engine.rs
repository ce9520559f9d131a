use alloc::collections::VecDeque;
use core::num::Saturating;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    Ready,
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    pub const fn status(self) -> Status {
        match self {
            Self::Ready | Self::Active => Status::InProgress,
            Self::Won => Status::Won,
            Self::Lost => Status::Lost,
        }
    }
}

/// Rules for one Minesweeper round over a fixed [`MineLayout`].
///
/// The round is won once every safe cell is revealed; flags never have to be placed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    mine_layout: MineLayout,
    board: Array2<EngineCell>,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    state: EngineState,
    triggered_mine: Option<Coord2>,
}

impl PlayEngine {
    pub fn new(mine_layout: MineLayout) -> Self {
        let size = mine_layout.size();
        Self {
            mine_layout,
            board: Array2::default(size.to_nd_index()),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            state: Default::default(),
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.mine_layout.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn flag_count(&self) -> CellCount {
        self.flagged_count.0
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn mines_left(&self) -> isize {
        (self.mine_layout.mine_count() as isize) - (self.flagged_count.0 as isize)
    }

    pub fn cell_at(&self, coords: Coord2) -> EngineCell {
        self.board[coords.to_nd_index()]
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.mine_layout.contains_mine(coords)
    }

    /// Whether any click on this cell could still change the board.
    pub fn can_interact_at(&self, coords: Coord2) -> bool {
        use EngineCell::*;

        if self.state.is_finished() {
            return false;
        }

        match self.cell_at(coords) {
            Hidden | Flagged => true,
            Revealed(0) => false,
            Revealed(count) => {
                let mut adjacent_flag_count = 0;
                for pos in self.mine_layout.iter_neighbors(coords) {
                    match self.board[pos.to_nd_index()] {
                        Flagged => adjacent_flag_count += 1,
                        Revealed(_) => continue,
                        Hidden => return true,
                    }
                }
                adjacent_flag_count != count
            }
        }
    }

    /// A revealed number whose flagged neighbours match it exactly.
    pub fn can_chord_at(&self, coords: Coord2) -> bool {
        if self.state.is_finished() {
            return false;
        }

        match self.board[coords.to_nd_index()] {
            EngineCell::Revealed(count) if count > 0 => {
                count == self.count_flagged_neighbors(coords)
            }
            _ => false,
        }
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use EngineCell::*;
        use MarkOutcome::*;

        let coords = self.mine_layout.validate_coords(coords)?;
        if self.state.is_finished() {
            return Ok(NoChange);
        }

        let outcome = match self.board[coords.to_nd_index()] {
            Hidden if self.flagged_count.0 >= self.total_mines() => {
                log::debug!("flag limit of {} reached", self.total_mines());
                NoChange
            }
            Hidden => {
                self.board[coords.to_nd_index()] = Flagged;
                self.flagged_count += 1;
                Changed
            }
            Flagged => {
                self.board[coords.to_nd_index()] = Hidden;
                self.flagged_count -= 1;
                Changed
            }
            Revealed(_) => NoChange,
        };

        if outcome.has_update() {
            self.mark_started();
        }
        Ok(outcome)
    }

    /// Flags every hidden neighbour of a number that has exactly that many unrevealed neighbours.
    pub fn chord_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use EngineCell::*;
        use MarkOutcome::*;

        let coords = self.mine_layout.validate_coords(coords)?;
        if self.state.is_finished() {
            return Ok(NoChange);
        }

        let Revealed(count) = self.board[coords.to_nd_index()] else {
            return Ok(NoChange);
        };

        if count == 0 || count != self.count_unrevealed_neighbors(coords) {
            return Ok(NoChange);
        }

        let mut updated = false;
        for pos in self.mine_layout.iter_neighbors(coords) {
            if self.flagged_count.0 >= self.total_mines() {
                break;
            }
            if matches!(self.board[pos.to_nd_index()], Hidden) {
                self.board[pos.to_nd_index()] = Flagged;
                self.flagged_count += 1;
                updated = true;
            }
        }

        Ok(if updated { Changed } else { NoChange })
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;

        if self.state.is_finished() || !matches!(self.cell_at(coords), EngineCell::Hidden) {
            return Ok(RevealOutcome::NoChange);
        }
        Ok(self.reveal_single_cell(coords))
    }

    /// Reveals every unflagged neighbour of a satisfied number.
    pub fn chord(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;

        if !self.can_chord_at(coords) {
            return Ok(RevealOutcome::NoChange);
        }

        Ok(self
            .mine_layout
            .iter_neighbors(coords)
            .map(|neighbor_coords| self.reveal_single_cell(neighbor_coords))
            .fold(RevealOutcome::NoChange, core::ops::BitOr::bitor))
    }

    /// Primary click: chord on a revealed number, reveal anything else.
    pub fn open(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;

        match self.cell_at(coords) {
            EngineCell::Revealed(count) if count > 0 => self.chord(coords),
            _ => self.reveal(coords),
        }
    }

    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let cell_state = self.board[coords.to_nd_index()];
        let has_mine = self.mine_layout[coords];

        match (cell_state, has_mine) {
            (EngineCell::Hidden, true) => {
                self.triggered_mine.get_or_insert(coords);
                self.end_game(false);
                RevealOutcome::HitMine
            }
            (EngineCell::Hidden, false) => {
                let mut to_visit = VecDeque::from([coords]);

                while let Some(visit_coords) = to_visit.pop_front() {
                    if !matches!(self.board[visit_coords.to_nd_index()], EngineCell::Hidden) {
                        continue;
                    }

                    let adjacent_mines = self.mine_layout.adjacent_mine_count(visit_coords);
                    self.board[visit_coords.to_nd_index()] = EngineCell::Revealed(adjacent_mines);
                    self.revealed_count += 1;

                    if adjacent_mines == 0 {
                        to_visit.extend(self.mine_layout.iter_neighbors(visit_coords).filter(
                            |&pos| matches!(self.board[pos.to_nd_index()], EngineCell::Hidden),
                        ));
                    }
                }

                if self.state.is_finished() {
                    // already lost earlier in the same chord
                    RevealOutcome::Revealed
                } else if self.revealed_count == Saturating(self.mine_layout.safe_cell_count()) {
                    self.end_game(true);
                    RevealOutcome::Won
                } else {
                    self.mark_started();
                    RevealOutcome::Revealed
                }
            }
            _ => RevealOutcome::NoChange,
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.state, EngineState::Ready) {
            log::debug!("round started");
            self.state = EngineState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        if won {
            self.triggered_mine = None;
        }
        log::debug!("round finished: {:?}", self.state);
    }

    fn count_flagged_neighbors(&self, coords: Coord2) -> u8 {
        self.mine_layout
            .iter_neighbors(coords)
            .filter(|&pos| self.board[pos.to_nd_index()] == EngineCell::Flagged)
            .count() as u8
    }

    fn count_unrevealed_neighbors(&self, coords: Coord2) -> u8 {
        self.mine_layout
            .iter_neighbors(coords)
            .filter(|&pos| !self.board[pos.to_nd_index()].is_revealed())
            .count() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(size: Coord2, mines: &[Coord2]) -> MineLayout {
        MineLayout::from_mine_coords(size, mines).unwrap()
    }

    #[test]
    fn hitting_a_mine_loses_and_keeps_flags() {
        let mut engine = PlayEngine::new(layout((3, 3), &[(0, 0), (2, 2)]));
        engine.toggle_flag((2, 2)).unwrap();

        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(engine.status(), Status::Lost);
        assert_eq!(engine.triggered_mine(), Some((0, 0)));
        assert_eq!(engine.cell_at((2, 2)), EngineCell::Flagged);
        assert_eq!(engine.revealed_count(), 0);
        assert_eq!(engine.mines_left(), 1);
    }

    #[test]
    fn zero_region_stops_at_its_numbered_border() {
        let mut engine = PlayEngine::new(layout((3, 4), &[(0, 3), (2, 3)]));

        assert_eq!(engine.reveal((1, 0)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(engine.cell_at((0, 1)), EngineCell::Revealed(0));
        assert_eq!(engine.cell_at((0, 2)), EngineCell::Revealed(1));
        assert_eq!(engine.cell_at((1, 2)), EngineCell::Revealed(2));
        assert_eq!(engine.cell_at((1, 3)), EngineCell::Hidden);
        assert_eq!(engine.revealed_count(), 9);
        assert_eq!(engine.status(), Status::InProgress);
    }

    #[test]
    fn chord_flag_stops_at_the_flag_cap() {
        let mut engine = PlayEngine::new(layout((1, 4), &[(0, 0), (0, 2)]));
        assert_eq!(engine.reveal((0, 1)).unwrap(), RevealOutcome::Revealed);
        // a wrong flag uses up one of the two
        engine.toggle_flag((0, 3)).unwrap();

        assert_eq!(engine.chord_flag((0, 1)).unwrap(), MarkOutcome::Changed);
        assert_eq!(engine.cell_at((0, 0)), EngineCell::Flagged);
        assert_eq!(engine.cell_at((0, 2)), EngineCell::Hidden);
        assert_eq!(engine.flag_count(), 2);
    }

    #[test]
    fn all_safe_cells_revealed_wins_without_flags() {
        let mut engine = PlayEngine::new(layout((2, 3), &[(0, 0), (0, 2)]));

        for coords in [(1, 0), (1, 1), (0, 1)] {
            assert_eq!(engine.reveal(coords).unwrap(), RevealOutcome::Revealed);
        }
        assert_eq!(engine.reveal((1, 2)).unwrap(), RevealOutcome::Won);

        assert_eq!(engine.status(), Status::Won);
        assert_eq!(engine.flag_count(), 0);
        assert_eq!(engine.cell_at((0, 0)), EngineCell::Hidden);
        assert_eq!(engine.triggered_mine(), None);
    }

    #[test]
    fn flood_fill_stops_at_numbers_and_flags() {
        // mine wall in column 2 splits the board
        let mines = &[(0, 2), (1, 2), (2, 2), (3, 2)];
        let mut engine = PlayEngine::new(layout((4, 5), mines));
        engine.toggle_flag((3, 0)).unwrap();

        let outcome = engine.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Revealed);
        assert_eq!(engine.cell_at((2, 0)), EngineCell::Revealed(0));
        assert_eq!(engine.cell_at((2, 1)), EngineCell::Revealed(3));
        assert_eq!(engine.cell_at((3, 0)), EngineCell::Flagged);
        assert_eq!(engine.cell_at((0, 3)), EngineCell::Hidden);
        assert_eq!(engine.revealed_count(), 7);
    }

    #[test]
    fn chord_reveal_uses_flagged_neighbors() {
        let mines = &[(1, 0), (1, 2)];
        let mut engine = PlayEngine::new(layout((3, 3), mines));

        engine.reveal((1, 1)).unwrap();
        engine.toggle_flag((1, 0)).unwrap();
        engine.toggle_flag((1, 2)).unwrap();

        let outcome = engine.chord((1, 1)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(engine.cell_at((0, 1)), EngineCell::Revealed(2));
        assert_eq!(engine.cell_at((2, 1)), EngineCell::Revealed(2));
    }

    #[test]
    fn chord_with_wrong_flag_detonates() {
        let mines = &[(0, 0)];
        let mut engine = PlayEngine::new(layout((3, 3), mines));

        engine.reveal((1, 1)).unwrap();
        engine.toggle_flag((2, 2)).unwrap();

        assert_eq!(engine.chord((1, 1)).unwrap(), RevealOutcome::HitMine);
        assert_eq!(engine.status(), Status::Lost);
        assert_eq!(engine.triggered_mine(), Some((0, 0)));
    }

    #[test]
    fn chord_needs_matching_flag_count() {
        let mines = &[(1, 0), (1, 2)];
        let mut engine = PlayEngine::new(layout((3, 3), mines));

        engine.reveal((1, 1)).unwrap();
        engine.toggle_flag((1, 0)).unwrap();

        assert!(!engine.can_chord_at((1, 1)));
        assert_eq!(engine.chord((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.cell_at((0, 0)), EngineCell::Hidden);
    }

    #[test]
    fn open_dispatches_to_chord_on_numbers() {
        let mines = &[(0, 0)];
        let mut engine = PlayEngine::new(layout((2, 3), mines));

        assert_eq!(engine.open((1, 1)).unwrap(), RevealOutcome::Revealed);
        engine.toggle_flag((0, 0)).unwrap();

        assert_eq!(engine.open((1, 1)).unwrap(), RevealOutcome::Won);
        assert_eq!(engine.cell_at((0, 2)), EngineCell::Revealed(0));
    }

    #[test]
    fn flags_are_capped_at_mine_count() {
        let mut engine = PlayEngine::new(layout((3, 3), &[(0, 0)]));

        assert_eq!(engine.toggle_flag((2, 2)).unwrap(), MarkOutcome::Changed);
        assert_eq!(engine.toggle_flag((2, 1)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(engine.flag_count(), 1);
        assert_eq!(engine.mines_left(), 0);

        // removing is always allowed
        assert_eq!(engine.toggle_flag((2, 2)).unwrap(), MarkOutcome::Changed);
        assert_eq!(engine.flag_count(), 0);
    }

    #[test]
    fn flagged_and_revealed_cells_do_not_reveal() {
        let mut engine = PlayEngine::new(layout((3, 3), &[(0, 0)]));

        engine.toggle_flag((0, 0)).unwrap();
        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);

        engine.reveal((1, 1)).unwrap();
        assert_eq!(engine.reveal((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.toggle_flag((1, 1)).unwrap(), MarkOutcome::NoChange);
    }

    #[test]
    fn finished_round_is_frozen() {
        let mut engine = PlayEngine::new(layout((3, 3), &[(0, 0), (2, 2)]));
        engine.reveal((0, 0)).unwrap();

        assert_eq!(engine.reveal((0, 2)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.toggle_flag((2, 2)).unwrap(), MarkOutcome::NoChange);
        assert_eq!(engine.chord((1, 1)).unwrap(), RevealOutcome::NoChange);
        assert!(!engine.can_interact_at((2, 0)));
        assert_eq!(engine.cell_at((0, 2)), EngineCell::Hidden);
    }

    #[test]
    fn out_of_range_coords_are_errors() {
        let mut engine = PlayEngine::new(layout((2, 2), &[]));
        assert_eq!(engine.reveal((2, 0)), Err(GameError::InvalidCoords));
        assert_eq!(engine.toggle_flag((0, 2)), Err(GameError::InvalidCoords));
        assert_eq!(engine.chord((5, 5)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn flagging_before_first_reveal_starts_the_round() {
        let mut engine = PlayEngine::new(layout((2, 2), &[(0, 0)]));
        assert!(engine.state().is_ready());

        engine.toggle_flag((0, 0)).unwrap();

        assert_eq!(engine.state(), EngineState::Active);
        assert_eq!(engine.status(), Status::InProgress);
    }

}
