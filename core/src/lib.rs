#![no_std]

extern crate alloc;

use core::fmt;
use serde::{Deserialize, Serialize};

pub use error::*;
pub use types::*;

pub mod gomoku;
pub mod slide;
pub mod sweeper;
pub mod tictactoe;

mod error;
mod types;

/// Terminal-state query shared by all four games.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    InProgress,
    Won,
    Lost,
    Draw,
}

impl Status {
    pub const fn is_finished(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// X always moves first.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    #[default]
    X,
    O,
}

impl Player {
    pub const fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Self::X => "X",
            Self::O => "O",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Outcome of placing a mark in one of the two-player games.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaceOutcome {
    NoChange,
    Placed,
    Won(Player),
    Draw,
}

impl PlaceOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}
