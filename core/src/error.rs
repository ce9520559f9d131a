use thiserror::Error;

/// Caller mistakes. Moves that the rules refuse are reported as outcomes instead.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("coordinates outside the board")]
    InvalidCoords,
    #[error("mine layout leaves no safe cell")]
    TooManyMines,
    #[error("rows do not form a square board of the expected size")]
    InvalidBoardShape,
    #[error("tile is neither empty nor a power of two")]
    InvalidTile,
}

pub type Result<T> = core::result::Result<T, GameError>;
