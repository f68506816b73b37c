use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq)]
pub enum GameError {
    #[error("Cell ({x}, {y}) is outside the board")]
    OutOfBounds { x: usize, y: usize },
    #[error("Only left and right mouse buttons are handled")]
    InvalidButton,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Mine probability {0} is not within 0..=1")]
    InvalidProbability(f64),
}

pub type Result<T> = core::result::Result<T, GameError>;
