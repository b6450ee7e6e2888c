use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid card id")]
    InvalidCard,
    #[error("Round is not in play, no flips are accepted")]
    NotPlaying,
}

pub type Result<T> = core::result::Result<T, GameError>;
