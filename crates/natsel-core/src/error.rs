//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cell ({x}, {y}) is already occupied")]
    CellOccupied { x: i32, y: i32 },

    #[error("position ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    #[error("no empty cell available for spawning")]
    NoSpawnPosition,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
