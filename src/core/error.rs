use thiserror::Error;

#[derive(Error, Debug)]
pub enum IronwakeError {
    #[error("Invalid placement: {0}")]
    InvalidPlacement(String),

    #[error("Unknown ship: {0:?}")]
    UnknownShip(crate::board::ship::ShipId),

    #[error("Inconsistent match state: {0}")]
    InconsistentState(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Tournament error: {0}")]
    Tournament(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IronwakeError>;
