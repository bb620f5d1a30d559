// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Check not found: {0}")]
    CheckNotFound(String),

    #[error("Unknown game id: {0}")]
    UnknownGame(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
