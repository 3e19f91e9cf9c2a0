use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ResourceUnavailable,
    Transport,
    InvalidInput,
}

#[derive(Debug, Error)]
pub enum KioskError {
    #[error("player failed to start '{path}': {message}")]
    Player { path: String, message: String },
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
    #[error("malformed message: {0}")]
    Malformed(String),
}

impl KioskError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Player { .. } => ErrorKind::ResourceUnavailable,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Malformed(_) => ErrorKind::InvalidInput,
        }
    }
}
